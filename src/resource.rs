//! Resource definitions
//!
//! A resource ties a remote table name to the record, insert and patch types
//! the hooks for that table speak.

use crate::models::{Comment, CommentPatch, NewComment, NewPost, NewUser, Post, PostPatch, User, UserPatch};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::fmt::Debug;

/// One remote record type
pub trait Resource: Send + Sync + 'static {
    /// Remote table name, also the cache namespace
    const NAME: &'static str;

    /// Record as read back from the store
    type Record: Clone + Debug + Serialize + DeserializeOwned + Send + Sync + 'static;

    /// Payload for Create
    type Insert: Debug + Serialize + Send + Sync + 'static;

    /// Partial field patch for Update
    type Patch: Debug + Serialize + Send + Sync + 'static;
}

#[derive(Debug, Clone, Copy)]
pub struct Users;

#[derive(Debug, Clone, Copy)]
pub struct Posts;

#[derive(Debug, Clone, Copy)]
pub struct Comments;

impl Resource for Users {
    const NAME: &'static str = "users";
    type Record = User;
    type Insert = NewUser;
    type Patch = UserPatch;
}

impl Resource for Posts {
    const NAME: &'static str = "posts";
    type Record = Post;
    type Insert = NewPost;
    type Patch = PostPatch;
}

impl Resource for Comments {
    const NAME: &'static str = "comments";
    type Record = Comment;
    type Insert = NewComment;
    type Patch = CommentPatch;
}
