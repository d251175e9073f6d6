//! # Blog Demo
//!
//! Walks the users/posts/comments hooks through a small blog session:
//! - Creating records and reading them back through the cache
//! - Partial updates and deletes invalidating cached lists
//! - Observing mutations through the signal manager
//! - Mutation handles with observable status
//!
//! Runs against an in-process store. With `SUPABASE_PROJECT_URL` and
//! `SUPABASE_API_KEY` set it talks to that project instead.
//!
//! ```text
//! RUST_LOG=storehooks=debug,cache_system=trace cargo run --example blog_demo --features debug-logging
//! ```

use std::sync::Arc;

use storehooks::prelude::*;
use tracing_subscriber::EnvFilter;

fn connect() -> Result<StoreHooks, StoreHooksError> {
    if std::env::var("SUPABASE_PROJECT_URL").is_ok() {
        return StoreHooks::from_env();
    }

    let store = Arc::new(MemoryStore::with_tables(&["users", "posts", "comments"]));
    let cache = Arc::new(CacheManager::in_memory(CacheConfig::default()));
    Ok(StoreHooks::from_parts(store, cache))
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("🚀 StoreHooks Blog Demo");
    println!("=======================");

    let storehooks = connect()?;
    storehooks.signals().add_callback(|event: &DatabaseEvent| {
        println!(
            "   📡 {:?} on {} ({})",
            event.event_type,
            event.table_name,
            event.record_id.as_deref().unwrap_or("-")
        );
        Ok(())
    });

    let users = storehooks.users()?;
    let posts = storehooks.posts()?;
    let comments = storehooks.comments()?;

    // 1. Users
    println!("\n👤 Step 1: Users");
    let ana = users
        .create(&NewUser {
            username: "ana".to_string(),
            email: "ana@x.com".to_string(),
        })
        .await?
        .into_iter()
        .next()
        .ok_or("store returned no row for the new user")?;
    println!(
        "   created {} <{}>",
        ana.username.as_deref().unwrap_or("?"),
        ana.email.as_deref().unwrap_or("?")
    );

    for user in users.list().await? {
        println!("   listed {} ({})", user.username.as_deref().unwrap_or("?"), user.id);
    }

    // 2. Posts and comments
    println!("\n📝 Step 2: Posts and comments");
    let post = posts
        .create(&NewPost {
            user_id: ana.id,
            title: "Hello".to_string(),
            content: "First post".to_string(),
        })
        .await?
        .into_iter()
        .next()
        .ok_or("store returned no row for the new post")?;

    let add_comment = comments.create_mutation();
    add_comment
        .mutate(NewComment {
            post_id: post.id,
            user_id: ana.id,
            content: "Nice one".to_string(),
        })
        .await?;
    println!("   comment mutation status: {:?}", add_comment.status());
    println!(
        "   {} comment(s) on '{}'",
        comments.list().await?.len(),
        post.title.as_deref().unwrap_or("")
    );

    // 3. Updates
    println!("\n✏️  Step 3: Partial update");
    let cached = posts.list().await?;
    println!("   cached list holds {} post(s)", cached.len());
    posts
        .update(
            post.id,
            &PostPatch {
                title: Some("Hello, world".to_string()),
                ..PostPatch::default()
            },
        )
        .await?;
    println!("   cached list after update: {:?}", posts.cached_list().await.map(|l| l.len()));
    let refreshed = posts.get_by_id(post.id).await?;
    println!(
        "   title is now '{}', content '{}'",
        refreshed.title.as_deref().unwrap_or(""),
        refreshed.content.as_deref().unwrap_or("")
    );

    // 4. Errors
    println!("\n⚠️  Step 4: Errors");
    match users.get_by_id(Uuid::new_v4()).await {
        Ok(user) => println!("   unexpected user {}", user.id),
        Err(e) => println!("   {:?}: {}", e.kind, e),
    }

    // 5. Cleanup
    println!("\n🧹 Step 5: Delete");
    let delete_user = users.delete_mutation();
    delete_user.mutate(RecordId::from(ana.id)).await?;
    println!("   users left: {}", users.list().await?.len());

    println!("\n✅ Done");
    Ok(())
}
