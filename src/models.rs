//! Record types of the remote schema
//!
//! Only `id` is required on a record read back from the store. Every other
//! column may be null or absent. Foreign keys (`user_id`, `post_id`) are
//! plain fields; nothing here follows or checks them.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Table `users`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
    pub id: Uuid,
    #[serde(default)]
    pub username: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default, with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewUser {
    pub username: String,
    pub email: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct UserPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub username: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
}

/// Table `posts`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewPost {
    pub user_id: Uuid,
    pub title: String,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PostPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<Uuid>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// Table `comments`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Uuid,
    #[serde(default)]
    pub post_id: Option<Uuid>,
    #[serde(default)]
    pub user_id: Option<Uuid>,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default, with = "timestamp")]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewComment {
    pub post_id: Uuid,
    pub user_id: Uuid,
    pub content: String,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct CommentPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
}

/// `timestamp` columns arrive without an offset, `timestamptz` with one.
/// Both are read as UTC; null reads as `None`.
pub mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(
        value: &Option<DateTime<Utc>>,
        serializer: S,
    ) -> Result<S::Ok, S::Error> {
        match value {
            Some(value) => serializer.serialize_str(&value.to_rfc3339()),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(
        deserializer: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        let Some(raw) = Option::<String>::deserialize(deserializer)? else {
            return Ok(None);
        };
        parse(&raw).map(Some).map_err(serde::de::Error::custom)
    }

    fn parse(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
        if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
            return Ok(with_offset.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .or_else(|_| NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S%.f"))
            .map(|naive| naive.and_utc())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_timestamp_with_and_without_offset() {
        let id = Uuid::new_v4();
        let with_tz: User = serde_json::from_value(json!({
            "id": id,
            "username": "ana",
            "email": "ana@x.com",
            "created_at": "2024-03-01T10:00:00.123456+00:00"
        }))
        .unwrap();
        let naive: User = serde_json::from_value(json!({
            "id": id,
            "username": "ana",
            "email": "ana@x.com",
            "created_at": "2024-03-01T10:00:00.123456"
        }))
        .unwrap();

        assert_eq!(with_tz.created_at, naive.created_at);
    }

    #[test]
    fn test_patch_skips_absent_fields() {
        let patch = UserPatch {
            email: Some("ana2@x.com".to_string()),
            ..UserPatch::default()
        };
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "email": "ana2@x.com" }));
        assert_eq!(serde_json::to_value(PostPatch::default()).unwrap(), json!({}));
    }

    #[test]
    fn test_unknown_columns_are_ignored() {
        let comment: Comment = serde_json::from_value(json!({
            "id": Uuid::new_v4(),
            "post_id": Uuid::new_v4(),
            "user_id": Uuid::new_v4(),
            "content": "hi",
            "created_at": "2024-03-01T10:00:00Z",
            "edited": true
        }))
        .unwrap();
        assert_eq!(comment.content.as_deref(), Some("hi"));
    }

    #[test]
    fn test_null_and_missing_columns_decode() {
        let id = Uuid::new_v4();
        let user: User = serde_json::from_value(json!({
            "id": id,
            "username": "ana",
            "email": null
        }))
        .unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.username.as_deref(), Some("ana"));
        assert_eq!(user.email, None);
        assert_eq!(user.created_at, None);

        let post: Post = serde_json::from_value(json!({ "id": id, "created_at": null })).unwrap();
        assert_eq!(post.title, None);

        // Cached values are stored as JSON and read back
        let cached = serde_json::to_value(&user).unwrap();
        assert_eq!(serde_json::from_value::<User>(cached).unwrap(), user);
    }

    #[test]
    fn test_missing_id_is_rejected() {
        assert!(serde_json::from_value::<User>(json!({ "username": "ana" })).is_err());
    }
}
