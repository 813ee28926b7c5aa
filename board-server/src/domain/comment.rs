use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Upper bound on comment content length, counted in characters.
pub const MAX_CONTENT_LENGTH: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Comment {
    pub id: Uuid,
    pub post_id: Uuid,
    pub author: String,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Comment {
    pub fn new(post_id: Uuid, author: String, content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            post_id,
            author,
            content,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Partial change set applied to an existing comment. Absent fields keep
/// their current value.
#[derive(Debug, Clone, Default)]
pub struct CommentUpdate {
    pub author: Option<String>,
    pub content: Option<String>,
}
