use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct Post {
    pub id: Uuid,
    pub content: String,
    /// Number of live comments owned by this post. Maintained by the store
    /// inside the same atomic unit as the comment row mutation; never set
    /// directly by a caller.
    pub comments_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Post {
    pub fn new(content: String) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            content,
            comments_count: 0,
            created_at: now,
            updated_at: now,
        }
    }
}
