use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::data::lock::PostLocks;
use crate::data::repository::ContentRepository;
use crate::domain::comment::{Comment, CommentUpdate};
use crate::domain::error::DomainError;
use crate::domain::post::Post;

#[derive(Default)]
struct Tables {
    posts: HashMap<Uuid, Post>,
    comments: HashMap<Uuid, Comment>,
}

/// In-process storage engine. Both tables live behind a single `RwLock` so a
/// reader sees the comment row and the parent's counter move together;
/// mutations additionally serialize per post through `PostLocks`.
#[derive(Default)]
pub struct MemoryRepository {
    tables: RwLock<Tables>,
    locks: PostLocks,
}

impl MemoryRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl ContentRepository for MemoryRepository {
    async fn create_post(&self, post: Post) -> Result<Post, DomainError> {
        let mut tables = self.tables.write().await;
        tables.posts.insert(post.id, post.clone());
        Ok(post)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.posts.get(&id).cloned())
    }

    async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        let tables = self.tables.read().await;
        let mut posts: Vec<Post> = tables.posts.values().cloned().collect();
        posts.sort_by_key(|p| (p.created_at, p.id));
        Ok(posts)
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), DomainError> {
        self.locks
            .with_post_lock(id, || async move {
                let mut tables = self.tables.write().await;
                if tables.posts.remove(&id).is_none() {
                    return Err(DomainError::PostNotFound(id));
                }
                tables.comments.retain(|_, c| c.post_id != id);
                Ok(())
            })
            .await
    }

    async fn create_comment(&self, comment: Comment) -> Result<Comment, DomainError> {
        let post_id = comment.post_id;
        self.locks
            .with_post_lock(post_id, || async move {
                let mut tables = self.tables.write().await;
                let post = tables
                    .posts
                    .get_mut(&post_id)
                    .ok_or(DomainError::PostNotFound(post_id))?;
                post.comments_count += 1;
                tables.comments.insert(comment.id, comment.clone());
                Ok(comment)
            })
            .await
    }

    async fn find_comment(&self, post_id: Uuid, id: Uuid) -> Result<Option<Comment>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .comments
            .get(&id)
            .filter(|c| c.post_id == post_id)
            .cloned())
    }

    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        let tables = self.tables.read().await;
        let mut comments: Vec<Comment> = tables
            .comments
            .values()
            .filter(|c| c.post_id == post_id)
            .cloned()
            .collect();
        comments.sort_by_key(|c| (c.created_at, c.id));
        Ok(comments)
    }

    async fn update_comment(
        &self,
        post_id: Uuid,
        id: Uuid,
        update: CommentUpdate,
    ) -> Result<Option<Comment>, DomainError> {
        self.locks
            .with_post_lock(post_id, || async move {
                let mut tables = self.tables.write().await;
                let Some(comment) = tables.comments.get_mut(&id) else {
                    return Ok(None);
                };
                if comment.post_id != post_id {
                    return Ok(None);
                }
                if let Some(author) = update.author {
                    comment.author = author;
                }
                if let Some(content) = update.content {
                    comment.content = content;
                }
                comment.updated_at = Utc::now();
                Ok(Some(comment.clone()))
            })
            .await
    }

    async fn delete_comment(&self, post_id: Uuid, id: Uuid) -> Result<(), DomainError> {
        self.locks
            .with_post_lock(post_id, || async move {
                let mut tables = self.tables.write().await;
                match tables.comments.get(&id) {
                    Some(comment) if comment.post_id == post_id => {}
                    _ => return Err(DomainError::CommentNotFound(id)),
                }
                tables.comments.remove(&id);
                let post = tables.posts.get_mut(&post_id).ok_or_else(|| {
                    DomainError::Internal(format!("post {post_id} missing for owned comment {id}"))
                })?;
                post.comments_count -= 1;
                Ok(())
            })
            .await
    }
}
