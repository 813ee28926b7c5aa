use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::repository::ContentRepository;
use crate::domain::comment::{Comment, CommentUpdate};
use crate::domain::{error::DomainError, validation};

#[derive(Clone)]
pub struct CommentService<R: ContentRepository + 'static> {
    repo: Arc<R>,
}

impl<R> CommentService<R>
where
    R: ContentRepository + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn get_comment(&self, post_id: Uuid, id: Uuid) -> Result<Comment, DomainError> {
        self.repo
            .find_comment(post_id, id)
            .await?
            .ok_or(DomainError::CommentNotFound(id))
    }

    pub async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        self.require_post(post_id).await?;
        self.repo.list_comments(post_id).await
    }

    /// An unknown post wins over invalid fields, so the parent is resolved
    /// before the payload is validated.
    #[instrument(skip(self, author, content))]
    pub async fn create_comment(
        &self,
        post_id: Uuid,
        author: String,
        content: String,
    ) -> Result<Comment, DomainError> {
        self.require_post(post_id).await?;
        validation::validate_new_comment(&author, &content).map_err(DomainError::Validation)?;
        self.repo
            .create_comment(Comment::new(post_id, author, content))
            .await
    }

    /// Like creation, a missing target wins over invalid fields.
    #[instrument(skip(self, update))]
    pub async fn update_comment(
        &self,
        post_id: Uuid,
        id: Uuid,
        update: CommentUpdate,
    ) -> Result<Comment, DomainError> {
        self.get_comment(post_id, id).await?;
        validation::validate_comment_update(update.author.as_deref(), update.content.as_deref())
            .map_err(DomainError::Validation)?;
        self.repo
            .update_comment(post_id, id, update)
            .await?
            .ok_or(DomainError::CommentNotFound(id))
    }

    #[instrument(skip(self))]
    pub async fn delete_comment(&self, post_id: Uuid, id: Uuid) -> Result<(), DomainError> {
        self.repo.delete_comment(post_id, id).await
    }

    async fn require_post(&self, post_id: Uuid) -> Result<(), DomainError> {
        self.repo
            .find_post(post_id)
            .await?
            .map(|_| ())
            .ok_or(DomainError::PostNotFound(post_id))
    }
}
