use std::sync::Arc;

use tracing::instrument;
use uuid::Uuid;

use crate::data::repository::ContentRepository;
use crate::domain::{error::DomainError, post::Post, validation};

#[derive(Clone)]
pub struct PostService<R: ContentRepository + 'static> {
    repo: Arc<R>,
}

impl<R> PostService<R>
where
    R: ContentRepository + 'static,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn get_post(&self, id: Uuid) -> Result<Post, DomainError> {
        self.repo
            .find_post(id)
            .await?
            .ok_or(DomainError::PostNotFound(id))
    }

    pub async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        self.repo.list_posts().await
    }

    #[instrument(skip(self, content))]
    pub async fn create_post(&self, content: String) -> Result<Post, DomainError> {
        validation::validate_post_content(&content).map_err(DomainError::Validation)?;
        self.repo.create_post(Post::new(content)).await
    }

    #[instrument(skip(self))]
    pub async fn delete_post(&self, id: Uuid) -> Result<(), DomainError> {
        self.repo.delete_post(id).await
    }
}
