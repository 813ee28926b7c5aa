use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::comment::{Comment, CommentUpdate};
use crate::domain::error::DomainError;
use crate::domain::post::Post;

/// Storage seam for the post/comment aggregate.
///
/// Mutations against a post's comment set run under that post's exclusive
/// scope: the comment row change and the parent's `comments_count`
/// adjustment commit or roll back as one unit, and two mutations naming the
/// same post never interleave. Reads take no lock and observe either the
/// fully-pre or fully-post mutation state.
#[async_trait]
pub trait ContentRepository: Send + Sync {
    async fn create_post(&self, post: Post) -> Result<Post, DomainError>;
    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, DomainError>;
    async fn list_posts(&self) -> Result<Vec<Post>, DomainError>;
    /// Deletes the post and every comment it owns, all-or-nothing.
    async fn delete_post(&self, id: Uuid) -> Result<(), DomainError>;

    /// Inserts the comment and increments the parent's counter by exactly 1.
    /// Fails with `PostNotFound` when `comment.post_id` is dangling.
    async fn create_comment(&self, comment: Comment) -> Result<Comment, DomainError>;
    /// Scoped lookup: a comment id reached through the wrong post is absent.
    async fn find_comment(&self, post_id: Uuid, id: Uuid) -> Result<Option<Comment>, DomainError>;
    /// Comments owned by `post_id` in creation order; empty when the post
    /// does not exist.
    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError>;
    /// Applies the change set; the counter is untouched. `Ok(None)` when the
    /// id is missing or owned by a different post.
    async fn update_comment(
        &self,
        post_id: Uuid,
        id: Uuid,
        update: CommentUpdate,
    ) -> Result<Option<Comment>, DomainError>;
    /// Removes the comment and decrements the parent's counter by exactly 1.
    async fn delete_comment(&self, post_id: Uuid, id: Uuid) -> Result<(), DomainError>;
}
