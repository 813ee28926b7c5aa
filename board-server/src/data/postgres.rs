use async_trait::async_trait;
use chrono::Utc;
use sqlx::PgPool;
use tracing::{error, info};
use uuid::Uuid;

use crate::data::repository::ContentRepository;
use crate::domain::comment::{Comment, CommentUpdate};
use crate::domain::error::DomainError;
use crate::domain::post::Post;

/// Postgres-backed engine. The per-post lock scope is a `SELECT ... FOR
/// UPDATE` on the parent row; the comment row change and the counter
/// adjustment commit in the same transaction.
#[derive(Clone)]
pub struct PostgresRepository {
    pool: PgPool,
}

impl PostgresRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn db_error(context: &str, e: sqlx::Error) -> DomainError {
    error!("{}: {}", context, e);
    DomainError::Internal(format!("database error: {}", e))
}

#[async_trait]
impl ContentRepository for PostgresRepository {
    async fn create_post(&self, post: Post) -> Result<Post, DomainError> {
        sqlx::query(
            r#"
            INSERT INTO posts (id, content, comments_count, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(post.id)
        .bind(&post.content)
        .bind(post.comments_count)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| db_error("failed to create post", e))?;

        info!(post_id = %post.id, "post created");
        Ok(post)
    }

    async fn find_post(&self, id: Uuid) -> Result<Option<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, content, comments_count, created_at, updated_at
            FROM posts WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("failed to load post", e))
    }

    async fn list_posts(&self) -> Result<Vec<Post>, DomainError> {
        sqlx::query_as::<_, Post>(
            r#"
            SELECT id, content, comments_count, created_at, updated_at
            FROM posts
            ORDER BY created_at, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("failed to list posts", e))
    }

    async fn delete_post(&self, id: Uuid) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("failed to open transaction", e))?;

        let locked = sqlx::query_scalar::<_, Uuid>("SELECT id FROM posts WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| db_error("failed to lock post", e))?;
        if locked.is_none() {
            return Err(DomainError::PostNotFound(id));
        }

        sqlx::query("DELETE FROM comments WHERE post_id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("failed to delete comments of post", e))?;
        sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("failed to delete post", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("failed to commit post deletion", e))?;

        info!(post_id = %id, "post deleted with its comments");
        Ok(())
    }

    async fn create_comment(&self, comment: Comment) -> Result<Comment, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("failed to open transaction", e))?;

        let locked = sqlx::query_scalar::<_, Uuid>("SELECT id FROM posts WHERE id = $1 FOR UPDATE")
            .bind(comment.post_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| db_error("failed to lock post", e))?;
        if locked.is_none() {
            return Err(DomainError::PostNotFound(comment.post_id));
        }

        sqlx::query(
            r#"
            INSERT INTO comments (id, post_id, author, content, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(comment.id)
        .bind(comment.post_id)
        .bind(&comment.author)
        .bind(&comment.content)
        .bind(comment.created_at)
        .bind(comment.updated_at)
        .execute(&mut *tx)
        .await
        .map_err(|e| db_error("failed to create comment", e))?;

        sqlx::query("UPDATE posts SET comments_count = comments_count + 1 WHERE id = $1")
            .bind(comment.post_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("failed to increment comment counter", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("failed to commit comment creation", e))?;

        info!(comment_id = %comment.id, post_id = %comment.post_id, "comment created");
        Ok(comment)
    }

    async fn find_comment(&self, post_id: Uuid, id: Uuid) -> Result<Option<Comment>, DomainError> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, author, content, created_at, updated_at
            FROM comments WHERE id = $1 AND post_id = $2
            "#,
        )
        .bind(id)
        .bind(post_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| db_error("failed to load comment", e))
    }

    async fn list_comments(&self, post_id: Uuid) -> Result<Vec<Comment>, DomainError> {
        sqlx::query_as::<_, Comment>(
            r#"
            SELECT id, post_id, author, content, created_at, updated_at
            FROM comments
            WHERE post_id = $1
            ORDER BY created_at, id
            "#,
        )
        .bind(post_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| db_error("failed to list comments", e))
    }

    async fn update_comment(
        &self,
        post_id: Uuid,
        id: Uuid,
        update: CommentUpdate,
    ) -> Result<Option<Comment>, DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("failed to open transaction", e))?;

        sqlx::query_scalar::<_, Uuid>("SELECT id FROM posts WHERE id = $1 FOR UPDATE")
            .bind(post_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| db_error("failed to lock post", e))?;

        let comment = sqlx::query_as::<_, Comment>(
            r#"
            UPDATE comments
            SET
                author = COALESCE($1, author),
                content = COALESCE($2, content),
                updated_at = $3
            WHERE id = $4 AND post_id = $5
            RETURNING id, post_id, author, content, created_at, updated_at
            "#,
        )
        .bind(update.author)
        .bind(update.content)
        .bind(Utc::now())
        .bind(id)
        .bind(post_id)
        .fetch_optional(&mut *tx)
        .await
        .map_err(|e| db_error("failed to update comment", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("failed to commit comment update", e))?;

        if comment.is_some() {
            info!(comment_id = %id, post_id = %post_id, "comment updated");
        }
        Ok(comment)
    }

    async fn delete_comment(&self, post_id: Uuid, id: Uuid) -> Result<(), DomainError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| db_error("failed to open transaction", e))?;

        let locked = sqlx::query_scalar::<_, Uuid>("SELECT id FROM posts WHERE id = $1 FOR UPDATE")
            .bind(post_id)
            .fetch_optional(&mut *tx)
            .await
            .map_err(|e| db_error("failed to lock post", e))?;
        if locked.is_none() {
            return Err(DomainError::CommentNotFound(id));
        }

        let deleted = sqlx::query("DELETE FROM comments WHERE id = $1 AND post_id = $2")
            .bind(id)
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("failed to delete comment", e))?;
        if deleted.rows_affected() == 0 {
            return Err(DomainError::CommentNotFound(id));
        }

        sqlx::query("UPDATE posts SET comments_count = comments_count - 1 WHERE id = $1")
            .bind(post_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| db_error("failed to decrement comment counter", e))?;

        tx.commit()
            .await
            .map_err(|e| db_error("failed to commit comment deletion", e))?;

        info!(comment_id = %id, post_id = %post_id, "comment deleted");
        Ok(())
    }
}
