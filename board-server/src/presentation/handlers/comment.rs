use actix_web::{HttpRequest, HttpResponse, delete, get, patch, post, web};
use tracing::info;
use uuid::Uuid;

use super::request_id;
use crate::application::comment_service::CommentService;
use crate::data::postgres::PostgresRepository;
use crate::domain::error::DomainError;
use crate::presentation::dto::{CommentEnvelope, CreateCommentRequest, UpdateCommentRequest};

#[get("/posts/{post_id}/comments")]
async fn list_comments(
    comments: web::Data<CommentService<PostgresRepository>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let comments = comments.list_comments(post_id).await?;
    Ok(HttpResponse::Ok().json(comments))
}

#[get("/posts/{post_id}/comments/{id}")]
async fn get_comment(
    comments: web::Data<CommentService<PostgresRepository>>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, DomainError> {
    let (post_id, id) = path.into_inner();
    let comment = comments.get_comment(post_id, id).await?;
    Ok(HttpResponse::Ok().json(comment))
}

#[post("/posts/{post_id}/comments")]
async fn create_comment(
    req: HttpRequest,
    comments: web::Data<CommentService<PostgresRepository>>,
    path: web::Path<Uuid>,
    payload: web::Json<CreateCommentRequest>,
) -> Result<HttpResponse, DomainError> {
    let post_id = path.into_inner();
    let payload = payload.into_inner();

    match comments
        .create_comment(post_id, payload.author, payload.content)
        .await
    {
        Ok(comment) => {
            info!(
                request_id = %request_id(&req),
                comment_id = %comment.id,
                post_id = %post_id,
                "comment created"
            );
            Ok(HttpResponse::Ok().json(comment))
        }
        Err(DomainError::Validation(errors)) => {
            Ok(HttpResponse::UnprocessableEntity().json(CommentEnvelope {
                comment: None,
                success: false,
                message: format!("Comment could not be saved: {}", errors),
            }))
        }
        Err(e) => Err(e),
    }
}

#[patch("/posts/{post_id}/comments/{id}")]
async fn update_comment(
    req: HttpRequest,
    comments: web::Data<CommentService<PostgresRepository>>,
    path: web::Path<(Uuid, Uuid)>,
    payload: web::Json<UpdateCommentRequest>,
) -> Result<HttpResponse, DomainError> {
    let (post_id, id) = path.into_inner();

    match comments
        .update_comment(post_id, id, payload.into_inner().into())
        .await
    {
        Ok(comment) => {
            info!(
                request_id = %request_id(&req),
                comment_id = %id,
                post_id = %post_id,
                "comment updated"
            );
            Ok(HttpResponse::Ok().json(comment))
        }
        Err(DomainError::Validation(errors)) => {
            Ok(HttpResponse::UnprocessableEntity().json(CommentEnvelope {
                comment: None,
                success: false,
                message: format!("Comment could not be saved: {}", errors),
            }))
        }
        Err(e) => Err(e),
    }
}

#[delete("/posts/{post_id}/comments/{id}")]
async fn delete_comment(
    req: HttpRequest,
    comments: web::Data<CommentService<PostgresRepository>>,
    path: web::Path<(Uuid, Uuid)>,
) -> Result<HttpResponse, DomainError> {
    let (post_id, id) = path.into_inner();
    comments.delete_comment(post_id, id).await?;

    info!(
        request_id = %request_id(&req),
        comment_id = %id,
        post_id = %post_id,
        "comment deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}
