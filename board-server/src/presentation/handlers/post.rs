use actix_web::{HttpRequest, HttpResponse, delete, get, post, web};
use tracing::info;
use uuid::Uuid;

use super::request_id;
use crate::application::comment_service::CommentService;
use crate::application::post_service::PostService;
use crate::data::postgres::PostgresRepository;
use crate::domain::error::DomainError;
use crate::presentation::dto::{CreatePostRequest, PostDetail, PostEnvelope};

#[get("/posts")]
async fn list_posts(
    posts: web::Data<PostService<PostgresRepository>>,
) -> Result<HttpResponse, DomainError> {
    let posts = posts.list_posts().await?;
    Ok(HttpResponse::Ok().json(posts))
}

#[get("/posts/{id}")]
async fn get_post(
    posts: web::Data<PostService<PostgresRepository>>,
    comments: web::Data<CommentService<PostgresRepository>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let id = path.into_inner();
    let post = posts.get_post(id).await?;
    let comments = comments.list_comments(id).await?;
    Ok(HttpResponse::Ok().json(PostDetail { post, comments }))
}

#[post("/posts")]
async fn create_post(
    req: HttpRequest,
    posts: web::Data<PostService<PostgresRepository>>,
    payload: web::Json<CreatePostRequest>,
) -> Result<HttpResponse, DomainError> {
    match posts.create_post(payload.into_inner().content).await {
        Ok(post) => {
            info!(
                request_id = %request_id(&req),
                post_id = %post.id,
                "post created"
            );
            Ok(HttpResponse::Created().json(PostEnvelope {
                post: Some(post),
                success: true,
                message: "Post was successfully created.".into(),
            }))
        }
        Err(DomainError::Validation(errors)) => {
            Ok(HttpResponse::UnprocessableEntity().json(PostEnvelope {
                post: None,
                success: false,
                message: format!("Post could not be saved: {}", errors),
            }))
        }
        Err(e) => Err(e),
    }
}

#[delete("/posts/{id}")]
async fn delete_post(
    req: HttpRequest,
    posts: web::Data<PostService<PostgresRepository>>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, DomainError> {
    let id = path.into_inner();
    posts.delete_post(id).await?;

    info!(
        request_id = %request_id(&req),
        post_id = %id,
        "post deleted"
    );

    Ok(HttpResponse::NoContent().finish())
}
