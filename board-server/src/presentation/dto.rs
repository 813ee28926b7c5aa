use serde::{Deserialize, Serialize};

use crate::domain::comment::{Comment, CommentUpdate};
use crate::domain::post::Post;

// ======================= POSTS =======================

#[derive(Debug, Deserialize)]
pub struct CreatePostRequest {
    pub content: String,
}

/// Creation/validation envelope: `post` carries the record on success and is
/// null when validation rejected the payload.
#[derive(Debug, Serialize)]
pub struct PostEnvelope {
    pub post: Option<Post>,
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct PostDetail {
    #[serde(flatten)]
    pub post: Post,
    pub comments: Vec<Comment>,
}

// ======================= COMMENTS =======================

#[derive(Debug, Deserialize)]
pub struct CreateCommentRequest {
    pub author: String,
    pub content: String,
}

#[derive(Debug, Deserialize)]
pub struct UpdateCommentRequest {
    pub author: Option<String>,
    pub content: Option<String>,
}

impl From<UpdateCommentRequest> for CommentUpdate {
    fn from(req: UpdateCommentRequest) -> Self {
        CommentUpdate {
            author: req.author,
            content: req.content,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CommentEnvelope {
    pub comment: Option<Comment>,
    pub success: bool,
    pub message: String,
}
