use std::sync::Arc;

use axum::{
    extract::{Path, State},
    routing::{delete, get},
    Json, Router,
};

use crate::{
    error::Operation,
    schema::{Comment, Envelope},
};

pub mod config;
pub mod error;
pub mod schema;
pub mod store;

pub use crate::{
    config::Settings,
    error::AppError,
    store::{CommentStore, SqliteStore, StoreError},
};

pub struct AppState {
    store: Arc<dyn CommentStore>,
}

impl AppState {
    pub fn new(store: Arc<dyn CommentStore>) -> Self {
        Self { store }
    }
}

async fn get_comments(
    State(state): State<Arc<AppState>>,
    Path(post_id): Path<String>,
) -> Result<Json<Vec<Comment>>, AppError> {
    tracing::debug!(%post_id, "fetching comments for post");

    let comments = state
        .store
        .find_by_post(&post_id)
        .await
        .map_err(|e| AppError::OperationFailed(Operation::FetchComments, e))?;

    tracing::debug!(%post_id, count = comments.len(), "fetched comments");
    Ok(Json(comments))
}

async fn delete_comment(
    State(state): State<Arc<AppState>>,
    Path(comment_id): Path<String>,
) -> Result<Json<Envelope>, AppError> {
    let deleted = state
        .store
        .find_and_delete(&comment_id)
        .await
        .map_err(|e| AppError::OperationFailed(Operation::DeleteComment, e))?;

    let Some(comment) = deleted else {
        tracing::info!(%comment_id, "comment to delete does not exist");
        return Err(AppError::CommentNotFound);
    };

    tracing::debug!(comment_id = %comment.id, post_id = %comment.post_id, "deleted comment");
    Ok(Json(Envelope::message("Comment deleted successfully")))
}

/// Comment routes, relative to wherever the host mounts them.
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/post/{post_id}", get(get_comments))
        .route("/{comment_id}", delete(delete_comment))
        .with_state(state)
}

/// Mounts [`router`] under `base_path`; an empty path or `/` mounts it at the root.
pub fn mount(base_path: &str, state: Arc<AppState>) -> Router {
    let base_path = base_path.trim_end_matches('/');
    if base_path.is_empty() {
        router(state)
    } else {
        Router::new().nest(base_path, router(state))
    }
}
