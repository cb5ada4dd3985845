use axum::{response::IntoResponse, Json};
use http::StatusCode;

use crate::{schema::Envelope, store::StoreError};

/// The store operation a request was performing when it failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    FetchComments,
    DeleteComment,
}

impl Operation {
    fn failure_message(self) -> &'static str {
        match self {
            Operation::FetchComments => "Failed to fetch comments",
            Operation::DeleteComment => "Failed to delete comment",
        }
    }
}

#[derive(Debug)]
pub enum AppError {
    // No comment with the requested id
    CommentNotFound,
    // Any store failure; the cause is logged, never returned to the client
    OperationFailed(Operation, StoreError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let (status_code, body) = match self {
            AppError::CommentNotFound => {
                (StatusCode::NOT_FOUND, Envelope::error("Comment not found"))
            }
            AppError::OperationFailed(operation, error) => {
                tracing::error!(?operation, %error, "comment store operation failed");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    Envelope::error(operation.failure_message()),
                )
            }
        };

        (status_code, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use serde_json::{json, Value};

    async fn render(error: AppError) -> (StatusCode, Value) {
        let response = error.into_response();
        let status = response.status();
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn not_found_maps_to_404() {
        let (status, body) = render(AppError::CommentNotFound).await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body, json!({ "error": "Comment not found" }));
    }

    #[tokio::test]
    async fn failures_hide_the_underlying_cause() {
        let cause = StoreError::Database(sqlx::Error::PoolClosed);

        let (status, body) =
            render(AppError::OperationFailed(Operation::FetchComments, cause)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to fetch comments" }));

        let cause = StoreError::InvalidTimestamp {
            column: "created_at",
            value: i64::MAX,
        };
        let (status, body) =
            render(AppError::OperationFailed(Operation::DeleteComment, cause)).await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body, json!({ "error": "Failed to delete comment" }));
    }
}
