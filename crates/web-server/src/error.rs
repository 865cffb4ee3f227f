use analytics::AnalyticsError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use dataset::DatasetError;
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Dataset error: {0}")]
    Dataset(#[from] DatasetError),
    #[error("Analytics error: {0}")]
    Analytics(#[from] AnalyticsError),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Converts our custom `AppError` into an HTTP response.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Dataset(
                err @ (DatasetError::InvalidRange(_) | DatasetError::RangeOutOfBounds { .. }),
            ) => (StatusCode::BAD_REQUEST, err.to_string()),
            AppError::Dataset(DatasetError::Empty) => (
                StatusCode::NOT_FOUND,
                DatasetError::Empty.to_string(),
            ),
            AppError::Dataset(dataset_err) => {
                tracing::error!(error = ?dataset_err, "Dataset error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal dataset error occurred".to_string(),
                )
            }
            AppError::Analytics(analytics_err) => {
                tracing::error!(error = ?analytics_err, "Analytics error.");
                (StatusCode::INTERNAL_SERVER_ERROR, analytics_err.to_string())
            }
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
