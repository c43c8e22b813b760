use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use intake_pipeline::IntakeError;
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Intake error: {0}")]
    Intake(#[from] IntakeError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl ApiError {
    pub fn is_retryable(&self) -> bool {
        match self {
            ApiError::BadRequest(_) => false,
            ApiError::Intake(e) => e.is_retryable(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let retryable = self.is_retryable();
        let (status, message) = match self {
            ApiError::BadRequest(_) => (StatusCode::BAD_REQUEST, self.to_string()),
            ApiError::Intake(IntakeError::Validation(ref msg)) => {
                (StatusCode::BAD_REQUEST, format!("Invalid request: {msg}"))
            }
            ApiError::Intake(ref e @ IntakeError::PersistenceWriteFailed { .. }) => {
                tracing::error!("Persistence error: {}", e);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Thread state could not be saved; retry the request".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "retryable": retryable,
        }));

        (status, body).into_response()
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use intake_persist::PersistError;
    use std::time::Duration;

    #[test]
    fn test_validation_maps_to_bad_request() {
        let response = ApiError::from(IntakeError::Validation("empty".into())).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_write_failure_maps_to_unavailable() {
        let error = ApiError::from(IntakeError::PersistenceWriteFailed {
            thread_id: "thread-1".into(),
            source: PersistError::Timeout(Duration::from_secs(5)),
        });
        assert!(error.is_retryable());
        assert_eq!(error.into_response().status(), StatusCode::SERVICE_UNAVAILABLE);
    }
}
