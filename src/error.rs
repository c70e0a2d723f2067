use axum::{Json, http::StatusCode, response::IntoResponse};
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;
use validator::ValidationErrors;

use crate::{
    balancer::{DrawError, PoolError},
    dao::storage::StorageError,
};

/// Errors that can occur in service layer operations.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// Storage backend is unavailable.
    #[error("storage unavailable")]
    Unavailable(#[source] StorageError),
    /// Invalid input provided by the client.
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// The balancer refused the pool or the configuration.
    #[error(transparent)]
    Draw(#[from] DrawError),
    /// Another draw for the same match has not finished yet.
    #[error("a draw for match {0} is already in progress")]
    DrawInProgress(Uuid),
    /// Requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Operation exceeded its timeout limit.
    #[error("operation timed out")]
    Timeout,
}

impl From<StorageError> for ServiceError {
    fn from(err: StorageError) -> Self {
        ServiceError::Unavailable(err)
    }
}

impl From<PoolError> for ServiceError {
    fn from(err: PoolError) -> Self {
        ServiceError::InvalidInput(err.to_string())
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::BadRequest(format!("validation failed: {}", err))
    }
}

/// Application-level errors that are converted to HTTP responses.
#[derive(Debug, Error)]
pub enum AppError {
    /// Bad request with invalid input.
    #[error("bad request: {0}")]
    BadRequest(String),
    /// Requested resource not found.
    #[error("not found: {0}")]
    NotFound(String),
    /// Conflict with current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Well-formed request the pool cannot satisfy.
    #[error("unprocessable: {0}")]
    Unprocessable(String),
    /// Service unavailable or degraded.
    #[error("service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Unavailable(source) => AppError::ServiceUnavailable(source.to_string()),
            ServiceError::InvalidInput(message) => AppError::BadRequest(message),
            ServiceError::Draw(draw @ DrawError::GoalkeeperShortage { .. }) => {
                AppError::Unprocessable(draw.to_string())
            }
            ServiceError::Draw(draw) => AppError::BadRequest(draw.to_string()),
            err @ ServiceError::DrawInProgress(_) => AppError::Conflict(err.to_string()),
            ServiceError::NotFound(message) => AppError::NotFound(message),
            ServiceError::Timeout => AppError::ServiceUnavailable("operation timed out".into()),
        }
    }
}

#[derive(Serialize)]
struct ErrorBody {
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> axum::response::Response {
        let status = match &self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Unprocessable(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
        };

        let payload = Json(ErrorBody {
            message: self.to_string(),
        });

        (status, payload).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn status_of(err: ServiceError) -> StatusCode {
        AppError::from(err).into_response().status()
    }

    #[test]
    fn draw_failures_map_to_client_errors() {
        assert_eq!(
            status_of(DrawError::InsufficientPlayers {
                available: 1,
                required: 2
            }
            .into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DrawError::invalid_config("teams").into()),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            status_of(DrawError::GoalkeeperShortage {
                available: 0,
                required: 2
            }
            .into()),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }

    #[test]
    fn concurrency_and_storage_failures() {
        assert_eq!(
            status_of(ServiceError::DrawInProgress(Uuid::nil())),
            StatusCode::CONFLICT
        );
        assert_eq!(status_of(ServiceError::Timeout), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(
            status_of(ServiceError::from(PoolError::EmptyId)),
            StatusCode::BAD_REQUEST
        );
    }
}
