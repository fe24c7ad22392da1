//! Error handling middleware - `{success: false, ...}` responses.

use actix_web::{HttpResponse, ResponseError, http::StatusCode, http::header};
use folio_shared::ErrorResponse;

use folio_core::error::{RepoError, ValidationErrors};
use folio_core::ports::{AuthError, RateLimitError};
use folio_infra::MediaError;

/// Application-level error type that converts to JSON envelopes.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),
    #[error("Bad request: {0}")]
    BadRequest(String),
    #[error("Unauthorized")]
    Unauthorized,
    #[error("Conflict: {0}")]
    Conflict(String),
    #[error("Validation errors: {0:?}")]
    Validation(Vec<String>),
    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),
    #[error("Too many requests, retry after {retry_after_secs}s")]
    TooManyRequests { retry_after_secs: u64 },
    #[error("Internal error: {0}")]
    Internal(String),
    /// Already logged by the store, with the file path.
    #[error("Storage error: {0}")]
    Storage(String),
}

impl AppError {
    pub fn post_not_found() -> Self {
        AppError::NotFound("Post not found".to_string())
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::TooManyRequests { .. } => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) | AppError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) | AppError::PayloadTooLarge(detail) => {
                ErrorResponse::bad_request(detail)
            }
            AppError::Unauthorized => ErrorResponse::unauthorized(),
            AppError::Conflict(detail) => ErrorResponse::new(detail),
            AppError::Validation(errors) => ErrorResponse::validation(errors.clone()),
            AppError::TooManyRequests { retry_after_secs } => ErrorResponse::new(format!(
                "Too many attempts. Try again in {retry_after_secs} seconds."
            )),
            AppError::Internal(detail) => {
                // Log internal errors
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
            AppError::Storage(_) => ErrorResponse::internal_error(),
        };

        let mut response = HttpResponse::build(self.status_code());
        if let AppError::TooManyRequests { retry_after_secs } = self {
            response.insert_header((header::RETRY_AFTER, retry_after_secs.to_string()));
        }
        response.json(error)
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::post_not_found(),
            RepoError::SlugTaken(slug) => {
                AppError::Conflict(format!("A post with slug '{slug}' already exists"))
            }
            RepoError::Invalid(errors) => AppError::Validation(errors.into_messages()),
            RepoError::Io(msg) | RepoError::Serialization(msg) => AppError::Storage(msg),
        }
    }
}

impl From<ValidationErrors> for AppError {
    fn from(err: ValidationErrors) -> Self {
        AppError::Validation(err.into_messages())
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::HashingError(msg) => AppError::Internal(msg),
            _ => AppError::Unauthorized,
        }
    }
}

impl From<RateLimitError> for AppError {
    fn from(err: RateLimitError) -> Self {
        AppError::Internal(err.to_string())
    }
}

impl From<MediaError> for AppError {
    fn from(err: MediaError) -> Self {
        match err {
            MediaError::TooLarge { .. } => AppError::PayloadTooLarge(err.to_string()),
            MediaError::UnsupportedType(_) | MediaError::Empty => {
                AppError::BadRequest(err.to_string())
            }
        }
    }
}

impl From<actix_multipart::MultipartError> for AppError {
    fn from(err: actix_multipart::MultipartError) -> Self {
        AppError::BadRequest(format!("Invalid multipart upload: {err}"))
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
