//! Error handling - RFC 7807 responses carrying a machine-readable `name`.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use uuid::Uuid;

use juicebox_core::error::{DomainError, RepoError};
use juicebox_core::ports::AuthError;
use juicebox_shared::ErrorResponse;

/// Application-level error type that converts to problem-details responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("{0}")]
    NotFound(String),

    #[error("Could not find a post with that postId")]
    PostNotFound(Uuid),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    Validation(String),

    #[error("Authorization token must start with Bearer ")]
    AuthorizationHeader,

    #[error("{0}")]
    InvalidToken(String),

    #[error("Your authentication token has expired. Please login again.")]
    TokenExpired,

    #[error("Username or password is incorrect")]
    InvalidCredentials,

    #[error("You must be logged in to perform this action")]
    MissingUser,

    #[error("{0}")]
    Forbidden(String),

    #[error("A user by that username already exists")]
    UserExists,

    #[error("{0}")]
    Conflict(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Error kind reported in the `name` field.
    pub fn name(&self) -> &'static str {
        match self {
            AppError::NotFound(_) => "NotFoundError",
            AppError::PostNotFound(_) => "PostNotFoundError",
            AppError::BadRequest(_) => "BadRequestError",
            AppError::Validation(_) => "ValidationError",
            AppError::AuthorizationHeader => "AuthorizationHeaderError",
            AppError::InvalidToken(_) => "AuthenticationError",
            AppError::TokenExpired => "TokenExpiredError",
            AppError::InvalidCredentials => "IncorrectCredentialsError",
            AppError::MissingUser => "MissingUserError",
            AppError::Forbidden(_) => "UnauthorizedUserError",
            AppError::UserExists => "UserExistsError",
            AppError::Conflict(_) => "ConflictError",
            AppError::Internal(_) => "InternalError",
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) | AppError::PostNotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::AuthorizationHeader => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::InvalidToken(_)
            | AppError::TokenExpired
            | AppError::InvalidCredentials
            | AppError::MissingUser => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::UserExists | AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let detail = self.to_string();
        let error = match self {
            AppError::NotFound(_) | AppError::PostNotFound(_) => ErrorResponse::not_found(detail),
            AppError::BadRequest(_) | AppError::AuthorizationHeader => {
                ErrorResponse::bad_request(detail)
            }
            AppError::Validation(_) => {
                ErrorResponse::new(422, "Validation Failed").with_detail(detail)
            }
            AppError::InvalidToken(_)
            | AppError::TokenExpired
            | AppError::InvalidCredentials
            | AppError::MissingUser => ErrorResponse::unauthorized(detail),
            AppError::Forbidden(_) => ErrorResponse::forbidden(detail),
            AppError::UserExists | AppError::Conflict(_) => ErrorResponse::conflict(detail),
            AppError::Internal(_) => {
                // Log internal errors
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
        };

        HttpResponse::build(self.status_code()).json(error.with_name(self.name()))
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::Validation(msg) => AppError::Validation(msg),
            DomainError::NotOwner { .. } => {
                AppError::Forbidden("You cannot modify a post that is not yours".to_string())
            }
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::PostNotFound(id) => AppError::PostNotFound(id),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::InvalidCredentials => AppError::InvalidCredentials,
            AuthError::TokenExpired => AppError::TokenExpired,
            AuthError::InvalidToken(msg) => AppError::InvalidToken(msg),
            AuthError::HashingError(msg) => AppError::Internal(msg),
        }
    }
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;
