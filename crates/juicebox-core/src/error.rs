//! Domain-level error types.

use thiserror::Error;
use uuid::Uuid;

/// Domain errors - business rule failures raised before touching the store.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Post {post_id} is not owned by user {user_id}")]
    NotOwner { post_id: Uuid, user_id: Uuid },
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Could not find a post with id {0}")]
    PostNotFound(Uuid),

    #[error("Constraint violation: {0}")]
    Constraint(String),
}
