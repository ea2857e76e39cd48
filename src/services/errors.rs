use thiserror::Error;

/// Errors returned by the service layer to route handlers.
#[derive(Debug, Error)]
pub enum ServiceError {
    #[error("unauthorized")]
    Unauthorized,

    #[error("not found")]
    NotFound,

    /// User input failed validation. The message is safe to show.
    #[error("{0}")]
    Form(String),

    #[error("type constraint violation: {0}")]
    TypeConstraint(String),

    /// The write clashes with existing data (duplicate, still referenced).
    #[error("conflict: {0}")]
    Conflict(String),

    #[error("internal error: {0}")]
    Internal(String),
}

pub type ServiceResult<T> = Result<T, ServiceError>;
