//! Error conversion glue between layers.
//!
//! The domain layer must not depend on repository or service error types, so
//! the `From` impls live here.

use crate::domain::types::TypeConstraintError;
use crate::repository::errors::RepositoryError;

impl From<TypeConstraintError> for RepositoryError {
    fn from(val: TypeConstraintError) -> Self {
        RepositoryError::ValidationError(val.to_string())
    }
}

#[cfg(feature = "server")]
mod server {
    use crate::domain::types::TypeConstraintError;
    use crate::forms::FormError;
    use crate::repository::errors::RepositoryError;
    use crate::services::errors::ServiceError;

    impl From<TypeConstraintError> for ServiceError {
        fn from(val: TypeConstraintError) -> Self {
            ServiceError::TypeConstraint(val.to_string())
        }
    }

    impl From<FormError> for ServiceError {
        fn from(val: FormError) -> Self {
            ServiceError::Form(val.to_string())
        }
    }

    impl From<RepositoryError> for ServiceError {
        fn from(val: RepositoryError) -> Self {
            match val {
                RepositoryError::NotFound => ServiceError::NotFound,
                RepositoryError::Duplicate(msg) => {
                    ServiceError::Conflict(format!("already exists: {msg}"))
                }
                RepositoryError::Referenced(msg) => {
                    ServiceError::Conflict(format!("still referenced: {msg}"))
                }
                RepositoryError::ValidationError(msg) => ServiceError::TypeConstraint(msg),
                other => ServiceError::Internal(other.to_string()),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_constraint_becomes_validation_error() {
        let err: RepositoryError = TypeConstraintError::InvalidEmail.into();
        assert!(matches!(err, RepositoryError::ValidationError(msg) if msg == "invalid email address"));
    }
}
