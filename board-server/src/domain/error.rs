use thiserror::Error;

/// Ошибки доменного слоя. Хранилища обязаны классифицировать свои сбои
/// в один из этих вариантов: `InvalidId`, `Validation`, `DuplicateKey`
/// или `Unexpected`.
#[derive(Debug, Error)]
pub(crate) enum DomainError {
    #[error("validation failed for '{field}': {message}")]
    Validation {
        field: &'static str,
        message: &'static str,
    },

    #[error("invalid id: {0}")]
    InvalidId(String),

    #[error("resource not found: {0}")]
    NotFound(String),

    #[error("duplicate key: {0}")]
    DuplicateKey(String),

    #[error("forbidden")]
    Forbidden,

    #[error("invalid credentials")]
    InvalidCredentials,

    #[error("unexpected domain error: {0}")]
    Unexpected(String),
}

impl DomainError {
    pub(crate) fn not_found(kind: &str, id: impl std::fmt::Display) -> Self {
        DomainError::NotFound(format!("{kind} id: {id}"))
    }
}
