use crate::domain::error::DomainError;

const UNIQUE_VIOLATION: &str = "23505";
const INVALID_TEXT_REPRESENTATION: &str = "22P02";
const NOT_NULL_VIOLATION: &str = "23502";
const CHECK_VIOLATION: &str = "23514";
const STRING_DATA_RIGHT_TRUNCATION: &str = "22001";

/// Классифицирует ошибку PostgreSQL для нормализатора ошибок.
pub(crate) fn map_db_error(err: sqlx::Error) -> DomainError {
    if let sqlx::Error::Database(db_err) = &err {
        match db_err.code().as_deref() {
            Some(UNIQUE_VIOLATION) => {
                let key = db_err.constraint().unwrap_or("record").to_string();
                return DomainError::DuplicateKey(key);
            }
            Some(INVALID_TEXT_REPRESENTATION) => {
                return DomainError::InvalidId(db_err.message().to_string());
            }
            Some(NOT_NULL_VIOLATION | CHECK_VIOLATION | STRING_DATA_RIGHT_TRUNCATION) => {
                return DomainError::Validation {
                    field: "record",
                    message: "violates schema constraints",
                };
            }
            _ => {}
        }
    }
    DomainError::Unexpected(err.to_string())
}
