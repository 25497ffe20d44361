use thiserror::Error;

#[derive(Debug, Error)]
/// Ошибки клиентской библиотеки `board-client`.
///
/// Текст в вариантах со строкой берётся из поля `error` тела ответа сервера.
pub enum BoardClientError {
    /// Ошибка HTTP-транспорта (`reqwest`).
    #[error("http error: {0}")]
    Http(#[from] reqwest::Error),

    /// 401: токен отсутствует, некорректен или неверные учётные данные.
    #[error("unauthorized: {0}")]
    Unauthorized(String),

    /// 403: ресурс принадлежит другому пользователю.
    #[error("forbidden: {0}")]
    Forbidden(String),

    /// 404: запрошенный ресурс не найден.
    #[error("not found: {0}")]
    NotFound(String),

    /// 409: нарушена уникальность (например, занятый логин).
    #[error("conflict: {0}")]
    Conflict(String),

    /// 400 и прочие ошибки запроса.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// 5xx.
    #[error("server error {status}: {message}")]
    Server {
        /// HTTP-статус ответа.
        status: u16,
        /// Сообщение сервера.
        message: String,
    },
}

/// Результат операций `board-client`.
pub type BoardClientResult<T> = Result<T, BoardClientError>;

impl BoardClientError {
    pub(crate) fn from_http_status(status: reqwest::StatusCode, message: Option<String>) -> Self {
        let message = message.unwrap_or_else(|| format!("http status {status}"));
        match status {
            reqwest::StatusCode::UNAUTHORIZED => Self::Unauthorized(message),
            reqwest::StatusCode::FORBIDDEN => Self::Forbidden(message),
            reqwest::StatusCode::NOT_FOUND => Self::NotFound(message),
            reqwest::StatusCode::CONFLICT => Self::Conflict(message),
            status if status.is_server_error() => Self::Server {
                status: status.as_u16(),
                message,
            },
            _ => Self::InvalidRequest(message),
        }
    }

    pub(crate) fn from_reqwest(err: reqwest::Error) -> Self {
        if let Some(status) = err.status() {
            return Self::from_http_status(status, None);
        }
        Self::Http(err)
    }
}

#[cfg(test)]
mod tests {
    use reqwest::StatusCode;

    use super::BoardClientError;

    #[test]
    fn statuses_map_to_variants() {
        let cases = [
            (StatusCode::UNAUTHORIZED, "Invalid token"),
            (StatusCode::FORBIDDEN, "Forbidden"),
            (StatusCode::NOT_FOUND, "Not found"),
            (StatusCode::CONFLICT, "Duplicate key error"),
            (StatusCode::BAD_REQUEST, "Invalid id"),
        ];

        for (status, message) in cases {
            let err = BoardClientError::from_http_status(status, Some(message.to_string()));
            let matched = match (&err, status) {
                (BoardClientError::Unauthorized(m), StatusCode::UNAUTHORIZED)
                | (BoardClientError::Forbidden(m), StatusCode::FORBIDDEN)
                | (BoardClientError::NotFound(m), StatusCode::NOT_FOUND)
                | (BoardClientError::Conflict(m), StatusCode::CONFLICT)
                | (BoardClientError::InvalidRequest(m), StatusCode::BAD_REQUEST) => m == message,
                _ => false,
            };
            assert!(matched, "unexpected mapping for {status}: {err:?}");
        }
    }

    #[test]
    fn server_errors_keep_status() {
        let err = BoardClientError::from_http_status(StatusCode::INTERNAL_SERVER_ERROR, None);
        match err {
            BoardClientError::Server { status, message } => {
                assert_eq!(status, 500);
                assert!(message.contains("500"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
