use std::fmt;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::DomainError;

/// Непрозрачный идентификатор аутентифицированного пользователя.
///
/// Восстанавливается из токена на каждом запросе, на сервере не хранится.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub(crate) struct Identity(String);

impl Identity {
    pub(crate) fn new(raw: impl Into<String>) -> Self {
        Identity(raw.into())
    }

    pub(crate) fn as_str(&self) -> &str {
        &self.0
    }

    pub(crate) fn into_inner(self) -> String {
        self.0
    }
}

impl From<Uuid> for Identity {
    fn from(id: Uuid) -> Self {
        Identity(id.to_string())
    }
}

impl fmt::Display for Identity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Разбирает идентификатор ресурса из пути запроса.
pub(crate) fn parse_resource_id(raw: &str) -> Result<Uuid, DomainError> {
    Uuid::parse_str(raw.trim()).map_err(|_| DomainError::InvalidId(raw.to_string()))
}
