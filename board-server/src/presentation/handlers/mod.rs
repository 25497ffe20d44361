pub(crate) mod auth;
pub(crate) mod bugs;
pub(crate) mod health;
pub(crate) mod posts;

use serde::Serialize;
use utoipa::ToSchema;

/// Ответ на успешное удаление.
#[derive(Debug, Serialize, ToSchema)]
pub(crate) struct DeletedDto {
    pub(crate) success: bool,
}

impl DeletedDto {
    pub(crate) fn ok() -> Self {
        Self { success: true }
    }
}
