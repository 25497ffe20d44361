use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::bug::{Bug, BugStatus};
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct BugFields {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) status: BugStatus,
}

#[async_trait]
pub(crate) trait BugRepository: Send + Sync {
    async fn create_bug(&self, input: BugFields) -> Result<Bug, DomainError>;
    async fn get_bug(&self, id: Uuid) -> Result<Option<Bug>, DomainError>;
    async fn update_bug(&self, id: Uuid, fields: BugFields) -> Result<Option<Bug>, DomainError>;
    async fn delete_bug(&self, id: Uuid) -> Result<bool, DomainError>;
    async fn list_bugs(&self) -> Result<Vec<Bug>, DomainError>;
}
