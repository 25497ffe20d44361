use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::data::bug_repository::{BugFields, BugRepository};
use crate::domain::bug::Bug;
use crate::domain::error::DomainError;

#[derive(Debug, Default)]
pub(crate) struct InMemoryBugRepository {
    bugs: RwLock<Vec<Bug>>,
}

impl InMemoryBugRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl BugRepository for InMemoryBugRepository {
    async fn create_bug(&self, input: BugFields) -> Result<Bug, DomainError> {
        let now = Utc::now();
        let bug = Bug::new(
            Uuid::new_v4(),
            input.title,
            input.description,
            input.status,
            now,
            now,
        )?;

        self.bugs.write().await.push(bug.clone());
        Ok(bug)
    }

    async fn get_bug(&self, id: Uuid) -> Result<Option<Bug>, DomainError> {
        let bugs = self.bugs.read().await;
        Ok(bugs.iter().find(|bug| bug.id == id).cloned())
    }

    async fn update_bug(&self, id: Uuid, fields: BugFields) -> Result<Option<Bug>, DomainError> {
        let mut bugs = self.bugs.write().await;
        let Some(bug) = bugs.iter_mut().find(|bug| bug.id == id) else {
            return Ok(None);
        };

        bug.title = fields.title;
        bug.description = fields.description;
        bug.status = fields.status;
        bug.updated_at = Utc::now().max(bug.created_at);
        Ok(Some(bug.clone()))
    }

    async fn delete_bug(&self, id: Uuid) -> Result<bool, DomainError> {
        let mut bugs = self.bugs.write().await;
        let before = bugs.len();
        bugs.retain(|bug| bug.id != id);
        Ok(bugs.len() < before)
    }

    async fn list_bugs(&self) -> Result<Vec<Bug>, DomainError> {
        Ok(self.bugs.read().await.clone())
    }
}
