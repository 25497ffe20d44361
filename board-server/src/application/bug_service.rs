use std::sync::Arc;

use crate::data::bug_repository::{BugFields, BugRepository};
use crate::domain::bug::{Bug, CreateBugRequest, UpdateBugRequest, ValidBug};
use crate::domain::error::DomainError;
use crate::domain::identity::parse_resource_id;

/// Баг-трекер открыт: ни аутентификации, ни проверки владельца.
pub(crate) struct BugService {
    repo: Arc<dyn BugRepository>,
}

impl BugService {
    pub(crate) fn new(repo: Arc<dyn BugRepository>) -> Self {
        Self { repo }
    }

    pub(crate) async fn create_bug(&self, req: CreateBugRequest) -> Result<Bug, DomainError> {
        let valid = req.validate()?;
        self.repo.create_bug(into_fields(valid)).await
    }

    pub(crate) async fn list_bugs(&self) -> Result<Vec<Bug>, DomainError> {
        self.repo.list_bugs().await
    }

    pub(crate) async fn get_bug(&self, raw_id: &str) -> Result<Bug, DomainError> {
        let id = parse_resource_id(raw_id)?;
        self.repo
            .get_bug(id)
            .await?
            .ok_or_else(|| DomainError::not_found("bug", id))
    }

    pub(crate) async fn update_bug(
        &self,
        raw_id: &str,
        req: UpdateBugRequest,
    ) -> Result<Bug, DomainError> {
        let current = self.get_bug(raw_id).await?;
        let valid = req.apply_to(&current)?;

        self.repo
            .update_bug(current.id, into_fields(valid))
            .await?
            .ok_or_else(|| DomainError::not_found("bug", current.id))
    }

    pub(crate) async fn delete_bug(&self, raw_id: &str) -> Result<(), DomainError> {
        let id = parse_resource_id(raw_id)?;
        if !self.repo.delete_bug(id).await? {
            return Err(DomainError::not_found("bug", id));
        }
        Ok(())
    }
}

fn into_fields(valid: ValidBug) -> BugFields {
    BugFields {
        title: valid.title,
        description: valid.description,
        status: valid.status,
    }
}
