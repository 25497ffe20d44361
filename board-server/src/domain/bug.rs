use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::error::DomainError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub(crate) enum BugStatus {
    #[default]
    Open,
    InProgress,
    Resolved,
}

impl BugStatus {
    pub(crate) fn as_str(self) -> &'static str {
        match self {
            BugStatus::Open => "open",
            BugStatus::InProgress => "in-progress",
            BugStatus::Resolved => "resolved",
        }
    }
}

impl FromStr for BugStatus {
    type Err = DomainError;

    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        match raw.trim() {
            "open" => Ok(BugStatus::Open),
            "in-progress" => Ok(BugStatus::InProgress),
            "resolved" => Ok(BugStatus::Resolved),
            _ => Err(DomainError::Validation {
                field: "status",
                message: "must be one of: open, in-progress, resolved",
            }),
        }
    }
}

impl fmt::Display for BugStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct Bug {
    pub(crate) id: Uuid,
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) status: BugStatus,
    pub(crate) created_at: DateTime<Utc>,
    pub(crate) updated_at: DateTime<Utc>,
}

impl Bug {
    pub(crate) fn new(
        id: Uuid,
        title: impl Into<String>,
        description: impl Into<String>,
        status: BugStatus,
        created_at: DateTime<Utc>,
        updated_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        let title = normalize_bug_title(&title.into())?;
        if updated_at < created_at {
            return Err(DomainError::Validation {
                field: "updated_at",
                message: "must be >= created_at",
            });
        }

        Ok(Self {
            id,
            title,
            description: description.into().trim().to_string(),
            status,
            created_at,
            updated_at,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct CreateBugRequest {
    pub(crate) title: String,
    pub(crate) description: Option<String>,
    pub(crate) status: Option<String>,
}

#[derive(Debug, Clone)]
pub(crate) struct ValidBug {
    pub(crate) title: String,
    pub(crate) description: String,
    pub(crate) status: BugStatus,
}

impl CreateBugRequest {
    pub(crate) fn validate(self) -> Result<ValidBug, DomainError> {
        let status = match self.status.as_deref() {
            Some(raw) => raw.parse()?,
            None => BugStatus::default(),
        };

        Ok(ValidBug {
            title: normalize_bug_title(&self.title)?,
            description: self.description.unwrap_or_default().trim().to_string(),
            status,
        })
    }
}

#[derive(Debug, Clone, Default)]
pub(crate) struct UpdateBugRequest {
    pub(crate) title: Option<String>,
    pub(crate) description: Option<String>,
    pub(crate) status: Option<String>,
}

impl UpdateBugRequest {
    /// Применяет заданные поля поверх текущего состояния бага.
    pub(crate) fn apply_to(self, current: &Bug) -> Result<ValidBug, DomainError> {
        let title = match self.title.as_deref() {
            Some(title) => normalize_bug_title(title)?,
            None => current.title.clone(),
        };
        let status = match self.status.as_deref() {
            Some(raw) => raw.parse()?,
            None => current.status,
        };
        let description = match self.description {
            Some(description) => description.trim().to_string(),
            None => current.description.clone(),
        };

        Ok(ValidBug {
            title,
            description,
            status,
        })
    }
}

fn normalize_bug_title(title: &str) -> Result<String, DomainError> {
    let title = title.trim();
    if title.is_empty() {
        return Err(DomainError::Validation {
            field: "title",
            message: "Title is required",
        });
    }
    if title.chars().count() > 255 {
        return Err(DomainError::Validation {
            field: "title",
            message: "must be at most 255 chars",
        });
    }
    Ok(title.to_string())
}
