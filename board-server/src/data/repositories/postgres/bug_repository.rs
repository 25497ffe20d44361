use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::errors::map_db_error;
use crate::data::bug_repository::{BugFields, BugRepository};
use crate::domain::bug::{Bug, BugStatus};
use crate::domain::error::DomainError;

#[derive(Debug, Clone)]
pub(crate) struct PostgresBugRepository {
    pool: PgPool,
}

impl PostgresBugRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct BugRow {
    id: Uuid,
    title: String,
    description: String,
    status: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

#[async_trait]
impl BugRepository for PostgresBugRepository {
    async fn create_bug(&self, input: BugFields) -> Result<Bug, DomainError> {
        let row = sqlx::query_as::<_, BugRow>(
            r#"
            INSERT INTO bugs (id, title, description, status)
            VALUES ($1, $2, $3, $4)
            RETURNING id, title, description, status, created_at, updated_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.title)
        .bind(&input.description)
        .bind(input.status.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        map_row_to_bug(row)
    }

    async fn get_bug(&self, id: Uuid) -> Result<Option<Bug>, DomainError> {
        let row = sqlx::query_as::<_, BugRow>(
            r#"
            SELECT id, title, description, status, created_at, updated_at
            FROM bugs
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(map_row_to_bug).transpose()
    }

    async fn update_bug(&self, id: Uuid, fields: BugFields) -> Result<Option<Bug>, DomainError> {
        let row = sqlx::query_as::<_, BugRow>(
            r#"
            UPDATE bugs
            SET title = $2,
                description = $3,
                status = $4,
                updated_at = NOW()
            WHERE id = $1
            RETURNING id, title, description, status, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(&fields.title)
        .bind(&fields.description)
        .bind(fields.status.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_db_error)?;

        row.map(map_row_to_bug).transpose()
    }

    async fn delete_bug(&self, id: Uuid) -> Result<bool, DomainError> {
        let result = sqlx::query("DELETE FROM bugs WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(map_db_error)?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_bugs(&self) -> Result<Vec<Bug>, DomainError> {
        let rows = sqlx::query_as::<_, BugRow>(
            r#"
            SELECT id, title, description, status, created_at, updated_at
            FROM bugs
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_db_error)?;

        rows.into_iter().map(map_row_to_bug).collect()
    }
}

fn map_row_to_bug(row: BugRow) -> Result<Bug, DomainError> {
    let status: BugStatus = row
        .status
        .parse()
        .map_err(|err: DomainError| DomainError::Unexpected(err.to_string()))?;

    Bug::new(
        row.id,
        row.title,
        row.description,
        status,
        row.created_at,
        row.updated_at,
    )
    .map_err(|err| DomainError::Unexpected(err.to_string()))
}
