use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use super::errors::map_db_error;
use crate::data::user_repository::{NewUser, StoredUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{LoginKey, User};

#[derive(Debug, Clone)]
pub(crate) struct PostgresUserRepository {
    pool: PgPool,
}

impl PostgresUserRepository {
    pub(crate) fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(FromRow)]
struct UserRow {
    id: Uuid,
    username: String,
    email: String,
    created_at: DateTime<Utc>,
}

#[derive(FromRow)]
struct StoredUserRow {
    id: Uuid,
    username: String,
    email: String,
    password_hash: String,
    created_at: DateTime<Utc>,
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let row = sqlx::query_as::<_, UserRow>(
            r#"
            INSERT INTO users (id, username, email, password_hash)
            VALUES ($1, $2, $3, $4)
            RETURNING id, username, email, created_at
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(&input.username)
        .bind(&input.email)
        .bind(&input.password_hash)
        .fetch_one(&self.pool)
        .await
        .map_err(map_db_error)?;

        User::new(row.id, row.username, row.email, row.created_at)
            .map_err(|err| DomainError::Unexpected(err.to_string()))
    }

    async fn find_for_login(&self, key: &LoginKey) -> Result<Option<StoredUser>, DomainError> {
        let (sql, value) = match key {
            LoginKey::Username(username) => (
                "SELECT id, username, email, password_hash, created_at FROM users WHERE username = $1",
                username,
            ),
            LoginKey::Email(email) => (
                "SELECT id, username, email, password_hash, created_at FROM users WHERE email = $1",
                email,
            ),
        };

        let row = sqlx::query_as::<_, StoredUserRow>(sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_db_error)?;

        let Some(r) = row else {
            return Ok(None);
        };
        let user = User::new(r.id, r.username, r.email, r.created_at)
            .map_err(|err| DomainError::Unexpected(err.to_string()))?;

        Ok(Some(StoredUser {
            user,
            password_hash: r.password_hash,
        }))
    }
}
