use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::data::user_repository::{NewUser, StoredUser, UserRepository};
use crate::domain::error::DomainError;
use crate::domain::user::{LoginKey, User};

#[derive(Debug, Default)]
pub(crate) struct InMemoryUserRepository {
    users: RwLock<Vec<StoredUser>>,
}

impl InMemoryUserRepository {
    pub(crate) fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError> {
        let mut users = self.users.write().await;
        // те же имена ограничений, что и в схеме PostgreSQL
        if users.iter().any(|c| c.user.username == input.username) {
            return Err(DomainError::DuplicateKey("users_username_key".to_string()));
        }
        if users.iter().any(|c| c.user.email == input.email) {
            return Err(DomainError::DuplicateKey("users_email_key".to_string()));
        }

        let user = User::new(Uuid::new_v4(), input.username, input.email, Utc::now())?;
        users.push(StoredUser {
            user: user.clone(),
            password_hash: input.password_hash,
        });
        Ok(user)
    }

    async fn find_for_login(&self, key: &LoginKey) -> Result<Option<StoredUser>, DomainError> {
        let users = self.users.read().await;
        Ok(users
            .iter()
            .find(|stored| match key {
                LoginKey::Username(username) => &stored.user.username == username,
                LoginKey::Email(email) => &stored.user.email == email,
            })
            .cloned())
    }
}
