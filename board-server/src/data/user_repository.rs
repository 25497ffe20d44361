use async_trait::async_trait;

use crate::domain::error::DomainError;
use crate::domain::user::{LoginKey, User};

/// Пользователь вместе с хешем пароля. Наружу из сервиса не уходит.
#[derive(Debug, Clone)]
pub(crate) struct StoredUser {
    pub(crate) user: User,
    pub(crate) password_hash: String,
}

#[derive(Debug, Clone)]
pub(crate) struct NewUser {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password_hash: String,
}

/// Нарушение уникальности имени или email возвращается как
/// `DuplicateKey` с именем ограничения (`users_username_key`, `users_email_key`).
#[async_trait]
pub(crate) trait UserRepository: Send + Sync {
    async fn create_user(&self, input: NewUser) -> Result<User, DomainError>;
    async fn find_for_login(&self, key: &LoginKey) -> Result<Option<StoredUser>, DomainError>;
}
