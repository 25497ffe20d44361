use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::ValidateEmail;

use super::error::DomainError;
use super::identity::Identity;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct RegisterRequest {
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) password: String,
}

impl RegisterRequest {
    pub(crate) fn validate(self) -> Result<Self, DomainError> {
        let username = normalize_register_username(&self.username)?;
        let email = normalize_email(&self.email)?;
        let password_len = self.password.chars().count();
        if !(8..=128).contains(&password_len) {
            return Err(DomainError::Validation {
                field: "password",
                message: "must be 8..128 chars",
            });
        }
        Ok(Self {
            username,
            email,
            password: self.password,
        })
    }
}

/// `login` это имя пользователя либо email.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct LoginRequest {
    pub(crate) login: String,
    pub(crate) password: String,
}

/// По какому полю искать пользователя при входе.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum LoginKey {
    Username(String),
    Email(String),
}

impl LoginKey {
    /// Имена пользователей не содержат `@`, поэтому такой логин считается email.
    fn parse(raw: &str) -> Result<Self, DomainError> {
        let raw = raw.trim();
        if raw.is_empty() || raw.chars().count() > 254 {
            return Err(DomainError::Validation {
                field: "username",
                message: "must be 1..254 chars",
            });
        }

        if raw.contains('@') {
            Ok(LoginKey::Email(raw.to_lowercase()))
        } else {
            Ok(LoginKey::Username(raw.to_string()))
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct ValidLogin {
    pub(crate) key: LoginKey,
    pub(crate) password: String,
}

impl LoginRequest {
    pub(crate) fn validate(self) -> Result<ValidLogin, DomainError> {
        let key = LoginKey::parse(&self.login)?;
        if self.password.is_empty() {
            return Err(DomainError::Validation {
                field: "password",
                message: "must not be empty",
            });
        }
        Ok(ValidLogin {
            key,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone)]
pub(crate) struct User {
    pub(crate) id: Uuid,
    pub(crate) username: String,
    pub(crate) email: String,
    pub(crate) created_at: DateTime<Utc>,
}

impl User {
    pub(crate) fn new(
        id: Uuid,
        username: impl Into<String>,
        email: impl Into<String>,
        created_at: DateTime<Utc>,
    ) -> Result<Self, DomainError> {
        if id.is_nil() {
            return Err(DomainError::Validation {
                field: "id",
                message: "must not be nil",
            });
        }
        let username = normalize_register_username(&username.into())?;
        let email = normalize_email(&email.into())?;

        Ok(Self {
            id,
            username,
            email,
            created_at,
        })
    }

    pub(crate) fn identity(&self) -> Identity {
        Identity::from(self.id)
    }
}

fn normalize_register_username(username: &str) -> Result<String, DomainError> {
    let username = username.trim();
    if username.len() < 3 || username.len() > 64 {
        return Err(DomainError::Validation {
            field: "username",
            message: "must be 3..64 chars",
        });
    }
    if username.contains('@') {
        return Err(DomainError::Validation {
            field: "username",
            message: "must not contain '@'",
        });
    }
    Ok(username.to_string())
}

fn normalize_email(email: &str) -> Result<String, DomainError> {
    let email = email.trim().to_lowercase();
    if !email.validate_email() {
        return Err(DomainError::Validation {
            field: "email",
            message: "must be a valid email",
        });
    }
    Ok(email)
}

#[cfg(test)]
mod tests {
    use super::{
        LoginKey, LoginRequest, RegisterRequest, User, normalize_email,
        normalize_register_username,
    };
    use chrono::Utc;
    use uuid::Uuid;

    #[test]
    fn user_new_rejects_nil_id() {
        let result = User::new(Uuid::nil(), "valid_user", "test@example.com", Utc::now());
        assert!(result.is_err());
    }

    #[test]
    fn user_identity_is_rendered_id() {
        let id = Uuid::new_v4();
        let user = User::new(id, "valid_user", "test@example.com", Utc::now())
            .expect("user must be valid");
        assert_eq!(user.identity().as_str(), id.to_string());
    }

    #[test]
    fn normalize_email_trims_and_lowercases() {
        let value = normalize_email("  TeSt@Example.COM ").expect("must be valid");
        assert_eq!(value, "test@example.com");
    }

    #[test]
    fn register_username_rules_are_applied() {
        assert!(normalize_register_username("ab").is_err());
        assert!(normalize_register_username("me@home").is_err());
        assert!(normalize_register_username("valid_user").is_ok());
    }

    #[test]
    fn login_key_is_picked_by_at_sign() {
        let by_name = LoginRequest {
            login: "  alice ".to_string(),
            password: "pw".to_string(),
        }
        .validate()
        .expect("must be valid");
        assert_eq!(by_name.key, LoginKey::Username("alice".to_string()));

        let by_email = LoginRequest {
            login: "Alice@Example.com".to_string(),
            password: "pw".to_string(),
        }
        .validate()
        .expect("must be valid");
        assert_eq!(by_email.key, LoginKey::Email("alice@example.com".to_string()));
    }

    #[test]
    fn login_requires_login_and_password() {
        let blank = LoginRequest {
            login: "   ".to_string(),
            password: "pw".to_string(),
        };
        assert!(blank.validate().is_err());

        let no_password = LoginRequest {
            login: "alice".to_string(),
            password: String::new(),
        };
        assert!(no_password.validate().is_err());
    }

    #[test]
    fn register_password_length_is_checked() {
        let short = RegisterRequest {
            username: "valid_user".to_string(),
            email: "test@example.com".to_string(),
            password: "short".to_string(),
        };
        assert!(short.validate().is_err());

        let ok = RegisterRequest {
            username: "valid_user".to_string(),
            email: "test@example.com".to_string(),
            password: "very-secure-password".to_string(),
        };
        let validated = ok.validate().expect("must be valid");
        assert_eq!(validated.username, "valid_user");
        assert_eq!(validated.email, "test@example.com");
    }
}
