use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::domain::identity::Identity;

#[derive(Debug, Error)]
pub(crate) enum JwtError {
    #[error("token encode failed")]
    Encode(#[source] jsonwebtoken::errors::Error),

    #[error("token decode/validation failed")]
    Decode(#[source] jsonwebtoken::errors::Error),

    #[error("token subject is empty")]
    EmptySubject,
}

/// Выпуск и проверка токенов личности.
pub(crate) trait TokenService: Send + Sync {
    fn issue(&self, identity: &Identity) -> Result<String, JwtError>;
    fn verify(&self, token: &str) -> Result<Identity, JwtError>;
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub(crate) struct Claims {
    pub(crate) sub: String,
    pub(crate) iat: i64,
    pub(crate) exp: i64,
}

/// HS256 JWT с фиксированным сроком жизни в два часа.
pub(crate) struct JwtService {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
}

impl JwtService {
    pub(crate) const TOKEN_TTL_SECONDS: i64 = 2 * 60 * 60;

    /// Секрет для локальной разработки. В продакшене небезопасен.
    pub(crate) const DEV_SECRET: &'static str = "testsecret";

    pub(crate) fn new(secret: &str) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        validation.validate_exp = true;
        validation.leeway = 0;
        validation.set_required_spec_claims(&["exp", "sub"]);

        JwtService {
            encoding_key: EncodingKey::from_secret(secret.as_bytes()),
            decoding_key: DecodingKey::from_secret(secret.as_bytes()),
            validation,
        }
    }

    pub(crate) fn issue_at(
        &self,
        identity: &Identity,
        issued_at: DateTime<Utc>,
    ) -> Result<String, JwtError> {
        let claims = Claims {
            sub: identity.as_str().to_string(),
            iat: issued_at.timestamp(),
            exp: (issued_at + Duration::seconds(Self::TOKEN_TTL_SECONDS)).timestamp(),
        };

        encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(JwtError::Encode)
    }
}

impl TokenService for JwtService {
    fn issue(&self, identity: &Identity) -> Result<String, JwtError> {
        self.issue_at(identity, Utc::now())
    }

    fn verify(&self, token: &str) -> Result<Identity, JwtError> {
        let token_data = decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(JwtError::Decode)?;

        let sub = token_data.claims.sub;
        if sub.trim().is_empty() {
            return Err(JwtError::EmptySubject);
        }
        Ok(Identity::new(sub))
    }
}
