use anyhow::{Context, Result, anyhow};
use tracing::warn;

use crate::infrastructure::jwt::JwtService;
use crate::infrastructure::logging::LogFormat;

#[derive(Debug, Clone)]
pub struct Settings {
    pub database_url: Option<String>,
    pub jwt_secret: String,
    pub jwt_secret_is_default: bool,
    pub http_addr: String,
    pub cors_origins: Vec<String>,
    pub log_level: String,
    pub log_format: LogFormat,
    pub http_request_body_limit_bytes: usize,
    pub http_concurrency_limit: usize,
    pub http_request_timeout_secs: u64,
}

impl Settings {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub(crate) fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let database_url = get_optional(&lookup, "DATABASE_URL");
        let (jwt_secret, jwt_secret_is_default) = match get_optional(&lookup, "JWT_SECRET") {
            Some(secret) => (secret, false),
            None => (JwtService::DEV_SECRET.to_string(), true),
        };

        let http_addr =
            get_optional(&lookup, "HTTP_ADDR").unwrap_or_else(|| "0.0.0.0:5000".to_string());
        let cors_origins =
            parse_cors_origins(&get_optional(&lookup, "CORS_ORIGINS").unwrap_or_else(|| "*".to_string()));
        let log_level = get_optional(&lookup, "LOG_LEVEL")
            .or_else(|| get_optional(&lookup, "RUST_LOG"))
            .unwrap_or_else(|| "info".to_string());
        let log_format = match get_optional(&lookup, "LOG_FORMAT") {
            Some(raw) => raw.parse()?,
            None => LogFormat::default(),
        };
        let http_request_body_limit_bytes =
            parse_positive(&lookup, "HTTP_REQUEST_BODY_LIMIT_BYTES", 1024 * 1024)?;
        let http_concurrency_limit = parse_positive(&lookup, "HTTP_CONCURRENCY_LIMIT", 256)?;
        let http_request_timeout_secs = parse_positive(&lookup, "HTTP_REQUEST_TIMEOUT_SECS", 10)?;

        Ok(Self {
            database_url,
            jwt_secret,
            jwt_secret_is_default,
            http_addr,
            cors_origins,
            log_level,
            log_format,
            http_request_body_limit_bytes,
            http_concurrency_limit,
            http_request_timeout_secs,
        })
    }

    /// Предупреждает о небезопасных значениях по умолчанию.
    /// Вызывать после инициализации логирования.
    pub fn warn_insecure_defaults(&self) {
        if self.jwt_secret_is_default {
            warn!(
                "JWT_SECRET is not set, falling back to the development secret; \
                 tokens are forgeable, do not use this in production"
            );
        } else if self.jwt_secret.chars().count() < 32 {
            warn!("JWT_SECRET is shorter than 32 characters");
        }

        self.warn_in_memory_storage();
    }

    /// Только проверка хранилища, без JWT.
    pub fn warn_in_memory_storage(&self) {
        if self.database_url.is_none() {
            warn!("DATABASE_URL is not set, data is kept in memory and lost on restart");
        }
    }
}

fn get_optional<F>(lookup: &F, key: &str) -> Option<String>
where
    F: Fn(&str) -> Option<String>,
{
    lookup(key)
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn parse_cors_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|entry| !entry.is_empty())
        .map(str::to_string)
        .collect()
}

fn parse_positive<F, T>(lookup: &F, key: &str, default: T) -> Result<T>
where
    F: Fn(&str) -> Option<String>,
    T: std::str::FromStr + PartialOrd + Default + Copy,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    let value = match get_optional(lookup, key) {
        Some(raw) => raw
            .parse::<T>()
            .with_context(|| format!("Failed to parse {key}, expecting positive integer"))?,
        None => default,
    };

    if value <= T::default() {
        return Err(anyhow!("{key} must be > 0"));
    }
    Ok(value)
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::Settings;
    use crate::infrastructure::jwt::JwtService;
    use crate::infrastructure::logging::LogFormat;

    fn settings_from(pairs: &[(&str, &str)]) -> anyhow::Result<Settings> {
        let env: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        Settings::from_lookup(|key| env.get(key).cloned())
    }

    #[test]
    fn defaults_apply_when_env_is_empty() {
        let settings = settings_from(&[]).expect("defaults must be valid");

        assert!(settings.database_url.is_none());
        assert_eq!(settings.jwt_secret, JwtService::DEV_SECRET);
        assert!(settings.jwt_secret_is_default);
        assert_eq!(settings.http_addr, "0.0.0.0:5000");
        assert_eq!(settings.cors_origins, vec!["*".to_string()]);
        assert_eq!(settings.log_level, "info");
        assert_eq!(settings.http_request_timeout_secs, 10);
    }

    #[test]
    fn explicit_secret_is_not_marked_default() {
        let settings = settings_from(&[("JWT_SECRET", "  s3cr3t-value  ")]).expect("valid");
        assert_eq!(settings.jwt_secret, "s3cr3t-value");
        assert!(!settings.jwt_secret_is_default);
    }

    #[test]
    fn blank_secret_falls_back_to_default() {
        let settings = settings_from(&[("JWT_SECRET", "   ")]).expect("valid");
        assert!(settings.jwt_secret_is_default);
    }

    #[test]
    fn cors_origins_are_split_and_trimmed() {
        let settings = settings_from(&[(
            "CORS_ORIGINS",
            " http://localhost:3000 , ,http://127.0.0.1:3000",
        )])
        .expect("valid");
        assert_eq!(
            settings.cors_origins,
            vec![
                "http://localhost:3000".to_string(),
                "http://127.0.0.1:3000".to_string()
            ]
        );
    }

    #[test]
    fn zero_limits_are_rejected() {
        assert!(settings_from(&[("HTTP_CONCURRENCY_LIMIT", "0")]).is_err());
        assert!(settings_from(&[("HTTP_REQUEST_TIMEOUT_SECS", "abc")]).is_err());
    }

    #[test]
    fn log_level_falls_back_to_rust_log() {
        let settings = settings_from(&[("RUST_LOG", "debug")]).expect("valid");
        assert_eq!(settings.log_level, "debug");
        assert_eq!(settings.log_format, LogFormat::Compact);
    }

    #[test]
    fn log_format_is_parsed() {
        let settings = settings_from(&[("LOG_FORMAT", "json")]).expect("valid");
        assert_eq!(settings.log_format, LogFormat::Json);
        assert!(settings_from(&[("LOG_FORMAT", "xml")]).is_err());
    }
}
