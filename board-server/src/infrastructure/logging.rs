use std::str::FromStr;

use anyhow::{Result, anyhow};
use tracing_subscriber::{EnvFilter, fmt};

/// Формат строк лога: `compact` для терминала, `json` для сборщиков логов.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Compact,
    Json,
}

impl FromStr for LogFormat {
    type Err = anyhow::Error;

    fn from_str(raw: &str) -> Result<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "compact" | "text" => Ok(LogFormat::Compact),
            "json" => Ok(LogFormat::Json),
            other => Err(anyhow!(
                "unknown LOG_FORMAT '{other}', expected 'compact' or 'json'"
            )),
        }
    }
}

/// `RUST_LOG` имеет приоритет над уровнем из настроек.
fn build_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(default_level))
        .unwrap_or_else(|_| EnvFilter::new("info"))
}

pub fn init_logging(default_level: &str, format: LogFormat) -> Result<()> {
    let builder = fmt()
        .with_env_filter(build_filter(default_level))
        .with_target(true);

    let installed = match format {
        LogFormat::Compact => builder.compact().try_init(),
        LogFormat::Json => builder.json().try_init(),
    };
    installed.map_err(|e| anyhow!("failed to init logging: {e}"))?;

    Ok(())
}
