use std::env;
use std::path::PathBuf;

use crate::error::AppError;

/// Lima wall-clock time, UTC-05:00.
const DEFAULT_UTC_OFFSET_MINUTES: i32 = -300;

#[derive(Debug, Clone)]
pub struct Config {
    pub http_port: u16,
    pub log_level: String,
    pub display_utc_offset_minutes: i32,
    pub snapshot_file: Option<PathBuf>,
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        let _ = dotenvy::dotenv();

        Ok(Self {
            http_port: parse_or_default("HTTP_PORT", 3000)?,
            log_level: env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
            display_utc_offset_minutes: parse_or_default(
                "DISPLAY_UTC_OFFSET_MINUTES",
                DEFAULT_UTC_OFFSET_MINUTES,
            )?,
            snapshot_file: env::var("SNAPSHOT_FILE")
                .ok()
                .filter(|raw| !raw.trim().is_empty())
                .map(PathBuf::from),
        })
    }
}

fn parse_or_default<T>(key: &str, default: T) -> Result<T, AppError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse::<T>()
            .map_err(|err| AppError::Internal(format!("invalid {key}: {err}"))),
        Err(_) => Ok(default),
    }
}
