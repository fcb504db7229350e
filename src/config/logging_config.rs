//! Log level and log file settings.

use super::env_vars::EnvVars;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct LoggingConfig {
    pub level: String,
    pub file: String,
    pub max_bytes: u64,
    pub backup_count: u32,
}

impl LoggingConfig {
    pub fn load(vars: &EnvVars) -> Self {
        Self {
            level: vars.string_or("LOG_LEVEL", "INFO"),
            file: vars.string_or("LOG_FILE", "app.log"),
            max_bytes: 10 * 1024 * 1024,
            backup_count: 10,
        }
    }

    /// Level as an `EnvFilter` directive (`INFO` -> `info`, `WARNING` -> `warn`).
    pub fn filter_directive(&self) -> String {
        match self.level.to_lowercase().as_str() {
            "warning" => "warn".to_string(),
            "critical" | "fatal" => "error".to_string(),
            other => other.to_string(),
        }
    }
}
