//! Database connection settings.

use super::Environment;
use super::env_vars::EnvVars;
use crate::domain::errors::ConfigError;
use serde::Serialize;

pub const DEFAULT_DATABASE_URL: &str = "sqlite://fantasy_f1.db";
pub const IN_MEMORY_DATABASE_URL: &str = "sqlite::memory:";

#[derive(Debug, Clone, Serialize)]
pub struct DatabaseConfig {
    pub url: String,
    /// Log every SQL statement
    pub echo: bool,
    pub max_connections: u32,
    /// Ping pooled connections before handing them out
    pub test_before_acquire: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_DATABASE_URL.to_string(),
            echo: false,
            max_connections: 5,
            test_before_acquire: true,
        }
    }
}

impl DatabaseConfig {
    pub fn load(environment: Environment, vars: &EnvVars) -> Result<Self, ConfigError> {
        let url = match environment {
            Environment::Testing => IN_MEMORY_DATABASE_URL.to_string(),
            _ => vars.string_or("DATABASE_URL", DEFAULT_DATABASE_URL),
        };

        Ok(Self {
            url,
            echo: environment == Environment::Development,
            max_connections: vars.parse_or("DATABASE_MAX_CONNECTIONS", 5)?,
            test_before_acquire: true,
        })
    }

    /// In-memory databases live only as long as their connection.
    pub fn is_in_memory(&self) -> bool {
        self.url.contains(":memory:") || self.url.contains("mode=memory")
    }
}
