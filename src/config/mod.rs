//! Configuration module for Fantasy F1.
//!
//! Each deployment environment selects a settings bundle. The bundle is
//! built once at startup and passed to whatever needs it; nothing reads
//! configuration from global state afterwards.

mod api_config;
mod cache_config;
mod database_config;
mod env_vars;
mod environment;
mod logging_config;
mod mail_config;
mod security_config;

pub use api_config::ApiConfig;
pub use cache_config::CacheConfig;
pub use database_config::{DEFAULT_DATABASE_URL, DatabaseConfig, IN_MEMORY_DATABASE_URL};
pub use env_vars::EnvVars;
pub use environment::Environment;
pub use logging_config::LoggingConfig;
pub use mail_config::MailConfig;
pub use security_config::{SameSite, SecurityConfig};

use anyhow::{Context, Result};
use serde::Serialize;

/// Main application configuration.
#[derive(Debug, Clone, Serialize)]
pub struct Config {
    pub app_name: String,
    pub environment: Environment,
    pub debug: bool,
    pub testing: bool,

    pub security: SecurityConfig,
    pub database: DatabaseConfig,
    pub api: ApiConfig,
    pub cache: CacheConfig,
    pub logging: LoggingConfig,
    pub mail: MailConfig,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// The environment name comes from `APP_ENV`, then `FLASK_ENV`, and
    /// defaults to development. Unknown names select development as well.
    pub fn from_env() -> Result<Self> {
        let vars = EnvVars::process();
        let name = vars
            .get("APP_ENV")
            .or_else(|| vars.get("FLASK_ENV"))
            .unwrap_or_else(|| Environment::default().to_string());

        Self::for_environment(Environment::resolve(&name), &vars)
    }

    /// Build the settings bundle for `environment` from an explicit source.
    pub fn for_environment(environment: Environment, vars: &EnvVars) -> Result<Self> {
        let security = SecurityConfig::load(environment, vars)
            .context("Failed to load security config")?;
        let database = DatabaseConfig::load(environment, vars)
            .context("Failed to load database config")?;
        let api = ApiConfig::load(vars).context("Failed to load API config")?;
        let cache = CacheConfig::load(vars).context("Failed to load cache config")?;
        let logging = LoggingConfig::load(vars);
        let mail = MailConfig::load(vars).context("Failed to load mail config")?;

        Ok(Self {
            app_name: "Fantasy F1".to_string(),
            environment,
            debug: environment == Environment::Development,
            testing: environment == Environment::Testing,
            security,
            database,
            api,
            cache,
            logging,
            mail,
        })
    }
}
