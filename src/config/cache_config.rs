use super::env_vars::EnvVars;
use crate::domain::errors::ConfigError;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct CacheConfig {
    pub cache_type: String,
    pub default_timeout_secs: u64,
}

impl CacheConfig {
    pub fn load(vars: &EnvVars) -> Result<Self, ConfigError> {
        Ok(Self {
            cache_type: vars.string_or("CACHE_TYPE", "simple"),
            default_timeout_secs: vars.parse_or("CACHE_DEFAULT_TIMEOUT", 300)?,
        })
    }
}
