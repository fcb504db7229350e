//! Public API metadata, upstream F1 data feed and pagination settings.

use super::env_vars::EnvVars;
use crate::domain::errors::ConfigError;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct ApiConfig {
    pub title: String,
    pub version: String,
    pub description: String,
    pub f1_api_base_url: String,
    pub f1_api_timeout_secs: u64,
    pub items_per_page: u32,
    pub max_items_per_page: u32,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            title: "Fantasy F1 API".to_string(),
            version: "1.0.0".to_string(),
            description: "API for Fantasy Formula 1 application".to_string(),
            f1_api_base_url: "https://api.formula1.com".to_string(),
            f1_api_timeout_secs: 30,
            items_per_page: 20,
            max_items_per_page: 100,
        }
    }
}

impl ApiConfig {
    pub fn load(vars: &EnvVars) -> Result<Self, ConfigError> {
        let base = Self::default();
        Ok(Self {
            f1_api_base_url: vars.string_or("F1_API_BASE_URL", &base.f1_api_base_url),
            f1_api_timeout_secs: vars.parse_or("F1_API_TIMEOUT", base.f1_api_timeout_secs)?,
            ..base
        })
    }

    /// Clamp a requested page size into `1..=max_items_per_page`.
    pub fn page_size(&self, requested: Option<u32>) -> u32 {
        requested
            .unwrap_or(self.items_per_page)
            .clamp(1, self.max_items_per_page)
    }
}
