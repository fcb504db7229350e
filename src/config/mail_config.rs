//! Outgoing mail settings.

use super::env_vars::EnvVars;
use crate::domain::errors::ConfigError;
use serde::Serialize;

#[derive(Debug, Clone, Serialize)]
pub struct MailConfig {
    pub server: Option<String>,
    pub port: u16,
    pub use_tls: bool,
    pub username: Option<String>,
    #[serde(skip_serializing)]
    pub password: Option<String>,
    pub default_sender: String,
}

impl MailConfig {
    pub fn load(vars: &EnvVars) -> Result<Self, ConfigError> {
        Ok(Self {
            server: vars.get("MAIL_SERVER"),
            port: vars.parse_or("MAIL_PORT", 587)?,
            use_tls: vars.bool_or("MAIL_USE_TLS", true)?,
            username: vars.get("MAIL_USERNAME"),
            password: vars.get("MAIL_PASSWORD"),
            default_sender: vars.string_or("MAIL_DEFAULT_SENDER", "noreply@fantasy-f1.com"),
        })
    }

    /// Mail is only sent when a server is configured.
    pub fn is_enabled(&self) -> bool {
        self.server.is_some()
    }
}
