//! Session and secret-key settings.

use super::Environment;
use super::env_vars::EnvVars;
use crate::domain::errors::ConfigError;
use serde::Serialize;

const BASE_SECRET_KEY: &str = "dev-secret-key-change-in-production";
const DEVELOPMENT_SECRET_KEY: &str = "dev-secret-key";
const TESTING_SECRET_KEY: &str = "test-secret-key";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SameSite {
    Strict,
    Lax,
    None,
}

#[derive(Debug, Clone, Serialize)]
pub struct SecurityConfig {
    #[serde(skip_serializing)]
    pub secret_key: String,
    pub session_cookie_secure: bool,
    pub session_cookie_httponly: bool,
    pub session_cookie_samesite: SameSite,
    pub permanent_session_lifetime_secs: u64,
    pub csrf_enabled: bool,
}

impl Default for SecurityConfig {
    fn default() -> Self {
        Self {
            secret_key: BASE_SECRET_KEY.to_string(),
            session_cookie_secure: true,
            session_cookie_httponly: true,
            session_cookie_samesite: SameSite::Lax,
            permanent_session_lifetime_secs: 7 * 24 * 60 * 60,
            csrf_enabled: true,
        }
    }
}

impl SecurityConfig {
    pub fn load(environment: Environment, vars: &EnvVars) -> Result<Self, ConfigError> {
        let base = Self::default();
        let config = match environment {
            Environment::Development => Self {
                secret_key: vars.string_or("SECRET_KEY", DEVELOPMENT_SECRET_KEY),
                session_cookie_secure: false,
                ..base
            },
            Environment::Testing => Self {
                secret_key: TESTING_SECRET_KEY.to_string(),
                csrf_enabled: false,
                ..base
            },
            Environment::Production => Self {
                secret_key: vars.get("SECRET_KEY").ok_or_else(|| {
                    ConfigError::MissingSecretKey {
                        environment: environment.to_string(),
                    }
                })?,
                session_cookie_secure: true,
                ..base
            },
        };
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_development_defaults() {
        let vars = EnvVars::from_map(HashMap::new());
        let config = SecurityConfig::load(Environment::Development, &vars).unwrap();
        assert_eq!(config.secret_key, "dev-secret-key");
        assert!(!config.session_cookie_secure);
        assert_eq!(config.session_cookie_samesite, SameSite::Lax);
        assert_eq!(config.permanent_session_lifetime_secs, 604_800);
    }

    #[test]
    fn test_testing_ignores_env_secret() {
        let vars = EnvVars::from_map(HashMap::from([(
            "SECRET_KEY".to_string(),
            "from-env".to_string(),
        )]));
        let config = SecurityConfig::load(Environment::Testing, &vars).unwrap();
        assert_eq!(config.secret_key, "test-secret-key");
        assert!(!config.csrf_enabled);
    }

    #[test]
    fn test_production_requires_secret() {
        let vars = EnvVars::from_map(HashMap::new());
        let err = SecurityConfig::load(Environment::Production, &vars).unwrap_err();
        assert!(matches!(err, ConfigError::MissingSecretKey { .. }));
    }
}
