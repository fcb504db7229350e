//! Key/value source for configuration loading.
//!
//! Production reads the process environment; tests and embedders pass an
//! explicit map so nothing depends on global state.

use crate::domain::errors::ConfigError;
use std::collections::HashMap;
use std::env;
use std::str::FromStr;

type Lookup = Box<dyn Fn(&str) -> Option<String> + Send + Sync>;

pub struct EnvVars {
    lookup: Lookup,
}

impl EnvVars {
    /// Values from the process environment.
    pub fn process() -> Self {
        Self {
            lookup: Box::new(|key| env::var(key).ok()),
        }
    }

    /// Values from a fixed map.
    pub fn from_map(values: HashMap<String, String>) -> Self {
        Self {
            lookup: Box::new(move |key| values.get(key).cloned()),
        }
    }

    /// Raw value; empty strings count as unset.
    pub fn get(&self, key: &str) -> Option<String> {
        (self.lookup)(key).filter(|v| !v.is_empty())
    }

    pub fn string_or(&self, key: &str, default: &str) -> String {
        self.get(key).unwrap_or_else(|| default.to_string())
    }

    pub fn parse_or<T: FromStr>(&self, key: &str, default: T) -> Result<T, ConfigError> {
        match self.get(key) {
            Some(raw) => raw.trim().parse::<T>().map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
            None => Ok(default),
        }
    }

    /// Accepts `true/false`, `1/0`, `yes/no`, `on/off` in any case.
    pub fn bool_or(&self, key: &str, default: bool) -> Result<bool, ConfigError> {
        let Some(raw) = self.get(key) else {
            return Ok(default);
        };
        match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" | "on" => Ok(true),
            "false" | "0" | "no" | "off" => Ok(false),
            _ => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn vars(pairs: &[(&str, &str)]) -> EnvVars {
        EnvVars::from_map(
            pairs
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        )
    }

    #[test]
    fn test_string_and_empty_values() {
        let vars = vars(&[("CACHE_TYPE", "redis"), ("LOG_FILE", "")]);
        assert_eq!(vars.string_or("CACHE_TYPE", "simple"), "redis");
        assert_eq!(vars.string_or("LOG_FILE", "app.log"), "app.log");
        assert_eq!(vars.get("MISSING"), None);
    }

    #[test]
    fn test_parse_or() {
        let vars = vars(&[("MAIL_PORT", "2525"), ("BAD_PORT", "smtp")]);
        assert_eq!(vars.parse_or::<u16>("MAIL_PORT", 587).unwrap(), 2525);
        assert_eq!(vars.parse_or::<u16>("OTHER_PORT", 587).unwrap(), 587);

        let err = vars.parse_or::<u16>("BAD_PORT", 587).unwrap_err();
        assert!(matches!(err, ConfigError::InvalidValue { .. }));
    }

    #[test]
    fn test_bool_or() {
        let vars = vars(&[("A", "Yes"), ("B", "0"), ("C", "maybe")]);
        assert!(vars.bool_or("A", false).unwrap());
        assert!(!vars.bool_or("B", true).unwrap());
        assert!(vars.bool_or("D", true).unwrap());
        assert!(vars.bool_or("C", true).is_err());
    }
}
