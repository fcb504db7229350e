use thiserror::Error;

/// Errors raised while building a settings bundle
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("SECRET_KEY environment variable is required in {environment}")]
    MissingSecretKey { environment: String },

    #[error("Invalid value for {key}: {value}")]
    InvalidValue { key: String, value: String },
}

/// Errors related to user accounts
#[derive(Debug, Error)]
pub enum UserError {
    #[error("Unknown user role: {0}. Must be 'admin', 'manager' or 'player'")]
    UnknownRole(String),
}

/// Errors surfaced by repositories and the services built on them
#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("Driver not found: {id}")]
    DriverNotFound { id: i64 },
}
