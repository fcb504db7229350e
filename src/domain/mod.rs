// Driver statistics domain
pub mod driver;

// Position statistics helpers
pub mod stats;

// User accounts
pub mod user;

// Repository traits
pub mod repositories;

// Domain-specific error types
pub mod errors;
