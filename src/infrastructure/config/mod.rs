//! Configuration management infrastructure
//!
//! Layered settings loading using figment:
//! - `.env` file loading
//! - Environment variable overrides
//! - Schema-driven validation with aggregated errors
//! - Type-safe settings records

pub mod loader;
pub mod resolver;
pub mod sources;

pub use loader::{ConfigError, SettingsLoader, DEFAULT_ENV_FILE, DEFAULT_NESTED_DELIMITER};
pub use sources::EnvSource;
