//! Project - application template with validated settings
//!
//! Settings are read from the process environment, layered over an optional
//! `.env` file, and validated against a declared schema. Every invalid field
//! is reported in a single error so configuration can be fixed in one pass.
//!
//! # Architecture
//!
//! - **Domain Layer** (`domain`): settings records, schema, validation errors
//! - **Infrastructure Layer** (`infrastructure`): environment sources, loader, logging
//! - **CLI Layer** (`cli`): command-line interface
//!
//! # Example
//!
//! ```no_run
//! use project::Settings;
//!
//! fn main() -> anyhow::Result<()> {
//!     let settings = Settings::load()?;
//!     println!("some_example_var = {}", settings.some_example_var());
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod domain;
pub mod infrastructure;

// Re-export commonly used types for convenience
pub use domain::models::{NestedSettings, Settings, SettingsSchema};
pub use secrecy::{ExposeSecret, SecretString};
pub use domain::{ConfigValidationError, FieldError, FieldErrorKind};
pub use infrastructure::config::{ConfigError, EnvSource, SettingsLoader};
