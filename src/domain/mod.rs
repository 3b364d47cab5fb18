//! Domain layer for application settings
//!
//! This module contains the settings records, their schema description and
//! the validation error types.

pub mod error;
pub mod models;

// Re-export error types for convenient access
pub use error::{ConfigValidationError, FieldError, FieldErrorKind};
