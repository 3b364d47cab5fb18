//! Infrastructure layer module
//!
//! This module contains the adapters around the domain settings:
//! - Configuration management (environment and `.env` sources)
//! - Logging infrastructure

pub mod config;
pub mod logging;
