//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber:
//! - JSON or human readable formatting
//! - Level from configuration, refined by `RUST_LOG`

pub mod config;
pub mod logger;

pub use config::{LogConfig, LogFormat};
pub use logger::{parse_log_level, LoggerImpl};
