use clap::Parser;

use crate::infrastructure::logging::{LogConfig, LogFormat};

#[derive(Parser, Debug)]
#[command(name = "project")]
#[command(about = "Application template with validated environment settings", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Log level: trace, debug, info, warn, error
    #[arg(long, env = "LOG_LEVEL", default_value = "INFO")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,

    /// Load and validate settings, print them (secrets redacted) and exit
    #[arg(long)]
    pub check_config: bool,
}

impl Cli {
    pub fn log_config(&self) -> LogConfig {
        LogConfig {
            level: self.log_level.clone(),
            format: self.log_format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_is_well_formed() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_defaults() {
        let cli = temp_env::with_vars_unset(["LOG_LEVEL", "LOG_FORMAT"], || {
            Cli::try_parse_from(["project"]).unwrap()
        });
        assert_eq!(cli.log_level, "INFO");
        assert_eq!(cli.log_format, LogFormat::Pretty);
        assert!(!cli.check_config);
    }

    #[test]
    fn test_log_level_from_env() {
        let cli = temp_env::with_var("LOG_LEVEL", Some("DEBUG"), || {
            Cli::try_parse_from(["project", "--check-config"]).unwrap()
        });
        assert_eq!(cli.log_config().level, "DEBUG");
        assert!(cli.check_config);
    }

    #[test]
    fn test_log_format_flag() {
        let cli = Cli::try_parse_from(["project", "--log-format", "json"]).unwrap();
        assert_eq!(cli.log_config().format, LogFormat::Json);
    }
}
