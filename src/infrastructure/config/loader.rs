//! Settings loader
//!
//! Gathers the environment layers, merges them with figment, then runs the
//! schema pass and deserializes the result. Validation failures are logged
//! field by field and returned as one aggregated error.

use figment::value::{Dict, Tag, Value};
use figment::Figment;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use super::resolver::resolve;
use super::sources::EnvSource;
use crate::domain::error::ConfigValidationError;
use crate::domain::models::{Settings, SettingsSchema};

/// Dotenv file read by default, relative to the working directory
pub const DEFAULT_ENV_FILE: &str = ".env";

/// Separator between a record name and its field in variable names
pub const DEFAULT_NESTED_DELIMITER: &str = "__";

/// Configuration error types
#[derive(Error, Debug)]
pub enum ConfigError {
    /// One or more fields were missing or could not be coerced
    #[error(transparent)]
    Validation(#[from] ConfigValidationError),

    /// The dotenv file exists but could not be read
    #[error("Failed to read env file {}: {source}", path.display())]
    EnvFile {
        /// File that failed
        path: PathBuf,
        /// Underlying dotenv error
        source: dotenvy::Error,
    },

    /// The merged environment could not be turned into the record
    #[error("Failed to extract configuration: {0}")]
    Extraction(Box<figment::Error>),
}

impl ConfigError {
    /// The aggregated field errors, if this is a validation failure
    pub const fn validation(&self) -> Option<&ConfigValidationError> {
        match self {
            Self::Validation(err) => Some(err),
            _ => None,
        }
    }
}

impl From<figment::Error> for ConfigError {
    fn from(err: figment::Error) -> Self {
        Self::Extraction(Box::new(err))
    }
}

/// Settings loader with layered environment sources
///
/// Precedence (lowest to highest):
/// 1. Schema defaults
/// 2. `.env` file (optional, skipped when absent)
/// 3. Process environment variables
#[derive(Debug, Clone)]
pub struct SettingsLoader {
    env_file: Option<PathBuf>,
    prefix: String,
    delimiter: String,
}

impl Default for SettingsLoader {
    fn default() -> Self {
        Self {
            env_file: Some(PathBuf::from(DEFAULT_ENV_FILE)),
            prefix: String::new(),
            delimiter: DEFAULT_NESTED_DELIMITER.to_string(),
        }
    }
}

impl SettingsLoader {
    /// Loader reading `.env` and the process environment, no prefix, `__` nesting
    pub fn new() -> Self {
        Self::default()
    }

    /// Read dotenv pairs from `path` instead of `.env`
    #[must_use]
    pub fn env_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.env_file = Some(path.into());
        self
    }

    /// Do not read any dotenv file
    #[must_use]
    pub fn without_env_file(mut self) -> Self {
        self.env_file = None;
        self
    }

    /// Only consider variables starting with `prefix` (case-insensitive)
    #[must_use]
    pub fn prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Separator for nested fields, `__` by default
    #[must_use]
    pub fn delimiter(mut self, delimiter: impl Into<String>) -> Self {
        self.delimiter = delimiter.into();
        self
    }

    /// Load a record from the dotenv file and the process environment
    pub fn load<T: SettingsSchema>(&self) -> Result<T, ConfigError> {
        let mut sources = Vec::with_capacity(2);

        if let Some(path) = &self.env_file {
            if let Some(source) = read_env_file(path)? {
                sources.push(source);
            }
        }
        sources.push(EnvSource::from_process());

        self.load_from(sources)
    }

    /// Load a record from explicit sources; later sources win on conflict
    pub fn load_from<T, I>(&self, sources: I) -> Result<T, ConfigError>
    where
        T: SettingsSchema,
        I: IntoIterator<Item = EnvSource>,
    {
        let figment = sources.into_iter().fold(Figment::new(), |figment, source| {
            debug!(source = source.name(), vars = source.len(), "Merging environment source");
            figment.merge(
                source
                    .with_prefix(self.prefix.as_str())
                    .with_schema(T::FIELDS, self.delimiter.as_str()),
            )
        });

        let env: Dict = figment.extract()?;

        let resolved = resolve(T::NAME, T::FIELDS, &env, &self.delimiter).inspect_err(|err| {
            for field in err.errors() {
                warn!(
                    schema = T::NAME,
                    field = %field.path().join("."),
                    reason = field.kind().reason(),
                    "Invalid setting"
                );
            }
        })?;

        let settings = Value::Dict(Tag::Default, resolved).deserialize::<T>()?;
        debug!(schema = T::NAME, "Settings loaded");
        Ok(settings)
    }
}

fn read_env_file(path: &Path) -> Result<Option<EnvSource>, ConfigError> {
    match EnvSource::from_env_file(path) {
        Ok(Some(source)) => {
            debug!(path = %path.display(), vars = source.len(), "Read env file");
            Ok(Some(source))
        }
        Ok(None) => {
            debug!(path = %path.display(), "No env file found");
            Ok(None)
        }
        Err(source) => Err(ConfigError::EnvFile {
            path: path.to_path_buf(),
            source,
        }),
    }
}

impl Settings {
    /// Load settings from `.env` and the process environment
    pub fn load() -> Result<Self, ConfigError> {
        SettingsLoader::new().load()
    }
}
