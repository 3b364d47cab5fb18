//! Environment snapshots as figment providers
//!
//! An [`EnvSource`] is one layer of the effective environment: the process
//! variables, a dotenv file, or an explicit set of pairs. The loader merges
//! them in order, later layers winning key by key.

use figment::value::{Dict, Map, Value};
use figment::{Error, Metadata, Profile, Provider};
use std::collections::BTreeMap;
use std::io;
use std::path::Path;
use tracing::warn;

use super::resolver::expand_records;
use crate::domain::models::FieldSpec;

/// Flat key-value snapshot of an environment, usable as a figment provider
///
/// Keys are matched case-insensitively: the provider lowercases every key and
/// strips the configured prefix. Keys that do not carry the prefix are
/// dropped. Values are strings, except where a record schema is attached and
/// a record was given as a JSON object; typing happens in the schema pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnvSource {
    name: String,
    vars: BTreeMap<String, String>,
    prefix: String,
    records: &'static [FieldSpec],
    delimiter: String,
}

impl EnvSource {
    /// Build a source from explicit pairs
    pub fn from_pairs<I, K, V>(name: impl Into<String>, pairs: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            name: name.into(),
            vars: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            prefix: String::new(),
            records: &[],
            delimiter: String::new(),
        }
    }

    /// Snapshot the process environment
    ///
    /// Variables whose name or value is not valid UTF-8 are skipped.
    pub fn from_process() -> Self {
        let pairs = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)));
        Self::from_pairs("process environment", pairs)
    }

    /// Read a dotenv file
    ///
    /// Returns `Ok(None)` when the file does not exist. Lines that cannot be
    /// parsed are skipped with a warning; I/O failures are returned.
    pub fn from_env_file(path: &Path) -> Result<Option<Self>, dotenvy::Error> {
        let iter = match dotenvy::from_path_iter(path) {
            Ok(iter) => iter,
            Err(dotenvy::Error::Io(err)) if err.kind() == io::ErrorKind::NotFound => {
                return Ok(None)
            }
            Err(err) => return Err(err),
        };

        let mut vars = BTreeMap::new();
        for item in iter {
            match item {
                Ok((key, value)) => {
                    vars.insert(key, value);
                }
                // The line itself may hold a secret, so only its position is logged
                Err(dotenvy::Error::LineParse(_, position)) => {
                    warn!(path = %path.display(), position, "Skipping unparseable line in env file");
                }
                Err(err) => return Err(err),
            }
        }

        Ok(Some(Self::from_pairs(format!("env file {}", path.display()), vars)))
    }

    /// Only keep keys starting with `prefix` (case-insensitive), stripped of it
    #[must_use]
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into().to_lowercase();
        self
    }

    /// Expand JSON-object values of the records in `fields` into delimited keys
    ///
    /// Done per source so that a later source overrides field by field,
    /// however the earlier one spelled the record.
    #[must_use]
    pub fn with_schema(mut self, fields: &'static [FieldSpec], delimiter: impl Into<String>) -> Self {
        self.records = fields;
        self.delimiter = delimiter.into().to_lowercase();
        self
    }

    /// Human readable origin, reported as figment metadata
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Number of raw variables in the snapshot, before prefix filtering
    pub fn len(&self) -> usize {
        self.vars.len()
    }

    /// Whether the snapshot holds no variables at all
    pub fn is_empty(&self) -> bool {
        self.vars.is_empty()
    }

    /// Lowercased, prefix-stripped keys with their raw values
    pub fn normalized(&self) -> impl Iterator<Item = (String, &str)> + '_ {
        self.vars.iter().filter_map(move |(key, value)| {
            let key = key.to_lowercase();
            let key = key.strip_prefix(self.prefix.as_str())?;
            if key.is_empty() {
                return None;
            }
            Some((key.to_string(), value.as_str()))
        })
    }
}

impl Provider for EnvSource {
    fn metadata(&self) -> Metadata {
        Metadata::named(self.name.clone())
    }

    fn data(&self) -> Result<Map<Profile, Dict>, Error> {
        let mut dict: Dict = self
            .normalized()
            .map(|(key, value)| (key, Value::from(value.to_string())))
            .collect();
        expand_records(&mut dict, self.records, &self.delimiter);
        Ok(Profile::Default.collect(dict))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::{Settings, SettingsSchema};
    use figment::Figment;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_keys_are_lowercased() {
        let source = EnvSource::from_pairs("test", [("EXAMPLE_ENVVAR", "value")]);
        let keys: Vec<_> = source.normalized().map(|(k, _)| k).collect();
        assert_eq!(keys, ["example_envvar"]);
    }

    #[test]
    fn test_prefix_filters_and_strips() {
        let source = EnvSource::from_pairs(
            "test",
            [("APP_EXAMPLE_ENVVAR", "a"), ("OTHER_VAR", "b"), ("APP_", "c")],
        )
        .with_prefix("app_");

        let pairs: Vec<_> = source.normalized().collect();
        assert_eq!(pairs, [("example_envvar".to_string(), "a")]);
    }

    #[test]
    fn test_later_merge_wins() {
        let file = EnvSource::from_pairs("file", [("EXAMPLE_ENVVAR", "from-file"), ("ONLY_FILE", "1")]);
        let process = EnvSource::from_pairs("process", [("example_envvar", "from-process")]);

        let dict: Dict = Figment::new().merge(file).merge(process).extract().unwrap();

        assert_eq!(dict["example_envvar"].as_str(), Some("from-process"));
        assert_eq!(dict["only_file"].as_str(), Some("1"));
    }

    #[test]
    fn test_missing_env_file_is_none() {
        let dir = tempfile::tempdir().unwrap();
        let result = EnvSource::from_env_file(&dir.path().join(".env")).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn test_env_file_is_parsed() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "# comment\nEXAMPLE_ENVVAR=secret\nNESTED__SOME_NESTED_ENVVAR=\"quoted value\"").unwrap();
        file.flush().unwrap();

        let source = EnvSource::from_env_file(file.path()).unwrap().unwrap();
        let pairs: BTreeMap<_, _> = source.normalized().collect();

        assert_eq!(source.len(), 2);
        assert_eq!(pairs["example_envvar"], "secret");
        assert_eq!(pairs["nested__some_nested_envvar"], "quoted value");
    }

    #[test]
    fn test_unparseable_line_is_skipped() {
        let mut file = NamedTempFile::new().unwrap();
        writeln!(file, "EXAMPLE_ENVVAR=secret\nthis line is not valid\nSOME_EXAMPLE_VAR=3").unwrap();
        file.flush().unwrap();

        let source = EnvSource::from_env_file(file.path()).unwrap().unwrap();
        let pairs: BTreeMap<_, _> = source.normalized().collect();

        assert_eq!(source.len(), 2);
        assert_eq!(pairs["example_envvar"], "secret");
        assert_eq!(pairs["some_example_var"], "3");
    }

    #[test]
    fn test_env_file_io_error_is_returned() {
        let dir = tempfile::tempdir().unwrap();
        assert!(EnvSource::from_env_file(dir.path()).is_err());
    }

    #[test]
    fn test_json_record_is_expanded_per_source() {
        let file = EnvSource::from_pairs("file", [("NESTED__SOME_NESTED_ENVVAR", "from-file")])
            .with_schema(Settings::FIELDS, "__");
        let process = EnvSource::from_pairs(
            "process",
            [("NESTED", r#"{"some_nested_envvar": "from-process"}"#)],
        )
        .with_schema(Settings::FIELDS, "__");

        let dict: Dict = Figment::new().merge(file).merge(process).extract().unwrap();

        assert_eq!(dict["nested__some_nested_envvar"].as_str(), Some("from-process"));
        assert!(!dict.contains_key("nested"));
    }

    #[test]
    fn test_without_schema_json_stays_raw() {
        let source = EnvSource::from_pairs("test", [("NESTED", r#"{"a": 1}"#)]);
        let dict: Dict = Figment::from(source).extract().unwrap();
        assert_eq!(dict["nested"].as_str(), Some(r#"{"a": 1}"#));
    }
}
