//! Application settings records
//!
//! [`Settings`] is the top-level record; [`NestedSettings`] is reached through
//! its `nested` field or loaded on its own. Both are immutable once built.

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use super::schema::{DefaultValue, FieldKind, FieldSpec, SettingsSchema};
use super::secret::{deserialize_secret, serialize_redacted};

const fn default_some_example_var() -> i64 {
    5
}

/// Application settings
///
/// Populated from environment variables and an optional `.env` file.
/// Nested fields use the `__` delimiter, e.g. `NESTED__SOME_NESTED_ENVVAR`.
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Settings {
    /// Some value (`SOME_EXAMPLE_VAR`, default 5)
    #[serde(default = "default_some_example_var")]
    some_example_var: i64,

    /// Example of a secret variable (`EXAMPLE_ENVVAR`)
    #[serde(serialize_with = "serialize_redacted", deserialize_with = "deserialize_secret")]
    example_envvar: SecretString,

    /// Nested variables (`NESTED__*`)
    nested: NestedSettings,
}

impl Settings {
    /// Value of `SOME_EXAMPLE_VAR`, or 5 when unset
    pub const fn some_example_var(&self) -> i64 {
        self.some_example_var
    }

    /// The secret value, still wrapped; read it with [`secrecy::ExposeSecret`]
    pub const fn example_envvar(&self) -> &SecretString {
        &self.example_envvar
    }

    /// The `NESTED__*` record
    pub const fn nested(&self) -> &NestedSettings {
        &self.nested
    }
}

impl SettingsSchema for Settings {
    const NAME: &'static str = "Settings";

    const FIELDS: &'static [FieldSpec] = &[
        FieldSpec::optional(
            "some_example_var",
            FieldKind::Integer,
            DefaultValue::Integer(default_some_example_var()),
        ),
        FieldSpec::required("example_envvar", FieldKind::Secret),
        FieldSpec::required("nested", FieldKind::Record(NestedSettings::FIELDS)),
    ];
}

/// Nested settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct NestedSettings {
    /// Example of a nested variable (`NESTED__SOME_NESTED_ENVVAR`)
    some_nested_envvar: String,
}

impl NestedSettings {
    /// Value of `NESTED__SOME_NESTED_ENVVAR`
    pub fn some_nested_envvar(&self) -> &str {
        &self.some_nested_envvar
    }
}

impl SettingsSchema for NestedSettings {
    const NAME: &'static str = "NestedSettings";

    const FIELDS: &'static [FieldSpec] =
        &[FieldSpec::required("some_nested_envvar", FieldKind::String)];
}
