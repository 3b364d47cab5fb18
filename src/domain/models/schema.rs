//! Declarative description of a settings record
//!
//! A record lists its fields once as a static [`FieldSpec`] table. The loader
//! walks that table to locate, coerce and default every value before the
//! record itself is deserialized.

use serde::de::DeserializeOwned;

/// Declared type of a settings field
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Base-10 signed 64-bit integer
    Integer,
    /// Plain string, passed through verbatim
    String,
    /// String that is wrapped in a redacting container
    Secret,
    /// Nested record with its own field table
    Record(&'static [FieldSpec]),
}

impl FieldKind {
    /// Human readable type name used in coercion errors
    pub const fn type_name(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::String | Self::Secret => "string",
            Self::Record(_) => "object",
        }
    }
}

/// Default applied when an optional field has no value
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DefaultValue {
    /// Default for an [`FieldKind::Integer`] field
    Integer(i64),
}

/// One declared field of a settings record
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldSpec {
    /// Field name, lowercase snake case
    pub name: &'static str,
    /// Declared type
    pub kind: FieldKind,
    /// Default used when no value is supplied; `None` makes the field required
    pub default: Option<DefaultValue>,
}

impl FieldSpec {
    /// Declare a field with no default
    pub const fn required(name: &'static str, kind: FieldKind) -> Self {
        Self {
            name,
            kind,
            default: None,
        }
    }

    /// Declare a field that falls back to `default`
    pub const fn optional(name: &'static str, kind: FieldKind, default: DefaultValue) -> Self {
        Self {
            name,
            kind,
            default: Some(default),
        }
    }
}

/// A settings record that can be populated from a key-value environment
pub trait SettingsSchema: DeserializeOwned {
    /// Record name reported in validation errors
    const NAME: &'static str;

    /// Field table for this record
    const FIELDS: &'static [FieldSpec];
}
