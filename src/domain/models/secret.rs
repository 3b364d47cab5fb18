//! Serde glue for [`secrecy::SecretString`] fields
//!
//! `secrecy` keeps the value out of `Debug` output and zeroizes it on drop.
//! These helpers add the two serde halves settings records need: reading the
//! raw string, and writing [`REDACTED`] in its place.

use secrecy::SecretString;
use serde::{Deserialize, Deserializer, Serializer};

/// Placeholder written wherever a secret would otherwise be serialized
pub const REDACTED: &str = "**********";

/// `serialize_with` helper that never emits the wrapped value
pub fn serialize_redacted<S: Serializer>(_: &SecretString, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_str(REDACTED)
}

/// `deserialize_with` helper reading a plain string into a secret
pub fn deserialize_secret<'de, D: Deserializer<'de>>(deserializer: D) -> Result<SecretString, D::Error> {
    String::deserialize(deserializer).map(SecretString::from)
}
