//! Schema pass over a merged environment
//!
//! Walks a record's field table, looks every field up in the flat
//! environment, coerces it and applies defaults. All failures are collected
//! so the caller sees every bad field at once.
//!
//! A nested record may be supplied whole as a JSON object under its own key.
//! [`expand_records`] rewrites such objects into delimited keys; sources call
//! it before they are merged, so a later source always wins field by field.

use figment::value::{Dict, Empty, Tag, Value};
use serde_json::Value as JsonValue;

use crate::domain::error::{ConfigValidationError, FieldError, FieldErrorKind};
use crate::domain::models::{DefaultValue, FieldKind, FieldSpec};

type JsonObject = serde_json::Map<String, JsonValue>;

/// Resolve `fields` against `env`, producing a dictionary ready to deserialize
///
/// `env` keys must already be lowercased. Nested fields are looked up by
/// joining their path with `delimiter`.
pub fn resolve(
    schema: &'static str,
    fields: &[FieldSpec],
    env: &Dict,
    delimiter: &str,
) -> Result<Dict, ConfigValidationError> {
    let delimiter = delimiter.to_lowercase();
    let mut env = env.clone();
    expand_records(&mut env, fields, &delimiter);

    let mut resolver = Resolver {
        env: &env,
        delimiter,
        errors: Vec::new(),
    };

    let resolved = resolver.record(fields, &[], 0);

    if resolver.errors.is_empty() {
        Ok(resolved)
    } else {
        Err(ConfigValidationError::new(schema, resolver.errors))
    }
}

/// Replace JSON-object values of record fields with delimited leaf keys
///
/// Keys already present in `env` win over the JSON fields. Values that are not
/// a JSON object are left in place for the schema pass to report.
pub fn expand_records(env: &mut Dict, fields: &[FieldSpec], delimiter: &str) {
    expand_at(env, fields, &[], delimiter);
}

fn expand_at(env: &mut Dict, fields: &[FieldSpec], parent: &[String], delimiter: &str) {
    for field in fields {
        let FieldKind::Record(nested) = field.kind else {
            continue;
        };

        let mut path = parent.to_vec();
        path.push(field.name.to_string());
        let key = path.join(delimiter);

        let object = match env.get(&key) {
            Some(Value::String(_, raw)) => match serde_json::from_str::<JsonValue>(raw) {
                Ok(JsonValue::Object(object)) => Some(object),
                _ => None,
            },
            _ => None,
        };

        if let Some(object) = object {
            env.remove(&key);
            flatten(env, nested, &path, &object, delimiter);
        }

        expand_at(env, nested, &path, delimiter);
    }
}

fn flatten(
    env: &mut Dict,
    fields: &[FieldSpec],
    parent: &[String],
    object: &JsonObject,
    delimiter: &str,
) {
    for field in fields {
        let Some(value) = object.get(field.name) else {
            continue;
        };

        let mut path = parent.to_vec();
        path.push(field.name.to_string());

        match (field.kind, value) {
            (FieldKind::Record(nested), JsonValue::Object(inner)) => {
                flatten(env, nested, &path, inner, delimiter);
            }
            _ => {
                env.entry(path.join(delimiter))
                    .or_insert_with(|| json_to_value(value));
            }
        }
    }
}

fn json_to_value(value: &JsonValue) -> Value {
    match value {
        JsonValue::Null => Value::Empty(Tag::Default, Empty::None),
        JsonValue::Bool(b) => Value::from(*b),
        JsonValue::Number(n) => match n.as_i64() {
            Some(i) => Value::from(i),
            None => Value::from(n.as_f64().unwrap_or(f64::NAN)),
        },
        JsonValue::String(s) => Value::from(s.clone()),
        JsonValue::Array(items) => Value::Array(Tag::Default, items.iter().map(json_to_value).collect()),
        JsonValue::Object(object) => Value::Dict(
            Tag::Default,
            object
                .iter()
                .map(|(k, v)| (k.clone(), json_to_value(v)))
                .collect(),
        ),
    }
}

struct Resolver<'a> {
    env: &'a Dict,
    delimiter: String,
    errors: Vec<FieldError>,
}

impl Resolver<'_> {
    fn record(&mut self, fields: &[FieldSpec], parent: &[String], record_start: usize) -> Dict {
        let mut out = Dict::new();

        for field in fields {
            let mut path = parent.to_vec();
            path.push(field.name.to_string());
            let key = path.join(&self.delimiter);

            if let FieldKind::Record(nested) = field.kind {
                // A value left under the record's own key is not a JSON object
                if let Some(value) = self.env.get(&key) {
                    self.fail(path, record_start, field.kind, record_error(value));
                    continue;
                }

                let child_start = path.len();
                let value = self.record(nested, &path, child_start);
                out.insert(field.name.to_string(), Value::Dict(Tag::Default, value));
                continue;
            }

            let value = match (self.env.get(&key), field.default) {
                (Some(raw), _) => match coerce(field.kind, raw) {
                    Ok(value) => value,
                    Err(detail) => {
                        self.fail(path, record_start, field.kind, detail);
                        continue;
                    }
                },
                (None, Some(default)) => default_value(default),
                (None, None) => {
                    self.errors
                        .push(FieldError::new(path, record_start, FieldErrorKind::Missing));
                    continue;
                }
            };

            out.insert(field.name.to_string(), value);
        }

        out
    }

    fn fail(&mut self, path: Vec<String>, record_start: usize, kind: FieldKind, detail: String) {
        self.errors.push(FieldError::new(
            path,
            record_start,
            FieldErrorKind::TypeCoercion {
                expected: kind.type_name(),
                detail,
            },
        ));
    }
}

fn coerce(kind: FieldKind, value: &Value) -> Result<Value, String> {
    match (kind, value) {
        (FieldKind::Integer, Value::String(_, s)) => parse_integer(s).map(Value::from),
        (FieldKind::Integer, Value::Num(_, n)) => n
            .to_i128()
            .and_then(|n| i64::try_from(n).ok())
            .map(Value::from)
            .ok_or_else(|| "number is not a 64-bit integer".to_string()),
        (FieldKind::String | FieldKind::Secret, Value::String(_, s)) => Ok(Value::from(s.clone())),
        (FieldKind::Record(_), _) => Err("nested records are resolved separately".to_string()),
        (_, other) => Err(format!("got {}", value_type(other))),
    }
}

fn parse_integer(raw: &str) -> Result<i64, String> {
    raw.trim().parse::<i64>().map_err(|e| e.to_string())
}

fn record_error(value: &Value) -> String {
    let Value::String(_, raw) = value else {
        return format!("expected a JSON object, got {}", value_type(value));
    };
    match serde_json::from_str::<JsonValue>(raw) {
        Ok(other) => format!("expected a JSON object, got JSON {}", json_type(&other)),
        Err(e) => format!("invalid JSON: {e}"),
    }
}

const fn value_type(value: &Value) -> &'static str {
    match value {
        Value::String(..) => "string",
        Value::Char(..) => "char",
        Value::Bool(..) => "bool",
        Value::Num(..) => "number",
        Value::Empty(..) => "null",
        Value::Dict(..) => "object",
        Value::Array(..) => "array",
    }
}

const fn json_type(value: &JsonValue) -> &'static str {
    match value {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

fn default_value(default: DefaultValue) -> Value {
    match default {
        DefaultValue::Integer(n) => Value::from(n),
    }
}
