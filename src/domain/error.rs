use std::fmt;
use thiserror::Error;

/// Why a single field failed validation
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FieldErrorKind {
    #[error("field required")]
    Missing,

    /// Carries no raw input, only the parser message
    #[error("input should be a valid {expected}: {detail}")]
    TypeCoercion {
        expected: &'static str,
        detail: String,
    },
}

impl FieldErrorKind {
    /// Machine readable reason: `missing` or `type_coercion`
    pub const fn reason(&self) -> &'static str {
        match self {
            Self::Missing => "missing",
            Self::TypeCoercion { .. } => "type_coercion",
        }
    }
}

/// Failure of one field, tagged with where it lives
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}: {kind}", FieldPath(.path))]
pub struct FieldError {
    path: Vec<String>,
    /// Index into `path` where the declaring record begins
    record_start: usize,
    kind: FieldErrorKind,
}

impl FieldError {
    pub fn new(path: Vec<String>, record_start: usize, kind: FieldErrorKind) -> Self {
        let record_start = record_start.min(path.len().saturating_sub(1));
        Self {
            path,
            record_start,
            kind,
        }
    }

    /// Full path from the root record, e.g. `["nested", "some_nested_envvar"]`
    pub fn path(&self) -> &[String] {
        &self.path
    }

    /// Path relative to the record declaring the field, e.g. `["some_nested_envvar"]`
    pub fn location(&self) -> &[String] {
        &self.path[self.record_start..]
    }

    pub const fn kind(&self) -> &FieldErrorKind {
        &self.kind
    }

    pub const fn is_missing(&self) -> bool {
        matches!(self.kind, FieldErrorKind::Missing)
    }

    pub const fn is_type_error(&self) -> bool {
        matches!(self.kind, FieldErrorKind::TypeCoercion { .. })
    }
}

/// Dotted rendering of a field path
struct FieldPath<'a>(&'a [String]);

impl fmt::Display for FieldPath<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.join("."))
    }
}

/// Every field that failed in one validation pass
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("{}", render_errors(.schema, .errors))]
pub struct ConfigValidationError {
    schema: &'static str,
    errors: Vec<FieldError>,
}

fn render_errors(schema: &str, errors: &[FieldError]) -> String {
    let plural = if errors.len() == 1 { "" } else { "s" };
    let mut rendered = format!("{} validation error{plural} for {schema}", errors.len());
    for error in errors {
        rendered.push_str("\n  ");
        rendered.push_str(&error.to_string());
    }
    rendered
}

impl ConfigValidationError {
    pub const fn new(schema: &'static str, errors: Vec<FieldError>) -> Self {
        Self { schema, errors }
    }

    /// Name of the record that failed to load
    pub const fn schema(&self) -> &'static str {
        self.schema
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.errors
    }

    pub fn len(&self) -> usize {
        self.errors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    /// First error reported at `location`
    pub fn at(&self, location: &[&str]) -> Option<&FieldError> {
        self.errors
            .iter()
            .find(|e| e.location().iter().map(String::as_str).eq(location.iter().copied()))
    }
}
