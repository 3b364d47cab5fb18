pub mod schema;
pub mod secret;
pub mod settings;

pub use schema::{DefaultValue, FieldKind, FieldSpec, SettingsSchema};
pub use secret::REDACTED;
pub use settings::{NestedSettings, Settings};
