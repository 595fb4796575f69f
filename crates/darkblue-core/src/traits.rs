//! Storage seams for configuration documents.
//!
//! The evaluator only ever sees an in-memory [`ConfigurationDocument`]; these
//! traits are how the surrounding tooling reads and writes it.

use serde_json::Value;

use crate::model::ConfigurationDocument;

/// Whole-document persistence.
pub trait DocumentRepository {
    /// Load the full document.
    fn load(&self) -> anyhow::Result<ConfigurationDocument>;

    /// Replace the stored document with `document`.
    fn save(&self, document: &ConfigurationDocument) -> anyhow::Result<()>;
}

/// Untyped access to individual top-level attributes.
pub trait AttributeStore {
    /// Read one attribute. `Ok(None)` when the attribute is absent.
    fn get_attribute(&self, name: &str) -> anyhow::Result<Option<Value>>;

    /// Write one attribute, leaving the rest of the document untouched.
    fn set_attribute(&self, name: &str, value: Value) -> anyhow::Result<()>;
}
