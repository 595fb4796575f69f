//! JSON file storage for configuration documents.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::model::ConfigurationDocument;
use crate::parser::parse_document_str;
use crate::traits::{AttributeStore, DocumentRepository};

/// A configuration document stored as one JSON file.
#[derive(Debug, Clone)]
pub struct JsonFileRepository {
    path: PathBuf,
}

impl JsonFileRepository {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_object(&self) -> Result<Map<String, Value>> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read document: {}", self.path.display()))?;
        match serde_json::from_str::<Value>(&content)
            .with_context(|| format!("failed to parse JSON: {}", self.path.display()))?
        {
            Value::Object(map) => Ok(map),
            other => anyhow::bail!(
                "{} does not hold a JSON object (found {})",
                self.path.display(),
                json_kind(&other)
            ),
        }
    }

    fn write_value(&self, value: &impl serde::Serialize) -> Result<()> {
        let json = serde_json::to_string_pretty(value).context("failed to serialize document")?;
        write_atomic(&self.path, json.as_bytes())
    }
}

impl DocumentRepository for JsonFileRepository {
    fn load(&self) -> Result<ConfigurationDocument> {
        let content = std::fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read document: {}", self.path.display()))?;
        parse_document_str(&content, &self.path)
    }

    fn save(&self, document: &ConfigurationDocument) -> Result<()> {
        self.write_value(document)?;
        tracing::debug!(path = %self.path.display(), "document saved");
        Ok(())
    }
}

impl AttributeStore for JsonFileRepository {
    fn get_attribute(&self, name: &str) -> Result<Option<Value>> {
        Ok(self.read_object()?.remove(name))
    }

    fn set_attribute(&self, name: &str, value: Value) -> Result<()> {
        let mut object = self.read_object()?;
        object.insert(name.to_string(), value);
        self.write_value(&object)?;
        tracing::debug!(path = %self.path.display(), attribute = name, "attribute updated");
        Ok(())
    }
}

/// Replace `path` with `contents` via a temporary file in the same directory,
/// so readers never observe a partially written file.
pub fn write_atomic(path: &Path, contents: &[u8]) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir)
        .with_context(|| format!("failed to create directory: {}", dir.display()))?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir)
        .with_context(|| format!("failed to create temporary file in {}", dir.display()))?;
    tmp.write_all(contents)
        .with_context(|| format!("failed to write {}", path.display()))?;
    tmp.as_file().sync_all()?;
    tmp.persist(path)
        .with_context(|| format!("failed to replace {}", path.display()))?;
    Ok(())
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
