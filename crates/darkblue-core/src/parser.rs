//! Configuration document loading and validation.

use std::collections::HashSet;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::Value;

use crate::engine::{check_header, evaluate};
use crate::model::{Category, ConfigurationDocument, Entry, Os};

/// Parse a configuration document from a JSON file.
pub fn parse_document(path: &Path) -> Result<ConfigurationDocument> {
    let content = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read document: {}", path.display()))?;

    parse_document_str(&content, path)
}

/// Parse a JSON string into a `ConfigurationDocument` (useful for testing).
pub fn parse_document_str(content: &str, source_path: &Path) -> Result<ConfigurationDocument> {
    let raw: Value = serde_json::from_str(content)
        .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?;
    let mut document: ConfigurationDocument = serde_json::from_value(raw.clone())
        .with_context(|| format!("failed to parse JSON: {}", source_path.display()))?;

    for category in Category::ALL {
        if !has_list(&document, category) {
            tracing::debug!(%category, "category not present in {}", source_path.display());
            keep_unreadable_list(&mut document, &raw, category);
        }
    }

    Ok(document)
}

/// A category value that could not be read as a list is kept as-is so that
/// saving the document writes it back unchanged.
fn keep_unreadable_list(document: &mut ConfigurationDocument, raw: &Value, category: Category) {
    for &key in category.keys() {
        if let Some(value) = raw.get(key).filter(|v| !v.is_null()) {
            document.extra.insert(key.to_string(), value.clone());
        }
    }
}

fn has_list(document: &ConfigurationDocument, category: Category) -> bool {
    // Users are read the same way on both platforms for presence checks.
    document.entries(category, Os::Linux).is_some()
}

/// A warning from document validation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationWarning {
    /// The category the warning concerns (if applicable).
    pub category: Option<Category>,
    /// The entry identity (if applicable).
    pub entry: Option<String>,
    /// Warning message.
    pub message: String,
}

impl ValidationWarning {
    fn document(message: impl Into<String>) -> Self {
        Self {
            category: None,
            entry: None,
            message: message.into(),
        }
    }

    fn entry(category: Category, entry: &Entry<'_>, message: impl Into<String>) -> Self {
        Self {
            category: Some(category),
            entry: Some(entry.identity().to_string()),
            message: message.into(),
        }
    }
}

/// Validate a document for common authoring mistakes.
///
/// None of these stop an answer key from being generated except a bad format
/// marker or platform, which are reported first and end validation.
pub fn validate_document(document: &ConfigurationDocument) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    let os = match check_header(document) {
        Ok(os) => os,
        Err(e) => {
            warnings.push(ValidationWarning::document(e.to_string()));
            return warnings;
        }
    };

    for category in Category::ALL {
        if !category.applies_to(os) && has_list(document, category) {
            let count = document
                .entries(category, os)
                .map(|entries| entries.len())
                .unwrap_or(0);
            if count > 0 {
                warnings.push(ValidationWarning {
                    category: Some(category),
                    entry: None,
                    message: format!("{count} {category} entries are ignored on {os} images"),
                });
            }
        }
    }

    for &category in Category::evaluation_order(os) {
        let Some(entries) = document.entries(category, os) else {
            continue;
        };

        // Duplicates are scored independently, which is rarely intended.
        let mut seen = HashSet::new();
        for entry in &entries {
            let identity = entry.identity();
            if identity.trim().is_empty() {
                warnings.push(ValidationWarning::entry(category, entry, "entry has no name"));
            } else if !seen.insert(identity) {
                warnings.push(ValidationWarning::entry(
                    category,
                    entry,
                    format!("duplicate entry: {identity}"),
                ));
            }
        }

        for entry in &entries {
            warnings.extend(check_entry(category, entry));
        }
    }

    if let Ok(evaluation) = evaluate(document) {
        if evaluation.total_scored > document.score {
            warnings.push(ValidationWarning::document(format!(
                "score is {} but the answer key awards {} points",
                document.score, evaluation.total_scored
            )));
        }
    }

    warnings
}

fn check_entry(category: Category, entry: &Entry<'_>) -> Vec<ValidationWarning> {
    let mut warnings = Vec::new();

    if entry.positive_points() <= 0 && !matches!(entry, Entry::Question(_)) {
        warnings.push(ValidationWarning::entry(
            category,
            entry,
            "positive_points is not greater than zero",
        ));
    }
    if entry.negative_points() != 0 {
        warnings.push(ValidationWarning::entry(
            category,
            entry,
            "negative_points is recorded but never deducted",
        ));
    }

    match entry {
        Entry::Question(q) => {
            if q.answer.is_none() || q.points.is_none() {
                warnings.push(ValidationWarning::entry(
                    category,
                    entry,
                    "question is missing an answer or points and will not be scored",
                ));
            }
        }
        Entry::Service(s) => {
            for (field, raw, parsed) in [
                ("default_state", &s.default_state, s.default_state()),
                ("desired_state", &s.desired_state, s.desired_state()),
            ] {
                if parsed.is_none() {
                    warnings.push(ValidationWarning::entry(
                        category,
                        entry,
                        format!("{field} {raw:?} is not Running or Stopped"),
                    ));
                }
            }
        }
        Entry::RegistryEntry(r) => {
            if !r.negative_value.is_empty() || !r.negative_message.is_empty() {
                warnings.push(ValidationWarning::entry(
                    category,
                    entry,
                    "negative_value and negative_message are not scored",
                ));
            }
        }
        Entry::ConfigFile(c) => {
            if !c.negative_value.is_empty() || !c.negative_message.is_empty() {
                warnings.push(ValidationWarning::entry(
                    category,
                    entry,
                    "negative_value and negative_message are not scored",
                ));
            }
        }
        Entry::Filepath(_)
        | Entry::LinuxUser(_)
        | Entry::WindowsUser(_)
        | Entry::Process(_)
        | Entry::Program(_)
        | Entry::Package(_)
        | Entry::FirewallProfile(_) => {}
    }

    warnings
}
