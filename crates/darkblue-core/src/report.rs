//! Answer-key reports with JSON persistence and change detection.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::engine::{evaluate, Evaluation, Finding};
use crate::error::EvaluationError;
use crate::model::ConfigurationDocument;
use crate::statistics::{compute_breakdown, CategoryBreakdown};
use crate::store::write_atomic;

/// A generated answer key.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerKey {
    /// Unique report identifier.
    pub id: Uuid,
    /// When the key was generated.
    pub created_at: DateTime<Utc>,
    /// Path of the document the key was generated from, if known.
    #[serde(default)]
    pub source: Option<String>,
    /// The evaluation result.
    pub evaluation: Evaluation,
    /// Per-category totals.
    pub breakdown: Vec<CategoryBreakdown>,
}

impl AnswerKey {
    /// Evaluate `document` and wrap the result. Fails without side effects
    /// when the document is rejected.
    pub fn generate(
        document: &ConfigurationDocument,
        source: Option<&Path>,
    ) -> Result<Self, EvaluationError> {
        let evaluation = evaluate(document)?;
        let breakdown = compute_breakdown(document, &evaluation);
        Ok(Self {
            id: Uuid::new_v4(),
            created_at: Utc::now(),
            source: source.map(|p| p.display().to_string()),
            evaluation,
            breakdown,
        })
    }

    /// The plain-text answer key.
    pub fn to_text(&self) -> String {
        self.evaluation.to_text()
    }

    /// Write the plain-text answer key, replacing any previous file.
    pub fn save_text(&self, path: &Path) -> Result<()> {
        write_atomic(path, self.to_text().as_bytes())
            .with_context(|| format!("failed to write answer key to {}", path.display()))
    }

    /// Save the key as JSON to a file.
    pub fn save_json(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self).context("failed to serialize answer key")?;
        write_atomic(path, json.as_bytes())
            .with_context(|| format!("failed to write answer key to {}", path.display()))
    }

    /// Load a key from a JSON file.
    pub fn load_json(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read answer key from {}", path.display()))?;
        let key: AnswerKey =
            serde_json::from_str(&content).context("failed to parse answer key JSON")?;
        Ok(key)
    }

    /// Compare this key against a baseline.
    ///
    /// Findings are matched as a multiset, so a finding listed twice in one
    /// key and once in the other counts as one change.
    pub fn compare(&self, baseline: &AnswerKey) -> KeyDiff {
        let mut remaining: HashMap<&Finding, usize> = HashMap::new();
        for f in &baseline.evaluation.findings {
            *remaining.entry(f).or_insert(0) += 1;
        }

        let mut added = Vec::new();
        let mut unchanged = 0usize;
        for f in &self.evaluation.findings {
            match remaining.get_mut(f) {
                Some(count) if *count > 0 => {
                    *count -= 1;
                    unchanged += 1;
                }
                _ => added.push(f.clone()),
            }
        }

        let mut removed = Vec::new();
        for f in &baseline.evaluation.findings {
            if let Some(count) = remaining.get_mut(f) {
                if *count > 0 {
                    *count -= 1;
                    removed.push(f.clone());
                }
            }
        }

        KeyDiff {
            baseline_total: baseline.evaluation.total_scored,
            current_total: self.evaluation.total_scored,
            baseline_possible: baseline.evaluation.possible_score,
            current_possible: self.evaluation.possible_score,
            added,
            removed,
            unchanged,
        }
    }
}

/// Result of comparing two answer keys.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyDiff {
    pub baseline_total: i64,
    pub current_total: i64,
    pub baseline_possible: i64,
    pub current_possible: i64,
    /// Findings only in the current key.
    pub added: Vec<Finding>,
    /// Findings only in the baseline key.
    pub removed: Vec<Finding>,
    /// Findings present in both.
    pub unchanged: usize,
}

impl KeyDiff {
    pub fn score_delta(&self) -> i64 {
        self.current_total - self.baseline_total
    }

    /// Returns true if the keys differ in findings or declared total.
    pub fn has_changes(&self) -> bool {
        !self.added.is_empty()
            || !self.removed.is_empty()
            || self.baseline_possible != self.current_possible
    }

    /// Format the diff as markdown.
    pub fn to_markdown(&self) -> String {
        let mut md = String::new();

        md.push_str(&format!(
            "**Summary:** {} added, {} removed, {} unchanged; score {}/{} -> {}/{} ({:+})\n\n",
            self.added.len(),
            self.removed.len(),
            self.unchanged,
            self.baseline_total,
            self.baseline_possible,
            self.current_total,
            self.current_possible,
            self.score_delta()
        ));

        for (title, findings) in [("Added", &self.added), ("Removed", &self.removed)] {
            if findings.is_empty() {
                continue;
            }
            md.push_str(&format!("### {title}\n\n"));
            md.push_str("| Category | Points | Finding |\n");
            md.push_str("|----------|--------|---------|\n");
            for f in findings {
                md.push_str(&format!(
                    "| {} | {} | {} |\n",
                    f.category.label(),
                    f.points,
                    f.message.replace('|', "\\|")
                ));
            }
            md.push('\n');
        }

        md
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::*;

    fn document(users: Vec<User>) -> ConfigurationDocument {
        ConfigurationDocument {
            score: 30,
            users: Some(users),
            ..ConfigurationDocument::new(Os::Linux)
        }
    }

    fn removed_user(name: &str, points: i64) -> User {
        User {
            name: name.into(),
            allowed: false,
            positive_points: points,
            ..Default::default()
        }
    }

    #[test]
    fn generate_rejects_bad_documents() {
        let doc = ConfigurationDocument::default();
        assert!(AnswerKey::generate(&doc, None).is_err());
    }

    #[test]
    fn text_and_json_persistence() {
        let doc = document(vec![removed_user("bob", 10)]);
        let key = AnswerKey::generate(&doc, Some(Path::new("image.json"))).unwrap();
        let dir = tempfile::tempdir().unwrap();

        let text_path = dir.path().join("answerkey.txt");
        key.save_text(&text_path).unwrap();
        assert_eq!(
            std::fs::read_to_string(&text_path).unwrap(),
            "Score: 10/30\n[+10] User bob has been removed.\n"
        );

        let json_path = dir.path().join("answerkey.json");
        key.save_json(&json_path).unwrap();
        let loaded = AnswerKey::load_json(&json_path).unwrap();
        assert_eq!(loaded.evaluation, key.evaluation);
        assert_eq!(loaded.source.as_deref(), Some("image.json"));
        assert_eq!(loaded.breakdown, key.breakdown);
    }

    #[test]
    fn compare_identical_keys() {
        let doc = document(vec![removed_user("bob", 10)]);
        let a = AnswerKey::generate(&doc, None).unwrap();
        let b = AnswerKey::generate(&doc, None).unwrap();
        let diff = b.compare(&a);
        assert!(!diff.has_changes());
        assert_eq!(diff.unchanged, 1);
        assert_eq!(diff.score_delta(), 0);
    }

    #[test]
    fn compare_detects_added_and_removed() {
        let baseline =
            AnswerKey::generate(&document(vec![removed_user("bob", 10)]), None).unwrap();
        let current = AnswerKey::generate(
            &document(vec![removed_user("eve", 5), removed_user("eve", 5)]),
            None,
        )
        .unwrap();

        let diff = current.compare(&baseline);
        assert!(diff.has_changes());
        assert_eq!(diff.added.len(), 2);
        assert_eq!(diff.removed.len(), 1);
        assert_eq!(diff.removed[0].message, "User bob has been removed.");
        assert_eq!(diff.score_delta(), 0);

        let md = diff.to_markdown();
        assert!(md.contains("### Added"));
        assert!(md.contains("| Users | 10 | User bob has been removed. |"));
    }
}
