//! Answer-key evaluator.
//!
//! A single pass over a configuration document that compares each entry's
//! starting state with its desired state and records the points a fully
//! remediated image would earn. The evaluator is pure: it reads the document,
//! never mutates it, and performs no I/O.

use serde::{Deserialize, Serialize};

use crate::error::EvaluationError;
use crate::model::{Category, ConfigurationDocument, Entry, Os, ServiceState, FORMAT_MARKER};

/// One line of the answer key.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Finding {
    /// Category that produced the finding.
    pub category: Category,
    pub message: String,
    pub points: i64,
}

impl Finding {
    /// The report line, e.g. `[+10] User bob has been removed.`
    pub fn line(&self) -> String {
        format!("[+{}] {}", self.points, self.message)
    }
}

/// The result of evaluating one document.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Platform the document was scored as.
    pub os: Os,
    /// The document's declared point total.
    pub possible_score: i64,
    /// Sum of `points` over `findings`.
    pub total_scored: i64,
    /// Findings in emission order.
    pub findings: Vec<Finding>,
}

impl Evaluation {
    /// Render the plain-text answer key.
    pub fn to_text(&self) -> String {
        let mut out = format!("Score: {}/{}\n", self.total_scored, self.possible_score);
        for finding in &self.findings {
            out.push_str(&finding.line());
            out.push('\n');
        }
        out
    }
}

/// Check the format marker and platform tag.
pub fn check_header(document: &ConfigurationDocument) -> Result<Os, EvaluationError> {
    if document.format.as_deref() != Some(FORMAT_MARKER) {
        return Err(EvaluationError::Format {
            found: document.format.clone(),
        });
    }
    document
        .platform()
        .ok_or_else(|| EvaluationError::UnsupportedPlatform {
            found: document.os.clone(),
        })
}

/// Evaluate a document into its answer key.
pub fn evaluate(document: &ConfigurationDocument) -> Result<Evaluation, EvaluationError> {
    let os = check_header(document)?;
    let mut findings = Vec::new();

    for &category in Category::evaluation_order(os) {
        let entries = match document.entries(category, os) {
            Some(entries) if !entries.is_empty() => entries,
            _ => {
                tracing::debug!(%category, "no entries loaded, skipping category");
                continue;
            }
        };

        for entry in &entries {
            if let Some((message, points)) = score_entry(entry) {
                findings.push(Finding {
                    category,
                    message,
                    points,
                });
            }
        }
    }

    let total_scored = findings.iter().map(|f| f.points).sum();
    tracing::info!(
        %os,
        findings = findings.len(),
        total_scored,
        possible = document.score,
        "answer key evaluated"
    );

    Ok(Evaluation {
        os,
        possible_score: document.score,
        total_scored,
        findings,
    })
}

/// Apply the transition rule for one entry. At most one finding per entry.
fn score_entry(entry: &Entry<'_>) -> Option<(String, i64)> {
    match entry {
        Entry::Question(q) => {
            let (answer, points) = (q.answer.as_ref()?, q.points?);
            Some((
                format!(
                    "Question {} was answered correctly. Answer: {answer}",
                    q.name
                ),
                points,
            ))
        }
        Entry::Filepath(f) => {
            (!f.exist).then(|| (format!("File {} was deleted.", f.filepath), f.positive_points))
        }
        Entry::LinuxUser(u) => {
            let (sudo, was_sudo) = u.privilege(Os::Linux);
            user_transition(u.allowed, sudo, was_sudo).map(|t| {
                let message = match t {
                    UserTransition::Removed => format!("User {} has been removed.", u.name),
                    UserTransition::Promoted => format!("User {} is now in the sudo group.", u.name),
                    UserTransition::Demoted => format!("User {} is not in the sudo group.", u.name),
                };
                (message, u.positive_points)
            })
        }
        Entry::WindowsUser(u) => {
            let (admin, was_admin) = u.privilege(Os::Windows);
            user_transition(u.allowed, admin, was_admin).map(|t| {
                let message = match t {
                    UserTransition::Removed => format!("User {} has been removed.", u.name),
                    UserTransition::Promoted => format!("User {} is now an administrator.", u.name),
                    UserTransition::Demoted => format!("User {} is not an administrator.", u.name),
                };
                (message, u.positive_points)
            })
        }
        Entry::Service(s) => {
            let verb = match (s.default_state()?, s.desired_state()?) {
                (ServiceState::Stopped, ServiceState::Running) => "started",
                (ServiceState::Running, ServiceState::Stopped) => "stopped",
                _ => return None,
            };
            Some((format!("Service {} was {verb}.", s.common_name), s.positive_points))
        }
        Entry::Process(p) => {
            let verb = match (p.default_state, p.desired_state) {
                (true, false) => "stopped",
                (false, true) => "started",
                _ => return None,
            };
            Some((format!("Process {} was {verb}.", p.name), p.positive_points))
        }
        Entry::Program(p) => {
            let verb = install_transition(p.installed, p.desired)?;
            Some((format!("Program {} was {verb}.", p.name), p.positive_points))
        }
        Entry::Package(p) => {
            let verb = install_transition(p.installed, p.desired)?;
            Some((format!("Package {} was {verb}.", p.name), p.positive_points))
        }
        Entry::FirewallProfile(f) => {
            let verb = match (f.starting_state, f.desired_state) {
                (false, true) => "enabled",
                (true, false) => "disabled",
                _ => return None,
            };
            Some((format!("{} firewall profile {verb}.", f.name), f.positive_points))
        }
        Entry::RegistryEntry(r) => value_change(
            &r.default_value,
            &r.positive_value,
            &r.positive_message,
            || format!("Registry Entry {} was set to positive value {}.", r.entry_name, r.positive_value),
        )
        .map(|message| (message, r.positive_points)),
        Entry::ConfigFile(c) => value_change(
            &c.default_value,
            &c.positive_value,
            &c.positive_message,
            || format!("Config File {} was set to positive value {}.", c.filepath, c.positive_value),
        )
        .map(|message| (message, c.positive_points)),
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum UserTransition {
    Removed,
    Promoted,
    Demoted,
}

/// Removal short-circuits; promotion and demotion are mutually exclusive.
fn user_transition(allowed: bool, privileged: bool, was_privileged: bool) -> Option<UserTransition> {
    if !allowed {
        Some(UserTransition::Removed)
    } else if privileged && !was_privileged {
        Some(UserTransition::Promoted)
    } else if !privileged && was_privileged {
        Some(UserTransition::Demoted)
    } else {
        None
    }
}

fn install_transition(installed: bool, desired: bool) -> Option<&'static str> {
    match (installed, desired) {
        (false, true) => Some("installed"),
        (true, false) => Some("uninstalled"),
        _ => None,
    }
}

fn value_change(
    default_value: &str,
    positive_value: &str,
    positive_message: &str,
    synthesize: impl FnOnce() -> String,
) -> Option<String> {
    if default_value == positive_value {
        return None;
    }
    if positive_message.is_empty() {
        Some(synthesize())
    } else {
        Some(positive_message.to_string())
    }
}
