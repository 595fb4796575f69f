//! Readme generation.
//!
//! Appends the facts competitors need to the document's readme: which users
//! are allowed, which of them hold administrator or sudo rights, and which
//! services or processes must keep running.

use crate::engine::check_header;
use crate::error::EvaluationError;
use crate::model::{ConfigurationDocument, Os, ServiceState};

/// Build the readme text that would result from appending the generated
/// sections to `document.readme`.
pub fn generate_readme(document: &ConfigurationDocument) -> Result<String, EvaluationError> {
    let os = check_header(document)?;
    let users = document.users.as_deref().unwrap_or_default();

    let mut allowed = String::from("\nAllowed users:\n\n");
    let mut privileged = String::from("\nAllowed administrators/sudoers:\n");
    for user in users.iter().filter(|u| u.allowed) {
        allowed.push_str(&user.name);
        allowed.push('\n');
        if user.privilege(os).0 {
            privileged.push_str(&user.name);
            privileged.push('\n');
        }
    }

    let (heading, critical): (&str, Vec<&str>) = match os {
        Os::Windows => (
            "\nCritical services:\n",
            document
                .services
                .as_deref()
                .unwrap_or_default()
                .iter()
                .filter(|s| s.desired_state() == Some(ServiceState::Running))
                .map(|s| s.common_name.as_str())
                .collect(),
        ),
        Os::Linux => (
            "\nCritical processes:\n",
            document
                .processes
                .as_deref()
                .unwrap_or_default()
                .iter()
                .filter(|p| p.desired_state)
                .map(|p| p.name.as_str())
                .collect(),
        ),
    };

    let mut readme = format!("{}\n{allowed}\n{privileged}\n{heading}", document.readme);
    if critical.is_empty() {
        readme.push_str("None\n");
    }
    for name in critical {
        readme.push_str(name);
        readme.push('\n');
    }

    Ok(readme)
}
