//! The `darkblue validate` command.

use std::path::PathBuf;

use anyhow::Result;

use darkblue_core::engine::check_header;
use darkblue_core::parser::{parse_document, validate_document};

pub fn execute(document_path: PathBuf) -> Result<()> {
    let document = parse_document(&document_path)?;
    let os = check_header(&document)?;

    println!(
        "Document: {} ({os} image, score {})",
        document_path.display(),
        document.score
    );

    let warnings = validate_document(&document);
    for w in &warnings {
        let prefix = match (&w.category, &w.entry) {
            (Some(category), Some(entry)) => format!("  [{category}/{entry}]"),
            (Some(category), None) => format!("  [{category}]"),
            _ => "  ".to_string(),
        };
        println!("{prefix} WARNING: {}", w.message);
    }

    if warnings.is_empty() {
        println!("Document valid.");
    } else {
        println!("\n{} warning(s) found.", warnings.len());
    }

    Ok(())
}
