//! The `darkblue answer-key` command.

use std::path::PathBuf;

use anyhow::Result;

use darkblue_core::config::load_config_from;
use darkblue_core::parser::parse_document;
use darkblue_core::report::AnswerKey;
use darkblue_report::html::write_html_report;

pub fn execute(
    document_path: PathBuf,
    output: Option<PathBuf>,
    format: Option<String>,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = load_config_from(config_path.as_deref())?;

    let formats: Vec<String> = match format.as_deref() {
        Some("all") => vec!["text".into(), "json".into(), "html".into()],
        Some(list) => list.split(',').map(|f| f.trim().to_string()).collect(),
        None => config.formats.clone(),
    };
    for fmt in &formats {
        anyhow::ensure!(
            matches!(fmt.as_str(), "text" | "json" | "html"),
            "unknown output format: {fmt}"
        );
    }

    let document = parse_document(&document_path)?;

    // A rejected document must leave any previous answer key in place, so
    // nothing is written until evaluation has succeeded.
    let key = AnswerKey::generate(&document, Some(document_path.as_path()))?;

    print_summary(&key);

    let output = output.unwrap_or_else(|| config.answer_key_path());
    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    for fmt in &formats {
        match fmt.as_str() {
            "text" => {
                key.save_text(&output)?;
                eprintln!("Answer key saved to: {}", output.display());
            }
            "json" => {
                let path = output.with_extension("json");
                key.save_json(&path)?;
                eprintln!("JSON answer key: {}", path.display());
            }
            "html" => {
                let path = output.with_extension("html");
                write_html_report(&key, &path)?;
                eprintln!("HTML answer key: {}", path.display());
            }
            other => anyhow::bail!("unknown output format: {other}"),
        }
    }

    Ok(())
}

fn print_summary(key: &AnswerKey) {
    use comfy_table::{Cell, Table};

    let mut table = Table::new();
    table.set_header(vec![
        "Category",
        "Entries",
        "Findings",
        "Points",
        "Unused deductions",
    ]);

    for b in &key.breakdown {
        table.add_row(vec![
            Cell::new(b.category.label()),
            Cell::new(b.entries),
            Cell::new(b.findings),
            Cell::new(b.points_awarded),
            Cell::new(b.unused_negative_points),
        ]);
    }

    eprintln!("\n{table}");
    eprintln!(
        "Score: {}/{}",
        key.evaluation.total_scored, key.evaluation.possible_score
    );
}
