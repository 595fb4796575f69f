//! The `darkblue compare` command.

use std::path::PathBuf;

use anyhow::Result;

use darkblue_core::report::AnswerKey;

pub fn execute(
    baseline_path: PathBuf,
    current_path: PathBuf,
    format: String,
    fail_on_change: bool,
) -> Result<()> {
    let baseline = AnswerKey::load_json(&baseline_path)?;
    let current = AnswerKey::load_json(&current_path)?;

    let diff = current.compare(&baseline);

    match format.as_str() {
        "markdown" | "md" => {
            println!("{}", diff.to_markdown());
        }
        "json" => {
            println!("{}", serde_json::to_string_pretty(&diff)?);
        }
        _ => {
            println!(
                "Comparison: {} added, {} removed, {} unchanged",
                diff.added.len(),
                diff.removed.len(),
                diff.unchanged
            );
            println!(
                "Score: {}/{} -> {}/{} ({:+})",
                diff.baseline_total,
                diff.baseline_possible,
                diff.current_total,
                diff.current_possible,
                diff.score_delta()
            );

            if !diff.added.is_empty() {
                println!("\nAdded:");
                for f in &diff.added {
                    println!("  {}", f.line());
                }
            }

            if !diff.removed.is_empty() {
                println!("\nRemoved:");
                for f in &diff.removed {
                    println!("  {}", f.line());
                }
            }
        }
    }

    if fail_on_change && diff.has_changes() {
        std::process::exit(1);
    }

    Ok(())
}
