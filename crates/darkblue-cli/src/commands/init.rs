//! The `darkblue init` command.

use std::path::PathBuf;

use anyhow::Result;

use darkblue_core::config::load_config_from;
use darkblue_core::model::Os;
use darkblue_core::session::Session;
use darkblue_core::traits::DocumentRepository;

pub fn execute(
    os: Option<Os>,
    output: PathBuf,
    score: i64,
    force: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    if output.exists() && !force {
        anyhow::bail!(
            "{} already exists (use --force to overwrite)",
            output.display()
        );
    }

    let os = match os {
        Some(os) => os,
        None => load_config_from(config_path.as_deref())?.default_os,
    };

    if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)?;
    }

    let session = Session::new(os, &output);
    session.repository().save(&session.new_document(score))?;
    tracing::info!(%os, path = %output.display(), "created configuration document");

    println!("Created {} ({os} image)", output.display());
    println!("\nNext steps:");
    println!("  1. Add entries to the category lists in {}", output.display());
    println!(
        "  2. Run: darkblue validate --document {}",
        output.display()
    );
    println!(
        "  3. Run: darkblue answer-key --document {}",
        output.display()
    );

    Ok(())
}
