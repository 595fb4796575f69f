//! darkblue CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

use darkblue_core::model::Os;

mod commands;

#[derive(Parser)]
#[command(
    name = "darkblue",
    version,
    about = "Answer-key generator for Dark Blue hardening images"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a new configuration document
    Init {
        /// Image platform: linux or windows (default from config)
        #[arg(long)]
        os: Option<Os>,

        /// Document path
        #[arg(long, default_value = "darkblue.json")]
        output: PathBuf,

        /// Total points the image is worth
        #[arg(long, default_value = "0")]
        score: i64,

        /// Overwrite an existing document
        #[arg(long)]
        force: bool,
    },

    /// Generate the answer key for a document
    AnswerKey {
        /// Configuration document JSON
        #[arg(long)]
        document: PathBuf,

        /// Answer key path (default from config)
        #[arg(long)]
        output: Option<PathBuf>,

        /// Output format: text, json, html, all (comma-separated)
        #[arg(long)]
        format: Option<String>,
    },

    /// Check a document for authoring mistakes
    Validate {
        /// Configuration document JSON
        #[arg(long)]
        document: PathBuf,
    },

    /// Generate the image readme
    Readme {
        /// Configuration document JSON
        #[arg(long)]
        document: PathBuf,

        /// Save the generated readme back into the document
        #[arg(long)]
        write: bool,
    },

    /// Read or write a single document attribute
    Attr {
        #[command(subcommand)]
        action: AttrAction,
    },

    /// Compare two saved JSON answer keys
    Compare {
        /// Baseline answer key JSON
        #[arg(long)]
        baseline: PathBuf,

        /// Current answer key JSON
        #[arg(long)]
        current: PathBuf,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Exit code 1 if the keys differ
        #[arg(long)]
        fail_on_change: bool,
    },
}

#[derive(Subcommand)]
enum AttrAction {
    /// Print an attribute as JSON
    Get {
        #[arg(long)]
        document: PathBuf,

        /// Attribute name
        name: String,
    },

    /// Set an attribute from a JSON value
    Set {
        #[arg(long)]
        document: PathBuf,

        /// Attribute name
        name: String,

        /// JSON value, e.g. '"Linux"' or '[]'
        value: String,
    },
}

fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("darkblue=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config_file = cli.config_file;

    let result = match cli.command {
        Commands::Init {
            os,
            output,
            score,
            force,
        } => commands::init::execute(os, output, score, force, config_file),
        Commands::AnswerKey {
            document,
            output,
            format,
        } => commands::answer_key::execute(document, output, format, config_file),
        Commands::Validate { document } => commands::validate::execute(document),
        Commands::Readme { document, write } => commands::readme::execute(document, write),
        Commands::Attr { action } => match action {
            AttrAction::Get { document, name } => commands::attr::get(document, name),
            AttrAction::Set {
                document,
                name,
                value,
            } => commands::attr::set(document, name, value),
        },
        Commands::Compare {
            baseline,
            current,
            format,
            fail_on_change,
        } => commands::compare::execute(baseline, current, format, fail_on_change),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
