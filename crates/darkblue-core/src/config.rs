//! Tool configuration.
//!
//! Settings live in `darkblue.toml`; every field has a default so the tool
//! runs without a config file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::model::Os;

/// Top-level darkblue configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DarkblueConfig {
    /// Platform used by `init` when none is given.
    #[serde(default = "default_os")]
    pub default_os: Os,
    /// Directory answer keys are written to when no output path is given.
    #[serde(default = "default_output_dir")]
    pub output_dir: PathBuf,
    /// File name of the text answer key inside `output_dir`.
    #[serde(default = "default_answer_key_name")]
    pub answer_key_name: String,
    /// Output formats written by `answer-key`: text, json, html.
    #[serde(default = "default_formats")]
    pub formats: Vec<String>,
}

fn default_os() -> Os {
    Os::Linux
}
fn default_output_dir() -> PathBuf {
    PathBuf::from(".")
}
fn default_answer_key_name() -> String {
    "answerkey.txt".to_string()
}
fn default_formats() -> Vec<String> {
    vec!["text".to_string()]
}

impl Default for DarkblueConfig {
    fn default() -> Self {
        Self {
            default_os: default_os(),
            output_dir: default_output_dir(),
            answer_key_name: default_answer_key_name(),
            formats: default_formats(),
        }
    }
}

impl DarkblueConfig {
    /// Default location of the text answer key.
    pub fn answer_key_path(&self) -> PathBuf {
        self.output_dir.join(&self.answer_key_name)
    }
}

/// Resolve environment variable references like `${VAR_NAME}` in a string.
/// Substituted values are not scanned again.
fn resolve_env_vars(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    let mut rest = s;
    while let Some(start) = rest.find("${") {
        let Some(end) = rest[start..].find('}') else {
            break;
        };
        result.push_str(&rest[..start]);
        let var_name = &rest[start + 2..start + end];
        result.push_str(&std::env::var(var_name).unwrap_or_default());
        rest = &rest[start + end + 1..];
    }
    result.push_str(rest);
    result
}

/// Load config from an explicit path, or search the default locations.
///
/// Search order without a path:
/// 1. `darkblue.toml` in the current directory
/// 2. `~/.config/darkblue/config.toml`
///
/// `${VAR}` references in `output_dir` are resolved, then
/// `DARKBLUE_OUTPUT_DIR` overrides it verbatim.
pub fn load_config_from(path: Option<&Path>) -> Result<DarkblueConfig> {
    let config_path = if let Some(p) = path {
        if p.exists() {
            Some(p.to_path_buf())
        } else {
            anyhow::bail!("config file not found: {}", p.display());
        }
    } else {
        let local = PathBuf::from("darkblue.toml");
        if local.exists() {
            Some(local)
        } else {
            dirs_path()
                .map(|home| home.join("config.toml"))
                .filter(|global| global.exists())
        }
    };

    let mut config = match config_path {
        Some(path) => {
            let content = std::fs::read_to_string(&path)
                .with_context(|| format!("failed to read config: {}", path.display()))?;
            let config = parse_config(&content)
                .with_context(|| format!("failed to parse config: {}", path.display()))?;
            tracing::debug!(path = %path.display(), "loaded config");
            config
        }
        None => DarkblueConfig::default(),
    };

    config.output_dir = PathBuf::from(resolve_env_vars(&config.output_dir.to_string_lossy()));

    if let Ok(dir) = std::env::var("DARKBLUE_OUTPUT_DIR") {
        config.output_dir = PathBuf::from(dir);
    }

    Ok(config)
}

fn parse_config(content: &str) -> Result<DarkblueConfig> {
    let config: DarkblueConfig = toml::from_str(content)?;
    for format in &config.formats {
        anyhow::ensure!(
            matches!(format.as_str(), "text" | "json" | "html"),
            "unknown output format in config: {format}"
        );
    }
    Ok(config)
}

fn dirs_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|h| PathBuf::from(h).join(".config").join("darkblue"))
}
