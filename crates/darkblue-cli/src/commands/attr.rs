//! The `darkblue attr` commands.

use std::path::PathBuf;

use anyhow::{Context, Result};
use serde_json::Value;

use darkblue_core::store::JsonFileRepository;
use darkblue_core::traits::AttributeStore;

pub fn get(document_path: PathBuf, name: String) -> Result<()> {
    let store = JsonFileRepository::new(document_path);
    match store.get_attribute(&name)? {
        Some(value) => {
            println!("{}", serde_json::to_string_pretty(&value)?);
            Ok(())
        }
        None => anyhow::bail!(
            "attribute {name:?} is not set in {}",
            store.path().display()
        ),
    }
}

pub fn set(document_path: PathBuf, name: String, value: String) -> Result<()> {
    let value: Value = serde_json::from_str(&value)
        .with_context(|| format!("value for {name:?} is not valid JSON"))?;
    let store = JsonFileRepository::new(document_path);
    store.set_attribute(&name, value)?;
    eprintln!("Updated {name} in {}", store.path().display());
    Ok(())
}
