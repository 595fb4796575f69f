//! The `darkblue readme` command.

use std::path::PathBuf;

use anyhow::Result;

use darkblue_core::readme::generate_readme;
use darkblue_core::store::JsonFileRepository;
use darkblue_core::traits::DocumentRepository;

pub fn execute(document_path: PathBuf, write: bool) -> Result<()> {
    let repository = JsonFileRepository::new(&document_path);
    let mut document = repository.load()?;
    let readme = generate_readme(&document)?;

    if write {
        document.readme = readme;
        repository.save(&document)?;
        eprintln!("Readme saved to: {}", document_path.display());
    } else {
        print!("{readme}");
    }

    Ok(())
}
