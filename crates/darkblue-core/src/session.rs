//! Editing session.
//!
//! The platform an operator is authoring for, fixed when the session starts
//! and passed explicitly to every operation that depends on it.

use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::model::{ConfigurationDocument, Os};
use crate::store::JsonFileRepository;
use crate::traits::DocumentRepository;

/// An immutable editing session over one document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    os: Os,
    document_path: PathBuf,
}

impl Session {
    pub fn new(os: Os, document_path: impl Into<PathBuf>) -> Self {
        Self {
            os,
            document_path: document_path.into(),
        }
    }

    /// Start a session for an existing document, taking the platform from it.
    pub fn open(document_path: impl Into<PathBuf>) -> Result<Self> {
        let document_path = document_path.into();
        let document = JsonFileRepository::new(&document_path).load()?;
        let os = crate::engine::check_header(&document)?;
        Ok(Self { os, document_path })
    }

    pub fn os(&self) -> Os {
        self.os
    }

    pub fn document_path(&self) -> &Path {
        &self.document_path
    }

    pub fn repository(&self) -> JsonFileRepository {
        JsonFileRepository::new(&self.document_path)
    }

    /// A blank document for this session's platform.
    pub fn new_document(&self, score: i64) -> ConfigurationDocument {
        ConfigurationDocument {
            score,
            ..ConfigurationDocument::new(self.os)
        }
    }
}
