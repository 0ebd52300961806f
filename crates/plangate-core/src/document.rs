//! Plan document loading.

use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::outline::Outline;

/// Errors raised while loading a plan document from disk.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("file not found: {}", path.display())]
    NotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// A plan document: its text and the path it was loaded from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDocument {
    path: PathBuf,
    text: String,
}

impl PlanDocument {
    /// Read a plan document as UTF-8.
    ///
    /// A missing file is reported as [`DocumentError::NotFound`] so callers
    /// can render it differently from other I/O and decoding failures.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, DocumentError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => DocumentError::NotFound {
                path: path.to_path_buf(),
            },
            _ => DocumentError::Read {
                path: path.to_path_buf(),
                source,
            },
        })?;
        tracing::debug!(path = %path.display(), bytes = text.len(), "loaded plan document");
        Ok(Self {
            path: path.to_path_buf(),
            text,
        })
    }

    /// Build a document from in-memory text.
    pub fn from_text(path: impl Into<PathBuf>, text: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            text: text.into(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Parse the heading outline of this document.
    pub fn outline(&self) -> Outline<'_> {
        Outline::parse(&self.text)
    }
}
