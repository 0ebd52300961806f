//! Reference index integrity.
//!
//! A reference directory carries an index document that names, in
//! backticks, the files expected next to it. Every named file must exist
//! under the reference directory.

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::PathBuf;

use thiserror::Error;

use crate::report::{Report, RuleKind, Violation};
use crate::tokens::backtick_tokens;

/// File name of the index document inside the reference directory.
pub const DEFAULT_INDEX_NAME: &str = "api_reference.md";

/// Errors that prevent the reference check from running at all.
#[derive(Debug, Error)]
pub enum RefError {
    #[error("not found: {}", path.display())]
    IndexNotFound { path: PathBuf },

    #[error("failed to read {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Checks that every file named by a reference index exists.
#[derive(Debug, Clone)]
pub struct ReferenceChecker {
    base_dir: PathBuf,
    index_name: String,
}

impl ReferenceChecker {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
            index_name: DEFAULT_INDEX_NAME.to_string(),
        }
    }

    /// Use a different index file name within the base directory.
    pub fn index_name(mut self, name: impl Into<String>) -> Self {
        self.index_name = name.into();
        self
    }

    pub fn index_path(&self) -> PathBuf {
        self.base_dir.join(&self.index_name)
    }

    /// Load the index and check every reference it declares.
    pub fn check(&self) -> Result<Report, RefError> {
        let path = self.index_path();
        let text = std::fs::read_to_string(&path).map_err(|source| match source.kind() {
            ErrorKind::NotFound => RefError::IndexNotFound { path: path.clone() },
            _ => RefError::Read {
                path: path.clone(),
                source,
            },
        })?;
        Ok(self.check_text(&text))
    }

    /// Check the references declared by index `text`.
    ///
    /// References are checked in order of first appearance; a name listed
    /// twice is reported at most once.
    pub fn check_text(&self, text: &str) -> Report {
        let mut seen = HashSet::new();
        let names: Vec<&str> = backtick_tokens(text)
            .filter(|name| seen.insert(*name))
            .collect();

        if names.is_empty() {
            return [Violation::new(
                RuleKind::NoReferences,
                format!("no references found in {}", self.index_name),
            )]
            .into_iter()
            .collect();
        }

        let report: Report = names
            .into_iter()
            .filter(|name| !self.base_dir.join(name).exists())
            .map(|name| Violation::new(RuleKind::MissingReference, format!("missing: {name}")))
            .collect();
        tracing::debug!(
            base_dir = %self.base_dir.display(),
            missing = report.len(),
            "checked reference index"
        );
        report
    }
}
