//! Files-in-scope table parsing.
//!
//! Any line containing `|` is a candidate row. Separator rows are skipped,
//! the remaining rows are split into cells, and the first backtick token of
//! the second cell is the claimed path. Rows that cannot be read are
//! returned as [`RowError`]s so the caller can decide whether to report
//! them.

use std::fmt;

use crate::tokens::first_backtick_token;

/// One parsed row of the files-in-scope table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeRow {
    /// 1-based line number in the document.
    pub line: usize,
    /// Operation cell as written (`Create`, `Modify`, ...).
    pub operation: String,
    /// First backtick-quoted token of the path cell, trimmed.
    pub path: String,
}

impl ScopeRow {
    /// Empty paths and template placeholders such as `<file>` or
    /// `[path]` make no claim about the filesystem.
    pub fn is_placeholder(&self) -> bool {
        self.path.is_empty() || self.path.starts_with('<') || self.path.starts_with('[')
    }

    /// Whether the operation declares a file that does not exist yet.
    pub fn declares_creation(&self, marker: &str) -> bool {
        !marker.is_empty()
            && self
                .operation
                .to_lowercase()
                .contains(&marker.to_lowercase())
    }
}

/// A table row that could not be read.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowError {
    TooFewColumns { line: usize },
    MissingPath { line: usize },
}

impl RowError {
    pub fn line(&self) -> usize {
        match self {
            Self::TooFewColumns { line } | Self::MissingPath { line } => *line,
        }
    }
}

impl fmt::Display for RowError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TooFewColumns { line } => {
                write!(f, "line {line}: malformed scope row (expected at least 2 columns)")
            }
            Self::MissingPath { line } => {
                write!(f, "line {line}: scope row has no backtick-quoted path")
            }
        }
    }
}

impl std::error::Error for RowError {}

/// Parse numbered lines into scope rows and row errors.
///
/// A row directly followed by a separator row is a table header and is not
/// reported for lacking a path.
pub fn parse_table_rows<'a, I>(lines: I) -> (Vec<ScopeRow>, Vec<RowError>)
where
    I: IntoIterator<Item = (usize, &'a str)>,
{
    let lines: Vec<(usize, &str)> = lines.into_iter().collect();
    let mut rows = Vec::new();
    let mut errors = Vec::new();

    for (i, &(line_no, line)) in lines.iter().enumerate() {
        if !line.contains('|') || is_separator(line) {
            continue;
        }

        let cells = split_cells(line);
        if cells.len() < 2 {
            errors.push(RowError::TooFewColumns { line: line_no });
            continue;
        }

        let Some(path) = first_backtick_token(cells[1]) else {
            let is_header = lines
                .get(i + 1)
                .is_some_and(|&(_, next)| is_separator(next));
            if !is_header {
                errors.push(RowError::MissingPath { line: line_no });
            }
            continue;
        };

        rows.push(ScopeRow {
            line: line_no,
            operation: cells[0].to_string(),
            path: path.trim().to_string(),
        });
    }

    (rows, errors)
}

/// `| :--- | ---: |` and friends.
fn is_separator(line: &str) -> bool {
    let trimmed = line.trim();
    trimmed.contains('-')
        && trimmed
            .chars()
            .all(|c| matches!(c, '|' | '-' | ':' | ' ' | '\t'))
}

fn split_cells(line: &str) -> Vec<&str> {
    line.trim()
        .trim_matches('|')
        .split('|')
        .map(str::trim)
        .collect()
}
