//! Class-name table aligned with the model's output indices.
//!
//! Each line of the label file has the form `"<identifier> <display-name>"`,
//! e.g. `n01440764 tench, Tinca tinca`. Line `i` names output index `i`, so
//! file order is preserved exactly.

use std::path::Path;

use tracing::info;

use crate::error::{IndexError, LoadError};

/// Ordered, immutable table of label lines loaded once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelTable {
    lines: Vec<String>,
}

impl LabelTable {
    /// Load a newline-delimited label file.
    ///
    /// Trailing whitespace is trimmed from every line. Blank lines at the end
    /// of the file are dropped; blank lines in the middle are kept so indices
    /// stay aligned, and fail on lookup.
    pub fn load(path: &Path) -> Result<Self, LoadError> {
        if !path.exists() {
            return Err(LoadError::LabelsNotFound(path.to_path_buf()));
        }
        let content = std::fs::read_to_string(path).map_err(|source| LoadError::ReadLabels {
            path: path.to_path_buf(),
            source,
        })?;

        let table = Self::from_lines(content.lines());
        if table.is_empty() {
            return Err(LoadError::EmptyLabels(path.to_path_buf()));
        }

        info!(count = table.len(), path = %path.display(), "loaded label table");
        Ok(table)
    }

    /// Build a table from in-memory lines, with the same trimming as [`load`](Self::load).
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut lines: Vec<String> = lines
            .into_iter()
            .map(|l| l.as_ref().trim_end().to_string())
            .collect();
        while lines.last().is_some_and(|l| l.is_empty()) {
            lines.pop();
        }
        Self { lines }
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Display name for output index `index`: everything after the single
    /// whitespace character that ends the first token, kept verbatim.
    ///
    /// `"9 n02119789 fox"` resolves to `"n02119789 fox"`, and `"0  cat"` to
    /// `" cat"`.
    pub fn at(&self, index: usize) -> Result<&str, IndexError> {
        let line = self.lines.get(index).ok_or(IndexError::OutOfRange {
            index,
            len: self.lines.len(),
        })?;

        line.trim_start()
            .split_once(char::is_whitespace)
            .map(|(_, rest)| rest)
            .filter(|name| !name.is_empty())
            .ok_or_else(|| IndexError::MissingDisplayName {
                index,
                line: line.clone(),
            })
    }

    /// The stored line for output index `index`, identifier included.
    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(String::as_str)
    }
}
