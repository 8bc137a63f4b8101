use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::document::{Document, TextRange};

/// One candidate function in a document, signature through closing brace
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FunctionSpan {
    pub start_line: usize,
    pub end_line: usize,
}

impl FunctionSpan {
    pub fn new(start_line: usize, end_line: usize) -> Self {
        debug_assert!(start_line <= end_line);
        Self {
            start_line,
            end_line,
        }
    }

    pub fn contains_line(&self, line: usize) -> bool {
        self.start_line <= line && line <= self.end_line
    }

    pub fn range(&self, document: &Document) -> TextRange {
        TextRange::lines(self.start_line, self.end_line, document)
    }

    /// Text the classifier sees for this span
    pub fn text(&self, document: &Document) -> String {
        document.slice(&self.range(document))
    }
}

/// Negative locator outcomes; never surfaced past the locator
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum LocateError {
    #[error("no function start at or above line {line}")]
    LocatorMiss { line: usize },

    #[error("function starting at line {start_line} is never closed")]
    MalformedSpan { start_line: usize },

    #[error("line {start_line} ends before any block opens")]
    NoBlock { start_line: usize },
}
