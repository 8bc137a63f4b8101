use serde::{Deserialize, Serialize};
use std::fmt;
use std::ops::Range;

/// Identifier of one open document view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ViewId(pub u64);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "view#{}", self.0)
    }
}

/// Zero-based line/character position
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub line: usize,
    pub character: usize,
}

impl Position {
    pub fn new(line: usize, character: usize) -> Self {
        Self { line, character }
    }
}

/// Range of text; `end.character` is exclusive
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TextRange {
    pub start: Position,
    pub end: Position,
}

impl TextRange {
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Range covering whole lines `start_line..=end_line`
    pub fn lines(start_line: usize, end_line: usize, document: &Document) -> Self {
        let end_len = document.line(end_line).map(|l| l.chars().count()).unwrap_or(0);
        Self {
            start: Position::new(start_line, 0),
            end: Position::new(end_line, end_len),
        }
    }
}

/// Snapshot of the text shown in one view
///
/// Line boundaries are indexed once so slicing a span costs only its own lines.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    text: String,
    lines: Vec<Range<usize>>,
}

/// Byte ranges of each line's content, with `str::lines` semantics
fn index_lines(text: &str) -> Vec<Range<usize>> {
    let mut lines = Vec::new();
    let mut offset = 0;
    for raw in text.split_inclusive('\n') {
        let content = match raw.strip_suffix('\n') {
            Some(line) => line.strip_suffix('\r').unwrap_or(line),
            None => raw,
        };
        lines.push(offset..offset + content.len());
        offset += raw.len();
    }
    lines
}

impl Document {
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let lines = index_lines(&text);
        Self { text, lines }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, index: usize) -> Option<&str> {
        self.lines.get(index).map(|range| &self.text[range.clone()])
    }

    /// Extract the text covered by `range`, clamped to the document
    ///
    /// Lines are re-joined with `\n`, so CRLF documents extract with LF endings.
    pub fn slice(&self, range: &TextRange) -> String {
        if range.end < range.start || range.start.line >= self.lines.len() {
            return String::new();
        }

        let last = range.end.line.min(self.lines.len() - 1);
        let mut out = Vec::with_capacity(last - range.start.line + 1);
        for index in range.start.line..=last {
            let line = &self.text[self.lines[index].clone()];
            let from = if index == range.start.line {
                range.start.character
            } else {
                0
            };
            let to = if index == range.end.line {
                range.end.character
            } else {
                usize::MAX
            };
            out.push(char_slice(line, from, to));
        }
        out.join("\n")
    }
}

/// Characters `from..to` of `line`, both clamped to its length
fn char_slice(line: &str, from: usize, to: usize) -> &str {
    let byte_at = |chars: usize| {
        line.char_indices()
            .nth(chars)
            .map(|(byte, _)| byte)
            .unwrap_or(line.len())
    };
    let start = byte_at(from);
    let end = if to == usize::MAX { line.len() } else { byte_at(to) };
    &line[start..end.max(start)]
}

impl From<&str> for Document {
    fn from(text: &str) -> Self {
        Self::new(text)
    }
}

impl From<String> for Document {
    fn from(text: String) -> Self {
        Self::new(text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_slice_whole_lines() {
        let doc = Document::new("a\nfunction f() {\n  return 1;\n}\nb");
        let range = TextRange::lines(1, 3, &doc);
        assert_eq!(doc.slice(&range), "function f() {\n  return 1;\n}");
    }

    #[test]
    fn test_slice_partial_selection() {
        let doc = Document::new("let x = 1;\nlet y = 2;");
        let range = TextRange::new(Position::new(0, 4), Position::new(1, 5));
        assert_eq!(doc.slice(&range), "x = 1;\nlet y");
    }

    #[test]
    fn test_slice_clamps_past_end() {
        let doc = Document::new("one\ntwo");
        let range = TextRange::new(Position::new(1, 0), Position::new(9, 99));
        assert_eq!(doc.slice(&range), "two");

        let inverted = TextRange::new(Position::new(1, 0), Position::new(0, 0));
        assert_eq!(doc.slice(&inverted), "");
    }

    #[test]
    fn test_line_index_matches_str_lines() {
        for text in ["", "a", "a\n", "a\r\nb\r\n", "\n\nx", "é\nü\r\n"] {
            let doc = Document::new(text);
            let expected: Vec<&str> = text.lines().collect();
            assert_eq!(doc.line_count(), expected.len(), "{:?}", text);
            for (index, line) in expected.iter().enumerate() {
                assert_eq!(doc.line(index), Some(*line));
            }
            assert_eq!(doc.line(expected.len()), None);
        }
    }

    #[test]
    fn test_slice_counts_characters_not_bytes() {
        let doc = Document::new("héllo wörld");
        let range = TextRange::new(Position::new(0, 1), Position::new(0, 8));
        assert_eq!(doc.slice(&range), "éllo wö");
    }
}
