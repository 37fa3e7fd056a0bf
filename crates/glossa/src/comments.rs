//! Comment recovery and replay.
//!
//! Python's parser drops comments and blank lines, so they are recovered
//! from the raw text with a line scan and replayed into the output by line
//! number while the tree is walked.

use regex::Regex;
use std::sync::LazyLock;

static ELSE_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(else|elif .*):").unwrap());

static COMMENT_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*(.+)?# ?(.*)$").unwrap());

static STRING_LITERAL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r#""(?:[^"\\]|\\.)*"|'(?:[^'\\]|\\.)*'"#).unwrap());

/// `line` with every single-line string literal blanked out, byte for byte.
fn mask_strings(line: &str) -> String {
    STRING_LITERAL
        .replace_all(line, |caps: &regex::Captures| "_".repeat(caps[0].len()))
        .into_owned()
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommentKind {
    /// A comment on its own line, or a blank line.
    Line,
    /// A comment following code on the same line.
    Tail,
    /// An `else:`/`elif ...:` line.
    Else,
}

/// One recovered comment, blank line, or else marker.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommentRecord {
    pub line: usize,
    /// Comment text; `None` on a line record means a blank line.
    pub text: Option<String>,
    pub is_tail: bool,
    pub is_else: bool,
}

impl CommentRecord {
    pub fn kind(&self) -> CommentKind {
        if self.is_else {
            CommentKind::Else
        } else if self.is_tail {
            CommentKind::Tail
        } else {
            CommentKind::Line
        }
    }

    pub fn is_blank(&self) -> bool {
        self.kind() == CommentKind::Line && self.text.is_none()
    }
}

/// Every comment record of a source text, ordered by line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommentIndex {
    records: Vec<CommentRecord>,
}

impl CommentIndex {
    /// Scan source text once, recording comments, blank lines and else markers.
    pub fn scan(source: &str) -> Self {
        let mut records = Vec::new();

        for (number, line) in source.lines().enumerate() {
            let line_number = number + 1;

            if ELSE_LINE.is_match(line) {
                records.push(CommentRecord {
                    line: line_number,
                    text: None,
                    is_tail: false,
                    is_else: true,
                });
            }

            let masked = mask_strings(line);
            if let Some(caps) = COMMENT_LINE.captures(&masked) {
                // Offsets in `masked` are offsets in `line`
                let text = caps.get(2).map_or("", |m| &line[m.start()..]);
                records.push(CommentRecord {
                    line: line_number,
                    text: Some(text.to_string()),
                    is_tail: caps.get(1).is_some(),
                    is_else: false,
                });
            } else if line.trim().is_empty() {
                records.push(CommentRecord {
                    line: line_number,
                    text: None,
                    is_tail: false,
                    is_else: false,
                });
            }
        }

        Self { records }
    }

    pub fn records(&self) -> &[CommentRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// A fresh cursor positioned before the first record.
    pub fn cursor(&self) -> CommentCursor<'_> {
        CommentCursor {
            records: &self.records,
            index: 0,
            current_line: 0,
        }
    }
}

/// Forward-only position in a [`CommentIndex`].
#[derive(Debug, Clone)]
pub struct CommentCursor<'a> {
    records: &'a [CommentRecord],
    index: usize,
    current_line: usize,
}

impl<'a> CommentCursor<'a> {
    /// Move the current line to the line of the node about to be rendered.
    ///
    /// Also used to re-synchronize when entering an `else`/`elif` branch.
    pub fn prepare(&mut self, line: usize) {
        self.current_line = line;
    }

    pub fn current_line(&self) -> usize {
        self.current_line
    }

    /// The next record, if it is at or before the current line.
    fn pending(&self) -> Option<&'a CommentRecord> {
        self.records
            .get(self.index)
            .filter(|record| record.line <= self.current_line)
    }

    /// Consume the next pending line record.
    ///
    /// The outer `Option` is whether there was one, the inner one is its
    /// text (`None` for a blank line).
    pub fn next_line_comment(&mut self) -> Option<Option<&'a str>> {
        let record = self
            .pending()
            .filter(|record| record.kind() == CommentKind::Line)?;
        self.index += 1;
        Some(record.text.as_deref())
    }

    /// Consume a pending else marker. Returns whether one was consumed.
    pub fn take_else(&mut self) -> bool {
        match self.pending() {
            Some(record) if record.kind() == CommentKind::Else => {
                self.index += 1;
                true
            }
            _ => false,
        }
    }

    /// Consume a pending tail comment.
    pub fn take_tail(&mut self) -> Option<&'a str> {
        let record = self
            .pending()
            .filter(|record| record.kind() == CommentKind::Tail)?;
        self.index += 1;
        Some(record.text.as_deref().unwrap_or(""))
    }

    /// Skip one blank line right after the current line.
    pub fn skip_blank(&mut self) {
        if let Some(record) = self.records.get(self.index) {
            if self.current_line + 1 >= record.line && record.is_blank() {
                self.index += 1;
            }
        }
    }

    /// Consume and return every record not yet replayed.
    pub fn drain(&mut self) -> &'a [CommentRecord] {
        let rest = &self.records[self.index..];
        self.index = self.records.len();
        rest
    }

    /// Number of records consumed so far.
    pub fn consumed(&self) -> usize {
        self.index
    }

    pub fn is_exhausted(&self) -> bool {
        self.index >= self.records.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_kinds() {
        let source = "x = 1  # tail\n\n# own line\nif x:\n    pass\nelse:  # why\n    pass\n";
        let index = CommentIndex::scan(source);
        let kinds: Vec<(usize, CommentKind)> =
            index.records().iter().map(|r| (r.line, r.kind())).collect();
        assert_eq!(
            kinds,
            vec![
                (1, CommentKind::Tail),
                (2, CommentKind::Line),
                (3, CommentKind::Line),
                (6, CommentKind::Else),
                (6, CommentKind::Tail),
            ]
        );
        assert_eq!(index.records()[0].text.as_deref(), Some("tail"));
        assert!(index.records()[1].is_blank());
        assert_eq!(index.records()[2].text.as_deref(), Some("own line"));
    }

    #[test]
    fn test_last_hash_splits() {
        let index = CommentIndex::scan("a = b  # one # two");
        assert_eq!(index.records()[0].text.as_deref(), Some("two"));
        assert!(index.records()[0].is_tail);
    }

    #[test]
    fn test_hash_inside_strings() {
        let index = CommentIndex::scan("color = \"#ff0000\"\nname = '#a' + \"b#\"\n");
        assert!(index.is_empty());

        let index = CommentIndex::scan("color = \"#ff0000\"  # red \"#f00\"");
        assert_eq!(index.len(), 1);
        assert!(index.records()[0].is_tail);
        assert_eq!(index.records()[0].text.as_deref(), Some("red \"#f00\""));
    }

    #[test]
    fn test_elif_marker() {
        let index = CommentIndex::scan("elif a > 1:");
        assert_eq!(index.records()[0].kind(), CommentKind::Else);
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_cursor_respects_current_line() {
        let index = CommentIndex::scan("# a\nx = 1\n# b\ny = 2\n");
        let mut cursor = index.cursor();

        cursor.prepare(2);
        assert_eq!(cursor.next_line_comment(), Some(Some("a")));
        assert_eq!(cursor.next_line_comment(), None);

        cursor.prepare(4);
        assert_eq!(cursor.next_line_comment(), Some(Some("b")));
        assert!(cursor.is_exhausted());
    }

    #[test]
    fn test_else_marker_blocks_line_comments() {
        let index = CommentIndex::scan("if a:\n    x()\nelse:\n    # c\n    y()\n");
        let mut cursor = index.cursor();
        cursor.prepare(5);
        assert_eq!(cursor.next_line_comment(), None);
        assert!(cursor.take_else());
        assert_eq!(cursor.next_line_comment(), Some(Some("c")));
    }

    #[test]
    fn test_skip_blank_only_adjacent() {
        let index = CommentIndex::scan("a\n\nb\n");
        let mut cursor = index.cursor();
        cursor.prepare(1);
        cursor.skip_blank();
        assert!(cursor.is_exhausted());

        let mut cursor = index.cursor();
        cursor.prepare(0);
        cursor.skip_blank();
        assert_eq!(cursor.consumed(), 0);
    }

    #[test]
    fn test_drain() {
        let index = CommentIndex::scan("# a\n# b\n");
        let mut cursor = index.cursor();
        assert_eq!(cursor.drain().len(), 2);
        assert!(cursor.is_exhausted());
        assert!(cursor.drain().is_empty());
    }
}
