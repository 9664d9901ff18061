//! Source position types.
//!
//! Offsets are byte offsets into the (line-ending normalized) input. Lines are
//! 1-based and columns are 0-based, measured in bytes from the line start.

use std::fmt;

use serde::Serialize;

/// A position in source text, measured as a byte offset from the start.
pub type TextPos = u32;

/// A line/column pair. Lines start at 1, columns at 0.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Serialize)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    #[inline]
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The start and end positions of a node, token or comment.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default, Serialize)]
pub struct SourceLocation {
    pub start: Position,
    pub end: Position,
}

impl SourceLocation {
    #[inline]
    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

impl fmt::Debug for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}-{:?}", self.start, self.end)
    }
}

/// A map from byte offsets to line numbers, built from source text.
///
/// Recognises `\n`, `\r`, `\r\n`, U+2028 and U+2029 as line terminators,
/// matching the tokenizer's own line counting.
#[derive(Debug, Clone)]
pub struct LineMap {
    /// Byte offsets of the start of each line.
    line_starts: Vec<TextPos>,
}

impl LineMap {
    /// Build a line map from source text.
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![0u32];
        let mut skip_until = 0usize;
        for i in memchr::memchr3_iter(b'\n', b'\r', 0xE2, bytes) {
            if i < skip_until {
                continue;
            }
            match bytes[i] {
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    line_starts.push((i + 2) as u32);
                    skip_until = i + 2;
                }
                b'\r' | b'\n' => line_starts.push((i + 1) as u32),
                // U+2028 and U+2029 encode as E2 80 A8 / E2 80 A9.
                _ => {
                    if bytes.get(i + 1) == Some(&0x80) && matches!(bytes.get(i + 2), Some(0xA8) | Some(0xA9)) {
                        line_starts.push((i + 3) as u32);
                    }
                }
            }
        }
        Self { line_starts }
    }

    /// Get the line index (0-based) for a byte offset.
    pub fn line_of(&self, pos: TextPos) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line as u32,
            Err(line) => (line - 1) as u32,
        }
    }

    /// Get the 1-based line and 0-based column for a byte offset.
    pub fn position_of(&self, pos: TextPos) -> Position {
        let line = self.line_of(pos);
        let line_start = self.line_starts[line as usize];
        Position::new(line + 1, pos - line_start)
    }

    /// Get the byte offset of the start of a 0-based line.
    pub fn line_start(&self, line: u32) -> TextPos {
        self.line_starts[line as usize]
    }

    /// Get the total number of lines.
    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

/// Compute the position of a single offset without keeping a map around.
///
/// Used on error paths, where building a full [`LineMap`] is not worth it.
pub fn line_info(input: &str, offset: TextPos) -> Position {
    let end = (offset as usize).min(input.len());
    LineMap::new(&input[..floor_char_boundary(input, end)]).position_of(offset)
}

fn floor_char_boundary(input: &str, mut index: usize) -> usize {
    while index > 0 && !input.is_char_boundary(index) {
        index -= 1;
    }
    index
}

/// Does `text` contain any line terminator?
pub fn has_line_break(text: &str) -> bool {
    memchr::memchr2(b'\n', b'\r', text.as_bytes()).is_some() || text.contains(['\u{2028}', '\u{2029}'])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_line_map() {
        let text = "line1\nline2\nline3";
        let map = LineMap::new(text);
        assert_eq!(map.line_count(), 3);
        assert_eq!(map.line_of(0), 0);
        assert_eq!(map.line_of(5), 0); // newline char
        assert_eq!(map.line_of(6), 1); // start of line2
        assert_eq!(map.line_of(12), 2);

        let pos = map.position_of(8);
        assert_eq!(pos, Position::new(2, 2));
    }

    #[test]
    fn test_line_map_other_terminators() {
        let map = LineMap::new("a\r\nb\rc\u{2028}d");
        assert_eq!(map.line_count(), 4);
        assert_eq!(map.position_of(3), Position::new(2, 0));
        assert_eq!(map.position_of(5), Position::new(3, 0));
        assert_eq!(map.position_of(9), Position::new(4, 0));
    }

    #[test]
    fn test_line_info() {
        assert_eq!(line_info("var a;\nvar b", 11), Position::new(2, 4));
        assert_eq!(line_info("", 0), Position::new(1, 0));
        // Offsets at the end of the input are still reportable.
        assert_eq!(line_info("ab", 2), Position::new(1, 2));
    }

    #[test]
    fn test_has_line_break() {
        assert!(has_line_break("a\nb"));
        assert!(has_line_break("\u{2029}"));
        assert!(!has_line_break("  /* x */ "));
    }
}
