//! Line representation and text operations

use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

/// A single line of document text, without its newline
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Line {
    text: String,
}

impl Line {
    /// Create a new empty line
    pub fn new() -> Self {
        Self::default()
    }

    /// Get the text content
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Get the length in bytes
    pub fn len(&self) -> usize {
        self.text.len()
    }

    /// Insert a character at byte position
    pub fn insert_char(&mut self, byte_pos: usize, ch: char) {
        self.text.insert(byte_pos, ch);
    }

    /// Insert a string at byte position
    pub fn insert_str(&mut self, byte_pos: usize, s: &str) {
        self.text.insert_str(byte_pos, s);
    }

    /// Delete a range of bytes and return the deleted text
    pub fn delete_range(&mut self, start: usize, end: usize) -> String {
        self.text.drain(start..end).collect()
    }

    /// Split the line at byte position, returning the remainder
    pub fn split_off(&mut self, byte_pos: usize) -> Line {
        Line {
            text: self.text.split_off(byte_pos),
        }
    }

    /// Append another line's content to this line
    pub fn append(&mut self, other: Line) {
        self.text.push_str(&other.text);
    }

    /// Byte position of the character at display column `col`.
    /// Columns past the end map to the line length.
    pub fn col_to_byte(&self, col: usize) -> usize {
        let mut current = 0;
        for (byte_idx, ch) in self.text.char_indices() {
            if current >= col {
                return byte_idx;
            }
            current += ch.width().unwrap_or(1);
        }
        self.text.len()
    }

    /// Display column of a byte position
    pub fn byte_to_col(&self, byte_pos: usize) -> usize {
        self.text[..self.floor_char_boundary(byte_pos)].width()
    }

    /// Nearest char boundary at or before `pos`
    pub fn floor_char_boundary(&self, pos: usize) -> usize {
        let mut p = pos.min(self.text.len());
        while p > 0 && !self.text.is_char_boundary(p) {
            p -= 1;
        }
        p
    }

    /// Byte position of the character after `byte_pos`
    pub fn next_char_boundary(&self, byte_pos: usize) -> usize {
        self.text[byte_pos..]
            .chars()
            .next()
            .map_or(self.text.len(), |ch| byte_pos + ch.len_utf8())
    }

    /// Byte position of the character before `byte_pos`
    pub fn prev_char_boundary(&self, byte_pos: usize) -> usize {
        self.text[..byte_pos]
            .chars()
            .next_back()
            .map_or(0, |ch| byte_pos - ch.len_utf8())
    }
}

impl From<&str> for Line {
    fn from(s: &str) -> Self {
        Self {
            text: s.to_string(),
        }
    }
}

impl From<String> for Line {
    fn from(text: String) -> Self {
        Self { text }
    }
}
