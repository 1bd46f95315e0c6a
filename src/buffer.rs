//! The document being edited
//!
//! Every mutation records a `TextChange` so the highlighter can restyle
//! just the lines that moved or changed.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::document;
use crate::line::Line;
use crate::syntax::TextChange;

/// Lines of text with file binding and change tracking
#[derive(Debug)]
pub struct Buffer {
    /// Always at least one line
    lines: Vec<Line>,
    /// Name shown in the mode line
    name: String,
    /// Path the document was opened from
    filename: Option<PathBuf>,
    modified: bool,
    /// Changes not yet seen by the highlighter
    changes: Vec<TextChange>,
}

impl Buffer {
    /// Create a new empty buffer with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            lines: vec![Line::new()],
            name: name.into(),
            filename: None,
            modified: false,
            changes: Vec::new(),
        }
    }

    /// Buffer holding `lines`, bound to `path`
    pub fn from_lines(path: &Path, lines: Vec<String>) -> Self {
        let mut buffer = Self::new(document::document_name(path));
        buffer.filename = Some(path.to_path_buf());
        buffer.set_content(lines);
        buffer.modified = false;
        buffer.changes.clear();
        buffer
    }

    /// Get buffer name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get filename if set
    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    /// Rebind the buffer to a new path
    pub fn set_filename(&mut self, path: PathBuf) {
        self.name = document::document_name(&path);
        self.filename = Some(path);
    }

    /// Check if buffer is modified
    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    /// Get number of lines
    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    /// Get a line by index
    pub fn line(&self, idx: usize) -> Option<&Line> {
        self.lines.get(idx)
    }

    /// Get all lines
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// Owned copy of the text, one string per line
    pub fn text_lines(&self) -> Vec<String> {
        self.lines.iter().map(|l| l.text().to_string()).collect()
    }

    /// Drain the changes recorded since the last call
    pub fn take_changes(&mut self) -> Vec<TextChange> {
        std::mem::take(&mut self.changes)
    }

    fn changed(&mut self, change: TextChange) {
        self.modified = true;
        self.changes.push(change);
    }

    /// Replace the whole content
    pub fn set_content(&mut self, lines: Vec<String>) {
        let old_count = self.lines.len();
        self.lines = lines.into_iter().map(Line::from).collect();
        if self.lines.is_empty() {
            self.lines.push(Line::new());
        }
        let new_count = self.lines.len();
        self.changed(TextChange::replace_all(old_count, new_count));
    }

    /// Insert a character at position
    pub fn insert_char(&mut self, line_idx: usize, byte_pos: usize, ch: char) {
        if let Some(line) = self.lines.get_mut(line_idx) {
            line.insert_char(byte_pos, ch);
            self.changed(TextChange::line(line_idx));
        }
    }

    /// Insert text that may span lines; returns the position after it
    pub fn insert_str(&mut self, line_idx: usize, byte_pos: usize, text: &str) -> (usize, usize) {
        let Some(line) = self.lines.get_mut(line_idx) else {
            return (line_idx, byte_pos);
        };

        let tail = line.split_off(byte_pos);
        let mut pieces = text.split('\n');
        if let Some(first) = pieces.next() {
            line.insert_str(byte_pos, first);
        }

        let mut end = (line_idx, byte_pos + text.split('\n').next().map_or(0, str::len));
        let mut inserted = 1;
        for piece in pieces {
            let idx = line_idx + inserted;
            self.lines.insert(idx, Line::from(piece));
            end = (idx, piece.len());
            inserted += 1;
        }
        if let Some(last) = self.lines.get_mut(end.0) {
            last.append(tail);
        }

        self.changed(TextChange {
            first_line: line_idx,
            removed: 1,
            inserted,
        });
        end
    }

    /// Insert a newline, splitting the current line
    pub fn insert_newline(&mut self, line_idx: usize, byte_pos: usize) {
        if let Some(line) = self.lines.get_mut(line_idx) {
            let new_line = line.split_off(byte_pos);
            self.lines.insert(line_idx + 1, new_line);
            self.changed(TextChange {
                first_line: line_idx,
                removed: 1,
                inserted: 2,
            });
        }
    }

    /// Delete a character at position, returns the deleted char
    pub fn delete_char(&mut self, line_idx: usize, byte_pos: usize) -> Option<char> {
        let line = self.lines.get_mut(line_idx)?;
        let ch = line.text().get(byte_pos..)?.chars().next()?;
        line.delete_range(byte_pos, byte_pos + ch.len_utf8());
        self.changed(TextChange::line(line_idx));
        Some(ch)
    }

    /// Delete backward (backspace), returns the deleted char and new position
    pub fn delete_backward(&mut self, line_idx: usize, byte_pos: usize) -> Option<(char, usize)> {
        if byte_pos == 0 {
            return None;
        }
        let line = self.lines.get_mut(line_idx)?;
        let ch = line.text().get(..byte_pos)?.chars().next_back()?;
        let new_pos = byte_pos - ch.len_utf8();
        line.delete_range(new_pos, byte_pos);
        self.changed(TextChange::line(line_idx));
        Some((ch, new_pos))
    }

    /// Join line with the next line (delete newline at end of line)
    pub fn join_line(&mut self, line_idx: usize) -> bool {
        if line_idx + 1 >= self.lines.len() {
            return false;
        }
        let next_line = self.lines.remove(line_idx + 1);
        self.lines[line_idx].append(next_line);
        self.changed(TextChange {
            first_line: line_idx,
            removed: 2,
            inserted: 1,
        });
        true
    }

    /// Join with previous line (when backspacing at start of line)
    pub fn join_with_previous(&mut self, line_idx: usize) -> Option<usize> {
        if line_idx == 0 || line_idx >= self.lines.len() {
            return None;
        }
        let join_pos = self.lines[line_idx - 1].len();
        self.join_line(line_idx - 1);
        Some(join_pos)
    }

    /// Kill from position to end of line, returns killed text
    pub fn kill_to_eol(&mut self, line_idx: usize, byte_pos: usize) -> Option<String> {
        let line_len = self.lines.get(line_idx)?.len();
        if byte_pos < line_len {
            let killed = self.lines[line_idx].delete_range(byte_pos, line_len);
            self.changed(TextChange::line(line_idx));
            Some(killed)
        } else if self.join_line(line_idx) {
            // At end of line, kill the newline
            Some("\n".to_string())
        } else {
            None
        }
    }

    /// Text between two positions (start must not follow end)
    pub fn region_text(&self, start: (usize, usize), end: (usize, usize)) -> String {
        let mut text = String::new();
        for idx in start.0..=end.0.min(self.lines.len().saturating_sub(1)) {
            let line = self.lines[idx].text();
            let from = if idx == start.0 { start.1.min(line.len()) } else { 0 };
            let to = if idx == end.0 { end.1.min(line.len()) } else { line.len() };
            if idx > start.0 {
                text.push('\n');
            }
            text.push_str(line.get(from..to).unwrap_or(""));
        }
        text
    }

    /// Delete between two positions, returning the removed text
    pub fn delete_region(&mut self, start: (usize, usize), end: (usize, usize)) -> String {
        let last = end.0.min(self.lines.len().saturating_sub(1));
        let removed_text = self.region_text(start, (last, end.1));

        let tail_at = end.1.min(self.lines[last].len());
        let tail = self.lines[last].split_off(tail_at);
        let head_at = start.1.min(self.lines[start.0].len());
        self.lines[start.0].split_off(head_at);
        self.lines.drain(start.0 + 1..=last);
        self.lines[start.0].append(tail);

        self.changed(TextChange {
            first_line: start.0,
            removed: last - start.0 + 1,
            inserted: 1,
        });
        removed_text
    }

    /// Write the buffer as text, lines joined with `\n`
    pub fn write_to(&self, path: &Path) -> std::io::Result<()> {
        let mut file = fs::File::create(path)?;
        for (i, line) in self.lines.iter().enumerate() {
            if i > 0 {
                writeln!(file)?;
            }
            write!(file, "{}", line.text())?;
        }
        Ok(())
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new("*untitled*")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn buffer(lines: &[&str]) -> Buffer {
        let lines = lines.iter().map(|s| s.to_string()).collect();
        Buffer::from_lines(Path::new("unit.txt"), lines)
    }

    #[test]
    fn test_from_lines_is_clean() {
        let mut buf = buffer(&["name Unit"]);
        assert_eq!(buf.name(), "unit.txt");
        assert!(!buf.is_modified());
        assert!(buf.take_changes().is_empty());

        let empty = Buffer::from_lines(Path::new("new.ini"), Vec::new());
        assert_eq!(empty.line_count(), 1);
    }

    #[test]
    fn test_edits_record_changes() {
        let mut buf = buffer(&["Health 5", "Speed 2"]);
        buf.insert_char(0, 8, '0');
        buf.insert_newline(1, 5);
        assert_eq!(buf.text_lines(), vec!["Health 50", "Speed", " 2"]);
        assert!(buf.is_modified());

        assert_eq!(
            buf.take_changes(),
            vec![
                TextChange::line(0),
                TextChange { first_line: 1, removed: 1, inserted: 2 },
            ]
        );
        assert!(buf.take_changes().is_empty());
    }

    #[test]
    fn test_join_records_two_into_one() {
        let mut buf = buffer(&["Speed", " 2"]);
        assert_eq!(buf.join_with_previous(1), Some(5));
        assert_eq!(buf.text_lines(), vec!["Speed 2"]);
        assert_eq!(
            buf.take_changes(),
            vec![TextChange { first_line: 0, removed: 2, inserted: 1 }]
        );
    }

    #[test]
    fn test_delete_backward_multibyte() {
        let mut buf = buffer(&["café"]);
        assert_eq!(buf.delete_backward(0, 5), Some(('é', 3)));
        assert_eq!(buf.text_lines(), vec!["caf"]);
        assert_eq!(buf.delete_backward(0, 0), None);
    }

    #[test]
    fn test_kill_to_eol() {
        let mut buf = buffer(&["Health 5", "Speed"]);
        assert_eq!(buf.kill_to_eol(0, 6), Some(" 5".to_string()));
        assert_eq!(buf.kill_to_eol(0, 6), Some("\n".to_string()));
        assert_eq!(buf.text_lines(), vec!["HealthSpeed"]);
        assert_eq!(buf.kill_to_eol(0, 11), None);
    }

    #[test]
    fn test_insert_multiline_text() {
        let mut buf = buffer(&["ab"]);
        let end = buf.insert_str(0, 1, "x\ny\nz");
        assert_eq!(buf.text_lines(), vec!["ax", "y", "zb"]);
        assert_eq!(end, (2, 1));
        assert_eq!(
            buf.take_changes(),
            vec![TextChange { first_line: 0, removed: 1, inserted: 3 }]
        );
    }

    #[test]
    fn test_delete_region() {
        let mut buf = buffer(&["name Unit", "Health 5", "Speed 2"]);
        let removed = buf.delete_region((0, 5), (2, 5));
        assert_eq!(removed, "Unit\nHealth 5\nSpeed");
        assert_eq!(buf.text_lines(), vec!["name  2"]);
        assert_eq!(
            buf.take_changes(),
            vec![TextChange { first_line: 0, removed: 3, inserted: 1 }]
        );
    }

    #[test]
    fn test_delete_region_clamps_columns() {
        let mut buf = buffer(&["Speed 2", "x"]);
        let removed = buf.delete_region((0, 6), (0, 99));
        assert_eq!(removed, "2");
        assert_eq!(buf.text_lines(), vec!["Speed ", "x"]);
        assert_eq!(buf.take_changes(), vec![TextChange::line(0)]);
    }

    #[test]
    fn test_write_to() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.txt");
        buffer(&["name Unit", "Health 5"]).write_to(&path).unwrap();
        assert_eq!(fs::read_to_string(&path).unwrap(), "name Unit\nHealth 5");
    }
}
