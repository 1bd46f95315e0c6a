//! Window representation - the viewport onto the document

/// Cursor, mark and scroll position of the single editing window
#[derive(Debug)]
pub struct Window {
    /// First visible line in the window
    top_line: usize,
    /// Cursor line position (0-indexed)
    cursor_line: usize,
    /// Cursor column position (byte offset within line)
    cursor_col: usize,
    /// Mark position for region commands
    mark: Option<(usize, usize)>,
    /// Number of text rows (excluding mode line)
    height: u16,
    /// Goal column for vertical movement
    goal_col: usize,
}

impl Window {
    pub fn new(height: u16) -> Self {
        Self {
            top_line: 0,
            cursor_line: 0,
            cursor_col: 0,
            mark: None,
            height,
            goal_col: 0,
        }
    }

    /// Put the cursor back at the top of a freshly loaded document
    pub fn reset(&mut self) {
        self.top_line = 0;
        self.cursor_line = 0;
        self.cursor_col = 0;
        self.mark = None;
        self.goal_col = 0;
    }

    /// Get the top visible line
    pub fn top_line(&self) -> usize {
        self.top_line
    }

    /// Get cursor line
    pub fn cursor_line(&self) -> usize {
        self.cursor_line
    }

    /// Get cursor column (byte offset)
    pub fn cursor_col(&self) -> usize {
        self.cursor_col
    }

    /// Set cursor position
    pub fn set_cursor(&mut self, line: usize, col: usize) {
        self.cursor_line = line;
        self.cursor_col = col;
    }

    /// Get the goal column for vertical movement
    pub fn goal_col(&self) -> usize {
        self.goal_col
    }

    /// Set the goal column
    pub fn set_goal_col(&mut self, col: usize) {
        self.goal_col = col;
    }

    pub fn mark(&self) -> Option<(usize, usize)> {
        self.mark
    }

    /// Set mark at current cursor position
    pub fn set_mark(&mut self) {
        self.mark = Some((self.cursor_line, self.cursor_col));
    }

    pub fn clear_mark(&mut self) {
        self.mark = None;
    }

    /// Mark and cursor in document order, if a mark is set
    pub fn region(&self) -> Option<((usize, usize), (usize, usize))> {
        let mark = self.mark?;
        let cursor = (self.cursor_line, self.cursor_col);
        Some(if mark <= cursor { (mark, cursor) } else { (cursor, mark) })
    }

    /// Get window height in rows
    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn set_height(&mut self, height: u16) {
        self.height = height;
    }

    /// Ensure cursor is visible, adjusting top_line if needed
    pub fn ensure_cursor_visible(&mut self) {
        let height = (self.height as usize).max(1);
        if self.cursor_line < self.top_line {
            self.top_line = self.cursor_line;
        } else if self.cursor_line >= self.top_line + height {
            self.top_line = self.cursor_line + 1 - height;
        }
    }

    /// Screen row of a document line, if visible
    pub fn line_to_row(&self, line: usize) -> Option<u16> {
        (line >= self.top_line && line < self.top_line + self.height as usize)
            .then(|| (line - self.top_line) as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scrolls_to_cursor() {
        let mut win = Window::new(5);
        win.set_cursor(12, 0);
        win.ensure_cursor_visible();
        assert_eq!(win.top_line(), 8);
        assert_eq!(win.line_to_row(12), Some(4));
        assert_eq!(win.line_to_row(7), None);

        win.set_cursor(3, 0);
        win.ensure_cursor_visible();
        assert_eq!(win.top_line(), 3);
    }

    #[test]
    fn test_region_is_ordered() {
        let mut win = Window::new(5);
        win.set_cursor(2, 4);
        win.set_mark();
        win.set_cursor(1, 0);
        assert_eq!(win.region(), Some(((1, 0), (2, 4))));
        win.clear_mark();
        assert_eq!(win.region(), None);
    }
}
