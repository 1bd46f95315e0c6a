//! Display rendering
//!
//! Draws the text window with syntax styles, the mode line, the
//! minibuffer and the completion popup.

use unicode_width::UnicodeWidthChar;

use crate::buffer::Buffer;
use crate::completion::CompletionPopup;
use crate::error::Result;
use crate::syntax::{Color, Span, Style, SyntaxManager, Theme};
use crate::terminal::Terminal;
use crate::window::Window;

/// Everything one frame draws from
pub struct Frame<'a> {
    pub buffer: &'a Buffer,
    pub window: &'a Window,
    pub syntax: &'a SyntaxManager,
    pub theme: &'a Theme,
    pub popup: Option<&'a CompletionPopup>,
}

/// Display state
pub struct Display {
    /// Whether a full redraw is needed
    needs_redraw: bool,
    /// Message to show in minibuffer (bottom line)
    message: Option<String>,
    /// Ring the bell on the next render
    bell: bool,
    /// Whether to show line numbers
    pub show_line_numbers: bool,
}

impl Display {
    pub fn new() -> Self {
        Self {
            needs_redraw: true,
            message: None,
            bell: false,
            show_line_numbers: false,
        }
    }

    /// Toggle line numbers on/off
    pub fn toggle_line_numbers(&mut self) {
        self.show_line_numbers = !self.show_line_numbers;
        self.needs_redraw = true;
    }

    /// Width needed for line numbers (including separator)
    fn line_number_width(&self, line_count: usize) -> usize {
        if !self.show_line_numbers {
            return 0;
        }
        let digits = line_count.max(1).to_string().len();
        digits.max(3) + 1
    }

    /// Mark that a full redraw is needed
    pub fn force_redraw(&mut self) {
        self.needs_redraw = true;
    }

    /// Set a message to display
    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    /// Current minibuffer message
    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Clear the message
    pub fn clear_message(&mut self) {
        self.message = None;
    }

    /// Ring the bell with the next frame
    pub fn beep(&mut self) {
        self.bell = true;
    }

    /// Render the editor display
    pub fn render(&mut self, terminal: &mut Terminal, frame: &Frame) -> Result<()> {
        let cols = terminal.cols() as usize;
        let rows = terminal.rows();

        terminal.set_cursor_visible(false)?;
        if self.needs_redraw {
            terminal.clear_screen()?;
        }

        self.render_window(terminal, frame, cols)?;
        if let Some(popup) = frame.popup {
            self.render_popup(terminal, frame, popup, cols)?;
        }
        self.render_minibuffer(terminal, rows.saturating_sub(1), cols)?;
        self.position_cursor(terminal, frame)?;

        terminal.set_cursor_visible(true)?;
        if self.bell {
            self.bell = false;
            terminal.beep()?;
        }
        terminal.flush()?;

        self.needs_redraw = false;
        Ok(())
    }

    /// Render the text rows and the mode line
    fn render_window(&self, terminal: &mut Terminal, frame: &Frame, cols: usize) -> Result<()> {
        let Frame {
            buffer,
            window,
            syntax,
            theme,
            ..
        } = frame;

        let height = window.height() as usize;
        let top_line = window.top_line();
        let lnum_width = self.line_number_width(buffer.line_count());
        let text_cols = cols.saturating_sub(lnum_width);
        let region = window.region();

        for row_offset in 0..height {
            let line_idx = top_line + row_offset;
            terminal.move_cursor(row_offset as u16, 0)?;

            if let Some(line) = buffer.line(line_idx) {
                if self.show_line_numbers {
                    terminal.set_dim(true)?;
                    terminal.write_str(&format!("{:>w$} ", line_idx + 1, w = lnum_width - 1))?;
                    terminal.set_dim(false)?;
                }

                let selection = region.and_then(|(start, end)| {
                    line_selection(line_idx, line.len(), start, end)
                });
                let segments = styled_segments(
                    line.text(),
                    syntax.line_spans(line_idx),
                    theme,
                    selection,
                    text_cols,
                );
                for (style, text) in segments {
                    if style.is_default() {
                        terminal.write_str(&text)?;
                    } else {
                        terminal.apply_style(&style)?;
                        terminal.write_str(&text)?;
                        terminal.reset_attributes()?;
                    }
                }
            } else {
                if self.show_line_numbers {
                    terminal.write_str(&" ".repeat(lnum_width))?;
                }
                terminal.set_dim(true)?;
                terminal.write_str("~")?;
                terminal.set_dim(false)?;
            }

            terminal.clear_to_eol()?;
        }

        self.render_mode_line(terminal, frame, height as u16, cols)
    }

    /// Render the mode line below the text rows
    fn render_mode_line(&self, terminal: &mut Terminal, frame: &Frame, row: u16, cols: usize) -> Result<()> {
        let buffer = frame.buffer;
        let modified = if buffer.is_modified() { "**" } else { "--" };
        let filename = buffer
            .filename()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| "no file".to_string());

        let line_count = buffer.line_count();
        let cursor_line = frame.window.cursor_line() + 1;
        let percent = if line_count <= 1 {
            "All".to_string()
        } else if cursor_line == 1 {
            "Top".to_string()
        } else if cursor_line >= line_count {
            "Bot".to_string()
        } else {
            format!("{}%", cursor_line * 100 / line_count)
        };
        let highlight = if frame.syntax.enabled { "" } else { " [plain]" };

        let mode_line = format!(
            "{modified}- ty2ini-edit: {} ({filename}) L{cursor_line} {percent}{highlight} ",
            buffer.name()
        );
        let mut padded = truncate_to_width(&mode_line, cols);
        let width = unicode_width::UnicodeWidthStr::width(padded.as_str());
        padded.push_str(&"-".repeat(cols.saturating_sub(width)));

        terminal.move_cursor(row, 0)?;
        terminal.set_reverse(true)?;
        terminal.write_str(&padded)?;
        terminal.set_reverse(false)?;
        Ok(())
    }

    /// Draw the completion list next to the fragment being completed
    fn render_popup(
        &self,
        terminal: &mut Terminal,
        frame: &Frame,
        popup: &CompletionPopup,
        cols: usize,
    ) -> Result<()> {
        let Some(anchor_row) = frame.window.line_to_row(popup.line()) else {
            return Ok(());
        };
        let anchor_col = self.line_number_width(frame.buffer.line_count())
            + frame
                .buffer
                .line(popup.line())
                .map_or(0, |line| line.byte_to_col(popup.fragment_start()));

        let width = popup.width();
        let height = popup.height();
        let (top, left) = popup_origin(
            anchor_row as usize,
            anchor_col,
            width,
            height,
            frame.window.height() as usize,
            cols,
        );

        let normal = Style::fg(Color::Black).with_bg(Color::White);
        let selected = Style::fg(Color::BrightWhite).with_bg(Color::Blue).with_bold();
        for (row, (idx, item)) in popup.visible_items().enumerate() {
            let mut text = truncate_to_width(item, width);
            let pad = width.saturating_sub(unicode_width::UnicodeWidthStr::width(text.as_str()));
            text.push_str(&" ".repeat(pad));

            terminal.move_cursor((top + row) as u16, left as u16)?;
            terminal.apply_style(if idx == popup.selected() { &selected } else { &normal })?;
            terminal.write_str(&text)?;
            terminal.reset_attributes()?;
        }
        Ok(())
    }

    /// Render the minibuffer (message area)
    fn render_minibuffer(&self, terminal: &mut Terminal, row: u16, cols: usize) -> Result<()> {
        terminal.move_cursor(row, 0)?;
        if let Some(ref msg) = self.message {
            terminal.write_str(&truncate_to_width(msg, cols))?;
        }
        terminal.clear_to_eol()?;
        Ok(())
    }

    /// Position the hardware cursor at the correct location
    fn position_cursor(&self, terminal: &mut Terminal, frame: &Frame) -> Result<()> {
        let window = frame.window;
        let cursor_line = window.cursor_line();
        let display_col = frame
            .buffer
            .line(cursor_line)
            .map_or(0, |line| line.byte_to_col(window.cursor_col()));

        let lnum_width = self.line_number_width(frame.buffer.line_count());
        let screen_row = window.line_to_row(cursor_line).unwrap_or(0);
        let screen_col = (lnum_width + display_col).min((terminal.cols() as usize).saturating_sub(1));

        terminal.move_cursor(screen_row, screen_col as u16)
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new()
    }
}

/// Byte range of `line_idx` covered by the region `start..end`
fn line_selection(
    line_idx: usize,
    line_len: usize,
    start: (usize, usize),
    end: (usize, usize),
) -> Option<(usize, usize)> {
    if line_idx < start.0 || line_idx > end.0 {
        return None;
    }
    let from = if line_idx == start.0 { start.1 } else { 0 };
    let to = if line_idx == end.0 { end.1 } else { line_len };
    (from < to).then_some((from, to))
}

/// Split a line into runs of equal style, cut to `max_cols` columns.
///
/// The selection overrides syntax styles. Control characters are shown as
/// a single space so cursor columns stay in step.
fn styled_segments(
    text: &str,
    spans: &[Span],
    theme: &Theme,
    selection: Option<(usize, usize)>,
    max_cols: usize,
) -> Vec<(Style, String)> {
    let mut segments: Vec<(Style, String)> = Vec::new();
    let mut width = 0;

    for (pos, ch) in text.char_indices() {
        let ch_width = ch.width().unwrap_or(1);
        if width + ch_width > max_cols {
            break;
        }
        width += ch_width;

        let style = if selection.is_some_and(|(from, to)| pos >= from && pos < to) {
            Style::reverse()
        } else {
            spans
                .iter()
                .find(|span| span.contains(pos))
                .map_or_else(Style::default, |span| theme.style_for(span.category))
        };
        let shown = if ch.is_control() { ' ' } else { ch };

        match segments.last_mut() {
            Some((last, run)) if *last == style => run.push(shown),
            _ => segments.push((style, shown.to_string())),
        }
    }
    segments
}

/// Top-left cell of the popup.
///
/// Prefers the row below the anchor; flips above when there is no room.
/// Slides left so the popup stays on screen.
fn popup_origin(
    anchor_row: usize,
    anchor_col: usize,
    width: usize,
    height: usize,
    text_rows: usize,
    cols: usize,
) -> (usize, usize) {
    let top = if anchor_row + 1 + height <= text_rows || anchor_row < height {
        anchor_row + 1
    } else {
        anchor_row - height
    };
    let left = anchor_col.min(cols.saturating_sub(width));
    (top, left)
}

/// Truncate a string to fit within a display width
fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut width = 0;

    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(1);
        if width + ch_width > max_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::StyleCategory;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_segments_follow_spans() {
        let theme = Theme::default();
        let spans = [
            Span::new(0, 6, StyleCategory::FieldName),
            Span::new(7, 10, StyleCategory::FieldValue),
        ];
        let segments = styled_segments("Health 100", &spans, &theme, None, 80);
        assert_eq!(
            segments,
            vec![
                (theme.style_for(StyleCategory::FieldName), "Health".to_string()),
                (Style::default(), " ".to_string()),
                (theme.style_for(StyleCategory::FieldValue), "100".to_string()),
            ]
        );
    }

    #[test]
    fn test_selection_overrides_spans() {
        let theme = Theme::default();
        let spans = [Span::new(0, 4, StyleCategory::Keyword)];
        let segments = styled_segments("true", &spans, &theme, Some((2, 4)), 80);
        assert_eq!(segments[0], (theme.style_for(StyleCategory::Keyword), "tr".to_string()));
        assert_eq!(segments[1], (Style::reverse(), "ue".to_string()));
    }

    #[test]
    fn test_segments_truncate_and_blank_tabs() {
        let segments = styled_segments("a\tbcdef", &[], &Theme::default(), None, 4);
        assert_eq!(segments, vec![(Style::default(), "a bc".to_string())]);
    }

    #[test]
    fn test_line_selection() {
        assert_eq!(line_selection(1, 10, (1, 2), (3, 4)), Some((2, 10)));
        assert_eq!(line_selection(2, 10, (1, 2), (3, 4)), Some((0, 10)));
        assert_eq!(line_selection(3, 10, (1, 2), (3, 4)), Some((0, 4)));
        assert_eq!(line_selection(4, 10, (1, 2), (3, 4)), None);
        assert_eq!(line_selection(3, 10, (1, 2), (3, 0)), None);
    }

    #[test]
    fn test_popup_origin() {
        // Fits below
        assert_eq!(popup_origin(2, 5, 10, 4, 20, 80), (3, 5));
        // Flips above near the bottom
        assert_eq!(popup_origin(18, 5, 10, 4, 20, 80), (14, 5));
        // Slides left at the right edge
        assert_eq!(popup_origin(2, 75, 10, 4, 20, 80), (3, 70));
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("名前abc", 3), "名");
        assert_eq!(truncate_to_width("abc", 10), "abc");
    }
}
