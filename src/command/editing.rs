//! Editing commands - insert, delete, kill and yank

use super::CommandStatus;
use crate::editor::EditorState;
use crate::error::Result;

/// Delete character at cursor (C-d); joins lines at end of line
pub fn delete_char_forward(editor: &mut EditorState, _f: bool, n: i32) -> Result<CommandStatus> {
    for _ in 0..n.max(1) {
        let line = editor.window.cursor_line();
        let col = editor.window.cursor_col();
        let line_len = editor.buffer.line(line).map_or(0, |l| l.len());

        if col < line_len {
            editor.buffer.delete_char(line, col);
        } else if !editor.buffer.join_line(line) {
            return Ok(CommandStatus::Failure);
        }
    }
    Ok(CommandStatus::Success)
}

/// Delete character before cursor (backspace)
pub fn delete_char_backward(editor: &mut EditorState, _f: bool, n: i32) -> Result<CommandStatus> {
    for _ in 0..n.max(1) {
        let line = editor.window.cursor_line();
        let col = editor.window.cursor_col();

        if let Some((_, new_col)) = editor.buffer.delete_backward(line, col) {
            editor.window.set_cursor(line, new_col);
        } else if let Some(join_col) = editor.buffer.join_with_previous(line) {
            editor.window.set_cursor(line - 1, join_col);
        } else {
            return Ok(CommandStatus::Failure);
        }
    }
    editor.update_goal_col();
    Ok(CommandStatus::Success)
}

/// Kill to end of line (C-k); at end of line the newline is killed
pub fn kill_line(editor: &mut EditorState, f: bool, n: i32) -> Result<CommandStatus> {
    editor.start_kill();

    let line = editor.window.cursor_line();
    let col = editor.window.cursor_col();

    if f && n > 0 {
        // Kill whole lines from the cursor line
        editor.window.set_cursor(line, 0);
        for _ in 0..n {
            let Some(killed) = editor.buffer.kill_to_eol(line, 0) else {
                break;
            };
            editor.kill_append(&killed);
            if killed != "\n" {
                if let Some(newline) = editor.buffer.kill_to_eol(line, 0) {
                    editor.kill_append(&newline);
                }
            }
        }
    } else if let Some(killed) = editor.buffer.kill_to_eol(line, col) {
        editor.kill_append(&killed);
    } else {
        return Ok(CommandStatus::Failure);
    }

    Ok(CommandStatus::Success)
}

/// Yank killed text (C-y)
pub fn yank(editor: &mut EditorState, _f: bool, n: i32) -> Result<CommandStatus> {
    let Some(text) = editor.yank_text().map(str::to_string) else {
        editor.display.set_message("Kill ring is empty");
        return Ok(CommandStatus::Failure);
    };

    for _ in 0..n.max(1) {
        editor.insert_text(&text);
    }
    Ok(CommandStatus::Success)
}

/// Insert newline (Enter)
pub fn newline(editor: &mut EditorState, _f: bool, n: i32) -> Result<CommandStatus> {
    for _ in 0..n.max(1) {
        editor.insert_newline();
    }
    Ok(CommandStatus::Success)
}

/// Open line: insert newline after cursor without moving (C-o)
pub fn open_line(editor: &mut EditorState, _f: bool, n: i32) -> Result<CommandStatus> {
    let line = editor.window.cursor_line();
    let col = editor.window.cursor_col();
    for _ in 0..n.max(1) {
        editor.buffer.insert_newline(line, col);
    }
    Ok(CommandStatus::Success)
}

/// Insert spaces up to the next tab stop (Tab)
pub fn insert_tab(editor: &mut EditorState, _f: bool, n: i32) -> Result<CommandStatus> {
    let tab_width = editor.tab_width.max(1);
    for _ in 0..n.max(1) {
        let col = editor
            .buffer
            .line(editor.window.cursor_line())
            .map_or(0, |l| l.byte_to_col(editor.window.cursor_col()));
        let spaces = tab_width - col % tab_width;
        editor.insert_text(&" ".repeat(spaces));
    }
    Ok(CommandStatus::Success)
}

/// Set mark at cursor (C-space)
pub fn set_mark(editor: &mut EditorState, _f: bool, _n: i32) -> Result<CommandStatus> {
    editor.window.set_mark();
    editor.display.set_message("Mark set");
    Ok(CommandStatus::Success)
}

/// Kill region between mark and cursor (C-w)
pub fn kill_region(editor: &mut EditorState, _f: bool, _n: i32) -> Result<CommandStatus> {
    let Some((start, end)) = editor.window.region() else {
        editor.display.set_message("No mark set");
        return Ok(CommandStatus::Failure);
    };

    let killed = editor.buffer.delete_region(start, end);
    editor.start_kill();
    editor.kill_append(&killed);
    editor.window.set_cursor(start.0, start.1);
    editor.window.clear_mark();
    editor.update_goal_col();
    Ok(CommandStatus::Success)
}

/// Copy region to kill ring without deleting (M-w)
pub fn copy_region(editor: &mut EditorState, _f: bool, _n: i32) -> Result<CommandStatus> {
    let Some((start, end)) = editor.window.region() else {
        editor.display.set_message("No mark set");
        return Ok(CommandStatus::Failure);
    };

    let text = editor.buffer.region_text(start, end);
    editor.start_kill();
    editor.kill_append(&text);
    editor.display.set_message("Region copied");
    Ok(CommandStatus::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::tests_support::editor_with_text;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_delete_forward_joins_lines() {
        let mut ed = editor_with_text(&["ab", "cd"]);
        ed.window.set_cursor(0, 2);
        delete_char_forward(&mut ed, false, 1).unwrap();
        assert_eq!(ed.buffer.text_lines(), vec!["abcd"]);
        ed.window.set_cursor(0, 4);
        assert_eq!(
            delete_char_forward(&mut ed, false, 1).unwrap(),
            CommandStatus::Failure
        );
    }

    #[test]
    fn test_backspace_at_buffer_start_fails() {
        let mut ed = editor_with_text(&["x"]);
        assert_eq!(
            delete_char_backward(&mut ed, false, 1).unwrap(),
            CommandStatus::Failure
        );
        assert!(!ed.buffer.is_modified());
    }

    #[test]
    fn test_kill_whole_lines_with_argument() {
        let mut ed = editor_with_text(&["one", "two", "three"]);
        ed.window.set_cursor(0, 1);
        kill_line(&mut ed, true, 2).unwrap();
        assert_eq!(ed.buffer.text_lines(), vec!["three"]);
        assert_eq!(ed.yank_text(), Some("one\ntwo\n"));
    }

    #[test]
    fn test_tab_inserts_to_next_stop() {
        let mut ed = editor_with_text(&["ab"]);
        ed.tab_width = 4;
        ed.window.set_cursor(0, 2);
        insert_tab(&mut ed, false, 1).unwrap();
        assert_eq!(ed.buffer.text_lines(), vec!["ab  "]);
        insert_tab(&mut ed, false, 1).unwrap();
        assert_eq!(ed.buffer.text_lines(), vec!["ab      "]);
        assert_eq!(ed.window.cursor_col(), 8);
    }

    #[test]
    fn test_kill_region_across_lines() {
        let mut ed = editor_with_text(&["Health 5", "Speed 2"]);
        ed.window.set_cursor(0, 7);
        set_mark(&mut ed, false, 1).unwrap();
        ed.window.set_cursor(1, 5);
        kill_region(&mut ed, false, 1).unwrap();

        assert_eq!(ed.buffer.text_lines(), vec!["Health  2"]);
        assert_eq!(ed.yank_text(), Some("5\nSpeed"));
        assert_eq!((ed.window.cursor_line(), ed.window.cursor_col()), (0, 7));
    }

    #[test]
    fn test_copy_region_needs_mark() {
        let mut ed = editor_with_text(&["abc"]);
        assert_eq!(copy_region(&mut ed, false, 1).unwrap(), CommandStatus::Failure);
        ed.window.set_mark();
        ed.window.set_cursor(0, 2);
        copy_region(&mut ed, false, 1).unwrap();
        assert_eq!(ed.yank_text(), Some("ab"));
        assert_eq!(ed.buffer.text_lines(), vec!["abc"]);
    }
}
