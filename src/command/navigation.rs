//! Navigation commands - cursor movement

use super::CommandStatus;
use crate::editor::{EditorState, PromptAction};
use crate::error::Result;
use crate::syntax::is_word_char;

/// Move cursor forward one character
pub fn forward_char(editor: &mut EditorState, _f: bool, n: i32) -> Result<CommandStatus> {
    for _ in 0..n.abs() {
        if n > 0 {
            editor.move_cursor_right();
        } else {
            editor.move_cursor_left();
        }
    }
    Ok(CommandStatus::Success)
}

/// Move cursor backward one character
pub fn backward_char(editor: &mut EditorState, _f: bool, n: i32) -> Result<CommandStatus> {
    for _ in 0..n.abs() {
        if n > 0 {
            editor.move_cursor_left();
        } else {
            editor.move_cursor_right();
        }
    }
    Ok(CommandStatus::Success)
}

/// Move cursor to next line
pub fn next_line(editor: &mut EditorState, _f: bool, n: i32) -> Result<CommandStatus> {
    for _ in 0..n.abs() {
        if n > 0 {
            editor.move_cursor_down();
        } else {
            editor.move_cursor_up();
        }
    }
    Ok(CommandStatus::Success)
}

/// Move cursor to previous line
pub fn previous_line(editor: &mut EditorState, _f: bool, n: i32) -> Result<CommandStatus> {
    for _ in 0..n.abs() {
        if n > 0 {
            editor.move_cursor_up();
        } else {
            editor.move_cursor_down();
        }
    }
    Ok(CommandStatus::Success)
}

/// Move cursor to beginning of line
pub fn beginning_of_line(editor: &mut EditorState, _f: bool, _n: i32) -> Result<CommandStatus> {
    editor.move_to_bol();
    Ok(CommandStatus::Success)
}

/// Move cursor to end of line
pub fn end_of_line(editor: &mut EditorState, _f: bool, _n: i32) -> Result<CommandStatus> {
    editor.move_to_eol();
    Ok(CommandStatus::Success)
}

/// Scroll down (next page)
pub fn scroll_down(editor: &mut EditorState, _f: bool, _n: i32) -> Result<CommandStatus> {
    editor.page(true);
    Ok(CommandStatus::Success)
}

/// Scroll up (previous page)
pub fn scroll_up(editor: &mut EditorState, _f: bool, _n: i32) -> Result<CommandStatus> {
    editor.page(false);
    Ok(CommandStatus::Success)
}

/// Move to beginning of buffer
pub fn beginning_of_buffer(editor: &mut EditorState, _f: bool, _n: i32) -> Result<CommandStatus> {
    editor.move_to_buffer_start();
    Ok(CommandStatus::Success)
}

/// Move to end of buffer
pub fn end_of_buffer(editor: &mut EditorState, _f: bool, _n: i32) -> Result<CommandStatus> {
    editor.move_to_buffer_end();
    Ok(CommandStatus::Success)
}

/// Go to line (M-g); a numeric argument jumps directly
pub fn goto_line(editor: &mut EditorState, f: bool, n: i32) -> Result<CommandStatus> {
    if f {
        editor.goto_line(n.max(1) as usize);
    } else {
        editor.start_prompt("Goto line", PromptAction::GotoLine, None);
    }
    Ok(CommandStatus::Success)
}

/// Move forward past the end of the next word
pub fn forward_word(editor: &mut EditorState, _f: bool, n: i32) -> Result<CommandStatus> {
    for _ in 0..n.max(1) {
        // Skip non-word characters, then the word itself
        while !at_buffer_end(editor) && !word_char_after(editor) {
            editor.move_cursor_right();
        }
        while !at_buffer_end(editor) && word_char_after(editor) {
            editor.move_cursor_right();
        }
    }
    Ok(CommandStatus::Success)
}

/// Move backward to the start of the previous word
pub fn backward_word(editor: &mut EditorState, _f: bool, n: i32) -> Result<CommandStatus> {
    for _ in 0..n.max(1) {
        while !at_buffer_start(editor) && !word_char_before(editor) {
            editor.move_cursor_left();
        }
        while !at_buffer_start(editor) && word_char_before(editor) {
            editor.move_cursor_left();
        }
    }
    Ok(CommandStatus::Success)
}

fn at_buffer_start(editor: &EditorState) -> bool {
    editor.window.cursor_line() == 0 && editor.window.cursor_col() == 0
}

fn at_buffer_end(editor: &EditorState) -> bool {
    let line = editor.window.cursor_line();
    let len = editor.buffer.line(line).map_or(0, |l| l.len());
    line + 1 >= editor.buffer.line_count() && editor.window.cursor_col() >= len
}

fn word_char_after(editor: &EditorState) -> bool {
    editor
        .buffer
        .line(editor.window.cursor_line())
        .and_then(|l| l.text().get(editor.window.cursor_col()..))
        .and_then(|rest| rest.chars().next())
        .is_some_and(is_word_char)
}

fn word_char_before(editor: &EditorState) -> bool {
    editor
        .buffer
        .line(editor.window.cursor_line())
        .and_then(|l| l.text().get(..editor.window.cursor_col()))
        .and_then(|head| head.chars().next_back())
        .is_some_and(is_word_char)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::tests_support::editor_with_text;

    #[test]
    fn test_word_movement() {
        let mut ed = editor_with_text(&["Health 100", "Speed"]);
        forward_word(&mut ed, false, 1).unwrap();
        assert_eq!(ed.window.cursor_col(), 6);
        forward_word(&mut ed, false, 2).unwrap();
        assert_eq!((ed.window.cursor_line(), ed.window.cursor_col()), (1, 5));
        backward_word(&mut ed, false, 1).unwrap();
        assert_eq!((ed.window.cursor_line(), ed.window.cursor_col()), (1, 0));
    }

    #[test]
    fn test_goto_line_with_argument() {
        let mut ed = editor_with_text(&["a", "b", "c"]);
        goto_line(&mut ed, true, 3).unwrap();
        assert_eq!(ed.window.cursor_line(), 2);
        goto_line(&mut ed, true, 99).unwrap();
        assert_eq!(ed.window.cursor_line(), 2);
    }

    #[test]
    fn test_vertical_movement_keeps_goal_column() {
        let mut ed = editor_with_text(&["Health 100", "x", "Speed 20"]);
        end_of_line(&mut ed, false, 1).unwrap();
        next_line(&mut ed, false, 1).unwrap();
        assert_eq!(ed.window.cursor_col(), 1);
        next_line(&mut ed, false, 1).unwrap();
        assert_eq!(ed.window.cursor_col(), 8);
    }
}
