//! Miscellaneous commands

use super::CommandStatus;
use crate::editor::{EditorState, PromptAction};
use crate::error::Result;

/// Redraw the display (C-l)
pub fn redraw_display(editor: &mut EditorState, _f: bool, _n: i32) -> Result<CommandStatus> {
    editor.force_redraw();
    Ok(CommandStatus::Success)
}

/// Toggle line numbers display (C-x #)
pub fn toggle_line_numbers(editor: &mut EditorState, _f: bool, _n: i32) -> Result<CommandStatus> {
    editor.display.toggle_line_numbers();
    editor.force_redraw();
    let status = if editor.display.show_line_numbers {
        "Line numbers enabled"
    } else {
        "Line numbers disabled"
    };
    editor.display.set_message(status);
    Ok(CommandStatus::Success)
}

/// Toggle syntax highlighting (C-x s)
pub fn toggle_syntax_highlighting(editor: &mut EditorState, _f: bool, _n: i32) -> Result<CommandStatus> {
    editor.syntax.toggle();
    editor.force_redraw();
    let status = if editor.syntax.enabled {
        "Syntax highlighting enabled"
    } else {
        "Syntax highlighting disabled"
    };
    editor.display.set_message(status);
    Ok(CommandStatus::Success)
}

/// Quit the editor; asks first when the document has unsaved changes
pub fn quit(editor: &mut EditorState, f: bool, _n: i32) -> Result<CommandStatus> {
    if f || !editor.buffer.is_modified() {
        editor.quit();
        return Ok(CommandStatus::Success);
    }

    let msg = format!(
        "Buffer {} modified; really quit? (y or n)",
        editor.buffer.name()
    );
    editor.start_prompt(&msg, PromptAction::ConfirmQuit, None);
    Ok(CommandStatus::Success)
}

/// Abort current operation
pub fn abort(_editor: &mut EditorState, _f: bool, _n: i32) -> Result<CommandStatus> {
    Ok(CommandStatus::Abort)
}

/// Show cursor position information (C-x =)
pub fn what_cursor_position(editor: &mut EditorState, _f: bool, _n: i32) -> Result<CommandStatus> {
    let cursor_line = editor.window.cursor_line();
    let cursor_col = editor.window.cursor_col();
    let line_count = editor.buffer.line_count();

    let ch = editor
        .buffer
        .line(cursor_line)
        .and_then(|l| l.text().get(cursor_col..))
        .and_then(|rest| rest.chars().next());

    let msg = match ch {
        Some(ch) => format!(
            "Line {} of {} Col {} '{}' (0x{:04X})",
            cursor_line + 1,
            line_count,
            cursor_col,
            ch,
            ch as u32
        ),
        None => format!("Line {} of {} Col {} EOL", cursor_line + 1, line_count, cursor_col),
    };

    editor.display.set_message(msg);
    Ok(CommandStatus::Success)
}
