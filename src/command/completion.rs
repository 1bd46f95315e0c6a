//! Completion command

use super::CommandStatus;
use crate::completion::Trigger;
use crate::editor::EditorState;
use crate::error::Result;

/// Offer completions for the identifier before the cursor (M-/, M-Tab).
/// Works with any fragment length, including none.
pub fn complete_symbol(editor: &mut EditorState, _f: bool, _n: i32) -> Result<CommandStatus> {
    if editor.open_completion(Trigger::Explicit) {
        Ok(CommandStatus::Success)
    } else {
        editor.display.set_message("No completions");
        Ok(CommandStatus::Failure)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::tests_support::editor_with_text;

    #[test]
    fn test_single_char_fragment_with_explicit_trigger() {
        let mut ed = editor_with_text(&["S"]);
        ed.window.set_cursor(0, 1);
        complete_symbol(&mut ed, false, 1).unwrap();
        let popup = ed.popup.as_ref().unwrap();
        assert_eq!(popup.selected_item(), Some("Speed"));
        assert_eq!(popup.fragment_start(), 0);
    }

    #[test]
    fn test_no_match_fails() {
        let mut ed = editor_with_text(&["qq"]);
        ed.window.set_cursor(0, 2);
        assert_eq!(complete_symbol(&mut ed, false, 1).unwrap(), CommandStatus::Failure);
        assert!(ed.popup.is_none());
    }
}
