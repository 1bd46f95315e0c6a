//! File and toolchain commands

use super::CommandStatus;
use crate::document::{self, ARCHIVE_DEFAULT_NAME};
use crate::editor::{EditorState, PromptAction};
use crate::error::Result;

/// Find file (open or create)
pub fn find_file(editor: &mut EditorState, _f: bool, _n: i32) -> Result<CommandStatus> {
    editor.start_prompt("Find file", PromptAction::FindFile, None);
    Ok(CommandStatus::Success)
}

/// Save the document as text; prompts when it has no file name yet
pub fn save_buffer(editor: &mut EditorState, _f: bool, _n: i32) -> Result<CommandStatus> {
    if !editor.buffer.is_modified() {
        editor.display.set_message("(No changes need to be saved)");
        return Ok(CommandStatus::Success);
    }

    let Some(path) = editor.buffer.filename().map(|p| p.to_path_buf()) else {
        return write_file(editor, false, 1);
    };

    match editor.write_file(&path) {
        Ok(target) => {
            editor
                .display
                .set_message(format!("Wrote {}", target.display()));
            Ok(CommandStatus::Success)
        }
        Err(e) => {
            editor.report_error("Save", &e);
            Ok(CommandStatus::Failure)
        }
    }
}

/// Save under a new name (C-x C-w)
pub fn write_file(editor: &mut EditorState, _f: bool, _n: i32) -> Result<CommandStatus> {
    let default = editor
        .buffer
        .filename()
        .map(|p| document::text_save_path(p).display().to_string());
    editor.start_prompt("Write file", PromptAction::WriteFile, default);
    Ok(CommandStatus::Success)
}

/// Compile the document to a binary config file (C-x C-e)
pub fn export_ini(editor: &mut EditorState, _f: bool, _n: i32) -> Result<CommandStatus> {
    let default = document::default_export_name(&editor.buffer.text_lines(), editor.buffer.name());
    editor.start_prompt("Export INI", PromptAction::ExportIni, Some(default));
    Ok(CommandStatus::Success)
}

/// Compile the document and repack it into an archive (C-x C-p)
pub fn export_archive(editor: &mut EditorState, _f: bool, _n: i32) -> Result<CommandStatus> {
    editor.start_prompt(
        "Repack into archive",
        PromptAction::ExportArchive,
        Some(ARCHIVE_DEFAULT_NAME.to_string()),
    );
    Ok(CommandStatus::Success)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::tests_support::editor_with_text;
    use std::fs;

    #[test]
    fn test_save_unmodified_is_noop() {
        let mut ed = editor_with_text(&["x"]);
        save_buffer(&mut ed, false, 1).unwrap();
        assert_eq!(ed.display.message(), Some("(No changes need to be saved)"));
    }

    #[test]
    fn test_save_without_name_prompts() {
        let mut ed = editor_with_text(&["x"]);
        ed.buffer.set_modified(true);
        save_buffer(&mut ed, false, 1).unwrap();
        assert!(ed.prompt.active);
        assert_eq!(ed.prompt.action, PromptAction::WriteFile);
    }

    #[test]
    fn test_save_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("unit.txt");
        let mut ed = editor_with_text(&["Health 1", "Speed 2"]);
        ed.buffer.set_filename(path.clone());
        ed.buffer.set_modified(true);

        assert_eq!(save_buffer(&mut ed, false, 1).unwrap(), CommandStatus::Success);
        assert_eq!(fs::read_to_string(&path).unwrap(), "Health 1\nSpeed 2");
        assert!(!ed.buffer.is_modified());
    }

    #[test]
    fn test_export_without_compiler_reports() {
        let mut ed = editor_with_text(&["", "Health 1"]);
        export_ini(&mut ed, false, 1).unwrap();
        assert_eq!(ed.prompt.default.as_deref(), Some("*untitled*.bni"));
        ed.handle_key(crate::input::Key::enter()).unwrap();
        assert_eq!(ed.display.message(), Some("Compile: No compile command configured"));
    }
}
