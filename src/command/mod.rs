//! Command dispatch system
//!
//! This module provides the key binding table and command implementations.
//! Commands are organized into submodules by category.

mod completion;
mod editing;
mod files;
mod misc;
mod navigation;

use std::collections::HashMap;

use crate::editor::EditorState;
use crate::error::Result;
use crate::input::{special, Key};

/// Command result status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandStatus {
    Success,
    Failure,
    Abort,
}

/// Command function signature
/// - editor: mutable reference to editor state
/// - f: true if numeric argument was provided
/// - n: numeric argument (repeat count, default 1)
pub type CommandFn = fn(&mut EditorState, bool, i32) -> Result<CommandStatus>;

/// Key binding entry with command function and name
struct BindingEntry {
    function: CommandFn,
    name: &'static str,
}

/// Key binding table
pub struct KeyTable {
    bindings: HashMap<u32, BindingEntry>,
}

impl KeyTable {
    /// Create an empty key table
    pub fn new() -> Self {
        Self {
            bindings: HashMap::new(),
        }
    }

    /// Create key table with default bindings
    pub fn with_defaults() -> Self {
        let mut table = Self::new();
        table.setup_defaults();
        table
    }

    /// Add a key binding with command name
    pub fn bind_named(&mut self, key: Key, cmd: CommandFn, name: &'static str) {
        self.bindings.insert(key.0, BindingEntry { function: cmd, name });
    }

    /// Look up a command for a key
    pub fn lookup(&self, key: Key) -> Option<CommandFn> {
        self.bindings.get(&key.0).map(|e| e.function)
    }

    /// Look up a command name for a key
    pub fn lookup_name(&self, key: Key) -> Option<&'static str> {
        self.bindings.get(&key.0).map(|e| e.name)
    }

    /// Set up default key bindings
    fn setup_defaults(&mut self) {
        use completion::*;
        use editing::*;
        use files::*;
        use misc::*;
        use navigation::*;

        // Basic cursor movement
        self.bind_named(Key::ctrl('f'), forward_char, "forward-char");
        self.bind_named(Key::ctrl('b'), backward_char, "backward-char");
        self.bind_named(Key::ctrl('n'), next_line, "next-line");
        self.bind_named(Key::ctrl('p'), previous_line, "previous-line");
        self.bind_named(Key::ctrl('a'), beginning_of_line, "beginning-of-line");
        self.bind_named(Key::ctrl('e'), end_of_line, "end-of-line");
        self.bind_named(Key::meta('f'), forward_word, "forward-word");
        self.bind_named(Key::meta('b'), backward_word, "backward-word");

        // Page movement
        self.bind_named(Key::ctrl('v'), scroll_down, "scroll-down");
        self.bind_named(Key::meta('v'), scroll_up, "scroll-up");
        self.bind_named(Key::meta('<'), beginning_of_buffer, "beginning-of-buffer");
        self.bind_named(Key::meta('>'), end_of_buffer, "end-of-buffer");
        self.bind_named(Key::meta('g'), goto_line, "goto-line");

        // Arrow keys (special keys)
        self.bind_named(Key::special(special::RIGHT), forward_char, "forward-char");
        self.bind_named(Key::special(special::LEFT), backward_char, "backward-char");
        self.bind_named(Key::special(special::DOWN), next_line, "next-line");
        self.bind_named(Key::special(special::UP), previous_line, "previous-line");
        self.bind_named(Key::special(special::PAGE_UP), scroll_up, "scroll-up");
        self.bind_named(Key::special(special::PAGE_DOWN), scroll_down, "scroll-down");
        self.bind_named(Key::special(special::HOME), beginning_of_line, "beginning-of-line");
        self.bind_named(Key::special(special::END), end_of_line, "end-of-line");

        // Screen and modes
        self.bind_named(Key::ctrl('l'), redraw_display, "redraw-display");
        self.bind_named(Key::ctlx('#'), toggle_line_numbers, "toggle-line-numbers");
        self.bind_named(Key::ctlx('s'), toggle_syntax_highlighting, "toggle-syntax-highlighting");
        self.bind_named(Key::ctlx('='), what_cursor_position, "what-cursor-position");

        // Quit and abort
        self.bind_named(Key::ctlx_ctrl('c'), quit, "save-buffers-kill-emacs");
        self.bind_named(Key::ctrl('g'), abort, "keyboard-quit");

        // Editing
        self.bind_named(Key::ctrl('d'), delete_char_forward, "delete-char");
        self.bind_named(Key::special(special::DELETE), delete_char_forward, "delete-char");
        self.bind_named(Key::backspace(), delete_char_backward, "delete-backward-char");
        self.bind_named(Key::ctrl('h'), delete_char_backward, "delete-backward-char");
        self.bind_named(Key::ctrl('k'), kill_line, "kill-line");
        self.bind_named(Key::ctrl('y'), yank, "yank");
        self.bind_named(Key::enter(), newline, "newline");
        self.bind_named(Key::ctrl('o'), open_line, "open-line");
        self.bind_named(Key::tab(), insert_tab, "tab-to-tab-stop");

        // Mark/Region
        self.bind_named(Key::ctrl(' '), set_mark, "set-mark-command");
        self.bind_named(Key::ctrl('w'), kill_region, "kill-region");
        self.bind_named(Key::meta('w'), copy_region, "kill-ring-save");

        // Files and toolchain
        self.bind_named(Key::ctlx_ctrl('f'), find_file, "find-file");
        self.bind_named(Key::ctlx_ctrl('s'), save_buffer, "save-buffer");
        self.bind_named(Key::ctlx_ctrl('w'), write_file, "write-file");
        self.bind_named(Key::ctlx_ctrl('e'), export_ini, "export-ini");
        self.bind_named(Key::ctlx_ctrl('p'), export_archive, "export-archive");

        // Completion
        self.bind_named(Key::meta('/'), complete_symbol, "complete-symbol");
        self.bind_named(Key::tab().with_meta(), complete_symbol, "complete-symbol");
    }
}

impl Default for KeyTable {
    fn default() -> Self {
        Self::with_defaults()
    }
}


#[cfg(test)]
pub(crate) mod tests_support {
    use crate::completion::CompletionIndex;
    use crate::config::{Config, ToolchainConfig};
    use crate::editor::EditorState;
    use crate::syntax::{Classifier, SyntaxManager};
    use crate::toolchain::ExternalToolchain;
    use crate::wordlist::WordList;

    /// An editor holding `lines`, cursor at the start
    pub fn editor_with_text(lines: &[&str]) -> EditorState {
        let sections = WordList::parse("Unit\nWeapon");
        let fields = WordList::parse("Health\nSpeed");
        let classifier = Classifier::new(fields.words()).unwrap();
        let mut editor = EditorState::new(
            &Config::default(),
            SyntaxManager::new(classifier),
            CompletionIndex::new(&sections, &fields),
            Box::new(ExternalToolchain::new(ToolchainConfig::default())),
        );
        editor
            .buffer
            .set_content(lines.iter().map(|s| s.to_string()).collect());
        editor.sync_highlighting();
        editor.buffer.set_modified(false);
        editor
    }
}
