//! Editor state and main loop

use std::path::{Path, PathBuf};

use tracing::{debug, error, info};

use crate::buffer::Buffer;
use crate::command::{CommandStatus, KeyTable};
use crate::completion::{fragment_before, CompletionIndex, CompletionPopup, PopupBounds, Trigger};
use crate::config::Config;
use crate::display::{Display, Frame};
use crate::document;
use crate::error::{EditorError, Result};
use crate::input::{special, InputState, Key};
use crate::syntax::{is_word_char, SyntaxManager, TextChange, Theme};
use crate::terminal::Terminal;
use crate::toolchain::{self, Toolchain};
use crate::window::Window;

/// Main editor state
pub struct EditorState {
    /// The document being edited
    pub buffer: Buffer,
    /// Viewport and cursor
    pub window: Window,
    /// Display state
    pub display: Display,
    /// Input state
    pub input: InputState,
    /// Key bindings
    pub keytab: KeyTable,
    /// Classifier and per-line style cache
    pub syntax: SyntaxManager,
    /// Colors for each style category
    pub theme: Theme,
    /// Identifiers offered for completion
    pub completion: CompletionIndex,
    /// Visible completion list, if any
    pub popup: Option<CompletionPopup>,
    /// Size cap for the completion list
    pub popup_bounds: PopupBounds,
    /// Import/compile/repack collaborator
    pub toolchain: Box<dyn Toolchain>,
    /// Columns per tab stop
    pub tab_width: usize,
    /// Whether editor is running
    pub running: bool,
    /// Kill ring (clipboard)
    pub kill_ring: Vec<String>,
    /// Previous command killed text; consecutive kills append
    pub last_was_kill: bool,
    /// Current command killed text
    this_was_kill: bool,
    /// Minibuffer prompt state
    pub prompt: PromptState,
}

/// What action to perform when prompt completes
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PromptAction {
    None,
    FindFile,
    WriteFile,
    ExportIni,
    ExportArchive,
    GotoLine,
    /// Discard changes and open the path
    ConfirmOpen(PathBuf),
    ConfirmQuit,
}

/// Minibuffer prompt state
#[derive(Debug, Clone)]
pub struct PromptState {
    /// Whether prompt is active
    pub active: bool,
    /// The prompt string (e.g., "Find file")
    pub prompt: String,
    /// Current input
    pub input: String,
    /// What to do when complete
    pub action: PromptAction,
    /// Default value (shown in prompt)
    pub default: Option<String>,
}

impl Default for PromptState {
    fn default() -> Self {
        Self {
            active: false,
            prompt: String::new(),
            input: String::new(),
            action: PromptAction::None,
            default: None,
        }
    }
}

impl EditorState {
    /// Create a new editor state
    pub fn new(
        config: &Config,
        syntax: SyntaxManager,
        completion: CompletionIndex,
        toolchain: Box<dyn Toolchain>,
    ) -> Self {
        let mut display = Display::new();
        display.show_line_numbers = config.line_numbers;

        let mut syntax = syntax;
        syntax.enabled = config.syntax_highlighting;

        let buffer = Buffer::default();
        syntax.reload(buffer.lines());

        Self {
            buffer,
            // Resized to the terminal on the first frame
            window: Window::new(22),
            display,
            input: InputState::new(),
            keytab: KeyTable::with_defaults(),
            syntax,
            theme: config.colors.theme(),
            completion,
            popup: None,
            popup_bounds: config.completion.bounds(),
            toolchain,
            tab_width: config.tab_width,
            running: true,
            kill_ring: Vec::new(),
            last_was_kill: false,
            this_was_kill: false,
            prompt: PromptState::default(),
        }
    }

    /// Open a document, replacing the current one
    pub fn open_file(&mut self, path: &Path) -> Result<()> {
        let is_new = !path.exists();
        let lines = document::read_document(self.toolchain.as_ref(), path)?;
        self.load_buffer(Buffer::from_lines(path, lines));

        let name = self.buffer.name().to_string();
        if is_new {
            self.display.set_message(format!("(New file) {name}"));
        } else {
            self.display.set_message(format!("Opened {name}"));
        }
        Ok(())
    }

    /// Install a buffer and restyle it from scratch
    fn load_buffer(&mut self, buffer: Buffer) {
        self.buffer = buffer;
        self.window.reset();
        self.popup = None;
        self.syntax.reload(self.buffer.lines());
        self.display.force_redraw();
    }

    /// Run the main editor loop
    pub fn run(&mut self, terminal: &mut Terminal) -> Result<()> {
        self.display.force_redraw();

        while self.running {
            self.window.set_height(terminal.rows().saturating_sub(2));
            self.window.ensure_cursor_visible();

            let frame = Frame {
                buffer: &self.buffer,
                window: &self.window,
                syntax: &self.syntax,
                theme: &self.theme,
                popup: self.popup.as_ref(),
            };
            self.display.render(terminal, &frame)?;

            let key_event = terminal.read_key()?;
            if let Some(key) = self.input.translate_key(key_event) {
                self.handle_key(key)?;
            } else if self.input.is_ctlx_pending() {
                self.display.set_message("C-x -");
            } else if self.input.is_meta_pending() {
                self.display.set_message("ESC -");
            }
        }

        Ok(())
    }

    /// Handle a key press
    pub fn handle_key(&mut self, key: Key) -> Result<()> {
        if self.prompt.active {
            return self.handle_prompt_key(key);
        }

        self.display.clear_message();

        if self.popup.is_some() && self.handle_popup_key(key) {
            return Ok(());
        }

        let typed = key.self_insert_char();
        let refilter = typed.is_some() || is_backspace(key);

        self.dispatch(key)?;
        self.sync_highlighting();

        if refilter && self.popup.is_some() {
            self.refresh_popup();
        } else if typed.is_some_and(is_word_char) && self.popup.is_none() {
            self.open_completion(Trigger::Auto);
        }

        self.window.ensure_cursor_visible();
        Ok(())
    }

    /// Run the command bound to a key, or self-insert
    fn dispatch(&mut self, key: Key) -> Result<()> {
        self.this_was_kill = false;

        if let Some(cmd) = self.keytab.lookup(key) {
            debug!(
                key = %key.display_name(),
                command = self.keytab.lookup_name(key).unwrap_or("unnamed"),
                "dispatch"
            );
            match cmd(self, false, 1)? {
                CommandStatus::Success => {}
                CommandStatus::Failure => self.display.beep(),
                CommandStatus::Abort => {
                    self.display.set_message("Quit");
                    self.display.beep();
                }
            }
        } else if let Some(ch) = key.self_insert_char() {
            self.insert_char(ch);
        } else {
            self.display.beep();
            self.display.set_message(format!("{} is not bound", key.display_name()));
        }

        self.last_was_kill = self.this_was_kill;
        Ok(())
    }

    /// Hand the edits of the last command to the highlighter
    pub fn sync_highlighting(&mut self) {
        let changes = self.buffer.take_changes();
        if let Some(change) = changes.into_iter().reduce(TextChange::merge) {
            debug!(
                first_line = change.first_line,
                removed = change.removed,
                inserted = change.inserted,
                "buffer changed"
            );
            self.syntax.text_changed(self.buffer.lines(), change);
        }
    }

    // ----- completion -----

    /// Show the completion list for the fragment before the cursor.
    /// Returns whether a popup is now visible.
    pub fn open_completion(&mut self, trigger: Trigger) -> bool {
        let line_idx = self.window.cursor_line();
        let text = self.buffer.line(line_idx).map_or("", |l| l.text());
        let (start, fragment) = fragment_before(text, self.window.cursor_col());

        let items: Vec<String> = match self.completion.suggest(fragment, trigger) {
            Some(items) => items.into_iter().map(str::to_string).collect(),
            None => Vec::new(),
        };
        debug!(?trigger, fragment, matches = items.len(), "completion query");

        if items.is_empty() {
            self.popup = None;
            return false;
        }
        self.popup = Some(CompletionPopup::new(items, line_idx, start, trigger, self.popup_bounds));
        true
    }

    /// Refilter the visible list after the fragment changed
    fn refresh_popup(&mut self) {
        let Some(popup) = self.popup.as_mut() else {
            return;
        };

        let line_idx = self.window.cursor_line();
        let text = self.buffer.line(line_idx).map_or("", |l| l.text());
        let (start, fragment) = fragment_before(text, self.window.cursor_col());
        if line_idx != popup.line() || start != popup.fragment_start() {
            self.popup = None;
            return;
        }

        // An automatic popup closes again once the fragment drops below
        // the minimum length
        match self.completion.suggest(fragment, popup.trigger()) {
            Some(items) if !items.is_empty() => {
                popup.set_items(items.into_iter().map(str::to_string).collect());
            }
            _ => self.popup = None,
        }
    }

    /// Replace the fragment with the selected candidate
    pub fn accept_completion(&mut self) -> bool {
        let Some(popup) = self.popup.take() else {
            return false;
        };
        let Some(item) = popup.selected_item() else {
            return false;
        };

        let line_idx = self.window.cursor_line();
        let col = self.window.cursor_col();
        let start = popup.fragment_start();
        if line_idx != popup.line() || col < start {
            return false;
        }

        if col > start {
            self.buffer.delete_region((line_idx, start), (line_idx, col));
        }
        let (_, end) = self.buffer.insert_str(line_idx, start, item);
        self.window.set_cursor(line_idx, end);
        self.update_goal_col();
        self.sync_highlighting();
        true
    }

    /// Keys the popup consumes. Returns true when the key was handled.
    fn handle_popup_key(&mut self, key: Key) -> bool {
        let Some(popup) = self.popup.as_mut() else {
            return false;
        };

        if key == Key::ctrl('n') || key == Key::special(special::DOWN) {
            popup.select_next();
        } else if key == Key::ctrl('p') || key == Key::special(special::UP) {
            popup.select_previous();
        } else if key == Key::enter() || key == Key::tab() {
            self.accept_completion();
        } else if key == Key::ctrl('g') {
            self.popup = None;
        } else {
            if key.self_insert_char().is_none() && !is_backspace(key) {
                self.popup = None;
            }
            return false;
        }
        true
    }

    // ----- editing primitives -----

    /// Insert a character at cursor
    pub fn insert_char(&mut self, ch: char) {
        let line = self.window.cursor_line();
        let col = self.window.cursor_col();
        self.buffer.insert_char(line, col, ch);
        self.window.set_cursor(line, col + ch.len_utf8());
        self.update_goal_col();
    }

    /// Insert text (possibly multi-line) at cursor
    pub fn insert_text(&mut self, text: &str) {
        let line = self.window.cursor_line();
        let col = self.window.cursor_col();
        let (end_line, end_col) = self.buffer.insert_str(line, col, text);
        self.window.set_cursor(end_line, end_col);
        self.update_goal_col();
    }

    /// Split the line at the cursor
    pub fn insert_newline(&mut self) {
        let line = self.window.cursor_line();
        let col = self.window.cursor_col();
        self.buffer.insert_newline(line, col);
        self.window.set_cursor(line + 1, 0);
        self.window.set_goal_col(0);
    }

    /// Remember the cursor's display column for vertical movement
    pub fn update_goal_col(&mut self) {
        let col = self
            .buffer
            .line(self.window.cursor_line())
            .map_or(0, |l| l.byte_to_col(self.window.cursor_col()));
        self.window.set_goal_col(col);
    }

    /// Start a new kill sequence or continue appending
    pub fn start_kill(&mut self) {
        if !self.last_was_kill || self.kill_ring.is_empty() {
            self.kill_ring.push(String::new());
        }
        self.this_was_kill = true;
    }

    /// Append text to current kill entry
    pub fn kill_append(&mut self, text: &str) {
        if let Some(entry) = self.kill_ring.last_mut() {
            entry.push_str(text);
        }
    }

    /// Get text for yanking
    pub fn yank_text(&self) -> Option<&str> {
        self.kill_ring.last().map(String::as_str)
    }

    // ----- cursor movement -----

    /// Move cursor right
    pub fn move_cursor_right(&mut self) {
        let line_idx = self.window.cursor_line();
        let col = self.window.cursor_col();
        let Some(line) = self.buffer.line(line_idx) else {
            return;
        };

        if col < line.len() {
            self.window.set_cursor(line_idx, line.next_char_boundary(col));
        } else if line_idx + 1 < self.buffer.line_count() {
            self.window.set_cursor(line_idx + 1, 0);
        }
        self.update_goal_col();
    }

    /// Move cursor left
    pub fn move_cursor_left(&mut self) {
        let line_idx = self.window.cursor_line();
        let col = self.window.cursor_col();

        if col > 0 {
            if let Some(line) = self.buffer.line(line_idx) {
                self.window.set_cursor(line_idx, line.prev_char_boundary(col));
            }
        } else if line_idx > 0 {
            let prev_len = self.buffer.line(line_idx - 1).map_or(0, |l| l.len());
            self.window.set_cursor(line_idx - 1, prev_len);
        }
        self.update_goal_col();
    }

    /// Move cursor down
    pub fn move_cursor_down(&mut self) {
        let line_idx = self.window.cursor_line();
        if line_idx + 1 < self.buffer.line_count() {
            let col = self.col_to_byte_in_line(line_idx + 1, self.window.goal_col());
            self.window.set_cursor(line_idx + 1, col);
        }
    }

    /// Move cursor up
    pub fn move_cursor_up(&mut self) {
        let line_idx = self.window.cursor_line();
        if line_idx > 0 {
            let col = self.col_to_byte_in_line(line_idx - 1, self.window.goal_col());
            self.window.set_cursor(line_idx - 1, col);
        }
    }

    /// Move to beginning of line
    pub fn move_to_bol(&mut self) {
        self.window.set_cursor(self.window.cursor_line(), 0);
        self.window.set_goal_col(0);
    }

    /// Move to end of line
    pub fn move_to_eol(&mut self) {
        let line_idx = self.window.cursor_line();
        let len = self.buffer.line(line_idx).map_or(0, |l| l.len());
        self.window.set_cursor(line_idx, len);
        self.update_goal_col();
    }

    /// Move the cursor by a page
    pub fn page(&mut self, forward: bool) {
        let step = (self.window.height() as usize).saturating_sub(2).max(1);
        let line_idx = self.window.cursor_line();
        let last = self.buffer.line_count().saturating_sub(1);
        let target = if forward {
            (line_idx + step).min(last)
        } else {
            line_idx.saturating_sub(step)
        };
        let col = self.col_to_byte_in_line(target, self.window.goal_col());
        self.window.set_cursor(target, col);
    }

    /// Move to beginning of buffer
    pub fn move_to_buffer_start(&mut self) {
        self.window.set_cursor(0, 0);
        self.window.set_goal_col(0);
    }

    /// Move to end of buffer
    pub fn move_to_buffer_end(&mut self) {
        let last = self.buffer.line_count().saturating_sub(1);
        let len = self.buffer.line(last).map_or(0, |l| l.len());
        self.window.set_cursor(last, len);
        self.update_goal_col();
    }

    /// Jump to a 1-based line number
    pub fn goto_line(&mut self, line_number: usize) {
        let last = self.buffer.line_count().saturating_sub(1);
        self.window.set_cursor(line_number.saturating_sub(1).min(last), 0);
        self.window.set_goal_col(0);
    }

    /// Convert display column to byte offset in a line
    fn col_to_byte_in_line(&self, line_idx: usize, display_col: usize) -> usize {
        self.buffer
            .line(line_idx)
            .map_or(0, |line| line.col_to_byte(display_col))
    }

    // ----- files and toolchain -----

    /// Save the buffer as text; `.txt` is appended when missing
    pub fn write_file(&mut self, path: &Path) -> Result<PathBuf> {
        let target = document::text_save_path(path);
        self.buffer.write_to(&target)?;
        self.buffer.set_filename(target.clone());
        self.buffer.set_modified(false);
        info!(path = %target.display(), "saved document");
        Ok(target)
    }

    /// Compile the buffer to `path`
    pub fn export_ini(&mut self, path: &Path) -> Result<PathBuf> {
        let produced = self.toolchain.compile(&self.buffer.text_lines(), path)?;
        info!(path = %produced.display(), "compiled document");
        Ok(produced)
    }

    /// Compile the buffer and fold it into `archive`
    pub fn export_archive(&mut self, archive: &Path) -> Result<()> {
        toolchain::export_archive(self.toolchain.as_ref(), &self.buffer.text_lines(), archive)
    }

    /// Show a failed operation in the minibuffer
    pub fn report_error(&mut self, what: &str, err: &EditorError) {
        error!(operation = what, error = %err, "command failed");
        self.display.set_message(format!("{what}: {err}"));
        self.display.beep();
    }

    /// Force a full redraw
    pub fn force_redraw(&mut self) {
        self.display.force_redraw();
    }

    /// Quit the editor
    pub fn quit(&mut self) {
        self.running = false;
    }

    // ----- minibuffer prompt -----

    /// Start a minibuffer prompt
    pub fn start_prompt(&mut self, prompt: &str, action: PromptAction, default: Option<String>) {
        self.popup = None;
        self.prompt.active = true;
        self.prompt.prompt = prompt.to_string();
        self.prompt.input.clear();
        self.prompt.action = action;
        self.prompt.default = default;
        self.update_prompt_display();
    }

    /// Update the prompt display
    fn update_prompt_display(&mut self) {
        let display = match &self.prompt.default {
            Some(def) if self.prompt.input.is_empty() => {
                format!("{} (default {}): ", self.prompt.prompt, def)
            }
            _ => format!("{}: {}", self.prompt.prompt, self.prompt.input),
        };
        self.display.set_message(display);
    }

    /// Handle key press during prompt mode
    fn handle_prompt_key(&mut self, key: Key) -> Result<()> {
        if key == Key::ctrl('g') {
            self.prompt.active = false;
            self.prompt.action = PromptAction::None;
            self.display.set_message("Quit");
            return Ok(());
        }

        let confirming = matches!(
            self.prompt.action,
            PromptAction::ConfirmQuit | PromptAction::ConfirmOpen(_)
        );
        if confirming {
            if let Some(answer) = key.self_insert_char() {
                self.prompt.active = false;
                let action = std::mem::replace(&mut self.prompt.action, PromptAction::None);
                self.display.clear_message();
                if answer.eq_ignore_ascii_case(&'y') {
                    return self.complete_prompt(action, String::new());
                }
                return Ok(());
            }
            self.display.beep();
            return Ok(());
        }

        if key == Key::enter() {
            let input = if self.prompt.input.is_empty() {
                self.prompt.default.clone().unwrap_or_default()
            } else {
                self.prompt.input.clone()
            };
            let action = std::mem::replace(&mut self.prompt.action, PromptAction::None);
            self.prompt.active = false;
            self.display.clear_message();
            return self.complete_prompt(action, input);
        }

        if is_backspace(key) {
            self.prompt.input.pop();
            self.update_prompt_display();
            return Ok(());
        }

        if let Some(ch) = key.self_insert_char() {
            self.prompt.input.push(ch);
            self.update_prompt_display();
            return Ok(());
        }

        self.display.beep();
        Ok(())
    }

    /// Complete a prompt action
    fn complete_prompt(&mut self, action: PromptAction, input: String) -> Result<()> {
        match action {
            PromptAction::FindFile => {
                if input.is_empty() {
                    self.display.set_message("No file name");
                    return Ok(());
                }
                let path = PathBuf::from(&input);
                if self.buffer.is_modified() {
                    self.start_prompt(
                        "Buffer modified; discard changes? (y or n)",
                        PromptAction::ConfirmOpen(path),
                        None,
                    );
                } else {
                    self.open_and_report(&path);
                }
            }
            PromptAction::ConfirmOpen(path) => self.open_and_report(&path),
            PromptAction::WriteFile => {
                if input.is_empty() {
                    self.display.set_message("No file name");
                    return Ok(());
                }
                match self.write_file(Path::new(&input)) {
                    Ok(target) => self.display.set_message(format!("Wrote {}", target.display())),
                    Err(e) => self.report_error("Save", &e),
                }
            }
            PromptAction::ExportIni => {
                if input.is_empty() {
                    self.display.set_message("No file name");
                    return Ok(());
                }
                match self.export_ini(Path::new(&input)) {
                    Ok(produced) => {
                        self.display.set_message(format!("Compiled {}", produced.display()))
                    }
                    Err(e) => self.report_error("Compile", &e),
                }
            }
            PromptAction::ExportArchive => {
                if input.is_empty() {
                    self.display.set_message("No file name");
                    return Ok(());
                }
                match self.export_archive(Path::new(&input)) {
                    Ok(()) => self.display.set_message(format!("Repacked into {input}")),
                    Err(e) => self.report_error("Repack", &e),
                }
            }
            PromptAction::GotoLine => match input.trim().parse::<usize>() {
                Ok(line_number) => self.goto_line(line_number),
                Err(_) => self.display.set_message("Invalid line number"),
            },
            PromptAction::ConfirmQuit => self.quit(),
            PromptAction::None => {}
        }
        Ok(())
    }

    /// Open a document, reporting failure in the minibuffer
    fn open_and_report(&mut self, path: &Path) {
        if let Err(e) = self.open_file(path) {
            self.report_error("Open", &e);
        }
    }
}

fn is_backspace(key: Key) -> bool {
    key == Key::backspace() || key == Key::ctrl('h')
}
