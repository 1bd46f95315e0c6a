//! Identifier completion
//!
//! A session-long index of section and field identifiers, the popup that
//! shows its matches, and the helper that finds the fragment being typed.

mod index;
mod popup;

pub use index::{CompletionIndex, Trigger, MIN_FRAGMENT_LEN};
pub use popup::{CompletionPopup, PopupBounds};

use crate::syntax::is_word_char;

/// The identifier fragment ending at `cursor_col`.
///
/// Returns the byte column where the fragment starts and the fragment
/// itself (empty when the cursor does not follow a word character).
pub fn fragment_before(text: &str, cursor_col: usize) -> (usize, &str) {
    let cursor_col = cursor_col.min(text.len());
    let before = &text[..cursor_col];
    let start = before
        .char_indices()
        .rev()
        .take_while(|(_, ch)| is_word_char(*ch))
        .last()
        .map(|(i, _)| i)
        .unwrap_or(cursor_col);
    (start, &before[start..])
}
