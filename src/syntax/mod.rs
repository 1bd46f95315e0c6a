//! Syntax classification and styling
//!
//! This module provides the config-language highlighter:
//! - Rule-based region classifier (numbers, keywords, sections, fields)
//! - Per-line style cache updated from buffer change notifications
//! - Category-to-style theme consumed by the display

mod category;
mod classifier;
mod highlight;
mod rules;
mod style;

pub use category::StyleCategory;
pub use classifier::Classifier;
pub use highlight::{SyntaxManager, TextChange};
pub(crate) use rules::is_word_char;
pub use style::{Color, Span, Style, Theme};
