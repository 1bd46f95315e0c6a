//! Style categories for config highlighting
//!
//! This module defines the semantic categories the classifier can
//! assign to config text and their default visual styles.

use super::style::{Color, Style};

/// Semantic categories recognized in config text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StyleCategory {
    /// Signed integers and decimals (-3, 1.25)
    Number,
    /// Boolean and null sentinels (true, false, none)
    Keyword,
    /// Name following a section-opening `name` token
    SectionName,
    /// Known field identifier at the start of a line
    FieldName,
    /// Remainder of a field line after the identifier
    FieldValue,
}

impl StyleCategory {
    /// Get the default style for this category
    pub fn default_style(&self) -> Style {
        match self {
            StyleCategory::Number => Style::fg(Color::Cyan),
            StyleCategory::Keyword => Style::fg(Color::Magenta).with_bold(),
            StyleCategory::SectionName => Style::fg(Color::Yellow).with_bold(),
            StyleCategory::FieldName => Style::fg(Color::Blue),
            StyleCategory::FieldValue => Style::fg(Color::Green),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_styles_not_empty() {
        let categories = [
            StyleCategory::Number,
            StyleCategory::Keyword,
            StyleCategory::SectionName,
            StyleCategory::FieldName,
            StyleCategory::FieldValue,
        ];
        for category in categories {
            assert!(!category.default_style().is_default());
        }
    }
}
