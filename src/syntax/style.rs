//! Style types for text rendering
//!
//! Styles and the category-to-style theme live here so the display can
//! render classifier output without the classifier knowing about colors.

use super::category::StyleCategory;

/// Terminal colors (ANSI 16-color palette for compatibility)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    #[default]
    Default,
    Black,
    Red,
    Green,
    Yellow,
    Blue,
    Magenta,
    Cyan,
    White,
    BrightBlack,
    BrightRed,
    BrightGreen,
    BrightYellow,
    BrightBlue,
    BrightMagenta,
    BrightCyan,
    BrightWhite,
}

impl Color {
    /// Parse a color name as written in the config file ("bright-blue", "cyan")
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_lowercase().replace(['_', ' '], "-");
        let color = match normalized.as_str() {
            "default" => Color::Default,
            "black" => Color::Black,
            "red" => Color::Red,
            "green" => Color::Green,
            "yellow" => Color::Yellow,
            "blue" => Color::Blue,
            "magenta" => Color::Magenta,
            "cyan" => Color::Cyan,
            "white" => Color::White,
            "bright-black" | "gray" | "grey" => Color::BrightBlack,
            "bright-red" => Color::BrightRed,
            "bright-green" => Color::BrightGreen,
            "bright-yellow" => Color::BrightYellow,
            "bright-blue" => Color::BrightBlue,
            "bright-magenta" => Color::BrightMagenta,
            "bright-cyan" => Color::BrightCyan,
            "bright-white" => Color::BrightWhite,
            _ => return None,
        };
        Some(color)
    }
}

/// Text style attributes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Style {
    /// Foreground color
    pub fg: Color,
    /// Background color
    pub bg: Color,
    /// Bold text
    pub bold: bool,
    /// Reverse video (swap fg/bg)
    pub reverse: bool,
}

impl Style {
    /// Create a style with just foreground color
    pub fn fg(color: Color) -> Self {
        Self {
            fg: color,
            ..Default::default()
        }
    }

    /// Create a reverse video style (for the marked region)
    pub fn reverse() -> Self {
        Self {
            reverse: true,
            ..Default::default()
        }
    }

    /// Builder: set foreground color
    pub fn with_fg(mut self, color: Color) -> Self {
        self.fg = color;
        self
    }

    /// Builder: set background color
    pub fn with_bg(mut self, color: Color) -> Self {
        self.bg = color;
        self
    }

    /// Builder: set bold
    pub fn with_bold(mut self) -> Self {
        self.bold = true;
        self
    }

    /// Check if this is the default (no styling)
    pub fn is_default(&self) -> bool {
        *self == Self::default()
    }
}

/// A classified span of text within a single line
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    /// Byte offset where this span starts (inclusive)
    pub start: usize,
    /// Byte offset where this span ends (exclusive)
    pub end: usize,
    /// Category assigned by the classifier
    pub category: StyleCategory,
}

impl Span {
    /// Create a new span
    pub fn new(start: usize, end: usize, category: StyleCategory) -> Self {
        Self { start, end, category }
    }

    /// Check if this span contains a byte position
    pub fn contains(&self, pos: usize) -> bool {
        pos >= self.start && pos < self.end
    }
}

/// Category-to-style mapping handed to the display
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Theme {
    number: Style,
    keyword: Style,
    section_name: Style,
    field_name: Style,
    field_value: Style,
}

impl Theme {
    /// Style used when rendering a category
    pub fn style_for(&self, category: StyleCategory) -> Style {
        match category {
            StyleCategory::Number => self.number,
            StyleCategory::Keyword => self.keyword,
            StyleCategory::SectionName => self.section_name,
            StyleCategory::FieldName => self.field_name,
            StyleCategory::FieldValue => self.field_value,
        }
    }

    /// Builder: override the foreground color of one category
    pub fn with_color(mut self, category: StyleCategory, color: Color) -> Self {
        let slot = match category {
            StyleCategory::Number => &mut self.number,
            StyleCategory::Keyword => &mut self.keyword,
            StyleCategory::SectionName => &mut self.section_name,
            StyleCategory::FieldName => &mut self.field_name,
            StyleCategory::FieldValue => &mut self.field_value,
        };
        *slot = slot.with_fg(color);
        self
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            number: StyleCategory::Number.default_style(),
            keyword: StyleCategory::Keyword.default_style(),
            section_name: StyleCategory::SectionName.default_style(),
            field_name: StyleCategory::FieldName.default_style(),
            field_value: StyleCategory::FieldValue.default_style(),
        }
    }
}
