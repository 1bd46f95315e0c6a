//! Pattern rules for config classification
//!
//! A rule pairs a style category with a matcher. Most matchers are
//! regexes with a capture group selecting the tagged part of the match;
//! bounded numbers need lookaround, which `regex` lacks, so they get a
//! small dedicated scanner.

use std::ops::Range;

use regex::Regex;

use super::category::StyleCategory;
use crate::error::Result;

/// How a rule finds its matches
pub enum Matcher {
    /// Regex match; only `group` is tagged (0 = whole match)
    Pattern { regex: Regex, group: usize },
    /// `-?\d+(\.\d+)?` not touching other word characters
    BoundedNumber,
}

/// A single classification rule
pub struct Rule {
    /// Name for debugging
    pub name: &'static str,
    /// Category assigned to matches
    pub category: StyleCategory,
    /// Match strategy
    pub matcher: Matcher,
}

impl Rule {
    /// Create a regex rule tagging capture `group` of each match
    pub fn pattern(
        name: &'static str,
        category: StyleCategory,
        pattern: &str,
        group: usize,
    ) -> Result<Self> {
        Ok(Self {
            name,
            category,
            matcher: Matcher::Pattern {
                regex: Regex::new(pattern)?,
                group,
            },
        })
    }

    /// Create the bounded-number rule
    pub fn bounded_number(name: &'static str) -> Self {
        Self {
            name,
            category: StyleCategory::Number,
            matcher: Matcher::BoundedNumber,
        }
    }

    /// All non-empty byte ranges this rule tags in `text`, leftmost first
    pub fn find_all(&self, text: &str) -> Vec<Range<usize>> {
        match &self.matcher {
            Matcher::Pattern { regex, group } => regex
                .captures_iter(text)
                .filter_map(|caps| caps.get(*group))
                .map(|m| m.range())
                .filter(|range| !range.is_empty())
                .collect(),
            Matcher::BoundedNumber => find_bounded_numbers(text),
        }
    }
}

/// Check if character is a word character
pub(crate) fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn word_char_at(text: &str, pos: usize) -> bool {
    text[pos..].chars().next().is_some_and(is_word_char)
}

fn digits_end(bytes: &[u8], start: usize) -> usize {
    let mut pos = start;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    pos
}

/// Find every `-?\d+(\.\d+)?` that is neither preceded nor followed by a
/// word character.
///
/// Mirrors a backtracking engine running `(?<!\w)(-?\d+(\.\d+)?)(?!\w)`:
/// when the fraction runs into a word character the integer part alone is
/// still accepted (`1.5a` tags `1`), and a rejected start is retried one
/// character later (`a-5` tags `5`).
pub fn find_bounded_numbers(text: &str) -> Vec<Range<usize>> {
    let mut found = Vec::new();
    let mut pos = 0;

    while pos < text.len() {
        if let Some(end) = match_number_at(text, pos) {
            found.push(pos..end);
            pos = end;
        } else {
            pos += text[pos..].chars().next().map_or(1, char::len_utf8);
        }
    }

    found
}

fn match_number_at(text: &str, start: usize) -> Option<usize> {
    if text[..start].chars().next_back().is_some_and(is_word_char) {
        return None;
    }

    let bytes = text.as_bytes();
    let mut pos = start;
    if bytes.get(pos) == Some(&b'-') {
        pos += 1;
    }

    let int_end = digits_end(bytes, pos);
    if int_end == pos {
        return None;
    }

    if bytes.get(int_end) == Some(&b'.') {
        let frac_end = digits_end(bytes, int_end + 1);
        if frac_end > int_end + 1 && !word_char_at(text, frac_end) {
            return Some(frac_end);
        }
    }

    (!word_char_at(text, int_end)).then_some(int_end)
}
