//! Region classifier for config text
//!
//! The classifier owns the fixed, ordered rule set. Given a changed region
//! of the buffer it re-tags that region from a clean slate: every rule runs
//! in `RULE_ORDER`, and each match overwrites whatever an earlier rule put
//! on the same bytes.

use tracing::debug;

use super::category::StyleCategory;
use super::rules::Rule;
use crate::error::Result;

/// Order in which rules are applied; later categories win on overlap
pub const RULE_ORDER: [StyleCategory; 5] = [
    StyleCategory::Number,
    StyleCategory::Keyword,
    StyleCategory::SectionName,
    StyleCategory::FieldName,
    StyleCategory::FieldValue,
];

const KEYWORD_PATTERN: &str = r"(?i)\b(none|true|false)\b";
// `[^\S\r\n]` is any blank that does not end the line, NBSP included
const SECTION_PATTERN: &str = r"(?m)^[^\S\r\n]*name ([^\r\n]+)";

/// A contiguous piece of the buffer handed to the classifier
#[derive(Debug, Clone, Copy)]
pub struct Region<'a> {
    /// Byte offset of `text` within the whole buffer
    pub offset: usize,
    /// Region content
    pub text: &'a str,
}

impl<'a> Region<'a> {
    pub fn new(offset: usize, text: &'a str) -> Self {
        Self { offset, text }
    }
}

/// A tagged range, in buffer byte offsets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StyleRange {
    pub start: usize,
    pub len: usize,
    pub category: StyleCategory,
}

impl StyleRange {
    /// Exclusive end offset
    pub fn end(&self) -> usize {
        self.start + self.len
    }
}

/// The ordered rule set
pub struct Classifier {
    rules: Vec<Rule>,
}

impl Classifier {
    /// Build the rule set. Field rules are composed from `field_names`;
    /// with no names they are left out entirely.
    pub fn new(field_names: &[String]) -> Result<Self> {
        let field_prefix = field_prefix_pattern(field_names);
        let mut rules = Vec::with_capacity(RULE_ORDER.len());

        for category in RULE_ORDER {
            let rule = match category {
                StyleCategory::Number => Rule::bounded_number("number"),
                StyleCategory::Keyword => Rule::pattern("keyword", category, KEYWORD_PATTERN, 1)?,
                StyleCategory::SectionName => {
                    Rule::pattern("section_name", category, SECTION_PATTERN, 1)?
                }
                StyleCategory::FieldName => match &field_prefix {
                    Some(alternation) => Rule::pattern(
                        "field_name",
                        category,
                        &format!(r"(?m)^[^\S\r\n]*\b({alternation})\b"),
                        1,
                    )?,
                    None => continue,
                },
                StyleCategory::FieldValue => match &field_prefix {
                    Some(alternation) => Rule::pattern(
                        "field_value",
                        category,
                        &format!(
                            r"(?m)^[^\S\r\n]*\b(?:{alternation})\b[^\S\r\n]*([^\r\n]*\S)"
                        ),
                        1,
                    )?,
                    None => continue,
                },
            };
            rules.push(rule);
        }

        debug!(
            rules = ?rules.iter().map(|rule| rule.name).collect::<Vec<_>>(),
            field_names = field_names.len(),
            "built classifier rule set"
        );
        Ok(Self { rules })
    }

    /// Rules in application order
    #[cfg(test)]
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    /// Whether field name/value rules are active
    pub fn has_field_rules(&self) -> bool {
        self.rules
            .iter()
            .any(|rule| rule.category == StyleCategory::FieldName)
    }

    /// Classify a region, returning ranges in buffer offsets.
    ///
    /// Ranges never leave the region and never overlap. Adjacent bytes with
    /// the same category are reported as one range.
    pub fn classify(&self, region: Region<'_>) -> Vec<StyleRange> {
        let mut tags: Vec<Option<StyleCategory>> = vec![None; region.text.len()];

        for rule in &self.rules {
            for range in rule.find_all(region.text) {
                tags[range].fill(Some(rule.category));
            }
        }

        let ranges = collapse_tags(&tags, region.offset);
        debug!(
            offset = region.offset,
            bytes = region.text.len(),
            ranges = ranges.len(),
            "classified region"
        );
        ranges
    }
}

/// Escaped alternation of the field identifiers, or None if there are none
fn field_prefix_pattern(field_names: &[String]) -> Option<String> {
    let escaped: Vec<String> = field_names
        .iter()
        .filter(|name| !name.is_empty())
        .map(|name| regex::escape(name))
        .collect();

    if escaped.is_empty() {
        None
    } else {
        Some(escaped.join("|"))
    }
}

fn collapse_tags(tags: &[Option<StyleCategory>], offset: usize) -> Vec<StyleRange> {
    let mut ranges: Vec<StyleRange> = Vec::new();

    for (pos, tag) in tags.iter().enumerate() {
        let Some(category) = *tag else { continue };
        match ranges.last_mut() {
            Some(last) if last.category == category && last.end() == offset + pos => {
                last.len += 1;
            }
            _ => ranges.push(StyleRange {
                start: offset + pos,
                len: 1,
                category,
            }),
        }
    }

    ranges
}
