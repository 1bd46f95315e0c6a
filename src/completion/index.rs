//! Candidate list and prefix filtering

use tracing::debug;

use crate::wordlist::WordList;

/// Fragment length needed before suggestions appear on their own
pub const MIN_FRAGMENT_LEN: usize = 2;

/// What asked for suggestions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Trigger {
    /// Typing; subject to the minimum fragment length
    Auto,
    /// The user asked for completion explicitly
    Explicit,
}

/// Immutable candidate list: section identifiers followed by field
/// identifiers, in source order, duplicates kept.
#[derive(Debug, Clone)]
pub struct CompletionIndex {
    items: Vec<String>,
    min_fragment: usize,
}

impl CompletionIndex {
    pub fn new(sections: &WordList, fields: &WordList) -> Self {
        let items: Vec<String> = sections
            .words()
            .iter()
            .chain(fields.words())
            .cloned()
            .collect();
        debug!(
            sections = sections.len(),
            fields = fields.len(),
            "built completion index"
        );
        Self {
            items,
            min_fragment: MIN_FRAGMENT_LEN,
        }
    }

    /// Override the automatic-trigger threshold
    pub fn with_min_fragment(mut self, min_fragment: usize) -> Self {
        self.min_fragment = min_fragment;
        self
    }

    #[cfg(test)]
    pub fn items(&self) -> &[String] {
        &self.items
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Every candidate starting with `fragment` (case-sensitive), in order
    pub fn query(&self, fragment: &str) -> Vec<&str> {
        self.items
            .iter()
            .filter(|item| item.starts_with(fragment))
            .map(String::as_str)
            .collect()
    }

    /// Candidates to display, or None when no popup should appear.
    ///
    /// Automatic triggers need `min_fragment` characters and at least one
    /// match. Explicit triggers always answer, even with an empty fragment.
    pub fn suggest(&self, fragment: &str, trigger: Trigger) -> Option<Vec<&str>> {
        match trigger {
            Trigger::Auto => {
                if fragment.chars().count() < self.min_fragment {
                    return None;
                }
                let matches = self.query(fragment);
                (!matches.is_empty()).then_some(matches)
            }
            Trigger::Explicit => Some(self.query(fragment)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn index() -> CompletionIndex {
        CompletionIndex::new(
            &WordList::parse("Unit\nWeapon"),
            &WordList::parse("Health\nSpeed"),
        )
    }

    #[test]
    fn test_items_in_source_order() {
        assert_eq!(index().items(), &["Unit", "Weapon", "Health", "Speed"]);
    }

    #[test]
    fn test_prefix_query() {
        assert_eq!(index().query("S"), vec!["Speed"]);
        assert_eq!(index().query("We"), vec!["Weapon"]);
        assert!(index().query("s").is_empty());
    }

    #[test]
    fn test_explicit_empty_fragment_lists_everything() {
        assert_eq!(
            index().suggest("", Trigger::Explicit),
            Some(vec!["Unit", "Weapon", "Health", "Speed"])
        );
    }

    #[test]
    fn test_auto_trigger_gate() {
        let index = index();
        assert_eq!(index.suggest("H", Trigger::Auto), None);
        assert_eq!(index.suggest("He", Trigger::Auto), Some(vec!["Health"]));
        assert_eq!(index.suggest("Zz", Trigger::Auto), None);
        assert_eq!(index.suggest("H", Trigger::Explicit), Some(vec!["Health"]));
    }

    #[test]
    fn test_duplicates_are_kept() {
        let index = CompletionIndex::new(&WordList::parse("Speed"), &WordList::parse("Speed"));
        assert_eq!(index.query("Sp"), vec!["Speed", "Speed"]);
    }

    #[test]
    fn test_empty_lists() {
        let index = CompletionIndex::new(&WordList::default(), &WordList::default());
        assert!(index.is_empty());
        assert_eq!(index.suggest("He", Trigger::Auto), None);
        assert_eq!(index.suggest("", Trigger::Explicit), Some(vec![]));
    }

    #[test]
    fn test_custom_threshold() {
        let index = index().with_min_fragment(1);
        assert_eq!(index.suggest("U", Trigger::Auto), Some(vec!["Unit"]));
    }
}
