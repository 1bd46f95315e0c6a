//! On-screen completion list
//!
//! The popup holds the matches for the current fragment and a selection.
//! It never grows past its bounds: extra rows scroll, long items are cut.

use unicode_width::UnicodeWidthStr;

use super::Trigger;

/// Maximum popup size in terminal cells
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PopupBounds {
    pub max_width: usize,
    pub max_height: usize,
}

impl Default for PopupBounds {
    fn default() -> Self {
        Self {
            max_width: 40,
            max_height: 10,
        }
    }
}

/// Visible completion list anchored at the fragment start
#[derive(Debug, Clone)]
pub struct CompletionPopup {
    items: Vec<String>,
    selected: usize,
    scroll: usize,
    /// Line holding the fragment
    line: usize,
    /// Byte column where the fragment starts
    fragment_start: usize,
    /// What opened the popup; refiltering keeps its gate
    trigger: Trigger,
    bounds: PopupBounds,
}

impl CompletionPopup {
    pub fn new(
        items: Vec<String>,
        line: usize,
        fragment_start: usize,
        trigger: Trigger,
        bounds: PopupBounds,
    ) -> Self {
        Self {
            items,
            selected: 0,
            scroll: 0,
            line,
            fragment_start,
            trigger,
            bounds,
        }
    }

    pub fn line(&self) -> usize {
        self.line
    }

    pub fn fragment_start(&self) -> usize {
        self.fragment_start
    }

    pub fn trigger(&self) -> Trigger {
        self.trigger
    }

    /// Replace the matches after the fragment changed
    pub fn set_items(&mut self, items: Vec<String>) {
        self.items = items;
        self.selected = 0;
        self.scroll = 0;
    }

    pub fn selected(&self) -> usize {
        self.selected
    }

    pub fn selected_item(&self) -> Option<&str> {
        self.items.get(self.selected).map(String::as_str)
    }

    /// Move the selection down one row, scrolling if needed
    pub fn select_next(&mut self) {
        if self.selected + 1 < self.items.len() {
            self.selected += 1;
            let height = self.height();
            if self.selected >= self.scroll + height {
                self.scroll = self.selected + 1 - height;
            }
        }
    }

    /// Move the selection up one row, scrolling if needed
    pub fn select_previous(&mut self) {
        if self.selected > 0 {
            self.selected -= 1;
            if self.selected < self.scroll {
                self.scroll = self.selected;
            }
        }
    }

    /// Rows on screen
    pub fn height(&self) -> usize {
        self.items.len().min(self.bounds.max_height)
    }

    /// Columns on screen
    pub fn width(&self) -> usize {
        self.items
            .iter()
            .map(|item| item.width())
            .max()
            .unwrap_or(0)
            .min(self.bounds.max_width)
    }

    /// Items currently scrolled into view, with their list index
    pub fn visible_items(&self) -> impl Iterator<Item = (usize, &str)> {
        self.items
            .iter()
            .enumerate()
            .skip(self.scroll)
            .take(self.height())
            .map(|(i, item)| (i, item.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn popup(count: usize, max_height: usize) -> CompletionPopup {
        let items = (0..count).map(|i| format!("Item{i}")).collect();
        CompletionPopup::new(items, 0, 0, Trigger::Auto, PopupBounds { max_width: 40, max_height })
    }

    #[test]
    fn test_height_is_capped() {
        assert_eq!(popup(3, 10).height(), 3);
        assert_eq!(popup(30, 10).height(), 10);
    }

    #[test]
    fn test_width_is_capped() {
        let items = vec!["Short".to_string(), "AVeryLongIdentifierName".to_string()];
        let p = CompletionPopup::new(items, 0, 0, Trigger::Auto, PopupBounds { max_width: 10, max_height: 5 });
        assert_eq!(p.width(), 10);
    }

    #[test]
    fn test_selection_scrolls() {
        let mut p = popup(5, 2);
        p.select_next();
        p.select_next();
        assert_eq!(p.selected_item(), Some("Item2"));
        let visible: Vec<_> = p.visible_items().map(|(i, _)| i).collect();
        assert_eq!(visible, vec![1, 2]);

        p.select_previous();
        p.select_previous();
        let visible: Vec<_> = p.visible_items().map(|(i, _)| i).collect();
        assert_eq!(visible, vec![0, 1]);
    }

    #[test]
    fn test_selection_stops_at_ends() {
        let mut p = popup(2, 5);
        p.select_previous();
        assert_eq!(p.selected(), 0);
        p.select_next();
        p.select_next();
        assert_eq!(p.selected(), 1);
    }

    #[test]
    fn test_set_items_resets_selection() {
        let mut p = popup(5, 2);
        p.select_next();
        p.set_items(vec!["Only".to_string()]);
        assert_eq!(p.selected_item(), Some("Only"));
        assert_eq!(p.height(), 1);
    }
}
