//! Per-line style cache driven by buffer change notifications
//!
//! The editor reports each mutation as a `TextChange`. The manager splices
//! its per-line cache to match the new line layout and hands only the
//! changed lines to the classifier.

use tracing::trace;

use super::classifier::{Classifier, Region};
use super::style::Span;
use crate::line::Line;

/// A line-level edit: `removed` lines starting at `first_line` were
/// replaced by `inserted` lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TextChange {
    pub first_line: usize,
    pub removed: usize,
    pub inserted: usize,
}

impl TextChange {
    /// A single line edited in place
    pub fn line(line: usize) -> Self {
        Self {
            first_line: line,
            removed: 1,
            inserted: 1,
        }
    }

    /// Whole-document replacement
    pub fn replace_all(old_count: usize, new_count: usize) -> Self {
        Self {
            first_line: 0,
            removed: old_count,
            inserted: new_count,
        }
    }

    /// One change covering `self` followed by `next`.
    ///
    /// `next` is expressed in the line numbering left behind by `self`.
    pub fn merge(self, next: TextChange) -> TextChange {
        let first = self.first_line.min(next.first_line);
        // End of the combined region between the two edits
        let mid_end = (self.first_line + self.inserted).max(next.first_line + next.removed);
        let old_end = mid_end - self.inserted + self.removed;
        let new_end = mid_end - next.removed + next.inserted;
        TextChange {
            first_line: first,
            removed: old_end - first,
            inserted: new_end - first,
        }
    }
}

/// Cached spans for every line of the document
#[derive(Debug, Default)]
pub struct HighlightCache {
    line_spans: Vec<Vec<Span>>,
}

impl HighlightCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spans for a line (empty if unknown)
    pub fn spans(&self, line_idx: usize) -> &[Span] {
        self.line_spans
            .get(line_idx)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// Number of lines tracked
    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.line_spans.len()
    }

    /// Replace the entries for `change` with fresh empty slots
    fn splice(&mut self, change: TextChange) {
        let start = change.first_line.min(self.line_spans.len());
        let end = (change.first_line + change.removed).min(self.line_spans.len());
        self.line_spans
            .splice(start..end, std::iter::repeat(Vec::new()).take(change.inserted));
    }

    /// Clear and re-tag `count` lines starting at `first`
    fn restyle(&mut self, classifier: &Classifier, lines: &[Line], first: usize, count: usize) {
        let last = (first + count).min(lines.len());
        if first >= last {
            return;
        }
        if self.line_spans.len() < lines.len() {
            self.line_spans.resize(lines.len(), Vec::new());
        }

        // Byte offset of each line start, in buffer coordinates
        let offset: usize = lines[..first].iter().map(|l| l.len() + 1).sum();
        let mut line_starts = Vec::with_capacity(last - first);
        let mut text = String::new();
        for (i, line) in lines[first..last].iter().enumerate() {
            if i > 0 {
                text.push('\n');
            }
            line_starts.push(offset + text.len());
            text.push_str(line.text());
        }

        for spans in &mut self.line_spans[first..last] {
            spans.clear();
        }

        for range in classifier.classify(Region::new(offset, &text)) {
            let mut start = range.start;
            let end = range.end();
            // Ranges are split at line breaks
            while start < end {
                let idx = line_starts.partition_point(|&s| s <= start) - 1;
                let line_start = line_starts[idx];
                let line_end = line_start + lines[first + idx].len();
                let piece_end = end.min(line_end);
                if piece_end > start {
                    self.line_spans[first + idx].push(Span::new(
                        start - line_start,
                        piece_end - line_start,
                        range.category,
                    ));
                }
                start = piece_end + 1;
            }
        }

        trace!(first, count = last - first, "restyled lines");
    }

    /// Apply a change notification and re-tag the affected lines
    pub fn apply_change(&mut self, classifier: &Classifier, lines: &[Line], change: TextChange) {
        self.splice(change);
        if self.line_spans.len() != lines.len() {
            // Out of step with the buffer; start over
            self.rebuild(classifier, lines);
            return;
        }
        self.restyle(classifier, lines, change.first_line, change.inserted);
    }

    /// Re-tag the whole document
    pub fn rebuild(&mut self, classifier: &Classifier, lines: &[Line]) {
        self.line_spans = vec![Vec::new(); lines.len()];
        self.restyle(classifier, lines, 0, lines.len());
    }
}

/// Classifier plus cache, with the user-facing on/off switch
pub struct SyntaxManager {
    classifier: Classifier,
    cache: HighlightCache,
    /// Whether syntax highlighting is shown
    pub enabled: bool,
}

impl SyntaxManager {
    pub fn new(classifier: Classifier) -> Self {
        Self {
            classifier,
            cache: HighlightCache::new(),
            enabled: true,
        }
    }

    /// Notify the manager of a buffer change
    pub fn text_changed(&mut self, lines: &[Line], change: TextChange) {
        self.cache.apply_change(&self.classifier, lines, change);
    }

    /// Re-tag everything (after loading a document)
    pub fn reload(&mut self, lines: &[Line]) {
        self.cache.rebuild(&self.classifier, lines);
    }

    /// Spans to render for a line; empty when highlighting is off
    pub fn line_spans(&self, line_idx: usize) -> &[Span] {
        if self.enabled {
            self.cache.spans(line_idx)
        } else {
            &[]
        }
    }

    /// Toggle syntax highlighting on/off
    pub fn toggle(&mut self) {
        self.enabled = !self.enabled;
    }
}
