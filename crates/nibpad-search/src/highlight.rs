use std::ops::Range;

use ropey::Rope;

use crate::searcher::{SearchFlags, Searcher};

/// Highlight groups in their fixed presentation order: the current-line
/// band first, then search matches, then the externally tracked groups.
/// Hosts sort by this ordering before painting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum HighlightKind {
    CurrentLine,
    SearchMatch,
    Selection,
    ColumnEdit,
    BracketMatch,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlight {
    pub range: Range<usize>,
    pub kind: HighlightKind,
}

/// Puts highlights into presentation order. The sort is stable, so within
/// a group the caller's order survives.
pub fn order_highlights(highlights: &mut [Highlight]) {
    highlights.sort_by_key(|h| h.kind);
}

/// Per-editor match-highlight state with a single entry point for every
/// event that can move the visible window: scroll, resize, or an edit.
#[derive(Debug, Default)]
pub struct HighlightSession {
    searcher: Option<Searcher>,
    matches: Vec<Range<usize>>,
}

impl HighlightSession {
    pub fn new() -> Self {
        Self::default()
    }

    /// Installs a new query. An empty pattern clears the session outright
    /// so no stale highlight can survive it.
    pub fn set_query(&mut self, pattern: &str, flags: SearchFlags, use_regex: bool) {
        if pattern.is_empty() {
            self.clear();
            return;
        }
        self.searcher = Some(Searcher::new(pattern, flags, use_regex));
        self.matches.clear();
    }

    pub fn clear(&mut self) {
        self.searcher = None;
        self.matches.clear();
    }

    pub fn searcher(&self) -> Option<&Searcher> {
        self.searcher.as_ref()
    }

    pub fn matches(&self) -> &[Range<usize>] {
        &self.matches
    }

    /// Recomputes the visible matches for the new window and returns them.
    /// The previous set is fully replaced.
    pub fn viewport_or_content_changed(
        &mut self,
        rope: &Rope,
        viewport: Range<usize>,
    ) -> &[Range<usize>] {
        match &self.searcher {
            Some(searcher) => self.matches = searcher.highlight_visible(rope, viewport),
            None => self.matches.clear(),
        }
        &self.matches
    }
}
