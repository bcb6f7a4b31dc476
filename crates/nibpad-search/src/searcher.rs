use std::ops::Range;

use regex::{Regex, RegexBuilder};
use ropey::Rope;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SearchFlags {
    pub case_sensitive: bool,
    pub whole_word: bool,
}

// Line-wise pattern search over a rope. Matches never span a line break;
// all positions are absolute char offsets.
#[derive(Debug, Clone)]
pub struct Searcher {
    pattern: String,
    flags: SearchFlags,
    use_regex: bool,
    regex: Option<Regex>,
    needle: String,
}

impl Searcher {
    /// Builds a searcher. The regex is compiled exactly once here; a
    /// pattern that does not compile yields a searcher that never matches.
    /// Only case sensitivity translates into the regex; whole-word has no
    /// translation and must be expressed in the pattern itself.
    pub fn new(pattern: &str, flags: SearchFlags, use_regex: bool) -> Self {
        let regex = if use_regex && !pattern.is_empty() {
            RegexBuilder::new(pattern)
                .case_insensitive(!flags.case_sensitive)
                .build()
                .ok()
        } else {
            None
        };
        let needle = if flags.case_sensitive {
            pattern.to_string()
        } else {
            pattern.to_ascii_lowercase()
        };
        Self {
            pattern: pattern.to_string(),
            flags,
            use_regex,
            regex,
            needle,
        }
    }

    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    pub fn flags(&self) -> SearchFlags {
        self.flags
    }

    pub fn use_regex(&self) -> bool {
        self.use_regex
    }

    /// An inert searcher matches nothing: empty pattern, or a regex that
    /// failed to compile.
    pub fn is_inert(&self) -> bool {
        self.pattern.is_empty() || (self.use_regex && self.regex.is_none())
    }

    /// Directional search from `cursor` with a single wraparound retry
    /// from the opposite document boundary. Cost is bounded by two passes.
    pub fn find(&self, rope: &Rope, cursor: usize, backwards: bool) -> Option<Range<usize>> {
        if let Some(found) = self.find_from(rope, cursor, backwards, None) {
            return Some(found);
        }
        let len = rope.len_chars();
        if (backwards && cursor >= len) || (!backwards && cursor == 0) {
            // The first pass already covered the whole document.
            return None;
        }
        let boundary = if backwards { len } else { 0 };
        self.find_from(rope, boundary, backwards, None)
    }

    /// Single directional pass, no wraparound. Forward matches start at or
    /// after `from`; backward matches start strictly before it. A match
    /// whose relevant boundary crosses `limit` (end when forward, start
    /// when backward) counts as not found.
    pub fn find_from(
        &self,
        rope: &Rope,
        from: usize,
        backwards: bool,
        limit: Option<usize>,
    ) -> Option<Range<usize>> {
        if self.is_inert() {
            return None;
        }
        if backwards {
            self.scan_backward(rope, from, limit)
        } else {
            self.scan_forward(rope, from, limit)
        }
    }

    /// Every match intersecting `viewport`, in order. For literal patterns
    /// the window is widened by the pattern length on both sides so a
    /// match straddling an edge is still caught; a regex match has no
    /// fixed length, so regex mode scans the viewport as-is.
    pub fn highlight_visible(&self, rope: &Rope, viewport: Range<usize>) -> Vec<Range<usize>> {
        if self.is_inert() {
            return Vec::new();
        }
        let len = rope.len_chars();
        let mut start = viewport.start.min(len);
        let mut end = viewport.end.min(len);
        if !self.use_regex {
            let pad = self.needle.chars().count();
            start = start.saturating_sub(pad);
            end = (end + pad).min(len);
            if end - start < pad {
                // No match fits in the window.
                return Vec::new();
            }
        }

        let mut matches = Vec::new();
        let mut origin = start;
        while origin <= end {
            let Some(found) = self.find_from(rope, origin, false, Some(end)) else {
                break;
            };
            // Strict progress, even on an empty-width regex match.
            origin = if found.end > origin { found.end } else { origin + 1 };
            matches.push(found);
        }
        matches
    }

    fn scan_forward(&self, rope: &Rope, from: usize, limit: Option<usize>) -> Option<Range<usize>> {
        let len = rope.len_chars();
        let from = from.min(len);
        let start_line = rope.char_to_line(from);
        for line_index in start_line..rope.len_lines() {
            let line_start = rope.line_to_char(line_index);
            if limit.is_some_and(|l| line_start > l) {
                break;
            }
            let hay = self.normalized_line(rope, line_index);
            let from_col = if line_index == start_line {
                from - line_start
            } else {
                0
            };
            if let Some((start_col, end_col)) = self.match_in_line_forward(&hay, from_col) {
                let found = line_start + start_col..line_start + end_col;
                if limit.is_some_and(|l| found.end > l) {
                    return None;
                }
                return Some(found);
            }
        }
        None
    }

    fn scan_backward(&self, rope: &Rope, from: usize, limit: Option<usize>) -> Option<Range<usize>> {
        let from = from.min(rope.len_chars());
        let start_line = rope.char_to_line(from);
        for line_index in (0..=start_line).rev() {
            let line_start = rope.line_to_char(line_index);
            let hay = self.normalized_line(rope, line_index);
            let before_col = (line_index == start_line).then(|| from - line_start);
            if let Some((start_col, end_col)) = self.match_in_line_backward(&hay, before_col) {
                let found = line_start + start_col..line_start + end_col;
                if limit.is_some_and(|l| found.start < l) {
                    return None;
                }
                return Some(found);
            }
            if limit.is_some_and(|l| line_start <= l) {
                // Everything further back starts before the limit.
                break;
            }
        }
        None
    }

    // The haystack for one line: trailing line break stripped, lowercased
    // for case-insensitive literal search (the regex engine folds case by
    // itself).
    fn normalized_line(&self, rope: &Rope, line_index: usize) -> String {
        let mut text = rope.line(line_index).to_string();
        if text.ends_with('\n') {
            text.pop();
            if text.ends_with('\r') {
                text.pop();
            }
        }
        if !self.use_regex && !self.flags.case_sensitive {
            text = text.to_ascii_lowercase();
        }
        text
    }

    /// First acceptable match in `hay` starting at or after `from_col`,
    /// as char columns.
    fn match_in_line_forward(&self, hay: &str, from_col: usize) -> Option<(usize, usize)> {
        let from_byte = char_to_byte_index(hay, from_col)?;
        if self.use_regex {
            let found = self.regex.as_ref()?.find_at(hay, from_byte)?;
            Some(byte_span_to_cols(hay, found.start(), found.end()))
        } else {
            let mut search_from = from_byte;
            loop {
                let found = hay.get(search_from..)?.find(&self.needle)?;
                let at = search_from + found;
                let end = at + self.needle.len();
                if !self.flags.whole_word || word_bounded(hay, at, end) {
                    return Some(byte_span_to_cols(hay, at, end));
                }
                search_from = at + char_width_at(hay, at);
            }
        }
    }

    /// Last acceptable match starting before char column `before_col`
    /// (`None` scans the whole line).
    fn match_in_line_backward(
        &self,
        hay: &str,
        before_col: Option<usize>,
    ) -> Option<(usize, usize)> {
        // A cursor sitting inside the line break clamps to end-of-line.
        let before_byte = match before_col {
            Some(col) => char_to_byte_index(hay, col).unwrap_or(hay.len()),
            None => hay.len(),
        };
        if self.use_regex {
            let regex = self.regex.as_ref()?;
            let mut best: Option<(usize, usize)> = None;
            for found in regex.find_iter(hay) {
                if found.start() >= before_byte {
                    break;
                }
                best = Some((found.start(), found.end()));
            }
            let (start, end) = best?;
            Some(byte_span_to_cols(hay, start, end))
        } else {
            let mut best: Option<usize> = None;
            let mut search_from = 0usize;
            while search_from < before_byte {
                let Some(found) = hay.get(search_from..).and_then(|rest| rest.find(&self.needle))
                else {
                    break;
                };
                let at = search_from + found;
                if at >= before_byte {
                    break;
                }
                if !self.flags.whole_word || word_bounded(hay, at, at + self.needle.len()) {
                    best = Some(at);
                }
                search_from = at + char_width_at(hay, at);
            }
            let at = best?;
            Some(byte_span_to_cols(hay, at, at + self.needle.len()))
        }
    }
}

fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

fn word_bounded(hay: &str, start: usize, end: usize) -> bool {
    let before = hay[..start].chars().next_back();
    let after = hay[end..].chars().next();
    !before.is_some_and(is_word_char) && !after.is_some_and(is_word_char)
}

fn char_width_at(hay: &str, at: usize) -> usize {
    hay[at..].chars().next().map_or(1, char::len_utf8)
}

fn char_to_byte_index(hay: &str, col: usize) -> Option<usize> {
    if col == 0 {
        return Some(0);
    }
    let mut remaining = col;
    for (byte, _) in hay.char_indices() {
        if remaining == 0 {
            return Some(byte);
        }
        remaining -= 1;
    }
    (remaining == 0).then_some(hay.len())
}

fn byte_span_to_cols(hay: &str, start: usize, end: usize) -> (usize, usize) {
    let start_col = hay[..start].chars().count();
    let end_col = start_col + hay[start..end].chars().count();
    (start_col, end_col)
}
