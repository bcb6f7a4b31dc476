use ropey::Rope;

use crate::{order_highlights, Highlight, HighlightKind, HighlightSession, SearchFlags, Searcher};

fn literal(pattern: &str) -> Searcher {
    Searcher::new(pattern, SearchFlags::default(), false)
}

fn regex(pattern: &str) -> Searcher {
    Searcher::new(pattern, SearchFlags::default(), true)
}

#[test]
fn forward_find_is_inclusive_at_cursor() {
    let rope = Rope::from_str("one two three two");
    let searcher = literal("two");
    assert_eq!(searcher.find(&rope, 0, false), Some(4..7));
    assert_eq!(searcher.find(&rope, 4, false), Some(4..7));
    assert_eq!(searcher.find(&rope, 5, false), Some(14..17));
}

#[test]
fn find_wraps_once_from_the_opposite_boundary() {
    let rope = Rope::from_str("target then nothing");
    let searcher = literal("target");
    // Only occurrence is behind the cursor; one wrap recovers it.
    assert_eq!(searcher.find(&rope, 10, false), Some(0..6));

    let searcher = literal("nothing");
    // Backward search wraps from the end.
    assert_eq!(searcher.find(&rope, 3, true), Some(12..19));
}

#[test]
fn absent_pattern_is_not_found_even_after_wrap() {
    let rope = Rope::from_str("plain text");
    assert_eq!(literal("missing").find(&rope, 4, false), None);
    assert_eq!(literal("missing").find(&rope, 4, true), None);
}

#[test]
fn backward_find_stops_before_cursor() {
    let rope = Rope::from_str("ab ab ab");
    let searcher = literal("ab");
    assert_eq!(searcher.find_from(&rope, 8, true, None), Some(6..8));
    assert_eq!(searcher.find_from(&rope, 6, true, None), Some(3..5));
    // A match starting before the cursor counts even if it covers it.
    assert_eq!(searcher.find_from(&rope, 1, true, None), Some(0..2));
    assert_eq!(searcher.find_from(&rope, 0, true, None), None);
}

#[test]
fn matches_never_span_lines() {
    let rope = Rope::from_str("spl\nit");
    assert_eq!(literal("spl\nit").find(&rope, 0, false), None);
    assert_eq!(literal("it").find(&rope, 0, false), Some(4..6));
}

#[test]
fn case_insensitive_literal_search() {
    let rope = Rope::from_str("Hello WORLD");
    assert_eq!(literal("world").find(&rope, 0, false), Some(6..11));
    let sensitive = Searcher::new(
        "world",
        SearchFlags {
            case_sensitive: true,
            ..SearchFlags::default()
        },
        false,
    );
    assert_eq!(sensitive.find(&rope, 0, false), None);
}

#[test]
fn whole_word_skips_embedded_hits() {
    let rope = Rope::from_str("cat category cat_x cat");
    let searcher = Searcher::new(
        "cat",
        SearchFlags {
            whole_word: true,
            ..SearchFlags::default()
        },
        false,
    );
    assert_eq!(searcher.find_from(&rope, 1, false, None), Some(19..22));
    assert_eq!(searcher.find_from(&rope, 22, true, None), Some(19..22));
    assert_eq!(searcher.find_from(&rope, 19, true, None), Some(0..3));
}

#[test]
fn positions_are_char_offsets() {
    let rope = Rope::from_str("héllo héllo");
    let searcher = literal("héllo");
    assert_eq!(searcher.find(&rope, 1, false), Some(6..11));
    let all = searcher.highlight_visible(&rope, 0..rope.len_chars());
    assert_eq!(all, vec![0..5, 6..11]);
}

#[test]
fn regex_search_respects_case_flag() {
    let rope = Rope::from_str("Version V42 here");
    assert_eq!(regex(r"v\d+").find(&rope, 0, false), Some(8..11));
    let sensitive = Searcher::new(
        r"v\d+",
        SearchFlags {
            case_sensitive: true,
            ..SearchFlags::default()
        },
        true,
    );
    assert_eq!(sensitive.find(&rope, 0, false), None);
}

#[test]
fn invalid_regex_never_matches() {
    let rope = Rope::from_str("((((");
    let searcher = regex("(");
    assert!(searcher.is_inert());
    assert_eq!(searcher.find(&rope, 0, false), None);
    assert!(searcher.highlight_visible(&rope, 0..4).is_empty());
}

#[test]
fn empty_pattern_is_inert() {
    let rope = Rope::from_str("anything");
    assert!(literal("").is_inert());
    assert_eq!(literal("").find(&rope, 0, false), None);
}

#[test]
fn forward_limit_rejects_crossing_matches() {
    let rope = Rope::from_str("ab match");
    let searcher = literal("match");
    assert_eq!(searcher.find_from(&rope, 0, false, Some(5)), None);
    assert_eq!(searcher.find_from(&rope, 0, false, Some(8)), Some(3..8));
}

#[test]
fn backward_limit_rejects_crossing_matches() {
    let rope = Rope::from_str("match ab");
    let searcher = literal("match");
    assert_eq!(searcher.find_from(&rope, 8, true, Some(1)), None);
    assert_eq!(searcher.find_from(&rope, 8, true, Some(0)), Some(0..5));
}

#[test]
fn highlight_window_extends_by_pattern_length() {
    //           0123456789
    let rope = Rope::from_str("abcdefghij");
    let searcher = literal("cdefg"); // 2..7, straddles a viewport at 5
    let matches = searcher.highlight_visible(&rope, 5..10);
    assert!(matches.contains(&(2..7)), "straddling match was dropped");
}

#[test]
fn regex_window_is_not_extended() {
    let rope = Rope::from_str("abcdefghij");
    let searcher = regex("cdefg");
    // The regex match length is unknown up front, so the straddling match
    // stays invisible until the viewport reaches it.
    assert!(searcher.highlight_visible(&rope, 5..10).is_empty());
    assert_eq!(searcher.highlight_visible(&rope, 0..10), vec![2..7]);
}

#[test]
fn tiny_window_skips_the_scan() {
    let rope = Rope::from_str("ab");
    let searcher = literal("longpattern");
    assert!(searcher.highlight_visible(&rope, 0..2).is_empty());
}

#[test]
fn highlight_enumerates_all_matches_in_window() {
    let rope = Rope::from_str("xx axx bxx\nxx cxx");
    let searcher = literal("xx");
    let matches = searcher.highlight_visible(&rope, 0..rope.len_chars());
    assert_eq!(matches, vec![0..2, 4..6, 8..10, 11..13, 15..17]);
}

#[test]
fn empty_width_regex_matches_still_terminate() {
    let rope = Rope::from_str("aaa");
    let searcher = regex("x*");
    let matches = searcher.highlight_visible(&rope, 0..3);
    assert_eq!(matches.len(), 4);
    assert!(matches.iter().all(|m| m.start == m.end));
}

#[test]
fn session_clears_on_empty_query() {
    let rope = Rope::from_str("needle and needle");
    let mut session = HighlightSession::new();
    session.set_query("needle", SearchFlags::default(), false);
    assert_eq!(
        session.viewport_or_content_changed(&rope, 0..rope.len_chars()),
        &[0..6, 11..17]
    );

    session.set_query("", SearchFlags::default(), false);
    assert!(session.searcher().is_none());
    assert!(session.matches().is_empty());
    assert!(session
        .viewport_or_content_changed(&rope, 0..rope.len_chars())
        .is_empty());
}

#[test]
fn session_replaces_matches_on_viewport_change() {
    let rope = Rope::from_str("aa bb aa bb aa");
    let mut session = HighlightSession::new();
    session.set_query("aa", SearchFlags::default(), false);
    session.viewport_or_content_changed(&rope, 0..rope.len_chars());
    assert_eq!(session.matches().len(), 3);
    // Shrinking the window drops the out-of-view matches.
    session.viewport_or_content_changed(&rope, 0..4);
    assert_eq!(session.matches(), &[0..2]);
}

#[test]
fn highlights_sort_into_presentation_order() {
    let mut highlights = vec![
        Highlight {
            range: 9..10,
            kind: HighlightKind::BracketMatch,
        },
        Highlight {
            range: 4..6,
            kind: HighlightKind::SearchMatch,
        },
        Highlight {
            range: 0..12,
            kind: HighlightKind::CurrentLine,
        },
        Highlight {
            range: 6..8,
            kind: HighlightKind::SearchMatch,
        },
    ];
    order_highlights(&mut highlights);
    let kinds: Vec<HighlightKind> = highlights.iter().map(|h| h.kind).collect();
    assert_eq!(
        kinds,
        vec![
            HighlightKind::CurrentLine,
            HighlightKind::SearchMatch,
            HighlightKind::SearchMatch,
            HighlightKind::BracketMatch,
        ]
    );
    // Stable within a group.
    assert_eq!(highlights[1].range, 4..6);
}
