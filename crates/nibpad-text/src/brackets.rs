use crate::block::{Block, DelimiterKind};
use crate::document::Document;

// Cross-block delimiter matching. Both scans are flat loops with an
// explicit depth counter, so stack use stays constant however far apart
// the pair sits.

/// Scans `blocks[block_idx].delimiters[start_index..]`, then every later
/// block, for the `close` partner of an already-seen `open` delimiter.
/// Returns the partner's absolute char position.
pub fn match_forward(
    blocks: &[Block],
    block_idx: usize,
    start_index: usize,
    initial_depth: usize,
    open: char,
    close: char,
) -> Option<usize> {
    let mut depth = initial_depth;
    let mut start = start_index;
    for block in blocks.get(block_idx..)? {
        for entry in &block.delimiters[start.min(block.delimiters.len())..] {
            if entry.ch == open {
                depth += 1;
            } else if entry.ch == close {
                if depth == 0 {
                    return Some(block.position + entry.local_position);
                }
                depth -= 1;
            }
        }
        start = 0;
    }
    None
}

/// Mirror of [`match_forward`]: scans `delimiters[..end_index]` in reverse,
/// then every earlier block, for the `open` partner of a `close` delimiter.
/// The end index is exclusive so "start before entry 0" is simply 0.
pub fn match_backward(
    blocks: &[Block],
    block_idx: usize,
    end_index: usize,
    initial_depth: usize,
    open: char,
    close: char,
) -> Option<usize> {
    if blocks.is_empty() {
        return None;
    }
    let mut depth = initial_depth;
    let mut end = end_index;
    for idx in (0..=block_idx.min(blocks.len() - 1)).rev() {
        let block = &blocks[idx];
        for entry in block.delimiters[..end.min(block.delimiters.len())].iter().rev() {
            if entry.ch == close {
                depth += 1;
            } else if entry.ch == open {
                if depth == 0 {
                    return Some(block.position + entry.local_position);
                }
                depth -= 1;
            }
        }
        end = usize::MAX;
    }
    None
}

/// Finds the delimiter pairs adjacent to `cursor` and returns the absolute
/// positions to highlight, one per successful match. The caller drops any
/// highlights from a previous invocation and applies these instead.
///
/// An open delimiter at the cursor is matched forward; a close delimiter
/// just before the cursor is matched backward; the two sides are
/// independent, so a `)(`-style adjacency yields two searches. Kinds are
/// tried in paren, brace, bracket order and resolution stops at the first
/// kind with an adjacent delimiter, whether or not its partner exists.
pub fn match_brackets(doc: &Document, cursor: usize) -> Vec<usize> {
    let at = doc.char_at(cursor);
    let before = cursor.checked_sub(1).and_then(|pos| doc.char_at(pos));

    for kind in DelimiterKind::ALL {
        let open = kind.open();
        let close = kind.close();
        let forward = at == Some(open);
        let backward = before == Some(close);
        if !forward && !backward {
            continue;
        }

        let mut highlights = Vec::new();
        if forward {
            if let Some((block_idx, entry)) = doc.delimiter_entry_at(cursor) {
                if let Some(pos) =
                    match_forward(doc.blocks(), block_idx, entry + 1, 0, open, close)
                {
                    highlights.push(pos);
                }
            }
        }
        if backward {
            if let Some((block_idx, entry)) = doc.delimiter_entry_at(cursor - 1) {
                if let Some(pos) = match_backward(doc.blocks(), block_idx, entry, 0, open, close)
                {
                    highlights.push(pos);
                }
            }
        }
        return highlights;
    }

    Vec::new()
}
