use std::ops::Range;

use ropey::Rope;

use crate::block::{is_delimiter, Block, DelimiterInfo};

#[derive(thiserror::Error, Debug)]
pub enum DocumentError {
    #[error("range {start}..{end} exceeds document length {len}")]
    RangeOutOfBounds {
        start: usize,
        end: usize,
        len: usize,
    },
}

// Rope-backed document with a per-line delimiter index. The index is an
// immutable view for the matcher; edits go through `replace_range`, which
// relexes the touched lines and refreshes positions for everything after.
#[derive(Debug, Clone)]
pub struct Document {
    rope: Rope,
    blocks: Vec<Block>,
}

impl Document {
    pub fn empty() -> Self {
        Self::from_text("")
    }

    pub fn from_text(text: &str) -> Self {
        let rope = Rope::from_str(text);
        let blocks = (0..rope.len_lines()).map(|l| lex_line(&rope, l)).collect();
        Self { rope, blocks }
    }

    pub fn rope(&self) -> &Rope {
        &self.rope
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    pub fn char_at(&self, pos: usize) -> Option<char> {
        (pos < self.rope.len_chars()).then(|| self.rope.char(pos))
    }

    /// Replaces `range` with `text` and rebuilds the affected slice of the
    /// delimiter index. Lines outside the edit keep their lists and only
    /// get fresh positions.
    pub fn replace_range(&mut self, range: Range<usize>, text: &str) -> Result<(), DocumentError> {
        let len = self.rope.len_chars();
        if range.start > range.end || range.end > len {
            return Err(DocumentError::RangeOutOfBounds {
                start: range.start,
                end: range.end,
                len,
            });
        }

        let first_line = self.rope.char_to_line(range.start);
        let old_last_line = self.rope.char_to_line(range.end);

        if range.start < range.end {
            self.rope.remove(range.clone());
        }
        if !text.is_empty() {
            self.rope.insert(range.start, text);
        }

        let new_last_line = self
            .rope
            .char_to_line((range.start + text.chars().count()).min(self.rope.len_chars()));
        let relexed: Vec<Block> = (first_line..=new_last_line)
            .map(|l| lex_line(&self.rope, l))
            .collect();
        let splice_end = (old_last_line + 1).min(self.blocks.len());
        self.blocks.splice(first_line..splice_end, relexed);

        for line in new_last_line + 1..self.blocks.len() {
            self.blocks[line].position = self.rope.line_to_char(line);
        }
        Ok(())
    }

    /// Rebuilds the whole index from the rope.
    pub fn reindex(&mut self) {
        self.blocks = (0..self.rope.len_lines())
            .map(|l| lex_line(&self.rope, l))
            .collect();
    }

    /// Locates the delimiter entry covering the char at `pos`, as a
    /// (block index, entry index) pair.
    pub(crate) fn delimiter_entry_at(&self, pos: usize) -> Option<(usize, usize)> {
        if pos >= self.rope.len_chars() {
            return None;
        }
        let line = self.rope.char_to_line(pos);
        let block = self.blocks.get(line)?;
        let local = pos - block.position;
        let entry = block
            .delimiters
            .binary_search_by_key(&local, |d| d.local_position)
            .ok()?;
        Some((line, entry))
    }
}

fn lex_line(rope: &Rope, line: usize) -> Block {
    let delimiters = rope
        .line(line)
        .chars()
        .enumerate()
        .filter(|(_, ch)| is_delimiter(*ch))
        .map(|(local_position, ch)| DelimiterInfo { local_position, ch })
        .collect();
    Block {
        position: rope.line_to_char(line),
        delimiters,
    }
}
