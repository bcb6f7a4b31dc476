// Block-level delimiter index: one Block per document line, each carrying
// the positions of every bracket-like delimiter on that line. The matcher
// consumes these lists without ever touching the text itself.

/// The three delimiter pairs, in the order match resolution tries them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DelimiterKind {
    Paren,
    Brace,
    Bracket,
}

impl DelimiterKind {
    pub const ALL: [DelimiterKind; 3] =
        [DelimiterKind::Paren, DelimiterKind::Brace, DelimiterKind::Bracket];

    pub fn open(self) -> char {
        match self {
            Self::Paren => '(',
            Self::Brace => '{',
            Self::Bracket => '[',
        }
    }

    pub fn close(self) -> char {
        match self {
            Self::Paren => ')',
            Self::Brace => '}',
            Self::Bracket => ']',
        }
    }
}

pub fn is_delimiter(ch: char) -> bool {
    matches!(ch, '(' | ')' | '{' | '}' | '[' | ']')
}

/// One delimiter occurrence, positioned relative to its block's first char.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DelimiterInfo {
    pub local_position: usize,
    pub ch: char,
}

/// A line of the document plus its delimiter occurrences.
///
/// `position` is the absolute char offset of the line's first character;
/// `delimiters` is sorted by `local_position`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Block {
    pub position: usize,
    pub delimiters: Vec<DelimiterInfo>,
}

/// Collects the delimiter occurrences of a single line, in order.
pub fn scan_delimiters(line: &str) -> Vec<DelimiterInfo> {
    line.chars()
        .enumerate()
        .filter(|(_, ch)| is_delimiter(*ch))
        .map(|(local_position, ch)| DelimiterInfo { local_position, ch })
        .collect()
}
