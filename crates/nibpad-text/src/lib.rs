mod block;
mod brackets;
mod document;

pub use block::{is_delimiter, scan_delimiters, Block, DelimiterInfo, DelimiterKind};
pub use brackets::{match_backward, match_brackets, match_forward};
pub use document::{Document, DocumentError};
