mod highlight;
mod searcher;

pub use highlight::{order_highlights, Highlight, HighlightKind, HighlightSession};
pub use searcher::{SearchFlags, Searcher};

#[cfg(test)]
mod tests;
