//! Search module
//!
//! Case-insensitive title and content matching over the chapters of one
//! language, with highlighted excerpts.

mod highlight;
mod matcher;

pub use highlight::{Highlighter, QueryPattern};
pub use matcher::{
    search, Match, MatchType, SearchMatcher, SearchResult, MAX_PARAGRAPH_MATCHES,
    MAX_SENTENCE_MATCHES, MIN_WORD_CHARS,
};
