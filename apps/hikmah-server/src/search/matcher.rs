//! Chapter search
//!
//! Linear scan over the chapters of one language. Each chapter may yield a
//! title match, up to three sentence matches for the whole phrase, or (when
//! no sentence matched) up to two paragraph matches for individual words.

use serde::Serialize;

use super::highlight::{Highlighter, QueryPattern};
use crate::content::{Chapter, Language, PARAGRAPH_DELIMITER};

/// Sentence matches kept per chapter
pub const MAX_SENTENCE_MATCHES: usize = 3;

/// Paragraph matches kept per chapter in the word fallback
pub const MAX_PARAGRAPH_MATCHES: usize = 2;

/// Shortest query word (in characters) used by the word fallback
pub const MIN_WORD_CHARS: usize = 3;

/// Where a match was found
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MatchType {
    Title,
    Content,
}

/// One located occurrence of the query
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Match {
    #[serde(rename = "type")]
    pub match_type: MatchType,
    /// Raw excerpt
    pub text: String,
    /// Excerpt with matched spans wrapped in highlight markers
    pub highlighted_text: String,
}

/// A chapter together with its matches
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchResult {
    pub chapter: Chapter,
    /// Position of the chapter among the chapters of its language
    pub chapter_index: usize,
    pub matches: Vec<Match>,
}

impl SearchResult {
    pub fn has_title_match(&self) -> bool {
        self.matches.iter().any(|m| m.match_type == MatchType::Title)
    }
}

/// Search over chapter titles and content
#[derive(Debug, Clone, Default)]
pub struct SearchMatcher {
    highlighter: Highlighter,
}

impl SearchMatcher {
    pub fn new(highlighter: Highlighter) -> Self {
        Self { highlighter }
    }

    pub fn highlighter(&self) -> &Highlighter {
        &self.highlighter
    }

    /// Ranked results for `query` among the chapters written in `language`
    pub fn search(&self, query: &str, language: Language, chapters: &[Chapter]) -> Vec<SearchResult> {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return Vec::new();
        }

        let phrase = QueryPattern::phrase(&query);
        let words: Vec<&str> = query
            .split_whitespace()
            .filter(|w| w.chars().count() >= MIN_WORD_CHARS)
            .collect();
        let word_pattern = QueryPattern::any_of(&words);

        let mut results: Vec<SearchResult> = chapters
            .iter()
            .filter(|chapter| chapter.language == language)
            .enumerate()
            .filter_map(|(index, chapter)| {
                let matches = self.chapter_matches(chapter, &query, &phrase, &words, &word_pattern);
                if matches.is_empty() {
                    None
                } else {
                    Some(SearchResult {
                        chapter: chapter.clone(),
                        chapter_index: index,
                        matches,
                    })
                }
            })
            .collect();

        // Title matches first, then more matches first; stable for ties
        results.sort_by(|a, b| {
            b.has_title_match()
                .cmp(&a.has_title_match())
                .then_with(|| b.matches.len().cmp(&a.matches.len()))
        });

        tracing::debug!(
            query = %query,
            language = %language,
            results = results.len(),
            "Search complete"
        );

        results
    }

    fn chapter_matches(
        &self,
        chapter: &Chapter,
        query: &str,
        phrase: &QueryPattern,
        words: &[&str],
        word_pattern: &QueryPattern,
    ) -> Vec<Match> {
        let mut matches = Vec::new();

        if chapter.title.to_lowercase().contains(query) {
            matches.push(Match {
                match_type: MatchType::Title,
                text: chapter.title.clone(),
                highlighted_text: self.highlighter.apply(&chapter.title, phrase),
            });
        }

        let mut content_matches = 0;
        if chapter.content.to_lowercase().contains(query) {
            for sentence in split_sentences(&chapter.content)
                .filter(|s| s.to_lowercase().contains(query))
                .take(MAX_SENTENCE_MATCHES)
            {
                let sentence = sentence.trim();
                matches.push(Match {
                    match_type: MatchType::Content,
                    text: sentence.to_string(),
                    highlighted_text: self.highlighter.apply(sentence, phrase),
                });
                content_matches += 1;
            }
        }

        if content_matches == 0 && !words.is_empty() {
            for paragraph in chapter
                .content
                .split(PARAGRAPH_DELIMITER)
                .filter(|p| {
                    let lower = p.to_lowercase();
                    words.iter().any(|w| lower.contains(w))
                })
                .take(MAX_PARAGRAPH_MATCHES)
            {
                matches.push(Match {
                    match_type: MatchType::Content,
                    text: paragraph.to_string(),
                    highlighted_text: self.highlighter.apply(paragraph, word_pattern),
                });
            }
        }

        matches
    }
}

/// Search with the default `<mark>` highlighter
pub fn search(query: &str, language: Language, chapters: &[Chapter]) -> Vec<SearchResult> {
    SearchMatcher::default().search(query, language, chapters)
}

/// Split on `.`, `!` or `?` followed by whitespace; the delimiter is dropped
fn split_sentences(text: &str) -> impl Iterator<Item = &str> {
    let mut rest = Some(text);
    std::iter::from_fn(move || {
        let current = rest?;
        let mut chars = current.char_indices().peekable();
        while let Some((i, c)) = chars.next() {
            if !matches!(c, '.' | '!' | '?') {
                continue;
            }
            let Some(&(_, next)) = chars.peek() else {
                break;
            };
            if !next.is_whitespace() {
                continue;
            }
            let sentence = &current[..i];
            let after = current[i + c.len_utf8()..].trim_start();
            rest = Some(after);
            return Some(sentence);
        }
        rest = None;
        Some(current)
    })
}
