//! Highlight markup for search excerpts
//!
//! Query text is always escaped before it becomes a pattern, so user input
//! is matched literally.

use regex::{Captures, Regex, RegexBuilder};

/// Wraps matched spans in opening/closing markers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Highlighter {
    open: String,
    close: String,
}

impl Default for Highlighter {
    fn default() -> Self {
        Self::new("<mark>", "</mark>")
    }
}

impl Highlighter {
    pub fn new(open: impl Into<String>, close: impl Into<String>) -> Self {
        Self {
            open: open.into(),
            close: close.into(),
        }
    }

    /// `<mark class="...">` markers; quote and angle characters are dropped from the class
    pub fn with_class(class: &str) -> Self {
        let class: String = class
            .chars()
            .filter(|c| !matches!(c, '"' | '\'' | '<' | '>' | '&'))
            .collect();
        Self::new(format!("<mark class=\"{}\">", class.trim()), "</mark>")
    }

    pub fn open(&self) -> &str {
        &self.open
    }

    pub fn close(&self) -> &str {
        &self.close
    }

    /// Wrap every match of `pattern` in `text`
    pub fn apply(&self, text: &str, pattern: &QueryPattern) -> String {
        match &pattern.regex {
            Some(regex) => regex
                .replace_all(text, |caps: &Captures| {
                    format!("{}{}{}", self.open, &caps[0], self.close)
                })
                .into_owned(),
            None => text.to_string(),
        }
    }
}

/// Case-insensitive literal pattern for one or more query terms
#[derive(Debug, Clone)]
pub struct QueryPattern {
    regex: Option<Regex>,
}

impl QueryPattern {
    /// Pattern for a whole phrase
    pub fn phrase(phrase: &str) -> Self {
        Self::from_terms(&[phrase])
    }

    /// Pattern matching any of the terms in a single pass
    ///
    /// Longer terms are tried first so a term never splits a longer one.
    pub fn any_of<S: AsRef<str>>(terms: &[S]) -> Self {
        let mut terms: Vec<&str> = terms.iter().map(|t| t.as_ref()).collect();
        terms.sort_by(|a, b| b.chars().count().cmp(&a.chars().count()).then(a.cmp(b)));
        terms.dedup();
        Self::from_terms(&terms)
    }

    fn from_terms(terms: &[&str]) -> Self {
        let alternatives: Vec<String> = terms
            .iter()
            .filter(|t| !t.is_empty())
            .map(|t| regex::escape(t))
            .collect();

        if alternatives.is_empty() {
            return Self { regex: None };
        }

        match RegexBuilder::new(&alternatives.join("|"))
            .case_insensitive(true)
            .build()
        {
            Ok(regex) => Self { regex: Some(regex) },
            Err(e) => {
                // Only reachable for queries that exceed the regex size limit
                tracing::warn!(error = %e, "Could not build highlight pattern, excerpts left plain");
                Self { regex: None }
            }
        }
    }

    pub fn is_match(&self, text: &str) -> bool {
        self.regex.as_ref().map(|r| r.is_match(text)).unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_phrase_highlight_is_case_insensitive_and_global() {
        let highlighter = Highlighter::default();
        let pattern = QueryPattern::phrase("healthcare");
        let out = highlighter.apply("Healthcare and HEALTHCARE", &pattern);
        assert_eq!(out, "<mark>Healthcare</mark> and <mark>HEALTHCARE</mark>");
    }

    #[test]
    fn test_metacharacters_are_literal() {
        let highlighter = Highlighter::default();
        let pattern = QueryPattern::phrase("a.*b");

        assert!(!pattern.is_match("a long b"));
        assert!(pattern.is_match("see a.*b here"));
        assert_eq!(
            highlighter.apply("axxb and a.*b", &pattern),
            "axxb and <mark>a.*b</mark>"
        );
    }

    #[test]
    fn test_any_of_highlights_each_term_once() {
        let highlighter = Highlighter::default();
        let pattern = QueryPattern::any_of(&["mark", "remark"]);
        let out = highlighter.apply("A remark to mark", &pattern);
        assert_eq!(out, "A <mark>remark</mark> to <mark>mark</mark>");
    }

    #[test]
    fn test_class_markers_are_sanitized() {
        let highlighter = Highlighter::with_class("bg-primary/20 \"><script>");
        assert_eq!(highlighter.open(), "<mark class=\"bg-primary/20 script\">");
        assert_eq!(highlighter.close(), "</mark>");
    }

    #[test]
    fn test_replacement_markers_are_not_expanded() {
        let highlighter = Highlighter::new("[$0]", "[/$1]");
        let out = highlighter.apply("mercy", &QueryPattern::phrase("mercy"));
        assert_eq!(out, "[$0]mercy[/$1]");
    }

    #[test]
    fn test_urdu_text() {
        let highlighter = Highlighter::default();
        let out = highlighter.apply("اسلام میں صحت", &QueryPattern::phrase("صحت"));
        assert_eq!(out, "اسلام میں <mark>صحت</mark>");
    }
}
