//! Reading position within the published chapters of one language
//!
//! The session does not own chapters. Every call receives the current
//! corpus, so edits in the admin portal are picked up immediately and the
//! index is re-clamped on the next access.

use super::settings::ReadingSettings;
use crate::content::{Chapter, Language};

/// Chapters of `language` in corpus order
pub fn chapters_in(corpus: &[Chapter], language: Language) -> Vec<&Chapter> {
    corpus.iter().filter(|c| c.language == language).collect()
}

#[derive(Debug, Clone, PartialEq)]
pub struct ReadingSession {
    language: Language,
    index: usize,
    settings: ReadingSettings,
}

impl ReadingSession {
    pub fn new(language: Language) -> Self {
        Self {
            language,
            index: 0,
            settings: ReadingSettings::default(),
        }
    }

    pub fn language(&self) -> Language {
        self.language
    }

    /// Index within the chapters of the current language
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn settings(&self) -> &ReadingSettings {
        &self.settings
    }

    pub fn settings_mut(&mut self) -> &mut ReadingSettings {
        &mut self.settings
    }

    pub fn chapter_count(&self, corpus: &[Chapter]) -> usize {
        corpus.iter().filter(|c| c.language == self.language).count()
    }

    pub fn current_chapter<'a>(&self, corpus: &'a [Chapter]) -> Option<&'a Chapter> {
        corpus
            .iter()
            .filter(|c| c.language == self.language)
            .nth(self.index)
    }

    /// Advance one chapter; false at the last chapter
    pub fn next(&mut self, corpus: &[Chapter]) -> bool {
        self.clamp(corpus);
        if self.index + 1 >= self.chapter_count(corpus) {
            return false;
        }
        self.index += 1;
        true
    }

    /// Go back one chapter; false at the first chapter
    pub fn previous(&mut self, corpus: &[Chapter]) -> bool {
        self.clamp(corpus);
        if self.index == 0 {
            return false;
        }
        self.index -= 1;
        true
    }

    /// Jump to an index of the current language; false when out of range
    pub fn go_to_index(&mut self, corpus: &[Chapter], index: usize) -> bool {
        if index >= self.chapter_count(corpus) {
            return false;
        }
        self.index = index;
        true
    }

    /// Jump to a chapter by id; false when it is not a chapter of the current language
    pub fn navigate_to_chapter(&mut self, corpus: &[Chapter], chapter_id: u32) -> bool {
        let position = corpus
            .iter()
            .filter(|c| c.language == self.language)
            .position(|c| c.id == chapter_id);

        match position {
            Some(index) => {
                self.index = index;
                true
            }
            None => {
                tracing::debug!(chapter_id, language = %self.language, "Chapter not in current language");
                false
            }
        }
    }

    pub fn set_language(&mut self, corpus: &[Chapter], language: Language) {
        self.language = language;
        self.clamp(corpus);
    }

    pub fn toggle_language(&mut self, corpus: &[Chapter]) -> Language {
        self.set_language(corpus, self.language.toggled());
        self.language
    }

    /// Pull the index back inside the current language's range
    pub fn clamp(&mut self, corpus: &[Chapter]) {
        let count = self.chapter_count(corpus);
        self.index = self.index.min(count.saturating_sub(1));
    }

    /// round((index + 1) / count * 100); 0 without chapters
    pub fn progress_percent(&self, corpus: &[Chapter]) -> u32 {
        let count = self.chapter_count(corpus);
        if count == 0 {
            return 0;
        }
        let index = self.index.min(count - 1);
        ((index + 1) as f64 / count as f64 * 100.0).round() as u32
    }
}
