//! Library module
//!
//! The single owner of everything a reader touches: annotations, content,
//! the reading session and the search matcher. All mutation goes through
//! here so the session index stays valid when chapters change.

mod view;

pub use view::{BookmarkEntry, BookmarkToggle, ReaderView};

use crate::annotations::{AnnotationStore, Bookmark, BookmarkUpdate, Clock, Note};
use crate::config::Config;
use crate::content::{
    Chapter, ChapterDraft, ChapterRecord, ContentOverview, ContentStore, Language, Moderation,
    Testimonial, TestimonialSubmission, TestimonialSummary, Today,
};
use crate::error::{AppError, Result, StorageError};
use crate::reading::{chapters_in, ReadingSession, ReadingSettings, SettingsUpdate};
use crate::search::{Highlighter, SearchMatcher, SearchResult};
use crate::storage::{LoadWarning, SharedSlots};

pub struct Library {
    annotations: AnnotationStore,
    content: ContentStore,
    session: ReadingSession,
    matcher: SearchMatcher,
}

impl Library {
    /// Open both stores over the same slot backend
    pub fn open(
        slots: SharedSlots,
        config: &Config,
    ) -> std::result::Result<(Self, Vec<LoadWarning>), StorageError> {
        let (annotations, mut warnings) = AnnotationStore::open(slots.clone())?;
        let (content, content_warnings) = ContentStore::open(slots, config.storage.seed_content)?;
        warnings.extend(content_warnings);

        let highlighter = config
            .reader
            .highlight_class
            .as_deref()
            .map(Highlighter::with_class)
            .unwrap_or_default();

        let mut library = Self {
            annotations,
            content,
            session: ReadingSession::new(config.reader.default_language),
            matcher: SearchMatcher::new(highlighter),
        };
        library.reclamp();

        Ok((library, warnings))
    }

    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.annotations = self.annotations.with_clock(clock);
        self
    }

    pub fn with_today(mut self, today: Today) -> Self {
        self.content = self.content.with_today(today);
        self
    }

    pub fn annotations(&self) -> &AnnotationStore {
        &self.annotations
    }

    pub fn content(&self) -> &ContentStore {
        &self.content
    }

    pub fn session(&self) -> &ReadingSession {
        &self.session
    }

    // ========================================================================
    // Reading
    // ========================================================================

    /// Published chapters, optionally of one language
    pub fn chapters(&self, language: Option<Language>) -> Vec<Chapter> {
        let corpus = self.content.published_corpus();
        match language {
            Some(language) => chapters_in(&corpus, language).into_iter().cloned().collect(),
            None => corpus,
        }
    }

    /// A published chapter by id
    pub fn chapter(&self, id: u32) -> Option<Chapter> {
        self.content
            .chapter(id)
            .filter(|record| record.is_published())
            .map(|record| record.chapter.clone())
    }

    pub fn reader_view(&self) -> ReaderView {
        let corpus = self.content.published_corpus();
        let chapter = self.session.current_chapter(&corpus).cloned();
        let chapter_count = self.session.chapter_count(&corpus);
        let chapter_index = self.session.index().min(chapter_count.saturating_sub(1));
        let settings = *self.session.settings();

        let (is_bookmarked, note_count) = match &chapter {
            Some(chapter) => (
                self.annotations.is_chapter_bookmarked(chapter.id),
                self.annotations.notes_by_chapter(chapter.id).len(),
            ),
            None => (false, 0),
        };

        ReaderView {
            chapter_number: if chapter.is_some() { chapter_index + 1 } else { 0 },
            chapter,
            chapter_index,
            chapter_count,
            progress_percent: self.session.progress_percent(&corpus),
            has_previous: chapter_index > 0,
            has_next: chapter_index + 1 < chapter_count,
            language: self.session.language(),
            is_bookmarked,
            note_count,
            settings,
            title_font_size: settings.title_font_size(),
        }
    }

    pub fn next_chapter(&mut self) -> bool {
        let corpus = self.content.published_corpus();
        self.session.next(&corpus)
    }

    pub fn previous_chapter(&mut self) -> bool {
        let corpus = self.content.published_corpus();
        self.session.previous(&corpus)
    }

    pub fn go_to_index(&mut self, index: usize) -> bool {
        let corpus = self.content.published_corpus();
        self.session.go_to_index(&corpus, index)
    }

    /// Open a chapter of the current language by id
    pub fn navigate_to_chapter(&mut self, chapter_id: u32) -> bool {
        let corpus = self.content.published_corpus();
        self.session.navigate_to_chapter(&corpus, chapter_id)
    }

    pub fn set_language(&mut self, language: Language) {
        let corpus = self.content.published_corpus();
        self.session.set_language(&corpus, language);
        tracing::debug!(language = %language, index = self.session.index(), "Reading language set");
    }

    pub fn toggle_language(&mut self) -> Language {
        let corpus = self.content.published_corpus();
        self.session.toggle_language(&corpus)
    }

    pub fn update_settings(&mut self, update: SettingsUpdate) -> ReadingSettings {
        self.session.settings_mut().apply(update);
        *self.session.settings()
    }

    /// Bookmark the current chapter, or remove its first bookmark if it has one
    ///
    /// `None` when there is no current chapter.
    pub fn toggle_bookmark(&mut self) -> Result<Option<BookmarkToggle>> {
        let corpus = self.content.published_corpus();
        let Some(chapter) = self.session.current_chapter(&corpus) else {
            return Ok(None);
        };

        let existing = self
            .annotations
            .bookmarks()
            .iter()
            .find(|b| b.chapter_id == chapter.id)
            .map(|b| b.id.clone());

        let toggle = match existing {
            Some(bookmark_id) => {
                self.annotations.remove_bookmark(&bookmark_id)?;
                BookmarkToggle::Removed { bookmark_id }
            }
            None => {
                let bookmark_id =
                    self.annotations
                        .add_bookmark(chapter.id, &chapter.title, Some(0.0), None)?;
                BookmarkToggle::Added { bookmark_id }
            }
        };

        Ok(Some(toggle))
    }

    /// Search the published chapters; the session language is used when none is given
    pub fn search(&self, query: &str, language: Option<Language>) -> Vec<SearchResult> {
        let corpus = self.content.published_corpus();
        let language = language.unwrap_or_else(|| self.session.language());
        self.matcher.search(query, language, &corpus)
    }

    // ========================================================================
    // Annotations
    // ========================================================================

    /// Bookmarks newest first, titled from the live chapter where it still exists
    pub fn bookmark_entries(&self) -> Vec<BookmarkEntry> {
        self.annotations
            .bookmarks_recent_first()
            .into_iter()
            .map(|bookmark| BookmarkEntry {
                display_title: self
                    .content
                    .chapter(bookmark.chapter_id)
                    .map(|record| record.chapter.title.clone())
                    .unwrap_or_else(|| bookmark.chapter_title.clone()),
                bookmark,
            })
            .collect()
    }

    /// Create a bookmark; the title defaults to the chapter's current title
    pub fn add_bookmark(
        &mut self,
        chapter_id: u32,
        chapter_title: Option<String>,
        position: Option<f64>,
        note: Option<String>,
    ) -> Result<Bookmark> {
        let title = match chapter_title {
            Some(title) => title,
            None => self
                .content
                .chapter(chapter_id)
                .map(|record| record.chapter.title.clone())
                .ok_or_else(|| AppError::NotFound(format!("Chapter not found: {}", chapter_id)))?,
        };

        let id = self
            .annotations
            .add_bookmark(chapter_id, &title, position, note)?;
        self.stored_bookmark(&id)
    }

    pub fn update_bookmark(&mut self, id: &str, update: BookmarkUpdate) -> Result<Option<Bookmark>> {
        self.annotations.update_bookmark(id, update)
    }

    pub fn remove_bookmark(&mut self, id: &str) -> Result<bool> {
        self.annotations.remove_bookmark(id)
    }

    pub fn add_note(&mut self, chapter_id: u32, content: &str, position: Option<f64>) -> Result<Note> {
        let id = self.annotations.add_note(chapter_id, content, position)?;
        self.annotations
            .note(&id)
            .cloned()
            .ok_or_else(|| AppError::Internal(format!("Note {} missing after insert", id)))
    }

    pub fn update_note(&mut self, id: &str, content: &str) -> Result<Option<Note>> {
        self.annotations.update_note(id, content)
    }

    pub fn delete_note(&mut self, id: &str) -> Result<bool> {
        self.annotations.delete_note(id)
    }

    fn stored_bookmark(&self, id: &str) -> Result<Bookmark> {
        self.annotations
            .bookmark(id)
            .cloned()
            .ok_or_else(|| AppError::Internal(format!("Bookmark {} missing after insert", id)))
    }

    // ========================================================================
    // Content management
    // ========================================================================

    pub fn add_chapter(&mut self, draft: ChapterDraft) -> Result<ChapterRecord> {
        let record = self.content.add_chapter(draft)?;
        self.reclamp();
        Ok(record)
    }

    pub fn update_chapter(&mut self, id: u32, draft: ChapterDraft) -> Result<Option<ChapterRecord>> {
        let record = self.content.update_chapter(id, draft)?;
        self.reclamp();
        Ok(record)
    }

    pub fn delete_chapter(&mut self, id: u32) -> Result<bool> {
        let deleted = self.content.delete_chapter(id)?;
        self.reclamp();
        Ok(deleted)
    }

    pub fn attach_images(&mut self, id: u32, urls: Vec<String>) -> Result<Option<ChapterRecord>> {
        self.content.attach_images(id, urls)
    }

    pub fn remove_image(&mut self, id: u32, url: &str) -> Result<Option<ChapterRecord>> {
        self.content.remove_image(id, url)
    }

    pub fn overview(&self) -> ContentOverview {
        self.content.overview()
    }

    pub fn approved_testimonials(&self) -> Vec<Testimonial> {
        self.content.approved_testimonials()
    }

    pub fn testimonial_summary(&self) -> TestimonialSummary {
        self.content.testimonial_summary()
    }

    pub fn submit_testimonial(&mut self, submission: TestimonialSubmission) -> Result<Testimonial> {
        self.content.submit_testimonial(submission)
    }

    pub fn moderate_testimonial(&mut self, id: u32, decision: Moderation) -> Result<Option<Testimonial>> {
        self.content.moderate_testimonial(id, decision)
    }

    pub fn mark_helpful(&mut self, id: u32) -> Result<Option<Testimonial>> {
        self.content.mark_helpful(id)
    }

    fn reclamp(&mut self) {
        let corpus = self.content.published_corpus();
        self.session.clamp(&corpus);
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Flush every slot and release the stores
    ///
    /// Both stores are closed even if the first one fails; the first error is returned.
    pub fn close(self) -> std::result::Result<(), StorageError> {
        let annotations = self.annotations.close();
        let content = self.content.close();
        tracing::info!("Library closed");
        annotations.and(content)
    }
}
