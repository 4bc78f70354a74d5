//! Slot-backed storage for bookmarks and notes
//!
//! Provides CRUD operations over two insertion-ordered collections, each
//! mirrored to its own durable slot and rewritten after every mutation.

use chrono::Utc;

use super::types::{
    normalize_note, recent_first, validate_chapter_id, validate_note_content, validate_position,
    validate_title, Bookmark, BookmarkUpdate, Note,
};
use crate::error::{Result, StorageError};
use crate::storage::{LoadWarning, RecordSlot, SharedSlots};

/// Slot holding the bookmark list
pub const BOOKMARKS_SLOT: &str = "islamic-book-bookmarks";

/// Slot holding the note list
pub const NOTES_SLOT: &str = "islamic-book-notes";

/// Source of "now" in milliseconds since the Unix epoch
pub type Clock = fn() -> i64;

fn system_millis() -> i64 {
    Utc::now().timestamp_millis()
}

/// Exclusive owner of the bookmark and note collections
pub struct AnnotationStore {
    slots: SharedSlots,
    bookmarks: RecordSlot<Bookmark>,
    notes: RecordSlot<Note>,
    clock: Clock,
}

impl AnnotationStore {
    /// Load both collections
    ///
    /// Unreadable slots do not fail the open: they are reported as warnings
    /// and the affected collection starts empty.
    pub fn open(slots: SharedSlots) -> std::result::Result<(Self, Vec<LoadWarning>), StorageError> {
        let (bookmarks, bookmark_warning) = RecordSlot::load(slots.as_ref(), BOOKMARKS_SLOT)?;
        let (notes, note_warning) = RecordSlot::load(slots.as_ref(), NOTES_SLOT)?;

        let warnings: Vec<LoadWarning> = bookmark_warning.into_iter().chain(note_warning).collect();

        tracing::info!(
            bookmarks = bookmarks.records().len(),
            notes = notes.records().len(),
            warnings = warnings.len(),
            "Annotation store opened"
        );

        Ok((
            Self {
                slots,
                bookmarks,
                notes,
                clock: system_millis,
            },
            warnings,
        ))
    }

    /// Replace the time source
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    // ========================================================================
    // Bookmarks
    // ========================================================================

    /// Create a bookmark and return its id
    ///
    /// Several bookmarks may point at the same chapter.
    pub fn add_bookmark(
        &mut self,
        chapter_id: u32,
        chapter_title: &str,
        position: Option<f64>,
        note: Option<String>,
    ) -> Result<String> {
        validate_chapter_id(chapter_id)?;
        validate_title(chapter_title)?;
        let position = position.unwrap_or(0.0);
        validate_position(position)?;

        let timestamp = (self.clock)();
        let id = unique_id("bookmark", timestamp, chapter_id, |candidate| {
            self.bookmarks.records().iter().any(|b| b.id == candidate)
        });

        let bookmark = Bookmark {
            id: id.clone(),
            chapter_id,
            chapter_title: chapter_title.to_string(),
            position,
            timestamp,
            note: normalize_note(note),
        };

        self.bookmarks
            .commit(self.slots.as_ref(), |records| records.push(bookmark))?;

        tracing::info!(bookmark_id = %id, chapter_id, "Added bookmark");
        Ok(id)
    }

    /// Delete a bookmark; returns false when the id was unknown
    pub fn remove_bookmark(&mut self, id: &str) -> Result<bool> {
        if !self.bookmarks.records().iter().any(|b| b.id == id) {
            tracing::debug!(bookmark_id = %id, "Bookmark not found, nothing removed");
            return Ok(false);
        }

        self.bookmarks
            .commit(self.slots.as_ref(), |records| records.retain(|b| b.id != id))?;

        tracing::info!(bookmark_id = %id, "Removed bookmark");
        Ok(true)
    }

    /// Merge the given fields into a bookmark; `None` when the id was unknown
    pub fn update_bookmark(&mut self, id: &str, update: BookmarkUpdate) -> Result<Option<Bookmark>> {
        update.validate()?;

        let Some(index) = self.bookmarks.records().iter().position(|b| b.id == id) else {
            return Ok(None);
        };

        let updated = self.bookmarks.commit(self.slots.as_ref(), |records| {
            update.apply(&mut records[index]);
            records[index].clone()
        })?;

        tracing::debug!(bookmark_id = %id, "Updated bookmark");
        Ok(Some(updated))
    }

    /// All bookmarks in insertion order
    pub fn bookmarks(&self) -> &[Bookmark] {
        self.bookmarks.records()
    }

    pub fn bookmark(&self, id: &str) -> Option<&Bookmark> {
        self.bookmarks.records().iter().find(|b| b.id == id)
    }

    /// Bookmarks of one chapter, in insertion order
    pub fn bookmarks_by_chapter(&self, chapter_id: u32) -> Vec<Bookmark> {
        self.bookmarks
            .records()
            .iter()
            .filter(|b| b.chapter_id == chapter_id)
            .cloned()
            .collect()
    }

    pub fn is_chapter_bookmarked(&self, chapter_id: u32) -> bool {
        self.bookmarks
            .records()
            .iter()
            .any(|b| b.chapter_id == chapter_id)
    }

    pub fn bookmarks_recent_first(&self) -> Vec<Bookmark> {
        recent_first(self.bookmarks.records().to_vec(), |b| b.timestamp)
    }

    // ========================================================================
    // Notes
    // ========================================================================

    /// Create a note and return its id
    pub fn add_note(&mut self, chapter_id: u32, content: &str, position: Option<f64>) -> Result<String> {
        validate_chapter_id(chapter_id)?;
        validate_note_content(content)?;

        let timestamp = (self.clock)();
        let id = unique_id("note", timestamp, chapter_id, |candidate| {
            self.notes.records().iter().any(|n| n.id == candidate)
        });

        let note = Note {
            id: id.clone(),
            chapter_id,
            content: content.to_string(),
            timestamp,
            position,
        };

        self.notes
            .commit(self.slots.as_ref(), |records| records.push(note))?;

        tracing::info!(note_id = %id, chapter_id, "Added note");
        Ok(id)
    }

    /// Replace a note's content and timestamp; `None` when the id was unknown
    pub fn update_note(&mut self, id: &str, content: &str) -> Result<Option<Note>> {
        validate_note_content(content)?;

        let Some(index) = self.notes.records().iter().position(|n| n.id == id) else {
            return Ok(None);
        };

        let timestamp = (self.clock)();
        let updated = self.notes.commit(self.slots.as_ref(), |records| {
            let note = &mut records[index];
            note.content = content.to_string();
            note.timestamp = timestamp;
            note.clone()
        })?;

        tracing::debug!(note_id = %id, "Updated note");
        Ok(Some(updated))
    }

    /// Delete a note; returns false when the id was unknown
    pub fn delete_note(&mut self, id: &str) -> Result<bool> {
        if !self.notes.records().iter().any(|n| n.id == id) {
            tracing::debug!(note_id = %id, "Note not found, nothing deleted");
            return Ok(false);
        }

        self.notes
            .commit(self.slots.as_ref(), |records| records.retain(|n| n.id != id))?;

        tracing::info!(note_id = %id, "Deleted note");
        Ok(true)
    }

    /// All notes in insertion order
    pub fn notes(&self) -> &[Note] {
        self.notes.records()
    }

    pub fn note(&self, id: &str) -> Option<&Note> {
        self.notes.records().iter().find(|n| n.id == id)
    }

    /// Notes of one chapter, in insertion order
    pub fn notes_by_chapter(&self, chapter_id: u32) -> Vec<Note> {
        self.notes
            .records()
            .iter()
            .filter(|n| n.chapter_id == chapter_id)
            .cloned()
            .collect()
    }

    pub fn notes_recent_first(&self) -> Vec<Note> {
        recent_first(self.notes.records().to_vec(), |n| n.timestamp)
    }

    // ========================================================================
    // Lifecycle
    // ========================================================================

    /// Rewrite both slots from memory
    pub fn flush(&self) -> std::result::Result<(), StorageError> {
        self.bookmarks.flush(self.slots.as_ref())?;
        self.notes.flush(self.slots.as_ref())
    }

    /// Flush and release the store
    pub fn close(self) -> std::result::Result<(), StorageError> {
        self.flush()?;
        tracing::info!("Annotation store closed");
        Ok(())
    }
}

/// `<prefix>-<millis>-<chapterId>`, suffixed with `-<n>` if already taken
fn unique_id(prefix: &str, millis: i64, chapter_id: u32, taken: impl Fn(&str) -> bool) -> String {
    let base = format!("{}-{}-{}", prefix, millis, chapter_id);
    if !taken(&base) {
        return base;
    }

    let mut n = 1;
    loop {
        let candidate = format!("{}-{}", base, n);
        if !taken(&candidate) {
            return candidate;
        }
        n += 1;
    }
}

// ============================================================================
// Tests
// ============================================================================
