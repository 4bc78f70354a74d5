//! Bookmark and note records
//!
//! Field names follow the reader's storage layout (`chapterId`,
//! `chapterTitle`, millisecond `timestamp`), so slots exported from the
//! browser edition load unchanged.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// A saved reading position on a chapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bookmark {
    /// `bookmark-<millis>-<chapterId>`
    pub id: String,
    pub chapter_id: u32,
    /// Title captured when the bookmark was made; not kept in sync with edits
    pub chapter_title: String,
    /// Percentage of the chapter read (0-100)
    #[serde(default)]
    pub position: f64,
    /// Creation instant, milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,
}

/// A free-text annotation tied to a chapter
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    /// `note-<millis>-<chapterId>`
    pub id: String,
    pub chapter_id: u32,
    pub content: String,
    /// Last-write instant, milliseconds since the Unix epoch
    pub timestamp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<f64>,
}

/// Fields that may change on an existing bookmark
///
/// Absent fields are left as they are. The timestamp is never touched.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkUpdate {
    pub chapter_title: Option<String>,
    pub position: Option<f64>,
    /// A blank note clears the existing one
    pub note: Option<String>,
}

impl BookmarkUpdate {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if let Some(title) = &self.chapter_title {
            validate_title(title)?;
        }
        if let Some(position) = self.position {
            validate_position(position)?;
        }
        Ok(())
    }

    pub(crate) fn apply(self, bookmark: &mut Bookmark) {
        if let Some(title) = self.chapter_title {
            bookmark.chapter_title = title;
        }
        if let Some(position) = self.position {
            bookmark.position = position;
        }
        if let Some(note) = self.note {
            bookmark.note = normalize_note(Some(note));
        }
    }
}

pub(crate) fn validate_chapter_id(chapter_id: u32) -> Result<(), ValidationError> {
    if chapter_id == 0 {
        return Err(ValidationError::InvalidChapterId);
    }
    Ok(())
}

pub(crate) fn validate_title(title: &str) -> Result<(), ValidationError> {
    if title.trim().is_empty() {
        return Err(ValidationError::EmptyChapterTitle);
    }
    Ok(())
}

pub(crate) fn validate_position(position: f64) -> Result<(), ValidationError> {
    if !(0.0..=100.0).contains(&position) {
        return Err(ValidationError::PositionOutOfRange(position));
    }
    Ok(())
}

pub(crate) fn validate_note_content(content: &str) -> Result<(), ValidationError> {
    if content.trim().is_empty() {
        return Err(ValidationError::EmptyNoteContent);
    }
    Ok(())
}

pub(crate) fn normalize_note(note: Option<String>) -> Option<String> {
    note.filter(|n| !n.trim().is_empty())
}

/// Sort newest first, the order every display of annotations uses
pub(crate) fn recent_first<T, F>(mut records: Vec<T>, timestamp: F) -> Vec<T>
where
    F: Fn(&T) -> i64,
{
    records.sort_by(|a, b| timestamp(b).cmp(&timestamp(a)));
    records
}
