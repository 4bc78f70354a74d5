//! Read models assembled from several stores

use serde::Serialize;

use crate::annotations::Bookmark;
use crate::content::{Chapter, Language};
use crate::reading::ReadingSettings;

/// Everything the reader screen shows for the current position
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReaderView {
    /// `None` when no chapter is published in the current language
    pub chapter: Option<Chapter>,
    pub chapter_index: usize,
    /// One-based, for "Chapter N of M"
    pub chapter_number: usize,
    pub chapter_count: usize,
    pub progress_percent: u32,
    pub has_previous: bool,
    pub has_next: bool,
    pub language: Language,
    pub is_bookmarked: bool,
    pub note_count: usize,
    pub settings: ReadingSettings,
    pub title_font_size: u32,
}

/// A bookmark with its chapter title resolved at read time
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BookmarkEntry {
    #[serde(flatten)]
    pub bookmark: Bookmark,
    /// Live chapter title, or the captured one when the chapter is gone
    pub display_title: String,
}

/// Outcome of the reader's bookmark button
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum BookmarkToggle {
    Added {
        #[serde(rename = "bookmarkId")]
        bookmark_id: String,
    },
    Removed {
        #[serde(rename = "bookmarkId")]
        bookmark_id: String,
    },
}
