//! Bookmark API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, patch},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::ChapterFilter;
use crate::annotations::{Bookmark, BookmarkUpdate};
use crate::error::{AppError, Result};
use crate::library::BookmarkEntry;
use crate::state::AppState;

/// Create the bookmarks router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_bookmarks).post(create_bookmark))
        .route("/:id", patch(update_bookmark).delete(delete_bookmark))
        .route("/chapter/:chapter_id/status", get(chapter_status))
}

/// Request body for creating a bookmark
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateBookmarkRequest {
    pub chapter_id: u32,
    /// Defaults to the chapter's current title
    pub chapter_title: Option<String>,
    pub position: Option<f64>,
    pub note: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct BookmarksResponse {
    pub bookmarks: Vec<BookmarkEntry>,
    pub total: usize,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterBookmarkStatus {
    pub chapter_id: u32,
    pub bookmarked: bool,
    pub count: usize,
}

/// List bookmarks newest first
async fn list_bookmarks(
    State(state): State<AppState>,
    Query(filter): Query<ChapterFilter>,
) -> Result<Json<BookmarksResponse>> {
    let bookmarks = state
        .library()
        .call(move |library| {
            let mut entries = library.bookmark_entries();
            if let Some(chapter_id) = filter.chapter_id {
                entries.retain(|e| e.bookmark.chapter_id == chapter_id);
            }
            entries
        })
        .await?;

    Ok(Json(BookmarksResponse {
        total: bookmarks.len(),
        bookmarks,
    }))
}

/// Create a bookmark
async fn create_bookmark(
    State(state): State<AppState>,
    Json(req): Json<CreateBookmarkRequest>,
) -> Result<(StatusCode, Json<Bookmark>)> {
    let bookmark = state
        .library()
        .call(move |library| {
            library.add_bookmark(req.chapter_id, req.chapter_title, req.position, req.note)
        })
        .await??;

    Ok((StatusCode::CREATED, Json(bookmark)))
}

/// Merge fields into a bookmark
async fn update_bookmark(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(update): Json<BookmarkUpdate>,
) -> Result<Json<Bookmark>> {
    let lookup = id.clone();
    let bookmark = state
        .library()
        .call(move |library| library.update_bookmark(&lookup, update))
        .await??
        .ok_or_else(|| AppError::NotFound(format!("Bookmark not found: {}", id)))?;

    Ok(Json(bookmark))
}

/// Delete a bookmark
async fn delete_bookmark(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    let lookup = id.clone();
    let removed = state
        .library()
        .call(move |library| library.remove_bookmark(&lookup))
        .await??;

    if removed {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Bookmark not found: {}", id)))
    }
}

/// Whether a chapter has any bookmark
async fn chapter_status(
    State(state): State<AppState>,
    Path(chapter_id): Path<u32>,
) -> Result<Json<ChapterBookmarkStatus>> {
    let count = state
        .library()
        .call(move |library| library.annotations().bookmarks_by_chapter(chapter_id).len())
        .await?;

    Ok(Json(ChapterBookmarkStatus {
        chapter_id,
        bookmarked: count > 0,
        count,
    }))
}
