//! Reading session endpoints
//!
//! One session per server process, like a single open book.

use axum::{
    extract::{Path, State},
    routing::{get, post, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::parse_language;
use crate::error::{AppError, Result};
use crate::library::{BookmarkToggle, ReaderView};
use crate::reading::{ReadingSettings, SettingsUpdate};
use crate::state::AppState;

/// Create the reader router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(get_view))
        .route("/next", post(next_chapter))
        .route("/previous", post(previous_chapter))
        .route("/bookmark", post(toggle_bookmark))
        .route("/language", put(set_language))
        .route("/goto/:chapter_id", post(go_to_chapter))
        .route("/settings", put(update_settings))
}

/// Omit `language` to switch to the other language
#[derive(Debug, Default, Deserialize)]
pub struct LanguageRequest {
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ToggleResponse {
    #[serde(flatten)]
    pub toggle: BookmarkToggle,
    pub view: ReaderView,
}

async fn get_view(State(state): State<AppState>) -> Result<Json<ReaderView>> {
    let view = state.library().call(|library| library.reader_view()).await?;
    Ok(Json(view))
}

/// Advance one chapter; stays on the last one
async fn next_chapter(State(state): State<AppState>) -> Result<Json<ReaderView>> {
    let view = state
        .library()
        .call(|library| {
            library.next_chapter();
            library.reader_view()
        })
        .await?;
    Ok(Json(view))
}

/// Go back one chapter; stays on the first one
async fn previous_chapter(State(state): State<AppState>) -> Result<Json<ReaderView>> {
    let view = state
        .library()
        .call(|library| {
            library.previous_chapter();
            library.reader_view()
        })
        .await?;
    Ok(Json(view))
}

/// Bookmark the current chapter or remove its first bookmark
async fn toggle_bookmark(State(state): State<AppState>) -> Result<Json<ToggleResponse>> {
    let (toggle, view) = state
        .library()
        .call(|library| {
            let toggle = library.toggle_bookmark()?;
            Ok::<_, AppError>((toggle, library.reader_view()))
        })
        .await??;

    let toggle =
        toggle.ok_or_else(|| AppError::NotFound("No chapter open to bookmark".to_string()))?;
    Ok(Json(ToggleResponse { toggle, view }))
}

async fn set_language(
    State(state): State<AppState>,
    Json(req): Json<LanguageRequest>,
) -> Result<Json<ReaderView>> {
    let language = parse_language(req.language.as_deref())?;
    let view = state
        .library()
        .call(move |library| {
            match language {
                Some(language) => library.set_language(language),
                None => {
                    library.toggle_language();
                }
            }
            library.reader_view()
        })
        .await?;
    Ok(Json(view))
}

/// Open a chapter of the current language, e.g. from a search result or bookmark
async fn go_to_chapter(
    State(state): State<AppState>,
    Path(chapter_id): Path<u32>,
) -> Result<Json<ReaderView>> {
    let view = state
        .library()
        .call(move |library| {
            library
                .navigate_to_chapter(chapter_id)
                .then(|| library.reader_view())
        })
        .await?
        .ok_or_else(|| {
            AppError::NotFound(format!(
                "Chapter {} is not available in the current language",
                chapter_id
            ))
        })?;
    Ok(Json(view))
}

async fn update_settings(
    State(state): State<AppState>,
    Json(update): Json<SettingsUpdate>,
) -> Result<Json<ReadingSettings>> {
    let settings = state
        .library()
        .call(move |library| library.update_settings(update))
        .await?;
    Ok(Json(settings))
}
