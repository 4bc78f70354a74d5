//! Published chapter endpoints

use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::parse_language;
use crate::content::Chapter;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the chapters router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_chapters))
        .route("/:id", get(get_chapter))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ChaptersResponse {
    pub chapters: Vec<Chapter>,
    pub total: usize,
}

/// List published chapters, optionally of one language
async fn list_chapters(
    State(state): State<AppState>,
    Query(params): Query<ListParams>,
) -> Result<Json<ChaptersResponse>> {
    let language = parse_language(params.language.as_deref())?;
    let chapters = state
        .library()
        .call(move |library| library.chapters(language))
        .await?;

    Ok(Json(ChaptersResponse {
        total: chapters.len(),
        chapters,
    }))
}

/// Get a published chapter
async fn get_chapter(State(state): State<AppState>, Path(id): Path<u32>) -> Result<Json<Chapter>> {
    let chapter = state
        .library()
        .call(move |library| library.chapter(id))
        .await?
        .ok_or_else(|| AppError::NotFound(format!("Chapter not found: {}", id)))?;
    Ok(Json(chapter))
}
