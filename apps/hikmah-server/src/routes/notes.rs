//! Note API endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    routing::{get, put},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::ChapterFilter;
use crate::annotations::Note;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the notes router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_notes).post(create_note))
        .route("/:id", put(update_note).delete(delete_note))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateNoteRequest {
    pub chapter_id: u32,
    pub content: String,
    pub position: Option<f64>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateNoteRequest {
    pub content: String,
}

#[derive(Debug, Serialize)]
pub struct NotesResponse {
    pub notes: Vec<Note>,
    pub total: usize,
}

/// List notes newest first
async fn list_notes(
    State(state): State<AppState>,
    Query(filter): Query<ChapterFilter>,
) -> Result<Json<NotesResponse>> {
    let notes = state
        .library()
        .call(move |library| {
            let mut notes = library.annotations().notes_recent_first();
            if let Some(chapter_id) = filter.chapter_id {
                notes.retain(|n| n.chapter_id == chapter_id);
            }
            notes
        })
        .await?;

    Ok(Json(NotesResponse {
        total: notes.len(),
        notes,
    }))
}

/// Create a note
async fn create_note(
    State(state): State<AppState>,
    Json(req): Json<CreateNoteRequest>,
) -> Result<(StatusCode, Json<Note>)> {
    let note = state
        .library()
        .call(move |library| library.add_note(req.chapter_id, &req.content, req.position))
        .await??;

    Ok((StatusCode::CREATED, Json(note)))
}

/// Replace a note's content
async fn update_note(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<UpdateNoteRequest>,
) -> Result<Json<Note>> {
    let lookup = id.clone();
    let note = state
        .library()
        .call(move |library| library.update_note(&lookup, &req.content))
        .await??
        .ok_or_else(|| AppError::NotFound(format!("Note not found: {}", id)))?;

    Ok(Json(note))
}

/// Delete a note
async fn delete_note(State(state): State<AppState>, Path(id): Path<String>) -> Result<StatusCode> {
    let lookup = id.clone();
    let deleted = state
        .library()
        .call(move |library| library.delete_note(&lookup))
        .await??;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(AppError::NotFound(format!("Note not found: {}", id)))
    }
}
