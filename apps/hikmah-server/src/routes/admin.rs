//! Admin portal endpoints
//!
//! Chapter management, image uploads and testimonial moderation.

use axum::{
    extract::{DefaultBodyLimit, Multipart, Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine};
use serde::Deserialize;

use crate::content::{ChapterDraft, ChapterRecord, ContentOverview, Moderation, Testimonial};
use crate::error::{AppError, Result, ValidationError};
use crate::state::AppState;

/// Upper bound on one image upload request
const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

/// Create the admin router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/overview", get(overview))
        .route("/chapters", get(list_chapters).post(create_chapter))
        .route(
            "/chapters/:id",
            get(get_chapter).put(update_chapter).delete(delete_chapter),
        )
        .route(
            "/chapters/:id/images",
            post(upload_images)
                .delete(remove_image)
                .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES)),
        )
        .route("/testimonials", get(list_testimonials))
        .route("/testimonials/:id/approve", post(approve_testimonial))
        .route("/testimonials/:id/reject", post(reject_testimonial))
}

#[derive(Debug, Deserialize)]
pub struct RemoveImageRequest {
    pub url: String,
}

async fn overview(State(state): State<AppState>) -> Result<Json<ContentOverview>> {
    let overview = state.library().call(|library| library.overview()).await?;
    Ok(Json(overview))
}

// ============================================================================
// Chapters
// ============================================================================

/// All chapters, drafts included
async fn list_chapters(State(state): State<AppState>) -> Result<Json<Vec<ChapterRecord>>> {
    let chapters = state
        .library()
        .call(|library| library.content().chapters().to_vec())
        .await?;
    Ok(Json(chapters))
}

async fn get_chapter(State(state): State<AppState>, Path(id): Path<u32>) -> Result<Json<ChapterRecord>> {
    let chapter = state
        .library()
        .call(move |library| library.content().chapter(id).cloned())
        .await?
        .ok_or_else(|| chapter_not_found(id))?;
    Ok(Json(chapter))
}

async fn create_chapter(
    State(state): State<AppState>,
    Json(draft): Json<ChapterDraft>,
) -> Result<(StatusCode, Json<ChapterRecord>)> {
    let chapter = state
        .library()
        .call(move |library| library.add_chapter(draft))
        .await??;
    Ok((StatusCode::CREATED, Json(chapter)))
}

async fn update_chapter(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(draft): Json<ChapterDraft>,
) -> Result<Json<ChapterRecord>> {
    let chapter = state
        .library()
        .call(move |library| library.update_chapter(id, draft))
        .await??
        .ok_or_else(|| chapter_not_found(id))?;
    Ok(Json(chapter))
}

async fn delete_chapter(State(state): State<AppState>, Path(id): Path<u32>) -> Result<StatusCode> {
    let deleted = state
        .library()
        .call(move |library| library.delete_chapter(id))
        .await??;

    if deleted {
        Ok(StatusCode::NO_CONTENT)
    } else {
        Err(chapter_not_found(id))
    }
}

/// Attach uploaded images to a chapter as data URLs
async fn upload_images(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    mut multipart: Multipart,
) -> Result<Json<ChapterRecord>> {
    let mut urls = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        tracing::error!("Failed to read multipart field: {}", e);
        AppError::BadRequest(format!("Failed to read upload: {}", e))
    })? {
        let filename = field.file_name().map(|s| s.to_string());
        let mime = field
            .content_type()
            .map(|s| s.to_string())
            .filter(|m| m != "application/octet-stream")
            .or_else(|| {
                filename
                    .as_deref()
                    .and_then(|f| mime_guess::from_path(f).first())
                    .map(|m| m.essence_str().to_string())
            })
            .unwrap_or_default();

        tracing::debug!(
            "Received field: name={:?}, filename={:?}, content_type={}",
            field.name(),
            filename,
            mime
        );

        if !mime.starts_with("image/") {
            return Err(ValidationError::UnsupportedImage(if mime.is_empty() {
                "unknown".to_string()
            } else {
                mime
            })
            .into());
        }

        let data = field.bytes().await.map_err(|e| {
            tracing::error!("Failed to read file data: {}", e);
            AppError::BadRequest(format!("Failed to read file data: {}", e))
        })?;

        urls.push(format!("data:{};base64,{}", mime, BASE64.encode(&data)));
    }

    if urls.is_empty() {
        return Err(AppError::BadRequest("No image files in upload".to_string()));
    }

    let count = urls.len();
    let chapter = state
        .library()
        .call(move |library| library.attach_images(id, urls))
        .await??
        .ok_or_else(|| chapter_not_found(id))?;

    tracing::info!(chapter_id = id, count, "Images uploaded");
    Ok(Json(chapter))
}

async fn remove_image(
    State(state): State<AppState>,
    Path(id): Path<u32>,
    Json(req): Json<RemoveImageRequest>,
) -> Result<Json<ChapterRecord>> {
    let chapter = state
        .library()
        .call(move |library| library.remove_image(id, &req.url))
        .await??
        .ok_or_else(|| chapter_not_found(id))?;
    Ok(Json(chapter))
}

fn chapter_not_found(id: u32) -> AppError {
    AppError::NotFound(format!("Chapter not found: {}", id))
}

// ============================================================================
// Testimonials
// ============================================================================

/// Every testimonial regardless of status, newest first
async fn list_testimonials(State(state): State<AppState>) -> Result<Json<Vec<Testimonial>>> {
    let testimonials = state
        .library()
        .call(|library| library.content().testimonials().to_vec())
        .await?;
    Ok(Json(testimonials))
}

async fn approve_testimonial(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Testimonial>> {
    moderate(state, id, Moderation::Approve).await
}

async fn reject_testimonial(
    State(state): State<AppState>,
    Path(id): Path<u32>,
) -> Result<Json<Testimonial>> {
    moderate(state, id, Moderation::Reject).await
}

async fn moderate(state: AppState, id: u32, decision: Moderation) -> Result<Json<Testimonial>> {
    let testimonial = state
        .library()
        .call(move |library| library.moderate_testimonial(id, decision))
        .await??
        .ok_or_else(|| AppError::NotFound(format!("Testimonial not found: {}", id)))?;
    Ok(Json(testimonial))
}
