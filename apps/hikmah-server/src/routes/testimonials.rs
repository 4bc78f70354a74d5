//! Public testimonial endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::Serialize;

use crate::content::{Testimonial, TestimonialSubmission, TestimonialSummary};
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Create the testimonials router
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_testimonials).post(submit_testimonial))
        .route("/:id/helpful", post(mark_helpful))
}

#[derive(Debug, Serialize)]
pub struct TestimonialsResponse {
    pub testimonials: Vec<Testimonial>,
    pub summary: TestimonialSummary,
}

/// Approved testimonials with their statistics
async fn list_testimonials(State(state): State<AppState>) -> Result<Json<TestimonialsResponse>> {
    let (testimonials, summary) = state
        .library()
        .call(|library| (library.approved_testimonials(), library.testimonial_summary()))
        .await?;

    Ok(Json(TestimonialsResponse {
        testimonials,
        summary,
    }))
}

/// Submit a testimonial for moderation
async fn submit_testimonial(
    State(state): State<AppState>,
    Json(submission): Json<TestimonialSubmission>,
) -> Result<(StatusCode, Json<Testimonial>)> {
    let testimonial = state
        .library()
        .call(move |library| library.submit_testimonial(submission))
        .await??;

    Ok((StatusCode::CREATED, Json(testimonial)))
}

async fn mark_helpful(State(state): State<AppState>, Path(id): Path<u32>) -> Result<Json<Testimonial>> {
    let testimonial = state
        .library()
        .call(move |library| library.mark_helpful(id))
        .await??
        .ok_or_else(|| AppError::NotFound(format!("Testimonial not found: {}", id)))?;

    Ok(Json(testimonial))
}
