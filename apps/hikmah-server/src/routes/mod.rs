//! Route modules for Hikmah Server

pub mod admin;
pub mod bookmarks;
pub mod chapters;
pub mod health;
pub mod notes;
pub mod reader;
pub mod search;
pub mod testimonials;

use axum::{routing::get, Router};
use serde::Deserialize;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::content::Language;
use crate::error::{AppError, Result};
use crate::state::AppState;

/// Build the full application router
pub fn app(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health_check))
        .route("/api/v1/health", get(health::health_check))
        .nest("/api/v1/chapters", chapters::router())
        .nest("/api/v1/search", search::router())
        .nest("/api/v1/bookmarks", bookmarks::router())
        .nest("/api/v1/notes", notes::router())
        .nest("/api/v1/reader", reader::router())
        .nest("/api/v1/testimonials", testimonials::router())
        .nest("/api/v1/admin", admin::router())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// `?chapterId=` filter shared by the annotation listings
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChapterFilter {
    pub chapter_id: Option<u32>,
}

/// Accepts `english`/`urdu` and the `en`/`ur` short forms
pub(crate) fn parse_language(raw: Option<&str>) -> Result<Option<Language>> {
    match raw.map(str::trim).filter(|s| !s.is_empty()) {
        Some(raw) => raw.parse().map(Some).map_err(AppError::BadRequest),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_language() {
        assert_eq!(parse_language(None).unwrap(), None);
        assert_eq!(parse_language(Some(" ")).unwrap(), None);
        assert_eq!(parse_language(Some("ur")).unwrap(), Some(Language::Urdu));
        assert!(matches!(
            parse_language(Some("arabic")),
            Err(AppError::BadRequest(_))
        ));
    }
}
