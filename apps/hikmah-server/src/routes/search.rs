//! Search API routes

use axum::{
    extract::{Query, State},
    routing::get,
    Json, Router,
};
use serde::{Deserialize, Serialize};

use super::parse_language;
use crate::content::Language;
use crate::error::Result;
use crate::search::SearchResult;
use crate::state::AppState;

/// Create the search router
pub fn router() -> Router<AppState> {
    Router::new().route("/", get(search_chapters))
}

/// Query parameters for chapter search
#[derive(Debug, Deserialize)]
pub struct SearchQuery {
    #[serde(default)]
    pub q: String,
    /// Defaults to the reader's current language
    pub language: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub query: String,
    pub language: Language,
    pub count: usize,
    pub results: Vec<SearchResult>,
}

/// GET /api/v1/search?q=healthcare&language=english
async fn search_chapters(
    State(state): State<AppState>,
    Query(query): Query<SearchQuery>,
) -> Result<Json<SearchResponse>> {
    let language = parse_language(query.language.as_deref())?;
    let q = query.q.clone();

    let (language, results) = state
        .library()
        .call(move |library| {
            let language = language.unwrap_or_else(|| library.session().language());
            (language, library.search(&q, Some(language)))
        })
        .await?;

    Ok(Json(SearchResponse {
        query: query.q,
        language,
        count: results.len(),
        results,
    }))
}
