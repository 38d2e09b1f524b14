// HTTP surface: API routes, static assets with SPA fallback, CORS and
// request logging.

use std::path::Path;
use std::sync::Arc;

use axum::extract::{Path as UrlPath, Query, State};
use axum::routing::get;
use axum::{Json, Router};
use puckpool_core::model::{PlayerStats, SearchHit};
use serde::Deserialize;
use serde_json::{json, Value};
use tower_http::cors::CorsLayer;
use tower_http::services::{ServeDir, ServeFile};
use tower_http::trace::TraceLayer;

use crate::error::ApiError;
use crate::proxy;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct SearchParams {
    name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct PlayerParams {
    season: Option<String>,
}

/// Build the application router. Unknown non-API paths are served from
/// `static_dir`, falling back to its `index.html`.
pub fn create_router(state: Arc<AppState>, static_dir: &Path) -> Router {
    let assets = ServeDir::new(static_dir).fallback(ServeFile::new(static_dir.join("index.html")));

    Router::new()
        .route("/health", get(health))
        .route("/api/search", get(search))
        .route("/api/player/:id", get(player))
        .fallback_service(assets)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

async fn health() -> Json<Value> {
    Json(json!({ "ok": true }))
}

async fn search(
    State(state): State<Arc<AppState>>,
    Query(params): Query<SearchParams>,
) -> Result<Json<Vec<SearchHit>>, ApiError> {
    let hits = proxy::search(state.provider.as_ref(), params.name.as_deref()).await?;
    Ok(Json(hits))
}

async fn player(
    State(state): State<Arc<AppState>>,
    UrlPath(id): UrlPath<String>,
    Query(params): Query<PlayerParams>,
) -> Result<Json<PlayerStats>, ApiError> {
    let stats = proxy::player_stats(&state, &id, params.season.as_deref()).await?;
    Ok(Json(stats))
}
