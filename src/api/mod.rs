pub mod emotions;
pub mod recommendations;
pub mod songs;

pub use emotions::emotion_routes;
pub use recommendations::recommendation_routes;
pub use songs::song_routes;

use crate::services::{EmotionService, SongCatalog};
use axum::{extract::State, routing::get, Json, Router};
use serde::Serialize;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

pub struct AppState {
    pub emotion_service: Arc<EmotionService>,
    pub catalog: Arc<SongCatalog>,
    pub model_version: String,
}

#[derive(Debug, Serialize)]
struct Health {
    status: &'static str,
    catalog_size: usize,
    model_version: String,
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Health> {
    Json(Health {
        status: "healthy",
        catalog_size: state.catalog.len(),
        model_version: state.model_version.clone(),
    })
}

/// Every API route under `/api/v1`, with request tracing
pub fn router(state: Arc<AppState>) -> Router {
    Router::new()
        .nest(
            "/api/v1",
            Router::new()
                .route("/health", get(health))
                .merge(emotion_routes())
                .merge(recommendation_routes())
                .merge(song_routes())
                .with_state(state),
        )
        .layer(TraceLayer::new_for_http())
}
