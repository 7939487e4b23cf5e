use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::models::{ByEmotionQuery, CatalogStats, Emotion, Song, SongList, SongListQuery, SongsByEmotion};
use axum::{
    extract::{Path, Query, State},
    routing::get,
    Json, Router,
};
use std::sync::Arc;

const DEFAULT_PER_PAGE: usize = 20;
const MAX_PER_PAGE: usize = 100;
const DEFAULT_BY_EMOTION_LIMIT: usize = 10;
const MAX_BY_EMOTION_LIMIT: usize = 50;

pub fn song_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/songs", get(list_songs))
        .route("/songs/stats", get(song_stats))  // Must be before :id route
        .route("/songs/random", get(random_song))
        .route("/songs/by-emotion/:emotion", get(songs_by_emotion))
        .route("/songs/:id", get(get_song))
}

async fn list_songs(
    State(state): State<Arc<AppState>>,
    Query(query): Query<SongListQuery>,
) -> Result<Json<SongList>> {
    let page = query.page.unwrap_or(1);
    let per_page = query.per_page.unwrap_or(DEFAULT_PER_PAGE);

    if page == 0 {
        return Err(AppError::Validation("page starts at 1".to_string()));
    }
    if !(1..=MAX_PER_PAGE).contains(&per_page) {
        return Err(AppError::Validation(format!(
            "per_page must be between 1 and {}",
            MAX_PER_PAGE
        )));
    }

    let emotion = query.emotion.as_deref().map(str::parse::<Emotion>).transpose()?;

    Ok(Json(state.catalog.page(page, per_page, emotion)))
}

async fn song_stats(State(state): State<Arc<AppState>>) -> Json<CatalogStats> {
    Json(state.catalog.stats())
}

async fn songs_by_emotion(
    State(state): State<Arc<AppState>>,
    Path(emotion): Path<String>,
    Query(query): Query<ByEmotionQuery>,
) -> Result<Json<SongsByEmotion>> {
    let emotion: Emotion = emotion.parse()?;
    let limit = query.limit.unwrap_or(DEFAULT_BY_EMOTION_LIMIT);
    if !(1..=MAX_BY_EMOTION_LIMIT).contains(&limit) {
        return Err(AppError::Validation(format!(
            "limit must be between 1 and {}",
            MAX_BY_EMOTION_LIMIT
        )));
    }

    Ok(Json(state.catalog.by_emotion(emotion, limit)))
}

async fn random_song(State(state): State<Arc<AppState>>) -> Result<Json<Song>> {
    state
        .catalog
        .random()
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound("No songs in catalog".to_string()))
}

async fn get_song(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
) -> Result<Json<Song>> {
    state
        .catalog
        .get(&id)
        .cloned()
        .map(Json)
        .ok_or_else(|| AppError::NotFound(format!("Song not found: {}", id)))
}
