use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::models::{RecommendationRequest, RecommendationResponse};
use axum::{extract::State, routing::post, Json, Router};
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;
use validator::Validate;

pub fn recommendation_routes() -> Router<Arc<AppState>> {
    Router::new().route("/recommendations", post(recommend))
}

async fn recommend(
    State(state): State<Arc<AppState>>,
    Json(req): Json<RecommendationRequest>,
) -> Result<Json<RecommendationResponse>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let result = state
        .emotion_service
        .recommend(&req.text, req.include_explanation)
        .await?;

    // Identity and timestamp are attached here; the pipeline itself is clock-free
    Ok(Json(RecommendationResponse {
        id: Uuid::new_v4(),
        output: result.to_output(),
        detected_emotions: result.analysis.detected_emotions,
        song: result.recommendation.song,
        model_version: state.model_version.clone(),
        created_at: Utc::now(),
    }))
}
