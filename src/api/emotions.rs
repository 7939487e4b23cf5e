use crate::api::AppState;
use crate::error::{AppError, Result};
use crate::models::{
    AnalysisResponse, AnalyzeRequest, BatchAnalysisResponse, BatchAnalyzeRequest, Emotion,
    SupportedEmotions,
};
use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;
use std::time::Instant;
use validator::Validate;

const MAX_TEXT_LEN: usize = 5000;

pub fn emotion_routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/emotions/analyze", post(analyze))
        .route("/emotions/analyze/batch", post(analyze_batch))
        .route("/emotions/supported", get(supported_emotions))
}

async fn analyze(
    State(state): State<Arc<AppState>>,
    Json(req): Json<AnalyzeRequest>,
) -> Result<Json<AnalysisResponse>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    let started = Instant::now();
    let analysis = state
        .emotion_service
        .analyze(&req.text, req.threshold, req.include_explanation)
        .await?;

    Ok(Json(AnalysisResponse {
        analysis,
        model_version: state.model_version.clone(),
        processing_time_ms: started.elapsed().as_millis() as u64,
    }))
}

async fn analyze_batch(
    State(state): State<Arc<AppState>>,
    Json(req): Json<BatchAnalyzeRequest>,
) -> Result<Json<BatchAnalysisResponse>> {
    req.validate()
        .map_err(|e| AppError::Validation(e.to_string()))?;

    if let Some(bad) = req
        .texts
        .iter()
        .position(|t| t.is_empty() || t.chars().count() > MAX_TEXT_LEN)
    {
        return Err(AppError::Validation(format!(
            "texts[{}] must be between 1 and {} characters",
            bad, MAX_TEXT_LEN
        )));
    }

    let started = Instant::now();
    let results = state
        .emotion_service
        .analyze_batch(&req.texts, req.threshold)
        .await?;

    tracing::info!("Analyzed batch of {} texts", results.len());

    Ok(Json(BatchAnalysisResponse {
        results,
        total_processing_time_ms: started.elapsed().as_millis() as u64,
    }))
}

async fn supported_emotions() -> Json<SupportedEmotions> {
    Json(SupportedEmotions {
        emotions: Emotion::ALL.to_vec(),
        total: Emotion::ALL.len(),
    })
}
