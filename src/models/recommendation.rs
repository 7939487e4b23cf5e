use crate::models::emotion::{AnalysisResult, ConfidenceLevel, Emotion};
use crate::models::song::Song;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Recommendation {
    pub song: Song,
    pub match_score: f64,
    pub matched_emotions: Vec<Emotion>,
    pub explanation: String,
    /// One reason per matched emotion, same order
    pub why_this_song: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationResult {
    pub analysis: AnalysisResult,
    pub recommendation: Recommendation,
}

/// Flat record combining analysis and recommendation fields.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecommendationOutput {
    pub primary_emotion: Emotion,
    pub primary_confidence: f64,
    pub secondary_emotions: Vec<Emotion>,
    pub confidence_level: ConfidenceLevel,
    pub emotional_complexity: f64,
    pub explanation: String,
    pub word_importance: BTreeMap<String, f64>,
    pub song_id: String,
    pub match_score: f64,
    pub matched_emotions: Vec<Emotion>,
    pub why_this_song: Vec<String>,
}

impl RecommendationResult {
    pub fn to_output(&self) -> RecommendationOutput {
        let analysis = &self.analysis;
        let recommendation = &self.recommendation;
        RecommendationOutput {
            primary_emotion: analysis.primary_emotion,
            primary_confidence: analysis.primary_confidence,
            secondary_emotions: analysis.secondary_emotions.clone(),
            confidence_level: analysis.confidence_level,
            emotional_complexity: analysis.emotional_complexity,
            explanation: recommendation.explanation.clone(),
            word_importance: analysis.word_importance.clone(),
            song_id: recommendation.song.id.clone(),
            match_score: recommendation.match_score,
            matched_emotions: recommendation.matched_emotions.clone(),
            why_this_song: recommendation.why_this_song.clone(),
        }
    }
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Deserialize, Validate)]
pub struct AnalyzeRequest {
    #[validate(length(min = 1, max = 5000))]
    pub text: String,
    #[serde(default = "default_true")]
    pub include_explanation: bool,
    #[validate(range(min = 0.0, max = 1.0))]
    pub threshold: Option<f64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct BatchAnalyzeRequest {
    #[validate(length(min = 1, max = 10))]
    pub texts: Vec<String>,
    #[validate(range(min = 0.0, max = 1.0))]
    pub threshold: Option<f64>,
}

#[derive(Debug, Deserialize, Validate)]
pub struct RecommendationRequest {
    #[validate(length(min = 1, max = 5000))]
    pub text: String,
    #[serde(default = "default_true")]
    pub include_explanation: bool,
}

#[derive(Debug, Serialize)]
pub struct AnalysisResponse {
    #[serde(flatten)]
    pub analysis: AnalysisResult,
    pub model_version: String,
    pub processing_time_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct BatchAnalysisResponse {
    pub results: Vec<AnalysisResult>,
    pub total_processing_time_ms: u64,
}

#[derive(Debug, Serialize)]
pub struct RecommendationResponse {
    pub id: Uuid,
    #[serde(flatten)]
    pub output: RecommendationOutput,
    pub song: Song,
    pub detected_emotions: Vec<Emotion>,
    pub model_version: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct SupportedEmotions {
    pub emotions: Vec<Emotion>,
    pub total: usize,
}
