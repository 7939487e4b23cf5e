//! Recommendation Pipeline
//!
//! Pure, synchronous entry point over the five decision stages. Holds only
//! configuration, so one instance can serve concurrent requests.
//!
//! raw scores -> EmotionScorer -> { complexity, SongMatcher }
//! attribution tokens + primary -> AttributionAggregator
//! all of the above -> composer

use crate::error::Result;
use crate::models::{AnalysisResult, AttributionToken, RecommendationResult, Song};
use crate::services::attribution::{confidence_percent, AttributionAggregator, DEFAULT_TOP_K};
use crate::services::complexity::emotional_complexity;
use crate::services::composer::{compose_analysis, compose_recommendation};
use crate::services::matcher::{SongMatcher, DEFAULT_RELEVANCE_THRESHOLD};
use crate::services::scorer::{EmotionScorer, ScoredEmotions, DEFAULT_DETECTION_THRESHOLD};

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PipelineConfig {
    pub detection_threshold: f64,
    pub relevance_threshold: f64,
    pub top_k: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            detection_threshold: DEFAULT_DETECTION_THRESHOLD,
            relevance_threshold: DEFAULT_RELEVANCE_THRESHOLD,
            top_k: DEFAULT_TOP_K,
        }
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct Pipeline {
    config: PipelineConfig,
}

impl Pipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    /// Score raw classifier output. `threshold` overrides the configured
    /// detection threshold for this call only.
    pub fn score(&self, raw: &[f64], threshold: Option<f64>) -> Result<ScoredEmotions> {
        EmotionScorer::new(threshold.unwrap_or(self.config.detection_threshold)).score_raw(raw)
    }

    pub fn analyze(&self, scored: ScoredEmotions, tokens: &[AttributionToken]) -> AnalysisResult {
        let complexity = emotional_complexity(&scored.emotions);
        let attribution = AttributionAggregator::new(self.config.top_k).aggregate(
            tokens,
            scored.primary,
            confidence_percent(scored.primary_confidence),
        );
        compose_analysis(scored, complexity, attribution)
    }

    pub fn recommend(&self, analysis: AnalysisResult, songs: &[Song]) -> Result<RecommendationResult> {
        let matched = SongMatcher::new(self.config.relevance_threshold).best_match(&analysis.emotions, songs)?;
        Ok(compose_recommendation(analysis, matched))
    }

    /// Whole pipeline in one call, for callers that already hold the
    /// attribution tokens.
    #[cfg(test)]
    pub fn run(
        &self,
        raw: &[f64],
        tokens: &[AttributionToken],
        songs: &[Song],
    ) -> Result<RecommendationResult> {
        let scored = self.score(raw, None)?;
        let analysis = self.analyze(scored, tokens);
        self.recommend(analysis, songs)
    }
}
