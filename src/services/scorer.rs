//! Emotion Scorer
//!
//! Turns the classifier's 17 independent scores into a ranked profile:
//! one primary emotion, the secondary emotions that clear the detection
//! threshold, and a coarse confidence bucket.

use crate::error::Result;
use crate::models::{ConfidenceLevel, Emotion, EmotionVector};
use serde::Serialize;

pub const DEFAULT_DETECTION_THRESHOLD: f64 = 0.5;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScoredEmotions {
    pub emotions: EmotionVector,
    pub primary: Emotion,
    pub primary_confidence: f64,
    /// Non-primary emotions at or above the threshold, strongest first
    pub secondary: Vec<Emotion>,
    /// Primary followed by secondary
    pub detected: Vec<Emotion>,
    pub confidence_level: ConfidenceLevel,
}

#[derive(Debug, Clone, Copy)]
pub struct EmotionScorer {
    detection_threshold: f64,
}

impl Default for EmotionScorer {
    fn default() -> Self {
        Self::new(DEFAULT_DETECTION_THRESHOLD)
    }
}

impl EmotionScorer {
    pub fn new(detection_threshold: f64) -> Self {
        Self { detection_threshold }
    }

    /// Validate and score raw classifier output
    pub fn score_raw(&self, raw: &[f64]) -> Result<ScoredEmotions> {
        let emotions = EmotionVector::from_scores(raw)?;
        Ok(self.score(&emotions))
    }

    pub fn score(&self, emotions: &EmotionVector) -> ScoredEmotions {
        let (primary, primary_confidence) = emotions.primary();

        let mut ranked: Vec<(Emotion, f64)> = emotions
            .iter()
            .filter(|&(emotion, score)| emotion != primary && score >= self.detection_threshold)
            .collect();
        ranked.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));

        let secondary: Vec<Emotion> = ranked.into_iter().map(|(emotion, _)| emotion).collect();

        let mut detected = Vec::with_capacity(secondary.len() + 1);
        detected.push(primary);
        detected.extend(secondary.iter().copied());

        ScoredEmotions {
            emotions: *emotions,
            primary,
            primary_confidence,
            secondary,
            detected,
            confidence_level: ConfidenceLevel::from_confidence(primary_confidence),
        }
    }
}
