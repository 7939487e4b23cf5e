use crate::models::{AnalysisResult, Emotion, Recommendation, RecommendationResult};
use crate::services::attribution::AttributionSummary;
use crate::services::matcher::SongMatch;
use crate::services::scorer::ScoredEmotions;

/// Fold the scorer, complexity and attribution outputs into one analysis.
pub fn compose_analysis(
    scored: ScoredEmotions,
    emotional_complexity: f64,
    attribution: AttributionSummary,
) -> AnalysisResult {
    AnalysisResult {
        emotions: scored.emotions,
        primary_emotion: scored.primary,
        primary_confidence: scored.primary_confidence,
        secondary_emotions: scored.secondary,
        detected_emotions: scored.detected,
        confidence_level: scored.confidence_level,
        emotional_complexity,
        explanation: attribution.explanation,
        top_words: attribution.top_words,
        word_importance: attribution.word_importance,
    }
}

pub fn compose_recommendation(analysis: AnalysisResult, matched: SongMatch<'_>) -> RecommendationResult {
    let why_this_song = matched
        .matched_emotions
        .iter()
        .map(|&emotion| song_reason(emotion))
        .collect();

    let recommendation = Recommendation {
        song: matched.song.clone(),
        match_score: matched.score,
        explanation: analysis.explanation.clone(),
        matched_emotions: matched.matched_emotions,
        why_this_song,
    };

    RecommendationResult {
        analysis,
        recommendation,
    }
}

pub fn song_reason(emotion: Emotion) -> String {
    format!("{} energy matches the song's mood.", emotion)
}
