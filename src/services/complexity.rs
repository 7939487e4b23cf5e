use crate::models::{EmotionVector, EMOTION_COUNT};

/// Normalized Shannon entropy of the emotion scores, in [0, 1].
///
/// Scores are renormalized by their sum before measuring entropy, then divided
/// by ln(17). A vector with a single non-zero score gives 0; an all-zero vector
/// has no distribution to measure and is also 0.
pub fn emotional_complexity(emotions: &EmotionVector) -> f64 {
    let total = emotions.sum();
    if total <= 0.0 {
        tracing::debug!("All-zero emotion vector, complexity defined as 0");
        return 0.0;
    }

    let entropy: f64 = emotions
        .scores()
        .iter()
        .map(|score| score / total)
        .filter(|&p| p > 0.0)
        .map(|p| -p * p.ln())
        .sum();

    (entropy / (EMOTION_COUNT as f64).ln()).clamp(0.0, 1.0)
}
