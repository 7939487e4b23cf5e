//! Song Matcher
//!
//! Scores every catalog song against the user's emotion vector with a cosine
//! similarity restricted to the user's active emotions, then picks a single
//! winner with a total, reproducible tie-break:
//! 1. Highest score (scores within `TIE_EPSILON` of the best count as equal)
//! 2. Highest play count
//! 3. Lowest catalog id

use crate::error::{AppError, Result};
use crate::models::{Emotion, EmotionVector, Song};
use tracing::debug;

pub const DEFAULT_RELEVANCE_THRESHOLD: f64 = 0.3;
pub const TIE_EPSILON: f64 = 1e-6;

#[derive(Debug, Clone, PartialEq)]
pub struct SongMatch<'a> {
    pub song: &'a Song,
    pub score: f64,
    /// Active emotions the song also carries, strongest shared emotion first
    pub matched_emotions: Vec<Emotion>,
}

#[derive(Debug, Clone, Copy)]
pub struct SongMatcher {
    relevance_threshold: f64,
}

impl Default for SongMatcher {
    fn default() -> Self {
        Self::new(DEFAULT_RELEVANCE_THRESHOLD)
    }
}

impl SongMatcher {
    pub fn new(relevance_threshold: f64) -> Self {
        Self { relevance_threshold }
    }

    /// Emotions at or above the relevance threshold, in canonical order.
    /// Falls back to the primary emotion alone when nothing qualifies.
    pub fn relevant_emotions(&self, user: &EmotionVector) -> Vec<Emotion> {
        let relevant: Vec<Emotion> = user
            .iter()
            .filter(|(_, score)| *score >= self.relevance_threshold)
            .map(|(emotion, _)| emotion)
            .collect();

        if relevant.is_empty() {
            let (primary, _) = user.primary();
            debug!("No emotion above relevance threshold, matching on {} only", primary);
            return vec![primary];
        }

        relevant
    }

    pub fn best_match<'a>(&self, user: &EmotionVector, songs: &'a [Song]) -> Result<SongMatch<'a>> {
        if songs.is_empty() {
            return Err(AppError::EmptyCatalog);
        }

        let relevant = self.relevant_emotions(user);

        let scored: Vec<(&Song, f64)> = songs
            .iter()
            .map(|song| (song, restricted_cosine(user, &song.emotion_profile, &relevant)))
            .collect();

        let best_score = scored
            .iter()
            .map(|(_, score)| *score)
            .fold(f64::NEG_INFINITY, f64::max);

        let (song, score) = scored
            .into_iter()
            .filter(|(_, score)| best_score - score < TIE_EPSILON)
            .min_by(|(a, _), (b, _)| {
                b.play_count
                    .cmp(&a.play_count)
                    .then_with(|| a.id.cmp(&b.id))
            })
            .ok_or(AppError::EmptyCatalog)?;

        let matched_emotions = self.matched_emotions(user, &song.emotion_profile, &relevant);

        debug!(
            "Matched song {} with score {:.4} on {} emotions",
            song.id,
            score,
            matched_emotions.len()
        );

        Ok(SongMatch {
            song,
            score,
            matched_emotions,
        })
    }

    fn matched_emotions(
        &self,
        user: &EmotionVector,
        profile: &EmotionVector,
        relevant: &[Emotion],
    ) -> Vec<Emotion> {
        let mut shared: Vec<(Emotion, f64)> = relevant
            .iter()
            .copied()
            .filter(|&emotion| profile[emotion] >= self.relevance_threshold)
            .map(|emotion| (emotion, user[emotion] * profile[emotion]))
            .collect();
        shared.sort_by(|a, b| b.1.total_cmp(&a.1).then(a.0.cmp(&b.0)));
        shared.into_iter().map(|(emotion, _)| emotion).collect()
    }
}

/// Cosine similarity over the `relevant` emotions only; 0 when either side
/// has no weight there.
pub fn restricted_cosine(user: &EmotionVector, profile: &EmotionVector, relevant: &[Emotion]) -> f64 {
    let (dot, user_sq, profile_sq) = relevant.iter().fold((0.0, 0.0, 0.0), |(dot, u, s), &e| {
        (dot + user[e] * profile[e], u + user[e] * user[e], s + profile[e] * profile[e])
    });

    let norm = user_sq.sqrt() * profile_sq.sqrt();
    if norm == 0.0 {
        return 0.0;
    }

    (dot / norm).clamp(0.0, 1.0)
}
