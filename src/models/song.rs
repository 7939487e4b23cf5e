use crate::models::emotion::{Emotion, EmotionVector};
use serde::{Deserialize, Serialize};

/// A catalog entry with its offline emotion profile. Read-only to the
/// recommendation pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Song {
    pub id: String,
    pub name: String,
    pub artist: String,
    #[serde(alias = "emotionProfile")]
    pub emotion_profile: EmotionVector,
    #[serde(default, alias = "playCount")]
    pub play_count: u64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SongList {
    pub songs: Vec<Song>,
    pub total: usize,
    pub page: usize,
    pub per_page: usize,
    pub total_pages: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct SongsByEmotion {
    pub emotion: Emotion,
    pub songs: Vec<Song>,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct EmotionCoverage {
    pub emotion: Emotion,
    pub songs: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CatalogStats {
    pub total_songs: usize,
    pub total_plays: u64,
    pub emotions_covered: Vec<Emotion>,
    pub emotion_distribution: Vec<EmotionCoverage>,
    pub most_played_songs: Vec<Song>,
}

#[derive(Debug, Deserialize)]
pub struct SongListQuery {
    pub page: Option<usize>,
    pub per_page: Option<usize>,
    pub emotion: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct ByEmotionQuery {
    pub limit: Option<usize>,
}
