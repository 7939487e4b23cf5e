use crate::error::{AppError, Result};
use crate::models::{CatalogStats, Emotion, EmotionCoverage, Song, SongList, SongsByEmotion};
use rand::seq::SliceRandom;
use std::collections::HashMap;
use std::path::Path;

/// Score at which a song counts as carrying an emotion for browsing
pub const EMOTION_TAG_THRESHOLD: f64 = 0.5;

const MOST_PLAYED_LIMIT: usize = 5;

/// Read-only, in-memory song catalog. Loaded once at startup and shared
/// behind an `Arc`; nothing in the request path mutates it.
#[derive(Debug, Clone, Default)]
pub struct SongCatalog {
    songs: Vec<Song>,
    by_id: HashMap<String, usize>,
}

impl SongCatalog {
    pub fn from_songs(songs: Vec<Song>) -> Result<Self> {
        let mut by_id = HashMap::with_capacity(songs.len());
        for (idx, song) in songs.iter().enumerate() {
            if by_id.insert(song.id.clone(), idx).is_some() {
                return Err(AppError::Catalog(format!("Duplicate song id: {}", song.id)));
            }
        }
        Ok(Self { songs, by_id })
    }

    /// Load a JSON array of songs
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path)
            .map_err(|e| AppError::Catalog(format!("Failed to read {}: {}", path.display(), e)))?;

        let songs: Vec<Song> = serde_json::from_str(&raw)
            .map_err(|e| AppError::Catalog(format!("Failed to parse {}: {}", path.display(), e)))?;

        let catalog = Self::from_songs(songs)?;
        if catalog.is_empty() {
            tracing::warn!("Song catalog at {} is empty, recommendations will fail", path.display());
        } else {
            tracing::info!("Loaded {} songs from {}", catalog.len(), path.display());
        }
        Ok(catalog)
    }

    pub fn songs(&self) -> &[Song] {
        &self.songs
    }

    pub fn len(&self) -> usize {
        self.songs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.songs.is_empty()
    }

    pub fn get(&self, id: &str) -> Option<&Song> {
        self.by_id.get(id).map(|&idx| &self.songs[idx])
    }

    /// Most played first, then by id. `page` is 1-based. With `emotion` set,
    /// only songs carrying that emotion are listed and counted.
    pub fn page(&self, page: usize, per_page: usize, emotion: Option<Emotion>) -> SongList {
        let page = page.max(1);
        let per_page = per_page.max(1);

        let mut matching = self.sorted_by_plays();
        if let Some(emotion) = emotion {
            matching.retain(|s| s.emotion_profile[emotion] >= EMOTION_TAG_THRESHOLD);
        }
        let total = matching.len();

        let songs = matching
            .into_iter()
            .skip((page - 1) * per_page)
            .take(per_page)
            .cloned()
            .collect();

        SongList {
            songs,
            total,
            page,
            per_page,
            total_pages: total.div_ceil(per_page),
        }
    }

    pub fn random(&self) -> Option<&Song> {
        self.songs.choose(&mut rand::thread_rng())
    }

    /// Songs carrying `emotion`, strongest first
    pub fn by_emotion(&self, emotion: Emotion, limit: usize) -> SongsByEmotion {
        let mut tagged: Vec<&Song> = self
            .songs
            .iter()
            .filter(|s| s.emotion_profile.get(emotion) >= EMOTION_TAG_THRESHOLD)
            .collect();
        tagged.sort_by(|a, b| {
            b.emotion_profile[emotion]
                .total_cmp(&a.emotion_profile[emotion])
                .then_with(|| a.id.cmp(&b.id))
        });

        let total = tagged.len();
        SongsByEmotion {
            emotion,
            songs: tagged.into_iter().take(limit).cloned().collect(),
            total,
        }
    }

    pub fn stats(&self) -> CatalogStats {
        let emotion_distribution: Vec<EmotionCoverage> = Emotion::ALL
            .iter()
            .map(|&emotion| EmotionCoverage {
                emotion,
                songs: self
                    .songs
                    .iter()
                    .filter(|s| s.emotion_profile[emotion] >= EMOTION_TAG_THRESHOLD)
                    .count(),
            })
            .collect();

        CatalogStats {
            total_songs: self.len(),
            total_plays: self.songs.iter().map(|s| s.play_count).sum(),
            emotions_covered: emotion_distribution
                .iter()
                .filter(|c| c.songs > 0)
                .map(|c| c.emotion)
                .collect(),
            emotion_distribution,
            most_played_songs: self
                .sorted_by_plays()
                .into_iter()
                .take(MOST_PLAYED_LIMIT)
                .cloned()
                .collect(),
        }
    }

    fn sorted_by_plays(&self) -> Vec<&Song> {
        let mut sorted: Vec<&Song> = self.songs.iter().collect();
        sorted.sort_by(|a, b| b.play_count.cmp(&a.play_count).then_with(|| a.id.cmp(&b.id)));
        sorted
    }
}
