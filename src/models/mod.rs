pub mod emotion;
pub mod recommendation;
pub mod song;

pub use emotion::{
    AnalysisResult, AttributionToken, ConfidenceLevel, Emotion, EmotionVector, TokenKind,
    WordImportance, EMOTION_COUNT,
};
pub use recommendation::{
    AnalysisResponse, AnalyzeRequest, BatchAnalysisResponse, BatchAnalyzeRequest, Recommendation,
    RecommendationRequest, RecommendationResponse, RecommendationResult,
    SupportedEmotions,
};
pub use song::{ByEmotionQuery, CatalogStats, EmotionCoverage, Song, SongList, SongListQuery, SongsByEmotion};
