pub mod attribution;
pub mod catalog;
pub mod complexity;
pub mod composer;
pub mod emotion_service;
pub mod inference;
pub mod matcher;
pub mod pipeline;
pub mod scorer;

pub use catalog::SongCatalog;
pub use emotion_service::EmotionService;
pub use inference::InferenceClient;
pub use pipeline::{Pipeline, PipelineConfig};
