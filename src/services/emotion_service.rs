//! Emotion Service
//!
//! Request-level orchestration: calls the injected classifier and explainer,
//! then hands their raw output to the pure [`Pipeline`]. Provider failures are
//! propagated unchanged; retries are left to the caller.

use crate::error::Result;
use crate::models::{AnalysisResult, RecommendationResult};
use crate::services::catalog::SongCatalog;
use crate::services::inference::{AttributionExplainer, EmotionClassifier};
use crate::services::pipeline::Pipeline;
use futures::future::try_join_all;
use std::sync::Arc;
use tracing::{debug, info};

pub struct EmotionService {
    classifier: Arc<dyn EmotionClassifier>,
    explainer: Arc<dyn AttributionExplainer>,
    catalog: Arc<SongCatalog>,
    pipeline: Pipeline,
}

impl EmotionService {
    pub fn new(
        classifier: Arc<dyn EmotionClassifier>,
        explainer: Arc<dyn AttributionExplainer>,
        catalog: Arc<SongCatalog>,
        pipeline: Pipeline,
    ) -> Self {
        Self {
            classifier,
            explainer,
            catalog,
            pipeline,
        }
    }

    pub async fn analyze(
        &self,
        text: &str,
        threshold: Option<f64>,
        include_explanation: bool,
    ) -> Result<AnalysisResult> {
        let raw = self.classifier.classify(text).await?;
        let scored = self.pipeline.score(&raw, threshold)?;

        let tokens = if include_explanation {
            self.explainer.explain(text, scored.primary).await?
        } else {
            Vec::new()
        };

        let analysis = self.pipeline.analyze(scored, &tokens);
        debug!(
            "Analyzed text: primary={} confidence={:.3} complexity={:.3}",
            analysis.primary_emotion, analysis.primary_confidence, analysis.emotional_complexity
        );
        Ok(analysis)
    }

    /// Analyze several texts concurrently without explanations. The first
    /// failure fails the whole batch.
    pub async fn analyze_batch(&self, texts: &[String], threshold: Option<f64>) -> Result<Vec<AnalysisResult>> {
        try_join_all(texts.iter().map(|text| self.analyze(text, threshold, false))).await
    }

    pub async fn recommend(&self, text: &str, include_explanation: bool) -> Result<RecommendationResult> {
        let analysis = self.analyze(text, None, include_explanation).await?;
        let result = self.pipeline.recommend(analysis, self.catalog.songs())?;

        info!(
            "Recommended '{}' by {} for {} (score {:.3})",
            result.recommendation.song.name,
            result.recommendation.song.artist,
            result.analysis.primary_emotion,
            result.recommendation.match_score
        );
        Ok(result)
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::error::AppError;
    use crate::models::{AttributionToken, Emotion, TokenKind};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    /// Classifier returning fixed scores, or a provider error when `None`
    pub struct FixedClassifier(pub Option<Vec<f64>>);

    #[async_trait]
    impl EmotionClassifier for FixedClassifier {
        async fn classify(&self, _text: &str) -> Result<Vec<f64>> {
            self.0
                .clone()
                .ok_or_else(|| AppError::Provider("classifier offline".to_string()))
        }
    }

    /// Explainer that splits the text on whitespace, weighting later words
    /// higher, and counts how often it was called.
    #[derive(Default)]
    pub struct WordExplainer {
        pub calls: AtomicUsize,
    }

    #[async_trait]
    impl AttributionExplainer for WordExplainer {
        async fn explain(&self, text: &str, _target: Emotion) -> Result<Vec<AttributionToken>> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            let mut tokens = vec![AttributionToken::new("[CLS]", 0.0, TokenKind::Boundary)];
            tokens.extend(
                text.split_whitespace()
                    .enumerate()
                    .map(|(i, w)| AttributionToken::new(w, 0.1 * (i + 1) as f64, TokenKind::Ordinary)),
            );
            tokens.push(AttributionToken::new("[SEP]", 0.0, TokenKind::Boundary));
            Ok(tokens)
        }
    }

    pub fn happy_scores() -> Vec<f64> {
        let mut raw = vec![0.02; 17];
        raw[Emotion::Happiness.index()] = 0.92;
        raw[Emotion::Excitement.index()] = 0.87;
        raw[Emotion::Confidence.index()] = 0.73;
        raw[Emotion::Optimism.index()] = 0.68;
        raw
    }
}

#[cfg(test)]
mod tests {
    use super::test_support::*;
    use super::*;
    use crate::error::AppError;
    use crate::models::{Emotion, EmotionVector, Song};
    use std::sync::atomic::Ordering;

    fn catalog() -> Arc<SongCatalog> {
        let songs = vec![
            Song {
                id: "upbeat".to_string(),
                name: "Upbeat".to_string(),
                artist: "Band".to_string(),
                emotion_profile: EmotionVector::from_pairs(&[
                    (Emotion::Happiness, 0.9),
                    (Emotion::Excitement, 0.9),
                ])
                .unwrap(),
                play_count: 2,
                average_rating: None,
            },
            Song {
                id: "downbeat".to_string(),
                name: "Downbeat".to_string(),
                artist: "Band".to_string(),
                emotion_profile: EmotionVector::from_pairs(&[(Emotion::Sadness, 0.9)]).unwrap(),
                play_count: 99,
                average_rating: None,
            },
        ];
        Arc::new(SongCatalog::from_songs(songs).unwrap())
    }

    fn service(scores: Option<Vec<f64>>, explainer: Arc<WordExplainer>) -> EmotionService {
        EmotionService::new(
            Arc::new(FixedClassifier(scores)),
            explainer,
            catalog(),
            Pipeline::default(),
        )
    }

    #[tokio::test]
    async fn test_analyze_with_explanation() {
        let explainer = Arc::new(WordExplainer::default());
        let svc = service(Some(happy_scores()), explainer.clone());

        let analysis = svc.analyze("best day ever", None, true).await.unwrap();
        assert_eq!(analysis.primary_emotion, Emotion::Happiness);
        assert_eq!(
            analysis.explanation,
            "Your text expresses Happiness (92% confidence). Key contributing words include 'ever' and 'day'."
        );
        assert_eq!(explainer.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn test_analyze_without_explanation_skips_explainer() {
        let explainer = Arc::new(WordExplainer::default());
        let svc = service(Some(happy_scores()), explainer.clone());

        let analysis = svc.analyze("best day ever", None, false).await.unwrap();
        assert_eq!(analysis.explanation, "Your text expresses Happiness (92% confidence).");
        assert!(analysis.top_words.is_empty());
        assert_eq!(explainer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_provider_error_propagates() {
        let svc = service(None, Arc::new(WordExplainer::default()));
        let err = svc.analyze("anything", None, true).await.unwrap_err();
        assert!(matches!(err, AppError::Provider(_)));
    }

    #[tokio::test]
    async fn test_bad_classifier_shape_is_rejected() {
        let svc = service(Some(vec![0.5; 3]), Arc::new(WordExplainer::default()));
        let err = svc.recommend("anything", true).await.unwrap_err();
        assert!(matches!(err, AppError::InputShape { actual: 3, .. }));
    }

    #[tokio::test]
    async fn test_recommend() {
        let svc = service(Some(happy_scores()), Arc::new(WordExplainer::default()));
        let result = svc.recommend("best day ever", true).await.unwrap();

        assert_eq!(result.recommendation.song.id, "upbeat");
        assert_eq!(
            result.recommendation.matched_emotions,
            vec![Emotion::Happiness, Emotion::Excitement]
        );
    }

    #[tokio::test]
    async fn test_batch() {
        let explainer = Arc::new(WordExplainer::default());
        let svc = service(Some(happy_scores()), explainer.clone());
        let texts = vec!["one".to_string(), "two".to_string(), "three".to_string()];

        let results = svc.analyze_batch(&texts, Some(0.8)).await.unwrap();
        assert_eq!(results.len(), 3);
        assert!(results.iter().all(|r| r.secondary_emotions == vec![Emotion::Excitement]));
        assert_eq!(explainer.calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_empty_catalog() {
        let svc = EmotionService::new(
            Arc::new(FixedClassifier(Some(happy_scores()))),
            Arc::new(WordExplainer::default()),
            Arc::new(SongCatalog::default()),
            Pipeline::default(),
        );
        let err = svc.recommend("hello", false).await.unwrap_err();
        assert!(matches!(err, AppError::EmptyCatalog));
    }
}
