//! Inference collaborators
//!
//! The text classifier and the token attribution explainer live outside this
//! service (a model sidecar). They are reached through two traits so the
//! pipeline can be driven by any backend, and the HTTP client below is the
//! production implementation. It is built once at startup and shared.

use crate::error::{AppError, Result};
use crate::models::{AttributionToken, Emotion};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Produces one raw score per emotion, in canonical order.
#[async_trait]
pub trait EmotionClassifier: Send + Sync {
    async fn classify(&self, text: &str) -> Result<Vec<f64>>;
}

/// Produces signed per-token contributions toward `target`.
#[async_trait]
pub trait AttributionExplainer: Send + Sync {
    async fn explain(&self, text: &str, target: Emotion) -> Result<Vec<AttributionToken>>;
}

#[derive(Debug, Clone)]
pub struct InferenceClient {
    base_url: String,
    client: Client,
}

#[derive(Debug, Serialize)]
struct PredictRequest<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct PredictResponse {
    scores: Vec<f64>,
}

#[derive(Debug, Serialize)]
struct ExplainRequest<'a> {
    text: &'a str,
    target_emotion: Emotion,
}

#[derive(Debug, Deserialize)]
struct ExplainResponse {
    #[serde(default)]
    tokens: Vec<AttributionToken>,
}

impl InferenceClient {
    pub fn new(base_url: String) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .map_err(|e| AppError::Provider(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self { base_url, client })
    }

    async fn post_json<Req, Resp>(&self, path: &str, body: &Req) -> Result<Resp>
    where
        Req: Serialize + ?Sized,
        Resp: for<'de> Deserialize<'de>,
    {
        let url = format!("{}{}", self.base_url, path);
        tracing::debug!("Calling inference sidecar: {}", url);

        let response = self
            .client
            .post(&url)
            .json(body)
            .send()
            .await
            .map_err(|e| AppError::Provider(format!("Request to {} failed: {}", path, e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            tracing::error!("Inference sidecar error: {} - {}", status, body);
            return Err(AppError::Provider(format!(
                "{} returned status: {} - {}",
                path,
                status,
                body.chars().take(200).collect::<String>()
            )));
        }

        response
            .json::<Resp>()
            .await
            .map_err(|e| AppError::Provider(format!("Failed to parse {} response: {}", path, e)))
    }
}

#[async_trait]
impl EmotionClassifier for InferenceClient {
    async fn classify(&self, text: &str) -> Result<Vec<f64>> {
        let response: PredictResponse = self.post_json("/predict", &PredictRequest { text }).await?;
        tracing::debug!("Classifier returned {} scores", response.scores.len());
        Ok(response.scores)
    }
}

#[async_trait]
impl AttributionExplainer for InferenceClient {
    async fn explain(&self, text: &str, target: Emotion) -> Result<Vec<AttributionToken>> {
        let response: ExplainResponse = self
            .post_json(
                "/explain",
                &ExplainRequest {
                    text,
                    target_emotion: target,
                },
            )
            .await?;
        tracing::debug!("Explainer returned {} tokens for {}", response.tokens.len(), target);
        Ok(response.tokens)
    }
}
