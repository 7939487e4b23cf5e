mod api;
mod config;
mod error;
mod models;
mod services;

use crate::api::AppState;
use crate::config::{Config, LogFormat};
use crate::services::{EmotionService, InferenceClient, Pipeline, SongCatalog};
use axum::http::{header, HeaderValue, Method};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration before tracing so LOG_FORMAT is honoured
    let config = Config::from_env()?;

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,moodtune=debug".into());
    match config.log_format {
        LogFormat::Json => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init(),
        LogFormat::Text => tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer())
            .init(),
    }
    tracing::info!("Configuration loaded");

    // Load the song catalog
    let catalog = Arc::new(SongCatalog::load(&config.catalog_path)?);

    // One shared client for classifier and explainer
    let inference = Arc::new(InferenceClient::new(config.inference_url.clone())?);
    tracing::info!("Inference sidecar at {}", config.inference_url);

    let emotion_service = Arc::new(EmotionService::new(
        inference.clone(),
        inference.clone(),
        catalog.clone(),
        Pipeline::new(config.pipeline),
    ));

    let app_state = Arc::new(AppState {
        emotion_service,
        catalog,
        model_version: config.model_version.clone(),
    });

    let app = api::router(app_state)
        .layer(CompressionLayer::new())
        .layer(cors_layer(&config.cors_origins));

    // Start server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn cors_layer(origins: &[String]) -> CorsLayer {
    let allow_origin = if origins.iter().any(|o| o == "*") {
        AllowOrigin::from(Any)
    } else {
        let parsed: Vec<HeaderValue> = origins
            .iter()
            .filter_map(|o| match o.parse() {
                Ok(v) => Some(v),
                Err(_) => {
                    tracing::warn!("Ignoring invalid CORS origin: {}", o);
                    None
                }
            })
            .collect();
        AllowOrigin::list(parsed)
    };

    CorsLayer::new()
        .allow_origin(allow_origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::AUTHORIZATION, header::CONTENT_TYPE])
}
