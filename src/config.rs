use crate::services::PipelineConfig;
use std::env;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogFormat {
    Text,
    Json,
}

#[derive(Debug, Clone)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    /// Base URL of the classifier/explainer sidecar
    pub inference_url: String,
    /// JSON file holding the pre-scored song catalog
    pub catalog_path: String,
    pub model_version: String,
    pub pipeline: PipelineConfig,
    /// Allowed CORS origins (comma-separated). Use "*" for any origin (development only).
    pub cors_origins: Vec<String>,
    pub log_format: LogFormat,
}

impl Config {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let inference_url = env::var("INFERENCE_URL").map_err(|_| {
            anyhow::anyhow!(
                "INFERENCE_URL environment variable must be set to the emotion model sidecar, \
                e.g. http://localhost:9000"
            )
        })?;

        let defaults = PipelineConfig::default();
        let pipeline = PipelineConfig {
            detection_threshold: parse_threshold("DETECTION_THRESHOLD", defaults.detection_threshold)?,
            relevance_threshold: parse_threshold("RELEVANCE_THRESHOLD", defaults.relevance_threshold)?,
            top_k: env::var("TOP_K_WORDS")
                .ok()
                .map(|v| v.parse::<usize>())
                .transpose()
                .map_err(|e| anyhow::anyhow!("TOP_K_WORDS must be a positive integer: {}", e))?
                .unwrap_or(defaults.top_k),
        };

        if pipeline.top_k == 0 {
            return Err(anyhow::anyhow!("TOP_K_WORDS must be at least 1"));
        }

        let cors_origins = env::var("CORS_ORIGINS")
            .unwrap_or_else(|_| "http://localhost:3000".to_string())
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let log_format = match env::var("LOG_FORMAT").as_deref() {
            Ok("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Config {
            server_host: env::var("SERVER_HOST")
                .unwrap_or_else(|_| "0.0.0.0".to_string()),
            server_port: env::var("SERVER_PORT")
                .unwrap_or_else(|_| "8000".to_string())
                .parse()
                .unwrap_or(8000),
            inference_url: inference_url.trim_end_matches('/').to_string(),
            catalog_path: env::var("CATALOG_PATH")
                .unwrap_or_else(|_| "data/songs.json".to_string()),
            model_version: env::var("MODEL_VERSION")
                .unwrap_or_else(|_| "bert-emotion-v1.0".to_string()),
            pipeline,
            cors_origins,
            log_format,
        })
    }
}

fn parse_threshold(key: &str, default: f64) -> Result<f64, anyhow::Error> {
    let Ok(raw) = env::var(key) else {
        return Ok(default);
    };

    let value: f64 = raw
        .trim()
        .parse()
        .map_err(|e| anyhow::anyhow!("{} must be a number: {}", key, e))?;

    if !(0.0..=1.0).contains(&value) {
        return Err(anyhow::anyhow!("{} must be within [0, 1], got {}", key, value));
    }

    Ok(value)
}
