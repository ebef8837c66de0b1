use anyhow::Result;
use figment::{
    providers::{Env, Format, Serialized, Yaml},
    Figment,
};
use serde::{Deserialize, Serialize};
use tracing::info;

/// Application configuration structure
///
/// Features:
/// - AppSettings / ServerConfig
/// - DatabaseConfig (MongoDB)
/// - AuthConfig (JWT secret shared with the auth service)
/// - GenerationConfig / VideoConfig (external content services)
/// - PipelineConfig

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    pub app: AppSettings,
    pub server: ServerConfig,
    pub database: DatabaseConfig,
    pub auth: AuthConfig,
    pub generation: GenerationConfig,
    pub video: VideoConfig,
    pub pipeline: PipelineConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppSettings {
    pub name: String,
    pub version: String,
    pub debug: bool,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
}

/// MongoDB configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DatabaseConfig {
    pub url: String,
    pub name: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    pub jwt_secret: String,
}

/// Generative content service configuration.
///
/// The sampling parameters travel with the client that is built from this
/// value; nothing here is read from process-wide state after start-up.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationConfig {
    pub api_base: String,
    pub api_key: String,
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub timeout_secs: u64,
}

/// Video lookup service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VideoConfig {
    pub api_base: String,
    pub api_key: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Upper bound on chapters enriched at the same time.
    pub enrichment_concurrency: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            app: AppSettings {
                name: "coursegen".to_string(),
                version: "0.1.0".to_string(),
                debug: true,
            },
            server: ServerConfig {
                host: "0.0.0.0".to_string(),
                port: 8000,
            },
            database: DatabaseConfig {
                url: "mongodb://localhost:27017".to_string(),
                name: "coursegen".to_string(),
            },
            auth: AuthConfig {
                jwt_secret: "default-secret-key".to_string(),
            },
            generation: GenerationConfig {
                api_base: "https://generativelanguage.googleapis.com/v1beta".to_string(),
                api_key: String::new(),
                model: "gemini-2.0-flash".to_string(),
                temperature: 1.0,
                top_p: 0.95,
                top_k: 40,
                max_output_tokens: 8192,
                timeout_secs: 120,
            },
            video: VideoConfig {
                api_base: "https://www.googleapis.com/youtube/v3".to_string(),
                api_key: String::new(),
                timeout_secs: 120,
            },
            pipeline: PipelineConfig {
                enrichment_concurrency: 3,
            },
        }
    }
}

impl AppConfig {
    pub fn load() -> Result<Self> {
        info!("Loading application configuration...");

        let config: AppConfig = Figment::new()
            // Start with default values
            .merge(Serialized::defaults(Self::default()))
            // Override with config file if present
            .merge(Yaml::file("config.yaml"))
            // Override with environment variables, e.g. APP_GENERATION__API_KEY
            .merge(Env::prefixed("APP_").split("__"))
            .extract()?;

        info!("Configuration loaded successfully");
        info!("name: {:?}", config.app.name);
        info!("Database: {} / {}", config.database.url, config.database.name);
        info!("Generation model: {}", config.generation.model);
        info!(
            "Enrichment concurrency: {}",
            config.pipeline.enrichment_concurrency
        );

        if config.generation.api_key.is_empty() {
            tracing::warn!("APP_GENERATION__API_KEY is not set; generation requests will fail");
        }
        if config.video.api_key.is_empty() {
            tracing::warn!("APP_VIDEO__API_KEY is not set; chapters will be built without videos");
        }

        Ok(config)
    }
}
