use serde::Deserialize;
use std::time::Duration;

use crate::services::recommendations::RecommendationSettings;

/// Application configuration loaded from environment variables
#[derive(Debug, Deserialize, Clone)]
pub struct Config {
    /// Redis connection URL
    #[serde(default = "default_redis_url")]
    pub redis_url: String,

    /// Google Maps Platform API key
    pub google_maps_api_key: String,

    /// Google Places web service base URL
    #[serde(default = "default_google_places_url")]
    pub google_places_url: String,

    /// OpenWeather API key
    pub openweather_api_key: String,

    /// OpenWeather API base URL
    #[serde(default = "default_openweather_url")]
    pub openweather_url: String,

    /// Server host address
    #[serde(default = "default_host")]
    pub host: String,

    /// Server port
    #[serde(default = "default_port")]
    pub port: u16,

    /// Accepted bearer tokens as `token:user_id` pairs
    #[serde(default)]
    pub api_tokens: Vec<String>,

    /// Origins allowed by the CORS layer
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,

    /// Per-call timeout for places provider requests, in milliseconds
    #[serde(default = "default_provider_timeout_ms")]
    pub provider_timeout_ms: u64,

    /// Maximum number of interests accepted by a personalized request
    #[serde(default = "default_max_interests")]
    pub max_interests: usize,
}

fn default_redis_url() -> String {
    "redis://localhost:6379".to_string()
}

fn default_google_places_url() -> String {
    "https://maps.googleapis.com/maps/api/place".to_string()
}

fn default_openweather_url() -> String {
    "https://api.openweathermap.org/data/2.5".to_string()
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8000
}

fn default_allowed_origins() -> Vec<String> {
    vec![
        "http://localhost:3000".to_string(),
        "http://127.0.0.1:3000".to_string(),
    ]
}

fn default_provider_timeout_ms() -> u64 {
    5000
}

fn default_max_interests() -> usize {
    10
}

impl Config {
    /// Load configuration from environment variables
    pub fn from_env() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();
        envy::from_env::<Config>().map_err(|e| anyhow::anyhow!("Failed to load config: {}", e))
    }

    pub fn provider_timeout(&self) -> Duration {
        Duration::from_millis(self.provider_timeout_ms)
    }

    /// Settings for the personalized recommendation aggregator
    pub fn recommendation_settings(&self) -> RecommendationSettings {
        RecommendationSettings {
            provider_timeout: self.provider_timeout(),
            max_interests: self.max_interests,
            ..RecommendationSettings::default()
        }
    }
}
