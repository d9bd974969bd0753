use serde::Deserialize;

/// Storymap runtime configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Directory holding saved maps and their sidecars
    pub data_dir: String,
    /// Gemini API key; LLM extraction is disabled without it
    pub gemini_api_key: Option<String>,
    /// Google Maps API key; geocoding, routing and the Google renderer are
    /// disabled without it
    pub maps_api_key: Option<String>,
    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            data_dir: "data".to_string(),
            gemini_api_key: None,
            maps_api_key: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: std::env::var("STORYMAP_BIND").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("STORYMAP_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            data_dir: std::env::var("STORYMAP_DATA_DIR").unwrap_or_else(|_| "data".to_string()),
            gemini_api_key: std::env::var("GEMINI_API_KEY").ok(),
            maps_api_key: std::env::var("GOOGLE_MAPS_API_KEY").ok(),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}
