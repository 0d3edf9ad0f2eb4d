/// Tickbook runtime configuration, read once at startup.
#[derive(Debug, Clone)]
pub struct Config {
    /// HTTP server bind address
    pub bind_address: String,
    /// HTTP server port
    pub port: u16,
    /// Anthropic API key; absence is reported per request, not at startup
    pub anthropic_api_key: Option<String>,
    /// Override for the Anthropic base URL
    pub anthropic_base_url: Option<String>,
    /// Override for the extraction model
    pub model: Option<String>,
    /// Log level
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0".to_string(),
            port: 8080,
            anthropic_api_key: None,
            anthropic_base_url: None,
            model: None,
            log_level: "info".to_string(),
        }
    }
}

impl Config {
    /// Load configuration from environment variables with sensible defaults.
    pub fn from_env() -> Self {
        Self {
            bind_address: std::env::var("TICKBOOK_BIND").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: std::env::var("TICKBOOK_PORT")
                .ok()
                .and_then(|p| p.parse().ok())
                .unwrap_or(8080),
            anthropic_api_key: std::env::var("ANTHROPIC_API_KEY").ok(),
            anthropic_base_url: std::env::var("ANTHROPIC_BASE_URL").ok(),
            model: std::env::var("TICKBOOK_MODEL").ok(),
            log_level: std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string()),
        }
    }
}
