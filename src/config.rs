// config.rs
use std::net::SocketAddr;
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {name}: {value}")]
    Invalid { name: &'static str, value: String },
}

/// Application configuration sourced from environment variables.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub bind_addr: SocketAddr,
    pub max_workers: usize,
    pub database_path: String,
    pub gemini_api_key: Option<String>,
    pub gemini_model: String,
    pub gemini_base_url: String,
    pub geocoder_url: String,
    pub geocoder_user_agent: String,
    pub scrape_timeout: Duration,
    pub cache_sweep_interval: Duration,
    pub rate_limit_max: u32,
    pub rate_limit_window: Duration,
    pub max_stream_clients: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            max_workers: 16,
            database_path: "disaster_relief.sqlite3".to_string(),
            gemini_api_key: None,
            gemini_model: "gemini-1.5-flash".to_string(),
            gemini_base_url: "https://generativelanguage.googleapis.com".to_string(),
            geocoder_url: "https://nominatim.openstreetmap.org/search".to_string(),
            geocoder_user_agent: "DisasterResponsePlatform/1.0".to_string(),
            scrape_timeout: Duration::from_secs(10),
            cache_sweep_interval: Duration::from_secs(300),
            rate_limit_max: 100,
            rate_limit_window: Duration::from_secs(15 * 60),
            max_stream_clients: 4,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds a config from any key lookup; unset keys keep their defaults.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();

        if let Some(v) = lookup("BIND_ADDR") {
            cfg.bind_addr = parse("BIND_ADDR", v)?;
        }
        if let Some(v) = lookup("MAX_WORKERS") {
            cfg.max_workers = parse("MAX_WORKERS", v)?;
        }
        if let Some(v) = lookup("DATABASE_PATH") {
            cfg.database_path = v;
        }
        cfg.gemini_api_key = lookup("GEMINI_API_KEY").filter(|k| !k.trim().is_empty());
        if let Some(v) = lookup("GEMINI_MODEL") {
            cfg.gemini_model = v;
        }
        if let Some(v) = lookup("GEMINI_BASE_URL") {
            cfg.gemini_base_url = v.trim_end_matches('/').to_string();
        }
        if let Some(v) = lookup("GEOCODER_URL") {
            cfg.geocoder_url = v;
        }
        if let Some(v) = lookup("GEOCODER_USER_AGENT") {
            cfg.geocoder_user_agent = v;
        }
        if let Some(v) = lookup("SCRAPE_TIMEOUT_SECS") {
            cfg.scrape_timeout = Duration::from_secs(parse("SCRAPE_TIMEOUT_SECS", v)?);
        }
        if let Some(v) = lookup("CACHE_SWEEP_SECS") {
            cfg.cache_sweep_interval = Duration::from_secs(parse("CACHE_SWEEP_SECS", v)?);
        }
        if let Some(v) = lookup("RATE_LIMIT_MAX") {
            cfg.rate_limit_max = parse("RATE_LIMIT_MAX", v)?;
        }
        if let Some(v) = lookup("RATE_LIMIT_WINDOW_SECS") {
            cfg.rate_limit_window = Duration::from_secs(parse("RATE_LIMIT_WINDOW_SECS", v)?);
        }
        if let Some(v) = lookup("MAX_STREAM_CLIENTS") {
            cfg.max_stream_clients = parse("MAX_STREAM_CLIENTS", v)?;
        }

        Ok(cfg)
    }

    /// Stream clients each pin a worker, so at most half the pool serves them.
    pub fn stream_client_cap(&self) -> usize {
        self.max_stream_clients.min(self.max_workers / 2).max(1)
    }
}

fn parse<T: std::str::FromStr>(name: &'static str, value: String) -> Result<T, ConfigError> {
    value
        .trim()
        .parse()
        .map_err(|_| ConfigError::Invalid { name, value })
}
