// src/state.rs
use std::sync::Arc;
use thiserror::Error;

use crate::auth::{Authenticator, RoleTable};
use crate::config::AppConfig;
use crate::db::Database;
use crate::errors::ServerError;
use crate::notify::Notifier;
use crate::ratelimit::RateLimiter;
use crate::scraper::{official_sources, HttpPageFetcher, OfficialUpdates, ScraperError};
use crate::services::{
    AdapterError, CacheStore, GeminiClient, GeocodingService, HttpImageSource, ImageVerifier,
    LocationExtractor, NominatimClient, TextModel,
};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("adapter setup failed: {0}")]
    Adapter(#[from] AdapterError),
    #[error("scraper setup failed: {0}")]
    Scraper(#[from] ScraperError),
    #[error("database setup failed: {0}")]
    Database(#[from] ServerError),
}

/// Everything a request handler can reach. Shared read-only across
/// workers; interior state (cache rows, subscribers, rate windows) lives
/// behind the store or a mutex.
pub struct AppState {
    pub db: Database,
    pub cache: CacheStore,
    pub auth: Box<dyn Authenticator>,
    pub geocoder: GeocodingService,
    pub extractor: LocationExtractor,
    pub verifier: ImageVerifier,
    pub updates: OfficialUpdates,
    pub notifier: Notifier,
    pub limiter: RateLimiter,
}

impl AppState {
    pub fn from_config(cfg: &AppConfig) -> Result<Self, StartupError> {
        let db = Database::new(cfg.database_path.clone());
        let cache = CacheStore::new(db.clone());

        if cfg.gemini_api_key.is_none() {
            tracing::warn!("GEMINI_API_KEY not set, extraction and image verification will degrade");
        }
        let model: Arc<dyn TextModel> = Arc::new(GeminiClient::new(
            cfg.gemini_base_url.clone(),
            cfg.gemini_model.clone(),
            cfg.gemini_api_key.clone(),
        )?);

        let geocoder = GeocodingService::new(
            cache.clone(),
            Box::new(NominatimClient::new(
                cfg.geocoder_url.clone(),
                cfg.geocoder_user_agent.clone(),
            )?),
        );
        let extractor = LocationExtractor::new(cache.clone(), model.clone());
        let verifier = ImageVerifier::new(cache.clone(), model, Box::new(HttpImageSource::new()?));
        let updates = OfficialUpdates::new(
            Box::new(HttpPageFetcher::new(cfg.scrape_timeout)?),
            official_sources(),
        );

        Ok(Self {
            db,
            cache,
            auth: Box::new(RoleTable::demo()),
            geocoder,
            extractor,
            verifier,
            updates,
            notifier: Notifier::with_max_subscribers(cfg.stream_client_cap()),
            limiter: RateLimiter::new(cfg.rate_limit_max, cfg.rate_limit_window),
        })
    }
}
