pub mod cache;
pub mod error;
pub mod extraction;
pub mod gemini;
pub mod geocoding;
pub mod verification;

pub use cache::CacheStore;
pub use error::AdapterError;
pub use extraction::LocationExtractor;
pub use gemini::{GeminiClient, TextModel};
pub use geocoding::{GeocodingService, NominatimClient};
pub use verification::{HttpImageSource, ImageVerifier};

use base64::Engine;

/// Deterministic cache key: `prefix` + standard base64 of the input.
pub fn cache_key(prefix: &str, input: &str) -> String {
    format!(
        "{prefix}_{}",
        base64::engine::general_purpose::STANDARD.encode(input.as_bytes())
    )
}
