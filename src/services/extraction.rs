// src/services/extraction.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

use crate::domain::Outcome;
use crate::services::{cache_key, CacheStore, TextModel};

pub const EXTRACTION_TTL_MINUTES: i64 = 60;

/// What the model answers when the text names no place.
const NOT_FOUND_SENTINEL: &str = "UNKNOWN";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedLocation {
    pub location_name: Option<String>,
    pub extracted_at: DateTime<Utc>,
}

/// Free text in, place name out, cache-aside over the text model.
pub struct LocationExtractor {
    cache: CacheStore,
    model: Arc<dyn TextModel>,
}

fn prompt_for(description: &str) -> String {
    format!(
        "Extract the location name from this disaster description. Return only the location name \
         (city, state/country format if available), or \"{NOT_FOUND_SENTINEL}\" if no location is found: \"{description}\""
    )
}

/// Trims quotes and punctuation the model tends to wrap its answer in.
fn clean_answer(raw: &str) -> Option<String> {
    let answer = raw
        .trim()
        .trim_matches(|c: char| c == '"' || c == '\'' || c == '.' || c == '`')
        .trim();
    if answer.is_empty() || answer.eq_ignore_ascii_case(NOT_FOUND_SENTINEL) {
        None
    } else {
        Some(answer.to_string())
    }
}

impl LocationExtractor {
    pub fn new(cache: CacheStore, model: Arc<dyn TextModel>) -> Self {
        Self { cache, model }
    }

    pub fn cache_key(description: &str) -> String {
        cache_key("location_extract", description)
    }

    /// A definitive model answer is cached, including "no location". Model
    /// failures are not.
    pub fn extract(&self, description: &str) -> Outcome<Option<String>> {
        if description.trim().is_empty() {
            return Outcome::Success(None);
        }

        let key = Self::cache_key(description);
        if let Some(hit) = self.cache.get_json::<ExtractedLocation>(&key) {
            return Outcome::Success(hit.location_name);
        }

        match self.model.generate_text(&prompt_for(description)) {
            Ok(raw) => {
                let result = ExtractedLocation {
                    location_name: clean_answer(&raw),
                    extracted_at: Utc::now(),
                };
                self.cache.set_json(&key, &result, EXTRACTION_TTL_MINUTES);
                Outcome::Success(result.location_name)
            }
            Err(e) => {
                tracing::warn!(error = %e, "location extraction failed");
                Outcome::degraded(None, e.to_string())
            }
        }
    }
}
