// src/domain/updates.rs
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A news item from an official agency. Never persisted on its own.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OfficialUpdate {
    pub source: String,
    pub title: String,
    pub date: String,
    pub summary: String,
    pub link: String,
    pub timestamp: DateTime<Utc>,
}

impl OfficialUpdate {
    pub fn matches_any(&self, keywords: &[&str]) -> bool {
        let text = format!("{} {}", self.title, self.summary).to_lowercase();
        keywords.iter().any(|k| text.contains(k))
    }
}

/// Keyword table used to match updates to a disaster type.
pub fn keywords_for(disaster_type: &str) -> &'static [&'static str] {
    match disaster_type.trim().to_lowercase().as_str() {
        "hurricane" => &["hurricane", "tropical storm", "cyclone", "typhoon"],
        "earthquake" => &["earthquake", "seismic", "quake"],
        "flood" => &["flood", "flooding", "water", "rain"],
        "wildfire" => &["wildfire", "fire", "burn", "blaze"],
        "tornado" => &["tornado", "twister", "storm"],
        "tsunami" => &["tsunami", "tidal wave"],
        "volcano" => &["volcano", "volcanic", "eruption"],
        "drought" => &["drought", "dry", "water shortage"],
        _ => &[],
    }
}
