// src/services/verification.rs
use chrono::{DateTime, Utc};
use regex::Regex;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::sync::{Arc, OnceLock};
use std::time::Duration;

use crate::domain::{Outcome, VerificationStatus};
use crate::services::{cache_key, AdapterError, CacheStore, TextModel};

pub const VERIFICATION_TTL_MINUTES: i64 = 24 * 60;
pub const VERIFIED_THRESHOLD: u8 = 70;
const DEFAULT_CONFIDENCE: u8 = 50;
const MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

const VERIFY_PROMPT: &str = "Analyze this image for signs of manipulation or verify if it shows \
disaster-related content. Provide a confidence score (0-100) and a brief explanation.";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImageStatus {
    Verified,
    Suspicious,
    Error,
}

impl ImageStatus {
    /// Report status this result should write, if any.
    pub fn report_status(&self) -> Option<VerificationStatus> {
        match self {
            ImageStatus::Verified => Some(VerificationStatus::Verified),
            ImageStatus::Suspicious => Some(VerificationStatus::Suspicious),
            ImageStatus::Error => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageVerification {
    #[serde(rename = "verification_status")]
    pub status: ImageStatus,
    #[serde(rename = "confidence_score")]
    pub confidence: u8,
    pub analysis: String,
    pub verified_at: DateTime<Utc>,
}

impl ImageVerification {
    fn from_analysis(analysis: String) -> Self {
        let confidence = parse_confidence(&analysis);
        let status = if confidence >= VERIFIED_THRESHOLD {
            ImageStatus::Verified
        } else {
            ImageStatus::Suspicious
        };
        Self {
            status,
            confidence,
            analysis,
            verified_at: Utc::now(),
        }
    }

    fn error() -> Self {
        Self {
            status: ImageStatus::Error,
            confidence: 0,
            analysis: "Unable to verify image".to_string(),
            verified_at: Utc::now(),
        }
    }
}

fn confidence_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"(?i)confidence.*?(\d{1,3})").expect("confidence pattern is valid")
    })
}

/// First number after the word "confidence", capped at 100; 50 if none.
pub fn parse_confidence(analysis: &str) -> u8 {
    confidence_pattern()
        .captures(analysis)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse::<u32>().ok())
        .map(|n| n.min(100) as u8)
        .unwrap_or(DEFAULT_CONFIDENCE)
}

/// Downloads the bytes behind an image URL, with its mime type.
pub trait ImageSource: Send + Sync {
    fn fetch(&self, url: &str) -> Result<(Vec<u8>, String), AdapterError>;
}

pub struct HttpImageSource {
    client: Client,
}

impl HttpImageSource {
    pub fn new() -> Result<Self, AdapterError> {
        let client = Client::builder().timeout(Duration::from_secs(30)).build()?;
        Ok(Self { client })
    }
}

impl ImageSource for HttpImageSource {
    fn fetch(&self, url: &str) -> Result<(Vec<u8>, String), AdapterError> {
        let resp = self.client.get(url).send()?;
        let status = resp.status();
        if !status.is_success() {
            return Err(AdapterError::Status {
                status: status.as_u16(),
                body: String::new(),
            });
        }
        if resp.content_length().is_some_and(|n| n > MAX_IMAGE_BYTES) {
            return Err(AdapterError::Parse("image too large".into()));
        }

        let mime_type = resp
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .and_then(|v| v.parse::<mime::Mime>().ok())
            .filter(|m| m.type_() == mime::IMAGE)
            .unwrap_or(mime::IMAGE_JPEG);

        let bytes = resp.bytes()?;
        Ok((bytes.to_vec(), mime_type.essence_str().to_string()))
    }
}

/// Cache-aside image verification. Errors are never cached.
pub struct ImageVerifier {
    cache: CacheStore,
    model: Arc<dyn TextModel>,
    images: Box<dyn ImageSource>,
}

impl ImageVerifier {
    pub fn new(cache: CacheStore, model: Arc<dyn TextModel>, images: Box<dyn ImageSource>) -> Self {
        Self {
            cache,
            model,
            images,
        }
    }

    pub fn cache_key(image_url: &str) -> String {
        cache_key("image_verify", image_url)
    }

    pub fn verify(&self, image_url: &str) -> Outcome<ImageVerification> {
        let key = Self::cache_key(image_url);
        if let Some(hit) = self.cache.get_json::<ImageVerification>(&key) {
            return Outcome::Success(hit);
        }

        let analysis = self
            .images
            .fetch(image_url)
            .and_then(|(bytes, mime_type)| {
                self.model
                    .generate_with_image(&bytes, &mime_type, VERIFY_PROMPT)
            });

        match analysis {
            Ok(text) => {
                let result = ImageVerification::from_analysis(text);
                self.cache.set_json(&key, &result, VERIFICATION_TTL_MINUTES);
                Outcome::Success(result)
            }
            Err(e) => {
                tracing::warn!(image_url, error = %e, "image verification failed");
                Outcome::degraded(ImageVerification::error(), e.to_string())
            }
        }
    }
}
