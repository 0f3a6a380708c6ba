// src/services/gemini.rs
use base64::Engine;
use reqwest::blocking::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::services::AdapterError;

/// A hosted generative model: plain text prompts, and prompts carrying one
/// inline image.
pub trait TextModel: Send + Sync {
    fn generate_text(&self, prompt: &str) -> Result<String, AdapterError>;

    fn generate_with_image(
        &self,
        image: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<String, AdapterError>;
}

pub struct GeminiClient {
    client: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
}

#[derive(Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: Vec<Part<'a>>,
}

#[derive(Serialize)]
#[serde(untagged)]
enum Part<'a> {
    Text {
        text: &'a str,
    },
    Inline {
        inline_data: InlineData<'a>,
    },
}

#[derive(Serialize)]
struct InlineData<'a> {
    mime_type: &'a str,
    data: String,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl GeminiClient {
    pub fn new(
        base_url: impl Into<String>,
        model: impl Into<String>,
        api_key: Option<String>,
    ) -> Result<Self, AdapterError> {
        let client = Client::builder().timeout(Duration::from_secs(60)).build()?;
        Ok(Self {
            client,
            base_url: base_url.into(),
            model: model.into(),
            api_key,
        })
    }

    fn generate(&self, parts: Vec<Part<'_>>) -> Result<String, AdapterError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or_else(|| AdapterError::NotConfigured("GEMINI_API_KEY is not set".into()))?;

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        );
        let body = GenerateRequest {
            contents: vec![Content { parts }],
        };

        let resp = self
            .client
            .post(url)
            .query(&[("key", api_key)])
            .json(&body)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(AdapterError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: GenerateResponse = resp
            .json()
            .map_err(|e| AdapterError::Parse(e.to_string()))?;
        extract_text(parsed)
    }
}

fn extract_text(resp: GenerateResponse) -> Result<String, AdapterError> {
    let text: String = resp
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    if text.trim().is_empty() {
        return Err(AdapterError::Parse("model returned no text".into()));
    }
    Ok(text)
}

impl TextModel for GeminiClient {
    fn generate_text(&self, prompt: &str) -> Result<String, AdapterError> {
        self.generate(vec![Part::Text { text: prompt }])
    }

    fn generate_with_image(
        &self,
        image: &[u8],
        mime_type: &str,
        prompt: &str,
    ) -> Result<String, AdapterError> {
        let data = base64::engine::general_purpose::STANDARD.encode(image);
        self.generate(vec![
            Part::Inline {
                inline_data: InlineData { mime_type, data },
            },
            Part::Text { text: prompt },
        ])
    }
}
