use anyhow::Result;
use base64::{engine::general_purpose, Engine};
use serde::{Deserialize, Serialize};

use crate::config::GeminiConfig;

/// Vision-capable text generation: answers a prompt about an image.
#[async_trait::async_trait]
pub trait VisionService: Send + Sync {
    async fn describe_image(&self, prompt: &str, image: &[u8], mime_type: &str) -> Result<String>;
}

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize)]
struct Content {
    parts: Vec<RequestPart>,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
enum RequestPart {
    Text { text: String },
    InlineData { inline_data: InlineData },
}

#[derive(Debug, Serialize)]
struct InlineData {
    mime_type: String,
    data: String,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

/// Google Gemini `generateContent` REST client
pub struct GeminiService {
    api_key: String,
    model: String,
    base_url: String,
    client: reqwest::Client,
}

impl GeminiService {
    /// Returns `None` when no API key is configured.
    pub fn from_config(config: &GeminiConfig) -> Option<Self> {
        let api_key = config.api_key.clone()?;
        Some(Self::new(api_key, config.model.clone(), config.base_url.clone()))
    }

    pub fn new(api_key: String, model: String, base_url: String) -> Self {
        Self {
            api_key,
            model,
            base_url,
            client: reqwest::Client::new(),
        }
    }
}

#[async_trait::async_trait]
impl VisionService for GeminiService {
    async fn describe_image(&self, prompt: &str, image: &[u8], mime_type: &str) -> Result<String> {
        log::debug!("📸 Image size: {} bytes ({})", image.len(), mime_type);

        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![
                    RequestPart::Text {
                        text: prompt.to_string(),
                    },
                    RequestPart::InlineData {
                        inline_data: InlineData {
                            mime_type: mime_type.to_string(),
                            data: general_purpose::STANDARD.encode(image),
                        },
                    },
                ],
            }],
        };

        let url = format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        );

        log::info!("🤖 Sending request to Gemini with model: {}", self.model);

        let response = self
            .client
            .post(&url)
            .query(&[("key", &self.api_key)])
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await?;

        log::debug!("📥 Gemini response status: {}", response.status());

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response.text().await?;
            log::error!("❌ Gemini API error response: {}", error_text);
            anyhow::bail!("Gemini API error ({}): {}", status, error_text);
        }

        let generated: GenerateResponse = response.json().await?;

        let text: String = generated
            .candidates
            .into_iter()
            .next()
            .and_then(|candidate| candidate.content)
            .map(|content| {
                content
                    .parts
                    .into_iter()
                    .filter_map(|part| part.text)
                    .collect()
            })
            .unwrap_or_default();

        if text.trim().is_empty() {
            anyhow::bail!("Gemini returned no text");
        }

        log::info!("💬 Gemini response content: {}", text.trim());
        Ok(text)
    }
}
