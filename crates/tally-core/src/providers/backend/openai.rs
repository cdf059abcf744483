use super::QaBackend;
use anyhow::Context;
use base64::Engine;
use serde::{Deserialize, Serialize};
use serde_json::json;
use sha2::{Digest, Sha256};
use std::path::{Path, PathBuf};

/// A single image to ask questions about.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageInput {
    pub path: PathBuf,
}

impl ImageInput {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    fn read(&self) -> anyhow::Result<Vec<u8>> {
        std::fs::read(&self.path)
            .with_context(|| format!("failed to read image {}", self.path.display()))
    }
}

fn mime_for(path: &Path) -> &'static str {
    match path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .as_deref()
    {
        Some("png") => "image/png",
        Some("gif") => "image/gif",
        Some("webp") => "image/webp",
        _ => "image/jpeg",
    }
}

/// Vision-capable chat completions backend (OpenAI API or any compatible server).
pub struct OpenAiBackend {
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub temperature: f32,
    pub max_tokens: u32,
    client: reqwest::blocking::Client,
}

impl OpenAiBackend {
    pub fn new(model: String, api_key: String, temperature: f32, max_tokens: u32) -> Self {
        Self {
            model,
            api_key,
            base_url: crate::providers::OPENAI_BASE_URL.to_string(),
            temperature,
            max_tokens,
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    fn request_body(&self, data: &ImageInput, prompt: &str) -> anyhow::Result<serde_json::Value> {
        let bytes = data.read()?;
        let image_url = format!(
            "data:{};base64,{}",
            mime_for(&data.path),
            base64::engine::general_purpose::STANDARD.encode(bytes)
        );

        Ok(json!({
            "model": self.model,
            "messages": [{
                "role": "user",
                "content": [
                    { "type": "text", "text": prompt },
                    { "type": "image_url", "image_url": { "url": image_url } }
                ]
            }],
            "temperature": self.temperature,
            "max_tokens": self.max_tokens,
        }))
    }
}

impl QaBackend for OpenAiBackend {
    type Input = ImageInput;

    fn qa(&self, data: &ImageInput, prompt: &str) -> anyhow::Result<String> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = self.request_body(data, prompt)?;

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()?;

        if !resp.status().is_success() {
            let status = resp.status();
            let error_text = resp.text().unwrap_or_default();
            anyhow::bail!("OpenAI chat API error (status {}): {}", status, error_text);
        }

        let json: serde_json::Value = resp.json()?;

        // Parse choices[0].message.content
        let text = json
            .pointer("/choices/0/message/content")
            .and_then(|v| v.as_str())
            .ok_or_else(|| anyhow::anyhow!("OpenAI API response missing content"))?
            .to_string();

        Ok(text)
    }

    fn data_to_str(&self, data: &ImageInput) -> anyhow::Result<String> {
        let mut h = Sha256::new();
        h.update(data.read()?);
        Ok(format!("sha256:{}", hex::encode(h.finalize())))
    }

    fn provider_name(&self) -> &'static str {
        "openai"
    }
}
