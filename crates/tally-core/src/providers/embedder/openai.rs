use super::Embedder;
use serde_json::json;

pub struct OpenAiEmbedder {
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    client: reqwest::blocking::Client,
}

impl OpenAiEmbedder {
    pub fn new(model: String, api_key: String) -> Self {
        Self {
            model,
            api_key,
            base_url: crate::providers::OPENAI_BASE_URL.to_string(),
            client: reqwest::blocking::Client::new(),
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }
}

/// Pull `data[i].embedding` out of an embeddings response, ordered by `index`.
fn parse_embeddings(json: &serde_json::Value, expected: usize) -> anyhow::Result<Vec<Vec<f32>>> {
    let data = json
        .get("data")
        .and_then(|v| v.as_array())
        .ok_or_else(|| anyhow::anyhow!("OpenAI API response missing data field"))?;

    let mut out: Vec<Option<Vec<f32>>> = vec![None; expected];
    for (pos, item) in data.iter().enumerate() {
        let index = item
            .get("index")
            .and_then(|v| v.as_u64())
            .map(|i| i as usize)
            .unwrap_or(pos);
        let vec = item
            .get("embedding")
            .and_then(|v| v.as_array())
            .ok_or_else(|| anyhow::anyhow!("OpenAI API response missing embedding field"))?;
        let floats = vec
            .iter()
            .map(|x| {
                x.as_f64()
                    .map(|f| f as f32)
                    .ok_or_else(|| anyhow::anyhow!("embedding contains non-numeric value"))
            })
            .collect::<anyhow::Result<Vec<f32>>>()?;
        let slot = out
            .get_mut(index)
            .ok_or_else(|| anyhow::anyhow!("embedding index {} out of range", index))?;
        *slot = Some(floats);
    }

    out.into_iter()
        .enumerate()
        .map(|(i, v)| v.ok_or_else(|| anyhow::anyhow!("missing embedding for input {}", i)))
        .collect()
}

impl Embedder for OpenAiEmbedder {
    fn encode(&self, texts: &[&str]) -> anyhow::Result<Vec<Vec<f32>>> {
        let url = format!("{}/embeddings", self.base_url);
        let body = json!({
            "input": texts,
            "model": self.model,
            "encoding_format": "float"
        });

        let resp = self
            .client
            .post(&url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&body)
            .send()?;

        if !resp.status().is_success() {
            let error_text = resp.text().unwrap_or_default();
            anyhow::bail!("OpenAI embeddings API error: {}", error_text);
        }

        let json: serde_json::Value = resp.json()?;
        parse_embeddings(&json, texts.len())
    }

    fn name(&self) -> &'static str {
        "openai"
    }

    fn model_id(&self) -> String {
        self.model.clone()
    }
}
