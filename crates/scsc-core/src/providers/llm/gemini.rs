use super::LlmClient;
use crate::model::LlmResponse;
use async_trait::async_trait;
use serde_json::json;
use std::time::Duration;

pub struct GeminiClient {
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub client: reqwest::Client,
}

impl GeminiClient {
    pub fn new(
        model: String,
        api_key: String,
        base_url: String,
        timeout: Duration,
    ) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            model,
            api_key,
            base_url,
            client,
        })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url.trim_end_matches('/'),
            self.model
        )
    }
}

#[async_trait]
impl LlmClient for GeminiClient {
    async fn complete(&self, prompt: &str) -> anyhow::Result<LlmResponse> {
        let body = json!({
            "contents": [{
                "role": "user",
                "parts": [{ "text": prompt }]
            }]
        });

        let resp = self
            .client
            .post(self.endpoint())
            .header("x-goog-api-key", &self.api_key)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let error_text = resp.text().await.unwrap_or_default();
            anyhow::bail!("Gemini generateContent error ({}): {}", status, error_text);
        }

        let json: serde_json::Value = resp.json().await?;
        let text = completion_text(&json)?;

        let mut meta = json!({});
        if let Some(usage) = json.get("usageMetadata") {
            meta["usage"] = json!({
                "input_tokens": usage.get("promptTokenCount"),
                "output_tokens": usage.get("candidatesTokenCount"),
            });
        }

        Ok(LlmResponse {
            text,
            provider: "gemini".to_string(),
            model: self.model.clone(),
            meta,
        })
    }

    fn provider_name(&self) -> &'static str {
        "gemini"
    }
}

/// Concatenates `candidates[0].content.parts[*].text`.
fn completion_text(json: &serde_json::Value) -> anyhow::Result<String> {
    let parts = json
        .pointer("/candidates/0/content/parts")
        .and_then(|v| v.as_array());

    let text: String = parts
        .into_iter()
        .flatten()
        .filter_map(|p| p.get("text").and_then(|t| t.as_str()))
        .collect();

    if !text.is_empty() {
        return Ok(text);
    }

    if let Some(reason) = json
        .pointer("/promptFeedback/blockReason")
        .and_then(|v| v.as_str())
    {
        anyhow::bail!("Gemini blocked the prompt: {}", reason);
    }

    anyhow::bail!("Gemini API response missing content")
}
