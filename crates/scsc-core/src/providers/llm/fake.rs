use super::LlmClient;
use crate::model::LlmResponse;
use async_trait::async_trait;
use std::sync::Mutex;

#[derive(Debug, Clone)]
enum Reply {
    Text(String),
    Fail(String),
}

/// Client with a canned reply, for tests and offline runs.
pub struct FakeClient {
    model: String,
    reply: Reply,
    usage: Option<(u64, u64)>,
    prompts: Mutex<Vec<String>>,
}

impl FakeClient {
    pub fn replying(model: &str, text: impl Into<String>) -> Self {
        Self {
            model: model.to_string(),
            reply: Reply::Text(text.into()),
            usage: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn failing(model: &str, message: impl Into<String>) -> Self {
        Self {
            model: model.to_string(),
            reply: Reply::Fail(message.into()),
            usage: None,
            prompts: Mutex::new(Vec::new()),
        }
    }

    /// Reports the given token counts with every reply.
    pub fn with_usage(mut self, input_tokens: u64, output_tokens: u64) -> Self {
        self.usage = Some((input_tokens, output_tokens));
        self
    }

    /// Prompts received so far, oldest first.
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for FakeClient {
    async fn complete(&self, prompt: &str) -> anyhow::Result<LlmResponse> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        match &self.reply {
            Reply::Text(text) => Ok(LlmResponse {
                text: text.clone(),
                provider: self.provider_name().to_string(),
                model: self.model.clone(),
                meta: match self.usage {
                    Some((input, output)) => serde_json::json!({
                        "fake": true,
                        "usage": { "input_tokens": input, "output_tokens": output },
                    }),
                    None => serde_json::json!({"fake": true}),
                },
            }),
            Reply::Fail(message) => anyhow::bail!("{}", message),
        }
    }

    fn provider_name(&self) -> &'static str {
        "fake"
    }
}
