use crate::model::LlmResponse;
use async_trait::async_trait;

/// A text-completion backend. Implementations are shared across requests
/// behind an `Arc` and must not hold per-request state.
#[async_trait]
pub trait LlmClient: Send + Sync {
    async fn complete(&self, prompt: &str) -> anyhow::Result<LlmResponse>;
    fn provider_name(&self) -> &'static str;
}

pub mod fake;
pub mod gemini;
