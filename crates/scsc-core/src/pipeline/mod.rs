use crate::fingerprint::short_digest;
use crate::model::EvaluationOutcome;
use crate::providers::llm::LlmClient;
use std::sync::Arc;
use std::time::Instant;

pub mod assemble;
pub mod extract;
pub mod prompts;

use self::extract::{extract_json, ExtractMode};

/// Classification plus rewrite, each against its own model client.
#[derive(Clone)]
pub struct EvaluationPipeline {
    classifier: Arc<dyn LlmClient>,
    rewriter: Arc<dyn LlmClient>,
    extract_mode: ExtractMode,
}

impl EvaluationPipeline {
    pub fn new(
        classifier: Arc<dyn LlmClient>,
        rewriter: Arc<dyn LlmClient>,
        extract_mode: ExtractMode,
    ) -> Self {
        Self {
            classifier,
            rewriter,
            extract_mode,
        }
    }

    /// Runs both model calls concurrently and joins them. Never fails: any
    /// client error becomes `EvaluationOutcome::Failure`.
    pub async fn evaluate(&self, text: &str) -> EvaluationOutcome {
        let started = Instant::now();
        let digest = short_digest(text);

        let clf_prompt = prompts::classification_prompt(text);
        let rw_prompt = prompts::rewrite_prompt(text);

        let (clf, rw) = tokio::join!(
            self.classifier.complete(&clf_prompt),
            self.rewriter.complete(&rw_prompt)
        );

        let (clf, rw) = match (clf, rw) {
            (Ok(clf), Ok(rw)) => (clf, rw),
            (Err(e), _) | (_, Err(e)) => {
                tracing::warn!(
                    event = "scsc.pipeline.model_error",
                    text_digest = %digest,
                    error = %e,
                    duration_ms = started.elapsed().as_millis() as u64,
                    "model call failed: {}", e
                );
                return EvaluationOutcome::Failure {
                    reason: e.to_string(),
                };
            }
        };

        let clf_json = extract_json(&clf.text, self.extract_mode);
        let rw_json = extract_json(&rw.text, self.extract_mode);

        if clf_json.is_empty() || rw_json.is_empty() {
            tracing::warn!(
                event = "scsc.pipeline.unparsed_completion",
                text_digest = %digest,
                classification_parsed = !clf_json.is_empty(),
                rewrite_parsed = !rw_json.is_empty(),
                extract_mode = ?self.extract_mode,
            );
        }

        let result = assemble::assemble(&clf_json, &rw_json);
        let (clf_in, clf_out) = clf.token_usage();
        let (rw_in, rw_out) = rw.token_usage();

        tracing::info!(
            event = "scsc.pipeline.evaluated",
            text_digest = %digest,
            text_chars = text.chars().count(),
            risk = result.risk,
            category = %result.highlights.first().map(|h| h.category.as_str()).unwrap_or(""),
            rewrites = result.rewrites.len(),
            provider = %clf.provider,
            model = %clf.model,
            input_tokens = clf_in + rw_in,
            output_tokens = clf_out + rw_out,
            duration_ms = started.elapsed().as_millis() as u64,
        );

        EvaluationOutcome::Success(result)
    }
}
