use serde::{Deserialize, Serialize};

/// Labels the classification prompt offers the model.
pub const CATEGORIES: [&str; 7] = [
    "hate", "racism", "sexism", "abusive", "violence", "safe", "other",
];

/// The model returned no category.
pub const CATEGORY_UNKNOWN: &str = "unknown";
/// The pipeline failed before a category could be read.
pub const CATEGORY_ERROR: &str = "error";

pub const MAX_REWRITES: usize = 3;
pub const MAX_LOGGED_TEXT_CHARS: usize = 500;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub text: String,
    pub provider: String,
    pub model: String,
    #[serde(default)]
    pub meta: serde_json::Value,
}

impl LlmResponse {
    /// `(input, output)` token counts from `meta.usage`; zero when the
    /// provider did not report them.
    pub fn token_usage(&self) -> (u64, u64) {
        let usage = &self.meta["usage"];
        (
            usage["input_tokens"].as_u64().unwrap_or(0),
            usage["output_tokens"].as_u64().unwrap_or(0),
        )
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Highlight {
    pub category: String,
    pub score: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationResult {
    pub risk: f64,
    pub highlights: Vec<Highlight>,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub rewrites: Vec<String>,
    /// Reserved for rule-based pre-filter hits; never populated.
    #[serde(default)]
    pub rule_hits: Vec<String>,
}

impl EvaluationResult {
    /// The shape a failed evaluation is rendered as.
    pub fn degraded(reason: &str) -> Self {
        Self {
            risk: 0.0,
            highlights: vec![Highlight {
                category: CATEGORY_ERROR.to_string(),
                score: 0.0,
            }],
            explanation: format!("Error evaluating text: {}", reason),
            rewrites: Vec::new(),
            rule_hits: Vec::new(),
        }
    }

    pub fn categories(&self) -> Vec<&str> {
        self.highlights.iter().map(|h| h.category.as_str()).collect()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum EvaluationOutcome {
    Success(EvaluationResult),
    Failure { reason: String },
}

impl EvaluationOutcome {
    pub fn is_ok(&self) -> bool {
        matches!(self, EvaluationOutcome::Success(_))
    }

    pub fn render(&self) -> EvaluationReport {
        match self {
            EvaluationOutcome::Success(result) => EvaluationReport {
                ok: true,
                error: None,
                result: result.clone(),
            },
            EvaluationOutcome::Failure { reason } => EvaluationReport {
                ok: false,
                error: Some(reason.clone()),
                result: EvaluationResult::degraded(reason),
            },
        }
    }
}

/// Response body of `POST /evaluate`.
///
/// `ok` separates a genuine low score from a failed model call, which both
/// render with `risk == 0`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvaluationReport {
    pub ok: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(flatten)]
    pub result: EvaluationResult,
}

/// A persisted evaluation row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LogRecord {
    pub id: i64,
    pub text: String,
    pub risk: f64,
    pub categories: String,
    pub highlights: String,
    pub rewrites: String,
    pub ok: bool,
    pub text_sha256: String,
    pub created_at: String,
}

/// A row before insertion; `id` and `created_at` are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewLogRecord {
    pub text: String,
    pub risk: f64,
    pub categories: String,
    pub highlights: String,
    pub rewrites: String,
    pub ok: bool,
    pub text_sha256: String,
}

impl NewLogRecord {
    pub fn from_report(input: &str, report: &EvaluationReport) -> anyhow::Result<Self> {
        let result = &report.result;
        Ok(Self {
            text: truncate_chars(input, MAX_LOGGED_TEXT_CHARS).to_string(),
            risk: result.risk,
            categories: result.categories().join(","),
            highlights: serde_json::to_string(&result.highlights)?,
            rewrites: result.rewrites.join("|"),
            ok: report.ok,
            text_sha256: crate::fingerprint::sha256_hex(input),
        })
    }
}

/// First `max` characters of `s`, never splitting a character.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    match s.char_indices().nth(max) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
