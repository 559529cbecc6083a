use super::extract::JsonObject;
use crate::model::{EvaluationResult, Highlight, CATEGORY_UNKNOWN, MAX_REWRITES};
use serde_json::Value;

/// Builds the result from the two parsed completions, defaulting every
/// missing or mistyped field.
pub fn assemble(classification: &JsonObject, rewrites: &JsonObject) -> EvaluationResult {
    let score = read_score(classification.get("score"));

    let category = match classification.get("category") {
        Some(Value::String(s)) if !s.trim().is_empty() => s.trim().to_string(),
        _ => CATEGORY_UNKNOWN.to_string(),
    };

    let explanation = classification
        .get("explanation")
        .and_then(|v| v.as_str())
        .unwrap_or_default()
        .to_string();

    let rewrites = rewrites
        .get("rewrites")
        .and_then(|v| v.as_array())
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .take(MAX_REWRITES)
                .map(str::to_string)
                .collect()
        })
        .unwrap_or_default();

    EvaluationResult {
        risk: score,
        highlights: vec![Highlight { category, score }],
        explanation,
        rewrites,
        rule_hits: Vec::new(),
    }
}

/// Numbers and numeric strings, clamped to `[0, 100]`; anything else is 0.
fn read_score(v: Option<&Value>) -> f64 {
    let raw = match v {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match raw {
        Some(x) if x.is_finite() => x.clamp(0.0, 100.0),
        _ => 0.0,
    }
}
