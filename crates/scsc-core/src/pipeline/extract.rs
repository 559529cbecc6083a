//! Best-effort recovery of a JSON object from a chatty completion.
//!
//! Models often wrap the requested object in a preamble, markdown fences or
//! trailing commentary. Extraction never fails: when no object can be
//! recovered the result is an empty map and callers fall back to defaults.

use serde_json::{Map, Value};
use std::str::FromStr;

pub type JsonObject = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ExtractMode {
    /// Whole text, then the slice from the first `{` to the last `}`.
    ///
    /// Text with several objects (`{"a":1}{"b":2}`) slices to something
    /// that is not JSON and yields an empty map.
    #[default]
    Span,
    /// Whole text, then the first balanced `{...}` span, then `Span`.
    Balanced,
}

impl FromStr for ExtractMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "span" => Ok(ExtractMode::Span),
            "balanced" => Ok(ExtractMode::Balanced),
            other => Err(format!("unknown extractor '{}' (expected span|balanced)", other)),
        }
    }
}

pub fn extract_json(text: &str, mode: ExtractMode) -> JsonObject {
    if let Some(obj) = parse_object(text) {
        return obj;
    }

    if mode == ExtractMode::Balanced {
        if let Some(obj) = first_balanced_span(text).and_then(parse_object) {
            return obj;
        }
    }

    outer_span(text).and_then(parse_object).unwrap_or_default()
}

fn parse_object(s: &str) -> Option<JsonObject> {
    match serde_json::from_str::<Value>(s) {
        Ok(Value::Object(obj)) => Some(obj),
        _ => None,
    }
}

fn outer_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end < start {
        return None;
    }
    Some(&text[start..=end])
}

/// First `{...}` whose braces balance, skipping braces inside string literals.
fn first_balanced_span(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    return Some(&text[start..=start + offset]);
                }
            }
            _ => {}
        }
    }
    None
}
