use crate::model::CATEGORIES;

pub fn classification_prompt(text: &str) -> String {
    let labels = CATEGORIES
        .iter()
        .map(|c| format!("\"{}\"", c))
        .collect::<Vec<_>>()
        .join(" | ");

    format!(
        r#"You are a socio-cultural sensitivity classifier.

Analyze the following text and classify it for:
- hate speech
- racism
- sexism
- abusive content
- discrimination
- violence
- or safe content

TEXT:
"{text}"

Return STRICT JSON ONLY:
{{
 "score": number between 0-100,
 "category": {labels},
 "explanation": "short explanation"
}}
"#
    )
}

pub fn rewrite_prompt(text: &str) -> String {
    format!(
        r#"Rewrite the following text into 3 culturally safe, neutral, respectful versions:

TEXT:
"{text}"

Return STRICT JSON ONLY:
{{
  "rewrites": ["rewrite1", "rewrite2", "rewrite3"]
}}
"#
    )
}
