//! Parsing and structural validation of generative responses.
//!
//! A payload is accepted only when it deserializes into a complete
//! [`Assessment`]: every field present, `level` and `priority` inside
//! their enumerations. Anything else is a [`ProviderError::ParseError`].

use crate::models::Assessment;

use super::ProviderError;

/// Maximum length of response text to include in parse error messages.
const PARSE_ERROR_PREVIEW_LEN: usize = 500;

/// Wrapper keys some models nest the assessment under.
const WRAPPER_KEYS: &[&str] = &["analysis", "assessment", "result"];

/// Parse a raw producer payload into a validated assessment.
///
/// The level is normalised to the score after parsing.
pub fn parse_assessment(response: &str) -> Result<Assessment, ProviderError> {
    let trimmed = response.trim();
    if trimmed.is_empty() {
        return Err(ProviderError::ParseError("empty response".to_string()));
    }

    let mut last_error = None;
    for candidate in extract_json_candidates(trimmed) {
        match serde_json::from_str::<Assessment>(&candidate) {
            Ok(mut assessment) => {
                assessment.normalize_level();
                return Ok(assessment);
            }
            Err(e) => last_error = Some(e.to_string()),
        }

        if let Ok(value) = serde_json::from_str::<serde_json::Value>(&candidate) {
            for key in WRAPPER_KEYS {
                if let Some(inner) = value.get(key) {
                    if let Ok(mut assessment) = serde_json::from_value::<Assessment>(inner.clone()) {
                        assessment.normalize_level();
                        return Ok(assessment);
                    }
                }
            }
        }
    }

    let preview: String = response.chars().take(PARSE_ERROR_PREVIEW_LEN).collect();
    Err(ProviderError::ParseError(format!(
        "could not parse response as an assessment ({}). Response: {preview}",
        last_error.unwrap_or_else(|| "no JSON found".to_string())
    )))
}

/// Regex for extracting content inside markdown code fences.
///
/// The closing fence must start a line so that triple backticks inside
/// JSON string values do not end the match early.
static FENCE_RE: std::sync::LazyLock<regex::Regex> = std::sync::LazyLock::new(|| {
    regex::Regex::new(r"(?s)```(?:json)?\s*\n(.*?)\n```").expect("fence regex is valid")
});

/// Candidate JSON strings: the raw text, the outermost `{...}` slice,
/// and the contents of any markdown code fences.
fn extract_json_candidates(text: &str) -> Vec<String> {
    let mut candidates = vec![text.to_string()];

    if let (Some(start), Some(end)) = (text.find('{'), text.rfind('}')) {
        if start < end {
            let slice = &text[start..=end];
            if slice != text {
                candidates.push(slice.to_string());
            }
        }
    }

    for cap in FENCE_RE.captures_iter(text) {
        if let Some(inner) = cap.get(1) {
            let inner_trimmed = inner.as_str().trim();
            if !inner_trimmed.is_empty() {
                candidates.push(inner_trimmed.to_string());
            }
        }
    }

    candidates
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Level, Priority};

    const VALID: &str = r#"{
        "score": 78,
        "level": "Pro",
        "summary": "Clean and tested.",
        "strengths": ["Good tests"],
        "weaknesses": ["Sparse docs"],
        "roadmap": [
            { "title": "Docs", "description": "Write a guide", "priority": "Medium" }
        ]
    }"#;

    #[test]
    fn parse_plain_json() {
        let a = parse_assessment(VALID).unwrap();
        assert_eq!(a.score, 78);
        assert_eq!(a.level, Level::Pro);
        assert_eq!(a.roadmap[0].priority, Priority::Medium);
    }

    #[test]
    fn parse_fenced_json() {
        let response = format!("Here you go:\n```json\n{VALID}\n```\n");
        assert_eq!(parse_assessment(&response).unwrap().score, 78);
    }

    #[test]
    fn parse_json_embedded_in_prose() {
        let response = format!("My verdict: {VALID} Hope that helps.");
        assert_eq!(parse_assessment(&response).unwrap().score, 78);
    }

    #[test]
    fn parse_wrapped_json() {
        let response = format!(r#"{{"analysis": {VALID}}}"#);
        assert_eq!(parse_assessment(&response).unwrap().score, 78);
    }

    #[test]
    fn level_is_normalised_to_score() {
        let response = VALID.replace("\"Pro\"", "\"elite\"");
        assert_eq!(parse_assessment(&response).unwrap().level, Level::Pro);
    }

    #[test]
    fn missing_roadmap_is_rejected() {
        let response = r#"{"score": 50, "level": "Intermediate", "summary": "ok",
            "strengths": [], "weaknesses": []}"#;
        let err = parse_assessment(response).unwrap_err();
        assert!(matches!(err, ProviderError::ParseError(_)));
        assert!(err.to_string().contains("roadmap"));
    }

    #[test]
    fn invalid_priority_is_rejected() {
        let response = VALID.replace("\"Medium\"", "\"Whenever\"");
        assert!(parse_assessment(&response).is_err());
    }

    #[test]
    fn empty_and_prose_responses_are_rejected() {
        assert!(parse_assessment("").is_err());
        assert!(parse_assessment("   \n").is_err());
        let err = parse_assessment("I cannot grade this repository.").unwrap_err();
        assert!(err.to_string().contains("could not parse"));
    }

    #[test]
    fn candidates_start_with_raw_text() {
        let candidates = extract_json_candidates("no json here");
        assert_eq!(candidates, vec!["no json here".to_string()]);
    }
}
