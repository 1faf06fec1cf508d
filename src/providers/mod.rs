//! AssessmentProvider trait and LLM integration.
//!
//! Provides an abstraction layer over rig-core so the orchestrator can
//! treat every generative producer the same way: hand it a snapshot and
//! a persona, get back raw text or a failure. Parsing and validation of
//! that text belong to [`parse`], not to the provider.

pub mod parse;
pub mod prompt;
pub mod rig;

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;

use crate::models::{Persona, RepositorySnapshot};

/// Errors from a generative producer.
#[derive(Error, Debug)]
pub enum ProviderError {
    #[error("LLM API error: {0}")]
    ApiError(String),

    #[error("failed to parse LLM response: {0}")]
    ParseError(String),

    #[error("provider not configured: {0}")]
    NotConfigured(String),

    #[error("attempt timed out after {0:?}")]
    Timeout(Duration),
}

/// A generative producer of assessments.
///
/// Implementations build the provider-specific request from the snapshot
/// and the persona directive and return the raw response payload.
#[async_trait]
pub trait AssessmentProvider: Send + Sync {
    /// Request an assessment from `model` and return the raw response text.
    async fn generate(
        &self,
        model: &str,
        snapshot: &RepositorySnapshot,
        persona: Persona,
    ) -> Result<String, ProviderError>;
}

/// Classifies a provider error into a short, user-friendly message.
///
/// Returns `None` when the error does not match a known category.
pub fn classify_error(err: &ProviderError) -> Option<&'static str> {
    match err {
        ProviderError::ApiError(msg) => {
            let msg_lower = msg.to_lowercase();
            if msg_lower.contains("429")
                || msg_lower.contains("rate limit")
                || msg_lower.contains("too many requests")
                || msg_lower.contains("quota")
            {
                Some("Rate limited by API")
            } else if msg_lower.contains("503")
                || msg_lower.contains("service unavailable")
                || msg_lower.contains("high demand")
            {
                Some("High model load")
            } else if msg_lower.contains("529") || msg_lower.contains("overloaded") {
                Some("API overloaded")
            } else if msg_lower.contains("404") || msg_lower.contains("not found") {
                Some("Model not available")
            } else if msg_lower.contains("401") || msg_lower.contains("unauthorized") {
                Some("Invalid credentials")
            } else if msg_lower.contains("timeout") || msg_lower.contains("timed out") {
                Some("Request timed out")
            } else if msg_lower.contains("connection") {
                Some("Connection error")
            } else {
                None
            }
        }
        ProviderError::ParseError(_) => Some("Malformed assessment payload"),
        ProviderError::NotConfigured(_) => Some("Provider not configured"),
        ProviderError::Timeout(_) => Some("Request timed out"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn classify_rate_limit_and_quota() {
        let err = ProviderError::ApiError("Groq API error: 429 Too Many Requests".into());
        assert_eq!(classify_error(&err), Some("Rate limited by API"));
        let err = ProviderError::ApiError("Gemini API error: quota exceeded".into());
        assert_eq!(classify_error(&err), Some("Rate limited by API"));
    }

    #[test]
    fn classify_overload_and_unavailable() {
        let err = ProviderError::ApiError("HTTP 503 Service Unavailable".into());
        assert_eq!(classify_error(&err), Some("High model load"));
        let err = ProviderError::ApiError("Anthropic API error: overloaded".into());
        assert_eq!(classify_error(&err), Some("API overloaded"));
    }

    #[test]
    fn classify_missing_model() {
        let err = ProviderError::ApiError("model gemini-1.0-pro not found (404)".into());
        assert_eq!(classify_error(&err), Some("Model not available"));
    }

    #[test]
    fn classify_connection_and_timeout() {
        let err = ProviderError::ApiError("connection refused".into());
        assert_eq!(classify_error(&err), Some("Connection error"));
        assert_eq!(
            classify_error(&ProviderError::Timeout(Duration::from_secs(20))),
            Some("Request timed out")
        );
    }

    #[test]
    fn timeout_message_keeps_sub_second_precision() {
        let err = ProviderError::Timeout(Duration::from_millis(50));
        assert_eq!(err.to_string(), "attempt timed out after 50ms");
    }

    #[test]
    fn classify_unknown_is_none() {
        let err = ProviderError::ApiError("something odd".into());
        assert_eq!(classify_error(&err), None);
    }

    #[test]
    fn classify_parse_and_configuration() {
        assert_eq!(
            classify_error(&ProviderError::ParseError("bad".into())),
            Some("Malformed assessment payload")
        );
        assert_eq!(
            classify_error(&ProviderError::NotConfigured("no key".into())),
            Some("Provider not configured")
        );
    }
}
