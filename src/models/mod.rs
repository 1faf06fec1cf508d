//! Shared types used across all modules.
//!
//! This module defines the snapshot that producers consume, the
//! assessment they return, and the small enums that select providers
//! and tone. Other modules import from here rather than reaching into
//! each other's internals.

pub mod assessment;
pub mod snapshot;

use std::fmt;

use serde::{Deserialize, Serialize};

pub use assessment::{Assessment, Level, Priority, RoadmapItem, Signal};
pub use snapshot::{Commit, QualityIndicators, RepositoryMetadata, RepositorySnapshot};

/// Output tone. Selects the persona directive sent to generative
/// producers and the summary templates of the scoring engine; never
/// changes the arithmetic.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    #[default]
    Standard,
    Roast,
}

impl Persona {
    pub fn from_roast_mode(roast: bool) -> Self {
        if roast { Persona::Roast } else { Persona::Standard }
    }

    pub fn is_roast(self) -> bool {
        self == Persona::Roast
    }
}

/// Supported generative provider backends.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProviderName {
    #[default]
    Groq,
    Gemini,
    Anthropic,
    #[serde(rename = "openai")]
    OpenAI,
    /// Any OpenAI-compatible API (e.g. Ollama, Together, local servers).
    #[serde(rename = "openai-compatible")]
    OpenAICompatible,
}

impl fmt::Display for ProviderName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProviderName::Groq => write!(f, "groq"),
            ProviderName::Gemini => write!(f, "gemini"),
            ProviderName::Anthropic => write!(f, "anthropic"),
            ProviderName::OpenAI => write!(f, "openai"),
            ProviderName::OpenAICompatible => write!(f, "openai-compatible"),
        }
    }
}

impl std::str::FromStr for ProviderName {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "groq" => Ok(ProviderName::Groq),
            "gemini" => Ok(ProviderName::Gemini),
            "anthropic" => Ok(ProviderName::Anthropic),
            "openai" => Ok(ProviderName::OpenAI),
            "openai-compatible" => Ok(ProviderName::OpenAICompatible),
            other => Err(format!(
                "unsupported provider: '{other}'. Supported: groq, gemini, anthropic, \
                 openai, openai-compatible"
            )),
        }
    }
}

impl ProviderName {
    /// Returns the provider-specific environment variable name for the API key.
    ///
    /// These match the env var names used by rig-core's `from_env()` implementations.
    pub fn api_key_env_var(self) -> &'static str {
        match self {
            ProviderName::Groq => "GROQ_API_KEY",
            ProviderName::Gemini => "GEMINI_API_KEY",
            ProviderName::Anthropic => "ANTHROPIC_API_KEY",
            ProviderName::OpenAI | ProviderName::OpenAICompatible => "OPENAI_API_KEY",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn provider_name_display() {
        assert_eq!(ProviderName::Groq.to_string(), "groq");
        assert_eq!(ProviderName::Gemini.to_string(), "gemini");
        assert_eq!(ProviderName::Anthropic.to_string(), "anthropic");
        assert_eq!(ProviderName::OpenAI.to_string(), "openai");
        assert_eq!(
            ProviderName::OpenAICompatible.to_string(),
            "openai-compatible"
        );
    }

    #[test]
    fn provider_name_from_str_case_insensitive() {
        assert_eq!("GROQ".parse::<ProviderName>().unwrap(), ProviderName::Groq);
        assert_eq!(
            "Gemini".parse::<ProviderName>().unwrap(),
            ProviderName::Gemini
        );
        assert_eq!(
            "openai-compatible".parse::<ProviderName>().unwrap(),
            ProviderName::OpenAICompatible
        );
    }

    #[test]
    fn provider_name_from_str_invalid() {
        let err = "cohere".parse::<ProviderName>().unwrap_err();
        assert!(err.contains("unsupported provider"));
        assert!(err.contains("cohere"));
    }

    #[test]
    fn provider_name_api_key_env_var() {
        assert_eq!(ProviderName::Groq.api_key_env_var(), "GROQ_API_KEY");
        assert_eq!(ProviderName::Gemini.api_key_env_var(), "GEMINI_API_KEY");
        assert_eq!(
            ProviderName::OpenAICompatible.api_key_env_var(),
            "OPENAI_API_KEY"
        );
    }

    #[test]
    fn provider_name_serde_all_variants() {
        let variants = [
            (ProviderName::Groq, "\"groq\""),
            (ProviderName::Gemini, "\"gemini\""),
            (ProviderName::Anthropic, "\"anthropic\""),
            (ProviderName::OpenAI, "\"openai\""),
            (ProviderName::OpenAICompatible, "\"openai-compatible\""),
        ];
        for (variant, expected_json) in &variants {
            let json = serde_json::to_string(variant).unwrap();
            assert_eq!(&json, expected_json, "serialize failed for {variant:?}");
            let back: ProviderName = serde_json::from_str(&json).unwrap();
            assert_eq!(&back, variant, "deserialize failed for {expected_json}");
        }
    }

    #[test]
    fn persona_from_roast_mode() {
        assert_eq!(Persona::from_roast_mode(true), Persona::Roast);
        assert_eq!(Persona::from_roast_mode(false), Persona::Standard);
        assert!(Persona::Roast.is_roast());
        assert!(!Persona::default().is_roast());
    }
}
