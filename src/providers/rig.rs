//! rig-core integration for LLM-backed assessments.
//!
//! Uses rig-core's provider clients and Agent abstraction for
//! multi-provider support. Currently supports: Groq, Gemini, Anthropic,
//! OpenAI, and any OpenAI-compatible API.

use async_trait::async_trait;
use rig::client::CompletionClient;
use rig::completion::Prompt;
use rig::providers;

use crate::models::{Assessment, Persona, ProviderName, RepositorySnapshot};

use super::prompt::{build_prompt, persona_directive};
use super::{AssessmentProvider, ProviderError};

/// Maximum tokens per completion response.
const MAX_TOKENS: u64 = 8192;

/// Sampling temperature. Some variety in the prose is wanted.
const TEMPERATURE: f64 = 0.7;

/// Build a single-shot agent from a rig-core client and prompt it.
///
/// `output_schema` asks providers that support structured output to
/// return JSON matching [`Assessment`]; the orchestrator still validates.
macro_rules! prompt_once {
    ($client:expr, $model:expr, $system:expr, $user:expr, $label:expr) => {{
        let agent = $client
            .agent($model)
            .preamble($system)
            .temperature(TEMPERATURE)
            .max_tokens(MAX_TOKENS)
            .output_schema::<Assessment>()
            .build();
        agent
            .prompt($user)
            .await
            .map_err(|e| ProviderError::ApiError(format!("{} API error: {e}", $label)))
    }};
}

/// Create a rig-core client using the `Client::new(api_key)` convention.
macro_rules! new_client {
    ($provider_mod:path, $api_key:expr, $label:expr) => {{
        <$provider_mod>::new($api_key).map_err(|e| {
            ProviderError::ApiError(format!("failed to create {} client: {e}", $label))
        })
    }};
}

/// rig-core based generative producer for one provider.
///
/// The model is chosen per call so a single instance serves every model
/// configured for its provider.
pub struct RigProvider {
    name: ProviderName,
    api_key: String,
    base_url: Option<String>,
}

impl std::fmt::Debug for RigProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RigProvider")
            .field("name", &self.name)
            .field("api_key", &"[REDACTED]")
            .field("base_url", &self.base_url)
            .finish()
    }
}

impl RigProvider {
    /// Create a provider. Fails when no API key is available.
    pub fn new(
        name: ProviderName,
        api_key: Option<String>,
        base_url: Option<String>,
    ) -> Result<Self, ProviderError> {
        let api_key = api_key.filter(|k| !k.trim().is_empty()).ok_or_else(|| {
            ProviderError::NotConfigured(format!(
                "no API key found for provider '{name}'. Set {} or api_key in [[producers]].",
                name.api_key_env_var()
            ))
        })?;
        Ok(Self {
            name,
            api_key,
            base_url,
        })
    }

    pub fn name(&self) -> ProviderName {
        self.name
    }

    /// Require `base_url` for OpenAI-compatible providers.
    fn require_base_url(&self) -> Result<&str, ProviderError> {
        self.base_url.as_deref().ok_or_else(|| {
            ProviderError::NotConfigured(
                "openai-compatible provider requires base_url to be set".to_string(),
            )
        })
    }

    /// Build an OpenAI-style client, optionally with a custom base URL.
    fn build_openai_client(
        &self,
        base_url: Option<&str>,
        label: &str,
    ) -> Result<providers::openai::CompletionsClient, ProviderError> {
        let mut builder = providers::openai::CompletionsClient::builder().api_key(&self.api_key);
        if let Some(base_url) = base_url {
            builder = builder.base_url(base_url);
        }
        builder
            .build()
            .map_err(|e| ProviderError::ApiError(format!("failed to create {label} client: {e}")))
    }

    /// Make a completion call through rig-core and return the raw response text.
    async fn call_rig(
        &self,
        model: &str,
        system_prompt: &str,
        user_prompt: &str,
    ) -> Result<String, ProviderError> {
        let api_key = self.api_key.as_str();

        match self.name {
            ProviderName::Groq => {
                let client = new_client!(providers::groq::Client, api_key, "Groq")?;
                prompt_once!(client, model, system_prompt, user_prompt, "Groq")
            }
            ProviderName::Gemini => {
                let client = new_client!(providers::gemini::Client, api_key, "Gemini")?;
                prompt_once!(client, model, system_prompt, user_prompt, "Gemini")
            }
            ProviderName::Anthropic => {
                let client: providers::anthropic::Client = providers::anthropic::Client::builder()
                    .api_key(api_key)
                    .build()
                    .map_err(|e| {
                        ProviderError::ApiError(format!("failed to create Anthropic client: {e}"))
                    })?;
                prompt_once!(client, model, system_prompt, user_prompt, "Anthropic")
            }
            ProviderName::OpenAI => {
                let client = self.build_openai_client(self.base_url.as_deref(), "OpenAI")?;
                prompt_once!(client, model, system_prompt, user_prompt, "OpenAI")
            }
            ProviderName::OpenAICompatible => {
                let base_url = self.require_base_url()?;
                let client = self.build_openai_client(Some(base_url), "OpenAI-compatible")?;
                prompt_once!(
                    client,
                    model,
                    system_prompt,
                    user_prompt,
                    "OpenAI-compatible"
                )
            }
        }
    }
}

#[async_trait]
impl AssessmentProvider for RigProvider {
    async fn generate(
        &self,
        model: &str,
        snapshot: &RepositorySnapshot,
        persona: Persona,
    ) -> Result<String, ProviderError> {
        let user_prompt = build_prompt(snapshot);
        self.call_rig(model, persona_directive(persona), &user_prompt)
            .await
    }
}
