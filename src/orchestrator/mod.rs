//! Assessment orchestrator: ordered producer chain with engine fallback.
//!
//! Producers are tried one at a time in configured order. Each attempt is
//! bounded by a timeout and its payload must parse into a complete
//! [`Assessment`]. The first success wins; when every producer fails (or
//! none is configured) the deterministic engine answers instead, so
//! [`AssessmentOrchestrator::run`] never returns an error.

use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::engine;
use crate::models::{Assessment, Persona, ProviderName, RepositorySnapshot};
use crate::providers::parse::parse_assessment;
use crate::providers::rig::RigProvider;
use crate::providers::{AssessmentProvider, ProviderError, classify_error};

/// Phrases that older fallback summaries carried instead of an explicit flag.
pub const FALLBACK_SENTINELS: &[&str] = &[
    "AI APIs are down",
    "API quota exceeded",
    "coffee break",
    "Heuristic analysis",
];

/// One entry of the producer chain: a backend bound to a single model.
#[derive(Clone)]
pub struct Producer {
    pub provider: ProviderName,
    pub model: String,
    pub backend: Arc<dyn AssessmentProvider>,
}

impl Producer {
    pub fn new(
        provider: ProviderName,
        model: impl Into<String>,
        backend: Arc<dyn AssessmentProvider>,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            backend,
        }
    }

    /// `provider/model`, as reported in [`AnalysisOutcome::producer`].
    pub fn label(&self) -> String {
        format!("{}/{}", self.provider, self.model)
    }
}

impl std::fmt::Debug for Producer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Producer")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .finish_non_exhaustive()
    }
}

/// The assessment handed back to callers, plus where it came from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisOutcome {
    #[serde(flatten)]
    pub assessment: Assessment,
    /// `true` when the deterministic engine produced the assessment.
    pub using_fallback: bool,
    /// `provider/model` of the generative producer that succeeded.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub producer: Option<String>,
}

impl AnalysisOutcome {
    /// Whether the summary reads like a fallback result.
    ///
    /// Only for consumers of payloads that predate `usingFallback`; the
    /// flag itself is authoritative.
    pub fn legacy_fallback_hint(&self) -> bool {
        FALLBACK_SENTINELS
            .iter()
            .any(|sentinel| self.assessment.summary.contains(sentinel))
    }
}

/// Runs the producer chain for one snapshot.
pub struct AssessmentOrchestrator {
    producers: Vec<Producer>,
    attempt_timeout: Duration,
}

impl AssessmentOrchestrator {
    pub fn new(producers: Vec<Producer>, attempt_timeout: Duration) -> Self {
        Self {
            producers,
            attempt_timeout,
        }
    }

    /// An orchestrator with no generative producers. Every run uses the engine.
    pub fn offline() -> Self {
        Self::new(Vec::new(), Duration::ZERO)
    }

    pub fn producers(&self) -> &[Producer] {
        &self.producers
    }

    /// Produce an assessment. Total: producer failures only move the chain along.
    pub async fn run(&self, snapshot: &RepositorySnapshot, persona: Persona) -> AnalysisOutcome {
        let mut attempted = HashSet::new();
        for producer in &self.producers {
            if !attempted.insert((producer.provider, producer.model.as_str())) {
                debug!(producer = %producer.label(), "pair already attempted, skipping");
                continue;
            }
            match self.attempt(producer, snapshot, persona).await {
                Ok(mut assessment) => {
                    info!(producer = %producer.label(), score = assessment.score, "assessment produced");
                    assessment.normalize_level();
                    assessment.signals = engine::signals_for(snapshot);
                    return AnalysisOutcome {
                        assessment,
                        using_fallback: false,
                        producer: Some(producer.label()),
                    };
                }
                Err(e) => {
                    let reason = classify_error(&e).unwrap_or("Unexpected error");
                    warn!(
                        provider = %producer.provider,
                        model = %producer.model,
                        reason,
                        error = %e,
                        "producer failed, trying next"
                    );
                }
            }
        }

        if self.producers.is_empty() {
            debug!("no generative producers configured, using scoring engine");
        } else {
            warn!(
                attempts = self.producers.len(),
                "all producers failed, using scoring engine"
            );
        }

        AnalysisOutcome {
            assessment: engine::assess(snapshot, persona),
            using_fallback: true,
            producer: None,
        }
    }

    /// One bounded attempt: generate, then validate.
    async fn attempt(
        &self,
        producer: &Producer,
        snapshot: &RepositorySnapshot,
        persona: Persona,
    ) -> Result<Assessment, ProviderError> {
        debug!(producer = %producer.label(), "requesting assessment");
        let raw = tokio::time::timeout(
            self.attempt_timeout,
            producer.backend.generate(&producer.model, snapshot, persona),
        )
        .await
        .map_err(|_| ProviderError::Timeout(self.attempt_timeout))??;
        parse_assessment(&raw)
    }
}

/// Build the producer chain from configuration.
///
/// Every provider/model pair becomes one [`Producer`], in configured order.
/// Providers without an API key are skipped, as are repeated pairs.
pub fn build_producers(config: &Config) -> Vec<Producer> {
    let mut producers = Vec::new();
    let mut seen = HashSet::new();
    for entry in &config.producers {
        let backend = match RigProvider::new(
            entry.provider,
            entry.api_key.clone(),
            entry.base_url.clone(),
        ) {
            Ok(backend) => Arc::new(backend) as Arc<dyn AssessmentProvider>,
            Err(e) => {
                debug!(provider = %entry.provider, "skipping producer: {e}");
                continue;
            }
        };
        for model in &entry.models {
            if !seen.insert((entry.provider, model.clone())) {
                debug!(provider = %entry.provider, model = %model, "duplicate producer, skipping");
                continue;
            }
            producers.push(Producer::new(entry.provider, model, Arc::clone(&backend)));
        }
    }
    producers
}
