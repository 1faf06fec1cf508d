//! Usage counting for completed analyses.
//!
//! The counter is injected by the caller and touched once per completed
//! analysis, after the outcome exists. Neither the orchestrator nor the
//! engine sees it. Incrementing never blocks and never fails:
//! [`HttpCounter`] spawns the POST, discards any error and hands back
//! the task so the caller can wait for it before the runtime shuts down.
//!
//! The notification carries no repository identity, only a random event
//! id, the score, whether the engine answered, and the tool version.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use serde::Serialize;
use tokio::task::JoinHandle;
use tracing::debug;

use crate::orchestrator::AnalysisOutcome;

/// Maximum time we'll wait for the notification POST before giving up.
pub const NOTIFY_TIMEOUT: Duration = Duration::from_secs(2);

/// Counts completed analyses.
pub trait UsageCounter: Send + Sync {
    /// Record one analysis. Returns the pending notification, if any.
    fn increment(&self, outcome: &AnalysisOutcome) -> Option<JoinHandle<()>>;
}

/// Counts nothing.
#[derive(Debug, Default)]
pub struct NoopCounter;

impl UsageCounter for NoopCounter {
    fn increment(&self, _outcome: &AnalysisOutcome) -> Option<JoinHandle<()>> {
        None
    }
}

/// Process-local counter.
#[derive(Debug, Default)]
pub struct InMemoryCounter {
    count: AtomicU64,
}

impl InMemoryCounter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn count(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }
}

impl UsageCounter for InMemoryCounter {
    fn increment(&self, _outcome: &AnalysisOutcome) -> Option<JoinHandle<()>> {
        let total = self.count.fetch_add(1, Ordering::Relaxed) + 1;
        debug!(total, "analysis counted");
        None
    }
}

/// Payload POSTed for each completed analysis.
#[derive(Debug, Clone, Serialize)]
pub struct UsageEvent {
    /// Random identifier for this single event (not persisted).
    pub event_id: String,
    pub score: u8,
    pub using_fallback: bool,
    pub version: &'static str,
}

impl UsageEvent {
    pub fn from_outcome(outcome: &AnalysisOutcome) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            score: outcome.assessment.score,
            using_fallback: outcome.using_fallback,
            version: crate::constants::VERSION,
        }
    }
}

/// Notifies a remote endpoint. Must be used inside a tokio runtime.
#[derive(Debug, Clone)]
pub struct HttpCounter {
    url: String,
}

impl HttpCounter {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

impl UsageCounter for HttpCounter {
    fn increment(&self, outcome: &AnalysisOutcome) -> Option<JoinHandle<()>> {
        let event = UsageEvent::from_outcome(outcome);
        let url = self.url.clone();
        Some(tokio::spawn(async move {
            if let Err(e) = post_event(&url, &event).await {
                debug!(error = %e, "usage notification dropped");
            }
        }))
    }
}

/// Actually perform the HTTP POST. Separated for testability.
async fn post_event(url: &str, event: &UsageEvent) -> Result<(), reqwest::Error> {
    let client = reqwest::Client::builder()
        .timeout(NOTIFY_TIMEOUT)
        .user_agent(crate::constants::USER_AGENT)
        .build()?;
    client.post(url).json(event).send().await?;
    Ok(())
}
