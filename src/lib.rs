//! gitgrade: repository quality assessment (library crate).
//!
//! Re-exports public modules for integration tests and external use.

pub mod config;
pub mod constants;
pub mod engine;
pub mod env;
pub mod insights;
pub mod models;
pub mod orchestrator;
pub mod output;
pub mod providers;
pub mod source;
pub mod usage;

use thiserror::Error;

use crate::models::Persona;
use crate::orchestrator::{AnalysisOutcome, AssessmentOrchestrator};
use crate::source::{RepositorySource, SourceError};

/// Errors from [`analyze`]. Only acquisition can fail.
#[derive(Error, Debug)]
pub enum AnalyzeError {
    #[error("failed to acquire repository: {0}")]
    Acquisition(#[from] SourceError),
}

/// Acquire a snapshot for `identifier` and assess it.
///
/// Producer failures never surface here; they end in the engine fallback.
pub async fn analyze(
    source: &dyn RepositorySource,
    orchestrator: &AssessmentOrchestrator,
    identifier: &str,
    persona: Persona,
) -> Result<AnalysisOutcome, AnalyzeError> {
    let snapshot = source.fetch(identifier).await?;
    Ok(orchestrator.run(&snapshot, persona).await)
}
