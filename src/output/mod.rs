//! Output renderers: terminal and JSON.

pub mod json;
pub mod terminal;

use crate::orchestrator::AnalysisOutcome;

pub use json::JsonRenderer;
pub use terminal::TerminalRenderer;

/// Trait for rendering an analysis outcome to an output format.
pub trait OutputRenderer {
    /// Render the outcome to a string.
    fn render(&self, outcome: &AnalysisOutcome) -> String;
}
