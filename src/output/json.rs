//! JSON output renderer.
//!
//! Outputs the flattened assessment with `usingFallback`, `producer` and
//! the derived `insights`.

use crate::insights::health_insights;
use crate::orchestrator::AnalysisOutcome;
use crate::output::OutputRenderer;

/// JSON output renderer.
pub struct JsonRenderer;

impl OutputRenderer for JsonRenderer {
    fn render(&self, outcome: &AnalysisOutcome) -> String {
        let mut output = serde_json::to_value(outcome).unwrap_or_else(|_| serde_json::json!({}));
        if let Some(object) = output.as_object_mut() {
            object.insert(
                "insights".to_string(),
                serde_json::to_value(health_insights(&outcome.assessment))
                    .unwrap_or_else(|_| serde_json::json!([])),
            );
        }
        serde_json::to_string_pretty(&output).unwrap_or_else(|_| "{}".to_string())
    }
}
