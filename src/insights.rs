//! Health insights derived from an assessment.
//!
//! Reads the score, the structured [`Signal`]s and roadmap priorities.
//! Producer prose (strengths, weaknesses) is never inspected, so an
//! insight cannot flip because a model phrased something differently.

use serde::Serialize;

use crate::models::{Assessment, Priority, Signal};

/// Upper bound on the number of insights returned.
pub const MAX_INSIGHTS: usize = 6;

/// Score at or above which the project is called out as excellent.
const EXCELLENT_SCORE: u8 = 85;

/// Score below which the project is flagged.
const ATTENTION_SCORE: u8 = 50;

/// More high-priority roadmap items than this raises a warning.
const HIGH_PRIORITY_LIMIT: usize = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum InsightKind {
    Positive,
    Warning,
    Critical,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Insight {
    pub kind: InsightKind,
    pub title: String,
    pub description: String,
}

impl Insight {
    fn new(kind: InsightKind, title: &str, description: impl Into<String>) -> Self {
        Self {
            kind,
            title: title.to_string(),
            description: description.into(),
        }
    }
}

/// Derive at most [`MAX_INSIGHTS`] insights, in a fixed order.
pub fn health_insights(assessment: &Assessment) -> Vec<Insight> {
    let mut insights = Vec::new();

    if assessment.score >= EXCELLENT_SCORE {
        insights.push(Insight::new(
            InsightKind::Positive,
            "Excellent Quality",
            "This repository demonstrates professional-grade development practices.",
        ));
    } else if assessment.score < ATTENTION_SCORE {
        insights.push(Insight::new(
            InsightKind::Critical,
            "Needs Attention",
            "Multiple areas require improvement to meet industry standards.",
        ));
    }

    if assessment.has_signal(Signal::Tests) {
        insights.push(Insight::new(
            InsightKind::Positive,
            "Testing Culture",
            "Good testing practices indicate maintainable, reliable code.",
        ));
    } else {
        insights.push(Insight::new(
            InsightKind::Critical,
            "Testing Gap",
            "Adding tests would significantly improve code reliability and maintainability.",
        ));
    }

    if assessment.has_signal(Signal::Readme) {
        insights.push(Insight::new(
            InsightKind::Positive,
            "Developer Friendly",
            "Good documentation makes the project accessible to contributors.",
        ));
    }

    if assessment.has_signal(Signal::ContinuousIntegration) {
        insights.push(Insight::new(
            InsightKind::Positive,
            "Automated Workflow",
            "CI/CD setup ensures consistent quality and deployment processes.",
        ));
    } else {
        insights.push(Insight::new(
            InsightKind::Warning,
            "Manual Processes",
            "Automation could reduce errors and speed up development cycles.",
        ));
    }

    let high_priority = assessment.roadmap_with(Priority::High).count();
    if high_priority > HIGH_PRIORITY_LIMIT {
        insights.push(Insight::new(
            InsightKind::Warning,
            "Growth Opportunity",
            format!("{high_priority} high-priority improvements identified for rapid quality gains."),
        ));
    }

    insights.truncate(MAX_INSIGHTS);
    insights
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Level, RoadmapItem};
    use std::collections::BTreeSet;

    fn assessment(score: u8, signals: &[Signal], high_items: usize) -> Assessment {
        Assessment {
            score,
            level: Level::from_score(score),
            summary: String::new(),
            // Prose that would have fooled substring matching.
            strengths: vec!["Great CI and tests and README".into()],
            weaknesses: vec![],
            roadmap: (0..high_items)
                .map(|i| RoadmapItem::new(format!("Item {i}"), "do it", Priority::High))
                .collect(),
            signals: signals.iter().copied().collect::<BTreeSet<_>>(),
        }
    }

    fn titles(insights: &[Insight]) -> Vec<&str> {
        insights.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn strong_repository() {
        let a = assessment(
            92,
            &[Signal::Tests, Signal::Readme, Signal::ContinuousIntegration],
            0,
        );
        assert_eq!(
            titles(&health_insights(&a)),
            vec![
                "Excellent Quality",
                "Testing Culture",
                "Developer Friendly",
                "Automated Workflow"
            ]
        );
    }

    #[test]
    fn weak_repository_ignores_prose() {
        let a = assessment(42, &[], 3);
        let insights = health_insights(&a);
        assert_eq!(
            titles(&insights),
            vec![
                "Needs Attention",
                "Testing Gap",
                "Manual Processes",
                "Growth Opportunity"
            ]
        );
        assert_eq!(insights[0].kind, InsightKind::Critical);
        assert_eq!(insights[2].kind, InsightKind::Warning);
        assert!(insights[3].description.starts_with("3 high-priority"));
    }

    #[test]
    fn middle_score_has_no_score_insight() {
        let a = assessment(70, &[Signal::Tests], 2);
        assert_eq!(
            titles(&health_insights(&a)),
            vec!["Testing Culture", "Manual Processes"]
        );
    }

    #[test]
    fn never_more_than_six() {
        let a = assessment(
            95,
            &[Signal::Tests, Signal::Readme, Signal::ContinuousIntegration],
            5,
        );
        assert!(health_insights(&a).len() <= MAX_INSIGHTS);
    }
}
