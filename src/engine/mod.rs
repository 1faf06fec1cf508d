//! Deterministic scoring engine.
//!
//! Converts a [`RepositorySnapshot`] into an [`Assessment`] by additive
//! point accumulation from [`BASE_SCORE`]. Each criterion contributes a
//! delta, at most one strength or weakness, and optional roadmap items.
//! The engine is pure: no I/O, no clock, no randomness. It is the
//! offline producer and the fallback when no generative producer
//! succeeds.

mod summary;

use std::collections::BTreeSet;

use crate::models::snapshot::RepositorySnapshot;
use crate::models::{Assessment, Level, Persona, Priority, RoadmapItem, Signal};

pub use summary::summarize;

/// Starting score before any criterion is applied.
pub const BASE_SCORE: i32 = 40;

/// Below this score a generic code-quality roadmap item is added.
pub const REVIEW_THRESHOLD: i32 = 70;

/// Number of most recent commits inspected for message quality.
const COMMIT_WINDOW: usize = 5;

/// Minimum number of good messages in the window to earn the full bonus.
const GOOD_COMMITS_REQUIRED: usize = 3;

/// Messages must be strictly longer than this many characters.
const MIN_COMMIT_MESSAGE_LEN: usize = 10;

/// Assess a snapshot. Identical inputs always yield identical output.
pub fn assess(snapshot: &RepositorySnapshot, persona: Persona) -> Assessment {
    let mut card = Scorecard::new();

    readme(snapshot, &mut card);
    tests(snapshot, &mut card);
    continuous_integration(snapshot, &mut card);
    dependencies(snapshot, &mut card);
    project_structure(snapshot, &mut card);
    container(snapshot, &mut card);
    commit_quality(snapshot, &mut card);
    language_diversity(snapshot, &mut card);

    if card.points < REVIEW_THRESHOLD {
        card.plan(
            "Code Quality Review",
            "Review code for best practices, error handling, and optimization opportunities",
            Priority::Medium,
        );
    }
    if !readme_mentions_setup(snapshot.readme()) {
        card.plan(
            "Improve Documentation",
            "Add installation instructions, usage examples, and API documentation",
            Priority::Medium,
        );
    }

    let score = card.points.clamp(0, i32::from(crate::models::assessment::MAX_SCORE)) as u8;
    Assessment {
        score,
        level: Level::from_score(score),
        summary: summarize(persona, score, snapshot),
        strengths: card.strengths,
        weaknesses: card.weaknesses,
        roadmap: card.roadmap,
        signals: signals_for(snapshot),
    }
}

/// Structured facts about a snapshot, independent of any producer's prose.
pub fn signals_for(snapshot: &RepositorySnapshot) -> BTreeSet<Signal> {
    let mut signals = BTreeSet::new();
    if snapshot.readme().is_some() {
        signals.insert(Signal::Readme);
    }
    if snapshot.has_tests() {
        signals.insert(Signal::Tests);
    }
    if snapshot.has_ci() {
        signals.insert(Signal::ContinuousIntegration);
    }
    if snapshot.has_dockerfile() {
        signals.insert(Signal::Container);
    }
    if !snapshot.dependencies().is_empty() {
        signals.insert(Signal::Dependencies);
    }
    if snapshot.languages().len() > 1 {
        signals.insert(Signal::MultiLanguage);
    }
    if has_clean_commits(snapshot) {
        signals.insert(Signal::CleanCommits);
    }
    signals
}

/// Running tally while criteria are applied.
#[derive(Debug, Default)]
struct Scorecard {
    points: i32,
    strengths: Vec<String>,
    weaknesses: Vec<String>,
    roadmap: Vec<RoadmapItem>,
}

impl Scorecard {
    fn new() -> Self {
        Self {
            points: BASE_SCORE,
            ..Self::default()
        }
    }

    fn strength(&mut self, delta: i32, text: &str) {
        self.points += delta;
        self.strengths.push(text.to_string());
    }

    fn weakness(&mut self, delta: i32, text: &str) {
        self.points += delta;
        self.weaknesses.push(text.to_string());
    }

    fn plan(&mut self, title: &str, description: &str, priority: Priority) {
        self.roadmap.push(RoadmapItem::new(title, description, priority));
    }
}

fn readme(snapshot: &RepositorySnapshot, card: &mut Scorecard) {
    let Some(readme) = snapshot.readme() else {
        card.weakness(0, "Missing README file");
        card.plan(
            "Create README",
            "Add comprehensive documentation with setup instructions, usage examples, and project overview",
            Priority::High,
        );
        return;
    };

    match readme.chars().count() {
        len if len > 1000 => card.strength(20, "Comprehensive README documentation"),
        len if len >= 200 => card.strength(15, "Has README documentation"),
        _ => card.weakness(5, "README exists but lacks detail"),
    }
}

fn tests(snapshot: &RepositorySnapshot, card: &mut Scorecard) {
    if snapshot.has_tests() {
        card.strength(20, "Includes test coverage");
    } else {
        card.weakness(0, "No test coverage found");
        card.plan(
            "Add Test Suite",
            "Implement unit tests, integration tests, and set up testing framework",
            Priority::High,
        );
    }
}

fn continuous_integration(snapshot: &RepositorySnapshot, card: &mut Scorecard) {
    if snapshot.has_ci() {
        card.strength(10, "Has CI/CD automation");
    } else {
        card.weakness(0, "No automated workflows");
        card.plan(
            "Setup CI/CD Pipeline",
            "Add GitHub Actions for automated testing, linting, and deployment",
            Priority::Medium,
        );
    }
}

fn dependencies(snapshot: &RepositorySnapshot, card: &mut Scorecard) {
    match snapshot.dependencies().len() {
        0 => card.weakness(0, "No package management detected"),
        1..=19 => card.strength(10, "Reasonable dependency count"),
        20..=49 => card.strength(5, "Uses modern dependencies"),
        _ => card.weakness(2, "Heavy dependency usage"),
    }
}

fn project_structure(snapshot: &RepositorySnapshot, card: &mut Scorecard) {
    match snapshot.file_tree().len() {
        0..=5 => card.weakness(2, "Limited project scope"),
        6..=99 => card.strength(10, "Well-organized project structure"),
        _ => card.strength(5, "Large, complex project"),
    }
}

fn container(snapshot: &RepositorySnapshot, card: &mut Scorecard) {
    if snapshot.has_dockerfile() {
        card.strength(5, "Containerization ready");
    } else {
        card.plan(
            "Add Docker Support",
            "Create Dockerfile for consistent deployment environments",
            Priority::Low,
        );
    }
}

fn commit_quality(snapshot: &RepositorySnapshot, card: &mut Scorecard) {
    if snapshot.commits().is_empty() {
        return;
    }
    if has_clean_commits(snapshot) {
        card.strength(5, "Good commit practices");
    } else {
        card.weakness(2, "Commit messages need improvement");
    }
}

fn language_diversity(snapshot: &RepositorySnapshot, card: &mut Scorecard) {
    if snapshot.languages().len() > 1 {
        card.strength(5, "Multi-language project");
    }
}

/// At least three of the five most recent messages are descriptive and
/// are not "fix" commits.
fn has_clean_commits(snapshot: &RepositorySnapshot) -> bool {
    let good = snapshot
        .commits()
        .iter()
        .take(COMMIT_WINDOW)
        .filter(|c| {
            c.message.chars().count() > MIN_COMMIT_MESSAGE_LEN
                && !c.message.to_lowercase().contains("fix")
        })
        .count();
    good >= GOOD_COMMITS_REQUIRED
}

fn readme_mentions_setup(readme: Option<&str>) -> bool {
    readme.is_some_and(|text| {
        let lower = text.to_lowercase();
        lower.contains("installation") || lower.contains("setup")
    })
}
