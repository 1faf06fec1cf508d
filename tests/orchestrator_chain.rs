//! Integration tests for the producer chain using mock providers.
//!
//! Validates ordering, fallback and timeout behavior of the orchestrator
//! without making real API calls.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;

use gitgrade::engine;
use gitgrade::models::{Level, Persona, ProviderName, RepositorySnapshot};
use gitgrade::orchestrator::{AssessmentOrchestrator, Producer};
use gitgrade::providers::{AssessmentProvider, ProviderError};

const VALID: &str = r#"```json
{
  "score": 77,
  "level": "Intermediate",
  "summary": "A tidy little project.",
  "strengths": ["Clear README"],
  "weaknesses": ["Sparse tests"],
  "roadmap": [
    {"title": "Add tests", "description": "Cover the parser.", "priority": "high"}
  ]
}
```"#;

const MISSING_ROADMAP: &str =
    r#"{"score": 60, "level": "Pro", "summary": "Hmm.", "strengths": [], "weaknesses": []}"#;

/// What a mock provider does when asked.
enum Behavior {
    Reply(&'static str),
    Fail(&'static str),
    Hang,
}

/// A mock provider that counts its calls.
struct MockProvider {
    behavior: Behavior,
    calls: AtomicUsize,
}

impl MockProvider {
    fn new(behavior: Behavior) -> Arc<Self> {
        Arc::new(Self {
            behavior,
            calls: AtomicUsize::new(0),
        })
    }

    fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl AssessmentProvider for MockProvider {
    async fn generate(
        &self,
        _model: &str,
        _snapshot: &RepositorySnapshot,
        _persona: Persona,
    ) -> Result<String, ProviderError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match self.behavior {
            Behavior::Reply(text) => Ok(text.to_string()),
            Behavior::Fail(msg) => Err(ProviderError::ApiError(msg.to_string())),
            Behavior::Hang => {
                tokio::time::sleep(Duration::from_secs(30)).await;
                Ok(VALID.to_string())
            }
        }
    }
}

fn producer(model: &str, backend: &Arc<MockProvider>) -> Producer {
    Producer::new(ProviderName::Groq, model, Arc::clone(backend) as Arc<dyn AssessmentProvider>)
}

fn orchestrator(producers: Vec<Producer>) -> AssessmentOrchestrator {
    AssessmentOrchestrator::new(producers, Duration::from_secs(5))
}

fn snapshot() -> RepositorySnapshot {
    RepositorySnapshot::builder("octo", "widgets")
        .file_tree(["README.md", "src/main.rs", "Cargo.toml"])
        .readme(Some("# Widgets\n\nSmall widgets.".into()))
        .dependency("serde", "1")
        .build()
        .unwrap()
}

#[tokio::test]
async fn all_producers_fail_falls_back_to_engine() {
    let rate_limited = MockProvider::new(Behavior::Fail("429 Too Many Requests"));
    let broken = MockProvider::new(Behavior::Reply("I cannot help with that."));
    let chain = orchestrator(vec![
        producer("a", &rate_limited),
        producer("b", &rate_limited),
        producer("c", &broken),
    ]);

    let outcome = chain.run(&snapshot(), Persona::Standard).await;

    assert!(outcome.using_fallback);
    assert!(outcome.producer.is_none());
    assert_eq!(outcome.assessment, engine::assess(&snapshot(), Persona::Standard));
    assert_eq!(rate_limited.calls(), 2);
    assert_eq!(broken.calls(), 1);
}

#[tokio::test]
async fn first_success_stops_the_chain() {
    let good = MockProvider::new(Behavior::Reply(VALID));
    let never = MockProvider::new(Behavior::Reply(VALID));
    let chain = orchestrator(vec![producer("first", &good), producer("second", &never)]);

    let outcome = chain.run(&snapshot(), Persona::Standard).await;

    assert!(!outcome.using_fallback);
    assert_eq!(outcome.producer.as_deref(), Some("groq/first"));
    assert_eq!(outcome.assessment.score, 77);
    assert_eq!(outcome.assessment.level, Level::Pro);
    assert_eq!(outcome.assessment.roadmap.len(), 1);
    assert_eq!(good.calls(), 1);
    assert_eq!(never.calls(), 0);
}

#[tokio::test]
async fn last_producer_can_still_answer() {
    let failing = MockProvider::new(Behavior::Fail("500 internal server error"));
    let good = MockProvider::new(Behavior::Reply(VALID));
    let chain = orchestrator(vec![
        producer("a", &failing),
        producer("b", &failing),
        producer("c", &good),
    ]);

    let outcome = chain.run(&snapshot(), Persona::Roast).await;

    assert!(!outcome.using_fallback);
    assert_eq!(outcome.producer.as_deref(), Some("groq/c"));
    assert_eq!(failing.calls(), 2);
}

#[tokio::test]
async fn missing_roadmap_advances_to_next_producer() {
    let incomplete = MockProvider::new(Behavior::Reply(MISSING_ROADMAP));
    let good = MockProvider::new(Behavior::Reply(VALID));
    let chain = orchestrator(vec![producer("incomplete", &incomplete), producer("good", &good)]);

    let outcome = chain.run(&snapshot(), Persona::Standard).await;

    assert!(!outcome.using_fallback);
    assert_eq!(outcome.producer.as_deref(), Some("groq/good"));
    assert_eq!(incomplete.calls(), 1);
}

#[tokio::test]
async fn slow_producer_times_out_and_chain_moves_on() {
    let slow = MockProvider::new(Behavior::Hang);
    let good = MockProvider::new(Behavior::Reply(VALID));
    let chain = AssessmentOrchestrator::new(
        vec![producer("slow", &slow), producer("good", &good)],
        Duration::from_millis(50),
    );

    let started = std::time::Instant::now();
    let outcome = chain.run(&snapshot(), Persona::Standard).await;

    assert!(started.elapsed() < Duration::from_secs(10));
    assert_eq!(outcome.producer.as_deref(), Some("groq/good"));
    assert_eq!(slow.calls(), 1);
}

#[tokio::test]
async fn each_pair_is_attempted_once() {
    let failing = MockProvider::new(Behavior::Fail("connection refused"));
    let chain = orchestrator(vec![producer("only", &failing)]);

    let outcome = chain.run(&snapshot(), Persona::Standard).await;

    assert!(outcome.using_fallback);
    assert_eq!(failing.calls(), 1);
}

#[tokio::test]
async fn repeated_pair_in_chain_is_attempted_once() {
    let failing = MockProvider::new(Behavior::Fail("connection refused"));
    let other = MockProvider::new(Behavior::Fail("connection refused"));
    let chain = orchestrator(vec![
        producer("llama-3.1-8b-instant", &failing),
        producer("llama-3.1-8b-instant", &failing),
        producer("llama3-8b-8192", &other),
    ]);

    let outcome = chain.run(&snapshot(), Persona::Standard).await;

    assert!(outcome.using_fallback);
    assert_eq!(failing.calls(), 1);
    assert_eq!(other.calls(), 1);
}

#[tokio::test]
async fn roast_persona_changes_tone_not_score() {
    let standard = AssessmentOrchestrator::offline()
        .run(&snapshot(), Persona::Standard)
        .await;
    let roast = AssessmentOrchestrator::offline()
        .run(&snapshot(), Persona::Roast)
        .await;

    assert_eq!(standard.assessment.score, roast.assessment.score);
    assert_eq!(standard.assessment.weaknesses, roast.assessment.weaknesses);
    assert_ne!(standard.assessment.summary, roast.assessment.summary);
}
