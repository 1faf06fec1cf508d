//! Templated summaries for engine-produced assessments.
//!
//! Selection is keyed on persona, score bucket, test presence and README
//! presence. No free text is generated.

use crate::models::Persona;
use crate::models::snapshot::RepositorySnapshot;

/// Scores strictly above this read as a strong result.
const STRONG_SCORE: u8 = 70;

/// Scores strictly above this (and not strong) read as middling.
const MIDDLING_SCORE: u8 = 50;

/// Build the summary sentence for an engine result.
pub fn summarize(persona: Persona, score: u8, snapshot: &RepositorySnapshot) -> String {
    match persona {
        Persona::Roast => roast(score, snapshot.has_tests()),
        Persona::Standard => standard(score, snapshot.has_tests(), snapshot.readme().is_some()),
    }
}

fn roast(score: u8, has_tests: bool) -> String {
    let verdict = if score > STRONG_SCORE {
        "Not bad for a human."
    } else if score > MIDDLING_SCORE {
        "Mediocre at best."
    } else {
        "Yikes, this needs work."
    };
    let tests = if has_tests {
        "At least you test your code."
    } else {
        "No tests? Bold strategy."
    };
    format!(
        "Score: {score}/100. AI's taking a coffee break, but I can still judge your code. \
         {verdict} {tests}"
    )
}

fn standard(score: u8, has_tests: bool, has_readme: bool) -> String {
    let docs = if has_readme {
        "Good documentation foundation"
    } else {
        "Documentation needs attention"
    };
    let tests = if has_tests {
        "Testing practices established"
    } else {
        "Testing implementation recommended"
    };
    let outlook = if score > STRONG_SCORE {
        "Strong project foundation"
    } else {
        "Room for improvement identified"
    };
    format!("Heuristic analysis complete. Score: {score}/100. {docs}. {tests}. {outlook}.")
}
