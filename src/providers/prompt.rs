//! Prompt construction for generative producers.

use crate::models::{Persona, RepositorySnapshot};

/// System-level persona directive for the given tone.
pub fn persona_directive(persona: Persona) -> &'static str {
    match persona {
        Persona::Roast => {
            "You are a savage, sarcastic, and funny Senior Principal Engineer who has seen too \
             much bad code. Roast this repository mercilessly. Make it hurt but be technically \
             accurate. Use slang, be condescending, but still provide the structured output."
        }
        Persona::Standard => {
            "You are a ruthless but helpful Senior Staff Engineer at FAANG. You are grading a \
             candidate's repository."
        }
    }
}

fn yes_no(flag: bool) -> &'static str {
    if flag { "YES" } else { "NO" }
}

/// Build the user prompt carrying every snapshot field.
pub fn build_prompt(snapshot: &RepositorySnapshot) -> String {
    let mut prompt = String::new();

    prompt.push_str(
        "I will provide the file structure, dependency list, README content, and key code \
         snippets.\n\n## Context\n\n",
    );
    prompt.push_str(&format!("Repo Name: {}\n", snapshot.full_name()));
    let metadata =
        serde_json::to_string(snapshot.metadata()).unwrap_or_else(|_| "{}".to_string());
    prompt.push_str(&format!("Metadata: {metadata}\n\n"));

    prompt.push_str(&format!(
        "### File Structure ({} files)\n\n{}\n\n",
        snapshot.file_tree().len(),
        snapshot.file_tree().join("\n")
    ));

    let dependencies = serde_json::to_string_pretty(snapshot.dependencies())
        .unwrap_or_else(|_| "{}".to_string());
    prompt.push_str(&format!(
        "### Dependencies ({} total)\n\n{dependencies}\n\n",
        snapshot.dependencies().len()
    ));

    let languages =
        serde_json::to_string_pretty(snapshot.languages()).unwrap_or_else(|_| "{}".to_string());
    prompt.push_str(&format!("### Languages Used\n\n{languages}\n\n"));

    prompt.push_str(&format!(
        "### Recent Commits ({} shown)\n\n",
        snapshot.commits().len()
    ));
    for commit in snapshot.commits() {
        let author = commit.author.as_deref().unwrap_or("unknown");
        prompt.push_str(&format!("- {} ({author})\n", commit.message));
    }
    prompt.push('\n');

    prompt.push_str(&format!(
        "### Quality Indicators\n\n\
         - Has Tests: {}\n\
         - Has CI/CD: {}\n\
         - Has Docker: {}\n\n",
        yes_no(snapshot.has_tests()),
        yes_no(snapshot.has_ci()),
        yes_no(snapshot.has_dockerfile()),
    ));

    prompt.push_str(&format!(
        "### README Content\n\n{}\n\n",
        snapshot.readme().unwrap_or("NO README FOUND")
    ));
    prompt.push_str(&format!(
        "### Main Entry Point Content\n\n{}\n\n",
        snapshot.main_file().unwrap_or("NO MAIN FILE FOUND")
    ));

    prompt.push_str(
        "## Task\n\n\
         Analyze this repository comprehensively. Be critical but fair.\n\n\
         Scoring criteria (0-100):\n\
         - Code Quality & Structure (25 points): clean code, good architecture, proper file organization\n\
         - Documentation (20 points): README quality, code comments, API docs\n\
         - Testing & CI/CD (20 points): test coverage, automated workflows, quality gates\n\
         - Dependencies & Security (15 points): up-to-date deps, proper package management\n\
         - Git Practices (10 points): commit quality, meaningful messages\n\
         - Real-world Applicability (10 points): practical use case, completeness, deployment readiness\n\n\
         Deductions:\n\
         - No tests: -20 points\n\
         - No README: -15 points\n\
         - Poor commit messages: -10 points\n\
         - Outdated dependencies: -10 points\n\
         - No CI/CD: -5 points\n\
         - Flat file structure: -5 points\n\n\
         ## Output Format\n\n\
         Return strict JSON only, with exactly these fields:\n\
         {\n\
         \x20 \"score\": number (0-100),\n\
         \x20 \"level\": \"Beginner\" | \"Intermediate\" | \"Pro\" | \"Elite\",\n\
         \x20 \"summary\": \"2 sentences, brutal but fair.\",\n\
         \x20 \"strengths\": [\"string\"],\n\
         \x20 \"weaknesses\": [\"string\"],\n\
         \x20 \"roadmap\": [{ \"title\": \"string\", \"description\": \"string\", \"priority\": \"High\" | \"Medium\" | \"Low\" }]\n\
         }\n",
    );

    prompt
}
