//! Terminal renderer: styled flowing text, one section per list.

use colored::{ColoredString, Colorize};

use crate::insights::{InsightKind, health_insights};
use crate::models::{Level, Priority};
use crate::orchestrator::AnalysisOutcome;
use crate::output::OutputRenderer;

/// Terminal output renderer with colored, flowing text.
pub struct TerminalRenderer;

fn score_colored(score: u8) -> ColoredString {
    let text = format!("{score}/100");
    match score {
        85.. => text.green().bold(),
        70..=84 => text.cyan().bold(),
        50..=69 => text.yellow().bold(),
        _ => text.red().bold(),
    }
}

fn level_colored(level: Level) -> ColoredString {
    let text = level.to_string();
    match level {
        Level::Elite => text.green().bold(),
        Level::Pro => text.cyan().bold(),
        Level::Intermediate => text.yellow().bold(),
        Level::Beginner => text.red().bold(),
    }
}

fn priority_colored(priority: Priority) -> ColoredString {
    let text = format!("[{priority}]");
    match priority {
        Priority::High => text.red().bold(),
        Priority::Medium => text.yellow().bold(),
        Priority::Low => text.blue().bold(),
    }
}

fn section(output: &mut String, title: &str) {
    output.push_str(&format!("\n {}\n", title.bold().underline()));
}

impl OutputRenderer for TerminalRenderer {
    fn render(&self, outcome: &AnalysisOutcome) -> String {
        let assessment = &outcome.assessment;
        let mut output = String::new();

        output.push_str(&format!(
            " {} {}  {}\n",
            "Score".bold(),
            score_colored(assessment.score),
            level_colored(assessment.level),
        ));
        output.push_str(&format!(" {}\n", assessment.summary));

        if !assessment.strengths.is_empty() {
            section(&mut output, "Strengths");
            for strength in &assessment.strengths {
                output.push_str(&format!("   {} {strength}\n", "✔".green().bold()));
            }
        }

        if !assessment.weaknesses.is_empty() {
            section(&mut output, "Weaknesses");
            for weakness in &assessment.weaknesses {
                output.push_str(&format!("   {} {weakness}\n", "✖".red().bold()));
            }
        }

        if !assessment.roadmap.is_empty() {
            section(&mut output, "Roadmap");
            for priority in [Priority::High, Priority::Medium, Priority::Low] {
                for item in assessment.roadmap_with(priority) {
                    output.push_str(&format!(
                        "   {} {}\n     {}\n",
                        priority_colored(item.priority),
                        item.title.bold(),
                        item.description
                    ));
                }
            }
        }

        let insights = health_insights(assessment);
        if !insights.is_empty() {
            section(&mut output, "Insights");
            for insight in &insights {
                let icon = match insight.kind {
                    InsightKind::Positive => "▲".green().bold(),
                    InsightKind::Warning => "●".yellow().bold(),
                    InsightKind::Critical => "▼".red().bold(),
                };
                output.push_str(&format!(
                    "   {icon} {}: {}\n",
                    insight.title.bold(),
                    insight.description
                ));
            }
        }

        output.push_str(&format!("\n{}\n", "───────────────────────────────────".dimmed()));
        let source = match (&outcome.producer, outcome.using_fallback) {
            (Some(producer), false) => format!("Assessed by {producer}."),
            _ => "Scored by the built-in heuristic engine (no AI producer answered).".to_string(),
        };
        output.push_str(&format!(" {}\n", source.dimmed()));

        output
    }
}
