//! Assessment types: the output contract shared by every producer.

use std::collections::BTreeSet;
use std::fmt;

use schemars::JsonSchema;
use serde::{Deserialize, Deserializer, Serialize};
use strum::{Display, EnumIter};

/// Upper bound of the score range.
pub const MAX_SCORE: u8 = 100;

/// Qualitative level derived from the numeric score.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, JsonSchema, EnumIter,
)]
pub enum Level {
    Beginner,
    Intermediate,
    Pro,
    Elite,
}

impl Level {
    /// Map a score to its level: ≥85 Elite, ≥70 Pro, ≥50 Intermediate.
    pub fn from_score(score: u8) -> Self {
        match score {
            85.. => Level::Elite,
            70..=84 => Level::Pro,
            50..=69 => Level::Intermediate,
            _ => Level::Beginner,
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Level::Beginner => write!(f, "Beginner"),
            Level::Intermediate => write!(f, "Intermediate"),
            Level::Pro => write!(f, "Pro"),
            Level::Elite => write!(f, "Elite"),
        }
    }
}

impl std::str::FromStr for Level {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "pro" => Ok(Level::Pro),
            "elite" => Ok(Level::Elite),
            other => Err(format!(
                "unknown level: '{other}'. Expected Beginner, Intermediate, Pro or Elite"
            )),
        }
    }
}

/// Case-insensitive, but anything outside the enumeration is rejected.
impl<'de> Deserialize<'de> for Level {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Roadmap item priority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, JsonSchema)]
pub enum Priority {
    High,
    Medium,
    Low,
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Priority::High => write!(f, "High"),
            Priority::Medium => write!(f, "Medium"),
            Priority::Low => write!(f, "Low"),
        }
    }
}

impl std::str::FromStr for Priority {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "high" => Ok(Priority::High),
            "medium" => Ok(Priority::Medium),
            "low" => Ok(Priority::Low),
            other => Err(format!(
                "unknown priority: '{other}'. Expected High, Medium or Low"
            )),
        }
    }
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// A single improvement suggestion.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct RoadmapItem {
    pub title: String,
    pub description: String,
    pub priority: Priority,
}

impl RoadmapItem {
    pub fn new(title: impl Into<String>, description: impl Into<String>, priority: Priority) -> Self {
        Self {
            title: title.into(),
            description: description.into(),
            priority,
        }
    }
}

/// Structured repository facts attached to every assessment.
///
/// Downstream consumers (insights, comparisons) read these instead of
/// searching the free-text strengths and weaknesses.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    PartialOrd,
    Ord,
    Hash,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumIter,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum Signal {
    Readme,
    Tests,
    ContinuousIntegration,
    Container,
    Dependencies,
    MultiLanguage,
    CleanCommits,
}

/// The quality assessment of one repository.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct Assessment {
    /// Overall score in `[0, 100]`.
    #[serde(deserialize_with = "deserialize_score")]
    #[schemars(range(min = 0, max = 100))]
    pub score: u8,
    pub level: Level,
    pub summary: String,
    pub strengths: Vec<String>,
    pub weaknesses: Vec<String>,
    pub roadmap: Vec<RoadmapItem>,
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    #[schemars(skip)]
    pub signals: BTreeSet<Signal>,
}

impl Assessment {
    /// Force `level` to agree with `score`.
    pub fn normalize_level(&mut self) {
        self.level = Level::from_score(self.score);
    }

    pub fn has_signal(&self, signal: Signal) -> bool {
        self.signals.contains(&signal)
    }

    /// Roadmap items with the given priority.
    pub fn roadmap_with(&self, priority: Priority) -> impl Iterator<Item = &RoadmapItem> {
        self.roadmap.iter().filter(move |item| item.priority == priority)
    }
}

/// Accept any JSON number, rounding and clamping it into `[0, 100]`.
fn deserialize_score<'de, D>(deserializer: D) -> Result<u8, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = f64::deserialize(deserializer)?;
    if !raw.is_finite() {
        return Err(serde::de::Error::custom("score must be a finite number"));
    }
    Ok(raw.round().clamp(0.0, f64::from(MAX_SCORE)) as u8)
}
