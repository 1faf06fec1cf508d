//! Repository snapshot: the bounded, normalized input to every producer.
//!
//! A snapshot is built exactly once per assessment through
//! [`SnapshotBuilder`], which enforces all size bounds and derives the
//! quality indicators from the file tree. Nothing can mutate a snapshot
//! after construction.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Maximum number of file paths kept in the file tree.
pub const MAX_FILE_TREE: usize = 300;

/// Maximum number of recent commits kept.
pub const MAX_COMMITS: usize = 10;

/// Maximum length (in characters) of README and entry-point text.
pub const MAX_TEXT_LEN: usize = 5000;

/// Appended to README / entry-point text that was cut at [`MAX_TEXT_LEN`].
pub const TRUNCATION_MARKER: &str = "...(truncated)";

/// Errors raised while building a snapshot.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("repository {0} must not be empty")]
    EmptyIdentifier(&'static str),
}

/// Informational repository metadata. Not scored by the engine.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct RepositoryMetadata {
    pub stars: u64,
    pub forks: u64,
    pub open_issues: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Primary language as declared by the hosting service.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
    /// Repository size in KiB, as reported by the host.
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default_branch: Option<String>,
}

/// A single commit summary.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Commit {
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
}

/// Booleans derived from path-pattern matching over the file tree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct QualityIndicators {
    pub has_tests: bool,
    #[serde(rename = "hasCI")]
    pub has_ci: bool,
    pub has_dockerfile: bool,
}

impl QualityIndicators {
    /// Derive the indicators from a list of file paths.
    pub fn from_paths<S: AsRef<str>>(paths: &[S]) -> Self {
        let mut indicators = Self::default();
        for path in paths.iter().map(|p| p.as_ref()) {
            indicators.has_tests |= is_test_path(path);
            indicators.has_ci |= is_ci_path(path);
            indicators.has_dockerfile |= is_container_path(path);
        }
        indicators
    }
}

fn is_test_path(path: &str) -> bool {
    const MARKERS: &[&str] = &["test", "spec", "__tests__"];
    const SUFFIXES: &[&str] = &[".test.js", ".test.ts", ".spec.js", ".spec.ts"];
    MARKERS.iter().any(|m| path.contains(m)) || SUFFIXES.iter().any(|s| path.ends_with(s))
}

fn is_ci_path(path: &str) -> bool {
    const MARKERS: &[&str] = &[".github/workflows", ".gitlab-ci.yml", "Jenkinsfile", ".travis.yml"];
    MARKERS.iter().any(|m| path.contains(m))
}

fn is_container_path(path: &str) -> bool {
    path.contains("Dockerfile") || path.contains("docker-compose")
}

/// Cut `text` to at most [`MAX_TEXT_LEN`] characters, appending
/// [`TRUNCATION_MARKER`] when anything was removed.
pub fn truncate_text(text: &str) -> String {
    match text.char_indices().nth(MAX_TEXT_LEN) {
        Some((byte_idx, _)) => {
            let mut cut = String::with_capacity(byte_idx + TRUNCATION_MARKER.len());
            cut.push_str(&text[..byte_idx]);
            cut.push_str(TRUNCATION_MARKER);
            cut
        }
        None => text.to_string(),
    }
}

/// Normalized, bounded summary of a repository's observable signals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "SnapshotParts")]
pub struct RepositorySnapshot {
    owner: String,
    name: String,
    metadata: RepositoryMetadata,
    file_tree: Vec<String>,
    dependencies: IndexMap<String, String>,
    languages: IndexMap<String, u64>,
    commits: Vec<Commit>,
    #[serde(skip_serializing_if = "Option::is_none")]
    readme: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    main_file: Option<String>,
    #[serde(flatten)]
    indicators: QualityIndicators,
}

impl RepositorySnapshot {
    /// Start building a snapshot for `owner/name`.
    pub fn builder(owner: impl Into<String>, name: impl Into<String>) -> SnapshotBuilder {
        SnapshotBuilder::new(owner, name)
    }

    pub fn owner(&self) -> &str {
        &self.owner
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// `owner/name`.
    pub fn full_name(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    pub fn metadata(&self) -> &RepositoryMetadata {
        &self.metadata
    }

    pub fn file_tree(&self) -> &[String] {
        &self.file_tree
    }

    pub fn dependencies(&self) -> &IndexMap<String, String> {
        &self.dependencies
    }

    pub fn languages(&self) -> &IndexMap<String, u64> {
        &self.languages
    }

    /// Recent commits, most recent first.
    pub fn commits(&self) -> &[Commit] {
        &self.commits
    }

    pub fn readme(&self) -> Option<&str> {
        self.readme.as_deref()
    }

    pub fn main_file(&self) -> Option<&str> {
        self.main_file.as_deref()
    }

    pub fn indicators(&self) -> QualityIndicators {
        self.indicators
    }

    pub fn has_tests(&self) -> bool {
        self.indicators.has_tests
    }

    pub fn has_ci(&self) -> bool {
        self.indicators.has_ci
    }

    pub fn has_dockerfile(&self) -> bool {
        self.indicators.has_dockerfile
    }
}

/// Builder that applies every snapshot bound on [`build`](Self::build).
#[derive(Debug, Clone, Default)]
pub struct SnapshotBuilder {
    owner: String,
    name: String,
    metadata: RepositoryMetadata,
    file_tree: Vec<String>,
    dependencies: IndexMap<String, String>,
    languages: IndexMap<String, u64>,
    commits: Vec<Commit>,
    readme: Option<String>,
    main_file: Option<String>,
}

impl SnapshotBuilder {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn metadata(mut self, metadata: RepositoryMetadata) -> Self {
        self.metadata = metadata;
        self
    }

    pub fn file_tree<I, S>(mut self, paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.file_tree = paths.into_iter().map(Into::into).collect();
        self
    }

    pub fn dependencies(mut self, dependencies: IndexMap<String, String>) -> Self {
        self.dependencies = dependencies;
        self
    }

    pub fn dependency(mut self, name: impl Into<String>, version: impl Into<String>) -> Self {
        self.dependencies.insert(name.into(), version.into());
        self
    }

    pub fn languages(mut self, languages: IndexMap<String, u64>) -> Self {
        self.languages = languages;
        self
    }

    pub fn language(mut self, name: impl Into<String>, bytes: u64) -> Self {
        self.languages.insert(name.into(), bytes);
        self
    }

    pub fn commits(mut self, commits: Vec<Commit>) -> Self {
        self.commits = commits;
        self
    }

    pub fn readme(mut self, readme: Option<String>) -> Self {
        self.readme = readme;
        self
    }

    pub fn main_file(mut self, main_file: Option<String>) -> Self {
        self.main_file = main_file;
        self
    }

    /// Apply bounds, derive indicators and produce the snapshot.
    pub fn build(self) -> Result<RepositorySnapshot, SnapshotError> {
        if self.owner.trim().is_empty() {
            return Err(SnapshotError::EmptyIdentifier("owner"));
        }
        if self.name.trim().is_empty() {
            return Err(SnapshotError::EmptyIdentifier("name"));
        }

        let mut file_tree = self.file_tree;
        file_tree.truncate(MAX_FILE_TREE);
        let mut commits = self.commits;
        commits.truncate(MAX_COMMITS);
        let indicators = QualityIndicators::from_paths(&file_tree);

        Ok(RepositorySnapshot {
            owner: self.owner,
            name: self.name,
            metadata: self.metadata,
            file_tree,
            dependencies: self.dependencies,
            languages: self.languages,
            commits,
            readme: self.readme.as_deref().map(truncate_text),
            main_file: self.main_file.as_deref().map(truncate_text),
            indicators,
        })
    }
}

/// Serialized shape of a snapshot. Indicator fields, if present, are ignored.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SnapshotParts {
    owner: String,
    name: String,
    #[serde(default)]
    metadata: RepositoryMetadata,
    #[serde(default)]
    file_tree: Vec<String>,
    #[serde(default)]
    dependencies: IndexMap<String, String>,
    #[serde(default)]
    languages: IndexMap<String, u64>,
    #[serde(default)]
    commits: Vec<Commit>,
    #[serde(default)]
    readme: Option<String>,
    #[serde(default)]
    main_file: Option<String>,
}

impl TryFrom<SnapshotParts> for RepositorySnapshot {
    type Error = SnapshotError;

    fn try_from(parts: SnapshotParts) -> Result<Self, Self::Error> {
        SnapshotBuilder::new(parts.owner, parts.name)
            .metadata(parts.metadata)
            .file_tree(parts.file_tree)
            .dependencies(parts.dependencies)
            .languages(parts.languages)
            .commits(parts.commits)
            .readme(parts.readme)
            .main_file(parts.main_file)
            .build()
    }
}
