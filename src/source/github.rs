//! GitHub REST acquisition.
//!
//! Repository metadata and the file tree are required; the manifest,
//! README, entry point, commits and languages are best effort. A failed
//! optional fetch is logged and leaves its field empty.

use std::time::Duration;

use async_trait::async_trait;
use base64::Engine as _;
use indexmap::IndexMap;
use reqwest::StatusCode;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::constants;
use crate::models::{Commit, RepositoryMetadata, RepositorySnapshot};

use super::identifier::RepoId;
use super::manifest::{MANIFEST_FILES, parse_dependencies};
use super::{RepositorySource, SourceError};

/// Request timeout for every GitHub call.
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Number of recent commits requested.
const COMMITS_PER_PAGE: usize = crate::models::snapshot::MAX_COMMITS;

const README_FILES: &[&str] = &["README.md", "readme.md", "README.txt", "readme.txt"];

/// Entry points checked by exact path before the `src/` fallback.
const ENTRY_POINTS: &[&str] = &[
    "src/index.tsx",
    "src/main.tsx",
    "src/App.tsx",
    "src/index.js",
    "src/main.js",
    "src/App.js",
    "index.js",
    "main.py",
    "app.py",
    "main.go",
];

/// Fetches snapshots from the GitHub REST API.
#[derive(Clone)]
pub struct GithubSource {
    client: reqwest::Client,
    api_url: String,
    token: Option<String>,
}

impl std::fmt::Debug for GithubSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubSource")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

#[derive(Deserialize)]
struct RepoResponse {
    #[serde(default)]
    stargazers_count: u64,
    #[serde(default)]
    forks_count: u64,
    #[serde(default)]
    open_issues_count: u64,
    description: Option<String>,
    language: Option<String>,
    #[serde(default)]
    size: u64,
    created_at: Option<String>,
    updated_at: Option<String>,
    default_branch: String,
}

impl From<RepoResponse> for RepositoryMetadata {
    fn from(repo: RepoResponse) -> Self {
        RepositoryMetadata {
            stars: repo.stargazers_count,
            forks: repo.forks_count,
            open_issues: repo.open_issues_count,
            description: repo.description,
            language: repo.language,
            size: repo.size,
            created_at: repo.created_at,
            updated_at: repo.updated_at,
            default_branch: Some(repo.default_branch),
        }
    }
}

#[derive(Deserialize)]
struct TreeResponse {
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

#[derive(Deserialize)]
struct TreeEntry {
    path: String,
    #[serde(rename = "type")]
    kind: String,
}

#[derive(Deserialize)]
struct ContentResponse {
    content: Option<String>,
    encoding: Option<String>,
}

#[derive(Deserialize)]
struct CommitResponse {
    commit: CommitDetail,
}

#[derive(Deserialize)]
struct CommitDetail {
    message: String,
    author: Option<CommitAuthor>,
}

#[derive(Deserialize)]
struct CommitAuthor {
    name: Option<String>,
    date: Option<String>,
}

impl From<CommitResponse> for Commit {
    fn from(response: CommitResponse) -> Self {
        let (author, date) = response
            .commit
            .author
            .map(|a| (a.name, a.date))
            .unwrap_or_default();
        Commit {
            message: response.commit.message,
            author,
            date,
        }
    }
}

impl GithubSource {
    pub fn new(api_url: impl Into<String>, token: Option<String>) -> Result<Self, SourceError> {
        let client = reqwest::Client::builder()
            .user_agent(constants::USER_AGENT)
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| SourceError::Http(format!("failed to create HTTP client: {e}")))?;
        Ok(Self {
            client,
            api_url: api_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    fn repo_url(&self, id: &RepoId, tail: &str) -> String {
        format!("{}/repos/{}/{}{tail}", self.api_url, id.owner, id.name)
    }

    /// GET a URL and decode its JSON body.
    async fn get_json<T: DeserializeOwned>(&self, url: &str) -> Result<T, SourceError> {
        let mut request = self
            .client
            .get(url)
            .header("Accept", "application/vnd.github+json");
        if let Some(token) = &self.token {
            request = request.bearer_auth(token);
        }

        let resp = request
            .send()
            .await
            .map_err(|e| SourceError::Http(format!("{url}: {e}")))?;

        let status = resp.status();
        if status == StatusCode::NOT_FOUND {
            return Err(SourceError::NotFound(url.to_string()));
        }
        if !status.is_success() {
            let body = resp
                .text()
                .await
                .unwrap_or_else(|_| "<no body>".to_string());
            return Err(SourceError::Http(format!(
                "{url}: GitHub API returned HTTP {status}: {body}"
            )));
        }

        resp.json()
            .await
            .map_err(|e| SourceError::Decode(format!("{url}: {e}")))
    }

    /// Blob paths of the default branch, recursive when GitHub allows it.
    async fn fetch_tree(&self, id: &RepoId, branch: &str) -> Result<Vec<String>, SourceError> {
        let tree_url = self.repo_url(id, &format!("/git/trees/{branch}"));
        let response: TreeResponse =
            match self.get_json(&format!("{tree_url}?recursive=1")).await {
                Ok(tree) => tree,
                Err(e) => {
                    warn!(repo = %id, error = %e, "recursive tree failed, falling back to top level");
                    self.get_json(&tree_url).await?
                }
            };
        if response.truncated {
            debug!(repo = %id, "GitHub truncated the tree listing");
        }
        Ok(response
            .tree
            .into_iter()
            .filter(|entry| entry.kind == "blob")
            .map(|entry| entry.path)
            .collect())
    }

    /// Decoded file text, or an empty string when it cannot be fetched.
    async fn fetch_file(&self, id: &RepoId, path: &str) -> String {
        let url = self.repo_url(id, &format!("/contents/{}", encode_path(path)));
        match self.get_json::<ContentResponse>(&url).await {
            Ok(content) => decode_content(&content).unwrap_or_else(|| {
                warn!(repo = %id, path, "file content is not base64 text");
                String::new()
            }),
            Err(e) => {
                warn!(repo = %id, path, error = %e, "failed to fetch file");
                String::new()
            }
        }
    }

    async fn fetch_commits(&self, id: &RepoId) -> Vec<Commit> {
        let url = self.repo_url(id, &format!("/commits?per_page={COMMITS_PER_PAGE}"));
        match self.get_json::<Vec<CommitResponse>>(&url).await {
            Ok(commits) => commits.into_iter().map(Commit::from).collect(),
            Err(e) => {
                warn!(repo = %id, error = %e, "failed to fetch commits");
                Vec::new()
            }
        }
    }

    async fn fetch_languages(&self, id: &RepoId) -> IndexMap<String, u64> {
        let url = self.repo_url(id, "/languages");
        match self.get_json(&url).await {
            Ok(languages) => languages,
            Err(e) => {
                warn!(repo = %id, error = %e, "failed to fetch languages");
                IndexMap::new()
            }
        }
    }
}

#[async_trait]
impl RepositorySource for GithubSource {
    async fn fetch(&self, identifier: &str) -> Result<RepositorySnapshot, SourceError> {
        let id = RepoId::parse(identifier)?;

        debug!(repo = %id, "fetching repository metadata");
        let repo: RepoResponse = match self.get_json(&self.repo_url(&id, "")).await {
            Err(SourceError::NotFound(_)) => return Err(SourceError::NotFound(id.to_string())),
            other => other?,
        };
        let branch = repo.default_branch.clone();

        debug!(repo = %id, branch = %branch, "fetching file tree");
        let paths = self.fetch_tree(&id, &branch).await?;

        let mut dependencies = IndexMap::new();
        if let Some(manifest_path) = find_by_basename(&paths, MANIFEST_FILES) {
            debug!(repo = %id, path = manifest_path, "reading manifest");
            let content = self.fetch_file(&id, manifest_path).await;
            dependencies = parse_dependencies(basename(manifest_path), &content);
        }

        let readme = match find_by_basename(&paths, README_FILES) {
            Some(path) => non_empty(self.fetch_file(&id, path).await),
            None => None,
        };

        let main_file = match find_entry_point(&paths) {
            Some(path) => non_empty(self.fetch_file(&id, path).await),
            None => None,
        };

        let commits = self.fetch_commits(&id).await;
        let languages = self.fetch_languages(&id).await;

        let snapshot = RepositorySnapshot::builder(id.owner, id.name)
            .metadata(repo.into())
            .file_tree(paths)
            .dependencies(dependencies)
            .languages(languages)
            .commits(commits)
            .readme(readme)
            .main_file(main_file)
            .build()?;
        Ok(snapshot)
    }
}

fn basename(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// First path, in tree order, whose file name is one of `names`.
fn find_by_basename<'a>(paths: &'a [String], names: &[&str]) -> Option<&'a str> {
    paths
        .iter()
        .map(String::as_str)
        .find(|path| names.contains(&basename(path)))
}

/// A well-known entry point, else the first script under `src/`.
fn find_entry_point(paths: &[String]) -> Option<&str> {
    paths
        .iter()
        .map(String::as_str)
        .find(|path| ENTRY_POINTS.contains(path))
        .or_else(|| {
            paths.iter().map(String::as_str).find(|path| {
                path.starts_with("src/") && (path.ends_with(".tsx") || path.ends_with(".js"))
            })
        })
}

fn decode_content(content: &ContentResponse) -> Option<String> {
    if content.encoding.as_deref() != Some("base64") {
        return None;
    }
    // GitHub wraps the base64 payload at 60 columns.
    let packed: String = content
        .content
        .as_deref()?
        .chars()
        .filter(|c| !c.is_whitespace())
        .collect();
    let bytes = base64::engine::general_purpose::STANDARD
        .decode(packed)
        .ok()?;
    Some(String::from_utf8_lossy(&bytes).into_owned())
}

/// Percent-encode the characters that would break a contents URL path.
fn encode_path(path: &str) -> String {
    let mut encoded = String::with_capacity(path.len());
    for c in path.chars() {
        match c {
            '%' => encoded.push_str("%25"),
            ' ' => encoded.push_str("%20"),
            '#' => encoded.push_str("%23"),
            '?' => encoded.push_str("%3F"),
            _ => encoded.push(c),
        }
    }
    encoded
}

fn non_empty(text: String) -> Option<String> {
    if text.trim().is_empty() { None } else { Some(text) }
}
