//! Repository identifier parsing.
//!
//! Accepts the forms people paste: `owner/repo`, `github.com/owner/repo`,
//! full `https://` URLs (with or without `.git` and trailing segments such
//! as `/tree/main`) and SSH remotes (`git@github.com:owner/repo.git`).

use std::fmt;

use super::SourceError;

const GITHUB_HOST: &str = "github.com";

/// Owner and repository name of a GitHub repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoId {
    pub owner: String,
    pub name: String,
}

impl RepoId {
    pub fn parse(identifier: &str) -> Result<Self, SourceError> {
        let invalid = |reason: &str| {
            SourceError::InvalidIdentifier(format!("'{}': {reason}", identifier.trim()))
        };

        let mut rest = identifier.trim();
        if rest.is_empty() {
            return Err(invalid("empty identifier"));
        }

        if let Some(ssh) = rest.strip_prefix("git@") {
            rest = ssh
                .strip_prefix(GITHUB_HOST)
                .and_then(|r| r.strip_prefix(':'))
                .ok_or_else(|| invalid("only github.com remotes are supported"))?;
        } else if let Some((scheme, after)) = rest.split_once("://") {
            if !matches!(scheme.to_lowercase().as_str(), "http" | "https") {
                return Err(invalid("unsupported URL scheme"));
            }
            rest = strip_github_host(after).ok_or_else(|| invalid("only github.com URLs are supported"))?;
        } else if let Some(after) = strip_github_host(rest) {
            rest = after;
        }

        // Query strings and fragments never carry the owner or name.
        let rest = rest.split(['?', '#']).next().unwrap_or_default();

        let mut segments = rest.split('/').filter(|s| !s.is_empty());
        let (Some(owner), Some(name)) = (segments.next(), segments.next()) else {
            return Err(invalid("expected owner/repo"));
        };
        let name = name.strip_suffix(".git").unwrap_or(name);

        if !is_valid_segment(owner) || !is_valid_segment(name) {
            return Err(invalid("owner and repository may only contain letters, digits, '-', '_' and '.'"));
        }

        Ok(Self {
            owner: owner.to_string(),
            name: name.to_string(),
        })
    }
}

impl fmt::Display for RepoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

/// Strip a leading `github.com/` or `www.github.com/` (case-insensitive host).
fn strip_github_host(text: &str) -> Option<&str> {
    let (host, path) = text.split_once('/').unwrap_or((text, ""));
    let host = host.to_lowercase();
    let host = host.strip_prefix("www.").unwrap_or(&host);
    (host == GITHUB_HOST).then_some(path)
}

fn is_valid_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && segment
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '-' | '_' | '.'))
}
