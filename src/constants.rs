//! App-wide constants.
//!
//! Centralises the tool name, config paths, environment variable names,
//! and URLs so a rename only requires changing this file.

/// Display name of the tool (lowercase).
pub const APP_NAME: &str = "gitgrade";

/// Crate version baked in at compile time.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Local config filename (e.g. `.gitgrade.toml` in the working directory).
pub const CONFIG_FILENAME: &str = ".gitgrade.toml";

/// Directory name under `~/.config/` for global config.
pub const CONFIG_DIR: &str = "gitgrade";

/// Base URL of the GitHub REST API.
pub const GITHUB_API_URL: &str = "https://api.github.com";

/// `User-Agent` header sent to GitHub (required by its API).
pub const USER_AGENT: &str = concat!("gitgrade/", env!("CARGO_PKG_VERSION"));

// ── Environment variable names ──────────────────────────────────────

pub const ENV_TIMEOUT: &str = "GITGRADE_TIMEOUT";
pub const ENV_USAGE: &str = "GITGRADE_USAGE";
pub const ENV_USAGE_URL: &str = "GITGRADE_USAGE_URL";
pub const ENV_LOG: &str = "GITGRADE_LOG";
pub const ENV_GITHUB_TOKEN: &str = "GITHUB_TOKEN";
