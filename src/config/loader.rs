//! Config struct and loading logic.
//!
//! Priority (highest to lowest):
//! 1. CLI flags
//! 2. Environment variables
//! 3. `.gitgrade.toml` in the working directory
//! 4. `~/.config/gitgrade/config.toml` (global defaults)
//! 5. Built-in defaults

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::warn;

use crate::constants;
use crate::env::Env;
use crate::models::ProviderName;

/// Errors during config loading.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse config file {path}: {source}")]
    ParseFile {
        path: PathBuf,
        source: toml::de::Error,
    },
}

/// Top-level configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub orchestrator: OrchestratorConfig,
    pub producers: Vec<ProducerConfig>,
    pub github: GithubConfig,
    pub usage: UsageConfig,
}

/// Orchestrator settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OrchestratorConfig {
    /// Upper bound on a single producer attempt.
    pub attempt_timeout_secs: u64,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            attempt_timeout_secs: 20,
        }
    }
}

/// One `[[producers]]` entry: a provider and the models to try on it, in order.
#[derive(Clone, PartialEq, Serialize, Deserialize)]
pub struct ProducerConfig {
    pub provider: ProviderName,
    pub models: Vec<String>,
    #[serde(default)]
    pub base_url: Option<String>,
    #[serde(default)]
    pub api_key: Option<String>,
}

impl std::fmt::Debug for ProducerConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProducerConfig")
            .field("provider", &self.provider)
            .field("models", &self.models)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl ProducerConfig {
    pub fn new(provider: ProviderName, models: &[&str]) -> Self {
        Self {
            provider,
            models: models.iter().map(|m| m.to_string()).collect(),
            base_url: None,
            api_key: None,
        }
    }
}

/// Groq first, then Gemini, each with its fallback models.
fn default_producers() -> Vec<ProducerConfig> {
    vec![
        ProducerConfig::new(
            ProviderName::Groq,
            &["llama-3.1-8b-instant", "llama3-8b-8192", "mixtral-8x7b-32768"],
        ),
        ProducerConfig::new(
            ProviderName::Gemini,
            &[
                "gemini-1.5-flash-latest",
                "gemini-1.5-pro-latest",
                "gemini-1.0-pro",
            ],
        ),
    ]
}

/// GitHub acquisition settings.
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    pub api_url: String,
    pub token: Option<String>,
}

impl std::fmt::Debug for GithubConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GithubConfig")
            .field("api_url", &self.api_url)
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            api_url: constants::GITHUB_API_URL.to_string(),
            token: None,
        }
    }
}

/// Usage counter settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct UsageConfig {
    /// Whether completed analyses are counted at all.
    pub enabled: bool,
    /// Endpoint notified once per completed analysis. Counting stays
    /// in-process when unset.
    pub url: Option<String>,
}

impl Default for UsageConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            url: None,
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            orchestrator: OrchestratorConfig::default(),
            producers: default_producers(),
            github: GithubConfig::default(),
            usage: UsageConfig::default(),
        }
    }
}

impl Config {
    /// Load configuration with proper layering.
    ///
    /// Reads from global config, the working-directory config, then
    /// applies environment variable overrides.
    pub fn load(work_dir: Option<&Path>, env: &Env) -> Result<Self, ConfigError> {
        let mut config = Config::default();

        // Layer 4: global config
        if let Some(global_path) = Self::global_config_path() {
            if global_path.exists() {
                let global = Self::load_file(&global_path)?;
                config.merge(global);
            }
        }

        // Layer 3: local config
        if let Some(dir) = work_dir {
            let local_path = dir.join(constants::CONFIG_FILENAME);
            if local_path.exists() {
                let local = Self::load_file(&local_path)?;
                config.merge(local);
            }
        }

        // Layer 2: environment variables
        config.apply_env_vars(env);

        Ok(config)
    }

    /// Load a config from a specific file.
    fn load_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadFile {
            path: path.to_path_buf(),
            source: e,
        })?;
        toml::from_str(&content).map_err(|e| ConfigError::ParseFile {
            path: path.to_path_buf(),
            source: e,
        })
    }

    /// Get the global config file path.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|d| d.join(constants::CONFIG_DIR).join("config.toml"))
    }

    /// Merge another config into this one (other takes precedence for non-default values).
    fn merge(&mut self, other: Config) {
        match other.orchestrator.attempt_timeout_secs {
            0 => warn!("ignoring attempt_timeout_secs = 0, the timeout must be at least 1s"),
            secs if secs != OrchestratorConfig::default().attempt_timeout_secs => {
                self.orchestrator.attempt_timeout_secs = secs;
            }
            _ => {}
        }

        // A producer list replaces the chain wholesale, it is never spliced.
        if other.producers != default_producers() {
            self.producers = other.producers;
        }

        if other.github.api_url != constants::GITHUB_API_URL {
            self.github.api_url = other.github.api_url;
        }
        if other.github.token.is_some() {
            self.github.token = other.github.token;
        }

        // Usage settings (disabled overrides enabled)
        if !other.usage.enabled {
            self.usage.enabled = false;
        }
        if other.usage.url.is_some() {
            self.usage.url = other.usage.url;
        }
    }

    /// Apply environment variable overrides.
    fn apply_env_vars(&mut self, env: &Env) {
        if let Ok(val) = env.var(constants::ENV_TIMEOUT) {
            match val.parse::<u64>() {
                Ok(secs) if secs > 0 => self.orchestrator.attempt_timeout_secs = secs,
                _ => warn!("ignoring invalid {} value: {val}", constants::ENV_TIMEOUT),
            }
        }

        // Provider-specific API keys fill producers that have none configured.
        for producer in &mut self.producers {
            if producer.api_key.is_none() {
                producer.api_key = env.var(producer.provider.api_key_env_var()).ok();
            }
        }

        if let Ok(val) = env.var(constants::ENV_GITHUB_TOKEN) {
            self.github.token = Some(val);
        }

        match env.flag(constants::ENV_USAGE) {
            Some(Ok(enabled)) => self.usage.enabled = enabled,
            Some(Err(val)) => warn!("ignoring invalid {} value: {val}", constants::ENV_USAGE),
            None => {}
        }
        if let Ok(val) = env.var(constants::ENV_USAGE_URL) {
            self.usage.url = Some(val);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = Config::default();
        assert_eq!(config.orchestrator.attempt_timeout_secs, 20);
        assert_eq!(config.producers.len(), 2);
        assert_eq!(config.producers[0].provider, ProviderName::Groq);
        assert_eq!(config.producers[0].models[0], "llama-3.1-8b-instant");
        assert_eq!(config.producers[1].provider, ProviderName::Gemini);
        assert_eq!(config.producers[1].models.len(), 3);
        assert_eq!(config.github.api_url, "https://api.github.com");
        assert!(config.usage.enabled);
        assert!(config.usage.url.is_none());
    }

    #[test]
    fn parse_toml_config() {
        let toml_str = r#"
[orchestrator]
attempt_timeout_secs = 5

[[producers]]
provider = "anthropic"
models = ["claude-sonnet-4-20250514"]

[[producers]]
provider = "openai-compatible"
models = ["llama3"]
base_url = "http://localhost:11434/v1"
api_key = "local"

[github]
token = "ghp_test"

[usage]
enabled = false
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.orchestrator.attempt_timeout_secs, 5);
        assert_eq!(config.producers.len(), 2);
        assert_eq!(config.producers[0].provider, ProviderName::Anthropic);
        assert_eq!(config.producers[1].provider, ProviderName::OpenAICompatible);
        assert_eq!(
            config.producers[1].base_url.as_deref(),
            Some("http://localhost:11434/v1")
        );
        assert_eq!(config.github.token.as_deref(), Some("ghp_test"));
        assert!(!config.usage.enabled);
    }

    #[test]
    fn parse_empty_toml_keeps_default_chain() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.producers, default_producers());
    }

    #[test]
    fn empty_producer_list_is_allowed() {
        let config: Config = toml::from_str("producers = []").unwrap();
        assert!(config.producers.is_empty());
    }

    #[test]
    fn merge_overrides_non_default_values() {
        let mut base = Config::default();
        let mut other = Config::default();

        other.orchestrator.attempt_timeout_secs = 7;
        other.producers = vec![ProducerConfig::new(ProviderName::OpenAI, &["gpt-4o"])];
        other.github.api_url = "https://ghe.example.com/api/v3".to_string();
        other.github.token = Some("ghp_x".to_string());
        other.usage.enabled = false;
        other.usage.url = Some("https://stats.example.com".to_string());

        base.merge(other);

        assert_eq!(base.orchestrator.attempt_timeout_secs, 7);
        assert_eq!(base.producers.len(), 1);
        assert_eq!(base.producers[0].provider, ProviderName::OpenAI);
        assert_eq!(base.github.api_url, "https://ghe.example.com/api/v3");
        assert_eq!(base.github.token.as_deref(), Some("ghp_x"));
        assert!(!base.usage.enabled);
        assert_eq!(base.usage.url.as_deref(), Some("https://stats.example.com"));
    }

    #[test]
    fn merge_keeps_base_when_other_is_default() {
        let mut base = Config::default();
        base.orchestrator.attempt_timeout_secs = 3;
        base.producers = vec![ProducerConfig::new(ProviderName::Anthropic, &["claude"])];

        base.merge(Config::default());

        assert_eq!(base.orchestrator.attempt_timeout_secs, 3);
        assert_eq!(base.producers[0].provider, ProviderName::Anthropic);
    }

    #[test]
    fn merge_ignores_zero_timeout_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("zero.toml");
        std::fs::write(&path, "[orchestrator]\nattempt_timeout_secs = 0\n").unwrap();

        let mut base = Config::default();
        base.orchestrator.attempt_timeout_secs = 7;
        base.merge(Config::load_file(&path).unwrap());

        assert_eq!(base.orchestrator.attempt_timeout_secs, 7);
    }

    #[test]
    fn load_file_reads_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("test.toml");
        std::fs::write(&path, "[orchestrator]\nattempt_timeout_secs = 9\n").unwrap();

        let config = Config::load_file(&path).unwrap();
        assert_eq!(config.orchestrator.attempt_timeout_secs, 9);
    }

    #[test]
    fn load_file_invalid_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        std::fs::write(&path, "not valid {{ toml").unwrap();

        let result = Config::load_file(&path);
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("parse"));
    }

    #[test]
    fn load_file_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let result = Config::load_file(&dir.path().join("missing.toml"));
        assert!(result.is_err());
        assert!(result.unwrap_err().to_string().contains("read"));
    }

    #[test]
    fn load_from_work_dir() {
        let env = Env::mock(Vec::<(&str, &str)>::new());

        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join(".gitgrade.toml"),
            r#"
[[producers]]
provider = "gemini"
models = ["gemini-1.5-flash-latest"]
"#,
        )
        .unwrap();

        let config = Config::load(Some(dir.path()), &env).unwrap();
        assert_eq!(config.producers.len(), 1);
        assert_eq!(config.producers[0].provider, ProviderName::Gemini);
    }

    #[test]
    fn load_without_any_config_files() {
        let env = Env::mock(Vec::<(&str, &str)>::new());
        let dir = tempfile::tempdir().unwrap();
        let config = Config::load(Some(dir.path()), &env).unwrap();
        assert_eq!(config.producers[0].provider, ProviderName::Groq);
    }

    #[test]
    fn global_config_path_mentions_app_dir() {
        if let Some(p) = Config::global_config_path() {
            assert!(p.to_string_lossy().contains("gitgrade"));
        }
    }

    #[test]
    fn apply_env_vars_fills_provider_keys() {
        let env = Env::mock([("GROQ_API_KEY", "gsk-test"), ("GEMINI_API_KEY", "gem-test")]);
        let mut config = Config::default();
        config.apply_env_vars(&env);
        assert_eq!(config.producers[0].api_key.as_deref(), Some("gsk-test"));
        assert_eq!(config.producers[1].api_key.as_deref(), Some("gem-test"));
    }

    #[test]
    fn apply_env_vars_keeps_configured_key() {
        let env = Env::mock([("GROQ_API_KEY", "from-env")]);
        let mut config = Config::default();
        config.producers[0].api_key = Some("from-file".to_string());
        config.apply_env_vars(&env);
        assert_eq!(config.producers[0].api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn apply_env_vars_timeout_token_and_usage() {
        let env = Env::mock([
            ("GITGRADE_TIMEOUT", "12"),
            ("GITHUB_TOKEN", "ghp_env"),
            ("GITGRADE_USAGE", "off"),
            ("GITGRADE_USAGE_URL", "https://stats.example.com/hit"),
        ]);
        let mut config = Config::default();
        config.apply_env_vars(&env);
        assert_eq!(config.orchestrator.attempt_timeout_secs, 12);
        assert_eq!(config.github.token.as_deref(), Some("ghp_env"));
        assert!(!config.usage.enabled);
        assert_eq!(
            config.usage.url.as_deref(),
            Some("https://stats.example.com/hit")
        );
    }

    #[test]
    fn apply_env_vars_invalid_timeout_is_ignored() {
        let env = Env::mock([("GITGRADE_TIMEOUT", "soon"), ("GITGRADE_USAGE", "maybe")]);
        let mut config = Config::default();
        config.apply_env_vars(&env);
        assert_eq!(config.orchestrator.attempt_timeout_secs, 20);
        assert!(config.usage.enabled);
    }

    #[test]
    fn debug_redacts_secrets() {
        let mut config = Config::default();
        config.producers[0].api_key = Some("gsk-secret".to_string());
        config.github.token = Some("ghp_secret".to_string());
        let debug = format!("{config:?}");
        assert!(!debug.contains("gsk-secret"));
        assert!(!debug.contains("ghp_secret"));
        assert!(debug.contains("[REDACTED]"));
    }
}
