//! Configuration management with layered hierarchy

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Directory listing fetched by `--remote` when nothing overrides it
pub const DEFAULT_LISTING_URL: &str =
    "https://api.github.com/repos/SHA-4096/json-schema-hub/contents/schemas";

/// Sent with every remote request; the GitHub API rejects anonymous agents
pub const DEFAULT_USER_AGENT: &str = concat!("schemahub/", env!("CARGO_PKG_VERSION"));

/// Name of the per-directory config file
pub const LOCAL_CONFIG_FILE: &str = ".schemahub.yaml";

/// SchemaHub configuration with layered hierarchy
#[derive(Debug, Default, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    /// Repository directory listing used for remote loading
    pub listing_url: Option<String>,

    /// Directory that receives generated.json
    pub output_dir: Option<PathBuf>,

    /// Token sent as a bearer credential to the listing host
    pub github_token: Option<String>,

    /// User-Agent header for remote requests
    pub user_agent: Option<String>,
}

impl Config {
    /// Load configuration from all sources, merging in priority order
    pub fn load() -> Self {
        let mut config = Config::default();

        // 1. Built-in defaults (accessor fallbacks)

        // 2. Global user config (~/.config/schemahub/config.yaml)
        if let Some(global_path) = Self::global_config_path() {
            if let Some(global) = Self::read_file(&global_path) {
                config.merge(global);
            }
        }

        // 3. Working directory config (./.schemahub.yaml)
        if let Some(local) = Self::read_file(&Self::local_config_path()) {
            config.merge(local);
        }

        // 4. Environment variables
        config.merge(Self::from_env(|key| std::env::var(key).ok()));

        config
    }

    /// Build a config layer from environment lookups
    pub fn from_env<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        Config {
            listing_url: lookup("SCHEMAHUB_LISTING_URL"),
            output_dir: lookup("SCHEMAHUB_OUTPUT_DIR").map(PathBuf::from),
            github_token: lookup("SCHEMAHUB_GITHUB_TOKEN"),
            user_agent: None,
        }
    }

    fn read_file(path: &std::path::Path) -> Option<Config> {
        if !path.exists() {
            return None;
        }
        let contents = std::fs::read_to_string(path).ok()?;
        match serde_yml::from_str::<Config>(&contents) {
            Ok(config) => Some(config),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "ignoring unreadable config");
                None
            }
        }
    }

    /// Get the path to the global config file
    pub fn global_config_path() -> Option<PathBuf> {
        directories::ProjectDirs::from("", "", "schemahub")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
    }

    /// Get the path to the working directory config file
    pub fn local_config_path() -> PathBuf {
        PathBuf::from(LOCAL_CONFIG_FILE)
    }

    /// Merge another config into this one (other takes precedence)
    pub fn merge(&mut self, other: Config) {
        if other.listing_url.is_some() {
            self.listing_url = other.listing_url;
        }
        if other.output_dir.is_some() {
            self.output_dir = other.output_dir;
        }
        if other.github_token.is_some() {
            self.github_token = other.github_token;
        }
        if other.user_agent.is_some() {
            self.user_agent = other.user_agent;
        }
    }

    pub fn listing_url(&self) -> &str {
        self.listing_url.as_deref().unwrap_or(DEFAULT_LISTING_URL)
    }

    pub fn output_dir(&self) -> PathBuf {
        self.output_dir.clone().unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn user_agent(&self) -> &str {
        self.user_agent.as_deref().unwrap_or(DEFAULT_USER_AGENT)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.listing_url(), DEFAULT_LISTING_URL);
        assert_eq!(config.output_dir(), PathBuf::from("."));
        assert!(config.user_agent().starts_with("schemahub/"));
    }

    #[test]
    fn test_merge_prefers_other() {
        let mut base = Config {
            listing_url: Some("https://a.example/list".into()),
            output_dir: Some(PathBuf::from("out")),
            ..Default::default()
        };
        base.merge(Config {
            listing_url: Some("https://b.example/list".into()),
            ..Default::default()
        });
        assert_eq!(base.listing_url(), "https://b.example/list");
        assert_eq!(base.output_dir(), PathBuf::from("out"));
    }

    #[test]
    fn test_env_layer() {
        let vars: HashMap<&str, &str> = [
            ("SCHEMAHUB_LISTING_URL", "https://env.example/list"),
            ("SCHEMAHUB_GITHUB_TOKEN", "secret"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_env(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.listing_url.as_deref(), Some("https://env.example/list"));
        assert_eq!(config.github_token.as_deref(), Some("secret"));
        assert!(config.output_dir.is_none());
    }

    #[test]
    fn test_yaml_layer_parses() {
        let yaml = "listing_url: https://yaml.example/list\noutput_dir: exports\n";
        let config: Config = serde_yml::from_str(yaml).unwrap();
        assert_eq!(config.listing_url(), "https://yaml.example/list");
        assert_eq!(config.output_dir(), PathBuf::from("exports"));
    }
}
