// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use log::warn;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fs;
use std::path::{Path, PathBuf};

pub const CONFIG_PATH_ENV: &str = "REPO_CONFIG_PATH";
pub const DEFAULT_CONFIG_PATH: &str = "repo_config.yaml";

#[derive(Debug)]
pub enum ConfigError {
    LoadError(String),
    ValidationError(String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::LoadError(msg) => write!(f, "Configuration load error: {}", msg),
            ConfigError::ValidationError(msg) => {
                write!(f, "Configuration validation error: {}", msg)
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct RepoConfig {
    pub id: String,
    #[serde(default)]
    pub paths: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag_dir: Option<String>,
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    #[serde(default = "default_workers")]
    pub workers: usize,
    #[serde(default = "default_request_timeout_seconds")]
    pub request_timeout_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            workers: default_workers(),
            request_timeout_seconds: default_request_timeout_seconds(),
        }
    }
}

impl ServerConfig {
    pub fn address_tuple(&self) -> (&str, u16) {
        (self.host.as_str(), self.port)
    }
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}

fn default_port() -> u16 {
    8080
}

fn default_workers() -> usize {
    4
}

fn default_request_timeout_seconds() -> u64 {
    60
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

/// External repository-metadata generator invoked inside a live tag directory.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct MetadataConfig {
    #[serde(default = "default_metadata_command")]
    pub command: String,
    #[serde(default = "default_metadata_args")]
    pub args: Vec<String>,
}

impl Default for MetadataConfig {
    fn default() -> Self {
        Self {
            command: default_metadata_command(),
            args: default_metadata_args(),
        }
    }
}

fn default_metadata_command() -> String {
    "createrepo_c".to_string()
}

fn default_metadata_args() -> Vec<String> {
    vec![".".to_string()]
}

fn default_tags_base() -> String {
    "repo/tags".to_string()
}

fn default_assets_dir() -> String {
    "assets".to_string()
}

#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct Config {
    #[serde(default)]
    pub base_path: String,
    #[serde(default = "default_tags_base")]
    pub tags_base: String,
    #[serde(default = "default_assets_dir")]
    pub assets_dir: String,
    #[serde(default)]
    pub repos: Vec<RepoConfig>,
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
    #[serde(default)]
    pub metadata: MetadataConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            base_path: String::new(),
            tags_base: default_tags_base(),
            assets_dir: default_assets_dir(),
            repos: Vec::new(),
            server: ServerConfig::default(),
            logging: LoggingConfig::default(),
            metadata: MetadataConfig::default(),
        }
    }
}

/// Resolves the config file location: explicit path first, then
/// `REPO_CONFIG_PATH`, then `repo_config.yaml` in the working directory.
pub fn resolve_config_path(explicit: Option<PathBuf>) -> PathBuf {
    if let Some(path) = explicit {
        return path;
    }
    match std::env::var(CONFIG_PATH_ENV) {
        Ok(value) if !value.trim().is_empty() => PathBuf::from(value),
        _ => PathBuf::from(DEFAULT_CONFIG_PATH),
    }
}

impl Config {
    pub fn load(config_path: &Path) -> Result<Self, ConfigError> {
        let config_content = fs::read_to_string(config_path).map_err(|e| {
            ConfigError::LoadError(format!(
                "Failed to read config file '{}': {}",
                config_path.display(),
                e
            ))
        })?;
        Self::parse(&config_content).map_err(|e| match e {
            ConfigError::LoadError(msg) => ConfigError::LoadError(format!(
                "Failed to parse config file '{}': {}",
                config_path.display(),
                msg
            )),
            other => other,
        })
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        let mut config: Config =
            serde_yaml::from_str(content).map_err(|e| ConfigError::LoadError(e.to_string()))?;
        if config.tags_base.trim().is_empty() {
            config.tags_base = default_tags_base();
        }
        Ok(config)
    }

    /// Loads and validates configuration at startup. If validation fails, the server must not start.
    pub fn load_and_validate(config_path: &Path) -> Result<Self, ConfigError> {
        let config = Self::load(config_path)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::validate_repos(&self.repos)?;
        Self::validate_server(&self.server)?;
        Self::validate_logging(&self.logging)?;

        if self.metadata.command.trim().is_empty() {
            return Err(ConfigError::ValidationError(
                "metadata.command must not be empty".to_string(),
            ));
        }

        if self.repos.is_empty() {
            warn!("No repositories configured; the browser and API will be empty");
        }

        Ok(())
    }

    fn validate_repos(repos: &[RepoConfig]) -> Result<(), ConfigError> {
        let mut seen = HashSet::new();
        for repo in repos {
            let id = repo.id.trim();
            if id.is_empty() {
                return Err(ConfigError::ValidationError(
                    "Repository id must not be empty".to_string(),
                ));
            }
            if id != repo.id || id.contains('/') || id.contains('\\') || id == "." || id == ".." {
                return Err(ConfigError::ValidationError(format!(
                    "Repository id '{}' must be a single path segment",
                    repo.id
                )));
            }
            if !seen.insert(id) {
                return Err(ConfigError::ValidationError(format!(
                    "Duplicate repository id '{}'",
                    repo.id
                )));
            }
            if repo.paths.is_empty() {
                warn!(
                    "Repository '{}' has no source paths; its tags will be empty",
                    repo.id
                );
            }
        }
        Ok(())
    }

    fn validate_server(server: &ServerConfig) -> Result<(), ConfigError> {
        if server.workers == 0 {
            return Err(ConfigError::ValidationError(
                "server.workers must be at least 1".to_string(),
            ));
        }
        if server.request_timeout_seconds == 0 {
            return Err(ConfigError::ValidationError(
                "server.request_timeout_seconds must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    fn validate_logging(logging: &LoggingConfig) -> Result<(), ConfigError> {
        match logging.level.to_lowercase().as_str() {
            "trace" | "debug" | "info" | "warn" | "error" => Ok(()),
            other => Err(ConfigError::ValidationError(format!(
                "logging.level must be one of trace, debug, info, warn, error; got: {}",
                other
            ))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_fixtures::TestFixtureRoot;

    #[test]
    fn parse_applies_defaults() {
        let config = Config::parse("base_path: /srv\nrepos:\n  - id: alpha\n    paths: [os]\n")
            .expect("valid config");
        assert_eq!(config.tags_base, "repo/tags");
        assert_eq!(config.assets_dir, "assets");
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.server.request_timeout_seconds, 60);
        assert_eq!(config.metadata.command, "createrepo_c");
        assert_eq!(config.metadata.args, vec![".".to_string()]);
        assert_eq!(config.repos[0].tag_dir, None);
    }

    #[test]
    fn parse_replaces_blank_tags_base() {
        let config = Config::parse("tags_base: \"\"\nrepos: []\n").expect("valid config");
        assert_eq!(config.tags_base, "repo/tags");
    }

    #[test]
    fn parse_reads_tag_dir_override() {
        let yaml = "repos:\n  - id: alpha\n    paths: [a, b]\n    tag_dir: /tags/alpha\n";
        let config = Config::parse(yaml).expect("valid config");
        assert_eq!(config.repos[0].paths, vec!["a", "b"]);
        assert_eq!(config.repos[0].tag_dir.as_deref(), Some("/tags/alpha"));
    }

    #[test]
    fn load_reports_missing_file() {
        let fixture = TestFixtureRoot::new_unique("config-missing").unwrap();
        let err = Config::load(&fixture.path().join("nope.yaml")).expect_err("missing file");
        assert!(matches!(err, ConfigError::LoadError(_)));
        assert!(err.to_string().contains("nope.yaml"));
    }

    #[test]
    fn load_reports_malformed_yaml() {
        let fixture = TestFixtureRoot::new_unique("config-malformed").unwrap();
        let path = fixture.path().join("repo_config.yaml");
        fs::write(&path, "repos: [\n").unwrap();
        let err = Config::load(&path).expect_err("malformed yaml");
        assert!(err.to_string().contains("Failed to parse"));
    }

    #[test]
    fn validate_rejects_duplicate_ids() {
        let config =
            Config::parse("repos:\n  - id: alpha\n  - id: alpha\n").expect("parses before checks");
        let err = config.validate().expect_err("duplicate ids");
        assert!(err.to_string().contains("Duplicate"));
    }

    #[test]
    fn validate_rejects_nested_ids() {
        for id in ["a/b", "..", " spaced"] {
            let config = Config {
                repos: vec![RepoConfig {
                    id: id.to_string(),
                    paths: vec![],
                    tag_dir: None,
                }],
                ..Config::default()
            };
            assert!(config.validate().is_err(), "id {:?} should be rejected", id);
        }
    }

    #[test]
    fn validate_rejects_zero_workers_and_bad_level() {
        let mut config = Config::default();
        config.server.workers = 0;
        assert!(config.validate().is_err());

        let mut config = Config::default();
        config.logging.level = "loud".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn resolve_config_path_prefers_explicit_value() {
        let explicit = PathBuf::from("/etc/rpmtag.yaml");
        assert_eq!(resolve_config_path(Some(explicit.clone())), explicit);
    }
}
