// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use crate::config::{Config, LoggingConfig, MetadataConfig, RepoConfig, ServerConfig};
use crate::util::test_fixtures::TestFixtureRoot;

#[derive(Debug, Clone)]
pub struct TestConfigBuilder {
    config: Config,
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: Config {
                base_path: String::new(),
                tags_base: "repo/tags".to_string(),
                assets_dir: "assets".to_string(),
                repos: Vec::new(),
                server: ServerConfig {
                    host: "127.0.0.1".to_string(),
                    port: 5480,
                    workers: 1,
                    request_timeout_seconds: 60,
                },
                logging: LoggingConfig {
                    level: "info".to_string(),
                },
                metadata: MetadataConfig::default(),
            },
        }
    }

    /// Points the builder at a fixture: sources under `mirror/`, shared tags
    /// under `tags/_shared`.
    pub fn for_fixture(fixture: &TestFixtureRoot) -> Self {
        Self::new()
            .with_base_path(&fixture.mirror_dir().to_string_lossy())
            .with_tags_base(&fixture.tags_dir("_shared").to_string_lossy())
    }

    pub fn with_base_path(mut self, base_path: &str) -> Self {
        self.config.base_path = base_path.to_string();
        self
    }

    pub fn with_tags_base(mut self, tags_base: &str) -> Self {
        self.config.tags_base = tags_base.to_string();
        self
    }

    pub fn with_assets_dir(mut self, assets_dir: &str) -> Self {
        self.config.assets_dir = assets_dir.to_string();
        self
    }

    pub fn with_repo(mut self, id: &str, paths: &[&str], tag_dir: Option<&str>) -> Self {
        self.config.repos.push(RepoConfig {
            id: id.to_string(),
            paths: paths.iter().map(|p| p.to_string()).collect(),
            tag_dir: tag_dir.map(|dir| dir.to_string()),
        });
        self
    }

    pub fn build(self) -> Config {
        self.config
    }
}
