// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::Config;
use std::collections::BTreeMap;
use std::fmt;
use std::path::{Component, Path, PathBuf};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    UnknownRepository(String),
}

impl fmt::Display for CatalogError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CatalogError::UnknownRepository(id) => {
                write!(f, "repo '{}' not found in config file", id)
            }
        }
    }
}

impl std::error::Error for CatalogError {}

/// A configured repository with its paths already resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Repository {
    pub id: String,
    pub source_dirs: Vec<PathBuf>,
    pub tags_dir: PathBuf,
}

/// Immutable lookup from repository id to source and tag directories.
///
/// Built once from the loaded [`Config`] and shared by every handler.
#[derive(Debug, Clone, Default)]
pub struct RepoCatalog {
    repos: BTreeMap<String, Repository>,
}

impl RepoCatalog {
    pub fn from_config(config: &Config) -> Self {
        let base_path = PathBuf::from(&config.base_path);
        let repos = config
            .repos
            .iter()
            .map(|repo| {
                let source_dirs = repo
                    .paths
                    .iter()
                    .map(|p| nest_under(&base_path, p))
                    .collect();
                let tags_dir = match repo.tag_dir.as_deref() {
                    Some(dir) if !dir.is_empty() => PathBuf::from(dir),
                    _ => PathBuf::from(&config.tags_base),
                };
                (
                    repo.id.clone(),
                    Repository {
                        id: repo.id.clone(),
                        source_dirs,
                        tags_dir,
                    },
                )
            })
            .collect();
        Self { repos }
    }

    pub fn get(&self, repo_id: &str) -> Result<&Repository, CatalogError> {
        self.repos
            .get(repo_id)
            .ok_or_else(|| CatalogError::UnknownRepository(repo_id.to_string()))
    }

    /// Ordered source directories to scan for packages.
    pub fn source_paths(&self, repo_id: &str) -> Result<Vec<PathBuf>, CatalogError> {
        self.get(repo_id).map(|repo| repo.source_dirs.clone())
    }

    /// Directory holding the repository's live tags and backups.
    pub fn tags_dir(&self, repo_id: &str) -> Result<PathBuf, CatalogError> {
        self.get(repo_id).map(|repo| repo.tags_dir.clone())
    }

    /// Repositories sorted by id.
    pub fn repositories(&self) -> impl Iterator<Item = &Repository> {
        self.repos.values()
    }

    pub fn len(&self) -> usize {
        self.repos.len()
    }

    pub fn is_empty(&self) -> bool {
        self.repos.is_empty()
    }
}

/// Joins `path` below `base` even when `path` is absolute.
fn nest_under(base: &Path, path: &str) -> PathBuf {
    let mut joined = base.to_path_buf();
    for component in Path::new(path).components() {
        match component {
            Component::Prefix(_) | Component::RootDir => {}
            other => joined.push(other.as_os_str()),
        }
    }
    joined
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::RepoConfig;

    fn sample_config() -> Config {
        Config {
            base_path: "/srv/mirror".to_string(),
            tags_base: "/srv/tags".to_string(),
            repos: vec![
                RepoConfig {
                    id: "beta".to_string(),
                    paths: vec!["beta/os".to_string()],
                    tag_dir: Some("/data/beta-tags".to_string()),
                },
                RepoConfig {
                    id: "alpha".to_string(),
                    paths: vec!["alpha/os".to_string(), "alpha/updates".to_string()],
                    tag_dir: None,
                },
            ],
            ..Config::default()
        }
    }

    #[test]
    fn source_paths_are_joined_onto_base_in_order() {
        let catalog = RepoCatalog::from_config(&sample_config());
        assert_eq!(
            catalog.source_paths("alpha").unwrap(),
            vec![
                PathBuf::from("/srv/mirror/alpha/os"),
                PathBuf::from("/srv/mirror/alpha/updates")
            ]
        );
    }

    #[test]
    fn tags_dir_prefers_override() {
        let catalog = RepoCatalog::from_config(&sample_config());
        assert_eq!(
            catalog.tags_dir("beta").unwrap(),
            PathBuf::from("/data/beta-tags")
        );
        assert_eq!(catalog.tags_dir("alpha").unwrap(), PathBuf::from("/srv/tags"));
    }

    #[test]
    fn unknown_repository_is_reported() {
        let catalog = RepoCatalog::from_config(&sample_config());
        assert_eq!(
            catalog.source_paths("gamma"),
            Err(CatalogError::UnknownRepository("gamma".to_string()))
        );
        assert!(catalog.tags_dir("gamma").is_err());
        assert!(catalog.tags_dir("").is_err());
    }

    #[test]
    fn repositories_are_sorted_by_id() {
        let catalog = RepoCatalog::from_config(&sample_config());
        let ids: Vec<&str> = catalog.repositories().map(|r| r.id.as_str()).collect();
        assert_eq!(ids, vec!["alpha", "beta"]);
        assert_eq!(catalog.len(), 2);
    }

    #[test]
    fn absolute_source_paths_stay_under_base() {
        let mut config = sample_config();
        config.repos[1].paths = vec!["/centos/7/os".to_string(), "updates/".to_string()];
        let catalog = RepoCatalog::from_config(&config);
        assert_eq!(
            catalog.source_paths("alpha").unwrap(),
            vec![
                PathBuf::from("/srv/mirror/centos/7/os"),
                PathBuf::from("/srv/mirror/updates")
            ]
        );
    }
}
