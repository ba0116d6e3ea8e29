// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::catalog::{CatalogError, RepoCatalog};
use std::fmt;
use std::path::PathBuf;

/// What a `/browse/<tail>` URL points at.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseTarget {
    Root,
    Path { repo_id: String, fs_path: PathBuf },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowsePathError {
    UnknownRepository(CatalogError),
    InvalidSegment(String),
}

impl fmt::Display for BrowsePathError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BrowsePathError::UnknownRepository(err) => write!(f, "{}", err),
            BrowsePathError::InvalidSegment(segment) => {
                write!(f, "invalid path segment '{}'", segment)
            }
        }
    }
}

impl std::error::Error for BrowsePathError {}

/// Maps the part after `/browse/` onto the repository's tags directory.
///
/// Checks are lexical: package links inside a tag point outside the tags
/// directory, so resolving them is not a traversal.
pub fn resolve(catalog: &RepoCatalog, tail: &str) -> Result<BrowseTarget, BrowsePathError> {
    let trimmed = tail.trim_matches('/');
    if trimmed.is_empty() {
        return Ok(BrowseTarget::Root);
    }

    let mut segments = trimmed.split('/');
    let repo_id = segments.next().unwrap_or_default();
    let repo = catalog
        .get(repo_id)
        .map_err(BrowsePathError::UnknownRepository)?;

    let mut fs_path = repo.tags_dir.clone();
    for segment in segments {
        if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\0') {
            return Err(BrowsePathError::InvalidSegment(segment.to_string()));
        }
        fs_path.push(segment);
    }

    Ok(BrowseTarget::Path {
        repo_id: repo.id.clone(),
        fs_path,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_config::TestConfigBuilder;

    fn catalog() -> RepoCatalog {
        let config = TestConfigBuilder::new()
            .with_base_path("/srv/mirror")
            .with_tags_base("/srv/tags")
            .with_repo("alpha", &["os"], None)
            .with_repo("beta", &["os"], Some("/data/beta-tags"))
            .build();
        RepoCatalog::from_config(&config)
    }

    #[test]
    fn empty_tail_is_root() {
        let catalog = catalog();
        assert_eq!(resolve(&catalog, ""), Ok(BrowseTarget::Root));
        assert_eq!(resolve(&catalog, "/"), Ok(BrowseTarget::Root));
    }

    #[test]
    fn repository_paths_map_onto_tags_dir() {
        let catalog = catalog();
        assert_eq!(
            resolve(&catalog, "beta/monthly/a.rpm"),
            Ok(BrowseTarget::Path {
                repo_id: "beta".to_string(),
                fs_path: PathBuf::from("/data/beta-tags/monthly/a.rpm"),
            })
        );
        assert_eq!(
            resolve(&catalog, "alpha/"),
            Ok(BrowseTarget::Path {
                repo_id: "alpha".to_string(),
                fs_path: PathBuf::from("/srv/tags"),
            })
        );
    }

    #[test]
    fn unknown_repository_is_rejected() {
        assert!(matches!(
            resolve(&catalog(), "ghost/monthly"),
            Err(BrowsePathError::UnknownRepository(_))
        ));
    }

    #[test]
    fn traversal_segments_are_rejected() {
        let catalog = catalog();
        for tail in ["alpha/../etc", "alpha/./monthly", "alpha/monthly//a.rpm", "alpha/.."] {
            assert!(
                matches!(
                    resolve(&catalog, tail),
                    Err(BrowsePathError::InvalidSegment(_))
                ),
                "{:?}",
                tail
            );
        }
    }
}
