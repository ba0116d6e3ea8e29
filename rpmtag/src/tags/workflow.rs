// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::backup::{backup_base, next_available_backup};
use super::diff::{DiffRecord, PackageDelta, record_diff};
use super::error::{TagError, TagWarning};
use super::metadata::MetadataGenerator;
use super::TagKind;
use crate::catalog::{RepoCatalog, Repository};
use crate::util::dir_listing::list_packages;
use chrono::{DateTime, NaiveDate, Utc};
use std::collections::BTreeSet;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// Result of a completed tag operation, including skipped work.
#[derive(Debug)]
pub struct TagOutcome {
    pub repository: String,
    pub kind: TagKind,
    pub date: NaiveDate,
    /// Unique package names linked into the new live directory.
    pub linked: BTreeSet<String>,
    pub diff: Option<DiffRecord>,
    pub backup: Option<PathBuf>,
    pub warnings: Vec<TagWarning>,
}

impl TagOutcome {
    pub fn file_count(&self) -> usize {
        self.linked.len()
    }

    pub fn diff_count(&self) -> usize {
        self.diff.as_ref().map(DiffRecord::change_count).unwrap_or(0)
    }

    pub fn backup_created(&self) -> bool {
        self.backup.is_some()
    }
}

/// Freezes a repository's current packages into `<tags_dir>/<kind>`.
///
/// The previous live directory is renamed to a dated backup, a fresh one is
/// populated with symlinks to every source package, metadata is regenerated
/// and the package delta is recorded in the backup.
pub struct TagWorkflow {
    catalog: Arc<RepoCatalog>,
    generator: Arc<dyn MetadataGenerator>,
}

impl TagWorkflow {
    pub fn new(catalog: Arc<RepoCatalog>, generator: Arc<dyn MetadataGenerator>) -> Self {
        Self { catalog, generator }
    }

    /// Runs the whole operation. `now` supplies both the backup date and the
    /// diff timestamp.
    pub fn create_tag(
        &self,
        repository: &str,
        kind: &str,
        now: DateTime<Utc>,
    ) -> Result<TagOutcome, TagError> {
        if repository.is_empty() {
            return Err(TagError::InvalidRequest);
        }
        let kind = TagKind::parse(kind).ok_or(TagError::InvalidRequest)?;
        let repo = self.catalog.get(repository)?;
        let date = now.date_naive();
        let live = repo.tags_dir.join(kind.as_str());

        let mut warnings = Vec::new();
        let (previous, backup) = match inspect_live(&live)? {
            Some(previous) => {
                let backup = move_aside(&live, &repo.tags_dir, kind, date)?;
                (previous, Some(backup))
            }
            None => (BTreeSet::new(), None),
        };

        fs::create_dir_all(&live).map_err(|source| {
            log::error!("Failed to create {}: {}", live.display(), source);
            TagError::CreateLive {
                path: live.clone(),
                source,
            }
        })?;

        let linked = link_sources(repo, &live, &mut warnings);
        log::info!(
            "Linked {} package(s) into {} ({} skipped)",
            linked.len(),
            live.display(),
            warnings.len()
        );

        self.generator.regenerate(&live).map_err(|err| {
            log::error!("Metadata generation failed in {}: {}", live.display(), err);
            TagError::Metadata(err)
        })?;

        let delta = PackageDelta::between(&previous, &linked);
        let diff = match backup.as_deref() {
            Some(backup_dir) => match record_diff(backup_dir, kind, &delta, now) {
                Ok(record) => record,
                Err(source) => {
                    log::warn!(
                        "Could not record diff in {}: {}",
                        backup_dir.display(),
                        source
                    );
                    warnings.push(TagWarning::DiffNotRecorded {
                        path: backup_dir.to_path_buf(),
                        source,
                    });
                    None
                }
            },
            None => None,
        };

        log::info!(
            "Tag {}/{} created: {} package(s), {} change(s)",
            repo.id,
            kind,
            linked.len(),
            diff.as_ref().map(DiffRecord::change_count).unwrap_or(0)
        );

        Ok(TagOutcome {
            repository: repo.id.clone(),
            kind,
            date,
            linked,
            diff,
            backup,
            warnings,
        })
    }
}

/// Package set of the current live directory, or `None` when there is none.
fn inspect_live(live: &Path) -> Result<Option<BTreeSet<String>>, TagError> {
    let metadata = match fs::symlink_metadata(live) {
        Ok(metadata) => metadata,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            log::error!("Failed to inspect {}: {}", live.display(), source);
            return Err(TagError::InspectLive {
                path: live.to_path_buf(),
                source,
            });
        }
    };

    if !metadata.is_dir() {
        return Ok(Some(BTreeSet::new()));
    }

    list_packages(live)
        .map(|names| Some(names.into_iter().collect()))
        .map_err(|source| {
            log::error!("Failed to list {}: {}", live.display(), source);
            TagError::InspectLive {
                path: live.to_path_buf(),
                source,
            }
        })
}

fn move_aside(
    live: &Path,
    tags_dir: &Path,
    kind: TagKind,
    date: NaiveDate,
) -> Result<PathBuf, TagError> {
    let backup = next_available_backup(&backup_base(tags_dir, kind, date)).map_err(|source| {
        log::error!("Failed to probe backups in {}: {}", tags_dir.display(), source);
        TagError::InspectLive {
            path: tags_dir.to_path_buf(),
            source,
        }
    })?;

    fs::rename(live, &backup).map_err(|source| {
        log::error!(
            "Failed to move {} to {}: {}",
            live.display(),
            backup.display(),
            source
        );
        TagError::Backup {
            from: live.to_path_buf(),
            to: backup.clone(),
            source,
        }
    })?;

    log::info!("Backed up {} to {}", live.display(), backup.display());
    Ok(backup)
}

/// Links every package of every source directory into `live`, in source
/// order. A later source wins when two provide the same file name.
fn link_sources(
    repo: &Repository,
    live: &Path,
    warnings: &mut Vec<TagWarning>,
) -> BTreeSet<String> {
    let mut linked = BTreeSet::new();

    for source_dir in &repo.source_dirs {
        let mut names = match list_packages(source_dir) {
            Ok(names) => names,
            Err(source) => {
                log::warn!("Skipping source {}: {}", source_dir.display(), source);
                warnings.push(TagWarning::SourceUnreadable {
                    path: source_dir.clone(),
                    source,
                });
                continue;
            }
        };
        names.sort();

        for name in names {
            let target = live.join(&name);
            match link_package(&source_dir.join(&name), &target) {
                Ok(()) => {
                    linked.insert(name);
                }
                Err(source) => {
                    log::warn!("Failed to link {}: {}", target.display(), source);
                    // An earlier link of the same name was already removed.
                    linked.remove(&name);
                    warnings.push(TagWarning::LinkFailed {
                        package: name,
                        target,
                        source,
                    });
                }
            }
        }
    }

    linked
}

fn link_package(source: &Path, target: &Path) -> io::Result<()> {
    let source = std::path::absolute(source)?;
    match fs::remove_file(target) {
        Ok(()) => {}
        Err(err) if err.kind() == io::ErrorKind::NotFound => {}
        Err(err) => return Err(err),
    }
    symlink_file(&source, target)
}

#[cfg(unix)]
fn symlink_file(source: &Path, target: &Path) -> io::Result<()> {
    std::os::unix::fs::symlink(source, target)
}

#[cfg(not(unix))]
fn symlink_file(_source: &Path, _target: &Path) -> io::Result<()> {
    Err(io::Error::new(
        io::ErrorKind::Unsupported,
        "package links require a unix filesystem",
    ))
}
