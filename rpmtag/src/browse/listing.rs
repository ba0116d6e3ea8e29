// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::catalog::RepoCatalog;
use crate::tags::diff::has_diff;
use crate::util::dir_listing::{count_packages, is_package, list_subdirectories};
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::cmp::Ordering;
use std::fs::{self, Metadata};
use std::io;
use std::path::Path;
use std::time::SystemTime;

pub const BROWSE_ROOT: &str = "/browse/";
pub const UNINITIALIZED_LABEL: &str = "(tags not yet initialized)";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Repository,
    Folder,
    Package,
    File,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListingEntry {
    pub name: String,
    pub url: String,
    pub kind: EntryKind,
    pub is_dir: bool,
    pub active: bool,
    pub modified: String,
    pub size: Option<String>,
    pub package_count: Option<usize>,
    pub diff_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Breadcrumb {
    pub name: String,
    pub url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Listing {
    pub path_display: String,
    pub current_dir: String,
    pub parent_url: Option<String>,
    pub breadcrumbs: Vec<Breadcrumb>,
    pub entries: Vec<ListingEntry>,
    pub is_root: bool,
}

pub fn format_modified(time: SystemTime) -> String {
    DateTime::<Utc>::from(time).format("%Y-%m-%d %H:%M").to_string()
}

pub fn format_size(bytes: u64) -> String {
    format!("{:.1} KB", bytes as f64 / 1024.0)
}

/// Directories first, then by name.
pub fn sort_entries(entries: &mut [ListingEntry]) {
    entries.sort_by(|a, b| match (a.is_dir, b.is_dir) {
        (true, false) => Ordering::Less,
        (false, true) => Ordering::Greater,
        _ => a.name.cmp(&b.name),
    });
}

/// One row per configured repository.
pub fn virtual_root(catalog: &RepoCatalog) -> Listing {
    let entries = catalog
        .repositories()
        .map(|repo| {
            let url = format!("{}{}/", BROWSE_ROOT, repo.id);
            match fs::metadata(&repo.tags_dir) {
                Ok(metadata) if metadata.is_dir() => {
                    let package_count = list_subdirectories(&repo.tags_dir)
                        .unwrap_or_default()
                        .iter()
                        .map(|tag| count_packages(&repo.tags_dir.join(tag)))
                        .sum();
                    ListingEntry {
                        name: repo.id.clone(),
                        url,
                        kind: EntryKind::Repository,
                        is_dir: true,
                        active: true,
                        modified: metadata
                            .modified()
                            .map(format_modified)
                            .unwrap_or_default(),
                        size: None,
                        package_count: Some(package_count),
                        diff_url: None,
                    }
                }
                _ => ListingEntry {
                    name: repo.id.clone(),
                    url,
                    kind: EntryKind::Repository,
                    is_dir: true,
                    active: false,
                    modified: UNINITIALIZED_LABEL.to_string(),
                    size: None,
                    package_count: Some(0),
                    diff_url: None,
                },
            }
        })
        .collect();

    Listing {
        path_display: BROWSE_ROOT.to_string(),
        current_dir: "Available Repositories".to_string(),
        parent_url: None,
        breadcrumbs: Vec::new(),
        entries,
        is_root: true,
    }
}

/// Lists `dir`, shown at `url_path` (which must end in `/`).
///
/// Package links are described by their target; a dangling link falls back
/// to the link itself.
pub fn directory_listing(dir: &Path, url_path: &str) -> io::Result<Listing> {
    let mut entries = Vec::new();
    for entry in fs::read_dir(dir)? {
        let entry = entry?;
        let name = entry.file_name().to_string_lossy().into_owned();
        let Some(metadata) = describe(&entry.path()) else {
            log::debug!("Skipping unreadable entry {}", entry.path().display());
            continue;
        };

        let is_dir = metadata.is_dir();
        let mut url = format!("{}{}", url_path, name);
        let (kind, package_count, diff_url) = if is_dir {
            url.push('/');
            let child = entry.path();
            let diff_url = has_diff(&child).then(|| format!("{}diff.json", url));
            (EntryKind::Folder, Some(count_packages(&child)), diff_url)
        } else if is_package(&entry) {
            (EntryKind::Package, None, None)
        } else {
            (EntryKind::File, None, None)
        };

        entries.push(ListingEntry {
            name,
            url,
            kind,
            is_dir,
            active: true,
            modified: metadata.modified().map(format_modified).unwrap_or_default(),
            size: Some(format_size(metadata.len())),
            package_count,
            diff_url,
        });
    }
    sort_entries(&mut entries);

    let (breadcrumbs, current_dir, parent_url) = navigation(url_path);
    Ok(Listing {
        path_display: url_path.to_string(),
        current_dir,
        parent_url: Some(parent_url),
        breadcrumbs,
        entries,
        is_root: false,
    })
}

fn describe(path: &Path) -> Option<Metadata> {
    fs::metadata(path)
        .or_else(|_| fs::symlink_metadata(path))
        .ok()
}

/// Breadcrumbs for the ancestors below `/browse/`, the current directory
/// name and the parent URL.
fn navigation(url_path: &str) -> (Vec<Breadcrumb>, String, String) {
    let segments: Vec<&str> = url_path
        .trim_matches('/')
        .split('/')
        .filter(|segment| !segment.is_empty())
        .collect();

    let mut breadcrumbs = Vec::new();
    let mut url = String::from("/");
    if let Some(first) = segments.first() {
        url.push_str(first);
        url.push('/');
    }
    for segment in segments.iter().skip(1).take(segments.len().saturating_sub(2)) {
        url.push_str(segment);
        url.push('/');
        breadcrumbs.push(Breadcrumb {
            name: segment.to_string(),
            url: url.clone(),
        });
    }

    let current_dir = segments.last().map(|s| s.to_string()).unwrap_or_default();
    let parent_url = match segments.len() {
        0 | 1 => "/".to_string(),
        len => format!("/{}/", segments[..len - 1].join("/")),
    };
    (breadcrumbs, current_dir, parent_url)
}
