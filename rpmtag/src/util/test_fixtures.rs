// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use uuid::Uuid;

/// Scratch directory under `target/test-fixtures`, removed on drop.
///
/// Layout helpers mirror a deployment: `mirror/` holds source package
/// directories and `tags/<repo>` holds each repository's tags.
#[derive(Debug)]
pub struct TestFixtureRoot {
    path: PathBuf,
}

impl TestFixtureRoot {
    pub fn new_fixed(name: &str) -> std::io::Result<Self> {
        let root = fixtures_root().join(name);
        if root.exists() {
            fs::remove_dir_all(&root)?;
        }
        fs::create_dir_all(&root)?;
        let path = root.canonicalize()?;
        Ok(Self { path })
    }

    pub fn new_unique(prefix: &str) -> std::io::Result<Self> {
        let name = format!("{}-{}", prefix, Uuid::new_v4());
        Self::new_fixed(&name)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn mirror_dir(&self) -> PathBuf {
        self.path.join("mirror")
    }

    pub fn tags_dir(&self, repo_id: &str) -> PathBuf {
        self.path.join("tags").join(repo_id)
    }

    /// Creates `mirror/<relative>` and returns it.
    pub fn source_dir(&self, relative: &str) -> std::io::Result<PathBuf> {
        let dir = self.mirror_dir().join(relative);
        fs::create_dir_all(&dir)?;
        Ok(dir)
    }

    /// Writes a package file into `mirror/<relative>`.
    pub fn add_package(&self, relative: &str, name: &str) -> std::io::Result<PathBuf> {
        let dir = self.source_dir(relative)?;
        let file = dir.join(name);
        fs::write(&file, name.as_bytes())?;
        Ok(file)
    }

    pub fn remove_package(&self, relative: &str, name: &str) -> std::io::Result<()> {
        fs::remove_file(self.mirror_dir().join(relative).join(name))
    }

    /// Sorted relative paths of everything below the fixture root.
    pub fn snapshot(&self) -> Vec<String> {
        let mut entries = Vec::new();
        collect_entries(&self.path, &self.path, &mut entries);
        entries.sort();
        entries
    }
}

impl Drop for TestFixtureRoot {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

fn collect_entries(root: &Path, dir: &Path, entries: &mut Vec<String>) {
    let Ok(read_dir) = fs::read_dir(dir) else {
        return;
    };
    for entry in read_dir.flatten() {
        let path = entry.path();
        if let Ok(relative) = path.strip_prefix(root) {
            entries.push(relative.to_string_lossy().into_owned());
        }
        if entry.file_type().map(|kind| kind.is_dir()).unwrap_or(false) {
            collect_entries(root, &path, entries);
        }
    }
}

fn fixtures_root() -> PathBuf {
    let manifest_dir = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    let repo_root = manifest_dir.parent().unwrap_or(&manifest_dir);
    repo_root.join("target").join("test-fixtures")
}
