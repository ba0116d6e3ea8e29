// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::fs::{self, DirEntry};
use std::io;
use std::path::Path;

pub const PACKAGE_SUFFIX: &str = ".rpm";

/// Lists the names of direct children of `dir` accepted by `predicate`.
///
/// A missing directory is treated as empty. Order follows `read_dir` and is
/// not stable; callers that present results sort them.
pub fn list_dir_entries<P>(dir: &Path, predicate: P) -> io::Result<Vec<String>>
where
    P: Fn(&DirEntry) -> bool,
{
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
        Err(err) => return Err(err),
    };

    let mut names = Vec::new();
    for entry in entries {
        let entry = entry?;
        if predicate(&entry) {
            names.push(entry.file_name().to_string_lossy().into_owned());
        }
    }
    Ok(names)
}

/// Accepts real directories. Symlinks to directories are not followed.
pub fn is_directory(entry: &DirEntry) -> bool {
    entry.file_type().map(|kind| kind.is_dir()).unwrap_or(false)
}

pub fn has_suffix(suffix: &'static str) -> impl Fn(&DirEntry) -> bool {
    move |entry| entry.file_name().to_string_lossy().ends_with(suffix)
}

pub fn is_package(entry: &DirEntry) -> bool {
    has_suffix(PACKAGE_SUFFIX)(entry)
}

pub fn list_packages(dir: &Path) -> io::Result<Vec<String>> {
    list_dir_entries(dir, is_package)
}

pub fn list_subdirectories(dir: &Path) -> io::Result<Vec<String>> {
    list_dir_entries(dir, is_directory)
}

/// Package count for display purposes; unreadable directories count as empty.
pub fn count_packages(dir: &Path) -> usize {
    list_packages(dir).map(|names| names.len()).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_fixtures::TestFixtureRoot;

    #[test]
    fn missing_directory_lists_as_empty() {
        let fixture = TestFixtureRoot::new_unique("listing-missing").unwrap();
        let names = list_dir_entries(&fixture.path().join("absent"), |_| true).unwrap();
        assert!(names.is_empty());
        assert_eq!(count_packages(&fixture.path().join("absent")), 0);
    }

    #[test]
    fn filters_by_suffix_and_kind() {
        let fixture = TestFixtureRoot::new_unique("listing-filter").unwrap();
        let dir = fixture.path();
        fs::write(dir.join("a-1.0.rpm"), b"a").unwrap();
        fs::write(dir.join("b-2.0.rpm"), b"b").unwrap();
        fs::write(dir.join("notes.txt"), b"n").unwrap();
        fs::create_dir(dir.join("repodata")).unwrap();

        let mut packages = list_packages(dir).unwrap();
        packages.sort();
        assert_eq!(packages, vec!["a-1.0.rpm", "b-2.0.rpm"]);

        assert_eq!(list_subdirectories(dir).unwrap(), vec!["repodata"]);
        assert_eq!(count_packages(dir), 2);
    }

    #[test]
    fn reading_a_file_as_directory_is_an_error() {
        let fixture = TestFixtureRoot::new_unique("listing-file").unwrap();
        let file = fixture.path().join("plain.txt");
        fs::write(&file, b"x").unwrap();
        assert!(list_dir_entries(&file, |_| true).is_err());
    }

    #[cfg(unix)]
    #[test]
    fn package_symlinks_are_listed() {
        let fixture = TestFixtureRoot::new_unique("listing-links").unwrap();
        let source = fixture.path().join("pkg-1.0.rpm");
        fs::write(&source, b"pkg").unwrap();
        let tag = fixture.path().join("monthly");
        fs::create_dir(&tag).unwrap();
        std::os::unix::fs::symlink(&source, tag.join("pkg-1.0.rpm")).unwrap();

        assert_eq!(list_packages(&tag).unwrap(), vec!["pkg-1.0.rpm"]);
    }
}
