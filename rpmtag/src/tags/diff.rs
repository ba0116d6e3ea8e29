// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::TagKind;
use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::Path;

pub const DIFF_FILE_NAME: &str = "diff.json";

/// Package names gained and lost between two tag states, both sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageDelta {
    pub added: Vec<String>,
    pub removed: Vec<String>,
}

impl PackageDelta {
    pub fn between(previous: &BTreeSet<String>, current: &BTreeSet<String>) -> Self {
        Self {
            added: current.difference(previous).cloned().collect(),
            removed: previous.difference(current).cloned().collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.added.len() + self.removed.len()
    }

    pub fn is_empty(&self) -> bool {
        self.added.is_empty() && self.removed.is_empty()
    }
}

/// Contents of `diff.json` inside a backup directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiffRecord {
    /// Name of the backup directory holding the previous state.
    pub from: String,
    /// Tag kind of the new live state.
    pub to: String,
    pub added: Vec<String>,
    pub removed: Vec<String>,
    pub timestamp: String,
}

impl DiffRecord {
    pub fn new(from: String, to: TagKind, delta: &PackageDelta, now: DateTime<Utc>) -> Self {
        Self {
            from,
            to: to.as_str().to_string(),
            added: delta.added.clone(),
            removed: delta.removed.clone(),
            timestamp: now.to_rfc3339_opts(SecondsFormat::Secs, true),
        }
    }

    pub fn change_count(&self) -> usize {
        self.added.len() + self.removed.len()
    }
}

/// Writes `diff.json` into `backup_dir` when `delta` is non-empty.
///
/// The file is created exclusively: an existing record is never replaced.
pub fn record_diff(
    backup_dir: &Path,
    kind: TagKind,
    delta: &PackageDelta,
    now: DateTime<Utc>,
) -> io::Result<Option<DiffRecord>> {
    if delta.is_empty() {
        return Ok(None);
    }

    let from = backup_dir
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let record = DiffRecord::new(from, kind, delta, now);
    let body = serde_json::to_vec_pretty(&record).map_err(io::Error::other)?;

    let mut file = OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(backup_dir.join(DIFF_FILE_NAME))?;
    file.write_all(&body)?;
    file.sync_all()?;
    Ok(Some(record))
}

pub fn read_diff(dir: &Path) -> io::Result<Option<DiffRecord>> {
    match fs::read(dir.join(DIFF_FILE_NAME)) {
        Ok(bytes) => serde_json::from_slice(&bytes)
            .map(Some)
            .map_err(|err| io::Error::new(io::ErrorKind::InvalidData, err)),
        Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
        Err(err) => Err(err),
    }
}

pub fn has_diff(dir: &Path) -> bool {
    dir.join(DIFF_FILE_NAME).is_file()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::util::test_fixtures::TestFixtureRoot;
    use chrono::TimeZone;

    fn set(names: &[&str]) -> BTreeSet<String> {
        names.iter().map(|name| name.to_string()).collect()
    }

    fn noon() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 15, 12, 0, 0).unwrap()
    }

    #[test]
    fn delta_is_sorted_set_difference() {
        let delta = PackageDelta::between(
            &set(&["a.rpm", "b.rpm", "z.rpm"]),
            &set(&["c.rpm", "b.rpm", "0.rpm"]),
        );
        assert_eq!(delta.added, vec!["0.rpm", "c.rpm"]);
        assert_eq!(delta.removed, vec!["a.rpm", "z.rpm"]);
        assert_eq!(delta.len(), 4);
    }

    #[test]
    fn identical_sets_yield_empty_delta() {
        let names = set(&["a.rpm"]);
        assert!(PackageDelta::between(&names, &names).is_empty());
    }

    #[test]
    fn empty_delta_writes_nothing() {
        let fixture = TestFixtureRoot::new_unique("diff-empty").unwrap();
        let outcome =
            record_diff(fixture.path(), TagKind::Monthly, &PackageDelta::default(), noon())
                .unwrap();
        assert!(outcome.is_none());
        assert!(!has_diff(fixture.path()));
    }

    #[test]
    fn record_is_pretty_json_with_utc_timestamp() {
        let fixture = TestFixtureRoot::new_unique("diff-write").unwrap();
        let backup = fixture.path().join("monthly_2024-03-15");
        fs::create_dir(&backup).unwrap();
        let delta = PackageDelta::between(&set(&["a.rpm"]), &set(&["b.rpm"]));

        let record = record_diff(&backup, TagKind::Monthly, &delta, noon())
            .unwrap()
            .expect("record written");
        assert_eq!(record.from, "monthly_2024-03-15");
        assert_eq!(record.to, "monthly");
        assert_eq!(record.timestamp, "2024-03-15T12:00:00Z");

        let text = fs::read_to_string(backup.join(DIFF_FILE_NAME)).unwrap();
        assert!(text.contains("\n  \"from\": \"monthly_2024-03-15\""));
        assert_eq!(read_diff(&backup).unwrap(), Some(record));
    }

    #[test]
    fn existing_record_is_not_replaced() {
        let fixture = TestFixtureRoot::new_unique("diff-exclusive").unwrap();
        fs::write(fixture.path().join(DIFF_FILE_NAME), b"{}").unwrap();
        let delta = PackageDelta::between(&set(&[]), &set(&["a.rpm"]));

        let err = record_diff(fixture.path(), TagKind::HalfMonthly, &delta, noon()).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::AlreadyExists);
        assert_eq!(
            fs::read_to_string(fixture.path().join(DIFF_FILE_NAME)).unwrap(),
            "{}"
        );
    }

    #[test]
    fn missing_record_reads_as_none() {
        let fixture = TestFixtureRoot::new_unique("diff-missing").unwrap();
        assert_eq!(read_diff(fixture.path()).unwrap(), None);
    }
}
