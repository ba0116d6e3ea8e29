// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::TagKind;
use chrono::NaiveDate;
use std::ffi::OsString;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// `<tags_dir>/<kind>_<YYYY-MM-DD>`
pub fn backup_base(tags_dir: &Path, kind: TagKind, date: NaiveDate) -> PathBuf {
    tags_dir.join(format!("{}_{}", kind.as_str(), date.format("%Y-%m-%d")))
}

/// First unused name among `base`, `base_1`, `base_2`, ...
///
/// Probing has no upper bound. Errors other than "not found" stop the probe,
/// so an unreadable tags directory cannot spin forever.
pub fn next_available_backup(base: &Path) -> io::Result<PathBuf> {
    let mut candidate = base.to_path_buf();
    let mut count: u64 = 0;
    loop {
        match fs::symlink_metadata(&candidate) {
            Err(err) if err.kind() == io::ErrorKind::NotFound => return Ok(candidate),
            Err(err) => return Err(err),
            Ok(_) => {
                count += 1;
                candidate = suffixed(base, count);
            }
        }
    }
}

fn suffixed(base: &Path, count: u64) -> PathBuf {
    let mut name = OsString::from(base.as_os_str());
    name.push(format!("_{}", count));
    PathBuf::from(name)
}
