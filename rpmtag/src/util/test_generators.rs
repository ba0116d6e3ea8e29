// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use crate::tags::metadata::{MetadataError, MetadataGenerator};
use crate::util::dir_listing::list_packages;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// One observed regeneration: the directory and the packages it held.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedRun {
    pub dir: PathBuf,
    pub packages: Vec<String>,
}

/// Stands in for `createrepo_c`: succeeds and remembers every call.
#[derive(Debug, Default)]
pub struct RecordingGenerator {
    runs: Mutex<Vec<RecordedRun>>,
}

impl RecordingGenerator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn runs(&self) -> Vec<RecordedRun> {
        self.runs
            .lock()
            .map(|runs| runs.clone())
            .unwrap_or_default()
    }

    pub fn run_count(&self) -> usize {
        self.runs.lock().map(|runs| runs.len()).unwrap_or(0)
    }
}

impl MetadataGenerator for RecordingGenerator {
    fn regenerate(&self, dir: &Path) -> Result<(), MetadataError> {
        let mut packages = list_packages(dir).unwrap_or_default();
        packages.sort();
        if let Ok(mut runs) = self.runs.lock() {
            runs.push(RecordedRun {
                dir: dir.to_path_buf(),
                packages,
            });
        }
        Ok(())
    }
}

/// Always fails the way a broken metadata tool would.
#[derive(Debug, Default)]
pub struct FailingGenerator;

impl MetadataGenerator for FailingGenerator {
    fn regenerate(&self, _dir: &Path) -> Result<(), MetadataError> {
        Err(MetadataError::Failed {
            command: "createrepo_c .".to_string(),
            status: "exit status: 1".to_string(),
            output: "simulated failure".to_string(),
        })
    }
}
