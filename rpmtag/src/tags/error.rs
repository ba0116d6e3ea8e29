// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::metadata::MetadataError;
use crate::catalog::CatalogError;
use std::fmt;
use std::io;
use std::path::PathBuf;

pub const INVALID_REQUEST_MESSAGE: &str = "Invalid folder or tag type";

/// Failures that stop a tag operation.
#[derive(Debug)]
pub enum TagError {
    InvalidRequest,
    UnknownRepository(CatalogError),
    InspectLive { path: PathBuf, source: io::Error },
    Backup {
        from: PathBuf,
        to: PathBuf,
        source: io::Error,
    },
    CreateLive { path: PathBuf, source: io::Error },
    Metadata(MetadataError),
}

impl TagError {
    /// Caller mistakes map to 400, everything else to 500.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            TagError::InvalidRequest | TagError::UnknownRepository(_)
        )
    }

    /// Message safe to return to API clients. Server-side paths stay in the logs.
    pub fn public_message(&self) -> String {
        match self {
            TagError::InvalidRequest => INVALID_REQUEST_MESSAGE.to_string(),
            TagError::UnknownRepository(err) => err.to_string(),
            TagError::InspectLive { .. } => "Failed to read live directory".to_string(),
            TagError::Backup { .. } => "Failed to backup live directory".to_string(),
            TagError::CreateLive { .. } => "Failed to create new live directory".to_string(),
            TagError::Metadata(_) => "createrepo_c execution failed".to_string(),
        }
    }
}

impl fmt::Display for TagError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagError::InvalidRequest => f.write_str(INVALID_REQUEST_MESSAGE),
            TagError::UnknownRepository(err) => write!(f, "{}", err),
            TagError::InspectLive { path, source } => {
                write!(f, "failed to inspect {}: {}", path.display(), source)
            }
            TagError::Backup { from, to, source } => write!(
                f,
                "failed to move {} to {}: {}",
                from.display(),
                to.display(),
                source
            ),
            TagError::CreateLive { path, source } => {
                write!(f, "failed to create {}: {}", path.display(), source)
            }
            TagError::Metadata(err) => write!(f, "metadata generation failed: {}", err),
        }
    }
}

impl std::error::Error for TagError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            TagError::InvalidRequest => None,
            TagError::UnknownRepository(err) => Some(err),
            TagError::InspectLive { source, .. }
            | TagError::Backup { source, .. }
            | TagError::CreateLive { source, .. } => Some(source),
            TagError::Metadata(err) => Some(err),
        }
    }
}

impl From<CatalogError> for TagError {
    fn from(err: CatalogError) -> Self {
        TagError::UnknownRepository(err)
    }
}

impl From<MetadataError> for TagError {
    fn from(err: MetadataError) -> Self {
        TagError::Metadata(err)
    }
}

/// Problems a tag operation logs and reports but does not fail on.
#[derive(Debug)]
pub enum TagWarning {
    SourceUnreadable { path: PathBuf, source: io::Error },
    LinkFailed {
        package: String,
        target: PathBuf,
        source: io::Error,
    },
    DiffNotRecorded { path: PathBuf, source: io::Error },
}

impl fmt::Display for TagWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TagWarning::SourceUnreadable { path, source } => {
                write!(f, "skipped source {}: {}", path.display(), source)
            }
            TagWarning::LinkFailed {
                package,
                target,
                source,
            } => write!(
                f,
                "could not link {} at {}: {}",
                package,
                target.display(),
                source
            ),
            TagWarning::DiffNotRecorded { path, source } => {
                write!(f, "diff not recorded in {}: {}", path.display(), source)
            }
        }
    }
}
