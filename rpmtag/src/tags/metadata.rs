// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::config::MetadataConfig;
use std::fmt;
use std::io;
use std::path::Path;
use std::process::Command;

#[derive(Debug)]
pub enum MetadataError {
    Spawn {
        command: String,
        source: io::Error,
    },
    Failed {
        command: String,
        status: String,
        output: String,
    },
}

impl fmt::Display for MetadataError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MetadataError::Spawn { command, source } => {
                write!(f, "failed to start '{}': {}", command, source)
            }
            MetadataError::Failed {
                command,
                status,
                output,
            } => {
                write!(f, "'{}' exited with {}", command, status)?;
                if !output.is_empty() {
                    write!(f, ": {}", output)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for MetadataError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            MetadataError::Spawn { source, .. } => Some(source),
            MetadataError::Failed { .. } => None,
        }
    }
}

/// Regenerates repository metadata for a directory of packages.
pub trait MetadataGenerator: Send + Sync {
    fn regenerate(&self, dir: &Path) -> Result<(), MetadataError>;
}

/// Runs an external tool (`createrepo_c .` by default) with `dir` as the
/// working directory and waits for it.
#[derive(Debug, Clone)]
pub struct CommandGenerator {
    command: String,
    args: Vec<String>,
}

impl CommandGenerator {
    pub fn new(command: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    pub fn from_config(config: &MetadataConfig) -> Self {
        Self::new(config.command.clone(), config.args.clone())
    }

    pub fn command_line(&self) -> String {
        std::iter::once(self.command.as_str())
            .chain(self.args.iter().map(String::as_str))
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl MetadataGenerator for CommandGenerator {
    fn regenerate(&self, dir: &Path) -> Result<(), MetadataError> {
        log::debug!("Running '{}' in {}", self.command_line(), dir.display());
        let output = Command::new(&self.command)
            .args(&self.args)
            .current_dir(dir)
            .output()
            .map_err(|source| MetadataError::Spawn {
                command: self.command_line(),
                source,
            })?;

        if output.status.success() {
            return Ok(());
        }

        let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
        combined.push_str(&String::from_utf8_lossy(&output.stderr));
        Err(MetadataError::Failed {
            command: self.command_line(),
            status: output.status.to_string(),
            output: combined.trim().to_string(),
        })
    }
}
