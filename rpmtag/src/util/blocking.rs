// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::error::Error;
use std::fmt;

#[derive(Debug)]
pub struct BlockingError {
    context: &'static str,
    message: String,
}

impl BlockingError {
    pub fn context(&self) -> &'static str {
        self.context
    }
}

impl fmt::Display for BlockingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.context, self.message)
    }
}

impl Error for BlockingError {}

/// Runs filesystem or process work on tokio's blocking pool so actix workers
/// keep serving. A panic inside `task` comes back as a `BlockingError`.
pub async fn run_blocking<F, R>(context: &'static str, task: F) -> Result<R, BlockingError>
where
    F: FnOnce() -> R + Send + 'static,
    R: Send + 'static,
{
    tokio::task::spawn_blocking(task)
        .await
        .map_err(|err| {
            log::error!("Blocking task '{}' failed: {}", context, err);
            BlockingError {
                context,
                message: format!("blocking task failed: {}", err),
            }
        })
}
