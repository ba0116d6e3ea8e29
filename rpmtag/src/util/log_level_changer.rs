// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use env_logger::Logger;
use log::{Level, Log, Metadata, Record, SetLoggerError};

/// Rewrites the level of records whose target starts with `target_prefix`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LevelRule {
    pub target_prefix: String,
    pub from: Level,
    pub to: Level,
}

impl LevelRule {
    pub fn demote(target_prefix: &str, from: Level, to: Level) -> Self {
        Self {
            target_prefix: target_prefix.to_string(),
            from,
            to,
        }
    }

    fn applies(&self, target: &str, level: Level) -> bool {
        self.from == level && target.starts_with(&self.target_prefix)
    }
}

/// Startup chatter from actix-server (one line per worker) is demoted to debug.
pub fn default_rules() -> Vec<LevelRule> {
    vec![LevelRule::demote("actix_server", Level::Info, Level::Debug)]
}

struct LevelModifierLogger {
    inner: Logger,
    rules: Vec<LevelRule>,
}

impl LevelModifierLogger {
    fn effective_level(&self, target: &str, level: Level) -> Level {
        self.rules
            .iter()
            .find(|rule| rule.applies(target, level))
            .map(|rule| rule.to)
            .unwrap_or(level)
    }
}

impl Log for LevelModifierLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        let level = self.effective_level(metadata.target(), metadata.level());
        let metadata = Metadata::builder()
            .level(level)
            .target(metadata.target())
            .build();
        self.inner.enabled(&metadata)
    }

    fn log(&self, record: &Record) {
        let level = self.effective_level(record.target(), record.level());
        self.inner.log(
            &Record::builder()
                .level(level)
                .target(record.target())
                .args(*record.args())
                .module_path(record.module_path())
                .file(record.file())
                .line(record.line())
                .build(),
        );
    }

    fn flush(&self) {
        self.inner.flush();
    }
}

pub fn init_logger(rules: Vec<LevelRule>, logger: Logger) -> Result<(), SetLoggerError> {
    let max_level = logger.filter();
    log::set_boxed_logger(Box::new(LevelModifierLogger {
        inner: logger,
        rules,
    }))?;
    log::set_max_level(max_level);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn logger_with(rules: Vec<LevelRule>) -> LevelModifierLogger {
        let inner = env_logger::Builder::new()
            .filter_level(log::LevelFilter::Info)
            .build();
        LevelModifierLogger { inner, rules }
    }

    #[test]
    fn demoted_target_is_filtered_at_info() {
        let logger = logger_with(default_rules());
        let metadata = Metadata::builder()
            .level(Level::Info)
            .target("actix_server::builder")
            .build();
        assert!(!logger.enabled(&metadata));
    }

    #[test]
    fn other_targets_keep_their_level() {
        let logger = logger_with(default_rules());
        let metadata = Metadata::builder()
            .level(Level::Info)
            .target("rpmtag::tags::workflow")
            .build();
        assert!(logger.enabled(&metadata));
        assert_eq!(
            logger.effective_level("actix_server", Level::Warn),
            Level::Warn
        );
    }
}
