// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

pub mod blocking;
pub mod dir_listing;
pub mod log_level_changer;
pub mod request_guard;
pub mod test_config;
pub mod test_fixtures;
pub mod test_generators;

pub use blocking::run_blocking;
pub use log_level_changer::init_logger;
pub use request_guard::{CatchPanic, RequestTimeout};
pub use test_config::TestConfigBuilder;
