// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::web;
use std::path::PathBuf;

pub mod error;
pub mod handlers;

pub fn configure(cfg: &mut web::ServiceConfig, assets_dir: PathBuf) {
    cfg.service(actix_files::Files::new("/assets", assets_dir))
        .route("/", web::get().to(handlers::index));
}
