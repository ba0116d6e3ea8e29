// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

//! Read-only HTML view over every repository's tags directory.

use actix_web::web;

pub mod handlers;
pub mod listing;
pub mod paths;

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/browse", web::get().to(handlers::redirect_to_root))
        .route("/browse/{tail:.*}", web::get().to(handlers::browse));
}
