// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use actix_web::web;

pub mod auth;
pub mod response;
mod tags;

pub use auth::{BearerAuth, TokenSource};

pub fn configure(cfg: &mut web::ServiceConfig, tokens: TokenSource) {
    cfg.service(
        web::scope("/api")
            .route("/tags/{folder}", web::get().to(tags::list_tags))
            .route(
                "/tags/{folder}/{tag}/packages",
                web::get().to(tags::list_tag_packages),
            )
            .service(
                web::resource("/create-tag")
                    .wrap(BearerAuth::new(tokens))
                    .route(web::post().to(tags::create_tag)),
            )
            .default_service(web::to(response::not_found)),
    );
}
