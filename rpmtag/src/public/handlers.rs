// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::app_state::AppState;
use crate::templates::{LandingPageContext, render_minijinja_template};
use actix_web::{HttpResponse, web};

pub async fn index(state: web::Data<AppState>) -> HttpResponse {
    let app_name = state.error_renderer.app_name();
    let context = LandingPageContext::new(app_name, state.catalog.len()).to_value();

    let html = match render_minijinja_template(state.templates.as_ref(), "index.html", context) {
        Ok(html) => html,
        Err(e) => {
            log::error!("Failed to render landing page: {}", e);
            format!(
                r#"<h1>{}</h1><p>To browse repositories, start at <a href="/browse/">/browse/</a>.</p>"#,
                app_name
            )
        }
    };

    HttpResponse::Ok()
        .content_type("text/html; charset=utf-8")
        .body(html)
}
