// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::app_state::AppState;
use crate::templates::{ErrorPageContext, TemplateEngine, render_minijinja_template};
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, web};

#[derive(Clone)]
pub struct ErrorRenderer {
    app_name: String,
}

impl ErrorRenderer {
    pub fn new(app_name: String) -> Self {
        Self { app_name }
    }

    pub fn app_name(&self) -> &str {
        &self.app_name
    }
}

pub fn serve_404(
    renderer: &ErrorRenderer,
    template_engine: Option<&dyn TemplateEngine>,
) -> HttpResponse {
    serve_error_page(
        StatusCode::NOT_FOUND,
        "error_404.html",
        renderer.app_name(),
        template_engine,
    )
}

pub fn serve_500(
    renderer: &ErrorRenderer,
    template_engine: Option<&dyn TemplateEngine>,
) -> HttpResponse {
    serve_error_page(
        StatusCode::INTERNAL_SERVER_ERROR,
        "error_500.html",
        renderer.app_name(),
        template_engine,
    )
}

fn serve_error_page(
    status: StatusCode,
    template_name: &str,
    app_name: &str,
    template_engine: Option<&dyn TemplateEngine>,
) -> HttpResponse {
    let context = ErrorPageContext::new(app_name).to_value();

    let html = match template_engine {
        Some(engine) => match render_minijinja_template(engine, template_name, context) {
            Ok(html) => html,
            Err(e) => {
                log::error!("Failed to render {} template: {}", template_name, e);
                fallback_html(status, app_name)
            }
        },
        None => fallback_html(status, app_name),
    };

    HttpResponse::build(status)
        .content_type("text/html; charset=utf-8")
        .insert_header(("Cache-Control", "no-cache, no-store, must-revalidate"))
        .insert_header(("Pragma", "no-cache"))
        .insert_header(("Expires", "0"))
        .body(html)
}

fn fallback_html(status: StatusCode, app_name: &str) -> String {
    let title = format!(
        "{} - {}",
        status.as_u16(),
        status.canonical_reason().unwrap_or("Error")
    );
    format!(
        r#"<!DOCTYPE html>
<html><head><title>{} | {}</title></head>
<body><h1>{}</h1></body></html>"#,
        title, app_name, title
    )
}

/// Default service for everything outside `/api`.
pub async fn not_found(state: web::Data<AppState>) -> HttpResponse {
    serve_404(&state.error_renderer, Some(state.templates.as_ref()))
}
