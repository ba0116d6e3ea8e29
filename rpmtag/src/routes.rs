// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::api::{self, TokenSource};
use crate::app_state::AppState;
use crate::browse;
use crate::public;
use crate::util::{CatchPanic, RequestTimeout};
use actix_web::body::MessageBody;
use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::middleware::Logger;
use actix_web::{App, web};
use std::path::PathBuf;
use std::sync::Arc;

/// Everything the route table needs, cloned into each worker's `App`.
#[derive(Clone)]
pub struct RouteContext {
    pub state: Arc<AppState>,
    pub tokens: TokenSource,
    pub assets_dir: PathBuf,
}

pub fn configure(cfg: &mut web::ServiceConfig, context: &RouteContext) {
    cfg.app_data(web::Data::from(context.state.clone()));
    api::configure(cfg, context.tokens.clone());
    browse::configure(cfg);
    public::configure(cfg, context.assets_dir.clone());
    cfg.default_service(web::to(public::error::not_found));
}

/// The server's `App`: routes behind the request guards and access log.
///
/// `RequestTimeout` sits innermost so a timed-out request is still logged.
pub fn build_app(
    context: RouteContext,
    request_timeout_seconds: u64,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse<impl MessageBody>,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new()
        .wrap(RequestTimeout::from_secs(request_timeout_seconds))
        .wrap(CatchPanic)
        .wrap(Logger::new(
            r#"%a "%r" %s %b "%{Referer}i" "%{User-Agent}i" %T"#,
        ))
        .configure(move |cfg| configure(cfg, &context))
}
