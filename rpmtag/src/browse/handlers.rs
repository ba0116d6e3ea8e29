// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::listing::{BROWSE_ROOT, Listing, directory_listing, virtual_root};
use super::paths::{BrowseTarget, resolve};
use crate::app_state::AppState;
use crate::public::error::{serve_404, serve_500};
use crate::tags::DIFF_FILE_NAME;
use crate::templates::{ListingPageContext, render_minijinja_template};
use crate::util::blocking::run_blocking;
use actix_files::NamedFile;
use actix_web::http::header::{ContentDisposition, DispositionParam, DispositionType, LOCATION};
use actix_web::{HttpRequest, HttpResponse, web};
use std::fs;
use std::io;
use std::path::PathBuf;

pub async fn redirect_to_root() -> HttpResponse {
    HttpResponse::MovedPermanently()
        .insert_header((LOCATION, BROWSE_ROOT))
        .finish()
}

pub async fn browse(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let tail = req.match_info().get("tail").unwrap_or_default();

    let fs_path = match resolve(&state.catalog, tail) {
        Ok(BrowseTarget::Root) => {
            let catalog = state.catalog.clone();
            return match run_blocking("browse-root", move || virtual_root(&catalog)).await {
                Ok(listing) => render_listing(&state, &listing),
                Err(_) => serve_500(&state.error_renderer, Some(state.templates.as_ref())),
            };
        }
        Ok(BrowseTarget::Path { repo_id, fs_path }) => {
            log::debug!(
                "Browse {} -> repo '{}' at {}",
                req.path(),
                repo_id,
                fs_path.display()
            );
            fs_path
        }
        Err(err) => {
            log::debug!("Browse {} rejected: {}", req.path(), err);
            return not_found(&state);
        }
    };

    let probe = fs_path.clone();
    let metadata = match run_blocking("browse-stat", move || fs::metadata(&probe)).await {
        Ok(Ok(metadata)) => metadata,
        Ok(Err(err)) if err.kind() == io::ErrorKind::NotFound => return not_found(&state),
        Ok(Err(err)) => {
            log::error!("Failed to stat {}: {}", fs_path.display(), err);
            return serve_500(&state.error_renderer, Some(state.templates.as_ref()));
        }
        Err(_) => return serve_500(&state.error_renderer, Some(state.templates.as_ref())),
    };

    if metadata.is_dir() {
        if !req.path().ends_with('/') {
            return HttpResponse::MovedPermanently()
                .insert_header((LOCATION, format!("{}/", req.path())))
                .finish();
        }
        return serve_directory(&state, fs_path, req.path().to_string()).await;
    }

    let is_diff = fs_path
        .file_name()
        .is_some_and(|name| name == DIFF_FILE_NAME);
    if is_diff {
        serve_diff(&state, fs_path).await
    } else {
        serve_download(&req, &state, fs_path).await
    }
}

fn not_found(state: &AppState) -> HttpResponse {
    serve_404(&state.error_renderer, Some(state.templates.as_ref()))
}

fn render_listing(state: &AppState, listing: &Listing) -> HttpResponse {
    let context = ListingPageContext::new(state.error_renderer.app_name(), listing).to_value();
    match render_minijinja_template(state.templates.as_ref(), "browse/listing.html", context) {
        Ok(html) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html),
        Err(e) => {
            log::error!("Failed to render listing {}: {}", listing.path_display, e);
            serve_500(&state.error_renderer, Some(state.templates.as_ref()))
        }
    }
}

async fn serve_directory(state: &AppState, dir: PathBuf, url_path: String) -> HttpResponse {
    let display = dir.clone();
    match run_blocking("browse-listing", move || directory_listing(&dir, &url_path)).await {
        Ok(Ok(listing)) => render_listing(state, &listing),
        Ok(Err(err)) => {
            log::error!("Could not read directory {}: {}", display.display(), err);
            serve_500(&state.error_renderer, Some(state.templates.as_ref()))
        }
        Err(_) => serve_500(&state.error_renderer, Some(state.templates.as_ref())),
    }
}

async fn serve_diff(state: &AppState, path: PathBuf) -> HttpResponse {
    log::debug!("Serving diff record {}", path.display());
    match run_blocking("browse-diff", move || fs::read(&path)).await {
        Ok(Ok(content)) => HttpResponse::Ok()
            .content_type("application/json; charset=utf-8")
            .body(content),
        _ => not_found(state),
    }
}

async fn serve_download(req: &HttpRequest, state: &AppState, path: PathBuf) -> HttpResponse {
    let file = match NamedFile::open_async(&path).await {
        Ok(file) => file,
        Err(err) => {
            log::warn!("Failed to open {}: {}", path.display(), err);
            return not_found(state);
        }
    };

    let filename = path
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_default();
    let content_type = mime_guess::from_path(&path).first_or_octet_stream();

    file.set_content_type(content_type)
        .set_content_disposition(ContentDisposition {
            disposition: DispositionType::Attachment,
            parameters: vec![DispositionParam::Filename(filename)],
        })
        .into_response(req)
}
