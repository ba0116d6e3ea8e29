// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::response::json_error;
use crate::app_state::AppState;
use crate::tags::error::INVALID_REQUEST_MESSAGE;
use crate::util::blocking::run_blocking;
use crate::util::dir_listing::{list_packages, list_subdirectories};
use actix_web::http::StatusCode;
use actix_web::{HttpRequest, HttpResponse, web};
use chrono::Utc;
use serde::{Deserialize, Serialize};

#[derive(Deserialize)]
struct CreateTagQuery {
    #[serde(default)]
    folder: String,
    #[serde(default, rename = "type")]
    kind: String,
}

#[derive(Serialize)]
struct CreateTagResponse {
    folder: String,
    tag: String,
    date: String,
    file_count: usize,
    diff_count: usize,
    backup_created: bool,
}

#[derive(Serialize)]
struct TagsResponse {
    tags: Vec<String>,
}

#[derive(Serialize)]
struct PackagesResponse {
    packages: Vec<String>,
}

/// A single path segment that cannot climb out of its parent.
fn is_plain_segment(segment: &str) -> bool {
    !segment.is_empty()
        && segment != "."
        && segment != ".."
        && !segment.contains('/')
        && !segment.contains('\\')
}

pub async fn list_tags(state: web::Data<AppState>, path: web::Path<String>) -> HttpResponse {
    let folder = path.into_inner();
    let tags_dir = match state.catalog.tags_dir(&folder) {
        Ok(dir) => dir,
        Err(err) => return json_error(StatusCode::BAD_REQUEST, &err.to_string()),
    };

    match run_blocking("list-tags", move || list_subdirectories(&tags_dir)).await {
        Ok(Ok(mut tags)) => {
            tags.sort();
            HttpResponse::Ok().json(TagsResponse { tags })
        }
        Ok(Err(err)) => {
            log::error!("Could not list tags for '{}': {}", folder, err);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Could not list tags")
        }
        Err(_) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "Could not list tags"),
    }
}

pub async fn list_tag_packages(
    state: web::Data<AppState>,
    path: web::Path<(String, String)>,
) -> HttpResponse {
    let (folder, tag) = path.into_inner();
    let tags_dir = match state.catalog.tags_dir(&folder) {
        Ok(dir) => dir,
        Err(err) => return json_error(StatusCode::BAD_REQUEST, &err.to_string()),
    };
    if !is_plain_segment(&tag) {
        return json_error(StatusCode::BAD_REQUEST, "Invalid tag");
    }

    let tag_dir = tags_dir.join(&tag);
    match run_blocking("list-packages", move || list_packages(&tag_dir)).await {
        Ok(Ok(mut packages)) => {
            packages.sort();
            HttpResponse::Ok().json(PackagesResponse { packages })
        }
        Ok(Err(err)) => {
            log::error!("Could not list packages for '{}/{}': {}", folder, tag, err);
            json_error(StatusCode::INTERNAL_SERVER_ERROR, "Could not list packages")
        }
        Err(_) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "Could not list packages"),
    }
}

pub async fn create_tag(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    let Ok(query) = web::Query::<CreateTagQuery>::from_query(req.query_string()) else {
        return json_error(StatusCode::BAD_REQUEST, INVALID_REQUEST_MESSAGE);
    };
    let CreateTagQuery { folder, kind } = query.into_inner();
    log::info!("Create tag requested: folder='{}' type='{}'", folder, kind);

    let workflow = state.workflow.clone();
    let result = run_blocking("create-tag", move || {
        workflow.create_tag(&folder, &kind, Utc::now())
    })
    .await;

    match result {
        Ok(Ok(outcome)) => {
            HttpResponse::Ok().json(CreateTagResponse {
                folder: outcome.repository.clone(),
                tag: outcome.kind.as_str().to_string(),
                date: outcome.date.format("%Y-%m-%d").to_string(),
                file_count: outcome.file_count(),
                diff_count: outcome.diff_count(),
                backup_created: outcome.backup_created(),
            })
        }
        Ok(Err(err)) => {
            let status = if err.is_client_error() {
                log::warn!("Create tag rejected: {}", err);
                StatusCode::BAD_REQUEST
            } else {
                log::error!("Create tag failed: {}", err);
                StatusCode::INTERNAL_SERVER_ERROR
            };
            json_error(status, &err.public_message())
        }
        Err(_) => json_error(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error"),
    }
}
