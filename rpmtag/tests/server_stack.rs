// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

mod common;

use actix_web::body::{MessageBody, to_bytes};
use actix_web::dev::ServiceResponse;
use actix_web::http::StatusCode;
use actix_web::{HttpResponse, test, web};
use rpmtag::routes;
use rpmtag::tags::{MetadataError, MetadataGenerator};
use serde_json::Value;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Takes longer than the one-second request timeout used below.
struct SlowGenerator;

impl MetadataGenerator for SlowGenerator {
    fn regenerate(&self, _dir: &Path) -> Result<(), MetadataError> {
        std::thread::sleep(Duration::from_millis(2500));
        Ok(())
    }
}

async fn explode() -> HttpResponse {
    panic!("handler exploded")
}

async fn json_outcome<B: MessageBody>(
    result: Result<ServiceResponse<B>, actix_web::Error>,
) -> (StatusCode, Value) {
    match result {
        Ok(resp) => {
            let status = resp.status();
            (status, test::read_body_json(resp).await)
        }
        Err(error) => {
            let resp = error.error_response();
            let status = resp.status();
            let bytes = to_bytes(resp.into_body()).await.unwrap();
            (status, serde_json::from_slice(&bytes).unwrap())
        }
    }
}

#[actix_web::test]
async fn guarded_app_serves_every_surface() {
    let harness = common::TestHarness::new("stack-surfaces");
    harness.fixture.add_package("os", "a.rpm").unwrap();
    let app = test::init_service(routes::build_app(harness.route_context(), 30)).await;

    for uri in ["/", "/browse/", "/api/tags/alpha", "/assets/style.css"] {
        let resp = test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
    }

    let resp = test::call_service(
        &app,
        common::create_tag_request("alpha", "monthly").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::get()
            .uri("/browse/alpha/monthly/a.rpm")
            .to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::OK);

    let resp = test::call_service(
        &app,
        test::TestRequest::get().uri("/api/missing").to_request(),
    )
    .await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn slow_tag_creation_times_out_with_json() {
    let harness = common::TestHarness::with_metadata("stack-timeout", Arc::new(SlowGenerator));
    harness.fixture.add_package("os", "a.rpm").unwrap();
    let app = test::init_service(routes::build_app(harness.route_context(), 1)).await;

    let result = test::try_call_service(
        &app,
        common::create_tag_request("alpha", "monthly").to_request(),
    )
    .await;
    let (status, body) = json_outcome(result).await;
    assert_eq!(status, StatusCode::GATEWAY_TIMEOUT);
    assert_eq!(body["error"], "Request timed out");
}

#[actix_web::test]
async fn panicking_route_returns_json_500_and_app_keeps_serving() {
    let harness = common::TestHarness::new("stack-panic");
    let app = test::init_service(
        routes::build_app(harness.route_context(), 30).route("/boom", web::get().to(explode)),
    )
    .await;

    let result =
        test::try_call_service(&app, test::TestRequest::get().uri("/boom").to_request()).await;
    let (status, body) = json_outcome(result).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["error"], "Internal server error");

    let resp = test::call_service(&app, test::TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
}
