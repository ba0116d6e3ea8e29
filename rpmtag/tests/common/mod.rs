// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

#![allow(dead_code)]

use actix_web::dev::{ServiceFactory, ServiceRequest, ServiceResponse};
use actix_web::http::header::AUTHORIZATION;
use actix_web::{App, test};
use rpmtag::api::TokenSource;
use rpmtag::app_state::AppState;
use rpmtag::catalog::RepoCatalog;
use rpmtag::routes::{self, RouteContext};
use rpmtag::tags::MetadataGenerator;
use rpmtag::util::test_config::TestConfigBuilder;
use rpmtag::util::test_fixtures::TestFixtureRoot;
use rpmtag::util::test_generators::RecordingGenerator;
use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

pub const API_TOKEN: &str = "test-token";

/// Fixture with two repositories:
/// * `alpha` reads `mirror/os` and `mirror/updates` and keeps tags in `tags/alpha`;
/// * `beta` reads `mirror/beta` and uses the shared `tags/_shared` directory.
pub struct TestHarness {
    pub fixture: TestFixtureRoot,
    pub catalog: Arc<RepoCatalog>,
    pub generator: Arc<RecordingGenerator>,
    context: RouteContext,
}

impl TestHarness {
    pub fn new(name: &str) -> Self {
        let generator = Arc::new(RecordingGenerator::new());
        Self::build(name, generator.clone(), generator)
    }

    /// Same layout with a different metadata tool; `generator` stays an idle recorder.
    pub fn with_metadata(name: &str, metadata: Arc<dyn MetadataGenerator>) -> Self {
        Self::build(name, Arc::new(RecordingGenerator::new()), metadata)
    }

    fn build(
        name: &str,
        generator: Arc<RecordingGenerator>,
        metadata: Arc<dyn MetadataGenerator>,
    ) -> Self {
        let fixture = TestFixtureRoot::new_unique(name).expect("fixture root");
        let assets_dir = fixture.path().join("assets");
        fs::create_dir_all(&assets_dir).expect("assets dir");
        fs::write(assets_dir.join("style.css"), "body {}").expect("stylesheet");

        let alpha_tags = fixture.tags_dir("alpha");
        let config = TestConfigBuilder::for_fixture(&fixture)
            .with_assets_dir(&assets_dir.to_string_lossy())
            .with_repo("alpha", &["os", "updates"], Some(&alpha_tags.to_string_lossy()))
            .with_repo("beta", &["beta"], None)
            .build();
        config.validate().expect("valid test config");

        let catalog = Arc::new(RepoCatalog::from_config(&config));
        let context = RouteContext {
            state: Arc::new(AppState::new(catalog.clone(), metadata)),
            tokens: TokenSource::Fixed(API_TOKEN.to_string()),
            assets_dir: PathBuf::from(&config.assets_dir),
        };

        Self {
            fixture,
            catalog,
            generator,
            context,
        }
    }

    pub fn route_context(&self) -> RouteContext {
        self.context.clone()
    }

    pub fn alpha_tags(&self) -> PathBuf {
        self.fixture.tags_dir("alpha")
    }
}

pub fn build_test_app(
    context: RouteContext,
) -> App<
    impl ServiceFactory<
        ServiceRequest,
        Config = (),
        Response = ServiceResponse,
        Error = actix_web::Error,
        InitError = (),
    >,
> {
    App::new().configure(move |cfg| routes::configure(cfg, &context))
}

pub fn create_tag_request(folder: &str, kind: &str) -> test::TestRequest {
    test::TestRequest::post()
        .uri(&format!("/api/create-tag?folder={}&type={}", folder, kind))
        .insert_header((AUTHORIZATION, format!("Bearer {}", API_TOKEN)))
}

/// The backup date the server stamped on a create-tag response.
pub fn response_date(body: &serde_json::Value) -> String {
    body["date"].as_str().unwrap_or_default().to_string()
}
