// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use std::sync::Arc;

use crate::catalog::RepoCatalog;
use crate::public::error::ErrorRenderer;
use crate::tags::{MetadataGenerator, TagWorkflow};
use crate::templates::{MiniJinjaEngine, TemplateEngine};

pub const APP_NAME: &str = "RPM Server";

/// Shared, read-only handler state built once at startup.
pub struct AppState {
    pub catalog: Arc<RepoCatalog>,
    pub workflow: Arc<TagWorkflow>,
    pub templates: Arc<dyn TemplateEngine>,
    pub error_renderer: ErrorRenderer,
}

impl AppState {
    pub fn new(catalog: Arc<RepoCatalog>, generator: Arc<dyn MetadataGenerator>) -> Self {
        Self {
            workflow: Arc::new(TagWorkflow::new(catalog.clone(), generator)),
            catalog,
            templates: Arc::new(MiniJinjaEngine::new()),
            error_renderer: ErrorRenderer::new(APP_NAME.to_string()),
        }
    }
}
