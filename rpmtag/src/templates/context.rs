// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use crate::browse::listing::Listing;
use minijinja::{Value, context};

const STYLESHEET: &str = "/assets/style.css";

#[derive(Debug, Clone)]
pub struct ErrorPageContext {
    app_name: String,
}

impl ErrorPageContext {
    pub fn new(app_name: &str) -> Self {
        Self {
            app_name: app_name.to_string(),
        }
    }

    pub fn to_value(&self) -> Value {
        context! {
            stylesheet => STYLESHEET,
            app_name => &self.app_name
        }
    }
}

#[derive(Debug, Clone)]
pub struct LandingPageContext {
    app_name: String,
    repository_count: usize,
}

impl LandingPageContext {
    pub fn new(app_name: &str, repository_count: usize) -> Self {
        Self {
            app_name: app_name.to_string(),
            repository_count,
        }
    }

    pub fn to_value(&self) -> Value {
        context! {
            stylesheet => STYLESHEET,
            app_name => &self.app_name,
            repository_count => self.repository_count
        }
    }
}

#[derive(Debug, Clone)]
pub struct ListingPageContext<'a> {
    app_name: String,
    listing: &'a Listing,
}

impl<'a> ListingPageContext<'a> {
    pub fn new(app_name: &str, listing: &'a Listing) -> Self {
        Self {
            app_name: app_name.to_string(),
            listing,
        }
    }

    pub fn to_value(&self) -> Value {
        context! {
            stylesheet => STYLESHEET,
            app_name => &self.app_name,
            listing => Value::from_serialize(self.listing)
        }
    }
}
