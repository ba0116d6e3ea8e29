// This file is part of the product rpmtag.
// SPDX-FileCopyrightText: 2025-2026 Zivatar Limited
// SPDX-License-Identifier: AGPL-3.0-or-later
// The code and documentation in this repository is licensed under the GNU Affero General Public License v3.0 or later (AGPL-3.0-or-later). See LICENSE.

use super::response::json_error;
use actix_web::{
    Error,
    body::EitherBody,
    dev::{Service, ServiceRequest, ServiceResponse, Transform, forward_ready},
    http::{StatusCode, header::AUTHORIZATION},
};
use futures_util::future::LocalBoxFuture;
use std::future::{Ready, ready};

pub const API_TOKEN_ENV: &str = "RPM_API_TOKEN";
pub const DEFAULT_API_TOKEN: &str = "changeme";

/// Where the expected bearer token comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenSource {
    /// `RPM_API_TOKEN`, re-read on every request; empty or unset means the default.
    Environment,
    Fixed(String),
}

impl TokenSource {
    pub fn current(&self) -> String {
        match self {
            TokenSource::Environment => std::env::var(API_TOKEN_ENV)
                .ok()
                .filter(|token| !token.is_empty())
                .unwrap_or_else(|| DEFAULT_API_TOKEN.to_string()),
            TokenSource::Fixed(token) => token.clone(),
        }
    }

    pub fn uses_default(&self) -> bool {
        self.current() == DEFAULT_API_TOKEN
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthFailure {
    Missing,
    Malformed,
    Mismatch,
}

impl AuthFailure {
    pub fn message(&self) -> &'static str {
        match self {
            AuthFailure::Missing => "Unauthorized",
            AuthFailure::Malformed => "Unauthorized: Invalid token format",
            AuthFailure::Mismatch => "Unauthorized: Invalid token",
        }
    }
}

/// Accepts exactly `<scheme> <token>` with a case-insensitive `bearer` scheme.
pub fn check_authorization(header: Option<&str>, expected: &str) -> Result<(), AuthFailure> {
    let header = match header {
        Some(value) if !value.is_empty() => value,
        _ => return Err(AuthFailure::Missing),
    };

    let parts: Vec<&str> = header.split(' ').collect();
    let [scheme, token] = parts.as_slice() else {
        return Err(AuthFailure::Malformed);
    };
    if !scheme.eq_ignore_ascii_case("bearer") {
        return Err(AuthFailure::Malformed);
    }
    if *token != expected {
        return Err(AuthFailure::Mismatch);
    }
    Ok(())
}

/// Rejects requests without the expected bearer token with 401 JSON.
pub struct BearerAuth {
    tokens: TokenSource,
}

impl BearerAuth {
    pub fn new(tokens: TokenSource) -> Self {
        Self { tokens }
    }
}

impl<S, B> Transform<S, ServiceRequest> for BearerAuth
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = BearerAuthService<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(BearerAuthService {
            service,
            tokens: self.tokens.clone(),
        }))
    }
}

pub struct BearerAuthService<S> {
    service: S,
    tokens: TokenSource,
}

impl<S, B> Service<ServiceRequest> for BearerAuthService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let verdict = match req.headers().get(AUTHORIZATION).map(|value| value.to_str()) {
            Some(Err(_)) => Err(AuthFailure::Malformed),
            Some(Ok(value)) => check_authorization(Some(value), &self.tokens.current()),
            None => check_authorization(None, &self.tokens.current()),
        };

        if let Err(failure) = verdict {
            log::warn!(
                "Rejected {} {}: {}",
                req.method(),
                req.path(),
                failure.message()
            );
            let (req, _) = req.into_parts();
            let response =
                json_error(StatusCode::UNAUTHORIZED, failure.message()).map_into_right_body();
            return Box::pin(async move { Ok(ServiceResponse::new(req, response)) });
        }

        let fut = self.service.call(req);
        Box::pin(async move { fut.await.map(ServiceResponse::map_into_left_body) })
    }
}
