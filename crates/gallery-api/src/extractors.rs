//! # Custom Extractors
//!
//! Caller identity extraction from transport headers. Authentication
//! itself lives in front of this service; the headers carry what the
//! gateway already resolved, and their absence yields an anonymous
//! context rather than a rejection.

use std::convert::Infallible;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use gallery_core::{RequestContext, TenantId};

/// The resolved caller, extracted from `x-user-id`, `x-tenant-id`, and
/// `x-roles` headers.
#[derive(Debug, Clone)]
pub struct Caller(pub RequestContext);

impl<S> FromRequestParts<S> for Caller
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let header = |name: &str| {
            parts
                .headers
                .get(name)
                .and_then(|v| v.to_str().ok())
                .map(str::to_string)
        };

        let is_admin = header("x-roles")
            .map(|roles| roles.split(',').any(|r| r.trim() == "admin"))
            .unwrap_or(false);

        Ok(Self(RequestContext {
            user: header("x-user-id"),
            tenant: header("x-tenant-id").map(TenantId::new),
            is_admin,
        }))
    }
}
