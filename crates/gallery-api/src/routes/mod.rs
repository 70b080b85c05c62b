//! # Route Modules
//!
//! Each module defines an Axum Router for one API surface area.
//! Routers are assembled here and mounted in `main.rs`.

pub mod images;
pub mod schemas;

use axum::Router;

use crate::state::AppState;

/// The full application router.
pub fn router() -> Router<AppState> {
    Router::new()
        .merge(images::router())
        .merge(schemas::router())
}
