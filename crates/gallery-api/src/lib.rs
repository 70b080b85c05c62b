//! # gallery-api — Axum HTTP Surface
//!
//! The HTTP layer of the Gallery registry, built on Axum/Tower/Tokio.
//! Exposes the image resource and the schema discovery documents, with
//! caller identity taken from gateway-resolved headers.
//!
//! ## Routes
//!
//! - `/images` and `/images/{image_id}` — image resource CRUD with
//!   keyset pagination, filtering, and multi-key sorting
//! - `/schemas/image`, `/schemas/images` — deployment schema documents
//!
//! ## Request Pipeline
//!
//! Caller extraction → request deserialization (read-only rejection,
//! compiled JSON Schema validation, field transforms) → controller
//! (policy gate + repository/store orchestration) → response
//! serialization (null omission, hypermedia links).
//!
//! ## Crate Policy
//!
//! - Sits at the top of the dependency DAG — depends on all other crates.
//! - No business logic in route handlers — delegates to domain crates.
//! - All errors map to structured HTTP responses via `AppError`.

pub mod config;
pub mod deserializer;
pub mod error;
pub mod extractors;
pub mod routes;
pub mod serializer;
pub mod state;

pub use config::ServiceConfig;
pub use error::AppError;
pub use state::AppState;

use std::sync::Arc;

use gallery_registry::{ImageController, MemoryRepository, MemoryStore, PageConfig, PolicyEnforcer};

/// Assemble application state over the in-memory backend.
pub fn build_state(config: &ServiceConfig) -> anyhow::Result<AppState> {
    let schema = config.schema();
    let page_config = PageConfig {
        default_limit: config.default_limit,
        max_limit: config.max_limit,
    };
    let controller = ImageController::new(
        Arc::new(MemoryRepository::new()),
        Arc::new(MemoryStore::new()),
        Arc::new(PolicyEnforcer::new()),
        page_config,
    );
    Ok(AppState {
        controller: Arc::new(controller),
        deserializer: Arc::new(deserializer::RequestDeserializer::new(&schema)?),
        serializer: Arc::new(serializer::ResponseSerializer::new(
            &schema,
            config.show_direct_url,
        )),
        schema: Arc::new(schema),
    })
}
