//! # Schema Discovery Routes
//!
//! Routes:
//! - GET /schemas/image — JSON Schema for a single image
//! - GET /schemas/images — JSON Schema for an image collection page
//!
//! Serves the documents the entity and page responses link to. The
//! documents are deployment-specific: custom properties and the
//! additional-properties rule come from configuration.

use axum::extract::State;
use axum::routing::get;
use axum::{Json, Router};

use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/schemas/image", get(image_schema))
        .route("/schemas/images", get(collection_schema))
}

async fn image_schema(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.schema.document())
}

async fn collection_schema(State(state): State<AppState>) -> Json<serde_json::Value> {
    Json(state.schema.collection_document())
}
