//! # Application State
//!
//! Shared state for the Axum application: the resource controller and
//! the schema-driven request/response machinery, all built once at
//! startup from [`ServiceConfig`](crate::config::ServiceConfig).

use std::sync::Arc;

use gallery_registry::ImageController;
use gallery_schema::ImageSchema;

use crate::deserializer::RequestDeserializer;
use crate::serializer::ResponseSerializer;

/// Shared application state passed to all route handlers.
#[derive(Clone)]
pub struct AppState {
    pub controller: Arc<ImageController>,
    pub deserializer: Arc<RequestDeserializer>,
    pub serializer: Arc<ResponseSerializer>,
    pub schema: Arc<ImageSchema>,
}
