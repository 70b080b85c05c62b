//! # Image Resource Routes
//!
//! Routes:
//! - GET    /images — List a page of images (keyset pagination)
//! - POST   /images — Create an image record
//! - GET    /images/{image_id} — Get one image
//! - PUT    /images/{image_id} — Update an image
//! - PATCH  /images/{image_id} — Update an image
//! - DELETE /images/{image_id} — Delete an image (record + stored bytes)
//!
//! Handlers hold no business logic: the deserializer validates input,
//! the controller runs the operation, the serializer shapes output.

use std::collections::BTreeMap;

use axum::body::Bytes;
use axum::extract::{Path, Query, State};
use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};

use gallery_core::ImageId;
use gallery_registry::FilterSet;

use crate::error::AppError;
use crate::extractors::Caller;
use crate::serializer::ResponseSerializer;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/images", get(index).post(create))
        .route(
            "/images/{image_id}",
            get(show).put(update).patch(update).delete(delete),
        )
}

async fn index(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Query(query): Query<BTreeMap<String, String>>,
) -> Result<Response, AppError> {
    let (request, raw_filters) = state.deserializer.index(&query)?;
    let filters = FilterSet::from_params(&raw_filters)?;
    let page = state.controller.index(&ctx, &filters, &request)?;
    Ok(Json(state.serializer.page(&page, &request)).into_response())
}

async fn show(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(image_id): Path<String>,
) -> Result<Response, AppError> {
    let id = ImageId::parse(&image_id)?;
    let image = state.controller.show(&ctx, &id)?;
    Ok(Json(state.serializer.image(&image)).into_response())
}

async fn create(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    body: Bytes,
) -> Result<Response, AppError> {
    let delta = state.deserializer.create(&body)?;
    let image = state.controller.create(&ctx, delta)?;
    tracing::info!(image = %image.id, "image created");

    let location = ResponseSerializer::self_link(&image);
    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(state.serializer.image(&image)),
    )
        .into_response())
}

async fn update(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(image_id): Path<String>,
    body: Bytes,
) -> Result<Response, AppError> {
    let id = ImageId::parse(&image_id)?;
    let delta = state.deserializer.update(&body)?;
    let image = state.controller.update(&ctx, &id, delta)?;
    Ok(Json(state.serializer.image(&image)).into_response())
}

async fn delete(
    State(state): State<AppState>,
    Caller(ctx): Caller,
    Path(image_id): Path<String>,
) -> Result<Response, AppError> {
    let id = ImageId::parse(&image_id)?;
    state.controller.delete(&ctx, &id)?;
    tracing::info!(image = %id, "image deleted");
    Ok(StatusCode::NO_CONTENT.into_response())
}
