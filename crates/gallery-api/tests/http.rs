//! End-to-end exercise of the HTTP surface over the in-memory backend.

use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;

use gallery_api::{build_state, routes, ServiceConfig};

fn app() -> Router {
    let state = build_state(&ServiceConfig::default()).unwrap();
    routes::router().with_state(state)
}

async fn send(app: &Router, request: Request<Body>) -> (StatusCode, Value) {
    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    let body = if bytes.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };
    (status, body)
}

fn request(method: Method, uri: &str, body: Option<Value>) -> Request<Body> {
    let builder = Request::builder()
        .method(method)
        .uri(uri)
        .header("x-user-id", "user-1")
        .header("x-tenant-id", "tenant-1");
    match body {
        Some(value) => builder.body(Body::from(value.to_string())).unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    }
}

#[tokio::test]
async fn test_create_show_delete_lifecycle() {
    let app = app();

    let (status, created) = send(
        &app,
        request(Method::POST, "/images", Some(json!({"name": "image-1"}))),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(created["name"], json!("image-1"));
    assert_eq!(created["status"], json!("queued"));
    assert_eq!(created["visibility"], json!("private"));

    let id = created["id"].as_str().unwrap().to_string();
    assert_eq!(created["self"], json!(format!("/images/{id}")));

    let (status, shown) = send(
        &app,
        request(Method::GET, &format!("/images/{id}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(shown["id"], json!(id));

    let (status, _) = send(
        &app,
        request(Method::DELETE, &format!("/images/{id}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) = send(
        &app,
        request(Method::GET, &format!("/images/{id}"), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_create_sets_location_header() {
    let app = app();
    let response = app
        .clone()
        .oneshot(request(Method::POST, "/images", Some(json!({}))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let location = response.headers().get(header::LOCATION).unwrap();
    assert!(location.to_str().unwrap().starts_with("/images/"));
}

#[tokio::test]
async fn test_read_only_body_field_is_forbidden() {
    let app = app();
    let (status, body) = send(
        &app,
        request(Method::POST, "/images", Some(json!({"status": "active"}))),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(body["error"]["code"], json!(403));
}

#[tokio::test]
async fn test_bad_limit_is_bad_request() {
    let app = app();
    for bad in ["blah", "-1", "1.1"] {
        let (status, _) = send(
            &app,
            request(Method::GET, &format!("/images?limit={bad}"), None),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "limit '{bad}'");
    }
}

#[tokio::test]
async fn test_update_changes_fields() {
    let app = app();
    let (_, created) = send(
        &app,
        request(Method::POST, "/images", Some(json!({"name": "before"}))),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let (status, updated) = send(
        &app,
        request(
            Method::PATCH,
            &format!("/images/{id}"),
            Some(json!({"name": "after", "visibility": "public"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["name"], json!("after"));
    assert_eq!(updated["visibility"], json!("public"));
}

#[tokio::test]
async fn test_keyset_paging_walk() {
    let app = app();
    for name in ["a", "b", "c"] {
        let (status, _) = send(
            &app,
            request(Method::POST, "/images", Some(json!({"name": name}))),
        )
        .await;
        assert_eq!(status, StatusCode::CREATED);
    }

    let (status, page) = send(
        &app,
        request(
            Method::GET,
            "/images?sort_key=name&sort_dir=desc&limit=2",
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = page["images"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["c", "b"]);
    assert_eq!(
        page["first"],
        json!("/images?sort_key=name&sort_dir=desc&limit=2")
    );

    let next = page["next"].as_str().unwrap().to_string();
    let (status, last) = send(&app, request(Method::GET, &next, None)).await;
    assert_eq!(status, StatusCode::OK);
    let names: Vec<&str> = last["images"]
        .as_array()
        .unwrap()
        .iter()
        .map(|i| i["name"].as_str().unwrap())
        .collect();
    assert_eq!(names, vec!["a"]);
    assert!(last.get("next").is_none());
}

#[tokio::test]
async fn test_bare_list_query_echoes_no_defaults() {
    let app = app();
    send(
        &app,
        request(Method::POST, "/images", Some(json!({"name": "only"}))),
    )
    .await;

    let (status, page) = send(&app, request(Method::GET, "/images", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(page["first"], json!("/images"));
    assert!(page.get("next").is_none());

    // A lone limit echoes just that, and the next link hangs off it.
    let (_, page) = send(&app, request(Method::GET, "/images?limit=1", None)).await;
    assert_eq!(page["first"], json!("/images?limit=1"));
    let next = page["next"].as_str().unwrap();
    assert!(next.starts_with("/images?limit=1&marker="), "next was {next}");
}

#[tokio::test]
async fn test_visibility_between_tenants() {
    let app = app();
    let (_, created) = send(
        &app,
        request(Method::POST, "/images", Some(json!({"name": "mine"}))),
    )
    .await;
    let id = created["id"].as_str().unwrap().to_string();

    let other = Request::builder()
        .method(Method::GET)
        .uri(format!("/images/{id}"))
        .header("x-user-id", "user-2")
        .header("x-tenant-id", "tenant-2")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, other).await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    // Publicize, then the other tenant sees it.
    send(
        &app,
        request(
            Method::PUT,
            &format!("/images/{id}"),
            Some(json!({"visibility": "public"})),
        ),
    )
    .await;
    let other = Request::builder()
        .method(Method::GET)
        .uri(format!("/images/{id}"))
        .header("x-tenant-id", "tenant-2")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&app, other).await;
    assert_eq!(status, StatusCode::OK);
}

#[tokio::test]
async fn test_schema_documents_served() {
    let app = app();
    let (status, doc) = send(&app, request(Method::GET, "/schemas/image", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["properties"].get("visibility").is_some());

    let (status, doc) = send(&app, request(Method::GET, "/schemas/images", None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["properties"].get("images").is_some());
}

#[tokio::test]
async fn test_missing_body_is_bad_request() {
    let app = app();
    let (status, _) = send(&app, request(Method::POST, "/images", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}
