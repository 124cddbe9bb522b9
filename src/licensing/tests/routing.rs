use std::sync::Arc;

use axum::http::StatusCode;
use tower::ServiceExt;

use super::common::*;
use crate::licensing::router::license_router;
use crate::licensing::store::{MemoryStore, RecordStore};

fn post_request(body: Vec<u8>) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::post("/api/v1/licenses/applications")
        .header(axum::http::header::CONTENT_TYPE, "application/json")
        .body(axum::body::Body::from(body))
        .expect("request builds")
}

fn get_request(uri: &str) -> axum::http::Request<axum::body::Body> {
    axum::http::Request::get(uri)
        .body(axum::body::Body::empty())
        .expect("request builds")
}

#[tokio::test]
async fn submit_route_creates_a_pending_record() {
    let store = Arc::new(MemoryStore::default());
    let router = license_router(store.clone());

    let body = serde_json::to_vec(&valid_form()).expect("form serializes");
    let response = router.oneshot(post_request(body)).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::CREATED);
    let payload = read_json_body(response).await;

    let id = payload["applicationId"].as_str().expect("id in payload");
    assert_issued_id_format(id);
    assert_eq!(payload["status"], "pending");
    assert_eq!(payload["fee"], 30);

    assert_eq!(store.list_ids().expect("index readable").len(), 1);
}

#[tokio::test]
async fn submit_route_rejects_invalid_forms_with_field_errors() {
    let router = license_router(Arc::new(MemoryStore::default()));

    let mut form = valid_form();
    form.owner_zip_code = "1901".to_string();
    let body = serde_json::to_vec(&form).expect("form serializes");

    let response = router.oneshot(post_request(body)).await.expect("route executes");
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let payload = read_json_body(response).await;
    assert_eq!(
        payload["fields"]["ownerZipCode"],
        "ZIP code must be exactly 5 digits"
    );
}

#[tokio::test]
async fn submit_route_reports_storage_unavailability() {
    let router = license_router(Arc::new(UnavailableStore));

    let body = serde_json::to_vec(&valid_form()).expect("form serializes");
    let response = router.oneshot(post_request(body)).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn status_route_distinguishes_missing_from_invalid() {
    let router = license_router(Arc::new(MemoryStore::default()));

    let response = router
        .clone()
        .oneshot(get_request("/api/v1/licenses/applications/DL-999-ZZZZZZZZZ"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::NOT_FOUND);

    let response = router
        .oneshot(get_request("/api/v1/licenses/applications/%20%20"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn status_route_returns_the_tracking_view() {
    let store = Arc::new(MemoryStore::default());
    let record = store.create(full_snapshot()).expect("create succeeds");
    let router = license_router(store);

    let uri = format!("/api/v1/licenses/applications/{}", record.id.as_str());
    let response = router.oneshot(get_request(&uri)).await.expect("route executes");

    assert_eq!(response.status(), StatusCode::OK);
    let payload = read_json_body(response).await;
    assert_eq!(payload["applicationId"], record.id.as_str());
    assert_eq!(payload["ownerName"], "Jordan Whitfield");
    assert_eq!(payload["dogName"], "Biscuit");
    assert_eq!(payload["fee"], 30);
}

#[tokio::test]
async fn listing_route_exposes_the_index() {
    let store = Arc::new(MemoryStore::default());
    let record = store.create(full_snapshot()).expect("create succeeds");
    let router = license_router(store);

    let response = router
        .oneshot(get_request("/api/v1/licenses/applications"))
        .await
        .expect("route executes");
    assert_eq!(response.status(), StatusCode::OK);

    let payload = read_json_body(response).await;
    let ids = payload["applications"].as_array().expect("id array");
    assert_eq!(ids.len(), 1);
    assert_eq!(ids[0], record.id.as_str());
}
