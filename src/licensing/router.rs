use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use chrono::Local;
use serde_json::json;
use tracing::warn;

use crate::error::AppError;

use super::form::ApplicationForm;
use super::lookup::{LookupOutcome, LookupService};
use super::store::RecordStore;
use super::validation::validate_submission;

/// Router builder exposing the intake and tracking endpoints.
pub fn license_router<S>(store: Arc<S>) -> Router
where
    S: RecordStore + 'static,
{
    Router::new()
        .route(
            "/api/v1/licenses/applications",
            post(submit_handler::<S>).get(index_handler::<S>),
        )
        .route(
            "/api/v1/licenses/applications/:application_id",
            get(status_handler::<S>),
        )
        .with_state(store)
}

pub(crate) async fn submit_handler<S>(
    State(store): State<Arc<S>>,
    Json(form): Json<ApplicationForm>,
) -> Response
where
    S: RecordStore + 'static,
{
    let today = Local::now().date_naive();
    let snapshot = match validate_submission(&form, today) {
        Ok(snapshot) => snapshot,
        Err(report) => {
            warn!("application rejected with field errors");
            let payload = json!({
                "error": "application form has validation errors",
                "fields": report,
            });
            return (StatusCode::UNPROCESSABLE_ENTITY, Json(payload)).into_response();
        }
    };

    match store.create(snapshot) {
        Ok(record) => (StatusCode::CREATED, Json(record.status_view())).into_response(),
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
        }
    }
}

pub(crate) async fn status_handler<S>(
    State(store): State<Arc<S>>,
    Path(application_id): Path<String>,
) -> Response
where
    S: RecordStore + 'static,
{
    let lookup = LookupService::new(store);
    match lookup.lookup(&application_id) {
        Ok(LookupOutcome::Found(record)) => {
            (StatusCode::OK, Json(record.status_view())).into_response()
        }
        Ok(LookupOutcome::NotFound) => {
            let payload = json!({ "error": "application not found" });
            (StatusCode::NOT_FOUND, Json(payload)).into_response()
        }
        Ok(LookupOutcome::Invalid(_)) => {
            let payload = json!({ "error": "application id is required" });
            (StatusCode::BAD_REQUEST, Json(payload)).into_response()
        }
        Err(err) => {
            let payload = json!({ "error": err.to_string() });
            (StatusCode::SERVICE_UNAVAILABLE, Json(payload)).into_response()
        }
    }
}

/// Admin listing over the append-ordered index.
pub(crate) async fn index_handler<S>(
    State(store): State<Arc<S>>,
) -> Result<Json<serde_json::Value>, AppError>
where
    S: RecordStore + 'static,
{
    let ids = store.list_ids()?;
    Ok(Json(json!({ "applications": ids })))
}
