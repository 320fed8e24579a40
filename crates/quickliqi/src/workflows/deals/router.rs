use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, patch, post},
    Router,
};
use chrono::Utc;
use serde::Deserialize;
use serde_json::json;

use super::domain::{DealId, DealStatus, DealStatusUpdate, DealSubmission, DealUpdate};
use super::repository::{DealRepository, RepositoryError, SettingsStore};
use super::service::{DealPipelineService, DealServiceError};
use super::settings::SettingsUpdate;

/// Router builder exposing the deal pipeline and buyer-criteria endpoints.
pub fn deal_router<R, S>(service: Arc<DealPipelineService<R, S>>) -> Router
where
    R: DealRepository + 'static,
    S: SettingsStore + 'static,
{
    Router::new()
        .route(
            "/api/settings",
            get(settings_handler::<R, S>).put(update_settings_handler::<R, S>),
        )
        .route(
            "/api/deals",
            get(list_handler::<R, S>).post(create_handler::<R, S>),
        )
        .route(
            "/api/deals/:deal_id",
            get(get_handler::<R, S>)
                .put(update_handler::<R, S>)
                .delete(delete_handler::<R, S>),
        )
        .route(
            "/api/deals/:deal_id/status",
            patch(status_handler::<R, S>),
        )
        .route("/api/calculate-metrics", post(recalculate_handler::<R, S>))
        .route("/api/export", get(export_handler::<R, S>))
        .with_state(service)
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct DealListQuery {
    pub status: Option<DealStatus>,
}

pub(crate) fn error_response(error: DealServiceError) -> Response {
    let status = match &error {
        DealServiceError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        DealServiceError::Repository(RepositoryError::NotFound) => StatusCode::NOT_FOUND,
        DealServiceError::Repository(RepositoryError::Conflict) => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    let payload = json!({
        "error": error.to_string(),
    });
    (status, axum::Json(payload)).into_response()
}

pub(crate) async fn settings_handler<R, S>(
    State(service): State<Arc<DealPipelineService<R, S>>>,
) -> Response
where
    R: DealRepository + 'static,
    S: SettingsStore + 'static,
{
    match service.settings() {
        Ok(settings) => (StatusCode::OK, axum::Json(settings)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_settings_handler<R, S>(
    State(service): State<Arc<DealPipelineService<R, S>>>,
    axum::Json(update): axum::Json<SettingsUpdate>,
) -> Response
where
    R: DealRepository + 'static,
    S: SettingsStore + 'static,
{
    match service.update_settings(update) {
        Ok(settings) => (StatusCode::OK, axum::Json(settings)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn list_handler<R, S>(
    State(service): State<Arc<DealPipelineService<R, S>>>,
    Query(query): Query<DealListQuery>,
) -> Response
where
    R: DealRepository + 'static,
    S: SettingsStore + 'static,
{
    match service.list(query.status) {
        Ok(deals) => (StatusCode::OK, axum::Json(deals)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn create_handler<R, S>(
    State(service): State<Arc<DealPipelineService<R, S>>>,
    axum::Json(submission): axum::Json<DealSubmission>,
) -> Response
where
    R: DealRepository + 'static,
    S: SettingsStore + 'static,
{
    match service.create(submission) {
        Ok(record) => (StatusCode::CREATED, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn get_handler<R, S>(
    State(service): State<Arc<DealPipelineService<R, S>>>,
    Path(deal_id): Path<String>,
) -> Response
where
    R: DealRepository + 'static,
    S: SettingsStore + 'static,
{
    match service.get(&DealId(deal_id)) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn update_handler<R, S>(
    State(service): State<Arc<DealPipelineService<R, S>>>,
    Path(deal_id): Path<String>,
    axum::Json(update): axum::Json<DealUpdate>,
) -> Response
where
    R: DealRepository + 'static,
    S: SettingsStore + 'static,
{
    match service.update(&DealId(deal_id), update) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn status_handler<R, S>(
    State(service): State<Arc<DealPipelineService<R, S>>>,
    Path(deal_id): Path<String>,
    axum::Json(update): axum::Json<DealStatusUpdate>,
) -> Response
where
    R: DealRepository + 'static,
    S: SettingsStore + 'static,
{
    match service.update_status(&DealId(deal_id), update.status) {
        Ok(record) => (StatusCode::OK, axum::Json(record)).into_response(),
        Err(error) => error_response(error),
    }
}

pub(crate) async fn delete_handler<R, S>(
    State(service): State<Arc<DealPipelineService<R, S>>>,
    Path(deal_id): Path<String>,
) -> Response
where
    R: DealRepository + 'static,
    S: SettingsStore + 'static,
{
    match service.delete(&DealId(deal_id)) {
        Ok(()) => {
            let payload = json!({
                "message": "Deal deleted successfully",
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn recalculate_handler<R, S>(
    State(service): State<Arc<DealPipelineService<R, S>>>,
) -> Response
where
    R: DealRepository + 'static,
    S: SettingsStore + 'static,
{
    match service.recalculate_all() {
        Ok(updated) => {
            let payload = json!({
                "message": format!("Recalculated metrics for {updated} deals"),
                "updated": updated,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => error_response(error),
    }
}

pub(crate) async fn export_handler<R, S>(
    State(service): State<Arc<DealPipelineService<R, S>>>,
) -> Response
where
    R: DealRepository + 'static,
    S: SettingsStore + 'static,
{
    match service.export_csv() {
        Ok(csv) => {
            let disposition = format!(
                "attachment; filename=quickliqi_deals_{}.csv",
                Utc::now().format("%Y%m%d")
            );
            (
                StatusCode::OK,
                [
                    (header::CONTENT_TYPE, "text/csv".to_string()),
                    (header::CONTENT_DISPOSITION, disposition),
                ],
                csv,
            )
                .into_response()
        }
        Err(error) => error_response(error),
    }
}
