use std::io::Cursor;
use std::sync::Arc;

use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::post,
    Router,
};
use serde::Deserialize;
use serde_json::json;

use super::csv_import::{CandidateCsvImporter, FieldMapping};
use super::scan::MarketScanner;
use super::CandidateFilters;

/// Router builder exposing spreadsheet import and market scan endpoints.
pub fn candidate_router<M>(scanner: Arc<M>) -> Router
where
    M: MarketScanner + 'static,
{
    Router::new()
        .route("/api/candidates/csv-import", post(csv_import_handler))
        .route("/api/candidates/scan", post(scan_handler::<M>))
        .with_state(scanner)
}

#[derive(Debug, Deserialize)]
pub(crate) struct CsvImportRequest {
    pub csv: String,
    #[serde(default)]
    pub mapping: FieldMapping,
    #[serde(default)]
    pub filters: CandidateFilters,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ScanRequest {
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub filters: CandidateFilters,
}

fn bad_request(message: String) -> Response {
    let payload = json!({
        "error": message,
    });
    (StatusCode::BAD_REQUEST, axum::Json(payload)).into_response()
}

pub(crate) async fn csv_import_handler(
    axum::Json(request): axum::Json<CsvImportRequest>,
) -> Response {
    let importer = CandidateCsvImporter::new(request.mapping, request.filters);
    match importer.import_reader(Cursor::new(request.csv.into_bytes())) {
        Ok(import) => (StatusCode::OK, axum::Json(import)).into_response(),
        Err(error) => bad_request(error.to_string()),
    }
}

pub(crate) async fn scan_handler<M>(
    State(scanner): State<Arc<M>>,
    axum::Json(request): axum::Json<ScanRequest>,
) -> Response
where
    M: MarketScanner + 'static,
{
    match scanner.scan(&request.city, &request.state, &request.filters) {
        Ok(candidates) => {
            let payload = json!({
                "city": request.city.trim(),
                "state": request.state.trim(),
                "count": candidates.len(),
                "candidates": candidates,
            });
            (StatusCode::OK, axum::Json(payload)).into_response()
        }
        Err(error) => bad_request(error.to_string()),
    }
}
