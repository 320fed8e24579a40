use crate::config::ConfigError;
use crate::telemetry::TelemetryError;
use crate::workflows::candidates::{CandidateImportError, MarketScanError};
use crate::workflows::deals::{DealServiceError, DealValidationError, RepositoryError};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use std::fmt;

#[derive(Debug)]
pub enum AppError {
    Config(ConfigError),
    Telemetry(TelemetryError),
    Io(std::io::Error),
    Server(axum::Error),
    Deals(DealServiceError),
    Import(CandidateImportError),
    Scan(MarketScanError),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::Config(err) => write!(f, "configuration error: {}", err),
            AppError::Telemetry(err) => write!(f, "telemetry error: {}", err),
            AppError::Io(err) => write!(f, "io error: {}", err),
            AppError::Server(err) => write!(f, "server error: {}", err),
            AppError::Deals(err) => write!(f, "deal pipeline error: {}", err),
            AppError::Import(err) => write!(f, "candidate import error: {}", err),
            AppError::Scan(err) => write!(f, "market scan error: {}", err),
        }
    }
}

impl std::error::Error for AppError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            AppError::Config(err) => Some(err),
            AppError::Telemetry(err) => Some(err),
            AppError::Io(err) => Some(err),
            AppError::Server(err) => Some(err),
            AppError::Deals(err) => Some(err),
            AppError::Import(err) => Some(err),
            AppError::Scan(err) => Some(err),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = match &self {
            AppError::Deals(DealServiceError::Validation(_)) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::Deals(DealServiceError::Repository(RepositoryError::NotFound)) => {
                StatusCode::NOT_FOUND
            }
            AppError::Deals(DealServiceError::Repository(RepositoryError::Conflict)) => {
                StatusCode::CONFLICT
            }
            AppError::Import(_) | AppError::Scan(_) => StatusCode::BAD_REQUEST,
            AppError::Config(_)
            | AppError::Telemetry(_)
            | AppError::Io(_)
            | AppError::Server(_)
            | AppError::Deals(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({ "error": self.to_string() }));
        (status, body).into_response()
    }
}

impl From<ConfigError> for AppError {
    fn from(value: ConfigError) -> Self {
        Self::Config(value)
    }
}

impl From<TelemetryError> for AppError {
    fn from(value: TelemetryError) -> Self {
        Self::Telemetry(value)
    }
}

impl From<std::io::Error> for AppError {
    fn from(value: std::io::Error) -> Self {
        Self::Io(value)
    }
}

impl From<axum::Error> for AppError {
    fn from(value: axum::Error) -> Self {
        Self::Server(value)
    }
}

impl From<DealServiceError> for AppError {
    fn from(value: DealServiceError) -> Self {
        Self::Deals(value)
    }
}

impl From<DealValidationError> for AppError {
    fn from(value: DealValidationError) -> Self {
        Self::Deals(DealServiceError::Validation(value))
    }
}

impl From<CandidateImportError> for AppError {
    fn from(value: CandidateImportError) -> Self {
        Self::Import(value)
    }
}

impl From<MarketScanError> for AppError {
    fn from(value: MarketScanError) -> Self {
        Self::Scan(value)
    }
}
