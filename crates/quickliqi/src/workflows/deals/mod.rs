//! Deal pipeline: tracked deals, buyer criteria, and the evaluation engine
//! that turns raw deal figures into investment metrics.

pub mod domain;
pub mod evaluation;
pub mod export;
pub mod repository;
pub mod router;
pub mod service;
pub mod settings;
pub mod validation;

#[cfg(test)]
mod tests;

pub use domain::{
    DealId, DealInput, DealRecord, DealSignal, DealStatus, DealStatusUpdate, DealSubmission,
    DealUpdate, FinancingPref, PropertyType,
};
pub use evaluation::{
    evaluate, evaluate_detailed, CriteriaShortfall, DealEvaluation, DerivedMetrics,
    FinancingScenario, CASH_DSCR_SENTINEL,
};
pub use export::ExportError;
pub use repository::{DealRepository, RepositoryError, SettingsStore};
pub use router::deal_router;
pub use service::{DealPipelineService, DealServiceError};
pub use settings::{RentInputMode, Settings, SettingsUpdate};
pub use validation::DealValidationError;
