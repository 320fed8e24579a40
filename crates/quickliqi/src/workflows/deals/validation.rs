//! Range checks applied before figures reach the evaluator. The evaluator
//! itself never fails, so anything it cannot make sense of is rejected here.

use super::domain::{DealInput, DealSubmission, DealUpdate};
use super::settings::Settings;

#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DealValidationError {
    #[error("{field} must be a finite number")]
    NotFinite { field: &'static str },
    #[error("{field} must not be negative")]
    Negative { field: &'static str },
    #[error("{field} is required")]
    MissingField { field: &'static str },
    #[error("state must be a two-letter code, got '{0}'")]
    InvalidState(String),
    #[error("term_years must be greater than zero")]
    InvalidTerm,
}

fn non_negative(field: &'static str, value: f64) -> Result<(), DealValidationError> {
    if !value.is_finite() {
        return Err(DealValidationError::NotFinite { field });
    }
    if value < 0.0 {
        return Err(DealValidationError::Negative { field });
    }
    Ok(())
}

fn non_negative_opt(field: &'static str, value: Option<f64>) -> Result<(), DealValidationError> {
    value.map_or(Ok(()), |value| non_negative(field, value))
}

fn required(field: &'static str, value: &str) -> Result<(), DealValidationError> {
    if value.trim().is_empty() {
        Err(DealValidationError::MissingField { field })
    } else {
        Ok(())
    }
}

pub fn validate_submission(submission: &DealSubmission) -> Result<(), DealValidationError> {
    required("address", &submission.address)?;
    required("city", &submission.city)?;

    let state = submission.state.trim();
    if state.chars().count() != 2 || !state.chars().all(|c| c.is_ascii_alphabetic()) {
        return Err(DealValidationError::InvalidState(submission.state.clone()));
    }

    non_negative("list_price", submission.list_price)?;
    non_negative("baths", submission.baths)?;
    non_negative("repair_estimate", submission.repair_estimate)?;
    non_negative("monthly_rent", submission.monthly_rent)?;
    non_negative("taxes_insurance_monthly", submission.taxes_insurance_monthly)?;
    non_negative("assignment_fee", submission.assignment_fee)?;
    non_negative_opt("arv_estimate", submission.arv_estimate)?;
    non_negative_opt("original_price", submission.original_price)?;
    non_negative_opt("sqft", submission.sqft)?;
    non_negative_opt("lot_size_sqft", submission.lot_size_sqft)?;
    Ok(())
}

/// Figures handed straight to the evaluator, without a stored listing.
pub fn validate_input(input: &DealInput) -> Result<(), DealValidationError> {
    non_negative("list_price", input.list_price)?;
    non_negative("repair_estimate", input.repair_estimate)?;
    non_negative("monthly_rent", input.monthly_rent)?;
    non_negative("taxes_insurance_monthly", input.taxes_insurance_monthly)?;
    non_negative("assignment_fee", input.assignment_fee)?;
    non_negative_opt("arv_estimate", input.arv_estimate)?;
    non_negative_opt("sqft", input.sqft)?;
    Ok(())
}

pub fn validate_update(update: &DealUpdate) -> Result<(), DealValidationError> {
    non_negative_opt("arv_estimate", update.arv_estimate)?;
    non_negative_opt("repair_estimate", update.repair_estimate)?;
    non_negative_opt("monthly_rent", update.monthly_rent)?;
    non_negative_opt("taxes_insurance_monthly", update.taxes_insurance_monthly)?;
    non_negative_opt("assignment_fee", update.assignment_fee)?;
    Ok(())
}

/// Fractions at or above 1 are accepted; the evaluator degrades them.
pub fn validate_settings(settings: &Settings) -> Result<(), DealValidationError> {
    for (field, value) in settings.numeric_fields() {
        // signed floor
        if field == "min_monthly_cf" {
            if !value.is_finite() {
                return Err(DealValidationError::NotFinite { field });
            }
            continue;
        }
        non_negative(field, value)?;
    }
    if settings.term_years == 0 {
        return Err(DealValidationError::InvalidTerm);
    }
    Ok(())
}
