//! Opportunity score: a cheap 0-100 ranking of how motivated a listing looks,
//! used for both tracked deals and pre-deal candidates.

use serde::{Deserialize, Serialize};

use super::deals::PropertyType;

const DOM_POINTS: f64 = 40.0;
const DOM_CEILING_DAYS: f64 = 200.0;
const PRICE_POINTS: f64 = 40.0;
const PRICE_ANCHOR_PER_SQFT: f64 = 200.0;
const SIZE_BONUS: f64 = 10.0;
const SIZE_BAND_SQFT: (f64, f64) = (900.0, 1_800.0);

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ScoreInput {
    pub days_on_market: u32,
    pub list_price: f64,
    pub sqft: Option<f64>,
    /// `None` when the listing's type is unknown.
    pub property_type: Option<PropertyType>,
}

fn type_bonus(property_type: Option<PropertyType>) -> f64 {
    match property_type {
        Some(PropertyType::Sfr) => 10.0,
        Some(PropertyType::MultiFamily) => 5.0,
        Some(PropertyType::CondoTownhome) | None => 0.0,
    }
}

pub fn opportunity_score(input: &ScoreInput) -> u8 {
    let sqft = input.sqft.filter(|sqft| sqft.is_finite()).unwrap_or(0.0);

    let dom_score = (f64::from(input.days_on_market) / DOM_CEILING_DAYS * DOM_POINTS).min(DOM_POINTS);

    let price_per_sqft = if sqft > 0.0 {
        input.list_price / sqft
    } else {
        0.0
    };
    let price_score = (PRICE_POINTS - price_per_sqft / PRICE_ANCHOR_PER_SQFT * PRICE_POINTS).max(0.0);

    let size_bonus = if (SIZE_BAND_SQFT.0..=SIZE_BAND_SQFT.1).contains(&sqft) {
        SIZE_BONUS
    } else {
        0.0
    };

    let total = dom_score + price_score + type_bonus(input.property_type) + size_bonus;
    if !total.is_finite() {
        return 0;
    }
    total.round_ties_even().clamp(0.0, 100.0) as u8
}
