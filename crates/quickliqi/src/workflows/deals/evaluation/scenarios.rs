use serde::{Deserialize, Serialize};

use super::super::domain::{DealInput, FinancingPref};
use super::super::settings::Settings;

/// Coverage reported for an all-cash purchase: no debt, so any DSCR floor
/// is trivially met.
pub const CASH_DSCR_SENTINEL: f64 = 999.0;

/// Financing structure the final metrics are reported under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinancingScenario {
    Cash,
    Creative,
}

impl FinancingScenario {
    /// `Any` takes the better cash-on-cash return; ties go to cash.
    pub fn select(pref: FinancingPref, coc_cash: f64, coc_creative: f64) -> Self {
        match pref {
            FinancingPref::Cash => FinancingScenario::Cash,
            FinancingPref::Creative => FinancingScenario::Creative,
            FinancingPref::Any => {
                if coc_cash >= coc_creative {
                    FinancingScenario::Cash
                } else {
                    FinancingScenario::Creative
                }
            }
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            FinancingScenario::Cash => "cash",
            FinancingScenario::Creative => "creative",
        }
    }
}

/// Unrounded figures for one financing scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScenarioFigures {
    pub max_offer: f64,
    pub total_cash_in: f64,
    pub debt_service_monthly: f64,
    pub cash_flow_monthly: f64,
    pub coc_pct: f64,
    pub dscr: f64,
}

/// Loan sizing behind the creative scenario.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CreativeTerms {
    pub max_payment_monthly: f64,
    pub max_loan: f64,
    pub price_ceiling: f64,
    pub down_payment: f64,
}

pub(crate) fn effective_arv(input: &DealInput) -> f64 {
    match input.arv_estimate {
        Some(arv) if arv > 0.0 => arv,
        _ => input.list_price * super::DEFAULT_ARV_MULTIPLIER,
    }
}

/// Monthly NOI, floored at zero. An explicit taxes-and-insurance figure
/// replaces the generic "other" expense ratio.
pub(crate) fn net_operating_income(input: &DealInput, settings: &Settings) -> f64 {
    let gross = input.monthly_rent;
    let opex = if input.taxes_insurance_monthly > 0.0 {
        input.taxes_insurance_monthly + gross * (settings.variable_expense_pct() / 100.0)
    } else {
        gross * (settings.total_expense_pct() / 100.0)
    };
    (gross - opex).max(0.0)
}

fn cash_on_cash(annual_cash_flow: f64, cash_in: f64) -> f64 {
    if cash_in > 0.0 {
        annual_cash_flow / cash_in * 100.0
    } else {
        0.0
    }
}

pub(crate) fn cash_scenario(
    input: &DealInput,
    arv: f64,
    noi_monthly: f64,
    settings: &Settings,
) -> ScenarioFigures {
    let max_offer = (arv * settings.arv_discount_pct
        - input.repair_estimate
        - input.assignment_fee)
        .max(0.0);
    let total_cash_in = input.list_price + input.repair_estimate + input.assignment_fee;

    ScenarioFigures {
        max_offer,
        total_cash_in,
        debt_service_monthly: 0.0,
        cash_flow_monthly: noi_monthly,
        coc_pct: cash_on_cash(noi_monthly * 12.0, total_cash_in),
        dscr: CASH_DSCR_SENTINEL,
    }
}

/// Present value of `periods` level payments at monthly rate `rate`.
fn loan_capacity(payment: f64, rate: f64, periods: u32) -> f64 {
    if rate > 0.0 {
        payment * (1.0 - (1.0 + rate).powf(-f64::from(periods))) / rate
    } else {
        payment * f64::from(periods)
    }
}

pub(crate) fn creative_terms(arv: f64, noi_monthly: f64, settings: &Settings) -> CreativeTerms {
    let max_annual_debt = if noi_monthly > 0.0 && settings.min_dscr > 0.0 {
        noi_monthly * 12.0 / settings.min_dscr
    } else {
        0.0
    };
    let max_payment_monthly = max_annual_debt / 12.0;

    let rate = settings.max_interest_rate / 100.0 / 12.0;
    let periods = settings.term_years.saturating_mul(12);
    let max_loan = loan_capacity(max_payment_monthly, rate, periods);

    let down_pct = settings.max_down_payment_pct;
    let ceiling_from_loan = if down_pct < 1.0 {
        max_loan / (1.0 - down_pct)
    } else {
        max_loan
    };
    let price_ceiling = ceiling_from_loan.min(arv);

    CreativeTerms {
        max_payment_monthly,
        max_loan,
        price_ceiling,
        down_payment: price_ceiling * down_pct,
    }
}

pub(crate) fn creative_scenario(
    input: &DealInput,
    terms: &CreativeTerms,
    noi_monthly: f64,
) -> ScenarioFigures {
    let total_cash_in = terms.down_payment + input.repair_estimate + input.assignment_fee;
    let debt_service_monthly = terms.max_payment_monthly;
    let cash_flow_monthly = noi_monthly - debt_service_monthly;
    let dscr = if debt_service_monthly > 0.0 {
        (noi_monthly * 12.0) / (debt_service_monthly * 12.0)
    } else {
        0.0
    };

    ScenarioFigures {
        max_offer: (terms.price_ceiling - input.repair_estimate - input.assignment_fee).max(0.0),
        total_cash_in,
        debt_service_monthly,
        cash_flow_monthly,
        coc_pct: cash_on_cash(cash_flow_monthly * 12.0, total_cash_in),
        dscr,
    }
}
