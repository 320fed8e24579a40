//! Deal evaluation engine.
//!
//! Turns raw deal figures plus the current buyer criteria into the derived
//! investment metrics stored on every deal. Evaluation is pure and never
//! fails: degenerate inputs fall back to zero or the documented sentinels.

mod offer;
mod policy;
mod scenarios;

use serde::{Deserialize, Serialize};

use super::domain::{DealInput, DealSignal};
use super::settings::Settings;
use crate::workflows::money::{round_currency, round_to};

pub use policy::CriteriaShortfall;
pub use scenarios::{CreativeTerms, FinancingScenario, ScenarioFigures, CASH_DSCR_SENTINEL};

/// ARV assumed when none is supplied, as a multiple of list price.
pub const DEFAULT_ARV_MULTIPLIER: f64 = 1.3;

/// Rounded metrics persisted with a deal.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct DerivedMetrics {
    pub mao_cash: i64,
    pub mao_creative: i64,
    pub noi_monthly: i64,
    pub debt_service_monthly: i64,
    pub cash_flow_monthly: i64,
    pub coc_pct: f64,
    pub dscr: f64,
    pub deal_signal: DealSignal,
    pub deal_notes: String,
    pub offer_suggestion: String,
}

/// Full evaluation, including both scenarios before selection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealEvaluation {
    pub arv: f64,
    pub scenario: FinancingScenario,
    pub cash: ScenarioFigures,
    pub creative: ScenarioFigures,
    pub creative_terms: CreativeTerms,
    pub shortfalls: Vec<CriteriaShortfall>,
    pub metrics: DerivedMetrics,
}

pub fn evaluate(input: &DealInput, settings: &Settings) -> DerivedMetrics {
    evaluate_detailed(input, settings).metrics
}

pub fn evaluate_detailed(input: &DealInput, settings: &Settings) -> DealEvaluation {
    let arv = scenarios::effective_arv(input);
    let noi_monthly = scenarios::net_operating_income(input, settings);

    let cash = scenarios::cash_scenario(input, arv, noi_monthly, settings);
    let creative_terms = scenarios::creative_terms(arv, noi_monthly, settings);
    let creative = scenarios::creative_scenario(input, &creative_terms, noi_monthly);

    let scenario = FinancingScenario::select(input.financing_pref, cash.coc_pct, creative.coc_pct);
    let selected = match scenario {
        FinancingScenario::Cash => &cash,
        FinancingScenario::Creative => &creative,
    };

    let shortfalls = policy::shortfalls(
        input,
        settings,
        policy::SelectedFigures {
            cash_flow_monthly: selected.cash_flow_monthly,
            coc_pct: selected.coc_pct,
            dscr: selected.dscr,
        },
    );
    let deal_signal = if shortfalls.is_empty() {
        DealSignal::Green
    } else {
        DealSignal::Red
    };

    let mao_cash = round_currency(cash.max_offer);
    let mao_creative = round_currency(creative.max_offer);
    let debt_service_monthly = round_currency(selected.debt_service_monthly);
    let cash_flow_monthly = round_currency(selected.cash_flow_monthly);

    let metrics = DerivedMetrics {
        mao_cash,
        mao_creative,
        noi_monthly: round_currency(noi_monthly),
        debt_service_monthly,
        cash_flow_monthly,
        coc_pct: round_to(selected.coc_pct, 1),
        dscr: round_to(selected.dscr, 2),
        deal_signal,
        deal_notes: policy::notes(&shortfalls, scenario),
        offer_suggestion: offer::suggestion(
            scenario,
            settings,
            mao_cash,
            mao_creative,
            debt_service_monthly,
            cash_flow_monthly,
        ),
    };

    DealEvaluation {
        arv,
        scenario,
        cash,
        creative,
        creative_terms,
        shortfalls,
        metrics,
    }
}
