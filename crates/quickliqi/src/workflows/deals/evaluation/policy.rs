use serde::{Deserialize, Serialize};

use super::super::domain::DealInput;
use super::super::settings::Settings;
use super::scenarios::FinancingScenario;

const MAX_NOTE_REASONS: usize = 3;

/// A buyer criterion the selected scenario fails to meet.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "criterion", rename_all = "snake_case")]
pub enum CriteriaShortfall {
    NoRent,
    RehabAboveMax { repair_estimate: f64, max_rehab: f64 },
    CashFlowBelowMin { cash_flow_monthly: f64, min_monthly_cf: f64 },
    CocBelowMin { coc_pct: f64, min_coc_pct: f64 },
    DscrBelowMin { dscr: f64, min_dscr: f64 },
}

impl CriteriaShortfall {
    pub fn summary(&self) -> String {
        match self {
            CriteriaShortfall::NoRent => "No rent data".to_string(),
            CriteriaShortfall::RehabAboveMax { .. } => "Rehab high".to_string(),
            CriteriaShortfall::CashFlowBelowMin { .. } => "CF low".to_string(),
            CriteriaShortfall::CocBelowMin {
                coc_pct,
                min_coc_pct,
            } => format!("CoC {coc_pct:.1}% < {min_coc_pct}%"),
            CriteriaShortfall::DscrBelowMin { dscr, min_dscr } => {
                format!("DSCR {dscr:.2} < {min_dscr}")
            }
        }
    }

    fn is_dscr(&self) -> bool {
        matches!(self, CriteriaShortfall::DscrBelowMin { .. })
    }
}

/// Unrounded figures of the selected scenario.
#[derive(Debug, Clone, Copy)]
pub(crate) struct SelectedFigures {
    pub cash_flow_monthly: f64,
    pub coc_pct: f64,
    pub dscr: f64,
}

/// Every failed criterion, in reporting order.
pub(crate) fn shortfalls(
    input: &DealInput,
    settings: &Settings,
    figures: SelectedFigures,
) -> Vec<CriteriaShortfall> {
    let mut failed = Vec::new();
    if input.monthly_rent <= 0.0 {
        failed.push(CriteriaShortfall::NoRent);
    }
    if input.repair_estimate > settings.max_rehab {
        failed.push(CriteriaShortfall::RehabAboveMax {
            repair_estimate: input.repair_estimate,
            max_rehab: settings.max_rehab,
        });
    }
    if figures.cash_flow_monthly < settings.min_monthly_cf {
        failed.push(CriteriaShortfall::CashFlowBelowMin {
            cash_flow_monthly: figures.cash_flow_monthly,
            min_monthly_cf: settings.min_monthly_cf,
        });
    }
    if figures.coc_pct < settings.min_coc_pct {
        failed.push(CriteriaShortfall::CocBelowMin {
            coc_pct: figures.coc_pct,
            min_coc_pct: settings.min_coc_pct,
        });
    }
    if figures.dscr < settings.min_dscr {
        failed.push(CriteriaShortfall::DscrBelowMin {
            dscr: figures.dscr,
            min_dscr: settings.min_dscr,
        });
    }
    failed
}

/// Human-readable notes. DSCR is left out of cash notes since a cash
/// purchase carries no debt.
pub(crate) fn notes(shortfalls: &[CriteriaShortfall], scenario: FinancingScenario) -> String {
    if shortfalls.is_empty() {
        return "Meets buyer criteria.".to_string();
    }

    let reasons: Vec<String> = shortfalls
        .iter()
        .filter(|shortfall| !(scenario == FinancingScenario::Cash && shortfall.is_dscr()))
        .take(MAX_NOTE_REASONS)
        .map(CriteriaShortfall::summary)
        .collect();

    if reasons.is_empty() {
        "Below criteria.".to_string()
    } else {
        format!("{}.", reasons.join("; "))
    }
}
