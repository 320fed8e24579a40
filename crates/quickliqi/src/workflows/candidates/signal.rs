use crate::workflows::deals::DealSignal;
use crate::workflows::money::format_dollars;

/// Minimum opportunity score for a green candidate.
pub const GREEN_SCORE_THRESHOLD: u8 = 60;

const ASSUMED_ARV_MULTIPLIER: f64 = 1.3;
const ASSUMED_DISCOUNT: f64 = 0.7;
const ASSUMED_REPAIRS: f64 = 20_000.0;
const ASSUMED_FEE: f64 = 5_000.0;

pub fn candidate_signal(opportunity_score: u8) -> DealSignal {
    if opportunity_score >= GREEN_SCORE_THRESHOLD {
        DealSignal::Green
    } else {
        DealSignal::Red
    }
}

/// Rough cash offer from list price alone. Financing detail is unknown at
/// this stage, so repairs and fee are fixed assumptions.
pub fn candidate_offer(signal: DealSignal, list_price: f64) -> String {
    match signal {
        DealSignal::Green => {
            let arv = list_price * ASSUMED_ARV_MULTIPLIER;
            let mao = arv * ASSUMED_DISCOUNT - ASSUMED_REPAIRS - ASSUMED_FEE;
            let mao = if mao.is_finite() { mao.trunc() as i64 } else { 0 };
            format!(
                "Cash offer ≈ ${} (ARV×70% − repairs − fee).",
                format_dollars(mao)
            )
        }
        DealSignal::Red => "Requires analysis - below criteria thresholds.".to_string(),
    }
}
