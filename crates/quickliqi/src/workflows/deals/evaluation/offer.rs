use super::super::settings::Settings;
use super::scenarios::FinancingScenario;
use crate::workflows::money::{format_dollars, round_currency, whole_percent};

/// Offer text for the selected scenario, built from the rounded metrics.
pub(crate) fn suggestion(
    scenario: FinancingScenario,
    settings: &Settings,
    mao_cash: i64,
    mao_creative: i64,
    debt_service_monthly: i64,
    cash_flow_monthly: i64,
) -> String {
    match scenario {
        FinancingScenario::Cash => format!(
            "Cash offer ≈ ${} (ARV×{}% − repairs − fee).",
            format_dollars(mao_cash),
            whole_percent(settings.arv_discount_pct)
        ),
        FinancingScenario::Creative => format!(
            "Seller-finance price ≤ ${}, ≤ {}% down, rate ≤ {}%, est. P&I ${}, CF ${}/mo.",
            format_dollars(mao_creative),
            round_currency(settings.max_down_payment_pct * 100.0),
            settings.max_interest_rate,
            format_dollars(debt_service_monthly),
            format_dollars(cash_flow_monthly)
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cash_offer_quotes_discount_rule() {
        let text = suggestion(
            FinancingScenario::Cash,
            &Settings::default(),
            66_000,
            0,
            0,
            784,
        );
        assert_eq!(text, "Cash offer ≈ $66,000 (ARV×70% − repairs − fee).");
    }

    #[test]
    fn creative_offer_quotes_terms() {
        let text = suggestion(
            FinancingScenario::Creative,
            &Settings::default(),
            0,
            92_500,
            1_040,
            260,
        );
        assert_eq!(
            text,
            "Seller-finance price ≤ $92,500, ≤ 20% down, rate ≤ 8%, est. P&I $1,040, CF $260/mo."
        );
    }

    #[test]
    fn creative_rate_prints_in_shortest_form() {
        let settings = Settings {
            max_interest_rate: 7.5,
            max_down_payment_pct: 0.10,
            ..Settings::default()
        };
        let text = suggestion(FinancingScenario::Creative, &settings, 0, 120_000, 900, 300);
        assert_eq!(
            text,
            "Seller-finance price ≤ $120,000, ≤ 10% down, rate ≤ 7.5%, est. P&I $900, CF $300/mo."
        );
    }
}
