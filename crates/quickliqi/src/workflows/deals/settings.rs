use serde::{Deserialize, Serialize};

/// Where rent figures come from. Informational only; evaluation ignores it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RentInputMode {
    #[default]
    Manual,
    Csv,
}

/// Buyer criteria: the thresholds, financing assumptions, and expense ratios
/// every deal is measured against.
///
/// Expense ratios are percent points of gross rent (`5.0` means 5%), while
/// `max_down_payment_pct`, `arv_discount_pct`, and `refi_ltv_pct` are
/// fractions (`0.70` for the 70% rule).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub min_coc_pct: f64,
    pub min_dscr: f64,
    pub min_monthly_cf: f64,
    pub max_rehab: f64,

    pub max_down_payment_pct: f64,
    pub max_interest_rate: f64,
    pub term_years: u32,
    pub arv_discount_pct: f64,
    pub refi_ltv_pct: f64,

    pub vacancy_pct: f64,
    pub mgmt_pct: f64,
    pub maintenance_pct: f64,
    pub other_expense_pct: f64,

    pub rent_input_mode: RentInputMode,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            min_coc_pct: 12.0,
            min_dscr: 1.25,
            min_monthly_cf: 250.0,
            max_rehab: 60_000.0,
            max_down_payment_pct: 0.20,
            max_interest_rate: 8.0,
            term_years: 30,
            arv_discount_pct: 0.70,
            refi_ltv_pct: 0.75,
            vacancy_pct: 5.0,
            mgmt_pct: 8.0,
            maintenance_pct: 5.0,
            other_expense_pct: 17.0,
            rent_input_mode: RentInputMode::Manual,
        }
    }
}

impl Settings {
    /// Vacancy, management, and maintenance: the ratios that still apply when
    /// taxes and insurance are entered as an explicit monthly line item.
    pub fn variable_expense_pct(&self) -> f64 {
        self.vacancy_pct + self.mgmt_pct + self.maintenance_pct
    }

    pub fn total_expense_pct(&self) -> f64 {
        self.variable_expense_pct() + self.other_expense_pct
    }

    /// Numeric fields by name, used for range validation.
    pub(crate) fn numeric_fields(&self) -> [(&'static str, f64); 12] {
        [
            ("min_coc_pct", self.min_coc_pct),
            ("min_dscr", self.min_dscr),
            ("min_monthly_cf", self.min_monthly_cf),
            ("max_rehab", self.max_rehab),
            ("max_down_payment_pct", self.max_down_payment_pct),
            ("max_interest_rate", self.max_interest_rate),
            ("arv_discount_pct", self.arv_discount_pct),
            ("refi_ltv_pct", self.refi_ltv_pct),
            ("vacancy_pct", self.vacancy_pct),
            ("mgmt_pct", self.mgmt_pct),
            ("maintenance_pct", self.maintenance_pct),
            ("other_expense_pct", self.other_expense_pct),
        ]
    }
}

/// Partial settings edit; absent fields keep their current value.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsUpdate {
    pub min_coc_pct: Option<f64>,
    pub min_dscr: Option<f64>,
    pub min_monthly_cf: Option<f64>,
    pub max_rehab: Option<f64>,
    pub max_down_payment_pct: Option<f64>,
    pub max_interest_rate: Option<f64>,
    pub term_years: Option<u32>,
    pub arv_discount_pct: Option<f64>,
    pub refi_ltv_pct: Option<f64>,
    pub vacancy_pct: Option<f64>,
    pub mgmt_pct: Option<f64>,
    pub maintenance_pct: Option<f64>,
    pub other_expense_pct: Option<f64>,
    pub rent_input_mode: Option<RentInputMode>,
}

impl SettingsUpdate {
    pub fn apply(&self, current: &Settings) -> Settings {
        Settings {
            min_coc_pct: self.min_coc_pct.unwrap_or(current.min_coc_pct),
            min_dscr: self.min_dscr.unwrap_or(current.min_dscr),
            min_monthly_cf: self.min_monthly_cf.unwrap_or(current.min_monthly_cf),
            max_rehab: self.max_rehab.unwrap_or(current.max_rehab),
            max_down_payment_pct: self
                .max_down_payment_pct
                .unwrap_or(current.max_down_payment_pct),
            max_interest_rate: self.max_interest_rate.unwrap_or(current.max_interest_rate),
            term_years: self.term_years.unwrap_or(current.term_years),
            arv_discount_pct: self.arv_discount_pct.unwrap_or(current.arv_discount_pct),
            refi_ltv_pct: self.refi_ltv_pct.unwrap_or(current.refi_ltv_pct),
            vacancy_pct: self.vacancy_pct.unwrap_or(current.vacancy_pct),
            mgmt_pct: self.mgmt_pct.unwrap_or(current.mgmt_pct),
            maintenance_pct: self.maintenance_pct.unwrap_or(current.maintenance_pct),
            other_expense_pct: self.other_expense_pct.unwrap_or(current.other_expense_pct),
            rent_input_mode: self.rent_input_mode.unwrap_or(current.rent_input_mode),
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == SettingsUpdate::default()
    }
}
