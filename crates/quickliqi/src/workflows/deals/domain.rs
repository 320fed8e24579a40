use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::evaluation::DerivedMetrics;

/// Identifier wrapper for tracked deals.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct DealId(pub String);

/// Pipeline stage of a deal, in board order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DealStatus {
    #[serde(rename = "New")]
    New,
    #[serde(rename = "Analyzing")]
    Analyzing,
    #[serde(rename = "Offer Sent")]
    OfferSent,
    #[serde(rename = "Offer Accepted")]
    OfferAccepted,
    #[serde(rename = "Buyer Found")]
    BuyerFound,
    #[serde(rename = "Under Contract")]
    UnderContract,
    #[serde(rename = "Closed")]
    Closed,
    #[serde(rename = "Dead")]
    Dead,
}

impl DealStatus {
    pub const ALL: [DealStatus; 8] = [
        DealStatus::New,
        DealStatus::Analyzing,
        DealStatus::OfferSent,
        DealStatus::OfferAccepted,
        DealStatus::BuyerFound,
        DealStatus::UnderContract,
        DealStatus::Closed,
        DealStatus::Dead,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            DealStatus::New => "New",
            DealStatus::Analyzing => "Analyzing",
            DealStatus::OfferSent => "Offer Sent",
            DealStatus::OfferAccepted => "Offer Accepted",
            DealStatus::BuyerFound => "Buyer Found",
            DealStatus::UnderContract => "Under Contract",
            DealStatus::Closed => "Closed",
            DealStatus::Dead => "Dead",
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, DealStatus::Closed | DealStatus::Dead)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum PropertyType {
    #[default]
    #[serde(rename = "SFR")]
    Sfr,
    #[serde(rename = "Condo/Townhome")]
    CondoTownhome,
    #[serde(rename = "Multi-Family")]
    MultiFamily,
}

impl PropertyType {
    pub fn label(&self) -> &'static str {
        match self {
            PropertyType::Sfr => "SFR",
            PropertyType::CondoTownhome => "Condo/Townhome",
            PropertyType::MultiFamily => "Multi-Family",
        }
    }

    /// Loose match for listing feeds and spreadsheets. Returns `None` for
    /// labels that do not describe one of the tracked property types.
    pub fn from_label(raw: &str) -> Option<Self> {
        let label = raw.trim().to_ascii_lowercase();
        if label.is_empty() {
            return None;
        }
        match label.as_str() {
            "sfr" | "single family" | "single-family" | "single family residence" | "house" => {
                return Some(PropertyType::Sfr)
            }
            "condo/townhome" => return Some(PropertyType::CondoTownhome),
            "multi-family" => return Some(PropertyType::MultiFamily),
            _ => {}
        }

        if ["condo", "townhome", "townhouse"]
            .iter()
            .any(|word| label.contains(word))
        {
            Some(PropertyType::CondoTownhome)
        } else if ["duplex", "triplex", "fourplex", "multi"]
            .iter()
            .any(|word| label.contains(word))
        {
            Some(PropertyType::MultiFamily)
        } else {
            None
        }
    }
}

/// Buyer's financing preference for a deal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FinancingPref {
    Cash,
    Creative,
    #[default]
    Any,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DealSignal {
    Green,
    #[default]
    Red,
}

impl DealSignal {
    pub fn label(&self) -> &'static str {
        match self {
            DealSignal::Green => "Green",
            DealSignal::Red => "Red",
        }
    }
}

/// Raw property and deal figures consumed by the evaluator.
///
/// Optional money fields default to zero; a missing or zero `arv_estimate`
/// is replaced by `list_price * 1.3` during evaluation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DealInput {
    pub list_price: f64,
    pub arv_estimate: Option<f64>,
    pub repair_estimate: f64,
    pub monthly_rent: f64,
    pub taxes_insurance_monthly: f64,
    pub assignment_fee: f64,
    pub financing_pref: FinancingPref,
    pub days_on_market: u32,
    pub sqft: Option<f64>,
    pub property_type: PropertyType,
    pub beds: u32,
}

fn default_source() -> String {
    "manual_add".to_string()
}

/// Create payload for a deal, entered manually or promoted from a candidate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealSubmission {
    pub address: String,
    pub city: String,
    pub state: String,
    #[serde(default)]
    pub zip: Option<String>,
    #[serde(default)]
    pub lat: Option<f64>,
    #[serde(default)]
    pub lng: Option<f64>,
    pub list_price: f64,
    #[serde(default)]
    pub original_price: Option<f64>,
    pub days_on_market: u32,
    #[serde(default)]
    pub property_type: PropertyType,
    pub beds: u32,
    pub baths: f64,
    #[serde(default)]
    pub sqft: Option<f64>,
    #[serde(default)]
    pub lot_size_sqft: Option<f64>,
    #[serde(default)]
    pub year_built: Option<u16>,
    #[serde(default)]
    pub link: Option<String>,
    #[serde(default)]
    pub photo_url: Option<String>,
    #[serde(default)]
    pub listing_agent_name: Option<String>,
    #[serde(default)]
    pub listing_agent_phone: Option<String>,
    #[serde(default)]
    pub listing_agent_email: Option<String>,
    #[serde(default)]
    pub brokerage: Option<String>,
    #[serde(default)]
    pub notes: Option<String>,
    #[serde(default)]
    pub arv_estimate: Option<f64>,
    #[serde(default)]
    pub repair_estimate: f64,
    #[serde(default)]
    pub monthly_rent: f64,
    #[serde(default)]
    pub taxes_insurance_monthly: f64,
    #[serde(default)]
    pub assignment_fee: f64,
    #[serde(default)]
    pub financing_pref: FinancingPref,
    #[serde(default = "default_source")]
    pub source: String,
}

/// Stored deal with its most recent evaluation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DealRecord {
    pub id: DealId,
    pub created_at: DateTime<Utc>,
    pub status: DealStatus,
    pub source: String,
    pub address: String,
    pub city: String,
    pub state: String,
    pub zip: Option<String>,
    pub lat: Option<f64>,
    pub lng: Option<f64>,
    pub list_price: f64,
    pub original_price: Option<f64>,
    pub days_on_market: u32,
    pub property_type: PropertyType,
    pub beds: u32,
    pub baths: f64,
    pub sqft: Option<f64>,
    pub lot_size_sqft: Option<f64>,
    pub year_built: Option<u16>,
    pub link: Option<String>,
    pub photo_url: Option<String>,
    pub listing_agent_name: Option<String>,
    pub listing_agent_phone: Option<String>,
    pub listing_agent_email: Option<String>,
    pub brokerage: Option<String>,
    pub notes: Option<String>,
    pub opportunity_score: u8,
    pub arv_estimate: Option<f64>,
    pub repair_estimate: f64,
    pub monthly_rent: f64,
    pub taxes_insurance_monthly: f64,
    pub assignment_fee: f64,
    pub financing_pref: FinancingPref,
    #[serde(flatten)]
    pub metrics: DerivedMetrics,
}

impl DealRecord {
    /// Builds a fresh `New` record; metrics are filled in by the caller.
    pub(crate) fn from_submission(
        id: DealId,
        created_at: DateTime<Utc>,
        submission: DealSubmission,
        opportunity_score: u8,
        metrics: DerivedMetrics,
    ) -> Self {
        Self {
            id,
            created_at,
            status: DealStatus::New,
            source: submission.source,
            address: submission.address,
            city: submission.city,
            state: submission.state,
            zip: submission.zip,
            lat: submission.lat,
            lng: submission.lng,
            list_price: submission.list_price,
            original_price: submission.original_price,
            days_on_market: submission.days_on_market,
            property_type: submission.property_type,
            beds: submission.beds,
            baths: submission.baths,
            sqft: submission.sqft,
            lot_size_sqft: submission.lot_size_sqft,
            year_built: submission.year_built,
            link: submission.link,
            photo_url: submission.photo_url,
            listing_agent_name: submission.listing_agent_name,
            listing_agent_phone: submission.listing_agent_phone,
            listing_agent_email: submission.listing_agent_email,
            brokerage: submission.brokerage,
            notes: submission.notes,
            opportunity_score,
            arv_estimate: submission.arv_estimate,
            repair_estimate: submission.repair_estimate,
            monthly_rent: submission.monthly_rent,
            taxes_insurance_monthly: submission.taxes_insurance_monthly,
            assignment_fee: submission.assignment_fee,
            financing_pref: submission.financing_pref,
            metrics,
        }
    }

    pub fn input(&self) -> DealInput {
        DealInput {
            list_price: self.list_price,
            arv_estimate: self.arv_estimate,
            repair_estimate: self.repair_estimate,
            monthly_rent: self.monthly_rent,
            taxes_insurance_monthly: self.taxes_insurance_monthly,
            assignment_fee: self.assignment_fee,
            financing_pref: self.financing_pref,
            days_on_market: self.days_on_market,
            sqft: self.sqft,
            property_type: self.property_type,
            beds: self.beds,
        }
    }
}

/// Partial edit of a deal. Only the financial fields trigger re-evaluation.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct DealUpdate {
    pub status: Option<DealStatus>,
    pub notes: Option<String>,
    pub arv_estimate: Option<f64>,
    pub repair_estimate: Option<f64>,
    pub monthly_rent: Option<f64>,
    pub taxes_insurance_monthly: Option<f64>,
    pub assignment_fee: Option<f64>,
    pub financing_pref: Option<FinancingPref>,
}

impl DealUpdate {
    pub fn touches_financials(&self) -> bool {
        self.arv_estimate.is_some()
            || self.repair_estimate.is_some()
            || self.monthly_rent.is_some()
            || self.taxes_insurance_monthly.is_some()
            || self.assignment_fee.is_some()
            || self.financing_pref.is_some()
    }

    pub(crate) fn apply_to(self, record: &mut DealRecord) {
        if let Some(status) = self.status {
            record.status = status;
        }
        if let Some(notes) = self.notes {
            record.notes = Some(notes);
        }
        if let Some(arv) = self.arv_estimate {
            record.arv_estimate = Some(arv);
        }
        if let Some(repairs) = self.repair_estimate {
            record.repair_estimate = repairs;
        }
        if let Some(rent) = self.monthly_rent {
            record.monthly_rent = rent;
        }
        if let Some(taxes) = self.taxes_insurance_monthly {
            record.taxes_insurance_monthly = taxes;
        }
        if let Some(fee) = self.assignment_fee {
            record.assignment_fee = fee;
        }
        if let Some(pref) = self.financing_pref {
            record.financing_pref = pref;
        }
    }
}

/// Pipeline move, e.g. a card dragged across the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DealStatusUpdate {
    pub status: DealStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels_match_wire_names() {
        for status in DealStatus::ALL {
            let encoded = serde_json::to_value(status).expect("serialize status");
            assert_eq!(encoded, serde_json::json!(status.label()));
        }
        assert!(DealStatus::Dead.is_terminal());
        assert!(!DealStatus::OfferSent.is_terminal());
    }

    #[test]
    fn property_type_parses_feed_labels() {
        assert_eq!(PropertyType::from_label("SFR"), Some(PropertyType::Sfr));
        assert_eq!(
            PropertyType::from_label("Townhouse"),
            Some(PropertyType::CondoTownhome)
        );
        assert_eq!(
            PropertyType::from_label(" Duplex "),
            Some(PropertyType::MultiFamily)
        );
        assert_eq!(PropertyType::from_label("Land"), None);
        assert_eq!(PropertyType::from_label(""), None);
    }

    #[test]
    fn deal_input_defaults_missing_fields() {
        let input: DealInput =
            serde_json::from_value(serde_json::json!({ "list_price": 90000.0 }))
                .expect("partial input deserializes");
        assert_eq!(input.list_price, 90000.0);
        assert_eq!(input.arv_estimate, None);
        assert_eq!(input.monthly_rent, 0.0);
        assert_eq!(input.financing_pref, FinancingPref::Any);
    }

    #[test]
    fn update_detects_financial_fields() {
        let status_only = DealUpdate {
            status: Some(DealStatus::Analyzing),
            ..DealUpdate::default()
        };
        assert!(!status_only.touches_financials());

        let rent = DealUpdate {
            monthly_rent: Some(1500.0),
            ..DealUpdate::default()
        };
        assert!(rent.touches_financials());
    }
}
