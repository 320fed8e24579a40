//! Pre-deal candidate ingestion from spreadsheets and market scans.
//!
//! Candidates are ranked with the opportunity score and a cheap signal rule;
//! they are not run through the deal evaluator until promoted to a deal.

pub mod csv_import;
pub mod router;
pub mod scan;
mod signal;

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::workflows::deals::{DealSignal, PropertyType};
use crate::workflows::scoring::{opportunity_score, ScoreInput};

pub use csv_import::{CandidateCsvImporter, CandidateImport, CandidateImportError, FieldMapping};
pub use router::candidate_router;
pub use scan::{MarketScanError, MarketScanner, MockMarketScanner, SearchQuery};
pub use signal::{candidate_offer, candidate_signal, GREEN_SCORE_THRESHOLD};

/// Identifier wrapper for ranked candidates.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

static CANDIDATE_SEQUENCE: AtomicU64 = AtomicU64::new(1);

fn next_candidate_id() -> CandidateId {
    let id = CANDIDATE_SEQUENCE.fetch_add(1, Ordering::Relaxed);
    CandidateId(format!("cand-{id:06}"))
}

/// Listing fields as read from a source, before scoring.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct ListingDraft {
    pub address: String,
    pub city: String,
    pub state: String,
    pub list_price: f64,
    pub days_on_market: u32,
    pub property_type: Option<PropertyType>,
    pub beds: u32,
    pub baths: f64,
    pub sqft: Option<f64>,
    pub listing_agent_name: Option<String>,
    pub link: Option<String>,
    pub photo_url: Option<String>,
}

/// Thresholds a listing must clear to become a candidate.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CandidateFilters {
    pub dom_min: u32,
    pub price_max: f64,
    pub beds_min: u32,
}

impl Default for CandidateFilters {
    fn default() -> Self {
        Self {
            dom_min: 100,
            price_max: 1_000_000.0,
            beds_min: 1,
        }
    }
}

impl CandidateFilters {
    pub fn admits(&self, listing: &ListingDraft) -> bool {
        !listing.address.trim().is_empty()
            && listing.days_on_market >= self.dom_min
            && listing.list_price <= self.price_max
            && listing.beds >= self.beds_min
    }
}

/// Scored listing offered for promotion into the deal pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    pub id: CandidateId,
    pub address: String,
    pub city: String,
    pub state: String,
    pub list_price: f64,
    pub days_on_market: u32,
    pub property_type: Option<PropertyType>,
    pub beds: u32,
    pub baths: f64,
    pub sqft: Option<f64>,
    pub listing_agent_name: Option<String>,
    pub link: Option<String>,
    pub photo_url: Option<String>,
    pub opportunity_score: u8,
    pub deal_signal: DealSignal,
    pub offer_suggestion: String,
}

impl Candidate {
    pub fn from_listing(listing: ListingDraft) -> Self {
        let score = opportunity_score(&ScoreInput {
            days_on_market: listing.days_on_market,
            list_price: listing.list_price,
            sqft: listing.sqft,
            property_type: listing.property_type,
        });
        let deal_signal = candidate_signal(score);
        let offer_suggestion = candidate_offer(deal_signal, listing.list_price);

        Self {
            id: next_candidate_id(),
            address: listing.address,
            city: listing.city,
            state: listing.state,
            list_price: listing.list_price,
            days_on_market: listing.days_on_market,
            property_type: listing.property_type,
            beds: listing.beds,
            baths: listing.baths,
            sqft: listing.sqft,
            listing_agent_name: listing.listing_agent_name,
            link: listing.link,
            photo_url: listing.photo_url,
            opportunity_score: score,
            deal_signal,
            offer_suggestion,
        }
    }
}

/// Highest scores first, keeping source order among equal scores.
pub(crate) fn rank(mut candidates: Vec<Candidate>, limit: usize) -> Vec<Candidate> {
    candidates.sort_by(|a, b| b.opportunity_score.cmp(&a.opportunity_score));
    candidates.truncate(limit);
    candidates
}
