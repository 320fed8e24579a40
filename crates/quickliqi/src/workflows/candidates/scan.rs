use std::collections::HashSet;

use tracing::{info, warn};

use super::{rank, Candidate, CandidateFilters, ListingDraft};
use crate::config::MarketScanConfig;
use crate::workflows::deals::PropertyType;

/// Most candidates returned from one market scan.
pub const MAX_SCAN_RESULTS: usize = 20;

/// One search issued against a listing source during a scan.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    pub text: String,
    pub city: String,
    pub state: String,
    /// Position of this query within the scan.
    pub ordinal: usize,
}

impl SearchQuery {
    fn for_market(city: &str, state: &str) -> Vec<SearchQuery> {
        [
            format!("{city} {state} houses for sale"),
            format!("real estate {city} {state} properties"),
            format!("homes for sale {city} {state}"),
        ]
        .into_iter()
        .enumerate()
        .map(|(ordinal, text)| SearchQuery {
            text,
            city: city.to_string(),
            state: state.to_string(),
            ordinal,
        })
        .collect()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MarketScanError {
    #[error("market scan is disabled: SERPAPI_KEY not configured")]
    Disabled,
    #[error("city and state are required to scan a market")]
    MissingMarket,
    #[error("listing source failed: {0}")]
    Source(String),
}

/// Listing search backend. `scan` fans out the standard queries, then
/// dedupes, filters, scores, and ranks what comes back.
pub trait MarketScanner: Send + Sync {
    fn is_enabled(&self) -> bool;

    fn search(&self, query: &SearchQuery) -> Result<Vec<ListingDraft>, MarketScanError>;

    fn scan(
        &self,
        city: &str,
        state: &str,
        filters: &CandidateFilters,
    ) -> Result<Vec<Candidate>, MarketScanError> {
        if !self.is_enabled() {
            return Err(MarketScanError::Disabled);
        }
        let (city, state) = (city.trim(), state.trim());
        if city.is_empty() || state.is_empty() {
            return Err(MarketScanError::MissingMarket);
        }

        let mut found = Vec::new();
        for query in SearchQuery::for_market(city, state) {
            match self.search(&query) {
                Ok(listings) => {
                    info!(query = %query.text, found = listings.len(), "market query complete");
                    found.extend(listings);
                }
                Err(error) => warn!(query = %query.text, %error, "market query failed"),
            }
        }

        let mut seen = HashSet::new();
        let candidates: Vec<Candidate> = found
            .into_iter()
            .filter(|listing| {
                seen.insert(format!(
                    "{}, {}",
                    listing.address.trim().to_lowercase(),
                    listing.city.to_lowercase()
                ))
            })
            .filter(|listing| filters.admits(listing))
            .map(Candidate::from_listing)
            .collect();

        let ranked = rank(candidates, MAX_SCAN_RESULTS);
        info!(city, state, returned = ranked.len(), "market scan complete");
        Ok(ranked)
    }
}

const STATE_PRICE_MULTIPLIERS: &[(&str, f64)] = &[
    ("TX", 0.9),
    ("GA", 0.8),
    ("FL", 1.1),
    ("NC", 0.85),
    ("TN", 0.75),
    ("CA", 2.5),
    ("NY", 2.0),
    ("WA", 1.8),
    ("CO", 1.3),
    ("AZ", 1.0),
];

const STREETS: [&str; 10] = [
    "Oak Street",
    "Pine Avenue",
    "Maple Drive",
    "Cedar Lane",
    "Willow Creek",
    "Sunset Boulevard",
    "River Road",
    "Park Place",
    "Main Street",
    "Elm Drive",
];

const AGENTS: [&str; 10] = [
    "Sarah Johnson",
    "Michael Chen",
    "Jennifer Lopez",
    "David Kim",
    "Amanda Wilson",
    "Carlos Rodriguez",
    "Lisa Martinez",
    "Robert Taylor",
    "Emily Davis",
    "James Brown",
];

const PROPERTY_TYPES: [PropertyType; 3] = [
    PropertyType::Sfr,
    PropertyType::CondoTownhome,
    PropertyType::MultiFamily,
];

const LISTINGS_PER_QUERY: usize = 4;

/// Deterministic synthetic listings, priced for the state's market. Each
/// query shifts the listing window by its ordinal so scans overlap and
/// exercise deduplication.
#[derive(Debug, Clone, Copy, Default)]
pub struct MockMarketScanner {
    enabled: bool,
}

impl MockMarketScanner {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    pub fn from_config(config: &MarketScanConfig) -> Self {
        Self::new(config.enabled())
    }

    fn state_multiplier(state: &str) -> f64 {
        STATE_PRICE_MULTIPLIERS
            .iter()
            .find(|(code, _)| code.eq_ignore_ascii_case(state))
            .map(|(_, multiplier)| *multiplier)
            .unwrap_or(1.0)
    }

    fn listing(query: &SearchQuery, index: usize) -> ListingDraft {
        let step = index as f64;
        let base_price = 150_000.0 + step * 25_000.0;
        let price = (base_price * Self::state_multiplier(&query.state) * (0.8 + step * 0.1)).trunc();

        let beds = 2 + (index % 4) as u32;
        let sqft = 900.0 + step * 200.0 + f64::from(beds) * 150.0;

        ListingDraft {
            address: format!("{} {}", 1200 + index * 100, STREETS[index % STREETS.len()]),
            city: query.city.clone(),
            state: query.state.clone(),
            list_price: price,
            days_on_market: 120 + (index as u32) * 30,
            property_type: Some(PROPERTY_TYPES[index % PROPERTY_TYPES.len()]),
            beds,
            baths: 1.0 + (index % 3) as f64 * 0.5,
            sqft: Some(sqft),
            listing_agent_name: Some(AGENTS[index % AGENTS.len()].to_string()),
            link: Some(format!("https://www.example-realty.com/property-{}", index + 1)),
            photo_url: None,
        }
    }
}

impl MarketScanner for MockMarketScanner {
    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn search(&self, query: &SearchQuery) -> Result<Vec<ListingDraft>, MarketScanError> {
        Ok((query.ordinal..query.ordinal + LISTINGS_PER_QUERY)
            .map(|index| Self::listing(query, index))
            .collect())
    }
}
