use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use super::normalizer::normalize_header;

/// Candidate field to spreadsheet header. A `None` or blank header leaves the
/// field unmapped.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldMapping {
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub list_price: Option<String>,
    pub days_on_market: Option<String>,
    pub property_type: Option<String>,
    pub beds: Option<String>,
    pub baths: Option<String>,
    pub sqft: Option<String>,
    pub listing_agent_name: Option<String>,
    pub link: Option<String>,
    pub photo_url: Option<String>,
}

impl Default for FieldMapping {
    fn default() -> Self {
        let header = |name: &str| Some(name.to_string());
        Self {
            address: header("Address"),
            city: header("City"),
            state: header("State"),
            list_price: header("List Price"),
            days_on_market: header("Days on Market"),
            property_type: header("Property Type"),
            beds: header("Beds"),
            baths: header("Baths"),
            sqft: header("Sq Ft"),
            listing_agent_name: header("Listing Agent"),
            link: header("Link"),
            photo_url: header("Photo URL"),
        }
    }
}

/// Column positions for each mapped field present in the file.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct ColumnIndex {
    pub(crate) address: Option<usize>,
    pub(crate) city: Option<usize>,
    pub(crate) state: Option<usize>,
    pub(crate) list_price: Option<usize>,
    pub(crate) days_on_market: Option<usize>,
    pub(crate) property_type: Option<usize>,
    pub(crate) beds: Option<usize>,
    pub(crate) baths: Option<usize>,
    pub(crate) sqft: Option<usize>,
    pub(crate) listing_agent_name: Option<usize>,
    pub(crate) link: Option<usize>,
    pub(crate) photo_url: Option<usize>,
}

impl FieldMapping {
    pub(crate) fn resolve(&self, headers: &csv::StringRecord) -> ColumnIndex {
        let mut positions: HashMap<String, usize> = HashMap::new();
        for (position, header) in headers.iter().enumerate() {
            positions.entry(normalize_header(header)).or_insert(position);
        }
        let lookup = |header: &Option<String>| {
            header
                .as_deref()
                .map(normalize_header)
                .filter(|header| !header.is_empty())
                .and_then(|header| positions.get(&header).copied())
        };

        ColumnIndex {
            address: lookup(&self.address),
            city: lookup(&self.city),
            state: lookup(&self.state),
            list_price: lookup(&self.list_price),
            days_on_market: lookup(&self.days_on_market),
            property_type: lookup(&self.property_type),
            beds: lookup(&self.beds),
            baths: lookup(&self.baths),
            sqft: lookup(&self.sqft),
            listing_agent_name: lookup(&self.listing_agent_name),
            link: lookup(&self.link),
            photo_url: lookup(&self.photo_url),
        }
    }
}
