use std::io::Read;

use tracing::warn;

use super::mapping::{ColumnIndex, FieldMapping};
use super::normalizer::{clean_text, parse_amount, parse_count};
use crate::workflows::candidates::ListingDraft;
use crate::workflows::deals::PropertyType;

#[derive(Debug, Default)]
pub(crate) struct ParsedListings {
    pub(crate) listings: Vec<ListingDraft>,
    pub(crate) rows_read: usize,
    pub(crate) rejected: usize,
}

#[derive(Debug, PartialEq, Eq)]
enum RowRejection {
    MissingCity,
    MissingState,
}

impl std::fmt::Display for RowRejection {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RowRejection::MissingCity => write!(f, "city is blank or unmapped"),
            RowRejection::MissingState => write!(f, "state is blank or unmapped"),
        }
    }
}

/// Reads every data row into a listing draft. Unreadable headers fail the
/// whole parse; unreadable or incomplete rows are logged and skipped.
pub(crate) fn parse_listings<R: Read>(
    reader: R,
    mapping: &FieldMapping,
) -> Result<ParsedListings, csv::Error> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);
    let columns = mapping.resolve(csv_reader.headers()?);
    let mut parsed = ParsedListings::default();

    for (index, record) in csv_reader.records().enumerate() {
        parsed.rows_read += 1;
        let line = index + 2;
        let row = match record {
            Ok(row) => row,
            Err(error) => {
                warn!(line, %error, "skipping unreadable CSV row");
                parsed.rejected += 1;
                continue;
            }
        };

        match listing_from_row(&row, &columns) {
            Ok(listing) => parsed.listings.push(listing),
            Err(rejection) => {
                warn!(line, reason = %rejection, "skipping CSV row");
                parsed.rejected += 1;
            }
        }
    }

    Ok(parsed)
}

fn cell<'a>(row: &'a csv::StringRecord, column: Option<usize>) -> Option<&'a str> {
    column.and_then(|position| row.get(position))
}

fn text(row: &csv::StringRecord, column: Option<usize>) -> String {
    cell(row, column).map(clean_text).unwrap_or_default()
}

fn optional_text(row: &csv::StringRecord, column: Option<usize>) -> Option<String> {
    Some(text(row, column)).filter(|value| !value.is_empty())
}

/// Blank or unmapped type columns read as single family; unrecognized labels
/// read as unknown.
fn property_type(row: &csv::StringRecord, column: Option<usize>) -> Option<PropertyType> {
    let label = text(row, column);
    if label.is_empty() {
        Some(PropertyType::Sfr)
    } else {
        PropertyType::from_label(&label)
    }
}

fn listing_from_row(
    row: &csv::StringRecord,
    columns: &ColumnIndex,
) -> Result<ListingDraft, RowRejection> {
    let city = text(row, columns.city);
    if city.is_empty() {
        return Err(RowRejection::MissingCity);
    }
    let state = text(row, columns.state);
    if state.is_empty() {
        return Err(RowRejection::MissingState);
    }

    let amount = |column| cell(row, column).map(parse_amount).unwrap_or(0.0);
    let count = |column| cell(row, column).map(parse_count).unwrap_or(0);
    let sqft = amount(columns.sqft);

    Ok(ListingDraft {
        address: text(row, columns.address),
        city,
        state,
        list_price: amount(columns.list_price),
        days_on_market: count(columns.days_on_market),
        property_type: property_type(row, columns.property_type),
        beds: count(columns.beds),
        baths: amount(columns.baths),
        sqft: Some(sqft).filter(|sqft| *sqft > 0.0),
        listing_agent_name: optional_text(row, columns.listing_agent_name),
        link: optional_text(row, columns.link),
        photo_url: optional_text(row, columns.photo_url),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "Address,City,State,List Price,Days on Market,Property Type,Beds,Baths,Sq Ft,Listing Agent\n";

    #[test]
    fn reads_lenient_numbers_and_optional_fields() {
        let csv = format!(
            "{HEADER}\"1200 Oak Street\",Memphis,TN,\"$112,500\",145.0,Townhouse,3,1.5,\"1,150\",\n"
        );
        let parsed = parse_listings(Cursor::new(csv), &FieldMapping::default()).expect("parse");

        assert_eq!(parsed.rows_read, 1);
        assert_eq!(parsed.rejected, 0);
        let listing = &parsed.listings[0];
        assert_eq!(listing.address, "1200 Oak Street");
        assert_eq!(listing.list_price, 112_500.0);
        assert_eq!(listing.days_on_market, 145);
        assert_eq!(listing.property_type, Some(PropertyType::CondoTownhome));
        assert_eq!(listing.beds, 3);
        assert_eq!(listing.baths, 1.5);
        assert_eq!(listing.sqft, Some(1_150.0));
        assert_eq!(listing.listing_agent_name, None);
    }

    #[test]
    fn rows_without_city_or_state_are_rejected() {
        let csv = format!(
            "{HEADER}1300 Pine Avenue,,TN,90000,120,SFR,3,2,1200,\n1400 Maple Drive,Memphis,,90000,120,SFR,3,2,1200,\n"
        );
        let parsed = parse_listings(Cursor::new(csv), &FieldMapping::default()).expect("parse");

        assert_eq!(parsed.rows_read, 2);
        assert_eq!(parsed.rejected, 2);
        assert!(parsed.listings.is_empty());
    }

    #[test]
    fn short_rows_and_unknown_types_still_parse() {
        let csv = format!("{HEADER}1500 Cedar Lane,Memphis,TN,90000,120,Land\n");
        let parsed = parse_listings(Cursor::new(csv), &FieldMapping::default()).expect("parse");

        let listing = &parsed.listings[0];
        assert_eq!(listing.property_type, None);
        assert_eq!(listing.beds, 0);
        assert_eq!(listing.sqft, None);
    }

    #[test]
    fn unmapped_type_column_defaults_to_single_family() {
        let csv = "Address,City,State\n1600 Willow Creek,Memphis,TN\n";
        let parsed = parse_listings(Cursor::new(csv), &FieldMapping::default()).expect("parse");

        assert_eq!(parsed.listings[0].property_type, Some(PropertyType::Sfr));
    }
}
