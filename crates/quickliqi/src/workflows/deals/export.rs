use super::domain::DealRecord;

pub const EXPORT_HEADERS: [&str; 20] = [
    "Address",
    "City",
    "State",
    "Price",
    "DOM",
    "Status",
    "Signal",
    "Score",
    "Beds",
    "Baths",
    "SqFt",
    "Type",
    "Agent",
    "ARV",
    "Repairs",
    "Rent",
    "Cash Flow",
    "CoC %",
    "DSCR",
    "Notes",
];

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("failed to write CSV: {0}")]
    Csv(#[from] csv::Error),
    #[error("failed to flush CSV buffer: {0}")]
    Io(#[from] std::io::Error),
    #[error("exported CSV was not valid UTF-8")]
    Encoding(#[from] std::string::FromUtf8Error),
}

fn optional<T: ToString>(value: Option<T>) -> String {
    value.map(|value| value.to_string()).unwrap_or_default()
}

fn row(record: &DealRecord) -> [String; 20] {
    [
        record.address.clone(),
        record.city.clone(),
        record.state.clone(),
        record.list_price.to_string(),
        record.days_on_market.to_string(),
        record.status.label().to_string(),
        record.metrics.deal_signal.label().to_string(),
        record.opportunity_score.to_string(),
        record.beds.to_string(),
        record.baths.to_string(),
        optional(record.sqft),
        record.property_type.label().to_string(),
        optional(record.listing_agent_name.as_deref()),
        optional(record.arv_estimate),
        record.repair_estimate.to_string(),
        record.monthly_rent.to_string(),
        record.metrics.cash_flow_monthly.to_string(),
        record.metrics.coc_pct.to_string(),
        record.metrics.dscr.to_string(),
        optional(record.notes.as_deref()),
    ]
}

/// Renders deals as CSV in the order given.
pub fn deals_to_csv(records: &[DealRecord]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADERS)?;
    for record in records {
        writer.write_record(row(record))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|error| ExportError::Io(error.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}
