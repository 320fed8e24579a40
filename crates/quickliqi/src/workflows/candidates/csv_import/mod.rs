mod mapping;
mod normalizer;
mod parser;

use std::io::Read;
use std::path::Path;

use serde::Serialize;
use tracing::info;

use super::{rank, Candidate, CandidateFilters};

pub use mapping::FieldMapping;

/// Most candidates returned from one spreadsheet.
pub const MAX_IMPORT_RESULTS: usize = 50;

#[derive(Debug, thiserror::Error)]
pub enum CandidateImportError {
    #[error("failed to read candidate CSV: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid candidate CSV data: {0}")]
    Csv(#[from] csv::Error),
}

/// Ranked candidates plus row accounting for the import.
#[derive(Debug, Clone, Serialize)]
pub struct CandidateImport {
    pub candidates: Vec<Candidate>,
    pub rows_read: usize,
    pub rejected: usize,
    pub filtered_out: usize,
}

/// Turns a listing spreadsheet into ranked candidates.
#[derive(Debug, Clone, Default)]
pub struct CandidateCsvImporter {
    mapping: FieldMapping,
    filters: CandidateFilters,
}

impl CandidateCsvImporter {
    pub fn new(mapping: FieldMapping, filters: CandidateFilters) -> Self {
        Self { mapping, filters }
    }

    pub fn import_path<P: AsRef<Path>>(
        &self,
        path: P,
    ) -> Result<CandidateImport, CandidateImportError> {
        let file = std::fs::File::open(path)?;
        self.import_reader(file)
    }

    pub fn import_reader<R: Read>(
        &self,
        reader: R,
    ) -> Result<CandidateImport, CandidateImportError> {
        let parsed = parser::parse_listings(reader, &self.mapping)?;

        let admitted: Vec<Candidate> = parsed
            .listings
            .into_iter()
            .filter(|listing| self.filters.admits(listing))
            .map(Candidate::from_listing)
            .collect();
        let filtered_out = parsed.rows_read - parsed.rejected - admitted.len();
        let candidates = rank(admitted, MAX_IMPORT_RESULTS);

        info!(
            rows = parsed.rows_read,
            rejected = parsed.rejected,
            filtered_out,
            returned = candidates.len(),
            "processed candidate CSV import"
        );

        Ok(CandidateImport {
            candidates,
            rows_read: parsed.rows_read,
            rejected: parsed.rejected,
            filtered_out,
        })
    }
}
