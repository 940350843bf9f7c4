//! Output types: the candidate table and what it took to produce it.

use crate::error::{ExtractError, ExtractWarning};
use crate::pipeline::segment::BlockStatus;
use crate::tables::CSV_HEADER;
use serde::{Deserialize, Serialize};
use std::io;

/// One row of the output table.
///
/// Field names serialise to the CSV column headers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CandidateRecord {
    #[serde(rename = "StateTerritory")]
    pub state_territory: String,
    /// `"1"`, `"2"`, … or `AT LARGE` / `DELEGATE` / `RESIDENT COMMISSIONER`.
    #[serde(rename = "District")]
    pub district: String,
    /// Candidate name, or `"None"` for a ballot category.
    #[serde(rename = "Name")]
    pub name: String,
    /// Party label as printed, or `"None"`.
    #[serde(rename = "Party")]
    pub party: String,
    #[serde(rename = "Vote")]
    pub votes: u64,
}

/// Per-jurisdiction structure, in canonical order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JurisdictionSummary {
    pub name: String,
    pub status: BlockStatus,
    /// Number of distinct district labels.
    pub districts: usize,
    /// Rows emitted (or, from [`crate::inspect`], raw records grouped).
    pub records: usize,
}

/// Aggregate statistics for one extraction run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionStats {
    /// Lines in the input, noise included.
    pub total_lines: usize,
    pub jurisdictions_found: usize,
    pub jurisdictions_missing: usize,
    pub districts: usize,
    pub records: usize,
    /// Rows that came from the ballot-category grammar.
    pub ballot_category_records: usize,
    /// Sum of every row's votes, saturating at `u64::MAX`.
    pub total_votes: u64,
    pub duration_ms: u64,
}

/// Full result of an extraction.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionOutput {
    /// Rows in canonical order: jurisdictions as configured, then districts
    /// and records in report order.
    pub records: Vec<CandidateRecord>,
    pub jurisdictions: Vec<JurisdictionSummary>,
    /// Completeness problems, in the order they were found.
    pub warnings: Vec<ExtractWarning>,
    pub stats: ExtractionStats,
}

impl ExtractionOutput {
    /// Write the table as CSV, header first.
    ///
    /// The header is written even when there are no rows.
    pub fn write_csv<W: io::Write>(&self, writer: W) -> Result<(), ExtractError> {
        let mut wtr = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(writer);
        wtr.write_record(CSV_HEADER)?;
        for record in &self.records {
            wtr.serialize(record)?;
        }
        wtr.flush().map_err(csv::Error::from)?;
        Ok(())
    }

    /// The CSV table as a string.
    pub fn to_csv_string(&self) -> Result<String, ExtractError> {
        let mut buf = Vec::new();
        self.write_csv(&mut buf)?;
        Ok(String::from_utf8_lossy(&buf).into_owned())
    }
}
