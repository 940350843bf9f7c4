//! Error types for the house-stats2csv library.
//!
//! Two distinct types reflect two distinct failure modes:
//!
//! * [`ExtractError`] is **fatal**: the run cannot produce a trustworthy
//!   table (unreadable input, a candidate record neither grammar accepts, a
//!   line that belongs to no district). Returned as `Err(ExtractError)` from
//!   the top-level `extract*` functions; no partial table is emitted.
//!
//! * [`ExtractWarning`] is **non-fatal**: a structural gap such as a
//!   jurisdiction whose office section was never found. The table is still
//!   correct for everything it contains, but may be incomplete. Warnings are
//!   collected in [`crate::output::ExtractionOutput::warnings`] and logged.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the house-stats2csv library.
#[derive(Debug, Error)]
pub enum ExtractError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Report text file not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file was read but is not UTF-8 text (most likely the PDF itself).
    #[error("'{path}' is not UTF-8 text.\nConvert the PDF to text first; this tool reads the extracted text.")]
    NotText { path: PathBuf },

    /// Any other I/O failure while reading the input.
    #[error("Failed to read '{path}': {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Parse errors ──────────────────────────────────────────────────────
    /// Neither the candidate grammar nor the ballot-category grammar accepts
    /// the record, or its vote count is not a non-negative integer.
    #[error("Cannot parse record {record:?} ({jurisdiction}, district {district}): {reason}")]
    UnparseableRecord {
        jurisdiction: String,
        district: String,
        record: String,
        reason: String,
    },

    /// A data line appeared before any district label in a jurisdiction.
    #[error("Line {line:?} in {jurisdiction} precedes any district label")]
    OrphanRecord { jurisdiction: String, line: String },

    /// Configured jurisdictions absent from the input or lacking an office
    /// section, under strict mode.
    #[error("{} jurisdiction(s) missing from the report: {}", .missing.len(), .missing.join(", "))]
    MissingJurisdictions { missing: Vec<String> },

    // ── Output errors ─────────────────────────────────────────────────────
    /// Could not create or write the output file.
    #[error("Failed to write output file '{path}': {source}")]
    OutputWriteFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The CSV writer failed.
    #[error("CSV output error: {0}")]
    Csv(#[from] csv::Error),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    /// A JSON configuration file could not be read or parsed.
    #[error("Failed to load configuration '{path}': {detail}")]
    ConfigReadFailed { path: PathBuf, detail: String },
}

/// A non-fatal completeness problem.
///
/// Stored in [`crate::output::ExtractionOutput::warnings`] and logged at
/// `warn` level as it is raised.
#[derive(Debug, Clone, PartialEq, Eq, Error, serde::Serialize, serde::Deserialize)]
pub enum ExtractWarning {
    /// A configured jurisdiction name never appears on a line of its own.
    #[error("{jurisdiction}: jurisdiction not found in the report")]
    JurisdictionNotFound { jurisdiction: String },

    /// The jurisdiction was found but no office header followed it.
    #[error("{jurisdiction}: no office header found; no rows emitted")]
    MissingOfficeHeader { jurisdiction: String },

    /// Input ended before the recapitulation banner; the block may be partial.
    #[error("{jurisdiction}: input ended before the recapitulation banner")]
    Unterminated { jurisdiction: String },

    /// The office section held no district blocks.
    #[error("{jurisdiction}: office section contains no districts")]
    NoDistricts { jurisdiction: String },

    /// The same district label opened twice; records were merged.
    #[error("{jurisdiction}: district {district} appears more than once; records merged")]
    DuplicateDistrict {
        jurisdiction: String,
        district: String,
    },

    /// The jurisdiction's section appeared twice; the later one was kept.
    #[error("{jurisdiction}: section appears more than once; the last one is used")]
    DuplicateJurisdiction { jurisdiction: String },
}
