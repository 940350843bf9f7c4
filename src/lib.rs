//! # house-stats2csv
//!
//! Extract per-candidate U.S. House vote counts from the text rendering of
//! the Clerk's biennial *Statistics of the Presidential and Congressional
//! Election* report.
//!
//! ## Why this crate?
//!
//! The report is typeset for print: page numbers, `Continued` banners and
//! running totals sit between data lines, long candidate entries wrap, and
//! single-seat jurisdictions label their district differently. Every
//! downstream statistic depends on attributing each vote count to the right
//! jurisdiction and district, so this crate refuses to guess: a record it
//! cannot parse fails the whole run.
//!
//! ## Pipeline Overview
//!
//! ```text
//! report text
//!  │
//!  ├─ 1. Input      file or stdin → lines (BOM and CR/LF normalised)
//!  ├─ 2. Segment    one block per jurisdiction, page furniture dropped
//!  ├─ 3. Group      one raw-record list per district, wrapped lines rejoined
//!  ├─ 4. Normalize  name / party / votes via candidate or ballot-category grammar
//!  └─ 5. Output     CSV rows StateTerritory,District,Name,Party,Vote + stats
//! ```
//!
//! ## Quick Start
//!
//! ```rust
//! use house_stats2csv::{extract_str, ExtractionConfig};
//!
//! let report = "\
//! ALASKA
//! FOR UNITED STATES REPRESENTATIVE
//! AT LARGE
//! Young, Republican ............ 155,088
//! Lindbeck, Democrat ........... 111,019
//! Write-in ..................... 1,228
//! Recapitulation";
//!
//! let output = extract_str(report, &ExtractionConfig::default()).unwrap();
//! assert_eq!(output.records.len(), 3);
//! assert_eq!(output.records[2].name, "None");
//! print!("{}", output.to_csv_string().unwrap());
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `stats2csv` binary (clap + anyhow + tracing-subscriber + indicatif) |
//!
//! Disable `cli` when using only the library to avoid pulling in CLI-only deps:
//! ```toml
//! house-stats2csv = { version = "0.1", default-features = false }
//! ```

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod stream;
pub mod tables;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{ExtractionConfig, ExtractionConfigBuilder};
pub use error::{ExtractError, ExtractWarning};
pub use extract::{
    extract_file, extract_lines, extract_str, extract_to_file, inspect, write_csv_atomic,
    InspectReport,
};
pub use output::{CandidateRecord, ExtractionOutput, ExtractionStats, JurisdictionSummary};
pub use pipeline::group::DistrictLabel;
pub use pipeline::normalize::ParsedRecord;
pub use pipeline::segment::BlockStatus;
pub use progress::{ExtractionProgressCallback, NoopProgressCallback, ProgressCallback};
pub use stream::{extract_iter, JurisdictionResult, JurisdictionStream};
