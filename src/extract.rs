//! Eager (whole-report) extraction entry points.
//!
//! Every function here drains a [`crate::stream::JurisdictionStream`] and
//! assembles one [`ExtractionOutput`]. The run is all-or-nothing: the first
//! fatal error is returned and no partial table is produced.

use crate::config::ExtractionConfig;
use crate::error::{ExtractError, ExtractWarning};
use crate::output::{ExtractionOutput, ExtractionStats, JurisdictionSummary};
use crate::pipeline::{group, input, segment};
use crate::stream::extract_iter;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Instant;
use tracing::{debug, info};

/// Extract the candidate table from report lines.
///
/// This is the primary entry point for the library; the other `extract*`
/// functions load input and delegate here.
///
/// # Errors
/// - [`ExtractError::UnparseableRecord`] / [`ExtractError::OrphanRecord`]
///   when any record cannot be attributed or parsed
/// - [`ExtractError::MissingJurisdictions`] under
///   [`ExtractionConfig::require_all_jurisdictions`]
///
/// Structural gaps that do not compromise the rows that were emitted are
/// reported in [`ExtractionOutput::warnings`] instead.
pub fn extract_lines(
    lines: &[String],
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let start = Instant::now();
    let stream = extract_iter(lines, config)?;

    let mut warnings: Vec<ExtractWarning> = stream.warnings().to_vec();
    let jurisdictions_missing = stream.missing().len();
    let total_lines = stream.total_lines();

    let mut records = Vec::new();
    let mut jurisdictions = Vec::with_capacity(stream.total());
    let mut districts = 0;
    let mut ballot_category_records = 0;

    for result in stream {
        let result = result?;
        districts += result.summary.districts;
        ballot_category_records += result.ballot_category_records;
        warnings.extend(result.warnings);
        records.extend(result.records);
        jurisdictions.push(result.summary);
    }

    let stats = ExtractionStats {
        total_lines,
        jurisdictions_found: jurisdictions.len(),
        jurisdictions_missing,
        districts,
        records: records.len(),
        ballot_category_records,
        total_votes: records
            .iter()
            .fold(0u64, |acc, r| acc.saturating_add(r.votes)),
        duration_ms: start.elapsed().as_millis() as u64,
    };
    debug!("{:?}", stats);

    Ok(ExtractionOutput {
        records,
        jurisdictions,
        warnings,
        stats,
    })
}

/// Extract from report text already in memory.
pub fn extract_str(text: &str, config: &ExtractionConfig) -> Result<ExtractionOutput, ExtractError> {
    extract_lines(&input::split_lines(text), config)
}

/// Extract from a report text file, or stdin when `input` is `-`.
pub fn extract_file(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let input_str = input_str.as_ref();
    info!("Starting extraction: {}", input_str);
    let lines = input::read_report(input_str)?;
    extract_lines(&lines, config)
}

/// Extract and write the CSV table straight to `output_path`.
///
/// Uses atomic write (temp file in the destination directory + rename) so a
/// failed run never leaves a partial table behind. Nothing is written when
/// extraction fails.
pub fn extract_to_file(
    input_str: impl AsRef<str>,
    output_path: impl AsRef<Path>,
    config: &ExtractionConfig,
) -> Result<ExtractionOutput, ExtractError> {
    let output = extract_file(input_str, config)?;
    let path = output_path.as_ref();
    write_csv_atomic(&output, path)?;
    info!("Wrote {} rows to {}", output.records.len(), path.display());
    Ok(output)
}

/// Write `output` as CSV to `path` through a temp file in the same directory.
pub fn write_csv_atomic(output: &ExtractionOutput, path: &Path) -> Result<(), ExtractError> {
    let write_failed = |source: std::io::Error| ExtractError::OutputWriteFailed {
        path: path.to_path_buf(),
        source,
    };

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };
    std::fs::create_dir_all(dir).map_err(write_failed)?;

    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(write_failed)?;
    output.write_csv(tmp.as_file_mut())?;
    tmp.persist(path).map_err(|e| write_failed(e.error))?;
    Ok(())
}

/// Structure of a report without normalizing any record.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct InspectReport {
    pub total_lines: usize,
    /// Found jurisdictions in canonical order; `records` counts raw records.
    pub jurisdictions: Vec<JurisdictionSummary>,
    /// Configured jurisdictions absent from the report.
    pub missing: Vec<String>,
    pub warnings: Vec<ExtractWarning>,
}

/// Segment and group a report without normalizing it.
///
/// Use this to find which jurisdiction a bad record lives in, or to check a
/// new report year's layout: unlike [`extract_file`] it never fails on a
/// record's contents, only on input errors and orphan lines.
pub fn inspect(
    input_str: impl AsRef<str>,
    config: &ExtractionConfig,
) -> Result<InspectReport, ExtractError> {
    let lines = input::read_report(input_str.as_ref())?;
    let segmentation = segment::segment(&lines, config);

    let mut warnings = segmentation.warnings.clone();
    let mut jurisdictions = Vec::new();
    for block in segmentation.ordered(config) {
        let grouping = group::group(block)?;
        warnings.extend(grouping.warnings);
        jurisdictions.push(JurisdictionSummary {
            name: block.name.clone(),
            status: block.status,
            districts: grouping.districts.len(),
            records: grouping
                .districts
                .iter()
                .map(|d| d.raw_records.len())
                .sum(),
        });
    }

    Ok(InspectReport {
        total_lines: lines.len(),
        jurisdictions,
        missing: segmentation.missing(config),
        warnings,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::segment::BlockStatus;
    use std::io::Write;

    const REPORT: &str = "\
ALASKA
FOR UNITED STATES REPRESENTATIVE
AT LARGE
Young, Republican ....... 142,560
Lindbeck, Democrat ...... 111,019
Recapitulation
GUAM
FOR DELEGATE
Moylan, Republican ..... 19,721
Write-in ....... 30
Recapitulation
";

    fn config() -> ExtractionConfig {
        ExtractionConfig::builder()
            .jurisdictions(["ALASKA", "OHIO", "GUAM"])
            .build()
            .unwrap()
    }

    #[test]
    fn extract_str_builds_table_and_stats() {
        let out = extract_str(REPORT, &config()).unwrap();
        assert_eq!(out.records.len(), 4);
        assert_eq!(out.stats.jurisdictions_found, 2);
        assert_eq!(out.stats.jurisdictions_missing, 1);
        assert_eq!(out.stats.districts, 2);
        assert_eq!(out.stats.ballot_category_records, 1);
        assert_eq!(out.stats.total_votes, 142_560 + 111_019 + 19_721 + 30);
        assert_eq!(out.stats.total_lines, 11);
        assert_eq!(
            out.warnings,
            vec![ExtractWarning::JurisdictionNotFound {
                jurisdiction: "OHIO".into()
            }]
        );
    }

    #[test]
    fn total_votes_saturates_instead_of_overflowing() {
        let text = "OHIO\nFOR UNITED STATES REPRESENTATIVE\n\
                    1. A, Democrat 18446744073709551615\nB, Republican 1\nRecapitulation";
        let out = extract_str(text, &config()).unwrap();
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].votes, u64::MAX);
        assert_eq!(out.stats.total_votes, u64::MAX);
    }

    #[test]
    fn extract_to_file_writes_csv() {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("report.txt");
        std::fs::write(&input_path, REPORT).unwrap();
        let out_path = dir.path().join("nested").join("out.csv");

        let out = extract_to_file(input_path.to_str().unwrap(), &out_path, &config()).unwrap();
        let written = std::fs::read_to_string(&out_path).unwrap();
        assert_eq!(written, out.to_csv_string().unwrap());
        assert!(written.starts_with("StateTerritory,District,Name,Party,Vote\n"));
    }

    #[test]
    fn extract_to_file_leaves_nothing_on_failure() {
        let dir = tempfile::tempdir().unwrap();
        let input_path = dir.path().join("bad.txt");
        std::fs::write(&input_path, "GUAM\nFOR DELEGATE\ngarbage\nRecapitulation\n").unwrap();
        let out_path = dir.path().join("out.csv");

        let err = extract_to_file(input_path.to_str().unwrap(), &out_path, &config()).unwrap_err();
        assert!(matches!(err, ExtractError::UnparseableRecord { .. }));
        assert!(!out_path.exists());
    }

    #[test]
    fn inspect_counts_raw_records() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "{REPORT}IOWA\nFOR UNITED STATES REPRESENTATIVE\n1. bad record\n").unwrap();
        let cfg = ExtractionConfig::builder()
            .jurisdictions(["ALASKA", "GUAM", "IOWA", "OHIO"])
            .build()
            .unwrap();
        let report = inspect(f.path().to_str().unwrap(), &cfg).unwrap();
        let names: Vec<&str> = report.jurisdictions.iter().map(|j| j.name.as_str()).collect();
        assert_eq!(names, vec!["ALASKA", "GUAM", "IOWA"]);
        assert_eq!(report.jurisdictions[0].records, 2);
        assert_eq!(report.jurisdictions[2].status, BlockStatus::Unterminated);
        assert_eq!(report.jurisdictions[2].records, 1);
        assert_eq!(report.missing, vec!["OHIO".to_string()]);
    }
}
