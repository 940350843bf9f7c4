//! Streaming extraction API: yield one jurisdiction at a time.
//!
//! Segmentation needs the whole report (a jurisdiction's section can only be
//! attributed once the scan has passed it), so [`extract_iter`] segments
//! eagerly and then defers grouping and normalization to
//! [`JurisdictionStream::next`]. Callers that write rows as they go, or
//! stop after the first few jurisdictions, avoid holding every row at once.
//!
//! Items arrive in canonical (configured) order. The first `Err` ends the
//! stream: a report with one unparseable record yields no further results.

use crate::config::ExtractionConfig;
use crate::error::{ExtractError, ExtractWarning};
use crate::output::{CandidateRecord, JurisdictionSummary};
use crate::pipeline::group;
use crate::pipeline::normalize::{self, RecordGrammar};
use crate::pipeline::segment::{self, BlockStatus, JurisdictionBlock};
use std::collections::VecDeque;
use tracing::{debug, info, warn};

/// Rows and structure for one jurisdiction.
#[derive(Debug, Clone)]
pub struct JurisdictionResult {
    pub summary: JurisdictionSummary,
    /// Rows in district order, then report order.
    pub records: Vec<CandidateRecord>,
    /// How many of `records` are ballot-category rows.
    pub ballot_category_records: usize,
    /// Warnings raised while grouping this jurisdiction.
    pub warnings: Vec<ExtractWarning>,
}

/// Lazy per-jurisdiction iterator returned by [`extract_iter`].
#[derive(Debug)]
pub struct JurisdictionStream<'a> {
    config: &'a ExtractionConfig,
    grammar: RecordGrammar,
    pending: VecDeque<JurisdictionBlock>,
    total: usize,
    index: usize,
    total_records: usize,
    total_lines: usize,
    missing: Vec<String>,
    warnings: Vec<ExtractWarning>,
    finished: bool,
}

impl JurisdictionStream<'_> {
    /// Warnings found before any jurisdiction was grouped: structural gaps
    /// from segmentation and jurisdictions absent from the report.
    pub fn warnings(&self) -> &[ExtractWarning] {
        &self.warnings
    }

    /// Configured jurisdictions not present in the report, canonical order.
    pub fn missing(&self) -> &[String] {
        &self.missing
    }

    /// Number of jurisdictions this stream will yield.
    pub fn total(&self) -> usize {
        self.total
    }

    /// Lines in the input, noise included.
    pub fn total_lines(&self) -> usize {
        self.total_lines
    }

    fn process(&self, block: &JurisdictionBlock) -> Result<JurisdictionResult, ExtractError> {
        let grouping = group::group(block)?;
        let mut warnings = grouping.warnings;

        if grouping.districts.is_empty() && block.status != BlockStatus::MissingHeader {
            let warning = ExtractWarning::NoDistricts {
                jurisdiction: block.name.clone(),
            };
            warn!("{}", warning);
            warnings.push(warning);
        }

        let mut records = Vec::new();
        let mut ballot_category_records = 0;
        for district in &grouping.districts {
            let normalized = normalize::normalize_district(&self.grammar, &block.name, district)?;
            debug!(
                "{} district {}: {} rows",
                block.name,
                district.label,
                normalized.records.len()
            );
            ballot_category_records += normalized.ballot_category_records;
            records.extend(normalized.records);
        }

        Ok(JurisdictionResult {
            summary: JurisdictionSummary {
                name: block.name.clone(),
                status: block.status,
                districts: grouping.districts.len(),
                records: records.len(),
            },
            records,
            ballot_category_records,
            warnings,
        })
    }
}

impl Iterator for JurisdictionStream<'_> {
    type Item = Result<JurisdictionResult, ExtractError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }

        let Some(block) = self.pending.pop_front() else {
            self.finished = true;
            info!(
                "Extraction complete: {} rows from {} jurisdictions",
                self.total_records, self.total
            );
            if let Some(ref cb) = self.config.progress_callback {
                cb.on_extraction_complete(self.total_records);
            }
            return None;
        };

        if let Some(ref cb) = self.config.progress_callback {
            cb.on_jurisdiction_start(&block.name, self.index, self.total);
        }
        self.index += 1;

        match self.process(&block) {
            Ok(result) => {
                self.total_records += result.records.len();
                if let Some(ref cb) = self.config.progress_callback {
                    cb.on_jurisdiction_complete(
                        &block.name,
                        result.summary.districts,
                        result.records.len(),
                    );
                }
                Some(Ok(result))
            }
            Err(e) => {
                self.finished = true;
                Some(Err(e))
            }
        }
    }
}

/// Segment `lines` and return an iterator over per-jurisdiction results.
///
/// # Errors
/// Fails up front when the ballot categories do not compile, or when
/// [`ExtractionConfig::require_all_jurisdictions`] is set and a configured
/// jurisdiction is absent or has no office section. Record-level failures surface as an `Err` item.
///
/// # Example
/// ```rust
/// use house_stats2csv::{extract_iter, ExtractionConfig};
///
/// let report = "GUAM\nFOR DELEGATE\nMoylan, Republican ..... 19,721\nRecapitulation";
/// let lines: Vec<String> = report.lines().map(String::from).collect();
/// let config = ExtractionConfig::default();
///
/// for result in extract_iter(&lines, &config).unwrap() {
///     let result = result.unwrap();
///     assert_eq!(result.summary.name, "GUAM");
///     assert_eq!(result.records[0].district, "DELEGATE");
/// }
/// ```
pub fn extract_iter<'a>(
    lines: &[String],
    config: &'a ExtractionConfig,
) -> Result<JurisdictionStream<'a>, ExtractError> {
    let grammar = RecordGrammar::new(config)?;
    let segmentation = segment::segment(lines, config);
    let missing = segmentation.missing(config);

    if config.require_all_jurisdictions {
        let absent: Vec<String> = config
            .jurisdictions
            .iter()
            .filter(|name| {
                segmentation
                    .blocks
                    .get(*name)
                    .map_or(true, |b| b.status == BlockStatus::MissingHeader)
            })
            .cloned()
            .collect();
        if !absent.is_empty() {
            return Err(ExtractError::MissingJurisdictions { missing: absent });
        }
    }

    let mut warnings = segmentation.warnings.clone();
    for name in &missing {
        let warning = ExtractWarning::JurisdictionNotFound {
            jurisdiction: name.clone(),
        };
        warn!("{}", warning);
        warnings.push(warning);
    }

    let pending: VecDeque<JurisdictionBlock> = segmentation.ordered(config).cloned().collect();
    let total = pending.len();
    info!(
        "Found {} of {} jurisdictions in {} lines",
        total,
        config.jurisdictions.len(),
        lines.len()
    );

    if let Some(ref cb) = config.progress_callback {
        cb.on_extraction_start(total);
    }

    Ok(JurisdictionStream {
        config,
        grammar,
        pending,
        total,
        index: 0,
        total_records: 0,
        total_lines: lines.len(),
        missing,
        warnings,
        finished: false,
    })
}
