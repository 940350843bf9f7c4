//! District grouping: split one jurisdiction's lines into per-district
//! record lists.
//!
//! Districts open in one of two ways:
//!
//! - a literal label line (`AT LARGE`, `DELEGATE`, `RESIDENT COMMISSIONER`)
//!   for single-seat jurisdictions, with the candidates on following lines;
//! - a numbered line `7. Smith, Democrat ..... 1,234`, where the district
//!   number and the first candidate share a line.
//!
//! Every other line belongs to the current district. The typeset report
//! sometimes wraps a long candidate entry, leaving the party tail or the
//! vote count on the next line. A line is treated as a continuation when the
//! record being assembled does not end in a vote count yet; otherwise it
//! starts the next record. Fragments are trimmed and joined with one space.
//!
//! This heuristic cannot tell a wrapped entry from a new candidate line that
//! lost its vote count upstream. Such a line is merged into the previous
//! record, and the merged text usually still parses: `Smith, Dem` followed by
//! `Jones, Rep 100` becomes one row named `Smith` with party `Dem Jones  Rep`
//! and 100 votes, with no error or warning.

use crate::error::{ExtractError, ExtractWarning};
use crate::pipeline::segment::JurisdictionBlock;
use once_cell::sync::Lazy;
use regex::Regex;
use std::fmt;
use tracing::{debug, warn};

static RE_NUMBERED: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d+)\. (.*)$").unwrap());

static RE_ENDS_WITH_COUNT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\(?\d[\d,]*\)?$").unwrap());

/// Identifies a district within a jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DistrictLabel {
    /// A numbered district, kept as the digits printed in the report.
    Numbered(String),
    AtLarge,
    Delegate,
    ResidentCommissioner,
}

impl DistrictLabel {
    const LITERALS: [(&'static str, DistrictLabel); 3] = [
        ("AT LARGE", DistrictLabel::AtLarge),
        ("DELEGATE", DistrictLabel::Delegate),
        ("RESIDENT COMMISSIONER", DistrictLabel::ResidentCommissioner),
    ];

    /// Recognise a literal label at the start of a trimmed line.
    pub fn parse_literal(line: &str) -> Option<Self> {
        Self::LITERALS
            .iter()
            .find(|(text, _)| line.starts_with(*text))
            .map(|(_, label)| label.clone())
    }

    /// The label as written in the output table.
    pub fn as_str(&self) -> &str {
        match self {
            DistrictLabel::Numbered(n) => n,
            DistrictLabel::AtLarge => "AT LARGE",
            DistrictLabel::Delegate => "DELEGATE",
            DistrictLabel::ResidentCommissioner => "RESIDENT COMMISSIONER",
        }
    }
}

impl fmt::Display for DistrictLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One district's raw, not yet normalized, candidate records.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DistrictBlock {
    pub label: DistrictLabel,
    pub raw_records: Vec<String>,
}

/// Result of grouping one jurisdiction.
#[derive(Debug, Default)]
pub struct Grouping {
    /// Districts in report order, labels unique.
    pub districts: Vec<DistrictBlock>,
    pub warnings: Vec<ExtractWarning>,
}

/// Line-at-a-time state machine behind [`group`].
///
/// State is `(current district, pending record)`. Every boundary goes
/// through [`DistrictGrouper::flush`], so a record can never span two
/// districts.
#[derive(Debug)]
pub struct DistrictGrouper<'a> {
    jurisdiction: &'a str,
    current: Option<usize>,
    pending: String,
    completed: Vec<DistrictBlock>,
    warnings: Vec<ExtractWarning>,
}

impl<'a> DistrictGrouper<'a> {
    pub fn new(jurisdiction: &'a str) -> Self {
        Self {
            jurisdiction,
            current: None,
            pending: String::new(),
            completed: Vec::new(),
            warnings: Vec::new(),
        }
    }

    /// Feed one trimmed line.
    pub fn push_line(&mut self, line: &str) -> Result<(), ExtractError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        if let Some(label) = DistrictLabel::parse_literal(line) {
            self.open(label);
            return Ok(());
        }

        if let Some(caps) = RE_NUMBERED.captures(line) {
            self.open(DistrictLabel::Numbered(caps[1].to_string()));
            self.pending = caps[2].trim().to_string();
            return Ok(());
        }

        if self.current.is_none() {
            return Err(ExtractError::OrphanRecord {
                jurisdiction: self.jurisdiction.to_string(),
                line: line.to_string(),
            });
        }

        if self.pending.is_empty() {
            self.pending = line.to_string();
        } else if is_complete_record(&self.pending) {
            self.flush();
            self.pending = line.to_string();
        } else {
            debug!("{}: joining continuation {:?}", self.jurisdiction, line);
            self.pending.push(' ');
            self.pending.push_str(line);
        }
        Ok(())
    }

    /// Close the grouping and return the districts.
    pub fn finish(mut self) -> Grouping {
        self.flush();
        Grouping {
            districts: self.completed,
            warnings: self.warnings,
        }
    }

    /// Move the pending record into the current district.
    fn flush(&mut self) {
        if self.pending.is_empty() {
            return;
        }
        let record = std::mem::take(&mut self.pending);
        if let Some(idx) = self.current {
            self.completed[idx].raw_records.push(record);
        }
    }

    /// Flush, then make `label` the current district. A label seen before
    /// reopens the existing district so labels stay unique.
    fn open(&mut self, label: DistrictLabel) {
        self.flush();
        if let Some(idx) = self.completed.iter().position(|d| d.label == label) {
            let warning = ExtractWarning::DuplicateDistrict {
                jurisdiction: self.jurisdiction.to_string(),
                district: label.to_string(),
            };
            warn!("{}", warning);
            self.warnings.push(warning);
            self.current = Some(idx);
        } else {
            self.completed.push(DistrictBlock {
                label,
                raw_records: Vec::new(),
            });
            self.current = Some(self.completed.len() - 1);
        }
    }
}

/// Group a jurisdiction's lines into districts.
pub fn group(block: &JurisdictionBlock) -> Result<Grouping, ExtractError> {
    let mut grouper = DistrictGrouper::new(&block.name);
    for line in &block.raw_lines {
        grouper.push_line(line)?;
    }
    let grouping = grouper.finish();
    debug!(
        "{}: {} districts, {} raw records",
        block.name,
        grouping.districts.len(),
        grouping
            .districts
            .iter()
            .map(|d| d.raw_records.len())
            .sum::<usize>()
    );
    Ok(grouping)
}

/// True when the text already ends in a vote count.
pub fn is_complete_record(text: &str) -> bool {
    RE_ENDS_WITH_COUNT.is_match(text.trim_end())
}
