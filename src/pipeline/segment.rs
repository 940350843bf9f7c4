//! Jurisdiction segmentation: cut the report into one line-block per
//! jurisdiction.
//!
//! The report lists every jurisdiction in turn. Each one opens with its name
//! alone on a line, runs through several offices, and reaches the House
//! office section at a `FOR UNITED STATES REPRESENTATIVE` (or `FOR DELEGATE`,
//! `FOR RESIDENT COMMISSIONER`) header. The section ends at the
//! `Recapitulation` banner.
//!
//! ## State machine
//!
//! ```text
//! SeekingJurisdiction ──name──▶ SeekingHeader ──header──▶ InBlock ──Recapitulation──▶ SeekingJurisdiction
//!                                     │                       │
//!                              other name / EOF       other name / EOF
//!                                     ▼                       ▼
//!                               MissingHeader            Unterminated
//! ```
//!
//! A block that runs into another configured jurisdiction name is closed as
//! `Unterminated` and scanning resumes in `SeekingHeader` for that name, so
//! the next jurisdiction's lines never land in the previous block.
//!
//! Page furniture inside a block (continuation banners, bare page numbers,
//! running totals, ranked-choice ballot accounting) is dropped here so the
//! grouper only sees district labels and candidate text.
//!
//! Nothing in this stage is fatal: structural gaps surface as
//! [`ExtractWarning`]s and the affected block is simply short or empty.

use crate::config::ExtractionConfig;
use crate::error::ExtractWarning;
use crate::pipeline::group::DistrictLabel;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use tracing::{debug, warn};

/// Banner that closes a jurisdiction's office section.
pub const RECAPITULATION: &str = "Recapitulation";

static RE_NOISE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"Continued|^\d+$|^Total|Continuing Ballots|Exhausted Ballots").unwrap()
});

/// How a jurisdiction's block ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BlockStatus {
    /// The recapitulation banner closed the block.
    Closed,
    /// No office header was found; the block is empty.
    MissingHeader,
    /// Input ended inside the office section; the block may be partial.
    Unterminated,
}

/// The raw office-section lines of one jurisdiction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JurisdictionBlock {
    pub name: String,
    /// Trimmed, noise-free lines in report order.
    pub raw_lines: Vec<String>,
    pub status: BlockStatus,
}

/// Result of segmenting a whole report.
#[derive(Debug, Default)]
pub struct Segmentation {
    /// Blocks keyed by jurisdiction name.
    pub blocks: HashMap<String, JurisdictionBlock>,
    /// Structural gaps found while scanning.
    pub warnings: Vec<ExtractWarning>,
}

impl Segmentation {
    /// Blocks in the configured (canonical) jurisdiction order.
    pub fn ordered<'a>(
        &'a self,
        config: &'a ExtractionConfig,
    ) -> impl Iterator<Item = &'a JurisdictionBlock> + 'a {
        config
            .jurisdictions
            .iter()
            .filter_map(|name| self.blocks.get(name))
    }

    /// Configured jurisdictions that never appeared, in canonical order.
    pub fn missing(&self, config: &ExtractionConfig) -> Vec<String> {
        config
            .jurisdictions
            .iter()
            .filter(|name| !self.blocks.contains_key(*name))
            .cloned()
            .collect()
    }
}

enum State<'a> {
    SeekingJurisdiction,
    SeekingHeader { name: &'a str },
    InBlock { block: JurisdictionBlock },
}

/// Split the report lines into jurisdiction blocks.
pub fn segment(lines: &[String], config: &ExtractionConfig) -> Segmentation {
    let names: HashSet<&str> = config.jurisdictions.iter().map(String::as_str).collect();
    let mut out = Segmentation::default();
    let mut state = State::SeekingJurisdiction;

    for line in lines {
        let trimmed = line.trim();
        state = match state {
            State::SeekingJurisdiction => match names.get(trimmed) {
                Some(&name) => {
                    debug!("Found jurisdiction {}", name);
                    State::SeekingHeader { name }
                }
                None => State::SeekingJurisdiction,
            },

            State::SeekingHeader { name } => {
                if let Some(header) = match_office_header(trimmed, config) {
                    debug!("{}: office section opens at {:?}", name, trimmed);
                    State::InBlock {
                        block: JurisdictionBlock {
                            name: name.to_string(),
                            raw_lines: seed_lines(trimmed, header),
                            status: BlockStatus::Closed,
                        },
                    }
                } else if let Some(&next) = names.get(trimmed).filter(|&&n| n != name) {
                    insert_block(&mut out, empty_block(name));
                    debug!("Found jurisdiction {}", next);
                    State::SeekingHeader { name: next }
                } else {
                    State::SeekingHeader { name }
                }
            }

            State::InBlock { mut block } => {
                if trimmed.starts_with(RECAPITULATION) {
                    debug!(
                        "{}: section closed with {} lines",
                        block.name,
                        block.raw_lines.len()
                    );
                    insert_block(&mut out, block);
                    State::SeekingJurisdiction
                } else if let Some(&next) = names.get(trimmed).filter(|&&n| n != block.name) {
                    debug!("{}: section ran into {} without a banner", block.name, next);
                    block.status = BlockStatus::Unterminated;
                    insert_block(&mut out, block);
                    State::SeekingHeader { name: next }
                } else {
                    if !is_noise(trimmed) {
                        block.raw_lines.push(trimmed.to_string());
                    }
                    State::InBlock { block }
                }
            }
        };
    }

    match state {
        State::SeekingJurisdiction => {}
        State::SeekingHeader { name } => insert_block(&mut out, empty_block(name)),
        State::InBlock { mut block } => {
            block.status = BlockStatus::Unterminated;
            insert_block(&mut out, block);
        }
    }

    for name in &config.jurisdictions {
        let Some(block) = out.blocks.get(name) else {
            continue;
        };
        let warning = match block.status {
            BlockStatus::Closed => continue,
            BlockStatus::MissingHeader => ExtractWarning::MissingOfficeHeader {
                jurisdiction: name.clone(),
            },
            BlockStatus::Unterminated => ExtractWarning::Unterminated {
                jurisdiction: name.clone(),
            },
        };
        warn!("{}", warning);
        out.warnings.push(warning);
    }

    out
}

/// True for page furniture that never carries candidate data.
pub fn is_noise(trimmed: &str) -> bool {
    RE_NOISE.is_match(trimmed)
}

fn match_office_header<'c>(trimmed: &str, config: &'c ExtractionConfig) -> Option<&'c str> {
    config
        .office_headers
        .iter()
        .map(String::as_str)
        .find(|h| trimmed.starts_with(h))
}

/// Delegate and Resident Commissioner headers double as the district label of
/// a single-seat jurisdiction, so they are seeded into the block.
fn seed_lines(trimmed: &str, header: &str) -> Vec<String> {
    let office = header.strip_prefix("FOR ").unwrap_or(header);
    if DistrictLabel::parse_literal(office).is_some() {
        vec![trimmed.strip_prefix("FOR ").unwrap_or(trimmed).to_string()]
    } else {
        Vec::new()
    }
}

fn empty_block(name: &str) -> JurisdictionBlock {
    JurisdictionBlock {
        name: name.to_string(),
        raw_lines: Vec::new(),
        status: BlockStatus::MissingHeader,
    }
}

/// A real section always beats an empty `MissingHeader` placeholder; two
/// real sections keep the later one.
fn insert_block(out: &mut Segmentation, block: JurisdictionBlock) {
    match out.blocks.get(&block.name).map(|b| b.status) {
        None | Some(BlockStatus::MissingHeader) => {}
        Some(_) if block.status == BlockStatus::MissingHeader => return,
        Some(_) => {
            let warning = ExtractWarning::DuplicateJurisdiction {
                jurisdiction: block.name.clone(),
            };
            warn!("{}", warning);
            out.warnings.push(warning);
        }
    }
    out.blocks.insert(block.name.clone(), block);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lines(text: &str) -> Vec<String> {
        text.lines().map(str::to_string).collect()
    }

    fn config() -> ExtractionConfig {
        ExtractionConfig::default()
    }

    #[test]
    fn test_single_block() {
        let input = lines(
            "ALABAMA\nFOR PRESIDENT\nTrump, Republican 1\nFOR UNITED STATES REPRESENTATIVE\n\
             1. Moore, Republican .... 100\nSmith, Democrat .... 50\nRecapitulation\nnot included",
        );
        let seg = segment(&input, &config());
        let block = &seg.blocks["ALABAMA"];
        assert_eq!(block.status, BlockStatus::Closed);
        assert_eq!(
            block.raw_lines,
            vec!["1. Moore, Republican .... 100", "Smith, Democrat .... 50"]
        );
        assert!(seg.warnings.is_empty());
    }

    #[test]
    fn test_noise_lines_dropped() {
        let input = lines(
            "OHIO\nFOR UNITED STATES REPRESENTATIVE\n1. A, Democrat 10\nContinued\n\
             OHIO—Continued\n217\nTotal ........ 10\nContinuing Ballots 5\n\
             Exhausted Ballots 3\nB, Republican 20\nRecapitulation of votes cast",
        );
        let seg = segment(&input, &config());
        assert_eq!(
            seg.blocks["OHIO"].raw_lines,
            vec!["1. A, Democrat 10", "B, Republican 20"]
        );
    }

    #[test]
    fn test_noise_predicate() {
        assert!(is_noise("Continued"));
        assert!(is_noise("42"));
        assert!(is_noise("Total vote ..... 1,234"));
        assert!(is_noise("Exhausted Ballots ... 12"));
        assert!(!is_noise("1. Smith, Democrat 42"));
        assert!(!is_noise("AT LARGE"));
    }

    #[test]
    fn test_delegate_header_seeds_label() {
        let input = lines("GUAM\nFOR DELEGATE\nMoylan, Republican 100\nRecapitulation");
        let seg = segment(&input, &config());
        assert_eq!(
            seg.blocks["GUAM"].raw_lines,
            vec!["DELEGATE", "Moylan, Republican 100"]
        );
    }

    #[test]
    fn test_resident_commissioner_header_seeds_label() {
        let input = lines("PUERTO RICO\nFOR RESIDENT COMMISSIONER\nX, Y 1\nRecapitulation");
        let seg = segment(&input, &config());
        assert_eq!(seg.blocks["PUERTO RICO"].raw_lines[0], "RESIDENT COMMISSIONER");
    }

    #[test]
    fn test_representative_header_not_seeded() {
        let input = lines(
            "ALASKA\nFOR UNITED STATES REPRESENTATIVE (At Large)\nAT LARGE\nX, Y 1\nRecapitulation",
        );
        let seg = segment(&input, &config());
        assert_eq!(seg.blocks["ALASKA"].raw_lines, vec!["AT LARGE", "X, Y 1"]);
    }

    #[test]
    fn test_name_must_match_exactly() {
        let input = lines("ALABAMA ........ 12\nFOR UNITED STATES REPRESENTATIVE\n1. A, B 1\nRecapitulation");
        let seg = segment(&input, &config());
        assert!(seg.blocks.is_empty());
    }

    #[test]
    fn test_truncated_input_yields_partial_block() {
        let input = lines("IOWA\nFOR UNITED STATES REPRESENTATIVE\n1. A, Democrat 10");
        let seg = segment(&input, &config());
        let block = &seg.blocks["IOWA"];
        assert_eq!(block.status, BlockStatus::Unterminated);
        assert_eq!(block.raw_lines, vec!["1. A, Democrat 10"]);
        assert_eq!(
            seg.warnings,
            vec![ExtractWarning::Unterminated {
                jurisdiction: "IOWA".into()
            }]
        );
    }

    #[test]
    fn test_missing_header_does_not_swallow_next_jurisdiction() {
        let input = lines(
            "IDAHO\nFOR PRESIDENT\nILLINOIS\nFOR UNITED STATES REPRESENTATIVE\n\
             1. A, Democrat 10\nRecapitulation",
        );
        let seg = segment(&input, &config());
        assert_eq!(seg.blocks["IDAHO"].status, BlockStatus::MissingHeader);
        assert!(seg.blocks["IDAHO"].raw_lines.is_empty());
        assert_eq!(seg.blocks["ILLINOIS"].raw_lines, vec!["1. A, Democrat 10"]);
        assert_eq!(
            seg.warnings,
            vec![ExtractWarning::MissingOfficeHeader {
                jurisdiction: "IDAHO".into()
            }]
        );
    }

    #[test]
    fn test_next_jurisdiction_closes_unbannered_section() {
        let input = lines(
            "OHIO\nFOR UNITED STATES REPRESENTATIVE\n1. A, Democrat 10\n\
             GUAM\nFOR DELEGATE\nMoylan, Republican 100\nRecapitulation",
        );
        let seg = segment(&input, &config());
        let ohio = &seg.blocks["OHIO"];
        assert_eq!(ohio.status, BlockStatus::Unterminated);
        assert_eq!(ohio.raw_lines, vec!["1. A, Democrat 10"]);
        let guam = &seg.blocks["GUAM"];
        assert_eq!(guam.status, BlockStatus::Closed);
        assert_eq!(guam.raw_lines, vec!["DELEGATE", "Moylan, Republican 100"]);
        assert_eq!(
            seg.warnings,
            vec![ExtractWarning::Unterminated {
                jurisdiction: "OHIO".into()
            }]
        );
    }

    #[test]
    fn test_own_name_inside_section_is_kept() {
        let input = lines("OHIO\nFOR UNITED STATES REPRESENTATIVE\n1. A, Democrat 10\nOHIO\nRecapitulation");
        let seg = segment(&input, &config());
        assert_eq!(seg.blocks["OHIO"].status, BlockStatus::Closed);
        assert_eq!(seg.blocks["OHIO"].raw_lines, vec!["1. A, Democrat 10", "OHIO"]);
    }

    #[test]
    fn test_missing_header_at_eof() {
        let seg = segment(&lines("MAINE\nFOR PRESIDENT"), &config());
        assert_eq!(seg.blocks["MAINE"].status, BlockStatus::MissingHeader);
    }

    #[test]
    fn test_placeholder_replaced_by_real_section() {
        let input = lines(
            "TEXAS\nUTAH\nFOR UNITED STATES REPRESENTATIVE\n1. U, R 1\nRecapitulation\n\
             TEXAS\nFOR UNITED STATES REPRESENTATIVE\n1. T, R 2\nRecapitulation",
        );
        let seg = segment(&input, &config());
        assert_eq!(seg.blocks["TEXAS"].status, BlockStatus::Closed);
        assert_eq!(seg.blocks["TEXAS"].raw_lines, vec!["1. T, R 2"]);
        assert!(seg.warnings.is_empty(), "got: {:?}", seg.warnings);
    }

    #[test]
    fn test_duplicate_section_keeps_last() {
        let input = lines(
            "OHIO\nFOR UNITED STATES REPRESENTATIVE\n1. A, R 1\nRecapitulation\n\
             OHIO\nFOR UNITED STATES REPRESENTATIVE\n1. B, R 2\nRecapitulation",
        );
        let seg = segment(&input, &config());
        assert_eq!(seg.blocks["OHIO"].raw_lines, vec!["1. B, R 2"]);
        assert_eq!(
            seg.warnings,
            vec![ExtractWarning::DuplicateJurisdiction {
                jurisdiction: "OHIO".into()
            }]
        );
    }

    #[test]
    fn test_ordered_and_missing_follow_config() {
        let input = lines(
            "GUAM\nFOR DELEGATE\nA, R 1\nRecapitulation\n\
             ALASKA\nFOR UNITED STATES REPRESENTATIVE\nAT LARGE\nB, R 2\nRecapitulation",
        );
        let cfg = config();
        let seg = segment(&input, &cfg);
        let order: Vec<&str> = seg.ordered(&cfg).map(|b| b.name.as_str()).collect();
        assert_eq!(order, vec!["ALASKA", "GUAM"]);
        let missing = seg.missing(&cfg);
        assert_eq!(missing.len(), 54);
        assert_eq!(missing[0], "ALABAMA");
    }

    #[test]
    fn test_indented_lines_are_trimmed() {
        let input = lines("  NEVADA  \n  FOR UNITED STATES REPRESENTATIVE\n   1. A, D 5  \n Recapitulation");
        let seg = segment(&input, &config());
        assert_eq!(seg.blocks["NEVADA"].raw_lines, vec!["1. A, D 5"]);
    }
}
