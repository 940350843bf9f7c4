//! Record normalization: turn one raw candidate record into a typed row.
//!
//! Two grammars are tried in order:
//!
//! 1. **Candidate**: `Name, Party ........ 1,234`. The name runs to the
//!    first comma; the party runs from there to the first dot leader or
//!    digit; the vote token is everything from the first digit on.
//! 2. **Ballot category**: a line that starts with one of the configured
//!    pseudo-candidate labels (`Scattering 57`, `Blank Votes ..... 1,002`).
//!    Name and party become the `"None"` sentinel.
//!
//! A record neither grammar accepts, or whose vote token is not a
//! non-negative integer after stripping thousands separators and
//! parentheses, is [`ParsedRecord::Unparseable`]. The caller turns that into
//! a fatal [`ExtractError::UnparseableRecord`].

use crate::config::ExtractionConfig;
use crate::error::ExtractError;
use crate::output::CandidateRecord;
use crate::pipeline::group::DistrictBlock;
use crate::tables::NONE_SENTINEL;
use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

static RE_SUFFIX: Lazy<Regex> = Lazy::new(|| Regex::new(r", ?(Jr|Sr)").unwrap());

static RE_CANDIDATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^([^,]*), ([^.\d]*)\D*(.*)$").unwrap());

/// Outcome of parsing one raw record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRecord {
    Candidate {
        name: String,
        party: String,
        votes: u64,
    },
    BallotCategory {
        label: String,
        votes: u64,
    },
    Unparseable {
        raw: String,
        reason: String,
    },
}

/// The compiled record grammars for one configuration.
#[derive(Debug, Clone)]
pub struct RecordGrammar {
    /// `None` when no ballot categories are configured.
    ballot_category: Option<Regex>,
}

impl RecordGrammar {
    /// Compile the ballot-category grammar from the configured labels.
    pub fn new(config: &ExtractionConfig) -> Result<Self, ExtractError> {
        let alternatives: Vec<String> = config
            .ballot_categories
            .iter()
            .map(|c| regex::escape(c))
            .collect();
        if alternatives.is_empty() {
            return Ok(Self {
                ballot_category: None,
            });
        }
        let pattern = format!(r"^({})\D*(.*)$", alternatives.join("|"));
        let regex = Regex::new(&pattern).map_err(|e| {
            ExtractError::InvalidConfig(format!("ballot categories do not compile: {e}"))
        })?;
        Ok(Self {
            ballot_category: Some(regex),
        })
    }

    /// Parse one raw record.
    pub fn parse(&self, raw: &str) -> ParsedRecord {
        let text = RE_SUFFIX.replace_all(raw.trim(), " $1");

        if let Some(caps) = RE_CANDIDATE.captures(&text) {
            return match parse_votes(&caps[3]) {
                Ok(votes) => ParsedRecord::Candidate {
                    name: or_sentinel(caps[1].trim()),
                    party: or_sentinel(caps[2].replace(',', " ").trim()),
                    votes,
                },
                Err(reason) => unparseable(raw, reason),
            };
        }

        let category = self.ballot_category.as_ref().and_then(|re| re.captures(&text));
        if let Some(caps) = category {
            return match parse_votes(&caps[2]) {
                Ok(votes) => ParsedRecord::BallotCategory {
                    label: caps[1].to_string(),
                    votes,
                },
                Err(reason) => unparseable(raw, reason),
            };
        }

        unparseable(
            raw,
            "matches neither the candidate grammar nor a ballot category".into(),
        )
    }
}

/// Rows produced from one district.
#[derive(Debug, Default)]
pub struct NormalizedDistrict {
    pub records: Vec<CandidateRecord>,
    /// How many of `records` came from the ballot-category grammar.
    pub ballot_category_records: usize,
}

/// Normalize every raw record of a district, failing on the first record
/// that does not parse.
pub fn normalize_district(
    grammar: &RecordGrammar,
    jurisdiction: &str,
    district: &DistrictBlock,
) -> Result<NormalizedDistrict, ExtractError> {
    let label = district.label.to_string();
    let mut out = NormalizedDistrict::default();

    for raw in &district.raw_records {
        let (name, party, votes) = match grammar.parse(raw) {
            ParsedRecord::Candidate { name, party, votes } => (name, party, votes),
            ParsedRecord::BallotCategory { label: category, votes } => {
                debug!("{} {}: ballot category {}", jurisdiction, label, category);
                out.ballot_category_records += 1;
                (NONE_SENTINEL.to_string(), NONE_SENTINEL.to_string(), votes)
            }
            ParsedRecord::Unparseable { raw, reason } => {
                return Err(ExtractError::UnparseableRecord {
                    jurisdiction: jurisdiction.to_string(),
                    district: label,
                    record: raw,
                    reason,
                });
            }
        };
        out.records.push(CandidateRecord {
            state_territory: jurisdiction.to_string(),
            district: label.clone(),
            name,
            party,
            votes,
        });
    }

    Ok(out)
}

fn parse_votes(token: &str) -> Result<u64, String> {
    let cleaned: String = token
        .trim()
        .chars()
        .filter(|c| !matches!(c, ',' | '(' | ')'))
        .collect();
    if cleaned.is_empty() {
        return Err("no vote count".into());
    }
    cleaned
        .parse::<u64>()
        .map_err(|_| format!("vote count {:?} is not a whole number", token.trim()))
}

fn or_sentinel(s: &str) -> String {
    if s.is_empty() {
        NONE_SENTINEL.to_string()
    } else {
        s.to_string()
    }
}

fn unparseable(raw: &str, reason: String) -> ParsedRecord {
    ParsedRecord::Unparseable {
        raw: raw.to_string(),
        reason,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::group::DistrictLabel;

    fn grammar() -> RecordGrammar {
        RecordGrammar::new(&ExtractionConfig::default()).unwrap()
    }

    fn candidate(name: &str, party: &str, votes: u64) -> ParsedRecord {
        ParsedRecord::Candidate {
            name: name.into(),
            party: party.into(),
            votes,
        }
    }

    #[test]
    fn test_plain_candidate() {
        assert_eq!(
            grammar().parse("Smith, Democrat 1,234"),
            candidate("Smith", "Democrat", 1234)
        );
    }

    #[test]
    fn test_dot_leader_candidate() {
        assert_eq!(
            grammar().parse("Smith, Democrat ........ 1,234"),
            candidate("Smith", "Democrat", 1234)
        );
    }

    #[test]
    fn test_parenthesised_count() {
        assert_eq!(
            grammar().parse("Smith, Democrat ..... (1,234)"),
            candidate("Smith", "Democrat", 1234)
        );
    }

    #[test]
    fn test_suffix_comma_rewrite() {
        let g = grammar();
        let expected = candidate("Jones Jr", "Republican", 900);
        assert_eq!(g.parse("Jones, Jr, Republican 900"), expected);
        assert_eq!(g.parse("Jones Jr, Republican 900"), expected);
        assert_eq!(
            g.parse("Hall,Sr, Independent 5"),
            candidate("Hall Sr", "Independent", 5)
        );
    }

    #[test]
    fn test_party_commas_become_spaces() {
        assert_eq!(
            grammar().parse("Doe, Republican, Libertarian ...... 7,001"),
            candidate("Doe", "Republican  Libertarian", 7001)
        );
    }

    #[test]
    fn test_wrapped_party_joined() {
        assert_eq!(
            grammar().parse("Craig, Democratic-Farmer- Labor ........ 205,000"),
            candidate("Craig", "Democratic-Farmer- Labor", 205_000)
        );
    }

    #[test]
    fn test_empty_party_is_sentinel() {
        assert_eq!(
            grammar().parse("Smith, ......... 12"),
            candidate("Smith", "None", 12)
        );
    }

    #[test]
    fn test_ballot_category() {
        assert_eq!(
            grammar().parse("Scattering 57"),
            ParsedRecord::BallotCategory {
                label: "Scattering".into(),
                votes: 57
            }
        );
        assert_eq!(
            grammar().parse("Blank Votes ............ 1,002"),
            ParsedRecord::BallotCategory {
                label: "Blank Votes".into(),
                votes: 1002
            }
        );
    }

    #[test]
    fn test_unknown_line_unparseable() {
        match grammar().parse("Something odd 12") {
            ParsedRecord::Unparseable { raw, .. } => assert_eq!(raw, "Something odd 12"),
            other => panic!("expected unparseable, got {other:?}"),
        }
    }

    #[test]
    fn test_missing_votes_unparseable() {
        assert!(matches!(
            grammar().parse("Smith, Democrat"),
            ParsedRecord::Unparseable { .. }
        ));
        assert!(matches!(
            grammar().parse("Smith, Democrat 12a"),
            ParsedRecord::Unparseable { .. }
        ));
    }

    #[test]
    fn test_custom_categories() {
        let config = ExtractionConfig::builder()
            .ballot_categories(["Spoiled (rejected)"])
            .build()
            .unwrap();
        let g = RecordGrammar::new(&config).unwrap();
        assert!(matches!(
            g.parse("Spoiled (rejected) 4"),
            ParsedRecord::BallotCategory { votes: 4, .. }
        ));
        assert!(matches!(g.parse("Scattering 4"), ParsedRecord::Unparseable { .. }));
    }

    #[test]
    fn test_no_categories_rejects_everything_without_comma() {
        let config = ExtractionConfig::builder()
            .ballot_categories(Vec::<String>::new())
            .build()
            .unwrap();
        let g = RecordGrammar::new(&config).unwrap();
        assert!(matches!(g.parse("Scattering 4"), ParsedRecord::Unparseable { .. }));
        assert_eq!(g.parse("A, B 1"), candidate("A", "B", 1));
    }

    #[test]
    fn test_normalize_district_rows() {
        let district = DistrictBlock {
            label: DistrictLabel::AtLarge,
            raw_records: vec!["Doe, Party 10".into(), "Write-in 3".into()],
        };
        let out = normalize_district(&grammar(), "WYOMING", &district).unwrap();
        assert_eq!(out.ballot_category_records, 1);
        assert_eq!(out.records.len(), 2);
        assert_eq!(out.records[0].district, "AT LARGE");
        assert_eq!(out.records[0].name, "Doe");
        assert_eq!(out.records[1].name, "None");
        assert_eq!(out.records[1].party, "None");
        assert_eq!(out.records[1].votes, 3);
    }

    #[test]
    fn test_countless_line_merges_into_next_candidate() {
        let block = crate::pipeline::segment::JurisdictionBlock {
            name: "OHIO".into(),
            raw_lines: vec!["1. Smith, Dem".into(), "Jones, Rep 100".into()],
            status: crate::pipeline::segment::BlockStatus::Closed,
        };
        let grouping = crate::pipeline::group::group(&block).unwrap();
        let out = normalize_district(&grammar(), "OHIO", &grouping.districts[0]).unwrap();
        assert_eq!(out.records.len(), 1);
        assert_eq!(out.records[0].name, "Smith");
        assert_eq!(out.records[0].party, "Dem Jones  Rep");
        assert_eq!(out.records[0].votes, 100);
    }

    #[test]
    fn test_normalize_district_fails_on_bad_record() {
        let district = DistrictBlock {
            label: DistrictLabel::Numbered("4".into()),
            raw_records: vec!["Doe, Party 10".into(), "garbled".into()],
        };
        let err = normalize_district(&grammar(), "OHIO", &district).unwrap_err();
        match err {
            ExtractError::UnparseableRecord {
                jurisdiction,
                district,
                record,
                ..
            } => {
                assert_eq!(jurisdiction, "OHIO");
                assert_eq!(district, "4");
                assert_eq!(record, "garbled");
            }
            other => panic!("unexpected error: {other}"),
        }
    }
}
