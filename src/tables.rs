//! Default lookup tables for the Clerk's statistics report.
//!
//! Every table here is only a *default*: the pipeline never reads these
//! constants directly. They seed [`crate::config::ExtractionConfig`], which is
//! passed explicitly into each stage, so a caller can swap in the tables for
//! a different report year without touching parser code.

/// Jurisdictions in the order they appear in the report (and the order rows
/// are emitted). Matched against the *trimmed* line with exact equality.
pub const JURISDICTIONS: [&str; 56] = [
    "ALABAMA",
    "ALASKA",
    "ARIZONA",
    "ARKANSAS",
    "CALIFORNIA",
    "COLORADO",
    "CONNECTICUT",
    "DELAWARE",
    "FLORIDA",
    "GEORGIA",
    "HAWAII",
    "IDAHO",
    "ILLINOIS",
    "INDIANA",
    "IOWA",
    "KANSAS",
    "KENTUCKY",
    "LOUISIANA",
    "MAINE",
    "MARYLAND",
    "MASSACHUSETTS",
    "MICHIGAN",
    "MINNESOTA",
    "MISSISSIPPI",
    "MISSOURI",
    "MONTANA",
    "NEBRASKA",
    "NEVADA",
    "NEW HAMPSHIRE",
    "NEW JERSEY",
    "NEW MEXICO",
    "NEW YORK",
    "NORTH CAROLINA",
    "NORTH DAKOTA",
    "OHIO",
    "OKLAHOMA",
    "OREGON",
    "PENNSYLVANIA",
    "RHODE ISLAND",
    "SOUTH CAROLINA",
    "SOUTH DAKOTA",
    "TENNESSEE",
    "TEXAS",
    "UTAH",
    "VERMONT",
    "VIRGINIA",
    "WASHINGTON",
    "WEST VIRGINIA",
    "WISCONSIN",
    "WYOMING",
    "GUAM",
    "VIRGIN ISLANDS",
    "NORTHERN MARIANA ISLANDS",
    "DISTRICT OF COLUMBIA",
    "AMERICAN SAMOA",
    "PUERTO RICO",
];

/// Office-section headers. A line opens the office section when its trimmed
/// text *starts with* one of these; some jurisdictions append qualifiers.
pub const OFFICE_HEADERS: [&str; 3] = [
    "FOR UNITED STATES REPRESENTATIVE",
    "FOR DELEGATE",
    "FOR RESIDENT COMMISSIONER",
];

/// Non-candidate vote buckets recognised by the fallback grammar.
///
/// Order matters: the grammar is an alternation tried left to right, so a
/// longer label must precede any label that is its prefix
/// (`Blank Votes` before `Blanks` before `Blank`, `Common Sense Suffolk`
/// before `Common Sense`).
pub const BALLOT_CATEGORIES: [&str; 19] = [
    "Scattering",
    "Write-in",
    "Under Votes",
    "Over Votes",
    "Blank Votes",
    "Miscellaneous",
    "Blanks",
    "Blank",
    "Void",
    "All Others",
    "Other Write-ins",
    "Continuing Ballots",
    "Exhausted Ballots",
    "Working Families",
    "Independent",
    "Conservative",
    "Common Sense Suffolk",
    "Common Sense",
    "Invalid",
];

/// Party labels grouped under the major party they caucus with.
///
/// `"Republican  Libertarian"` (two spaces) is deliberate: the normalizer
/// turns the report's `Republican, Libertarian` fusion line into that literal
/// label and consumers match it verbatim.
pub const PARTY_AFFILIATES: [(&str, &[&str]); 2] = [
    (
        "Democrat",
        &[
            "Democrat",
            "Democratic-Farmer-Labor",
            "Democratic-Nonpartisan League",
        ],
    ),
    ("Republican", &["Republican", "Republican  Libertarian"]),
];

/// Sentinel used for the name and party of ballot-category rows, and for any
/// name or party that would otherwise be empty.
pub const NONE_SENTINEL: &str = "None";

/// CSV header row, in column order.
pub const CSV_HEADER: [&str; 5] = ["StateTerritory", "District", "Name", "Party", "Vote"];

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn jurisdictions_are_unique() {
        let set: HashSet<&str> = JURISDICTIONS.iter().copied().collect();
        assert_eq!(set.len(), JURISDICTIONS.len());
    }

    #[test]
    fn longer_category_precedes_its_prefix() {
        for (i, earlier) in BALLOT_CATEGORIES.iter().enumerate() {
            for later in &BALLOT_CATEGORIES[i + 1..] {
                assert!(
                    !later.starts_with(earlier) || later == earlier,
                    "'{later}' is shadowed by earlier label '{earlier}'"
                );
            }
        }
    }

    #[test]
    fn office_headers_start_with_for() {
        assert!(OFFICE_HEADERS.iter().all(|h| h.starts_with("FOR ")));
    }
}
