//! Configuration types for report extraction.
//!
//! All extraction behaviour is controlled through [`ExtractionConfig`], built
//! via its [`ExtractionConfigBuilder`]. The lookup tables the parser depends
//! on (jurisdiction names, office headers, ballot categories) live here
//! rather than in globals, so the pipeline is a pure function of
//! `(input lines, configuration)`.
//!
//! The configuration is `serde`-serialisable: a JSON file containing only
//! the fields to override can be loaded with
//! [`ExtractionConfig::from_json_file`]; missing fields keep their defaults.

use crate::error::ExtractError;
use crate::progress::ProgressCallback;
use crate::tables;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::path::Path;

/// Configuration for one extraction run.
///
/// Built via [`ExtractionConfig::builder()`] or using
/// [`ExtractionConfig::default()`].
///
/// # Example
/// ```rust
/// use house_stats2csv::ExtractionConfig;
///
/// let config = ExtractionConfig::builder()
///     .jurisdictions(["ALASKA", "GUAM"])
///     .require_all_jurisdictions(true)
///     .build()
///     .unwrap();
/// assert_eq!(config.jurisdictions.len(), 2);
/// ```
#[derive(Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Jurisdiction names in canonical output order. Default: the 56 states,
    /// territories and the District of Columbia, upper case.
    ///
    /// A line starts a jurisdiction only when its trimmed text equals one of
    /// these exactly.
    pub jurisdictions: Vec<String>,

    /// Office-section header prefixes. Default: Representative, Delegate and
    /// Resident Commissioner headers.
    pub office_headers: Vec<String>,

    /// Labels accepted by the ballot-category fallback grammar, tried in
    /// order. Default: [`tables::BALLOT_CATEGORIES`].
    pub ballot_categories: Vec<String>,

    /// Major party → party labels that count as that party. Only consulted
    /// by [`ExtractionConfig::major_party`]; the table itself always carries
    /// the literal party label.
    pub party_affiliates: BTreeMap<String, Vec<String>>,

    /// Treat a configured jurisdiction that yields no office section as
    /// fatal: either its name never appears, or no office header follows it
    /// (`MissingHeader`). Default: false (a warning is recorded instead).
    pub require_all_jurisdictions: bool,

    /// Optional per-jurisdiction progress events.
    #[serde(skip)]
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            jurisdictions: to_strings(tables::JURISDICTIONS),
            office_headers: to_strings(tables::OFFICE_HEADERS),
            ballot_categories: to_strings(tables::BALLOT_CATEGORIES),
            party_affiliates: tables::PARTY_AFFILIATES
                .iter()
                .map(|(major, labels)| (major.to_string(), to_strings(labels.iter().copied())))
                .collect(),
            require_all_jurisdictions: false,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for ExtractionConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionConfig")
            .field("jurisdictions", &self.jurisdictions.len())
            .field("office_headers", &self.office_headers)
            .field("ballot_categories", &self.ballot_categories.len())
            .field("party_affiliates", &self.party_affiliates)
            .field("require_all_jurisdictions", &self.require_all_jurisdictions)
            .field(
                "progress_callback",
                &self
                    .progress_callback
                    .as_ref()
                    .map(|_| "<dyn ExtractionProgressCallback>"),
            )
            .finish()
    }
}

impl ExtractionConfig {
    /// Create a new builder for `ExtractionConfig`.
    pub fn builder() -> ExtractionConfigBuilder {
        ExtractionConfigBuilder {
            config: Self::default(),
        }
    }

    /// Load a JSON override file and validate the result.
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ExtractError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| ExtractError::ConfigReadFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;
        let config: Self =
            serde_json::from_str(&text).map_err(|e| ExtractError::ConfigReadFailed {
                path: path.to_path_buf(),
                detail: e.to_string(),
            })?;
        config.validate()?;
        Ok(config)
    }

    /// Resolve a party label to the major party it is affiliated with.
    ///
    /// Returns the label unchanged when no grouping lists it. Extraction never
    /// calls this: rows always carry the party label as printed. It is here for
    /// callers that want to aggregate the finished table by major party.
    ///
    /// ```rust
    /// use house_stats2csv::ExtractionConfig;
    ///
    /// let config = ExtractionConfig::default();
    /// assert_eq!(config.major_party("Democratic-Farmer-Labor"), "Democrat");
    /// assert_eq!(config.major_party("Green"), "Green");
    /// ```
    pub fn major_party<'a>(&'a self, party: &'a str) -> &'a str {
        self.party_affiliates
            .iter()
            .find(|(_, labels)| labels.iter().any(|l| l == party))
            .map(|(major, _)| major.as_str())
            .unwrap_or(party)
    }

    /// Check table invariants the pipeline relies on.
    pub fn validate(&self) -> Result<(), ExtractError> {
        if self.jurisdictions.is_empty() {
            return Err(ExtractError::InvalidConfig(
                "at least one jurisdiction is required".into(),
            ));
        }
        let mut seen = HashSet::new();
        for name in &self.jurisdictions {
            if name.trim().is_empty() {
                return Err(ExtractError::InvalidConfig(
                    "jurisdiction names must not be blank".into(),
                ));
            }
            if name.trim() != name {
                return Err(ExtractError::InvalidConfig(format!(
                    "jurisdiction name {name:?} has surrounding whitespace"
                )));
            }
            if !seen.insert(name.as_str()) {
                return Err(ExtractError::InvalidConfig(format!(
                    "jurisdiction {name:?} is listed twice"
                )));
            }
        }
        if self.office_headers.is_empty() || self.office_headers.iter().any(|h| h.trim().is_empty())
        {
            return Err(ExtractError::InvalidConfig(
                "office headers must be a non-empty list of non-blank prefixes".into(),
            ));
        }
        if self.ballot_categories.iter().any(|c| c.trim().is_empty()) {
            return Err(ExtractError::InvalidConfig(
                "ballot category labels must not be blank".into(),
            ));
        }
        Ok(())
    }
}

/// Builder for [`ExtractionConfig`].
#[derive(Debug)]
pub struct ExtractionConfigBuilder {
    config: ExtractionConfig,
}

impl ExtractionConfigBuilder {
    pub fn jurisdictions<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.jurisdictions = names.into_iter().map(Into::into).collect();
        self
    }

    pub fn office_headers<I, S>(mut self, headers: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.office_headers = headers.into_iter().map(Into::into).collect();
        self
    }

    pub fn ballot_categories<I, S>(mut self, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.ballot_categories = labels.into_iter().map(Into::into).collect();
        self
    }

    /// Add (or replace) one major-party grouping.
    pub fn party_affiliate<I, S>(mut self, major: impl Into<String>, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config
            .party_affiliates
            .insert(major.into(), labels.into_iter().map(Into::into).collect());
        self
    }

    pub fn require_all_jurisdictions(mut self, v: bool) -> Self {
        self.config.require_all_jurisdictions = v;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<ExtractionConfig, ExtractError> {
        self.config.validate()?;
        Ok(self.config)
    }
}

fn to_strings<'a>(items: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    items.into_iter().map(str::to_string).collect()
}
