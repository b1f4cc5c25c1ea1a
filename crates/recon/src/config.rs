use std::collections::HashSet;

use serde::Deserialize;

use crate::error::ReconError;
use crate::normalize::{LegalSuffixes, NormalizeOptions};
use crate::pipeline::{validate_cutoff, MatchOptions, DEFAULT_CUTOFF};
use crate::scorer::{EditMetric, TokenSortRatio};

// ---------------------------------------------------------------------------
// Top-level config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct MatchConfig {
    #[serde(default = "default_name")]
    pub name: String,
    /// Minimum accepted score. Kept signed so out-of-range input is reported
    /// as an invalid cutoff rather than a type error.
    #[serde(default = "default_cutoff")]
    pub cutoff: i64,
    pub left: SourceConfig,
    pub right: SourceConfig,
    #[serde(default)]
    pub scorer: ScorerConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
    #[serde(default)]
    pub output: OutputConfig,
}

fn default_name() -> String {
    "fuzzy match".into()
}

fn default_cutoff() -> i64 {
    DEFAULT_CUTOFF
}

// ---------------------------------------------------------------------------
// Sources
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// CSV path, relative to the config file.
    #[serde(default)]
    pub file: String,
    #[serde(default = "default_name_column")]
    pub name_column: String,
    /// Columns carried into the output. `None` = every non-name column.
    #[serde(default)]
    pub passthrough: Option<Vec<String>>,
}

pub fn default_name_column() -> String {
    "company_name".into()
}

impl SourceConfig {
    pub fn new(file: impl Into<String>, name_column: impl Into<String>) -> Self {
        Self {
            file: file.into(),
            name_column: name_column.into(),
            passthrough: None,
        }
    }
}

// ---------------------------------------------------------------------------
// Scorer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct ScorerConfig {
    pub metric: EditMetric,
    pub strip_punctuation: bool,
    pub legal_suffixes: LegalSuffixes,
}

impl Default for ScorerConfig {
    fn default() -> Self {
        let normalize = NormalizeOptions::default();
        Self {
            metric: EditMetric::default(),
            strip_punctuation: normalize.strip_punctuation,
            legal_suffixes: normalize.legal_suffixes,
        }
    }
}

impl ScorerConfig {
    pub fn build(&self) -> TokenSortRatio {
        TokenSortRatio::new(
            self.metric,
            NormalizeOptions {
                strip_punctuation: self.strip_punctuation,
                legal_suffixes: self.legal_suffixes,
            },
        )
    }
}

// ---------------------------------------------------------------------------
// Matching
// ---------------------------------------------------------------------------

/// How right-side records may be shared between left records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Assignment {
    /// Every left record takes its best right record; several left records
    /// may claim the same one.
    #[default]
    ManyToOne,
    /// Greedy one-to-one in left input order: each left record takes its
    /// best right record not already claimed.
    Exclusive,
}

impl std::fmt::Display for Assignment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ManyToOne => write!(f, "many_to_one"),
            Self::Exclusive => write!(f, "exclusive"),
        }
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
#[serde(default)]
pub struct MatchingConfig {
    pub assignment: Assignment,
    pub parallel: bool,
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            assignment: Assignment::ManyToOne,
            parallel: true,
        }
    }
}

// ---------------------------------------------------------------------------
// Output
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OutputOrder {
    /// Highest score first; equal scores keep left input order.
    #[default]
    ScoreDesc,
    /// Left input order.
    Input,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub csv: Option<String>,
    #[serde(default)]
    pub json: Option<String>,
    #[serde(default)]
    pub order: OutputOrder,
}

// ---------------------------------------------------------------------------
// Parse + Validate
// ---------------------------------------------------------------------------

impl MatchConfig {
    /// Config for two sources with every other setting at its default.
    pub fn new(left: SourceConfig, right: SourceConfig) -> Self {
        Self {
            name: default_name(),
            cutoff: DEFAULT_CUTOFF,
            left,
            right,
            scorer: ScorerConfig::default(),
            matching: MatchingConfig::default(),
            output: OutputConfig::default(),
        }
    }

    pub fn from_toml(input: &str) -> Result<Self, ReconError> {
        let config: MatchConfig =
            toml::from_str(input).map_err(|e| ReconError::ConfigParse(e.to_string()))?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ReconError> {
        validate_cutoff(self.cutoff)?;

        for (label, source) in [("left", &self.left), ("right", &self.right)] {
            if source.file.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "{label}: file must not be empty"
                )));
            }
            if source.name_column.trim().is_empty() {
                return Err(ReconError::ConfigValidation(format!(
                    "{label}: name_column must not be empty"
                )));
            }
            if let Some(ref columns) = source.passthrough {
                let mut seen = HashSet::new();
                for column in columns {
                    if column.trim().is_empty() {
                        return Err(ReconError::ConfigValidation(format!(
                            "{label}: passthrough column names must not be empty"
                        )));
                    }
                    if !seen.insert(column.as_str()) {
                        return Err(ReconError::ConfigValidation(format!(
                            "{label}: passthrough column '{column}' listed twice"
                        )));
                    }
                }
            }
        }

        Ok(())
    }

    pub fn match_options(&self) -> MatchOptions {
        MatchOptions {
            cutoff: self.cutoff,
            assignment: self.matching.assignment,
            parallel: self.matching.parallel,
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
