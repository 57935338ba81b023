use crate::classifiers::attribute_class_observers::DEFAULT_NUM_BINS;
use crate::classifiers::hoeffding_tree::split_criteria::DEFAULT_MIN_BRANCH_FRACTION;
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};
use thiserror::Error;

fn default_grace_period() -> usize {
    200
}

fn default_split_confidence() -> f64 {
    1e-7
}

fn default_tie_threshold() -> f64 {
    0.05
}

fn default_binary_splits() -> bool {
    true
}

fn default_num_bins() -> usize {
    DEFAULT_NUM_BINS
}

fn default_min_branch_fraction() -> f64 {
    DEFAULT_MIN_BRANCH_FRACTION
}

/// Which observer a fresh leaf attaches to each numeric feature.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Serialize,
    Deserialize,
    JsonSchema,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
pub enum NumericObserverKind {
    #[default]
    GaussianHellinger,
    /// Collects nothing; leaves using it never split.
    Null,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, JsonSchema)]
#[serde(deny_unknown_fields)]
pub struct TreeConfig {
    #[serde(default = "default_grace_period")]
    #[schemars(
        title = "Grace Period",
        description = "Weight a leaf must see between split attempts",
        range(min = 1),
        default = "default_grace_period"
    )]
    pub grace_period: usize,

    #[serde(default = "default_split_confidence")]
    #[schemars(
        title = "Split Confidence",
        description = "Allowed error in a split decision (delta of the Hoeffding bound)",
        range(min = 0.0, max = 1.0),
        default = "default_split_confidence"
    )]
    pub split_confidence: f64,

    #[serde(default = "default_tie_threshold")]
    #[schemars(
        title = "Tie Threshold",
        description = "Bound below which a tie between the best splits is broken",
        range(min = 0.0),
        default = "default_tie_threshold"
    )]
    pub tie_threshold: f64,

    #[serde(default = "default_binary_splits")]
    #[schemars(
        title = "Binary Splits",
        description = "Only binary splits are supported",
        default = "default_binary_splits"
    )]
    pub binary_splits: bool,

    #[serde(default = "default_num_bins")]
    #[schemars(
        title = "Bins",
        description = "Candidate split points evaluated per feature",
        range(min = 1),
        default = "default_num_bins"
    )]
    pub num_bins: usize,

    #[serde(default = "default_min_branch_fraction")]
    #[schemars(
        title = "Minimum Branch Fraction",
        description = "Share of weight each branch needs for a split to be considered",
        range(min = 0.0, max = 1.0),
        default = "default_min_branch_fraction"
    )]
    pub min_branch_fraction: f64,

    #[serde(default)]
    #[schemars(title = "Numeric Observer", description = "Statistics kept per feature")]
    pub numeric_observer: NumericObserverKind,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self {
            grace_period: default_grace_period(),
            split_confidence: default_split_confidence(),
            tie_threshold: default_tie_threshold(),
            binary_splits: default_binary_splits(),
            num_bins: default_num_bins(),
            min_branch_fraction: default_min_branch_fraction(),
            numeric_observer: NumericObserverKind::default(),
        }
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum ConfigError {
    #[error("grace period must be at least 1")]
    GracePeriod,
    #[error("split confidence must lie in (0, 1), got {0}")]
    SplitConfidence(f64),
    #[error("tie threshold must be a finite non-negative number, got {0}")]
    TieThreshold(f64),
    #[error("multiway splits are not supported; binary_splits must be true")]
    MultiwaySplits,
    #[error("number of bins must be at least 1")]
    NumBins,
    #[error("minimum branch fraction must lie in [0, 1), got {0}")]
    MinBranchFraction(f64),
}

impl TreeConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.grace_period == 0 {
            return Err(ConfigError::GracePeriod);
        }
        if !(self.split_confidence > 0.0 && self.split_confidence < 1.0) {
            return Err(ConfigError::SplitConfidence(self.split_confidence));
        }
        if !self.tie_threshold.is_finite() || self.tie_threshold < 0.0 {
            return Err(ConfigError::TieThreshold(self.tie_threshold));
        }
        if !self.binary_splits {
            return Err(ConfigError::MultiwaySplits);
        }
        if self.num_bins == 0 {
            return Err(ConfigError::NumBins);
        }
        if !(0.0..1.0).contains(&self.min_branch_fraction) {
            return Err(ConfigError::MinBranchFraction(self.min_branch_fraction));
        }
        Ok(())
    }
}
