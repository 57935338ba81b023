use crate::ui::types::choices::UIChoice;
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::path::PathBuf;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

const DEFAULT_SEED: u64 = 42;
fn default_seed() -> u64 {
    DEFAULT_SEED
}

fn default_num_features() -> usize {
    2
}

fn default_minority_fraction() -> f64 {
    0.05
}

fn default_separation() -> f64 {
    2.0
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, Default, PartialEq)]
pub struct ArffParameters {
    #[schemars(
        with = "String",
        title = "ARFF Path",
        description = "Path to .arff file",
        extend(
            "format" = "path",
            "x-file" = true,
            "x-must-exist" = true,
            "x-extensions" = ["arff"]
        )
    )]
    pub path: PathBuf,

    #[serde(default)]
    #[schemars(
        title = "Class Index",
        description = "Zero-based index of the class column (None = last attribute in file)",
        range(min = 0)
    )]
    pub class_index: Option<usize>,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct ImbalancedGaussianParameters {
    #[serde(default = "default_num_features")]
    #[schemars(
        title = "Features",
        description = "Number of numeric features",
        range(min = 1),
        default = "default_num_features"
    )]
    pub num_features: usize,

    #[serde(default = "default_minority_fraction")]
    #[schemars(
        title = "Minority Fraction",
        description = "Probability that an instance belongs to the minority class (0-1, exclusive)",
        range(min = 0.0, max = 1.0),
        default = "default_minority_fraction"
    )]
    pub minority_fraction: f64,

    #[serde(default = "default_separation")]
    #[schemars(
        title = "Separation",
        description = "Distance between the class means on every feature",
        default = "default_separation"
    )]
    pub separation: f64,

    #[serde(default)]
    #[schemars(
        title = "Max Instances",
        description = "Upper bound on instances; empty = infinite"
    )]
    pub max_instances: Option<u64>,

    #[serde(default = "default_seed")]
    #[schemars(title = "Seed", description = "PRNG seed", default = "default_seed")]
    pub seed: u64,
}

impl Default for ImbalancedGaussianParameters {
    fn default() -> Self {
        Self {
            num_features: default_num_features(),
            minority_fraction: default_minority_fraction(),
            separation: default_separation(),
            max_instances: None,
            seed: DEFAULT_SEED,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants, PartialEq)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(StreamKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum StreamChoice {
    #[strum_discriminants(strum(
        message = "Arff File Stream",
        detailed_message = "A stream read from an ARFF file."
    ))]
    ArffFile(ArffParameters),

    #[strum_discriminants(strum(
        message = "Imbalanced Gaussian Generator",
        detailed_message = "Binary stream with a rare class whose features are shifted Gaussians."
    ))]
    ImbalancedGaussian(ImbalancedGaussianParameters),
}

impl UIChoice for StreamChoice {
    type Kind = StreamKind;

    fn schema() -> Schema {
        schema_for!(StreamChoice)
    }

    fn default_params(kind: Self::Kind) -> Value {
        match kind {
            StreamKind::ArffFile => serde_json::to_value(ArffParameters::default()),
            StreamKind::ImbalancedGaussian => {
                serde_json::to_value(ImbalancedGaussianParameters::default())
            }
        }
        .unwrap_or_default()
    }
}
