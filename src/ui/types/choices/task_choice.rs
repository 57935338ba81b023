use crate::classifiers::TreeConfig;
use crate::evaluation::CurveFormat;
use crate::ui::types::choices::{ArffParameters, StreamChoice, UIChoice};
use clap::ValueEnum;
use schemars::{JsonSchema, Schema, schema_for};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use std::path::PathBuf;
use strum_macros::{Display, EnumDiscriminants, EnumIter, EnumMessage, EnumString, IntoStaticStr};

fn default_frequency() -> u64 {
    100_000
}

fn default_train_on_test() -> bool {
    true
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, JsonSchema, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum DumpFormat {
    #[default]
    Csv,
    Tsv,
    Json,
}

impl From<DumpFormat> for CurveFormat {
    fn from(value: DumpFormat) -> Self {
        match value {
            DumpFormat::Csv => CurveFormat::Csv,
            DumpFormat::Tsv => CurveFormat::Tsv,
            DumpFormat::Json => CurveFormat::Json,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct PrequentialParams {
    #[serde(default)]
    #[schemars(title = "Tree", description = "Tree configuration")]
    pub tree: TreeConfig,

    #[schemars(skip)]
    pub stream: StreamChoice,

    #[serde(default)]
    #[schemars(
        title = "Max Instances",
        description = "Stop after this many instances (None = unlimited)"
    )]
    pub max_instances: Option<u64>,

    #[serde(default)]
    #[schemars(
        title = "Max Seconds",
        description = "Stop after this many CPU seconds (None = unlimited)"
    )]
    pub max_seconds: Option<u64>,

    #[serde(default = "default_frequency")]
    #[schemars(
        title = "Sample Frequency",
        description = "Emit metrics every N instances",
        range(min = 1),
        default = "default_frequency"
    )]
    pub sample_frequency: u64,

    #[serde(default = "default_frequency")]
    #[schemars(
        title = "Memory Check Frequency",
        description = "Check memory every N instances",
        range(min = 1),
        default = "default_frequency"
    )]
    pub mem_check_frequency: u64,

    #[serde(default)]
    #[schemars(
        with = "Option<String>",
        title = "Dump file",
        description = "If set, write all snapshots at the end to this file",
        extend("format" = "path", "x-file" = true, "x-must-exist" = false)
    )]
    pub dump_file: Option<PathBuf>,

    #[serde(default)]
    #[schemars(title = "Dump format", description = "csv / tsv / json (default: csv)")]
    pub dump_format: DumpFormat,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, PartialEq)]
pub struct TrainTestParams {
    #[serde(default)]
    #[schemars(title = "Tree", description = "Tree configuration")]
    pub tree: TreeConfig,

    #[schemars(title = "Training set")]
    pub train: ArffParameters,

    #[schemars(title = "Test set")]
    pub test: ArffParameters,

    #[serde(default = "default_train_on_test")]
    #[schemars(
        title = "Train on test",
        description = "Keep learning from labelled rows during the test phase",
        default = "default_train_on_test"
    )]
    pub train_on_test: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema, EnumDiscriminants, PartialEq)]
#[serde(tag = "type", content = "params", rename_all = "kebab-case")]
#[strum_discriminants(name(TaskKind))]
#[strum_discriminants(derive(EnumIter, EnumString, Display, IntoStaticStr, EnumMessage))]
#[strum_discriminants(strum(serialize_all = "kebab-case"))]
pub enum TaskChoice {
    #[strum_discriminants(strum(
        message = "Evaluate Prequential",
        detailed_message = "Interleave test-then-train with periodic reporting."
    ))]
    EvaluatePrequential(PrequentialParams),

    #[strum_discriminants(strum(
        message = "Train Then Test",
        detailed_message = "Train on one ARFF file, then score a second one."
    ))]
    TrainTest(TrainTestParams),
}

impl UIChoice for TaskChoice {
    type Kind = TaskKind;

    fn schema() -> Schema {
        schema_for!(TaskChoice)
    }

    fn default_params(kind: Self::Kind) -> Value {
        let tree = serde_json::to_value(TreeConfig::default()).unwrap_or_default();
        match kind {
            TaskKind::EvaluatePrequential => json!({
                "tree": tree,
                "max_instances": null,
                "max_seconds": null,
                "sample_frequency": default_frequency(),
                "mem_check_frequency": default_frequency(),
                "dump_file": null,
                "dump_format": "csv"
            }),
            TaskKind::TrainTest => json!({
                "tree": tree,
                "train_on_test": true
            }),
        }
    }
}
