use std::fs;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result, anyhow, bail};
use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use serde_json::{Map, Value};

use crate::classifiers::TreeConfig;
use crate::ui::types::choices::{
    ArffParameters, DumpFormat, PrequentialParams, StreamChoice, TaskChoice, TrainTestParams,
    UIChoice,
};

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Gaussian Hellinger Very Fast Decision Tree for imbalanced streams"
)]
pub struct Cli {
    /// Log filter used when RUST_LOG is unset (e.g. warn, info, ghvfdt=debug)
    #[arg(long, global = true, default_value = "warn", value_name = "LEVEL")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Prequential (test-then-train) evaluation over a stream
    Run(RunArgs),
    /// Train on one ARFF file, then test on another
    TrainTest(TrainTestArgs),
    /// Print relation, example count and class distribution of an ARFF file
    Summarize(SummarizeArgs),
    /// Print the JSON Schema of a configuration
    Schema(SchemaArgs),
}

#[derive(Debug, Args, Default)]
pub struct TreeArgs {
    /// JSON file holding a tree configuration; missing fields take defaults
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub tree_config: Option<PathBuf>,

    /// Override tree parameters (key=value)
    #[arg(long = "tree-param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub tree_params: Vec<KeyValue>,
}

impl TreeArgs {
    pub fn into_config(self) -> Result<TreeConfig> {
        let mut value = match &self.tree_config {
            Some(path) => {
                let raw = fs::read_to_string(path)
                    .with_context(|| format!("failed to read {}", path.display()))?;
                serde_json::from_str(&raw)
                    .with_context(|| format!("{} is not valid JSON", path.display()))?
            }
            None => serde_json::to_value(TreeConfig::default())?,
        };
        apply_overrides(&mut value, &self.tree_params)?;
        serde_json::from_value(value).context("invalid tree configuration")
    }
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Stream to consume (arff-file, imbalanced-gaussian)
    #[arg(long, value_name = "STREAM")]
    pub stream: String,

    /// Override stream parameters (key=value, nested keys with dots)
    #[arg(long = "stream-param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub stream_params: Vec<KeyValue>,

    #[command(flatten)]
    pub tree: TreeArgs,

    /// Stop after this many instances (omit for unlimited)
    #[arg(long, value_name = "N")]
    pub max_instances: Option<u64>,

    /// Stop after this many CPU seconds (omit for unlimited)
    #[arg(long, value_name = "SECONDS")]
    pub max_seconds: Option<u64>,

    /// Emit metrics every N instances
    #[arg(
        long,
        default_value_t = 100_000,
        value_name = "N",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub sample_frequency: u64,

    /// Check memory usage every N instances
    #[arg(
        long,
        default_value_t = 100_000,
        value_name = "N",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub mem_check_frequency: u64,

    /// File to dump evaluation snapshots after completion
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub dump_file: Option<PathBuf>,

    /// Format for the dump file
    #[arg(long, value_enum, default_value = "csv", value_name = "FORMAT")]
    pub dump_format: DumpFormat,
}

impl RunArgs {
    pub fn into_task_choice(self) -> Result<TaskChoice> {
        let stream = build_choice::<StreamChoice>(&self.stream, &self.stream_params)
            .with_context(|| format!("invalid stream '{}'", self.stream))?;
        let tree = self.tree.into_config()?;

        Ok(TaskChoice::EvaluatePrequential(PrequentialParams {
            tree,
            stream,
            max_instances: self.max_instances,
            max_seconds: self.max_seconds,
            sample_frequency: self.sample_frequency,
            mem_check_frequency: self.mem_check_frequency,
            dump_file: self.dump_file,
            dump_format: self.dump_format,
        }))
    }
}

#[derive(Debug, Args)]
pub struct TrainTestArgs {
    /// Training set
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub train: PathBuf,

    /// Test set
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub test: PathBuf,

    /// Zero-based class column, applied to both files (default: last)
    #[arg(long, value_name = "N")]
    pub class_index: Option<usize>,

    /// Do not learn from the test set
    #[arg(long)]
    pub no_train_on_test: bool,

    #[command(flatten)]
    pub tree: TreeArgs,
}

impl TrainTestArgs {
    pub fn into_task_choice(self) -> Result<TaskChoice> {
        Ok(TaskChoice::TrainTest(TrainTestParams {
            tree: self.tree.into_config()?,
            train: ArffParameters {
                path: self.train,
                class_index: self.class_index,
            },
            test: ArffParameters {
                path: self.test,
                class_index: self.class_index,
            },
            train_on_test: !self.no_train_on_test,
        }))
    }
}

#[derive(Debug, Args)]
pub struct SummarizeArgs {
    #[arg(value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub path: PathBuf,

    /// Zero-based class column (default: last)
    #[arg(long, value_name = "N")]
    pub class_index: Option<usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum SchemaTarget {
    Tree,
    Stream,
    Task,
}

#[derive(Debug, Args)]
pub struct SchemaArgs {
    #[arg(value_enum)]
    pub target: SchemaTarget,
}

#[derive(Clone, Debug, PartialEq)]
pub struct KeyValue {
    key: String,
    value: Value,
}

fn build_choice<C>(kind_input: &str, overrides: &[KeyValue]) -> Result<C>
where
    C: UIChoice,
    C::Kind: FromStr,
    <C::Kind as FromStr>::Err: std::fmt::Display,
{
    let kind = parse_kind::<C::Kind>(kind_input).with_context(|| {
        let known: Vec<&str> = C::kinds().into_iter().map(|(name, _)| name).collect();
        format!("expected one of: {}", known.join(", "))
    })?;
    let mut params = C::default_params(kind);
    apply_overrides(&mut params, overrides)?;
    C::from_parts(kind, params)
}

fn parse_kind<T>(raw: &str) -> Result<T>
where
    T: FromStr,
    <T as FromStr>::Err: std::fmt::Display,
{
    candidate_spellings(raw)
        .into_iter()
        .find_map(|cand| cand.parse::<T>().ok())
        .ok_or_else(|| anyhow!("could not parse value '{raw}'"))
}

fn candidate_spellings(input: &str) -> Vec<String> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Vec::new();
    }

    let mut out = vec![
        trimmed.to_string(),
        trimmed.to_lowercase(),
        kebab_from_token(trimmed),
        trimmed.replace('_', "-"),
    ];
    out.sort();
    out.dedup();
    out
}

/// `ImbalancedGaussian` and `imbalanced_gaussian` both become
/// `imbalanced-gaussian`.
fn kebab_from_token(token: &str) -> String {
    let mut buf = String::new();
    let mut prev_lower = false;
    for ch in token.chars() {
        if ch.is_uppercase() {
            if prev_lower {
                buf.push('-');
            }
            buf.extend(ch.to_lowercase());
            prev_lower = false;
        } else if ch == '_' {
            buf.push('-');
            prev_lower = false;
        } else {
            buf.push(ch);
            prev_lower = ch.is_lowercase();
        }
    }
    buf
}

fn apply_overrides(target: &mut Value, overrides: &[KeyValue]) -> Result<()> {
    for kv in overrides {
        set_path(target, &kv.key, kv.value.clone())
            .with_context(|| format!("failed to set '{}'", kv.key))?;
    }
    Ok(())
}

fn set_path(target: &mut Value, path: &str, new_value: Value) -> Result<()> {
    let segments: Vec<&str> = path.split('.').filter(|s| !s.is_empty()).collect();
    let Some((last, parents)) = segments.split_last() else {
        bail!("empty key is not allowed");
    };

    let mut current = target;
    for seg in parents {
        current = ensure_object(current)?
            .entry((*seg).to_string())
            .or_insert(Value::Null);
    }
    ensure_object(current)?.insert((*last).to_string(), new_value);
    Ok(())
}

fn ensure_object(value: &mut Value) -> Result<&mut Map<String, Value>> {
    if value.is_null() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => Ok(map),
        other => bail!("cannot set nested field on non-object value: {other:?}"),
    }
}

fn parse_key_value(raw: &str) -> Result<KeyValue, String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| "expected KEY=VALUE".to_string())?;
    let key = key.trim();
    if key.is_empty() {
        return Err("key cannot be empty".to_string());
    }

    Ok(KeyValue {
        key: key.to_string(),
        value: parse_literal(value.trim()),
    })
}

/// JSON literal when it parses as one, plain string otherwise.
fn parse_literal(raw: &str) -> Value {
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
