use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand, ValueEnum, ValueHint};
use serde_json::{Map, Value};
use tracing::Level;

use crate::classifiers::lazy::NeighborParameters;

#[derive(Debug, Parser)]
#[command(
    author,
    version,
    about = "Incremental nearest-neighbor classification of ARFF data"
)]
pub struct Cli {
    /// Log level
    #[arg(long, global = true, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl From<LogLevel> for Level {
    fn from(level: LogLevel) -> Level {
        match level {
            LogLevel::Trace => Level::TRACE,
            LogLevel::Debug => Level::DEBUG,
            LogLevel::Info => Level::INFO,
            LogLevel::Warn => Level::WARN,
            LogLevel::Error => Level::ERROR,
        }
    }
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Train on one ARFF file and score another
    Holdout(HoldoutArgs),
    /// Classify then learn each instance of an ARFF file in order
    Prequential(PrequentialArgs),
    /// Print the learner description and its reference
    Info,
}

#[derive(Debug, Args)]
pub struct LearnerArgs {
    /// 1-based index of the class attribute (omit for the last attribute)
    #[arg(
        long,
        value_name = "N",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub class_index: Option<u64>,

    /// Override learner parameters (key=value, nested keys with dots)
    #[arg(long = "learner-param", value_name = "KEY=VALUE", value_parser = parse_key_value)]
    pub learner_params: Vec<KeyValue>,

    /// Print the final snapshot as JSON
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Args)]
pub struct HoldoutArgs {
    /// Training data
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub train: PathBuf,

    /// Test data; must share the training header
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub test: PathBuf,

    #[command(flatten)]
    pub learner: LearnerArgs,
}

#[derive(Debug, Args)]
pub struct PrequentialArgs {
    /// Data to stream through the learner
    #[arg(long, value_name = "PATH", value_hint = ValueHint::FilePath)]
    pub stream: PathBuf,

    /// Stop after this many instances (omit for unlimited)
    #[arg(long, value_name = "N")]
    pub max_instances: Option<u64>,

    /// Record a snapshot every N instances
    #[arg(
        long,
        default_value_t = 1_000,
        value_name = "N",
        value_parser = clap::value_parser!(u64).range(1..),
    )]
    pub sample_frequency: u64,

    #[command(flatten)]
    pub learner: LearnerArgs,
}

#[derive(Clone, Debug)]
pub struct KeyValue {
    key: String,
    value: Value,
}

impl LearnerArgs {
    /// Zero-based class index, `None` meaning the last attribute.
    pub fn class_index(&self) -> Option<usize> {
        self.class_index.map(|i| (i - 1) as usize)
    }

    pub fn parameters(&self) -> Result<NeighborParameters> {
        let mut params = serde_json::to_value(NeighborParameters::default())
            .context("failed to serialize default learner parameters")?;
        apply_overrides(&mut params, &self.learner_params)?;
        serde_json::from_value(params).context("invalid learner parameters")
    }
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
        current = object_mut(current)?
            .entry((*seg).to_string())
            .or_insert(Value::Null);
    }

    object_mut(current)?.insert((*last).to_string(), new_value);
    Ok(())
}

fn object_mut(value: &mut Value) -> Result<&mut Map<String, Value>> {
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

fn parse_literal(raw: &str) -> Value {
    if raw.is_empty() {
        return Value::String(String::new());
    }
    serde_json::from_str(raw).unwrap_or_else(|_| Value::String(raw.to_string()))
}
