//! The raw divan document and navigation into divan output files.

use crate::{ReportError, StatQuadruple};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::{fs, path::Path};

/// A single benchmark data point. Divan writes more keys than `time` (e.g. allocation tallies);
/// only `time` is kept and leaves without it are skipped by the normalizer.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawLeaf {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub time: Option<StatQuadruple>,
}

impl RawLeaf {
    pub fn timed(stats: StatQuadruple) -> Self {
        Self { time: Some(stats) }
    }
}

/// Scale factor key (as written by divan, a string) to data point.
pub type ScaleFactorLeaves = IndexMap<String, RawLeaf>;

/// Variant name to its data points.
pub type VariantLeaves = IndexMap<String, ScaleFactorLeaves>;

/// Nested benchmark results: `benchmark_name -> variant_name -> scale_factor -> leaf`.
///
/// Insertion order is preserved at every level.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawBenchmarkDocument(pub IndexMap<String, VariantLeaves>);

impl RawBenchmarkDocument {
    /// Interprets `value` as a document; a shape mismatch is [`ReportError::MalformedInput`].
    pub fn from_value(value: Value) -> Result<Self, ReportError> {
        serde_json::from_value(value).map_err(|e| ReportError::MalformedInput(e.to_string()))
    }

    pub fn from_json_str(json: &str) -> Result<Self, ReportError> {
        let value: Value = serde_json::from_str(json)?;
        Self::from_value(value)
    }

    /// Reads the file at `path` and selects the document found under `key_path`
    /// (e.g. `["benchmarks", "tables"]` for a combined divan output file).
    pub fn from_file(path: &Path, key_path: &[&str]) -> Result<Self, ReportError> {
        log::trace!("entering `from_file`: {}", path.display());
        let value = read_json_file(path)?;
        Self::from_value(select(value, key_path)?)
    }

    /// Benchmark names in document order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }

    /// The variants of benchmark `name`.
    pub fn group(&self, name: &str) -> Result<&VariantLeaves, ReportError> {
        self.0
            .get(name)
            .ok_or_else(|| ReportError::missing_key(name, "benchmark document"))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of leaves that carry a timing object.
    pub fn timed_leaf_count(&self) -> usize {
        self.0
            .values()
            .flat_map(|variants| variants.values())
            .flat_map(|leaves| leaves.values())
            .filter(|leaf| leaf.time.is_some())
            .count()
    }

    /// Returns a copy of `self` with every variant name passed through `f`. When two variants
    /// of the same benchmark map to one name, the later one's data points win.
    pub fn rename_variants(&self, f: impl Fn(&str) -> String) -> Self {
        let groups = self
            .0
            .iter()
            .map(|(name, variants)| {
                let renamed: VariantLeaves = variants
                    .iter()
                    .map(|(variant, leaves)| (f(variant), leaves.clone()))
                    .collect();
                (name.clone(), renamed)
            })
            .collect();
        Self(groups)
    }
}

impl From<IndexMap<String, VariantLeaves>> for RawBenchmarkDocument {
    fn from(value: IndexMap<String, VariantLeaves>) -> Self {
        Self(value)
    }
}

/// Reads and parses a JSON file.
pub fn read_json_file(path: &Path) -> Result<Value, ReportError> {
    let text = fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
    Ok(serde_json::from_str(&text)?)
}

/// Walks `key_path` down nested JSON objects, returning the value found at its end.
pub fn select(mut value: Value, key_path: &[&str]) -> Result<Value, ReportError> {
    for (depth, key) in key_path.iter().enumerate() {
        let context = if depth == 0 {
            "document root".to_owned()
        } else {
            format!("`{}`", key_path[..depth].join("."))
        };
        value = match value {
            Value::Object(mut map) => map
                .remove(*key)
                .ok_or_else(|| ReportError::missing_key(key, context))?,
            other => {
                return Err(ReportError::MalformedInput(format!(
                    "expected an object at {context}, found {}",
                    json_kind(&other)
                )))
            }
        };
    }
    Ok(value)
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
