//! Flattening of [`RawBenchmarkDocument`]s into rows, and the rate transform.

use crate::{
    document::{RawLeaf, VariantLeaves},
    RawBenchmarkDocument, ReportError, StatQuadruple,
};
use indexmap::IndexMap;
use regex::Regex;

//=================
// Rows

/// Common read access to [`BenchmarkRow`] and [`RateRow`], used by tables and charts.
pub trait Row {
    fn query(&self) -> &str;
    fn variant(&self) -> &str;
    fn scale_factor(&self) -> u64;
    fn stats(&self) -> &StatQuadruple;
}

/// One flattened data point; timings are in picoseconds.
#[derive(Debug, Clone, PartialEq)]
pub struct BenchmarkRow {
    pub query: String,
    pub variant: String,
    pub scale_factor: u64,
    pub stats: StatQuadruple,
}

/// A [`BenchmarkRow`] whose statistics are throughputs: `scale_factor / stat`, per picosecond.
///
/// Note that the rate derived from `fastest` is the *largest* rate and the one derived from
/// `slowest` the smallest; the field names follow the timing they came from.
#[derive(Debug, Clone, PartialEq)]
pub struct RateRow {
    pub query: String,
    pub variant: String,
    pub scale_factor: u64,
    pub rates: StatQuadruple,
}

impl Row for BenchmarkRow {
    fn query(&self) -> &str {
        &self.query
    }

    fn variant(&self) -> &str {
        &self.variant
    }

    fn scale_factor(&self) -> u64 {
        self.scale_factor
    }

    fn stats(&self) -> &StatQuadruple {
        &self.stats
    }
}

impl Row for RateRow {
    fn query(&self) -> &str {
        &self.query
    }

    fn variant(&self) -> &str {
        &self.variant
    }

    fn scale_factor(&self) -> u64 {
        self.scale_factor
    }

    fn stats(&self) -> &StatQuadruple {
        &self.rates
    }
}

//=================
// Flattening

fn parse_scale_factor(query: &str, variant: &str, key: &str) -> Result<u64, ReportError> {
    key.parse::<u64>().map_err(|_| {
        ReportError::MalformedInput(format!(
            "scale factor `{key}` of {query}/{variant} is not a non-negative integer"
        ))
    })
}

fn flatten_group(
    query: &str,
    variants: &VariantLeaves,
    rows: &mut Vec<BenchmarkRow>,
) -> Result<(), ReportError> {
    for (variant, leaves) in variants {
        for (key, leaf) in leaves {
            let scale_factor = parse_scale_factor(query, variant, key)?;
            let Some(stats) = leaf.time else {
                log::debug!("skipping {query}/{variant}/{key}: no timing information");
                continue;
            };
            if !stats.is_ordered() || !stats.is_non_negative() {
                log::warn!("suspicious statistics for {query}/{variant}/{key}: {stats:?}");
            }
            rows.push(BenchmarkRow {
                query: query.to_owned(),
                variant: variant.clone(),
                scale_factor,
                stats,
            });
        }
    }
    Ok(())
}

/// Flattens benchmark `benchmark_name` of `document` into one row per timed leaf, in document order.
///
/// Leaves without timing information are skipped, but their keys must still be scale factors.
///
/// # Errors
/// - [`ReportError::MissingKey`] if the document has no benchmark `benchmark_name`.
/// - [`ReportError::MalformedInput`] if a scale-factor key is not an integer.
pub fn flatten(
    document: &RawBenchmarkDocument,
    benchmark_name: &str,
) -> Result<Vec<BenchmarkRow>, ReportError> {
    log::trace!("entering `flatten`: {benchmark_name}");
    let mut rows = Vec::new();
    flatten_group(benchmark_name, document.group(benchmark_name)?, &mut rows)?;
    Ok(rows)
}

/// Flattens every benchmark of `document`, treating each benchmark name as a query.
pub fn flatten_all(document: &RawBenchmarkDocument) -> Result<Vec<BenchmarkRow>, ReportError> {
    log::trace!("entering `flatten_all`");
    let mut rows = Vec::new();
    for (query, variants) in &document.0 {
        flatten_group(query, variants, &mut rows)?;
    }
    Ok(rows)
}

/// Rebuilds the nested document from rows. Inverse of [`flatten_all`] for the timed leaves,
/// provided scale-factor keys were written in canonical decimal form.
pub fn renest<'a>(rows: impl IntoIterator<Item = &'a BenchmarkRow>) -> RawBenchmarkDocument {
    let mut groups: IndexMap<String, VariantLeaves> = IndexMap::new();
    for row in rows {
        groups
            .entry(row.query.clone())
            .or_default()
            .entry(row.variant.clone())
            .or_default()
            .insert(row.scale_factor.to_string(), RawLeaf::timed(row.stats));
    }
    groups.into()
}

//=================
// Rates

/// Converts each row into throughputs `scale_factor / stat`.
///
/// # Errors
/// [`ReportError::DivisionByZero`] if a row has a zero scale factor or a zero timing. Use
/// [`without_zero_scale`] first to drop zero-scale rows instead.
pub fn to_rates<'a>(
    rows: impl IntoIterator<Item = &'a BenchmarkRow>,
) -> Result<Vec<RateRow>, ReportError> {
    rows.into_iter().map(rate_row).collect()
}

fn rate_row(row: &BenchmarkRow) -> Result<RateRow, ReportError> {
    let div_zero = |field: &'static str| ReportError::DivisionByZero {
        query: row.query.clone(),
        variant: row.variant.clone(),
        scale_factor: row.scale_factor,
        field,
    };

    if row.scale_factor == 0 {
        return Err(div_zero("all"));
    }
    for (name, value) in StatQuadruple::FIELD_NAMES.into_iter().zip(row.stats.fields()) {
        if value == 0.0 {
            return Err(div_zero(name));
        }
    }

    let sf = row.scale_factor as f64;
    Ok(RateRow {
        query: row.query.clone(),
        variant: row.variant.clone(),
        scale_factor: row.scale_factor,
        rates: row.stats.map(|stat| sf / stat),
    })
}

/// Drops rows whose scale factor is zero, for which no rate exists.
pub fn without_zero_scale(rows: Vec<BenchmarkRow>) -> Vec<BenchmarkRow> {
    let before = rows.len();
    let kept: Vec<BenchmarkRow> = rows.into_iter().filter(|r| r.scale_factor > 0).collect();
    if kept.len() < before {
        log::info!("dropped {} rows with a zero scale factor", before - kept.len());
    }
    kept
}

//=================
// Variant names

/// Rewrites variant names with a regular expression, e.g. to drop generic arguments
/// (`Arena<u64>` becomes `Arena`).
#[derive(Debug, Clone)]
pub struct NameRewrite {
    pattern: Regex,
    replacement: String,
}

impl NameRewrite {
    pub fn new(pattern: &str, replacement: &str) -> Result<Self, ReportError> {
        let pattern = Regex::new(pattern)
            .map_err(|e| ReportError::Config(format!("bad name pattern `{pattern}`: {e}")))?;
        Ok(Self {
            pattern,
            replacement: replacement.to_owned(),
        })
    }

    /// Removes everything from the first `<` on.
    pub fn strip_generic_args() -> Result<Self, ReportError> {
        Self::new("<.*$", "")
    }

    pub fn apply(&self, name: &str) -> String {
        self.pattern
            .replace(name, self.replacement.as_str())
            .into_owned()
    }

    pub fn apply_to(&self, document: &RawBenchmarkDocument) -> RawBenchmarkDocument {
        document.rename_variants(|name| self.apply(name))
    }
}
