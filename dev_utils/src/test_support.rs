use std::{
    fs,
    path::{Path, PathBuf},
};

pub fn f64_are_close(left: f64, right: f64, pct: f64) -> bool {
    let avg_abs = (left.abs() + right.abs()) / 2.0;
    (left - right).abs() <= avg_abs * pct
}

/// Whether `[fastest, mean, median, slowest]` of `left` and `right` are pairwise close.
pub fn quads_are_close(left: [f64; 4], right: [f64; 4], pct: f64) -> bool {
    left.iter()
        .zip(right.iter())
        .all(|(l, r)| f64_are_close(*l, *r, pct))
}

/// Writes `value` as JSON to `dir/name`, returning the path.
pub fn write_json(dir: &Path, name: &str, value: &serde_json::Value) -> PathBuf {
    let path = dir.join(name);
    let text = serde_json::to_string_pretty(value).expect("serializable value");
    fs::write(&path, text).expect("writable test dir");
    path
}

/// Whether `haystack` contains `needle` exactly `n` times.
pub fn occurs_n_times(haystack: &str, needle: &str, n: usize) -> bool {
    haystack.matches(needle).count() == n
}
