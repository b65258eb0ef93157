#![allow(dead_code)]

use bench_report::{flatten_all, BenchTable, BenchmarkRow, RawBenchmarkDocument};
use dev_utils::sample_docs::{document, random_document, DocShape};
use serde_json::Value;

pub fn doc_from(value: Value) -> RawBenchmarkDocument {
    RawBenchmarkDocument::from_value(value).expect("valid sample document")
}

/// Two queries, two variants, scale factors 10 and 100, in a deliberately unsorted order.
pub fn two_by_two() -> Value {
    document(&[
        ("select", "EmDB", "100", [100.0, 120.0, 110.0, 150.0]),
        ("select", "EmDB", "10", [10.0, 12.0, 11.0, 15.0]),
        ("select", "SQLite", "10", [20.0, 24.0, 22.0, 30.0]),
        ("select", "SQLite", "100", [200.0, 240.0, 220.0, 300.0]),
        ("insert", "EmDB", "10", [5.0, 6.0, 5.5, 8.0]),
        ("insert", "EmDB", "100", [50.0, 60.0, 55.0, 80.0]),
        ("insert", "SQLite", "10", [40.0, 48.0, 44.0, 60.0]),
        ("insert", "SQLite", "100", [400.0, 480.0, 440.0, 600.0]),
    ])
}

pub fn two_by_two_table() -> BenchTable<BenchmarkRow> {
    flatten_all(&doc_from(two_by_two()))
        .expect("flattens")
        .into()
}

/// `n_queries` queries of 3 variants at scale factors 1, 8, 64.
pub fn random_table(n_queries: usize) -> BenchTable<BenchmarkRow> {
    let shape = DocShape::new(n_queries, 3, &[1, 8, 64]);
    flatten_all(&doc_from(random_document(&shape)))
        .expect("flattens")
        .into()
}

/// A single benchmark's variants over powers of two, as read from `benchmarks.tables.<name>`.
pub fn line_group(name: &str) -> Value {
    let mut points = Vec::new();
    let params = ["1024", "4096", "16384", "262144"];
    for (v, variant) in ["EmDB", "DuckDB", "SQLite"].iter().enumerate() {
        for (i, p) in params.iter().enumerate() {
            let base = 1000.0 * (v as f64 + 1.0) * 4f64.powi(i as i32);
            points.push((name, *variant, *p, [base, base * 1.2, base * 1.1, base * 1.6]));
        }
    }
    document(&points)
}
