use bench_report::{
    flatten, flatten_all, renest, to_rates, without_zero_scale, BenchmarkRow, NameRewrite,
    ReportError, StatQuadruple,
};
use dev_utils::{
    sample_docs::{add_untimed, document, random_document, single_point, tables_file, DocShape},
    test_support::{f64_are_close, quads_are_close},
};
use serde_json::json;

mod common;
use common::{doc_from, line_group, two_by_two};

#[test]
fn test_single_point_flattens_to_one_row() {
    let doc = doc_from(single_point());
    let rows = flatten(&doc, "q1").unwrap();

    assert_eq!(
        rows,
        vec![BenchmarkRow {
            query: "q1".to_owned(),
            variant: "v1".to_owned(),
            scale_factor: 10,
            stats: StatQuadruple::new(1.0, 2.0, 2.0, 3.0),
        }]
    );
}

#[test]
fn test_single_point_rates() {
    let doc = doc_from(single_point());
    let rates = to_rates(&flatten(&doc, "q1").unwrap()).unwrap();

    assert_eq!(rates.len(), 1);
    let r = rates[0].rates;
    assert!(quads_are_close(
        [r.fastest, r.mean, r.median, r.slowest],
        [10.0, 5.0, 5.0, 10.0 / 3.0],
        1e-9
    ));
}

#[test]
fn test_one_row_per_timed_leaf() {
    let mut value = two_by_two();
    add_untimed(&mut value, "select", "EmDB", "1000");
    add_untimed(&mut value, "insert", "DuckDB", "10");
    let doc = doc_from(value);

    assert_eq!(doc.timed_leaf_count(), 8);
    let rows = flatten_all(&doc).unwrap();
    assert_eq!(rows.len(), 8);
    assert!(rows.iter().all(|r| r.scale_factor != 1000));
    assert!(rows.iter().all(|r| r.variant != "DuckDB"));
}

#[test]
fn test_random_document_row_count() {
    let shape = DocShape::new(4, 3, &[1, 2, 4, 8]);
    let doc = doc_from(random_document(&shape));

    let rows = flatten_all(&doc).unwrap();
    assert_eq!(rows.len(), shape.leaf_count());
    assert!(rows.iter().all(|r| r.stats.is_ordered()));
}

#[test]
fn test_flatten_keeps_document_order() {
    let doc = doc_from(two_by_two());
    let rows = flatten(&doc, "select").unwrap();

    let keys: Vec<(&str, u64)> = rows
        .iter()
        .map(|r| (r.variant.as_str(), r.scale_factor))
        .collect();
    assert_eq!(
        keys,
        vec![("EmDB", 100), ("EmDB", 10), ("SQLite", 10), ("SQLite", 100)]
    );
    assert!(rows.iter().all(|r| r.query == "select"));
}

#[test]
fn test_empty_document() {
    let doc = doc_from(json!({}));
    assert!(flatten_all(&doc).unwrap().is_empty());

    let doc = doc_from(json!({ "q": {} }));
    assert!(flatten(&doc, "q").unwrap().is_empty());
}

#[test]
fn test_missing_benchmark() {
    let doc = doc_from(single_point());
    match flatten(&doc, "nope") {
        Err(ReportError::MissingKey { key, .. }) => assert_eq!(key, "nope"),
        other => panic!("expected MissingKey, got {other:?}"),
    }
}

#[test]
fn test_non_numeric_scale_factor() {
    let doc = doc_from(document(&[("q", "v", "big", [1.0, 1.0, 1.0, 1.0])]));
    assert!(matches!(
        flatten(&doc, "q"),
        Err(ReportError::MalformedInput(_))
    ));
}

#[test]
fn test_unselected_output_file_is_malformed() {
    // A combined output file read without its `benchmarks.tables` key path: the benchmark
    // names land where scale factors belong.
    let doc = doc_from(tables_file(line_group("random_inserts")));
    assert!(matches!(
        flatten_all(&doc),
        Err(ReportError::MalformedInput(_))
    ));
}

#[test]
fn test_untimed_leaf_key_is_still_checked() {
    let mut value = single_point();
    add_untimed(&mut value, "q1", "v1", "many");
    assert!(matches!(
        flatten(&doc_from(value), "q1"),
        Err(ReportError::MalformedInput(_))
    ));
}

#[test]
fn test_renest_reconstructs_timed_leaves() {
    let mut value = two_by_two();
    add_untimed(&mut value, "select", "EmDB", "5");
    let doc = doc_from(value);

    let rows = flatten_all(&doc).unwrap();
    let rebuilt = renest(&rows);

    assert_eq!(flatten_all(&rebuilt).unwrap(), rows);
    assert_eq!(rebuilt.timed_leaf_count(), doc.timed_leaf_count());
    assert_eq!(rebuilt.names().collect::<Vec<_>>(), vec!["select", "insert"]);
}

#[test]
fn test_larger_time_smaller_rate() {
    let doc = doc_from(two_by_two());
    let rows = flatten_all(&doc).unwrap();
    let rates = to_rates(&rows).unwrap();

    for (row, rate) in rows.iter().zip(&rates) {
        let sf = row.scale_factor as f64;
        assert!(f64_are_close(rate.rates.mean, sf / row.stats.mean, 1e-12));
        assert!(rate.rates.fastest >= rate.rates.mean);
        assert!(rate.rates.slowest <= rate.rates.median);
    }
}

#[test]
fn test_zero_scale_factor_is_an_error() {
    let doc = doc_from(document(&[
        ("q", "v", "0", [1.0, 2.0, 2.0, 3.0]),
        ("q", "v", "4", [1.0, 2.0, 2.0, 3.0]),
    ]));
    let rows = flatten(&doc, "q").unwrap();

    match to_rates(&rows) {
        Err(ReportError::DivisionByZero { scale_factor, .. }) => assert_eq!(scale_factor, 0),
        other => panic!("expected DivisionByZero, got {other:?}"),
    }

    let kept = without_zero_scale(rows);
    assert_eq!(kept.len(), 1);
    assert_eq!(to_rates(&kept).unwrap()[0].rates.mean, 2.0);
}

#[test]
fn test_zero_timing_is_an_error() {
    let doc = doc_from(document(&[("q", "v", "4", [0.0, 2.0, 2.0, 3.0])]));
    let rows = flatten(&doc, "q").unwrap();

    match to_rates(&rows) {
        Err(ReportError::DivisionByZero { field, .. }) => assert_eq!(field, "fastest"),
        other => panic!("expected DivisionByZero, got {other:?}"),
    }
}

#[test]
fn test_suspicious_stats_are_accepted() {
    let doc = doc_from(document(&[("q", "v", "4", [5.0, 2.0, 9.0, 3.0])]));
    let rows = flatten(&doc, "q").unwrap();

    assert_eq!(rows.len(), 1);
    assert!(!rows[0].stats.is_ordered());
}

#[test]
fn test_strip_generic_args() {
    let doc = doc_from(document(&[
        ("pull", "Arena<u64>", "1", [1.0, 1.0, 1.0, 1.0]),
        ("pull", "Vec<Box<u64>>", "1", [2.0, 2.0, 2.0, 2.0]),
        ("pull", "Plain", "1", [3.0, 3.0, 3.0, 3.0]),
    ]));
    let rewrite = NameRewrite::strip_generic_args().unwrap();

    assert_eq!(rewrite.apply("Arena<u64>"), "Arena");
    let renamed = rewrite.apply_to(&doc);
    let variants: Vec<String> = flatten(&renamed, "pull")
        .unwrap()
        .into_iter()
        .map(|r| r.variant)
        .collect();
    assert_eq!(variants, vec!["Arena", "Vec", "Plain"]);
}

#[test]
fn test_bad_rewrite_pattern() {
    assert!(matches!(
        NameRewrite::new("(unclosed", ""),
        Err(ReportError::Config(_))
    ));
}
