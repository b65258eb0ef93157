//! Flattening, rate conversion and chart rendering of random documents, with criterion.

use bench_report::{
    choose_time_unit, flatten_all, render_svg, render_tikz, to_rates, BenchTable, ChartKind, ChartStyle,
    RawBenchmarkDocument,
};
use criterion::{criterion_group, criterion_main, Criterion};
use dev_utils::sample_docs::{random_document, DocShape};
use std::hint::black_box;

/// `(queries, variants, scale factors)` of the documents benched.
const SHAPES: [(usize, usize, usize); 3] = [(4, 3, 4), (16, 5, 8), (64, 7, 16)];

fn doc(shape: (usize, usize, usize)) -> RawBenchmarkDocument {
    let (n_queries, n_variants, n_sf) = shape;
    let sfs: Vec<u64> = (0..n_sf as u32).map(|i| 1 << i).collect();
    let value = random_document(&DocShape::new(n_queries, n_variants, &sfs));
    RawBenchmarkDocument::from_value(value).expect("random document has the divan shape")
}

fn criterion_benchmark(c: &mut Criterion) {
    for shape in SHAPES {
        let doc = doc(shape);
        let rows = flatten_all(&doc).expect("flattens");

        c.bench_function(&format!("flatten_all({shape:?})"), |b| {
            b.iter(|| flatten_all(black_box(&doc)))
        });
        c.bench_function(&format!("to_rates({shape:?})"), |b| {
            b.iter(|| to_rates(black_box(&rows)))
        });
    }

    c.bench_function("choose_time_unit", |b| {
        b.iter(|| {
            for max in [1e-13, 0.5, 999.0, 3.7e9] {
                black_box(choose_time_unit(black_box(max)));
            }
        })
    });

    let table: BenchTable<_> = flatten_all(&doc((4, 3, 4))).expect("flattens").into();
    let style = ChartStyle::default();
    c.bench_function("render_svg(grouped_bars)", |b| {
        b.iter(|| render_svg(&ChartKind::GroupedBars, black_box(&table), &style, (1000, 400)))
    });
    c.bench_function("render_tikz(separate_lines)", |b| {
        b.iter(|| render_tikz(&ChartKind::SeparateLines, black_box(&table), &style, (1000, 400)))
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
