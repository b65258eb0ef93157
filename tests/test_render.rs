use bench_report::{
    chunk_path, flatten, render_graph, render_svg, render_tikz, tikz::{escape_latex, TikzBackend},
    BenchTable,
    BenchmarkRow, ChartKind, ChartStyle, Graph, OutputFormat, ReportCfg, ReportError,
};
use dev_utils::{
    sample_docs::{document, random_document, tables_file, DocShape},
    test_support::{occurs_n_times, write_json},
};
use plotters::prelude::{IntoDrawingArea, WHITE};
use std::{fs, path::Path};

mod common;
use common::{doc_from, line_group, two_by_two_table};

const SIZE: (u32, u32) = (800, 400);

fn line_table(name: &str) -> BenchTable<BenchmarkRow> {
    flatten(&doc_from(line_group(name)), name).unwrap().into()
}

fn time_line() -> ChartKind {
    ChartKind::TimeLine {
        title: "Time taken to insert rows".to_owned(),
        param: "Number of rows".to_owned(),
    }
}

fn all_kinds() -> Vec<(ChartKind, BenchTable<BenchmarkRow>)> {
    vec![
        (time_line(), line_table("random_inserts")),
        (
            ChartKind::RateLine {
                title: "Rows per second".to_owned(),
                param: "Number of rows".to_owned(),
            },
            line_table("random_get_ids"),
        ),
        (
            ChartKind::Speedup {
                title: "Comparative time".to_owned(),
                param_value: 262144,
            },
            line_table("snapshot"),
        ),
        (ChartKind::GroupedBars, two_by_two_table()),
        (ChartKind::SeparateBars, two_by_two_table()),
        (ChartKind::SeparateLines, two_by_two_table()),
    ]
}

#[test]
fn test_every_kind_renders_svg() {
    let style = ChartStyle::default();
    for (kind, table) in all_kinds() {
        let svg = render_svg(&kind, &table, &style, SIZE).unwrap();
        assert!(svg.starts_with("<svg"), "{kind:?}");
        assert!(svg.trim_end().ends_with("</svg>"), "{kind:?}");
    }
}

#[test]
fn test_every_kind_renders_one_tikz_picture() {
    let style = ChartStyle::default();
    for (kind, table) in all_kinds() {
        let tex = render_tikz(&kind, &table, &style, SIZE).unwrap();
        assert!(occurs_n_times(&tex, "\\begin{tikzpicture}", 1), "{kind:?}");
        assert!(occurs_n_times(&tex, "\\end{tikzpicture}", 1), "{kind:?}");
        assert!(tex.contains("{rgb,255:red,"), "{kind:?}");
    }
}

#[test]
fn test_chart_texts() {
    let style = ChartStyle::default();

    let tex = render_tikz(&time_line(), &line_table("random_inserts"), &style, SIZE).unwrap();
    assert!(tex.contains("Time taken to insert rows"));
    assert!(tex.contains("Number of rows"));
    for variant in ["EmDB", "DuckDB", "SQLite"] {
        assert!(tex.contains(variant), "{variant}");
    }

    let svg = render_svg(&ChartKind::GroupedBars, &two_by_two_table(), &style, SIZE).unwrap();
    assert!(svg.contains("Query and Scale Factor"));
}

#[test]
fn test_legend_can_be_left_out() {
    let table = two_by_two_table();
    let with = render_svg(&ChartKind::SeparateBars, &table, &ChartStyle::default(), SIZE).unwrap();
    let without = render_svg(
        &ChartKind::SeparateBars,
        &table,
        &ChartStyle::default().with_legend(false),
        SIZE,
    )
    .unwrap();
    assert!(with.len() > without.len());
}

#[test]
fn test_empty_table_is_rejected() {
    let empty = BenchTable::<BenchmarkRow>::new(Vec::new());
    for (kind, _) in all_kinds() {
        assert!(
            matches!(
                render_svg(&kind, &empty, &ChartStyle::default(), SIZE),
                Err(ReportError::MalformedInput(_))
            ),
            "{kind:?}"
        );
    }
}

#[test]
fn test_speedup_without_rows_at_param() {
    let kind = ChartKind::Speedup {
        title: "t".to_owned(),
        param_value: 999,
    };
    assert!(matches!(
        render_svg(&kind, &line_table("snapshot"), &ChartStyle::default(), SIZE),
        Err(ReportError::MissingKey { .. })
    ));
}

#[test]
fn test_rate_chart_with_zero_timing() {
    let table: BenchTable<BenchmarkRow> = flatten(
        &doc_from(document(&[("q", "v", "10", [0.0, 1.0, 1.0, 2.0])])),
        "q",
    )
    .unwrap()
    .into();
    assert!(matches!(
        render_svg(&ChartKind::SeparateBars, &table, &ChartStyle::default(), SIZE),
        Err(ReportError::DivisionByZero { .. })
    ));
}

#[test]
fn test_escape_latex() {
    assert_eq!(escape_latex("a_b & 50%"), "a\\_b \\& 50\\%");
    assert_eq!(escape_latex("12 μs"), "12 $\\mu$s");
    assert_eq!(escape_latex("{x}"), "\\{x\\}");
    assert_eq!(escape_latex("plain"), "plain");
    assert_eq!(escape_latex("Arena<u64>"), "Arena\\textless{}u64\\textgreater{}");
}

#[test]
fn test_tikz_generic_variant_names_are_escaped() {
    let doc = document(&[
        ("pull", "Arena<u64>", "10", [1.0, 2.0, 2.0, 3.0]),
        ("pull", "Vec<u64>", "10", [2.0, 3.0, 3.0, 4.0]),
    ]);
    let table: BenchTable<BenchmarkRow> = flatten(&doc_from(doc), "pull").unwrap().into();
    let tex = render_tikz(&ChartKind::SeparateBars, &table, &ChartStyle::default(), SIZE).unwrap();
    assert!(tex.contains("Arena\\textless{}u64\\textgreater{}"));
    assert!(!tex.contains("Arena<u64>"));
}

#[test]
fn test_tikz_unit() {
    let mut tex = String::new();
    {
        let root = TikzBackend::with_string(&mut tex, SIZE)
            .with_unit(1.0)
            .into_drawing_area();
        root.fill(&WHITE).unwrap();
    }
    assert!(tex.starts_with("\\begin{tikzpicture}[x=1pt, y=1pt]"));
    assert!(tex.contains("\\fill[fill={rgb,255:red,255;green,255;blue,255}]"));
}

#[test]
fn test_chunk_path() {
    let out = Path::new("out/chart.tex");
    assert_eq!(chunk_path(out, 0, 1), out);
    assert_eq!(chunk_path(out, 1, 3), Path::new("out/chart_1.tex"));
    assert_eq!(chunk_path(Path::new("chart"), 2, 3), Path::new("chart_2"));
}

#[test]
fn test_graph_names_round_trip() {
    for graph in Graph::all() {
        assert_eq!(Graph::from_name(graph.name()).unwrap(), *graph);
    }
    assert_eq!(Graph::all().len(), 12);
    assert!(matches!(
        Graph::from_name("tokens"),
        Err(ReportError::UnknownGraph(_))
    ));
}

#[test]
fn test_render_tables_graph_to_tex() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_json(dir.path(), "data.json", &tables_file(line_group("snapshot")));
    let output = dir.path().join("figs/snapshot.tex");

    let written = render_graph(
        Graph::Snapshot,
        &input,
        &output,
        OutputFormat::Tex,
        &ReportCfg::default(),
    )
    .unwrap();

    assert_eq!(written, vec![output.clone()]);
    let tex = fs::read_to_string(&output).unwrap();
    assert!(tex.contains("Comparative time to make a snapshot of 262144 rows"));
}

#[test]
fn test_render_chunked_graph() {
    let dir = tempfile::tempdir().unwrap();
    let doc = random_document(&DocShape::new(7, 2, &[1, 4, 16]));
    let input = write_json(dir.path(), "user_details.json", &doc);
    let output = dir.path().join("user_details.tex");

    let written = render_graph(
        Graph::UserDetails,
        &input,
        &output,
        OutputFormat::Tex,
        &ReportCfg::default(),
    )
    .unwrap();

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(
        names,
        vec!["user_details_0.tex", "user_details_1.tex", "user_details_2.tex"]
    );
    assert!(written.iter().all(|p| p.exists()));
    assert!(!output.exists());
}

#[test]
fn test_render_graph_missing_benchmark() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_json(dir.path(), "data.json", &tables_file(line_group("snapshot")));

    let result = render_graph(
        Graph::RandomInserts,
        &input,
        &dir.path().join("x.tex"),
        OutputFormat::Tex,
        &ReportCfg::default(),
    );
    assert!(matches!(result, Err(ReportError::MissingKey { .. })));
}

#[cfg(unix)]
#[test]
fn test_render_pdf_with_converter() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_json(dir.path(), "data.json", &two_by_two_doc());
    let output = dir.path().join("string_copy.pdf");
    let cfg = ReportCfg::default().with_pdf_command(&["cp", "{input}", "{output}"]);

    render_graph(Graph::StringCopy, &input, &output, OutputFormat::Pdf, &cfg).unwrap();

    let copied = fs::read_to_string(&output).unwrap();
    assert!(copied.starts_with("<svg"));
}

#[cfg(unix)]
#[test]
fn test_failing_converter() {
    let dir = tempfile::tempdir().unwrap();
    let input = write_json(dir.path(), "data.json", &two_by_two_doc());
    let cfg = ReportCfg::default().with_pdf_command(&["false"]);

    let result = render_graph(
        Graph::StringCopy,
        &input,
        &dir.path().join("x.pdf"),
        OutputFormat::Pdf,
        &cfg,
    );
    assert!(matches!(result, Err(ReportError::ExternalTool { .. })));
}

fn two_by_two_doc() -> serde_json::Value {
    common::two_by_two()
}
