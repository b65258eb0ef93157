use bench_report::{
    bench_runner::{run_benchmark, run_workspace, split_benchmarks},
    ReportCfg, ReportError,
};
use dev_utils::sample_docs::{ndjson_line, single_point};
use serde_json::{json, Value};
use std::fs;

fn read_json(path: &std::path::Path) -> Value {
    serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn test_split_writes_every_benchmark() {
    let dir = tempfile::tempdir().unwrap();
    let all = dir.path().join("data.json");
    let text = [
        ndjson_line(&[("alpha", single_point()), ("beta", json!({ "old": {} }))]),
        String::new(),
        ndjson_line(&[("beta", json!({ "new": {} })), ("gamma", json!({}))]),
    ]
    .join("\n");
    fs::write(&all, text).unwrap();
    let out = dir.path().join("split");

    let written = split_benchmarks(&all, &out).unwrap();

    let names: Vec<String> = written
        .iter()
        .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["alpha.json", "beta.json", "gamma.json"]);
    assert_eq!(read_json(&out.join("alpha.json")), single_point());
    assert_eq!(read_json(&out.join("beta.json")), json!({ "new": {} }));
}

#[test]
fn test_split_line_without_benchmarks() {
    let dir = tempfile::tempdir().unwrap();
    let all = dir.path().join("data.json");
    fs::write(&all, "{\"other\": 1}\n").unwrap();

    assert!(matches!(
        split_benchmarks(&all, dir.path()),
        Err(ReportError::MissingKey { .. })
    ));
}

#[test]
fn test_split_invalid_json() {
    let dir = tempfile::tempdir().unwrap();
    let all = dir.path().join("data.json");
    fs::write(&all, "{not json\n").unwrap();

    assert!(matches!(
        split_benchmarks(&all, dir.path()),
        Err(ReportError::Json(_))
    ));
}

#[test]
fn test_cached_results_skip_the_command() {
    let dir = tempfile::tempdir().unwrap();
    let bench_dir = dir.path().join("_bench");
    fs::create_dir_all(&bench_dir).unwrap();
    fs::write(bench_dir.join("tables.json"), "{}").unwrap();
    let cfg = ReportCfg::default().with_bench_command(&["no-such-benchmark-command"]);

    let dest = run_benchmark(dir.path(), &bench_dir, "tables", true, &cfg).unwrap();
    assert_eq!(dest, bench_dir.join("tables.json"));

    assert!(matches!(
        run_benchmark(dir.path(), &bench_dir, "tables", false, &cfg),
        Err(ReportError::ExternalTool { .. })
    ));
    assert!(!dest.exists());
}

#[cfg(unix)]
#[test]
fn test_benchmark_writes_to_divan_file() {
    let dir = tempfile::tempdir().unwrap();
    let bench_dir = dir.path().join("_bench");
    let cfg = ReportCfg::default().with_bench_command(&[
        "sh",
        "-c",
        "printf '{\"bench\": \"%s\"}' \"$1\" > \"$DIVAN_WRITE_FILE\"",
        "sh",
    ]);

    let dest = run_benchmark(dir.path(), &bench_dir, "tables", false, &cfg).unwrap();
    assert_eq!(read_json(&dest), json!({ "bench": "tables" }));
}

#[cfg(unix)]
#[test]
fn test_workspace_output_is_truncated() {
    let dir = tempfile::tempdir().unwrap();
    let output = dir.path().join("data.json");
    fs::write(&output, "stale\n").unwrap();
    let cfg = ReportCfg::default()
        .with_bench_command(&["sh", "-c", "echo fresh >> \"$DIVAN_WRITE_FILE\""]);

    run_workspace(dir.path(), &output, &cfg).unwrap();
    assert_eq!(fs::read_to_string(&output).unwrap(), "fresh\n");
}
