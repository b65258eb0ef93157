//! Running the divan benchmarks and splitting their combined output.

use crate::{tools::ToolCommand, ReportCfg, ReportError};
use serde_json::Value;
use std::{
    fs,
    path::{Path, PathBuf},
};

/// Environment variable divan writes its JSON output to.
pub const DIVAN_WRITE_FILE: &str = "DIVAN_WRITE_FILE";

/// Name of the combined output file in a workspace.
pub const ALL_DATA_NAME: &str = "data.json";

/// Runs benchmark `name` in `experiments_dir`, writing its output to `<bench_dir>/<name>.json`.
/// With `use_cache`, an existing output file is used as is.
pub fn run_benchmark(
    experiments_dir: &Path,
    bench_dir: &Path,
    name: &str,
    use_cache: bool,
    cfg: &ReportCfg,
) -> Result<PathBuf, ReportError> {
    fs::create_dir_all(bench_dir).map_err(|e| ReportError::io(bench_dir, e))?;
    let dest = bench_dir.join(format!("{name}.json"));
    if use_cache && dest.exists() {
        log::info!("cached benchmark results for {name} used");
        return Ok(dest);
    }

    log::info!("running benchmark for {name}");
    if dest.exists() {
        fs::remove_file(&dest).map_err(|e| ReportError::io(&dest, e))?;
    }
    bench_command(cfg, &dest, experiments_dir)?.arg(name).run()?;
    Ok(dest)
}

/// Runs every benchmark of `workspace`, truncating `output_file` first.
pub fn run_workspace(workspace: &Path, output_file: &Path, cfg: &ReportCfg) -> Result<(), ReportError> {
    log::info!("running all benchmarks in {}", workspace.display());
    fs::write(output_file, "").map_err(|e| ReportError::io(output_file, e))?;
    bench_command(cfg, output_file, workspace)?.run()?;
    Ok(())
}

fn bench_command(cfg: &ReportCfg, dest: &Path, cwd: &Path) -> Result<ToolCommand, ReportError> {
    Ok(ToolCommand::from_template(&cfg.bench_command, Path::new(""), dest)?
        .env(DIVAN_WRITE_FILE, dest.to_string_lossy())
        .current_dir(cwd))
}

/// Splits a combined output file into one `<name>.json` per benchmark in `output_dir`.
///
/// The file holds one JSON object per line, each `{"benchmarks": {<name>: <results>, ..}}`.
/// A benchmark appearing on several lines keeps its last results. Returns the files written.
pub fn split_benchmarks(all_bench_file: &Path, output_dir: &Path) -> Result<Vec<PathBuf>, ReportError> {
    log::trace!("entering `split_benchmarks`: {}", all_bench_file.display());
    let text = fs::read_to_string(all_bench_file).map_err(|e| ReportError::io(all_bench_file, e))?;
    fs::create_dir_all(output_dir).map_err(|e| ReportError::io(output_dir, e))?;

    let mut written: Vec<PathBuf> = Vec::new();
    for (line_no, line) in text.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let value: Value = serde_json::from_str(line)?;
        let Some(Value::Object(benchmarks)) = value.get("benchmarks") else {
            return Err(ReportError::missing_key(
                "benchmarks",
                format!("line {} of {}", line_no + 1, all_bench_file.display()),
            ));
        };
        for (name, results) in benchmarks {
            let path = output_dir.join(format!("{name}.json"));
            fs::write(&path, serde_json::to_vec(results)?).map_err(|e| ReportError::io(&path, e))?;
            log::info!("written {}", path.display());
            if !written.contains(&path) {
                written.push(path);
            }
        }
    }
    Ok(written)
}
