//! Regeneration of a report's artifacts: drawio diagrams to PDF and `.graph` files to plots.

use crate::{
    output::{render_graph, OutputFormat},
    pool::{run_batch, run_blocking_batch, BatchReport},
    tools::ToolCommand,
    Graph, ReportCfg, ReportError,
};
use std::{
    fs, io,
    path::{Path, PathBuf},
    sync::Arc,
};
use walkdir::WalkDir;

/// Directories of a report checkout, all derived from the report directory.
#[derive(Debug, Clone, PartialEq)]
pub struct ReportDirs {
    pub report: PathBuf,
    pub drawio: PathBuf,
    pub plots: PathBuf,
    pub bench: PathBuf,
    pub experiments: PathBuf,
}

impl ReportDirs {
    /// `_drawio`, `_plots` and `_bench` inside `report`; `experiments` next to it.
    pub fn new(report: impl Into<PathBuf>) -> Self {
        let report = report.into();
        let experiments = report
            .parent()
            .map(|p| p.join("experiments"))
            .unwrap_or_else(|| PathBuf::from("experiments"));
        Self {
            drawio: report.join("_drawio"),
            plots: report.join("_plots"),
            bench: report.join("_bench"),
            experiments,
            report,
        }
    }
}

/// One source file and the artifact it becomes.
#[derive(Debug, Clone, PartialEq)]
pub struct ArtifactJob {
    pub source: PathBuf,
    pub target: PathBuf,
}

/// Files under `base` with extension `suffix` whose names don't start with `_`, sorted.
pub fn find_sources(base: &Path, suffix: &str) -> Result<Vec<PathBuf>, ReportError> {
    let mut found = Vec::new();
    for entry in WalkDir::new(base) {
        let entry = entry.map_err(|e| {
            let path = e.path().unwrap_or(base).to_path_buf();
            ReportError::io(path, e.into())
        })?;
        let name = entry.file_name().to_string_lossy();
        if entry.file_type().is_file()
            && !name.starts_with('_')
            && entry.path().extension().is_some_and(|ext| ext == suffix)
        {
            found.push(entry.into_path());
        }
    }
    found.sort();
    Ok(found)
}

/// `source`'s path relative to `base`, under `artifacts`, with extension `ext`.
pub fn artifact_path(base: &Path, artifacts: &Path, source: &Path, ext: &str) -> PathBuf {
    let relative = source.strip_prefix(base).unwrap_or(source);
    artifacts.join(relative).with_extension(ext)
}

/// Finds the sources under `base` (or `base/subdir`), clears their artifact directory, and
/// pairs each source with its target.
pub fn plan_jobs(
    base: &Path,
    artifacts: &Path,
    subdir: Option<&Path>,
    suffix: &str,
    ext: &str,
) -> Result<Vec<ArtifactJob>, ReportError> {
    let (base, artifacts) = match subdir {
        Some(sub) => (base.join(sub), artifacts.join(sub)),
        None => (base.to_path_buf(), artifacts.to_path_buf()),
    };
    log::info!("generating {suffix} artifacts for {}", base.display());
    let jobs: Vec<ArtifactJob> = find_sources(&base, suffix)?
        .into_iter()
        .map(|source| ArtifactJob {
            target: artifact_path(&base, &artifacts, &source, ext),
            source,
        })
        .collect();
    clear_dir(&artifacts)?;
    Ok(jobs)
}

fn clear_dir(dir: &Path) -> Result<(), ReportError> {
    match fs::remove_dir_all(dir) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(ReportError::io(dir, e)),
    }
}

fn create_parent(path: &Path) -> Result<(), ReportError> {
    match path.parent() {
        Some(parent) => fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e)),
        None => Ok(()),
    }
}

/// Converts every `.drawio` file of the report to PDF under `_drawio/`.
pub async fn convert_drawios(
    dirs: &ReportDirs,
    subdir: Option<&Path>,
    cfg: &ReportCfg,
) -> Result<BatchReport<ArtifactJob, PathBuf>, ReportError> {
    log::trace!("entering `convert_drawios`");
    let jobs = plan_jobs(&dirs.report, &dirs.drawio, subdir, "drawio", "pdf")?;
    let template = Arc::new(cfg.drawio_command.clone());
    let report = run_batch(jobs, cfg.concurrency, move |job: ArtifactJob| {
        let template = template.clone();
        async move {
            create_parent(&job.target)?;
            ToolCommand::from_template(&template, &job.source, &job.target)?
                .run_async()
                .await?;
            log::info!("transformed {}", job.target.display());
            Ok(job.target)
        }
    })
    .await;
    Ok(report)
}

/// Draws every `.graph` file of the report as a PDF under `_plots/`. The graph is the one
/// named by the file's stem; it reads `bench_file` or its own file in `_bench/`, see
/// [`Graph::input_path`].
pub async fn generate_plots(
    dirs: &ReportDirs,
    subdir: Option<&Path>,
    bench_file: &Path,
    cfg: &ReportCfg,
) -> Result<BatchReport<ArtifactJob, Vec<PathBuf>>, ReportError> {
    log::trace!("entering `generate_plots`");
    let jobs = plan_jobs(&dirs.report, &dirs.plots, subdir, "graph", "pdf")?;
    let bench_file = bench_file.to_path_buf();
    let bench_dir = dirs.bench.clone();
    let worker_cfg = cfg.clone();
    let report = run_blocking_batch(jobs, cfg.concurrency, move |job: ArtifactJob| {
        let stem = job
            .source
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();
        let graph = Graph::from_name(&stem)?;
        create_parent(&job.target)?;
        let input = graph.input_path(&bench_file, &bench_dir);
        render_graph(graph, &input, &job.target, OutputFormat::Pdf, &worker_cfg)
    })
    .await;
    Ok(report)
}

/// Draws each of `graphs` from `<input_dir>/<name>.json` into `<output_dir>/<name>.<ext>`.
pub async fn generate_graphs(
    input_dir: &Path,
    output_dir: &Path,
    graphs: Vec<Graph>,
    format: OutputFormat,
    cfg: &ReportCfg,
) -> BatchReport<Graph, Vec<PathBuf>> {
    log::trace!("entering `generate_graphs`");
    let input_dir = input_dir.to_path_buf();
    let output_dir = output_dir.to_path_buf();
    let worker_cfg = cfg.clone();
    run_blocking_batch(graphs, cfg.concurrency, move |graph: Graph| {
        let input = input_dir.join(format!("{}.json", graph.name()));
        let output = output_dir.join(graph.name()).with_extension(format.extension());
        render_graph(graph, &input, &output, format, &worker_cfg)
    })
    .await
}
