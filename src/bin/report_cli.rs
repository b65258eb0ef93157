//! Manages the report artifacts (plots, drawio images) and the benchmark results they use.

use anyhow::{bail, Context};
use bench_report::{
    artifacts::{self, ArtifactJob, ReportDirs},
    bench_runner::{self, ALL_DATA_NAME},
    pool::BatchReport,
    Graph, OutputFormat, ReportCfg, ReportError,
};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};

#[derive(Debug, Parser)]
#[command(
    name = "report_cli",
    about = "Manages the report artifacts (plots, tables, drawio images)",
    after_help = "Have a wonderful day!"
)]
struct Args {
    /// The directory containing the report.
    #[arg(long, default_value = ".")]
    report_dir: PathBuf,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Cmd,
}

#[derive(Debug, Subcommand)]
enum Cmd {
    /// Drawio image -> pdf transformations.
    Drawio {
        /// Convert drawios for this directory of the report only.
        #[arg(long, value_name = "PATH")]
        subdir: Option<PathBuf>,
    },
    /// Generate the report's plots from the `.graph` files.
    Plots {
        /// Generate plots for this directory of the report only.
        #[arg(long, value_name = "PATH")]
        subdir: Option<PathBuf>,
        /// Rerun the benchmark even if its results exist.
        #[arg(long)]
        no_cache: bool,
    },
    /// Run a workspace's benchmarks and split the results per benchmark.
    Bench {
        /// Workspace to run the benchmarks in.
        #[arg(long)]
        workspace: PathBuf,
        /// Directory to place the resulting files.
        #[arg(long)]
        output_dir: PathBuf,
        /// Rerun the benchmarks instead of splitting the existing results.
        #[arg(long)]
        rerun: bool,
    },
    /// Draw graphs from the per-benchmark files written by `split`.
    Graphs {
        /// Directory containing the `<graph>.json` benchmark files.
        #[arg(long)]
        input_dir: PathBuf,
        /// Directory to place the resulting graphs.
        #[arg(long)]
        output_dir: PathBuf,
        /// The graph to draw, or `all`.
        #[arg(long, value_parser = parse_graphs)]
        graph: GraphChoice,
        #[arg(long, value_enum, default_value_t = OutputFormat::Tex)]
        format: OutputFormat,
    },
    /// Split a combined results file into one file per benchmark.
    Split {
        #[arg(long)]
        input: PathBuf,
        #[arg(long)]
        output_dir: PathBuf,
    },
}

#[derive(Debug, Clone)]
struct GraphChoice(Vec<Graph>);

/// `all` or the name of a graph drawn from a per-benchmark file.
fn parse_graphs(name: &str) -> Result<GraphChoice, ReportError> {
    if name == "all" {
        return Ok(GraphChoice(Graph::documents().collect()));
    }
    let graph = Graph::from_name(name)?;
    if Graph::documents().any(|g| g == graph) {
        Ok(GraphChoice(vec![graph]))
    } else {
        Err(ReportError::Config(format!(
            "{name} is drawn from the combined output file, use graphify"
        )))
    }
}

fn summarize<T>(what: &str, report: &BatchReport<ArtifactJob, T>) -> anyhow::Result<()> {
    for (job, _) in &report.succeeded {
        println!("✅ {}", job.target.display());
    }
    for (job, e) in &report.failed {
        eprintln!("❌ {}: {e}", job.source.display());
    }
    if !report.is_success() {
        bail!("{} of {} {what} failed", report.failed.len(), report.len());
    }
    Ok(())
}

fn main() -> anyhow::Result<()> {
    _ = env_logger::try_init();
    let args = Args::parse();
    log::debug!("{args:?}");
    let cfg = ReportCfg::load(args.config.as_deref())
        .with_context(|| format!("loading configuration {:?}", args.config))?;
    let dirs = ReportDirs::new(&args.report_dir);

    let rt = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
        .context("starting the runtime")?;

    match args.command {
        Cmd::Drawio { subdir } => {
            let report = rt.block_on(artifacts::convert_drawios(&dirs, subdir.as_deref(), &cfg))?;
            summarize("drawio conversions", &report)
        }
        Cmd::Plots { subdir, no_cache } => {
            let bench_file = bench_runner::run_benchmark(
                &dirs.experiments,
                &dirs.bench,
                &cfg.bench_name,
                !no_cache,
                &cfg,
            )
            .context("running the benchmarks")?;
            let report = rt.block_on(artifacts::generate_plots(
                &dirs,
                subdir.as_deref(),
                &bench_file,
                &cfg,
            ))?;
            summarize("plots", &report)
        }
        Cmd::Bench {
            workspace,
            output_dir,
            rerun,
        } => {
            let all_data = workspace.join(ALL_DATA_NAME);
            if rerun {
                bench_runner::run_workspace(&workspace, &all_data, &cfg)
                    .context("running the workspace benchmarks")?;
            }
            split(&all_data, &output_dir)
        }
        Cmd::Graphs {
            input_dir,
            output_dir,
            graph,
            format,
        } => {
            let report = rt.block_on(artifacts::generate_graphs(
                &input_dir,
                &output_dir,
                graph.0,
                format,
                &cfg,
            ));
            for (graph, paths) in &report.succeeded {
                for path in paths {
                    println!("✅ {}: {}", graph.name(), path.display());
                }
            }
            for (graph, e) in &report.failed {
                eprintln!("❌ {}: {e}", graph.name());
            }
            if !report.is_success() {
                bail!("{} of {} graphs failed", report.failed.len(), report.len());
            }
            Ok(())
        }
        Cmd::Split { input, output_dir } => split(&input, &output_dir),
    }
}

fn split(input: &Path, output_dir: &Path) -> anyhow::Result<()> {
    let written = bench_runner::split_benchmarks(input, output_dir)
        .with_context(|| format!("splitting {}", input.display()))?;
    for path in written {
        println!("✅ written {}", path.display());
    }
    Ok(())
}
