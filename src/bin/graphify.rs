//! Takes json output from divan and converts it into a graph for latex.

use anyhow::Context;
use bench_report::{render_graph, Graph, OutputFormat, ReportCfg};
use clap::Parser;
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(
    name = "graphify",
    about = "divan benchmark processing and graph creation",
    after_help = "Have a wonderful day!"
)]
struct Args {
    /// The input divan json file to process.
    #[arg(long)]
    input: PathBuf,

    /// The output file to write to.
    #[arg(long)]
    output: PathBuf,

    /// The graph to draw.
    #[arg(long, value_enum)]
    graph: Graph,

    /// Output as a file (tex, pdf) or shown in the viewer.
    #[arg(long, value_enum, default_value_t = OutputFormat::Tex)]
    format: OutputFormat,

    /// TOML configuration file.
    #[arg(long)]
    config: Option<PathBuf>,
}

fn main() -> anyhow::Result<()> {
    _ = env_logger::try_init();
    let args = Args::parse();

    let cfg = ReportCfg::load(args.config.as_deref())
        .with_context(|| format!("loading configuration {:?}", args.config))?;
    let written = render_graph(args.graph, &args.input, &args.output, args.format, &cfg)
        .with_context(|| {
            format!(
                "drawing {} from {}",
                args.graph.name(),
                args.input.display()
            )
        })?;

    for path in written {
        println!("{}", path.display());
    }
    Ok(())
}
