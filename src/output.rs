//! Rendering a chart to its output format.

use crate::{
    tikz::TikzBackend, tools::ToolCommand, BenchTable, BenchmarkRow, ChartKind, ChartStyle, Graph,
    ReportCfg, ReportError,
};
use clap::ValueEnum;
use plotters::prelude::*;
use std::{
    fs,
    io::Write,
    path::{Path, PathBuf},
};

/// What to do with a rendered chart; exactly one per invocation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum)]
pub enum OutputFormat {
    /// Open an SVG of the chart in the viewer.
    Show,
    /// Write a TikZ picture.
    #[default]
    Tex,
    /// Write a PDF, converted from SVG by the external converter.
    Pdf,
}

impl OutputFormat {
    /// Extension of the files written in this format.
    pub fn extension(&self) -> &'static str {
        match self {
            OutputFormat::Show => "svg",
            OutputFormat::Tex => "tex",
            OutputFormat::Pdf => "pdf",
        }
    }
}

pub fn render_svg(
    kind: &ChartKind,
    table: &BenchTable<BenchmarkRow>,
    style: &ChartStyle,
    size: (u32, u32),
) -> Result<String, ReportError> {
    let mut svg = String::new();
    {
        let root = SVGBackend::with_string(&mut svg, size).into_drawing_area();
        kind.draw(&root, table, style)?;
    }
    Ok(svg)
}

pub fn render_tikz(
    kind: &ChartKind,
    table: &BenchTable<BenchmarkRow>,
    style: &ChartStyle,
    size: (u32, u32),
) -> Result<String, ReportError> {
    let mut tex = String::new();
    {
        let root = TikzBackend::with_string(&mut tex, size).into_drawing_area();
        kind.draw(&root, table, style)?;
    }
    Ok(tex)
}

/// `output` for a single chart, `<stem>_<index>.<ext>` next to it when there are several.
pub fn chunk_path(output: &Path, index: usize, chunks: usize) -> PathBuf {
    if chunks <= 1 {
        return output.to_path_buf();
    }
    let stem = output
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default();
    let name = match output.extension() {
        Some(ext) => format!("{stem}_{index}.{}", ext.to_string_lossy()),
        None => format!("{stem}_{index}"),
    };
    output.with_file_name(name)
}

fn write_file(path: &Path, contents: &[u8]) -> Result<(), ReportError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
    }
    fs::write(path, contents).map_err(|e| ReportError::io(path, e))
}

fn svg_temp_file(svg: &str) -> Result<tempfile::NamedTempFile, ReportError> {
    let tmp_dir = std::env::temp_dir();
    let mut file = tempfile::Builder::new()
        .prefix("bench_report_")
        .suffix(".svg")
        .tempfile()
        .map_err(|e| ReportError::io(&tmp_dir, e))?;
    file.write_all(svg.as_bytes())
        .map_err(|e| ReportError::io(file.path(), e))?;
    Ok(file)
}

/// Renders one chart in `format`, returning the path of the file produced.
pub fn render_chart(
    kind: &ChartKind,
    table: &BenchTable<BenchmarkRow>,
    style: &ChartStyle,
    format: OutputFormat,
    output: &Path,
    cfg: &ReportCfg,
) -> Result<PathBuf, ReportError> {
    match format {
        OutputFormat::Tex => {
            let tex = render_tikz(kind, table, style, cfg.size())?;
            write_file(output, tex.as_bytes())?;
            Ok(output.to_path_buf())
        }
        OutputFormat::Pdf => {
            let svg = svg_temp_file(&render_svg(kind, table, style, cfg.size())?)?;
            if let Some(parent) = output.parent().filter(|p| !p.as_os_str().is_empty()) {
                fs::create_dir_all(parent).map_err(|e| ReportError::io(parent, e))?;
            }
            ToolCommand::from_template(&cfg.pdf_command, svg.path(), output)?.run()?;
            Ok(output.to_path_buf())
        }
        OutputFormat::Show => {
            let svg = svg_temp_file(&render_svg(kind, table, style, cfg.size())?)?;
            // The viewer may read the file after we return, so it is not deleted.
            let path = svg
                .into_temp_path()
                .keep()
                .map_err(|e| ReportError::io(std::env::temp_dir(), e.error))?;
            ToolCommand::from_template(&cfg.viewer_command, &path, output)?.run()?;
            Ok(path)
        }
    }
}

/// Draws `graph` from the file at `input` and emits it in `format` at `output` (one file per
/// chunk for chunked graphs). Returns the files produced.
pub fn render_graph(
    graph: Graph,
    input: &Path,
    output: &Path,
    format: OutputFormat,
    cfg: &ReportCfg,
) -> Result<Vec<PathBuf>, ReportError> {
    log::trace!("entering `render_graph`: {}", graph.name());
    let spec = graph.spec();
    let table = spec.load(input)?;
    let chunks = spec.chunks(&table);
    let style = ChartStyle {
        palette: cfg.chart_palette()?,
        layout: cfg.layout(),
        legend: true,
    };

    let mut written = Vec::with_capacity(chunks.len());
    for (index, chunk) in chunks.iter().enumerate() {
        let path = chunk_path(output, index, chunks.len());
        let path = render_chart(
            &spec.kind,
            chunk,
            &style.with_legend(index == 0),
            format,
            &path,
            cfg,
        )?;
        log::info!("{} written to {}", graph.name(), path.display());
        written.push(path);
    }
    Ok(written)
}
