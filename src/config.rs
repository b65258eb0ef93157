//! Report configuration: chart size, palette, external tool command lines, and concurrency.

use crate::{BarLayout, ChartPalette, ReportError};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::{fs, path::Path, thread};

/// Colours of one variant as written in a config file.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColourEntry {
    pub mean: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub median: Option<String>,
}

/// Configuration shared by `graphify` and `report_cli`.
///
/// Command lines are argument vectors in which `{input}` and `{output}` are replaced by the
/// paths of the unit being processed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReportCfg {
    /// Maximum number of artifacts generated at the same time.
    pub concurrency: usize,
    /// Chart size in pixels (SVG) or TikZ points.
    pub width: u32,
    pub height: u32,
    pub drawio_command: Vec<String>,
    pub pdf_command: Vec<String>,
    pub viewer_command: Vec<String>,
    /// Benchmark command; the benchmark name is appended when one is given.
    pub bench_command: Vec<String>,
    /// Benchmark whose output the `.graph` files of a report are drawn from.
    pub bench_name: String,
    /// Colours for known variants, added on top of the built-in database colours.
    pub palette: IndexMap<String, ColourEntry>,
}

impl Default for ReportCfg {
    /// Instantiates a default [`ReportCfg`]:
    /// - `concurrency` of the available parallelism (1 if unknown),
    /// - charts of 1000x400,
    /// - `drawio` for diagrams, `rsvg-convert` for SVG to PDF, `xdg-open` as viewer,
    /// - `cargo bench` of the `tables` benchmark,
    /// - no palette entries beyond [`ChartPalette::databases`].
    fn default() -> Self {
        let args = |xs: &[&str]| xs.iter().map(|s| s.to_string()).collect::<Vec<_>>();
        Self {
            concurrency: thread::available_parallelism().map_or(1, |n| n.get()),
            width: 1000,
            height: 400,
            drawio_command: args(&[
                "drawio", "{input}", "-x", "--format", "pdf", "-t", "--crop", "-o", "{output}",
            ]),
            pdf_command: args(&["rsvg-convert", "-f", "pdf", "-o", "{output}", "{input}"]),
            viewer_command: args(&["xdg-open", "{input}"]),
            bench_command: args(&["cargo", "bench"]),
            bench_name: "tables".to_owned(),
            palette: IndexMap::new(),
        }
    }
}

impl ReportCfg {
    /// Reads a TOML config file; keys absent from the file keep their default values.
    pub fn from_toml_file(path: &Path) -> Result<Self, ReportError> {
        let text = fs::read_to_string(path).map_err(|e| ReportError::io(path, e))?;
        Self::from_toml_str(&text)
    }

    pub fn from_toml_str(text: &str) -> Result<Self, ReportError> {
        let cfg: Self = toml::from_str(text)
            .map_err(|e| ReportError::Config(format!("toml parse error: {e}")))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Loads `path` if given, the defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self, ReportError> {
        match path {
            Some(path) => Self::from_toml_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<(), ReportError> {
        if self.concurrency == 0 {
            return Err(ReportError::Config("concurrency must be at least 1".to_owned()));
        }
        if self.width == 0 || self.height == 0 {
            return Err(ReportError::Config("chart size must be non-zero".to_owned()));
        }
        for (name, command) in [
            ("drawio_command", &self.drawio_command),
            ("pdf_command", &self.pdf_command),
            ("viewer_command", &self.viewer_command),
            ("bench_command", &self.bench_command),
        ] {
            if command.is_empty() {
                return Err(ReportError::Config(format!("{name} is empty")));
            }
        }
        self.chart_palette()?;
        Ok(())
    }

    /// The built-in database colours overridden by the configured entries.
    pub fn chart_palette(&self) -> Result<ChartPalette, ReportError> {
        let configured = ChartPalette::from_hex(
            self.palette
                .iter()
                .map(|(k, v)| (k.as_str(), v.mean.as_str(), v.median.as_deref())),
        )?;
        let mut palette = ChartPalette::databases();
        for (variant, _) in &self.palette {
            palette = palette.with_variant(variant, configured.colours(variant, 0));
        }
        Ok(palette)
    }

    pub fn layout(&self) -> BarLayout {
        BarLayout::default()
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Creates a new [`ReportCfg`] the same as `self` but with the given `concurrency`.
    pub fn with_concurrency(&self, concurrency: usize) -> Self {
        Self {
            concurrency,
            ..self.clone()
        }
    }

    /// Creates a new [`ReportCfg`] the same as `self` but with the given chart size.
    pub fn with_size(&self, width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            ..self.clone()
        }
    }

    pub fn with_drawio_command(&self, command: &[&str]) -> Self {
        Self {
            drawio_command: command.iter().map(|s| s.to_string()).collect(),
            ..self.clone()
        }
    }

    pub fn with_pdf_command(&self, command: &[&str]) -> Self {
        Self {
            pdf_command: command.iter().map(|s| s.to_string()).collect(),
            ..self.clone()
        }
    }

    pub fn with_viewer_command(&self, command: &[&str]) -> Self {
        Self {
            viewer_command: command.iter().map(|s| s.to_string()).collect(),
            ..self.clone()
        }
    }

    pub fn with_bench_command(&self, command: &[&str]) -> Self {
        Self {
            bench_command: command.iter().map(|s| s.to_string()).collect(),
            ..self.clone()
        }
    }

    /// Creates a new [`ReportCfg`] the same as `self` but with colours for `variant`.
    pub fn with_colour(&self, variant: &str, mean: &str, median: Option<&str>) -> Self {
        let mut palette = self.palette.clone();
        palette.insert(
            variant.to_owned(),
            ColourEntry {
                mean: mean.to_owned(),
                median: median.map(str::to_owned),
            },
        );
        Self {
            palette,
            ..self.clone()
        }
    }
}
