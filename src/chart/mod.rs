//! Chart kinds, drawn with plotters onto any drawing backend.

mod bars;
mod line;
mod speedup;

use crate::{
    normalize::{to_rates, without_zero_scale},
    BarLayout, BenchTable, BenchmarkRow, ChartPalette, RateRow, ReportError,
};
use plotters::{
    chart::ChartContext,
    coord::{CoordTranslate, Shift},
    prelude::*,
    style::text_anchor::{HPos, Pos, VPos},
};

pub(crate) const FONT: &str = "sans-serif";
pub(crate) const CAPTION_SIZE: u32 = 22;
pub(crate) const DESC_SIZE: u32 = 16;
pub(crate) const TICK_SIZE: u32 = 13;

/// What to draw from a table of rows. Timing charts read picoseconds; rate charts
/// convert rows with [`to_rates`] first.
#[derive(Debug, Clone, PartialEq)]
pub enum ChartKind {
    /// Mean time against the parameter per variant, with a fastest..slowest band.
    TimeLine { title: String, param: String },
    /// Rows per second against the parameter per variant, with a band.
    RateLine { title: String, param: String },
    /// Times of each variant at `param_value`, relative to the smallest mean.
    Speedup { title: String, param_value: u64 },
    /// Mean-rate bars of all queries side by side, grouped by query and scale factor.
    GroupedBars,
    /// Mean-rate bars, one panel per query.
    SeparateBars,
    /// Mean-rate lines, one panel per query.
    SeparateLines,
}

/// Everything about a chart's appearance that does not come from the data.
#[derive(Debug, Clone)]
pub struct ChartStyle {
    pub palette: ChartPalette,
    pub layout: BarLayout,
    /// Whether to draw the legend; chunked charts draw it on the first chunk only.
    pub legend: bool,
}

impl Default for ChartStyle {
    fn default() -> Self {
        Self {
            palette: ChartPalette::databases(),
            layout: BarLayout::default(),
            legend: true,
        }
    }
}

impl ChartStyle {
    pub fn with_legend(&self, legend: bool) -> Self {
        Self {
            legend,
            ..self.clone()
        }
    }
}

impl ChartKind {
    /// Draws `table` onto `area`.
    ///
    /// # Errors
    /// - [`ReportError::MalformedInput`] if `table` is empty.
    /// - [`ReportError::DivisionByZero`] if a rate chart gets a zero timing.
    /// - [`ReportError::Render`] if the backend fails.
    pub fn draw<DB: DrawingBackend>(
        &self,
        area: &DrawingArea<DB, Shift>,
        table: &BenchTable<BenchmarkRow>,
        style: &ChartStyle,
    ) -> Result<(), ReportError> {
        log::trace!("entering `draw` for {self:?}");
        if table.is_empty() {
            return Err(ReportError::MalformedInput("no timed rows to plot".to_owned()));
        }
        area.fill(&WHITE)?;
        match self {
            ChartKind::TimeLine { title, param } => line::time_line(area, table, title, param, style),
            ChartKind::RateLine { title, param } => line::rate_line(area, table, title, param, style),
            ChartKind::Speedup { title, param_value } => {
                speedup::speedup(area, table, title, *param_value)
            }
            ChartKind::GroupedBars => bars::grouped_bars(area, table, style),
            ChartKind::SeparateBars => bars::separate_bars(area, table, style),
            ChartKind::SeparateLines => bars::separate_lines(area, table, style),
        }?;
        area.present()?;
        Ok(())
    }
}

/// Rate rows of `table` without zero scale factors, sorted by scale factor.
pub(crate) fn rate_table(table: &BenchTable<BenchmarkRow>) -> Result<BenchTable<RateRow>, ReportError> {
    let rows = without_zero_scale(table.sorted_by_scale_factor().into_inner());
    let rates = BenchTable::from(to_rates(&rows)?);
    if rates.is_empty() {
        return Err(ReportError::MalformedInput("no rows with a non-zero scale factor".to_owned()));
    }
    Ok(rates)
}

pub(crate) fn text_style(size: u32, h: HPos, v: VPos) -> TextStyle<'static> {
    TextStyle::from((FONT, size).into_font()).pos(Pos::new(h, v))
}

/// Draws text at data coordinates, shifted by `offset` pixels.
pub(crate) fn draw_labels<DB, CT>(
    chart: &mut ChartContext<'_, DB, CT>,
    labels: impl IntoIterator<Item = ((f64, f64), String)>,
    offset: (i32, i32),
    style: &TextStyle<'static>,
) -> Result<(), ReportError>
where
    DB: DrawingBackend,
    CT: CoordTranslate<From = (f64, f64)>,
{
    chart.draw_series(
        labels
            .into_iter()
            .map(|(at, text)| EmptyElement::at(at) + Text::new(text, offset, style.clone())),
    )?;
    Ok(())
}

/// Whisker for one data point: a vertical line from fastest to slowest with caps, plus
/// horizontal marks for the median and the mean.
pub(crate) fn whisker(
    x: f64,
    half_width: f64,
    fastest: f64,
    slowest: f64,
    marks: &[(f64, RGBColor)],
    colour: RGBColor,
) -> Vec<PathElement<(f64, f64)>> {
    let cap = |y: f64, c: RGBColor| PathElement::new(vec![(x - half_width, y), (x + half_width, y)], c);
    let mut elements = vec![
        PathElement::new(vec![(x, fastest), (x, slowest)], colour),
        cap(fastest, colour),
        cap(slowest, colour),
    ];
    elements.extend(marks.iter().map(|(y, c)| cap(*y, *c)));
    elements
}
