use super::{rate_table, ChartStyle, CAPTION_SIZE, DESC_SIZE, FONT, TICK_SIZE};
use crate::{
    units::{format_param, format_time, PICOS_PER_SEC},
    BenchTable, BenchmarkRow, Row, ReportError, StatQuadruple,
};
use plotters::{coord::Shift, prelude::*};

/// Points of one variant's series: `(param, stats)` sorted by param.
type Series = (String, Vec<(f64, StatQuadruple)>);

fn series_by_variant<R: Row + Clone>(table: &BenchTable<R>) -> Vec<Series> {
    let sorted = table.sorted_by_scale_factor();
    sorted
        .variants()
        .into_iter()
        .map(|variant| {
            let points = sorted
                .iter()
                .filter(|r| r.variant() == variant)
                .map(|r| (r.scale_factor() as f64, *r.stats()))
                .collect();
            (variant.to_owned(), points)
        })
        .collect()
}

/// Closed band between `low` and `high` of each point.
fn band(points: &[(f64, StatQuadruple)], low: fn(&StatQuadruple) -> f64, high: fn(&StatQuadruple) -> f64) -> Vec<(f64, f64)> {
    points
        .iter()
        .map(|(x, s)| (*x, high(s)))
        .chain(points.iter().rev().map(|(x, s)| (*x, low(s))))
        .collect()
}

fn param_range(table: &BenchTable<BenchmarkRow>) -> Result<(f64, f64), ReportError> {
    let params = table.scale_factors();
    let min = params.iter().copied().filter(|p| *p > 0).min();
    let max = params.iter().copied().max();
    match (min, max) {
        (Some(min), Some(max)) => Ok((1f64.max(min as f64 / 2.0), max as f64 * 2.0)),
        _ => Err(ReportError::MalformedInput(
            "log-scaled parameter axis needs a positive parameter".to_owned(),
        )),
    }
}

pub(super) fn time_line<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    table: &BenchTable<BenchmarkRow>,
    title: &str,
    param: &str,
    style: &ChartStyle,
) -> Result<(), ReportError> {
    let table = table.filtered(|r| r.scale_factor > 0);
    let (x_min, x_max) = param_range(&table)?;
    let y_max = table.max_by_field(|r| r.stats.slowest).unwrap_or(1.0).max(1.0) * 1.05;

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, CAPTION_SIZE))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d((x_min..x_max).log_scale().base(2.0), 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(param)
        .y_desc("Time")
        .x_label_formatter(&|x| format_param(*x))
        .y_label_formatter(&|y| format_time(*y))
        .label_style((FONT, TICK_SIZE))
        .axis_desc_style((FONT, DESC_SIZE))
        .draw()?;

    for p in table.scale_factors() {
        let x = p as f64;
        chart.draw_series(LineSeries::new([(x, 0.0), (x, y_max)], BLUE.mix(0.3)))?;
    }

    for (idx, (variant, points)) in series_by_variant(&table).into_iter().enumerate() {
        let colour = style.palette.mean(&variant, idx);
        chart.draw_series(std::iter::once(Polygon::new(
            band(&points, |s| s.fastest, |s| s.slowest),
            colour.mix(0.2).filled(),
        )))?;
        chart
            .draw_series(LineSeries::new(
                points.iter().map(|(x, s)| (*x, s.mean)),
                colour.stroke_width(2),
            ))?
            .label(variant)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], colour.stroke_width(2)));
    }

    if style.legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperLeft)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((FONT, TICK_SIZE))
            .draw()?;
    }
    Ok(())
}

pub(super) fn rate_line<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    table: &BenchTable<BenchmarkRow>,
    title: &str,
    param: &str,
    style: &ChartStyle,
) -> Result<(), ReportError> {
    // Rates are per picosecond; rows per second is the same ratio scaled.
    let rates = rate_table(table)?;
    let per_sec = |r: &crate::RateRow| r.rates.scaled(PICOS_PER_SEC);
    let (x_min, x_max) = param_range(table)?;
    let y_min = rates
        .iter()
        .map(|r| per_sec(r).slowest)
        .fold(f64::INFINITY, f64::min);
    let y_max = rates.max_by_field(|r| per_sec(r).fastest).unwrap_or(1.0);
    if !(y_min.is_finite() && y_min > 0.0) {
        return Err(ReportError::MalformedInput("rates must be positive for a log axis".to_owned()));
    }

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, CAPTION_SIZE))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(
            (x_min..x_max).log_scale().base(2.0),
            (y_min / 2.0..y_max * 2.0).log_scale(),
        )?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(param)
        .y_desc("Rows / s")
        .x_label_formatter(&|x| format_param(*x))
        .y_label_formatter(&|y| format!("{y:.0e}"))
        .label_style((FONT, TICK_SIZE))
        .axis_desc_style((FONT, DESC_SIZE))
        .draw()?;

    for p in rates.scale_factors() {
        let x = p as f64;
        chart.draw_series(LineSeries::new([(x, y_min / 2.0), (x, y_max * 2.0)], BLUE.mix(0.3)))?;
    }

    for (idx, (variant, points)) in series_by_variant(&rates).into_iter().enumerate() {
        let colour = style.palette.mean(&variant, idx);
        let points: Vec<(f64, StatQuadruple)> = points
            .into_iter()
            .map(|(x, s)| (x, s.scaled(PICOS_PER_SEC)))
            .collect();
        chart.draw_series(std::iter::once(Polygon::new(
            band(&points, |s| s.slowest, |s| s.fastest),
            colour.mix(0.2).filled(),
        )))?;
        chart
            .draw_series(LineSeries::new(
                points.iter().map(|(x, s)| (*x, s.mean)),
                colour.stroke_width(2),
            ))?
            .label(variant)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], colour.stroke_width(2)));
    }

    if style.legend {
        chart
            .configure_series_labels()
            .position(SeriesLabelPosition::UpperRight)
            .background_style(WHITE.mix(0.8))
            .border_style(BLACK)
            .label_font((FONT, TICK_SIZE))
            .draw()?;
    }
    Ok(())
}
