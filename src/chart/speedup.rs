use super::{draw_labels, text_style, CAPTION_SIZE, DESC_SIZE, FONT, TICK_SIZE};
use crate::{
    units::{format_multiplier, PICOS_PER_SEC},
    BenchTable, BenchmarkRow, ReportError, StatQuadruple,
};
use plotters::{
    coord::Shift,
    prelude::*,
    style::text_anchor::{HPos, VPos},
};

/// Half the height of a variant's band, in row units.
const HEIGHT: f64 = 0.2;
const LIGHT_GREY: RGBColor = RGBColor(211, 211, 211);

/// One band per variant, in ascending order of mean time at `param_value`.
pub(super) fn speedup<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    table: &BenchTable<BenchmarkRow>,
    title: &str,
    param_value: u64,
) -> Result<(), ReportError> {
    let mut bands: Vec<(String, StatQuadruple)> = table
        .iter()
        .filter(|r| r.scale_factor == param_value)
        .map(|r| (r.variant.clone(), r.stats))
        .collect();
    if bands.is_empty() {
        return Err(ReportError::missing_key(
            &param_value.to_string(),
            "speedup chart parameters",
        ));
    }
    bands.sort_by(|a, b| a.1.mean.total_cmp(&b.1.mean));

    let min_mean = bands[0].1.mean;
    if !(min_mean.is_finite() && min_mean > 0.0) {
        return Err(ReportError::MalformedInput(format!(
            "smallest mean at {param_value} is {min_mean}, speedups need a positive baseline"
        )));
    }
    let rel: Vec<(String, StatQuadruple)> = bands
        .into_iter()
        .map(|(name, s)| (name, s.scaled(1.0 / min_mean)))
        .collect();
    let x_min = rel.iter().map(|(_, s)| s.fastest).fold(1.0, f64::min) / 2.0;
    let x_max = rel.iter().map(|(_, s)| s.slowest).fold(1.0, f64::max) * 3.0;
    let n = rel.len() as f64;

    let mut chart = ChartBuilder::on(area)
        .caption(title, (FONT, CAPTION_SIZE))
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(120)
        .build_cartesian_2d((x_min..x_max).log_scale(), -0.5..(n - 0.5))?;

    chart
        .configure_mesh()
        .disable_y_mesh()
        .x_desc("Time Multiplier")
        .x_label_formatter(&|x| format!("{x:.0}x"))
        .y_label_formatter(&|_| String::new())
        .bold_line_style(BLACK.mix(0.5))
        .label_style((FONT, TICK_SIZE))
        .axis_desc_style((FONT, DESC_SIZE))
        .draw()?;

    for (i, (_, s)) in rel.iter().enumerate() {
        let y = i as f64;
        chart.draw_series(std::iter::once(Rectangle::new(
            [(s.fastest, y - HEIGHT), (s.slowest, y + HEIGHT)],
            LIGHT_GREY.filled(),
        )))?;
        chart.draw_series(
            [(s.mean, RED), (s.fastest, BLUE), (s.slowest, GREEN)]
                .into_iter()
                .map(|(x, c)| PathElement::new(vec![(x, y - HEIGHT), (x, y + HEIGHT)], c.stroke_width(2))),
        )?;
    }

    draw_labels(
        &mut chart,
        rel.iter()
            .enumerate()
            .map(|(i, (_, s))| ((s.mean, i as f64 + HEIGHT), format_multiplier(s.mean))),
        (0, -2),
        &text_style(TICK_SIZE, HPos::Center, VPos::Bottom).color(&RED),
    )?;
    draw_labels(
        &mut chart,
        rel.iter().enumerate().map(|(i, (_, s))| {
            let per_sec = param_value as f64 / (s.mean * min_mean / PICOS_PER_SEC);
            ((s.mean, i as f64 - HEIGHT), format!("{} /s", per_sec.round()))
        }),
        (0, 2),
        &text_style(TICK_SIZE, HPos::Center, VPos::Top).color(&RED),
    )?;
    draw_labels(
        &mut chart,
        rel.iter()
            .enumerate()
            .map(|(i, (_, s))| ((s.fastest, i as f64), format_multiplier(s.fastest))),
        (-4, 0),
        &text_style(TICK_SIZE, HPos::Right, VPos::Center).color(&BLUE),
    )?;
    draw_labels(
        &mut chart,
        rel.iter()
            .enumerate()
            .map(|(i, (_, s))| ((s.slowest, i as f64), format_multiplier(s.slowest))),
        (4, 0),
        &text_style(TICK_SIZE, HPos::Left, VPos::Center).color(&GREEN),
    )?;
    draw_labels(
        &mut chart,
        rel.iter()
            .enumerate()
            .map(|(i, (name, _))| ((x_min, i as f64), name.clone())),
        (-8, 0),
        &text_style(TICK_SIZE, HPos::Right, VPos::Center),
    )?;

    for (label, colour) in [("Mean", RED), ("Fastest", BLUE), ("Slowest", GREEN)] {
        chart
            .draw_series(std::iter::empty::<PathElement<(f64, f64)>>())?
            .label(label)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], colour.stroke_width(2)));
    }
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::LowerRight)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .label_font((FONT, TICK_SIZE))
        .draw()?;
    Ok(())
}
