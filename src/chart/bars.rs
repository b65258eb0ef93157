use super::{
    draw_labels, rate_table, text_style, whisker, ChartStyle, DESC_SIZE, FONT, TICK_SIZE,
};
use crate::{
    units::{choose_time_unit, format_thousands, UnitScale},
    BenchTable, BenchmarkRow, RateRow, ReportError,
};
use plotters::{
    chart::ChartContext,
    coord::{cartesian::Cartesian2d, types::RangedCoordf64, Shift},
    prelude::*,
    style::{
        full_palette::{GREY, ORANGE},
        text_anchor::{HPos, VPos},
    },
};

/// Unit chosen from the largest `slowest` rate, and the top of the y axis in that unit.
fn rate_axis(rates: &BenchTable<RateRow>) -> (UnitScale, f64) {
    let unit = choose_time_unit(rates.max_by_field(|r| r.rates.slowest).unwrap_or(0.0));
    let top = unit.apply(rates.max_by_field(|r| r.rates.fastest).unwrap_or(0.0));
    let top = if top > 0.0 { top * 1.1 } else { 1.0 };
    (unit, top)
}

fn rate_desc(unit: &UnitScale, prefix: &str) -> String {
    format!("{prefix} (1/{})", unit.unit)
}

/// Bars of one variant plus their whiskers. `at` maps a row to its bar centre.
fn draw_variant_bars<DB, F>(
    chart: &mut ChartContext<'_, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
    rows: &[&RateRow],
    at: F,
    unit: &UnitScale,
    width: f64,
    variant: &str,
    colour: RGBColor,
) -> Result<(), ReportError>
where
    DB: DrawingBackend,
    F: Fn(&RateRow) -> f64,
{
    let half = width / 2.0;
    chart
        .draw_series(rows.iter().map(|r| {
            let x = at(*r);
            Rectangle::new([(x - half, 0.0), (x + half, unit.apply(r.rates.mean))], colour.filled())
        }))?
        .label(variant)
        .legend(move |(x, y)| Rectangle::new([(x, y - 5), (x + 10, y + 5)], colour.filled()));

    for r in rows {
        let s = r.rates.scaled(unit.scale);
        chart.draw_series(whisker(
            at(*r),
            half,
            s.fastest,
            s.slowest,
            &[(s.median, ORANGE), (s.mean, BLACK)],
            GREY,
        ))?;
    }
    Ok(())
}

fn draw_legend<'a, DB: DrawingBackend + 'a>(
    chart: &mut ChartContext<'a, DB, Cartesian2d<RangedCoordf64, RangedCoordf64>>,
) -> Result<(), ReportError> {
    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperMiddle)
        .background_style(WHITE)
        .border_style(WHITE)
        .label_font((FONT, TICK_SIZE))
        .draw()?;
    Ok(())
}

fn rows_of<'t>(table: &'t BenchTable<RateRow>, variant: &str) -> Vec<&'t RateRow> {
    table.iter().filter(|r| r.variant == variant).collect()
}

pub(super) fn grouped_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    table: &BenchTable<BenchmarkRow>,
    style: &ChartStyle,
) -> Result<(), ReportError> {
    let rates = rate_table(table)?;
    let layout = style.layout;
    let queries = rates.queries();
    let sfs = rates.scale_factors();
    let variants = rates.variants();
    let (n_sf, n_v) = (sfs.len(), variants.len());
    let query_index = |q: &str| queries.iter().position(|x| *x == q).unwrap_or(0);
    let sf_index = |sf: u64| sfs.iter().position(|s| *s == sf).unwrap_or(0);

    let (unit, y_max) = rate_axis(&rates);
    let last = layout.grouped(queries.len() - 1, n_sf - 1, n_v - 1, n_sf, n_v);
    let (x_min, x_max) = layout.x_range(last);

    let mut chart = ChartBuilder::on(area)
        .margin(10)
        .margin_top(if style.legend { 40 } else { 10 })
        .x_label_area_size(60)
        .y_label_area_size(80)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_label_formatter(&|_| String::new())
        .x_desc("Query and Scale Factor")
        .y_desc(rate_desc(&unit, "Scale Factor / Query Time"))
        .bold_line_style(BLACK.mix(0.6))
        .label_style((FONT, TICK_SIZE))
        .axis_desc_style((FONT, DESC_SIZE))
        .draw()?;

    for (v_idx, variant) in variants.iter().enumerate() {
        let rows = rows_of(&rates, variant);
        draw_variant_bars(
            &mut chart,
            &rows,
            |r| {
                layout.grouped(
                    query_index(r.query.as_str()),
                    sf_index(r.scale_factor),
                    v_idx,
                    n_sf,
                    n_v,
                )
            },
            &unit,
            layout.width,
            variant,
            style.palette.mean(variant, v_idx),
        )?;
    }

    let tick = text_style(TICK_SIZE, HPos::Center, VPos::Top);
    draw_labels(
        &mut chart,
        (0..queries.len()).flat_map(|q| {
            sfs.iter().enumerate().map(move |(i, sf)| {
                ((layout.grouped_tick(q, i, n_sf, n_v), 0.0), format_thousands(*sf))
            })
        }),
        (0, 6),
        &tick,
    )?;
    draw_labels(
        &mut chart,
        queries
            .iter()
            .enumerate()
            .map(|(q, name)| ((layout.query_tick(q, n_sf, n_v), 0.0), name.to_string())),
        (0, 24),
        &tick,
    )?;

    if style.legend {
        draw_legend(&mut chart)?;
    }
    Ok(())
}

pub(super) fn separate_bars<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    table: &BenchTable<BenchmarkRow>,
    style: &ChartStyle,
) -> Result<(), ReportError> {
    let rates = rate_table(table)?;
    let layout = style.layout;
    let queries = rates.queries();
    let panels = area.split_evenly((1, queries.len()));

    for (p_idx, (panel, query)) in panels.iter().zip(&queries).enumerate() {
        let sub = rates.for_query(query);
        let sfs = sub.scale_factors();
        let variants = sub.variants();
        let n_v = variants.len();
        let sf_index = |sf: u64| sfs.iter().position(|s| *s == sf).unwrap_or(0);
        let (unit, y_max) = rate_axis(&sub);
        let last = layout.separate(sfs.len() - 1, n_v - 1, n_v);
        let (x_min, x_max) = layout.x_range(last);

        let mut chart = ChartBuilder::on(panel)
            .caption(*query, (FONT, DESC_SIZE))
            .margin(8)
            .margin_top(if style.legend && p_idx == 0 { 40 } else { 8 })
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|_| String::new())
            .x_desc("Scale Factor")
            .y_desc(rate_desc(&unit, "Scale Factor / Bench Time"))
            .bold_line_style(BLACK.mix(0.6))
            .label_style((FONT, TICK_SIZE))
            .axis_desc_style((FONT, TICK_SIZE))
            .draw()?;

        for (v_idx, variant) in variants.iter().enumerate() {
            let rows = rows_of(&sub, variant);
            draw_variant_bars(
                &mut chart,
                &rows,
                |r| layout.separate(sf_index(r.scale_factor), v_idx, n_v),
                &unit,
                layout.width,
                variant,
                style.palette.mean(variant, v_idx),
            )?;
        }

        draw_labels(
            &mut chart,
            sfs.iter()
                .enumerate()
                .map(|(i, sf)| ((layout.separate_tick(i, n_v), 0.0), sf.to_string())),
            (0, 6),
            &text_style(TICK_SIZE, HPos::Center, VPos::Top),
        )?;

        if style.legend && p_idx == 0 {
            draw_legend(&mut chart)?;
        }
    }
    Ok(())
}

pub(super) fn separate_lines<DB: DrawingBackend>(
    area: &DrawingArea<DB, Shift>,
    table: &BenchTable<BenchmarkRow>,
    style: &ChartStyle,
) -> Result<(), ReportError> {
    let rates = rate_table(table)?;
    let layout = style.layout;
    let queries = rates.queries();
    let panels = area.split_evenly((1, queries.len()));
    let half = layout.whisker_width / 2.0;

    for (p_idx, (panel, query)) in panels.iter().zip(&queries).enumerate() {
        let sub = rates.for_query(query);
        let sfs = sub.scale_factors();
        let sf_index = |sf: u64| sfs.iter().position(|s| *s == sf).unwrap_or(0);
        let (unit, y_max) = rate_axis(&sub);
        let (x_min, x_max) = layout.x_range(layout.line(sfs.len() - 1));

        let mut chart = ChartBuilder::on(panel)
            .margin(8)
            .margin_top(if style.legend && p_idx == 0 { 40 } else { 8 })
            .x_label_area_size(40)
            .y_label_area_size(60)
            .build_cartesian_2d(x_min..x_max, 0f64..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_label_formatter(&|_| String::new())
            .x_desc(*query)
            .y_desc(rate_desc(&unit, "Scale Factor / Time"))
            .bold_line_style(BLACK.mix(0.6))
            .label_style((FONT, TICK_SIZE))
            .axis_desc_style((FONT, TICK_SIZE))
            .draw()?;

        for (v_idx, variant) in sub.variants().iter().enumerate() {
            let colours = style.palette.colours(variant, v_idx);
            let points: Vec<(f64, crate::StatQuadruple)> = rows_of(&sub, variant)
                .into_iter()
                .map(|r| (layout.line(sf_index(r.scale_factor)), r.rates.scaled(unit.scale)))
                .collect();

            for (x, s) in &points {
                chart.draw_series(whisker(*x, half, s.fastest, s.slowest, &[], colours.mean))?;
            }
            chart.draw_series(points.iter().map(|(x, s)| {
                EmptyElement::at((*x, s.median))
                    + Polygon::new(vec![(0, -5), (5, 0), (0, 5), (-5, 0)], colours.median.filled())
            }))?;
            chart.draw_series(
                points
                    .iter()
                    .map(|(x, s)| Circle::new((*x, s.mean), 3, colours.mean.filled())),
            )?;
            let mean = colours.mean;
            chart
                .draw_series(LineSeries::new(
                    points.iter().map(|(x, s)| (*x, s.mean)),
                    mean.stroke_width(2),
                ))?
                .label(*variant)
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], mean.stroke_width(2)));
        }

        draw_labels(
            &mut chart,
            sfs.iter()
                .enumerate()
                .map(|(i, sf)| ((layout.line(i), 0.0), sf.to_string())),
            (0, 6),
            &text_style(TICK_SIZE, HPos::Center, VPos::Top),
        )?;

        if style.legend && p_idx == 0 {
            draw_legend(&mut chart)?;
        }
    }
    Ok(())
}
