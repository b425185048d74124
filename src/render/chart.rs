//! Scatter plots with fitted trend curves

use super::RenderContext;
use crate::constants::columns::{NUM_EDGES, NUM_NODES, PEAK_MEMORY, TOTAL_EVENT};
use crate::constants::output::*;
use crate::constants::plot::{AXIS_PADDING, CURVE_SAMPLES, IMAGE_SIZE};
use crate::data::DataSource;
use crate::data::fit::{CurveKind, FitResult, TrendFit, fit_trend, format_coefficient};
use crate::error::{ReportError, Result};
use crate::state::AxisBounds;
use plotters::prelude::*;
use std::ops::Range;
use std::path::Path;

const POINT_COLOR: RGBColor = RGBColor(31, 119, 180);
const FIT_COLOR: RGBColor = RGBColor(255, 127, 14);

/// One relationship plotted from a timing table
#[derive(Debug, Clone, Copy)]
pub struct PlotSpec {
    pub x_column: &'static str,
    pub y_column: &'static str,
    pub x_label: &'static str,
    pub y_label: &'static str,
    /// Relationship suffix of the image name, before `_q`/`_l`
    pub suffix: &'static str,
    /// Curves to render, one image each
    pub kinds: &'static [CurveKind],
}

const BOTH: &[CurveKind] = &CurveKind::ALL;
const LINEAR: &[CurveKind] = &[CurveKind::Linear];

/// Total time against graph size
pub const TIME_PLOTS: &[PlotSpec] = &[
    PlotSpec {
        x_column: NUM_NODES,
        y_column: TOTAL_EVENT,
        x_label: "Number of nodes",
        y_label: "Total time (s)",
        suffix: POINTS_SUFFIX,
        kinds: BOTH,
    },
    PlotSpec {
        x_column: NUM_EDGES,
        y_column: TOTAL_EVENT,
        x_label: "Number of edges",
        y_label: "Total time (s)",
        suffix: EDGES_SUFFIX,
        kinds: BOTH,
    },
];

/// Edge count against node count
pub const GRAPH_SIZE_PLOTS: &[PlotSpec] = &[PlotSpec {
    x_column: NUM_NODES,
    y_column: NUM_EDGES,
    x_label: "Number of nodes",
    y_label: "Number of edges",
    suffix: EDGES_VS_NODES_SUFFIX,
    kinds: LINEAR,
}];

/// Peak memory against graph size
pub const MEMORY_PLOTS: &[PlotSpec] = &[
    PlotSpec {
        x_column: NUM_NODES,
        y_column: PEAK_MEMORY,
        x_label: "Number of nodes",
        y_label: "Peak memory",
        suffix: MEM_VS_NODES_SUFFIX,
        kinds: BOTH,
    },
    PlotSpec {
        x_column: NUM_EDGES,
        y_column: PEAK_MEMORY,
        x_label: "Number of edges",
        y_label: "Peak memory",
        suffix: MEM_VS_EDGES_SUFFIX,
        kinds: BOTH,
    },
];

/// Render every plot, one image per curve kind
pub fn save_plots(source: &DataSource, plots: &[&PlotSpec], ctx: &RenderContext) -> Result<()> {
    for plot in plots {
        let points = source.event_points(plot.x_column, plot.y_column)?;
        for &kind in plot.kinds {
            let fit = fit_trend(&points, kind)?;
            let suffix = format!("{}_{}", plot.suffix, kind.suffix());
            let output = ctx.image_path(source.file_path(), &suffix);
            println!(
                "Saved {} to image file {}",
                source.file_path().display(),
                output.display()
            );
            crate::timed!("draw_scatter", draw_scatter(&output, plot, &points, &fit, &ctx.bounds))?;
        }
    }
    Ok(())
}

/// Axis range from an explicit bound, or the padded data span
pub fn axis_range(values: impl Iterator<Item = f64>, bound: Option<(f64, f64)>) -> Range<f64> {
    if let Some((low, high)) = bound {
        return low..high;
    }

    let (min, max) = values
        .filter(|v| v.is_finite())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(v), hi.max(v))
        });
    if !min.is_finite() {
        return 0.0..1.0;
    }
    if min == max {
        return (min - 1.0)..(max + 1.0);
    }
    let pad = (max - min) * AXIS_PADDING;
    (min - pad)..(max + pad)
}

/// Points along the fitted curve across `range`
pub fn curve_samples(curve: &FitResult, range: &Range<f64>) -> Vec<(f64, f64)> {
    let step = (range.end - range.start) / (CURVE_SAMPLES - 1) as f64;
    (0..CURVE_SAMPLES)
        .map(|i| {
            let x = range.start + step * i as f64;
            (x, curve.eval(x))
        })
        .collect()
}

fn draw_scatter(
    output: &Path,
    plot: &PlotSpec,
    points: &[[f64; 2]],
    fit: &TrendFit,
    bounds: &AxisBounds,
) -> Result<()> {
    let root = BitMapBackend::new(output, IMAGE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(ReportError::chart)?;
    let (header, plot_area) = root.split_vertically(40);

    if let Some(annotation) = fit.annotation() {
        header
            .draw(&Text::new(
                annotation,
                (70, 14),
                ("sans-serif", 16).into_font(),
            ))
            .map_err(ReportError::chart)?;
    }

    let x_range = axis_range(points.iter().map(|p| p[0]), bounds.x);
    let y_range = axis_range(points.iter().map(|p| p[1]), bounds.y);

    let mut chart = ChartBuilder::on(&plot_area)
        .margin(15)
        .x_label_area_size(50)
        .y_label_area_size(70)
        .build_cartesian_2d(x_range.clone(), y_range)
        .map_err(ReportError::chart)?;

    chart
        .configure_mesh()
        .x_desc(plot.x_label)
        .y_desc(plot.y_label)
        .x_label_formatter(&|v| format_coefficient(*v))
        .y_label_formatter(&|v| format_coefficient(*v))
        .draw()
        .map_err(ReportError::chart)?;

    chart
        .draw_series(
            points
                .iter()
                .map(|p| Circle::new((p[0], p[1]), 3, POINT_COLOR.mix(0.3).filled())),
        )
        .map_err(ReportError::chart)?;

    chart
        .draw_series(LineSeries::new(
            curve_samples(&fit.curve, &x_range),
            FIT_COLOR.stroke_width(2),
        ))
        .map_err(ReportError::chart)?
        .label(fit.curve.label())
        .legend(|(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], FIT_COLOR.stroke_width(2)));

    chart
        .configure_series_labels()
        .position(SeriesLabelPosition::UpperLeft)
        .background_style(WHITE.mix(0.8))
        .border_style(BLACK)
        .draw()
        .map_err(ReportError::chart)?;

    root.present().map_err(ReportError::chart)?;
    tracing::info!(path = %output.display(), curve = %fit.curve.label(), "chart written");
    Ok(())
}
