//! SVG line plots of the aggregated series.

use std::path::{Path, PathBuf};

use drift_aggregate::{DerivedQuantity, DerivedSlot, RegistryEntry, SeriesAggregator};
use plotters::prelude::*;
use tracing::{debug, info, warn};

use crate::error::ReportError;
use crate::label::RunLabel;

const SIZE: (u32, u32) = (960, 540);

/// One line of a chart.
struct Line<'a> {
    name: String,
    values: &'a [f64],
    color: RGBColor,
}

/// Finite `(x, y)` pairs of a line.
fn finite_points(x: &[f64], y: &[f64]) -> Vec<(f64, f64)> {
    x.iter()
        .zip(y)
        .filter(|(a, b)| a.is_finite() && b.is_finite())
        .map(|(&a, &b)| (a, b))
        .collect()
}

/// Range covering every value, widened when degenerate.
fn padded_range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let (lo, hi) = values.fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
        (lo.min(v), hi.max(v))
    });
    if !lo.is_finite() || !hi.is_finite() {
        return None;
    }
    if hi - lo < f64::EPSILON * lo.abs().max(1.0) {
        let pad = (lo.abs() * 0.01).max(1.0);
        return Some((lo - pad, hi + pad));
    }
    let pad = (hi - lo) * 0.05;
    Some((lo - pad, hi + pad))
}

/// Draws `lines` against `x` into an SVG at `path`.
///
/// Returns `Ok(false)` without creating a file when no line has a finite
/// point.
fn draw_chart(
    path: &Path,
    title: &str,
    y_desc: &str,
    x: &[f64],
    lines: &[Line<'_>],
) -> Result<bool, ReportError> {
    let points: Vec<Vec<(f64, f64)>> = lines.iter().map(|l| finite_points(x, l.values)).collect();
    let Some((y0, y1)) = padded_range(points.iter().flatten().map(|p| p.1)) else {
        warn!(path = %path.display(), "nothing finite to plot, skipping");
        return Ok(false);
    };
    let Some((x0, x1)) = padded_range(points.iter().flatten().map(|p| p.0)) else {
        return Ok(false);
    };

    let fail = |e: &dyn std::fmt::Display| ReportError::Plot {
        path: path.to_path_buf(),
        reason: e.to_string(),
    };

    let root = SVGBackend::new(path, SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| fail(&e))?;
    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 22))
        .margin(12)
        .x_label_area_size(40)
        .y_label_area_size(80)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(|e| fail(&e))?;
    chart
        .configure_mesh()
        .x_desc("model year")
        .y_desc(y_desc)
        .draw()
        .map_err(|e| fail(&e))?;

    for (line, pts) in lines.iter().zip(points) {
        let color = line.color;
        chart
            .draw_series(LineSeries::new(pts, color.stroke_width(2)))
            .map_err(|e| fail(&e))?
            .label(line.name.as_str())
            .legend(move |(x, y)| {
                PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
            });
    }
    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(|e| fail(&e))?;
    root.present().map_err(|e| fail(&e))?;
    debug!(path = %path.display(), lines = lines.len(), "plot written");
    Ok(true)
}

fn years(label: &RunLabel, len: usize) -> Vec<f64> {
    (0..len).map(|i| label.month_of(i).decimal_year()).collect()
}

/// Plots raw, short and long averages of `name`.
fn plot_averages(
    dir: &Path,
    label: &RunLabel,
    aggregator: &SeriesAggregator,
    name: &str,
) -> Result<Vec<PathBuf>, ReportError> {
    let Some(series) = aggregator.series(name) else {
        return Ok(Vec::new());
    };
    let windows = series.windows();
    let x = years(label, series.len());
    let stem = label.stem(aggregator.component());
    let mut written = Vec::new();

    let path = dir.join(format!("{stem}_{name}.svg"));
    let lines = [
        Line {
            name: "monthly".to_string(),
            values: series.raw(),
            color: RGBColor(170, 170, 170),
        },
        Line {
            name: format!("{}-month mean", windows.short().months()),
            values: series.short_mean(),
            color: BLUE,
        },
        Line {
            name: format!("{}-month mean", windows.long().months()),
            values: series.long_mean(),
            color: RED,
        },
    ];
    if draw_chart(&path, &format!("{} {name}", label.case_id()), name, &x, &lines)? {
        written.push(path);
    }

    let path = dir.join(format!("{stem}_{name}_slopes.svg"));
    let lines = [
        Line {
            name: format!("{}-month trend", windows.short().months()),
            values: series.short_slope(),
            color: BLUE,
        },
        Line {
            name: format!("{}-month trend", windows.long().months()),
            values: series.long_slope(),
            color: RED,
        },
    ];
    let y_desc = format!("{name} per year");
    if draw_chart(&path, &format!("{} {name} trend", label.case_id()), &y_desc, &x, &lines)? {
        written.push(path);
    }
    Ok(written)
}

/// Plots the TOA and surface balances, raw and long-window average.
fn plot_energy(
    dir: &Path,
    label: &RunLabel,
    aggregator: &SeriesAggregator,
) -> Result<Vec<PathBuf>, ReportError> {
    let (Some(toa), Some(sfc)) = (
        aggregator.series(DerivedSlot::ToaBalance.name()),
        aggregator.series(DerivedSlot::SurfaceBalance.name()),
    ) else {
        return Ok(Vec::new());
    };
    let long = toa.windows().long().months();
    let x = years(label, toa.len());
    let path = dir.join(format!("{}_energy.svg", label.stem(aggregator.component())));
    let lines = [
        Line {
            name: "TOA".to_string(),
            values: toa.raw(),
            color: RGBColor(240, 170, 170),
        },
        Line {
            name: format!("TOA {long}-month mean"),
            values: toa.long_mean(),
            color: RED,
        },
        Line {
            name: "surface".to_string(),
            values: sfc.raw(),
            color: RGBColor(170, 170, 240),
        },
        Line {
            name: format!("surface {long}-month mean"),
            values: sfc.long_mean(),
            color: BLUE,
        },
    ];
    let title = format!("{} net energy flux", label.case_id());
    if draw_chart(&path, &title, "W/m2", &x, &lines)? {
        Ok(vec![path])
    } else {
        Ok(Vec::new())
    }
}

/// Writes every plot requested by `entry` into `dir`, returning the files
/// written.
///
/// # Errors
///
/// Returns [`ReportError`] if `dir` cannot be created or a plot fails.
pub fn write_plots(
    dir: &Path,
    label: &RunLabel,
    entry: &RegistryEntry,
    aggregator: &SeriesAggregator,
) -> Result<Vec<PathBuf>, ReportError> {
    if entry.plot().is_empty() || aggregator.is_empty() {
        return Ok(Vec::new());
    }
    std::fs::create_dir_all(dir).map_err(ReportError::io(dir))?;
    let mut written = Vec::new();
    for name in entry.plot() {
        let mut files = match DerivedQuantity::from_name(name) {
            Some(DerivedQuantity::Energy) => plot_energy(dir, label, aggregator)?,
            None => plot_averages(dir, label, aggregator, name)?,
        };
        written.append(&mut files);
    }
    info!(
        component = %entry.component(),
        plots = written.len(),
        "wrote plots"
    );
    Ok(written)
}
