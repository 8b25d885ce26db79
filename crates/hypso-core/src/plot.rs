//! Chart rendering: one normalized-curve chart per catchment and the HI
//! population chart. All failures here map to the non-fatal `PlotWrite`
//! variant; callers log them and keep the numeric results.

use std::path::Path;

use plotters::prelude::*;

use crate::catchment::CatchmentResult;
use crate::error::{HypsoError, Result};
use crate::stats;

const CURVE_SIZE: (u32, u32) = (640, 480);
const SUMMARY_SIZE: (u32, u32) = (800, 500);

/// Population chart x-axis and binning, fixed for this dataset.
const HIST_LO: f64 = 0.45;
const HIST_HI: f64 = 0.9;
const BIN_WIDTH: f64 = 0.01;

fn plot_err(path: &Path, e: impl std::fmt::Display) -> HypsoError {
    HypsoError::PlotWrite {
        path: path.to_path_buf(),
        reason: e.to_string(),
    }
}

/// Draw one catchment's hypsometric curve (points + polyline) with the
/// origin-anchored fitted cubic overlaid, captioned with the sequence number
/// and code and annotated with the rounded HI. Writes `<CODE>.png`.
pub fn plot_catchment(out_dir: &Path, res: &CatchmentResult) -> Result<()> {
    let path = out_dir.join(format!("{}.png", res.code));
    let root = BitMapBackend::new(&path, CURVE_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| plot_err(&path, e))?;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("{}. {} hypsometric curve", res.index, res.code),
            ("sans-serif", 22),
        )
        .margin(12)
        .x_label_area_size(42)
        .y_label_area_size(48)
        .build_cartesian_2d(0.0..1.0, 0.0..1.0)
        .map_err(|e| plot_err(&path, e))?;
    chart
        .configure_mesh()
        .x_desc("Relative area a/A")
        .y_desc("Relative elevation h/H")
        .draw()
        .map_err(|e| plot_err(&path, e))?;

    let points: Vec<(f64, f64)> = res.curve.iter().map(|s| (s.rel_area, s.rel_elev)).collect();
    chart
        .draw_series(LineSeries::new(points.iter().copied(), &BLUE))
        .map_err(|e| plot_err(&path, e))?;
    chart
        .draw_series(points.iter().map(|&p| Circle::new(p, 3, BLUE.filled())))
        .map_err(|e| plot_err(&path, e))?;

    let fitted = (0..=100).map(|i| {
        let x = i as f64 / 100.0;
        (x, res.fit.eval_origin(x))
    });
    chart
        .draw_series(LineSeries::new(fitted, &RED))
        .map_err(|e| plot_err(&path, e))?;

    root.draw(&Text::new(
        format!("HI = {:.3}", res.hi),
        (440, 80),
        ("sans-serif", 20),
    ))
    .map_err(|e| plot_err(&path, e))?;

    root.present().map_err(|e| plot_err(&path, e))?;
    Ok(())
}

/// Population chart across the whole run: HI histogram (0.01-wide bins over
/// the fixed [0.45, 0.9] axis), Gaussian density overlay scaled to counts,
/// and a vertical line at the mean. Writes `Summary_plot.png`.
pub fn plot_summary(out_dir: &Path, integrals: &[f64]) -> Result<()> {
    let path = out_dir.join("Summary_plot.png");
    let root = BitMapBackend::new(&path, SUMMARY_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(|e| plot_err(&path, e))?;

    let bins = stats::histogram(integrals, HIST_LO, HIST_HI, BIN_WIDTH);
    let n = integrals.len() as f64;
    let bandwidth = stats::silverman_bandwidth(integrals);
    // density × n × bin width puts the overlay on the count axis
    let kde_scale = n * BIN_WIDTH;
    let density: Vec<(f64, f64)> = (0..=300)
        .map(|i| {
            let x = HIST_LO + (HIST_HI - HIST_LO) * i as f64 / 300.0;
            (x, stats::gaussian_kde(integrals, bandwidth, x) * kde_scale)
        })
        .collect();

    let peak = bins
        .iter()
        .map(|&(_, c)| c as f64)
        .chain(density.iter().map(|&(_, d)| d))
        .fold(1.0, f64::max);
    let y_max = peak * 1.15;

    let mut chart = ChartBuilder::on(&root)
        .caption(
            format!("Hypsometric integrals, n = {}", integrals.len()),
            ("sans-serif", 22),
        )
        .margin(12)
        .x_label_area_size(42)
        .y_label_area_size(48)
        .build_cartesian_2d(HIST_LO..HIST_HI, 0.0..y_max)
        .map_err(|e| plot_err(&path, e))?;
    chart
        .configure_mesh()
        .x_desc("Hypsometric integral")
        .y_desc("Count")
        .draw()
        .map_err(|e| plot_err(&path, e))?;

    chart
        .draw_series(bins.iter().map(|&(centre, count)| {
            Rectangle::new(
                [
                    (centre - BIN_WIDTH / 2.0, 0.0),
                    (centre + BIN_WIDTH / 2.0, count as f64),
                ],
                BLUE.mix(0.4).filled(),
            )
        }))
        .map_err(|e| plot_err(&path, e))?;

    chart
        .draw_series(LineSeries::new(density, &RED))
        .map_err(|e| plot_err(&path, e))?;

    if let Some(d) = stats::distribution(integrals) {
        chart
            .draw_series(LineSeries::new(
                [(d.mean, 0.0), (d.mean, y_max)],
                BLACK.stroke_width(2),
            ))
            .map_err(|e| plot_err(&path, e))?;
    }

    root.present().map_err(|e| plot_err(&path, e))?;
    Ok(())
}
