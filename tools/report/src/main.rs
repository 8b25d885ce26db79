//! Batch hypsometry report: one curve chart and one summary row per
//! sub-catchment, plus the HI population chart, the printed summary table,
//! and persisted table/stats artifacts.

use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use clap::Parser;
use rayon::prelude::*;
use serde::Serialize;

use hypso_core::catchment::CATCHMENT_COUNT;
use hypso_core::fit::R2_WARN_THRESHOLD;
use hypso_core::pipeline::process_catchment;
use hypso_core::stats::Distribution;
use hypso_core::{catchment_code, plot, CatchmentFailure, CatchmentResult, ExtremaTable, RunSummary};

// ── CLI ───────────────────────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(name = "report", about = "Hypsometric curves and integrals across sub-catchments")]
struct Args {
    /// Directory holding Minimum-Maximum.csv and the per-catchment tables.
    #[arg(short, long, default_value = "data")]
    data_dir: String,

    /// Output directory for charts and summary artifacts.
    #[arg(short, long, default_value = "out")]
    output: String,

    /// Number of catchments to process (C001 upward).
    #[arg(short = 'n', long, default_value_t = CATCHMENT_COUNT)]
    catchments: usize,

    /// Skip chart rendering; numeric outputs only.
    #[arg(long)]
    no_plots: bool,
}

// ── Artifacts ─────────────────────────────────────────────────────────────────

#[derive(Serialize)]
struct RunStats<'a> {
    catchments: usize,
    completed: usize,
    failed: usize,
    hi: Option<Distribution>,
    failures: &'a [CatchmentFailure],
}

fn write_summary_csv(path: &Path, summary: &RunSummary) -> Result<()> {
    let mut writer = csv::Writer::from_path(path)
        .with_context(|| format!("creating {}", path.display()))?;
    for row in summary.rows() {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

/// Aligned table for the terminal; same columns and order as the CSV.
fn render_table(summary: &RunSummary) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "{:<6} {:>10} {:>10} {:>12} {:>10}\n",
        "CODE", "MIN_ELEV", "MAX_ELEV", "AREA", "H_INTEGRAL"
    ));
    out.push_str(&format!("{}\n", "-".repeat(52)));
    for row in summary.rows() {
        out.push_str(&format!(
            "{:<6} {:>10} {:>10} {:>12.2} {:>10.3}\n",
            row.code, row.min_elev, row.max_elev, row.area, row.hi
        ));
    }
    out
}

// ── main ──────────────────────────────────────────────────────────────────────

fn main() -> Result<()> {
    let args = Args::parse();
    let data_dir = Path::new(&args.data_dir);
    let out_dir = Path::new(&args.output);
    fs::create_dir_all(out_dir).with_context(|| format!("creating {}", out_dir.display()))?;

    // Shared prerequisite: any failure here aborts the whole run.
    let extrema_path = data_dir.join("Minimum-Maximum.csv");
    let extrema = ExtremaTable::load(&extrema_path)
        .with_context(|| format!("loading extrema table {}", extrema_path.display()))?;
    extrema
        .require_rows(args.catchments)
        .with_context(|| format!("extrema table {} is incomplete", extrema_path.display()))?;

    eprintln!(
        "Processing {} catchments from {} ...",
        args.catchments,
        data_dir.display()
    );

    // Index-order collect keeps the output identical to a sequential run.
    // require_rows above guarantees every row(i) below resolves.
    let results: Vec<(usize, hypso_core::Result<CatchmentResult>)> = (1..=args.catchments)
        .into_par_iter()
        .map(|i| {
            let res = extrema
                .row(i)
                .and_then(|ex| process_catchment(data_dir, i, ex));
            (i, res)
        })
        .collect();

    let mut summary = RunSummary::new();
    for (index, res) in &results {
        match res {
            Ok(r) => {
                if r.fit.r_squared < R2_WARN_THRESHOLD {
                    eprintln!(
                        "Warning: {} fit quality is low (R2 = {:.3})",
                        r.code, r.fit.r_squared
                    );
                }
                if !args.no_plots {
                    if let Err(e) = plot::plot_catchment(out_dir, r) {
                        eprintln!("Warning: {}", e);
                    }
                }
                summary.push_result(r);
            }
            Err(e) => {
                eprintln!("Warning: {} failed: {}", catchment_code(*index), e);
                summary.push_failure(&catchment_code(*index), e);
            }
        }
    }

    if !args.no_plots {
        if let Err(e) = plot::plot_summary(out_dir, summary.integrals()) {
            eprintln!("Warning: {}", e);
        }
    }

    print!("{}", render_table(&summary));

    if !summary.failures().is_empty() {
        println!("\nFailed catchments:");
        for f in summary.failures() {
            println!("  {}  {}", f.code, f.reason);
        }
    }

    if let Some(d) = summary.distribution() {
        println!(
            "\nHI distribution: n = {}, mean = {:.3}, std = {:.3}, range = [{:.3}, {:.3}]",
            d.n, d.mean, d.std, d.min, d.max
        );
    }

    let table_path = out_dir.join("Summary_table.csv");
    write_summary_csv(&table_path, &summary)?;

    let stats = RunStats {
        catchments: args.catchments,
        completed: summary.rows().len(),
        failed: summary.failures().len(),
        hi: summary.distribution(),
        failures: summary.failures(),
    };
    let stats_path = out_dir.join("Summary_stats.json");
    fs::write(&stats_path, serde_json::to_string_pretty(&stats)?)
        .with_context(|| format!("writing {}", stats_path.display()))?;

    eprintln!(
        "\nDone. {} of {} catchments completed; artifacts in {}.",
        summary.rows().len(),
        args.catchments,
        out_dir.display()
    );
    Ok(())
}

// ── Unit tests ────────────────────────────────────────────────────────────────
