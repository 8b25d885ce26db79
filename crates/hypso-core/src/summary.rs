//! Run-level aggregation: the summary table, failure entries, and the HI
//! population distribution. An explicit, append-only result store — the
//! per-catchment computation never touches shared state.

use serde::Serialize;

use crate::catchment::CatchmentResult;
use crate::error::{HypsoError, Result};
use crate::stats::{self, Distribution};

/// One summary-table row for a completed catchment. Field names double as
/// the emitted CSV header.
#[derive(Debug, Clone, Serialize)]
pub struct SummaryRow {
    #[serde(rename = "CODE")]
    pub code: String,
    #[serde(rename = "MIN_ELEV")]
    pub min_elev: f64,
    #[serde(rename = "MAX_ELEV")]
    pub max_elev: f64,
    /// Total planar area, rounded to 2 decimals.
    #[serde(rename = "AREA")]
    pub area: f64,
    /// Hypsometric integral, rounded to 3 decimals.
    #[serde(rename = "H_INTEGRAL")]
    pub hi: f64,
}

/// A catchment whose pipeline did not complete, with the reason. Failures
/// are listed next to the table, never silently dropped.
#[derive(Debug, Clone, Serialize)]
pub struct CatchmentFailure {
    pub code: String,
    pub reason: String,
}

/// Ordered result store for one batch run. Push in index order; rows and
/// failures keep that order.
#[derive(Debug, Default)]
pub struct RunSummary {
    rows: Vec<SummaryRow>,
    failures: Vec<CatchmentFailure>,
    /// Unrounded integrals backing the population chart and stats.
    integrals: Vec<f64>,
}

impl RunSummary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_result(&mut self, res: &CatchmentResult) {
        self.rows.push(SummaryRow {
            code: res.code.clone(),
            min_elev: res.extrema.minimum,
            max_elev: res.extrema.maximum,
            area: round_to(res.total_area, 2),
            hi: round_to(res.hi, 3),
        });
        self.integrals.push(res.hi);
    }

    pub fn push_failure(&mut self, code: &str, err: &HypsoError) {
        self.failures.push(CatchmentFailure {
            code: code.to_owned(),
            reason: err.to_string(),
        });
    }

    pub fn rows(&self) -> &[SummaryRow] {
        &self.rows
    }

    pub fn failures(&self) -> &[CatchmentFailure] {
        &self.failures
    }

    /// Unrounded HI values, row order.
    pub fn integrals(&self) -> &[f64] {
        &self.integrals
    }

    /// Summary row for a catchment; `MissingResult` if its pipeline never
    /// completed (whether it failed or was never run).
    pub fn row(&self, code: &str) -> Result<&SummaryRow> {
        self.rows
            .iter()
            .find(|r| r.code == code)
            .ok_or_else(|| HypsoError::MissingResult {
                code: code.to_owned(),
            })
    }

    /// Population statistics of the unrounded integrals.
    pub fn distribution(&self) -> Option<Distribution> {
        stats::distribution(&self.integrals)
    }
}

fn round_to(x: f64, decimals: u32) -> f64 {
    let f = 10f64.powi(decimals as i32);
    (x * f).round() / f
}
