//! Catchment data model and the canonical code formatter.

use crate::fit::CubicFit;

/// Number of sub-catchments in the study watershed.
pub const CATCHMENT_COUNT: usize = 93;

/// Canonical 4-character catchment code for a 1-based index:
/// `C` followed by the zero-padded index (`C001` .. `C093`).
pub fn catchment_code(index: usize) -> String {
    format!("C{index:03}")
}

/// One elevation-class row of a catchment table: the class representative
/// elevation in metres and the planar area of that class.
/// Rows arrive ordered by elevation ascending; areas are non-negative.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplePair {
    pub elevation: f64,
    pub area: f64,
}

/// A point of the hypsometric curve, both coordinates in [0, 1]:
/// cumulative area share on x, min-max scaled elevation on y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NormalizedSample {
    pub rel_area: f64,
    pub rel_elev: f64,
}

/// Elevation extrema of one catchment, from the shared extrema table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Extrema {
    pub minimum: f64,
    pub maximum: f64,
}

/// Everything computed for one catchment. Built once per run, immutable
/// afterwards; the driver aggregates these into the run summary.
#[derive(Debug, Clone)]
pub struct CatchmentResult {
    /// 1-based position in the batch.
    pub index: usize,
    pub code: String,
    pub extrema: Extrema,
    /// Total planar area, unrounded.
    pub total_area: f64,
    /// The normalized curve, input order preserved.
    pub curve: Vec<NormalizedSample>,
    pub fit: CubicFit,
    /// Hypsometric integral of the fitted curve over [0, 1].
    pub hi: f64,
}
