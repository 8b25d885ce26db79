//! Hypsometric-curve analysis for hydrological sub-catchments.
//!
//! Per catchment: load the elevation/area table, rescale into the unit
//! square, fit a cubic to the curve, integrate it in closed form, chart it.
//! Across the batch: a summary table and an HI population chart.

pub mod catchment;
pub mod error;
pub mod fit;
pub mod loader;
pub mod normalize;
pub mod pipeline;
pub mod plot;
pub mod stats;
pub mod summary;

pub use catchment::{
    catchment_code, CatchmentResult, Extrema, NormalizedSample, SamplePair, CATCHMENT_COUNT,
};
pub use error::{HypsoError, Result};
pub use fit::{fit_cubic, hypsometric_integral, CubicFit};
pub use loader::{load_catchment_table, ExtremaTable};
pub use summary::{CatchmentFailure, RunSummary, SummaryRow};
