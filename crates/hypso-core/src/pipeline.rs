//! Per-catchment pipeline: Loaded → Normalized → Fitted → Integrated.
//! A pure function of its inputs; aggregation and plotting belong to the
//! driver, so catchments can be processed independently and in parallel.

use std::path::Path;

use crate::catchment::{catchment_code, CatchmentResult, Extrema};
use crate::error::Result;
use crate::fit;
use crate::loader;
use crate::normalize;

/// Run one catchment through the numeric pipeline. The first error aborts
/// this catchment only; the driver records it as a failure entry.
pub fn process_catchment(data_dir: &Path, index: usize, extrema: Extrema) -> Result<CatchmentResult> {
    let code = catchment_code(index);
    let samples = loader::load_catchment_table(data_dir, &code)?;
    let total_area = samples.iter().map(|s| s.area).sum();
    let curve = normalize::normalize(&code, extrema, &samples)?;
    let cubic = fit::fit_cubic(&code, &curve)?;
    let hi = fit::hypsometric_integral(&cubic);
    Ok(CatchmentResult {
        index,
        code,
        extrema,
        total_area,
        curve,
        fit: cubic,
        hi,
    })
}
