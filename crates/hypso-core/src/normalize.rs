//! Min-max elevation scaling and cumulative relative-area conversion.

use crate::catchment::{Extrema, NormalizedSample, SamplePair};
use crate::error::{HypsoError, Result};

/// Rescale one catchment's samples into the unit square.
///
/// Elevation maps through `(e - min) / (max - min)`; area becomes the running
/// share of the catchment total, so relative area is non-decreasing and the
/// last sample lands on 1.0 up to rounding. Input order and cardinality are
/// preserved. A zero elevation range is reported as `DegenerateRange`
/// instead of letting NaN flow into the fit.
pub fn normalize(
    code: &str,
    extrema: Extrema,
    samples: &[SamplePair],
) -> Result<Vec<NormalizedSample>> {
    let range = extrema.maximum - extrema.minimum;
    if range <= 0.0 {
        return Err(HypsoError::DegenerateRange {
            code: code.to_owned(),
            minimum: extrema.minimum,
            maximum: extrema.maximum,
        });
    }

    // The loader rejects tables with a non-positive area total.
    let total: f64 = samples.iter().map(|s| s.area).sum();
    let mut running = 0.0;
    let curve = samples
        .iter()
        .map(|s| {
            running += s.area;
            NormalizedSample {
                rel_area: running / total,
                rel_elev: (s.elevation - extrema.minimum) / range,
            }
        })
        .collect();
    Ok(curve)
}
