//! Population statistics for the HI distribution: scalar aggregates,
//! fixed-width histogram binning, Gaussian kernel density.

use serde::Serialize;

/// Scalar aggregates over a population of values.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Distribution {
    pub n: usize,
    pub mean: f64,
    /// Population standard deviation.
    pub std: f64,
    pub min: f64,
    pub max: f64,
}

pub fn distribution(values: &[f64]) -> Option<Distribution> {
    if values.is_empty() {
        return None;
    }
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let std = (values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n).sqrt();
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    Some(Distribution {
        n: values.len(),
        mean,
        std,
        min,
        max,
    })
}

/// Fixed-width histogram over [lo, hi]. Returns (bin centre, count) for every
/// bin, empty bins included; values outside the range are dropped.
pub fn histogram(values: &[f64], lo: f64, hi: f64, width: f64) -> Vec<(f64, usize)> {
    let n_bins = ((hi - lo) / width).round() as usize;
    if n_bins == 0 {
        return Vec::new();
    }
    let mut counts = vec![0usize; n_bins];
    for &v in values {
        if v < lo || v > hi {
            continue;
        }
        let idx = (((v - lo) / width) as usize).min(n_bins - 1);
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, c)| (lo + (i as f64 + 0.5) * width, c))
        .collect()
}

/// Silverman's rule-of-thumb bandwidth, floored so a near-constant population
/// still yields a drawable density.
pub fn silverman_bandwidth(values: &[f64]) -> f64 {
    let d = match distribution(values) {
        Some(d) => d,
        None => return 1e-3,
    };
    let h = 1.06 * d.std * (d.n as f64).powf(-0.2);
    h.max(1e-3)
}

/// Gaussian kernel density estimate at `x`.
pub fn gaussian_kde(values: &[f64], bandwidth: f64, x: f64) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let norm = 1.0 / ((2.0 * std::f64::consts::PI).sqrt() * bandwidth);
    let sum: f64 = values
        .iter()
        .map(|&v| {
            let z = (x - v) / bandwidth;
            (-0.5 * z * z).exp()
        })
        .sum();
    norm * sum / values.len() as f64
}
