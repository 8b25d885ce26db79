//! Cubic least squares on the normalized curve and its closed-form integral.

use nalgebra::{Matrix4, Vector4};

use crate::catchment::NormalizedSample;
use crate::error::{HypsoError, Result};

/// R² below this flags the catchment with a data-quality warning.
pub const R2_WARN_THRESHOLD: f64 = 0.95;

/// Degree-3 least-squares fit of relative elevation on relative area, raw
/// power basis. The intercept is estimated so the betas are unbiased, but
/// only the betas enter the integral: the hypsometric curve passes through
/// the origin by construction (0% area ⇒ 0% elevation).
#[derive(Debug, Clone, Copy)]
pub struct CubicFit {
    /// β1, β2, β3 for x, x², x³.
    pub beta: [f64; 3],
    pub intercept: f64,
    pub r_squared: f64,
}

impl CubicFit {
    /// Origin-anchored part β1·x + β2·x² + β3·x³. Meaningful on [0, 1] only.
    pub fn eval_origin(&self, x: f64) -> f64 {
        ((self.beta[2] * x + self.beta[1]) * x + self.beta[0]) * x
    }

    /// Full fitted polynomial, intercept included.
    pub fn eval(&self, x: f64) -> f64 {
        self.intercept + self.eval_origin(x)
    }
}

/// Fit the cubic via the normal equations XᵀX β = Xᵀy with X = [1, x, x², x³].
/// Needs at least 4 distinct abscissae; fewer leaves the system rank-deficient.
pub fn fit_cubic(code: &str, curve: &[NormalizedSample]) -> Result<CubicFit> {
    let distinct = distinct_abscissae(curve);
    if distinct < 4 {
        return Err(HypsoError::InsufficientData {
            code: code.to_owned(),
            distinct,
        });
    }

    // Power sums Σ x^k (k = 0..6) and Σ x^k·y (k = 0..3) assemble both sides.
    let mut sx = [0.0f64; 7];
    let mut sxy = [0.0f64; 4];
    for s in curve {
        let mut p = 1.0;
        for k in 0..7 {
            sx[k] += p;
            if k < 4 {
                sxy[k] += p * s.rel_elev;
            }
            p *= s.rel_area;
        }
    }
    let xtx = Matrix4::from_fn(|r, c| sx[r + c]);
    let xty = Vector4::from_fn(|r, _| sxy[r]);
    let sol = xtx.lu().solve(&xty).ok_or_else(|| HypsoError::InsufficientData {
        code: code.to_owned(),
        distinct,
    })?;

    let mut fit = CubicFit {
        intercept: sol[0],
        beta: [sol[1], sol[2], sol[3]],
        r_squared: 1.0,
    };
    fit.r_squared = r_squared(curve, &fit);
    Ok(fit)
}

/// Definite integral of the origin-anchored cubic over [0, 1]:
/// HI = β1/2 + β2/3 + β3/4.
pub fn hypsometric_integral(fit: &CubicFit) -> f64 {
    fit.beta[0] / 2.0 + fit.beta[1] / 3.0 + fit.beta[2] / 4.0
}

fn distinct_abscissae(curve: &[NormalizedSample]) -> usize {
    // rel_area is non-decreasing, so distinct values are the strict steps.
    let mut n = 0;
    let mut last = f64::NAN;
    for s in curve {
        if s.rel_area != last {
            n += 1;
            last = s.rel_area;
        }
    }
    n
}

fn r_squared(curve: &[NormalizedSample], fit: &CubicFit) -> f64 {
    let n = curve.len() as f64;
    let mean = curve.iter().map(|s| s.rel_elev).sum::<f64>() / n;
    let ss_tot: f64 = curve.iter().map(|s| (s.rel_elev - mean).powi(2)).sum();
    let ss_res: f64 = curve
        .iter()
        .map(|s| (s.rel_elev - fit.eval(s.rel_area)).powi(2))
        .sum();
    if ss_tot < 1e-12 {
        return 1.0;
    }
    1.0 - ss_res / ss_tot
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn curve_of(points: &[(f64, f64)]) -> Vec<NormalizedSample> {
        points
            .iter()
            .map(|&(rel_area, rel_elev)| NormalizedSample { rel_area, rel_elev })
            .collect()
    }

    /// Composite Simpson quadrature of the origin-anchored cubic.
    fn quadrature(fit: &CubicFit, intervals: usize) -> f64 {
        let h = 1.0 / intervals as f64;
        let mut acc = fit.eval_origin(0.0) + fit.eval_origin(1.0);
        for i in 1..intervals {
            let w = if i % 2 == 0 { 2.0 } else { 4.0 };
            acc += w * fit.eval_origin(i as f64 * h);
        }
        acc * h / 3.0
    }

    #[test]
    fn straight_line_reduces_to_identity() {
        let curve = curve_of(&[
            (0.1, 0.1),
            (0.3, 0.3),
            (0.5, 0.5),
            (0.7, 0.7),
            (0.9, 0.9),
            (1.0, 1.0),
        ]);
        let fit = fit_cubic("C001", &curve).unwrap();
        assert_relative_eq!(fit.beta[0], 1.0, epsilon = 1e-6);
        assert!(fit.beta[1].abs() < 1e-6, "beta2={}", fit.beta[1]);
        assert!(fit.beta[2].abs() < 1e-6, "beta3={}", fit.beta[2]);
        assert!(fit.intercept.abs() < 1e-6, "intercept={}", fit.intercept);
        assert_relative_eq!(hypsometric_integral(&fit), 0.5, epsilon = 1e-6);
        assert!(fit.r_squared > 0.9999);
    }

    #[test]
    fn closed_form_matches_quadrature() {
        let curve = curve_of(&[
            (0.111, 0.0),
            (0.333, 0.25),
            (0.667, 0.5),
            (0.889, 0.75),
            (1.0, 1.0),
        ]);
        let fit = fit_cubic("C001", &curve).unwrap();
        let hi = hypsometric_integral(&fit);
        assert!((hi - quadrature(&fit, 2000)).abs() < 1e-9, "HI={}", hi);
    }

    #[test]
    fn recovers_exact_cubic_coefficients() {
        // y = 0.2 + 1.5x − 1.2x² + 0.5x³ sampled exactly
        let xs = [0.0, 0.2, 0.4, 0.6, 0.8, 1.0];
        let curve: Vec<NormalizedSample> = xs
            .iter()
            .map(|&x| NormalizedSample {
                rel_area: x,
                rel_elev: 0.2 + 1.5 * x - 1.2 * x * x + 0.5 * x * x * x,
            })
            .collect();
        let fit = fit_cubic("C002", &curve).unwrap();
        assert_relative_eq!(fit.intercept, 0.2, epsilon = 1e-8);
        assert_relative_eq!(fit.beta[0], 1.5, epsilon = 1e-8);
        assert_relative_eq!(fit.beta[1], -1.2, epsilon = 1e-7);
        assert_relative_eq!(fit.beta[2], 0.5, epsilon = 1e-7);
    }

    #[test]
    fn three_samples_are_insufficient() {
        let curve = curve_of(&[(0.2, 0.1), (0.6, 0.5), (1.0, 1.0)]);
        let err = fit_cubic("C003", &curve).unwrap_err();
        assert!(matches!(
            err,
            HypsoError::InsufficientData { distinct: 3, .. }
        ));
    }

    #[test]
    fn duplicate_abscissae_do_not_count_as_distinct() {
        let curve = curve_of(&[(0.2, 0.1), (0.2, 0.2), (0.6, 0.5), (1.0, 1.0)]);
        let err = fit_cubic("C004", &curve).unwrap_err();
        assert!(matches!(
            err,
            HypsoError::InsufficientData { distinct: 3, .. }
        ));
    }

    #[test]
    fn r_squared_drops_for_noisy_data() {
        // Alternating jumps no cubic can follow
        let curve = curve_of(&[
            (0.1, 0.9),
            (0.2, 0.1),
            (0.4, 0.8),
            (0.6, 0.2),
            (0.8, 0.9),
            (1.0, 0.1),
        ]);
        let fit = fit_cubic("C005", &curve).unwrap();
        assert!(fit.r_squared < R2_WARN_THRESHOLD, "R²={}", fit.r_squared);
    }
}
