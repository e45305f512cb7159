use std::f64::consts::PI;

/// 1-D Gaussian of standard deviation `sigma`, truncated to `±3·sigma` taps.
///
/// Weights follow `e^(−d²/2σ²) / √(2πσ²)` and are then normalised so they sum
/// to exactly 1; a constant signal passes through unchanged.
///
/// # Panics
/// Panics if `sigma == 0`.
///
/// # Example
/// ```
/// use pm_core::kernel::gaussian_kernel;
/// let k = gaussian_kernel(2);
/// assert_eq!(k.len(), 13);
/// assert!((k.iter().sum::<f64>() - 1.0).abs() < 1e-12);
/// ```
#[must_use]
pub fn gaussian_kernel(sigma: u32) -> Vec<f64> {
    assert!(sigma > 0, "gaussian sigma must be positive");
    let s = f64::from(sigma);
    let radius = 3 * i64::from(sigma);
    let norm = 1.0 / (2.0 * PI * s * s).sqrt();
    let mut weights: Vec<f64> = (-radius..=radius)
        .map(|d| {
            let d = d as f64;
            norm * (-(d * d) / (2.0 * s * s)).exp()
        })
        .collect();
    let total: f64 = weights.iter().sum();
    for w in &mut weights {
        *w /= total;
    }
    weights
}

/// Tent (triangle) kernel of half-width `radius`: `(1 − |d|/r) / r` for
/// `d ∈ [−r, r]`. The weights already sum to 1.
///
/// # Example
/// ```
/// use pm_core::kernel::tent_kernel;
/// let k = tent_kernel(5);
/// assert_eq!(k.len(), 11);
/// assert_eq!(k[0], 0.0);
/// assert!((k[5] - 0.2).abs() < 1e-12);
/// ```
#[must_use]
pub fn tent_kernel(radius: u32) -> Vec<f64> {
    assert!(radius > 0, "tent radius must be positive");
    let r = f64::from(radius);
    let radius = i64::from(radius);
    (-radius..=radius)
        .map(|d| (1.0 - (d as f64 / r).abs()) / r)
        .collect()
}
