// smooth.rs - Gaussian smoothing of the height plane
//
// Separable kernel, rows then columns, accumulated in f64.
// Boundary is half-sample symmetric: d c b a | a b c d | d c b a
// so edges keep their level instead of fading toward zero.
// x and y are never read, so the result does not depend on spatial_scale.

use ndarray::{Array2, ArrayView1, ArrayViewMut1, Axis};

use super::HeightField;
use crate::error::{ReliefError, Result};

/// Kernel half-width in standard deviations
pub const TRUNCATE: f64 = 4.0;

/// Largest accepted sigma; beyond this the field is flat to f32 precision anyway
pub const MAX_SIGMA: f32 = 1.0e4;

/// Blur the z plane with standard deviation `sigma` (in samples)
pub fn smooth(field: &HeightField, sigma: f32) -> Result<HeightField> {
    if !(sigma >= 0.0 && sigma.is_finite()) {
        return Err(ReliefError::config(
            "smoothing_sigma",
            format!("must be >= 0 (got {sigma})"),
        ));
    }
    if sigma > MAX_SIGMA {
        return Err(ReliefError::config(
            "smoothing_sigma",
            format!("must be <= {MAX_SIGMA} (got {sigma})"),
        ));
    }
    if sigma == 0.0 {
        return Ok(field.clone());
    }

    let kernel = gaussian_kernel(sigma as f64);
    let z = field.z().mapv(f64::from);
    let z = convolve(&z, &kernel, Axis(0));
    let z = convolve(&z, &kernel, Axis(1));

    Ok(field.with_z(z.mapv(|v| v as f32)))
}

/// Normalized 1D Gaussian weights, length 2 * radius + 1
pub fn gaussian_kernel(sigma: f64) -> Vec<f64> {
    let radius = (TRUNCATE * sigma + 0.5) as i64;
    let inv = -0.5 / (sigma * sigma);

    let mut weights: Vec<f64> = (-radius..=radius)
        .map(|x| (inv * (x * x) as f64).exp())
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.iter_mut().for_each(|w| *w /= sum);
    weights
}

fn convolve(src: &Array2<f64>, kernel: &[f64], axis: Axis) -> Array2<f64> {
    let taps = fold_taps(kernel, src.len_of(axis));
    let mut out = Array2::zeros(src.dim());
    for (dst, lane) in out.lanes_mut(axis).into_iter().zip(src.lanes(axis)) {
        convolve_lane(lane, dst, &taps);
    }
    out
}

/// (offset, weight) pairs for a lane of length `n`.
///
/// `reflect` repeats every 2n samples, so a kernel wider than that is
/// summed onto 2n offsets; the lane cost stays O(n * min(kernel, 2n)).
fn fold_taps(kernel: &[f64], n: usize) -> Vec<(i64, f64)> {
    let radius = (kernel.len() / 2) as i64;
    let period = 2 * n;
    if kernel.len() <= period {
        return kernel
            .iter()
            .enumerate()
            .map(|(k, &w)| (k as i64 - radius, w))
            .collect();
    }

    let mut folded = vec![0.0; period];
    for (k, &w) in kernel.iter().enumerate() {
        folded[(k as i64 - radius).rem_euclid(period as i64) as usize] += w;
    }
    folded
        .into_iter()
        .enumerate()
        .map(|(q, w)| (q as i64, w))
        .collect()
}

fn convolve_lane(src: ArrayView1<f64>, mut dst: ArrayViewMut1<f64>, taps: &[(i64, f64)]) {
    let n = src.len();
    for i in 0..n {
        let mut acc = 0.0;
        for &(offset, w) in taps {
            acc += w * src[reflect(i as i64 + offset, n)];
        }
        dst[i] = acc;
    }
}

/// Fold an out-of-range index back into [0, n)
#[inline]
fn reflect(i: i64, n: usize) -> usize {
    let n = n as i64;
    let period = 2 * n;
    let m = i.rem_euclid(period);
    (if m < n { m } else { period - 1 - m }) as usize
}
