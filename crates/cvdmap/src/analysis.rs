//! Colormap analysis: data normalization, uniformity and CVD gamut metrics.
//!
//! - [`normalize`] / [`bound`] - prepare scalar data for colormapping
//! - [`apply_colormap`] - map scalars to colors
//! - [`perceptual_deltas`] / [`uniformity`] - spacing of a map in J'a'b'
//! - [`cdps_slope`] - color distance versus data distance
//! - [`cvd_gamut_coverage`] - a'b' gamut area kept under CVD

use cvdmap_color::{CvdType, Severity, cvd::simulate_rgb, srgb1_to_jab};
use cvdmap_core::{ColorArray, Colormap, Error, N_SAMPLES, Result};
use tracing::{debug, trace};

/// Default RGB cube grid resolution for [`cvd_gamut_coverage`].
pub const DEFAULT_GAMUT_STEPS: usize = 17;

// ============================================================================
// Data preparation
// ============================================================================

fn mean_std(values: &[f64]) -> (f64, f64) {
    let n = values.len() as f64;
    let mean = values.iter().sum::<f64>() / n;
    let var = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / n;
    (mean, var.sqrt())
}

/// Z-scores of `values` (population standard deviation).
///
/// # Errors
///
/// [`Error::InvalidParameter`] if `values` is empty, holds non-finite
/// values, or has zero variance.
pub fn normalize(values: &[f64]) -> Result<Vec<f64>> {
    if values.is_empty() {
        return Err(Error::invalid_parameter("values", "empty"));
    }
    if values.iter().any(|v| !v.is_finite()) {
        return Err(Error::invalid_parameter("values", "contains non-finite values"));
    }
    let (mean, std) = mean_std(values);
    if std == 0.0 {
        return Err(Error::invalid_parameter("values", "zero variance"));
    }
    Ok(values.iter().map(|v| (v - mean) / std).collect())
}

/// Normalizes `values`, clamps the z-scores to [`low`, `high`] and rescales
/// that window to [0, 1].
///
/// ```rust
/// use cvdmap::analysis::bound;
///
/// let out = bound(&[1.0, 2.0, 3.0], 1.0, -1.0).unwrap();
/// assert_eq!(out, vec![0.0, 0.5, 1.0]);
/// ```
pub fn bound(values: &[f64], high: f64, low: f64) -> Result<Vec<f64>> {
    if high.is_nan() || low.is_nan() || high <= low {
        return Err(Error::invalid_parameter(
            "high",
            format!("must exceed low ({high} <= {low})"),
        ));
    }
    let span = high - low;
    Ok(normalize(values)?
        .into_iter()
        .map(|z| (z.clamp(low, high) - low) / span)
        .collect())
}

/// Maps each scalar in [0, 1] to its colormap color (nearest sample).
pub fn apply_colormap(values: &[f64], cmap: &Colormap) -> Vec<[f64; 3]> {
    values.iter().map(|&t| cmap.sample(t)).collect()
}

// ============================================================================
// Perceptual spacing
// ============================================================================

/// Euclidean distance in J'a'b'.
#[inline]
fn delta_e(p: [f64; 3], q: [f64; 3]) -> f64 {
    ((p[0] - q[0]).powi(2) + (p[1] - q[1]).powi(2) + (p[2] - q[2]).powi(2)).sqrt()
}

/// Distance between each pair of consecutive samples of a J'a'b' map.
pub fn perceptual_deltas(jab: &ColorArray) -> Vec<f64> {
    (1..N_SAMPLES)
        .map(|i| delta_e(jab.sample(i - 1), jab.sample(i)))
        .collect()
}

/// Coefficient of variation of [`perceptual_deltas`]. Zero means perfectly
/// even steps; a map with no steps at all also yields zero.
pub fn uniformity(jab: &ColorArray) -> f64 {
    let deltas = perceptual_deltas(jab);
    let (mean, std) = mean_std(&deltas);
    if mean == 0.0 { 0.0 } else { std / mean }
}

/// Slope of cumulative color distance against cumulative data distance.
///
/// `data` is a 1-D slice of values in [0, 1]. Each value is mapped through
/// `cmap`; the cumulative J'a'b' distance along the slice is regressed
/// through the origin on the cumulative absolute data change. With a
/// `reference` map (usually gray), the result is divided by the reference
/// slope on the same data.
///
/// # Errors
///
/// [`Error::InvalidParameter`] for fewer than 2 values, non-finite values,
/// constant data, or a reference with zero slope.
pub fn cdps_slope(data: &[f64], cmap: &Colormap, reference: Option<&Colormap>) -> Result<f64> {
    if data.len() < 2 {
        return Err(Error::invalid_parameter("data", "needs at least 2 values"));
    }
    if data.iter().any(|v| !v.is_finite()) {
        return Err(Error::invalid_parameter("data", "contains non-finite values"));
    }

    let slope = raw_cdps_slope(data, cmap)?;
    let Some(reference) = reference else {
        return Ok(slope);
    };
    let base = raw_cdps_slope(data, reference)?;
    if base == 0.0 {
        return Err(Error::invalid_parameter("reference", "zero color slope"));
    }
    trace!(slope, base, "cdps_slope");
    Ok(slope / base)
}

fn raw_cdps_slope(data: &[f64], cmap: &Colormap) -> Result<f64> {
    let colors: Vec<[f64; 3]> = apply_colormap(data, cmap)
        .into_iter()
        .map(srgb1_to_jab)
        .collect();

    let (mut x, mut y) = (0.0, 0.0);
    let (mut sxx, mut sxy) = (0.0, 0.0);
    for i in 1..data.len() {
        x += (data[i] - data[i - 1]).abs();
        y += delta_e(colors[i - 1], colors[i]);
        sxx += x * x;
        sxy += x * y;
    }
    if sxx == 0.0 {
        return Err(Error::invalid_parameter("data", "constant data"));
    }
    Ok(sxy / sxx)
}

// ============================================================================
// CVD gamut
// ============================================================================

/// Percentage of the normal-vision a'b' gamut area retained under CVD.
///
/// The gamut is the convex hull of a `steps`^3 grid over the sRGB cube
/// projected onto the a'b' plane.
///
/// # Errors
///
/// [`Error::InvalidParameter`] if `steps < 2`.
pub fn cvd_gamut_coverage(cvd_type: CvdType, severity: Severity, steps: usize) -> Result<f64> {
    if steps < 2 {
        return Err(Error::invalid_parameter("steps", "must be at least 2"));
    }

    let scale = (steps - 1) as f64;
    let mut normal = Vec::with_capacity(steps.pow(3));
    let mut seen = Vec::with_capacity(steps.pow(3));
    for r in 0..steps {
        for g in 0..steps {
            for b in 0..steps {
                let rgb = [r as f64 / scale, g as f64 / scale, b as f64 / scale];
                let [_, a, bb] = srgb1_to_jab(rgb);
                normal.push([a, bb]);
                let [_, a, bb] = srgb1_to_jab(simulate_rgb(rgb, cvd_type, severity));
                seen.push([a, bb]);
            }
        }
    }

    let full = hull_area(normal);
    let kept = hull_area(seen);
    let coverage = if full > 0.0 { 100.0 * kept / full } else { 0.0 };
    debug!(%cvd_type, %severity, full, kept, coverage, "cvd_gamut_coverage");
    Ok(coverage)
}

fn cross(o: [f64; 2], a: [f64; 2], b: [f64; 2]) -> f64 {
    (a[0] - o[0]) * (b[1] - o[1]) - (a[1] - o[1]) * (b[0] - o[0])
}

fn half_hull<'a>(points: impl Iterator<Item = &'a [f64; 2]>) -> Vec<[f64; 2]> {
    let mut chain: Vec<[f64; 2]> = Vec::new();
    for &p in points {
        while chain.len() >= 2 && cross(chain[chain.len() - 2], chain[chain.len() - 1], p) <= 0.0 {
            chain.pop();
        }
        chain.push(p);
    }
    chain
}

/// Area of the convex hull of `points` (monotone chain + shoelace).
fn hull_area(mut points: Vec<[f64; 2]>) -> f64 {
    points.sort_by(|p, q| p[0].total_cmp(&q[0]).then(p[1].total_cmp(&q[1])));
    points.dedup();
    if points.len() < 3 {
        return 0.0;
    }

    let mut hull = half_hull(points.iter());
    let mut upper = half_hull(points.iter().rev());
    // Each chain ends where the other starts
    hull.pop();
    upper.pop();
    hull.append(&mut upper);

    let n = hull.len();
    (0..n)
        .map(|i| {
            let (p, q) = (hull[i], hull[(i + 1) % n]);
            p[0] * q[1] - q[0] * p[1]
        })
        .sum::<f64>()
        .abs()
        / 2.0
}
