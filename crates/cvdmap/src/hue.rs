//! Hue linearization in the a'b' plane.
//!
//! [`make_linear`] rewrites the hue angle of every sample so that it steps by
//! a constant amount from the first to the last sample, while keeping each
//! sample's radius (chroma) and J'. The trajectory through a'b' becomes an
//! evenly paced spiral arc instead of a wandering path.
//!
//! ```text
//!  b'                           b'
//!  |   . .  .                   |    .  .  .
//!  |  .       ..     ====>      |  .         .
//!  | .          .               | .           .
//!  +-------------- a'           +-------------- a'
//! ```

use std::f64::consts::{PI, TAU};

use cvdmap_core::{ColorArray, N_SAMPLES};
use tracing::{debug, trace};

/// Samples with an a'b' radius below this are treated as achromatic and
/// carry no hue of their own.
pub const ACHROMATIC_EPSILON: f64 = 1e-9;

/// Unwrapped hue angle per sample, in radians.
///
/// Consecutive valid angles never differ by more than pi. Achromatic samples
/// take the previous valid angle; leading achromatic samples take the first
/// valid one. Returns `None` if every sample is achromatic.
pub fn hue_angles(jab: &ColorArray) -> Option<[f64; N_SAMPLES]> {
    let (a, b) = (jab.row(1), jab.row(2));
    let first_valid = (0..N_SAMPLES).find(|&i| a[i].hypot(b[i]) >= ACHROMATIC_EPSILON)?;

    let mut angles = [0.0; N_SAMPLES];
    let mut prev = b[first_valid].atan2(a[first_valid]);
    for (i, angle) in angles.iter_mut().enumerate() {
        if i > first_valid && a[i].hypot(b[i]) >= ACHROMATIC_EPSILON {
            prev += wrap_pi(b[i].atan2(a[i]) - prev);
        }
        *angle = prev;
    }
    Some(angles)
}

/// Wraps an angle difference into [-pi, pi).
#[inline]
fn wrap_pi(d: f64) -> f64 {
    (d + PI).rem_euclid(TAU) - PI
}

/// Redistributes hue angles with a constant step, keeping radius and J'.
///
/// A fully achromatic map is returned unchanged.
///
/// # Example
///
/// ```rust
/// use cvdmap::hue::make_linear;
/// use cvdmap_core::ColorArray;
///
/// // Quarter turn with an uneven pace
/// let jab = ColorArray::from_fn(|i| {
///     let t = (i as f64 / 255.0).powi(2) * std::f64::consts::FRAC_PI_2;
///     [50.0, 20.0 * t.cos(), 20.0 * t.sin()]
/// });
/// let linear = make_linear(&jab);
/// let mid = linear.sample(128);
/// let angle = mid[2].atan2(mid[1]);
/// assert!((angle - 128.0 / 255.0 * std::f64::consts::FRAC_PI_2).abs() < 1e-9);
/// ```
pub fn make_linear(jab: &ColorArray) -> ColorArray {
    let Some(angles) = hue_angles(jab) else {
        debug!("make_linear: achromatic map left unchanged");
        return jab.clone();
    };

    let (start, end) = (angles[0], angles[N_SAMPLES - 1]);
    let step = (end - start) / (N_SAMPLES - 1) as f64;
    trace!(start, end, step, "make_linear");

    ColorArray::from_fn(|i| {
        let [j, a, b] = jab.sample(i);
        let radius = a.hypot(b);
        let (sin, cos) = (start + step * i as f64).sin_cos();
        [j, radius * cos, radius * sin]
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn arc(theta: impl Fn(f64) -> f64, radius: impl Fn(f64) -> f64) -> ColorArray {
        ColorArray::from_fn(|i| {
            let t = i as f64 / (N_SAMPLES - 1) as f64;
            let (s, c) = theta(t).sin_cos();
            [20.0 + 60.0 * t, radius(t) * c, radius(t) * s]
        })
    }

    #[test]
    fn test_linear_is_noop() {
        let jab = arc(|t| -1.0 + 2.5 * t, |t| 10.0 + 5.0 * t);
        let out = make_linear(&jab);
        assert!(out.max_abs_diff(&jab) < 1e-9);
    }

    #[test]
    fn test_lightness_untouched() {
        let jab = arc(|t| t * t * 3.0, |_| 15.0);
        let out = make_linear(&jab);
        assert_eq!(out.row(0), jab.row(0));
    }

    #[test]
    fn test_radius_kept_and_angle_even() {
        let jab = arc(|t| (t * 2.0).sin(), |t| 5.0 + 30.0 * t * (1.0 - t));
        let out = make_linear(&jab);
        let angles = hue_angles(&out).unwrap();
        let step = angles[1] - angles[0];
        for i in 0..N_SAMPLES {
            let [_, a0, b0] = jab.sample(i);
            let [_, a1, b1] = out.sample(i);
            assert_abs_diff_eq!(a0.hypot(b0), a1.hypot(b1), epsilon = 1e-9);
            if i > 0 {
                assert_abs_diff_eq!(angles[i] - angles[i - 1], step, epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn test_unwrap_across_pi() {
        // Crosses the atan2 branch cut at pi
        let jab = arc(|t| 2.5 + 1.5 * t, |_| 12.0);
        let angles = hue_angles(&jab).unwrap();
        assert_abs_diff_eq!(angles[N_SAMPLES - 1] - angles[0], 1.5, epsilon = 1e-9);
        assert!(make_linear(&jab).max_abs_diff(&jab) < 1e-9);
    }

    #[test]
    fn test_achromatic_map_unchanged() {
        let jab = ColorArray::from_fn(|i| [i as f64 / 2.55, 0.0, 0.0]);
        assert!(hue_angles(&jab).is_none());
        assert_eq!(make_linear(&jab), jab);
    }

    #[test]
    fn test_achromatic_samples_carry_angle() {
        let mut jab = arc(|t| 0.5 + t, |_| 10.0);
        for i in 0..10 {
            jab[(1, i)] = 0.0;
            jab[(2, i)] = 0.0;
        }
        jab[(1, 100)] = 0.0;
        jab[(2, 100)] = 0.0;

        let angles = hue_angles(&jab).unwrap();
        assert_eq!(angles[0], angles[10]);
        assert_eq!(angles[100], angles[99]);

        let out = make_linear(&jab);
        // Zero radius stays zero
        assert_eq!(out.sample(100)[1], 0.0);
        assert_eq!(out.sample(3)[2], 0.0);
    }
}
