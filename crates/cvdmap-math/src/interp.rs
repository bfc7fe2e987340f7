//! Interpolation utilities.
//!
//! - Linear interpolation ([`lerp`], [`inverse_lerp`], [`remap`])
//! - Evenly spaced samples ([`linspace`])
//!
//! # Usage
//!
//! ```rust
//! use cvdmap_math::{lerp, linspace};
//!
//! assert_eq!(lerp(0.0, 10.0, 0.5), 5.0);
//! assert_eq!(linspace(0.0, 1.0, 3), vec![0.0, 0.5, 1.0]);
//! ```

/// Linear interpolation between two values.
///
/// Returns `a` when `t = 0.0`, and `b` when `t = 1.0`.
/// For values outside [0, 1], the result is extrapolated.
#[inline]
pub fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Inverse linear interpolation.
///
/// Returns 0 when `a` and `b` coincide.
#[inline]
pub fn inverse_lerp(a: f64, b: f64, value: f64) -> f64 {
    if (b - a).abs() < 1e-12 {
        0.0
    } else {
        (value - a) / (b - a)
    }
}

/// Remaps a value from one range to another.
#[inline]
pub fn remap(value: f64, in_min: f64, in_max: f64, out_min: f64, out_max: f64) -> f64 {
    lerp(out_min, out_max, inverse_lerp(in_min, in_max, value))
}

/// Returns `n` evenly spaced values from `start` to `end` inclusive.
///
/// `n == 1` yields `[start]`, `n == 0` yields an empty vector.
pub fn linspace(start: f64, end: f64, n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![start],
        _ => {
            let last = (n - 1) as f64;
            (0..n).map(|i| lerp(start, end, i as f64 / last)).collect()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp() {
        assert_eq!(lerp(0.0, 10.0, 0.0), 0.0);
        assert_eq!(lerp(0.0, 10.0, 1.0), 10.0);
        assert_eq!(lerp(2.0, 4.0, 1.5), 5.0);
    }

    #[test]
    fn test_inverse_lerp() {
        assert_eq!(inverse_lerp(0.0, 10.0, 5.0), 0.5);
        assert_eq!(inverse_lerp(3.0, 3.0, 7.0), 0.0);
    }

    #[test]
    fn test_remap() {
        assert_eq!(remap(0.5, 0.0, 1.0, 0.0, 100.0), 50.0);
    }

    #[test]
    fn test_linspace() {
        assert!(linspace(0.0, 1.0, 0).is_empty());
        assert_eq!(linspace(4.0, 9.0, 1), vec![4.0]);
        let v = linspace(0.0, 100.0, 11);
        assert_eq!(v.len(), 11);
        assert_eq!(v[0], 0.0);
        assert_eq!(v[10], 100.0);
        assert!((v[3] - 30.0).abs() < 1e-12);
    }
}
