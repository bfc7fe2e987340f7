//! sRGB primaries as RGB/XYZ matrices.
//!
//! # Matrix derivation
//!
//! 1. Convert each Rec.709 primary from xy to XYZ (Y = 1)
//! 2. Solve for the per-primary scale that maps RGB white to the white point
//! 3. Multiply the primary columns by those scales
//!
//! The white is pinned to the [`D65_XYZ100`](cvdmap_math::D65_XYZ100) used by
//! the appearance model, so sRGB white is exactly the adopted white. Both
//! matrices were solved in exact rational arithmetic and rounded once to f64.
//!
//! # Usage
//!
//! ```rust
//! use cvdmap_color::primaries::{SRGB_TO_XYZ100, XYZ100_TO_SRGB};
//! use cvdmap_math::{Vec3, D65_XYZ100};
//!
//! let white = SRGB_TO_XYZ100 * Vec3::ONE;
//! assert!(white.distance(D65_XYZ100) < 1e-9);
//! let back = XYZ100_TO_SRGB * white;
//! assert!(back.distance(Vec3::ONE) < 1e-12);
//! ```

use cvdmap_math::Mat3;

/// Linear sRGB [0, 1] to XYZ with Y of white = 100.
pub const SRGB_TO_XYZ100: Mat3 = Mat3::from_rows([
    [41.24564390896921, 35.7576077643909, 18.043748326639893],
    [21.267285140562247, 71.5152155287818, 7.217499330655957],
    [1.9333895582329317, 11.919202588130299, 95.03040785363677],
]);

/// XYZ (white Y = 100) to linear sRGB [0, 1].
pub const XYZ100_TO_SRGB: Mat3 = Mat3::from_rows([
    [0.03240454162114106, -0.015371385127977167, -0.0049853140955601625],
    [-0.009692660305051868, 0.01876010845446694, 0.0004155601753034984],
    [0.000556434309591147, -0.0020402591351675386, 0.01057225188223179],
]);

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use cvdmap_math::{D65_XYZ100, Vec3};

    #[test]
    fn test_srgb_matrix_matches_iec() {
        let m = SRGB_TO_XYZ100 * 0.01;
        assert_abs_diff_eq!(m.m[0][0], 0.4124, epsilon = 1e-3);
        assert_abs_diff_eq!(m.m[1][1], 0.7152, epsilon = 1e-3);
        assert_abs_diff_eq!(m.m[2][2], 0.9505, epsilon = 1e-3);
    }

    #[test]
    fn test_xyz100_white() {
        let w = SRGB_TO_XYZ100 * Vec3::ONE;
        assert_abs_diff_eq!(w.x, D65_XYZ100.x, epsilon = 1e-9);
        assert_abs_diff_eq!(w.y, 100.0, epsilon = 1e-9);
        assert_abs_diff_eq!(w.z, D65_XYZ100.z, epsilon = 1e-9);
    }

    #[test]
    fn test_inverse() {
        let id = XYZ100_TO_SRGB * SRGB_TO_XYZ100;
        assert!(id.max_abs_diff(&Mat3::IDENTITY) < 1e-12);
        let id = SRGB_TO_XYZ100 * XYZ100_TO_SRGB;
        assert!(id.max_abs_diff(&Mat3::IDENTITY) < 1e-12);
    }

    #[test]
    fn test_primary_chromaticities() {
        // Each column is a primary with its Rec.709 xy
        for (col, (x, y)) in [(0.64, 0.33), (0.30, 0.60), (0.15, 0.06)].into_iter().enumerate() {
            let xyz = Vec3::new(
                SRGB_TO_XYZ100.m[0][col],
                SRGB_TO_XYZ100.m[1][col],
                SRGB_TO_XYZ100.m[2][col],
            );
            let sum = xyz.x + xyz.y + xyz.z;
            assert_abs_diff_eq!(xyz.x / sum, x, epsilon = 1e-12);
            assert_abs_diff_eq!(xyz.y / sum, y, epsilon = 1e-12);
        }
    }
}
