//! 3x3 matrix type for linear color transforms.
//!
//! [`Mat3`] is used for RGB-to-XYZ conversion, cone-response transforms and
//! CVD simulation.
//!
//! # Convention
//!
//! Matrices are stored in **row-major** order and use **column vectors**:
//!
//! ```text
//! | m00 m01 m02 |   | x |   | m00*x + m01*y + m02*z |
//! | m10 m11 m12 | * | y | = | m10*x + m11*y + m12*z |
//! | m20 m21 m22 |   | z |   | m20*x + m21*y + m22*z |
//! ```
//!
//! # Usage
//!
//! ```rust
//! use cvdmap_math::{Mat3, Vec3};
//!
//! let rgb_to_xyz = Mat3::from_rows([
//!     [0.4124564, 0.3575761, 0.1804375],
//!     [0.2126729, 0.7151522, 0.0721750],
//!     [0.0193339, 0.1191920, 0.9503041],
//! ]);
//! let xyz = rgb_to_xyz * Vec3::new(1.0, 0.0, 0.0);
//! assert!((xyz.x - 0.4124564).abs() < 1e-12);
//! ```

use crate::Vec3;
use std::ops::{Add, Index, Mul, Sub};

/// A 3x3 matrix in row-major order.
#[derive(Debug, Clone, Copy, PartialEq)]
#[repr(C)]
pub struct Mat3 {
    /// Matrix elements in row-major order: [row0, row1, row2]
    pub m: [[f64; 3]; 3],
}

impl Mat3 {
    /// Identity matrix.
    pub const IDENTITY: Self = Self {
        m: [[1.0, 0.0, 0.0], [0.0, 1.0, 0.0], [0.0, 0.0, 1.0]],
    };

    /// Creates a matrix from row arrays.
    #[inline]
    pub const fn from_rows(rows: [[f64; 3]; 3]) -> Self {
        Self { m: rows }
    }

    /// Creates a matrix from column arrays.
    #[inline]
    pub const fn from_cols(cols: [[f64; 3]; 3]) -> Self {
        Self {
            m: [
                [cols[0][0], cols[1][0], cols[2][0]],
                [cols[0][1], cols[1][1], cols[2][1]],
                [cols[0][2], cols[1][2], cols[2][2]],
            ],
        }
    }

    /// Creates a diagonal matrix.
    #[inline]
    pub const fn diagonal(d0: f64, d1: f64, d2: f64) -> Self {
        Self::from_rows([[d0, 0.0, 0.0], [0.0, d1, 0.0], [0.0, 0.0, d2]])
    }

    /// Returns the transpose of this matrix.
    #[inline]
    pub fn transpose(&self) -> Self {
        Self::from_cols(self.m)
    }

    /// Element-wise blend `self + (other - self) * t`.
    #[inline]
    pub fn lerp(&self, other: &Self, t: f64) -> Self {
        *self + (*other - *self) * t
    }

    /// Largest absolute element-wise difference.
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        self.m
            .iter()
            .flatten()
            .zip(other.m.iter().flatten())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    /// Converts to glam DMat3 (column-major).
    #[inline]
    pub fn to_glam(&self) -> glam::DMat3 {
        // glam is column-major, so the transpose's rows are our columns
        glam::DMat3::from_cols_array_2d(&self.transpose().m)
    }

    /// Creates from glam DMat3.
    #[inline]
    pub fn from_glam(m: glam::DMat3) -> Self {
        Self::from_cols(m.to_cols_array_2d())
    }
}

impl Default for Mat3 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl Mul<Vec3> for Mat3 {
    type Output = Vec3;

    #[inline]
    fn mul(self, rhs: Vec3) -> Vec3 {
        Vec3::from_array((self.to_glam() * glam::DVec3::from_array(rhs.to_array())).to_array())
    }
}

impl Mul for Mat3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        Self::from_glam(self.to_glam() * rhs.to_glam())
    }
}

impl Mul<f64> for Mat3 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: f64) -> Self {
        Self::from_rows(self.m.map(|row| row.map(|v| v * rhs)))
    }
}

impl Add for Mat3 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        let mut out = self;
        for i in 0..3 {
            for j in 0..3 {
                out.m[i][j] += rhs.m[i][j];
            }
        }
        out
    }
}

impl Sub for Mat3 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self + rhs * -1.0
    }
}

impl Index<usize> for Mat3 {
    type Output = [f64; 3];

    #[inline]
    fn index(&self, i: usize) -> &[f64; 3] {
        &self.m[i]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    fn sample() -> Mat3 {
        Mat3::from_rows([[1.0, 2.0, 3.0], [0.0, 1.0, 4.0], [5.0, 6.0, 0.0]])
    }

    #[test]
    fn test_mat3_identity() {
        let v = Vec3::new(1.0, 2.0, 3.0);
        assert_eq!(Mat3::IDENTITY * v, v);
    }

    #[test]
    fn test_mat3_transpose() {
        let t = sample().transpose();
        assert_eq!(t.m[0][1], 0.0);
        assert_eq!(t.m[1][0], 2.0);
        assert_eq!(t.transpose(), sample());
    }

    #[test]
    fn test_mat3_product() {
        let m = sample() * Mat3::diagonal(2.0, 1.0, 0.5);
        assert_eq!(m, Mat3::from_rows([[2.0, 2.0, 1.5], [0.0, 1.0, 2.0], [10.0, 6.0, 0.0]]));
        let v = Vec3::new(1.0, -1.0, 2.0);
        assert_abs_diff_eq!((m * v).x, (sample() * Vec3::new(2.0, -1.0, 1.0)).x, epsilon = 1e-12);
    }

    #[test]
    fn test_mat3_row_major_product() {
        // Row-major storage survives the column-major glam round trip
        let m = sample();
        assert_eq!(Mat3::from_glam(m.to_glam()), m);
        assert_eq!(m * Vec3::new(1.0, 0.0, 0.0), Vec3::new(1.0, 0.0, 5.0));
        let swap = Mat3::from_rows([[0.0, 1.0, 0.0], [1.0, 0.0, 0.0], [0.0, 0.0, 1.0]]);
        assert_eq!((swap * m).m[0], [0.0, 1.0, 4.0]);
        assert_eq!((m * swap).m[0], [2.0, 1.0, 3.0]);
    }

    #[test]
    fn test_mat3_lerp() {
        let a = Mat3::IDENTITY;
        let b = Mat3::diagonal(3.0, 5.0, 1.0);
        assert_eq!(a.lerp(&b, 0.0), a);
        assert_eq!(a.lerp(&b, 1.0), b);
        assert_eq!(a.lerp(&b, 0.5), Mat3::diagonal(2.0, 3.0, 1.0));
    }
}
