//! Cone-response matrices and reference white for the CIECAM02 model.
//!
//! CIECAM02 moves XYZ through two cone spaces:
//!
//! ```text
//! XYZ --CAT02--> sharpened RGB --(degree of adaptation)--> RGB_c
//!     --CAT02^-1, HPE--> Hunt-Pointer-Estevez RGB' --> compression
//! ```
//!
//! # Usage
//!
//! ```rust
//! use cvdmap_math::{CAT02, D65_XYZ100};
//!
//! let rgb_w = CAT02 * D65_XYZ100;
//! assert!(rgb_w.x > 90.0 && rgb_w.x < 100.0);
//! ```

use crate::{Mat3, Vec3};

/// CIE Standard Illuminant D65 in XYZ with Y = 100.
pub const D65_XYZ100: Vec3 = Vec3::new(95.047, 100.0, 108.883);

/// CAT02 chromatic adaptation matrix (XYZ to sharpened cone RGB).
///
/// # Reference
///
/// CIE 159:2004, A colour appearance model for colour management systems:
/// CIECAM02.
pub const CAT02: Mat3 = Mat3::from_rows([
    [0.7328, 0.4296, -0.1624],
    [-0.7036, 1.6975, 0.0061],
    [0.0030, 0.0136, 0.9834],
]);

/// Inverse of [`CAT02`] (sharpened cone RGB to XYZ), exact to f64
/// precision.
pub const CAT02_INV: Mat3 = Mat3::from_rows([
    [1.0961238208355142, -0.27886900021828726, 0.1827451793827731],
    [0.45436904197535916, 0.4735331543074117, 0.07209780371722913],
    [-0.009627608738429355, -0.005698031216113421, 1.0153256399545427],
]);

/// Hunt-Pointer-Estevez matrix (XYZ to physiological cone RGB'),
/// normalized to equal-energy white.
pub const HPE: Mat3 = Mat3::from_rows([
    [0.38971, 0.68898, -0.07868],
    [-0.22981, 1.18340, 0.04641],
    [0.00000, 0.00000, 1.00000],
]);

/// Inverse of [`HPE`], exact to f64 precision.
pub const HPE_INV: Mat3 = Mat3::from_rows([
    [1.9101968340520348, -1.1121238927878747, 0.20190795676749937],
    [0.37095008824868864, 0.6290542573926132, -8.055142184358517e-06],
    [0.0, 0.0, 1.0],
]);

/// `HPE * CAT02^-1`, the step from adapted sharpened RGB to RGB'.
#[inline]
pub fn cat02_to_hpe() -> Mat3 {
    HPE * CAT02_INV
}

/// `CAT02 * HPE^-1`, the inverse of [`cat02_to_hpe`].
#[inline]
pub fn hpe_to_cat02() -> Mat3 {
    CAT02 * HPE_INV
}
