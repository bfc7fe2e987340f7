//! Conversion between color spaces.
//!
//! sRGB1 is the hub. Pairs without a direct path are routed through it:
//!
//! ```text
//!                 sRGB1+CVD
//!                 |       \
//!                 v        v
//! CAM02-UCS <--> sRGB1 <--> sRGB1-linear
//!     ^                          ^
//!     +--------------------------+
//! ```
//!
//! Nothing converts *into* sRGB1+CVD: the simulation is not invertible.
//!
//! # Clipping
//!
//! [`convert`] clamps to [0, 1] when the target is an RGB space and never
//! otherwise. [`convert_unclipped`] skips clamping entirely, so callers can
//! tell whether a perceptual color lies inside the sRGB gamut.
//!
//! # Usage
//!
//! ```rust
//! use cvdmap_color::{ColorSpace, convert};
//! use cvdmap_core::ColorArray;
//!
//! let rgb = ColorArray::from_fn(|i| [i as f64 / 255.0, 0.5, 0.25]);
//! let jab = convert(&rgb, ColorSpace::Srgb1, ColorSpace::Cam02Ucs).unwrap();
//! let back = convert(&jab, ColorSpace::Cam02Ucs, ColorSpace::Srgb1).unwrap();
//! assert!(back.max_abs_diff(&rgb) < 1e-9);
//! ```

use cvdmap_core::{ColorArray, Error, Result};
use cvdmap_math::Vec3;
use tracing::{debug, trace};

use crate::cam02::{jab_to_xyz100, xyz100_to_jab};
use crate::cvd;
use crate::primaries::{SRGB_TO_XYZ100, XYZ100_TO_SRGB};
use crate::space::ColorSpace;
use crate::transfer;

/// Linear sRGB to CAM02-UCS J'a'b'.
#[inline]
pub fn linear_to_jab(rgb: [f64; 3]) -> [f64; 3] {
    xyz100_to_jab(SRGB_TO_XYZ100 * Vec3::from_array(rgb)).to_array()
}

/// CAM02-UCS J'a'b' to linear sRGB, unclipped.
#[inline]
pub fn jab_to_linear(jab: [f64; 3]) -> [f64; 3] {
    (XYZ100_TO_SRGB * jab_to_xyz100(Vec3::from_array(jab))).to_array()
}

/// sRGB1 to CAM02-UCS J'a'b'.
///
/// ```rust
/// use cvdmap_color::srgb1_to_jab;
///
/// let jab = srgb1_to_jab([1.0, 0.0, 0.0]);
/// assert!((jab[0] - 60.06).abs() < 0.01);
/// ```
#[inline]
pub fn srgb1_to_jab(rgb: [f64; 3]) -> [f64; 3] {
    linear_to_jab(transfer::eotf_rgb(rgb))
}

/// CAM02-UCS J'a'b' to sRGB1, unclipped.
///
/// Out-of-gamut colors come back outside [0, 1], or non-finite when the
/// appearance model has no physical solution.
#[inline]
pub fn jab_to_srgb1(jab: [f64; 3]) -> [f64; 3] {
    transfer::oetf_rgb(jab_to_linear(jab))
}

/// Converts `data` from one color space to another.
///
/// Same-space conversion returns a copy. Results in an RGB target space are
/// clamped to [0, 1].
///
/// # Errors
///
/// [`Error::UnsupportedConversion`] if `to` is an `sRGB1+CVD` space other
/// than `from`.
pub fn convert(data: &ColorArray, from: ColorSpace, to: ColorSpace) -> Result<ColorArray> {
    if from == to {
        return Ok(data.clone());
    }
    let mut out = convert_unclipped(data, from, to)?;
    if to.is_rgb() {
        out.clip01_in_place();
    }
    Ok(out)
}

/// Like [`convert`], without clamping the result.
pub fn convert_unclipped(data: &ColorArray, from: ColorSpace, to: ColorSpace) -> Result<ColorArray> {
    if from == to {
        return Ok(data.clone());
    }
    if let ColorSpace::Srgb1Cvd { .. } = to {
        return Err(Error::unsupported_conversion(format!("{from:#}"), format!("{to:#}")));
    }

    if let Some(out) = convert_direct(data, from, to) {
        debug!(from = %from, to = %to, "convert direct");
        return Ok(out);
    }

    debug!(from = %from, to = %to, "convert via sRGB1");
    convert_direct(data, from, ColorSpace::Srgb1)
        .and_then(|hub| convert_direct(&hub, ColorSpace::Srgb1, to))
        .ok_or_else(|| Error::unsupported_conversion(format!("{from:#}"), format!("{to:#}")))
}

/// Single-step conversion, `None` if the pair has no direct path.
fn convert_direct(data: &ColorArray, from: ColorSpace, to: ColorSpace) -> Option<ColorArray> {
    use ColorSpace::*;

    trace!(from = %from, to = %to, "convert_direct");
    let out = match (from, to) {
        (Srgb1, Srgb1Linear) => data.map_samples(transfer::eotf_rgb),
        (Srgb1Linear, Srgb1) => data.map_samples(transfer::oetf_rgb),
        (Srgb1, Cam02Ucs) => data.map_samples(srgb1_to_jab),
        (Cam02Ucs, Srgb1) => data.map_samples(jab_to_srgb1),
        (Srgb1Linear, Cam02Ucs) => data.map_samples(linear_to_jab),
        (Cam02Ucs, Srgb1Linear) => data.map_samples(jab_to_linear),
        (Srgb1Cvd { cvd_type, severity }, Srgb1) => cvd::simulate(data, cvd_type, severity),
        (Srgb1Cvd { cvd_type, severity }, Srgb1Linear) => {
            cvd::simulate(data, cvd_type, severity).map_samples(transfer::eotf_rgb)
        }
        _ => return None,
    };
    Some(out)
}
