//! CIECAM02 color appearance model and the CAM02-UCS uniform space.
//!
//! Converts between XYZ (white Y = 100) and the perceptual correlates
//! J (lightness), M (colorfulness), h (hue angle), and from there to the
//! near-Euclidean J'a'b' coordinates of CAM02-UCS.
//!
//! # Pipeline
//!
//! ```text
//! XYZ --CAT02 + D_RGB + HPE--> RGB' --compress--> RGB'_a
//!     --opponent--> (A, a, b) --> J, M, h --UCS--> J', a', b'
//! ```
//!
//! The default [`ViewingConditions`] are D65 white, 64 lux ambient
//! (`L_A = 64 / pi / 5`), background `Y_b = 20` and an average surround.
//!
//! # Reference
//!
//! - CIE 159:2004, CIECAM02
//! - Luo, Cui, Li (2006), "Uniform colour spaces based on CIECAM02 colour
//!   appearance model"

use std::f64::consts::PI;
use std::sync::OnceLock;

use cvdmap_core::{Error, Result};
use cvdmap_math::{CAT02, CAT02_INV, D65_XYZ100, Mat3, Vec3, cat02_to_hpe, hpe_to_cat02};

// ============================================================================
// Viewing conditions
// ============================================================================

/// Surround parameters (F, c, N_c).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Surround {
    /// Maximum degree of adaptation
    pub f: f64,
    /// Impact of surround
    pub c: f64,
    /// Chromatic induction factor
    pub n_c: f64,
}

impl Surround {
    /// Average surround (reflection prints, monitors in a lit room).
    pub const AVERAGE: Self = Self {
        f: 1.0,
        c: 0.69,
        n_c: 1.0,
    };
    /// Dim surround (television).
    pub const DIM: Self = Self {
        f: 0.9,
        c: 0.59,
        n_c: 0.9,
    };
}

/// Appearance correlates: lightness J, colorfulness M, hue angle h (radians).
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Jmh {
    /// Lightness
    pub j: f64,
    /// Colorfulness
    pub m: f64,
    /// Hue angle in radians, (-pi, pi]
    pub h: f64,
}

/// CIECAM02 viewing conditions with every derived constant precomputed.
#[derive(Debug, Clone)]
pub struct ViewingConditions {
    surround: Surround,
    f_l: f64,
    z: f64,
    n_bb: f64,
    n_cb: f64,
    d: f64,
    a_w: f64,
    /// (1.64 - 0.29^n)^0.73
    chroma_scale: f64,
    /// XYZ to unadapted RGB' (CAT02, D_RGB, HPE combined)
    to_rgb_p: Mat3,
    from_rgb_p: Mat3,
}

impl ViewingConditions {
    /// Creates viewing conditions.
    ///
    /// # Arguments
    ///
    /// * `white` - adopted white in XYZ, Y = 100
    /// * `l_a` - adapting field luminance in cd/m^2
    /// * `y_b` - relative background luminance
    /// * `surround` - surround parameters
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if any value is non-finite or not
    /// strictly positive, or the white has a non-positive CAT02 response.
    pub fn new(white: Vec3, l_a: f64, y_b: f64, surround: Surround) -> Result<Self> {
        if !white.is_finite() || white.min_element() <= 0.0 {
            return Err(Error::invalid_parameter(
                "white",
                "must be finite and positive",
            ));
        }
        if (CAT02 * white).min_element() <= 0.0 {
            return Err(Error::invalid_parameter(
                "white",
                "has a non-positive cone response",
            ));
        }
        for (name, v) in [("l_a", l_a), ("y_b", y_b), ("surround.f", surround.f)] {
            if !v.is_finite() || v <= 0.0 {
                return Err(Error::invalid_parameter(name, format!("{v} must be positive")));
            }
        }
        Ok(Self::build(white, l_a, y_b, surround))
    }

    /// The conditions used throughout the workspace.
    pub fn standard() -> &'static Self {
        static STANDARD: OnceLock<ViewingConditions> = OnceLock::new();
        STANDARD.get_or_init(|| Self::build(D65_XYZ100, 64.0 / PI / 5.0, 20.0, Surround::AVERAGE))
    }

    // Inputs are validated by `new`; the standard ones are valid constants.
    fn build(white: Vec3, l_a: f64, y_b: f64, surround: Surround) -> Self {
        let k = 1.0 / (5.0 * l_a + 1.0);
        let k4 = k.powi(4);
        let f_l = 0.2 * k4 * (5.0 * l_a) + 0.1 * (1.0 - k4).powi(2) * (5.0 * l_a).cbrt();
        let n = y_b / white.y;
        let z = 1.48 + n.sqrt();
        let n_bb = 0.725 * n.powf(-0.2);
        let n_cb = n_bb;
        let d = (surround.f * (1.0 - (1.0 / 3.6) * ((-l_a - 42.0) / 92.0).exp())).clamp(0.0, 1.0);

        let rgb_w = CAT02 * white;
        let d_rgb = rgb_w.map(|c| d * white.y / c + 1.0 - d);

        let to_rgb_p = cat02_to_hpe() * Mat3::diagonal(d_rgb.x, d_rgb.y, d_rgb.z) * CAT02;
        let from_rgb_p =
            CAT02_INV * Mat3::diagonal(1.0 / d_rgb.x, 1.0 / d_rgb.y, 1.0 / d_rgb.z) * hpe_to_cat02();

        let rgb_aw = (to_rgb_p * white).map(|c| compress(c, f_l));
        let a_w = achromatic(rgb_aw, n_bb);

        Self {
            surround,
            f_l,
            z,
            n_bb,
            n_cb,
            d,
            a_w,
            chroma_scale: (1.64 - 0.29_f64.powf(n)).powf(0.73),
            to_rgb_p,
            from_rgb_p,
        }
    }

    /// Luminance level adaptation factor F_L.
    #[inline]
    pub fn f_l(&self) -> f64 {
        self.f_l
    }

    /// Degree of adaptation D.
    #[inline]
    pub fn degree_of_adaptation(&self) -> f64 {
        self.d
    }

    /// Achromatic response of the adopted white.
    #[inline]
    pub fn a_w(&self) -> f64 {
        self.a_w
    }

    /// XYZ (white Y = 100) to J, M, h.
    pub fn xyz_to_jmh(&self, xyz: Vec3) -> Jmh {
        let rgb_a = (self.to_rgb_p * xyz).map(|c| compress(c, self.f_l));
        let (r, g, b) = (rgb_a.x, rgb_a.y, rgb_a.z);

        let a = r - 12.0 * g / 11.0 + b / 11.0;
        let bb = (r + g - 2.0 * b) / 9.0;
        let h = bb.atan2(a);
        let e_t = eccentricity(h);

        let big_a = achromatic(rgb_a, self.n_bb);
        let j = 100.0 * (big_a.max(0.0) / self.a_w).powf(self.surround.c * self.z);

        let denom = r + g + 21.0 / 20.0 * b;
        let t = if denom.abs() < 1e-12 {
            0.0
        } else {
            (50000.0 / 13.0 * self.surround.n_c * self.n_cb * e_t * a.hypot(bb)) / denom
        };
        let c = t.max(0.0).powf(0.9) * (j / 100.0).sqrt() * self.chroma_scale;

        Jmh {
            j,
            m: c * self.f_l.powf(0.25),
            h,
        }
    }

    /// J, M, h back to XYZ (white Y = 100).
    ///
    /// Colors outside the physically realizable range produce non-finite
    /// components; callers testing gamut membership treat those as outside.
    pub fn jmh_to_xyz(&self, jmh: Jmh) -> Vec3 {
        let Jmh { j, m, h } = jmh;
        let c = m / self.f_l.powf(0.25);
        let t = if j <= 0.0 || c == 0.0 {
            0.0
        } else {
            (c / ((j / 100.0).sqrt() * self.chroma_scale)).powf(1.0 / 0.9)
        };

        let big_a = self.a_w * (j.max(0.0) / 100.0).powf(1.0 / (self.surround.c * self.z));
        let p2 = big_a / self.n_bb + 0.305;
        let p3 = 21.0 / 20.0;

        let (a, b) = if t == 0.0 {
            (0.0, 0.0)
        } else {
            let p1 = (50000.0 / 13.0 * self.surround.n_c * self.n_cb) * eccentricity(h) / t;
            let (sin_h, cos_h) = h.sin_cos();
            if sin_h.abs() >= cos_h.abs() {
                let p4 = p1 / sin_h;
                let b = p2 * (2.0 + p3) * (460.0 / 1403.0)
                    / (p4 + (2.0 + p3) * (220.0 / 1403.0) * (cos_h / sin_h) - 27.0 / 1403.0
                        + p3 * (6300.0 / 1403.0));
                (b * cos_h / sin_h, b)
            } else {
                let p5 = p1 / cos_h;
                let a = p2 * (2.0 + p3) * (460.0 / 1403.0)
                    / (p5 + (2.0 + p3) * (220.0 / 1403.0)
                        - (27.0 / 1403.0 - p3 * (6300.0 / 1403.0)) * (sin_h / cos_h));
                (a, a * sin_h / cos_h)
            }
        };

        let rgb_a = Vec3::new(
            (460.0 * p2 + 451.0 * a + 288.0 * b) / 1403.0,
            (460.0 * p2 - 891.0 * a - 261.0 * b) / 1403.0,
            (460.0 * p2 - 220.0 * a - 6300.0 * b) / 1403.0,
        );
        self.from_rgb_p * rgb_a.map(|c| decompress(c, self.f_l))
    }
}

/// Post-adaptation nonlinear response compression.
#[inline]
fn compress(x: f64, f_l: f64) -> f64 {
    let p = (f_l * x.abs() / 100.0).powf(0.42);
    (400.0 * p / (p + 27.13)).copysign(x) + 0.1
}

/// Inverse of [`compress`]. NaN for responses at or beyond the 400 asymptote.
#[inline]
fn decompress(x: f64, f_l: f64) -> f64 {
    let d = x - 0.1;
    let r = (100.0 / f_l) * ((27.13 * d.abs()) / (400.0 - d.abs())).powf(1.0 / 0.42);
    r.copysign(d)
}

#[inline]
fn achromatic(rgb_a: Vec3, n_bb: f64) -> f64 {
    (2.0 * rgb_a.x + rgb_a.y + rgb_a.z / 20.0 - 0.305) * n_bb
}

#[inline]
fn eccentricity(h: f64) -> f64 {
    0.25 * ((h + 2.0).cos() + 3.8)
}

// ============================================================================
// CAM02-UCS
// ============================================================================

/// Luo-Cui-Li uniform-space coefficients.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UcsCoefficients {
    /// Lightness compression
    pub c1: f64,
    /// Colorfulness compression
    pub c2: f64,
}

/// CAM02-UCS coefficients.
pub const CAM02_UCS: UcsCoefficients = UcsCoefficients {
    c1: 0.007,
    c2: 0.0228,
};

impl UcsCoefficients {
    /// J, M, h to J'a'b'.
    pub fn jmh_to_jab(&self, jmh: Jmh) -> Vec3 {
        let j_p = (1.0 + 100.0 * self.c1) * jmh.j / (1.0 + self.c1 * jmh.j);
        let m_p = (1.0 + self.c2 * jmh.m).ln() / self.c2;
        let (sin_h, cos_h) = jmh.h.sin_cos();
        Vec3::new(j_p, m_p * cos_h, m_p * sin_h)
    }

    /// J'a'b' to J, M, h.
    pub fn jab_to_jmh(&self, jab: Vec3) -> Jmh {
        let j = jab.x / (1.0 - self.c1 * (jab.x - 100.0));
        let m_p = jab.y.hypot(jab.z);
        Jmh {
            j,
            m: ((self.c2 * m_p).exp() - 1.0) / self.c2,
            h: jab.z.atan2(jab.y),
        }
    }
}

/// XYZ (white Y = 100) to CAM02-UCS J'a'b' under the standard conditions.
#[inline]
pub fn xyz100_to_jab(xyz: Vec3) -> Vec3 {
    CAM02_UCS.jmh_to_jab(ViewingConditions::standard().xyz_to_jmh(xyz))
}

/// CAM02-UCS J'a'b' to XYZ (white Y = 100) under the standard conditions.
#[inline]
pub fn jab_to_xyz100(jab: Vec3) -> Vec3 {
    ViewingConditions::standard().jmh_to_xyz(CAM02_UCS.jab_to_jmh(jab))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_standard_constants() {
        let vc = ViewingConditions::standard();
        assert_abs_diff_eq!(vc.f_l(), 0.273131, epsilon = 1e-6);
        assert_abs_diff_eq!(vc.degree_of_adaptation(), 0.831655, epsilon = 1e-6);
        assert_abs_diff_eq!(vc.a_w(), 25.515987, epsilon = 1e-5);
    }

    #[test]
    fn test_standard_transforms_are_inverse() {
        let vc = ViewingConditions::standard();
        assert!((vc.from_rgb_p * vc.to_rgb_p).max_abs_diff(&Mat3::IDENTITY) < 1e-12);
        assert!(vc.to_rgb_p.max_abs_diff(&Mat3::IDENTITY) > 0.1);

        let checked =
            ViewingConditions::new(D65_XYZ100, 64.0 / PI / 5.0, 20.0, Surround::AVERAGE).unwrap();
        assert_eq!(checked.to_rgb_p, vc.to_rgb_p);
        assert_eq!(checked.from_rgb_p, vc.from_rgb_p);
    }

    #[test]
    fn test_white_is_full_lightness() {
        let jmh = ViewingConditions::standard().xyz_to_jmh(D65_XYZ100);
        assert_abs_diff_eq!(jmh.j, 100.0, epsilon = 1e-9);
    }

    #[test]
    fn test_black_is_zero() {
        let jab = xyz100_to_jab(Vec3::ZERO);
        assert!(jab.length() < 1e-9);
        assert!(jab_to_xyz100(Vec3::ZERO).length() < 1e-9);
    }

    #[test]
    fn test_jmh_roundtrip() {
        let vc = ViewingConditions::standard();
        for xyz in [
            Vec3::new(19.01, 20.0, 21.78),
            Vec3::new(41.2, 21.3, 1.9),
            Vec3::new(18.0, 7.2, 95.0),
            Vec3::new(35.8, 71.5, 11.9),
        ] {
            let back = vc.jmh_to_xyz(vc.xyz_to_jmh(xyz));
            assert!(back.distance(xyz) < 1e-9, "{:?} -> {:?}", xyz, back);
        }
    }

    #[test]
    fn test_ucs_roundtrip() {
        let jmh = Jmh {
            j: 47.0,
            m: 31.5,
            h: -2.1,
        };
        let back = CAM02_UCS.jab_to_jmh(CAM02_UCS.jmh_to_jab(jmh));
        assert_abs_diff_eq!(back.j, jmh.j, epsilon = 1e-10);
        assert_abs_diff_eq!(back.m, jmh.m, epsilon = 1e-10);
        assert_abs_diff_eq!(back.h, jmh.h, epsilon = 1e-10);
    }

    #[test]
    fn test_ucs_lightness_endpoints() {
        let jab = CAM02_UCS.jmh_to_jab(Jmh {
            j: 100.0,
            m: 0.0,
            h: 0.0,
        });
        assert_abs_diff_eq!(jab.x, 100.0, epsilon = 1e-12);
    }

    #[test]
    fn test_custom_conditions() {
        let vc = ViewingConditions::new(D65_XYZ100, 318.31, 20.0, Surround::DIM).unwrap();
        assert!(vc.f_l() > ViewingConditions::standard().f_l());
        let xyz = Vec3::new(30.0, 25.0, 10.0);
        assert!(vc.jmh_to_xyz(vc.xyz_to_jmh(xyz)).distance(xyz) < 1e-9);
    }

    #[test]
    fn test_invalid_conditions() {
        let err = ViewingConditions::new(D65_XYZ100, -1.0, 20.0, Surround::AVERAGE).unwrap_err();
        assert!(err.is_parameter_error());
        assert!(ViewingConditions::new(Vec3::ZERO, 10.0, 20.0, Surround::AVERAGE).is_err());
        // Positive XYZ whose CAT02 response is negative
        let lopsided = Vec3::new(100.0, 1.0, 1.0);
        assert!(ViewingConditions::new(lopsided, 10.0, 20.0, Surround::AVERAGE).is_err());
    }
}
