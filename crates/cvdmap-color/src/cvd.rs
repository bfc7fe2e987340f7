//! Color-vision deficiency simulation.
//!
//! Simulation is a 3x3 matrix applied to linear-light sRGB. The matrix for a
//! given severity blends the identity with the full-severity matrix:
//!
//! ```text
//! M(s) = I + (s / 100) * (M_full - I)
//! ```
//!
//! # Reference
//!
//! Machado, Oliveira, Fernandes (2009), "A Physiologically-based Model for
//! Simulation of Color Vision Deficiency".
//!
//! # Usage
//!
//! ```rust
//! use cvdmap_color::cvd::{CvdType, Severity, simulate_rgb};
//!
//! let rgb = [0.8, 0.2, 0.1];
//! assert_eq!(simulate_rgb(rgb, CvdType::Deuteranomaly, Severity::NONE), rgb);
//! ```

use std::fmt;
use std::str::FromStr;

use cvdmap_core::{ColorArray, Error, Result};
use cvdmap_math::{Mat3, Vec3};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::transfer;

/// Full-severity protanomaly matrix (linear sRGB).
pub const PROTANOMALY_FULL: Mat3 = Mat3::from_rows([
    [0.152286, 1.052583, -0.204868],
    [0.114503, 0.786281, 0.099216],
    [-0.003882, -0.048116, 1.051998],
]);

/// Full-severity deuteranomaly matrix (linear sRGB).
pub const DEUTERANOMALY_FULL: Mat3 = Mat3::from_rows([
    [0.367322, 0.860646, -0.227968],
    [0.280085, 0.672501, 0.047413],
    [-0.011820, 0.042940, 0.968881],
]);

/// Kind of anomalous trichromacy to simulate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CvdType {
    /// Reduced M-cone sensitivity (most common).
    #[default]
    Deuteranomaly,
    /// Reduced L-cone sensitivity.
    Protanomaly,
}

impl CvdType {
    /// All supported types.
    pub const ALL: [CvdType; 2] = [CvdType::Deuteranomaly, CvdType::Protanomaly];

    /// Canonical lowercase name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Deuteranomaly => "deuteranomaly",
            Self::Protanomaly => "protanomaly",
        }
    }

    /// Full-severity simulation matrix.
    pub const fn full_matrix(&self) -> Mat3 {
        match self {
            Self::Deuteranomaly => DEUTERANOMALY_FULL,
            Self::Protanomaly => PROTANOMALY_FULL,
        }
    }
}

impl fmt::Display for CvdType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for CvdType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "deuteranomaly" => Ok(Self::Deuteranomaly),
            "protanomaly" => Ok(Self::Protanomaly),
            other => Err(Error::invalid_parameter(
                "cvd_type",
                format!("unknown CVD type '{other}', expected deuteranomaly or protanomaly"),
            )),
        }
    }
}

impl Serialize for CvdType {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for CvdType {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

/// Simulation severity, an integer percentage in 0..=100.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Severity(u8);

impl Severity {
    /// No deficiency; simulation is the identity.
    pub const NONE: Self = Self(0);
    /// Full severity.
    pub const FULL: Self = Self(100);

    /// Creates a severity.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] if `value > 100`.
    pub fn new(value: u32) -> Result<Self> {
        match u8::try_from(value) {
            Ok(v) if v <= 100 => Ok(Self(v)),
            _ => Err(Error::invalid_parameter(
                "severity",
                format!("{value} is outside 0..=100"),
            )),
        }
    }

    /// The percentage value.
    #[inline]
    pub const fn get(self) -> u32 {
        self.0 as u32
    }

    /// Blend weight in [0, 1].
    #[inline]
    pub fn fraction(self) -> f64 {
        self.0 as f64 / 100.0
    }
}

impl Default for Severity {
    fn default() -> Self {
        Self::FULL
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl TryFrom<u32> for Severity {
    type Error = Error;

    fn try_from(value: u32) -> Result<Self> {
        Self::new(value)
    }
}

impl TryFrom<f64> for Severity {
    type Error = Error;

    /// Accepts integral values only: `50.0` is valid, `50.5` is not.
    fn try_from(value: f64) -> Result<Self> {
        if !value.is_finite() || value.fract() != 0.0 || !(0.0..=100.0).contains(&value) {
            return Err(Error::invalid_parameter(
                "severity",
                format!("{value} is not an integer in 0..=100"),
            ));
        }
        Self::new(value as u32)
    }
}

impl Serialize for Severity {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_u32(self.get())
    }
}

impl<'de> Deserialize<'de> for Severity {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let v = f64::deserialize(deserializer)?;
        Self::try_from(v).map_err(serde::de::Error::custom)
    }
}

/// Blended simulation matrix for `cvd_type` at `severity`.
pub fn simulation_matrix(cvd_type: CvdType, severity: Severity) -> Mat3 {
    Mat3::IDENTITY.lerp(&cvd_type.full_matrix(), severity.fraction())
}

/// Simulates CVD on a single sRGB1 color. The result is clipped to [0, 1].
pub fn simulate_rgb(rgb: [f64; 3], cvd_type: CvdType, severity: Severity) -> [f64; 3] {
    apply(&simulation_matrix(cvd_type, severity), rgb)
}

#[inline]
fn apply(m: &Mat3, rgb: [f64; 3]) -> [f64; 3] {
    let linear = *m * Vec3::from_array(transfer::eotf_rgb(rgb));
    transfer::oetf_rgb(linear.to_array()).map(|v| v.clamp(0.0, 1.0))
}

/// Simulates CVD on every sample of an sRGB1 array.
///
/// The output is an sRGB1 array with every value in [0, 1].
pub fn simulate(rgb: &ColorArray, cvd_type: CvdType, severity: Severity) -> ColorArray {
    let m = simulation_matrix(cvd_type, severity);
    tracing::trace!(%cvd_type, %severity, "cvd::simulate");
    rgb.map_samples(|c| apply(&m, c))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use cvdmap_core::N_SAMPLES;

    fn ramp() -> ColorArray {
        ColorArray::from_fn(|i| {
            let t = i as f64 / (N_SAMPLES - 1) as f64;
            [t, (1.0 - t) * 0.8, (t * 7.0).sin().abs()]
        })
    }

    #[test]
    fn test_severity_bounds() {
        assert_eq!(Severity::new(0).unwrap(), Severity::NONE);
        assert_eq!(Severity::new(100).unwrap(), Severity::FULL);
        assert!(Severity::new(101).unwrap_err().is_parameter_error());
        assert!(Severity::new(u32::MAX).is_err());
    }

    #[test]
    fn test_severity_from_float() {
        assert_eq!(Severity::try_from(50.0).unwrap().get(), 50);
        assert!(Severity::try_from(50.5).is_err());
        assert!(Severity::try_from(-1.0).is_err());
        assert!(Severity::try_from(f64::NAN).is_err());
        assert!(Severity::try_from(100.5).is_err());
    }

    #[test]
    fn test_cvd_type_parse() {
        assert_eq!("deuteranomaly".parse::<CvdType>().unwrap(), CvdType::Deuteranomaly);
        assert_eq!("protanomaly".parse::<CvdType>().unwrap(), CvdType::Protanomaly);
        let err = "tritanomaly".parse::<CvdType>().unwrap_err();
        assert!(err.is_parameter_error());
        assert_eq!(CvdType::default(), CvdType::Deuteranomaly);
    }

    #[test]
    fn test_matrix_endpoints() {
        for t in CvdType::ALL {
            assert_eq!(simulation_matrix(t, Severity::NONE), Mat3::IDENTITY);
            let full = simulation_matrix(t, Severity::FULL);
            assert!(full.max_abs_diff(&t.full_matrix()) < 1e-15);
        }
    }

    #[test]
    fn test_full_matrices_preserve_white() {
        // Rows sum to ~1, so white stays white
        for t in CvdType::ALL {
            let w = t.full_matrix() * Vec3::ONE;
            assert!(w.distance(Vec3::ONE) < 1e-5);
        }
    }

    #[test]
    fn test_severity_zero_is_identity() {
        let rgb = ramp();
        for t in CvdType::ALL {
            let out = simulate(&rgb, t, Severity::NONE);
            assert!(out.max_abs_diff(&rgb) < 1e-12);
        }
    }

    #[test]
    fn test_distance_monotonic_in_severity() {
        let rgb = ramp();
        for t in CvdType::ALL {
            let mut prev = 0.0;
            for s in (0..=100).step_by(10) {
                let out = simulate(&rgb, t, Severity::new(s).unwrap());
                let dist: f64 = rgb
                    .samples()
                    .zip(out.samples())
                    .map(|(a, b)| Vec3::from_array(a).distance(Vec3::from_array(b)))
                    .sum();
                assert!(dist + 1e-9 >= prev, "{t} severity {s}: {dist} < {prev}");
                prev = dist;
            }
        }
    }

    #[test]
    fn test_output_in_unit_range() {
        let rgb = ramp();
        let out = simulate(&rgb, CvdType::Protanomaly, Severity::FULL);
        assert!(out.in_unit_range(0.0));
    }

    #[test]
    fn test_red_green_confusion() {
        let red = simulate_rgb([1.0, 0.0, 0.0], CvdType::Deuteranomaly, Severity::FULL);
        let green = simulate_rgb([0.0, 0.6, 0.0], CvdType::Deuteranomaly, Severity::FULL);
        // Simulated red and green both turn olive: red-green contrast collapses
        assert!((red[0] - red[1]).abs() < 0.5);
        assert!((green[0] - green[1]).abs() < 0.5);
        assert_abs_diff_eq!(
            simulate_rgb([0.5, 0.5, 0.5], CvdType::Deuteranomaly, Severity::FULL)[0],
            0.5,
            epsilon = 1e-3
        );
    }

    #[test]
    fn test_serde_names() {
        assert_eq!(CvdType::Protanomaly.to_string(), "protanomaly");
        assert_eq!(Severity::new(42).unwrap().to_string(), "42");
    }
}
