//! Color space descriptors.
//!
//! | Space | Name | Meaning |
//! |-------|------|---------|
//! | [`ColorSpace::Srgb1`] | `sRGB1` | gamma-encoded sRGB, [0, 1] |
//! | [`ColorSpace::Srgb1Linear`] | `sRGB1-linear` | linear-light sRGB, [0, 1] |
//! | [`ColorSpace::Srgb1Cvd`] | `sRGB1+CVD` | sRGB1 as seen with a CVD |
//! | [`ColorSpace::Cam02Ucs`] | `CAM02-UCS` | perceptual J'a'b' |
//!
//! Equality is structural: two `sRGB1+CVD` spaces are equal only if type and
//! severity match.

use std::fmt;
use std::str::FromStr;

use cvdmap_core::{Error, Result};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::cvd::{CvdType, Severity};

/// A color space a [`ColorArray`](cvdmap_core::ColorArray) can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ColorSpace {
    /// Gamma-encoded sRGB in [0, 1].
    #[default]
    Srgb1,
    /// Linear-light sRGB in [0, 1].
    Srgb1Linear,
    /// sRGB1 viewed through a simulated color-vision deficiency.
    Srgb1Cvd {
        /// Deficiency type
        cvd_type: CvdType,
        /// Severity, 0..=100
        severity: Severity,
    },
    /// CAM02-UCS J'a'b'.
    Cam02Ucs,
}

impl ColorSpace {
    /// Shorthand for an `sRGB1+CVD` space.
    #[inline]
    pub const fn cvd(cvd_type: CvdType, severity: Severity) -> Self {
        Self::Srgb1Cvd { cvd_type, severity }
    }

    /// Canonical name (CVD parameters are not part of the name).
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Srgb1 => "sRGB1",
            Self::Srgb1Linear => "sRGB1-linear",
            Self::Srgb1Cvd { .. } => "sRGB1+CVD",
            Self::Cam02Ucs => "CAM02-UCS",
        }
    }

    /// True for the spaces whose values are RGB in [0, 1].
    #[inline]
    pub const fn is_rgb(&self) -> bool {
        matches!(self, Self::Srgb1 | Self::Srgb1Linear | Self::Srgb1Cvd { .. })
    }
}

impl fmt::Display for ColorSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Srgb1Cvd { cvd_type, severity } if f.alternate() => {
                write!(f, "{}({cvd_type}, {severity})", self.name())
            }
            _ => f.write_str(self.name()),
        }
    }
}

/// Parses a canonical name. `"sRGB1+CVD"` takes the default parameters
/// (deuteranomaly, severity 100).
impl FromStr for ColorSpace {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sRGB1" => Ok(Self::Srgb1),
            "sRGB1-linear" => Ok(Self::Srgb1Linear),
            "sRGB1+CVD" => Ok(Self::cvd(CvdType::default(), Severity::default())),
            "CAM02-UCS" => Ok(Self::Cam02Ucs),
            other => Err(Error::invalid_parameter(
                "color_space",
                format!("unknown color space '{other}'"),
            )),
        }
    }
}

impl Serialize for ColorSpace {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

impl<'de> Deserialize<'de> for ColorSpace {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_names_roundtrip() {
        for space in [
            ColorSpace::Srgb1,
            ColorSpace::Srgb1Linear,
            ColorSpace::cvd(CvdType::Deuteranomaly, Severity::FULL),
            ColorSpace::Cam02Ucs,
        ] {
            assert_eq!(space.to_string().parse::<ColorSpace>().unwrap(), space);
        }
    }

    #[test]
    fn test_structural_equality() {
        let a = ColorSpace::cvd(CvdType::Deuteranomaly, Severity::new(50).unwrap());
        let b = ColorSpace::cvd(CvdType::Deuteranomaly, Severity::new(60).unwrap());
        let c = ColorSpace::cvd(CvdType::Protanomaly, Severity::new(50).unwrap());
        assert_ne!(a, b);
        assert_ne!(a, c);
        assert_eq!(a.name(), c.name());
    }

    #[test]
    fn test_alternate_display() {
        let s = ColorSpace::cvd(CvdType::Protanomaly, Severity::new(30).unwrap());
        assert_eq!(format!("{s:#}"), "sRGB1+CVD(protanomaly, 30)");
        assert_eq!(format!("{s}"), "sRGB1+CVD");
    }

    #[test]
    fn test_unknown_name() {
        assert!("JCh".parse::<ColorSpace>().unwrap_err().is_parameter_error());
    }

    #[test]
    fn test_is_rgb() {
        assert!(ColorSpace::Srgb1Linear.is_rgb());
        assert!(!ColorSpace::Cam02Ucs.is_rgb());
    }
}
