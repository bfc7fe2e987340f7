//! # cvdmap-color
//!
//! Color spaces for CVD-aware colormap work:
//!
//! - **Transfer** - sign-symmetric sRGB encode/decode
//! - **Primaries** - sRGB to XYZ (white Y = 100)
//! - **CIECAM02 / CAM02-UCS** - perceptual J'a'b' coordinates
//! - **CVD simulation** - severity-blended Machado matrices
//! - **Conversion** - [`convert`] between [`ColorSpace`]s over 3x256 arrays
//!
//! # Architecture
//!
//! ```text
//!                 cvdmap-color
//!                      |
//!    +--------+--------+--------+---------+
//!    |        |        |        |         |
//! transfer primaries cam02     cvd      space
//!    |        |        |        |         |
//!    +--------+--------+--------+---------+
//!                      |
//!                   convert
//!                      |
//!           cvdmap-math, cvdmap-core
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use cvdmap_color::{ColorSpace, CvdType, Severity, convert};
//! use cvdmap_core::ColorArray;
//!
//! let rgb = ColorArray::from_fn(|i| [i as f64 / 255.0, 0.4, 1.0 - i as f64 / 255.0]);
//!
//! // What a deuteranomalous viewer sees, as sRGB1
//! let cvd = ColorSpace::cvd(CvdType::Deuteranomaly, Severity::FULL);
//! let seen = convert(&rgb, cvd, ColorSpace::Srgb1).unwrap();
//! assert!(seen.in_unit_range(0.0));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod cam02;
pub mod convert;
pub mod cvd;
pub mod primaries;
pub mod space;
pub mod transfer;

pub use cam02::{CAM02_UCS, Jmh, Surround, UcsCoefficients, ViewingConditions};
pub use convert::{convert, convert_unclipped, jab_to_linear, jab_to_srgb1, linear_to_jab, srgb1_to_jab};
pub use cvd::{CvdType, Severity, simulate, simulation_matrix};
pub use space::ColorSpace;
