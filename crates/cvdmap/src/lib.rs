//! # cvdmap
//!
//! CVD-aware colormap optimization.
//!
//! Takes a 256-sample colormap, looks at it the way a viewer with a
//! color-vision deficiency would, and re-derives it so hue steps evenly and
//! lightness ramps linearly in CAM02-UCS:
//!
//! - **Sources** - registered colormaps by name, or explicit RGB arrays
//! - **Hue linearization** - constant hue-angle step in the a'b' plane
//! - **Lightness correction** - in-gamut linear J' fits
//! - **Iterative optimizer** - {linearize, simulate CVD, restore J'} rounds
//! - **Analysis** - uniformity, CDPS slope, CVD gamut coverage
//!
//! # Architecture
//!
//! ```text
//!                       cvdmap
//!                          |
//!   +--------+--------+----+-----+----------+---------+
//!   |        |        |          |          |         |
//! registry source    hue     lightness  optimize  analysis
//!   |        |        |          |          |         |
//!   +--------+--------+----+-----+----------+---------+
//!                          |
//!                    cvdmap-color
//!                          |
//!               cvdmap-math, cvdmap-core
//! ```
//!
//! # Quick Start
//!
//! ```rust
//! use cvdmap::{correct_j, get_cvd, get_rgb_jab, iter_make_linear};
//! use cvdmap_color::{CvdType, Severity};
//!
//! // Viridis as seen with full deuteranomaly
//! let cvd = get_cvd("viridis", CvdType::Deuteranomaly, Severity::FULL).unwrap();
//! let (_, jab) = get_rgb_jab(&cvd, true).unwrap();
//!
//! // Two optimizer rounds
//! let (rgb, jab) = iter_make_linear(&jab.unwrap(), 2).unwrap();
//! assert!(rgb.as_array().in_unit_range(0.0));
//!
//! // Straighten lightness; either fit may be infeasible
//! let (to_original, to_max_range) = correct_j(&jab);
//! if let Some(fit) = to_max_range.or(to_original) {
//!     assert!(fit.is_finite());
//! }
//! ```
//!
//! # Logging
//!
//! Pipeline steps emit `tracing` events at debug and trace level. Install a
//! subscriber in the application to see them.

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod analysis;
pub mod config;
pub mod hue;
pub mod lightness;
pub mod optimize;
pub mod registry;
pub mod source;

pub use config::{DEFAULT_ITERATIONS, OptimizerConfig};
pub use hue::make_linear;
pub use lightness::{
    BoundsObserver, JBounds, JInterval, LightnessCorrector, correct_j, correct_j_with,
    lightness_bounds,
};
pub use optimize::{
    OptimizedColormap, Optimizer, OptimizerTrace, get_cvd, iter_make_linear, round_delta,
};
pub use registry::{ColormapInfo, ColormapRegistry};
pub use source::{ColormapSource, get_rgb_jab};

pub use cvdmap_core::{ColorArray, Colormap, Error, N_SAMPLES, Result};

/// Prelude with commonly used types
pub mod prelude {
    pub use crate::{
        ColormapRegistry, ColormapSource, LightnessCorrector, Optimizer, OptimizerConfig,
        correct_j, get_cvd, get_rgb_jab, iter_make_linear, make_linear,
    };

    pub use cvdmap_color::{ColorSpace, CvdType, Severity, convert};
    pub use cvdmap_core::{ColorArray, Colormap, Error, Result};
}
