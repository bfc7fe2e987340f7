//! # cvdmap-core
//!
//! Core types for colormap analysis and CVD-aware optimization.
//!
//! - [`ColorArray`] - Fixed 3x256 matrix of color values, one channel per row
//! - [`Colormap`] - Validated RGB colormap (finite, inside [0, 1])
//! - [`Error`], [`Result`] - Unified error handling
//!
//! ## Crate Structure
//!
//! This crate has no internal dependencies. The rest of the workspace builds
//! on it:
//!
//! ```text
//! cvdmap-core (this crate)
//!    ^
//!    |
//!    +-- cvdmap-math (matrices, adaptation)
//!    +-- cvdmap-color (sRGB, CAM02-UCS, CVD simulation, conversion)
//!    +-- cvdmap (registry, linearization, optimizer)
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

pub mod array;
pub mod error;

pub use array::{ColorArray, Colormap, N_SAMPLES};
pub use error::{Error, Result};
