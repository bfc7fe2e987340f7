//! # cvdmap-math
//!
//! Math utilities for colormap analysis.
//!
//! - [`Mat3`] - 3x3 matrices for linear color transforms
//! - [`Vec3`] - 3D vectors for RGB/XYZ/cone triplets
//! - CIECAM02 cone matrices ([`CAT02`], [`HPE`]) and [`D65_XYZ100`]
//! - Interpolation utilities ([`lerp`], [`linspace`])
//!
//! # Design
//!
//! All types are `f64`: the perceptual round trips in the pipeline must stay
//! within 1e-6. Matrices are **row-major** with **column vectors**, and
//! multiply through [`glam`]'s `DMat3`:
//!
//! ```rust
//! use cvdmap_math::{Mat3, Vec3};
//!
//! let m = Mat3::diagonal(2.0, 3.0, 4.0);
//! assert_eq!(m * Vec3::ONE, Vec3::new(2.0, 3.0, 4.0));
//! ```

#![warn(missing_docs)]
#![warn(rustdoc::missing_crate_level_docs)]

mod adapt;
mod interp;
mod mat3;
mod vec3;

pub use adapt::*;
pub use interp::*;
pub use mat3::*;
pub use vec3::*;
