//! Error types for colormap operations.
//!
//! Every fallible operation in the cvdmap workspace reports one of the
//! variants of [`Error`]. Failures are raised at the call that detects them
//! and never carry partial results.
//!
//! # Usage
//!
//! ```rust
//! use cvdmap_core::{Error, Result};
//!
//! fn check_severity(severity: u32) -> Result<u32> {
//!     if severity > 100 {
//!         return Err(Error::invalid_parameter("severity", "must be within 0..=100"));
//!     }
//!     Ok(severity)
//! }
//!
//! assert!(check_severity(101).is_err());
//! ```
//!
//! An infeasible lightness fit is *not* an error: the corrector reports it
//! as `None`.

use thiserror::Error;

/// Result type alias using [`Error`] as the error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by colormap resolution, conversion and optimization.
///
/// # Categories
///
/// - **Input errors**: [`InvalidColormap`](Error::InvalidColormap)
/// - **Routing errors**: [`UnsupportedConversion`](Error::UnsupportedConversion)
/// - **Parameter errors**: [`InvalidParameter`](Error::InvalidParameter), [`Config`](Error::Config)
#[derive(Debug, Clone, PartialEq, Error)]
pub enum Error {
    /// Unknown colormap name, or an array with the wrong shape or values
    /// outside [0, 1].
    ///
    /// ```rust
    /// use cvdmap_core::Error;
    ///
    /// let err = Error::invalid_colormap("unknown colormap 'virdis'");
    /// assert!(err.to_string().contains("virdis"));
    /// ```
    #[error("invalid colormap: {reason}")]
    InvalidColormap {
        /// Why the colormap was rejected
        reason: String,
    },

    /// No conversion path exists between the requested color spaces.
    #[error("unsupported conversion: {from} -> {to}")]
    UnsupportedConversion {
        /// Source color space
        from: String,
        /// Target color space
        to: String,
    },

    /// A parameter is outside its allowed domain (severity, CVD type,
    /// iteration count, ...).
    #[error("invalid parameter '{name}': {reason}")]
    InvalidParameter {
        /// Parameter name
        name: String,
        /// Why the value was rejected
        reason: String,
    },

    /// Optimizer configuration text could not be parsed.
    #[error("config error: {0}")]
    Config(String),
}

impl Error {
    /// Creates an [`Error::InvalidColormap`] error.
    #[inline]
    pub fn invalid_colormap(reason: impl Into<String>) -> Self {
        Self::InvalidColormap {
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::UnsupportedConversion`] error.
    #[inline]
    pub fn unsupported_conversion(from: impl ToString, to: impl ToString) -> Self {
        Self::UnsupportedConversion {
            from: from.to_string(),
            to: to.to_string(),
        }
    }

    /// Creates an [`Error::InvalidParameter`] error.
    #[inline]
    pub fn invalid_parameter(name: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidParameter {
            name: name.into(),
            reason: reason.into(),
        }
    }

    /// Creates an [`Error::Config`] error.
    #[inline]
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Config(msg.into())
    }

    /// Returns `true` if this error rejects a colormap input.
    #[inline]
    pub fn is_colormap_error(&self) -> bool {
        matches!(self, Self::InvalidColormap { .. })
    }

    /// Returns `true` if this error rejects a parameter value.
    #[inline]
    pub fn is_parameter_error(&self) -> bool {
        matches!(self, Self::InvalidParameter { .. })
    }
}
