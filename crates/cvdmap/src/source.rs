//! Colormap inputs: a registered name or explicit RGB data.

use cvdmap_color::{ColorSpace, convert};
use cvdmap_core::{ColorArray, Colormap, Result};
use tracing::debug;

use crate::registry::ColormapRegistry;

/// Where a colormap comes from.
#[derive(Debug, Clone, PartialEq)]
pub enum ColormapSource {
    /// A name resolved through the global [`ColormapRegistry`].
    Named(String),
    /// Explicit sRGB1 samples, validated on resolution.
    Array(ColorArray),
}

impl ColormapSource {
    /// Resolves to a validated colormap.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidColormap`](cvdmap_core::Error::InvalidColormap) for an
    /// unknown name, or an array with non-finite values or values outside
    /// [0, 1].
    pub fn resolve(&self) -> Result<Colormap> {
        self.resolve_in(ColormapRegistry::global())
    }

    /// Resolves names against `registry` instead of the global one.
    pub fn resolve_in(&self, registry: &ColormapRegistry) -> Result<Colormap> {
        match self {
            Self::Named(name) => registry.resolve(name),
            Self::Array(data) => Colormap::new(data.clone()),
        }
    }
}

impl From<&str> for ColormapSource {
    fn from(name: &str) -> Self {
        Self::Named(name.to_owned())
    }
}

impl From<String> for ColormapSource {
    fn from(name: String) -> Self {
        Self::Named(name)
    }
}

impl From<ColorArray> for ColormapSource {
    fn from(data: ColorArray) -> Self {
        Self::Array(data)
    }
}

impl From<&ColorArray> for ColormapSource {
    fn from(data: &ColorArray) -> Self {
        Self::Array(data.clone())
    }
}

impl From<Colormap> for ColormapSource {
    fn from(cmap: Colormap) -> Self {
        Self::Array(cmap.into_array())
    }
}

impl From<&Colormap> for ColormapSource {
    fn from(cmap: &Colormap) -> Self {
        Self::Array(cmap.as_array().clone())
    }
}

/// Resolves `source` to RGB and, if `calc_jab` is set, its CAM02-UCS J'a'b'.
///
/// ```rust
/// use cvdmap::get_rgb_jab;
///
/// let (rgb, jab) = get_rgb_jab("viridis", true).unwrap();
/// let jab = jab.unwrap();
/// assert!(jab.row(0)[255] > jab.row(0)[0]);
///
/// let (_, none) = get_rgb_jab(rgb, false).unwrap();
/// assert!(none.is_none());
/// ```
///
/// # Errors
///
/// [`Error::InvalidColormap`](cvdmap_core::Error::InvalidColormap) if the
/// source does not resolve.
pub fn get_rgb_jab(
    source: impl Into<ColormapSource>,
    calc_jab: bool,
) -> Result<(Colormap, Option<ColorArray>)> {
    let rgb = source.into().resolve()?;
    let jab = if calc_jab {
        Some(convert(rgb.as_array(), ColorSpace::Srgb1, ColorSpace::Cam02Ucs)?)
    } else {
        None
    };
    debug!(calc_jab, "get_rgb_jab");
    Ok((rgb, jab))
}
