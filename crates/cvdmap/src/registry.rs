//! Colormap registry for resolving colormaps by name.
//!
//! The registry maps names to sample generators. Lookups fail closed: an
//! unknown name is an [`Error::InvalidColormap`], never a fallback map.
//!
//! # Architecture
//!
//! The registry uses a singleton pattern via [`ColormapRegistry::global()`].
//! Built-in colormaps are registered on first access. Any registered name
//! also resolves with an `_r` suffix to the reversed map.
//!
//! | Name | Kind |
//! |------|------|
//! | `viridis`, `plasma`, `magma`, `inferno` | perceptually uniform sequential |
//! | `gray` | linear gray ramp |
//! | `jet` | rainbow (piecewise linear) |
//!
//! # Example
//!
//! ```rust
//! use cvdmap::registry::ColormapRegistry;
//!
//! let registry = ColormapRegistry::global();
//! let viridis = registry.resolve("viridis").unwrap();
//! let reversed = registry.resolve("viridis_r").unwrap();
//! assert_eq!(viridis.sample(0.0), reversed.sample(1.0));
//!
//! assert!(registry.resolve("virdis").is_err());
//! ```

use std::collections::HashMap;
use std::sync::OnceLock;

use cvdmap_core::{ColorArray, Colormap, Error, N_SAMPLES, Result};
use tracing::{debug, trace};

mod listed;

/// Suffix selecting the reversed version of a registered map.
pub const REVERSED_SUFFIX: &str = "_r";

/// Registry entry.
#[derive(Clone)]
pub struct ColormapInfo {
    /// Lookup name (e.g., "viridis").
    pub name: &'static str,
    /// One-line description.
    pub description: &'static str,
    /// Produces the 256 RGB samples. Values outside [0, 1] are clamped on
    /// resolution.
    pub generate: fn() -> ColorArray,
}

impl std::fmt::Debug for ColormapInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ColormapInfo")
            .field("name", &self.name)
            .field("description", &self.description)
            .finish_non_exhaustive()
    }
}

/// Central registry of named colormaps.
///
/// # Thread Safety
///
/// The global instance is immutable after initialization and can be read
/// from any thread. Custom registries are plain values.
#[derive(Debug, Default)]
pub struct ColormapRegistry {
    maps: HashMap<&'static str, ColormapInfo>,
}

impl ColormapRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a registry holding the built-in colormaps.
    pub fn with_builtins() -> Self {
        let mut registry = Self::new();
        registry.register_builtin_maps();
        registry
    }

    /// Returns the global registry instance with built-in colormaps.
    pub fn global() -> &'static ColormapRegistry {
        static INSTANCE: OnceLock<ColormapRegistry> = OnceLock::new();
        INSTANCE.get_or_init(Self::with_builtins)
    }

    fn register_builtin_maps(&mut self) {
        self.register(ColormapInfo {
            name: "viridis",
            description: "blue-green-yellow, perceptually uniform",
            generate: || listed_map(&listed::VIRIDIS),
        });
        self.register(ColormapInfo {
            name: "plasma",
            description: "blue-magenta-yellow, perceptually uniform",
            generate: || listed_map(&listed::PLASMA),
        });
        self.register(ColormapInfo {
            name: "magma",
            description: "black-magenta-cream, perceptually uniform",
            generate: || listed_map(&listed::MAGMA),
        });
        self.register(ColormapInfo {
            name: "inferno",
            description: "black-red-yellow, perceptually uniform",
            generate: || listed_map(&listed::INFERNO),
        });
        self.register(ColormapInfo {
            name: "gray",
            description: "linear black to white ramp",
            generate: || ColorArray::from_fn(|i| [position(i); 3]),
        });
        self.register(ColormapInfo {
            name: "jet",
            description: "rainbow, not perceptually uniform",
            generate: || segmented_map(&JET),
        });
    }

    /// Registers a colormap, replacing any entry with the same name.
    pub fn register(&mut self, info: ColormapInfo) {
        trace!(name = info.name, "register colormap");
        self.maps.insert(info.name, info);
    }

    /// Registered base names, sorted. Reversed variants are not listed.
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.maps.keys().copied().collect();
        names.sort_unstable();
        names
    }

    /// Returns the entry registered under `name` (no suffix handling).
    pub fn get(&self, name: &str) -> Option<&ColormapInfo> {
        self.maps.get(name)
    }

    /// True if `name` resolves, including `_r` variants.
    pub fn contains(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Resolves `name` to a colormap.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidColormap`] if neither `name` nor its base name without
    /// `_r` is registered, or the generator produced non-finite values.
    pub fn resolve(&self, name: &str) -> Result<Colormap> {
        let (info, reversed) = self
            .lookup(name)
            .ok_or_else(|| Error::invalid_colormap(format!("unknown colormap '{name}'")))?;
        debug!(name, base = info.name, reversed, "resolve colormap");
        let cmap = Colormap::from_clipped(&(info.generate)())?;
        Ok(if reversed { cmap.reversed() } else { cmap })
    }

    fn lookup(&self, name: &str) -> Option<(&ColormapInfo, bool)> {
        if let Some(info) = self.maps.get(name) {
            return Some((info, false));
        }
        let base = name.strip_suffix(REVERSED_SUFFIX)?;
        self.maps.get(base).map(|info| (info, true))
    }
}

/// Copies a 256-entry sample table.
fn listed_map(table: &[[f64; 3]; N_SAMPLES]) -> ColorArray {
    ColorArray::from_fn(|i| table[i])
}

/// Position of sample `i` in [0, 1].
#[inline]
fn position(i: usize) -> f64 {
    i as f64 / (N_SAMPLES - 1) as f64
}

// ============================================================================
// Segmented maps
// ============================================================================

/// Per-channel (x, value) breakpoints, x ascending from 0 to 1.
type Segments = [&'static [(f64, f64)]; 3];

fn segmented_map(segments: &Segments) -> ColorArray {
    ColorArray::from_fn(|i| {
        let t = position(i);
        (*segments).map(|points| interpolate_segments(points, t))
    })
}

fn interpolate_segments(points: &[(f64, f64)], t: f64) -> f64 {
    let Some(&(x0, y0)) = points.first() else {
        return 0.0;
    };
    if t <= x0 {
        return y0;
    }
    for pair in points.windows(2) {
        let ((xa, ya), (xb, yb)) = (pair[0], pair[1]);
        if t <= xb {
            return cvdmap_math::remap(t, xa, xb, ya, yb);
        }
    }
    points.last().map_or(0.0, |&(_, y)| y)
}

const JET: Segments = [
    &[(0.0, 0.0), (0.35, 0.0), (0.66, 1.0), (0.89, 1.0), (1.0, 0.5)],
    &[(0.0, 0.0), (0.125, 0.0), (0.375, 1.0), (0.64, 1.0), (0.91, 0.0), (1.0, 0.0)],
    &[(0.0, 0.5), (0.11, 1.0), (0.34, 1.0), (0.65, 0.0), (1.0, 0.0)],
];

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_builtin_names() {
        let names = ColormapRegistry::global().names();
        assert_eq!(names, vec!["gray", "inferno", "jet", "magma", "plasma", "viridis"]);
    }

    #[test]
    fn test_viridis_samples() {
        let v = ColormapRegistry::global().resolve("viridis").unwrap();
        assert_eq!(v.as_array().sample(0), [0.267004, 0.004874, 0.329415]);
        assert_eq!(v.as_array().sample(128), [0.127568, 0.566949, 0.550556]);
        assert_eq!(v.as_array().sample(255), [0.993248, 0.906157, 0.143936]);
    }

    #[test]
    fn test_listed_maps_match_tables() {
        let registry = ColormapRegistry::global();
        for (name, table) in [
            ("viridis", &listed::VIRIDIS),
            ("plasma", &listed::PLASMA),
            ("magma", &listed::MAGMA),
            ("inferno", &listed::INFERNO),
        ] {
            let cmap = registry.resolve(name).unwrap();
            for (i, rgb) in table.iter().enumerate() {
                assert_eq!(cmap.as_array().sample(i), *rgb, "{name}[{i}]");
            }
        }
        // magma and inferno share their darkest sample
        assert_eq!(listed::MAGMA[0], listed::INFERNO[0]);
    }

    #[test]
    fn test_all_maps_valid() {
        let registry = ColormapRegistry::global();
        for name in registry.names() {
            let cmap = registry.resolve(name).unwrap();
            assert!(cmap.as_array().in_unit_range(0.0), "{name}");
        }
    }

    #[test]
    fn test_reversed() {
        let registry = ColormapRegistry::global();
        let gray = registry.resolve("gray").unwrap();
        let gray_r = registry.resolve("gray_r").unwrap();
        assert_eq!(gray_r, gray.reversed());
        assert_eq!(gray_r.as_array().sample(0), [1.0; 3]);
        assert!(registry.contains("jet_r"));
        assert!(!registry.contains("jet_r_r"));
    }

    #[test]
    fn test_unknown_name() {
        let err = ColormapRegistry::global().resolve("cividis").unwrap_err();
        assert!(err.is_colormap_error());
        assert!(err.to_string().contains("cividis"));
        assert!(ColormapRegistry::global().resolve("_r").is_err());
    }

    #[test]
    fn test_jet_breakpoints() {
        let jet = ColormapRegistry::global().resolve("jet").unwrap();
        assert_eq!(jet.as_array().sample(0), [0.0, 0.0, 0.5]);
        assert_eq!(jet.as_array().sample(255), [0.5, 0.0, 0.0]);
        // Green peaks in the middle
        let mid = jet.sample(0.5);
        assert_abs_diff_eq!(mid[1], 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_custom_registration() {
        let mut registry = ColormapRegistry::new();
        assert!(registry.names().is_empty());
        registry.register(ColormapInfo {
            name: "red",
            description: "black to red",
            generate: || ColorArray::from_fn(|i| [position(i), 0.0, 0.0]),
        });
        let red = registry.resolve("red_r").unwrap();
        assert_eq!(red.as_array().sample(0), [1.0, 0.0, 0.0]);
        assert!(registry.resolve("viridis").is_err());
    }
}
