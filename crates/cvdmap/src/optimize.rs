//! Iterative CVD-aware optimization.
//!
//! One round:
//!
//! ```text
//! J'a'b' --make_linear--> J'a'b' (even hue) --to sRGB1 + clip--> RGB
//!        --simulate CVD--> RGB --to CAM02-UCS--> J'a'b' --restore J'--> J'a'b'
//! ```
//!
//! Hue linearization can push colors to where a CVD viewer sees them
//! differently; re-simulating pulls the map back into the space the viewer
//! actually perceives. Restoring J' keeps the lightness ramp intact.
//!
//! # Usage
//!
//! ```rust
//! use cvdmap::{get_cvd, get_rgb_jab, iter_make_linear, DEFAULT_ITERATIONS};
//! use cvdmap_color::{CvdType, Severity};
//!
//! let cvd = get_cvd("viridis", CvdType::Deuteranomaly, Severity::FULL).unwrap();
//! let (_, jab) = get_rgb_jab(&cvd, true).unwrap();
//! let jab = jab.unwrap();
//!
//! let (rgb, out) = iter_make_linear(&jab, DEFAULT_ITERATIONS).unwrap();
//! assert!(rgb.as_array().in_unit_range(0.0));
//! assert_eq!(out.row(0), jab.row(0));
//! ```

use cvdmap_color::{ColorSpace, CvdType, Severity, convert, convert_unclipped};
use cvdmap_core::{ColorArray, Colormap, Result};
use tracing::{debug, trace};

use crate::config::OptimizerConfig;
use crate::hue::make_linear;
use crate::lightness::LightnessCorrector;
use crate::source::{ColormapSource, get_rgb_jab};

/// Resolves `source` and returns it as seen with the given deficiency.
///
/// # Errors
///
/// [`Error::InvalidColormap`](cvdmap_core::Error::InvalidColormap) if the
/// source does not resolve.
pub fn get_cvd(
    source: impl Into<ColormapSource>,
    cvd_type: CvdType,
    severity: Severity,
) -> Result<Colormap> {
    let (rgb, _) = get_rgb_jab(source, false)?;
    let seen = convert(
        rgb.as_array(),
        ColorSpace::cvd(cvd_type, severity),
        ColorSpace::Srgb1,
    )?;
    Colormap::new(seen)
}

/// Largest absolute difference between two J'a'b' arrays.
#[inline]
pub fn round_delta(before: &ColorArray, after: &ColorArray) -> f64 {
    before.max_abs_diff(after)
}

/// Runs `iterations` optimizer rounds (deuteranomaly, full severity).
///
/// Returns the final RGB (clipped to [0, 1]) and J'a'b'.
///
/// # Errors
///
/// [`Error::InvalidParameter`](cvdmap_core::Error::InvalidParameter) if
/// `iterations == 0`.
pub fn iter_make_linear(jab: &ColorArray, iterations: usize) -> Result<(Colormap, ColorArray)> {
    let config = OptimizerConfig {
        iterations,
        ..OptimizerConfig::default()
    };
    Optimizer::new(config)?.run(jab)
}

/// Every intermediate of [`Optimizer::run_traced`].
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizerTrace {
    /// J'a'b' after each round, in order.
    pub rounds: Vec<ColorArray>,
    /// Largest change made by each round.
    pub deltas: Vec<f64>,
    /// Final RGB.
    pub rgb: Colormap,
}

impl OptimizerTrace {
    /// J'a'b' after the last round.
    pub fn jab(&self) -> Option<&ColorArray> {
        self.rounds.last()
    }
}

/// Intermediate maps of the full optimization flow from a source colormap.
#[derive(Debug, Clone, PartialEq)]
pub struct OptimizedColormap {
    /// Input colormap.
    pub original: Colormap,
    /// Input as seen with the configured deficiency.
    pub cvd: Colormap,
    /// J'a'b' of `cvd`.
    pub cvd_jab: ColorArray,
    /// `cvd_jab` with linearized hue.
    pub linearized_jab: ColorArray,
    /// J' fit to the original endpoints, re-simulated. `None` if that line
    /// leaves the gamut.
    pub fit_to_original: Option<Colormap>,
    /// J' fit to the widest range, re-simulated. `None` if no line fits.
    pub fit_to_max_range: Option<Colormap>,
}

/// Iterative optimizer with explicit configuration.
#[derive(Debug, Clone, Default)]
pub struct Optimizer {
    config: OptimizerConfig,
    corrector: LightnessCorrector,
}

impl Optimizer {
    /// Creates an optimizer.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`](cvdmap_core::Error::InvalidParameter) if
    /// the config is invalid.
    pub fn new(config: OptimizerConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            corrector: LightnessCorrector::default(),
        })
    }

    /// Replaces the lightness corrector used by [`optimize`](Self::optimize).
    pub fn with_corrector(mut self, corrector: LightnessCorrector) -> Self {
        self.corrector = corrector;
        self
    }

    /// Active configuration.
    #[inline]
    pub fn config(&self) -> &OptimizerConfig {
        &self.config
    }

    fn cvd_space(&self) -> ColorSpace {
        ColorSpace::cvd(self.config.cvd_type, self.config.severity)
    }

    /// Perceptual J'a'b' to clipped sRGB1, rejecting non-finite results.
    fn to_rgb(&self, jab: &ColorArray) -> Result<Colormap> {
        Colormap::from_clipped(&convert_unclipped(jab, ColorSpace::Cam02Ucs, ColorSpace::Srgb1)?)
    }

    /// Runs a single round. The result has exactly the input's J' row.
    pub fn round(&self, jab: &ColorArray) -> Result<ColorArray> {
        let linear = make_linear(jab);
        let rgb = self.to_rgb(&linear)?;
        let seen = convert(rgb.as_array(), self.cvd_space(), ColorSpace::Srgb1)?;
        let mut out = convert(&seen, ColorSpace::Srgb1, ColorSpace::Cam02Ucs)?;
        out.row_mut(0).copy_from_slice(linear.row(0));
        Ok(out)
    }

    /// Runs all configured rounds and returns (RGB, J'a'b').
    pub fn run(&self, jab: &ColorArray) -> Result<(Colormap, ColorArray)> {
        let mut current = jab.clone();
        for round in 0..self.config.iterations {
            let next = self.round(&current)?;
            debug!(round, delta = round_delta(&current, &next), "optimizer round");
            current = next;
        }
        Ok((self.to_rgb(&current)?, current))
    }

    /// Like [`run`](Self::run), keeping every round's J'a'b'.
    pub fn run_traced(&self, jab: &ColorArray) -> Result<OptimizerTrace> {
        let mut rounds = Vec::with_capacity(self.config.iterations);
        let mut deltas = Vec::with_capacity(self.config.iterations);
        let mut current = jab.clone();
        for round in 0..self.config.iterations {
            let next = self.round(&current)?;
            let delta = round_delta(&current, &next);
            trace!(round, delta, "optimizer round (traced)");
            deltas.push(delta);
            rounds.push(next.clone());
            current = next;
        }
        Ok(OptimizerTrace {
            rounds,
            deltas,
            rgb: self.to_rgb(&current)?,
        })
    }

    /// Full flow from a source colormap: simulate, linearize hue, fit J'
    /// both ways, convert back and re-simulate.
    pub fn optimize(&self, source: impl Into<ColormapSource>) -> Result<OptimizedColormap> {
        let (original, _) = get_rgb_jab(source, false)?;
        let cvd = get_cvd(&original, self.config.cvd_type, self.config.severity)?;
        let cvd_jab = convert(cvd.as_array(), ColorSpace::Srgb1, ColorSpace::Cam02Ucs)?;
        let linearized_jab = make_linear(&cvd_jab);

        let (to_original, to_max_range) = self.corrector.correct(&linearized_jab);
        let resimulate = |jab: Option<ColorArray>| -> Result<Option<Colormap>> {
            jab.map(|jab| {
                let rgb = self.to_rgb(&jab)?;
                get_cvd(rgb, self.config.cvd_type, self.config.severity)
            })
            .transpose()
        };

        let result = OptimizedColormap {
            original,
            cvd,
            cvd_jab,
            linearized_jab,
            fit_to_original: resimulate(to_original)?,
            fit_to_max_range: resimulate(to_max_range)?,
        };
        debug!(
            fit_to_original = result.fit_to_original.is_some(),
            fit_to_max_range = result.fit_to_max_range.is_some(),
            "optimize"
        );
        Ok(result)
    }
}
