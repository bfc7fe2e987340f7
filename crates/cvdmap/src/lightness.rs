//! Lightness (J') linearization within the sRGB gamut.
//!
//! Every sample keeps its a'b' and gets a new J' on a straight line
//! `J'(t) = p + q * t`, `t = i / 255`. The line must keep every sample inside
//! sRGB, so each sample first gets its in-gamut J' interval ([`JBounds`]).
//! At some a'b' the in-gamut J' values form more than one stretch; the
//! interval is the stretch around the sample's own J'.
//!
//! Two lines are offered:
//!
//! - **fit to original**: through the original first and last J'. Rejected
//!   (`None`) if any sample would leave its interval.
//! - **fit to max range**: the steepest line in the original direction that
//!   fits inside every interval, centered in the remaining offset slack.
//!
//! # Fitting
//!
//! For a slope `q`, the offsets that fit sample `i` are
//! `[Jmin_i - q t_i, Jmax_i - q t_i]`; a line exists iff
//!
//! ```text
//! g(q) = min_i (Jmax_i - q t_i) - max_i (Jmin_i - q t_i) >= 0
//! ```
//!
//! `g` is concave (a minimum of linear functions minus a maximum of linear
//! functions), so its peak is found by ternary search and the feasible
//! slope interval's edge by bisection.

use cvdmap_color::jab_to_srgb1;
use cvdmap_core::{ColorArray, Error, N_SAMPLES, Result};
use cvdmap_math::linspace;
use tracing::{debug, trace};

use crate::hue::ACHROMATIC_EPSILON;

/// Default J' grid spacing for the interval scan.
pub const DEFAULT_GRID_STEP: f64 = 0.5;

/// Slack allowed on unclipped RGB when testing gamut membership.
pub const DEFAULT_GAMUT_TOLERANCE: f64 = 1e-9;

/// Slack allowed on J' when checking a line against the bounds.
const FIT_TOLERANCE: f64 = 1e-6;

const BISECTION_STEPS: usize = 50;
const TERNARY_STEPS: usize = 200;

/// Largest slope magnitude worth searching: J' spans at most 100.
const MAX_SLOPE: f64 = 101.0;

/// Inclusive J' interval.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct JInterval {
    /// Lower edge
    pub min: f64,
    /// Upper edge
    pub max: f64,
}

impl JInterval {
    /// True if `j` lies inside, allowing `tol` slack on both ends.
    #[inline]
    pub fn contains(&self, j: f64, tol: f64) -> bool {
        j >= self.min - tol && j <= self.max + tol
    }

    /// Interval length.
    #[inline]
    pub fn width(&self) -> f64 {
        self.max - self.min
    }
}

/// Per-sample in-gamut J' intervals. `None` marks a sample with no
/// in-gamut J' at its a'b'.
#[derive(Debug, Clone, PartialEq)]
pub struct JBounds {
    intervals: [Option<JInterval>; N_SAMPLES],
}

impl JBounds {
    /// Interval of sample `i`.
    #[inline]
    pub fn get(&self, i: usize) -> Option<JInterval> {
        self.intervals[i]
    }

    /// Iterates intervals in sample order.
    pub fn iter(&self) -> impl Iterator<Item = Option<JInterval>> + '_ {
        self.intervals.iter().copied()
    }

    /// True if no interval is empty.
    pub fn is_feasible(&self) -> bool {
        self.intervals.iter().all(Option::is_some)
    }

    /// Number of samples with an empty interval.
    pub fn empty_count(&self) -> usize {
        self.intervals.iter().filter(|iv| iv.is_none()).count()
    }

    /// Lower edges, NaN where empty.
    pub fn lower(&self) -> [f64; N_SAMPLES] {
        self.intervals.map(|iv| iv.map_or(f64::NAN, |iv| iv.min))
    }

    /// Upper edges, NaN where empty.
    pub fn upper(&self) -> [f64; N_SAMPLES] {
        self.intervals.map(|iv| iv.map_or(f64::NAN, |iv| iv.max))
    }

    /// True if every `j[i]` lies in interval `i` within `tol`.
    pub fn admits(&self, j: &[f64; N_SAMPLES], tol: f64) -> bool {
        self.intervals
            .iter()
            .zip(j)
            .all(|(iv, &j)| iv.is_some_and(|iv| iv.contains(j, tol)))
    }

    /// Feasibility margin `g(q)` of slope `q`. Empty intervals are skipped.
    fn margin(&self, q: f64) -> f64 {
        let (hi, lo) = self.offset_range(q);
        hi - lo
    }

    /// (min_i (Jmax_i - q t_i), max_i (Jmin_i - q t_i))
    fn offset_range(&self, q: f64) -> (f64, f64) {
        let mut hi = f64::INFINITY;
        let mut lo = f64::NEG_INFINITY;
        for (i, iv) in self.intervals.iter().enumerate() {
            if let Some(iv) = iv {
                let qt = q * position(i);
                hi = hi.min(iv.max - qt);
                lo = lo.max(iv.min - qt);
            }
        }
        (hi, lo)
    }
}

/// Receives the J' bounds computed during a lightness correction, e.g. to
/// plot them next to the map's J' curve.
pub trait BoundsObserver {
    /// Called once per correction with the input J'a'b' and its bounds.
    fn observe(&mut self, jab: &ColorArray, bounds: &JBounds);
}

impl<F> BoundsObserver for F
where
    F: FnMut(&ColorArray, &JBounds),
{
    fn observe(&mut self, jab: &ColorArray, bounds: &JBounds) {
        self(jab, bounds)
    }
}

/// Gamut-bounded J' line fitting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightnessCorrector {
    grid_step: f64,
    gamut_tolerance: f64,
}

impl Default for LightnessCorrector {
    fn default() -> Self {
        Self {
            grid_step: DEFAULT_GRID_STEP,
            gamut_tolerance: DEFAULT_GAMUT_TOLERANCE,
        }
    }
}

impl LightnessCorrector {
    /// Creates a corrector scanning J' in steps of `grid_step`.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidParameter`] unless `0 < grid_step <= 100`.
    pub fn new(grid_step: f64) -> Result<Self> {
        if !(grid_step > 0.0 && grid_step <= 100.0) {
            return Err(Error::invalid_parameter(
                "grid_step",
                format!("{grid_step} is outside (0, 100]"),
            ));
        }
        Ok(Self {
            grid_step,
            ..Self::default()
        })
    }

    /// Sets the slack allowed on unclipped RGB when testing gamut membership.
    pub fn with_gamut_tolerance(mut self, tol: f64) -> Self {
        self.gamut_tolerance = tol.abs();
        self
    }

    /// True if J'a'b' maps to sRGB inside [0, 1] without clipping.
    ///
    /// At J' = 0 only achromatic colors count: the appearance model maps any
    /// chroma at zero lightness to black.
    pub fn in_gamut(&self, j: f64, a: f64, b: f64) -> bool {
        if !(0.0..=100.0).contains(&j) {
            return false;
        }
        if j == 0.0 {
            return a.hypot(b) < ACHROMATIC_EPSILON;
        }
        let tol = self.gamut_tolerance;
        jab_to_srgb1([j, a, b])
            .iter()
            .all(|&v| v.is_finite() && v >= -tol && v <= 1.0 + tol)
    }

    /// Contiguous in-gamut J' interval at a fixed a'b'.
    ///
    /// `hint` is a J' known or suspected to be in gamut (typically the
    /// sample's own J'); it is scanned alongside the grid so that narrow
    /// intervals between grid points are still found. When the scan finds
    /// several in-gamut stretches, the one nearest the hint is returned, or
    /// the widest one without a hint.
    pub fn interval(&self, a: f64, b: f64, hint: Option<f64>) -> Option<JInterval> {
        let mut candidates = self.grid();
        if let Some(h) = hint.filter(|h| (0.0..=100.0).contains(h)) {
            candidates.push(h);
            candidates.sort_by(f64::total_cmp);
        }

        let inside: Vec<bool> = candidates.iter().map(|&j| self.in_gamut(j, a, b)).collect();
        let stretches = in_gamut_runs(&inside);
        let span = |&(first, last): &(usize, usize)| (candidates[first], candidates[last]);
        let (first, last) = match hint.filter(|h| h.is_finite()) {
            Some(h) => stretches.into_iter().min_by(|x, y| {
                distance_to(span(x), h).total_cmp(&distance_to(span(y), h))
            })?,
            None => stretches.into_iter().max_by(|x, y| {
                let (width_x, width_y) = (span(x).1 - span(x).0, span(y).1 - span(y).0);
                width_x.total_cmp(&width_y)
            })?,
        };

        let min = if first == 0 {
            candidates[0]
        } else {
            self.refine(candidates[first], candidates[first - 1], a, b)
        };
        let max = if last == candidates.len() - 1 {
            candidates[last]
        } else {
            self.refine(candidates[last], candidates[last + 1], a, b)
        };
        Some(JInterval { min, max })
    }

    /// Bisects between an in-gamut J' and an out-of-gamut J', returning the
    /// in-gamut side of the edge.
    fn refine(&self, mut inside: f64, mut outside: f64, a: f64, b: f64) -> f64 {
        for _ in 0..BISECTION_STEPS {
            let mid = 0.5 * (inside + outside);
            if self.in_gamut(mid, a, b) {
                inside = mid;
            } else {
                outside = mid;
            }
        }
        inside
    }

    /// True if every sample of `fit` converts to sRGB within the fit
    /// tolerance. Catches gamut gaps narrower than the scan grid.
    fn line_in_gamut(&self, fit: &ColorArray) -> bool {
        let loose = self.with_gamut_tolerance(self.gamut_tolerance.max(FIT_TOLERANCE));
        fit.samples()
            .all(|[j, a, b]| loose.in_gamut(j.clamp(0.0, 100.0), a, b))
    }

    /// Evenly spaced J' from 0 to 100, at most `grid_step` apart.
    fn grid(&self) -> Vec<f64> {
        let n = (100.0 / self.grid_step).ceil() as usize;
        linspace(0.0, 100.0, n + 1)
    }

    /// In-gamut J' interval of every sample of `jab`.
    pub fn bounds(&self, jab: &ColorArray) -> JBounds {
        let mut intervals = [None; N_SAMPLES];
        for (i, slot) in intervals.iter_mut().enumerate() {
            let [j, a, b] = jab.sample(i);
            *slot = self.interval(a, b, Some(j));
            trace!(i, ?slot, "lightness interval");
        }
        let bounds = JBounds { intervals };
        debug!(
            empty = bounds.empty_count(),
            grid_step = self.grid_step,
            "lightness bounds"
        );
        bounds
    }

    /// Both J' fits: (fit to original endpoints, fit to max range).
    pub fn correct(&self, jab: &ColorArray) -> (Option<ColorArray>, Option<ColorArray>) {
        self.correct_with(jab, &mut |_: &ColorArray, _: &JBounds| {})
    }

    /// Like [`correct`](Self::correct), handing the bounds to `observer`.
    pub fn correct_with(
        &self,
        jab: &ColorArray,
        observer: &mut impl BoundsObserver,
    ) -> (Option<ColorArray>, Option<ColorArray>) {
        let bounds = self.bounds(jab);
        observer.observe(jab, &bounds);

        let to_original = fit_to_original(jab, &bounds).filter(|fit| self.line_in_gamut(fit));
        let to_max_range = fit_to_max_range(jab, &bounds).filter(|fit| self.line_in_gamut(fit));
        debug!(
            fit_to_original = to_original.is_some(),
            fit_to_max_range = to_max_range.is_some(),
            "correct_j"
        );
        (to_original, to_max_range)
    }
}

/// Maximal runs of `true`, as inclusive index pairs.
fn in_gamut_runs(inside: &[bool]) -> Vec<(usize, usize)> {
    let mut runs = Vec::new();
    let mut start = None;
    for (i, &ok) in inside.iter().enumerate() {
        match (ok, start) {
            (true, None) => start = Some(i),
            (false, Some(s)) => {
                runs.push((s, i - 1));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(s) = start {
        runs.push((s, inside.len() - 1));
    }
    runs
}

/// Distance from `j` to the closed range `(lo, hi)`, zero inside.
#[inline]
fn distance_to((lo, hi): (f64, f64), j: f64) -> f64 {
    (lo - j).max(j - hi).max(0.0)
}

#[inline]
fn position(i: usize) -> f64 {
    i as f64 / (N_SAMPLES - 1) as f64
}

/// Copy of `jab` with J' replaced by `p + q * t`.
fn with_line(jab: &ColorArray, p: f64, q: f64) -> ColorArray {
    let mut out = jab.clone();
    for (i, j) in out.row_mut(0).iter_mut().enumerate() {
        *j = p + q * position(i);
    }
    out
}

fn fit_to_original(jab: &ColorArray, bounds: &JBounds) -> Option<ColorArray> {
    let j = jab.row(0);
    let (p, q) = (j[0], j[N_SAMPLES - 1] - j[0]);
    let out = with_line(jab, p, q);
    if bounds.admits(out.row(0), FIT_TOLERANCE) {
        Some(out)
    } else {
        None
    }
}

fn fit_to_max_range(jab: &ColorArray, bounds: &JBounds) -> Option<ColorArray> {
    if !bounds.is_feasible() {
        return None;
    }
    let j = jab.row(0);
    // Flat input counts as increasing
    let direction = if j[N_SAMPLES - 1] >= j[0] { 1.0 } else { -1.0 };

    // Peak of the concave margin
    let (mut lo, mut hi) = (-MAX_SLOPE, MAX_SLOPE);
    for _ in 0..TERNARY_STEPS {
        let m1 = lo + (hi - lo) / 3.0;
        let m2 = hi - (hi - lo) / 3.0;
        if bounds.margin(m1) < bounds.margin(m2) {
            lo = m1;
        } else {
            hi = m2;
        }
    }
    let q_peak = 0.5 * (lo + hi);
    if bounds.margin(q_peak) < -FIT_TOLERANCE {
        trace!(q_peak, margin = bounds.margin(q_peak), "no feasible J' line");
        return None;
    }

    // Steepest feasible slope in the original direction
    let (mut feasible, mut infeasible) = (q_peak, direction * MAX_SLOPE);
    for _ in 0..BISECTION_STEPS * 2 {
        let mid = 0.5 * (feasible + infeasible);
        if bounds.margin(mid) >= 0.0 {
            feasible = mid;
        } else {
            infeasible = mid;
        }
    }
    let q = feasible;
    if q * direction <= 0.0 {
        trace!(q, direction, "J' line has the wrong direction");
        return None;
    }

    let (hi_offset, lo_offset) = bounds.offset_range(q);
    let p = 0.5 * (lo_offset + hi_offset);
    trace!(p, q, "fit to max range");
    Some(with_line(jab, p, q))
}

/// [`LightnessCorrector::bounds`] with default settings.
pub fn lightness_bounds(jab: &ColorArray) -> JBounds {
    LightnessCorrector::default().bounds(jab)
}

/// [`LightnessCorrector::correct`] with default settings.
///
/// `None` in either position means that fit cannot stay in gamut; it is a
/// normal outcome, not an error.
pub fn correct_j(jab: &ColorArray) -> (Option<ColorArray>, Option<ColorArray>) {
    LightnessCorrector::default().correct(jab)
}

/// [`LightnessCorrector::correct_with`] with default settings.
pub fn correct_j_with(
    jab: &ColorArray,
    observer: &mut impl BoundsObserver,
) -> (Option<ColorArray>, Option<ColorArray>) {
    LightnessCorrector::default().correct_with(jab, observer)
}
