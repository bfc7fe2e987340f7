//! Fixed-shape 3x256 color arrays and validated colormaps.
//!
//! A [`ColorArray`] stores one channel per row, the layout every stage of the
//! pipeline works on:
//!
//! ```text
//!          sample 0   sample 1   ...   sample 255
//! row 0 |  R / J'  |          |     |            |
//! row 1 |  G / a'  |          |     |            |
//! row 2 |  B / b'  |          |     |            |
//! ```
//!
//! A [`Colormap`] is a `ColorArray` of RGB values that has been checked to be
//! finite and inside [0, 1]. It is immutable; transforms return new arrays.
//!
//! # Usage
//!
//! ```rust
//! use cvdmap_core::{ColorArray, Colormap, N_SAMPLES};
//!
//! // A gray ramp
//! let ramp = ColorArray::from_fn(|i| {
//!     let v = i as f64 / (N_SAMPLES - 1) as f64;
//!     [v, v, v]
//! });
//! let cmap = Colormap::new(ramp).unwrap();
//! assert_eq!(cmap.sample(1.0), [1.0, 1.0, 1.0]);
//! ```

use std::ops::{Index, IndexMut};

use crate::{Error, Result};

/// Number of samples in every colormap.
pub const N_SAMPLES: usize = 256;

/// A 3xN_SAMPLES matrix of color values, one channel per row.
///
/// Holds RGB data (any RGB encoding) or perceptual J'a'b' data; the meaning
/// is given by the color space the caller associates with it.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorArray {
    rows: [[f64; N_SAMPLES]; 3],
}

impl ColorArray {
    /// Creates an array filled with zeros.
    #[inline]
    pub const fn zeros() -> Self {
        Self {
            rows: [[0.0; N_SAMPLES]; 3],
        }
    }

    /// Creates an array from three channel rows.
    #[inline]
    pub const fn from_rows(rows: [[f64; N_SAMPLES]; 3]) -> Self {
        Self { rows }
    }

    /// Creates an array by evaluating `f` for every sample index.
    pub fn from_fn(mut f: impl FnMut(usize) -> [f64; 3]) -> Self {
        let mut out = Self::zeros();
        for i in 0..N_SAMPLES {
            out.set_sample(i, f(i));
        }
        out
    }

    /// Creates an array from dynamically sized rows.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidColormap`] unless there are exactly 3 rows of
    /// [`N_SAMPLES`] values each.
    pub fn try_from_rows<R: AsRef<[f64]>>(rows: &[R]) -> Result<Self> {
        if rows.len() != 3 {
            return Err(Error::invalid_colormap(format!(
                "expected 3 rows, got {}",
                rows.len()
            )));
        }
        let mut out = Self::zeros();
        for (c, row) in rows.iter().enumerate() {
            let row = row.as_ref();
            if row.len() != N_SAMPLES {
                return Err(Error::invalid_colormap(format!(
                    "row {c}: expected {N_SAMPLES} samples, got {}",
                    row.len()
                )));
            }
            out.rows[c].copy_from_slice(row);
        }
        Ok(out)
    }

    /// Creates an array from a list of per-sample triples.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidColormap`] unless exactly [`N_SAMPLES`] triples are given.
    pub fn try_from_samples(samples: &[[f64; 3]]) -> Result<Self> {
        if samples.len() != N_SAMPLES {
            return Err(Error::invalid_colormap(format!(
                "expected {N_SAMPLES} samples, got {}",
                samples.len()
            )));
        }
        Ok(Self::from_fn(|i| samples[i]))
    }

    /// Returns one channel row.
    #[inline]
    pub fn row(&self, channel: usize) -> &[f64; N_SAMPLES] {
        &self.rows[channel]
    }

    /// Returns one channel row mutably.
    #[inline]
    pub fn row_mut(&mut self, channel: usize) -> &mut [f64; N_SAMPLES] {
        &mut self.rows[channel]
    }

    /// Returns all rows.
    #[inline]
    pub fn rows(&self) -> &[[f64; N_SAMPLES]; 3] {
        &self.rows
    }

    /// Consumes the array and returns its rows.
    #[inline]
    pub fn into_rows(self) -> [[f64; N_SAMPLES]; 3] {
        self.rows
    }

    /// Returns the triple at sample `i`.
    #[inline]
    pub fn sample(&self, i: usize) -> [f64; 3] {
        [self.rows[0][i], self.rows[1][i], self.rows[2][i]]
    }

    /// Overwrites the triple at sample `i`.
    #[inline]
    pub fn set_sample(&mut self, i: usize, v: [f64; 3]) {
        self.rows[0][i] = v[0];
        self.rows[1][i] = v[1];
        self.rows[2][i] = v[2];
    }

    /// Iterates over the samples in order.
    pub fn samples(&self) -> impl Iterator<Item = [f64; 3]> + '_ {
        (0..N_SAMPLES).map(move |i| self.sample(i))
    }

    /// Returns a new array with `f` applied to every sample.
    pub fn map_samples(&self, mut f: impl FnMut([f64; 3]) -> [f64; 3]) -> Self {
        Self::from_fn(|i| f(self.sample(i)))
    }

    /// Clamps every value to [0, 1] in place.
    pub fn clip01_in_place(&mut self) {
        for v in self.rows.iter_mut().flatten() {
            *v = v.clamp(0.0, 1.0);
        }
    }

    /// Returns a copy with every value clamped to [0, 1].
    pub fn clip01(&self) -> Self {
        let mut out = self.clone();
        out.clip01_in_place();
        out
    }

    /// Returns `true` if all values are finite.
    pub fn is_finite(&self) -> bool {
        self.rows.iter().flatten().all(|v| v.is_finite())
    }

    /// Returns `true` if all values lie in [-tol, 1 + tol].
    pub fn in_unit_range(&self, tol: f64) -> bool {
        self.rows
            .iter()
            .flatten()
            .all(|&v| v >= -tol && v <= 1.0 + tol)
    }

    /// Smallest value over all channels.
    pub fn min(&self) -> f64 {
        self.rows.iter().flatten().copied().fold(f64::INFINITY, f64::min)
    }

    /// Largest value over all channels.
    pub fn max(&self) -> f64 {
        self.rows
            .iter()
            .flatten()
            .copied()
            .fold(f64::NEG_INFINITY, f64::max)
    }

    /// Largest absolute element-wise difference to `other`.
    pub fn max_abs_diff(&self, other: &Self) -> f64 {
        self.rows
            .iter()
            .flatten()
            .zip(other.rows.iter().flatten())
            .map(|(a, b)| (a - b).abs())
            .fold(0.0, f64::max)
    }

    /// Returns the array with sample order reversed.
    pub fn reversed(&self) -> Self {
        Self::from_fn(|i| self.sample(N_SAMPLES - 1 - i))
    }
}

impl Default for ColorArray {
    fn default() -> Self {
        Self::zeros()
    }
}

/// Indexes by `(channel, sample)`.
impl Index<(usize, usize)> for ColorArray {
    type Output = f64;

    #[inline]
    fn index(&self, (c, i): (usize, usize)) -> &f64 {
        &self.rows[c][i]
    }
}

impl IndexMut<(usize, usize)> for ColorArray {
    #[inline]
    fn index_mut(&mut self, (c, i): (usize, usize)) -> &mut f64 {
        &mut self.rows[c][i]
    }
}

/// An RGB colormap: 256 finite samples with every component in [0, 1].
#[derive(Debug, Clone, PartialEq)]
pub struct Colormap {
    data: ColorArray,
}

impl Colormap {
    /// Validates `data` as a colormap.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidColormap`] if any value is non-finite or outside [0, 1].
    pub fn new(data: ColorArray) -> Result<Self> {
        for (c, row) in data.rows().iter().enumerate() {
            if let Some(i) = row
                .iter()
                .position(|v| !v.is_finite() || !(0.0..=1.0).contains(v))
            {
                return Err(Error::invalid_colormap(format!(
                    "value {} at channel {c}, sample {i} is outside [0, 1]",
                    row[i]
                )));
            }
        }
        Ok(Self { data })
    }

    /// Validates a list of RGB triples as a colormap.
    pub fn from_samples(samples: &[[f64; 3]]) -> Result<Self> {
        Self::new(ColorArray::try_from_samples(samples)?)
    }

    /// Clamps `data` into [0, 1] and wraps it.
    ///
    /// Non-finite values are still rejected.
    pub fn from_clipped(data: &ColorArray) -> Result<Self> {
        if !data.is_finite() {
            return Err(Error::invalid_colormap("array contains non-finite values"));
        }
        Ok(Self {
            data: data.clip01(),
        })
    }

    /// Borrows the underlying array.
    #[inline]
    pub fn as_array(&self) -> &ColorArray {
        &self.data
    }

    /// Returns the underlying array.
    #[inline]
    pub fn into_array(self) -> ColorArray {
        self.data
    }

    /// Maps `t` in [0, 1] to the nearest sample. Out-of-range `t` is clamped,
    /// NaN maps to the first sample.
    pub fn sample(&self, t: f64) -> [f64; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let i = (t * (N_SAMPLES - 1) as f64).round() as usize;
        self.data.sample(i.min(N_SAMPLES - 1))
    }

    /// Returns the colormap with sample order reversed.
    pub fn reversed(&self) -> Self {
        Self {
            data: self.data.reversed(),
        }
    }

    /// Quantizes to 8-bit RGB.
    pub fn to_u8(&self) -> Vec<[u8; 3]> {
        self.data
            .samples()
            .map(|s| s.map(|v| (v * 255.0).round() as u8))
            .collect()
    }
}

impl AsRef<ColorArray> for Colormap {
    fn as_ref(&self) -> &ColorArray {
        &self.data
    }
}

impl From<Colormap> for ColorArray {
    fn from(cmap: Colormap) -> Self {
        cmap.data
    }
}

impl TryFrom<ColorArray> for Colormap {
    type Error = Error;

    fn try_from(data: ColorArray) -> Result<Self> {
        Self::new(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn ramp() -> ColorArray {
        ColorArray::from_fn(|i| {
            let v = i as f64 / (N_SAMPLES - 1) as f64;
            [v, 1.0 - v, 0.5]
        })
    }

    #[test]
    fn test_rows_and_samples_agree() {
        let a = ramp();
        assert_eq!(a.sample(10), [a.row(0)[10], a.row(1)[10], a.row(2)[10]]);
        assert_eq!(a[(1, 255)], 0.0);
    }

    #[test]
    fn test_try_from_rows_shape() {
        let ok = vec![vec![0.0; N_SAMPLES]; 3];
        assert!(ColorArray::try_from_rows(&ok).is_ok());

        let two_rows = vec![vec![0.0; N_SAMPLES]; 2];
        assert!(ColorArray::try_from_rows(&two_rows).unwrap_err().is_colormap_error());

        let short = vec![vec![0.0; 255], vec![0.0; N_SAMPLES], vec![0.0; N_SAMPLES]];
        assert!(ColorArray::try_from_rows(&short).is_err());
    }

    #[test]
    fn test_try_from_samples_shape() {
        assert!(ColorArray::try_from_samples(&[[0.0; 3]; 10]).is_err());
        assert!(ColorArray::try_from_samples(&[[0.0; 3]; N_SAMPLES]).is_ok());
    }

    #[test]
    fn test_colormap_rejects_out_of_range() {
        let mut a = ramp();
        a[(2, 7)] = 1.2;
        let err = Colormap::new(a).unwrap_err();
        assert!(err.to_string().contains("sample 7"));

        let mut b = ramp();
        b[(0, 0)] = f64::NAN;
        assert!(Colormap::new(b.clone()).is_err());
        assert!(Colormap::from_clipped(&b).is_err());
    }

    #[test]
    fn test_from_clipped() {
        let mut a = ramp();
        a[(0, 3)] = -0.25;
        a[(1, 4)] = 3.0;
        let cmap = Colormap::from_clipped(&a).unwrap();
        assert_eq!(cmap.as_array()[(0, 3)], 0.0);
        assert_eq!(cmap.as_array()[(1, 4)], 1.0);
    }

    #[test]
    fn test_sample_lookup() {
        let cmap = Colormap::new(ramp()).unwrap();
        assert_eq!(cmap.sample(0.0), [0.0, 1.0, 0.5]);
        assert_eq!(cmap.sample(2.0), [1.0, 0.0, 0.5]);
        assert_relative_eq!(cmap.sample(0.5)[0], 128.0 / 255.0);
    }

    #[test]
    fn test_reversed_and_diff() {
        let a = ramp();
        let r = a.reversed();
        assert_eq!(r.sample(0), a.sample(N_SAMPLES - 1));
        assert_eq!(r.reversed(), a);
        assert_relative_eq!(a.max_abs_diff(&r), 1.0);
        assert_eq!(a.max_abs_diff(&a), 0.0);
    }

    #[test]
    fn test_to_u8() {
        let cmap = Colormap::new(ramp()).unwrap();
        let bytes = cmap.to_u8();
        assert_eq!(bytes.len(), N_SAMPLES);
        assert_eq!(bytes[0], [0, 255, 128]);
        assert_eq!(bytes[255], [255, 0, 128]);
    }
}
