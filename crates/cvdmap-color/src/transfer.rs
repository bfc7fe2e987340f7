//! sRGB transfer function.
//!
//! The sRGB standard uses a piecewise function combining a linear segment
//! near black with a power curve (approximately gamma 2.2) for the rest.
//!
//! Both directions are odd-symmetric: negative inputs map to the negated
//! result for their magnitude. Out-of-gamut intermediates produced by the
//! perceptual inverse therefore survive a decode/encode round trip.
//!
//! # Reference
//!
//! IEC 61966-2-1:1999

/// sRGB EOTF: Decodes sRGB encoded values to linear light.
///
/// # Formula
///
/// ```text
/// if |V| <= 0.04045:
///     L = V / 12.92
/// else:
///     L = sign(V) * ((|V| + 0.055) / 1.055)^2.4
/// ```
///
/// # Example
///
/// ```rust
/// use cvdmap_color::transfer::eotf;
///
/// let linear = eotf(0.5);
/// assert!((linear - 0.214).abs() < 0.01);
/// assert_eq!(eotf(-0.5), -linear);
/// ```
#[inline]
pub fn eotf(v: f64) -> f64 {
    let a = v.abs();
    let l = if a <= 0.04045 {
        a / 12.92
    } else {
        ((a + 0.055) / 1.055).powf(2.4)
    };
    l.copysign(v)
}

/// sRGB OETF: Encodes linear light to sRGB.
///
/// # Formula
///
/// ```text
/// if |L| <= 0.0031308:
///     V = L * 12.92
/// else:
///     V = sign(L) * (1.055 * |L|^(1/2.4) - 0.055)
/// ```
///
/// # Example
///
/// ```rust
/// use cvdmap_color::transfer::oetf;
///
/// let encoded = oetf(0.214);
/// assert!((encoded - 0.5).abs() < 0.01);
/// ```
#[inline]
pub fn oetf(l: f64) -> f64 {
    let a = l.abs();
    let v = if a <= 0.0031308 {
        a * 12.92
    } else {
        1.055 * a.powf(1.0 / 2.4) - 0.055
    };
    v.copysign(l)
}

/// Applies sRGB EOTF to an RGB triplet.
#[inline]
pub fn eotf_rgb(rgb: [f64; 3]) -> [f64; 3] {
    rgb.map(eotf)
}

/// Applies sRGB OETF to an RGB triplet.
#[inline]
pub fn oetf_rgb(rgb: [f64; 3]) -> [f64; 3] {
    rgb.map(oetf)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;

    #[test]
    fn test_endpoints() {
        assert_eq!(eotf(0.0), 0.0);
        assert_abs_diff_eq!(eotf(1.0), 1.0, epsilon = 1e-12);
        assert_abs_diff_eq!(oetf(1.0), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn test_roundtrip() {
        for i in -20..=40 {
            let v = i as f64 / 20.0;
            assert_abs_diff_eq!(oetf(eotf(v)), v, epsilon = 1e-12);
        }
    }

    #[test]
    fn test_linear_segment() {
        assert_abs_diff_eq!(eotf(0.04), 0.04 / 12.92, epsilon = 1e-15);
        assert_abs_diff_eq!(oetf(0.003), 0.003 * 12.92, epsilon = 1e-15);
    }

    #[test]
    fn test_sign_symmetry() {
        assert_eq!(eotf(-0.7), -eotf(0.7));
        assert_eq!(oetf(-0.2), -oetf(0.2));
    }

    #[test]
    fn test_monotonic() {
        let mut prev = eotf(0.0);
        for i in 1..=100 {
            let l = eotf(i as f64 / 100.0);
            assert!(l > prev);
            prev = l;
        }
    }
}
