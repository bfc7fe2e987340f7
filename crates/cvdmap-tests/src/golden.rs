//! Golden reference values.
//!
//! - sRGB to CAM02-UCS numbers come from a separate scalar implementation
//!   of the published CIECAM02 / CAM02-UCS equations (D65 white with
//!   Y = 100, L_A = 64/pi/5, Y_b = 20, average surround).
//! - CVD numbers apply the Machado 2009 matrices by hand.
//! - Viridis samples are matplotlib's published table entries.
//!
//! They pin the numeric behavior of the whole pipeline so refactors of the
//! color math show up as test failures.

use approx::assert_abs_diff_eq;
use cvdmap::get_rgb_jab;
use cvdmap_color::cvd::simulate_rgb;
use cvdmap_color::{CvdType, Severity, srgb1_to_jab};

/// Tolerance against the reference numbers.
const EPS: f64 = 1e-6;

/// (sRGB1, CAM02-UCS J'a'b')
const JAB_REFERENCE: [([f64; 3], [f64; 3]); 5] = [
    ([1.0, 0.0, 0.0], [60.0569196322649, 38.67915029323473, 24.315783832957877]),
    ([0.0, 1.0, 0.0], [87.00345762013148, -32.23306518118427, 30.429635642520484]),
    ([0.0, 0.0, 1.0], [31.213911274005913, -8.38908152459498, -39.15714054260522]),
    ([0.5, 0.5, 0.5], [56.02800538403348, -1.2651610031756382, -0.7509584081905867]),
    ([1.0, 1.0, 1.0], [100.0, -1.9169865083226385, -1.1377728809788827]),
];

fn assert_triplet(actual: [f64; 3], expected: [f64; 3]) {
    for (a, e) in actual.iter().zip(expected) {
        assert_abs_diff_eq!(*a, e, epsilon = EPS);
    }
}

#[test]
fn golden_srgb_to_jab() {
    for (rgb, jab) in JAB_REFERENCE {
        assert_triplet(srgb1_to_jab(rgb), jab);
    }
}

#[test]
fn golden_cvd_simulation() {
    assert_triplet(
        simulate_rgb([1.0, 0.0, 0.0], CvdType::Deuteranomaly, Severity::FULL),
        [0.6400595551963536, 0.5658069412154982, 0.0],
    );
    assert_triplet(
        simulate_rgb([1.0, 0.0, 0.0], CvdType::Protanomaly, Severity::FULL),
        [0.4266084717107862, 0.37265427742344537, 0.0],
    );
    let half = Severity::new(50).unwrap();
    assert_triplet(
        simulate_rgb([0.2, 0.6, 0.3], CvdType::Deuteranomaly, half),
        [0.42538923185925037, 0.5589870766374564, 0.3108816655743168],
    );
}

#[test]
fn golden_viridis_samples() {
    let (viridis, jab) = get_rgb_jab("viridis", true).unwrap();
    let data = viridis.as_array();
    assert_triplet(data.sample(0), [0.267004, 0.004874, 0.329415]);
    assert_triplet(data.sample(128), [0.127568, 0.566949, 0.550556]);
    assert_triplet(data.sample(255), [0.993248, 0.906157, 0.143936]);

    let jab = jab.unwrap();
    assert_triplet(jab.sample(0), [18.651122156748258, 18.154158827565663, -16.403776160288874]);
    assert_triplet(jab.sample(128), [55.530503331072396, -21.18702045145004, -5.412329599412928]);
    assert_triplet(jab.sample(255), [92.39662369138581, -5.47350878065652, 33.393978116335695]);
}
