//! Digital Butterworth filter design.
//!
//! The analog prototype has its `N` poles evenly spaced on the left half of the unit
//! circle, `exp(jπ(2k + N + 1) / 2N)`, and no zeros. The prototype is moved to the
//! requested band in the analog domain (low-pass scaling, `s → ω/s` for high-pass,
//! `s → (s² + ω0²) / (s·bw)` for band-pass), mapped to the z-plane with a pre-warped
//! bilinear transform, and the zeros and poles are finally multiplied out into the
//! direct-form polynomials consumed by [`crate::filter::evaluate`].
//!
//! Cutoffs are normalised so that `1.0` is the Nyquist frequency.
//!
//! ```rust
//! use accel_resample::filter::butterworth::{design, Band};
//!
//! // 100 Hz to 30 Hz resampling runs at 300 Hz with a 15 Hz cutoff
//! let tf = design(4, Band::LowPass(15.0 / 150.0)).unwrap();
//! assert_eq!(tf.len(), 5);
//! assert!((tf.dc_gain() - 1.0).abs() < 1e-9);
//! ```

use std::f64::consts::PI;

use num_complex::Complex64;

use super::{DesignError, TransferFunction, MAX_ORDER};

/// Sample rate of the normalised domain (Nyquist = 1).
const FS: f64 = 2.0;

/// Pass band of a Butterworth design.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Band {
    /// Passes frequencies below the cutoff.
    LowPass(f64),
    /// Passes frequencies above the cutoff.
    HighPass(f64),
    /// Passes frequencies between the two edges. The resulting filter has twice the
    /// requested order.
    BandPass {
        /// Lower edge
        low: f64,
        /// Upper edge
        high: f64,
    },
}

impl Band {
    /// Selects the band from a pair of cutoffs where a negative value means "absent": a
    /// negative `low` gives a low-pass at `high`, a negative `high` gives a high-pass at
    /// `low`, and two positive cutoffs give a band-pass.
    pub fn from_cutoffs(low: f64, high: f64) -> Result<Self, DesignError> {
        match (low < 0.0, high < 0.0) {
            (true, true) => Err(DesignError::InvalidCutoff { cutoff: high }),
            (true, false) => Ok(Band::LowPass(high)),
            (false, true) => Ok(Band::HighPass(low)),
            (false, false) => Ok(Band::BandPass { low, high }),
        }
    }

    fn validate(&self) -> Result<(), DesignError> {
        let check = |cutoff: f64| {
            if cutoff > 0.0 && cutoff < 1.0 {
                Ok(())
            } else {
                Err(DesignError::InvalidCutoff { cutoff })
            }
        };
        match *self {
            Band::LowPass(cutoff) | Band::HighPass(cutoff) => check(cutoff),
            Band::BandPass { low, high } => {
                check(low)?;
                check(high)?;
                if low >= high {
                    return Err(DesignError::EmptyBand { low, high });
                }
                Ok(())
            }
        }
    }
}

/// Designs a Butterworth filter from a pair of normalised cutoffs, see
/// [`Band::from_cutoffs`].
pub fn coefficients(order: usize, low: f64, high: f64) -> Result<TransferFunction, DesignError> {
    design(order, Band::from_cutoffs(low, high)?)
}

/// Designs a Butterworth filter of the given order.
pub fn design(order: usize, band: Band) -> Result<TransferFunction, DesignError> {
    if order == 0 || order > MAX_ORDER {
        return Err(DesignError::InvalidOrder { order });
    }
    band.validate()?;

    let prototype: Vec<Complex64> = (0..order)
        .map(|k| {
            let theta = PI * (2 * k + order + 1) as f64 / (2 * order) as f64;
            Complex64::from_polar(1.0, theta)
        })
        .collect();

    let (zeros, poles, gain) = match band {
        Band::LowPass(cutoff) => low_pass(&prototype, warp(cutoff)),
        Band::HighPass(cutoff) => high_pass(&prototype, warp(cutoff)),
        Band::BandPass { low, high } => band_pass(&prototype, warp(low), warp(high)),
    };

    let (zeros, poles, gain) = bilinear(zeros, poles, gain);

    let b = expand(&zeros).into_iter().map(|c| c.re * gain).collect();
    let a = expand(&poles).into_iter().map(|c| c.re).collect();
    Ok(TransferFunction::new(b, a))
}

/// Pre-warps a normalised digital frequency to the analog frequency the bilinear transform
/// maps onto it.
fn warp(cutoff: f64) -> f64 {
    2.0 * FS * (PI * cutoff / FS).tan()
}

type Zpk = (Vec<Complex64>, Vec<Complex64>, f64);

fn low_pass(prototype: &[Complex64], wo: f64) -> Zpk {
    let poles = prototype.iter().map(|p| p * wo).collect();
    (Vec::new(), poles, wo.powi(prototype.len() as i32))
}

fn high_pass(prototype: &[Complex64], wo: f64) -> Zpk {
    let gain = prototype
        .iter()
        .fold(Complex64::new(1.0, 0.0), |acc, p| acc * -p)
        .inv()
        .re;
    let poles = prototype.iter().map(|p| wo / p).collect();
    let zeros = vec![Complex64::new(0.0, 0.0); prototype.len()];
    (zeros, poles, gain)
}

fn band_pass(prototype: &[Complex64], low: f64, high: f64) -> Zpk {
    let bw = high - low;
    let wo2 = low * high;
    let half: Vec<Complex64> = prototype.iter().map(|p| p * (bw / 2.0)).collect();
    let root = |p: &Complex64| (p * p - wo2).sqrt();

    let poles = half
        .iter()
        .map(|p| p + root(p))
        .chain(half.iter().map(|p| p - root(p)))
        .collect();
    let zeros = vec![Complex64::new(0.0, 0.0); prototype.len()];
    (zeros, poles, bw.powi(prototype.len() as i32))
}

fn bilinear(zeros: Vec<Complex64>, poles: Vec<Complex64>, gain: f64) -> Zpk {
    let fs2 = 2.0 * FS;
    let degree = poles.len() - zeros.len();

    let numerator = zeros
        .iter()
        .fold(Complex64::new(1.0, 0.0), |acc, z| acc * (fs2 - z));
    let denominator = poles
        .iter()
        .fold(Complex64::new(1.0, 0.0), |acc, p| acc * (fs2 - p));
    let gain = gain * (numerator / denominator).re;

    let map = |s: &Complex64| (fs2 + s) / (fs2 - s);
    let zeros = zeros
        .iter()
        .map(map)
        .chain(std::iter::repeat_n(Complex64::new(-1.0, 0.0), degree))
        .collect();
    let poles = poles.iter().map(map).collect();
    (zeros, poles, gain)
}

/// Coefficients of the monic polynomial with the given roots, highest power first.
fn expand(roots: &[Complex64]) -> Vec<Complex64> {
    let mut poly = vec![Complex64::new(1.0, 0.0)];
    for root in roots {
        poly.push(Complex64::new(0.0, 0.0));
        for i in (1..poly.len()).rev() {
            let previous = poly[i - 1];
            poly[i] -= previous * root;
        }
    }
    poly
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use rstest::rstest;

    fn assert_coefficients(actual: &[f64], expected: &[f64]) {
        assert_eq!(actual.len(), expected.len());
        for (i, (a, e)) in actual.iter().zip(expected).enumerate() {
            assert!((a - e).abs() < 1e-4, "coefficient {i}: {a} != {e}");
        }
    }

    #[test]
    fn band_pass_matches_reference_design() {
        // butter(4, [0.5, 20] / 50) at 100 Hz
        let tf = coefficients(4, 0.5 / 50.0, 20.0 / 50.0).unwrap();
        assert_coefficients(
            tf.b(),
            &[0.0430, 0.0, -0.1720, 0.0, 0.2580, 0.0, -0.1720, 0.0, 0.0430],
        );
        assert_coefficients(
            tf.a(),
            &[1.0, -4.7509, 9.7480, -11.6172, 9.1051, -4.8601, 1.6715, -0.3294, 0.0329],
        );
    }

    #[test]
    fn high_pass_matches_mkfilter() {
        // mkfilter: Butterworth order 2, 30 Hz, high-pass 0.5 Hz
        let tf = coefficients(2, 0.5 / 15.0, -1.0).unwrap();
        assert_abs_diff_eq!(tf.a()[1], -1.8521464854, epsilon = 1e-9);
        assert_abs_diff_eq!(tf.a()[2], 0.8623486260, epsilon = 1e-9);
        assert_abs_diff_eq!(tf.b()[0], 1.0 / 1.076862368, epsilon = 1e-9);
        assert_abs_diff_eq!(tf.dc_gain(), 0.0, epsilon = 1e-12);
    }

    #[rstest]
    #[case(1, 0.1)]
    #[case(2, 0.2)]
    #[case(4, 0.1)]
    #[case(4, 0.5)]
    #[case(5, 0.3)]
    #[case(8, 0.25)]
    fn low_pass_has_unity_dc_and_half_power_at_cutoff(#[case] order: usize, #[case] cutoff: f64) {
        let tf = design(order, Band::LowPass(cutoff)).unwrap();
        assert_eq!(tf.len(), order + 1);
        assert_abs_diff_eq!(tf.dc_gain(), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(tf.gain_at(cutoff), 0.5f64.sqrt(), epsilon = 1e-9);
        assert!(tf.gain_at((cutoff * 3.0).min(0.99)) < 0.5);
    }

    #[test]
    fn high_pass_blocks_dc_and_passes_nyquist() {
        let tf = design(4, Band::HighPass(0.2)).unwrap();
        assert_abs_diff_eq!(tf.dc_gain(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(tf.gain_at(1.0), 1.0, epsilon = 1e-9);
        assert_abs_diff_eq!(tf.gain_at(0.2), 0.5f64.sqrt(), epsilon = 1e-9);
    }

    #[test]
    fn band_pass_doubles_order() {
        let tf = design(3, Band::BandPass { low: 0.1, high: 0.4 }).unwrap();
        assert_eq!(tf.len(), 7);
        assert_abs_diff_eq!(tf.dc_gain(), 0.0, epsilon = 1e-9);
        assert_abs_diff_eq!(tf.gain_at(0.1), 0.5f64.sqrt(), epsilon = 1e-6);
        assert_abs_diff_eq!(tf.gain_at(0.4), 0.5f64.sqrt(), epsilon = 1e-6);
    }

    #[rstest]
    #[case(0, Band::LowPass(0.5), DesignError::InvalidOrder { order: 0 })]
    #[case(9, Band::LowPass(0.5), DesignError::InvalidOrder { order: 9 })]
    #[case(4, Band::LowPass(1.0), DesignError::InvalidCutoff { cutoff: 1.0 })]
    #[case(4, Band::HighPass(0.0), DesignError::InvalidCutoff { cutoff: 0.0 })]
    #[case(4, Band::BandPass { low: 0.4, high: 0.2 }, DesignError::EmptyBand { low: 0.4, high: 0.2 })]
    fn rejects_invalid_requests(
        #[case] order: usize,
        #[case] band: Band,
        #[case] expected: DesignError,
    ) {
        assert_eq!(design(order, band), Err(expected));
    }

    #[test]
    fn two_absent_cutoffs_are_rejected() {
        assert!(Band::from_cutoffs(-1.0, -1.0).is_err());
        assert_eq!(Band::from_cutoffs(-1.0, 0.3), Ok(Band::LowPass(0.3)));
        assert_eq!(Band::from_cutoffs(0.3, -1.0), Ok(Band::HighPass(0.3)));
    }
}
