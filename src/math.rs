//! Small numeric helpers shared by the filter and resampler.

use num_rational::Ratio;

use crate::common::Sample;

/// Creates a `NonZero` from a literal, failing at compile time for zero.
///
/// ```rust
/// use accel_resample::math::nz;
/// use accel_resample::SampleRate;
///
/// const RATE: SampleRate = nz!(100);
/// assert_eq!(RATE.get(), 100);
/// ```
#[macro_export]
macro_rules! nz {
    ($n:literal) => {
        const {
            match ::std::num::NonZero::new($n) {
                Some(n) => n,
                None => panic!("nz!(0) is not allowed"),
            }
        }
    };
}

pub use crate::nz;

/// Reduces `to / from` to lowest terms, returning `(up, down)` so that
/// `to = from * up / down` and `gcd(up, down) == 1`.
#[inline]
pub fn reduce_ratio(from: u32, to: u32) -> (u32, u32) {
    Ratio::new(to, from).into_raw()
}

/// Rounds half away from zero and clamps into the `i16` range.
#[inline]
pub fn quantize(value: f64) -> Sample {
    if value.is_nan() {
        return 0;
    }
    value
        .round()
        .clamp(Sample::MIN as f64, Sample::MAX as f64) as Sample
}

/// Clamps a wide integer into the `i16` range.
#[inline]
pub fn saturate(value: i64) -> Sample {
    value.clamp(Sample::MIN as i64, Sample::MAX as i64) as Sample
}
