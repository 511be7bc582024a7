//! Configuration for the resampler.

use std::num::NonZero;
use std::sync::Arc;

use super::{Resampler, ResamplerError};
use crate::common::{AxisCount, SampleRate};
use crate::filter::{CoefficientSource, DefaultCoefficients, FloatingPoint, Numeric};

/// Filter order used unless configured otherwise.
pub const DEFAULT_ORDER: usize = 4;

/// Resampler configuration.
///
/// # Examples
///
/// ```rust
/// use accel_resample::math::nz;
/// use accel_resample::filter::FixedPoint;
/// use accel_resample::resampler::{Resampler, ResamplerConfig};
///
/// let config = ResamplerConfig::new()
///     .order(nz!(4))
///     .numeric(FixedPoint::default());
/// let resampler = Resampler::with_config(nz!(100), nz!(30), nz!(3), config).unwrap();
/// assert_eq!(resampler.coefficient_count(), 5);
/// ```
#[derive(Debug, Clone)]
pub struct ResamplerConfig<N: Numeric = FloatingPoint> {
    pub(super) order: usize,
    pub(super) numeric: N,
    pub(super) source: Arc<dyn CoefficientSource>,
    pub(super) bypass_equal_rates: bool,
}

impl ResamplerConfig<FloatingPoint> {
    /// Order 4, `f64` arithmetic, default coefficient source, equal rates bypassed.
    pub fn new() -> Self {
        Self {
            order: DEFAULT_ORDER,
            numeric: FloatingPoint,
            source: Arc::new(DefaultCoefficients::new()),
            bypass_equal_rates: true,
        }
    }
}

impl Default for ResamplerConfig<FloatingPoint> {
    fn default() -> Self {
        Self::new()
    }
}

impl<N: Numeric> ResamplerConfig<N> {
    /// Set the order of the anti-aliasing low-pass filter.
    ///
    /// The built-in table only holds 4th-order filters; other orders need runtime design
    /// (the `butterworth` feature) or a custom coefficient source.
    pub fn order(mut self, order: NonZero<usize>) -> Self {
        self.order = order.get();
        self
    }

    /// Set the numeric domain the filter is evaluated in.
    pub fn numeric<M: Numeric>(self, numeric: M) -> ResamplerConfig<M> {
        ResamplerConfig {
            order: self.order,
            numeric,
            source: self.source,
            bypass_equal_rates: self.bypass_equal_rates,
        }
    }

    /// Set where filter coefficients come from.
    pub fn coefficients(mut self, source: impl CoefficientSource + 'static) -> Self {
        self.source = Arc::new(source);
        self
    }

    /// Whether a conversion between equal rates skips filtering entirely (the default).
    ///
    /// When disabled, equal rates ask the coefficient source for a filter with its cutoff
    /// at the Nyquist frequency, which a Butterworth design cannot provide.
    pub fn bypass_equal_rates(mut self, bypass: bool) -> Self {
        self.bypass_equal_rates = bypass;
        self
    }

    /// Create a [`Resampler`] with this configuration.
    pub fn build<'a>(
        self,
        from: SampleRate,
        to: SampleRate,
        axes: AxisCount,
    ) -> Result<Resampler<'a, N>, ResamplerError> {
        Resampler::with_config(from, to, axes, self)
    }
}
