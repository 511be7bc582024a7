use super::{RateConverter, ResamplerConfig, ResamplerError};
use crate::common::{AxisCount, Frame, SampleRate};
use crate::filter::{FloatingPoint, Numeric};

/// Iterator adapter that resamples a stream of frames.
///
/// Runs the same conversion as [`Resampler`](super::Resampler) but pulls input lazily,
/// one frame at a time, from any iterator. Entries of a frame beyond the configured
/// axis count are ignored on input and zero on output.
///
/// ```rust
/// use accel_resample::math::nz;
/// use accel_resample::resampler::ResampleFrames;
///
/// let input = std::iter::repeat([0, 0, 1000]).take(100);
/// let output: Vec<_> = ResampleFrames::new(input, nz!(100), nz!(50), nz!(3))
///     .unwrap()
///     .collect();
/// assert_eq!(output.len(), 50);
/// ```
#[derive(Debug, Clone)]
pub struct ResampleFrames<I, N: Numeric = FloatingPoint> {
    input: I,
    converter: RateConverter<N>,
}

impl<I> ResampleFrames<I, FloatingPoint>
where
    I: Iterator<Item = Frame>,
{
    /// Resamples `input` with the default configuration.
    pub fn new(
        input: I,
        from: SampleRate,
        to: SampleRate,
        axes: AxisCount,
    ) -> Result<Self, ResamplerError> {
        Self::with_config(input, from, to, axes, ResamplerConfig::default())
    }
}

impl<I, N> ResampleFrames<I, N>
where
    I: Iterator<Item = Frame>,
    N: Numeric,
{
    /// Resamples `input` with a custom configuration.
    pub fn with_config(
        input: I,
        from: SampleRate,
        to: SampleRate,
        axes: AxisCount,
        config: ResamplerConfig<N>,
    ) -> Result<Self, ResamplerError> {
        Ok(Self {
            input,
            converter: RateConverter::new(from, to, axes, config)?,
        })
    }

    /// Interpolation factor `P`.
    #[inline]
    pub fn up_sample(&self) -> u32 {
        self.converter.up
    }

    /// Decimation factor `Q`.
    #[inline]
    pub fn down_sample(&self) -> u32 {
        self.converter.down
    }

    /// Get a reference to the underlying iterator.
    #[inline]
    pub fn inner(&self) -> &I {
        &self.input
    }

    /// Destroys this adapter and returns the underlying iterator.
    #[inline]
    pub fn into_inner(self) -> I {
        self.input
    }
}

impl<I, N> Iterator for ResampleFrames<I, N>
where
    I: Iterator<Item = Frame>,
    N: Numeric,
{
    type Item = Frame;

    fn next(&mut self) -> Option<Frame> {
        loop {
            let emits = self.converter.emits();
            if !self.converter.step(|| self.input.next()) {
                return None;
            }
            if emits {
                return Some(self.converter.filtered());
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let (up, down) = (self.converter.up as usize, self.converter.down as usize);
        let (lower, upper) = self.input.size_hint();
        let scale = |frames: usize| frames.saturating_mul(up) / down;
        (scale(lower), upper.map(|frames| scale(frames).saturating_add(1)))
    }
}
