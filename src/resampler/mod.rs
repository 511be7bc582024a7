//! Exact rational sample rate conversion for interleaved multi-axis streams.
//!
//! A conversion from `from` to `to` Hz is reduced to `up / down` in lowest terms. Every
//! input frame is followed by `up - 1` zero frames (zero-stuffing), each value is scaled by
//! `up`, and the result is run through a recursive low-pass filter at the intermediate
//! rate `from * up`. Every `down`-th filtered frame is kept. The cutoff is half of the
//! lower of the two rates, so neither direction aliases.
//!
//! The [`Resampler`] borrows the caller's input block and writes into the caller's output
//! buffer; nothing is copied or queued.
//!
//! ```rust
//! use accel_resample::math::nz;
//! use accel_resample::resampler::{Pulled, Resampler};
//!
//! let input = [100i16, -100, 0].repeat(1000);
//! let mut resampler = Resampler::new(nz!(100), nz!(30), nz!(3)).unwrap();
//! assert_eq!((resampler.up_sample(), resampler.down_sample()), (3, 10));
//!
//! resampler.input(&input);
//! let mut output = vec![0; 3 * 64];
//! let mut total = 0;
//! loop {
//!     match resampler.output(&mut output) {
//!         Pulled::Full(frames) => total += frames,
//!         Pulled::NeedInput(frames) => {
//!             total += frames;
//!             break;
//!         }
//!     }
//! }
//! assert_eq!(total, 300);
//! ```

use crate::common::{AxisCount, Frame, Sample, SampleRate, MAX_AXES};
use crate::filter::{
    evaluate, Coefficients, DesignError, FilterRequest, FloatingPoint, Numeric, TransferFunction,
};
use crate::math::reduce_ratio;

mod builder;
mod frames;

pub use builder::{ResamplerConfig, DEFAULT_ORDER};
pub use frames::ResampleFrames;

/// Largest deviation from the designed DC gain accepted after quantising coefficients.
const DC_GAIN_TOLERANCE: f64 = 1.0e-3;

/// Error that can happen when creating a resampler.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ResamplerError {
    /// More axes than a frame can hold.
    #[error("Streams with {axes} axes are not supported (at most {MAX_AXES})")]
    TooManyAxes {
        /// The requested number of axes
        axes: u16,
    },
    /// No filter coefficients are available for this rate pair, or the numeric domain
    /// cannot represent them accurately.
    #[error("Converting from {from} Hz to {to} Hz is not supported")]
    UnsupportedRates {
        /// Input rate
        from: u32,
        /// Output rate
        to: u32,
    },
    /// The anti-aliasing filter could not be designed.
    #[error("Could not design the anti-aliasing filter")]
    Design(#[from] DesignError),
}
crate::common::assert_error_traits!(ResamplerError);

/// Result of [`Resampler::output`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[must_use]
pub enum Pulled {
    /// The output buffer was filled with this many frames. More output may be pending
    /// for the attached input: call `output` again before supplying more input.
    Full(usize),
    /// The attached input is used up after producing this many frames (possibly zero).
    /// Call `input` with the next block.
    NeedInput(usize),
}

impl Pulled {
    /// Number of frames written to the output buffer.
    pub fn frames(self) -> usize {
        match self {
            Pulled::Full(n) | Pulled::NeedInput(n) => n,
        }
    }

    /// Whether the resampler is waiting for the next input block.
    pub fn needs_input(self) -> bool {
        matches!(self, Pulled::NeedInput(_))
    }
}

/// Interpolate, filter, decimate. Shared by [`Resampler`] and [`ResampleFrames`].
#[derive(Debug, Clone)]
pub(crate) struct RateConverter<N: Numeric> {
    numeric: N,
    from: SampleRate,
    to: SampleRate,
    axes: usize,
    up: u32,
    down: u32,
    low_pass: u32,
    intermediate: u32,
    coefficients: Coefficients<N::Value>,
    /// One delay line per axis.
    state: Vec<Vec<N::Value>>,
    /// Latest filtered frame, the candidate output at each decimation point.
    filtered: Frame,
    /// Position within the interpolation cycle, `up` before the first step.
    up_pos: u32,
    /// Position within the decimation cycle, `down` before the first step.
    down_pos: u32,
}

impl<N: Numeric> RateConverter<N> {
    pub(crate) fn new(
        from: SampleRate,
        to: SampleRate,
        axes: AxisCount,
        config: ResamplerConfig<N>,
    ) -> Result<Self, ResamplerError> {
        if axes.get() as usize > MAX_AXES {
            return Err(ResamplerError::TooManyAxes { axes: axes.get() });
        }
        let unsupported = ResamplerError::UnsupportedRates {
            from: from.get(),
            to: to.get(),
        };

        let (up, down) = reduce_ratio(from.get(), to.get());
        let low_pass = from.min(to).get() / 2;
        let intermediate = u32::try_from(u64::from(from.get()) * u64::from(up))
            .map_err(|_| unsupported.clone())?;

        let transfer = if from == to && config.bypass_equal_rates {
            TransferFunction::passthrough()
        } else {
            let request = FilterRequest::low_pass(config.order, intermediate, low_pass);
            match config.source.coefficients(&request)? {
                Some(transfer) => transfer,
                None => {
                    #[cfg(feature = "tracing")]
                    tracing::warn!(from = from.get(), to = to.get(), "unsupported rate pair");
                    return Err(unsupported);
                }
            }
        };

        let numeric = config.numeric.fit(&transfer, up);
        let coefficients = transfer.quantize(&numeric);
        let dc_gain = coefficients.dc_gain(&numeric);
        if (dc_gain - transfer.dc_gain()).abs() > DC_GAIN_TOLERANCE {
            #[cfg(feature = "tracing")]
            tracing::warn!(?numeric, dc_gain, "coefficients lose precision in this domain");
            return Err(unsupported);
        }

        #[cfg(feature = "tracing")]
        tracing::debug!(
            from = from.get(),
            to = to.get(),
            up,
            down,
            low_pass,
            intermediate,
            coefficients = transfer.len(),
            origin = if transfer.is_empty() { "bypass" } else { "source" },
            ?numeric,
            "resampler configured"
        );

        let state = vec![coefficients.new_state(numeric.zero()); axes.get() as usize];
        Ok(Self {
            numeric,
            from,
            to,
            axes: axes.get() as usize,
            up,
            down,
            low_pass,
            intermediate,
            coefficients,
            state,
            filtered: [0; MAX_AXES],
            up_pos: up,
            down_pos: down,
        })
    }

    /// Whether the next step produces an output frame.
    #[inline]
    pub(crate) fn emits(&self) -> bool {
        self.down_pos >= self.down - 1
    }

    /// Whether the next step consumes an input frame.
    #[inline]
    fn needs_frame(&self) -> bool {
        self.up_pos >= self.up - 1
    }

    /// Forces the next step to start a new interpolation cycle.
    #[inline]
    pub(crate) fn restart_cycle(&mut self) {
        self.up_pos = self.up;
    }

    /// Advances one step at the intermediate rate. `next` is called at the start of an
    /// interpolation cycle; returns `false`, with no state changed, when it has no frame.
    pub(crate) fn step(&mut self, next: impl FnOnce() -> Option<Frame>) -> bool {
        let input = if self.needs_frame() {
            let Some(frame) = next() else {
                return false;
            };
            self.up_pos = 0;
            Some(frame)
        } else {
            self.up_pos += 1;
            None
        };

        let numeric = &self.numeric;
        for (axis, state) in self.state.iter_mut().enumerate() {
            let x = match input {
                Some(frame) => numeric.from_input(frame[axis]),
                None => numeric.zero(),
            };
            let y = evaluate(numeric, &self.coefficients, state, numeric.gain(x, self.up));
            self.filtered[axis] = numeric.to_output(y);
        }

        self.down_pos = if self.emits() { 0 } else { self.down_pos + 1 };
        true
    }

    #[inline]
    pub(crate) fn filtered(&self) -> Frame {
        self.filtered
    }

    #[inline]
    pub(crate) fn axes(&self) -> usize {
        self.axes
    }
}

/// Borrowed view over the block most recently passed to [`Resampler::input`].
#[derive(Debug, Clone, Copy)]
struct PendingInput<'a> {
    samples: &'a [Sample],
    axes: usize,
}

impl<'a> PendingInput<'a> {
    fn next_frame(&mut self) -> Option<Frame> {
        let (current, rest) = self.samples.split_at_checked(self.axes)?;
        self.samples = rest;
        let mut frame = [0; MAX_AXES];
        frame[..self.axes].copy_from_slice(current);
        Some(frame)
    }

    fn remaining(&self) -> usize {
        self.samples.len() / self.axes
    }
}

/// Streaming rational resampler.
///
/// Push a block with [`input`](Self::input), then call [`output`](Self::output) until it
/// reports [`Pulled::NeedInput`]. Filter state carries over between blocks, so a stream
/// split into blocks of any size converts exactly like the whole stream at once.
///
/// Each instance owns its filter state; independent streams need independent
/// resamplers, which may live on different threads.
#[derive(Debug, Clone)]
pub struct Resampler<'a, N: Numeric = FloatingPoint> {
    converter: RateConverter<N>,
    pending: PendingInput<'a>,
}

impl<'a> Resampler<'a, FloatingPoint> {
    /// Creates a resampler with the default configuration: a 4th-order filter evaluated in
    /// `f64`, coefficients from the built-in table or designed at runtime.
    pub fn new(
        from: SampleRate,
        to: SampleRate,
        axes: AxisCount,
    ) -> Result<Self, ResamplerError> {
        Self::with_config(from, to, axes, ResamplerConfig::default())
    }
}

impl<'a, N: Numeric> Resampler<'a, N> {
    /// Creates a resampler from a [`ResamplerConfig`].
    pub fn with_config(
        from: SampleRate,
        to: SampleRate,
        axes: AxisCount,
        config: ResamplerConfig<N>,
    ) -> Result<Self, ResamplerError> {
        let converter = RateConverter::new(from, to, axes, config)?;
        let pending = PendingInput {
            samples: &[],
            axes: converter.axes(),
        };
        Ok(Self { converter, pending })
    }

    /// Attaches the next block of interleaved input samples, replacing any block that is
    /// still attached. A trailing partial frame is ignored.
    ///
    /// The block is read in place; the borrow lasts as long as the resampler.
    pub fn input(&mut self, samples: &'a [Sample]) {
        self.pending.samples = samples;
        self.converter.restart_cycle();
    }

    /// Writes converted frames, interleaved, into `buffer`. Only whole frames are
    /// written. An output buffer shorter than one frame yields `Full(0)` while a frame
    /// is still to come from the attached block, and `NeedInput(0)` once it is used up.
    ///
    /// Stopping on a full buffer never drops or repeats a frame: output is the same for
    /// any sequence of buffer sizes.
    pub fn output(&mut self, buffer: &mut [Sample]) -> Pulled {
        let axes = self.converter.axes();
        if buffer.len() < axes {
            return if self.settle() {
                Pulled::Full(0)
            } else {
                Pulled::NeedInput(0)
            };
        }

        let mut produced = 0;
        for slot in buffer.chunks_exact_mut(axes) {
            loop {
                let emits = self.converter.emits();
                if !self.converter.step(|| self.pending.next_frame()) {
                    return Pulled::NeedInput(produced);
                }
                if emits {
                    slot.copy_from_slice(&self.converter.filtered()[..axes]);
                    produced += 1;
                    break;
                }
            }
        }
        Pulled::Full(produced)
    }

    /// Runs the steps before the next emitting one, which need no output space. Returns
    /// `false` when the attached block runs out before a frame can be emitted.
    fn settle(&mut self) -> bool {
        while !self.converter.emits() {
            if !self.converter.step(|| self.pending.next_frame()) {
                return false;
            }
        }
        !self.converter.needs_frame() || self.pending.remaining() > 0
    }

    /// Frames of the attached block not consumed yet.
    pub fn remaining_input(&self) -> usize {
        self.pending.remaining()
    }

    /// Input rate in Hz.
    pub fn from_rate(&self) -> SampleRate {
        self.converter.from
    }

    /// Output rate in Hz.
    pub fn to_rate(&self) -> SampleRate {
        self.converter.to
    }

    /// Interleaved axes per frame.
    pub fn axes(&self) -> usize {
        self.converter.axes()
    }

    /// Interpolation factor `P`.
    pub fn up_sample(&self) -> u32 {
        self.converter.up
    }

    /// Decimation factor `Q`.
    pub fn down_sample(&self) -> u32 {
        self.converter.down
    }

    /// Cutoff of the anti-aliasing filter in Hz.
    pub fn low_pass(&self) -> u32 {
        self.converter.low_pass
    }

    /// Rate the filter runs at, `from * up == to * down`.
    pub fn intermediate_frequency(&self) -> u32 {
        self.converter.intermediate
    }

    /// Number of coefficients per polynomial; zero when the filter is bypassed.
    pub fn coefficient_count(&self) -> usize {
        self.converter.coefficients.len()
    }

    /// Numeric domain of the filter.
    pub fn numeric(&self) -> &N {
        &self.converter.numeric
    }
}
