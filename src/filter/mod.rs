//! Causal recursive (IIR) filtering.
//!
//! Filters are described by a [`TransferFunction`] `H(z) = B(z) / A(z)` with designed `f64`
//! coefficients. Before use the coefficients are converted into a [`Numeric`] domain
//! ([`Coefficients`]), and every channel keeps its own delay line. The evaluator is the
//! Direct-Form-II-transposed recurrence:
//!
//! ```text
//! y      = B[0]*x + z[0]
//! z[i-1] = B[i]*x + z[i] - A[i]*y     for i in 1..n
//! ```
//!
//! where `z[n-1]` is re-seeded with zero on every call.
//!
//! With no coefficients the filter passes its input through unchanged.
//!
//! ```rust
//! use accel_resample::filter::{Filter, FloatingPoint, TransferFunction};
//!
//! // Two-point moving average
//! let tf = TransferFunction::new(vec![0.5, 0.5], vec![1.0, 0.0]);
//! let mut filter = Filter::new(FloatingPoint, &tf);
//! assert_eq!(filter.process(2.0), 1.0);
//! assert_eq!(filter.process(2.0), 2.0);
//! ```

use std::f64::consts::PI;

use crate::common::Sample;

#[cfg(feature = "butterworth")]
#[cfg_attr(docsrs, doc(cfg(feature = "butterworth")))]
pub mod butterworth;
pub mod numeric;
pub mod source;
pub mod table;

pub use numeric::{FixedPoint, FloatingPoint, Numeric};
pub use source::{CoefficientSource, DefaultCoefficients, FilterKind, FilterRequest};
pub use table::CoefficientTable;

/// Highest filter order the designer and the built-in table support.
pub const MAX_ORDER: usize = 8;

/// Error returned when a filter cannot be designed.
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum DesignError {
    /// Order is zero or above [`MAX_ORDER`].
    #[error("Filter order {order} is not supported (expected 1..={MAX_ORDER})")]
    InvalidOrder {
        /// The requested order
        order: usize,
    },
    /// A normalised cutoff is outside the open interval `(0, 1)`.
    #[error("Normalised cutoff {cutoff} must lie strictly between 0 and 1 (the Nyquist frequency)")]
    InvalidCutoff {
        /// The offending cutoff
        cutoff: f64,
    },
    /// Band-pass edges are not increasing.
    #[error("Band-pass lower edge {low} must be below upper edge {high}")]
    EmptyBand {
        /// Lower band edge
        low: f64,
        /// Upper band edge
        high: f64,
    },
}
crate::common::assert_error_traits!(DesignError);

/// Feed-forward (`b`) and feedback (`a`) polynomials of a recursive filter, in `f64`.
///
/// Both vectors always have the same length; `a[0]` is normalised to `1.0` and is never
/// applied by the evaluator.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TransferFunction {
    b: Vec<f64>,
    a: Vec<f64>,
}

impl TransferFunction {
    /// Builds a transfer function, padding the shorter polynomial with zeros and dividing
    /// both by `a[0]` when it is non-zero and not already one.
    pub fn new(mut b: Vec<f64>, mut a: Vec<f64>) -> Self {
        let len = b.len().max(a.len());
        b.resize(len, 0.0);
        a.resize(len, 0.0);

        if let Some(&a0) = a.first() {
            if a0 != 1.0 && a0 != 0.0 && a0.is_finite() {
                b.iter_mut().for_each(|c| *c /= a0);
                a.iter_mut().for_each(|c| *c /= a0);
            }
        }
        Self { b, a }
    }

    /// A transfer function without coefficients: output equals input.
    pub fn passthrough() -> Self {
        Self::default()
    }

    /// Number of coefficients in each polynomial.
    #[inline]
    pub fn len(&self) -> usize {
        self.b.len()
    }

    /// Whether there are no coefficients (pass-through).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }

    /// Feed-forward coefficients.
    pub fn b(&self) -> &[f64] {
        &self.b
    }

    /// Feedback coefficients.
    pub fn a(&self) -> &[f64] {
        &self.a
    }

    /// Filter order (number of coefficients minus one).
    pub fn order(&self) -> usize {
        self.len().saturating_sub(1)
    }

    /// Gain at DC, `B(1) / A(1)`.
    pub fn dc_gain(&self) -> f64 {
        if self.is_empty() {
            return 1.0;
        }
        self.b.iter().sum::<f64>() / self.a.iter().sum::<f64>()
    }

    /// Magnitude response at a normalised frequency (1.0 is the Nyquist frequency).
    pub fn gain_at(&self, normalized: f64) -> f64 {
        if self.is_empty() {
            return 1.0;
        }
        let w = PI * normalized;
        let eval = |poly: &[f64]| {
            let (re, im) = poly
                .iter()
                .enumerate()
                .fold((0.0, 0.0), |(re, im), (k, c)| {
                    let phase = w * k as f64;
                    (re + c * phase.cos(), im - c * phase.sin())
                });
            re.hypot(im)
        };
        eval(&self.b) / eval(&self.a)
    }

    /// Converts the coefficients into a numeric domain.
    pub fn quantize<N: Numeric>(&self, numeric: &N) -> Coefficients<N::Value> {
        Coefficients {
            b: self.b.iter().map(|&c| numeric.from_float(c)).collect(),
            a: self.a.iter().map(|&c| numeric.from_float(c)).collect(),
        }
    }
}

/// Transfer function coefficients converted into a numeric domain.
#[derive(Debug, Clone, PartialEq)]
pub struct Coefficients<V> {
    b: Vec<V>,
    a: Vec<V>,
}

impl<V: Copy> Coefficients<V> {
    /// Number of coefficients in each polynomial; also the length of a channel's state.
    #[inline]
    pub fn len(&self) -> usize {
        self.b.len()
    }

    /// Whether the filter is a pass-through.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.b.is_empty()
    }

    /// Allocates a zeroed delay line for one channel.
    pub fn new_state(&self, zero: V) -> Vec<V> {
        vec![zero; self.len()]
    }

    /// Gain at DC of the quantised polynomials, `B(1) / A(1)`.
    pub fn dc_gain<N: Numeric<Value = V>>(&self, numeric: &N) -> f64 {
        if self.is_empty() {
            return 1.0;
        }
        let sum = |poly: &[V]| poly.iter().map(|&c| numeric.to_float(c)).sum::<f64>();
        sum(&self.b) / sum(&self.a)
    }
}

/// Runs one value through the recursive filter, updating `state` in place.
///
/// `state` must hold at least `coefficients.len()` values. A filter without coefficients
/// returns `x` unchanged. Stability is the caller's responsibility.
#[inline]
pub fn evaluate<N: Numeric>(
    numeric: &N,
    coefficients: &Coefficients<N::Value>,
    state: &mut [N::Value],
    x: N::Value,
) -> N::Value {
    let n = coefficients.len();
    if n == 0 {
        return x;
    }
    debug_assert!(state.len() >= n);

    let (b, a) = (&coefficients.b, &coefficients.a);
    state[n - 1] = numeric.zero();
    let y = numeric.add(numeric.multiply(b[0], x), state[0]);
    for i in 1..n {
        let forward = numeric.add(numeric.multiply(b[i], x), state[i]);
        state[i - 1] = numeric.sub(forward, numeric.multiply(a[i], y));
    }
    y
}

/// A single-channel recursive filter owning its coefficients and delay line.
///
/// Every instance has private state, so any number of independent streams can be
/// filtered at once.
#[derive(Debug, Clone)]
pub struct Filter<N: Numeric> {
    numeric: N,
    coefficients: Coefficients<N::Value>,
    state: Vec<N::Value>,
}

impl<N: Numeric> Filter<N> {
    /// Creates a filter with zeroed state, evaluated in the domain `numeric` picks for
    /// `transfer`.
    pub fn new(numeric: N, transfer: &TransferFunction) -> Self {
        let numeric = numeric.fit(transfer, 1);
        let coefficients = transfer.quantize(&numeric);
        let state = coefficients.new_state(numeric.zero());
        Self {
            numeric,
            coefficients,
            state,
        }
    }

    /// Filters one value in the working domain.
    #[inline]
    pub fn process(&mut self, x: N::Value) -> N::Value {
        evaluate(&self.numeric, &self.coefficients, &mut self.state, x)
    }

    /// Filters one raw reading, converting in and out of the working domain.
    #[inline]
    pub fn process_sample(&mut self, sample: Sample) -> Sample {
        let x = self.numeric.from_input(sample);
        let y = self.process(x);
        self.numeric.to_output(y)
    }

    /// Filters a block of values in place.
    pub fn process_in_place(&mut self, values: &mut [N::Value]) {
        for value in values.iter_mut() {
            *value = self.process(*value);
        }
    }

    /// Clears the delay line.
    pub fn reset(&mut self) {
        let zero = self.numeric.zero();
        self.state.iter_mut().for_each(|z| *z = zero);
    }

    /// Whether the filter passes input through unchanged.
    pub fn is_passthrough(&self) -> bool {
        self.coefficients.is_empty()
    }

    /// The numeric domain the filter runs in.
    pub fn numeric(&self) -> &N {
        &self.numeric
    }
}
