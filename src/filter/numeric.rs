//! Numeric domains the recursive filter can run in.
//!
//! A resampler picks its domain once, at construction, and every filter step then goes
//! through the same [`Numeric`] strategy. [`FloatingPoint`] multiplies directly in `f64`;
//! [`FixedPoint`] keeps values as scaled `i64` integers and rounds every product back to
//! the working scale, saturating instead of wrapping on overflow.

use std::fmt::Debug;

use super::TransferFunction;
use crate::common::Sample;
use crate::math::{quantize, saturate};

/// Arithmetic strategy for the filter evaluator.
pub trait Numeric: Clone + Debug {
    /// Working representation of a signal value or coefficient.
    type Value: Copy + Debug + PartialEq;

    /// The additive identity, used to reset filter state.
    fn zero(&self) -> Self::Value;

    /// Converts a raw sensor reading into the working representation.
    fn from_input(&self, sample: Sample) -> Self::Value;

    /// Converts a working value back to a raw reading, rounding and saturating.
    fn to_output(&self, value: Self::Value) -> Sample;

    /// Converts a designed (floating point) coefficient into the working representation.
    fn from_float(&self, literal: f64) -> Self::Value;

    /// Product of a coefficient and a signal value.
    fn multiply(&self, coefficient: Self::Value, operand: Self::Value) -> Self::Value;

    /// Sum of two values.
    fn add(&self, a: Self::Value, b: Self::Value) -> Self::Value;

    /// Difference of two values.
    fn sub(&self, a: Self::Value, b: Self::Value) -> Self::Value;

    /// Multiplies a value by a small integer gain.
    fn gain(&self, value: Self::Value, factor: u32) -> Self::Value;

    /// Converts a working value to `f64`.
    fn to_float(&self, value: Self::Value) -> f64;

    /// The domain to evaluate `transfer` in, given that inputs are scaled by `gain` first.
    /// Domains with a configurable precision may pick one here; the default keeps `self`.
    fn fit(&self, transfer: &TransferFunction, gain: u32) -> Self {
        let _ = (transfer, gain);
        self.clone()
    }
}

/// Direct `f64` arithmetic.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FloatingPoint;

impl Numeric for FloatingPoint {
    type Value = f64;

    #[inline]
    fn zero(&self) -> f64 {
        0.0
    }

    #[inline]
    fn from_input(&self, sample: Sample) -> f64 {
        sample as f64
    }

    #[inline]
    fn to_output(&self, value: f64) -> Sample {
        quantize(value)
    }

    #[inline]
    fn from_float(&self, literal: f64) -> f64 {
        literal
    }

    #[inline]
    fn multiply(&self, coefficient: f64, operand: f64) -> f64 {
        coefficient * operand
    }

    #[inline]
    fn add(&self, a: f64, b: f64) -> f64 {
        a + b
    }

    #[inline]
    fn sub(&self, a: f64, b: f64) -> f64 {
        a - b
    }

    #[inline]
    fn gain(&self, value: f64, factor: u32) -> f64 {
        value * factor as f64
    }

    #[inline]
    fn to_float(&self, value: f64) -> f64 {
        value
    }
}

/// Smallest number of fractional bits [`FixedPoint::default`] starts from.
///
/// 13 bits is enough for a single second-order section but not for the 4th-order direct
/// form low-pass filters the resampler designs at low normalised cutoffs.
pub const DEFAULT_FRACTIONAL_BITS: u32 = 24;

/// Largest supported number of fractional bits.
pub const MAX_FRACTIONAL_BITS: u32 = 40;

/// Largest DC gain error, against the designed filter, the automatic precision settles for.
const FIT_TOLERANCE: f64 = 1.0e-6;

/// Bits above full scale kept free for the filter's internal state.
const STATE_HEADROOM_BITS: u32 = 5;

/// Scaled-integer arithmetic: a value `v` represents `v / 2^fractional_bits`.
///
/// Products are computed in `i128` with a half-unit rounding bias before the shift back
/// to scale. All operations saturate at the `i64` limits.
///
/// The default domain picks its precision per filter: starting at
/// [`DEFAULT_FRACTIONAL_BITS`], it uses the fewest bits at which the quantised
/// coefficients keep the designed DC gain, within the headroom the filter's input needs.
/// Low cutoffs relative to the filter rate need more bits. [`FixedPoint::new`] fixes the
/// precision instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPoint {
    fractional_bits: u32,
    automatic: bool,
}

impl FixedPoint {
    /// Creates a fixed point domain with the given number of fractional bits, clamped to
    /// `1..=MAX_FRACTIONAL_BITS`.
    pub fn new(fractional_bits: u32) -> Self {
        Self {
            fractional_bits: fractional_bits.clamp(1, MAX_FRACTIONAL_BITS),
            automatic: false,
        }
    }

    /// Whether the precision is chosen per filter.
    pub fn is_automatic(&self) -> bool {
        self.automatic
    }

    /// Number of fractional bits.
    pub fn fractional_bits(&self) -> u32 {
        self.fractional_bits
    }

    /// The representation of `1.0`.
    #[inline]
    pub fn scaling(&self) -> i64 {
        1 << self.fractional_bits
    }

    #[inline]
    fn bias(&self) -> i64 {
        1 << (self.fractional_bits - 1)
    }

    fn with_bits(&self, fractional_bits: u32) -> Self {
        Self {
            fractional_bits,
            ..*self
        }
    }
}

impl Default for FixedPoint {
    fn default() -> Self {
        Self {
            fractional_bits: DEFAULT_FRACTIONAL_BITS,
            automatic: true,
        }
    }
}

impl Numeric for FixedPoint {
    type Value = i64;

    #[inline]
    fn zero(&self) -> i64 {
        0
    }

    #[inline]
    fn from_input(&self, sample: Sample) -> i64 {
        (sample as i64) << self.fractional_bits
    }

    #[inline]
    fn to_output(&self, value: i64) -> Sample {
        // half away from zero, like `quantize`
        let magnitude =
            (value.unsigned_abs().saturating_add(self.bias() as u64) >> self.fractional_bits) as i64;
        saturate(if value < 0 { -magnitude } else { magnitude })
    }

    #[inline]
    fn from_float(&self, literal: f64) -> i64 {
        // `as` saturates on overflow and maps NaN to 0
        (literal * self.scaling() as f64).round() as i64
    }

    #[inline]
    fn multiply(&self, coefficient: i64, operand: i64) -> i64 {
        let product = (coefficient as i128 * operand as i128 + self.bias() as i128)
            >> self.fractional_bits;
        product.clamp(i64::MIN as i128, i64::MAX as i128) as i64
    }

    #[inline]
    fn add(&self, a: i64, b: i64) -> i64 {
        a.saturating_add(b)
    }

    #[inline]
    fn sub(&self, a: i64, b: i64) -> i64 {
        a.saturating_sub(b)
    }

    #[inline]
    fn gain(&self, value: i64, factor: u32) -> i64 {
        value.saturating_mul(factor as i64)
    }

    #[inline]
    fn to_float(&self, value: i64) -> f64 {
        value as f64 / self.scaling() as f64
    }

    fn fit(&self, transfer: &TransferFunction, gain: u32) -> Self {
        if !self.automatic || transfer.is_empty() {
            return *self;
        }
        let gain_bits = u32::BITS - gain.saturating_sub(1).leading_zeros();
        let limit = (i64::BITS - 1)
            .saturating_sub(Sample::BITS + gain_bits + STATE_HEADROOM_BITS)
            .clamp(DEFAULT_FRACTIONAL_BITS, MAX_FRACTIONAL_BITS);
        let target = transfer.dc_gain();
        (DEFAULT_FRACTIONAL_BITS..=limit)
            .map(|bits| self.with_bits(bits))
            .find(|domain| {
                let quantized = transfer.quantize(domain).dc_gain(domain);
                (quantized - target).abs() <= FIT_TOLERANCE
            })
            .unwrap_or_else(|| self.with_bits(limit))
    }
}
