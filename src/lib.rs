//! Exact-ratio resampling of tri-axial accelerometer streams.
//!
//! Sensor recordings come at whatever rate the device was configured for. This crate
//! converts them to any other integer rate with a rational upsample, filter, downsample
//! chain, so arbitrarily long recordings never drift: converting `N` frames from `from`
//! to `to` Hz yields `ceil(N * to / from)` frames.
//!
//! # Quick start
//!
//! ```rust
//! use accel_resample::math::nz;
//! use accel_resample::{Pulled, Resampler};
//!
//! // One second of x/y/z readings at 100 Hz
//! let input: Vec<i16> = (0..100).flat_map(|_| [12, -40, 4096]).collect();
//!
//! let mut resampler = Resampler::new(nz!(100), nz!(30), nz!(3))?;
//! resampler.input(&input);
//!
//! let mut output = vec![0; 3 * 30];
//! assert_eq!(resampler.output(&mut output), Pulled::Full(30));
//! assert_eq!(resampler.output(&mut output), Pulled::NeedInput(0));
//! # Ok::<(), accel_resample::ResamplerError>(())
//! ```
//!
//! # Parts
//!
//! - [`resampler`]: the streaming [`Resampler`] over borrowed interleaved blocks, and
//!   [`ResampleFrames`] for iterators of frames.
//! - [`filter`]: the recursive filter evaluator shared by everything else, its numeric
//!   domains ([`FloatingPoint`], [`FixedPoint`]) and where coefficients come from.
//! - [`activity`]: classifying minutes of movement into intensity levels with published
//!   cut points.
//! - `wav` (feature `wav`): converting 16-bit WAV recordings.
//!
//! # Features
//!
//! - `butterworth` (default): design filters at runtime. Without it only the built-in
//!   table of coefficients for common rate pairs is available.
//! - `wav`: the WAV converter, using `hound`.
//! - `tracing`: log configuration decisions with `tracing`.

#![cfg_attr(docsrs, feature(doc_cfg))]
#![cfg_attr(test, deny(missing_docs))]

mod common;

pub mod activity;
pub mod filter;
pub mod math;
pub mod resampler;
#[cfg(feature = "wav")]
#[cfg_attr(docsrs, doc(cfg(feature = "wav")))]
pub mod wav;

pub use crate::common::{AxisCount, Frame, Sample, SampleRate, MAX_AXES};
pub use crate::filter::{FixedPoint, FloatingPoint};
pub use crate::resampler::{Pulled, ResampleFrames, Resampler, ResamplerConfig, ResamplerError};
