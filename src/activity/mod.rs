//! Cut-point activity classification.
//!
//! Every sample contributes `|SVM - 1|`, where the SVM is the vector magnitude of the
//! three axes in g. The values are optionally band-pass filtered (0.5 - 20 Hz) first,
//! with the upper edge dropped when it is at or above the Nyquist frequency. Valid
//! samples are summed for a minute (`round(sample_rate * 60)` samples), and the
//! minute's mean is assigned to the highest level whose cut point it meets or exceeds.
//! After a configured number of minutes the counts are emitted as an [`EpochSummary`].
//!
//! ```rust
//! use accel_resample::activity::{cut_points, ActivityConfig};
//!
//! let mut classifier = ActivityConfig::new(30.0, cut_points::WRIST).build().unwrap();
//! let mut summaries = Vec::new();
//! for _ in 0..3600 {
//!     // lying still
//!     summaries.extend(classifier.add_value([0.0, 0.0, 1.0], true));
//! }
//! assert_eq!(summaries.len(), 2);
//! assert_eq!(summaries[0].minutes(), &[1, 0, 0, 0]);
//! ```

use std::num::NonZero;

use crate::filter::{DesignError, Filter, FloatingPoint, TransferFunction};

pub mod cut_points;

/// Lower edge of the SVM band-pass filter, in Hz.
const BAND_LOW: f64 = 0.5;
/// Upper edge of the SVM band-pass filter, in Hz.
#[cfg(feature = "butterworth")]
const BAND_HIGH: f64 = 20.0;
#[cfg(feature = "butterworth")]
const FILTER_ORDER: usize = 4;

/// Error that can happen when configuring an [`ActivityClassifier`].
#[derive(Debug, thiserror::Error, Clone, PartialEq)]
pub enum ActivityError {
    /// The sample rate is not positive, or too low for a one-minute window.
    #[error("Invalid sample rate {sample_rate}")]
    InvalidSampleRate {
        /// The configured sample rate
        sample_rate: f64,
    },
    /// No cut points were given.
    #[error("At least one cut point is required")]
    NoCutPoints,
    /// A cut point is not positive or not above the previous one.
    #[error("Cut point {index} must be positive and above the previous one")]
    InvalidCutPoint {
        /// Position of the offending cut point
        index: usize,
    },
    /// Filtering was requested but no filter is available at this rate.
    #[error("No SVM filter is available at {sample_rate} Hz")]
    FilterUnavailable {
        /// The configured sample rate
        sample_rate: f64,
    },
    /// The SVM filter could not be designed.
    #[error("Could not design the SVM filter")]
    Design(#[from] DesignError),
}
crate::common::assert_error_traits!(ActivityError);

/// Configuration of an [`ActivityClassifier`].
#[derive(Debug, Clone, PartialEq)]
pub struct ActivityConfig {
    sample_rate: f64,
    cut_points: Vec<f64>,
    minute_epochs: u32,
    filter: bool,
    start_time: f64,
}

impl ActivityConfig {
    /// One-minute epochs, filtering enabled, starting at time zero.
    pub fn new(sample_rate: f64, cut_points: &[f64]) -> Self {
        Self {
            sample_rate,
            cut_points: cut_points.to_vec(),
            minute_epochs: 1,
            filter: true,
            start_time: 0.0,
        }
    }

    /// Set the number of minutes summarised per epoch.
    pub fn minute_epochs(mut self, minutes: NonZero<u32>) -> Self {
        self.minute_epochs = minutes.get();
        self
    }

    /// Whether SVM values are band-pass filtered before classification.
    pub fn filter(mut self, filter: bool) -> Self {
        self.filter = filter;
        self
    }

    /// Set the time of the first sample, in seconds since the Unix epoch.
    pub fn start_time(mut self, seconds: f64) -> Self {
        self.start_time = seconds;
        self
    }

    /// Create the classifier.
    pub fn build(self) -> Result<ActivityClassifier, ActivityError> {
        ActivityClassifier::new(self)
    }
}

/// Minutes spent at each activity level during one epoch.
#[derive(Debug, Clone, PartialEq)]
pub struct EpochSummary {
    start_time: f64,
    minutes: Vec<u32>,
}

impl EpochSummary {
    /// Time of the first sample of the epoch, in seconds since the Unix epoch.
    pub fn start_time(&self) -> f64 {
        self.start_time
    }

    /// Minutes per level, lowest level first. There is one more level than cut points.
    pub fn minutes(&self) -> &[u32] {
        &self.minutes
    }

    /// Minutes covered by this summary.
    pub fn total_minutes(&self) -> u32 {
        self.minutes.iter().sum()
    }
}

/// Accumulates samples into per-minute activity levels.
#[derive(Debug, Clone)]
pub struct ActivityClassifier {
    config: ActivityConfig,
    filter: Option<Filter<FloatingPoint>>,
    /// Samples per minute.
    interval: u64,
    sample: u64,
    valid_samples: u64,
    sum: f64,
    minute: u32,
    minutes: Vec<u32>,
    epoch_start: Option<f64>,
}

impl ActivityClassifier {
    /// Validates `config` and designs the SVM filter when filtering is enabled.
    pub fn new(config: ActivityConfig) -> Result<Self, ActivityError> {
        let sample_rate = config.sample_rate;
        let interval = (sample_rate * 60.0).round();
        if !sample_rate.is_finite() || interval < 1.0 {
            return Err(ActivityError::InvalidSampleRate { sample_rate });
        }
        if config.cut_points.is_empty() {
            return Err(ActivityError::NoCutPoints);
        }
        let mut previous = 0.0;
        for (index, &cut_point) in config.cut_points.iter().enumerate() {
            if cut_point.is_nan() || cut_point <= previous {
                return Err(ActivityError::InvalidCutPoint { index });
            }
            previous = cut_point;
        }

        let filter = if config.filter {
            Some(Filter::new(FloatingPoint, &svm_filter(sample_rate)?))
        } else {
            None
        };

        Ok(Self {
            minutes: vec![0; config.cut_points.len() + 1],
            config,
            filter,
            interval: interval as u64,
            sample: 0,
            valid_samples: 0,
            sum: 0.0,
            minute: 0,
            epoch_start: None,
        })
    }

    /// Adds one sample (acceleration in g per axis). Invalid samples advance time but do
    /// not count towards the mean. Returns a summary when this sample completes an epoch.
    pub fn add_value(&mut self, accel: [f64; 3], valid: bool) -> Option<EpochSummary> {
        if self.epoch_start.is_none() {
            self.epoch_start =
                Some(self.config.start_time + self.sample as f64 / self.config.sample_rate);
        }

        let mut svm = accel.iter().map(|v| v * v).sum::<f64>().sqrt() - 1.0;
        if let Some(filter) = &mut self.filter {
            svm = filter.process(svm);
        }
        if valid {
            self.sum += svm.abs();
            self.valid_samples += 1;
        }
        self.sample += 1;

        if self.sample % self.interval != 0 {
            return None;
        }
        self.close_minute()
    }

    fn close_minute(&mut self) -> Option<EpochSummary> {
        let mean = if self.valid_samples > 0 {
            self.sum / self.valid_samples as f64
        } else {
            0.0
        };
        let level = self.config.cut_points.partition_point(|&cut| mean >= cut);
        self.minutes[level] += 1;
        self.minute += 1;
        self.sum = 0.0;
        self.valid_samples = 0;

        #[cfg(feature = "tracing")]
        tracing::trace!(mean, level, minute = self.minute, "activity minute");

        if self.minute >= self.config.minute_epochs {
            Some(self.take_summary())
        } else {
            None
        }
    }

    fn take_summary(&mut self) -> EpochSummary {
        let levels = self.minutes.len();
        let summary = EpochSummary {
            start_time: self.epoch_start.take().unwrap_or(self.config.start_time),
            minutes: std::mem::replace(&mut self.minutes, vec![0; levels]),
        };
        self.minute = 0;
        summary
    }

    /// Flushes a partial epoch holding at least one complete minute. Samples of an
    /// incomplete minute are discarded.
    pub fn finish(mut self) -> Option<EpochSummary> {
        (self.minute > 0).then(|| self.take_summary())
    }

    /// Number of activity levels (cut points plus one).
    pub fn levels(&self) -> usize {
        self.minutes.len()
    }

    /// Samples per minute.
    pub fn samples_per_minute(&self) -> u64 {
        self.interval
    }
}

/// The SVM band-pass filter at `sample_rate`, a high-pass when the upper edge is at or
/// above the Nyquist frequency.
#[cfg(feature = "butterworth")]
fn svm_filter(sample_rate: f64) -> Result<TransferFunction, ActivityError> {
    let nyquist = sample_rate / 2.0;
    let high = if BAND_HIGH >= nyquist {
        -1.0
    } else {
        BAND_HIGH / nyquist
    };
    crate::filter::butterworth::coefficients(FILTER_ORDER, BAND_LOW / nyquist, high)
        .map_err(ActivityError::from)
}

/// Without runtime design only the 0.5 Hz high-pass presets are available.
#[cfg(not(feature = "butterworth"))]
fn svm_filter(sample_rate: f64) -> Result<TransferFunction, ActivityError> {
    use crate::filter::{CoefficientTable, FilterKind, FilterRequest};

    let unavailable = ActivityError::FilterUnavailable { sample_rate };
    if sample_rate.fract() != 0.0 || sample_rate > u32::MAX as f64 {
        return Err(unavailable);
    }
    let request = FilterRequest::new(
        FilterKind::HighPass,
        2,
        sample_rate as u32,
        (BAND_LOW * 1000.0) as u64,
    );
    CoefficientTable::builtin()
        .get(&request)
        .cloned()
        .ok_or(unavailable)
}
