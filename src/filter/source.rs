//! Where filter coefficients come from.
//!
//! A [`CoefficientSource`] answers a [`FilterRequest`] with a transfer function, with
//! "no entry" (`Ok(None)`), or with a design error. [`DefaultCoefficients`] consults the
//! built-in [`CoefficientTable`] first and falls back to runtime Butterworth design when
//! the `butterworth` feature is enabled.

use std::fmt::Debug;

use super::table::CoefficientTable;
use super::{DesignError, TransferFunction};

/// Shape of a requested filter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FilterKind {
    /// Passes frequencies below the cutoff.
    LowPass,
    /// Passes frequencies above the cutoff.
    HighPass,
}

/// A request for filter coefficients.
///
/// Frequencies are integers so requests can be matched exactly against a table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct FilterRequest {
    /// Shape of the filter.
    pub kind: FilterKind,
    /// Butterworth order.
    pub order: usize,
    /// Rate the filter runs at, in Hz.
    pub sample_rate: u32,
    /// Cutoff frequency, in mHz.
    pub cutoff_millihertz: u64,
}

impl FilterRequest {
    /// Creates a request with the cutoff given in millihertz.
    pub fn new(kind: FilterKind, order: usize, sample_rate: u32, cutoff_millihertz: u64) -> Self {
        Self {
            kind,
            order,
            sample_rate,
            cutoff_millihertz,
        }
    }

    /// A low-pass request with the cutoff given in whole Hz.
    pub fn low_pass(order: usize, sample_rate: u32, cutoff: u32) -> Self {
        Self::new(
            FilterKind::LowPass,
            order,
            sample_rate,
            u64::from(cutoff) * 1000,
        )
    }

    /// Cutoff relative to the Nyquist frequency of `sample_rate`.
    pub fn normalized_cutoff(&self) -> f64 {
        let cutoff = self.cutoff_millihertz as f64 / 1000.0;
        cutoff / (self.sample_rate as f64 / 2.0)
    }

    /// The design band for this request.
    #[cfg(feature = "butterworth")]
    pub fn band(&self) -> Result<super::butterworth::Band, DesignError> {
        use super::butterworth::Band;

        let cutoff = self.normalized_cutoff();
        Ok(match self.kind {
            FilterKind::LowPass => Band::LowPass(cutoff),
            FilterKind::HighPass => Band::HighPass(cutoff),
        })
    }
}

/// Supplies filter coefficients for a request.
pub trait CoefficientSource: Debug + Send + Sync {
    /// Returns the transfer function for `request`, `Ok(None)` when this source has
    /// nothing for it, or an error when the request cannot be satisfied at all.
    fn coefficients(&self, request: &FilterRequest) -> Result<Option<TransferFunction>, DesignError>;
}

/// Designs Butterworth filters at runtime.
#[cfg(feature = "butterworth")]
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeDesign;

#[cfg(feature = "butterworth")]
impl CoefficientSource for RuntimeDesign {
    fn coefficients(&self, request: &FilterRequest) -> Result<Option<TransferFunction>, DesignError> {
        super::butterworth::design(request.order, request.band()?).map(Some)
    }
}

/// The table first, then runtime design when it is compiled in and enabled.
#[derive(Debug, Clone)]
pub struct DefaultCoefficients {
    table: CoefficientTable,
    runtime_design: bool,
}

impl DefaultCoefficients {
    /// Built-in table plus runtime design (when compiled in).
    pub fn new() -> Self {
        Self {
            table: CoefficientTable::builtin(),
            runtime_design: cfg!(feature = "butterworth"),
        }
    }

    /// Serves only table entries.
    pub fn table_only(table: CoefficientTable) -> Self {
        Self {
            table,
            runtime_design: false,
        }
    }

    /// The table consulted before runtime design.
    pub fn table(&self) -> &CoefficientTable {
        &self.table
    }

    /// Mutable access to the table, e.g. to register custom coefficients.
    pub fn table_mut(&mut self) -> &mut CoefficientTable {
        &mut self.table
    }

    /// Whether requests missing from the table are designed at runtime.
    pub fn runtime_design(&self) -> bool {
        self.runtime_design
    }
}

impl Default for DefaultCoefficients {
    fn default() -> Self {
        Self::new()
    }
}

impl CoefficientSource for DefaultCoefficients {
    fn coefficients(&self, request: &FilterRequest) -> Result<Option<TransferFunction>, DesignError> {
        if let Some(found) = self.table.get(request) {
            #[cfg(feature = "tracing")]
            tracing::debug!(?request, "filter coefficients from table");
            return Ok(Some(found.clone()));
        }

        #[cfg(feature = "butterworth")]
        if self.runtime_design {
            #[cfg(feature = "tracing")]
            tracing::debug!(?request, "designing filter coefficients");
            return RuntimeDesign.coefficients(request);
        }

        #[cfg(feature = "tracing")]
        tracing::warn!(?request, "no filter coefficients available");
        Ok(None)
    }
}
