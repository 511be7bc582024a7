//! Precomputed filter coefficients.
//!
//! The built-in entries cover the usual accelerometer conversions, so those rates keep
//! working when runtime design is compiled out (`--no-default-features`).

use std::collections::HashMap;

use super::source::{CoefficientSource, FilterKind, FilterRequest};
use super::{DesignError, TransferFunction};

/// 4th-order Butterworth low-pass filters: `(intermediate rate, cutoff, b, a)`.
#[rustfmt::skip]
const LOW_PASS_ORDER4: &[(u32, u32, [f64; 5], [f64; 5])] = &[
    // 60 -> 30, 200 -> 100, 100 -> 50: cutoff at half of Nyquist
    (60, 15,
        [0.09398085143379445, 0.3759234057351778, 0.5638851086027667, 0.3759234057351778, 0.09398085143379445],
        [1.0, 0.0, 0.4860288220682694, 0.0, 0.017664800872441887]),
    (100, 25,
        [0.09398085143379445, 0.3759234057351778, 0.5638851086027667, 0.3759234057351778, 0.09398085143379445],
        [1.0, 0.0, 0.4860288220682694, 0.0, 0.017664800872441887]),
    (200, 50,
        [0.09398085143379445, 0.3759234057351778, 0.5638851086027667, 0.3759234057351778, 0.09398085143379445],
        [1.0, 0.0, 0.4860288220682694, 0.0, 0.017664800872441887]),
    // 90 -> 30
    (90, 15,
        [0.026077721701092283, 0.10431088680436913, 0.1564663302065537, 0.10431088680436913, 0.026077721701092283],
        [1.0, -1.3066051441010489, 1.0304538354195745, -0.36236904476885773, 0.05576390066780882]),
    // 100 -> 25, 25 -> 100
    (100, 12,
        [0.008914457239463018, 0.03565782895785207, 0.0534867434367781, 0.03565782895785207, 0.008914457239463018],
        [1.0, -2.0483951377645093, 1.8417858416781623, -0.7824401031209364, 0.1316807150386917]),
    // 50 -> 30, 30 -> 50
    (150, 15,
        [0.004824343357716228, 0.019297373430864913, 0.02894606014629737, 0.019297373430864913, 0.004824343357716228],
        [1.0, -2.3695130071820376, 2.31398841441588, -1.0546654058785676, 0.18737949236818494]),
    // 80 -> 30, 30 -> 80
    (240, 15,
        [0.0009334986129548442, 0.0037339944518193766, 0.005600991677729065, 0.0037339944518193766, 0.0009334986129548442],
        [1.0, -2.976844333696732, 3.422309529377639, -1.786106600218039, 0.3555773823444096]),
    // 100 -> 30, 30 -> 100
    (300, 15,
        [0.0004165992044065994, 0.0016663968176263977, 0.0024995952264395965, 0.0016663968176263977, 0.0004165992044065994],
        [1.0, -3.180638548874719, 3.8611943489942133, -2.1121553551109686, 0.4382651422619798]),
    // 400 -> 100, 100 -> 400
    (400, 50,
        [0.010209480791203134, 0.04083792316481254, 0.061256884747218805, 0.04083792316481254, 0.010209480791203134],
        [1.0, -1.9684277869385178, 1.7358607092088858, -0.7244708295073621, 0.1203895998962444]),
];

/// 2nd-order Butterworth 0.5 Hz high-pass filters generated with mkfilter:
/// `(rate, gain, y[n-2] coefficient, y[n-1] coefficient)`.
const HIGH_PASS_HALF_HZ_ORDER2: &[(u32, f64, f64, f64)] = &[
    (30, 1.076862368, -0.8623486260, 1.8521464854),
    (40, 1.057108315, -0.8948743446, 1.8890330794),
    (50, 1.045431062, -0.9149758348, 1.9111970674),
    (100, 1.022463023, -0.9565436765, 1.9555782403),
];

/// A registry of transfer functions keyed by exact filter request.
#[derive(Debug, Clone, Default)]
pub struct CoefficientTable {
    entries: HashMap<FilterRequest, TransferFunction>,
}

impl CoefficientTable {
    /// An empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// The built-in table: 4th-order low-pass filters for common resampling pairs and the
    /// 2nd-order 0.5 Hz high-pass presets.
    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (rate, cutoff, b, a) in LOW_PASS_ORDER4 {
            table.insert(
                FilterRequest::low_pass(4, *rate, *cutoff),
                TransferFunction::new(b.to_vec(), a.to_vec()),
            );
        }
        for &(rate, gain, c0, c1) in HIGH_PASS_HALF_HZ_ORDER2 {
            let k = 1.0 / gain;
            table.insert(
                FilterRequest::new(FilterKind::HighPass, 2, rate, 500),
                TransferFunction::new(vec![k, -2.0 * k, k], vec![1.0, -c1, -c0]),
            );
        }
        table
    }

    /// Adds or replaces an entry.
    pub fn insert(&mut self, request: FilterRequest, transfer: TransferFunction) {
        self.entries.insert(request, transfer);
    }

    /// Looks up an entry.
    pub fn get(&self, request: &FilterRequest) -> Option<&TransferFunction> {
        self.entries.get(request)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table has no entries.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl CoefficientSource for CoefficientTable {
    fn coefficients(
        &self,
        request: &FilterRequest,
    ) -> Result<Option<TransferFunction>, DesignError> {
        Ok(self.get(request).cloned())
    }
}
