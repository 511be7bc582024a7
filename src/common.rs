use std::num::NonZero;

/// Raw sensor reading for one axis, as stored by the device.
pub type Sample = i16;

/// Stream sample rate (frames per second).
pub type SampleRate = NonZero<u32>;

/// Number of axes in a stream. Axes are always interleaved.
pub type AxisCount = NonZero<u16>;

/// Maximum number of axes a stream may carry (tri-axial data).
pub const MAX_AXES: usize = 3;

/// One reading per axis. Streams with fewer than [`MAX_AXES`] axes leave the trailing
/// entries at zero.
pub type Frame = [Sample; MAX_AXES];

/// Compile-time check that an error type can be boxed, sent across threads and used
/// with `?` in `dyn Error` contexts.
macro_rules! assert_error_traits {
    ($to_test:path) => {
        const _: () = {
            const fn check<T: std::error::Error + Send + Sync + 'static>() {}
            check::<$to_test>();
        };
    };
}

pub(crate) use assert_error_traits;
