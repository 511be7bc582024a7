//! Resampling 16-bit PCM WAV files.
//!
//! Channels map to axes. Files with more than three channels keep the first three
//! (x, y, z of a four-channel x/y/z/aux recording).

use std::fs::File;
use std::io::{self, BufReader, BufWriter, Read, Seek, Write};
use std::path::Path;
use std::sync::Arc;

use hound::{SampleFormat, WavReader, WavSamples, WavSpec, WavWriter};

use crate::common::{assert_error_traits, AxisCount, Frame, SampleRate, MAX_AXES};
use crate::filter::Numeric;
use crate::resampler::{ResampleFrames, ResamplerConfig, ResamplerError};

/// Error that can happen while converting a WAV file.
#[derive(Debug, thiserror::Error, Clone)]
pub enum WavError {
    /// The input or output file could not be opened.
    #[error("Opening file")]
    OpenFile(#[source] Arc<io::Error>),
    /// The input is not valid WAV data.
    #[error("Could not read wav input")]
    Read(#[source] Arc<hound::Error>),
    /// The output could not be written.
    #[error("Could not write wav output")]
    Write(#[source] Arc<hound::Error>),
    /// Buffered output could not be flushed.
    #[error("Failed to flush all bytes to writer")]
    Flushing(#[source] Arc<io::Error>),
    /// The input is not 16-bit integer PCM, or has no channels or no sample rate.
    #[error(
        "Only 16-bit integer PCM with at least one channel is supported \
         (got {bits}-bit, {channels} channels at {sample_rate} Hz)"
    )]
    UnsupportedFormat {
        /// Bits per sample of the input
        bits: u16,
        /// Channels of the input
        channels: u16,
        /// Sample rate of the input
        sample_rate: u32,
    },
    /// No resampler is available for the rate pair.
    #[error("Could not create resampler")]
    Resampler(#[from] ResamplerError),
}
assert_error_traits!(WavError);

/// Outcome of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WavReport {
    /// Input rate in Hz.
    pub from: SampleRate,
    /// Output rate in Hz.
    pub to: SampleRate,
    /// Channels in the input file.
    pub input_channels: u16,
    /// Channels in the output file.
    pub axes: AxisCount,
    /// Whole frames read.
    pub frames_read: u64,
    /// Frames written.
    pub frames_written: u64,
}

/// Resamples the WAV file at `input` to `to` Hz and writes it to `output`.
///
/// If the output file already exists it will be overwritten.
pub fn convert_wav_file(
    input: impl AsRef<Path>,
    output: impl AsRef<Path>,
    to: SampleRate,
) -> Result<WavReport, WavError> {
    let reader = File::open(input)
        .map_err(Arc::new)
        .map_err(WavError::OpenFile)?;
    let mut writer = File::create(output)
        .map_err(Arc::new)
        .map_err(WavError::OpenFile)?;
    convert_wav(BufReader::new(reader), &mut writer, to)
}

/// Resamples WAV data from `reader` to `to` Hz with the default configuration.
///
/// ```rust
/// use std::io::Cursor;
/// use accel_resample::math::nz;
///
/// let spec = hound::WavSpec {
///     channels: 3,
///     sample_rate: 100,
///     bits_per_sample: 16,
///     sample_format: hound::SampleFormat::Int,
/// };
/// let mut input = Cursor::new(Vec::new());
/// let mut writer = hound::WavWriter::new(&mut input, spec)?;
/// for _ in 0..1000 {
///     for sample in [0i16, 0, 256] {
///         writer.write_sample(sample)?;
///     }
/// }
/// writer.finalize()?;
/// input.set_position(0);
///
/// let mut output = Cursor::new(Vec::new());
/// let report = accel_resample::wav::convert_wav(input, &mut output, nz!(30))?;
/// assert_eq!(report.frames_read, 1000);
/// assert_eq!(report.frames_written, 300);
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub fn convert_wav(
    reader: impl Read,
    writer: &mut (impl Write + Seek),
    to: SampleRate,
) -> Result<WavReport, WavError> {
    convert_wav_with_config(reader, writer, to, ResamplerConfig::default())
}

/// Resamples WAV data from `reader` to `to` Hz.
pub fn convert_wav_with_config<N: Numeric>(
    reader: impl Read,
    writer: &mut (impl Write + Seek),
    to: SampleRate,
    config: ResamplerConfig<N>,
) -> Result<WavReport, WavError> {
    let mut reader = WavReader::new(reader)
        .map_err(Arc::new)
        .map_err(WavError::Read)?;
    let spec = reader.spec();
    let unsupported = WavError::UnsupportedFormat {
        bits: spec.bits_per_sample,
        channels: spec.channels,
        sample_rate: spec.sample_rate,
    };
    if spec.sample_format != SampleFormat::Int || spec.bits_per_sample != 16 {
        return Err(unsupported);
    }
    let (Some(from), Some(axes)) = (
        SampleRate::new(spec.sample_rate),
        AxisCount::new(spec.channels.min(MAX_AXES as u16)),
    ) else {
        return Err(unsupported);
    };

    let format = WavSpec {
        channels: axes.get(),
        sample_rate: to.get(),
        bits_per_sample: 16,
        sample_format: SampleFormat::Int,
    };

    let mut read_error = None;
    let mut frames_read = 0;
    let mut frames_written = 0;
    let mut writer = BufWriter::new(writer);
    {
        let mut samples = reader.samples::<i16>();
        let input = std::iter::from_fn(|| {
            next_frame(&mut samples, spec.channels as usize, &mut read_error)
        })
        .inspect(|_| frames_read += 1);
        let frames = ResampleFrames::with_config(input, from, to, axes, config)?;

        let mut writer = WavWriter::new(&mut writer, format)
            .map_err(Arc::new)
            .map_err(WavError::Write)?;
        for frame in frames {
            for &sample in &frame[..axes.get() as usize] {
                writer
                    .write_sample(sample)
                    .map_err(Arc::new)
                    .map_err(WavError::Write)?;
            }
            frames_written += 1;
        }
        writer
            .finalize()
            .map_err(Arc::new)
            .map_err(WavError::Write)?;
    }
    writer
        .flush()
        .map_err(Arc::new)
        .map_err(WavError::Flushing)?;

    if let Some(error) = read_error {
        return Err(WavError::Read(Arc::new(error)));
    }

    #[cfg(feature = "tracing")]
    tracing::debug!(frames_read, frames_written, "wav converted");

    Ok(WavReport {
        from,
        to,
        input_channels: spec.channels,
        axes,
        frames_read,
        frames_written,
    })
}

/// Reads one interleaved frame, keeping the first [`MAX_AXES`] channels. Stops on the
/// first read error, leaving it in `error`; a trailing partial frame is dropped.
fn next_frame<R: Read>(
    samples: &mut WavSamples<'_, R, i16>,
    channels: usize,
    error: &mut Option<hound::Error>,
) -> Option<Frame> {
    let mut frame = [0; MAX_AXES];
    for channel in 0..channels {
        match samples.next()? {
            Ok(sample) if channel < MAX_AXES => frame[channel] = sample,
            Ok(_) => {}
            Err(e) => {
                *error = Some(e);
                return None;
            }
        }
    }
    Some(frame)
}
