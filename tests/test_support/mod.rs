#![allow(dead_code)]
// Lives in a folder so cargo does not build it as its own test target.

use std::f64::consts::PI;

use accel_resample::filter::Numeric;
use accel_resample::{Resampler, Sample};

/// `frames` copies of `frame`, interleaved.
pub fn constant(frame: &[Sample], frames: usize) -> Vec<Sample> {
    frame.repeat(frames)
}

/// A sine on every axis, each axis a quarter period behind the previous one.
pub fn sine(
    sample_rate: u32,
    frequency: f64,
    amplitude: f64,
    frames: usize,
    axes: usize,
) -> Vec<Sample> {
    (0..frames)
        .flat_map(|n| {
            let t = n as f64 / sample_rate as f64;
            (0..axes).map(move |axis| {
                let phase = 2.0 * PI * frequency * t - axis as f64 * PI / 2.0;
                (amplitude * phase.sin()).round() as Sample
            })
        })
        .collect()
}

/// A stationary device: gravity on one axis, `counts_per_g` per g.
pub fn stationary(counts_per_g: Sample, frames: usize) -> Vec<Sample> {
    constant(&[0, 0, counts_per_g], frames)
}

/// Pulls everything the attached input produces, `chunk` frames at a time.
pub fn drain<N: Numeric>(resampler: &mut Resampler<'_, N>, chunk: usize) -> Vec<Sample> {
    let axes = resampler.axes();
    let mut all = Vec::new();
    let mut buffer = vec![0; chunk * axes];
    loop {
        let pulled = resampler.output(&mut buffer);
        all.extend_from_slice(&buffer[..pulled.frames() * axes]);
        if pulled.needs_input() {
            return all;
        }
    }
}

/// Feeds `input` in blocks of `block` frames and drains after each.
pub fn resample_blocks<'a, N: Numeric>(
    resampler: &mut Resampler<'a, N>,
    input: &'a [Sample],
    block: usize,
    chunk: usize,
) -> Vec<Sample> {
    let axes = resampler.axes();
    let mut all = Vec::new();
    for samples in input.chunks(block * axes) {
        resampler.input(samples);
        all.extend(drain(resampler, chunk));
    }
    all
}

/// One axis of interleaved samples.
pub fn axis(samples: &[Sample], axes: usize, axis: usize) -> Vec<Sample> {
    samples.iter().skip(axis).step_by(axes).copied().collect()
}

/// Peak amplitude of a sine estimated from its RMS value.
pub fn amplitude(samples: &[Sample]) -> f64 {
    let power = samples.iter().map(|&s| (s as f64).powi(2)).sum::<f64>() / samples.len() as f64;
    (2.0 * power).sqrt()
}
