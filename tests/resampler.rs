use std::num::NonZero;
use std::thread;

use accel_resample::filter::{CoefficientTable, DefaultCoefficients, FixedPoint, Numeric};
use accel_resample::math::nz;
use accel_resample::{
    ResampleFrames, Resampler, ResamplerConfig, Sample, SampleRate, FloatingPoint, MAX_AXES,
};

use quickcheck::{quickcheck, TestResult};
use rstest::rstest;
use rstest_reuse::{self, *};

mod test_support;
use test_support::{amplitude, axis, constant, drain, resample_blocks, sine};

fn rate(hz: u32) -> SampleRate {
    SampleRate::new(hz).expect("rate is not zero")
}

fn axes(count: u16) -> NonZero<u16> {
    NonZero::new(count).expect("axis count is not zero")
}

/// Conversions covered by the built-in coefficient table.
#[template]
#[rstest]
#[case(100, 30)]
#[case(30, 100)]
#[case(100, 50)]
#[case(50, 30)]
#[case(30, 50)]
#[case(80, 30)]
#[case(100, 25)]
#[case(25, 100)]
#[case(400, 100)]
fn table_rates(#[case] from: u32, #[case] to: u32) {}

/// Pure or mostly downsampling conversions, where a constant input settles exactly.
#[template]
#[rstest]
#[case(100, 30)]
#[case(100, 50)]
#[case(80, 30)]
#[case(100, 25)]
#[case(400, 100)]
fn downsampling_rates(#[case] from: u32, #[case] to: u32) {}

#[apply(table_rates)]
fn table_rates_work_without_runtime_design(from: u32, to: u32) {
    let config = ResamplerConfig::new()
        .coefficients(DefaultCoefficients::table_only(CoefficientTable::builtin()));
    let resampler = Resampler::with_config(rate(from), rate(to), nz!(3), config).unwrap();
    assert_eq!(resampler.coefficient_count(), 5);
}

#[apply(downsampling_rates)]
fn constant_input_settles_to_itself(from: u32, to: u32) {
    let frame = [1000, -2500, 2000];
    let input = constant(&frame, 2000);
    check_constant(Resampler::new(rate(from), rate(to), nz!(3)).unwrap(), &input, &frame);

    let config = ResamplerConfig::new().numeric(FixedPoint::default());
    let fixed = Resampler::with_config(rate(from), rate(to), nz!(3), config).unwrap();
    check_constant(fixed, &input, &frame);
}

fn check_constant<'a, N: Numeric>(
    mut resampler: Resampler<'a, N>,
    input: &'a [Sample],
    frame: &[Sample],
) {
    resampler.input(input);
    let output = drain(&mut resampler, 128);
    for (n, got) in output.chunks(3).enumerate().skip(200) {
        for (a, b) in got.iter().zip(frame) {
            assert!((a - b).abs() <= 1, "frame {n}: {got:?} != {frame:?}");
        }
    }
}

#[cfg(feature = "butterworth")]
#[rstest]
#[case(1000, 10)]
#[case(1000, 30)]
#[case(400, 10)]
fn fixed_point_settles_at_low_cutoffs(#[case] from: u32, #[case] to: u32) {
    let frame = [1000, -2500, 2000];
    let input = constant(&frame, from as usize * 40);
    let config = ResamplerConfig::new().numeric(FixedPoint::default());
    let fixed = Resampler::with_config(rate(from), rate(to), nz!(3), config).unwrap();
    check_constant(fixed, &input, &frame);
}

#[rstest]
#[case(25, 100)]
#[case(30, 90)]
#[case(30, 80)]
#[cfg_attr(feature = "butterworth", case(10, 50))]
#[cfg_attr(feature = "butterworth", case(20, 100))]
fn upsampling_preserves_amplitude(#[case] from: u32, #[case] to: u32) {
    let input = sine(from, 1.0, 8000.0, from as usize * 12, 2);
    let mut resampler = Resampler::new(rate(from), rate(to), nz!(2)).unwrap();
    resampler.input(&input);
    let output = drain(&mut resampler, 1000);

    // five whole periods after two seconds of settling
    let to = to as usize;
    for channel in 0..2 {
        let steady = &axis(&output, 2, channel)[2 * to..7 * to];
        let ratio = amplitude(steady) / 8000.0;
        assert!((ratio - 1.0).abs() < 0.01, "axis {channel}: gain {ratio}");
    }
}

#[test]
fn long_runs_do_not_drift() {
    let input = sine(100, 0.7, 3000.0, 100_000, 1);
    let mut resampler = Resampler::new(nz!(100), nz!(30), nz!(1)).unwrap();
    let output = resample_blocks(&mut resampler, &input, 1000, 256);
    assert_eq!(output.len(), 30_000);
}

quickcheck! {
    fn frame_count_follows_ratio(frames: u16, pair: u8) -> TestResult {
        const PAIRS: [(u32, u32); 6] = [(100, 30), (30, 100), (50, 30), (80, 30), (100, 25), (30, 80)];
        let (from, to) = PAIRS[pair as usize % PAIRS.len()];
        let frames = frames as usize % 3000;
        let input = vec![0; frames];

        let mut resampler = Resampler::new(rate(from), rate(to), nz!(1)).unwrap();
        let produced = resample_blocks(&mut resampler, &input, 97, 13).len();
        let exact = frames as f64 * to as f64 / from as f64;
        TestResult::from_bool(exact.floor() as usize <= produced && produced <= exact.ceil() as usize)
    }
}

#[apply(table_rates)]
fn output_is_independent_of_chunking(from: u32, to: u32) {
    let input = sine(from, 3.0, 5000.0, 600, 3);
    let mut reference = Resampler::new(rate(from), rate(to), nz!(3)).unwrap();
    reference.input(&input);
    let expected = drain(&mut reference, 100_000);

    for (block, chunk) in [(600, 1), (1, 1), (7, 3), (64, 5)] {
        let mut resampler = Resampler::new(rate(from), rate(to), nz!(3)).unwrap();
        assert_eq!(
            resample_blocks(&mut resampler, &input, block, chunk),
            expected,
            "blocks of {block}, chunks of {chunk}"
        );
    }
}

#[test]
fn fixed_point_output_is_independent_of_chunking() {
    let input = sine(100, 2.0, 12000.0, 500, 3);
    let config = ResamplerConfig::new().numeric(FixedPoint::default());
    let mut reference = Resampler::with_config(nz!(100), nz!(30), nz!(3), config.clone()).unwrap();
    reference.input(&input);
    let expected = drain(&mut reference, 1000);

    let mut resampler = Resampler::with_config(nz!(100), nz!(30), nz!(3), config).unwrap();
    assert_eq!(resample_blocks(&mut resampler, &input, 3, 1), expected);
}

#[rstest]
fn equal_rates_reproduce_input(#[values(1, 2, 3)] count: u16, #[values(30, 100)] hz: u32) {
    let input = sine(hz, 4.0, 20000.0, 300, count as usize);
    let mut resampler = Resampler::new(rate(hz), rate(hz), axes(count)).unwrap();
    assert_eq!(resample_blocks(&mut resampler, &input, 50, 7), input);
}

#[test]
fn frame_adapter_matches_block_resampler() {
    let input = sine(50, 1.5, 7000.0, 400, MAX_AXES);
    let mut resampler = Resampler::new(nz!(50), nz!(30), nz!(3)).unwrap();
    resampler.input(&input);
    let expected = drain(&mut resampler, 64);

    let frames = input.chunks(3).map(|f| [f[0], f[1], f[2]]);
    let actual: Vec<Sample> = ResampleFrames::new(frames, nz!(50), nz!(30), nz!(3))
        .unwrap()
        .flatten()
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn independent_streams_on_separate_threads() {
    let input = sine(100, 2.0, 9000.0, 3000, 3);
    let mut resampler = Resampler::new(nz!(100), nz!(30), nz!(3)).unwrap();
    resampler.input(&input);
    let expected = drain(&mut resampler, 500);

    thread::scope(|scope| {
        let handles: Vec<_> = (1..=4)
            .map(|chunk| {
                let input = &input;
                scope.spawn(move || {
                    let mut resampler = Resampler::new(nz!(100), nz!(30), nz!(3)).unwrap();
                    resample_blocks(&mut resampler, input, 100 * chunk, chunk)
                })
            })
            .collect();
        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    });
}

#[test]
fn default_numeric_is_floating_point() {
    let resampler = Resampler::new(nz!(100), nz!(30), nz!(3)).unwrap();
    assert_eq!(*resampler.numeric(), FloatingPoint);
}
