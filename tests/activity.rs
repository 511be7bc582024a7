use std::f64::consts::PI;

use accel_resample::activity::{cut_points, ActivityConfig, EpochSummary};
use accel_resample::math::nz;
use accel_resample::Resampler;

use rstest::rstest;

mod test_support;
use test_support::{drain, stationary};

fn classify(sample_rate: f64, filter: bool, g: impl Iterator<Item = [f64; 3]>) -> Vec<EpochSummary> {
    let mut classifier = ActivityConfig::new(sample_rate, cut_points::WRIST)
        .filter(filter)
        .build()
        .unwrap();
    let mut summaries: Vec<_> = g.filter_map(|accel| classifier.add_value(accel, true)).collect();
    summaries.extend(classifier.finish());
    summaries
}

#[rstest]
fn gravity_alone_is_sedentary(#[values(0, 1, 2)] axis: usize, #[values(true, false)] filter: bool) {
    let mut accel = [0.0; 3];
    accel[axis] = -1.0;
    let summaries = classify(30.0, filter, std::iter::repeat_n(accel, 30 * 60 * 2));
    assert_eq!(summaries.len(), 2);
    assert!(summaries.iter().all(|s| s.minutes() == [1, 0, 0, 0]));
}

#[rstest]
#[case(false)]
#[cfg_attr(feature = "butterworth", case(true))]
fn vigorous_shaking(#[case] filter: bool) {
    // 1 g at 2 Hz on top of gravity
    let accel = (0..50 * 60).map(|n| {
        let t = n as f64 / 50.0;
        [0.0, 1.0 + (2.0 * PI * 2.0 * t).sin(), 0.0]
    });
    let summaries = classify(50.0, filter, accel);
    assert_eq!(summaries.len(), 1);
    let level = summaries[0].minutes().iter().position(|&m| m == 1).unwrap();
    assert_eq!(cut_points::LEVEL_NAMES[level], "Vigorous");
}

#[test]
fn resampled_recording_is_classified() {
    const COUNTS_PER_G: i16 = 256;
    // three minutes at 100 Hz
    let input = stationary(COUNTS_PER_G, 100 * 60 * 3);
    let mut resampler = Resampler::new(nz!(100), nz!(30), nz!(3)).unwrap();
    resampler.input(&input);
    let output = drain(&mut resampler, 300);
    assert_eq!(output.len(), 3 * 30 * 60 * 3);

    let accel = output
        .chunks_exact(3)
        .map(|frame| [frame[0], frame[1], frame[2]].map(|c| c as f64 / COUNTS_PER_G as f64));
    let summaries = classify(30.0, false, accel);
    assert_eq!(summaries.len(), 3);
    assert!(summaries.iter().all(|s| s.minutes() == [1, 0, 0, 0]));
}

#[test]
fn presets_are_found_by_name() {
    assert_eq!(cut_points::preset("WRIST"), Some(cut_points::WRIST));
    assert_eq!(cut_points::preset("phillips-hip"), Some(cut_points::PHILLIPS_HIP));
    assert_eq!(cut_points::preset("elbow"), None);
    for name in cut_points::preset_names() {
        let cut_points = cut_points::preset(name).unwrap();
        assert!(ActivityConfig::new(30.0, cut_points).filter(false).build().is_ok());
    }
}
