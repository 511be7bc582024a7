//! Published cut points, as thresholds on the mean of `|SVM - 1|` (in g) over a minute.
//!
//! Studies that report sums over a window are normalised by the number of samples the
//! study summed over.

/// Sum over 60 s at 80 Hz (Esliger et al., GENEA validation).
const ESLIGER: f64 = 60.0 * 80.0;
/// Sum over 1 s at 80 Hz (Phillips et al.).
const PHILLIPS: f64 = 80.0;
/// Sum over 1 s at 87.5 Hz (Roscoe et al.).
const ROSCOE: f64 = 87.5;
/// Sum over 15 s at 100 Hz (Dillon et al.).
const DILLON: f64 = 100.0 * 15.0;
/// Sum over 15 s at 30 Hz (Powell et al.).
const POWELL: f64 = 30.0 * 15.0;

/// Names of the levels for the usual three cut points.
pub const LEVEL_NAMES: [&str; 4] = ["Sedentary", "Light", "Moderate", "Vigorous"];

/// GENEA wrist.
pub const WRIST: &[f64] = &[386.0 / ESLIGER, 542.0 / ESLIGER, 1811.0 / ESLIGER];
/// Esliger, right wrist.
pub const WRIST_RIGHT: &[f64] = &[386.0 / ESLIGER, 440.0 / ESLIGER, 2099.0 / ESLIGER];
/// Esliger, left wrist.
pub const WRIST_LEFT: &[f64] = &[217.0 / ESLIGER, 645.0 / ESLIGER, 1811.0 / ESLIGER];
/// Esliger, waist.
pub const WAIST: &[f64] = &[77.0 / ESLIGER, 220.0 / ESLIGER, 2057.0 / ESLIGER];

/// Schaefer, non-dominant wrist, 6-11 years. Already a mean.
pub const SCHAEFER_WRIST_ND: &[f64] = &[0.190, 0.314, 0.998];

/// Phillips, right wrist, 8-14 years.
pub const PHILLIPS_WRIST_RIGHT: &[f64] = &[6.0 / PHILLIPS, 22.0 / PHILLIPS, 56.0 / PHILLIPS];
/// Phillips, left wrist, 8-14 years.
pub const PHILLIPS_WRIST_LEFT: &[f64] = &[7.0 / PHILLIPS, 20.0 / PHILLIPS, 60.0 / PHILLIPS];
/// Phillips, hip, 8-14 years.
pub const PHILLIPS_HIP: &[f64] = &[3.0 / PHILLIPS, 17.0 / PHILLIPS, 51.0 / PHILLIPS];

/// Roscoe, non-dominant wrist, 4-5 years. No vigorous level.
pub const ROSCOE_WRIST_ND: &[f64] = &[5.3 / ROSCOE, 8.6 / ROSCOE];
/// Roscoe, dominant wrist, 4-5 years. No vigorous level.
pub const ROSCOE_WRIST_D: &[f64] = &[8.1 / ROSCOE, 9.3 / ROSCOE];

/// Dillon, dominant wrist.
pub const DILLON_WRIST_D: &[f64] = &[191.8 / DILLON, 281.6 / DILLON, 595.0 / DILLON];
/// Dillon, non-dominant wrist.
pub const DILLON_WRIST_ND: &[f64] = &[158.5 / DILLON, 261.9 / DILLON, 495.0 / DILLON];

/// Powell, dominant wrist.
pub const POWELL_WRIST_D: &[f64] = &[51.0 / POWELL, 68.0 / POWELL, 142.0 / POWELL];
/// Powell, non-dominant wrist.
pub const POWELL_WRIST_ND: &[f64] = &[47.0 / POWELL, 64.0 / POWELL, 157.0 / POWELL];

const PRESETS: &[(&str, &[f64])] = &[
    ("wrist", WRIST),
    ("wristR", WRIST_RIGHT),
    ("wristL", WRIST_LEFT),
    ("waist", WAIST),
    ("schaefer-wristND", SCHAEFER_WRIST_ND),
    ("phillips-wristR", PHILLIPS_WRIST_RIGHT),
    ("phillips-wristL", PHILLIPS_WRIST_LEFT),
    ("phillips-hip", PHILLIPS_HIP),
    ("roscoe-wristND", ROSCOE_WRIST_ND),
    ("roscoe-wristD", ROSCOE_WRIST_D),
    ("dillon-wristD", DILLON_WRIST_D),
    ("dillon-wristND", DILLON_WRIST_ND),
    ("powell-wristD", POWELL_WRIST_D),
    ("powell-wristND", POWELL_WRIST_ND),
];

/// Looks up a preset by name, ignoring case (`"wrist"`, `"phillips-hip"`, ...).
pub fn preset(name: &str) -> Option<&'static [f64]> {
    PRESETS
        .iter()
        .find(|(preset, _)| preset.eq_ignore_ascii_case(name))
        .map(|&(_, cut_points)| cut_points)
}

/// Names accepted by [`preset`].
pub fn preset_names() -> impl Iterator<Item = &'static str> {
    PRESETS.iter().map(|&(name, _)| name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_are_positive_and_increasing() {
        for (name, cut_points) in PRESETS {
            assert!(cut_points[0] > 0.0, "{name}");
            assert!(cut_points.windows(2).all(|w| w[0] < w[1]), "{name}");
            assert!(cut_points.len() < LEVEL_NAMES.len(), "{name}");
        }
    }

    #[test]
    fn lookup_ignores_case() {
        assert_eq!(preset("WRIST"), Some(WRIST));
        assert_eq!(preset("Powell-WristND"), Some(POWELL_WRIST_ND));
        assert_eq!(preset("ankle"), None);
        assert_eq!(preset_names().count(), PRESETS.len());
    }
}
