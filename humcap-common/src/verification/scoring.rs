//! Scoring engine
//!
//! Turns a [`RecordingAnalysis`] and the target [`Tune`] into four
//! independent sub-scores. Every score comes from the ordered rule tables
//! below; there are no continuous curves.
//!
//! # Naming
//! "Pitch" and "rhythm" are proxies. No frequency or timing information is
//! extracted from the audio. Both scores are derived from recording size and
//! duration only, exactly like the other two.
//!
//! # Sub-scores
//! - **Duration**: deviation of `duration / expected` from 1
//! - **Quality**: raw upload size
//! - **Rhythm**: `0.7 × duration` adjusted by complexity and by how the
//!   upload size compares to `expected × 4000` bytes
//! - **Pitch**: `0.6 × quality + 0.3 × duration` adjusted by bytes per
//!   second and penalized for humming much shorter or longer than expected
//!
//! Rhythm and pitch are clamped to `[0.05, 0.95]`. Duration and quality
//! tables only produce values inside that range.

use super::analyzer::RecordingAnalysis;
use super::rules::{Cond, Rule, RuleTable};
use crate::catalog::Tune;
use serde::Serialize;

/// Lowest value any sub-score can take
pub const SCORE_FLOOR: f64 = 0.05;

/// Highest value any sub-score can take
pub const SCORE_CEILING: f64 = 0.95;

/// Bytes per second of expected duration considered a "normal" recording
const EXPECTED_BYTES_PER_SECOND: f64 = 4000.0;

/// Duration match, keyed on `|duration / expected - 1|`
pub const DURATION_BANDS: RuleTable = RuleTable::new(
    &[
        Rule::new(Cond::Below(0.15), 0.95),
        Rule::new(Cond::Below(0.25), 0.85),
        Rule::new(Cond::Below(0.40), 0.75),
        Rule::new(Cond::Below(0.60), 0.60),
        Rule::new(Cond::Below(0.80), 0.40),
    ],
    0.20,
);

/// Recording quality, keyed on upload size in bytes
pub const QUALITY_BANDS: RuleTable = RuleTable::new(
    &[
        Rule::new(Cond::Above(25_000.0), 0.90),
        Rule::new(Cond::Above(18_000.0), 0.80),
        Rule::new(Cond::Above(12_000.0), 0.75),
        Rule::new(Cond::Above(8_000.0), 0.65),
        Rule::new(Cond::Above(4_000.0), 0.50),
        Rule::new(Cond::Above(2_000.0), 0.35),
    ],
    0.15,
);

/// Rhythm adjustment, keyed on complexity
pub const COMPLEXITY_ADJUSTMENTS: RuleTable = RuleTable::new(
    &[
        Rule::new(Cond::Within(2.0, 4.0), 0.25),
        Rule::new(Cond::Within(1.5, 4.5), 0.15),
        Rule::new(Cond::Below(1.0), -0.10),
        Rule::new(Cond::Above(5.5), -0.15),
    ],
    0.0,
);

/// Rhythm adjustment, keyed on `size / (expected × 4000)`
pub const SIZE_CONSISTENCY_ADJUSTMENTS: RuleTable = RuleTable::new(
    &[
        Rule::new(Cond::Within(0.7, 1.3), 0.10),
        Rule::new(Cond::Within(0.5, 1.8), 0.05),
        Rule::new(Cond::Outside(0.3, 2.5), -0.10),
    ],
    0.0,
);

/// Pitch adjustment, keyed on bytes per second
pub const DENSITY_ADJUSTMENTS: RuleTable = RuleTable::new(
    &[
        Rule::new(Cond::Within(3_500.0, 10_000.0), 0.25),
        Rule::new(Cond::Within(2_500.0, 12_000.0), 0.15),
        Rule::new(Cond::Below(1_500.0), -0.20),
        Rule::new(Cond::Above(18_000.0), -0.10),
    ],
    0.0,
);

/// Pitch penalty, keyed on raw duration with bounds scaled by the expected
/// duration
pub const LENGTH_PENALTIES: RuleTable = RuleTable::new(
    &[
        Rule::new(Cond::Below(0.6), -0.40),
        Rule::new(Cond::Below(0.8), -0.20),
        Rule::new(Cond::Above(1.5), -0.20),
        Rule::new(Cond::Above(1.3), -0.10),
    ],
    0.0,
);

/// The four sub-scores plus their unweighted mean
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub pitch_score: f64,
    pub rhythm_score: f64,
    pub quality_score: f64,
    pub duration_score: f64,
    pub overall_realism: f64,
}

/// Clamp a sub-score into `[SCORE_FLOOR, SCORE_CEILING]`
pub fn clamp_score(value: f64) -> f64 {
    value.clamp(SCORE_FLOOR, SCORE_CEILING)
}

/// Duration match sub-score
pub fn duration_score(duration_secs: f64, expected_secs: f64) -> f64 {
    let deviation = (duration_secs / expected_secs - 1.0).abs();
    clamp_score(DURATION_BANDS.eval(deviation))
}

/// Quality sub-score
pub fn quality_score(size_bytes: usize) -> f64 {
    clamp_score(QUALITY_BANDS.eval(size_bytes as f64))
}

/// Rhythm proxy sub-score
pub fn rhythm_score(analysis: &RecordingAnalysis, expected_secs: f64, duration_match: f64) -> f64 {
    let size_ratio = analysis.size_bytes as f64 / (expected_secs * EXPECTED_BYTES_PER_SECOND);

    let mut score = duration_match * 0.7;
    score += COMPLEXITY_ADJUSTMENTS.eval(analysis.complexity);
    score += SIZE_CONSISTENCY_ADJUSTMENTS.eval(size_ratio);
    clamp_score(score)
}

/// Pitch proxy sub-score
pub fn pitch_score(
    analysis: &RecordingAnalysis,
    expected_secs: f64,
    quality: f64,
    duration_match: f64,
) -> f64 {
    let mut score = quality * 0.6 + duration_match * 0.3;
    score += DENSITY_ADJUSTMENTS.eval(analysis.size_per_second);
    score += LENGTH_PENALTIES.eval_scaled(analysis.duration_secs, expected_secs);
    clamp_score(score)
}

/// Score a recording against its target tune
pub fn score(analysis: &RecordingAnalysis, tune: &Tune) -> ScoreBreakdown {
    let expected = tune.expected_duration_secs;

    let duration = duration_score(analysis.duration_secs, expected);
    let quality = quality_score(analysis.size_bytes);
    let rhythm = rhythm_score(analysis, expected, duration);
    let pitch = pitch_score(analysis, expected, quality, duration);

    ScoreBreakdown {
        pitch_score: pitch,
        rhythm_score: rhythm,
        quality_score: quality,
        duration_score: duration,
        overall_realism: (pitch + rhythm + quality + duration) / 4.0,
    }
}
