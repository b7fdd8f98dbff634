//! Verdict composer
//!
//! Combines the sub-scores into a single confidence value, decides pass/fail
//! and writes the message shown to the user. Pre-checks on the analysis run
//! first and short-circuit scoring entirely.

use super::analyzer::{QualityLabel, RecordingAnalysis};
use super::scoring::{self, ScoreBreakdown, SCORE_CEILING, SCORE_FLOOR};
use super::{Rejection, VerificationResult};
use crate::catalog::Tune;
use serde::Serialize;

/// Confidence must be strictly greater than this to pass
pub const PASS_THRESHOLD: f64 = 0.58;

/// Shortest accepted recording in seconds
pub const MIN_DURATION_SECS: f64 = 1.5;

/// Longest accepted recording in seconds
pub const MAX_DURATION_SECS: f64 = 20.0;

const PITCH_WEIGHT: f64 = 0.4;
const RHYTHM_WEIGHT: f64 = 0.35;
const QUALITY_WEIGHT: f64 = 0.15;
const DURATION_WEIGHT: f64 = 0.1;

/// Which sub-score a message refers to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dimension {
    Pitch,
    Rhythm,
    Quality,
    Duration,
}

/// Per-request report returned to the client alongside the verdict
///
/// Scores are whole percentages; durations are rounded to a tenth of a
/// second.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalysisReport {
    pub pitch_accuracy: u32,
    pub rhythm_accuracy: u32,
    pub quality_score: u32,
    pub duration_score: u32,
    pub overall_realism: u32,
    pub recording_size: usize,
    pub recording_duration: f64,
    pub expected_duration: f64,
    pub size_per_second: u64,
    pub complexity: f64,
    pub quality: QualityLabel,
    pub duration_difference: f64,
}

fn percent(value: f64) -> u32 {
    (value * 100.0).round() as u32
}

fn round_tenths(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

/// Weighted confidence, clamped to `[SCORE_FLOOR, SCORE_CEILING]`
pub fn confidence(scores: &ScoreBreakdown) -> f64 {
    let weighted = scores.pitch_score * PITCH_WEIGHT
        + scores.rhythm_score * RHYTHM_WEIGHT
        + scores.quality_score * QUALITY_WEIGHT
        + scores.duration_score * DURATION_WEIGHT;
    weighted.clamp(SCORE_FLOOR, SCORE_CEILING)
}

/// Lowest sub-score; ties go to the earlier of pitch, rhythm, quality, duration
pub fn weakest(scores: &ScoreBreakdown) -> Dimension {
    let candidates = [
        (Dimension::Rhythm, scores.rhythm_score),
        (Dimension::Quality, scores.quality_score),
        (Dimension::Duration, scores.duration_score),
    ];

    candidates
        .into_iter()
        .fold((Dimension::Pitch, scores.pitch_score), |min, current| {
            if current.1 < min.1 {
                current
            } else {
                min
            }
        })
        .0
}

/// Short-circuit checks that bypass scoring, in precedence order
pub fn precheck(analysis: &RecordingAnalysis, tune: Option<&Tune>) -> Option<Rejection> {
    if !analysis.has_audio {
        return Some(Rejection::NoAudio);
    }
    if analysis.duration_secs < MIN_DURATION_SECS {
        return Some(Rejection::TooShort);
    }
    if analysis.duration_secs > MAX_DURATION_SECS {
        return Some(Rejection::TooLong);
    }
    if tune.is_none() {
        return Some(Rejection::UnknownTune);
    }
    None
}

fn build_report(analysis: &RecordingAnalysis, tune: &Tune, scores: &ScoreBreakdown) -> AnalysisReport {
    let expected = tune.expected_duration_secs;
    AnalysisReport {
        pitch_accuracy: percent(scores.pitch_score),
        rhythm_accuracy: percent(scores.rhythm_score),
        quality_score: percent(scores.quality_score),
        duration_score: percent(scores.duration_score),
        overall_realism: percent(scores.overall_realism),
        recording_size: analysis.size_bytes,
        recording_duration: round_tenths(analysis.duration_secs),
        expected_duration: expected,
        size_per_second: analysis.size_per_second.round() as u64,
        complexity: round_tenths(analysis.complexity),
        quality: analysis.quality,
        duration_difference: round_tenths((analysis.duration_secs - expected).abs()),
    }
}

fn failure_message(report: &AnalysisReport, scores: &ScoreBreakdown, confidence: f64) -> String {
    let detail = match weakest(scores) {
        Dimension::Pitch => format!(
            "Pitch accuracy insufficient ({}%). Try to match the exact melody notes more closely.",
            report.pitch_accuracy
        ),
        Dimension::Rhythm => format!(
            "Rhythm accuracy needs improvement ({}%). Focus on matching the timing and beat pattern.",
            report.rhythm_accuracy
        ),
        Dimension::Quality => format!(
            "Recording quality too low ({}%). Hum louder and clearer into your microphone.",
            report.quality_score
        ),
        Dimension::Duration => format!(
            "Duration mismatch ({}%). Expected ~{}s, got {}s ({}s difference).",
            report.duration_score,
            report.expected_duration,
            report.recording_duration,
            report.duration_difference
        ),
    };

    format!("{} Overall: {}% match.", detail, percent(confidence))
}

fn success_message(report: &AnalysisReport, confidence: f64) -> String {
    format!(
        "Excellent match! Pitch: {}%, Rhythm: {}%, Quality: {}%, Duration: {}% ({}% overall).",
        report.pitch_accuracy,
        report.rhythm_accuracy,
        report.quality_score,
        report.duration_score,
        percent(confidence)
    )
}

/// Produce the verdict for an analyzed recording
///
/// `tune` is the catalog entry the client claimed to hum, or `None` when the
/// id was not found.
pub fn compose(analysis: &RecordingAnalysis, tune: Option<&Tune>) -> VerificationResult {
    let tune = match (precheck(analysis, tune), tune) {
        (Some(rejection), _) => return VerificationResult::rejected(rejection),
        (None, Some(tune)) => tune,
        (None, None) => return VerificationResult::rejected(Rejection::UnknownTune),
    };

    let scores = scoring::score(analysis, tune);
    let confidence = confidence(&scores);
    let success = confidence > PASS_THRESHOLD;
    let report = build_report(analysis, tune, &scores);

    let message = if success {
        success_message(&report, confidence)
    } else {
        failure_message(&report, &scores, confidence)
    };

    VerificationResult {
        success,
        confidence,
        message,
        breakdown: Some(scores),
        report: Some(report),
    }
}
