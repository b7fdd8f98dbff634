//! End-to-end tests for the verification core
//!
//! Tests cover:
//! - Reference scenarios (on-target hum, tiny upload, overlong, unknown tune,
//!   length penalty boundary)
//! - Determinism of repeated verification
//! - Clamp ranges for every sub-score and for confidence
//! - Short-circuit precedence

use humcap_common::catalog;
use humcap_common::verification::scoring::{SCORE_CEILING, SCORE_FLOOR};
use humcap_common::verification::{
    analyze, check_upload_size, compose, verify, RecordingSubmission, Rejection,
    MAX_RECORDING_BYTES, PASS_THRESHOLD,
};

// =============================================================================
// Reference scenarios
// =============================================================================

#[test]
fn test_on_target_hum_passes() {
    let result = verify(&RecordingSubmission::new(30_000, 5.0, "row-boat"));

    let scores = result.breakdown.expect("scored result has a breakdown");
    assert_eq!(scores.duration_score, 0.95);
    assert_eq!(scores.quality_score, 0.90);
    assert!(result.success);
    assert!(result.confidence > PASS_THRESHOLD);
    assert!(result.message.starts_with("Excellent match!"));
}

#[test]
fn test_tiny_upload_rejected_before_scoring() {
    let result = verify(&RecordingSubmission::new(1000, 5.0, "row-boat"));

    assert!(!result.success);
    assert_eq!(result.confidence, 0.0);
    assert!(result.breakdown.is_none());
    assert!(result.report.is_none());
    assert!(result.message.contains("too small"));
}

#[test]
fn test_overlong_recording() {
    let result = verify(&RecordingSubmission::new(30_000, 25.0, "row-boat"));

    assert!(!result.success);
    assert_eq!(result.confidence, 0.1);
    assert!(result.message.contains("too long"));
    assert!(result.breakdown.is_none());
}

#[test]
fn test_unknown_tune() {
    let result = verify(&RecordingSubmission::new(30_000, 5.0, "unknown-tune"));

    assert!(!result.success);
    assert_eq!(result.confidence, 0.0);
    assert_eq!(result.message, "Unknown tune pattern.");
}

#[test]
fn test_length_penalty_boundary() {
    let tune = catalog::lookup("row-boat").unwrap();
    let at_boundary = 0.6 * tune.expected_duration_secs;

    let exact = verify(&RecordingSubmission::new(20_000, at_boundary, "row-boat"));
    let below = verify(&RecordingSubmission::new(20_000, at_boundary - 0.05, "row-boat"));

    let exact_pitch = exact.breakdown.unwrap().pitch_score;
    let below_pitch = below.breakdown.unwrap().pitch_score;

    // At exactly 60% only the lighter "< 80%" penalty applies
    assert!((exact_pitch - 0.71).abs() < 1e-9, "got {}", exact_pitch);
    assert!((exact_pitch - below_pitch - 0.20).abs() < 1e-9);
}

// =============================================================================
// Properties
// =============================================================================

#[test]
fn test_repeated_verification_is_bit_identical() {
    let submission = RecordingSubmission::new(14_321, 4.3, "mary-lamb");
    let first = verify(&submission);

    for _ in 0..20 {
        let again = verify(&submission);
        assert_eq!(first.confidence.to_bits(), again.confidence.to_bits());
        assert_eq!(first.breakdown, again.breakdown);
        assert_eq!(first.message, again.message);
    }
}

#[test]
fn test_scores_and_confidence_stay_in_range() {
    for tune in catalog::all() {
        for size in (1_500..=120_000).step_by(3_700) {
            for tenths in 0..=260 {
                let result = verify(&RecordingSubmission::new(size, tenths as f64 / 10.0, tune.id));

                match result.breakdown {
                    Some(s) => {
                        for value in [
                            s.pitch_score,
                            s.rhythm_score,
                            s.quality_score,
                            s.duration_score,
                            result.confidence,
                        ] {
                            assert!(value >= SCORE_FLOOR && value <= SCORE_CEILING);
                        }
                        assert_eq!(result.success, result.confidence > PASS_THRESHOLD);
                    }
                    None => {
                        assert!(!result.success);
                        assert!(result.confidence == 0.0 || result.confidence == 0.1);
                    }
                }
            }
        }
    }
}

#[test]
fn test_no_audio_always_zero_confidence() {
    for duration in [-1.0, 0.0, 1.0, 5.0, 30.0, f64::NAN] {
        for tune_id in ["row-boat", "unknown-tune", ""] {
            let result = compose(&analyze(1500, duration), catalog::lookup(tune_id));
            assert_eq!(result.confidence, 0.0);
            assert!(result.message.starts_with("No audio detected"));
        }
    }
}

#[test]
fn test_minimum_upload_has_no_audio() {
    // 1500 bytes passes the upload check but is not "audio"
    assert_eq!(check_upload_size(1500), None);
    let result = verify(&RecordingSubmission::new(1500, 5.0, "row-boat"));
    assert_eq!(result.confidence, 0.0);
    assert!(result.message.starts_with("No audio detected"));
}

#[test]
fn test_upload_size_limits() {
    assert_eq!(check_upload_size(1499), Some(Rejection::FileTooSmall));
    assert_eq!(check_upload_size(MAX_RECORDING_BYTES), None);
    assert_eq!(
        check_upload_size(MAX_RECORDING_BYTES + 1),
        Some(Rejection::FileTooLarge)
    );

    let result = verify(&RecordingSubmission::new(MAX_RECORDING_BYTES + 1, 5.0, "row-boat"));
    assert!(result.message.contains("too large"));
    assert_eq!(result.confidence, 0.0);
}

#[test]
fn test_short_recording() {
    let result = verify(&RecordingSubmission::new(10_000, 1.2, "row-boat"));
    assert_eq!(result.confidence, 0.1);
    assert!(result.message.contains("too short"));
}

#[test]
fn test_missing_duration_reads_as_too_short() {
    let result = verify(&RecordingSubmission::new(10_000, 0.0, "row-boat"));
    assert_eq!(result.confidence, 0.1);
    assert!(result.message.contains("too short"));
}

#[test]
fn test_infinite_durations_hit_the_duration_window() {
    let result = verify(&RecordingSubmission::new(30_000, f64::INFINITY, "row-boat"));
    assert_eq!(result.confidence, 0.1);
    assert!(result.message.contains("too long"));

    let result = verify(&RecordingSubmission::new(30_000, f64::NEG_INFINITY, "row-boat"));
    assert_eq!(result.confidence, 0.1);
    assert!(result.message.contains("too short"));
}
