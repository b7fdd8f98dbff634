//! Verification core
//!
//! Pure, deterministic pipeline deciding whether an uploaded hum matches the
//! requested tune:
//!
//! ```text
//! RecordingSubmission ─▶ upload size check ─▶ analyzer ─▶ verdict pre-checks
//!                                                      └▶ scoring ─▶ verdict
//! ```
//!
//! Nothing here logs, allocates shared state or performs I/O. Identical
//! inputs always produce bit-identical results, so any number of requests can
//! be verified concurrently without coordination.
//!
//! # Example
//! ```
//! use humcap_common::verification::{verify, RecordingSubmission};
//!
//! let result = verify(&RecordingSubmission::new(30_000, 5.0, "row-boat"));
//! assert!(result.success);
//! assert!(result.confidence > 0.58);
//! ```

pub mod analyzer;
pub mod rules;
pub mod scoring;
pub mod verdict;

use crate::catalog;

pub use analyzer::{analyze, QualityLabel, RecordingAnalysis};
pub use scoring::{score, ScoreBreakdown};
pub use verdict::{compose, AnalysisReport, PASS_THRESHOLD};

/// Smallest upload the verification endpoint accepts
pub const MIN_RECORDING_BYTES: usize = 1500;

/// Largest upload the verification endpoint accepts
pub const MAX_RECORDING_BYTES: usize = 5_000_000;

/// One verification attempt as received from a client
#[derive(Debug, Clone, PartialEq)]
pub struct RecordingSubmission {
    pub size_bytes: usize,
    /// Elapsed recording time measured by the client
    pub claimed_duration_secs: f64,
    pub tune_id: String,
}

impl RecordingSubmission {
    pub fn new(size_bytes: usize, claimed_duration_secs: f64, tune_id: impl Into<String>) -> Self {
        Self {
            size_bytes,
            claimed_duration_secs,
            tune_id: tune_id.into(),
        }
    }
}

/// Expected ways a submission can fail without being scored
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Rejection {
    /// Upload below [`MIN_RECORDING_BYTES`]
    FileTooSmall,
    /// Upload above [`MAX_RECORDING_BYTES`]
    FileTooLarge,
    /// Recording too small to contain audio
    NoAudio,
    /// Claimed duration under the minimum
    TooShort,
    /// Claimed duration over the maximum
    TooLong,
    /// Tune id not in the catalog
    UnknownTune,
}

impl Rejection {
    /// Fixed confidence reported for this rejection
    pub fn confidence(self) -> f64 {
        match self {
            Rejection::TooShort | Rejection::TooLong => 0.1,
            Rejection::FileTooSmall
            | Rejection::FileTooLarge
            | Rejection::NoAudio
            | Rejection::UnknownTune => 0.0,
        }
    }

    /// User-facing explanation
    pub fn message(self) -> &'static str {
        match self {
            Rejection::FileTooSmall => "Recording file too small. Please hum louder and longer.",
            Rejection::FileTooLarge => {
                "Recording file too large. Please keep recordings under 20 seconds."
            }
            Rejection::NoAudio => {
                "No audio detected. Please ensure your microphone is working and try again."
            }
            Rejection::TooShort => "Recording too short. Please hum the complete tune.",
            Rejection::TooLong => "Recording too long. Please hum just the main melody.",
            Rejection::UnknownTune => "Unknown tune pattern.",
        }
    }
}

/// Outcome of a verification attempt
#[derive(Debug, Clone, PartialEq)]
pub struct VerificationResult {
    pub success: bool,
    /// Confidence in `[0, 1]`
    pub confidence: f64,
    pub message: String,
    /// Raw sub-scores; `None` when the submission was rejected before scoring
    pub breakdown: Option<ScoreBreakdown>,
    /// Rounded report for clients; present whenever `breakdown` is
    pub report: Option<AnalysisReport>,
}

impl VerificationResult {
    /// Failed result for a submission that was never scored
    pub fn rejected(rejection: Rejection) -> Self {
        Self {
            success: false,
            confidence: rejection.confidence(),
            message: rejection.message().to_string(),
            breakdown: None,
            report: None,
        }
    }
}

/// Check an upload's byte size against the accepted range
pub fn check_upload_size(size_bytes: usize) -> Option<Rejection> {
    if size_bytes < MIN_RECORDING_BYTES {
        Some(Rejection::FileTooSmall)
    } else if size_bytes > MAX_RECORDING_BYTES {
        Some(Rejection::FileTooLarge)
    } else {
        None
    }
}

/// Verify a submission end to end
pub fn verify(submission: &RecordingSubmission) -> VerificationResult {
    if let Some(rejection) = check_upload_size(submission.size_bytes) {
        return VerificationResult::rejected(rejection);
    }

    let analysis = analyze(submission.size_bytes, submission.claimed_duration_secs);
    compose(&analysis, catalog::lookup(&submission.tune_id))
}
