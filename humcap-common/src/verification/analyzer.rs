//! Recording analyzer
//!
//! Derives coarse metrics from the only two facts the server knows about a
//! recording: how many bytes were uploaded and how long the client says it
//! recorded for. The audio itself is never decoded.

use serde::Serialize;

/// Smallest upload treated as containing any audio at all
pub const HAS_AUDIO_MIN_BYTES: usize = 1500;

/// Coarse quality label reported alongside the scores
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum QualityLabel {
    Excellent,
    Good,
    Fair,
    Poor,
}

impl QualityLabel {
    fn from_size(size_bytes: usize) -> Self {
        if size_bytes > 25_000 {
            QualityLabel::Excellent
        } else if size_bytes > 15_000 {
            QualityLabel::Good
        } else if size_bytes > 8_000 {
            QualityLabel::Fair
        } else {
            QualityLabel::Poor
        }
    }
}

/// Metrics derived from a recording's size and duration
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RecordingAnalysis {
    pub size_bytes: usize,
    /// Client-reported duration in seconds (NaN becomes 0)
    pub duration_secs: f64,
    pub has_audio: bool,
    /// `size / max(1, duration)`
    pub size_per_second: f64,
    /// `ln(size) / ln(max(1, duration) + 1)`
    pub complexity: f64,
    pub quality: QualityLabel,
}

/// Analyze an upload of `size_bytes` claimed to last `duration_secs`
pub fn analyze(size_bytes: usize, duration_secs: f64) -> RecordingAnalysis {
    let duration_secs = if duration_secs.is_nan() {
        0.0
    } else {
        duration_secs
    };
    let floored = duration_secs.max(1.0);
    let size = size_bytes as f64;

    RecordingAnalysis {
        size_bytes,
        duration_secs,
        has_audio: size_bytes > HAS_AUDIO_MIN_BYTES,
        size_per_second: size / floored,
        complexity: size.max(1.0).ln() / (floored + 1.0).ln(),
        quality: QualityLabel::from_size(size_bytes),
    }
}
