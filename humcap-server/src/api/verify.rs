//! Recording verification endpoint
//!
//! Accepts a multipart upload with three fields:
//! - `recording`: the recorded audio bytes (only the size is inspected)
//! - `beatId`: id of the tune the user was asked to hum
//! - `actualDuration`: client-measured recording time in seconds
//!
//! The recording is streamed and only its length is kept. A body that runs
//! past the configured request limit is answered with the normal "too large"
//! verdict rather than an HTTP error.

use axum::{
    extract::{
        multipart::{MultipartError, MultipartRejection},
        Multipart,
    },
    http::StatusCode,
    Json,
};
use humcap_common::verification::{
    verify, AnalysisReport, RecordingSubmission, Rejection, VerificationResult,
};
use serde::Serialize;
use tracing::{debug, info};

use crate::error::{ApiError, ApiResult};

/// Verification response body
#[derive(Debug, Serialize)]
pub struct VerifyResponse {
    pub success: bool,
    /// Confidence rounded to two decimals
    pub confidence: f64,
    pub message: String,
    /// Detailed report; null when the recording was rejected before scoring
    pub analysis: Option<AnalysisReport>,
}

impl From<VerificationResult> for VerifyResponse {
    fn from(result: VerificationResult) -> Self {
        Self {
            success: result.success,
            confidence: round_hundredths(result.confidence),
            message: result.message,
            analysis: result.report,
        }
    }
}

#[derive(Debug, Default)]
struct VerifyForm {
    recording_size: Option<usize>,
    beat_id: Option<String>,
    actual_duration: Option<String>,
}

enum Upload {
    Form(VerifyForm),
    /// Request body exceeded the body limit while streaming
    TooLarge,
}

/// Length of the longest prefix of `s` that reads as a decimal number
/// (sign, digits, optional fraction, optional exponent)
fn numeric_prefix_len(s: &str) -> usize {
    let bytes = s.as_bytes();
    let digits_from = |mut i: usize| {
        while i < bytes.len() && bytes[i].is_ascii_digit() {
            i += 1;
        }
        i
    };

    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    let int_end = digits_from(end);
    let mut mantissa_end = int_end;
    let mut has_digits = int_end > end;
    if bytes.get(int_end) == Some(&b'.') {
        let frac_end = digits_from(int_end + 1);
        has_digits |= frac_end > int_end + 1;
        mantissa_end = frac_end;
    }
    if !has_digits {
        return 0;
    }

    if matches!(bytes.get(mantissa_end), Some(b'e') | Some(b'E')) {
        let mut exp = mantissa_end + 1;
        if matches!(bytes.get(exp), Some(b'+') | Some(b'-')) {
            exp += 1;
        }
        let exp_end = digits_from(exp);
        if exp_end > exp {
            return exp_end;
        }
    }
    mantissa_end
}

/// Parse `actualDuration` the way browsers parse a leading float
///
/// Leading whitespace is skipped and trailing text ignored (`"5.2s"` is 5.2).
/// `Infinity` with an optional sign is accepted. Anything without a leading
/// number counts as 0.
fn parse_duration(raw: Option<&str>) -> f64 {
    let Some(raw) = raw else {
        return 0.0;
    };
    let s = raw.trim_start();

    let (sign, unsigned) = match s.as_bytes().first() {
        Some(b'-') => (-1.0, &s[1..]),
        Some(b'+') => (1.0, &s[1..]),
        _ => (1.0, s),
    };
    if unsigned.starts_with("Infinity") {
        return sign * f64::INFINITY;
    }

    let len = numeric_prefix_len(s);
    s[..len].parse::<f64>().unwrap_or(0.0)
}

fn round_hundredths(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

async fn collect_fields(
    multipart: &mut Multipart,
    form: &mut VerifyForm,
) -> Result<(), MultipartError> {
    while let Some(mut field) = multipart.next_field().await? {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "recording" => {
                let mut size = 0usize;
                while let Some(chunk) = field.chunk().await? {
                    size += chunk.len();
                }
                form.recording_size = Some(size);
            }
            "beatId" => {
                let value = field.text().await?;
                form.beat_id = Some(value).filter(|v| !v.is_empty());
            }
            "actualDuration" => {
                form.actual_duration = Some(field.text().await?);
            }
            other => {
                debug!(field = other, "Ignoring unexpected form field");
            }
        }
    }
    Ok(())
}

async fn read_upload(mut multipart: Multipart) -> ApiResult<Upload> {
    let mut form = VerifyForm::default();
    match collect_fields(&mut multipart, &mut form).await {
        Ok(()) => Ok(Upload::Form(form)),
        Err(e) if e.status() == StatusCode::PAYLOAD_TOO_LARGE => Ok(Upload::TooLarge),
        Err(e) => Err(e.into()),
    }
}

/// POST /api/captcha/verify
#[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4()))]
pub async fn verify_recording(
    multipart: Result<Multipart, MultipartRejection>,
) -> ApiResult<Json<VerifyResponse>> {
    let form = match read_upload(multipart?).await? {
        Upload::Form(form) => form,
        Upload::TooLarge => {
            info!("Upload exceeded the request body limit");
            return Ok(Json(VerificationResult::rejected(Rejection::FileTooLarge).into()));
        }
    };

    let (size_bytes, beat_id) = match (form.recording_size, form.beat_id) {
        (Some(size), Some(id)) => (size, id),
        (None, _) => return Err(ApiError::MissingField("recording".to_string())),
        (_, None) => return Err(ApiError::MissingField("beatId".to_string())),
    };
    let duration = parse_duration(form.actual_duration.as_deref());

    let submission = RecordingSubmission::new(size_bytes, duration, beat_id);
    let result = verify(&submission);

    info!(
        beat_id = %submission.tune_id,
        size_bytes = submission.size_bytes,
        duration_secs = submission.claimed_duration_secs,
        success = result.success,
        confidence = result.confidence,
        "Verification complete"
    );

    Ok(Json(result.into()))
}
