//! Audio endpoints
//!
//! `/api/audio/{id}.wav` synthesizes the catalog tune `id` as a mono WAV.
//! A few legacy rhythm names answer with a JSON beat pattern instead, which
//! the browser client plays through the Web Audio API.

use axum::{
    extract::Path,
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use humcap_common::catalog;
use serde::Serialize;
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tracing::debug;

use crate::error::ApiResult;
use crate::synth;
use crate::AppState;

/// One drum sound in a rhythm pattern
#[derive(Debug, Clone, Copy, Serialize)]
pub struct PatternSound {
    /// Offset within the beat, in beats
    pub time: f64,
    /// Frequency in Hz
    pub freq: f64,
    /// Length in seconds
    pub duration: f64,
}

/// Beat pattern description returned instead of audio
#[derive(Debug, Clone, Copy, Serialize)]
pub struct RhythmPattern {
    #[serde(rename = "type")]
    pub kind: &'static str,
    pub pattern: &'static str,
    pub bpm: u32,
    pub sounds: &'static [PatternSound],
}

const fn sound(time: f64, freq: f64, duration: f64) -> PatternSound {
    PatternSound {
        time,
        freq,
        duration,
    }
}

static RHYTHM_PATTERNS: [(&str, RhythmPattern); 3] = [
    (
        "simple-4-4.wav",
        RhythmPattern {
            kind: "pattern",
            pattern: "x...x...x...x...",
            bpm: 120,
            sounds: &[sound(0.0, 80.0, 0.1), sound(1.0, 80.0, 0.1)],
        },
    ),
    (
        "waltz.wav",
        RhythmPattern {
            kind: "pattern",
            pattern: "x..x..x..",
            bpm: 150,
            sounds: &[sound(0.0, 100.0, 0.1), sound(0.8, 100.0, 0.1)],
        },
    ),
    (
        "shuffle.wav",
        RhythmPattern {
            kind: "pattern",
            pattern: "x.x.x.x.",
            bpm: 130,
            sounds: &[sound(0.0, 90.0, 0.1), sound(0.4, 90.0, 0.1)],
        },
    ),
];

/// Look up a legacy rhythm pattern by file name
pub fn rhythm_pattern(filename: &str) -> Option<&'static RhythmPattern> {
    RHYTHM_PATTERNS
        .iter()
        .find(|(name, _)| *name == filename)
        .map(|(_, pattern)| pattern)
}

fn wav_response(bytes: Vec<u8>, cache_control: &'static str) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "audio/wav"),
            (header::CACHE_CONTROL, cache_control),
        ],
        bytes,
    )
        .into_response()
}

/// GET /api/audio/:filename
pub async fn serve_audio(Path(filename): Path<String>) -> ApiResult<Response> {
    if let Some(pattern) = rhythm_pattern(&filename) {
        debug!(file = %filename, "Serving rhythm pattern");
        return Ok(Json(pattern).into_response());
    }

    let tune = filename
        .strip_suffix(".wav")
        .and_then(catalog::lookup);

    match tune {
        Some(tune) => {
            debug!(tune = tune.id, "Synthesizing tune audio");
            let bytes = synth::render_tune(tune)?;
            Ok(wav_response(bytes, "public, max-age=3600"))
        }
        None => {
            debug!(file = %filename, "Audio file not found");
            Ok((
                StatusCode::NOT_FOUND,
                Json(json!({
                    "error": "Audio file not found",
                    "suggestion": "use_web_audio_api",
                })),
            )
                .into_response())
        }
    }
}

/// OPTIONS /api/audio/:filename
pub async fn audio_preflight() -> StatusCode {
    StatusCode::OK
}

/// GET /api/test-audio
///
/// Fixed 440 Hz tone for checking speaker output.
pub async fn serve_test_audio() -> ApiResult<Response> {
    let bytes = synth::render_test_tone()?;
    Ok(wav_response(bytes, "no-cache"))
}

/// Build audio routes
pub fn audio_routes() -> Router<AppState> {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([axum::http::Method::GET, axum::http::Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE]);

    Router::new()
        .route(
            "/api/audio/:filename",
            get(serve_audio).options(audio_preflight),
        )
        .route("/api/test-audio", get(serve_test_audio))
        .layer(cors)
}
