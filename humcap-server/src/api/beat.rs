//! Tune selection endpoints

use axum::{body::Bytes, Json};
use humcap_common::catalog::{self, Tune};
use serde::Deserialize;
use tracing::{debug, warn};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BeatRequest {
    beat_id: Option<String>,
}

/// GET /api/captcha/beat
///
/// Picks a tune uniformly at random.
pub async fn random_beat() -> Json<&'static Tune> {
    let tune = catalog::random();
    debug!(tune = tune.id, "Serving random tune");
    Json(tune)
}

/// POST /api/captcha/beat
///
/// Body `{"beatId": "..."}` selects a specific tune. A missing or unknown id
/// falls back to a random tune; a body that is empty or not valid JSON falls
/// back to the first catalog entry.
pub async fn select_beat(body: Bytes) -> Json<&'static Tune> {
    let request = match serde_json::from_slice::<BeatRequest>(&body) {
        Ok(request) => request,
        Err(e) => {
            warn!(error = %e, "Malformed tune request, using default tune");
            return Json(catalog::default_tune());
        }
    };

    let tune = request
        .beat_id
        .as_deref()
        .and_then(catalog::lookup)
        .unwrap_or_else(catalog::random);

    debug!(requested = ?request.beat_id, tune = tune.id, "Serving selected tune");
    Json(tune)
}
