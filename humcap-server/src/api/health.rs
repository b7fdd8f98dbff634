//! Liveness probe

use axum::{routing::get, Json, Router};
use humcap_common::catalog;
use humcap_common::verification::PASS_THRESHOLD;
use serde::Serialize;

use crate::AppState;

const MODULE_NAME: &str = "humcap-server";

/// Liveness report; also echoes the catalog size and the pass mark so
/// operators can tell which scoring build is deployed
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthReport {
    pub status: &'static str,
    pub module: &'static str,
    pub version: &'static str,
    pub tune_count: usize,
    pub pass_threshold: f64,
}

/// GET /health
pub async fn health_check() -> Json<HealthReport> {
    Json(HealthReport {
        status: "ok",
        module: MODULE_NAME,
        version: env!("CARGO_PKG_VERSION"),
        tune_count: catalog::all().len(),
        pass_threshold: PASS_THRESHOLD,
    })
}

pub fn health_routes() -> Router<AppState> {
    Router::new().route("/health", get(health_check))
}
