//! HTTP API handlers for humcap-server

pub mod audio;
pub mod beat;
pub mod buildinfo;
pub mod health;
pub mod ui;
pub mod verify;

use axum::response::{IntoResponse, Response};
use std::any::Any;

use crate::error::ApiError;

pub use audio::audio_routes;
pub use beat::{random_beat, select_beat};
pub use buildinfo::get_build_info;
pub use health::health_routes;
pub use ui::ui_routes;
pub use verify::verify_recording;

/// Captcha routes (tune selection and verification)
pub fn captcha_routes() -> axum::Router<crate::AppState> {
    use axum::routing::{get, post};

    axum::Router::new()
        .route("/api/captcha/beat", get(random_beat).post(select_beat))
        .route("/api/captcha/verify", post(verify_recording))
        .route("/api/buildinfo", get(get_build_info))
}

/// Turn a handler panic into the generic 500 response
pub fn handle_panic(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .cloned()
        .or_else(|| panic.downcast_ref::<&str>().map(|s| s.to_string()))
        .unwrap_or_else(|| "unknown panic payload".to_string());

    ApiError::Internal(format!("handler panicked: {}", detail)).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::INTERNAL_ERROR_MESSAGE;
    use axum::{body::Body, http::Request, http::StatusCode, routing::get, Router};
    use http_body_util::BodyExt;
    use tower::ServiceExt;
    use tower_http::catch_panic::CatchPanicLayer;

    async fn body_text(response: Response) -> String {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        String::from_utf8(bytes.to_vec()).unwrap()
    }

    async fn exploding_handler() -> &'static str {
        panic!("tune table exploded at row 42")
    }

    #[tokio::test]
    async fn test_panicking_handler_returns_generic_500() {
        let app = Router::new()
            .route("/explode", get(exploding_handler))
            .layer(CatchPanicLayer::custom(handle_panic));

        let response = app
            .oneshot(Request::builder().uri("/explode").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let text = body_text(response).await;
        let json: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["message"], INTERNAL_ERROR_MESSAGE);
        assert!(!text.contains("exploded"));
    }

    #[tokio::test]
    async fn test_panic_payload_kinds() {
        let payloads: Vec<Box<dyn Any + Send + 'static>> = vec![
            Box::new(String::from("owned secret")),
            Box::new("static secret"),
            Box::new(42_u32),
        ];

        for payload in payloads {
            let response = handle_panic(payload);
            assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

            let text = body_text(response).await;
            assert!(text.contains(INTERNAL_ERROR_MESSAGE));
            assert!(!text.contains("secret"));
        }
    }
}
