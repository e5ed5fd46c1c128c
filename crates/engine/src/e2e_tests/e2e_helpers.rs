//! Router construction and request helpers for E2E tests.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;

use crate::api;
use crate::infrastructure::ds3231::{Ds3231, DEFAULT_ADDRESS};
use crate::infrastructure::network::NetworkIdentity;
use crate::infrastructure::ports::RtcTransport;
use crate::infrastructure::simulated::SimulatedDs3231;
use crate::App;

/// A router over a simulated clock, plus the shared app for direct access.
pub fn simulated_app() -> (Router, Arc<App>) {
    let rtc = Ds3231::new(SimulatedDs3231::new(DEFAULT_ADDRESS), DEFAULT_ADDRESS);
    app_with(Box::new(rtc))
}

pub fn app_with(transport: Box<dyn RtcTransport>) -> (Router, Arc<App>) {
    let app = Arc::new(App::new(transport, NetworkIdentity::new()));
    let router = api::http::routes().with_state(app.clone());
    (router, app)
}

/// Status and body text of a single request.
pub async fn send(router: &Router, request: Request<Body>) -> (StatusCode, String) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, String::from_utf8(bytes.to_vec()).unwrap())
}

pub async fn get(router: &Router, uri: &str) -> (StatusCode, String) {
    let request = Request::builder().uri(uri).body(Body::empty()).unwrap();
    send(router, request).await
}

pub async fn post_form(router: &Router, body: impl Into<Body>) -> (StatusCode, String) {
    let request = Request::builder()
        .method("POST")
        .uri("/api/set_time")
        .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
        .body(body.into())
        .unwrap();
    send(router, request).await
}

/// `GET /api/time` decoded into `(time, date)`.
pub async fn read_clock(router: &Router) -> (String, String) {
    let (status, body) = get(router, "/api/time").await;
    assert_eq!(status, StatusCode::OK, "body: {body}");
    let json: serde_json::Value = serde_json::from_str(&body).unwrap();
    (
        json["time"].as_str().unwrap().to_string(),
        json["date"].as_str().unwrap().to_string(),
    )
}
