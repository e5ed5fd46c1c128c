//! HTTP routes.

use axum::{
    body::Body,
    extract::State,
    response::Html,
    routing::{get, post},
    Json, Router,
};
use std::sync::Arc;

use rtcbridge_shared::{parse_set_time_form, FormError, TimeResponse, MAX_FORM_BODY_BYTES};

use crate::app::App;
use crate::infrastructure::ports::TransportError;
use crate::use_cases::ClockError;

/// Control page; `{{ip}}` is replaced with the current network address.
const INDEX_TEMPLATE: &str = include_str!("index.html");

pub const SET_TIME_OK: &str = "Time set successfully!";

/// Create all HTTP routes.
pub fn routes() -> Router<Arc<App>> {
    Router::new()
        .route("/", get(index))
        .route("/api/health", get(health))
        .route("/api/time", get(get_time))
        .route("/api/set_time", post(set_time))
}

async fn health() -> &'static str {
    "OK"
}

async fn index(State(app): State<Arc<App>>) -> Html<String> {
    let address = app.network.current().await;
    Html(render_index(&address))
}

fn render_index(address: &str) -> String {
    INDEX_TEMPLATE.replace("{{ip}}", &escape_html(address))
}

fn escape_html(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

async fn get_time(State(app): State<Arc<App>>) -> Result<Json<TimeResponse>, ApiError> {
    let time = app
        .clock
        .get_time()
        .await
        .map_err(|e| ApiError::from_clock("I2C read failed", e))?;
    Ok(Json(TimeResponse::from(&time)))
}

async fn set_time(State(app): State<Arc<App>>, body: Body) -> Result<&'static str, ApiError> {
    // Bounded read: anything past the limit is rejected, never buffered
    let bytes = axum::body::to_bytes(body, MAX_FORM_BODY_BYTES)
        .await
        .map_err(|_| ApiError::BadRequest("Invalid body size".to_string()))?;

    let fields = parse_set_time_form(&bytes)?;

    app.clock
        .set_time(fields)
        .await
        .map_err(|e| ApiError::from_clock("I2C write failed", e))?;

    Ok(SET_TIME_OK)
}

#[derive(Debug)]
pub enum ApiError {
    BadRequest(String),
    /// The clock could not be reached. `context` is sent to the client.
    Device {
        context: &'static str,
        source: TransportError,
    },
}

impl ApiError {
    fn from_clock(context: &'static str, err: ClockError) -> Self {
        match err {
            ClockError::Validation(e) => ApiError::BadRequest(format!("Invalid time fields: {e}")),
            ClockError::Transport(source) => ApiError::Device { context, source },
        }
    }
}

impl From<FormError> for ApiError {
    fn from(e: FormError) -> Self {
        match e {
            FormError::BodySize(_) => ApiError::BadRequest("Invalid body size".to_string()),
            FormError::MissingField(_) => ApiError::BadRequest(format!("Invalid time fields: {e}")),
        }
    }
}

impl axum::response::IntoResponse for ApiError {
    fn into_response(self) -> axum::response::Response {
        match self {
            ApiError::BadRequest(msg) => {
                (axum::http::StatusCode::BAD_REQUEST, msg).into_response()
            }
            ApiError::Device { context, source } => {
                tracing::error!(error = %source, "{}", context);
                (axum::http::StatusCode::INTERNAL_SERVER_ERROR, context).into_response()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_index_substitutes_address() {
        let page = render_index("10.0.0.7");
        assert!(page.contains(">10.0.0.7<"));
        assert!(!page.contains("{{ip}}"));
    }

    #[test]
    fn test_render_index_escapes_markup() {
        let page = render_index("<b>");
        assert!(page.contains("&lt;b&gt;"));
    }

    #[test]
    fn test_form_errors_map_to_bad_request() {
        let missing = ApiError::from(FormError::MissingField("year"));
        assert!(matches!(missing, ApiError::BadRequest(ref m) if m.contains("year")));

        let size = ApiError::from(FormError::BodySize(0));
        assert!(matches!(size, ApiError::BadRequest(ref m) if m == "Invalid body size"));
    }
}
