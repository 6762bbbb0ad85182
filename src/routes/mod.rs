pub mod auth;

use axum::http::{header, HeaderMap};
use axum::routing::post;
use axum::Router;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::error::AppError;
use crate::state::SharedState;

pub fn api_routes() -> Router<SharedState> {
    Router::new()
        .route("/forgot-password", post(auth::forgot_password))
        .route("/api/forgot-password", post(auth::forgot_password))
        .route("/api/reset-password", post(auth::reset_password))
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BodyKind {
    Json,
    Form,
}

impl BodyKind {
    pub fn from_headers(headers: &HeaderMap) -> Self {
        let ct = headers
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("application/json");

        if ct.contains("application/x-www-form-urlencoded") {
            BodyKind::Form
        } else {
            BodyKind::Json
        }
    }
}

/// Decode a JSON or urlencoded body into `T`.
pub fn parse_body<T: DeserializeOwned>(kind: BodyKind, body: &[u8]) -> Result<T, AppError> {
    let value = match kind {
        BodyKind::Json => serde_json::from_slice::<Value>(body)
            .map_err(|e| AppError::BadRequest(format!("Invalid JSON: {e}")))?,
        BodyKind::Form => parse_form_urlencoded(body),
    };

    serde_json::from_value(value).map_err(|e| AppError::BadRequest(format!("Invalid body: {e}")))
}

fn parse_form_urlencoded(body: &[u8]) -> Value {
    let map: Map<String, Value> = form_urlencoded::parse(body)
        .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
        .collect();
    Value::Object(map)
}
