pub mod config;
pub mod db;
pub mod email;
pub mod error;
pub mod flash;
pub mod models;
pub mod password;
pub mod rate_limit;
pub mod reset;
pub mod routes;
pub mod state;
pub mod views;

use std::sync::Arc;

use axum::http::{HeaderName, HeaderValue};
use axum::Router;
use sqlx::PgPool;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

use crate::config::Config;
use crate::reset::store::PgStore;
use crate::reset::ResetService;
use crate::state::{AppState, SharedState};

const MAX_BODY_SIZE: usize = 16 * 1024;

/// Wire the Postgres stores and the configured mailer into shared state.
pub fn build_state(pool: PgPool, config: Config) -> SharedState {
    let store = Arc::new(PgStore::new(pool));
    let mailer = email::from_config(config.smtp.as_ref());

    let resets = ResetService::new(store.clone(), store, mailer, config.base_url.clone())
        .with_token_ttl(config.token_ttl);

    Arc::new(AppState::new(config, resets))
}

pub fn build_app(state: SharedState) -> Router {
    Router::new()
        .merge(routes::api_routes())
        .merge(views::view_routes())
        .route("/health", axum::routing::get(health))
        .layer(RequestBodyLimitLayer::new(MAX_BODY_SIZE))
        .layer(TraceLayer::new_for_http())
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-content-type-options"),
            HeaderValue::from_static("nosniff"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("x-frame-options"),
            HeaderValue::from_static("DENY"),
        ))
        .layer(SetResponseHeaderLayer::overriding(
            HeaderName::from_static("referrer-policy"),
            HeaderValue::from_static("strict-origin-when-cross-origin"),
        ))
        .with_state(state)
}

async fn health() -> &'static str {
    "ok"
}
