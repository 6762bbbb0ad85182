pub mod auth;

use axum::routing::get;
use axum::Router;

use crate::routes;
use crate::state::SharedState;

pub fn view_routes() -> Router<SharedState> {
    Router::new().route(
        "/reset-password",
        get(auth::reset_password_page).post(routes::auth::reset_password),
    )
}
