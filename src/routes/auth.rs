use axum::extract::State;
use axum::http::HeaderMap;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use axum_extra::extract::CookieJar;
use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::email::templates;
use crate::error::AppError;
use crate::flash::Flash;
use crate::reset::validation;
use crate::state::SharedState;

use super::{parse_body, BodyKind};

#[derive(Deserialize)]
pub struct ForgotPasswordRequest {
    #[serde(default)]
    pub email: String,
}

#[derive(Deserialize)]
pub struct ResetPasswordRequest {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub token: String,
    #[serde(default)]
    pub password: String,
    #[serde(default)]
    pub password_confirmation: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub status: bool,
    pub message: String,
}

impl StatusResponse {
    fn ok(message: &str) -> Json<Self> {
        Json(Self {
            status: true,
            message: message.to_string(),
        })
    }
}

pub async fn forgot_password(
    State(state): State<SharedState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<StatusResponse>, AppError> {
    let req: ForgotPasswordRequest = parse_body(BodyKind::from_headers(&headers), &body)?;
    let email = req.email.trim();

    validation::forgot_password(email)?;

    state
        .reset_limiter
        .check(email)
        .map_err(AppError::RateLimited)?;

    state.resets.request_reset(email).await?;

    Ok(StatusResponse::ok("Reset password link sent to email"))
}

/// Accepts JSON from API clients and urlencoded posts from the reset page.
/// Form posts are answered with a redirect back to the page and a flash message.
pub async fn reset_password(
    State(state): State<SharedState>,
    jar: CookieJar,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let kind = BodyKind::from_headers(&headers);
    let req: ResetPasswordRequest = match parse_body(kind, &body) {
        Ok(req) => req,
        Err(e) => return e.into_response(),
    };

    let result = consume(&state, &req).await;

    match kind {
        BodyKind::Json => match result {
            Ok(()) => StatusResponse::ok("Password reset successful").into_response(),
            Err(e) => e.into_response(),
        },
        BodyKind::Form => {
            let flash = match result {
                Ok(()) => Flash::success("Password reset successful"),
                Err(AppError::Validation(errors)) => Flash::errors(errors.messages()),
                Err(e) => {
                    e.log();
                    Flash::errors(vec![e.public_message()])
                }
            };
            let back = templates::reset_link("", &req.token, &req.email);
            (flash.write(jar), Redirect::to(&back)).into_response()
        }
    }
}

async fn consume(state: &SharedState, req: &ResetPasswordRequest) -> Result<(), AppError> {
    let email = req.email.trim();

    validation::reset_password(
        email,
        &req.token,
        &req.password,
        &req.password_confirmation,
        state.config.min_password_length,
    )?;

    state
        .resets
        .consume_reset(email, &req.token, &req.password)
        .await?;
    Ok(())
}
