use askama::Template;
use axum::extract::Query;
use axum::response::{Html, IntoResponse};
use axum_extra::extract::CookieJar;
use chrono::{Datelike, Utc};
use serde::Deserialize;

use crate::flash::Flash;

#[derive(Template)]
#[template(path = "reset_password.html")]
struct ResetPasswordTemplate {
    email: String,
    token: String,
    success: Option<String>,
    errors: Vec<String>,
    year: i32,
}

#[derive(Deserialize)]
pub struct ResetQuery {
    pub email: Option<String>,
    pub token: Option<String>,
}

pub async fn reset_password_page(jar: CookieJar, Query(q): Query<ResetQuery>) -> impl IntoResponse {
    let (jar, flash) = Flash::take(jar);
    let flash = flash.unwrap_or_default();

    let template = ResetPasswordTemplate {
        email: q.email.unwrap_or_default(),
        token: q.token.unwrap_or_default(),
        success: flash.success,
        errors: flash.errors,
        year: Utc::now().year(),
    };
    (jar, Html(template.render().unwrap_or_default()))
}
