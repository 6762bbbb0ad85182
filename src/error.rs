use axum::http::{header, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::reset::validation::ValidationErrors;
use crate::reset::ResetError;

#[derive(Debug)]
pub enum AppError {
    /// A reset the caller cannot complete. Answered with 200 and `status: false`.
    Rejected(String),
    BadRequest(String),
    Validation(ValidationErrors),
    /// Seconds until the caller may retry.
    RateLimited(u64),
    Internal(String),
    Database(sqlx::Error),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Rejected(_) => StatusCode::OK,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            AppError::RateLimited(_) => StatusCode::TOO_MANY_REQUESTS,
            AppError::Internal(_) | AppError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn log(&self) {
        match self {
            AppError::Internal(msg) => tracing::error!("Internal error: {msg}"),
            AppError::Database(err) => tracing::error!("Database error: {err}"),
            _ => {}
        }
    }

    /// The message shown to the caller. Internal details stay in the log.
    pub fn public_message(&self) -> String {
        match self {
            AppError::Rejected(msg) | AppError::BadRequest(msg) => msg.clone(),
            AppError::Validation(errors) => errors
                .first_message()
                .unwrap_or("The given data was invalid.")
                .to_string(),
            AppError::RateLimited(_) => {
                "Too many reset requests. Please try again later.".to_string()
            }
            AppError::Internal(_) | AppError::Database(_) => "Internal server error".to_string(),
        }
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AppError::Rejected(msg) => write!(f, "Rejected: {msg}"),
            AppError::BadRequest(msg) => write!(f, "Bad Request: {msg}"),
            AppError::Validation(errors) => write!(f, "Validation failed: {errors:?}"),
            AppError::RateLimited(secs) => write!(f, "Rate Limited: retry in {secs}s"),
            AppError::Internal(msg) => write!(f, "Internal Error: {msg}"),
            AppError::Database(err) => write!(f, "Database Error: {err}"),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        self.log();

        let status = self.status();
        let mut body = json!({ "status": false, "message": self.public_message() });
        if let AppError::Validation(errors) = &self {
            body["errors"] = json!(errors);
        }

        let mut response = (status, axum::Json(body)).into_response();
        if let AppError::RateLimited(secs) = self {
            response
                .headers_mut()
                .insert(header::RETRY_AFTER, header::HeaderValue::from(secs));
        }
        response
    }
}

impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        AppError::Database(err)
    }
}

impl From<ValidationErrors> for AppError {
    fn from(errors: ValidationErrors) -> Self {
        AppError::Validation(errors)
    }
}

impl From<ResetError> for AppError {
    fn from(err: ResetError) -> Self {
        match err {
            ResetError::UserNotFound | ResetError::InvalidOrExpiredToken => {
                AppError::Rejected(err.to_string())
            }
            ResetError::Internal(msg) => AppError::Internal(msg),
        }
    }
}
