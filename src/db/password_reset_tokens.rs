use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::models::PasswordResetToken;

/// Insert a token for `email`, replacing whatever token the email already had.
pub async fn upsert(
    pool: &PgPool,
    email: &str,
    token: &str,
    created_at: DateTime<Utc>,
) -> Result<PasswordResetToken, sqlx::Error> {
    sqlx::query_as::<_, PasswordResetToken>(
        "INSERT INTO password_reset_tokens (email, token, created_at)
         VALUES ($1, $2, $3)
         ON CONFLICT (email) DO UPDATE
         SET token = EXCLUDED.token, created_at = EXCLUDED.created_at
         RETURNING *",
    )
    .bind(email)
    .bind(token)
    .bind(created_at)
    .fetch_one(pool)
    .await
}

pub async fn find_by_email_and_token(
    pool: &PgPool,
    email: &str,
    token: &str,
) -> Result<Option<PasswordResetToken>, sqlx::Error> {
    sqlx::query_as::<_, PasswordResetToken>(
        "SELECT * FROM password_reset_tokens WHERE lower(email) = lower($1) AND token = $2",
    )
    .bind(email)
    .bind(token)
    .fetch_optional(pool)
    .await
}

pub async fn delete_by_email(pool: &PgPool, email: &str) -> Result<(), sqlx::Error> {
    sqlx::query("DELETE FROM password_reset_tokens WHERE lower(email) = lower($1)")
        .bind(email)
        .execute(pool)
        .await?;
    Ok(())
}
