use sqlx::PgPool;

use crate::models::User;

pub async fn find_by_email(pool: &PgPool, email: &str) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>("SELECT * FROM users WHERE lower(email) = lower($1)")
        .bind(email)
        .fetch_optional(pool)
        .await
}

/// Returns the number of rows touched, so callers can tell a missing user apart.
pub async fn update_password_by_email(
    pool: &PgPool,
    email: &str,
    password_hash: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE users SET password_hash = $2, updated_at = now() WHERE lower(email) = lower($1)",
    )
    .bind(email)
    .bind(password_hash)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
