use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// At most one row exists per email; a newer request replaces the older token.
#[derive(Debug, Clone, sqlx::FromRow, Serialize, Deserialize)]
pub struct PasswordResetToken {
    pub email: String,
    #[serde(skip_serializing)]
    pub token: String,
    pub created_at: DateTime<Utc>,
}
