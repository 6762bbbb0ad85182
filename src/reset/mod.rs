//! Password reset tokens: issue one per email, consume it exactly once.

pub mod store;
pub mod token;
pub mod validation;

use chrono::{Duration, Utc};

use crate::email::{templates, DynMailer};
use crate::password;
use store::{DynResetTokenStore, DynUserStore};

#[derive(Debug, PartialEq)]
pub enum ResetError {
    UserNotFound,
    InvalidOrExpiredToken,
    Internal(String),
}

impl std::fmt::Display for ResetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResetError::UserNotFound => write!(f, "User not found"),
            ResetError::InvalidOrExpiredToken => write!(f, "Invalid or expired token"),
            ResetError::Internal(msg) => write!(f, "Internal Error: {msg}"),
        }
    }
}

impl From<String> for ResetError {
    fn from(msg: String) -> Self {
        ResetError::Internal(msg)
    }
}

#[derive(Clone)]
pub struct ResetService {
    users: DynUserStore,
    tokens: DynResetTokenStore,
    mailer: DynMailer,
    base_url: String,
    token_ttl: Option<Duration>,
}

impl ResetService {
    pub fn new(
        users: DynUserStore,
        tokens: DynResetTokenStore,
        mailer: DynMailer,
        base_url: String,
    ) -> Self {
        Self {
            users,
            tokens,
            mailer,
            base_url,
            token_ttl: None,
        }
    }

    /// Reject tokens older than `ttl`. Without this, tokens live until used or replaced.
    pub fn with_token_ttl(mut self, ttl: Option<Duration>) -> Self {
        self.token_ttl = ttl;
        self
    }

    /// Issue a fresh token for `email` and mail the reset link.
    ///
    /// Any token previously issued to the same email stops working. Unknown
    /// emails are reported as [`ResetError::UserNotFound`] and nothing is sent.
    pub async fn request_reset(&self, email: &str) -> Result<(), ResetError> {
        let Some(user) = self.users.find_by_email(email).await? else {
            tracing::info!(%email, "Password reset requested for unknown email");
            return Err(ResetError::UserNotFound);
        };

        let token = token::generate();
        self.tokens.upsert(&user.email, &token, Utc::now()).await?;

        let link = templates::reset_link(&self.base_url, &token, &user.email);
        self.mailer
            .send_password_reset(&user.email, &link)
            .await
            .map_err(|e| {
                tracing::error!("Failed to send password reset email: {e}");
                ResetError::Internal(e)
            })?;

        tracing::info!(email = %user.email, "Issued password reset token");
        Ok(())
    }

    /// Set a new password if `(email, token)` matches the live token, then
    /// discard the token.
    pub async fn consume_reset(
        &self,
        email: &str,
        token: &str,
        new_password: &str,
    ) -> Result<(), ResetError> {
        let record = self
            .tokens
            .find(email, token)
            .await?
            .ok_or(ResetError::InvalidOrExpiredToken)?;

        // A TTL too large to add to the timestamp never expires anything.
        if let Some(expires_at) = self
            .token_ttl
            .and_then(|ttl| record.created_at.checked_add_signed(ttl))
        {
            if expires_at < Utc::now() {
                self.tokens.delete(email).await?;
                tracing::info!(%email, "Rejected expired password reset token");
                return Err(ResetError::InvalidOrExpiredToken);
            }
        }

        let pw_hash = password::hash(new_password)?;
        let updated = self.users.update_password(email, &pw_hash).await?;

        self.tokens.delete(email).await?;

        if !updated {
            tracing::warn!(%email, "Reset token outlived its user");
            return Err(ResetError::UserNotFound);
        }

        tracing::info!(%email, "Password reset via token");
        Ok(())
    }
}
