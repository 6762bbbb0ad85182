use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use dashmap::DashMap;
use sqlx::PgPool;
use subtle::ConstantTimeEq;

use crate::db;
use crate::models::{PasswordResetToken, User};

pub type DynUserStore = Arc<dyn UserStore>;
pub type DynResetTokenStore = Arc<dyn ResetTokenStore>;

#[async_trait]
pub trait UserStore: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, String>;

    /// Returns `false` when no user with that email exists.
    async fn update_password(&self, email: &str, password_hash: &str) -> Result<bool, String>;
}

/// Reset tokens keyed by email: one live token per address.
#[async_trait]
pub trait ResetTokenStore: Send + Sync {
    async fn upsert(
        &self,
        email: &str,
        token: &str,
        created_at: DateTime<Utc>,
    ) -> Result<PasswordResetToken, String>;

    /// Exact match on both email and token.
    async fn find(&self, email: &str, token: &str) -> Result<Option<PasswordResetToken>, String>;

    async fn delete(&self, email: &str) -> Result<(), String>;
}

#[derive(Clone)]
pub struct PgStore {
    pool: PgPool,
}

impl PgStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl UserStore for PgStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, String> {
        db::users::find_by_email(&self.pool, email)
            .await
            .map_err(|e| format!("Failed to look up user: {e}"))
    }

    async fn update_password(&self, email: &str, password_hash: &str) -> Result<bool, String> {
        let updated = db::users::update_password_by_email(&self.pool, email, password_hash)
            .await
            .map_err(|e| format!("Failed to update password: {e}"))?;
        Ok(updated > 0)
    }
}

#[async_trait]
impl ResetTokenStore for PgStore {
    async fn upsert(
        &self,
        email: &str,
        token: &str,
        created_at: DateTime<Utc>,
    ) -> Result<PasswordResetToken, String> {
        db::password_reset_tokens::upsert(&self.pool, email, token, created_at)
            .await
            .map_err(|e| format!("Failed to save reset token: {e}"))
    }

    async fn find(&self, email: &str, token: &str) -> Result<Option<PasswordResetToken>, String> {
        db::password_reset_tokens::find_by_email_and_token(&self.pool, email, token)
            .await
            .map_err(|e| format!("Failed to look up reset token: {e}"))
    }

    async fn delete(&self, email: &str) -> Result<(), String> {
        db::password_reset_tokens::delete_by_email(&self.pool, email)
            .await
            .map_err(|e| format!("Failed to delete reset token: {e}"))
    }
}

/// Process-local store backed by concurrent maps, keyed by lowercased email.
#[derive(Default)]
pub struct MemoryStore {
    users: DashMap<String, User>,
    tokens: DashMap<String, PasswordResetToken>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_user(&self, user: User) {
        self.users.insert(user.email.to_lowercase(), user);
    }

    pub fn user(&self, email: &str) -> Option<User> {
        self.users.get(&email.to_lowercase()).map(|u| u.value().clone())
    }

    pub fn token_for(&self, email: &str) -> Option<PasswordResetToken> {
        self.tokens.get(&email.to_lowercase()).map(|t| t.value().clone())
    }

    pub fn token_count(&self) -> usize {
        self.tokens.len()
    }
}

#[async_trait]
impl UserStore for MemoryStore {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, String> {
        Ok(self.user(email))
    }

    async fn update_password(&self, email: &str, password_hash: &str) -> Result<bool, String> {
        match self.users.get_mut(&email.to_lowercase()) {
            Some(mut user) => {
                user.password_hash = password_hash.to_string();
                user.updated_at = Utc::now();
                Ok(true)
            }
            None => Ok(false),
        }
    }
}

#[async_trait]
impl ResetTokenStore for MemoryStore {
    async fn upsert(
        &self,
        email: &str,
        token: &str,
        created_at: DateTime<Utc>,
    ) -> Result<PasswordResetToken, String> {
        let record = PasswordResetToken {
            email: email.to_string(),
            token: token.to_string(),
            created_at,
        };
        self.tokens.insert(email.to_lowercase(), record.clone());
        Ok(record)
    }

    async fn find(&self, email: &str, token: &str) -> Result<Option<PasswordResetToken>, String> {
        Ok(self.token_for(email).filter(|record| {
            bool::from(record.token.as_bytes().ct_eq(token.as_bytes()))
        }))
    }

    async fn delete(&self, email: &str) -> Result<(), String> {
        self.tokens.remove(&email.to_lowercase());
        Ok(())
    }
}
