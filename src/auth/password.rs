//! Password hashing
//!
//! Comparing a presented password with the stored hash happens before a
//! session token is issued; the verifier itself never sees passwords.
//!
//! bcrypt is CPU bound, so every hash and compare runs on the blocking pool.

use anyhow::Context;
use bcrypt::{hash, verify};
use tokio::task::spawn_blocking;
use tracing::warn;

pub use bcrypt::DEFAULT_COST;

use crate::error::AppResult;

/// Minimum accepted password length
pub const MIN_PASSWORD_LEN: usize = 6;

const DECOY_PASSWORD: &str = "cinegate-decoy-password";

/// bcrypt hashing at a fixed work factor
pub struct PasswordHasher {
    cost: u32,
    /// Hash compared against when a login names no account, so that path
    /// costs one full bcrypt round like a wrong password does
    decoy_hash: String,
}

impl PasswordHasher {
    pub fn new(cost: u32) -> AppResult<Self> {
        let decoy_hash = hash(DECOY_PASSWORD.as_bytes(), cost).context("failed to hash password")?;
        Ok(Self { cost, decoy_hash })
    }

    pub async fn hash(&self, password: &str) -> AppResult<String> {
        let password = password.to_owned();
        let cost = self.cost;

        let hashed = spawn_blocking(move || hash(password.as_bytes(), cost))
            .await
            .context("password hashing task failed")?
            .context("failed to hash password")?;
        Ok(hashed)
    }

    /// Returns `false` for a wrong password and for an unreadable hash alike
    pub async fn verify(&self, password: &str, password_hash: &str) -> bool {
        let password = password.to_owned();
        let password_hash = password_hash.to_owned();

        match spawn_blocking(move || verify(password.as_bytes(), &password_hash)).await {
            Ok(result) => result.unwrap_or(false),
            Err(e) => {
                warn!(error = %e, "Password verification task failed");
                false
            }
        }
    }

    /// Spend the same work as `verify` for a login that matched no account
    ///
    /// Always `false`.
    pub async fn verify_unknown(&self, password: &str) -> bool {
        let matched = self.verify(password, &self.decoy_hash).await;
        matched && password != DECOY_PASSWORD
    }
}
