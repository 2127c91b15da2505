//! Password hashing and admin-account bootstrap.
//!
//! Uses Argon2id with per-hash random salts. Verification mismatch is a
//! normal boolean outcome, never an error.

use anyhow::{Context, Result};
use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tokio::task;
use tracing::{info, warn};

use crate::config::AdminConfig;
use crate::db::Store;

/// Development fallback used when no admin password is supplied via the
/// environment. Bootstrap logs a warning whenever this is the one in use.
const FALLBACK_ADMIN_PASSWORD: &str = "yoga2025";

/// Hash a password with Argon2id and a fresh random salt.
/// Note: runs on a blocking task because Argon2 is CPU-intensive and would
/// stall the async runtime if run directly.
pub async fn hash_password(password: &str) -> Result<String> {
    let password = password.to_string();
    task::spawn_blocking(move || hash_password_sync(&password))
        .await
        .context("Password hashing task panicked")?
}

pub fn hash_password_sync(password: &str) -> Result<String> {
    let salt = SaltString::generate(&mut OsRng);
    let argon2 = Argon2::default();

    let hash = argon2
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!("Failed to hash password: {e}"))?;

    Ok(hash.to_string())
}

/// Verify a candidate password against a stored hash. Returns `Ok(false)`
/// on mismatch; errors only when the stored hash is malformed.
pub async fn verify_password(hash: &str, candidate: &str) -> Result<bool> {
    let hash = hash.to_string();
    let candidate = candidate.to_string();

    task::spawn_blocking(move || {
        let parsed_hash = PasswordHash::new(&hash)
            .map_err(|e| anyhow::anyhow!("Invalid password hash format: {e}"))?;

        let argon2 = Argon2::default();
        Ok::<bool, anyhow::Error>(
            argon2
                .verify_password(candidate.as_bytes(), &parsed_hash)
                .is_ok(),
        )
    })
    .await
    .context("Password verification task panicked")?
}

/// Create the admin account on first boot. No-op when any admin row
/// already exists, so repeated startups never add a second account.
///
/// This is the only path that creates an admin credential; losing the
/// database file is equivalent to losing administrative access.
pub async fn bootstrap_admin_if_absent(store: &Store, config: &AdminConfig) -> Result<()> {
    if store.admin_count().await? > 0 {
        return Ok(());
    }

    let password = match &config.default_password {
        Some(password) => password.clone(),
        None => {
            warn!("Using default admin password. Set DEFAULT_ADMIN_PASSWORD in production!");
            FALLBACK_ADMIN_PASSWORD.to_string()
        }
    };

    let hash = hash_password(&password).await?;
    store.insert_admin(&config.default_username, &hash).await?;

    info!(
        "Default admin user created (username: {})",
        config.default_username
    );

    Ok(())
}
