//! Credential handling: salted password hashing and the register/login
//! state machine over a single active session.

use crate::errors::AppError;
use crate::models::{RecordPatch, UserRecord};
use crate::remote::RecordStore;
use sha2::{Digest, Sha256};
use std::sync::Arc;
use tracing::info;

// Known weakness: one fixed salt for every password, so a leaked digest can
// be reversed with a table precomputed for this salt. Kept as-is.
const PASSWORD_SALT: &str = "vita-track-super-secret-salt";

/// Deterministic digest: lowercase hex SHA-256 of password + salt. Any
/// string input is valid; there is no error path.
pub fn hash_password(password: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(password.as_bytes());
    hasher.update(PASSWORD_SALT.as_bytes());
    hex::encode(hasher.finalize())
}

/// Canonical user id: trimmed and lowercased.
pub fn normalize_user_id(username: &str) -> String {
    username.trim().to_lowercase()
}

/// The logged-in user, constructed at login or registration and dropped at
/// logout. `user_id` is the normalized id; `display_name` keeps the
/// caller's casing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub user_id: String,
    pub display_name: String,
}

pub struct CredentialStore {
    records: Arc<dyn RecordStore>,
}

impl CredentialStore {
    pub fn new(records: Arc<dyn RecordStore>) -> Self {
        Self { records }
    }

    /// Create an account. Fails without touching remote state when a record
    /// with a non-empty password hash already exists for the normalized id.
    /// An unavailable backend does not block registration; the save is
    /// attempted and swallowed on failure. Password strength is the
    /// caller's concern, not checked here.
    pub async fn register(&self, username: &str, password: &str) -> Result<Session, AppError> {
        let user_id = normalize_user_id(username);
        if let Some(existing) = self.records.get_record(&user_id).await {
            if !existing.password_hash.is_empty() {
                return Err(AppError::conflict("username already registered"));
            }
        }

        let record = UserRecord {
            password_hash: hash_password(password),
            ..UserRecord::default()
        };
        self.records
            .save_record(
                &user_id,
                RecordPatch {
                    password_hash: Some(record.password_hash),
                    goals: Some(record.goals),
                    stats: Some(record.stats),
                },
            )
            .await;

        info!("registered user {user_id}");
        Ok(Session {
            user_id,
            display_name: username.trim().to_string(),
        })
    }

    /// Verify credentials. A missing record, an unavailable backend, and a
    /// wrong password all report the same invalid-credentials error and
    /// leave no session behind.
    pub async fn login(&self, username: &str, password: &str) -> Result<Session, AppError> {
        let user_id = normalize_user_id(username);
        let stored_hash = self
            .records
            .get_record(&user_id)
            .await
            .map(|record| record.password_hash)
            .unwrap_or_default();

        // Plain equality, not constant-time. Hardening gap, kept.
        if stored_hash.is_empty() || hash_password(password) != stored_hash {
            return Err(AppError::unauthorized("invalid username or password"));
        }

        info!("user {user_id} logged in");
        Ok(Session {
            user_id,
            display_name: username.trim().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::remote::MemoryStore;

    #[test]
    fn hashing_is_deterministic() {
        assert_eq!(hash_password("secret1"), hash_password("secret1"));
        assert_ne!(hash_password("secret1"), hash_password("secret2"));
        // 32 bytes of SHA-256, hex encoded.
        assert_eq!(hash_password("secret1").len(), 64);
    }

    #[test]
    fn user_ids_are_trimmed_and_lowercased() {
        assert_eq!(normalize_user_id("  Ana "), "ana");
    }

    #[tokio::test]
    async fn register_then_login() {
        let records: Arc<dyn RecordStore> = Arc::new(MemoryStore::default());
        let credentials = CredentialStore::new(Arc::clone(&records));

        let session = credentials.register("Ana", "secret1").await.expect("register");
        assert_eq!(session.user_id, "ana");
        assert_eq!(session.display_name, "Ana");

        let record = records.get_record("ana").await.expect("available");
        assert_eq!(record.password_hash, hash_password("secret1"));
        assert!(record.stats.is_empty());

        let session = credentials.login(" ANA ", "secret1").await.expect("login");
        assert_eq!(session.user_id, "ana");
    }

    #[tokio::test]
    async fn duplicate_registration_is_rejected() {
        let records: Arc<dyn RecordStore> = Arc::new(MemoryStore::default());
        let credentials = CredentialStore::new(Arc::clone(&records));

        credentials.register("Ana", "secret1").await.expect("register");
        let err = credentials
            .register("ana", "other")
            .await
            .expect_err("duplicate id");
        assert_eq!(err.status, axum::http::StatusCode::CONFLICT);

        // The original record is untouched.
        let record = records.get_record("ana").await.expect("available");
        assert_eq!(record.password_hash, hash_password("secret1"));
    }

    #[tokio::test]
    async fn wrong_password_is_rejected() {
        let records: Arc<dyn RecordStore> = Arc::new(MemoryStore::default());
        let credentials = CredentialStore::new(Arc::clone(&records));

        credentials.register("Ana", "secret1").await.expect("register");
        let err = credentials
            .login("Ana", "wrongpass")
            .await
            .expect_err("bad password");
        assert_eq!(err.status, axum::http::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn unknown_user_is_rejected() {
        let records: Arc<dyn RecordStore> = Arc::new(MemoryStore::default());
        let credentials = CredentialStore::new(records);
        assert!(credentials.login("ghost", "secret1").await.is_err());
    }
}
