// Revoked token storage
//
// Tokens are never stored raw. Each record keeps the SHA-256 digest of the
// token and the moment the token itself expires, so records can be swept
// once the signature check alone would refuse the token.

use crate::auth::error::AuthError;
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::PgPool;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Hash a token using SHA-256
pub fn hash_token(token: &str) -> String {
    let mut hasher = Sha256::new();
    hasher.update(token.as_bytes());
    format!("{:x}", hasher.finalize())
}

/// Storage for revoked tokens
#[async_trait]
pub trait RevokedTokenStore: Send + Sync {
    /// Record a token as revoked until `expires_at`. Revoking twice is a no-op.
    async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), AuthError>;

    /// Check whether a token has been revoked
    async fn is_revoked(&self, token: &str) -> Result<bool, AuthError>;

    /// Delete records whose token has expired, returning how many were removed
    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError>;
}

/// PostgreSQL-backed revoked token store
#[derive(Clone)]
pub struct PgRevokedTokenStore {
    pool: PgPool,
}

impl PgRevokedTokenStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RevokedTokenStore for PgRevokedTokenStore {
    async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), AuthError> {
        sqlx::query(
            "INSERT INTO revoked_tokens (token_hash, expires_at) VALUES ($1, $2)
             ON CONFLICT (token_hash) DO NOTHING",
        )
        .bind(hash_token(token))
        .bind(expires_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, AuthError> {
        let exists: (bool,) = sqlx::query_as(
            "SELECT EXISTS(SELECT 1 FROM revoked_tokens WHERE token_hash = $1)",
        )
        .bind(hash_token(token))
        .fetch_one(&self.pool)
        .await?;

        Ok(exists.0)
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError> {
        let result = sqlx::query("DELETE FROM revoked_tokens WHERE expires_at < $1")
            .bind(now)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

/// In-memory revoked token store (development and tests)
#[derive(Clone, Default)]
pub struct MemoryRevokedTokenStore {
    // token hash -> expiry
    entries: Arc<RwLock<HashMap<String, DateTime<Utc>>>>,
}

impl MemoryRevokedTokenStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of records currently held
    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}

#[async_trait]
impl RevokedTokenStore for MemoryRevokedTokenStore {
    async fn revoke(&self, token: &str, expires_at: DateTime<Utc>) -> Result<(), AuthError> {
        self.entries
            .write()
            .await
            .entry(hash_token(token))
            .or_insert(expires_at);
        Ok(())
    }

    async fn is_revoked(&self, token: &str) -> Result<bool, AuthError> {
        Ok(self.entries.read().await.contains_key(&hash_token(token)))
    }

    async fn purge_expired(&self, now: DateTime<Utc>) -> Result<u64, AuthError> {
        let mut entries = self.entries.write().await;
        let before = entries.len();
        entries.retain(|_, expires_at| *expires_at >= now);
        Ok((before - entries.len()) as u64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_hash_token_is_stable_hex() {
        let first = hash_token("abc");
        assert_eq!(first, hash_token("abc"));
        assert_eq!(first.len(), 64);
        assert_ne!(first, hash_token("abd"));
        assert_eq!(
            first,
            "ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad"
        );
    }

    #[tokio::test]
    async fn test_revoked_token_is_reported() {
        let store = MemoryRevokedTokenStore::new();
        let expires = Utc::now() + Duration::hours(1);

        assert!(!store.is_revoked("token-a").await.unwrap());
        store.revoke("token-a", expires).await.unwrap();
        assert!(store.is_revoked("token-a").await.unwrap());
        assert!(!store.is_revoked("token-b").await.unwrap());
    }

    #[tokio::test]
    async fn test_revoking_twice_keeps_one_record() {
        let store = MemoryRevokedTokenStore::new();
        let expires = Utc::now() + Duration::hours(1);

        store.revoke("token-a", expires).await.unwrap();
        store.revoke("token-a", expires).await.unwrap();
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_purge_removes_only_expired_records() {
        let store = MemoryRevokedTokenStore::new();
        let now = Utc::now();

        store.revoke("old", now - Duration::minutes(5)).await.unwrap();
        store.revoke("live", now + Duration::minutes(5)).await.unwrap();

        let removed = store.purge_expired(now).await.unwrap();
        assert_eq!(removed, 1);
        assert!(!store.is_revoked("old").await.unwrap());
        assert!(store.is_revoked("live").await.unwrap());
    }

    #[tokio::test]
    async fn test_purge_on_empty_store() {
        let store = MemoryRevokedTokenStore::new();
        assert_eq!(store.purge_expired(Utc::now()).await.unwrap(), 0);
        assert!(store.is_empty().await);
    }
}
