// Session service: issuing, checking and revoking tokens

use crate::auth::{
    error::AuthError,
    models::AccountKind,
    revoked::RevokedTokenStore,
    token::{Claims, TokenService},
};
use chrono::{TimeZone, Utc};
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tracing::{debug, error, info, warn};
use uuid::Uuid;

/// Coordinates token issuance with the revoked token store
pub struct SessionService {
    tokens: TokenService,
    revoked: Arc<dyn RevokedTokenStore>,
}

impl SessionService {
    pub fn new(tokens: TokenService, revoked: Arc<dyn RevokedTokenStore>) -> Self {
        Self { tokens, revoked }
    }

    /// Issue a signed token for an account
    pub fn issue(&self, kind: AccountKind, account_id: Uuid) -> Result<String, AuthError> {
        let token = self.tokens.generate_token(kind, account_id)?;
        debug!("Issued {} token for account {}", kind, account_id);
        Ok(token)
    }

    /// Verify a token and make sure it is usable for `expected` accounts.
    ///
    /// Order of checks: signature and expiry, account kind, revocation.
    pub async fn authenticate(&self, token: &str, expected: AccountKind) -> Result<Claims, AuthError> {
        let claims = self.tokens.validate_token(token)?;

        if claims.kind != expected {
            warn!(
                "Token for {} {} presented on {} route",
                claims.kind, claims.sub, expected
            );
            return Err(AuthError::WrongAccountKind);
        }

        if self.revoked.is_revoked(token).await? {
            warn!("Revoked token presented for {} {}", claims.kind, claims.sub);
            return Err(AuthError::RevokedToken);
        }

        Ok(claims)
    }

    /// Revoke a token until its own expiry
    pub async fn revoke(&self, token: &str, claims: &Claims) -> Result<(), AuthError> {
        let expires_at = Utc
            .timestamp_opt(claims.exp, 0)
            .single()
            .unwrap_or_else(|| Utc::now() + chrono::Duration::seconds(self.tokens.duration_secs()));

        self.revoked.revoke(token, expires_at).await?;
        info!("Revoked {} token for account {}", claims.kind, claims.sub);
        Ok(())
    }

    /// Drop revocation records for tokens that have expired anyway
    pub async fn purge_expired(&self) -> Result<u64, AuthError> {
        let removed = self.revoked.purge_expired(Utc::now()).await?;
        if removed > 0 {
            info!("Purged {} expired revoked tokens", removed);
        }
        Ok(removed)
    }

    /// Run `purge_expired` on a fixed interval until the task is aborted
    pub fn spawn_purge_task(self: Arc<Self>, every: Duration) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(every);
            loop {
                ticker.tick().await;
                if let Err(e) = self.purge_expired().await {
                    error!("Revoked token purge failed: {}", e);
                }
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::revoked::MemoryRevokedTokenStore;

    const SECRET: &str = "session_test_secret";

    fn session_with_store() -> (SessionService, MemoryRevokedTokenStore) {
        let store = MemoryRevokedTokenStore::new();
        let session = SessionService::new(TokenService::new(SECRET), Arc::new(store.clone()));
        (session, store)
    }

    #[tokio::test]
    async fn test_issued_token_authenticates() {
        let (session, _) = session_with_store();
        let id = Uuid::new_v4();

        let token = session.issue(AccountKind::User, id).unwrap();
        let claims = session.authenticate(&token, AccountKind::User).await.unwrap();

        assert_eq!(claims.sub, id);
    }

    #[tokio::test]
    async fn test_wrong_kind_is_refused() {
        let (session, _) = session_with_store();
        let token = session.issue(AccountKind::User, Uuid::new_v4()).unwrap();

        let result = session.authenticate(&token, AccountKind::Captain).await;
        assert!(matches!(result, Err(AuthError::WrongAccountKind)));
    }

    #[tokio::test]
    async fn test_revoked_token_is_refused() {
        let (session, _) = session_with_store();
        let token = session.issue(AccountKind::Captain, Uuid::new_v4()).unwrap();
        let claims = session.authenticate(&token, AccountKind::Captain).await.unwrap();

        session.revoke(&token, &claims).await.unwrap();

        let result = session.authenticate(&token, AccountKind::Captain).await;
        assert!(matches!(result, Err(AuthError::RevokedToken)));
    }

    #[tokio::test]
    async fn test_revocation_does_not_affect_other_tokens() {
        let (session, _) = session_with_store();
        let id = Uuid::new_v4();
        let first = session.issue(AccountKind::User, id).unwrap();
        let claims = session.authenticate(&first, AccountKind::User).await.unwrap();
        session.revoke(&first, &claims).await.unwrap();

        // Issued within the same second as the revoked one
        let second = session.issue(AccountKind::User, id).unwrap();

        assert_ne!(first, second);
        assert!(session.authenticate(&second, AccountKind::User).await.is_ok());
    }

    #[tokio::test]
    async fn test_purge_keeps_unexpired_revocations() {
        let (session, store) = session_with_store();
        let token = session.issue(AccountKind::User, Uuid::new_v4()).unwrap();
        let claims = session.authenticate(&token, AccountKind::User).await.unwrap();
        session.revoke(&token, &claims).await.unwrap();

        assert_eq!(session.purge_expired().await.unwrap(), 0);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn test_purge_drops_expired_revocations() {
        let (session, store) = session_with_store();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            kind: AccountKind::User,
            jti: Uuid::new_v4(),
            iat: now - 7200,
            exp: now - 3600,
        };
        session.revoke("stale-token", &claims).await.unwrap();

        assert_eq!(session.purge_expired().await.unwrap(), 1);
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_purge_task_sweeps_in_background() {
        let (session, store) = session_with_store();
        let now = Utc::now().timestamp();
        let claims = Claims {
            sub: Uuid::new_v4(),
            kind: AccountKind::Captain,
            jti: Uuid::new_v4(),
            iat: now - 120,
            exp: now - 60,
        };
        session.revoke("expired-token", &claims).await.unwrap();
        assert_eq!(store.len().await, 1);

        let handle = Arc::new(session).spawn_purge_task(Duration::from_millis(10));

        let mut swept = false;
        for _ in 0..100 {
            if store.is_empty().await {
                swept = true;
                break;
            }
            tokio::time::sleep(Duration::from_millis(10)).await;
        }
        handle.abort();

        assert!(swept, "expired revocation was not purged by the task");
    }
}
