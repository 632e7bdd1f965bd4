//! Session coordinator owning token lifecycle and refresh
//!
//! [`SessionManager`] is the only component that reads, writes, or renews the
//! stored tokens. The request helper asks it for the current access token and
//! hands it back the token that was rejected with `401`; the manager decides
//! whether a refresh is needed, performs it, and persists the result.
//!
//! Refreshes are serialized behind an async mutex. A caller that waited on the
//! lock re-reads the store first: if the access token already changed, another
//! caller refreshed in the meantime and the new token is reused without a
//! second call to the refresh endpoint.

use std::sync::Arc;

use reqwest::StatusCode;
use tokio::sync::Mutex;
use url::Url;

use crate::api::types::{RefreshRequest, TokenPair};
use crate::error::{Result, SessionError, VitalPathError};
use crate::session::token_store::{SessionTokens, TokenStore};

/// Coordinates access to the stored session tokens.
pub struct SessionManager {
    /// HTTP client used for the refresh call.
    http: reqwest::Client,

    /// Absolute URL of the token refresh endpoint.
    refresh_url: Url,

    /// Persistent token storage.
    store: Arc<dyn TokenStore>,

    /// Serializes refresh attempts across concurrent requests.
    refresh_lock: Mutex<()>,
}

impl SessionManager {
    /// Creates a manager over `store` that refreshes against `refresh_url`.
    pub fn new(http: reqwest::Client, refresh_url: Url, store: Arc<dyn TokenStore>) -> Self {
        Self {
            http,
            refresh_url,
            store,
            refresh_lock: Mutex::new(()),
        }
    }

    /// Returns the stored tokens, if any.
    pub fn current(&self) -> Result<Option<SessionTokens>> {
        self.store.load()
    }

    /// Returns `true` when an access token is stored.
    pub fn is_signed_in(&self) -> Result<bool> {
        Ok(self.current()?.is_some())
    }

    /// Returns the stored access token.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AuthenticationRequired`] when no token is
    /// stored.
    pub fn access_token(&self) -> Result<String> {
        match self.store.load()? {
            Some(tokens) if !tokens.access_token.is_empty() => Ok(tokens.access_token),
            _ => Err(VitalPathError::Session(SessionError::AuthenticationRequired).into()),
        }
    }

    /// Persists a freshly issued token pair (login or registration).
    pub fn establish(&self, tokens: &SessionTokens) -> Result<()> {
        self.store.save(tokens)?;
        tracing::info!(has_refresh = tokens.can_refresh(), "Session established");
        Ok(())
    }

    /// Deletes the stored tokens.
    pub fn end(&self) -> Result<()> {
        self.store.clear()?;
        tracing::info!("Session cleared");
        Ok(())
    }

    /// Obtains a replacement for an access token the server rejected.
    ///
    /// # Arguments
    ///
    /// * `rejected_access` - The access token that produced the `401`.
    ///
    /// # Returns
    ///
    /// The access token to retry with.
    ///
    /// # Errors
    ///
    /// - [`SessionError::SessionExpired`] if no refresh token is stored; no
    ///   refresh call is made.
    /// - [`SessionError::RefreshExpired`] if the refresh endpoint answers
    ///   `401`.
    /// - [`SessionError::RefreshFailed`] for any other rejection or an
    ///   unreadable refresh response.
    ///
    /// All three clear the stored tokens. Transport failures are returned as
    /// [`VitalPathError::Http`] and leave the tokens untouched.
    pub async fn refresh_after_unauthorized(&self, rejected_access: &str) -> Result<String> {
        let _guard = self.refresh_lock.lock().await;

        let Some(tokens) = self.store.load()? else {
            // Another caller's refresh failed and cleared the session.
            return Err(VitalPathError::Session(SessionError::SessionExpired).into());
        };

        if tokens.access_token != rejected_access {
            tracing::debug!("Access token already renewed by a concurrent request");
            return Ok(tokens.access_token);
        }

        let refresh_token = match tokens.refresh_token {
            Some(refresh) if !refresh.is_empty() => refresh,
            _ => return self.terminate(SessionError::SessionExpired),
        };

        tracing::debug!(url = %self.refresh_url, "Refreshing access token");
        let response = self
            .http
            .post(self.refresh_url.clone())
            .json(&RefreshRequest {
                refresh: refresh_token.clone(),
            })
            .send()
            .await
            .map_err(VitalPathError::Http)?;

        let status = response.status();
        if status == StatusCode::UNAUTHORIZED {
            tracing::warn!("Refresh token rejected as expired");
            return self.terminate(SessionError::RefreshExpired);
        }
        if !status.is_success() {
            tracing::warn!(status = status.as_u16(), "Token refresh failed");
            return self.terminate(SessionError::RefreshFailed);
        }

        let pair: TokenPair = match response.json().await {
            Ok(pair) => pair,
            Err(e) => {
                tracing::warn!(error = %e, "Token refresh returned an unreadable body");
                return self.terminate(SessionError::RefreshFailed);
            }
        };

        let renewed = SessionTokens {
            access_token: pair.access,
            refresh_token: pair.refresh.or(Some(refresh_token)),
        };
        self.store.save(&renewed)?;
        tracing::info!("Access token refreshed");
        Ok(renewed.access_token)
    }

    fn terminate(&self, kind: SessionError) -> Result<String> {
        self.store.clear()?;
        tracing::info!(code = kind.code(), "Session terminated");
        Err(VitalPathError::Session(kind).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::token_store::MemoryTokenStore;

    fn manager_with(store: Arc<dyn TokenStore>) -> SessionManager {
        SessionManager::new(
            reqwest::Client::new(),
            Url::parse("http://127.0.0.1:9/api/token/refresh/").unwrap(),
            store,
        )
    }

    #[test]
    fn test_access_token_requires_session() {
        let manager = manager_with(Arc::new(MemoryTokenStore::default()));
        let err = manager.access_token().unwrap_err();
        assert_eq!(
            VitalPathError::session_kind(&err),
            Some(SessionError::AuthenticationRequired)
        );
    }

    #[test]
    fn test_establish_and_end() {
        let store = Arc::new(MemoryTokenStore::default());
        let manager = manager_with(store.clone());

        manager
            .establish(&SessionTokens::new("a1", Some("r1".into())))
            .unwrap();
        assert_eq!(manager.access_token().unwrap(), "a1");
        assert!(manager.is_signed_in().unwrap());

        manager.end().unwrap();
        assert!(!manager.is_signed_in().unwrap());
    }

    #[tokio::test]
    async fn test_refresh_without_refresh_token_expires_session() {
        let store = Arc::new(MemoryTokenStore::with_tokens(SessionTokens::new("a1", None)));
        let manager = manager_with(store.clone());

        let err = manager.refresh_after_unauthorized("a1").await.unwrap_err();
        assert_eq!(
            VitalPathError::session_kind(&err),
            Some(SessionError::SessionExpired)
        );
        assert!(store.load().unwrap().is_none(), "tokens must be cleared");
    }

    #[tokio::test]
    async fn test_refresh_reuses_token_renewed_elsewhere() {
        let store = Arc::new(MemoryTokenStore::with_tokens(SessionTokens::new(
            "a2",
            Some("r2".into()),
        )));
        let manager = manager_with(store);

        // The refresh URL is unreachable, so any network call would fail.
        let token = manager.refresh_after_unauthorized("a1").await.unwrap();
        assert_eq!(token, "a2");
    }

    #[tokio::test]
    async fn test_refresh_after_session_cleared_is_expired() {
        let manager = manager_with(Arc::new(MemoryTokenStore::default()));
        let err = manager.refresh_after_unauthorized("a1").await.unwrap_err();
        assert_eq!(
            VitalPathError::session_kind(&err),
            Some(SessionError::SessionExpired)
        );
    }
}
