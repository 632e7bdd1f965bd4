//! Bearer-token interceptor with a single refresh-and-retry
//!
//! [`AuthInterceptor`] wraps a request factory rather than a built request so
//! the request can be rebuilt (body included) for the retry. The policy is:
//!
//! 1. Attach `Authorization: Bearer <access>` and send.
//! 2. Anything but `401` is returned as is.
//! 3. On `401`, ask the [`SessionManager`] for a replacement token and send
//!    the rebuilt request once more. That second response is returned
//!    whatever its status.

use std::sync::Arc;

use reqwest::{RequestBuilder, Response, StatusCode};

use crate::error::{Result, VitalPathError};
use crate::session::SessionManager;

/// Attaches the session's access token to outgoing requests and retries once
/// after a token refresh.
#[derive(Clone)]
pub struct AuthInterceptor {
    session: Arc<SessionManager>,
}

impl AuthInterceptor {
    /// Creates an interceptor backed by `session`.
    pub fn new(session: Arc<SessionManager>) -> Self {
        Self { session }
    }

    /// Sends the request produced by `build` with bearer authentication.
    ///
    /// `build` is called once per attempt, at most twice.
    ///
    /// # Errors
    ///
    /// - `SessionError::AuthenticationRequired` if no token is stored; `build`
    ///   is never called.
    /// - Any session error raised while refreshing.
    /// - `VitalPathError::Http` on transport failure.
    pub async fn send<F>(&self, build: F) -> Result<Response>
    where
        F: Fn() -> RequestBuilder,
    {
        let access = self.session.access_token()?;

        let response = build()
            .bearer_auth(&access)
            .send()
            .await
            .map_err(VitalPathError::Http)?;

        if response.status() != StatusCode::UNAUTHORIZED {
            return Ok(response);
        }

        tracing::debug!(url = %response.url(), "Access token rejected, attempting refresh");
        let renewed = self.session.refresh_after_unauthorized(&access).await?;

        let retried = build()
            .bearer_auth(&renewed)
            .send()
            .await
            .map_err(VitalPathError::Http)?;
        tracing::debug!(status = retried.status().as_u16(), "Retried request after refresh");
        Ok(retried)
    }
}
