//! Typed client for the VitalPath REST API
//!
//! Register and login are unauthenticated. Consent attaches the stored token
//! directly without the refresh retry. Every discovery and dashboard call goes
//! through the [`AuthInterceptor`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::StatusCode;
use url::Url;

use crate::api::auth::AuthInterceptor;
use crate::api::response::{ensure_success, json_body};
use crate::api::types::{
    ConsentRequest, Credentials, DashboardEntry, DiscoveryProfile, LoginResponse, WellnessScores,
};
use crate::config::{ApiConfig, Config};
use crate::error::{Result, VitalPathError};
use crate::session::{open_token_store, SessionManager, SessionTokens, TokenStore};

const REGISTER_PATH: &str = "api/users/register/";
const LOGIN_PATH: &str = "api/users/login/";
const REFRESH_PATH: &str = "api/token/refresh/";
const CONSENT_PATH: &str = "api/consent/";
const DISCOVERY_PATH: &str = "api/discovery/";
const DISCOVERY_ME_PATH: &str = "api/discovery/me/";
const DASHBOARD_PATH: &str = "api/dashboard/";
const HEALTH_PATH: &str = "healthz/";

/// Client for the VitalPath backend.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use vitalpath::api::ApiClient;
/// use vitalpath::config::ApiConfig;
/// use vitalpath::session::MemoryTokenStore;
///
/// # async fn example() -> vitalpath::error::Result<()> {
/// let client = ApiClient::new(&ApiConfig::default(), Arc::new(MemoryTokenStore::default()))?;
/// client.login("alex@example.com", "correct horse").await?;
/// let entries = client.list_dashboard_entries().await?;
/// println!("{} check-ins", entries.len());
/// # Ok(())
/// # }
/// ```
pub struct ApiClient {
    http: reqwest::Client,
    base_url: Url,
    session: Arc<SessionManager>,
    auth: AuthInterceptor,
}

impl ApiClient {
    /// Builds a client for `config.base_url` whose session lives in `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the base URL does not parse or the HTTP client
    /// cannot be built.
    pub fn new(config: &ApiConfig, store: Arc<dyn TokenStore>) -> Result<Self> {
        let base_url = normalize_base_url(&config.base_url)?;
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(concat!("vitalpath/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(VitalPathError::Http)?;

        let refresh_url = base_url.join(REFRESH_PATH)?;
        let session = Arc::new(SessionManager::new(http.clone(), refresh_url, store));
        let auth = AuthInterceptor::new(Arc::clone(&session));

        Ok(Self {
            http,
            base_url,
            session,
            auth,
        })
    }

    /// Builds a client from the full configuration, opening the configured
    /// token store.
    pub fn from_config(config: &Config) -> Result<Self> {
        let store = open_token_store(config)?;
        Self::new(&config.api, store)
    }

    /// The session coordinator shared by every authenticated call.
    pub fn session(&self) -> &Arc<SessionManager> {
        &self.session
    }

    /// Base URL all endpoints are resolved against.
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> Result<Url> {
        Ok(self.base_url.join(path)?)
    }

    // -----------------------------------------------------------------------
    // Authentication
    // -----------------------------------------------------------------------

    /// Creates an account. Does not sign in.
    ///
    /// # Errors
    ///
    /// Returns `VitalPathError::Api` with the server's first field message
    /// (for example a duplicate email) when registration is rejected.
    pub async fn register(&self, email: &str, password: &str) -> Result<()> {
        let url = self.endpoint(REGISTER_PATH)?;
        tracing::info!(email, "Registering account");
        let response = self
            .http
            .post(url)
            .json(&Credentials {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(VitalPathError::Http)?;
        ensure_success(response).await?;
        Ok(())
    }

    /// Signs in and stores the issued tokens.
    pub async fn login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        let url = self.endpoint(LOGIN_PATH)?;
        tracing::info!(email, "Signing in");
        let response = self
            .http
            .post(url)
            .json(&Credentials {
                email: email.to_string(),
                password: password.to_string(),
            })
            .send()
            .await
            .map_err(VitalPathError::Http)?;
        let login: LoginResponse = json_body(response).await?;
        self.session
            .establish(&SessionTokens::new(login.access.clone(), login.refresh.clone()))?;
        Ok(login)
    }

    /// Creates an account, then signs in with the same credentials.
    pub async fn register_and_login(&self, email: &str, password: &str) -> Result<LoginResponse> {
        self.register(email, password).await?;
        self.login(email, password).await
    }

    /// Forgets the stored tokens.
    pub fn logout(&self) -> Result<()> {
        self.session.end()
    }

    /// Records acceptance of the study's informed consent.
    ///
    /// The stored access token is attached directly; an expired token is
    /// reported as an API error rather than refreshed.
    pub async fn give_consent(&self) -> Result<()> {
        let access = self.session.access_token()?;
        let url = self.endpoint(CONSENT_PATH)?;
        let response = self
            .http
            .post(url)
            .bearer_auth(access)
            .json(&ConsentRequest { accepted: true })
            .send()
            .await
            .map_err(VitalPathError::Http)?;
        ensure_success(response).await?;
        tracing::info!("Consent recorded");
        Ok(())
    }

    // -----------------------------------------------------------------------
    // Discovery
    // -----------------------------------------------------------------------

    /// Submits the onboarding questionnaire.
    pub async fn create_discovery(&self, profile: &DiscoveryProfile) -> Result<DiscoveryProfile> {
        let url = self.endpoint(DISCOVERY_PATH)?;
        let response = self
            .auth
            .send(|| self.http.post(url.clone()).json(profile))
            .await?;
        json_body(response).await
    }

    /// Replaces the signed-in user's questionnaire.
    pub async fn update_discovery(&self, profile: &DiscoveryProfile) -> Result<DiscoveryProfile> {
        let url = self.endpoint(DISCOVERY_ME_PATH)?;
        let response = self
            .auth
            .send(|| self.http.put(url.clone()).json(profile))
            .await?;
        json_body(response).await
    }

    /// Fetches the signed-in user's questionnaire, or `None` if it has not
    /// been submitted yet.
    pub async fn fetch_discovery(&self) -> Result<Option<DiscoveryProfile>> {
        let url = self.endpoint(DISCOVERY_ME_PATH)?;
        let response = self.auth.send(|| self.http.get(url.clone())).await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        json_body(response).await.map(Some)
    }

    // -----------------------------------------------------------------------
    // Dashboard
    // -----------------------------------------------------------------------

    /// Appends a wellness snapshot.
    pub async fn create_dashboard_entry(&self, scores: &WellnessScores) -> Result<DashboardEntry> {
        let url = self.endpoint(DASHBOARD_PATH)?;
        let response = self
            .auth
            .send(|| self.http.post(url.clone()).json(scores))
            .await?;
        json_body(response).await
    }

    /// Lists every wellness snapshot in the order the server returns them.
    pub async fn list_dashboard_entries(&self) -> Result<Vec<DashboardEntry>> {
        let url = self.endpoint(DASHBOARD_PATH)?;
        let response = self.auth.send(|| self.http.get(url.clone())).await?;
        json_body(response).await
    }

    // -----------------------------------------------------------------------
    // Operations
    // -----------------------------------------------------------------------

    /// Returns `true` when the backend's health check answers with success.
    pub async fn health(&self) -> Result<bool> {
        let url = self.endpoint(HEALTH_PATH)?;
        let response = self.http.get(url).send().await.map_err(VitalPathError::Http)?;
        Ok(response.status().is_success())
    }
}

/// Parses `raw` and guarantees a trailing slash so relative joins keep any
/// path prefix (`https://host/backend` + `api/...`).
fn normalize_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw.trim())?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
