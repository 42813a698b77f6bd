//! Client construction and shared state
//!
//! A [`Client`] is a cheaply clonable handle intended to be shared across
//! tasks. Construction never performs network I/O; authentication happens
//! afterwards through [`Client::token`].
//!
//! The token and the service catalog live behind one `RwLock` so a refresh
//! publishes both atomically: no caller can observe a new token paired with
//! a stale catalog or vice versa. A separate mutex coalesces concurrent
//! refreshes into a single round-trip.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tokio::sync::{Mutex, RwLock};
use url::Url;

use crate::auth::{self, Credential, Token, TokenService};
use crate::catalog::{self, ServiceCatalog};
use crate::error::{Error, Result};

/// Production API gateway.
pub const DEFAULT_API_URL: &str = "https://manage.bizflycloud.vn";

/// Default region when none is configured.
pub const DEFAULT_REGION: &str = "HN";

const DEFAULT_USER_AGENT: &str = concat!("bizfly-sdk-rs/", env!("CARGO_PKG_VERSION"));

/// Mutable authentication state, published atomically as one unit.
pub(crate) struct AuthState {
    pub token: Option<Token>,
    pub catalog: ServiceCatalog,
    pub credential: Option<Credential>,
}

pub(crate) struct ClientInner {
    pub api_url: String,
    pub region: String,
    pub project_id: Option<String>,
    pub user_agent: String,
    pub http: reqwest::Client,
    pub state: RwLock<AuthState>,
    /// Single-slot coalescing guard for token refresh: one writer, many
    /// waiters. Held only across the refresh round-trips, never across
    /// ordinary request dispatch.
    pub refresh_lock: Mutex<()>,
}

/// Handle to the provider's API. Clone freely; clones share state.
#[derive(Clone)]
pub struct Client {
    pub(crate) inner: Arc<ClientInner>,
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("api_url", &self.inner.api_url)
            .field("region", &self.inner.region)
            .field("project_id", &self.inner.project_id)
            .finish_non_exhaustive()
    }
}

/// Builder for [`Client`]. All options are optional except that the API URL
/// must parse as an absolute URL.
pub struct ClientBuilder {
    api_url: String,
    region: String,
    project_id: Option<String>,
    user_agent: Option<String>,
    http: Option<reqwest::Client>,
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl ClientBuilder {
    pub fn new() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            region: DEFAULT_REGION.to_string(),
            project_id: None,
            user_agent: None,
            http: None,
        }
    }

    /// Absolute URL of the provider's API gateway.
    pub fn api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    /// Region code (e.g. `HN`, `HCM`); selects which catalog rows apply.
    pub fn region(mut self, region: impl Into<String>) -> Self {
        self.region = region.into();
        self
    }

    /// Tenant/project identifier, sent as `X-Project-Id` on every request.
    pub fn project_id(mut self, project_id: impl Into<String>) -> Self {
        self.project_id = Some(project_id.into());
        self
    }

    /// Overrides the default user-agent string.
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = Some(user_agent.into());
        self
    }

    /// Caller-supplied transport, for tests or custom TLS setups.
    pub fn http_client(mut self, http: reqwest::Client) -> Self {
        self.http = Some(http);
        self
    }

    /// Validate the configuration and build the client. No network I/O.
    pub fn build(self) -> Result<Client> {
        let parsed = Url::parse(&self.api_url)
            .map_err(|e| Error::Configuration(format!("invalid API URL '{}': {e}", self.api_url)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(Error::Configuration(format!(
                "unsupported API URL scheme '{}'",
                parsed.scheme()
            )));
        }
        if self.region.is_empty() {
            return Err(Error::Configuration("region must not be empty".to_string()));
        }

        let http = match self.http {
            Some(http) => http,
            None => reqwest::Client::builder()
                .build()
                .map_err(|e| Error::Configuration(format!("failed to build HTTP client: {e}")))?,
        };

        Ok(Client {
            inner: Arc::new(ClientInner {
                api_url: self.api_url,
                region: self.region,
                project_id: self.project_id,
                user_agent: self
                    .user_agent
                    .unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
                http,
                state: RwLock::new(AuthState {
                    token: None,
                    catalog: ServiceCatalog::new(),
                    credential: None,
                }),
                refresh_lock: Mutex::new(()),
            }),
        })
    }
}

impl Client {
    /// Start building a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// A client against the production gateway with default options.
    pub fn new() -> Result<Self> {
        ClientBuilder::new().build()
    }

    /// Token manager façade: authenticate, refresh, inspect.
    pub fn token(&self) -> TokenService<'_> {
        TokenService::new(self)
    }

    /// Configured API gateway URL.
    pub fn api_url(&self) -> &str {
        &self.inner.api_url
    }

    /// Configured region code.
    pub fn region(&self) -> &str {
        &self.inner.region
    }

    /// Configured project identifier, if any.
    pub fn project_id(&self) -> Option<&str> {
        self.inner.project_id.as_deref()
    }

    /// Inject a pre-obtained keystone token (e.g. from a federated flow)
    /// and populate the service catalog.
    ///
    /// Without a stored credential the client cannot re-mint on 401; the
    /// caller owns replacing an expired injected token.
    pub async fn set_token(&self, token: impl Into<String>) -> Result<()> {
        let token = Token {
            value: token.into(),
            expires_at: None,
        };
        let catalog = catalog::fetch_catalog(
            &self.inner.http,
            &self.inner.api_url,
            &self.inner.region,
            None,
        )
        .await?;

        let mut state = self.inner.state.write().await;
        state.token = Some(token);
        state.catalog = catalog;
        Ok(())
    }

    /// Fetch the catalog again with the current credential and publish it
    /// together with the current token.
    pub async fn refresh_service_catalog(&self) -> Result<()> {
        let credential = self.inner.state.read().await.credential.clone();
        let catalog = catalog::fetch_catalog(
            &self.inner.http,
            &self.inner.api_url,
            &self.inner.region,
            credential.as_ref(),
        )
        .await?;

        let mut state = self.inner.state.write().await;
        state.catalog = catalog;
        Ok(())
    }

    /// Full authentication: store the credential, mint a token, fetch the
    /// catalog, publish both.
    pub(crate) async fn authenticate_with(&self, credential: Credential) -> Result<String> {
        let token = auth::mint_token(&self.inner.http, &self.inner.api_url, &credential).await?;
        let catalog = catalog::fetch_catalog(
            &self.inner.http,
            &self.inner.api_url,
            &self.inner.region,
            Some(&credential),
        )
        .await?;

        let value = token.value.clone();
        let mut state = self.inner.state.write().await;
        state.credential = Some(credential);
        state.token = Some(token);
        state.catalog = catalog;
        Ok(value)
    }

    /// Coalesced refresh.
    ///
    /// `observed` is the token the caller saw fail with 401, if any. The
    /// first caller through the guard re-authenticates; waiters find the
    /// published token already differs from the one they observed and reuse
    /// it without another round-trip. An explicit refresh passes `None` and
    /// always re-mints.
    pub(crate) async fn refresh_auth(&self, observed: Option<&str>) -> Result<String> {
        let _guard = self.inner.refresh_lock.lock().await;

        if let Some(observed) = observed {
            let state = self.inner.state.read().await;
            if let Some(token) = &state.token {
                if token.value != observed {
                    return Ok(token.value.clone());
                }
            }
        }

        let credential = self
            .inner
            .state
            .read()
            .await
            .credential
            .clone()
            .ok_or_else(|| {
                Error::Configuration(
                    "no credential stored; authenticate with token().init() first".to_string(),
                )
            })?;

        tracing::debug!("refreshing token and service catalog");
        let token = auth::mint_token(&self.inner.http, &self.inner.api_url, &credential).await?;
        let catalog = catalog::fetch_catalog(
            &self.inner.http,
            &self.inner.api_url,
            &self.inner.region,
            Some(&credential),
        )
        .await?;

        let value = token.value.clone();
        let mut state = self.inner.state.write().await;
        state.token = Some(token);
        state.catalog = catalog;
        Ok(value)
    }

    /// The cached token string without network I/O.
    pub(crate) async fn current_token(&self) -> Option<String> {
        self.inner
            .state
            .read()
            .await
            .token
            .as_ref()
            .map(|t| t.value.clone())
    }

    /// Server-reported expiry of the cached token.
    pub(crate) async fn token_expiry(&self) -> Option<DateTime<Utc>> {
        self.inner
            .state
            .read()
            .await
            .token
            .as_ref()
            .and_then(|t| t.expires_at)
    }

    /// Copy out the resolved URL and token in one short read section, so a
    /// request never pairs a token from one refresh with a catalog from
    /// another. The lock is not held across the HTTP call.
    pub(crate) async fn snapshot(&self, service: &str, path: &str) -> Result<(String, Option<String>)> {
        let state = self.inner.state.read().await;
        let url = catalog::resolve(&state.catalog, service, path)?;
        let token = state.token.as_ref().map(|t| t.value.clone());
        Ok((url, token))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults() {
        let client = Client::new().unwrap();
        assert_eq!(client.api_url(), DEFAULT_API_URL);
        assert_eq!(client.region(), DEFAULT_REGION);
        assert!(client.project_id().is_none());
    }

    #[test]
    fn test_builder_rejects_malformed_url() {
        let err = Client::builder().api_url("not a url").build().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_builder_rejects_non_http_scheme() {
        let err = Client::builder()
            .api_url("ftp://example.com")
            .build()
            .unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[test]
    fn test_builder_rejects_empty_region() {
        let err = Client::builder().region("").build().unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }

    #[tokio::test]
    async fn test_unauthenticated_snapshot_fails_without_io() {
        let client = Client::builder()
            .api_url("https://example.invalid")
            .build()
            .unwrap();
        let err = client.snapshot("cloud_server", "/servers").await.unwrap_err();
        assert!(matches!(err, Error::Configuration(_)));
    }
}
