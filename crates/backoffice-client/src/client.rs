//! Main client implementation.

use std::sync::Arc;
use std::time::Duration;

use reqwest::header::{CONTENT_TYPE, HeaderMap, HeaderValue};
use tracing::{debug, trace};
use url::Url;

use backoffice_session::{MemoryTokenStore, TokenStore};

use crate::api::{AuthApi, ItemsApi, UsersApi};
use crate::error::{Error, ErrorEnvelope, ErrorDetail, Result};

/// Default timeout for requests.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Backoffice API client.
///
/// Provides typed access to the items/users administration endpoints. The
/// bearer token is read from the shared [`TokenStore`] on every request, so
/// a login that lands a new token takes effect immediately on all clones.
///
/// # Example
///
/// ```no_run
/// use backoffice_client::{BackofficeClient, PageParams};
///
/// # async fn example() -> backoffice_client::Result<()> {
/// let client = BackofficeClient::builder()
///     .base_url("http://localhost:8000")
///     .build()?;
///
/// let items = client.items().list(PageParams::page(1, 25).resolve()).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct BackofficeClient {
    /// Inner shared state.
    inner: Arc<ClientInner>,
}

/// Inner client state (shared across clones).
pub(crate) struct ClientInner {
    /// HTTP client.
    pub(crate) http: reqwest::Client,
    /// Base URL for API requests.
    pub(crate) base_url: Url,
    /// Request timeout.
    pub(crate) timeout: Duration,
    /// Session token source for bearer auth.
    pub(crate) tokens: Arc<dyn TokenStore>,
}

impl BackofficeClient {
    /// Create a new client builder.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Get the token store backing bearer auth.
    pub fn tokens(&self) -> &Arc<dyn TokenStore> {
        &self.inner.tokens
    }

    // ─────────────────────────────────────────────────────────────────────────
    // API accessors
    // ─────────────────────────────────────────────────────────────────────────

    /// Access the auth API.
    pub fn auth(&self) -> AuthApi {
        AuthApi::new(self.clone())
    }

    /// Access the users API.
    pub fn users(&self) -> UsersApi {
        UsersApi::new(self.clone())
    }

    /// Access the items API.
    pub fn items(&self) -> ItemsApi {
        ItemsApi::new(self.clone())
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Internal HTTP methods
    // ─────────────────────────────────────────────────────────────────────────

    /// Build a URL for an API path.
    pub(crate) fn url(&self, path: &str) -> Result<Url> {
        let path = path.trim_start_matches('/');
        self.inner
            .base_url
            .join(&format!("api/v1/{}", path))
            .map_err(Error::from)
    }

    /// Build a URL for an API path with one caller-supplied trailing
    /// segment. The segment is percent-encoded, so values containing `/`
    /// or `?` cannot change the path shape.
    pub(crate) fn url_with_segment(&self, path: &str, segment: &str) -> Result<Url> {
        let mut url = self.url(path)?;
        url.path_segments_mut()
            .map_err(|_| Error::Config("base URL cannot hold path segments".to_string()))?
            .push(segment);
        Ok(url)
    }

    /// Attach the bearer token, when one is stored.
    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match self.inner.tokens.get() {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    /// Make a GET request.
    pub(crate) async fn get<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path)?;
        let response = self
            .authorize(self.inner.http.get(url))
            .timeout(self.inner.timeout)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Make a GET request with query parameters.
    pub(crate) async fn get_with_query<T, Q>(&self, path: &str, query: &Q) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        Q: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let response = self
            .authorize(self.inner.http.get(url))
            .query(query)
            .timeout(self.inner.timeout)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Make a POST request with a JSON body.
    pub(crate) async fn post<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let response = self
            .authorize(self.inner.http.post(url))
            .json(body)
            .timeout(self.inner.timeout)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Make a POST request with a form-encoded body.
    pub(crate) async fn post_form<T, B>(&self, path: &str, form: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let response = self
            .authorize(self.inner.http.post(url))
            .form(form)
            .timeout(self.inner.timeout)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Make a POST request with no body.
    pub(crate) async fn post_empty<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path)?;
        self.post_empty_url(url).await
    }

    /// Make a POST request with no body to an already-built URL.
    pub(crate) async fn post_empty_url<T: serde::de::DeserializeOwned>(
        &self,
        url: Url,
    ) -> Result<T> {
        let response = self
            .authorize(self.inner.http.post(url))
            .timeout(self.inner.timeout)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Make a PATCH request.
    pub(crate) async fn patch<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let response = self
            .authorize(self.inner.http.patch(url))
            .json(body)
            .timeout(self.inner.timeout)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Make a PUT request.
    pub(crate) async fn put<T, B>(&self, path: &str, body: &B) -> Result<T>
    where
        T: serde::de::DeserializeOwned,
        B: serde::Serialize + ?Sized,
    {
        let url = self.url(path)?;
        let response = self
            .authorize(self.inner.http.put(url))
            .json(body)
            .timeout(self.inner.timeout)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Make a DELETE request.
    pub(crate) async fn delete<T: serde::de::DeserializeOwned>(&self, path: &str) -> Result<T> {
        let url = self.url(path)?;
        let response = self
            .authorize(self.inner.http.delete(url))
            .timeout(self.inner.timeout)
            .send()
            .await?;
        self.handle_response(response).await
    }

    /// Handle a response, extracting the body or error.
    async fn handle_response<T: serde::de::DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> Result<T> {
        if response.status().is_success() {
            trace!(status = response.status().as_u16(), url = %response.url(), "API request succeeded");
            Ok(response.json().await?)
        } else {
            Err(self.extract_error(response).await)
        }
    }

    /// Extract an error from a failed response.
    async fn extract_error(&self, response: reqwest::Response) -> Error {
        let status = response.status().as_u16();
        debug!(status, url = %response.url(), "API request failed");

        // Try to parse the error envelope; a body in an unexpected shape
        // degrades to a bare status message.
        match response.json::<ErrorEnvelope>().await {
            Ok(envelope) => Error::Api {
                status,
                detail: envelope.detail,
            },
            Err(_) => Error::Api {
                status,
                detail: ErrorDetail::Message(format!("HTTP {}", status)),
            },
        }
    }
}

/// Builder for creating a BackofficeClient.
pub struct ClientBuilder {
    base_url: Option<String>,
    timeout: Duration,
    user_agent: Option<String>,
    tokens: Option<Arc<dyn TokenStore>>,
}

impl ClientBuilder {
    /// Create a new builder with defaults.
    pub fn new() -> Self {
        Self {
            base_url: None,
            timeout: DEFAULT_TIMEOUT,
            user_agent: None,
            tokens: None,
        }
    }

    /// Set the base URL for the server.
    pub fn base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = Some(url.into());
        self
    }

    /// Set the request timeout.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Set a custom user agent.
    pub fn user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = Some(agent.into());
        self
    }

    /// Set the token store used for bearer auth.
    ///
    /// Defaults to an empty in-memory store, i.e. anonymous requests.
    pub fn token_store(mut self, tokens: Arc<dyn TokenStore>) -> Self {
        self.tokens = Some(tokens);
        self
    }

    /// Build the client.
    pub fn build(self) -> Result<BackofficeClient> {
        let base_url = self
            .base_url
            .ok_or_else(|| Error::Config("base_url is required".to_string()))?;

        // Parse and normalize base URL
        let mut base_url = Url::parse(&base_url)?;
        if !base_url.path().ends_with('/') {
            base_url.set_path(&format!("{}/", base_url.path()));
        }

        let mut headers = HeaderMap::new();
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let user_agent = self
            .user_agent
            .unwrap_or_else(|| format!("backoffice-client/{}", env!("CARGO_PKG_VERSION")));

        let http = reqwest::Client::builder()
            .default_headers(headers)
            .user_agent(user_agent)
            .build()?;

        let tokens = self
            .tokens
            .unwrap_or_else(|| Arc::new(MemoryTokenStore::new()));

        Ok(BackofficeClient {
            inner: Arc::new(ClientInner {
                http,
                base_url,
                timeout: self.timeout,
                tokens,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_requires_base_url() {
        let result = ClientBuilder::new().build();
        assert!(result.is_err());
    }

    #[test]
    fn test_builder_with_base_url() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:8000")
            .build()
            .unwrap();

        assert_eq!(client.base_url().as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_builder_normalizes_trailing_slash() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:8000/")
            .build()
            .unwrap();

        assert_eq!(client.base_url().as_str(), "http://localhost:8000/");
    }

    #[test]
    fn test_url_building() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:8000")
            .build()
            .unwrap();

        let url = client.url("items").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/items");

        let url = client.url("/items").unwrap();
        assert_eq!(url.as_str(), "http://localhost:8000/api/v1/items");
    }

    #[test]
    fn test_url_segment_is_percent_encoded() {
        let client = ClientBuilder::new()
            .base_url("http://localhost:8000")
            .build()
            .unwrap();

        let url = client
            .url_with_segment("password-recovery", "a/b?c@example.com")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "http://localhost:8000/api/v1/password-recovery/a%2Fb%3Fc@example.com"
        );
    }
}
