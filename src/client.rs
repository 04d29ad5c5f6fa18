//! HTTP client: request composition, the three verbs, and error classification.
//!
//! The [`Client`] type is the main entry point. Use [`ClientBuilder`] to
//! configure it, or [`Client::new`] for the defaults.

use crate::{codec, error::classify, metadata::RequestMetadata, Error, Response, Result};
use http::{HeaderMap, HeaderName, HeaderValue, Method};
use serde::Serialize;
use std::sync::Arc;
use std::time::{Duration, Instant};
use url::Url;

/// Adafruit IO's public endpoint.
pub const DEFAULT_BASE_URL: &str = "https://io.adafruit.com";

/// The REST API version requests are composed against.
pub const DEFAULT_API_VERSION: &str = "v2";

const KEY_HEADER: &str = "x-aio-key";

/// An authenticated Adafruit IO client.
///
/// Cloning is cheap and every clone shares the same configuration. Nothing is
/// mutated after construction, so a client can be used from many tasks at once.
///
/// # Examples
///
/// ```no_run
/// use aio_http::Client;
/// use std::time::Duration;
///
/// # async fn example() -> Result<(), aio_http::Error> {
/// let client = Client::builder()
///     .username("my_username")
///     .key("my_aio_key")
///     .timeout(Duration::from_secs(10))
///     .build()?;
///
/// let raw = client.get("feeds/sensors.temp/data/last").await?;
/// println!("{}", raw.data);
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    inner: Arc<ClientInner>,
}

struct ClientInner {
    http_client: reqwest::Client,
    base_url: String,
    api_version: String,
    username: String,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
}

impl Client {
    /// Creates a new `ClientBuilder` for configuring a client.
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client for the public endpoint with the given credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a valid header value.
    pub fn new(username: impl Into<String>, key: impl Into<String>) -> Result<Self> {
        ClientBuilder::new().username(username).key(key).build()
    }

    /// The account username requests are composed with.
    pub fn username(&self) -> &str {
        &self.inner.username
    }

    /// Composes `<base>/api/<version>/<username>/<fragment>`.
    ///
    /// This is plain concatenation: nothing is escaped or validated, so an empty
    /// username yields a path with `//` in it.
    ///
    /// # Examples
    ///
    /// ```
    /// use aio_http::Client;
    ///
    /// let client = Client::new("alice", "key").unwrap();
    /// assert_eq!(
    ///     client.compose_url("feeds/sensors.temp/data/last"),
    ///     "https://io.adafruit.com/api/v2/alice/feeds/sensors.temp/data/last"
    /// );
    /// ```
    pub fn compose_url(&self, fragment: &str) -> String {
        format!(
            "{}/api/{}/{}/{}",
            self.inner.base_url, self.inner.api_version, self.inner.username, fragment
        )
    }

    /// Performs one request and returns the body text of a non-error response.
    ///
    /// Every request carries the `X-AIO-Key` header. Responses with status 400 or
    /// above are turned into errors by [`classify`](crate::classify); their body
    /// is never returned as success.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use aio_http::{Client, metadata::RequestMetadata};
    /// use http::Method;
    ///
    /// # async fn example() -> Result<(), aio_http::Error> {
    /// let client = Client::new("my_username", "my_aio_key")?;
    ///
    /// let metadata = RequestMetadata::new(Method::GET, "feeds/sensors.temp/data/chart")
    ///     .with_header("Accept", "application/json")?;
    /// let response = client.call(metadata, None).await?;
    /// println!("{}", response.data);
    /// # Ok(())
    /// # }
    /// ```
    pub async fn call(
        &self,
        metadata: RequestMetadata,
        body: Option<String>,
    ) -> Result<Response<String>> {
        let start_time = Instant::now();

        // Status failures are logged by `read_response`; only the transport is logged here.
        let response = match self.execute_request(&metadata, body).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(
                    error = %e,
                    method = %metadata.method,
                    path = %metadata.path,
                    "Request failed"
                );
                return Err(e);
            }
        };

        self.read_response(response, start_time.elapsed()).await
    }

    async fn execute_request(
        &self,
        metadata: &RequestMetadata,
        body: Option<String>,
    ) -> Result<reqwest::Response> {
        let url = self.compose_url(&metadata.path);

        tracing::debug!(
            method = %metadata.method,
            url = %url,
            "Executing HTTP request"
        );

        let mut request = self.inner.http_client.request(metadata.method.clone(), url);

        for (name, value) in &self.inner.default_headers {
            request = request.header(name, value);
        }

        for (name, value) in &metadata.headers {
            request = request.header(name, value);
        }

        if let Some(timeout) = self.inner.timeout {
            request = request.timeout(timeout);
        }

        if let Some(body) = body {
            request = request.body(body);
        }

        Ok(request.send().await?)
    }

    async fn read_response(
        &self,
        response: reqwest::Response,
        latency: Duration,
    ) -> Result<Response<String>> {
        let status = response.status();
        let headers = response.headers().clone();

        tracing::info!(
            status = status.as_u16(),
            latency_ms = latency.as_millis(),
            "Received HTTP response"
        );

        let failed = status.as_u16() >= 400;

        // A failed response's body is best effort; it only feeds the error.
        let body = if failed {
            response.text().await.unwrap_or_default()
        } else {
            response.text().await?
        };

        if failed {
            if status.as_u16() == 429 {
                tracing::warn!(status = status.as_u16(), "Rate limited");
            } else if status.is_client_error() {
                tracing::error!(
                    status = status.as_u16(),
                    response = %body,
                    "Client error (4xx)"
                );
            } else {
                tracing::warn!(
                    status = status.as_u16(),
                    response = %body,
                    "Server error (5xx)"
                );
            }
        }

        classify(status, &headers, &body)?;

        Ok(Response::new(body, status, headers, latency))
    }

    /// Sends a GET for the path fragment.
    pub async fn get(&self, path: impl Into<String>) -> Result<Response<String>> {
        self.call(RequestMetadata::new(Method::GET, path), None).await
    }

    /// Encodes `body` as JSON and POSTs it to the path fragment.
    pub async fn post<T>(&self, path: impl Into<String>, body: &T) -> Result<Response<String>>
    where
        T: Serialize + ?Sized,
    {
        let payload = codec::encode(body)?;
        let metadata = RequestMetadata::new(Method::POST, path)
            .with_static_header("content-type", "application/json");
        self.call(metadata, Some(payload)).await
    }

    /// Sends a DELETE for the path fragment.
    pub async fn delete(&self, path: impl Into<String>) -> Result<Response<String>> {
        self.call(RequestMetadata::new(Method::DELETE, path), None).await
    }
}

/// Builder for configuring and creating a [`Client`].
///
/// # Examples
///
/// ```no_run
/// use aio_http::ClientBuilder;
/// use std::time::Duration;
///
/// # fn example() -> Result<(), aio_http::Error> {
/// let client = ClientBuilder::new()
///     .base_url("https://io.adafruit.com")?
///     .api_version("v2")
///     .username("my_username")
///     .key("my_aio_key")
///     .timeout(Duration::from_secs(30))
///     .default_header("User-Agent", "greenhouse/1.0")?
///     .build()?;
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    base_url: Option<Url>,
    api_version: String,
    username: String,
    key: String,
    default_headers: HeaderMap,
    timeout: Option<Duration>,
}

impl ClientBuilder {
    /// Creates a new `ClientBuilder` with default settings and empty credentials.
    pub fn new() -> Self {
        Self {
            base_url: None,
            api_version: DEFAULT_API_VERSION.to_string(),
            username: String::new(),
            key: String::new(),
            default_headers: HeaderMap::new(),
            timeout: None,
        }
    }

    /// Creates a builder from `AIO_USERNAME`, `AIO_KEY` and, if set, `AIO_BASE_URL`.
    ///
    /// # Errors
    ///
    /// Returns an error if either credential is missing or the base URL is invalid.
    pub fn from_env() -> Result<Self> {
        let var = |name: &str| {
            std::env::var(name)
                .map_err(|e| Error::Configuration(format!("{} is not usable: {}", name, e)))
        };

        let mut builder = Self::new()
            .username(var("AIO_USERNAME")?)
            .key(var("AIO_KEY")?);

        if let Ok(base_url) = std::env::var("AIO_BASE_URL") {
            builder = builder.base_url(base_url)?;
        }

        Ok(builder)
    }

    /// Sets the service root. Defaults to [`DEFAULT_BASE_URL`].
    ///
    /// # Errors
    ///
    /// Returns an error if the URL is invalid.
    pub fn base_url(mut self, url: impl AsRef<str>) -> Result<Self> {
        self.base_url = Some(Url::parse(url.as_ref())?);
        Ok(self)
    }

    /// Sets the API version segment. Defaults to [`DEFAULT_API_VERSION`].
    pub fn api_version(mut self, version: impl Into<String>) -> Self {
        self.api_version = version.into();
        self
    }

    /// Sets the account username. Not validated; an empty name is accepted.
    pub fn username(mut self, username: impl Into<String>) -> Self {
        self.username = username.into();
        self
    }

    /// Sets the API key sent as `X-AIO-Key`.
    pub fn key(mut self, key: impl Into<String>) -> Self {
        self.key = key.into();
        self
    }

    /// Adds a default header that will be included in all requests.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn default_header(mut self, name: impl AsRef<str>, value: impl AsRef<str>) -> Result<Self> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| Error::Configuration(format!("Invalid header value: {}", e)))?;
        self.default_headers.insert(name, value);
        Ok(self)
    }

    /// Sets the transport timeout applied to each request.
    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Builds the configured `Client`.
    ///
    /// # Errors
    ///
    /// Returns an error if the key is not a valid header value or the HTTP
    /// client cannot be created.
    pub fn build(self) -> Result<Client> {
        let base_url = match self.base_url {
            Some(url) => url,
            None => Url::parse(DEFAULT_BASE_URL)?,
        };

        let mut key = HeaderValue::try_from(self.key)
            .map_err(|e| Error::Configuration(format!("Invalid API key: {}", e)))?;
        key.set_sensitive(true);

        let mut default_headers = self.default_headers;
        default_headers.insert(HeaderName::from_static(KEY_HEADER), key);

        let http_client = reqwest::Client::builder().build().map_err(|e| {
            Error::Configuration(format!("Failed to build HTTP client: {}", e))
        })?;

        Ok(Client {
            inner: Arc::new(ClientInner {
                http_client,
                base_url: base_url.as_str().trim_end_matches('/').to_string(),
                api_version: self.api_version,
                username: self.username,
                default_headers,
                timeout: self.timeout,
            }),
        })
    }
}

impl Default for ClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}
