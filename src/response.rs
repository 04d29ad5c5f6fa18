//! Response wrapper that keeps transport details next to the body.

use http::{HeaderMap, StatusCode};
use std::time::Duration;

/// A successful (non-error) HTTP response.
///
/// The low-level HTTP operations on [`Client`](crate::Client) return
/// `Response<String>` so callers can look at headers and timing as well as the body.
///
/// # Examples
///
/// ```no_run
/// use aio_http::Client;
///
/// # async fn example() -> Result<(), aio_http::Error> {
/// let client = Client::new("my_username", "my_aio_key")?;
///
/// let response = client.get("feeds/sensors.temp/data/last").await?;
/// println!("{} in {:?}: {}", response.status, response.latency, response.data);
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct Response<T> {
    /// The response payload.
    pub data: T,

    /// The HTTP status code of the response.
    pub status: StatusCode,

    /// The response headers.
    pub headers: HeaderMap,

    /// Time from sending the request until the body was read.
    pub latency: Duration,
}

impl<T> Response<T> {
    /// Creates a new `Response`.
    pub fn new(data: T, status: StatusCode, headers: HeaderMap, latency: Duration) -> Self {
        Self {
            data,
            status,
            headers,
            latency,
        }
    }

    /// Consumes the response and returns the payload.
    pub fn into_data(self) -> T {
        self.data
    }

    /// Returns a header value by name, if present and valid UTF-8.
    ///
    /// # Examples
    ///
    /// ```
    /// # use aio_http::Response;
    /// # use http::{HeaderMap, StatusCode, HeaderValue};
    /// # use std::time::Duration;
    /// let mut headers = HeaderMap::new();
    /// headers.insert("content-type", HeaderValue::from_static("application/json"));
    ///
    /// let response = Response::new((), StatusCode::OK, headers, Duration::from_millis(100));
    ///
    /// assert_eq!(response.header("content-type"), Some("application/json"));
    /// ```
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)?.to_str().ok()
    }
}

impl<T> AsRef<T> for Response<T> {
    fn as_ref(&self) -> &T {
        &self.data
    }
}

impl<T> std::ops::Deref for Response<T> {
    type Target = T;

    fn deref(&self) -> &Self::Target {
        &self.data
    }
}
