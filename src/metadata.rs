//! Per-request metadata.

use http::{HeaderMap, HeaderName, HeaderValue, Method};

/// Method, path fragment and extra headers for one request.
///
/// `path` is relative to `<base>/api/<version>/<username>/`, for example
/// `feeds/sensors.temp/data/last`.
#[derive(Debug, Clone)]
pub struct RequestMetadata {
    /// The HTTP method.
    pub method: Method,

    /// The path fragment appended to the account prefix.
    pub path: String,

    /// Headers added on top of the client's defaults.
    pub headers: HeaderMap,
}

impl RequestMetadata {
    /// Creates a new `RequestMetadata` with the given method and path fragment.
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            headers: HeaderMap::new(),
        }
    }

    /// Adds a header to the request.
    ///
    /// # Errors
    ///
    /// Returns an error if the header name or value is invalid.
    pub fn with_header(
        mut self,
        name: impl AsRef<str>,
        value: impl AsRef<str>,
    ) -> Result<Self, crate::Error> {
        let name = HeaderName::try_from(name.as_ref())
            .map_err(|e| crate::Error::Configuration(format!("Invalid header name: {}", e)))?;
        let value = HeaderValue::try_from(value.as_ref())
            .map_err(|e| crate::Error::Configuration(format!("Invalid header value: {}", e)))?;
        self.headers.insert(name, value);
        Ok(self)
    }

    /// Adds a header known to be valid at compile time.
    pub fn with_static_header(mut self, name: &'static str, value: &'static str) -> Self {
        self.headers
            .insert(HeaderName::from_static(name), HeaderValue::from_static(value));
        self
    }
}
