//! Error types and HTTP status classification.
//!
//! Every failure surfaces as one [`Error`] variant. Transport failures come from
//! `reqwest`, status failures from [`classify`], and shape mismatches from the
//! [`codec`](crate::codec) layer. Nothing is retried or recovered locally.

use crate::rate_limit::RateLimitInfo;
use http::{HeaderMap, StatusCode};

/// The advisory carried by every [`Error::Throttled`].
pub const THROTTLED_MESSAGE: &str = "Exceeded the limit of Adafruit IO requests in a short period \
     of time. Please reduce the rate of requests and try again later.";

/// The main error type for Adafruit IO calls.
///
/// # Examples
///
/// ```no_run
/// use aio_http::{Client, Error};
///
/// # async fn example() -> Result<(), Error> {
/// let client = Client::new("my_username", "my_aio_key")?;
///
/// match client.receive("sensors.temp").await {
///     Ok(data) => println!("value: {}", data.value),
///     Err(Error::Decode { raw_response, serde_error }) => {
///         eprintln!("unexpected payload {}: {}", raw_response, serde_error);
///     }
///     Err(Error::Request { status, body, .. }) => {
///         eprintln!("HTTP error {}: {}", status, body);
///     }
///     Err(e) => eprintln!("Other error: {}", e),
/// }
/// # Ok(())
/// # }
/// ```
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// The connection could not be completed at all (DNS, TLS, refused, timed out).
    #[error("Transport error: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered HTTP 429.
    ///
    /// `rate_limit_info` holds whatever rate limit hints the response carried.
    /// The client never waits on them; they are informational for the caller.
    #[error("{message}")]
    Throttled {
        /// Advisory text, always [`THROTTLED_MESSAGE`]
        message: String,
        /// Rate limit hints parsed from the response headers
        rate_limit_info: RateLimitInfo,
    },

    /// The service answered with any other status >= 400.
    #[error("Adafruit IO request failed: {} {reason} {body}", .status.as_u16())]
    Request {
        /// The HTTP status code
        status: StatusCode,
        /// The short reason phrase for `status`, empty when unknown
        reason: String,
        /// The response body text
        body: String,
    },

    /// A response body did not match the expected resource shape.
    #[error("Failed to decode response: {serde_error}")]
    Decode {
        /// The body text that failed to decode
        raw_response: String,
        /// The serde error message
        serde_error: String,
    },

    /// A resource could not be encoded for sending.
    #[error("Failed to serialize request: {0}")]
    Serialization(String),

    /// Invalid client configuration, such as a header value that is not valid ASCII.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// The base URL could not be parsed.
    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    /// A coordinate was not a finite plain decimal.
    #[error("Invalid coordinate: {0}")]
    InvalidCoordinate(String),
}

impl Error {
    /// Returns the HTTP status code for status-classified errors.
    ///
    /// `Throttled` always reports 429.
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            Error::Request { status, .. } => Some(*status),
            Error::Throttled { .. } => Some(StatusCode::TOO_MANY_REQUESTS),
            _ => None,
        }
    }

    /// Returns the raw response body if this error carries one.
    pub fn raw_response(&self) -> Option<&str> {
        match self {
            Error::Request { body, .. } => Some(body),
            Error::Decode { raw_response, .. } => Some(raw_response),
            _ => None,
        }
    }

    /// Returns `true` for [`Error::Throttled`].
    pub fn is_throttled(&self) -> bool {
        matches!(self, Error::Throttled { .. })
    }
}

/// A specialized `Result` type for Adafruit IO calls.
pub type Result<T> = std::result::Result<T, Error>;

/// Maps an HTTP outcome onto the error taxonomy.
///
/// 429 is [`Error::Throttled`], any other status of 400 or above is
/// [`Error::Request`], and everything below 400 passes.
///
/// # Examples
///
/// ```
/// use aio_http::{classify, Error};
/// use http::{HeaderMap, StatusCode};
///
/// assert!(classify(StatusCode::OK, &HeaderMap::new(), "{}").is_ok());
///
/// let err = classify(StatusCode::NOT_FOUND, &HeaderMap::new(), "missing").unwrap_err();
/// assert!(matches!(err, Error::Request { ref body, .. } if body == "missing"));
/// ```
pub fn classify(status: StatusCode, headers: &HeaderMap, body: &str) -> Result<()> {
    if status == StatusCode::TOO_MANY_REQUESTS {
        return Err(Error::Throttled {
            message: THROTTLED_MESSAGE.to_string(),
            rate_limit_info: RateLimitInfo::from_headers(headers),
        });
    }

    if status.as_u16() >= 400 {
        return Err(Error::Request {
            status,
            reason: status.canonical_reason().unwrap_or_default().to_string(),
            body: body.to_string(),
        });
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use http::HeaderValue;
    use std::time::Duration;

    #[test]
    fn test_success_and_redirect_statuses_pass() {
        let headers = HeaderMap::new();
        for code in [200u16, 201, 204, 301, 304, 399] {
            let status = StatusCode::from_u16(code).unwrap();
            assert!(classify(status, &headers, "").is_ok(), "{} should pass", code);
        }
    }

    #[test]
    fn test_429_is_throttled() {
        let mut headers = HeaderMap::new();
        headers.insert("retry-after", HeaderValue::from_static("30"));

        let err = classify(StatusCode::TOO_MANY_REQUESTS, &headers, "slow down").unwrap_err();

        assert!(err.is_throttled());
        assert_eq!(err.status(), Some(StatusCode::TOO_MANY_REQUESTS));
        assert_eq!(
            err.to_string(),
            "Exceeded the limit of Adafruit IO requests in a short period of time. \
             Please reduce the rate of requests and try again later."
        );
        match err {
            Error::Throttled {
                message,
                rate_limit_info,
            } => {
                assert_eq!(message, THROTTLED_MESSAGE);
                assert_eq!(rate_limit_info.retry_after, Some(Duration::from_secs(30)));
            }
            other => panic!("Expected Throttled, got {:?}", other),
        }
    }

    #[test]
    fn test_404_carries_status_reason_and_body() {
        let err = classify(StatusCode::NOT_FOUND, &HeaderMap::new(), "not found").unwrap_err();

        match &err {
            Error::Request {
                status,
                reason,
                body,
            } => {
                assert_eq!(status.as_u16(), 404);
                assert_eq!(reason, "Not Found");
                assert_eq!(body, "not found");
            }
            other => panic!("Expected Request, got {:?}", other),
        }
        assert_eq!(
            err.to_string(),
            "Adafruit IO request failed: 404 Not Found not found"
        );
        assert_eq!(err.raw_response(), Some("not found"));
        assert!(!err.is_throttled());
    }

    #[test]
    fn test_5xx_is_request_error() {
        let err = classify(StatusCode::BAD_GATEWAY, &HeaderMap::new(), "").unwrap_err();
        assert!(matches!(err, Error::Request { status, .. } if status.as_u16() == 502));
    }

    #[test]
    fn test_unknown_status_has_empty_reason() {
        let status = StatusCode::from_u16(499).unwrap();
        let err = classify(status, &HeaderMap::new(), "").unwrap_err();
        assert!(matches!(err, Error::Request { ref reason, .. } if reason.is_empty()));
    }
}
