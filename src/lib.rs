//! # aio-http - A typed client for the Adafruit IO REST API
//!
//! `aio-http` wraps the Adafruit IO v2 HTTP API on top of `reqwest`. It
//! authenticates every request with a username / API key pair, composes resource
//! paths, serializes readings with default-value omission, and classifies failed
//! responses into a small error taxonomy.
//!
//! ## Quick Start
//!
//! ```no_run
//! use aio_http::{Client, Coordinate, Data};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), aio_http::Error> {
//!     let client = Client::new("my_username", "my_aio_key")?;
//!
//!     // Push a bare value
//!     client.send_value("sensors.temp", "21.5").await?;
//!
//!     // Push a value with location metadata
//!     let reading = Data::with_coordinates(
//!         "21.7",
//!         Coordinate::try_from(42.026944)?,
//!         Coordinate::try_from(-93.646944)?,
//!         Coordinate::from(900),
//!         None,
//!     );
//!     client.send_data_rounded("sensors.temp", &reading, 2).await?;
//!
//!     // Read the most recent value back
//!     let last = client.receive("sensors.temp").await?;
//!     println!("last value: {}", last.value);
//!
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **Typed resources** - [`Data`], [`Feed`], [`Group`], [`Time`] and [`RandomWord`] mirror the wire shapes exactly
//! - **Default omission** - unset fields never reach the wire; a reading's `value` always does
//! - **Shape-tolerant decoding** - collection endpoints accept a bare object or an array
//! - **Exact coordinates** - [`Coordinate`] keeps decimal precision and rounds half away from zero
//! - **Error classification** - HTTP 429 becomes [`Error::Throttled`], any other 4xx/5xx [`Error::Request`]
//! - **Structured logging** - requests and responses are traced with `tracing`
//!
//! ## Error Handling
//!
//! ```no_run
//! use aio_http::{Client, Error};
//!
//! # async fn example() -> Result<(), Error> {
//! # let client = Client::new("my_username", "my_aio_key")?;
//! match client.receive("sensors.temp").await {
//!     Ok(data) => println!("value: {}", data.value),
//!     Err(Error::Throttled { rate_limit_info, .. }) => {
//!         eprintln!("slow down, retry after {:?}", rate_limit_info.suggested_delay());
//!     }
//!     Err(Error::Request { status, body, .. }) => {
//!         eprintln!("request failed with {}: {}", status, body);
//!     }
//!     Err(e) => eprintln!("other error: {}", e),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! No call is ever retried: every operation performs exactly one round trip and
//! any failure is handed back to the caller unchanged.

mod api;
mod client;
pub mod codec;
pub mod coordinate;
mod error;
pub mod metadata;
mod model;
pub mod rate_limit;
mod response;

pub use client::{Client, ClientBuilder, DEFAULT_API_VERSION, DEFAULT_BASE_URL};
pub use coordinate::Coordinate;
pub use error::{classify, Error, Result, THROTTLED_MESSAGE};
pub use model::{Data, Feed, Group, RandomWord, Time};
pub use response::Response;
