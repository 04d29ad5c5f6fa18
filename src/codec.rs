//! JSON encoding and decoding of resource models.
//!
//! Collection endpoints answer with an array when several resources match and
//! with a bare object when only one does. [`decode_many`] accepts both and
//! always hands back a `Vec`.

use crate::{Error, Result};
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};

/// Encodes a resource to its wire text.
///
/// Unset optional fields are omitted by the models themselves.
pub fn encode<T>(value: &T) -> Result<String>
where
    T: Serialize + ?Sized,
{
    serde_json::to_string(value).map_err(|e| Error::Serialization(e.to_string()))
}

/// Decodes exactly one resource.
///
/// Only a JSON object is accepted; serde would otherwise fill a struct from an
/// array by position.
///
/// # Errors
///
/// Returns [`Error::Decode`] with the raw text if it is not an encoding of `T`.
pub fn decode<T>(text: &str) -> Result<T>
where
    T: DeserializeOwned,
{
    serde_json::from_str::<Map<String, Value>>(text)
        .and_then(from_object)
        .map_err(|e| decode_error(text, e))
}

/// Decodes an array of resources, or a single resource wrapped in a one-element `Vec`.
///
/// The array shape is tried first. Text that is not an array of objects is
/// decoded as a single `T`. Once the array shape matches, an element that does
/// not decode fails the whole call with that element's error.
///
/// # Examples
///
/// ```
/// use aio_http::{codec, Data};
///
/// let many: Vec<Data> = codec::decode_many(r#"[{"value":"1"},{"value":"2"}]"#).unwrap();
/// assert_eq!(many.len(), 2);
///
/// let one: Vec<Data> = codec::decode_many(r#"{"value":"1"}"#).unwrap();
/// assert_eq!(one, vec![Data::new("1")]);
/// ```
pub fn decode_many<T>(text: &str) -> Result<Vec<T>>
where
    T: DeserializeOwned,
{
    match serde_json::from_str::<Vec<Map<String, Value>>>(text) {
        Ok(objects) => objects
            .into_iter()
            .map(from_object)
            .collect::<serde_json::Result<Vec<T>>>()
            .map_err(|e| decode_error(text, e)),
        Err(_) => decode::<T>(text).map(|item| vec![item]),
    }
}

fn from_object<T>(object: Map<String, Value>) -> serde_json::Result<T>
where
    T: DeserializeOwned,
{
    T::deserialize(Value::Object(object))
}

fn decode_error(text: &str, e: serde_json::Error) -> Error {
    tracing::error!(
        error = %e,
        raw_response = %text,
        "Failed to decode response"
    );

    Error::Decode {
        raw_response: text.to_string(),
        serde_error: e.to_string(),
    }
}
