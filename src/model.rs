//! Resource models and their wire shapes.
//!
//! Field names are the Adafruit IO JSON field names. Every optional field is
//! skipped on encode while unset, so only what the caller filled in reaches the
//! wire. A reading's `value` is the one exception and is always sent.

use crate::coordinate::{self, Coordinate};
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::fmt;

/// One reading on a feed: a value plus optional location metadata.
///
/// Location metadata is carried as text so trailing zeros survive. Use
/// [`Data::with_coordinates`] to build it from numbers, or set the text directly.
///
/// # Examples
///
/// ```
/// use aio_http::{codec, Data};
///
/// let reading = Data::with_metadata("21.5", Some("42.50"), None, None, None);
/// assert_eq!(codec::encode(&reading).unwrap(), r#"{"value":"21.5","lat":"42.50"}"#);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Data {
    /// The reading itself. Sent even when empty.
    #[serde(default, deserialize_with = "text_or_number")]
    pub value: String,

    /// Latitude as decimal text
    #[serde(
        default,
        deserialize_with = "optional_text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub lat: Option<String>,

    /// Longitude as decimal text
    #[serde(
        default,
        deserialize_with = "optional_text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub lon: Option<String>,

    /// Elevation as decimal text
    #[serde(
        default,
        deserialize_with = "optional_text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub ele: Option<String>,

    /// Caller-supplied timestamp for the reading
    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    // Server-assigned fields below.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_epoch: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub completed_at: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub feed_id: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiration: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub position: Option<String>,
}

impl Data {
    /// Creates a reading with only a value.
    pub fn new(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
            ..Default::default()
        }
    }

    /// Creates a reading with text metadata, used verbatim.
    pub fn with_metadata(
        value: impl Into<String>,
        lat: Option<&str>,
        lon: Option<&str>,
        ele: Option<&str>,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        Self {
            value: value.into(),
            lat: lat.map(str::to_string),
            lon: lon.map(str::to_string),
            ele: ele.map(str::to_string),
            created_at,
            ..Default::default()
        }
    }

    /// Creates a reading from numeric coordinates.
    ///
    /// A coordinate equal to zero is treated as absent and left unset, so it is
    /// omitted from the wire rather than sent as `"0"`.
    ///
    /// ```
    /// use aio_http::{Coordinate, Data};
    ///
    /// let reading = Data::with_coordinates(
    ///     "on",
    ///     Coordinate::try_from(42.5).unwrap(),
    ///     Coordinate::from(0),
    ///     Coordinate::from(900),
    ///     None,
    /// );
    /// assert_eq!(reading.lat.as_deref(), Some("42.5"));
    /// assert_eq!(reading.lon, None);
    /// assert_eq!(reading.ele.as_deref(), Some("900"));
    /// ```
    pub fn with_coordinates(
        value: impl Into<String>,
        lat: Coordinate,
        lon: Coordinate,
        ele: Coordinate,
        created_at: Option<DateTime<Utc>>,
    ) -> Self {
        let present = |c: Coordinate| (!c.is_zero()).then(|| c.to_string());

        Self {
            value: value.into(),
            lat: present(lat),
            lon: present(lon),
            ele: present(ele),
            created_at,
            ..Default::default()
        }
    }

    /// Returns a copy with `lat`, `lon` and `ele` rounded to `precision` fractional digits.
    ///
    /// Metadata that is absent or not a decimal becomes absent.
    pub fn rounded(&self, precision: u32) -> Data {
        Data {
            lat: coordinate::round_text(self.lat.as_deref(), precision),
            lon: coordinate::round_text(self.lon.as_deref(), precision),
            ele: coordinate::round_text(self.ele.as_deref(), precision),
            ..self.clone()
        }
    }
}

impl fmt::Display for Data {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// A named time-series channel.
///
/// `key` is the server-assigned slug used in request paths.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Feed {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_type: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit_symbol: Option<String>,

    /// Whether the service keeps history for this feed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub history: Option<bool>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub visibility: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_notify: Option<bool>,

    /// Minutes of silence before the feed is reported offline
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_timeout: Option<i64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    #[serde(
        default,
        deserialize_with = "optional_text_or_number",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_value: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl Feed {
    /// Creates a feed description carrying only a name, for creation requests.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// Writes the feed key, or nothing for a feed the server has not keyed yet.
impl fmt::Display for Feed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key.as_deref().unwrap_or_default())
    }
}

/// A named collection of feeds.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Group {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub key: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_keys: Option<serde_json::Value>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub source: Option<String>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,

    /// Member feeds, in server order
    #[serde(
        default,
        deserialize_with = "null_as_empty",
        skip_serializing_if = "Vec::is_empty"
    )]
    pub feeds: Vec<Feed>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub properties: Option<serde_json::Value>,
}

impl Group {
    /// Creates a group description carrying only a name, for creation requests.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            ..Default::default()
        }
    }
}

/// Server time, broken down into calendar fields.
///
/// Months and days are 1-based, `wday` counts from Sunday = 0, `yday` from 1.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Time {
    pub year: i32,
    pub mon: i32,
    pub mday: i32,
    pub hour: i32,
    pub min: i32,
    pub sec: i32,
    pub wday: i32,
    pub yday: i32,
    pub isdst: i32,
}

impl Time {
    /// Assembles a calendar date-time, or `None` if any field is out of range.
    pub fn to_naive_date_time(&self) -> Option<NaiveDateTime> {
        let unsigned = |v: i32| u32::try_from(v).ok();

        let date = NaiveDate::from_ymd_opt(self.year, unsigned(self.mon)?, unsigned(self.mday)?)?;
        date.and_hms_opt(
            unsigned(self.hour)?,
            unsigned(self.min)?,
            unsigned(self.sec)?,
        )
    }
}

/// A value produced by a randomizer ("words") integration.
///
/// The shape of `value` depends on `value_type`.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct RandomWord {
    pub id: i64,
    pub value_type: Option<String>,
    pub value: serde_json::Value,
    pub seed: Option<String>,
    pub time_slice: Option<i64>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum TextOrNumber {
    Text(String),
    Number(serde_json::Number),
}

impl From<TextOrNumber> for String {
    fn from(value: TextOrNumber) -> Self {
        match value {
            TextOrNumber::Text(text) => text,
            TextOrNumber::Number(number) => number.to_string(),
        }
    }
}

/// Accepts `"42.5"`, `42.5` or `null`.
fn optional_text_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<TextOrNumber>::deserialize(deserializer)?.map(String::from))
}

fn text_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(optional_text_or_number(deserializer)?.unwrap_or_default())
}

fn null_as_empty<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Ok(Option::<Vec<T>>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec;
    use chrono::TimeZone;

    #[test]
    fn test_empty_value_is_still_sent() {
        assert_eq!(codec::encode(&Data::new("")).unwrap(), r#"{"value":""}"#);
        assert_eq!(codec::encode(&Data::default()).unwrap(), r#"{"value":""}"#);
    }

    #[test]
    fn test_metadata_fields_omitted_when_unset() {
        let reading = Data::with_metadata("7", None, Some("-93.64"), None, None);
        let json: serde_json::Value =
            serde_json::from_str(&codec::encode(&reading).unwrap()).unwrap();

        assert_eq!(json, serde_json::json!({"value": "7", "lon": "-93.64"}));
    }

    #[test]
    fn test_created_at_is_rfc3339() {
        let at = Utc.with_ymd_and_hms(2019, 5, 1, 15, 22, 14).unwrap();
        let reading = Data::with_metadata("1", None, None, None, Some(at));

        assert_eq!(
            codec::encode(&reading).unwrap(),
            r#"{"value":"1","created_at":"2019-05-01T15:22:14Z"}"#
        );
    }

    #[test]
    fn test_zero_coordinates_are_absent() {
        let reading = Data::with_coordinates(
            "x",
            Coordinate::from(0),
            Coordinate::try_from(0.0).unwrap(),
            "0.000".parse().unwrap(),
            None,
        );

        assert_eq!(reading.lat, None);
        assert_eq!(reading.lon, None);
        assert_eq!(reading.ele, None);
        assert_eq!(codec::encode(&reading).unwrap(), r#"{"value":"x"}"#);
    }

    #[test]
    fn test_nonzero_coordinates_keep_their_digits() {
        let reading = Data::with_coordinates(
            "x",
            "42.026944".parse().unwrap(),
            Coordinate::try_from(-93.646944).unwrap(),
            "900.10".parse().unwrap(),
            None,
        );

        assert_eq!(reading.lat.as_deref(), Some("42.026944"));
        assert_eq!(reading.lon.as_deref(), Some("-93.646944"));
        assert_eq!(reading.ele.as_deref(), Some("900.10"));
    }

    #[test]
    fn test_rounded_replaces_metadata_only() {
        let reading = Data::with_metadata("v", Some("42.026944"), Some("oops"), None, None);
        let rounded = reading.rounded(2);

        assert_eq!(rounded.value, "v");
        assert_eq!(rounded.lat.as_deref(), Some("42.03"));
        assert_eq!(rounded.lon, None);
        assert_eq!(rounded.ele, None);
        // the source reading is untouched
        assert_eq!(reading.lon.as_deref(), Some("oops"));
    }

    #[test]
    fn test_decode_server_reading() {
        let body = r#"{
            "id": "0ERA3E1E6XKTQE4QWN1CM2P5PS",
            "value": "21.5",
            "feed_id": 1234,
            "feed_key": "sensors.temp",
            "created_at": "2019-05-01T15:22:14Z",
            "created_epoch": 1556724134,
            "expiration": "2019-06-30T15:22:14Z",
            "lat": 42.5,
            "lon": null,
            "ele": "900",
            "completed_at": null
        }"#;

        let data: Data = codec::decode(body).unwrap();

        assert_eq!(data.id.as_deref(), Some("0ERA3E1E6XKTQE4QWN1CM2P5PS"));
        assert_eq!(data.value, "21.5");
        assert_eq!(data.feed_id, Some(1234));
        assert_eq!(data.created_epoch, Some(1556724134.0));
        assert_eq!(
            data.created_at,
            Some(Utc.with_ymd_and_hms(2019, 5, 1, 15, 22, 14).unwrap())
        );
        assert_eq!(data.lat.as_deref(), Some("42.5"));
        assert_eq!(data.lon, None);
        assert_eq!(data.ele.as_deref(), Some("900"));
        assert_eq!(data.completed_at, None);
        assert_eq!(data.to_string(), "21.5");
    }

    #[test]
    fn test_feed_new_sends_only_name() {
        assert_eq!(
            codec::encode(&Feed::new("Temperature")).unwrap(),
            r#"{"name":"Temperature"}"#
        );
    }

    #[test]
    fn test_feed_explicit_false_is_sent() {
        let feed = Feed {
            history: Some(false),
            ..Feed::new("Quiet")
        };
        assert_eq!(
            codec::encode(&feed).unwrap(),
            r#"{"name":"Quiet","history":false}"#
        );
    }

    #[test]
    fn test_decode_group_with_feeds() {
        let body = r#"{
            "id": 7,
            "name": "Sensors",
            "key": "sensors",
            "description": null,
            "feeds": [
                {"id": 1, "key": "sensors.temp", "name": "Temp", "last_value": 21},
                {"id": 2, "key": "sensors.humidity", "name": "Humidity", "history": true}
            ]
        }"#;

        let group: Group = codec::decode(body).unwrap();

        assert_eq!(group.id, Some(7));
        assert_eq!(group.key.as_deref(), Some("sensors"));
        assert_eq!(group.description, None);
        assert_eq!(group.feeds.len(), 2);
        assert_eq!(group.feeds[0].key.as_deref(), Some("sensors.temp"));
        assert_eq!(group.feeds[0].last_value.as_deref(), Some("21"));
        assert_eq!(group.feeds[1].history, Some(true));
    }

    #[test]
    fn test_group_null_feeds_decode_as_empty() {
        let group: Group = codec::decode(r#"{"name": "Empty", "feeds": null}"#).unwrap();
        assert!(group.feeds.is_empty());
        assert_eq!(codec::encode(&group).unwrap(), r#"{"name":"Empty"}"#);
    }

    #[test]
    fn test_time_to_naive_date_time() {
        let time: Time = codec::decode(
            r#"{"year":2019,"mon":5,"mday":1,"hour":15,"min":22,"sec":14,"wday":3,"yday":121,"isdst":0}"#,
        )
        .unwrap();

        assert_eq!(time.wday, 3);
        assert_eq!(time.yday, 121);
        assert_eq!(
            time.to_naive_date_time(),
            NaiveDate::from_ymd_opt(2019, 5, 1).unwrap().and_hms_opt(15, 22, 14)
        );
    }

    #[test]
    fn test_time_out_of_range() {
        let time = Time {
            year: 2019,
            mon: 13,
            mday: 1,
            ..Default::default()
        };
        assert_eq!(time.to_naive_date_time(), None);
        assert_eq!(Time::default().to_naive_date_time(), None);
    }

    #[test]
    fn test_random_word_value_is_polymorphic() {
        let word: RandomWord = codec::decode(
            r#"{"id":3,"value_type":"noun","value":"lantern","seed":null,"time_slice":1556724120}"#,
        )
        .unwrap();
        assert_eq!(word.id, 3);
        assert_eq!(word.value_type.as_deref(), Some("noun"));
        assert_eq!(word.value, serde_json::json!("lantern"));
        assert_eq!(word.time_slice, Some(1556724120));

        let number: RandomWord =
            codec::decode(r#"{"id":4,"value_type":"number","value":17}"#).unwrap();
        assert_eq!(number.value, serde_json::json!(17));
        assert_eq!(number.seed, None);
    }

    #[test]
    fn test_feed_displays_its_key() {
        let feed: Feed = codec::decode(r#"{"name":"Temp","key":"sensors.temp"}"#).unwrap();
        assert_eq!(feed.to_string(), "sensors.temp");
        assert_eq!(Feed::new("Unsaved").to_string(), "");
    }
}
