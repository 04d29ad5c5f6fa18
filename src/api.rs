//! Adafruit IO operations.
//!
//! Each method builds one path fragment, performs exactly one HTTP round trip,
//! and either decodes the body or, for the `*_raw` variants and writes, returns
//! it untouched.

use crate::{codec, Client, Coordinate, Data, Error, Feed, Group, RandomWord, Result, Time};
use chrono::{DateTime, NaiveDateTime, Utc};

const TIME_PATH: &str = "integrations/time/struct.json";

fn feed_data_path(feed: &str, data_id: Option<&str>) -> String {
    match data_id {
        Some(id) => format!("feeds/{}/data/{}", feed, id),
        None => format!("feeds/{}/data", feed),
    }
}

fn collection_path(collection: &str, key: Option<&str>) -> String {
    format!("{}/{}", collection, key.unwrap_or_default())
}

fn integration_path(integration: &str, id: Option<u64>) -> String {
    match id {
        Some(id) => format!("integrations/{}/{}", integration, id),
        None => format!("integrations/{}", integration),
    }
}

/// First element of a decoded collection, for lookups by key.
fn first<T>(items: Vec<T>, raw: String) -> Result<T> {
    items.into_iter().next().ok_or_else(|| Error::Decode {
        raw_response: raw,
        serde_error: "expected at least one resource, got an empty array".to_string(),
    })
}

// Data
impl Client {
    /// Gets the most recent reading on a feed.
    pub async fn receive(&self, feed: &str) -> Result<Data> {
        let response = self.get(format!("feeds/{}/data/last", feed)).await?;
        codec::decode(&response.data)
    }

    /// Gets the next unread reading on a feed.
    pub async fn receive_next(&self, feed: &str) -> Result<Data> {
        let response = self.get(format!("feeds/{}/data/next", feed)).await?;
        codec::decode(&response.data)
    }

    /// Gets the reading before the current one on a feed.
    pub async fn receive_previous(&self, feed: &str) -> Result<Data> {
        let response = self.get(format!("feeds/{}/data/previous", feed)).await?;
        codec::decode(&response.data)
    }

    /// Gets all readings on a feed, or the single reading `data_id`, as JSON text.
    pub async fn receive_data_raw(&self, feed: &str, data_id: Option<&str>) -> Result<String> {
        let response = self.get(feed_data_path(feed, data_id)).await?;
        Ok(response.into_data())
    }

    /// Gets all readings on a feed, or the single reading `data_id`.
    ///
    /// A single reading comes back as a one-element `Vec`.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use aio_http::Client;
    ///
    /// # async fn example() -> Result<(), aio_http::Error> {
    /// let client = Client::new("my_username", "my_aio_key")?;
    ///
    /// for reading in client.receive_data("sensors.temp", None).await? {
    ///     println!("{:?} {}", reading.id, reading.value);
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub async fn receive_data(&self, feed: &str, data_id: Option<&str>) -> Result<Vec<Data>> {
        let raw = self.receive_data_raw(feed, data_id).await?;
        codec::decode_many(&raw)
    }

    /// Posts a reading to a feed and returns the service's JSON reply.
    ///
    /// Only `value` and the fields that are set are sent.
    pub async fn send_data(&self, feed: &str, data: &Data) -> Result<String> {
        let response = self.post(feed_data_path(feed, None), data).await?;
        Ok(response.into_data())
    }

    /// Posts a bare value to a feed.
    pub async fn send_value(&self, feed: &str, value: impl Into<String>) -> Result<String> {
        self.send_data(feed, &Data::new(value)).await
    }

    /// Same as [`send_value`](Client::send_value).
    pub async fn append(&self, feed: &str, value: impl Into<String>) -> Result<String> {
        self.send_value(feed, value).await
    }

    /// Posts a value with text metadata used verbatim.
    pub async fn send_data_with_metadata(
        &self,
        feed: &str,
        value: impl Into<String>,
        lat: Option<&str>,
        lon: Option<&str>,
        ele: Option<&str>,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<String> {
        let data = Data::with_metadata(value, lat, lon, ele, created_at);
        self.send_data(feed, &data).await
    }

    /// Posts a value with numeric coordinates. Zero coordinates are not sent.
    pub async fn send_data_with_coordinates(
        &self,
        feed: &str,
        value: impl Into<String>,
        lat: Coordinate,
        lon: Coordinate,
        ele: Coordinate,
        created_at: Option<DateTime<Utc>>,
    ) -> Result<String> {
        let data = Data::with_coordinates(value, lat, lon, ele, created_at);
        self.send_data(feed, &data).await
    }

    /// Posts a reading with `lat`, `lon` and `ele` rounded to `precision` places.
    ///
    /// The caller's `data` is left unchanged.
    pub async fn send_data_rounded(
        &self,
        feed: &str,
        data: &Data,
        precision: u32,
    ) -> Result<String> {
        self.send_data(feed, &data.rounded(precision)).await
    }

    /// Deletes one reading from a feed.
    pub async fn delete_data(&self, feed: &str, data_id: &str) -> Result<String> {
        let response = self.delete(feed_data_path(feed, Some(data_id))).await?;
        Ok(response.into_data())
    }
}

// Feeds
impl Client {
    /// Gets every feed, or the feed `key`, as JSON text.
    pub async fn feeds_raw(&self, key: Option<&str>) -> Result<String> {
        let response = self.get(collection_path("feeds", key)).await?;
        Ok(response.into_data())
    }

    /// Gets every feed, or the feed `key` as a one-element `Vec`.
    pub async fn feeds(&self, key: Option<&str>) -> Result<Vec<Feed>> {
        let raw = self.feeds_raw(key).await?;
        codec::decode_many(&raw)
    }

    /// Gets a single feed by key.
    pub async fn get_feed(&self, key: &str) -> Result<Feed> {
        let raw = self.feeds_raw(Some(key)).await?;
        let feeds = codec::decode_many(&raw)?;
        first(feeds, raw)
    }

    /// Creates a feed, inside `group_key` if given, and returns the JSON reply.
    pub async fn create_feed(&self, feed: &Feed, group_key: Option<&str>) -> Result<String> {
        let path = match group_key {
            Some(group) => format!("groups/{}/feeds", group),
            None => collection_path("feeds", None),
        };
        let response = self.post(path, feed).await?;
        Ok(response.into_data())
    }

    /// Creates a feed with just a name.
    pub async fn create_feed_named(
        &self,
        name: impl Into<String>,
        group_key: Option<&str>,
    ) -> Result<String> {
        self.create_feed(&Feed::new(name), group_key).await
    }

    /// Deletes a feed by key.
    pub async fn delete_feed(&self, key: &str) -> Result<String> {
        let response = self.delete(collection_path("feeds", Some(key))).await?;
        Ok(response.into_data())
    }

    /// Deletes a previously fetched feed, addressed by its `key`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] without sending anything if the feed has no key.
    pub async fn remove_feed(&self, feed: &Feed) -> Result<String> {
        let key = feed
            .key
            .as_deref()
            .ok_or_else(|| Error::Configuration("feed has no key to delete by".to_string()))?;
        self.delete_feed(key).await
    }
}

// Groups
impl Client {
    /// Gets every group, or the group `key`, as JSON text.
    pub async fn groups_raw(&self, key: Option<&str>) -> Result<String> {
        let response = self.get(collection_path("groups", key)).await?;
        Ok(response.into_data())
    }

    /// Gets every group, or the group `key` as a one-element `Vec`.
    pub async fn groups(&self, key: Option<&str>) -> Result<Vec<Group>> {
        let raw = self.groups_raw(key).await?;
        codec::decode_many(&raw)
    }

    /// Gets a single group by key, including its feeds.
    pub async fn get_group(&self, key: &str) -> Result<Group> {
        let raw = self.groups_raw(Some(key)).await?;
        let groups = codec::decode_many(&raw)?;
        first(groups, raw)
    }

    /// Creates a group and returns the JSON reply.
    pub async fn create_group(&self, group: &Group) -> Result<String> {
        let response = self.post(collection_path("groups", None), group).await?;
        Ok(response.into_data())
    }

    /// Creates a group with just a name.
    pub async fn create_group_named(&self, name: impl Into<String>) -> Result<String> {
        self.create_group(&Group::new(name)).await
    }

    /// Deletes a group by key. Its feeds are not deleted.
    pub async fn delete_group(&self, key: &str) -> Result<String> {
        let response = self.delete(collection_path("groups", Some(key))).await?;
        Ok(response.into_data())
    }
}

// Integrations
impl Client {
    /// Gets the server's idea of the current time as JSON text.
    pub async fn receive_time_raw(&self) -> Result<String> {
        let response = self.get(TIME_PATH).await?;
        Ok(response.into_data())
    }

    /// Gets the server's idea of the current time, broken into fields.
    pub async fn receive_time(&self) -> Result<Time> {
        let raw = self.receive_time_raw().await?;
        codec::decode(&raw)
    }

    /// Gets the server's idea of the current time as a calendar date-time.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] if the fields do not form a valid date-time.
    pub async fn receive_date_time(&self) -> Result<NaiveDateTime> {
        let raw = self.receive_time_raw().await?;
        let time: Time = codec::decode(&raw)?;
        time.to_naive_date_time().ok_or_else(|| Error::Decode {
            raw_response: raw,
            serde_error: "time fields are out of range".to_string(),
        })
    }

    /// Gets weather records, or the record `id`, as JSON text.
    pub async fn receive_weather_raw(&self, id: Option<u64>) -> Result<String> {
        let response = self.get(integration_path("weather", id)).await?;
        Ok(response.into_data())
    }

    /// Gets randomizer output, or the randomizer `id`, as JSON text.
    pub async fn receive_random_raw(&self, id: Option<u64>) -> Result<String> {
        let response = self.get(integration_path("words", id)).await?;
        Ok(response.into_data())
    }

    /// Gets randomizer output, or the randomizer `id`.
    pub async fn receive_random(&self, id: Option<u64>) -> Result<RandomWord> {
        let raw = self.receive_random_raw(id).await?;
        codec::decode(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_feed_data_path() {
        assert_eq!(feed_data_path("sensors.temp", None), "feeds/sensors.temp/data");
        assert_eq!(
            feed_data_path("sensors.temp", Some("0ERA3E")),
            "feeds/sensors.temp/data/0ERA3E"
        );
    }

    #[test]
    fn test_collection_path_keeps_trailing_slash_for_listing() {
        assert_eq!(collection_path("feeds", None), "feeds/");
        assert_eq!(collection_path("groups", Some("sensors")), "groups/sensors");
    }

    #[test]
    fn test_integration_path() {
        assert_eq!(integration_path("words", None), "integrations/words");
        assert_eq!(integration_path("weather", Some(12)), "integrations/weather/12");
    }

    #[test]
    fn test_first_of_empty_is_decode_error() {
        let err = first(Vec::<Feed>::new(), "[]".to_string()).unwrap_err();
        assert!(matches!(err, Error::Decode { ref raw_response, .. } if raw_response == "[]"));
    }
}
