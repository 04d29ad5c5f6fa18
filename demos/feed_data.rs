//! Sends a few readings to a feed, reads them back and cleans up.
//!
//! Credentials come from `AIO_USERNAME` and `AIO_KEY`, optionally via a `.env` file.
//!
//! Run with: `cargo run --example feed_data -- <feed key>`

use aio_http::{ClientBuilder, Coordinate, Data, Error};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("aio_http=info".parse()?))
        .init();

    let feed = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "testgroup.testdatakey".to_string());

    let client = ClientBuilder::from_env()?.build()?;

    println!("=== Sending ===");
    client.send_value(&feed, "TestData1").await?;

    let with_text = Data::with_metadata(
        "TestData2",
        Some("42.026944"),
        Some("93.646944"),
        Some("900"),
        None,
    );
    client.send_data(&feed, &with_text).await?;

    let with_numbers = Data::with_coordinates(
        "TestData3",
        Coordinate::try_from(42.026944)?,
        Coordinate::try_from(93.646944)?,
        Coordinate::from(900),
        None,
    );
    client.send_data_rounded(&feed, &with_numbers, 2).await?;

    let reply = client.send_value(&feed, "TestSendRec").await?;
    let sent: Data = aio_http::codec::decode(&reply)?;
    println!("stored {} as {:?} at {:?}", sent.value, sent.id, sent.created_at);

    println!("\n=== Receiving ===");
    println!("last: {}", client.receive(&feed).await?);

    match client.receive_next(&feed).await {
        Ok(next) => println!("next: {}", next),
        Err(Error::Request { status, .. }) => println!("no next reading ({})", status),
        Err(e) => return Err(e.into()),
    }

    for reading in client.receive_data(&feed, None).await? {
        println!("{} ID: {}", reading.value, reading.id.as_deref().unwrap_or("-"));
    }

    println!("\n=== Cleaning up ===");
    if let Some(id) = sent.id.as_deref() {
        client.delete_data(&feed, id).await?;
        println!("deleted {}", id);
    }

    Ok(())
}
