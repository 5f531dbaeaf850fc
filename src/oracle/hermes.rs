use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;

use crate::error::{Error, Result};
use crate::interfaces::quote_source::QuoteSource;
use crate::types::ids::FeedId;
use crate::types::price::PriceQuote;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP client for a Hermes-style price service.
pub struct HermesQuoteSource {
    client: reqwest::Client,
    endpoint: String,
}

impl HermesQuoteSource {
    pub fn new(endpoint: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::QuoteRequestFailed(e.to_string()))?;

        Ok(HermesQuoteSource {
            client,
            endpoint: endpoint.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl QuoteSource for HermesQuoteSource {
    async fn fetch_latest(&self, feed_id: &FeedId) -> Result<PriceQuote> {
        let url = format!("{}/api/latest_price_feeds", self.endpoint);

        let response = self
            .client
            .get(&url)
            .query(&[("ids[]", feed_id.as_hex())])
            .send()
            .await
            .map_err(|e| Error::QuoteRequestFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::QuoteRequestFailed(format!(
                "price service returned {}",
                response.status()
            )));
        }

        let feeds: Vec<PriceFeedData> = response
            .json()
            .await
            .map_err(|e| Error::QuoteDeserializationFailed(e.to_string()))?;

        let feed = feeds
            .into_iter()
            .next()
            .ok_or_else(|| Error::FeedNotFound(feed_id.to_string()))?;

        Ok(PriceQuote {
            price: feed.price.price,
            conf: feed.price.conf,
            expo: feed.price.expo,
            publish_time: feed.price.publish_time,
        })
    }
}

#[derive(Deserialize)]
struct PriceFeedData {
    price: PriceData,
}

#[derive(Deserialize)]
struct PriceData {
    price: String,
    conf: String,
    expo: i32,
    publish_time: i64,
}
