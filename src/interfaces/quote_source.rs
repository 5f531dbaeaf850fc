use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::Result;
use crate::types::ids::FeedId;
use crate::types::price::PriceQuote;

#[cfg_attr(test, automock)]
#[async_trait]
pub trait QuoteSource: Send + Sync {
    /// Fetch the most recent observation for a feed.
    async fn fetch_latest(&self, feed_id: &FeedId) -> Result<PriceQuote>;
}
