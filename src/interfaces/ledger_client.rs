use async_trait::async_trait;
#[cfg(test)]
use mockall::automock;

use crate::error::Result;
use crate::types::ids::FeedId;
use crate::types::price::{OnChainPrice, PriceQuote};

/// On-chain contract configuration relevant to submitting updates.
#[derive(Clone, Debug, PartialEq)]
pub struct LedgerConfig {
    pub update_fee: u128,
    pub feed_id: FeedId,
}

#[cfg_attr(test, automock)]
#[async_trait]
pub trait LedgerClient: Send + Sync {
    /// Read the contract's last committed price.
    async fn query_price(&self) -> Result<OnChainPrice>;

    /// Read the contract configuration (update fee, feed identifier).
    async fn query_config(&self) -> Result<LedgerConfig>;

    /// Submit a price update transaction, returning its reference.
    async fn submit(&self, quote: &PriceQuote, fee: u128) -> Result<String>;
}
