use async_trait::async_trait;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use std::time::Duration;

use crate::error::{Error, Result};
use crate::interfaces::ledger_client::{LedgerClient, LedgerConfig};
use crate::types::ids::FeedId;
use crate::types::price::{OnChainPrice, PriceQuote};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// JSON-RPC client for the price-feed contract gateway.
///
/// Transaction signing and broadcast happen behind the gateway; this
/// client only shapes requests and decodes responses.
pub struct RpcLedgerClient {
    client: reqwest::Client,
    endpoint: String,
    contract_address: String,
}

impl RpcLedgerClient {
    pub fn new(endpoint: &str, contract_address: &str) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()
            .map_err(|e| Error::LedgerRpcFailed(e.to_string()))?;

        Ok(RpcLedgerClient {
            client,
            endpoint: endpoint.to_string(),
            contract_address: contract_address.to_string(),
        })
    }

    async fn call<T: DeserializeOwned>(&self, rpc_method: &str, params: Value) -> Result<T> {
        let request = json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": rpc_method,
            "params": params,
        });

        let response = self
            .client
            .post(&self.endpoint)
            .json(&request)
            .send()
            .await
            .map_err(|e| Error::LedgerRpcFailed(e.to_string()))?;

        if !response.status().is_success() {
            return Err(Error::LedgerRpcFailed(format!(
                "ledger RPC returned {}",
                response.status()
            )));
        }

        let envelope: RpcEnvelope<T> = response
            .json()
            .await
            .map_err(|e| Error::MalformedLedgerResponse(e.to_string()))?;

        if let Some(rpc_error) = envelope.error {
            return Err(Error::LedgerRpcFailed(rpc_error.message));
        }

        envelope
            .result
            .ok_or_else(|| Error::MalformedLedgerResponse("missing result".to_string()))
    }
}

#[async_trait]
impl LedgerClient for RpcLedgerClient {
    async fn query_price(&self) -> Result<OnChainPrice> {
        let price: OnChainPriceData = self
            .call("feed_getPrice", json!([self.contract_address]))
            .await?;

        Ok(OnChainPrice {
            price: price.price,
            expo: price.expo,
            publish_time: price.publish_time,
        })
    }

    async fn query_config(&self) -> Result<LedgerConfig> {
        let config: FeedConfigData = self
            .call("feed_getConfig", json!([self.contract_address]))
            .await?;

        let update_fee = config.update_fee.parse::<u128>().map_err(|_| {
            Error::MalformedLedgerResponse(format!("invalid update fee: {}", config.update_fee))
        })?;
        let feed_id = FeedId::parse(&config.feed_id)?;

        Ok(LedgerConfig { update_fee, feed_id })
    }

    async fn submit(&self, quote: &PriceQuote, fee: u128) -> Result<String> {
        let result: SubmitData = self
            .call(
                "feed_updatePrice",
                json!([{
                    "contract": self.contract_address,
                    "price": quote.price,
                    "conf": quote.conf,
                    "expo": quote.expo,
                    "publishTime": quote.publish_time,
                    "fee": fee.to_string(),
                }]),
            )
            .await
            .map_err(|e| match e {
                Error::LedgerRpcFailed(message) => Error::SubmissionFailed(message),
                other => other,
            })?;

        Ok(result.tx_hash)
    }
}

#[derive(Deserialize)]
struct RpcEnvelope<T> {
    result: Option<T>,
    error: Option<RpcErrorData>,
}

#[derive(Deserialize)]
struct RpcErrorData {
    message: String,
}

#[derive(Deserialize)]
struct OnChainPriceData {
    price: String,
    expo: i32,
    #[serde(rename = "publishTime")]
    publish_time: i64,
}

#[derive(Deserialize)]
struct FeedConfigData {
    #[serde(rename = "updateFee")]
    update_fee: String,
    #[serde(rename = "feedId")]
    feed_id: String,
}

#[derive(Deserialize)]
struct SubmitData {
    #[serde(rename = "txHash")]
    tx_hash: String,
}
