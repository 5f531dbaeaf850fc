use serde::{Deserialize, Serialize};
use std::time::Duration;

pub mod loader;

use crate::error::{Error, Result};
use crate::pusher::decision::DeviationTolerance;

/// Pre-validated configuration consumed by the scheduler. Immutable for
/// the process lifetime.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct PusherConfig {
    /// Delay between the end of one update cycle and the start of the
    /// next, in milliseconds.
    pub update_interval_ms: u64,
    #[serde(default)]
    pub deviation_tolerance: DeviationTolerance,
    pub contract_address: String,
    pub price_service_url: String,
    pub ledger_rpc_url: String,
    /// Public address the gateway signs with; shown in the status view.
    #[serde(default)]
    pub sender_address: Option<String>,
}

impl PusherConfig {
    pub fn update_interval(&self) -> Duration {
        Duration::from_millis(self.update_interval_ms)
    }

    pub fn validate(&self) -> Result<()> {
        if self.update_interval_ms == 0 {
            return Err(Error::ConfigError(
                "update_interval_ms must be positive".to_string(),
            ));
        }

        match &self.deviation_tolerance {
            DeviationTolerance::Absolute { value } => {
                if !value.is_finite() || *value < 0.0 {
                    return Err(Error::InvalidTolerance(format!(
                        "absolute tolerance must be a non-negative number, got {value}"
                    )));
                }
            }
            DeviationTolerance::Percentage { value } => {
                if !value.is_finite() || !(0.0..=100.0).contains(value) {
                    return Err(Error::InvalidTolerance(format!(
                        "percentage tolerance must be in [0, 100], got {value}"
                    )));
                }
            }
        }

        validate_address(&self.contract_address)?;
        if let Some(sender) = &self.sender_address {
            validate_address(sender)?;
        }

        validate_url(&self.price_service_url)?;
        validate_url(&self.ledger_rpc_url)?;

        Ok(())
    }
}

/// Bind address of the status endpoint.
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct ServerConfig {
    pub listen_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            listen_address: "127.0.0.1:4884".to_string(),
        }
    }
}

fn validate_address(address: &str) -> Result<()> {
    let stripped = address.strip_prefix("0x").unwrap_or(address);
    if stripped.is_empty() || hex::decode(stripped).is_err() {
        return Err(Error::ConfigError(format!("invalid address: {address}")));
    }
    Ok(())
}

fn validate_url(raw: &str) -> Result<()> {
    reqwest::Url::parse(raw).map_err(|_| Error::ConfigError(format!("invalid url: {raw}")))?;
    Ok(())
}
