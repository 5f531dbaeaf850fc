use num_bigint::BigUint;
use num_traits::ToPrimitive;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Seconds since epoch.
pub type UnixTimestamp = i64;

/// A single price observation from the price service. The mantissa is an
/// arbitrary-precision unsigned integer kept in its decimal-string wire
/// encoding; `expo` scales it onto the quote-currency scale.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub price: String,
    pub conf: String,
    pub expo: i32,
    pub publish_time: UnixTimestamp,
}

/// The contract's last committed price, read once per cycle.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OnChainPrice {
    pub price: String,
    pub expo: i32,
    pub publish_time: UnixTimestamp,
}

impl PriceQuote {
    /// Mantissa scaled by `10^expo`.
    pub fn normalized(&self) -> Result<f64> {
        normalize(&self.price, self.expo)
    }
}

impl OnChainPrice {
    pub fn normalized(&self) -> Result<f64> {
        normalize(&self.price, self.expo)
    }
}

fn normalize(mantissa: &str, expo: i32) -> Result<f64> {
    let value = mantissa
        .parse::<BigUint>()
        .map_err(|_| Error::InvalidPriceEncoding(mantissa.to_string()))?;

    let value = value
        .to_f64()
        .ok_or_else(|| Error::InvalidPriceEncoding(mantissa.to_string()))?;

    Ok(value * 10f64.powi(expo))
}
