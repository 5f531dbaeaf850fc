use serde::{Deserialize, Serialize};
use std::fmt;

use crate::error::{Error, Result};

/// Identifier of a price feed: 32 bytes, stored as lowercase hex without
/// a 0x prefix.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct FeedId(String);

impl FeedId {
    pub fn parse(raw: &str) -> Result<Self> {
        let stripped = raw.strip_prefix("0x").unwrap_or(raw);

        let bytes = hex::decode(stripped).map_err(|_| Error::InvalidFeedId(raw.to_string()))?;
        if bytes.len() != 32 {
            return Err(Error::InvalidFeedId(raw.to_string()));
        }

        Ok(FeedId(stripped.to_lowercase()))
    }

    pub fn as_hex(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for FeedId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
