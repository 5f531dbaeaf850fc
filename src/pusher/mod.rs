pub mod decision;
pub mod executor;
pub mod scheduler;

use serde::Serialize;

use crate::types::ids::FeedId;

/// Result of one fetch-decide-maybe-submit cycle. Produced once per
/// cycle, logged and counted, never persisted.
#[derive(Clone, Debug, PartialEq)]
pub enum CycleOutcome {
    Submitted { tx_ref: String },
    SkippedStale,
    SkippedWithinTolerance { deviation: f64 },
    Failed { error: String },
}

/// Pre-submit verdict of the decision engine.
#[derive(Clone, Debug, PartialEq)]
pub enum UpdateDecision {
    Submit { deviation: f64 },
    SkipStale,
    SkipWithinTolerance { deviation: f64 },
}

/// Read-only liveness view served to the health probe.
///
/// No field can hold key material; only the public sender address ever
/// appears here.
#[derive(Clone, Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusSnapshot {
    pub is_running: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_feed_id: Option<FeedId>,
    pub contract_address: String,
}
