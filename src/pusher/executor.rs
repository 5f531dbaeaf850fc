use std::sync::Arc;

use tracing::debug;

use crate::error::Result;
use crate::interfaces::ledger_client::LedgerClient;
use crate::interfaces::quote_source::QuoteSource;
use crate::pusher::decision::{DeviationTolerance, decide};
use crate::pusher::{CycleOutcome, UpdateDecision};
use crate::types::ids::FeedId;
use crate::utils::helper::current_timestamp_seconds;

/// Runs one fetch-decide-maybe-submit cycle against the collaborators.
///
/// Collaborator failures never escape: every error folds into
/// `CycleOutcome::Failed` with its internal detail stripped. Skip paths
/// return before the ledger's write path is touched.
#[derive(Clone)]
pub struct UpdateCycleExecutor {
    quote_source: Arc<dyn QuoteSource>,
    ledger: Arc<dyn LedgerClient>,
    tolerance: DeviationTolerance,
    feed_id: FeedId,
}

impl UpdateCycleExecutor {
    pub fn new(
        quote_source: Arc<dyn QuoteSource>,
        ledger: Arc<dyn LedgerClient>,
        tolerance: DeviationTolerance,
        feed_id: FeedId,
    ) -> Self {
        UpdateCycleExecutor {
            quote_source,
            ledger,
            tolerance,
            feed_id,
        }
    }

    pub fn feed_id(&self) -> &FeedId {
        &self.feed_id
    }

    pub async fn run_cycle(&self) -> CycleOutcome {
        match self.try_run_cycle().await {
            Ok(outcome) => outcome,
            Err(error) => {
                debug!("update cycle error: {}", error);
                CycleOutcome::Failed {
                    error: error.sanitized(),
                }
            }
        }
    }

    async fn try_run_cycle(&self) -> Result<CycleOutcome> {
        let quote = self.quote_source.fetch_latest(&self.feed_id).await?;
        debug!(
            publish_time = quote.publish_time,
            age_seconds = current_timestamp_seconds() - quote.publish_time,
            "fetched quote"
        );

        let on_chain = self.ledger.query_price().await?;

        match decide(&quote, &on_chain, &self.tolerance)? {
            UpdateDecision::SkipStale => Ok(CycleOutcome::SkippedStale),
            UpdateDecision::SkipWithinTolerance { deviation } => {
                Ok(CycleOutcome::SkippedWithinTolerance { deviation })
            }
            UpdateDecision::Submit { deviation } => {
                debug!(deviation, "deviation exceeds tolerance, submitting update");
                let ledger_config = self.ledger.query_config().await?;
                let tx_ref = self.ledger.submit(&quote, ledger_config.update_fee).await?;
                Ok(CycleOutcome::Submitted { tx_ref })
            }
        }
    }
}
