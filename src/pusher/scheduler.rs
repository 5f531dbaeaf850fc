use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{Instrument, error, info, warn};

use crate::config::PusherConfig;
use crate::error::Result;
use crate::interfaces::ledger_client::LedgerClient;
use crate::interfaces::quote_source::QuoteSource;
use crate::observability::metrics;
use crate::observability::tracing::trace_update_cycle;
use crate::pusher::decision::DeviationTolerance;
use crate::pusher::executor::UpdateCycleExecutor;
use crate::pusher::{CycleOutcome, StatusSnapshot};
use crate::types::ids::FeedId;

/// Owns the run/stop lifecycle of the update loop.
///
/// At most one cycle executes at a time: the loop is a single task that
/// arms the inter-cycle timer only after the previous cycle has fully
/// completed, so slow cycles stretch the schedule instead of overlapping.
pub struct PusherScheduler {
    quote_source: Arc<dyn QuoteSource>,
    ledger: Arc<dyn LedgerClient>,
    tolerance: DeviationTolerance,
    update_interval: Duration,
    contract_address: String,
    sender_address: Option<String>,
    running: Arc<AtomicBool>,
    feed_id: RwLock<Option<FeedId>>,
}

impl PusherScheduler {
    pub fn new(
        config: &PusherConfig,
        quote_source: Arc<dyn QuoteSource>,
        ledger: Arc<dyn LedgerClient>,
    ) -> Self {
        PusherScheduler {
            quote_source,
            ledger,
            tolerance: config.deviation_tolerance.clone(),
            update_interval: config.update_interval(),
            contract_address: config.contract_address.clone(),
            sender_address: config.sender_address.clone(),
            running: Arc::new(AtomicBool::new(false)),
            feed_id: RwLock::new(None),
        }
    }

    /// Start the update loop.
    ///
    /// Idempotent: the run flag flips with an atomic swap before the
    /// first await, so among concurrent callers exactly one initializes
    /// and loops; the rest observe Running and return without side
    /// effects. Initialization failure resets the flag and propagates.
    pub async fn start(&self, shutdown: CancellationToken) -> Result<()> {
        if self.running.swap(true, Ordering::SeqCst) {
            info!("price pusher already running, ignoring start request");
            return Ok(());
        }

        let ledger_config = match self.ledger.query_config().await {
            Ok(config) => config,
            Err(error) => {
                self.running.store(false, Ordering::SeqCst);
                error!("failed to initialize ledger connection: {}", error);
                return Err(error);
            }
        };

        if shutdown.is_cancelled() {
            self.running.store(false, Ordering::SeqCst);
            info!("cancelled during initialization, not starting");
            return Ok(());
        }

        if let Ok(mut feed_id) = self.feed_id.write() {
            *feed_id = Some(ledger_config.feed_id.clone());
        }
        info!(
            feed_id = %ledger_config.feed_id,
            contract = %self.contract_address,
            "price pusher started"
        );

        let executor = UpdateCycleExecutor::new(
            self.quote_source.clone(),
            self.ledger.clone(),
            self.tolerance.clone(),
            ledger_config.feed_id,
        );

        // Initial cycle runs as part of start itself.
        let span = trace_update_cycle(executor.feed_id());
        let outcome = executor.run_cycle().instrument(span).await;
        record_outcome(&outcome);

        // The status view flips to stopped the moment the token fires,
        // even while a cycle is still in flight.
        let running = self.running.clone();
        let stop_signal = shutdown.clone();
        tokio::spawn(async move {
            stop_signal.cancelled().await;
            running.store(false, Ordering::SeqCst);
            info!("price pusher stopped");
        });

        let interval = self.update_interval;
        tokio::spawn(async move {
            loop {
                // The timer is armed from cycle completion, not cycle
                // start; a cancellation abandons it immediately.
                tokio::select! {
                    _ = shutdown.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {}
                }

                if shutdown.is_cancelled() {
                    break;
                }

                let span = trace_update_cycle(executor.feed_id());
                let outcome = executor.run_cycle().instrument(span).await;
                record_outcome(&outcome);
            }
        });

        Ok(())
    }

    /// Point-in-time liveness view. Available before `start`, never
    /// blocks on the update loop.
    pub fn status(&self) -> StatusSnapshot {
        let price_feed_id = self.feed_id.read().map(|guard| guard.clone()).unwrap_or(None);

        StatusSnapshot {
            is_running: self.running.load(Ordering::SeqCst),
            address: self.sender_address.clone(),
            price_feed_id,
            contract_address: self.contract_address.clone(),
        }
    }
}

fn record_outcome(outcome: &CycleOutcome) {
    metrics::CYCLES_TOTAL.inc();

    match outcome {
        CycleOutcome::Submitted { tx_ref } => {
            metrics::UPDATES_SUBMITTED.inc();
            info!(tx_ref = %tx_ref, "price update submitted");
        }
        CycleOutcome::SkippedStale => {
            metrics::CYCLES_SKIPPED_STALE.inc();
            info!("quote not newer than on-chain price, skipping update");
        }
        CycleOutcome::SkippedWithinTolerance { deviation } => {
            metrics::CYCLES_SKIPPED_WITHIN_TOLERANCE.inc();
            metrics::OBSERVED_DEVIATION.observe(*deviation);
            info!(deviation, "price within tolerance, skipping update");
        }
        CycleOutcome::Failed { error } => {
            metrics::CYCLE_FAILURES.inc();
            warn!("update cycle failed: {}", error);
        }
    }
}
