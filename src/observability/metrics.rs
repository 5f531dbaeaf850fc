use lazy_static::lazy_static;
use prometheus::{Counter, Histogram, HistogramOpts, Registry};

lazy_static! {
    pub static ref REGISTRY: Registry = Registry::new();

    // Cycle metrics
    pub static ref CYCLES_TOTAL: Counter = Counter::new(
        "update_cycles_total",
        "Total number of update cycles run"
    ).unwrap();

    pub static ref UPDATES_SUBMITTED: Counter = Counter::new(
        "price_updates_submitted_total",
        "Total number of price updates submitted on-chain"
    ).unwrap();

    pub static ref CYCLES_SKIPPED_STALE: Counter = Counter::new(
        "update_cycles_skipped_stale_total",
        "Cycles skipped because the quote was not newer than the on-chain price"
    ).unwrap();

    pub static ref CYCLES_SKIPPED_WITHIN_TOLERANCE: Counter = Counter::new(
        "update_cycles_skipped_within_tolerance_total",
        "Cycles skipped because the price moved less than the configured tolerance"
    ).unwrap();

    pub static ref CYCLE_FAILURES: Counter = Counter::new(
        "update_cycle_failures_total",
        "Cycles that failed on a collaborator call"
    ).unwrap();

    // Deviation observed on within-tolerance skips
    pub static ref OBSERVED_DEVIATION: Histogram = Histogram::with_opts(
        HistogramOpts::new(
            "observed_price_deviation",
            "Deviation between the fetched quote and the on-chain price"
        ).buckets(vec![0.001, 0.01, 0.1, 1.0, 10.0, 100.0])
    ).unwrap();
}

pub fn register_metrics() {
    REGISTRY.register(Box::new(CYCLES_TOTAL.clone())).unwrap();
    REGISTRY.register(Box::new(UPDATES_SUBMITTED.clone())).unwrap();
    REGISTRY.register(Box::new(CYCLES_SKIPPED_STALE.clone())).unwrap();
    REGISTRY.register(Box::new(CYCLES_SKIPPED_WITHIN_TOLERANCE.clone())).unwrap();
    REGISTRY.register(Box::new(CYCLE_FAILURES.clone())).unwrap();
    REGISTRY.register(Box::new(OBSERVED_DEVIATION.clone())).unwrap();
}
