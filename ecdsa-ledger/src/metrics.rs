//! Metrics collection for observability
//!
//! # Metrics
//!
//! - `ledger_transfers_total` - Transfers applied
//! - `ledger_transfers_rejected_total` - Transfers rejected, by reason
//! - `ledger_balance_queries_total` - Balance lookups served
//! - `ledger_transfer_amount` - Histogram of applied transfer amounts

use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, Opts, Registry, TextEncoder,
};
use std::sync::Arc;

/// Metrics collector
#[derive(Clone)]
pub struct Metrics {
    /// Transfers applied
    pub transfers_total: IntCounter,

    /// Transfers rejected, labelled by error kind
    pub transfers_rejected: IntCounterVec,

    /// Balance lookups
    pub balance_queries: IntCounter,

    /// Applied transfer amounts
    pub transfer_amount: Histogram,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl std::fmt::Debug for Metrics {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Metrics")
            .field("transfers_total", &self.transfers_total.get())
            .field("balance_queries", &self.balance_queries.get())
            .finish_non_exhaustive()
    }
}

impl Metrics {
    /// Create new metrics collector with its own registry
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let transfers_total =
            IntCounter::new("ledger_transfers_total", "Total number of transfers applied")?;
        registry.register(Box::new(transfers_total.clone()))?;

        let transfers_rejected = IntCounterVec::new(
            Opts::new(
                "ledger_transfers_rejected_total",
                "Total number of transfers rejected",
            ),
            &["reason"],
        )?;
        registry.register(Box::new(transfers_rejected.clone()))?;

        let balance_queries = IntCounter::new(
            "ledger_balance_queries_total",
            "Total number of balance queries",
        )?;
        registry.register(Box::new(balance_queries.clone()))?;

        let transfer_amount = Histogram::with_opts(
            HistogramOpts::new("ledger_transfer_amount", "Histogram of applied transfer amounts")
                .buckets(vec![1.0, 10.0, 50.0, 100.0, 500.0, 1_000.0, 10_000.0]),
        )?;
        registry.register(Box::new(transfer_amount.clone()))?;

        Ok(Self {
            transfers_total,
            transfers_rejected,
            balance_queries,
            transfer_amount,
            registry,
        })
    }

    /// Record an applied transfer
    pub fn record_transfer(&self, amount: u64) {
        self.transfers_total.inc();
        self.transfer_amount.observe(amount as f64);
    }

    /// Record a rejected transfer
    pub fn record_rejection(&self, reason: &str) {
        self.transfers_rejected.with_label_values(&[reason]).inc();
    }

    /// Record a balance query
    pub fn record_balance_query(&self) {
        self.balance_queries.inc();
    }

    /// Render the registry in Prometheus text format
    pub fn export(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_creation() {
        let metrics = Metrics::new().unwrap();
        assert_eq!(metrics.transfers_total.get(), 0);
        assert_eq!(metrics.balance_queries.get(), 0);
    }

    #[test]
    fn test_record_transfer() {
        let metrics = Metrics::new().unwrap();
        metrics.record_transfer(30);
        metrics.record_transfer(5);
        assert_eq!(metrics.transfers_total.get(), 2);
        assert_eq!(metrics.transfer_amount.get_sample_count(), 2);
    }

    #[test]
    fn test_record_rejection() {
        let metrics = Metrics::new().unwrap();
        metrics.record_rejection("insufficient_funds");
        metrics.record_rejection("insufficient_funds");
        metrics.record_rejection("invalid_signature");

        assert_eq!(
            metrics
                .transfers_rejected
                .with_label_values(&["insufficient_funds"])
                .get(),
            2
        );
    }

    #[test]
    fn test_export() {
        let metrics = Metrics::new().unwrap();
        metrics.record_balance_query();

        let text = metrics.export().unwrap();
        assert!(text.contains("ledger_balance_queries_total 1"));
    }
}
