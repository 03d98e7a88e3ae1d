use metrics::Counter;
use metrics_derive::Metrics;

/// Metrics for a [`Migrator`](crate::migration::Migrator).
#[derive(Metrics, Clone)]
#[metrics(scope = "migration")]
pub struct MigrationMetrics {
    /// Number of transactions sent on-chain.
    pub transfers_sent: Counter,
    /// Number of transactions that failed on-chain.
    pub transfers_failed: Counter,
    /// Number of transactions skipped for an exhausted fee budget.
    pub transfers_skipped: Counter,
    /// Number of failed gas estimations.
    pub estimation_failures: Counter,
    /// Number of permit and Permit2 signatures produced.
    pub signatures: Counter,
    /// Number of failed permit and Permit2 signatures.
    pub signature_failures: Counter,
    /// Number of relay dispatches.
    pub relay_dispatches: Counter,
}
