//! Prometheus metrics for observability and monitoring.
//!
//! This module describes the metrics emitted by the store runtime:
//! - Actions processed and rejected
//! - Fund transfers recorded
//! - Reducer execution time
//!
//! Metrics are rendered in the Prometheus text format on demand; there is no
//! HTTP listener.
//!
//! # Example
//!
//! ```rust,no_run
//! use ticket_ledger_runtime::metrics::MetricsRecorder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let mut recorder = MetricsRecorder::new();
//! recorder.start()?;
//!
//! // ... drive the store ...
//!
//! if let Some(text) = recorder.render() {
//!     println!("{text}");
//! }
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use std::time::Duration;
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Process-wide Prometheus recorder.
#[derive(Default)]
pub struct MetricsRecorder {
    handle: Option<PrometheusHandle>,
}

impl MetricsRecorder {
    /// Create a recorder that has not been installed yet.
    #[must_use]
    pub const fn new() -> Self {
        Self { handle: None }
    }

    /// Register metric descriptions and install the global recorder.
    ///
    /// # Errors
    ///
    /// Returns error if the exporter cannot be built or installed.
    ///
    /// # Note
    ///
    /// If a recorder is already installed (e.g., by another test), this logs
    /// a warning and leaves `render` returning `None`.
    pub fn start(&mut self) -> Result<(), MetricsError> {
        register_metrics();

        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[
                    0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.05, 0.1,
                ],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        match builder.install_recorder() {
            Ok(handle) => {
                self.handle = Some(handle);
                tracing::info!("Metrics recorder installed");
                Ok(())
            },
            Err(e) => {
                let err_msg = e.to_string();
                if err_msg.contains("already initialized") {
                    tracing::warn!("Metrics recorder already initialized, skipping re-initialization");
                    Ok(())
                } else {
                    Err(MetricsError::Install(err_msg))
                }
            },
        }
    }

    /// Render current metrics in Prometheus format.
    ///
    /// Returns `None` if the recorder hasn't been installed by this instance.
    #[must_use]
    pub fn render(&self) -> Option<String> {
        self.handle.as_ref().map(PrometheusHandle::render)
    }
}

/// Register all metric descriptions.
fn register_metrics() {
    describe_counter!(
        "store_actions_total",
        "Total number of actions sent to the store"
    );
    describe_counter!(
        "store_actions_rejected_total",
        "Total number of actions rejected by the reducer"
    );
    describe_counter!(
        "store_transfers_recorded_total",
        "Total number of fund transfers appended to the transfer sink"
    );
    describe_histogram!(
        "store_reducer_duration_seconds",
        "Time taken to execute the reducer for one action"
    );
}

/// Store metrics recorder.
pub struct StoreMetrics;

impl StoreMetrics {
    /// Record an accepted action and the transfers it produced.
    pub fn record_accepted(transfers: usize, duration: Duration) {
        counter!("store_actions_total").increment(1);
        counter!("store_transfers_recorded_total").increment(transfers as u64);
        histogram!("store_reducer_duration_seconds").record(duration.as_secs_f64());
    }

    /// Record a rejected action.
    pub fn record_rejected(duration: Duration) {
        counter!("store_actions_total").increment(1);
        counter!("store_actions_rejected_total").increment(1);
        histogram!("store_reducer_duration_seconds").record(duration.as_secs_f64());
    }
}
