//! # Ticket Ledger Runtime
//!
//! Runtime implementation for the ticket ledger.
//!
//! The reducers in the ledger are synchronous and assume one serialized
//! caller. This crate provides the Store that makes them safe to share
//! between concurrent callers: every `send` runs one reducer invocation and
//! its effects under a single write lock, so each public operation is the
//! atomic unit.
//!
//! ## Core Components
//!
//! - **Store**: Owns state behind an async `RwLock`, runs the reducer, executes effects
//! - **Metrics**: Counters and histograms for accepted/rejected actions
//!
//! ## Example
//!
//! ```ignore
//! use ticket_ledger_runtime::Store;
//!
//! let store = Store::new(initial_state, reducer, environment, transfer_sink);
//!
//! // Send an action
//! let receipt = store.send(action).await?;
//!
//! // Read state
//! let count = store.state(|s| s.events.count()).await;
//! ```

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use ticket_ledger_core::{environment::TransferSink, reducer::Reducer};
use tokio::sync::RwLock;

/// Prometheus metrics for observability
pub mod metrics;

/// Error types for the Store runtime
pub mod error {
    use thiserror::Error;

    /// Errors that can occur during Store operations
    #[derive(Error, Debug, PartialEq, Eq)]
    pub enum StoreError<E> {
        /// The reducer rejected the action; state is unchanged
        #[error("Action rejected: {0}")]
        Rejected(E),

        /// Store is shutting down and not accepting new actions
        ///
        /// This error is returned when `send()` is called after shutdown initiated.
        #[error("Store is shutting down")]
        ShutdownInProgress,
    }

    impl<E> StoreError<E> {
        /// Returns the reducer rejection, if that is what this error is
        #[must_use]
        pub const fn rejection(&self) -> Option<&E> {
            match self {
                Self::Rejected(error) => Some(error),
                Self::ShutdownInProgress => None,
            }
        }
    }
}

pub use error::StoreError;

/// Store runtime for coordinating reducer execution and effect handling.
pub mod store {
    use super::{Arc, AtomicBool, Ordering, Reducer, RwLock, StoreError, TransferSink};
    use crate::metrics::StoreMetrics;

    /// The Store - runtime coordinator for a reducer
    ///
    /// The Store manages:
    /// 1. State (behind `RwLock` for concurrent access)
    /// 2. Reducer (business logic)
    /// 3. Environment (injected dependencies)
    /// 4. Effect execution into the transfer sink
    ///
    /// Cloning a Store is cheap and every clone shares the same state.
    ///
    /// # Example
    ///
    /// ```ignore
    /// let store = Store::new(
    ///     LedgerState::new(&config),
    ///     LedgerReducer::new(),
    ///     environment,
    ///     Arc::new(InMemoryTransferLog::new()),
    /// );
    ///
    /// store.send(LedgerAction::Authority(AuthorityAction::SetAuthority {
    ///     identity: Identity::from("ST2TEST"),
    /// })).await?;
    /// ```
    pub struct Store<R>
    where
        R: Reducer,
    {
        state: Arc<RwLock<R::State>>,
        reducer: Arc<R>,
        environment: Arc<R::Environment>,
        sink: Arc<dyn TransferSink>,
        shutdown: Arc<AtomicBool>,
    }

    impl<R> Clone for Store<R>
    where
        R: Reducer,
    {
        fn clone(&self) -> Self {
            Self {
                state: Arc::clone(&self.state),
                reducer: Arc::clone(&self.reducer),
                environment: Arc::clone(&self.environment),
                sink: Arc::clone(&self.sink),
                shutdown: Arc::clone(&self.shutdown),
            }
        }
    }

    impl<R> Store<R>
    where
        R: Reducer + Send + Sync,
        R::State: Send + Sync,
        R::Action: std::fmt::Debug,
        R::Environment: Send + Sync,
        R::Error: std::fmt::Display,
    {
        /// Create a new store with initial state, reducer, environment and sink
        ///
        /// # Arguments
        ///
        /// - `initial_state`: The starting state for the store
        /// - `reducer`: The reducer implementation (business logic)
        /// - `environment`: Injected dependencies
        /// - `sink`: Where `Effect::Transfer` entries are recorded
        #[must_use]
        pub fn new(
            initial_state: R::State,
            reducer: R,
            environment: R::Environment,
            sink: Arc<dyn TransferSink>,
        ) -> Self {
            Self {
                state: Arc::new(RwLock::new(initial_state)),
                reducer: Arc::new(reducer),
                environment: Arc::new(environment),
                sink,
                shutdown: Arc::new(AtomicBool::new(false)),
            }
        }

        /// Send an action to the store
        ///
        /// The reducer runs under the write lock and its effects are executed
        /// before the lock is released, so the transfer log order always
        /// matches the order in which operations were applied.
        ///
        /// # Errors
        ///
        /// - [`StoreError::Rejected`]: the reducer rejected the action
        /// - [`StoreError::ShutdownInProgress`]: the store is shutting down
        #[tracing::instrument(skip(self), name = "store_send")]
        pub async fn send(&self, action: R::Action) -> Result<R::Reply, StoreError<R::Error>> {
            if self.shutdown.load(Ordering::Acquire) {
                tracing::warn!("Rejected action: store is shutting down");
                return Err(StoreError::ShutdownInProgress);
            }

            let mut state = self.state.write().await;
            tracing::trace!("Acquired write lock on state");

            let start = std::time::Instant::now();
            let outcome = {
                let span = tracing::debug_span!("reducer_execution");
                let _enter = span.enter();
                self.reducer.reduce(&mut *state, action, &self.environment)
            };
            let duration = start.elapsed();

            match outcome {
                Ok(reduction) => {
                    let recorded: usize = reduction
                        .effects
                        .into_iter()
                        .map(|effect| effect.execute(self.sink.as_ref()))
                        .sum();
                    drop(state);

                    StoreMetrics::record_accepted(recorded, duration);
                    tracing::debug!(transfers = recorded, "Action accepted");
                    Ok(reduction.reply)
                },
                Err(error) => {
                    drop(state);

                    StoreMetrics::record_rejected(duration);
                    tracing::debug!(%error, "Action rejected");
                    Err(StoreError::Rejected(error))
                },
            }
        }

        /// Read current state via a closure
        ///
        /// Access state through a closure to ensure the lock is released promptly:
        ///
        /// ```ignore
        /// let event_count = store.state(|s| s.events.count()).await;
        /// ```
        pub async fn state<F, T>(&self, f: F) -> T
        where
            F: FnOnce(&R::State) -> T,
        {
            let state = self.state.read().await;
            f(&*state)
        }

        /// Stop accepting new actions
        ///
        /// Actions already holding the write lock run to completion.
        pub fn shutdown(&self) {
            tracing::info!("Initiating shutdown");
            self.shutdown.store(true, Ordering::Release);
        }

        /// Whether `shutdown` has been called
        #[must_use]
        pub fn is_shutting_down(&self) -> bool {
            self.shutdown.load(Ordering::Acquire)
        }
    }
}

pub use store::Store;
