//! # Ticket Ledger Testing
//!
//! Testing utilities and helpers for the ticket ledger.
//!
//! This crate provides:
//! - Mock implementations of the environment traits
//! - A Given-When-Then harness for reducers
//! - Property-based testing strategies for core primitives
//! - Assertion helpers for effects
//!
//! ## Example
//!
//! ```ignore
//! use ticket_ledger_testing::{test_height, InMemoryTransferLog};
//!
//! #[test]
//! fn test_create_event() {
//!     let log = Arc::new(InMemoryTransferLog::new());
//!     let mut ledger = Ledger::new(LedgerConfig::default(), Arc::new(test_height()), log.clone());
//!
//!     ledger.set_authority(&Identity::from("ST2TEST")).unwrap();
//!     assert!(log.is_empty());
//! }
//! ```

use ticket_ledger_core::environment::{HeightSource, TransferSink};
use ticket_ledger_core::types::{FundTransfer, Height};


pub use reducer_test::{ReducerTest, assertions};

/// Mock implementations of Environment traits
pub mod mocks {
    use super::{FundTransfer, Height, HeightSource, TransferSink};
    use std::sync::{Mutex, PoisonError};
    use std::sync::atomic::{AtomicU64, Ordering};

    /// Fixed height for deterministic tests
    ///
    /// Always returns the same height, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use ticket_ledger_testing::mocks::FixedHeight;
    /// use ticket_ledger_core::environment::HeightSource;
    /// use ticket_ledger_core::types::Height;
    ///
    /// let height = FixedHeight::new(Height::new(7));
    /// assert_eq!(height.current_height(), height.current_height());
    /// ```
    #[derive(Debug, Clone, Copy)]
    pub struct FixedHeight {
        height: Height,
    }

    impl FixedHeight {
        /// Create a new fixed height source
        #[must_use]
        pub const fn new(height: Height) -> Self {
            Self { height }
        }
    }

    impl HeightSource for FixedHeight {
        fn current_height(&self) -> Height {
            self.height
        }
    }

    /// Height source that tests can move forward between operations
    ///
    /// Heights only ever increase: `set` ignores values below the current one.
    #[derive(Debug, Default)]
    pub struct ManualHeight {
        height: AtomicU64,
    }

    impl ManualHeight {
        /// Create a manual height source starting at `start`
        #[must_use]
        pub const fn new(start: Height) -> Self {
            Self {
                height: AtomicU64::new(start.value()),
            }
        }

        /// Advance the height by `blocks`
        pub fn advance(&self, blocks: u64) {
            self.height.fetch_add(blocks, Ordering::SeqCst);
        }

        /// Move the height to `height` if it is not behind the current one
        pub fn set(&self, height: Height) {
            self.height.fetch_max(height.value(), Ordering::SeqCst);
        }
    }

    impl HeightSource for ManualHeight {
        fn current_height(&self) -> Height {
            Height::new(self.height.load(Ordering::SeqCst))
        }
    }

    /// In-memory append-only transfer log
    ///
    /// Captures every recorded transfer in order so tests can assert on the
    /// exact sequence.
    #[derive(Debug, Default)]
    pub struct InMemoryTransferLog {
        entries: Mutex<Vec<FundTransfer>>,
    }

    impl InMemoryTransferLog {
        /// Create an empty log
        #[must_use]
        pub const fn new() -> Self {
            Self {
                entries: Mutex::new(Vec::new()),
            }
        }

        /// Snapshot of every recorded transfer, oldest first
        #[must_use]
        pub fn transfers(&self) -> Vec<FundTransfer> {
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Number of recorded transfers
        #[must_use]
        pub fn len(&self) -> usize {
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .len()
        }

        /// Whether nothing has been recorded
        #[must_use]
        pub fn is_empty(&self) -> bool {
            self.len() == 0
        }
    }

    impl TransferSink for InMemoryTransferLog {
        fn record(&self, transfer: FundTransfer) {
            self.entries
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(transfer);
        }
    }

    /// Create the default fixed height for tests (height 0)
    #[must_use]
    pub const fn test_height() -> FixedHeight {
        FixedHeight::new(Height::new(0))
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use ticket_ledger_core::types::Identity;

        #[test]
        #[allow(clippy::panic)]
        fn test_transfer_log_survives_poisoned_lock() {
            let log = InMemoryTransferLog::new();
            let payer = Identity::from("ST1TEST");
            log.record(FundTransfer::new(1, payer.clone(), Identity::from("ST2")));

            let poisoned = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                let _guard = log.entries.lock();
                panic!("writer died holding the log");
            }));
            assert!(poisoned.is_err());
            assert!(log.entries.is_poisoned());

            log.record(FundTransfer::new(2, payer, Identity::from("ST3")));

            let amounts: Vec<u64> = log.transfers().iter().map(|t| t.amount).collect();
            assert_eq!(amounts, vec![1, 2]);
            assert_eq!(log.len(), 2);
        }
    }
}

/// Property-based testing utilities using proptest.
pub mod properties {
    use proptest::prelude::*;
    use ticket_ledger_core::types::{Amount, Height, Identity};

    /// Strategy for principal identities in the `ST...` test namespace
    pub fn identity() -> impl Strategy<Value = Identity> {
        "ST[0-9A-Z]{4,12}".prop_map(Identity::new)
    }

    /// Strategy for heights below `max`
    pub fn height_below(max: u64) -> impl Strategy<Value = Height> {
        (0..max).prop_map(Height::new)
    }

    /// Strategy for any non-zero amount
    pub fn positive_amount() -> impl Strategy<Value = Amount> {
        1..=Amount::MAX
    }
}

/// Initialise a test subscriber that honours `RUST_LOG`
///
/// Safe to call from several tests; only the first call installs it.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

// Re-export commonly used items
pub use mocks::{FixedHeight, InMemoryTransferLog, ManualHeight, test_height};
