//! # Ticket Ledger Core
//!
//! Core traits and primitive types for the ticket ledger.
//!
//! This crate provides the fundamental abstractions every ledger component is
//! written against:
//!
//! - **State**: Domain state owned by one component
//! - **Action**: All possible inputs to a reducer
//! - **Reducer**: `(State, Action, Environment) → Result<(Reply, Effects), Error>`
//! - **Effect**: Side effect descriptions (fund transfers), never executed by the reducer
//! - **Environment**: Injected collaborators (height source, transfer sink)
//!
//! ## Architecture Principles
//!
//! - Functional core, imperative shell
//! - Validation is front-loaded: a rejected action leaves state untouched
//! - Explicit effects (no hidden value movement)
//! - Dependency injection via environment traits
//!
//! ## Example
//!
//! ```ignore
//! use ticket_ledger_core::{reducer::{Reducer, Reduction}, effect::Effect};
//!
//! impl Reducer for FeeReducer {
//!     type State = FeeState;
//!     type Action = FeeAction;
//!     type Environment = FeeEnvironment;
//!     type Reply = ();
//!     type Error = FeeError;
//!
//!     fn reduce(
//!         &self,
//!         state: &mut FeeState,
//!         action: FeeAction,
//!         env: &FeeEnvironment,
//!     ) -> Result<Reduction<()>, FeeError> {
//!         // Validate, then mutate, then describe transfers
//!         Ok(Reduction::reply(()))
//!     }
//! }
//! ```

// Re-export commonly used types
pub use serde::{Deserialize, Serialize};
pub use smallvec::{SmallVec, smallvec};

/// Primitive value types shared by every ledger component
pub mod types {
    use serde::{Deserialize, Serialize};
    use std::fmt;

    /// Quantity of funds moved by a transfer.
    ///
    /// Fees, prices and royalties are all whole units of the event's currency.
    pub type Amount = u64;

    /// Opaque principal identity
    ///
    /// Identities are compared only for equality. The ledger never inspects
    /// their contents beyond recognising the reserved burn identity.
    #[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
    pub struct Identity(String);

    impl Identity {
        /// Creates an identity from its textual form
        #[must_use]
        pub fn new(principal: impl Into<String>) -> Self {
            Self(principal.into())
        }

        /// Returns the textual form of the identity
        #[must_use]
        pub fn as_str(&self) -> &str {
            &self.0
        }
    }

    impl fmt::Display for Identity {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str(&self.0)
        }
    }

    impl From<&str> for Identity {
        fn from(principal: &str) -> Self {
            Self::new(principal)
        }
    }

    /// Externally supplied monotonic counter standing in for time
    #[derive(
        Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
    )]
    pub struct Height(u64);

    impl Height {
        /// Creates a height from its raw value
        #[must_use]
        pub const fn new(value: u64) -> Self {
            Self(value)
        }

        /// Returns the raw height value
        #[must_use]
        pub const fn value(self) -> u64 {
            self.0
        }
    }

    impl fmt::Display for Height {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            write!(f, "{}", self.0)
        }
    }

    /// One entry of the fund transfer log
    ///
    /// The ledger records transfers; settling them is the sink's job.
    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    pub struct FundTransfer {
        /// Quantity moved
        pub amount: Amount,
        /// Paying identity
        pub from: Identity,
        /// Receiving identity
        pub to: Identity,
    }

    impl FundTransfer {
        /// Creates a new transfer record
        #[must_use]
        pub const fn new(amount: Amount, from: Identity, to: Identity) -> Self {
            Self { amount, from, to }
        }
    }
}

/// Reducer module - The core trait for business logic
///
/// Reducers validate an action against current state, apply it in place, and
/// return the effects the runtime must carry out. A reducer that returns an
/// error must not have touched state.
pub mod reducer {
    use super::effect::Effect;
    use smallvec::SmallVec;

    /// Effects produced by a single successful reduction.
    ///
    /// Four inline slots cover every ledger operation without allocating.
    pub type Effects = SmallVec<[Effect; 4]>;

    /// Successful outcome of a reduction: the reply for the caller plus the
    /// effects to execute, in order.
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct Reduction<R> {
        /// Value returned to the caller
        pub reply: R,
        /// Effect descriptions, executed in order
        pub effects: Effects,
    }

    impl<R> Reduction<R> {
        /// A reduction with a reply and no effects
        #[must_use]
        pub fn reply(reply: R) -> Self {
            Self {
                reply,
                effects: SmallVec::new(),
            }
        }

        /// A reduction with a reply and one effect
        #[must_use]
        pub fn with_effect(reply: R, effect: Effect) -> Self {
            let mut effects = SmallVec::new();
            effects.push(effect);
            Self { reply, effects }
        }

        /// Converts the reply, keeping the effects
        #[must_use]
        pub fn map<U>(self, f: impl FnOnce(R) -> U) -> Reduction<U> {
            Reduction {
                reply: f(self.reply),
                effects: self.effects,
            }
        }
    }

    /// The Reducer trait - core abstraction for business logic
    ///
    /// # Type Parameters
    ///
    /// - `State`: The domain state this reducer operates on
    /// - `Action`: The action type this reducer processes
    /// - `Environment`: The injected dependencies this reducer needs
    /// - `Reply`: The value handed back to the caller on success
    /// - `Error`: The rejection type
    pub trait Reducer {
        /// The state type this reducer operates on
        type State;

        /// The action type this reducer processes
        type Action;

        /// The environment type with injected dependencies
        type Environment;

        /// The value returned to the caller on success
        type Reply;

        /// The rejection returned when validation fails
        type Error;

        /// Reduce an action into state changes and effects
        ///
        /// 1. Validates the action (every check before any mutation)
        /// 2. Updates state in place
        /// 3. Returns the reply and effect descriptions
        ///
        /// # Errors
        ///
        /// Returns `Self::Error` when the action is rejected. State is left
        /// exactly as it was.
        fn reduce(
            &self,
            state: &mut Self::State,
            action: Self::Action,
            env: &Self::Environment,
        ) -> Result<Reduction<Self::Reply>, Self::Error>;
    }
}

/// Effect module - Side effect descriptions
///
/// Effects describe value movement to be recorded by a [`TransferSink`].
/// They are values, not execution.
///
/// [`TransferSink`]: crate::environment::TransferSink
pub mod effect {
    use super::environment::TransferSink;
    use super::types::FundTransfer;

    /// Effect type - describes a side effect to be executed
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum Effect {
        /// No-op effect
        None,

        /// Record one fund transfer
        Transfer(FundTransfer),

        /// Run effects in order
        Sequential(Vec<Effect>),
    }

    impl Effect {
        /// Chain effects to run sequentially
        #[must_use]
        pub const fn chain(effects: Vec<Self>) -> Self {
            Self::Sequential(effects)
        }

        /// Flattens this effect into the transfers it describes, depth-first
        #[must_use]
        pub fn transfers(&self) -> Vec<&FundTransfer> {
            let mut out = Vec::new();
            self.collect_transfers(&mut out);
            out
        }

        fn collect_transfers<'a>(&'a self, out: &mut Vec<&'a FundTransfer>) {
            match self {
                Self::None => {},
                Self::Transfer(transfer) => out.push(transfer),
                Self::Sequential(effects) => {
                    for effect in effects {
                        effect.collect_transfers(out);
                    }
                },
            }
        }

        /// Executes the effect against a sink, returning the number of
        /// transfers recorded
        pub fn execute(self, sink: &dyn TransferSink) -> usize {
            match self {
                Self::None => 0,
                Self::Transfer(transfer) => {
                    sink.record(transfer);
                    1
                },
                Self::Sequential(effects) => {
                    effects.into_iter().map(|effect| effect.execute(sink)).sum()
                },
            }
        }
    }
}

/// Environment module - Dependency injection traits
///
/// All external collaborators are abstracted behind traits and injected via
/// the Environment parameter or the runtime.
pub mod environment {
    use super::types::{FundTransfer, Height};

    /// Height source - the externally supplied notion of "now"
    ///
    /// The ledger reads the current height but never advances it.
    ///
    /// # Examples
    ///
    /// ```ignore
    /// // Test - fixed height for deterministic tests
    /// struct FixedHeight(Height);
    /// impl HeightSource for FixedHeight {
    ///     fn current_height(&self) -> Height {
    ///         self.0
    ///     }
    /// }
    /// ```
    pub trait HeightSource: Send + Sync {
        /// Get the current height
        fn current_height(&self) -> Height;
    }

    /// Fund transfer sink - append-only log of transfers
    ///
    /// Settlement is the sink's responsibility; the ledger only appends.
    pub trait TransferSink: Send + Sync {
        /// Append one transfer to the log
        fn record(&self, transfer: FundTransfer);
    }
}
