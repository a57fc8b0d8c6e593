//! # Ticket Ledger
//!
//! Event registry and ticket ledger with royalty-enforced resale.
//!
//! An organizer registers an event, paying the mint fee to the platform
//! authority, then mints tickets for it. Tickets can be resold a limited
//! number of times within the event's price band, and every resale routes a
//! royalty to the organizer.
//!
//! ## Components
//!
//! - **Authority context**: the platform authority, registered once, and the
//!   fee it collects per event creation
//! - **Event registry**: validated creation, organizer-only updates, and a
//!   unique name index
//! - **Ticket ledger**: minting against a shared sequence counter and resale
//!   with royalty payout
//!
//! Every component is a [`Reducer`](ticket_ledger_core::reducer::Reducer).
//! Fund movements are described as effects and appended to a
//! [`TransferSink`](ticket_ledger_core::environment::TransferSink); the ledger
//! never settles them itself.
//!
//! ## Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use ticket_ledger::{Ledger, LedgerConfig};
//! use ticket_ledger_core::types::Identity;
//! use ticket_ledger_testing::{InMemoryTransferLog, test_height};
//!
//! let log = Arc::new(InMemoryTransferLog::new());
//! let mut ledger = Ledger::new(&LedgerConfig::default(), Arc::new(test_height()), log.clone());
//!
//! ledger.set_authority(&Identity::from("ST2TEST"))?;
//! let event_id = ledger.create_event(&Identity::from("ST1TEST"), params)?;
//! let ticket_id = ledger.mint_ticket(&Identity::from("ST1TEST"), event_id, "VIP")?;
//! ```

pub mod aggregates;
pub mod config;
pub mod environment;
pub mod error;
pub mod ledger;
pub mod limits;
pub mod reducer;
pub mod types;

pub use aggregates::{AuthorityAction, EventAction, TicketAction};
pub use config::LedgerConfig;
pub use environment::LedgerEnvironment;
pub use error::{ErrorKind, LedgerError, LedgerResult};
pub use ledger::{Ledger, LedgerStore, ledger_store};
pub use reducer::{LedgerAction, LedgerReducer, Receipt};
pub use types::{
    Currency, Event, EventId, EventParams, EventType, EventUpdate, LedgerState, Ticket, TicketId,
    TicketKey, Tier,
};
