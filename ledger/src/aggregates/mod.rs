//! Component reducers of the ticket ledger.
//!
//! - Authority: one-time platform authority registration and the mint fee
//! - Event: event creation, updates and the name index
//! - Ticket: minting and royalty-bearing resale

pub mod authority;
pub mod event;
pub mod ticket;

pub use authority::{AuthorityAction, AuthorityReducer};
pub use event::{EventAction, EventReducer};
pub use ticket::{MintTerms, ResaleTerms, TicketAction, TicketReducer, royalty_amount};
