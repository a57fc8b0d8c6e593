//! Synchronous ledger facade and the concurrent store built on the same
//! reducer.
//!
//! [`Ledger`] is for a single serialized caller: each method runs one
//! reducer invocation and records its transfers before returning.
//! [`LedgerStore`] wraps the same reducer in the runtime `Store` for callers
//! that share the ledger across tasks.

use crate::aggregates::{AuthorityAction, EventAction, TicketAction};
use crate::config::LedgerConfig;
use crate::environment::LedgerEnvironment;
use crate::error::{LedgerError, LedgerResult};
use crate::reducer::{LedgerAction, LedgerReducer, Receipt};
use crate::types::{Event, EventId, EventParams, EventUpdate, LedgerState, Ticket, TicketId, TicketKey};
use std::sync::Arc;
use ticket_ledger_core::environment::{HeightSource, TransferSink};
use ticket_ledger_core::reducer::Reducer;
use ticket_ledger_core::types::{Amount, Identity};
use ticket_ledger_runtime::Store;

/// Ledger shared between concurrent callers
pub type LedgerStore = Store<LedgerReducer>;

/// Builds a [`LedgerStore`] with empty state from configuration
#[must_use]
pub fn ledger_store(
    config: &LedgerConfig,
    height: Arc<dyn HeightSource>,
    sink: Arc<dyn TransferSink>,
) -> LedgerStore {
    Store::new(
        LedgerState::new(config),
        LedgerReducer::new(),
        LedgerEnvironment::from_config(height, config),
        sink,
    )
}

/// In-process ledger for one serialized caller
pub struct Ledger {
    state: LedgerState,
    reducer: LedgerReducer,
    environment: LedgerEnvironment,
    sink: Arc<dyn TransferSink>,
}

impl Ledger {
    /// Creates an empty ledger
    #[must_use]
    pub fn new(
        config: &LedgerConfig,
        height: Arc<dyn HeightSource>,
        sink: Arc<dyn TransferSink>,
    ) -> Self {
        Self {
            state: LedgerState::new(config),
            reducer: LedgerReducer::new(),
            environment: LedgerEnvironment::from_config(height, config),
            sink,
        }
    }

    fn apply(&mut self, action: LedgerAction) -> LedgerResult<Receipt> {
        let reduction = self
            .reducer
            .reduce(&mut self.state, action, &self.environment)?;
        for effect in reduction.effects {
            effect.execute(self.sink.as_ref());
        }
        Ok(reduction.reply)
    }

    // ------------------------------------------------------------------
    // Authority context
    // ------------------------------------------------------------------

    /// Registers the platform authority.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Rejected`] if `identity` is the burn identity or an
    /// authority is already registered.
    pub fn set_authority(&mut self, identity: &Identity) -> LedgerResult<()> {
        self.apply(
            AuthorityAction::SetAuthority {
                identity: identity.clone(),
            }
            .into(),
        )
        .map(drop)
    }

    /// Replaces the mint fee.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Rejected`] if no authority is registered.
    pub fn set_mint_fee(&mut self, caller: &Identity, fee: Amount) -> LedgerResult<()> {
        self.apply(
            AuthorityAction::SetMintFee {
                caller: caller.clone(),
                fee,
            }
            .into(),
        )
        .map(drop)
    }

    /// Registered authority, if any
    #[must_use]
    pub const fn authority(&self) -> Option<&Identity> {
        self.state.authority.authority.as_ref()
    }

    /// Fee charged per event creation
    #[must_use]
    pub const fn mint_fee(&self) -> Amount {
        self.state.authority.mint_fee
    }

    // ------------------------------------------------------------------
    // Event registry
    // ------------------------------------------------------------------

    /// Registers an event organized by `caller` and charges the mint fee.
    ///
    /// # Errors
    ///
    /// The classified kind of the first creation rule that fails.
    pub fn create_event(&mut self, caller: &Identity, params: EventParams) -> LedgerResult<EventId> {
        match self.apply(
            EventAction::CreateEvent {
                caller: caller.clone(),
                params,
            }
            .into(),
        )? {
            Receipt::EventCreated(id) => Ok(id),
            _ => Err(LedgerError::Rejected),
        }
    }

    /// Renames and re-prices an event.
    ///
    /// # Errors
    ///
    /// [`LedgerError::Rejected`] whenever any update rule fails.
    pub fn update_event(
        &mut self,
        caller: &Identity,
        event_id: EventId,
        name: &str,
        max_tickets: u64,
        price: Amount,
    ) -> LedgerResult<()> {
        self.apply(
            EventAction::UpdateEvent {
                caller: caller.clone(),
                event_id,
                name: name.to_string(),
                max_tickets,
                price,
            }
            .into(),
        )
        .map(drop)
    }

    /// Looks up an event
    #[must_use]
    pub fn get_event(&self, event_id: EventId) -> Option<&Event> {
        self.state.events.get(event_id)
    }

    /// Number of events ever created
    #[must_use]
    pub const fn get_event_count(&self) -> u64 {
        self.state.events.count()
    }

    /// Whether a live event currently carries this name
    #[must_use]
    pub fn check_event_existence(&self, name: &str) -> bool {
        self.state.events.name_exists(name)
    }

    /// Last update applied to an event
    #[must_use]
    pub fn get_event_update(&self, event_id: EventId) -> Option<&EventUpdate> {
        self.state.events.last_update(event_id)
    }

    // ------------------------------------------------------------------
    // Ticket ledger
    // ------------------------------------------------------------------

    /// Mints a ticket for an event to its organizer.
    ///
    /// # Errors
    ///
    /// `EventNotFound`, `NotAuthorized`, `InvalidMaxTickets` or
    /// `InvalidTier`, checked in that order.
    pub fn mint_ticket(
        &mut self,
        caller: &Identity,
        event_id: EventId,
        tier: &str,
    ) -> LedgerResult<TicketId> {
        match self.apply(
            TicketAction::MintTicket {
                caller: caller.clone(),
                event_id,
                tier: tier.to_string(),
            }
            .into(),
        )? {
            Receipt::TicketMinted(id) => Ok(id),
            _ => Err(LedgerError::Rejected),
        }
    }

    /// Resells a ticket and records the royalty and remainder transfers.
    ///
    /// # Errors
    ///
    /// `TicketNotOwned` or `TransferNotAllowed` when those rules fail;
    /// [`LedgerError::Rejected`] for every other rule.
    pub fn transfer_ticket(
        &mut self,
        caller: &Identity,
        ticket_id: TicketId,
        event_id: EventId,
        recipient: &Identity,
        resale_price: Amount,
    ) -> LedgerResult<()> {
        self.apply(
            TicketAction::TransferTicket {
                caller: caller.clone(),
                ticket_id,
                event_id,
                recipient: recipient.clone(),
                resale_price,
            }
            .into(),
        )
        .map(drop)
    }

    /// Looks up a ticket by sequence number and event
    #[must_use]
    pub fn get_ticket(&self, ticket_id: TicketId, event_id: EventId) -> Option<&Ticket> {
        self.state.tickets.get(TicketKey::new(ticket_id, event_id))
    }

    /// Read-only view of the whole state
    #[must_use]
    pub const fn state(&self) -> &LedgerState {
        &self.state
    }
}

impl std::fmt::Debug for Ledger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Ledger")
            .field("state", &self.state)
            .field("environment", &self.environment)
            .finish_non_exhaustive()
    }
}
