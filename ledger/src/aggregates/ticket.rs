//! Ticket ledger: minting by organizers and royalty-bearing resale.
//!
//! Ticket records are keyed by their sequence number together with the event
//! they belong to. Sequence numbers come from a single counter shared by all
//! events, and the mint ceiling of an event is checked against that shared
//! counter.

use crate::environment::LedgerEnvironment;
use crate::error::{ErrorKind, LedgerError};
use crate::limits::ROYALTY_BASIS;
use crate::reducer::Receipt;
use crate::types::{Event, EventId, LedgerState, Ticket, TicketId, TicketKey, Tier};
use serde::{Deserialize, Serialize};
use ticket_ledger_core::effect::Effect;
use ticket_ledger_core::reducer::{Reducer, Reduction};
use ticket_ledger_core::types::{Amount, FundTransfer, Identity};

/// Actions for the ticket ledger
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum TicketAction {
    /// Issue a ticket for an event to its organizer
    MintTicket {
        /// Must be the event's organizer
        caller: Identity,
        /// Event the ticket admits to
        event_id: EventId,
        /// One of `VIP`, `General`, `Premium`
        tier: String,
    },

    /// Resell a ticket, paying the organizer a royalty
    TransferTicket {
        /// Must be the ticket's current owner
        caller: Identity,
        /// Sequence number of the ticket
        ticket_id: TicketId,
        /// Event the ticket belongs to
        event_id: EventId,
        /// New owner
        recipient: Identity,
        /// Price paid by the caller
        resale_price: Amount,
    },
}

/// Event fields consulted when minting
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MintTerms {
    /// Identity allowed to mint
    pub organizer: Identity,
    /// Ceiling compared against the shared ticket counter
    pub max_tickets: u64,
}

impl From<&Event> for MintTerms {
    fn from(event: &Event) -> Self {
        Self {
            organizer: event.organizer.clone(),
            max_tickets: event.max_tickets,
        }
    }
}

/// Event fields consulted when reselling
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResaleTerms {
    /// Royalty recipient
    pub organizer: Identity,
    /// Royalty percentage
    pub royalty_rate: u64,
    /// Resales permitted per ticket
    pub resale_threshold: u64,
    /// Lowest accepted price
    pub min_price: Amount,
    /// Highest accepted price
    pub max_resale: Amount,
}

impl From<&Event> for ResaleTerms {
    fn from(event: &Event) -> Self {
        Self {
            organizer: event.organizer.clone(),
            royalty_rate: event.royalty_rate,
            resale_threshold: event.resale_threshold,
            min_price: event.min_price,
            max_resale: event.max_resale,
        }
    }
}

/// `floor(price * rate / 100)`, computed without intermediate overflow
#[must_use]
pub const fn royalty_amount(price: Amount, rate: u64) -> Amount {
    (price / ROYALTY_BASIS) * rate + (price % ROYALTY_BASIS) * rate / ROYALTY_BASIS
}

/// Why a resale was refused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ResaleRefusal {
    Classified(ErrorKind),
    Unclassified(&'static str),
}

/// Reducer for the ticket ledger
#[derive(Clone, Debug, Default)]
pub struct TicketReducer;

impl TicketReducer {
    /// Creates a new `TicketReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn validate_mint(
        state: &LedgerState,
        caller: &Identity,
        event_id: EventId,
        tier: &str,
    ) -> Result<Tier, ErrorKind> {
        let terms = state
            .events
            .get(event_id)
            .map(MintTerms::from)
            .ok_or(ErrorKind::EventNotFound)?;

        if terms.organizer != *caller {
            return Err(ErrorKind::NotAuthorized);
        }
        if state.tickets.next_ticket_id >= terms.max_tickets {
            return Err(ErrorKind::InvalidMaxTickets);
        }
        tier.parse()
    }

    fn validate_transfer(
        state: &LedgerState,
        caller: &Identity,
        key: TicketKey,
        resale_price: Amount,
    ) -> Result<ResaleTerms, ResaleRefusal> {
        let Some(ticket) = state.tickets.get(key) else {
            return Err(ResaleRefusal::Unclassified("ticket not found"));
        };
        let Some(terms) = state.events.get(key.event_id).map(ResaleTerms::from) else {
            return Err(ResaleRefusal::Unclassified("event not found"));
        };

        if ticket.owner != *caller {
            return Err(ResaleRefusal::Classified(ErrorKind::TicketNotOwned));
        }
        if !ticket.is_valid {
            return Err(ResaleRefusal::Unclassified("ticket is not valid"));
        }
        if ticket.resale_count >= terms.resale_threshold {
            return Err(ResaleRefusal::Classified(ErrorKind::TransferNotAllowed));
        }
        if resale_price < terms.min_price {
            return Err(ResaleRefusal::Unclassified("price below minimum"));
        }
        if resale_price > terms.max_resale {
            return Err(ResaleRefusal::Unclassified("price above maximum resale"));
        }
        Ok(terms)
    }

    fn mint_ticket(
        state: &mut LedgerState,
        caller: Identity,
        event_id: EventId,
        tier: &str,
    ) -> Result<Reduction<Receipt>, LedgerError> {
        let tier = match Self::validate_mint(state, &caller, event_id, tier) {
            Ok(tier) => tier,
            Err(kind) => {
                tracing::debug!(%caller, %event_id, tier, code = kind.code(), "Mint rejected: {kind}");
                return Err(kind.into());
            },
        };

        let ticket_id = TicketId::new(state.tickets.next_ticket_id);
        state.tickets.tickets.insert(
            TicketKey::new(ticket_id, event_id),
            Ticket {
                owner: caller,
                tier,
                is_valid: true,
                resale_count: 0,
            },
        );
        state.tickets.next_ticket_id += 1;

        tracing::debug!(%ticket_id, %event_id, %tier, "Ticket minted");
        Ok(Reduction::reply(Receipt::TicketMinted(ticket_id)))
    }

    fn transfer_ticket(
        state: &mut LedgerState,
        caller: Identity,
        key: TicketKey,
        recipient: Identity,
        resale_price: Amount,
    ) -> Result<Reduction<Receipt>, LedgerError> {
        let terms = match Self::validate_transfer(state, &caller, key, resale_price) {
            Ok(terms) => terms,
            Err(ResaleRefusal::Classified(kind)) => {
                tracing::debug!(%caller, ticket = %key, code = kind.code(), "Transfer rejected: {kind}");
                return Err(kind.into());
            },
            Err(ResaleRefusal::Unclassified(reason)) => {
                tracing::debug!(%caller, ticket = %key, reason, "Transfer rejected");
                return Err(LedgerError::Rejected);
            },
        };

        let Some(ticket) = state.tickets.tickets.get_mut(&key) else {
            return Err(LedgerError::Rejected);
        };

        let royalty = royalty_amount(resale_price, terms.royalty_rate);
        let payouts = Effect::chain(vec![
            Effect::Transfer(FundTransfer::new(royalty, caller.clone(), terms.organizer)),
            Effect::Transfer(FundTransfer::new(
                resale_price - royalty,
                caller,
                recipient.clone(),
            )),
        ]);

        ticket.owner = recipient;
        ticket.resale_count += 1;

        tracing::debug!(
            ticket = %key,
            owner = %ticket.owner,
            resale_count = ticket.resale_count,
            royalty,
            "Ticket transferred"
        );
        Ok(Reduction::with_effect(Receipt::TicketTransferred, payouts))
    }
}

impl Reducer for TicketReducer {
    type State = LedgerState;
    type Action = TicketAction;
    type Environment = LedgerEnvironment;
    type Reply = Receipt;
    type Error = LedgerError;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        _env: &Self::Environment,
    ) -> Result<Reduction<Receipt>, LedgerError> {
        match action {
            TicketAction::MintTicket {
                caller,
                event_id,
                tier,
            } => Self::mint_ticket(state, caller, event_id, &tier),
            TicketAction::TransferTicket {
                caller,
                ticket_id,
                event_id,
                recipient,
                resale_price,
            } => Self::transfer_ticket(
                state,
                caller,
                TicketKey::new(ticket_id, event_id),
                recipient,
                resale_price,
            ),
        }
    }
}
