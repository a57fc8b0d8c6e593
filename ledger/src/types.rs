//! Domain types for the ticket ledger.
//!
//! Identifiers, the three enumerated vocabularies (event type, currency,
//! tier), the records the registry and ledger keep, and the state each
//! component owns.

use crate::config::LedgerConfig;
use crate::error::ErrorKind;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use ticket_ledger_core::types::{Amount, Height, Identity};

// ============================================================================
// Identifiers
// ============================================================================

/// Sequential event identifier, starting at 0 and never reused
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EventId(u64);

impl EventId {
    /// Creates an `EventId` from its raw value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Ticket sequence number, drawn from one counter shared by every event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TicketId(u64);

impl TicketId {
    /// Creates a `TicketId` from its raw value
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw value
    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }
}

impl fmt::Display for TicketId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Key of a ticket record: its sequence number paired with its event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TicketKey {
    /// Sequence number
    pub ticket_id: TicketId,
    /// Event the ticket admits to
    pub event_id: EventId,
}

impl TicketKey {
    /// Creates a ticket key
    #[must_use]
    pub const fn new(ticket_id: TicketId, event_id: EventId) -> Self {
        Self {
            ticket_id,
            event_id,
        }
    }
}

impl fmt::Display for TicketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.ticket_id, self.event_id)
    }
}

// ============================================================================
// Enumerated vocabularies
// ============================================================================

/// Kind of event
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum EventType {
    /// `concert`
    Concert,
    /// `festival`
    Festival,
    /// `theater`
    Theater,
}

impl EventType {
    /// Wire spelling
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Concert => "concert",
            Self::Festival => "festival",
            Self::Theater => "theater",
        }
    }
}

impl FromStr for EventType {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "concert" => Ok(Self::Concert),
            "festival" => Ok(Self::Festival),
            "theater" => Ok(Self::Theater),
            _ => Err(ErrorKind::InvalidEventType),
        }
    }
}

impl fmt::Display for EventType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Currency an event is priced in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Currency {
    /// `STX`
    Stx,
    /// `USD`
    Usd,
    /// `BTC`
    Btc,
}

impl Currency {
    /// Wire spelling
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Stx => "STX",
            Self::Usd => "USD",
            Self::Btc => "BTC",
        }
    }
}

impl FromStr for Currency {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "STX" => Ok(Self::Stx),
            "USD" => Ok(Self::Usd),
            "BTC" => Ok(Self::Btc),
            _ => Err(ErrorKind::InvalidCurrency),
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Seating tier of a ticket
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Tier {
    /// `VIP`
    Vip,
    /// `General`
    General,
    /// `Premium`
    Premium,
}

impl Tier {
    /// Wire spelling
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Vip => "VIP",
            Self::General => "General",
            Self::Premium => "Premium",
        }
    }
}

impl FromStr for Tier {
    type Err = ErrorKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "VIP" => Ok(Self::Vip),
            "General" => Ok(Self::General),
            "Premium" => Ok(Self::Premium),
            _ => Err(ErrorKind::InvalidTier),
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ============================================================================
// Records
// ============================================================================

/// Creation inputs for an event, as supplied by the caller
///
/// The enumerated fields stay textual so that their validation happens at
/// its place in the creation check order.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventParams {
    /// Unique display name
    pub name: String,
    /// Ticket ceiling
    pub max_tickets: u64,
    /// Face price
    pub price: Amount,
    /// Height at which the event takes place
    pub event_date: Height,
    /// Royalty percentage on resale
    pub royalty_rate: u64,
    /// Resales permitted per ticket
    pub resale_threshold: u64,
    /// One of `concert`, `festival`, `theater`
    pub event_type: String,
    /// Venue capacity
    pub venue_capacity: u64,
    /// Grace period
    pub grace_period: u64,
    /// Venue location
    pub location: String,
    /// One of `STX`, `USD`, `BTC`
    pub currency: String,
    /// Lowest accepted resale price
    pub min_price: Amount,
    /// Highest accepted resale price
    pub max_resale: Amount,
}

/// A registered event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// Event identifier
    pub id: EventId,
    /// Unique display name
    pub name: String,
    /// Ticket ceiling
    pub max_tickets: u64,
    /// Face price
    pub price: Amount,
    /// Height at which the event takes place
    pub event_date: Height,
    /// Royalty percentage on resale
    pub royalty_rate: u64,
    /// Resales permitted per ticket
    pub resale_threshold: u64,
    /// Kind of event
    pub event_type: EventType,
    /// Venue capacity
    pub venue_capacity: u64,
    /// Grace period
    pub grace_period: u64,
    /// Venue location
    pub location: String,
    /// Pricing currency
    pub currency: Currency,
    /// Always true; no operation changes it yet
    pub status: bool,
    /// Lowest accepted resale price
    pub min_price: Amount,
    /// Highest accepted resale price
    pub max_resale: Amount,
    /// Height of creation or last update
    pub timestamp: Height,
    /// Creator; the only identity that may update it or mint its tickets
    pub organizer: Identity,
}

/// Audit snapshot of the last update applied to an event
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventUpdate {
    /// Name after the update
    pub name: String,
    /// Ticket ceiling after the update
    pub max_tickets: u64,
    /// Price after the update
    pub price: Amount,
    /// Height of the update
    pub timestamp: Height,
    /// Identity that performed it
    pub updater: Identity,
}

/// A minted ticket
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ticket {
    /// Current holder
    pub owner: Identity,
    /// Seating tier
    pub tier: Tier,
    /// Always true; no operation revokes tickets yet
    pub is_valid: bool,
    /// Completed resales
    pub resale_count: u64,
}

// ============================================================================
// State
// ============================================================================

/// Platform authority registration and the fee charged per event creation
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthorityContext {
    /// Registered platform authority, set at most once
    pub authority: Option<Identity>,
    /// Fee transferred to the authority on every event creation
    pub mint_fee: Amount,
}

impl AuthorityContext {
    /// Creates a context with no authority and the given fee
    #[must_use]
    pub const fn new(mint_fee: Amount) -> Self {
        Self {
            authority: None,
            mint_fee,
        }
    }

    /// Whether an authority has been registered
    #[must_use]
    pub const fn is_verified(&self) -> bool {
        self.authority.is_some()
    }
}

/// Event registry state
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventState {
    /// All events indexed by ID
    pub events: HashMap<EventId, Event>,
    /// Last applied update per event
    pub updates: HashMap<EventId, EventUpdate>,
    /// Name index over live event names
    pub names: HashMap<String, EventId>,
    /// Next id to assign; also the count of events ever created
    pub next_event_id: u64,
    /// Registry capacity
    pub max_events: u64,
}

impl EventState {
    /// Creates an empty registry with the given capacity
    #[must_use]
    pub fn new(max_events: u64) -> Self {
        Self {
            events: HashMap::new(),
            updates: HashMap::new(),
            names: HashMap::new(),
            next_event_id: 0,
            max_events,
        }
    }

    /// Returns an event by ID
    #[must_use]
    pub fn get(&self, id: EventId) -> Option<&Event> {
        self.events.get(&id)
    }

    /// Returns the last update applied to an event
    #[must_use]
    pub fn last_update(&self, id: EventId) -> Option<&EventUpdate> {
        self.updates.get(&id)
    }

    /// Number of events ever created
    #[must_use]
    pub const fn count(&self) -> u64 {
        self.next_event_id
    }

    /// Whether a live event carries this name
    #[must_use]
    pub fn name_exists(&self, name: &str) -> bool {
        self.names.contains_key(name)
    }

    /// Event currently registered under this name
    #[must_use]
    pub fn id_for_name(&self, name: &str) -> Option<EventId> {
        self.names.get(name).copied()
    }
}

/// Ticket ledger state
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TicketState {
    /// Tickets keyed by (sequence, event)
    pub tickets: HashMap<TicketKey, Ticket>,
    /// Next sequence number, shared by every event
    pub next_ticket_id: u64,
}

impl TicketState {
    /// Creates an empty ledger
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a ticket by key
    #[must_use]
    pub fn get(&self, key: TicketKey) -> Option<&Ticket> {
        self.tickets.get(&key)
    }

    /// Number of tickets ever minted
    #[must_use]
    pub const fn minted(&self) -> u64 {
        self.next_ticket_id
    }
}

/// Whole-ledger state: authority context, registry and tickets
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerState {
    /// Platform authority and mint fee
    pub authority: AuthorityContext,
    /// Event registry
    pub events: EventState,
    /// Ticket ledger
    pub tickets: TicketState,
}

impl LedgerState {
    /// Creates an empty ledger from configuration
    #[must_use]
    pub fn new(config: &LedgerConfig) -> Self {
        Self {
            authority: AuthorityContext::new(config.initial_mint_fee),
            events: EventState::new(config.max_events),
            tickets: TicketState::new(),
        }
    }
}

impl Default for LedgerState {
    fn default() -> Self {
        Self::new(&LedgerConfig::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vocabularies_parse_exact_spelling() {
        assert_eq!("festival".parse::<EventType>(), Ok(EventType::Festival));
        assert_eq!("Concert".parse::<EventType>(), Err(ErrorKind::InvalidEventType));
        assert_eq!("BTC".parse::<Currency>(), Ok(Currency::Btc));
        assert_eq!("stx".parse::<Currency>(), Err(ErrorKind::InvalidCurrency));
        assert_eq!("Premium".parse::<Tier>(), Ok(Tier::Premium));
        assert_eq!("vip".parse::<Tier>(), Err(ErrorKind::InvalidTier));
    }

    #[test]
    fn test_vocabularies_render_wire_spelling() {
        for tier in [Tier::Vip, Tier::General, Tier::Premium] {
            assert_eq!(tier.to_string().parse::<Tier>(), Ok(tier));
        }
        assert_eq!(EventType::Theater.to_string(), "theater");
        assert_eq!(Currency::Usd.as_str(), "USD");
    }

    #[test]
    fn test_ticket_key_display() {
        let key = TicketKey::new(TicketId::new(4), EventId::new(2));
        assert_eq!(key.to_string(), "4-2");
    }

    #[test]
    fn test_default_state_uses_default_config() {
        let state = LedgerState::default();
        assert_eq!(state.events.max_events, 1000);
        assert_eq!(state.authority.mint_fee, 1000);
        assert!(!state.authority.is_verified());
        assert_eq!(state.events.count(), 0);
        assert_eq!(state.tickets.minted(), 0);
    }
}
