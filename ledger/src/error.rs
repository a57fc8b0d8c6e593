//! Error kinds and the ledger's tagged failure type.
//!
//! Creation and minting report exactly which rule failed. Updates, authority
//! registration and most resale checks only report that the operation was
//! rejected. Both shapes share [`LedgerError`].

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classified rejection reasons with stable numeric codes
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorKind {
    /// Caller is not the event's organizer
    #[error("caller is not authorized")]
    NotAuthorized,
    /// `max_tickets` outside `(0, 10000]`, or the ticket counter reached it
    #[error("invalid max tickets")]
    InvalidMaxTickets,
    /// Price is zero
    #[error("invalid price")]
    InvalidPrice,
    /// Event date is not after the current height
    #[error("invalid event date")]
    InvalidEventDate,
    /// Royalty rate above 10
    #[error("invalid royalty rate")]
    InvalidRoyaltyRate,
    /// Resale threshold above 5
    #[error("invalid resale threshold")]
    InvalidResaleThreshold,
    /// Name already registered
    #[error("event already exists")]
    EventAlreadyExists,
    /// No event with that id
    #[error("event not found")]
    EventNotFound,
    /// No platform authority has been registered
    #[error("authority not verified")]
    AuthorityNotVerified,
    /// Minimum resale price is zero
    #[error("invalid min price")]
    InvalidMinPrice,
    /// Maximum resale price is zero
    #[error("invalid max resale")]
    InvalidMaxResale,
    /// Empty or over-long event name
    #[error("invalid update parameter")]
    InvalidUpdateParam,
    /// Registry is full
    #[error("max events exceeded")]
    MaxEventsExceeded,
    /// Event type outside the fixed set
    #[error("invalid event type")]
    InvalidEventType,
    /// Venue capacity is zero
    #[error("invalid venue capacity")]
    InvalidVenueCapacity,
    /// Grace period above 7
    #[error("invalid grace period")]
    InvalidGracePeriod,
    /// Empty or over-long location
    #[error("invalid location")]
    InvalidLocation,
    /// Currency outside the fixed set
    #[error("invalid currency")]
    InvalidCurrency,
    /// Caller does not own the ticket
    #[error("ticket not owned by caller")]
    TicketNotOwned,
    /// Ticket has used up its resales
    #[error("transfer not allowed")]
    TransferNotAllowed,
    /// Tier outside the fixed set
    #[error("invalid tier")]
    InvalidTier,
}

impl ErrorKind {
    /// Stable numeric code for this kind
    #[must_use]
    pub const fn code(self) -> u32 {
        match self {
            Self::NotAuthorized => 100,
            Self::InvalidMaxTickets => 101,
            Self::InvalidPrice => 102,
            Self::InvalidEventDate => 103,
            Self::InvalidRoyaltyRate => 104,
            Self::InvalidResaleThreshold => 105,
            Self::EventAlreadyExists => 106,
            Self::EventNotFound => 107,
            Self::AuthorityNotVerified => 109,
            Self::InvalidMinPrice => 110,
            Self::InvalidMaxResale => 111,
            Self::InvalidUpdateParam => 113,
            Self::MaxEventsExceeded => 114,
            Self::InvalidEventType => 115,
            Self::InvalidVenueCapacity => 116,
            Self::InvalidGracePeriod => 117,
            Self::InvalidLocation => 118,
            Self::InvalidCurrency => 119,
            Self::TicketNotOwned => 122,
            Self::TransferNotAllowed => 123,
            Self::InvalidTier => 125,
        }
    }
}

/// Failure outcome of any ledger operation
#[derive(Error, Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum LedgerError {
    /// A specific rule failed
    #[error("{0} (code {code})", code = .0.code())]
    Classified(ErrorKind),
    /// The operation failed without saying which rule fired
    #[error("operation rejected")]
    Rejected,
}

impl LedgerError {
    /// Numeric code of a classified failure
    #[must_use]
    pub const fn code(self) -> Option<u32> {
        match self {
            Self::Classified(kind) => Some(kind.code()),
            Self::Rejected => None,
        }
    }

    /// Classified kind, if any
    #[must_use]
    pub const fn kind(self) -> Option<ErrorKind> {
        match self {
            Self::Classified(kind) => Some(kind),
            Self::Rejected => None,
        }
    }
}

impl From<ErrorKind> for LedgerError {
    fn from(kind: ErrorKind) -> Self {
        Self::Classified(kind)
    }
}

/// Result alias used by every ledger operation
pub type LedgerResult<T> = Result<T, LedgerError>;
