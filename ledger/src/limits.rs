//! Business-rule bounds enforced on every event and ticket.

/// Longest accepted event name or location, in characters.
pub const MAX_TEXT_LEN: usize = 100;

/// Upper bound on an event's `max_tickets` (inclusive).
pub const MAX_TICKETS_PER_EVENT: u64 = 10_000;

/// Highest royalty percentage an organizer may take on resale.
pub const MAX_ROYALTY_RATE: u64 = 10;

/// Highest number of resales an event may permit per ticket.
pub const MAX_RESALE_THRESHOLD: u64 = 5;

/// Longest grace period an event may declare.
pub const MAX_GRACE_PERIOD: u64 = 7;

/// Denominator of the royalty percentage.
pub const ROYALTY_BASIS: u64 = 100;

/// True when `text` is non-empty and at most [`MAX_TEXT_LEN`] characters.
#[must_use]
pub fn is_valid_text(text: &str) -> bool {
    !text.is_empty() && text.chars().count() <= MAX_TEXT_LEN
}

/// True when `max_tickets` lies in `(0, MAX_TICKETS_PER_EVENT]`.
#[must_use]
pub const fn is_valid_max_tickets(max_tickets: u64) -> bool {
    max_tickets > 0 && max_tickets <= MAX_TICKETS_PER_EVENT
}
