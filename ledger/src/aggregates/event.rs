//! Event registry for the ticket ledger.
//!
//! Owns event records, the name index and the per-event update audit trail.
//! Creation is validated rule by rule in a fixed order and reports which
//! rule failed; updates only report that they were rejected.

use crate::environment::LedgerEnvironment;
use crate::error::{ErrorKind, LedgerError};
use crate::limits::{
    MAX_GRACE_PERIOD, MAX_RESALE_THRESHOLD, MAX_ROYALTY_RATE, is_valid_max_tickets, is_valid_text,
};
use crate::reducer::Receipt;
use crate::types::{Currency, Event, EventId, EventParams, EventType, EventUpdate, LedgerState};
use serde::{Deserialize, Serialize};
use ticket_ledger_core::effect::Effect;
use ticket_ledger_core::reducer::{Reducer, Reduction};
use ticket_ledger_core::types::{Amount, FundTransfer, Height, Identity};

// ============================================================================
// Actions
// ============================================================================

/// Actions for the event registry
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventAction {
    /// Register a new event; the caller becomes its organizer
    CreateEvent {
        /// Prospective organizer
        caller: Identity,
        /// Creation inputs
        params: EventParams,
    },

    /// Rename and re-price an existing event
    UpdateEvent {
        /// Must be the event's organizer
        caller: Identity,
        /// Event to update
        event_id: EventId,
        /// New name
        name: String,
        /// New ticket ceiling
        max_tickets: u64,
        /// New price
        price: Amount,
    },
}

/// Parsed values produced by a successful creation check
#[derive(Debug)]
struct CreateCheck {
    event_type: EventType,
    currency: Currency,
    authority: Identity,
}

// ============================================================================
// Reducer
// ============================================================================

/// Reducer for the event registry
#[derive(Clone, Debug, Default)]
pub struct EventReducer;

impl EventReducer {
    /// Creates a new `EventReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    /// Validates `CreateEvent`; the first failing rule wins
    fn validate_create_event(
        state: &LedgerState,
        params: &EventParams,
        now: Height,
    ) -> Result<CreateCheck, ErrorKind> {
        if state.events.next_event_id >= state.events.max_events {
            return Err(ErrorKind::MaxEventsExceeded);
        }
        if !is_valid_text(&params.name) {
            return Err(ErrorKind::InvalidUpdateParam);
        }
        if !is_valid_max_tickets(params.max_tickets) {
            return Err(ErrorKind::InvalidMaxTickets);
        }
        if params.price == 0 {
            return Err(ErrorKind::InvalidPrice);
        }
        if params.event_date <= now {
            return Err(ErrorKind::InvalidEventDate);
        }
        if params.royalty_rate > MAX_ROYALTY_RATE {
            return Err(ErrorKind::InvalidRoyaltyRate);
        }
        if params.resale_threshold > MAX_RESALE_THRESHOLD {
            return Err(ErrorKind::InvalidResaleThreshold);
        }
        let event_type: EventType = params.event_type.parse()?;
        if params.venue_capacity == 0 {
            return Err(ErrorKind::InvalidVenueCapacity);
        }
        if params.grace_period > MAX_GRACE_PERIOD {
            return Err(ErrorKind::InvalidGracePeriod);
        }
        if !is_valid_text(&params.location) {
            return Err(ErrorKind::InvalidLocation);
        }
        let currency: Currency = params.currency.parse()?;
        if params.min_price == 0 {
            return Err(ErrorKind::InvalidMinPrice);
        }
        if params.max_resale == 0 {
            return Err(ErrorKind::InvalidMaxResale);
        }
        if state.events.name_exists(&params.name) {
            return Err(ErrorKind::EventAlreadyExists);
        }
        let Some(authority) = state.authority.authority.clone() else {
            return Err(ErrorKind::AuthorityNotVerified);
        };

        Ok(CreateCheck {
            event_type,
            currency,
            authority,
        })
    }

    /// Validates `UpdateEvent`
    fn validate_update_event(
        state: &LedgerState,
        caller: &Identity,
        event_id: EventId,
        name: &str,
        max_tickets: u64,
        price: Amount,
    ) -> Result<(), &'static str> {
        let Some(event) = state.events.get(event_id) else {
            return Err("event not found");
        };
        if event.organizer != *caller {
            return Err("caller is not the organizer");
        }
        if !is_valid_text(name) {
            return Err("invalid name");
        }
        if !is_valid_max_tickets(max_tickets) {
            return Err("invalid max tickets");
        }
        if price == 0 {
            return Err("invalid price");
        }
        if state
            .events
            .id_for_name(name)
            .is_some_and(|owner| owner != event_id)
        {
            return Err("name belongs to another event");
        }
        Ok(())
    }

    fn create_event(
        state: &mut LedgerState,
        caller: Identity,
        params: EventParams,
        env: &LedgerEnvironment,
    ) -> Result<Reduction<Receipt>, LedgerError> {
        let now = env.now();
        let check = match Self::validate_create_event(state, &params, now) {
            Ok(check) => check,
            Err(kind) => {
                tracing::debug!(%caller, name = %params.name, code = kind.code(), "Event creation rejected: {kind}");
                return Err(kind.into());
            },
        };

        let fee = Effect::Transfer(FundTransfer::new(
            state.authority.mint_fee,
            caller.clone(),
            check.authority,
        ));

        let id = EventId::new(state.events.next_event_id);
        let event = Event {
            id,
            name: params.name,
            max_tickets: params.max_tickets,
            price: params.price,
            event_date: params.event_date,
            royalty_rate: params.royalty_rate,
            resale_threshold: params.resale_threshold,
            event_type: check.event_type,
            venue_capacity: params.venue_capacity,
            grace_period: params.grace_period,
            location: params.location,
            currency: check.currency,
            status: true,
            min_price: params.min_price,
            max_resale: params.max_resale,
            timestamp: now,
            organizer: caller,
        };

        tracing::debug!(event_id = %id, name = %event.name, organizer = %event.organizer, "Event created");
        state.events.names.insert(event.name.clone(), id);
        state.events.events.insert(id, event);
        state.events.next_event_id += 1;

        Ok(Reduction::with_effect(Receipt::EventCreated(id), fee))
    }

    fn update_event(
        state: &mut LedgerState,
        caller: Identity,
        event_id: EventId,
        name: String,
        max_tickets: u64,
        price: Amount,
        env: &LedgerEnvironment,
    ) -> Result<Reduction<Receipt>, LedgerError> {
        if let Err(reason) =
            Self::validate_update_event(state, &caller, event_id, &name, max_tickets, price)
        {
            tracing::debug!(%caller, %event_id, reason, "Event update rejected");
            return Err(LedgerError::Rejected);
        }

        let now = env.now();
        let Some(event) = state.events.events.get_mut(&event_id) else {
            return Err(LedgerError::Rejected);
        };

        let old_name = std::mem::replace(&mut event.name, name.clone());
        event.max_tickets = max_tickets;
        event.price = price;
        event.timestamp = now;

        state.events.names.remove(&old_name);
        state.events.names.insert(name.clone(), event_id);
        state.events.updates.insert(
            event_id,
            EventUpdate {
                name,
                max_tickets,
                price,
                timestamp: now,
                updater: caller,
            },
        );

        tracing::debug!(%event_id, %old_name, "Event updated");
        Ok(Reduction::reply(Receipt::EventUpdated))
    }
}

impl Reducer for EventReducer {
    type State = LedgerState;
    type Action = EventAction;
    type Environment = LedgerEnvironment;
    type Reply = Receipt;
    type Error = LedgerError;

    fn reduce(
        &self,
        state: &mut Self::State,
        action: Self::Action,
        env: &Self::Environment,
    ) -> Result<Reduction<Receipt>, LedgerError> {
        match action {
            EventAction::CreateEvent { caller, params } => {
                Self::create_event(state, caller, params, env)
            },
            EventAction::UpdateEvent {
                caller,
                event_id,
                name,
                max_tickets,
                price,
            } => Self::update_event(state, caller, event_id, name, max_tickets, price, env),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BURN_IDENTITY;
    use std::sync::Arc;
    use ticket_ledger_core::environment::HeightSource;
    use ticket_ledger_testing::{FixedHeight, ReducerTest, assertions, test_height};

    fn env_at(height: impl HeightSource + 'static) -> LedgerEnvironment {
        LedgerEnvironment::new(Arc::new(height), Identity::from(DEFAULT_BURN_IDENTITY))
    }

    fn test_env() -> LedgerEnvironment {
        env_at(test_height())
    }

    fn concert(name: &str) -> EventParams {
        EventParams {
            name: name.to_string(),
            max_tickets: 100,
            price: 50,
            event_date: Height::new(1000),
            royalty_rate: 5,
            resale_threshold: 3,
            event_type: "concert".to_string(),
            venue_capacity: 500,
            grace_period: 2,
            location: "ArenaX".to_string(),
            currency: "STX".to_string(),
            min_price: 40,
            max_resale: 100,
        }
    }

    fn verified_state() -> LedgerState {
        let mut state = LedgerState::default();
        state.authority.authority = Some(Identity::from("ST2TEST"));
        state
    }

    fn state_with_event(name: &str) -> LedgerState {
        let mut state = verified_state();
        EventReducer::new()
            .reduce(
                &mut state,
                EventAction::CreateEvent {
                    caller: Identity::from("ST1TEST"),
                    params: concert(name),
                },
                &test_env(),
            )
            .unwrap();
        state
    }

    fn create(caller: &str, params: EventParams) -> EventAction {
        EventAction::CreateEvent {
            caller: Identity::from(caller),
            params,
        }
    }

    fn update(caller: &str, id: u64, name: &str, max_tickets: u64, price: Amount) -> EventAction {
        EventAction::UpdateEvent {
            caller: Identity::from(caller),
            event_id: EventId::new(id),
            name: name.to_string(),
            max_tickets,
            price,
        }
    }

    fn assert_create_fails(params: EventParams, expected: ErrorKind) {
        ReducerTest::new(EventReducer::new())
            .with_env(test_env())
            .given_state(verified_state())
            .when_action(create("ST1TEST", params))
            .then_state(|state| assert_eq!(state.events.count(), 0))
            .then_error(move |error| assert_eq!(*error, LedgerError::Classified(expected)))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_create_event_success() {
        ReducerTest::new(EventReducer::new())
            .with_env(test_env())
            .given_state(verified_state())
            .when_action(create("ST1TEST", concert("ConcertA")))
            .then_state(|state| {
                assert_eq!(state.events.count(), 1);
                let event = state.events.get(EventId::new(0)).unwrap();
                assert_eq!(event.name, "ConcertA");
                assert_eq!(event.max_tickets, 100);
                assert_eq!(event.price, 50);
                assert_eq!(event.event_type, EventType::Concert);
                assert_eq!(event.currency, Currency::Stx);
                assert_eq!(event.organizer, Identity::from("ST1TEST"));
                assert!(event.status);
                assert!(state.events.name_exists("ConcertA"));
            })
            .then_reply(|reply| assert_eq!(*reply, Receipt::EventCreated(EventId::new(0))))
            .then_effects(|effects| {
                assertions::assert_transfers(
                    effects,
                    &[FundTransfer::new(
                        1000,
                        Identity::from("ST1TEST"),
                        Identity::from("ST2TEST"),
                    )],
                );
            })
            .run();
    }

    #[test]
    fn test_create_event_records_creation_height() {
        ReducerTest::new(EventReducer::new())
            .with_env(env_at(FixedHeight::new(Height::new(42))))
            .given_state(verified_state())
            .when_action(create("ST1TEST", concert("Late")))
            .then_state(|state| {
                let event = state.events.get(EventId::new(0)).unwrap();
                assert_eq!(event.timestamp, Height::new(42));
            })
            .run();
    }

    #[test]
    fn test_create_event_ids_are_sequential() {
        let mut state = state_with_event("First");
        let outcome = EventReducer::new()
            .reduce(&mut state, create("ST1TEST", concert("Second")), &test_env())
            .unwrap();
        assert_eq!(outcome.reply, Receipt::EventCreated(EventId::new(1)));
        assert_eq!(state.events.count(), 2);
    }

    #[test]
    fn test_create_event_duplicate_name() {
        let mut params = concert("ConcertA");
        params.max_tickets = 200;
        params.event_type = "festival".to_string();
        params.currency = "USD".to_string();

        ReducerTest::new(EventReducer::new())
            .with_env(test_env())
            .given_state(state_with_event("ConcertA"))
            .when_action(create("ST5OTHER", params))
            .then_state(|state| assert_eq!(state.events.count(), 1))
            .then_error(|error| {
                assert_eq!(*error, LedgerError::Classified(ErrorKind::EventAlreadyExists));
            })
            .run();
    }

    #[test]
    fn test_create_event_without_authority() {
        ReducerTest::new(EventReducer::new())
            .with_env(test_env())
            .given_state(LedgerState::default())
            .when_action(create("ST1TEST", concert("NoAuth")))
            .then_error(|error| {
                assert_eq!(*error, LedgerError::Classified(ErrorKind::AuthorityNotVerified));
            })
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_create_event_registry_full() {
        let mut state = verified_state();
        state.events.max_events = 1;
        let reducer = EventReducer::new();
        reducer
            .reduce(&mut state, create("ST1TEST", concert("Only")), &test_env())
            .unwrap();

        let error = reducer
            .reduce(&mut state, create("ST1TEST", concert("")), &test_env())
            .unwrap_err();
        assert_eq!(error, LedgerError::Classified(ErrorKind::MaxEventsExceeded));
    }

    #[test]
    fn test_create_event_rule_failures() {
        let cases: [(fn(&mut EventParams), ErrorKind); 15] = [
            (|p| p.name = String::new(), ErrorKind::InvalidUpdateParam),
            (|p| p.name = "n".repeat(101), ErrorKind::InvalidUpdateParam),
            (|p| p.max_tickets = 0, ErrorKind::InvalidMaxTickets),
            (|p| p.max_tickets = 10_001, ErrorKind::InvalidMaxTickets),
            (|p| p.price = 0, ErrorKind::InvalidPrice),
            (|p| p.event_date = Height::new(0), ErrorKind::InvalidEventDate),
            (|p| p.royalty_rate = 11, ErrorKind::InvalidRoyaltyRate),
            (|p| p.resale_threshold = 6, ErrorKind::InvalidResaleThreshold),
            (|p| p.event_type = "opera".to_string(), ErrorKind::InvalidEventType),
            (|p| p.venue_capacity = 0, ErrorKind::InvalidVenueCapacity),
            (|p| p.grace_period = 8, ErrorKind::InvalidGracePeriod),
            (|p| p.location = String::new(), ErrorKind::InvalidLocation),
            (|p| p.currency = "EUR".to_string(), ErrorKind::InvalidCurrency),
            (|p| p.min_price = 0, ErrorKind::InvalidMinPrice),
            (|p| p.max_resale = 0, ErrorKind::InvalidMaxResale),
        ];

        for (mutate, expected) in cases {
            let mut params = concert("Rules");
            mutate(&mut params);
            assert_create_fails(params, expected);
        }
    }

    #[test]
    fn test_create_event_boundary_values_accepted() {
        let mut params = concert("Edges");
        params.max_tickets = 10_000;
        params.royalty_rate = 10;
        params.resale_threshold = 5;
        params.grace_period = 7;
        params.event_date = Height::new(1);
        params.name = "n".repeat(100);
        params.location = "l".repeat(100);

        ReducerTest::new(EventReducer::new())
            .with_env(test_env())
            .given_state(verified_state())
            .when_action(create("ST1TEST", params))
            .then_reply(|reply| assert_eq!(*reply, Receipt::EventCreated(EventId::new(0))))
            .run();
    }

    #[test]
    fn test_create_event_validation_order() {
        let mut params = concert("Order");
        params.max_tickets = 10_001;
        params.event_type = "opera".to_string();
        assert_create_fails(params, ErrorKind::InvalidMaxTickets);
    }

    #[test]
    fn test_update_event_success() {
        ReducerTest::new(EventReducer::new())
            .with_env(env_at(FixedHeight::new(Height::new(7))))
            .given_state(state_with_event("OldEvent"))
            .when_action(update("ST1TEST", 0, "NewEvent", 150, 75))
            .then_state(|state| {
                let event = state.events.get(EventId::new(0)).unwrap();
                assert_eq!(event.name, "NewEvent");
                assert_eq!(event.max_tickets, 150);
                assert_eq!(event.price, 75);
                assert_eq!(event.timestamp, Height::new(7));
                assert_eq!(event.event_date, Height::new(1000));
                assert!(!state.events.name_exists("OldEvent"));
                assert_eq!(state.events.id_for_name("NewEvent"), Some(EventId::new(0)));

                let audit = state.events.last_update(EventId::new(0)).unwrap();
                assert_eq!(audit.name, "NewEvent");
                assert_eq!(audit.updater, Identity::from("ST1TEST"));
                assert_eq!(audit.timestamp, Height::new(7));
            })
            .then_reply(|reply| assert_eq!(*reply, Receipt::EventUpdated))
            .then_effects(assertions::assert_no_effects)
            .run();
    }

    #[test]
    fn test_update_event_to_own_name() {
        ReducerTest::new(EventReducer::new())
            .with_env(test_env())
            .given_state(state_with_event("Same"))
            .when_action(update("ST1TEST", 0, "Same", 120, 60))
            .then_state(|state| {
                assert_eq!(state.events.id_for_name("Same"), Some(EventId::new(0)));
                assert_eq!(state.events.get(EventId::new(0)).unwrap().max_tickets, 120);
            })
            .then_reply(|reply| assert_eq!(*reply, Receipt::EventUpdated))
            .run();
    }

    #[test]
    fn test_update_event_to_other_events_name() {
        let mut state = state_with_event("First");
        EventReducer::new()
            .reduce(&mut state, create("ST1TEST", concert("Second")), &test_env())
            .unwrap();
        let before = state.clone();

        ReducerTest::new(EventReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(update("ST1TEST", 1, "First", 120, 60))
            .then_state(move |state| assert_eq!(*state, before))
            .then_error(|error| assert_eq!(*error, LedgerError::Rejected))
            .run();
    }

    #[test]
    fn test_update_event_by_non_organizer() {
        let state = state_with_event("TestEvent");
        let before = state.clone();

        ReducerTest::new(EventReducer::new())
            .with_env(test_env())
            .given_state(state)
            .when_action(update("ST3FAKE", 0, "NewEvent", 150, 75))
            .then_state(move |state| assert_eq!(*state, before))
            .then_error(|error| assert_eq!(*error, LedgerError::Rejected))
            .run();
    }

    #[test]
    fn test_update_event_rejections_are_unclassified() {
        let cases = [
            update("ST1TEST", 99, "NewEvent", 150, 75),
            update("ST1TEST", 0, "", 150, 75),
            update("ST1TEST", 0, "NewEvent", 0, 75),
            update("ST1TEST", 0, "NewEvent", 10_001, 75),
            update("ST1TEST", 0, "NewEvent", 150, 0),
        ];

        for action in cases {
            ReducerTest::new(EventReducer::new())
                .with_env(test_env())
                .given_state(state_with_event("TestEvent"))
                .when_action(action)
                .then_state(|state| {
                    assert_eq!(state.events.get(EventId::new(0)).unwrap().name, "TestEvent");
                    assert!(state.events.last_update(EventId::new(0)).is_none());
                })
                .then_error(|error| assert_eq!(*error, LedgerError::Rejected))
                .run();
        }
    }

    #[test]
    fn test_renamed_name_is_reusable() {
        let mut state = state_with_event("Original");
        let reducer = EventReducer::new();
        reducer
            .reduce(&mut state, update("ST1TEST", 0, "Renamed", 100, 50), &test_env())
            .unwrap();

        let outcome = reducer
            .reduce(&mut state, create("ST1TEST", concert("Original")), &test_env())
            .unwrap();
        assert_eq!(outcome.reply, Receipt::EventCreated(EventId::new(1)));
    }
}
