//! Property-based tests for the ledger.

#![allow(clippy::unwrap_used)]

use proptest::prelude::*;
use std::sync::Arc;
use ticket_ledger::aggregates::royalty_amount;
use ticket_ledger::limits::{MAX_ROYALTY_RATE, MAX_TICKETS_PER_EVENT};
use ticket_ledger::{ErrorKind, EventId, EventParams, Ledger, LedgerConfig, LedgerError};
use ticket_ledger_core::types::{Height, Identity};
use ticket_ledger_testing::properties::{height_below, identity, positive_amount};
use ticket_ledger_testing::{FixedHeight, InMemoryTransferLog, test_height};

fn ledger() -> (Ledger, Arc<InMemoryTransferLog>) {
    let log = Arc::new(InMemoryTransferLog::new());
    let mut ledger = Ledger::new(&LedgerConfig::default(), Arc::new(test_height()), log.clone());
    ledger.set_authority(&Identity::from("ST2TEST")).unwrap();
    (ledger, log)
}

fn params(name: String, max_tickets: u64, event_type: &str) -> EventParams {
    EventParams {
        name,
        max_tickets,
        price: 50,
        event_date: Height::new(1000),
        royalty_rate: 5,
        resale_threshold: 3,
        event_type: event_type.to_string(),
        venue_capacity: 500,
        grace_period: 2,
        location: "ArenaX".to_string(),
        currency: "BTC".to_string(),
        min_price: 40,
        max_resale: 100,
    }
}

fn bad_event_type() -> impl Strategy<Value = String> {
    "[a-z]{1,10}".prop_filter("must not be a known event type", |s| {
        !matches!(s.as_str(), "concert" | "festival" | "theater")
    })
}

proptest! {
    #[test]
    fn royalty_split_sums_to_price(price in any::<u64>(), rate in 0..=MAX_ROYALTY_RATE) {
        let royalty = royalty_amount(price, rate);
        let exact = u128::from(price) * u128::from(rate) / 100;

        prop_assert_eq!(u128::from(royalty), exact);
        prop_assert!(royalty <= price);
        prop_assert_eq!(royalty + (price - royalty), price);
    }

    #[test]
    fn created_ids_equal_prior_count(count in 1_usize..20) {
        let (mut ledger, log) = ledger();
        for i in 0..count {
            let before = ledger.get_event_count();
            let id = ledger
                .create_event(&Identity::from("ST1TEST"), params(format!("Event{i}"), 10, "theater"))
                .unwrap();
            prop_assert_eq!(id, EventId::new(before));
            prop_assert_eq!(ledger.get_event_count(), before + 1);
        }
        prop_assert_eq!(log.len(), count);
    }

    #[test]
    fn event_date_must_be_after_current_height(
        (now, event_date) in (1_u64..5_000).prop_flat_map(|now| (Just(now), height_below(now + 1))),
    ) {
        let log = Arc::new(InMemoryTransferLog::new());
        let mut ledger = Ledger::new(
            &LedgerConfig::default(),
            Arc::new(FixedHeight::new(Height::new(now))),
            log.clone(),
        );
        ledger.set_authority(&Identity::from("ST2TEST")).unwrap();

        let mut past = params("Past".to_string(), 10, "concert");
        past.event_date = event_date;
        let error = ledger.create_event(&Identity::from("ST1TEST"), past).unwrap_err();
        prop_assert_eq!(error, LedgerError::Classified(ErrorKind::InvalidEventDate));
        prop_assert!(log.is_empty());

        let mut next = params("Next".to_string(), 10, "concert");
        next.event_date = Height::new(now + 1);
        prop_assert_eq!(
            ledger.create_event(&Identity::from("ST1TEST"), next),
            Ok(EventId::new(0))
        );
    }

    #[test]
    fn max_tickets_error_dominates_event_type(
        max_tickets in prop_oneof![Just(0_u64), (MAX_TICKETS_PER_EVENT + 1)..u64::MAX],
        event_type in bad_event_type(),
    ) {
        let (mut ledger, log) = ledger();
        let error = ledger
            .create_event(&Identity::from("ST1TEST"), params("Bad".to_string(), max_tickets, &event_type))
            .unwrap_err();

        prop_assert_eq!(error, LedgerError::Classified(ErrorKind::InvalidMaxTickets));
        prop_assert!(log.is_empty());
    }

    #[test]
    fn strangers_cannot_update(
        stranger in identity(),
        max_tickets in 1..=MAX_TICKETS_PER_EVENT,
        price in positive_amount(),
    ) {
        prop_assume!(stranger != Identity::from("ST1TEST"));
        let (mut ledger, _log) = ledger();
        let id = ledger
            .create_event(&Identity::from("ST1TEST"), params("Owned".to_string(), 10, "concert"))
            .unwrap();
        let before = ledger.get_event(id).cloned();

        let result = ledger.update_event(&stranger, id, "Stolen", max_tickets, price);

        prop_assert_eq!(result, Err(LedgerError::Rejected));
        prop_assert_eq!(ledger.get_event(id).cloned(), before);
    }
}
