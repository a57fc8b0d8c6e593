//! Ticket ledger demo binary
//!
//! Walks one event through its lifecycle on a shared `LedgerStore`: the
//! authority is registered, an organizer creates an event and mints a
//! ticket, and the ticket is resold with a royalty.

use std::sync::Arc;
use ticket_ledger::{
    AuthorityAction, EventAction, EventId, EventParams, LedgerConfig, Receipt, TicketAction,
    ledger_store,
};
use ticket_ledger_core::types::{Height, Identity};
use ticket_ledger_runtime::metrics::MetricsRecorder;
use ticket_ledger_testing::{InMemoryTransferLog, ManualHeight};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = LedgerConfig::from_env();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| config.log_level.clone().into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let mut metrics = MetricsRecorder::new();
    metrics.start()?;

    tracing::info!(
        max_events = config.max_events,
        mint_fee = config.initial_mint_fee,
        "Starting ticket ledger demo"
    );

    let height = Arc::new(ManualHeight::new(Height::new(1)));
    let log = Arc::new(InMemoryTransferLog::new());
    let store = ledger_store(&config, height.clone(), log.clone());

    let authority = Identity::from("ST2TEST");
    let organizer = Identity::from("ST1TEST");
    let buyer = Identity::from("ST4RECIP");

    println!("=== Ticket Ledger Demo ===\n");

    store
        .send(AuthorityAction::SetAuthority {
            identity: authority.clone(),
        }
        .into())
        .await?;
    println!("Authority registered: {authority}");

    let params = EventParams {
        name: "ConcertA".to_string(),
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
    };
    let receipt = store
        .send(EventAction::CreateEvent {
            caller: organizer.clone(),
            params,
        }
        .into())
        .await?;
    let Receipt::EventCreated(event_id) = receipt else {
        anyhow::bail!("unexpected receipt for event creation: {receipt:?}");
    };
    println!("Event created: {event_id}");

    height.advance(10);

    let receipt = store
        .send(TicketAction::MintTicket {
            caller: organizer.clone(),
            event_id,
            tier: "VIP".to_string(),
        }
        .into())
        .await?;
    let Receipt::TicketMinted(ticket_id) = receipt else {
        anyhow::bail!("unexpected receipt for mint: {receipt:?}");
    };
    println!("Ticket minted: {ticket_id}");

    store
        .send(TicketAction::TransferTicket {
            caller: organizer.clone(),
            ticket_id,
            event_id,
            recipient: buyer.clone(),
            resale_price: 60,
        }
        .into())
        .await?;
    println!("Ticket {ticket_id} resold to {buyer} for 60");

    let rejected = store
        .send(EventAction::CreateEvent {
            caller: buyer.clone(),
            params: params_of(&store, event_id).await?,
        }
        .into())
        .await;
    if let Err(error) = rejected {
        println!("Duplicate event name refused: {error}");
    }

    println!("\nTransfer log:");
    for transfer in log.transfers() {
        println!("  {} from {} to {}", transfer.amount, transfer.from, transfer.to);
    }

    let event = store.state(|s| s.events.get(event_id).cloned()).await;
    println!("\nEvent record:\n{}", serde_json::to_string_pretty(&event)?);

    if let Some(text) = metrics.render() {
        println!("\nMetrics:\n{text}");
    }

    Ok(())
}

/// Creation inputs matching an existing event
async fn params_of(
    store: &ticket_ledger::LedgerStore,
    event_id: EventId,
) -> anyhow::Result<EventParams> {
    let event = store
        .state(|s| s.events.get(event_id).cloned())
        .await
        .ok_or_else(|| anyhow::anyhow!("event {event_id} not found"))?;

    Ok(EventParams {
        name: event.name,
        max_tickets: event.max_tickets,
        price: event.price,
        event_date: event.event_date,
        royalty_rate: event.royalty_rate,
        resale_threshold: event.resale_threshold,
        event_type: event.event_type.to_string(),
        venue_capacity: event.venue_capacity,
        grace_period: event.grace_period,
        location: event.location,
        currency: event.currency.to_string(),
        min_price: event.min_price,
        max_resale: event.max_resale,
    })
}
