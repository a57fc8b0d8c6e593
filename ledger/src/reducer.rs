//! Root reducer dispatching ledger actions to the component reducers.

use crate::aggregates::{
    AuthorityAction, AuthorityReducer, EventAction, EventReducer, TicketAction, TicketReducer,
};
use crate::environment::LedgerEnvironment;
use crate::error::LedgerError;
use crate::types::{EventId, LedgerState, TicketId};
use serde::{Deserialize, Serialize};
use ticket_ledger_core::reducer::{Reducer, Reduction};

/// Successful outcome of a ledger operation
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Receipt {
    /// Authority registered
    AuthoritySet,
    /// Mint fee replaced
    MintFeeSet,
    /// Event registered under this id
    EventCreated(EventId),
    /// Event updated
    EventUpdated,
    /// Ticket minted with this sequence number
    TicketMinted(TicketId),
    /// Ticket resold
    TicketTransferred,
}

/// Every operation the ledger accepts
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LedgerAction {
    /// Authority context operation
    Authority(AuthorityAction),
    /// Event registry operation
    Event(EventAction),
    /// Ticket ledger operation
    Ticket(TicketAction),
}

impl From<AuthorityAction> for LedgerAction {
    fn from(action: AuthorityAction) -> Self {
        Self::Authority(action)
    }
}

impl From<EventAction> for LedgerAction {
    fn from(action: EventAction) -> Self {
        Self::Event(action)
    }
}

impl From<TicketAction> for LedgerAction {
    fn from(action: TicketAction) -> Self {
        Self::Ticket(action)
    }
}

/// Root reducer over the whole ledger state
#[derive(Clone, Debug, Default)]
pub struct LedgerReducer {
    authority: AuthorityReducer,
    events: EventReducer,
    tickets: TicketReducer,
}

impl LedgerReducer {
    /// Creates a new `LedgerReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self {
            authority: AuthorityReducer::new(),
            events: EventReducer::new(),
            tickets: TicketReducer::new(),
        }
    }
}

impl Reducer for LedgerReducer {
    type State = LedgerState;
    type Action = LedgerAction;
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
            LedgerAction::Authority(action) => {
                self.authority.reduce(&mut state.authority, action, env)
            },
            LedgerAction::Event(action) => self.events.reduce(state, action, env),
            LedgerAction::Ticket(action) => self.tickets.reduce(state, action, env),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DEFAULT_BURN_IDENTITY;
    use std::sync::Arc;
    use ticket_ledger_core::types::Identity;
    use ticket_ledger_testing::{ReducerTest, test_height};

    fn test_env() -> LedgerEnvironment {
        LedgerEnvironment::new(Arc::new(test_height()), Identity::from(DEFAULT_BURN_IDENTITY))
    }

    #[test]
    fn test_authority_actions_reach_authority_context() {
        ReducerTest::new(LedgerReducer::new())
            .with_env(test_env())
            .given_state(LedgerState::default())
            .when_action(LedgerAction::from(AuthorityAction::SetAuthority {
                identity: Identity::from("ST2TEST"),
            }))
            .then_state(|state| {
                assert_eq!(state.authority.authority, Some(Identity::from("ST2TEST")));
                assert_eq!(state.events.count(), 0);
            })
            .then_reply(|reply| assert_eq!(*reply, Receipt::AuthoritySet))
            .run();
    }

    #[test]
    fn test_ticket_actions_reach_ticket_ledger() {
        ReducerTest::new(LedgerReducer::new())
            .with_env(test_env())
            .given_state(LedgerState::default())
            .when_action(LedgerAction::from(TicketAction::MintTicket {
                caller: Identity::from("ST1TEST"),
                event_id: EventId::new(0),
                tier: "VIP".to_string(),
            }))
            .then_error(|error| assert_eq!(error.code(), Some(107)))
            .run();
    }
}
