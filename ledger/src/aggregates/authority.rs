//! Authority context: one-time registration of the platform authority and
//! the mint fee it collects.

use crate::environment::LedgerEnvironment;
use crate::error::LedgerError;
use crate::reducer::Receipt;
use crate::types::AuthorityContext;
use serde::{Deserialize, Serialize};
use ticket_ledger_core::reducer::{Reducer, Reduction};
use ticket_ledger_core::types::{Amount, Identity};

/// Actions for the authority context
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum AuthorityAction {
    /// Register the platform authority (once)
    SetAuthority {
        /// Principal to register
        identity: Identity,
    },
    /// Replace the mint fee
    SetMintFee {
        /// Identity requesting the change, recorded in logs only
        caller: Identity,
        /// New fee; any value is accepted
        fee: Amount,
    },
}

/// Reducer for the authority context
#[derive(Clone, Debug, Default)]
pub struct AuthorityReducer;

impl AuthorityReducer {
    /// Creates a new `AuthorityReducer`
    #[must_use]
    pub const fn new() -> Self {
        Self
    }

    fn validate_set_authority(
        state: &AuthorityContext,
        identity: &Identity,
        env: &LedgerEnvironment,
    ) -> Result<(), &'static str> {
        if *identity == env.burn_identity {
            return Err("burn identity cannot be the authority");
        }
        if state.is_verified() {
            return Err("authority already registered");
        }
        Ok(())
    }
}

impl Reducer for AuthorityReducer {
    type State = AuthorityContext;
    type Action = AuthorityAction;
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
            AuthorityAction::SetAuthority { identity } => {
                if let Err(reason) = Self::validate_set_authority(state, &identity, env) {
                    tracing::debug!(%identity, reason, "Authority registration rejected");
                    return Err(LedgerError::Rejected);
                }

                tracing::info!(%identity, "Platform authority registered");
                state.authority = Some(identity);
                Ok(Reduction::reply(Receipt::AuthoritySet))
            },

            AuthorityAction::SetMintFee { caller, fee } => {
                if !state.is_verified() {
                    tracing::debug!(%caller, fee, "Mint fee change rejected: no authority");
                    return Err(LedgerError::Rejected);
                }

                tracing::info!(%caller, old_fee = state.mint_fee, new_fee = fee, "Mint fee changed");
                state.mint_fee = fee;
                Ok(Reduction::reply(Receipt::MintFeeSet))
            },
        }
    }
}
