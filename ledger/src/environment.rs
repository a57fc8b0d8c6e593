//! Environment dependencies shared by the ledger reducers.

use crate::config::LedgerConfig;
use std::sync::Arc;
use ticket_ledger_core::environment::HeightSource;
use ticket_ledger_core::types::{Height, Identity};

/// Injected collaborators for every ledger reducer
#[derive(Clone)]
pub struct LedgerEnvironment {
    /// Source of the current height
    pub height: Arc<dyn HeightSource>,
    /// Principal that can never be registered as the authority
    pub burn_identity: Identity,
}

impl LedgerEnvironment {
    /// Creates a new `LedgerEnvironment`
    #[must_use]
    pub fn new(height: Arc<dyn HeightSource>, burn_identity: Identity) -> Self {
        Self {
            height,
            burn_identity,
        }
    }

    /// Creates an environment using the configured burn identity
    #[must_use]
    pub fn from_config(height: Arc<dyn HeightSource>, config: &LedgerConfig) -> Self {
        Self::new(height, config.burn_identity.clone())
    }

    /// Current height as reported by the height source
    #[must_use]
    pub fn now(&self) -> Height {
        self.height.current_height()
    }
}

impl std::fmt::Debug for LedgerEnvironment {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LedgerEnvironment")
            .field("height", &self.height.current_height())
            .field("burn_identity", &self.burn_identity)
            .finish()
    }
}
