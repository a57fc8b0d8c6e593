//! Configuration management for the ticket ledger.
//!
//! Loads configuration from environment variables with sensible defaults.

use serde::{Deserialize, Serialize};
use std::env;
use ticket_ledger_core::types::{Amount, Identity};

/// Reserved principal that can never be registered as the platform authority.
pub const DEFAULT_BURN_IDENTITY: &str = "SP000000000000000000002Q6VF78";

/// Ledger configuration loaded from environment variables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerConfig {
    /// Maximum number of events the registry accepts
    pub max_events: u64,
    /// Mint fee in force until the authority changes it
    pub initial_mint_fee: Amount,
    /// Null/burn principal rejected as an authority
    pub burn_identity: Identity,
    /// Log level (trace, debug, info, warn, error)
    pub log_level: String,
}

impl Default for LedgerConfig {
    fn default() -> Self {
        Self {
            max_events: 1000,
            initial_mint_fee: 1000,
            burn_identity: Identity::from(DEFAULT_BURN_IDENTITY),
            log_level: "info".to_string(),
        }
    }
}

impl LedgerConfig {
    /// Load configuration from environment variables.
    ///
    /// Missing or unparsable values fall back to the defaults.
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup.
    ///
    /// `from_env` delegates here; tests pass a map instead of mutating the
    /// process environment.
    #[must_use]
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            max_events: lookup("LEDGER_MAX_EVENTS")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.max_events),
            initial_mint_fee: lookup("LEDGER_MINT_FEE")
                .and_then(|s| s.parse().ok())
                .unwrap_or(defaults.initial_mint_fee),
            burn_identity: lookup("LEDGER_BURN_IDENTITY")
                .filter(|s| !s.is_empty())
                .map_or(defaults.burn_identity, Identity::new),
            log_level: lookup("RUST_LOG").unwrap_or(defaults.log_level),
        }
    }
}
