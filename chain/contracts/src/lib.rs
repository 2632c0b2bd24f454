//! Administered Fungible Token Ledger
//!
//! This crate implements a single-ledger fungible token with an owner who can
//! mint and burn supply, tune a capped fee-on-transfer, pause value movement,
//! blacklist accounts and, once, redirect the whole token to a successor.
//!
//! # Modules
//! - `config`: Construction parameters
//! - `events`: Ledger notifications
//! - `errors`: Token error types
//! - `security`: Ownership, pause gate, blacklist
//! - `ledger`: Balances, allowances, supply bookkeeping
//! - `fees`: Fee schedule with decimal scaling and ceilings
//! - `deprecation`: Successor routing
//! - `token`: The composed `StableToken`
//! - `snapshot`: Persisted state and state roots
//!
//! All operations take the calling identity explicitly; the host is
//! responsible for authenticating it.

pub mod config;
pub mod deprecation;
pub mod errors;
pub mod events;
pub mod fees;
pub mod ledger;
pub mod security;
pub mod snapshot;
pub mod token;

pub use config::TokenConfig;
pub use deprecation::SuccessorLedger;
pub use errors::{Result, TokenError};
pub use events::TokenEvent;
pub use snapshot::LedgerSnapshot;
pub use token::StableToken;

/// Ledger ABI version, frozen after release
pub const LEDGER_ABI_VERSION: &str = "1.0.0";
