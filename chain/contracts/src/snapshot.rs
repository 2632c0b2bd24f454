//! Snapshots: persisted ledger state and state roots
//!
//! A snapshot captures everything a host must persist to rebuild the token:
//! balances, allowances, supply, fee schedule, blacklist, pause flag,
//! owner and the deprecation target. Maps are sorted so the JSON encoding
//! is canonical, and the state root is the SHA-256 of that encoding.
//!
//! The notification log is not part of the snapshot; hosts persist events
//! as they drain them.

use ledger_types::fee::FeeSchedule;
use ledger_types::ids::Address;
use ledger_types::numeric::Amount;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use tracing::info;

use crate::config::MAX_DECIMALS;
use crate::deprecation::{DeprecationRouter, SuccessorLedger};
use crate::errors::{Result, TokenError};
use crate::fees::FeeEngine;
use crate::ledger::Ledger;
use crate::security::{AccessControl, Blacklist, PauseGuard};
use crate::token::StableToken;

/// Snapshot format version
pub const SNAPSHOT_VERSION: u32 = 1;

/// One allowance row.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AllowanceEntry {
    pub owner: Address,
    pub spender: Address,
    pub amount: Amount,
}

/// Full persisted state of one token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LedgerSnapshot {
    pub version: u32,
    pub address: Address,
    pub name: String,
    pub symbol: String,
    pub decimals: u8,
    pub owner: Address,
    pub total_supply: Amount,
    pub balances: BTreeMap<Address, Amount>,
    /// Sorted by (owner, spender)
    pub allowances: Vec<AllowanceEntry>,
    pub fee_schedule: FeeSchedule,
    /// Sorted ascending
    pub blacklist: Vec<Address>,
    pub paused: bool,
    pub successor: Option<Address>,
}

impl LedgerSnapshot {
    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| TokenError::Serialization(e.to_string()))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json).map_err(|e| TokenError::Serialization(e.to_string()))
    }

    /// SHA-256 over the canonical JSON encoding.
    pub fn state_root(&self) -> Result<[u8; 32]> {
        let bytes = serde_json::to_vec(self).map_err(|e| TokenError::Serialization(e.to_string()))?;
        Ok(compute_hash(&bytes))
    }
}

/// Compute SHA-256 hash of arbitrary data.
pub fn compute_hash(data: &[u8]) -> [u8; 32] {
    let mut hasher = Sha256::new();
    hasher.update(data);
    hasher.finalize().into()
}

impl StableToken {
    /// Capture the persisted state.
    pub fn snapshot(&self) -> LedgerSnapshot {
        let mut allowances: Vec<AllowanceEntry> = self
            .ledger
            .allowance_entries()
            .map(|(&(owner, spender), &amount)| AllowanceEntry {
                owner,
                spender,
                amount,
            })
            .collect();
        allowances.sort();

        LedgerSnapshot {
            version: SNAPSHOT_VERSION,
            address: self.address,
            name: self.name.clone(),
            symbol: self.symbol.clone(),
            decimals: self.decimals,
            owner: self.access_control.owner(),
            total_supply: self.ledger.total_supply(),
            balances: self
                .ledger
                .holders()
                .map(|(&holder, &amount)| (holder, amount))
                .collect(),
            allowances,
            fee_schedule: self.fees.schedule(),
            blacklist: self.blacklist.accounts().copied().collect(),
            paused: self.pause_guard.is_paused(),
            successor: self.router.successor(),
        }
    }

    /// State root of the current local state.
    pub fn state_root(&self) -> Result<[u8; 32]> {
        self.snapshot().state_root()
    }

    /// Rebuild a token from a snapshot.
    ///
    /// A deprecated snapshot needs the handle of the successor it names;
    /// a live one must not be given one.
    pub fn restore(
        snapshot: LedgerSnapshot,
        successor: Option<Box<dyn SuccessorLedger>>,
    ) -> Result<Self> {
        if snapshot.version != SNAPSHOT_VERSION {
            return Err(TokenError::InvalidState(format!(
                "unsupported snapshot version {}",
                snapshot.version
            )));
        }
        if snapshot.owner.is_null() {
            return Err(TokenError::InvalidAddress);
        }
        if snapshot.decimals > MAX_DECIMALS {
            return Err(TokenError::InvalidState(format!(
                "decimals {} exceeds {}",
                snapshot.decimals, MAX_DECIMALS
            )));
        }
        let fees = FeeEngine::with_schedule(snapshot.decimals, snapshot.fee_schedule)?;

        let ledger = Ledger::from_parts(
            snapshot.balances,
            snapshot
                .allowances
                .into_iter()
                .map(|entry| ((entry.owner, entry.spender), entry.amount)),
            snapshot.total_supply,
        );

        let mut router = DeprecationRouter::new();
        match (snapshot.successor, successor) {
            (None, None) => {}
            (Some(expected), Some(handle)) => {
                let actual = handle.ledger_address()?;
                if actual != expected {
                    return Err(TokenError::InvalidState(format!(
                        "successor handle {actual} does not match snapshot successor {expected}"
                    )));
                }
                router.deprecate(handle)?;
            }
            (Some(expected), None) => {
                return Err(TokenError::InvalidState(format!(
                    "snapshot is deprecated to {expected} but no successor handle was given"
                )));
            }
            (None, Some(_)) => {
                return Err(TokenError::InvalidState(
                    "successor handle given for a live snapshot".to_string(),
                ));
            }
        }

        let token = StableToken {
            address: snapshot.address,
            name: snapshot.name,
            symbol: snapshot.symbol,
            decimals: snapshot.decimals,
            ledger,
            fees,
            access_control: AccessControl::new(snapshot.owner),
            pause_guard: PauseGuard::with_state(snapshot.paused),
            blacklist: Blacklist::from_accounts(snapshot.blacklist),
            router,
            events: Vec::new(),
        };
        token.check_invariant()?;

        info!(
            address = %token.address,
            total_supply = token.ledger.total_supply(),
            deprecated = token.is_deprecated(),
            "StableToken restored from snapshot"
        );
        Ok(token)
    }
}
