//! Shared security primitives for the ledger
//!
//! Owner-based access control, the pause gate and the account blacklist.
//! None of these touch balances; the facade consults them in a fixed order
//! before any ledger mutation.

use ledger_types::ids::Address;
use std::collections::BTreeSet;

use crate::errors::{Result, TokenError};
use crate::events::{AddedBlackList, OwnershipTransferred, RemovedBlackList, TokenEvent};

/// Single-owner access control.
///
/// The owner holds every administrative right and can hand them over, but
/// never to the null identity.
#[derive(Debug, Clone)]
pub struct AccessControl {
    owner: Address,
}

impl AccessControl {
    /// Create access control with an initial owner.
    pub fn new(owner: Address) -> Self {
        Self { owner }
    }

    /// Check if a caller is the owner.
    pub fn is_owner(&self, caller: &Address) -> bool {
        self.owner == *caller
    }

    /// Reject any caller other than the owner.
    pub fn ensure_owner(&self, caller: &Address) -> Result<()> {
        if !self.is_owner(caller) {
            return Err(TokenError::Unauthorized { caller: *caller });
        }
        Ok(())
    }

    /// Hand ownership to `new_owner`.
    pub fn transfer_ownership(&mut self, caller: &Address, new_owner: Address) -> Result<TokenEvent> {
        self.ensure_owner(caller)?;
        if new_owner.is_null() {
            return Err(TokenError::InvalidAddress);
        }
        let previous_owner = std::mem::replace(&mut self.owner, new_owner);
        Ok(TokenEvent::OwnershipTransferred(OwnershipTransferred {
            previous_owner,
            new_owner,
        }))
    }

    /// Get the current owner.
    pub fn owner(&self) -> Address {
        self.owner
    }
}

/// Pause gate for value-moving and approval operations.
#[derive(Debug, Clone, Default)]
pub struct PauseGuard {
    paused: bool,
}

impl PauseGuard {
    /// Create a new unpaused guard.
    pub fn new() -> Self {
        Self { paused: false }
    }

    pub(crate) fn with_state(paused: bool) -> Self {
        Self { paused }
    }

    /// Active → Paused.
    pub fn pause(&mut self) -> Result<TokenEvent> {
        if self.paused {
            return Err(TokenError::InvalidState("already paused".to_string()));
        }
        self.paused = true;
        Ok(TokenEvent::Pause)
    }

    /// Paused → Active.
    pub fn unpause(&mut self) -> Result<TokenEvent> {
        if !self.paused {
            return Err(TokenError::InvalidState("not paused".to_string()));
        }
        self.paused = false;
        Ok(TokenEvent::Unpause)
    }

    /// Fail with `SystemPaused` while paused.
    pub fn ensure_active(&self) -> Result<()> {
        if self.paused {
            return Err(TokenError::SystemPaused);
        }
        Ok(())
    }

    /// Check if currently paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }
}

/// Set of flagged accounts.
///
/// Edits are idempotent and accept any identity, including the null one.
#[derive(Debug, Clone, Default)]
pub struct Blacklist {
    flagged: BTreeSet<Address>,
}

impl Blacklist {
    pub fn new() -> Self {
        Self::default()
    }

    pub(crate) fn from_accounts(accounts: impl IntoIterator<Item = Address>) -> Self {
        Self {
            flagged: accounts.into_iter().collect(),
        }
    }

    pub fn is_flagged(&self, account: &Address) -> bool {
        self.flagged.contains(account)
    }

    pub fn add(&mut self, account: Address) -> TokenEvent {
        self.flagged.insert(account);
        TokenEvent::AddedBlackList(AddedBlackList { account })
    }

    pub fn remove(&mut self, account: Address) -> TokenEvent {
        self.flagged.remove(&account);
        TokenEvent::RemovedBlackList(RemovedBlackList { account })
    }

    /// Fail with `SenderBlacklisted` if `sender` is flagged.
    pub fn ensure_not_flagged(&self, sender: &Address) -> Result<()> {
        if self.is_flagged(sender) {
            return Err(TokenError::SenderBlacklisted { account: *sender });
        }
        Ok(())
    }

    /// Flagged accounts in ascending order.
    pub fn accounts(&self) -> impl Iterator<Item = &Address> {
        self.flagged.iter()
    }

    /// Number of flagged accounts.
    pub fn len(&self) -> usize {
        self.flagged.len()
    }

    pub fn is_empty(&self) -> bool {
        self.flagged.is_empty()
    }
}
