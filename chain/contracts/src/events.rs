//! Ledger notifications
//!
//! Events are immutable records appended by successful operations and
//! consumed by external observers. A rejected operation appends nothing.

use ledger_types::ids::Address;
use ledger_types::numeric::Amount;
use serde::{Deserialize, Serialize};

/// Value moved between two identities. Mints use `from == NULL`, burns use
/// `to == NULL`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Transfer {
    pub from: Address,
    pub to: Address,
    pub value: Amount,
}

/// Allowance of `spender` over `owner`'s balance set to `value`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Approval {
    pub owner: Address,
    pub spender: Address,
    pub value: Amount,
}

/// New tokens issued to the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    pub amount: Amount,
}

/// Tokens redeemed (burned) from the owner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redeem {
    pub amount: Amount,
}

/// Economic operations now route to `successor`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Deprecate {
    pub successor: Address,
}

/// Fee parameters changed. `max_fee` is in raw (scaled) units.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Params {
    pub fee_basis_points: Amount,
    pub max_fee: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AddedBlackList {
    pub account: Address,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RemovedBlackList {
    pub account: Address,
}

/// Balance of a blacklisted account destroyed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DestroyedBlackFunds {
    pub account: Address,
    pub amount: Amount,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OwnershipTransferred {
    pub previous_owner: Address,
    pub new_owner: Address,
}

/// Enum wrapper for all ledger events, enabling uniform handling.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum TokenEvent {
    Transfer(Transfer),
    Approval(Approval),
    Issue(Issue),
    Redeem(Redeem),
    Deprecate(Deprecate),
    Params(Params),
    Pause,
    Unpause,
    AddedBlackList(AddedBlackList),
    RemovedBlackList(RemovedBlackList),
    DestroyedBlackFunds(DestroyedBlackFunds),
    OwnershipTransferred(OwnershipTransferred),
}

impl TokenEvent {
    pub fn transfer(from: Address, to: Address, value: Amount) -> Self {
        TokenEvent::Transfer(Transfer { from, to, value })
    }

    pub fn approval(owner: Address, spender: Address, value: Amount) -> Self {
        TokenEvent::Approval(Approval {
            owner,
            spender,
            value,
        })
    }

    /// Short label for logs.
    pub fn label(&self) -> &'static str {
        match self {
            TokenEvent::Transfer(_) => "Transfer",
            TokenEvent::Approval(_) => "Approval",
            TokenEvent::Issue(_) => "Issue",
            TokenEvent::Redeem(_) => "Redeem",
            TokenEvent::Deprecate(_) => "Deprecate",
            TokenEvent::Params(_) => "Params",
            TokenEvent::Pause => "Pause",
            TokenEvent::Unpause => "Unpause",
            TokenEvent::AddedBlackList(_) => "AddedBlackList",
            TokenEvent::RemovedBlackList(_) => "RemovedBlackList",
            TokenEvent::DestroyedBlackFunds(_) => "DestroyedBlackFunds",
            TokenEvent::OwnershipTransferred(_) => "OwnershipTransferred",
        }
    }
}
