//! Deprecation: one-way redirection to a successor ledger
//!
//! Once deprecated, every economic entry point of the token forwards the
//! call, original sender included, to the successor's legacy entry points
//! and returns the successor's answer unchanged. The local state is frozen
//! and stays readable for audit.

use ledger_types::ids::Address;
use ledger_types::numeric::Amount;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;
use tracing::info;

use crate::errors::{Result, TokenError};
use crate::events::{Deprecate, TokenEvent};

/// Capability a successor ledger exposes to its predecessor.
///
/// The `*_by_legacy` operations are distinct from the successor's own
/// entry points so it can tell redirected calls apart. `from` / `sender`
/// is always the identity that called the predecessor.
pub trait SuccessorLedger {
    /// Identity of the successor ledger.
    fn ledger_address(&self) -> Result<Address>;

    fn transfer_by_legacy(&mut self, from: Address, to: Address, value: Amount) -> Result<bool>;

    fn transfer_from_by_legacy(
        &mut self,
        sender: Address,
        from: Address,
        to: Address,
        value: Amount,
    ) -> Result<bool>;

    fn approve_by_legacy(&mut self, from: Address, spender: Address, value: Amount) -> Result<bool>;

    fn increase_approval_by_legacy(
        &mut self,
        from: Address,
        spender: Address,
        added: Amount,
    ) -> Result<bool>;

    fn decrease_approval_by_legacy(
        &mut self,
        from: Address,
        spender: Address,
        subtracted: Amount,
    ) -> Result<bool>;

    fn total_supply(&self) -> Result<Amount>;

    fn balance_of(&self, who: Address) -> Result<Amount>;

    fn allowance(&self, owner: Address, spender: Address) -> Result<Amount>;
}

/// Shared handle: the host keeps one clone, the predecessor's router the
/// other. A call that arrives while the successor is already borrowed
/// (a forwarding cycle) fails with `Reentrancy`.
///
/// Forwarded queries take the exclusive borrow as well, so a query cycle
/// also ends in `Reentrancy` instead of recursing.
impl<T: SuccessorLedger + ?Sized> SuccessorLedger for Rc<RefCell<T>> {
    fn ledger_address(&self) -> Result<Address> {
        self.try_borrow()
            .map_err(|_| TokenError::Reentrancy)?
            .ledger_address()
    }

    fn transfer_by_legacy(&mut self, from: Address, to: Address, value: Amount) -> Result<bool> {
        self.try_borrow_mut()
            .map_err(|_| TokenError::Reentrancy)?
            .transfer_by_legacy(from, to, value)
    }

    fn transfer_from_by_legacy(
        &mut self,
        sender: Address,
        from: Address,
        to: Address,
        value: Amount,
    ) -> Result<bool> {
        self.try_borrow_mut()
            .map_err(|_| TokenError::Reentrancy)?
            .transfer_from_by_legacy(sender, from, to, value)
    }

    fn approve_by_legacy(&mut self, from: Address, spender: Address, value: Amount) -> Result<bool> {
        self.try_borrow_mut()
            .map_err(|_| TokenError::Reentrancy)?
            .approve_by_legacy(from, spender, value)
    }

    fn increase_approval_by_legacy(
        &mut self,
        from: Address,
        spender: Address,
        added: Amount,
    ) -> Result<bool> {
        self.try_borrow_mut()
            .map_err(|_| TokenError::Reentrancy)?
            .increase_approval_by_legacy(from, spender, added)
    }

    fn decrease_approval_by_legacy(
        &mut self,
        from: Address,
        spender: Address,
        subtracted: Amount,
    ) -> Result<bool> {
        self.try_borrow_mut()
            .map_err(|_| TokenError::Reentrancy)?
            .decrease_approval_by_legacy(from, spender, subtracted)
    }

    fn total_supply(&self) -> Result<Amount> {
        self.try_borrow_mut()
            .map_err(|_| TokenError::Reentrancy)?
            .total_supply()
    }

    fn balance_of(&self, who: Address) -> Result<Amount> {
        self.try_borrow_mut()
            .map_err(|_| TokenError::Reentrancy)?
            .balance_of(who)
    }

    fn allowance(&self, owner: Address, spender: Address) -> Result<Amount> {
        self.try_borrow_mut()
            .map_err(|_| TokenError::Reentrancy)?
            .allowance(owner, spender)
    }
}

struct Successor {
    address: Address,
    ledger: Box<dyn SuccessorLedger>,
}

/// Live / Deprecated state machine. There is no way back to Live.
#[derive(Default)]
pub struct DeprecationRouter {
    successor: Option<Successor>,
}

impl DeprecationRouter {
    /// A live router.
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch to Deprecated, routing to `ledger` from now on.
    pub fn deprecate(&mut self, ledger: Box<dyn SuccessorLedger>) -> Result<TokenEvent> {
        if self.successor.is_some() {
            return Err(TokenError::AlreadyDeprecated);
        }
        let address = ledger.ledger_address()?;
        if address.is_null() {
            return Err(TokenError::InvalidAddress);
        }

        self.successor = Some(Successor { address, ledger });
        info!(successor = %address, "Ledger deprecated");
        Ok(TokenEvent::Deprecate(Deprecate { successor: address }))
    }

    pub fn is_deprecated(&self) -> bool {
        self.successor.is_some()
    }

    /// Address of the successor, once deprecated.
    pub fn successor(&self) -> Option<Address> {
        self.successor.as_ref().map(|s| s.address)
    }

    /// The successor to forward economic calls to, or `None` to execute
    /// locally.
    pub fn forward_target(&mut self) -> Option<&mut dyn SuccessorLedger> {
        match self.successor.as_mut() {
            Some(successor) => Some(successor.ledger.as_mut()),
            None => None,
        }
    }

    /// Read-only view of the successor for forwarded queries.
    pub fn query_target(&self) -> Option<&dyn SuccessorLedger> {
        self.successor.as_ref().map(|s| s.ledger.as_ref())
    }
}

impl fmt::Debug for DeprecationRouter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeprecationRouter")
            .field("successor", &self.successor())
            .finish()
    }
}
