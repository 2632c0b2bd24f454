//! StableToken: the externally visible token
//!
//! Composes access control, pause gate, blacklist, ledger, fee engine and
//! deprecation router. Checks run in a fixed order:
//! 1. Access control (administrative operations)
//! 2. Pause gate (value-moving and approval operations)
//! 3. Blacklist (transfer senders / sources)
//! 4. Deprecation routing (forward, or execute locally)
//!
//! Every operation either commits all of its effects and events or fails
//! without touching state.

use ledger_types::ids::Address;
use ledger_types::numeric::Amount;
use tracing::{debug, info, warn};

use crate::config::TokenConfig;
use crate::deprecation::{DeprecationRouter, SuccessorLedger};
use crate::errors::{Result, TokenError};
use crate::events::{DestroyedBlackFunds, Issue, Redeem, TokenEvent};
use crate::fees::FeeEngine;
use crate::ledger::Ledger;
use crate::security::{AccessControl, Blacklist, PauseGuard};

/// Administered fungible token.
#[derive(Debug)]
pub struct StableToken {
    pub(crate) address: Address,
    pub(crate) name: String,
    pub(crate) symbol: String,
    pub(crate) decimals: u8,
    pub(crate) ledger: Ledger,
    pub(crate) fees: FeeEngine,
    pub(crate) access_control: AccessControl,
    pub(crate) pause_guard: PauseGuard,
    pub(crate) blacklist: Blacklist,
    pub(crate) router: DeprecationRouter,
    /// Emitted events log (append-only)
    pub(crate) events: Vec<TokenEvent>,
}

impl StableToken {
    /// Create a token owned by `owner`, crediting it the initial supply.
    pub fn new(owner: Address, config: TokenConfig) -> Result<Self> {
        config.validate()?;
        if owner.is_null() {
            return Err(TokenError::InvalidAddress);
        }

        let address = Address::new();
        info!(
            %address,
            %owner,
            symbol = %config.symbol,
            decimals = config.decimals,
            initial_supply = config.initial_supply,
            "StableToken created"
        );

        Ok(Self {
            address,
            ledger: Ledger::with_supply(owner, config.initial_supply),
            fees: FeeEngine::new(config.decimals),
            access_control: AccessControl::new(owner),
            pause_guard: PauseGuard::new(),
            blacklist: Blacklist::new(),
            router: DeprecationRouter::new(),
            events: Vec::new(),
            name: config.name,
            symbol: config.symbol,
            decimals: config.decimals,
        })
    }

    // ───────────────────────── Economic operations ─────────────────────────

    /// Send `amount` from the caller to `to`, minus the transfer fee.
    pub fn transfer(&mut self, caller: Address, to: Address, amount: Amount) -> Result<bool> {
        self.pause_guard.ensure_active()?;
        self.ensure_sender_allowed(&caller)?;

        if let Some(successor) = self.router.forward_target() {
            debug!(%caller, %to, amount, "Forwarding transfer to successor");
            return successor.transfer_by_legacy(caller, to, amount);
        }

        let quote = self.fees.quote(amount)?;
        let collector = self.access_control.owner();
        let events = self.ledger.transfer_split(caller, to, &quote, collector)?;
        self.emit_all(events);
        Ok(true)
    }

    /// Move `amount` out of `from` using the caller's allowance. The
    /// allowance is charged the gross amount; `to` receives it minus fee.
    pub fn transfer_from(
        &mut self,
        caller: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<bool> {
        self.pause_guard.ensure_active()?;
        self.ensure_sender_allowed(&from)?;

        if let Some(successor) = self.router.forward_target() {
            debug!(%caller, %from, %to, amount, "Forwarding transfer_from to successor");
            return successor.transfer_from_by_legacy(caller, from, to, amount);
        }

        let quote = self.fees.quote(amount)?;
        let collector = self.access_control.owner();
        let events = self
            .ledger
            .transfer_from_split(caller, from, to, &quote, collector)?;
        self.emit_all(events);
        Ok(true)
    }

    /// Set the caller's allowance for `spender`.
    ///
    /// Not blacklist-gated: a flagged account can still change or revoke
    /// its approvals.
    pub fn approve(&mut self, caller: Address, spender: Address, amount: Amount) -> Result<bool> {
        self.pause_guard.ensure_active()?;

        if let Some(successor) = self.router.forward_target() {
            return successor.approve_by_legacy(caller, spender, amount);
        }

        let event = self.ledger.approve(caller, spender, amount);
        self.emit(event);
        Ok(true)
    }

    pub fn increase_approval(&mut self, caller: Address, spender: Address, added: Amount) -> Result<bool> {
        self.pause_guard.ensure_active()?;

        if let Some(successor) = self.router.forward_target() {
            return successor.increase_approval_by_legacy(caller, spender, added);
        }

        let event = self.ledger.increase_approval(caller, spender, added)?;
        self.emit(event);
        Ok(true)
    }

    pub fn decrease_approval(
        &mut self,
        caller: Address,
        spender: Address,
        subtracted: Amount,
    ) -> Result<bool> {
        self.pause_guard.ensure_active()?;

        if let Some(successor) = self.router.forward_target() {
            return successor.decrease_approval_by_legacy(caller, spender, subtracted);
        }

        let event = self.ledger.decrease_approval(caller, spender, subtracted);
        self.emit(event);
        Ok(true)
    }

    // ───────────────────────── Queries ─────────────────────────

    /// Balance of `who`, answered by the successor once deprecated.
    pub fn balance_of(&self, who: Address) -> Result<Amount> {
        match self.router.query_target() {
            Some(successor) => successor.balance_of(who),
            None => Ok(self.ledger.balance_of(&who)),
        }
    }

    pub fn allowance(&self, owner: Address, spender: Address) -> Result<Amount> {
        match self.router.query_target() {
            Some(successor) => successor.allowance(owner, spender),
            None => Ok(self.ledger.allowance(&owner, &spender)),
        }
    }

    pub fn total_supply(&self) -> Result<Amount> {
        match self.router.query_target() {
            Some(successor) => successor.total_supply(),
            None => Ok(self.ledger.total_supply()),
        }
    }

    /// Frozen local balance of `who`; zero while the token is live.
    pub fn legacy_balance_of(&self, who: Address) -> Amount {
        if self.router.is_deprecated() {
            self.ledger.balance_of(&who)
        } else {
            0
        }
    }

    pub fn get_blacklist_status(&self, who: Address) -> bool {
        self.blacklist.is_flagged(&who)
    }

    /// Fee a transfer of `amount` would pay under the current parameters.
    pub fn calc_fee(&self, amount: Amount) -> Result<Amount> {
        self.fees.compute_fee(amount)
    }

    pub fn basis_points_rate(&self) -> Amount {
        self.fees.basis_points()
    }

    /// Maximum fee in raw units.
    pub fn maximum_fee(&self) -> Amount {
        self.fees.maximum_fee()
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn symbol(&self) -> &str {
        &self.symbol
    }

    pub fn decimals(&self) -> u8 {
        self.decimals
    }

    /// Identity of this ledger.
    pub fn address(&self) -> Address {
        self.address
    }

    pub fn owner(&self) -> Address {
        self.access_control.owner()
    }

    pub fn is_paused(&self) -> bool {
        self.pause_guard.is_paused()
    }

    pub fn is_deprecated(&self) -> bool {
        self.router.is_deprecated()
    }

    pub fn successor(&self) -> Option<Address> {
        self.router.successor()
    }

    /// Verify that the local balances sum to the local total supply.
    pub fn check_invariant(&self) -> Result<()> {
        let balances = self.ledger.balance_sum()?;
        let total_supply = self.ledger.total_supply();
        if balances != total_supply {
            return Err(TokenError::InvariantViolation {
                balances,
                total_supply,
            });
        }
        Ok(())
    }

    // ───────────────────────── Supply administration ─────────────────────────

    /// Mint `amount` new tokens to the owner.
    pub fn issue(&mut self, caller: Address, amount: Amount) -> Result<()> {
        self.access_control.ensure_owner(&caller)?;
        self.ensure_live()?;

        let transfer = self.ledger.mint(caller, amount)?;
        self.emit(TokenEvent::Issue(Issue { amount }));
        self.emit(transfer);
        info!(amount, total_supply = self.ledger.total_supply(), "Tokens issued");
        Ok(())
    }

    /// Burn `amount` tokens from the owner's balance.
    pub fn redeem(&mut self, caller: Address, amount: Amount) -> Result<()> {
        self.access_control.ensure_owner(&caller)?;
        self.ensure_live()?;

        let transfer = self.ledger.burn(caller, amount)?;
        self.emit(TokenEvent::Redeem(Redeem { amount }));
        self.emit(transfer);
        info!(amount, total_supply = self.ledger.total_supply(), "Tokens redeemed");
        Ok(())
    }

    /// Destroy the entire balance of a blacklisted account. Works while
    /// paused and after deprecation; returns the destroyed amount.
    pub fn destroy_black_funds(&mut self, caller: Address, account: Address) -> Result<Amount> {
        self.access_control.ensure_owner(&caller)?;
        if !self.blacklist.is_flagged(&account) {
            return Err(TokenError::NotBlacklisted { account });
        }

        let amount = self.ledger.seize(account)?;
        self.emit(TokenEvent::DestroyedBlackFunds(DestroyedBlackFunds { account, amount }));
        warn!(%account, amount, "Blacklisted funds destroyed");
        Ok(amount)
    }

    // ───────────────────────── Administration ─────────────────────────

    /// Set the fee rate (basis points, below 20) and maximum fee (whole
    /// tokens, below 50).
    pub fn set_params(&mut self, caller: Address, basis_points: Amount, max_fee: Amount) -> Result<()> {
        self.access_control.ensure_owner(&caller)?;
        let event = self.fees.set_params(basis_points, max_fee)?;
        self.emit(event);
        info!(
            basis_points,
            maximum_fee = self.fees.maximum_fee(),
            "Fee parameters updated"
        );
        Ok(())
    }

    pub fn pause(&mut self, caller: Address) -> Result<()> {
        self.access_control.ensure_owner(&caller)?;
        let event = self.pause_guard.pause()?;
        self.emit(event);
        info!("Token paused");
        Ok(())
    }

    pub fn unpause(&mut self, caller: Address) -> Result<()> {
        self.access_control.ensure_owner(&caller)?;
        let event = self.pause_guard.unpause()?;
        self.emit(event);
        info!("Token unpaused");
        Ok(())
    }

    pub fn add_to_blacklist(&mut self, caller: Address, who: Address) -> Result<()> {
        self.access_control.ensure_owner(&caller)?;
        let event = self.blacklist.add(who);
        self.emit(event);
        info!(account = %who, "Account blacklisted");
        Ok(())
    }

    pub fn remove_from_blacklist(&mut self, caller: Address, who: Address) -> Result<()> {
        self.access_control.ensure_owner(&caller)?;
        let event = self.blacklist.remove(who);
        self.emit(event);
        info!(account = %who, "Account removed from blacklist");
        Ok(())
    }

    /// Route all economic operations to `successor` from now on.
    pub fn deprecate<S>(&mut self, caller: Address, successor: S) -> Result<()>
    where
        S: SuccessorLedger + 'static,
    {
        self.access_control.ensure_owner(&caller)?;
        let event = self.router.deprecate(Box::new(successor))?;
        self.emit(event);
        Ok(())
    }

    pub fn transfer_ownership(&mut self, caller: Address, new_owner: Address) -> Result<()> {
        let event = self.access_control.transfer_ownership(&caller, new_owner)?;
        self.emit(event);
        info!(previous_owner = %caller, %new_owner, "Ownership transferred");
        Ok(())
    }

    // ───────────────────────── Events ─────────────────────────

    /// Get all emitted events.
    pub fn events(&self) -> &[TokenEvent] {
        &self.events
    }

    /// Drain all events (consume and clear).
    pub fn drain_events(&mut self) -> Vec<TokenEvent> {
        std::mem::take(&mut self.events)
    }

    // ───────────────────────── Internal ─────────────────────────

    fn emit(&mut self, event: TokenEvent) {
        debug!(event = event.label(), "Event emitted");
        self.events.push(event);
    }

    fn emit_all(&mut self, events: Vec<TokenEvent>) {
        for event in events {
            self.emit(event);
        }
    }

    fn ensure_sender_allowed(&self, sender: &Address) -> Result<()> {
        self.blacklist
            .ensure_not_flagged(sender)
            .inspect_err(|_| warn!(%sender, "Rejected transfer from blacklisted account"))
    }

    fn ensure_live(&self) -> Result<()> {
        if self.router.is_deprecated() {
            return Err(TokenError::TokenDeprecated);
        }
        Ok(())
    }
}

/// A token accepts redirected calls exactly as if the original sender had
/// called it directly.
impl SuccessorLedger for StableToken {
    fn ledger_address(&self) -> Result<Address> {
        Ok(self.address)
    }

    fn transfer_by_legacy(&mut self, from: Address, to: Address, value: Amount) -> Result<bool> {
        self.transfer(from, to, value)
    }

    fn transfer_from_by_legacy(
        &mut self,
        sender: Address,
        from: Address,
        to: Address,
        value: Amount,
    ) -> Result<bool> {
        self.transfer_from(sender, from, to, value)
    }

    fn approve_by_legacy(&mut self, from: Address, spender: Address, value: Amount) -> Result<bool> {
        self.approve(from, spender, value)
    }

    fn increase_approval_by_legacy(
        &mut self,
        from: Address,
        spender: Address,
        added: Amount,
    ) -> Result<bool> {
        self.increase_approval(from, spender, added)
    }

    fn decrease_approval_by_legacy(
        &mut self,
        from: Address,
        spender: Address,
        subtracted: Amount,
    ) -> Result<bool> {
        self.decrease_approval(from, spender, subtracted)
    }

    fn total_supply(&self) -> Result<Amount> {
        StableToken::total_supply(self)
    }

    fn balance_of(&self, who: Address) -> Result<Amount> {
        StableToken::balance_of(self, who)
    }

    fn allowance(&self, owner: Address, spender: Address) -> Result<Amount> {
        StableToken::allowance(self, owner, spender)
    }
}
