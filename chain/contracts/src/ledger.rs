//! Ledger: balances, allowances and total supply
//!
//! Raw bookkeeping primitives with no knowledge of pause state, blacklist
//! or fee parameters:
//! - Transfers and allowance-backed transfers (optionally split into a
//!   net leg and a fee leg)
//! - Approve / increase / decrease of allowances
//! - Supply changes: mint, burn, seize
//!
//! Every mutating primitive checks all of its preconditions and stages the
//! new balances with checked arithmetic before writing anything, so a
//! failed call leaves the ledger exactly as it was.

use ledger_types::fee::FeeQuote;
use ledger_types::ids::Address;
use ledger_types::numeric::{checked_add, checked_sub, Amount, MAX_AMOUNT};
use std::collections::HashMap;
use tracing::debug;

use crate::errors::{Result, TokenError};
use crate::events::TokenEvent;

/// Balance and allowance state of one token.
///
/// Invariant: the sum of all balances equals `total_supply`.
/// Zero balances and zero allowances are not stored.
#[derive(Debug, Clone, Default)]
pub struct Ledger {
    /// Balances: holder -> amount
    balances: HashMap<Address, Amount>,
    /// Allowances: (owner, spender) -> remaining spendable amount
    allowances: HashMap<(Address, Address), Amount>,
    total_supply: Amount,
}

impl Ledger {
    /// Create an empty ledger.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a ledger whose entire supply is held by `holder`.
    pub fn with_supply(holder: Address, supply: Amount) -> Self {
        let mut ledger = Self::new();
        ledger.set_balance(holder, supply);
        ledger.total_supply = supply;
        ledger
    }

    /// Rebuild a ledger from persisted parts. Callers validate the supply
    /// invariant with [`Ledger::balance_sum`].
    pub(crate) fn from_parts(
        balances: impl IntoIterator<Item = (Address, Amount)>,
        allowances: impl IntoIterator<Item = ((Address, Address), Amount)>,
        total_supply: Amount,
    ) -> Self {
        let mut ledger = Self::new();
        for (holder, amount) in balances {
            ledger.set_balance(holder, amount);
        }
        for ((owner, spender), amount) in allowances {
            ledger.set_allowance(owner, spender, amount);
        }
        ledger.total_supply = total_supply;
        ledger
    }

    // ───────────────────────── Queries ─────────────────────────

    pub fn total_supply(&self) -> Amount {
        self.total_supply
    }

    pub fn balance_of(&self, who: &Address) -> Amount {
        self.balances.get(who).copied().unwrap_or(0)
    }

    pub fn allowance(&self, owner: &Address, spender: &Address) -> Amount {
        self.allowances
            .get(&(*owner, *spender))
            .copied()
            .unwrap_or(0)
    }

    /// All non-zero balances, in no particular order.
    pub fn holders(&self) -> impl Iterator<Item = (&Address, &Amount)> {
        self.balances.iter()
    }

    /// All non-zero allowances as `((owner, spender), amount)`.
    pub fn allowance_entries(&self) -> impl Iterator<Item = (&(Address, Address), &Amount)> {
        self.allowances.iter()
    }

    /// Checked sum of every balance.
    pub fn balance_sum(&self) -> Result<Amount> {
        self.balances
            .values()
            .try_fold(0, |acc, amount| checked_add(acc, *amount))
            .map_err(TokenError::from)
    }

    // ───────────────────────── Transfers ─────────────────────────

    /// Move `amount` from `from` to `to`.
    pub fn raw_transfer(&mut self, from: Address, to: Address, amount: Amount) -> Result<TokenEvent> {
        self.book_transfer(from, to, &FeeQuote::fee_free(amount), to)?;
        Ok(TokenEvent::transfer(from, to, amount))
    }

    /// Move `amount` from `from` to `to` on behalf of `spender`, consuming
    /// allowance unless it is unlimited.
    pub fn raw_transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        amount: Amount,
    ) -> Result<TokenEvent> {
        self.book_transfer_from(spender, from, to, &FeeQuote::fee_free(amount), to)?;
        Ok(TokenEvent::transfer(from, to, amount))
    }

    /// Debit `quote.gross` from `from`, credit `quote.net` to `to` and
    /// `quote.fee` to `collector`, atomically.
    pub fn transfer_split(
        &mut self,
        from: Address,
        to: Address,
        quote: &FeeQuote,
        collector: Address,
    ) -> Result<Vec<TokenEvent>> {
        self.book_transfer(from, to, quote, collector)?;
        Ok(split_events(from, to, quote, collector))
    }

    /// Allowance-backed variant of [`Ledger::transfer_split`]. The allowance
    /// is charged the gross amount.
    pub fn transfer_from_split(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        quote: &FeeQuote,
        collector: Address,
    ) -> Result<Vec<TokenEvent>> {
        self.book_transfer_from(spender, from, to, quote, collector)?;
        Ok(split_events(from, to, quote, collector))
    }

    fn book_transfer(
        &mut self,
        from: Address,
        to: Address,
        quote: &FeeQuote,
        collector: Address,
    ) -> Result<()> {
        if to.is_null() {
            return Err(TokenError::ZeroAddress);
        }
        self.post(from, quote.gross, &[(to, quote.net), (collector, quote.fee)])?;
        debug!(%from, %to, gross = quote.gross, fee = quote.fee, "Transfer booked");
        Ok(())
    }

    fn book_transfer_from(
        &mut self,
        spender: Address,
        from: Address,
        to: Address,
        quote: &FeeQuote,
        collector: Address,
    ) -> Result<()> {
        if to.is_null() {
            return Err(TokenError::ZeroAddress);
        }
        let available = self.balance_of(&from);
        if available < quote.gross {
            return Err(TokenError::InsufficientBalance {
                account: from,
                required: quote.gross,
                available,
            });
        }
        let allowed = self.allowance(&from, &spender);
        if allowed < quote.gross {
            return Err(TokenError::InsufficientAllowance {
                owner: from,
                spender,
                required: quote.gross,
                available: allowed,
            });
        }
        let remaining = if allowed == MAX_AMOUNT {
            allowed
        } else {
            checked_sub(allowed, quote.gross)?
        };

        self.post(from, quote.gross, &[(to, quote.net), (collector, quote.fee)])?;
        self.set_allowance(from, spender, remaining);
        debug!(%spender, %from, %to, gross = quote.gross, fee = quote.fee, "Delegated transfer booked");
        Ok(())
    }

    /// Debit `gross` from `from` and apply `credits`, all or nothing.
    ///
    /// Balances are staged first so that aliased accounts (for example a
    /// sender that is also the fee collector) see each other's updates.
    fn post(&mut self, from: Address, gross: Amount, credits: &[(Address, Amount)]) -> Result<()> {
        let available = self.balance_of(&from);
        if available < gross {
            return Err(TokenError::InsufficientBalance {
                account: from,
                required: gross,
                available,
            });
        }

        let mut staged: Vec<(Address, Amount)> = Vec::with_capacity(credits.len() + 1);
        staged.push((from, checked_sub(available, gross)?));
        for &(account, amount) in credits.iter().filter(|(_, amount)| *amount > 0) {
            match staged.iter_mut().find(|(staged_account, _)| *staged_account == account) {
                Some((_, balance)) => *balance = checked_add(*balance, amount)?,
                None => staged.push((account, checked_add(self.balance_of(&account), amount)?)),
            }
        }

        for (account, balance) in staged {
            self.set_balance(account, balance);
        }
        Ok(())
    }

    // ───────────────────────── Allowances ─────────────────────────

    /// Set the allowance unconditionally; zero revokes.
    ///
    /// Changing a non-zero allowance to another non-zero value lets the
    /// spender race the change and spend both amounts. Prefer
    /// [`Ledger::increase_approval`] / [`Ledger::decrease_approval`].
    pub fn approve(&mut self, owner: Address, spender: Address, amount: Amount) -> TokenEvent {
        self.set_allowance(owner, spender, amount);
        TokenEvent::approval(owner, spender, amount)
    }

    /// Raise the allowance by `added`, failing on overflow.
    pub fn increase_approval(
        &mut self,
        owner: Address,
        spender: Address,
        added: Amount,
    ) -> Result<TokenEvent> {
        let updated = checked_add(self.allowance(&owner, &spender), added)?;
        self.set_allowance(owner, spender, updated);
        Ok(TokenEvent::approval(owner, spender, updated))
    }

    /// Lower the allowance by `subtracted`, flooring at zero.
    pub fn decrease_approval(&mut self, owner: Address, spender: Address, subtracted: Amount) -> TokenEvent {
        let updated = self.allowance(&owner, &spender).saturating_sub(subtracted);
        self.set_allowance(owner, spender, updated);
        TokenEvent::approval(owner, spender, updated)
    }

    // ───────────────────────── Supply ─────────────────────────

    /// Create `amount` new tokens held by `to`.
    pub fn mint(&mut self, to: Address, amount: Amount) -> Result<TokenEvent> {
        let supply = checked_add(self.total_supply, amount)?;
        let balance = checked_add(self.balance_of(&to), amount)?;
        self.total_supply = supply;
        self.set_balance(to, balance);
        Ok(TokenEvent::transfer(Address::NULL, to, amount))
    }

    /// Destroy `amount` tokens held by `from`.
    pub fn burn(&mut self, from: Address, amount: Amount) -> Result<TokenEvent> {
        let available = self.balance_of(&from);
        if available < amount {
            return Err(TokenError::InsufficientBalance {
                account: from,
                required: amount,
                available,
            });
        }
        let supply = checked_sub(self.total_supply, amount)?;
        self.total_supply = supply;
        self.set_balance(from, available - amount);
        Ok(TokenEvent::transfer(from, Address::NULL, amount))
    }

    /// Destroy the whole balance of `account`, returning the destroyed
    /// amount.
    pub fn seize(&mut self, account: Address) -> Result<Amount> {
        let amount = self.balance_of(&account);
        let supply = checked_sub(self.total_supply, amount)?;
        self.total_supply = supply;
        self.balances.remove(&account);
        Ok(amount)
    }

    // ───────────────────────── Internal ─────────────────────────

    fn set_balance(&mut self, holder: Address, amount: Amount) {
        if amount == 0 {
            self.balances.remove(&holder);
        } else {
            self.balances.insert(holder, amount);
        }
    }

    fn set_allowance(&mut self, owner: Address, spender: Address, amount: Amount) {
        if amount == 0 {
            self.allowances.remove(&(owner, spender));
        } else {
            self.allowances.insert((owner, spender), amount);
        }
    }
}

fn split_events(from: Address, to: Address, quote: &FeeQuote, collector: Address) -> Vec<TokenEvent> {
    let mut events = vec![TokenEvent::transfer(from, to, quote.net)];
    if quote.fee > 0 {
        events.push(TokenEvent::transfer(from, collector, quote.fee));
    }
    events
}

#[cfg(test)]
mod tests {
    use super::*;
    use ledger_types::errors::ArithmeticError;

    fn setup_ledger() -> (Ledger, Address) {
        let treasury = Address::new();
        (Ledger::with_supply(treasury, 1_000), treasury)
    }

    fn assert_balanced(ledger: &Ledger) {
        assert_eq!(ledger.balance_sum().unwrap(), ledger.total_supply());
    }

    // ─── Transfer tests ───

    #[test]
    fn test_raw_transfer_success() {
        let (mut ledger, treasury) = setup_ledger();
        let alice = Address::new();

        let event = ledger.raw_transfer(treasury, alice, 300).unwrap();
        assert_eq!(event, TokenEvent::transfer(treasury, alice, 300));
        assert_eq!(ledger.balance_of(&treasury), 700);
        assert_eq!(ledger.balance_of(&alice), 300);
        assert_balanced(&ledger);
    }

    #[test]
    fn test_raw_transfer_zero_amount_allowed() {
        let (mut ledger, treasury) = setup_ledger();
        let alice = Address::new();
        let event = ledger.raw_transfer(treasury, alice, 0).unwrap();
        assert_eq!(event, TokenEvent::transfer(treasury, alice, 0));
        assert_eq!(ledger.balance_of(&alice), 0);
        assert_eq!(ledger.holders().count(), 1);
    }

    #[test]
    fn test_raw_transfer_to_null_rejected() {
        let (mut ledger, treasury) = setup_ledger();
        let result = ledger.raw_transfer(treasury, Address::NULL, 1);
        assert_eq!(result, Err(TokenError::ZeroAddress));
    }

    #[test]
    fn test_raw_transfer_insufficient() {
        let (mut ledger, treasury) = setup_ledger();
        let result = ledger.raw_transfer(treasury, Address::new(), 1_001);
        assert_eq!(
            result,
            Err(TokenError::InsufficientBalance {
                account: treasury,
                required: 1_001,
                available: 1_000,
            })
        );
        assert_eq!(ledger.balance_of(&treasury), 1_000);
    }

    #[test]
    fn test_self_transfer_keeps_balance() {
        let (mut ledger, treasury) = setup_ledger();
        ledger.raw_transfer(treasury, treasury, 400).unwrap();
        assert_eq!(ledger.balance_of(&treasury), 1_000);
        assert_balanced(&ledger);
    }

    // ─── Split transfer tests ───

    #[test]
    fn test_transfer_split_credits_collector() {
        let (mut ledger, treasury) = setup_ledger();
        let alice = Address::new();
        let collector = Address::new();
        let quote = FeeQuote { gross: 100, fee: 3, net: 97 };

        let events = ledger.transfer_split(treasury, alice, &quote, collector).unwrap();
        assert_eq!(
            events,
            vec![
                TokenEvent::transfer(treasury, alice, 97),
                TokenEvent::transfer(treasury, collector, 3),
            ]
        );
        assert_eq!(ledger.balance_of(&alice), 97);
        assert_eq!(ledger.balance_of(&collector), 3);
        assert_eq!(ledger.balance_of(&treasury), 900);
        assert_balanced(&ledger);
    }

    #[test]
    fn test_transfer_split_sender_is_collector() {
        let (mut ledger, treasury) = setup_ledger();
        let alice = Address::new();
        let quote = FeeQuote { gross: 1_000, fee: 1, net: 999 };

        ledger.transfer_split(treasury, alice, &quote, treasury).unwrap();
        assert_eq!(ledger.balance_of(&treasury), 1);
        assert_eq!(ledger.balance_of(&alice), 999);
        assert_balanced(&ledger);
    }

    #[test]
    fn test_transfer_split_checks_gross_not_net() {
        let (mut ledger, treasury) = setup_ledger();
        let quote = FeeQuote { gross: 1_001, fee: 2, net: 999 };
        let result = ledger.transfer_split(treasury, Address::new(), &quote, Address::new());
        assert!(matches!(result, Err(TokenError::InsufficientBalance { .. })));
        assert_eq!(ledger.balance_of(&treasury), 1_000);
    }

    // ─── Allowance tests ───

    #[test]
    fn test_transfer_from_consumes_allowance() {
        let (mut ledger, treasury) = setup_ledger();
        let spender = Address::new();
        let bob = Address::new();
        ledger.approve(treasury, spender, 500);

        ledger.raw_transfer_from(spender, treasury, bob, 200).unwrap();
        assert_eq!(ledger.allowance(&treasury, &spender), 300);
        assert_eq!(ledger.balance_of(&bob), 200);
    }

    #[test]
    fn test_transfer_from_unlimited_allowance_untouched() {
        let (mut ledger, treasury) = setup_ledger();
        let spender = Address::new();
        ledger.approve(treasury, spender, MAX_AMOUNT);

        ledger.raw_transfer_from(spender, treasury, Address::new(), 500).unwrap();
        assert_eq!(ledger.allowance(&treasury, &spender), MAX_AMOUNT);
    }

    #[test]
    fn test_transfer_from_insufficient_allowance() {
        let (mut ledger, treasury) = setup_ledger();
        let spender = Address::new();
        ledger.approve(treasury, spender, 10);

        let result = ledger.raw_transfer_from(spender, treasury, Address::new(), 11);
        assert_eq!(
            result,
            Err(TokenError::InsufficientAllowance {
                owner: treasury,
                spender,
                required: 11,
                available: 10,
            })
        );
        assert_eq!(ledger.allowance(&treasury, &spender), 10);
        assert_eq!(ledger.balance_of(&treasury), 1_000);
    }

    #[test]
    fn test_transfer_from_checks_balance_before_allowance() {
        let (mut ledger, treasury) = setup_ledger();
        let spender = Address::new();
        let result = ledger.raw_transfer_from(spender, treasury, Address::new(), 5_000);
        assert!(matches!(result, Err(TokenError::InsufficientBalance { .. })));
    }

    #[test]
    fn test_transfer_from_split_charges_gross() {
        let (mut ledger, treasury) = setup_ledger();
        let spender = Address::new();
        let bob = Address::new();
        let collector = Address::new();
        ledger.approve(treasury, spender, 100);
        let quote = FeeQuote { gross: 100, fee: 4, net: 96 };

        let events = ledger
            .transfer_from_split(spender, treasury, bob, &quote, collector)
            .unwrap();
        assert_eq!(events.len(), 2);
        assert_eq!(ledger.allowance(&treasury, &spender), 0);
        assert_eq!(ledger.allowance_entries().count(), 0);
        assert_eq!(ledger.balance_of(&bob), 96);
        assert_eq!(ledger.balance_of(&collector), 4);
        assert_balanced(&ledger);
    }

    #[test]
    fn test_approve_overwrites_and_revokes() {
        let (mut ledger, treasury) = setup_ledger();
        let spender = Address::new();
        ledger.approve(treasury, spender, 50);
        let event = ledger.approve(treasury, spender, 0);
        assert_eq!(event, TokenEvent::approval(treasury, spender, 0));
        assert_eq!(ledger.allowance(&treasury, &spender), 0);
    }

    #[test]
    fn test_increase_approval_overflow() {
        let (mut ledger, treasury) = setup_ledger();
        let spender = Address::new();
        ledger.approve(treasury, spender, MAX_AMOUNT);
        let result = ledger.increase_approval(treasury, spender, 1);
        assert_eq!(result, Err(TokenError::Arithmetic(ArithmeticError::Overflow)));
        assert_eq!(ledger.allowance(&treasury, &spender), MAX_AMOUNT);
    }

    #[test]
    fn test_decrease_approval_floors_at_zero() {
        let (mut ledger, treasury) = setup_ledger();
        let spender = Address::new();
        ledger.approve(treasury, spender, 30);
        assert_eq!(
            ledger.decrease_approval(treasury, spender, 10),
            TokenEvent::approval(treasury, spender, 20)
        );
        assert_eq!(
            ledger.decrease_approval(treasury, spender, 1_000),
            TokenEvent::approval(treasury, spender, 0)
        );
    }

    // ─── Supply tests ───

    #[test]
    fn test_mint_and_burn() {
        let (mut ledger, treasury) = setup_ledger();
        assert_eq!(
            ledger.mint(treasury, 500).unwrap(),
            TokenEvent::transfer(Address::NULL, treasury, 500)
        );
        assert_eq!(ledger.total_supply(), 1_500);
        assert_eq!(
            ledger.burn(treasury, 1_500).unwrap(),
            TokenEvent::transfer(treasury, Address::NULL, 1_500)
        );
        assert_eq!(ledger.total_supply(), 0);
        assert_eq!(ledger.holders().count(), 0);
    }

    #[test]
    fn test_mint_overflow_leaves_state() {
        let (mut ledger, treasury) = setup_ledger();
        let result = ledger.mint(treasury, MAX_AMOUNT);
        assert_eq!(result, Err(TokenError::Arithmetic(ArithmeticError::Overflow)));
        assert_eq!(ledger.total_supply(), 1_000);
        assert_eq!(ledger.balance_of(&treasury), 1_000);
    }

    #[test]
    fn test_seize_removes_whole_balance() {
        let (mut ledger, treasury) = setup_ledger();
        let mallory = Address::new();
        ledger.raw_transfer(treasury, mallory, 250).unwrap();

        assert_eq!(ledger.seize(mallory).unwrap(), 250);
        assert_eq!(ledger.balance_of(&mallory), 0);
        assert_eq!(ledger.total_supply(), 750);
        assert_eq!(ledger.seize(mallory).unwrap(), 0);
        assert_balanced(&ledger);
    }
}
