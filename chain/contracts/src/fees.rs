//! Fee engine: admin-tunable fee-on-transfer
//!
//! Wraps the [`FeeSchedule`] with the token's decimal scaling and the hard
//! ceilings on both parameters.

use ledger_types::fee::{FeeQuote, FeeSchedule, MAX_BASIS_POINTS, MAX_FEE_UNITS};
use ledger_types::numeric::{checked_mul, checked_pow10, Amount};

use crate::errors::{Result, TokenError};
use crate::events::{Params, TokenEvent};

/// Fee parameters of one token.
#[derive(Debug, Clone)]
pub struct FeeEngine {
    schedule: FeeSchedule,
    decimals: u8,
}

impl FeeEngine {
    /// Fee-free engine for a token with `decimals` decimal places.
    pub fn new(decimals: u8) -> Self {
        Self {
            schedule: FeeSchedule::ZERO,
            decimals,
        }
    }

    /// Restore an engine from a persisted schedule, re-checking ceilings.
    pub fn with_schedule(decimals: u8, schedule: FeeSchedule) -> Result<Self> {
        if schedule.basis_points >= MAX_BASIS_POINTS {
            return Err(TokenError::out_of_range(
                "basis_points",
                schedule.basis_points,
                MAX_BASIS_POINTS,
            ));
        }
        let fee_ceiling = checked_mul(MAX_FEE_UNITS, checked_pow10(decimals)?)?;
        if schedule.maximum_fee >= fee_ceiling {
            return Err(TokenError::out_of_range(
                "maximum_fee",
                schedule.maximum_fee,
                fee_ceiling,
            ));
        }
        Ok(Self { schedule, decimals })
    }

    /// Replace the fee parameters.
    ///
    /// `max_fee_units` is in whole tokens and is scaled by `10^decimals`
    /// before being stored.
    pub fn set_params(&mut self, basis_points: Amount, max_fee_units: Amount) -> Result<TokenEvent> {
        if basis_points >= MAX_BASIS_POINTS {
            return Err(TokenError::out_of_range("basis_points", basis_points, MAX_BASIS_POINTS));
        }
        if max_fee_units >= MAX_FEE_UNITS {
            return Err(TokenError::out_of_range("max_fee", max_fee_units, MAX_FEE_UNITS));
        }
        let maximum_fee = checked_mul(max_fee_units, checked_pow10(self.decimals)?)?;

        self.schedule = FeeSchedule {
            basis_points,
            maximum_fee,
        };
        Ok(TokenEvent::Params(Params {
            fee_basis_points: basis_points,
            max_fee: maximum_fee,
        }))
    }

    /// Fee owed on a transfer of `amount`.
    pub fn compute_fee(&self, amount: Amount) -> Result<Amount> {
        Ok(self.schedule.compute_fee(amount)?)
    }

    /// Split `amount` into net and fee legs.
    pub fn quote(&self, amount: Amount) -> Result<FeeQuote> {
        Ok(self.schedule.quote(amount)?)
    }

    pub fn schedule(&self) -> FeeSchedule {
        self.schedule
    }

    pub fn basis_points(&self) -> Amount {
        self.schedule.basis_points
    }

    /// Maximum fee in raw units.
    pub fn maximum_fee(&self) -> Amount {
        self.schedule.maximum_fee
    }
}
