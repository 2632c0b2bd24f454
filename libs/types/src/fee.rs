//! Fee schedule for fee-on-transfer
//!
//! A transfer of `amount` pays `min(floor(amount * bp / 10000), maximum_fee)`
//! to the fee collector; the recipient receives the remainder.

use serde::{Deserialize, Serialize};

use crate::errors::ArithmeticError;
use crate::numeric::{checked_sub, mul_div_floor, Amount};

/// Basis points in one whole (100%).
pub const BASIS_POINT_DENOMINATOR: Amount = 10_000;

/// Exclusive ceiling on the fee rate in basis points.
pub const MAX_BASIS_POINTS: Amount = 20;

/// Exclusive ceiling on the maximum fee, in whole tokens (before scaling
/// by `10^decimals`).
pub const MAX_FEE_UNITS: Amount = 50;

/// Current fee parameters.
///
/// `maximum_fee` is stored in raw units, already scaled by `10^decimals`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeSchedule {
    pub basis_points: Amount,
    pub maximum_fee: Amount,
}

impl FeeSchedule {
    /// A schedule that charges nothing.
    pub const ZERO: FeeSchedule = FeeSchedule {
        basis_points: 0,
        maximum_fee: 0,
    };

    /// Fee owed on a transfer of `amount`.
    pub fn compute_fee(&self, amount: Amount) -> Result<Amount, ArithmeticError> {
        if self.basis_points == 0 {
            return Ok(0);
        }
        let fee = mul_div_floor(amount, self.basis_points, BASIS_POINT_DENOMINATOR)?;
        Ok(fee.min(self.maximum_fee))
    }

    /// Split a gross amount into fee and net.
    pub fn quote(&self, amount: Amount) -> Result<FeeQuote, ArithmeticError> {
        let fee = self.compute_fee(amount)?;
        Ok(FeeQuote {
            gross: amount,
            fee,
            net: checked_sub(amount, fee)?,
        })
    }
}

/// Breakdown of one fee-adjusted transfer.
///
/// Invariant: `gross == net + fee`
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeeQuote {
    pub gross: Amount,
    pub fee: Amount,
    pub net: Amount,
}

impl FeeQuote {
    /// A quote that moves `amount` without any fee.
    pub fn fee_free(amount: Amount) -> Self {
        Self {
            gross: amount,
            fee: 0,
            net: amount,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::numeric::MAX_AMOUNT;
    use proptest::prelude::*;

    fn schedule(basis_points: Amount, maximum_fee: Amount) -> FeeSchedule {
        FeeSchedule {
            basis_points,
            maximum_fee,
        }
    }

    #[test]
    fn test_zero_rate_charges_nothing() {
        assert_eq!(FeeSchedule::ZERO.compute_fee(1_000_000), Ok(0));
        assert_eq!(FeeSchedule::ZERO.compute_fee(MAX_AMOUNT), Ok(0));
    }

    #[test]
    fn test_fee_floor() {
        let s = schedule(10, 500);
        assert_eq!(s.compute_fee(1000), Ok(1)); // 1000 * 10 / 10000
        assert_eq!(s.compute_fee(999), Ok(0));
    }

    #[test]
    fn test_fee_capped_at_maximum() {
        let s = schedule(19, 500);
        assert_eq!(s.compute_fee(10_000_000), Ok(500));
    }

    #[test]
    fn test_fee_at_max_amount_does_not_overflow() {
        let s = schedule(19, 49_000_000);
        assert_eq!(s.compute_fee(MAX_AMOUNT), Ok(49_000_000));
    }

    #[test]
    fn test_quote_splits_gross() {
        let quote = schedule(10, 500).quote(1000).unwrap();
        assert_eq!(quote, FeeQuote { gross: 1000, fee: 1, net: 999 });
        assert_eq!(FeeQuote::fee_free(7), FeeQuote { gross: 7, fee: 0, net: 7 });
    }

    proptest! {
        #[test]
        fn prop_fee_is_monotonic_and_bounded(
            bp in 0u128..MAX_BASIS_POINTS,
            max_fee in 0u128..1_000_000u128,
            a in 0u128..1_000_000_000_000u128,
            b in 0u128..1_000_000_000_000u128,
        ) {
            let s = schedule(bp, max_fee);
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            let fee_lo = s.compute_fee(lo).unwrap();
            let fee_hi = s.compute_fee(hi).unwrap();
            prop_assert!(fee_lo <= fee_hi);
            prop_assert!(fee_hi <= max_fee);
            prop_assert!(fee_hi <= hi);
            prop_assert_eq!(s.compute_fee(0).unwrap(), 0);
        }
    }
}
