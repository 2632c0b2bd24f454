//! Checked integer arithmetic for token amounts
//!
//! Amounts are raw `u128` units (no implicit decimal point). Every helper
//! here fails with [`ArithmeticError`] rather than wrapping, so callers can
//! propagate with `?` and abort the whole operation.

use crate::errors::ArithmeticError;

/// Raw token amount.
pub type Amount = u128;

/// Largest representable amount. As an allowance it means "unlimited".
pub const MAX_AMOUNT: Amount = u128::MAX;

/// `a + b`, failing on overflow.
pub fn checked_add(a: Amount, b: Amount) -> Result<Amount, ArithmeticError> {
    a.checked_add(b).ok_or(ArithmeticError::Overflow)
}

/// `a - b`, failing on underflow.
pub fn checked_sub(a: Amount, b: Amount) -> Result<Amount, ArithmeticError> {
    a.checked_sub(b).ok_or(ArithmeticError::Underflow)
}

/// `a * b`, failing on overflow.
pub fn checked_mul(a: Amount, b: Amount) -> Result<Amount, ArithmeticError> {
    a.checked_mul(b).ok_or(ArithmeticError::Overflow)
}

/// `a / b` (floor), failing on division by zero.
pub fn checked_div(a: Amount, b: Amount) -> Result<Amount, ArithmeticError> {
    a.checked_div(b).ok_or(ArithmeticError::DivisionByZero)
}

/// `a % b`, failing on division by zero.
pub fn checked_rem(a: Amount, b: Amount) -> Result<Amount, ArithmeticError> {
    a.checked_rem(b).ok_or(ArithmeticError::DivisionByZero)
}

/// `10^exp`, failing on overflow.
pub fn checked_pow10(exp: u8) -> Result<Amount, ArithmeticError> {
    10u128
        .checked_pow(u32::from(exp))
        .ok_or(ArithmeticError::Overflow)
}

/// `floor(amount * numerator / denominator)` without an intermediate
/// product that could overflow when `numerator < denominator`.
pub fn mul_div_floor(
    amount: Amount,
    numerator: Amount,
    denominator: Amount,
) -> Result<Amount, ArithmeticError> {
    let whole = checked_mul(checked_div(amount, denominator)?, numerator)?;
    let rest = checked_div(
        checked_mul(checked_rem(amount, denominator)?, numerator)?,
        denominator,
    )?;
    checked_add(whole, rest)
}
