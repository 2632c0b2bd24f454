//! Error types for checked ledger arithmetic

use thiserror::Error;

/// Failure of a checked arithmetic operation.
///
/// Ledger arithmetic never wraps or saturates implicitly; every operation
/// that could leave the `u128` range reports one of these instead.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArithmeticError {
    #[error("Arithmetic overflow")]
    Overflow,

    #[error("Arithmetic underflow")]
    Underflow,

    #[error("Division by zero")]
    DivisionByZero,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic_error_display() {
        assert_eq!(ArithmeticError::Overflow.to_string(), "Arithmetic overflow");
        assert_eq!(ArithmeticError::Underflow.to_string(), "Arithmetic underflow");
        assert_eq!(ArithmeticError::DivisionByZero.to_string(), "Division by zero");
    }
}
