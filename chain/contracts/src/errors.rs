//! Ledger error types
//!
//! Every rejected operation reports exactly one of these and leaves the
//! ledger untouched.

use ledger_types::errors::ArithmeticError;
use ledger_types::ids::Address;
use ledger_types::numeric::Amount;
use thiserror::Error;

/// Token ledger errors
#[derive(Error, Debug, Clone, PartialEq)]
pub enum TokenError {
    #[error("Unauthorized: {caller} is not the owner")]
    Unauthorized { caller: Address },

    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("System is paused")]
    SystemPaused,

    #[error("Sender is blacklisted: {account}")]
    SenderBlacklisted { account: Address },

    #[error("Insufficient balance for {account}: required {required}, available {available}")]
    InsufficientBalance {
        account: Address,
        required: Amount,
        available: Amount,
    },

    #[error("Insufficient allowance for {spender} on {owner}: required {required}, available {available}")]
    InsufficientAllowance {
        owner: Address,
        spender: Address,
        required: Amount,
        available: Amount,
    },

    #[error("Transfer to the zero address")]
    ZeroAddress,

    #[error("Invalid address: the null identity is not allowed here")]
    InvalidAddress,

    #[error("Parameter {name} out of range: {value} must be below {limit}")]
    ParameterOutOfRange {
        name: String,
        value: Amount,
        limit: Amount,
    },

    #[error("Token already deprecated")]
    AlreadyDeprecated,

    #[error("Token is deprecated")]
    TokenDeprecated,

    #[error("Account is not blacklisted: {account}")]
    NotBlacklisted { account: Address },

    #[error("Arithmetic error: {0}")]
    Arithmetic(#[from] ArithmeticError),

    #[error("Reentrancy detected: successor ledger is busy")]
    Reentrancy,

    #[error("Supply invariant violated: balances sum to {balances}, total supply is {total_supply}")]
    InvariantViolation {
        balances: Amount,
        total_supply: Amount,
    },

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl TokenError {
    pub(crate) fn out_of_range(name: &str, value: Amount, limit: Amount) -> Self {
        TokenError::ParameterOutOfRange {
            name: name.to_string(),
            value,
            limit,
        }
    }
}

/// Result alias used across the ledger crate.
pub type Result<T> = std::result::Result<T, TokenError>;
