//! Structured error types for pricing math

use rust_decimal::Decimal;
use thiserror::Error;

/// Errors raised by the weighted-pool math kernels
///
/// `InsufficientLiquidity` is recoverable (the caller excludes the affected
/// path and continues); the remaining variants indicate malformed inputs or
/// values outside the decimal range.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum MathError {
    #[error("Amount must be positive, got {amount}")]
    NonPositiveAmount { amount: Decimal },

    #[error("Balances and weights must be positive for pricing")]
    DegenerateState,

    #[error("Swap fee {fee} must be in [0, 1)")]
    InvalidFee { fee: Decimal },

    #[error("Insufficient liquidity: requested {requested} of reserve {available}")]
    InsufficientLiquidity {
        requested: Decimal,
        available: Decimal,
    },

    #[error("Logarithm argument {argument} must be positive")]
    LogDomain { argument: Decimal },

    #[error("Decimal overflow in {context}")]
    Overflow { context: &'static str },

    #[error("Exponent {exponent} outside supported range")]
    ExponentRange { exponent: Decimal },

    #[error("Invalid decimal string: '{input}'")]
    InvalidDecimal { input: String },
}
