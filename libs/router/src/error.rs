//! Structured error types for routing failures
//!
//! Expected no-liquidity conditions are not errors: discovery returns empty
//! path sets and the router returns an empty `RoutingResult` for them. The
//! variants here cover caller mistakes, malformed upstream data, and the
//! stale-preview signal of the quoting session.

use rust_decimal::Decimal;
use sor_amm::MathError;
use sor_types::TypesError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum RouterError {
    /// Trade size must be strictly positive
    #[error("Trade amount must be positive, got {amount}")]
    InvalidAmount { amount: Decimal },

    /// A path references a pool missing from the pricing pass
    #[error("Path references unknown pool {pool}")]
    UnknownPool { pool: String },

    /// The preview was superseded by a newer request and must be discarded
    #[error("Preview superseded by a newer request")]
    StaleInput,

    #[error(transparent)]
    Math(#[from] MathError),

    #[error(transparent)]
    Types(#[from] TypesError),
}
