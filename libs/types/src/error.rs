//! Error types for domain-model validation
//!
//! Malformed upstream pool data is reported here so callers can skip the
//! affected record and continue the pass instead of aborting it.

use thiserror::Error;

/// Errors raised while validating or projecting domain types
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum TypesError {
    /// Address string is not a 20-byte hex value
    #[error("Invalid address: '{input}' - expected 0x-prefixed 20-byte hex")]
    InvalidAddress { input: String },

    /// Pool does not hold the requested token
    #[error("Pool {pool} does not hold token {token}")]
    UnknownToken { pool: String, token: String },

    /// Pool has a zero balance or zero weight on one side of the pair
    #[error("Degenerate pool {pool}: zero {field} for token {token}")]
    DegeneratePool {
        pool: String,
        token: String,
        field: &'static str,
    },

    /// Swap fee outside [0, 1)
    #[error("Invalid swap fee {fee} for pool {pool}: must be in [0, 1)")]
    InvalidFee { pool: String, fee: String },

    /// Pool record lists the same token twice
    #[error("Pool {pool} lists token {token} more than once")]
    DuplicateToken { pool: String, token: String },

    /// Pool record holds fewer than two tokens
    #[error("Pool {pool} must hold at least two tokens, found {count}")]
    TooFewTokens { pool: String, count: usize },

    /// Adjacent path hops do not share the intermediate token
    #[error("Path hops do not connect: hop ends at {out} but next hop starts at {next_in}")]
    HopMismatch { out: String, next_in: String },

    /// Path with no hops or more than two hops
    #[error("Path must have one or two hops, found {count}")]
    InvalidHopCount { count: usize },

    /// A trade was requested between a token and itself
    #[error("Token in and token out are the same: {token}")]
    IdenticalTokens { token: String },

    /// Token declares more decimal places than the arithmetic can carry
    #[error("Token {token} declares {decimals} decimals, maximum supported is 28")]
    UnsupportedDecimals { token: String, decimals: u32 },

    /// Raw balance does not fit the decimal representation
    #[error("Balance for token {token} overflows the 96-bit decimal mantissa")]
    BalanceOverflow { token: String },
}
