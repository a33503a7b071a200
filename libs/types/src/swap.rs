//! Swap instructions and routing results
//!
//! The router's output: concrete per-pool legs with the amounts it decided
//! to send through each, grouped into execution sequences (one inner vector
//! per path, two entries for a multihop sequence).

use crate::pool::PoolId;
use crate::token::TokenAddress;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Which side of the trade is fixed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SwapDirection {
    /// The input amount is fixed, maximize output
    ExactIn,
    /// The output amount is fixed, minimize input
    ExactOut,
}

/// One concrete leg to execute against a pool
///
/// `limit_return_amount` and `max_price` are safety bounds carried through to
/// execution; the router passes them through with permissive defaults and the
/// caller tightens them from the preview's bounds.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SwapInstruction {
    pub pool: PoolId,
    pub token_in: TokenAddress,
    pub token_out: TokenAddress,
    /// Amount routed through this leg: input for exact-in, output for exact-out
    pub swap_amount: Decimal,
    pub limit_return_amount: Decimal,
    pub max_price: Decimal,
}

impl SwapInstruction {
    pub fn new(
        pool: PoolId,
        token_in: TokenAddress,
        token_out: TokenAddress,
        swap_amount: Decimal,
    ) -> Self {
        Self {
            pool,
            token_in,
            token_out,
            swap_amount,
            limit_return_amount: Decimal::ZERO,
            max_price: Decimal::MAX,
        }
    }
}

/// The router's chosen allocation across one or more paths
///
/// `total_return` is the aggregate output for exact-in, or the aggregate
/// required input for exact-out. An empty result is the normal outcome when
/// no path between the tokens exists; it is not an error.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutingResult {
    pub sequences: Vec<Vec<SwapInstruction>>,
    pub total_return: Decimal,
}

impl RoutingResult {
    pub fn empty() -> Self {
        Self {
            sequences: Vec::new(),
            total_return: Decimal::ZERO,
        }
    }

    /// Whether the router found any executable allocation
    pub fn is_viable(&self) -> bool {
        !self.sequences.is_empty()
    }

    /// Number of distinct pools engaged across all sequences
    pub fn distinct_pool_count(&self) -> usize {
        self.sequences
            .iter()
            .flatten()
            .map(|instruction| &instruction.pool)
            .collect::<HashSet<_>>()
            .len()
    }

    /// Total amount allocated on the fixed side of the trade
    ///
    /// For exact-in this sums the first leg of every sequence; for exact-out
    /// the last leg.
    pub fn allocated_amount(&self, direction: SwapDirection) -> Decimal {
        self.sequences
            .iter()
            .filter_map(|sequence| match direction {
                SwapDirection::ExactIn => sequence.first(),
                SwapDirection::ExactOut => sequence.last(),
            })
            .map(|instruction| instruction.swap_amount)
            .sum()
    }
}

impl Default for RoutingResult {
    fn default() -> Self {
        Self::empty()
    }
}
