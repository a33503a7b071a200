//! Swap previews and execution safety bounds
//!
//! Converts a routing result into the figures a trading UI renders: the
//! aggregate spot price untouched by the trade's own impact, the effective
//! price from the routed totals, the expected slippage between them, and
//! the min-out / max-in bounds derived from the user's slippage tolerance.
//! An empty routing result produces an invalid preview with a typed reason;
//! no numeric fields are fabricated for it.

use crate::discovery::PoolMap;
use crate::error::RouterError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};
use sor_amm::WeightedMath;
use sor_types::{RoutingResult, SwapDirection, SwapInstruction};
use std::fmt;
use tracing::warn;

const HUNDRED: Decimal = dec!(100);

/// Why a preview carries no price
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvalidReason {
    /// No pool holds the requested pair, directly or via one hop
    NoPools,
    /// Paths exist but cannot absorb the requested trade
    InsufficientLiquidity,
    /// Pool data has not been loaded yet
    AwaitingPoolData,
}

impl fmt::Display for InvalidReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoPools => f.write_str("No pools with selected tokens"),
            Self::InsufficientLiquidity => f.write_str("Insufficient liquidity"),
            Self::AwaitingPoolData => f.write_str("Waiting for pool data"),
        }
    }
}

/// Figures for an exact-in trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactInPreview {
    pub amount_in: Decimal,
    pub amount_out: Decimal,
    /// Volume-weighted spot price before the trade's own impact
    pub spot_price: Decimal,
    /// Realized average price including impact
    pub effective_price: Decimal,
    pub expected_slippage_pct: Decimal,
    /// Safety floor at the given slippage tolerance
    pub minimum_amount_out: Decimal,
    pub result: RoutingResult,
}

/// Figures for an exact-out trade
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExactOutPreview {
    pub amount_out: Decimal,
    pub amount_in: Decimal,
    pub spot_price: Decimal,
    pub effective_price: Decimal,
    pub expected_slippage_pct: Decimal,
    /// Safety ceiling at the given slippage tolerance
    pub maximum_amount_in: Decimal,
    pub result: RoutingResult,
}

/// A UI-facing snapshot, replaced wholesale on every input change
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SwapPreview {
    ExactIn(ExactInPreview),
    ExactOut(ExactOutPreview),
    Invalid { reason: InvalidReason },
}

impl SwapPreview {
    pub fn invalid(reason: InvalidReason) -> Self {
        Self::Invalid { reason }
    }

    pub fn is_valid(&self) -> bool {
        !matches!(self, Self::Invalid { .. })
    }
}

/// Minimum acceptable output at a slippage tolerance, floored at zero
pub fn calc_min_amount_out(spot_value: Decimal, slippage_pct: Decimal) -> Decimal {
    (spot_value * (Decimal::ONE - slippage_pct / HUNDRED)).max(Decimal::ZERO)
}

/// Maximum acceptable input at a slippage tolerance
pub fn calc_max_amount_in(spot_value: Decimal, slippage_pct: Decimal) -> Decimal {
    spot_value * (Decimal::ONE + slippage_pct / HUNDRED)
}

/// Spot price of one executed sequence: the product of its legs' spot prices
fn sequence_spot_price(
    sequence: &[SwapInstruction],
    pools: &PoolMap,
) -> Result<Decimal, RouterError> {
    let mut price = Decimal::ONE;
    for instruction in sequence {
        let record = pools
            .get(&instruction.pool)
            .ok_or_else(|| RouterError::UnknownPool {
                pool: instruction.pool.to_string(),
            })?;
        let view = record.pair_view(&instruction.token_in, &instruction.token_out)?;
        price *= WeightedMath::spot_price_of(&view)?;
    }
    Ok(price)
}

/// Build the preview for a routing result
///
/// `swap_amount` is the fixed side of the trade; `slippage_tolerance_pct`
/// drives the safety bounds.
pub fn build_preview(
    pools: &PoolMap,
    direction: SwapDirection,
    swap_amount: Decimal,
    result: RoutingResult,
    slippage_tolerance_pct: Decimal,
) -> Result<SwapPreview, RouterError> {
    if !result.is_viable() || result.total_return <= Decimal::ZERO {
        return Ok(SwapPreview::invalid(InvalidReason::InsufficientLiquidity));
    }

    // Aggregate reference price: combine per-sequence spot prices weighted
    // by the volume the router allocated to each sequence
    let mut spot_converted = Decimal::ZERO;
    for sequence in &result.sequences {
        let price = sequence_spot_price(sequence, pools)?;
        match direction {
            SwapDirection::ExactIn => {
                // Output this sequence would yield at its frictionless price
                let allocated = sequence
                    .first()
                    .map(|leg| leg.swap_amount)
                    .unwrap_or_default();
                spot_converted += allocated / price;
            }
            SwapDirection::ExactOut => {
                // Input this sequence would need at its frictionless price
                let produced = sequence
                    .last()
                    .map(|leg| leg.swap_amount)
                    .unwrap_or_default();
                spot_converted += produced * price;
            }
        }
    }
    if spot_converted <= Decimal::ZERO {
        return Ok(SwapPreview::invalid(InvalidReason::InsufficientLiquidity));
    }

    match direction {
        SwapDirection::ExactIn => {
            let amount_in = swap_amount;
            let amount_out = result.total_return;
            let spot_price = amount_in / spot_converted;
            let effective_price = amount_in / amount_out;
            let expected_slippage_pct =
                slippage_between(spot_price, effective_price, amount_in, amount_out);
            Ok(SwapPreview::ExactIn(ExactInPreview {
                amount_in,
                amount_out,
                spot_price,
                effective_price,
                expected_slippage_pct,
                minimum_amount_out: calc_min_amount_out(spot_converted, slippage_tolerance_pct),
                result,
            }))
        }
        SwapDirection::ExactOut => {
            let amount_out = swap_amount;
            let amount_in = result.total_return;
            let spot_price = spot_converted / amount_out;
            let effective_price = amount_in / amount_out;
            let expected_slippage_pct =
                slippage_between(spot_price, effective_price, amount_in, amount_out);
            Ok(SwapPreview::ExactOut(ExactOutPreview {
                amount_out,
                amount_in,
                spot_price,
                effective_price,
                expected_slippage_pct,
                maximum_amount_in: calc_max_amount_in(spot_converted, slippage_tolerance_pct),
                result,
            }))
        }
    }
}

/// Price-impact cost relative to the frictionless reference price
///
/// `100 * (1 - spot / effective)`. Non-negative in a correct router; a
/// materially negative value signals a pricing or allocation bug and is
/// logged before being clamped to zero, so a broken figure is never shown
/// as a bonus.
fn slippage_between(
    spot_price: Decimal,
    effective_price: Decimal,
    amount_in: Decimal,
    amount_out: Decimal,
) -> Decimal {
    let slippage = HUNDRED * (Decimal::ONE - spot_price / effective_price);
    if slippage < Decimal::ZERO {
        warn!(
            %spot_price,
            %effective_price,
            %amount_in,
            %amount_out,
            "negative expected slippage, clamping; this indicates a router bug"
        );
        return Decimal::ZERO;
    }
    slippage
}
