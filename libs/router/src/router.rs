//! # Smart Order Router - Marginal-Price Trade Splitting
//!
//! ## Purpose
//!
//! Given the candidate paths for a token pair and a total trade size, finds
//! the allocation across paths that approximates the price-optimal split.
//! The router equalizes marginal prices: volume flows to the path offering
//! the best price for the next unit until its price degrades to the level of
//! the next-best path, subject to a cap on distinct pools engaged and a
//! fixed per-pool execution cost that discourages splitting when the price
//! improvement does not justify another on-chain hop.
//!
//! ## Algorithm
//!
//! Paths are priced and sorted by ascending spot price. For each prefix of
//! the sorted paths (one path, then two, ...), an outer bisection searches
//! for the common marginal price level at which the per-path allocations sum
//! to the trade size; an inner bisection finds each path's allocation at a
//! candidate level. Each prefix yields a net figure (output minus per-pool
//! cost for exact-in, input plus per-pool cost for exact-out) and the best
//! prefix wins. Bisections terminate on a relative epsilon or a bounded
//! iteration count, whichever comes first.
//!
//! The equalized-marginal-price split is a greedy approximation of the true
//! convex optimum, traded for speed and bounded iteration counts. A convex
//! solver may be substituted if exactness is required, provided the per-pool
//! fixed-cost semantics are preserved.

use crate::config::RouterConfig;
use crate::discovery::{PathData, PoolMap};
use crate::error::RouterError;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use smallvec::SmallVec;
use sor_amm::{MathError, WeightedMath};
use sor_types::{PairPool, Path, RoutingResult, SwapDirection, SwapInstruction};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Fraction of an output reserve the router will at most extract from a pool
const RESERVE_CAP: Decimal = dec!(0.999999);
const TWO: Decimal = dec!(2);
const MAX_BRACKET_DOUBLINGS: u32 = 96;

/// A candidate path with its pair projections and zero-volume spot price
struct PricedPath {
    legs: SmallVec<[PairPool; 2]>,
    spot: Decimal,
}

fn project_path(path: &Path, pools: &PoolMap) -> Result<SmallVec<[PairPool; 2]>, RouterError> {
    let mut legs = SmallVec::new();
    for hop in path.hops() {
        let record = pools
            .get(&hop.pool_id)
            .ok_or_else(|| RouterError::UnknownPool {
                pool: hop.pool_id.to_string(),
            })?;
        legs.push(record.pair_view(&hop.token_in, &hop.token_out)?);
    }
    Ok(legs)
}

/// Spot price of a path: the product of its legs' spot prices
fn path_spot(legs: &[PairPool]) -> Result<Decimal, MathError> {
    let mut price = Decimal::ONE;
    for leg in legs {
        price *= WeightedMath::spot_price_of(leg)?;
    }
    Ok(price)
}

/// Marginal price of a path after `allocated` volume has been committed
///
/// For exact-in the allocation is input volume chained forward through the
/// legs; for exact-out it is output volume chained backward.
fn marginal_after(
    legs: &[PairPool],
    allocated: Decimal,
    direction: SwapDirection,
) -> Result<Decimal, MathError> {
    if allocated.is_zero() {
        return path_spot(legs);
    }
    let mut price = Decimal::ONE;
    match direction {
        SwapDirection::ExactIn => {
            let mut amount = allocated;
            for leg in legs {
                if amount.is_zero() {
                    // Upstream output floored to nothing; this leg sits at spot
                    price *= WeightedMath::spot_price_of(leg)?;
                    continue;
                }
                price *= WeightedMath::spot_price_after_in(leg, amount)?;
                amount = WeightedMath::out_given_in(leg, amount)?;
            }
        }
        SwapDirection::ExactOut => {
            let mut amount = allocated;
            for leg in legs.iter().rev() {
                price *= WeightedMath::spot_price_after_out(leg, amount)?;
                amount = WeightedMath::in_given_out(leg, amount)?;
            }
        }
    }
    Ok(price)
}

/// Maximum output extractable from a path before depleting a reserve
fn max_output(legs: &[PairPool]) -> Result<Decimal, MathError> {
    match legs {
        [single] => Ok(single.balance_out * RESERVE_CAP),
        [first, second] => {
            let max_intermediate = first.balance_out * RESERVE_CAP;
            let reachable = WeightedMath::out_given_in(second, max_intermediate)?;
            Ok((second.balance_out * RESERVE_CAP).min(reachable))
        }
        _ => Err(MathError::DegenerateState),
    }
}

/// Volume this path absorbs before its marginal price reaches `target`
///
/// Clamped to `cap`; returns zero when the path's spot price already sits at
/// or above the target.
fn allocation_at_price(
    legs: &[PairPool],
    direction: SwapDirection,
    target: Decimal,
    cap: Decimal,
    config: &RouterConfig,
) -> Result<Decimal, RouterError> {
    if cap <= Decimal::ZERO {
        return Ok(Decimal::ZERO);
    }
    if marginal_after(legs, Decimal::ZERO, direction)? >= target {
        return Ok(Decimal::ZERO);
    }
    if marginal_after(legs, cap, direction)? <= target {
        return Ok(cap);
    }

    let mut lo = Decimal::ZERO;
    let mut hi = cap;
    for _ in 0..config.max_volume_iterations {
        let mid = (lo + hi) / TWO;
        if mid <= lo || mid >= hi {
            break; // decimal resolution exhausted
        }
        if marginal_after(legs, mid, direction)? < target {
            lo = mid;
        } else {
            hi = mid;
        }
        if hi - lo <= config.convergence_epsilon * hi {
            break;
        }
    }
    Ok((lo + hi) / TWO)
}

/// Allocations for a prefix of paths at one common price level
fn allocations_at_price(
    prefix: &[PricedPath],
    caps: &[Decimal],
    direction: SwapDirection,
    target: Decimal,
    config: &RouterConfig,
) -> Result<(Vec<Decimal>, Decimal), RouterError> {
    let mut allocations = Vec::with_capacity(prefix.len());
    let mut total = Decimal::ZERO;
    for (path, cap) in prefix.iter().zip(caps) {
        let allocation = allocation_at_price(&path.legs, direction, target, *cap, config)?;
        total += allocation;
        allocations.push(allocation);
    }
    Ok((allocations, total))
}

/// Equalize marginal prices across a prefix so allocations sum to the trade
///
/// Returns `None` when the prefix cannot absorb the trade (exact-out beyond
/// the combined extractable output).
fn solve_prefix(
    prefix: &[PricedPath],
    direction: SwapDirection,
    swap_amount: Decimal,
    config: &RouterConfig,
) -> Result<Option<Vec<Decimal>>, RouterError> {
    // Per-path volume caps: a path never needs more than the whole trade,
    // and exact-out is further bounded by reserve depletion
    let mut caps = Vec::with_capacity(prefix.len());
    for path in prefix {
        let cap = match direction {
            SwapDirection::ExactIn => swap_amount,
            SwapDirection::ExactOut => max_output(&path.legs)?.min(swap_amount),
        };
        caps.push(cap);
    }
    if direction == SwapDirection::ExactOut {
        let capacity: Decimal = caps.iter().copied().sum();
        if capacity < swap_amount {
            return Ok(None);
        }
    }

    if prefix.len() == 1 {
        // Single path: the whole trade goes through it
        return Ok(Some(vec![swap_amount]));
    }

    // Bracket the common price level from the best path's spot upward
    let floor_price = prefix
        .iter()
        .map(|path| path.spot)
        .min()
        .unwrap_or(Decimal::ONE);
    let mut lo_price = floor_price;
    let mut hi_price = floor_price;
    let mut bracketed = false;
    for _ in 0..MAX_BRACKET_DOUBLINGS {
        let Some(doubled) = hi_price.checked_mul(TWO) else {
            break;
        };
        hi_price = doubled;
        let (_, total) = allocations_at_price(prefix, &caps, direction, hi_price, config)?;
        if total >= swap_amount {
            bracketed = true;
            break;
        }
        lo_price = hi_price;
    }
    if !bracketed {
        return Ok(None);
    }

    for _ in 0..config.max_price_iterations {
        let mid_price = (lo_price + hi_price) / TWO;
        if mid_price <= lo_price || mid_price >= hi_price {
            break;
        }
        let (_, total) = allocations_at_price(prefix, &caps, direction, mid_price, config)?;
        if total < swap_amount {
            lo_price = mid_price;
        } else {
            hi_price = mid_price;
        }
        if hi_price - lo_price <= config.convergence_epsilon * hi_price {
            break;
        }
    }

    // hi_price is the over-allocating side; trim the excess off the worst
    // paths so the allocations sum exactly to the trade size
    let (mut allocations, total) = allocations_at_price(prefix, &caps, direction, hi_price, config)?;
    let mut excess = total - swap_amount;
    for allocation in allocations.iter_mut().rev() {
        if excess <= Decimal::ZERO {
            break;
        }
        let cut = (*allocation).min(excess);
        *allocation -= cut;
        excess -= cut;
    }
    if excess > Decimal::ZERO {
        // All allocation trimmed away; the bracket lied, treat as unfillable
        return Ok(None);
    }

    Ok(Some(allocations))
}

/// Build the executable sequences for a prefix and its allocations
fn build_result(
    prefix: &[PricedPath],
    allocations: &[Decimal],
    direction: SwapDirection,
    dust: Decimal,
) -> Result<RoutingResult, RouterError> {
    let mut sequences = Vec::new();
    let mut total_return = Decimal::ZERO;

    for (path, allocation) in prefix.iter().zip(allocations) {
        if *allocation <= dust {
            continue;
        }
        let legs = &path.legs;
        match direction {
            SwapDirection::ExactIn => {
                let mut sequence = Vec::with_capacity(legs.len());
                let mut amount = *allocation;
                for leg in legs.iter() {
                    if amount.is_zero() {
                        break;
                    }
                    sequence.push(SwapInstruction::new(
                        leg.pool_id.clone(),
                        leg.token_in.clone(),
                        leg.token_out.clone(),
                        amount,
                    ));
                    amount = WeightedMath::out_given_in(leg, amount)?;
                }
                if sequence.len() < legs.len() || amount.is_zero() {
                    // A leg's output floored to nothing; the sequence yields no return
                    continue;
                }
                total_return += amount;
                sequences.push(sequence);
            }
            SwapDirection::ExactOut => {
                // Walk backward to find each leg's required output, then emit
                // instructions in execution order
                let mut required = SmallVec::<[Decimal; 2]>::new();
                let mut amount = *allocation;
                for leg in legs.iter().rev() {
                    required.push(amount);
                    amount = WeightedMath::in_given_out(leg, amount)?;
                }
                total_return += amount;
                required.reverse();
                let sequence = legs
                    .iter()
                    .zip(required)
                    .map(|(leg, leg_out)| {
                        SwapInstruction::new(
                            leg.pool_id.clone(),
                            leg.token_in.clone(),
                            leg.token_out.clone(),
                            leg_out,
                        )
                    })
                    .collect();
                sequences.push(sequence);
            }
        }
    }

    if sequences.is_empty() {
        return Ok(RoutingResult::empty());
    }
    Ok(RoutingResult {
        sequences,
        total_return,
    })
}

/// Find the best allocation of a trade across the discovered paths
///
/// Returns an empty result when no path exists or none can absorb the trade;
/// that is the expected insufficient-liquidity outcome, not an error.
pub fn find_best_swaps_multi(
    pools: &PoolMap,
    path_data: &PathData,
    direction: SwapDirection,
    swap_amount: Decimal,
    max_pools: usize,
    return_token_cost_per_pool: Decimal,
    config: &RouterConfig,
) -> Result<RoutingResult, RouterError> {
    if swap_amount <= Decimal::ZERO {
        return Err(RouterError::InvalidAmount {
            amount: swap_amount,
        });
    }

    // Price every candidate; degenerate pools are skipped, not fatal
    let mut priced = Vec::with_capacity(path_data.paths.len());
    for path in &path_data.paths {
        let legs = match project_path(path, pools) {
            Ok(legs) => legs,
            Err(RouterError::Types(error)) => {
                warn!(%error, "skipping path with degenerate pool state");
                continue;
            }
            Err(error) => return Err(error),
        };
        if legs.len() > max_pools {
            continue;
        }
        match path_spot(&legs) {
            Ok(spot) => priced.push(PricedPath { legs, spot }),
            Err(error) => {
                warn!(%error, "skipping unpriceable path");
                continue;
            }
        }
    }
    if priced.is_empty() {
        return Ok(RoutingResult::empty());
    }
    priced.sort_by(|a, b| a.spot.cmp(&b.spot));

    let dust = swap_amount * config.convergence_epsilon;
    let mut best: Option<(RoutingResult, Decimal)> = None;

    for prefix_len in 1..=priced.len() {
        let prefix = &priced[..prefix_len];
        let distinct: HashSet<_> = prefix
            .iter()
            .flat_map(|path| path.legs.iter().map(|leg| &leg.pool_id))
            .collect();
        if distinct.len() > max_pools {
            // Prefixes are nested, so pool counts only grow from here
            break;
        }

        let Some(allocations) = solve_prefix(prefix, direction, swap_amount, config)? else {
            continue;
        };
        let result = build_result(prefix, &allocations, direction, dust)?;
        if !result.is_viable() {
            continue;
        }

        let pools_used = Decimal::from(result.distinct_pool_count() as u64);
        let cost = return_token_cost_per_pool * pools_used;
        let net = match direction {
            SwapDirection::ExactIn => result.total_return - cost,
            SwapDirection::ExactOut => result.total_return + cost,
        };

        let improves = match &best {
            None => true,
            Some((_, best_net)) => match direction {
                SwapDirection::ExactIn => net > *best_net,
                SwapDirection::ExactOut => net < *best_net,
            },
        };
        if improves {
            debug!(
                paths = prefix_len,
                pools = result.distinct_pool_count(),
                total_return = %result.total_return,
                net = %net,
                "new best allocation"
            );
            best = Some((result, net));
        }
    }

    Ok(best.map(|(result, _)| result).unwrap_or_default())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::discovery::PathData;
    use sor_types::{PoolId, PoolRecord, PoolToken, TokenAddress};

    fn addr(last_byte: u8) -> TokenAddress {
        TokenAddress::parse(&format!("0x{:040x}", last_byte)).unwrap()
    }

    fn pool_id(last_byte: u8) -> PoolId {
        PoolId::parse(&format!("0x{:040x}", 0xa0_u32 + last_byte as u32)).unwrap()
    }

    fn record(id: u8, holdings: &[(u8, Decimal)], fee: Decimal) -> PoolRecord {
        PoolRecord::new(
            pool_id(id),
            holdings
                .iter()
                .map(|(token, balance)| PoolToken::new(addr(*token), *balance, dec!(0.5), 18))
                .collect(),
            fee,
        )
    }

    fn setup(records: Vec<PoolRecord>, paths: Vec<Path>) -> (PoolMap, PathData) {
        let pool_map: PoolMap = records
            .into_iter()
            .map(|record| (record.id.clone(), record))
            .collect();
        (
            pool_map,
            PathData {
                token_in: addr(1),
                token_out: addr(2),
                paths,
            },
        )
    }

    #[test]
    fn test_single_pool_takes_full_amount() {
        let (pools, path_data) = setup(
            vec![record(1, &[(1, dec!(1000)), (2, dec!(1000))], dec!(0.003))],
            vec![Path::direct(pool_id(1), addr(1), addr(2))],
        );

        let result = find_best_swaps_multi(
            &pools,
            &path_data,
            SwapDirection::ExactIn,
            dec!(100),
            4,
            Decimal::ZERO,
            &RouterConfig::default(),
        )
        .unwrap();

        assert!(result.is_viable());
        assert_eq!(result.sequences.len(), 1);
        assert_eq!(result.sequences[0][0].swap_amount, dec!(100));
        assert!(result.total_return > Decimal::ZERO);
        assert!(result.total_return < dec!(100));
    }

    #[test]
    fn test_no_paths_returns_empty() {
        let (pools, path_data) = setup(vec![], vec![]);
        let result = find_best_swaps_multi(
            &pools,
            &path_data,
            SwapDirection::ExactIn,
            dec!(100),
            4,
            Decimal::ZERO,
            &RouterConfig::default(),
        )
        .unwrap();
        assert!(!result.is_viable());
    }

    #[test]
    fn test_invalid_amount_rejected() {
        let (pools, path_data) = setup(vec![], vec![]);
        let result = find_best_swaps_multi(
            &pools,
            &path_data,
            SwapDirection::ExactIn,
            Decimal::ZERO,
            4,
            Decimal::ZERO,
            &RouterConfig::default(),
        );
        assert!(matches!(result, Err(RouterError::InvalidAmount { .. })));
    }

    #[test]
    fn test_split_across_two_pools_equalizes_marginal_price() {
        // Pool 1 is four times deeper; a large trade should split with the
        // lion's share on the deep pool and near-equal final marginal prices
        let deep = record(1, &[(1, dec!(10000)), (2, dec!(10000))], dec!(0.003));
        let shallow = record(2, &[(1, dec!(2500)), (2, dec!(2500))], dec!(0.003));
        let (pools, path_data) = setup(
            vec![deep.clone(), shallow.clone()],
            vec![
                Path::direct(pool_id(1), addr(1), addr(2)),
                Path::direct(pool_id(2), addr(1), addr(2)),
            ],
        );

        let result = find_best_swaps_multi(
            &pools,
            &path_data,
            SwapDirection::ExactIn,
            dec!(2000),
            4,
            Decimal::ZERO,
            &RouterConfig::default(),
        )
        .unwrap();

        assert_eq!(result.sequences.len(), 2);
        let allocated: Decimal = result
            .sequences
            .iter()
            .map(|sequence| sequence[0].swap_amount)
            .sum();
        assert!((allocated - dec!(2000)).abs() < dec!(0.000001));

        let deep_allocation = result
            .sequences
            .iter()
            .find(|sequence| sequence[0].pool == pool_id(1))
            .unwrap()[0]
            .swap_amount;
        let shallow_allocation = dec!(2000) - deep_allocation;
        assert!(deep_allocation > shallow_allocation);

        // Marginal prices at the final allocations approximately match
        let deep_marginal = marginal_after(
            &[deep.pair_view(&addr(1), &addr(2)).unwrap()],
            deep_allocation,
            SwapDirection::ExactIn,
        )
        .unwrap();
        let shallow_marginal = marginal_after(
            &[shallow.pair_view(&addr(1), &addr(2)).unwrap()],
            shallow_allocation,
            SwapDirection::ExactIn,
        )
        .unwrap();
        let relative = ((deep_marginal - shallow_marginal) / deep_marginal).abs();
        assert!(
            relative < dec!(0.000001),
            "marginal prices diverge: {} vs {}",
            deep_marginal,
            shallow_marginal
        );
    }

    #[test]
    fn test_small_trade_stays_on_best_pool() {
        // A small trade never degrades the cheap pool past the expensive one
        let cheap = record(1, &[(1, dec!(10000)), (2, dec!(20000))], dec!(0.003));
        let expensive = record(2, &[(1, dec!(10000)), (2, dec!(10000))], dec!(0.003));
        let (pools, path_data) = setup(
            vec![cheap, expensive],
            vec![
                Path::direct(pool_id(1), addr(1), addr(2)),
                Path::direct(pool_id(2), addr(1), addr(2)),
            ],
        );

        let result = find_best_swaps_multi(
            &pools,
            &path_data,
            SwapDirection::ExactIn,
            dec!(10),
            4,
            Decimal::ZERO,
            &RouterConfig::default(),
        )
        .unwrap();

        assert_eq!(result.sequences.len(), 1);
        assert_eq!(result.sequences[0][0].pool, pool_id(1));
    }

    #[test]
    fn test_max_pools_cap_respected() {
        let records: Vec<PoolRecord> = (1..=4u8)
            .map(|id| {
                let depth = dec!(1000) * Decimal::from(id);
                record(id, &[(1, depth), (2, depth)], dec!(0.003))
            })
            .collect();
        let paths = (1..=4u8)
            .map(|id| Path::direct(pool_id(id), addr(1), addr(2)))
            .collect();
        let (pools, path_data) = setup(records, paths);

        let result = find_best_swaps_multi(
            &pools,
            &path_data,
            SwapDirection::ExactIn,
            dec!(5000),
            2,
            Decimal::ZERO,
            &RouterConfig::default(),
        )
        .unwrap();

        assert!(result.is_viable());
        assert!(result.distinct_pool_count() <= 2);
    }

    #[test]
    fn test_per_pool_cost_discourages_splitting() {
        let deep = record(1, &[(1, dec!(10000)), (2, dec!(10000))], dec!(0.003));
        let shallow = record(2, &[(1, dec!(1000)), (2, dec!(1000))], dec!(0.003));
        let (pools, path_data) = setup(
            vec![deep, shallow],
            vec![
                Path::direct(pool_id(1), addr(1), addr(2)),
                Path::direct(pool_id(2), addr(1), addr(2)),
            ],
        );

        // With no per-pool cost a 500 trade splits; a heavy cost forces it
        // onto the single deep pool
        let split = find_best_swaps_multi(
            &pools,
            &path_data,
            SwapDirection::ExactIn,
            dec!(500),
            4,
            Decimal::ZERO,
            &RouterConfig::default(),
        )
        .unwrap();
        assert_eq!(split.sequences.len(), 2);

        let merged = find_best_swaps_multi(
            &pools,
            &path_data,
            SwapDirection::ExactIn,
            dec!(500),
            4,
            dec!(50),
            &RouterConfig::default(),
        )
        .unwrap();
        assert_eq!(merged.sequences.len(), 1);
        assert_eq!(merged.sequences[0][0].pool, pool_id(1));
    }

    #[test]
    fn test_exact_out_direct() {
        let (pools, path_data) = setup(
            vec![record(1, &[(1, dec!(1000)), (2, dec!(1000))], Decimal::ZERO)],
            vec![Path::direct(pool_id(1), addr(1), addr(2))],
        );

        let result = find_best_swaps_multi(
            &pools,
            &path_data,
            SwapDirection::ExactOut,
            dec!(100),
            4,
            Decimal::ZERO,
            &RouterConfig::default(),
        )
        .unwrap();

        assert!(result.is_viable());
        assert_eq!(result.sequences[0][0].swap_amount, dec!(100));
        // in = 1000*100/900 rounded up
        assert!((result.total_return - dec!(111.111111111111111112)).abs() < dec!(0.000000000001));
    }

    #[test]
    fn test_exact_out_beyond_reserves_is_empty() {
        let (pools, path_data) = setup(
            vec![record(1, &[(1, dec!(1000)), (2, dec!(1000))], Decimal::ZERO)],
            vec![Path::direct(pool_id(1), addr(1), addr(2))],
        );

        let result = find_best_swaps_multi(
            &pools,
            &path_data,
            SwapDirection::ExactOut,
            dec!(1500),
            4,
            Decimal::ZERO,
            &RouterConfig::default(),
        )
        .unwrap();
        assert!(!result.is_viable());
    }

    #[test]
    fn test_exact_out_splits_when_one_pool_cannot_fill() {
        let (pools, path_data) = setup(
            vec![
                record(1, &[(1, dec!(1000)), (2, dec!(1000))], Decimal::ZERO),
                record(2, &[(1, dec!(1000)), (2, dec!(1000))], Decimal::ZERO),
            ],
            vec![
                Path::direct(pool_id(1), addr(1), addr(2)),
                Path::direct(pool_id(2), addr(1), addr(2)),
            ],
        );

        let result = find_best_swaps_multi(
            &pools,
            &path_data,
            SwapDirection::ExactOut,
            dec!(1500),
            4,
            Decimal::ZERO,
            &RouterConfig::default(),
        )
        .unwrap();

        assert!(result.is_viable());
        assert_eq!(result.sequences.len(), 2);
        let produced: Decimal = result
            .sequences
            .iter()
            .map(|sequence| sequence[0].swap_amount)
            .sum();
        assert!((produced - dec!(1500)).abs() < dec!(0.000001));
    }

    #[test]
    fn test_multihop_sequence_amounts_chain() {
        let (pools, _) = setup(
            vec![
                record(1, &[(1, dec!(1000)), (3, dec!(1000))], Decimal::ZERO),
                record(2, &[(3, dec!(1000)), (2, dec!(1000))], Decimal::ZERO),
            ],
            vec![],
        );
        let path_data = PathData {
            token_in: addr(1),
            token_out: addr(2),
            paths: vec![Path::through(
                pool_id(1),
                pool_id(2),
                addr(1),
                addr(3),
                addr(2),
            )],
        };

        let result = find_best_swaps_multi(
            &pools,
            &path_data,
            SwapDirection::ExactIn,
            dec!(100),
            4,
            Decimal::ZERO,
            &RouterConfig::default(),
        )
        .unwrap();

        assert_eq!(result.sequences.len(), 1);
        let sequence = &result.sequences[0];
        assert_eq!(sequence.len(), 2);
        assert_eq!(sequence[0].swap_amount, dec!(100));
        // Second leg carries the first leg's output: 1000*100/1100
        assert!((sequence[1].swap_amount - dec!(90.909090909090909090)).abs() < dec!(0.000001));
        // Final output compounds both hops
        assert!(result.total_return < sequence[1].swap_amount);
    }

    #[test]
    fn test_multihop_filtered_when_max_pools_one() {
        let (pools, _) = setup(
            vec![
                record(1, &[(1, dec!(1000)), (3, dec!(1000))], Decimal::ZERO),
                record(2, &[(3, dec!(1000)), (2, dec!(1000))], Decimal::ZERO),
                record(3, &[(1, dec!(100)), (2, dec!(100))], Decimal::ZERO),
            ],
            vec![],
        );
        let path_data = PathData {
            token_in: addr(1),
            token_out: addr(2),
            paths: vec![
                Path::through(pool_id(1), pool_id(2), addr(1), addr(3), addr(2)),
                Path::direct(pool_id(3), addr(1), addr(2)),
            ],
        };

        let result = find_best_swaps_multi(
            &pools,
            &path_data,
            SwapDirection::ExactIn,
            dec!(10),
            1,
            Decimal::ZERO,
            &RouterConfig::default(),
        )
        .unwrap();

        // The 2-hop path needs two pools; only the small direct pool fits
        assert_eq!(result.distinct_pool_count(), 1);
        assert_eq!(result.sequences[0][0].pool, pool_id(3));
    }
}
