//! Candidate path discovery
//!
//! Enumerates the ways a trade between two tokens can be executed: every
//! pool holding both tokens directly, plus 2-hop routes through a shared
//! intermediate token. Combinatorics are bounded by taking only the most
//! liquid pool per intermediate token on each leg and capping the number of
//! intermediates considered, ranked by liquidity depth. Requests for the
//! native asset are resolved to the wrapped token before any lookup.

use crate::config::RouterConfig;
use crate::error::RouterError;
use crate::registry::PoolRegistry;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sor_types::{NativeAliasTable, Path, PoolId, PoolRecord, TokenAddress, TokenSpec};
use std::collections::HashMap;
use tracing::debug;

/// Pools touched by a discovery pass, keyed by id
pub type PoolMap = HashMap<PoolId, PoolRecord>;

/// Candidate paths for one trade direction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathData {
    pub token_in: TokenAddress,
    pub token_out: TokenAddress,
    pub paths: Vec<Path>,
}

impl PathData {
    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }
}

/// Most liquid pool per intermediate token for one leg direction
fn best_pool_per_counterparty(
    pools: &[PoolRecord],
    fixed: &TokenAddress,
    fixed_is_input: bool,
) -> HashMap<TokenAddress, (PoolId, Decimal)> {
    let mut best: HashMap<TokenAddress, (PoolId, Decimal)> = HashMap::new();
    for record in pools {
        for token in &record.tokens {
            if token.address == *fixed {
                continue;
            }
            let liquidity = if fixed_is_input {
                record.normalized_liquidity(fixed, &token.address)
            } else {
                record.normalized_liquidity(&token.address, fixed)
            };
            let Some(liquidity) = liquidity else {
                continue;
            };
            match best.get(&token.address) {
                Some((_, current)) if *current >= liquidity => {}
                _ => {
                    best.insert(token.address.clone(), (record.id.clone(), liquidity));
                }
            }
        }
    }
    best
}

/// Discover candidate paths between two tokens
///
/// Returns the touched pool records and the path set. An empty path set is
/// the normal outcome when the pair has no liquidity; callers surface it as
/// an invalid preview, not an error.
pub fn find_path_data(
    registry: &PoolRegistry,
    aliases: &NativeAliasTable,
    token_in: &TokenSpec,
    token_out: &TokenSpec,
    config: &RouterConfig,
) -> Result<(PoolMap, PathData), RouterError> {
    let token_in = aliases.resolve(token_in);
    let token_out = aliases.resolve(token_out);
    if token_in == token_out {
        return Err(sor_types::TypesError::IdenticalTokens {
            token: token_in.to_string(),
        }
        .into());
    }

    let mut pool_map = PoolMap::new();
    let mut paths = Vec::new();

    // Direct paths: every pool tradable on the pair
    for record in registry.pools_with_tradable_pair(&token_in, &token_out) {
        paths.push(Path::direct(
            record.id.clone(),
            token_in.clone(),
            token_out.clone(),
        ));
        pool_map.insert(record.id.clone(), record);
    }
    let direct_count = paths.len();

    // 2-hop paths: token_in -> X on the most liquid first-leg pool, then
    // X -> token_out on the most liquid second-leg pool
    let first_leg_pools = registry.pools_with_token(&token_in);
    let second_leg_pools = registry.pools_with_token(&token_out);
    let first_leg = best_pool_per_counterparty(&first_leg_pools, &token_in, true);
    let second_leg = best_pool_per_counterparty(&second_leg_pools, &token_out, false);

    let mut intermediates: Vec<(&TokenAddress, Decimal)> = first_leg
        .iter()
        .filter(|(intermediate, _)| **intermediate != token_out)
        .filter_map(|(intermediate, (_, first_liquidity))| {
            let (_, second_liquidity) = second_leg.get(intermediate)?;
            // Depth of the route is limited by its shallower leg
            Some((intermediate, (*first_liquidity).min(*second_liquidity)))
        })
        .collect();
    intermediates.sort_by(|a, b| b.1.cmp(&a.1));
    intermediates.truncate(config.max_intermediate_tokens);

    for (intermediate, _) in intermediates {
        let (first_pool, _) = &first_leg[intermediate];
        let (second_pool, _) = &second_leg[intermediate];
        if first_pool == second_pool {
            // Same pool on both legs is never better than its direct path
            continue;
        }
        for pool_id in [first_pool, second_pool] {
            if !pool_map.contains_key(pool_id) {
                let record = registry
                    .get(pool_id)
                    .ok_or_else(|| RouterError::UnknownPool {
                        pool: pool_id.to_string(),
                    })?;
                pool_map.insert(pool_id.clone(), record);
            }
        }
        paths.push(Path::through(
            first_pool.clone(),
            second_pool.clone(),
            token_in.clone(),
            intermediate.clone(),
            token_out.clone(),
        ));
    }

    debug!(
        token_in = %token_in,
        token_out = %token_out,
        direct = direct_count,
        multihop = paths.len() - direct_count,
        "path discovery complete"
    );

    Ok((
        pool_map,
        PathData {
            token_in,
            token_out,
            paths,
        },
    ))
}
