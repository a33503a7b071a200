//! Candidate trade paths
//!
//! A path is one way to execute a trade between two tokens: a single pool
//! hop, or two hops through a shared intermediate token. Hop consistency is
//! checked at construction so downstream code can rely on the sequence being
//! connected head to tail.

use crate::error::TypesError;
use crate::pool::PoolId;
use crate::token::TokenAddress;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// One pool traversal within a path
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Hop {
    pub pool_id: PoolId,
    pub token_in: TokenAddress,
    pub token_out: TokenAddress,
}

impl Hop {
    pub fn new(pool_id: PoolId, token_in: TokenAddress, token_out: TokenAddress) -> Self {
        Self {
            pool_id,
            token_in,
            token_out,
        }
    }
}

/// A connected sequence of one or two hops
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Path {
    hops: SmallVec<[Hop; 2]>,
}

impl Path {
    /// Single-pool path
    pub fn direct(pool_id: PoolId, token_in: TokenAddress, token_out: TokenAddress) -> Self {
        Self {
            hops: SmallVec::from_vec(vec![Hop::new(pool_id, token_in, token_out)]),
        }
    }

    /// Two-hop path through an intermediate token
    pub fn through(
        first_pool: PoolId,
        second_pool: PoolId,
        token_in: TokenAddress,
        intermediate: TokenAddress,
        token_out: TokenAddress,
    ) -> Self {
        Self {
            hops: SmallVec::from_vec(vec![
                Hop::new(first_pool, token_in, intermediate.clone()),
                Hop::new(second_pool, intermediate, token_out),
            ]),
        }
    }

    /// Build from raw hops, enforcing the head-to-tail invariant
    pub fn new(hops: Vec<Hop>) -> Result<Self, TypesError> {
        if hops.is_empty() || hops.len() > 2 {
            return Err(TypesError::InvalidHopCount { count: hops.len() });
        }
        for window in hops.windows(2) {
            if window[0].token_out != window[1].token_in {
                return Err(TypesError::HopMismatch {
                    out: window[0].token_out.to_string(),
                    next_in: window[1].token_in.to_string(),
                });
            }
        }
        Ok(Self {
            hops: SmallVec::from_vec(hops),
        })
    }

    pub fn hops(&self) -> &[Hop] {
        &self.hops
    }

    pub fn token_in(&self) -> &TokenAddress {
        &self.hops[0].token_in
    }

    pub fn token_out(&self) -> &TokenAddress {
        &self.hops[self.hops.len() - 1].token_out
    }

    pub fn is_direct(&self) -> bool {
        self.hops.len() == 1
    }

    pub fn pool_ids(&self) -> impl Iterator<Item = &PoolId> {
        self.hops.iter().map(|hop| &hop.pool_id)
    }
}
