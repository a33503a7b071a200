//! Pool Registry
//!
//! Indexed store of the pool snapshots a routing pass runs against. Loaded
//! wholesale from pool-list and balance data before a pass begins; malformed
//! records are skipped with a warning rather than failing the load, so one
//! bad upstream entry cannot take down routing for every pair.

use dashmap::DashMap;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use sor_types::{PoolId, PoolRecord, TokenAddress};
use std::collections::HashSet;
use tracing::{debug, warn};

/// Registry load statistics
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct RegistryStats {
    pub total_pools: usize,
    pub total_tokens: usize,
    pub skipped_records: usize,
    pub load_generation: u64,
}

/// Indexed pool store shared by discovery and the quoting session
pub struct PoolRegistry {
    /// All pools indexed by id
    pools: DashMap<PoolId, PoolRecord>,

    /// Token index: token address -> pool ids holding it
    token_index: DashMap<TokenAddress, Vec<PoolId>>,
    /// Token pair index: ordered (a, b) -> pool ids holding both
    pair_index: DashMap<(TokenAddress, TokenAddress), Vec<PoolId>>,

    stats: RwLock<RegistryStats>,
}

impl Default for PoolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl PoolRegistry {
    pub fn new() -> Self {
        Self {
            pools: DashMap::new(),
            token_index: DashMap::new(),
            pair_index: DashMap::new(),
            stats: RwLock::new(RegistryStats::default()),
        }
    }

    /// Replace the registry contents with a fresh snapshot
    ///
    /// Records failing validation are skipped and logged. Returns the number
    /// of records accepted.
    pub fn load(&self, records: Vec<PoolRecord>) -> usize {
        self.pools.clear();
        self.token_index.clear();
        self.pair_index.clear();

        let mut accepted = 0;
        let mut skipped = 0;
        let mut tokens = HashSet::new();

        for record in records {
            if let Err(error) = record.validate() {
                warn!(pool = %record.id, %error, "skipping malformed pool record");
                skipped += 1;
                continue;
            }

            for token in &record.tokens {
                tokens.insert(token.address.clone());
                self.token_index
                    .entry(token.address.clone())
                    .or_default()
                    .push(record.id.clone());
            }
            for (first_index, first) in record.tokens.iter().enumerate() {
                for second in &record.tokens[first_index + 1..] {
                    let key = ordered_pair(&first.address, &second.address);
                    self.pair_index
                        .entry(key)
                        .or_default()
                        .push(record.id.clone());
                }
            }

            self.pools.insert(record.id.clone(), record);
            accepted += 1;
        }

        let mut stats = self.stats.write();
        stats.total_pools = accepted;
        stats.total_tokens = tokens.len();
        stats.skipped_records = skipped;
        stats.load_generation += 1;

        debug!(
            pools = accepted,
            tokens = stats.total_tokens,
            skipped, "pool registry loaded"
        );
        accepted
    }

    /// Whether any pool data has been loaded yet
    pub fn is_ready(&self) -> bool {
        self.stats.read().load_generation > 0
    }

    pub fn len(&self) -> usize {
        self.pools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.pools.is_empty()
    }

    pub fn stats(&self) -> RegistryStats {
        self.stats.read().clone()
    }

    pub fn get(&self, id: &PoolId) -> Option<PoolRecord> {
        self.pools.get(id).map(|entry| entry.value().clone())
    }

    /// Pools holding `token` with any counterparty
    pub fn pools_with_token(&self, token: &TokenAddress) -> Vec<PoolRecord> {
        self.token_index
            .get(token)
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.get(id))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
    }

    /// Pools able to price a swap between the two tokens right now
    pub fn pools_with_tradable_pair(
        &self,
        token_in: &TokenAddress,
        token_out: &TokenAddress,
    ) -> Vec<PoolRecord> {
        self.pair_index
            .get(&ordered_pair(token_in, token_out))
            .map(|ids| {
                ids.iter()
                    .filter_map(|id| self.get(id))
                    .filter(|record| record.holds_tradable_pair(token_in, token_out))
                    .collect::<Vec<_>>()
            })
            .unwrap_or_default()
    }
}

fn ordered_pair(a: &TokenAddress, b: &TokenAddress) -> (TokenAddress, TokenAddress) {
    if a <= b {
        (a.clone(), b.clone())
    } else {
        (b.clone(), a.clone())
    }
}
