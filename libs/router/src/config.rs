//! Router configuration with file and environment overrides
//!
//! All tunable routing parameters live here so deployments can adjust them
//! without code changes: JSON file loading, environment variable overrides,
//! and validation with detailed error reporting.

use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use serde::{Deserialize, Serialize};

/// Complete configuration for the routing engine
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Maximum number of distinct pools a routing result may engage
    pub max_pools: usize,
    /// Fixed execution cost deducted per engaged pool, in return-token units
    pub return_token_cost_per_pool: Decimal,
    /// Cap on intermediate tokens considered for 2-hop paths
    pub max_intermediate_tokens: usize,
    /// Relative convergence threshold for the allocation bisections
    pub convergence_epsilon: Decimal,
    /// Iteration cap for the outer price-level bisection
    pub max_price_iterations: u32,
    /// Iteration cap for the per-path volume bisection
    pub max_volume_iterations: u32,
    /// Slippage tolerance applied when a request does not specify one (percent)
    pub default_slippage_tolerance_pct: Decimal,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            max_pools: 4,
            return_token_cost_per_pool: Decimal::ZERO,
            max_intermediate_tokens: 8,
            convergence_epsilon: dec!(0.000000000001), // 1e-12 relative
            max_price_iterations: 64,
            max_volume_iterations: 64,
            default_slippage_tolerance_pct: dec!(0.5),
        }
    }
}

impl RouterConfig {
    /// Load configuration from a JSON file
    pub fn from_file(path: &str) -> anyhow::Result<Self> {
        let contents = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&contents)?;
        Ok(config)
    }

    /// Load configuration from environment variables with defaults
    pub fn from_env() -> Self {
        let mut config = Self::default();

        if let Ok(max_pools) = std::env::var("SOR_MAX_POOLS") {
            if let Ok(value) = max_pools.parse::<usize>() {
                config.max_pools = value;
            }
        }

        if let Ok(cost) = std::env::var("SOR_RETURN_TOKEN_COST_PER_POOL") {
            if let Ok(value) = cost.parse::<Decimal>() {
                config.return_token_cost_per_pool = value;
            }
        }

        if let Ok(intermediates) = std::env::var("SOR_MAX_INTERMEDIATE_TOKENS") {
            if let Ok(value) = intermediates.parse::<usize>() {
                config.max_intermediate_tokens = value;
            }
        }

        if let Ok(tolerance) = std::env::var("SOR_SLIPPAGE_TOLERANCE_PCT") {
            if let Ok(value) = tolerance.parse::<Decimal>() {
                config.default_slippage_tolerance_pct = value;
            }
        }

        config
    }

    /// Save configuration to a JSON file
    pub fn save_to_file(&self, path: &str) -> anyhow::Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Validate configuration parameters
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.max_pools == 0 {
            anyhow::bail!("max_pools must be positive");
        }

        if self.return_token_cost_per_pool < Decimal::ZERO {
            anyhow::bail!("return_token_cost_per_pool must be non-negative");
        }

        if self.convergence_epsilon <= Decimal::ZERO || self.convergence_epsilon >= Decimal::ONE {
            anyhow::bail!("convergence_epsilon must be in (0, 1)");
        }

        if self.max_price_iterations < 8 || self.max_volume_iterations < 8 {
            anyhow::bail!("iteration caps must be at least 8");
        }

        if self.default_slippage_tolerance_pct < Decimal::ZERO
            || self.default_slippage_tolerance_pct > dec!(100)
        {
            anyhow::bail!("default_slippage_tolerance_pct must be in [0, 100]");
        }

        Ok(())
    }
}
