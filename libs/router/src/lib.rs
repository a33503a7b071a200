//! # SOR Router - Smart Order Routing for Weighted AMM Pools
//!
//! ## Purpose
//!
//! The routing half of the SOR engine: turns a trade request into executable
//! swap instructions and UI-ready price figures. Discovers candidate paths
//! over an indexed pool registry, splits the trade across paths by
//! equalizing marginal prices, and wraps the result with slippage figures
//! and execution safety bounds under a latest-request-wins quoting session.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Pool snapshots loaded into [`PoolRegistry`] from
//!   upstream pool-list and balance retrieval (out of scope here)
//! - **Output Destinations**: UI store layer consuming [`SwapPreview`]
//! - **Math Engine**: `sor-amm` weighted-pool formulas, invoked per
//!   candidate allocation
//! - **Configuration**: [`RouterConfig`] with JSON file loading and
//!   environment overrides
//!
//! ## Architecture Role
//!
//! ```text
//! Trade request → [Path Discovery] → [Order Router] → [Preview & Bounds]
//!       ↓               ↓                  ↓                  ↓
//! Token pair      Direct + 2-hop     Marginal-price      Spot/effective
//! Trade size      candidates         equalization        price, slippage,
//! Direction       Liquidity ranking  Per-pool cost       min-out / max-in
//! ```
//!
//! All routing computation is synchronous and pure over its inputs; the only
//! asynchronous boundary (pool data retrieval) completes before a pass
//! begins. Stale previews are discarded by sequence comparison, not
//! cancellation.

pub mod config;
pub mod discovery;
pub mod error;
pub mod preview;
pub mod quoter;
pub mod registry;
pub mod router;

pub use config::RouterConfig;
pub use discovery::{find_path_data, PathData, PoolMap};
pub use error::RouterError;
pub use preview::{
    build_preview, calc_max_amount_in, calc_min_amount_out, ExactInPreview, ExactOutPreview,
    InvalidReason, SwapPreview,
};
pub use quoter::{RequestTicket, SwapQuoter, TradeRequest};
pub use registry::{PoolRegistry, RegistryStats};
pub use router::find_best_swaps_multi;

/// Spot price at the library boundary, re-exported from the math engine
pub use sor_amm::WeightedMath;
