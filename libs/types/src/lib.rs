//! # SOR Types - Domain Model for Weighted-AMM Order Routing
//!
//! ## Purpose
//!
//! Shared type system for the SOR routing engine. Defines the value types that
//! cross the library boundary: token identities (including the native-asset
//! alias), immutable pool snapshots and their per-pair projections, candidate
//! trade paths, and the swap instructions a routing pass produces.
//!
//! ## Integration Points
//!
//! - **Input Sources**: Pool-list and balance data fetched upstream and loaded
//!   into `PoolRecord` snapshots (network retrieval is out of scope)
//! - **Output Destinations**: Pricing math (`sor-amm`) consumes `PairPool`,
//!   the router (`sor-router`) consumes `Path` and produces `RoutingResult`
//! - **Precision**: All balances, weights, and fees are `rust_decimal::Decimal`
//!   scaled to 18 decimal places; no floating point anywhere in this crate
//!
//! ## Architecture Role
//!
//! ```text
//! Pool-list data → [PoolRecord] → [PairPool projection] → Pricing / Routing
//!       ↓               ↓                ↓                       ↓
//! Raw balances    Validated snapshot  Pair-scoped view    SwapInstruction
//! Native decimals 18-decimal scaling  Degenerate checks   RoutingResult
//! ```

pub mod error;
pub mod path;
pub mod pool;
pub mod swap;
pub mod token;

pub use error::TypesError;
pub use path::{Hop, Path};
pub use pool::{PairPool, PoolId, PoolRecord, PoolToken};
pub use swap::{RoutingResult, SwapDirection, SwapInstruction};
pub use token::{NativeAliasTable, TokenAddress, TokenSpec};
