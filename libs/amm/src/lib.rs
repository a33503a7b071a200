//! # SOR AMM Library - Weighted-Pool Mathematics Engine
//!
//! ## Purpose
//!
//! Exact-arithmetic pricing for weighted constant-product pools. Implements
//! the closed-form spot price, out-given-in, and in-given-out formulas used
//! by the order router, together with the fixed-point kernels (ln, exp, pow)
//! needed for fractional weight ratios. All computation runs on
//! `rust_decimal::Decimal` with zero floating-point involvement so results
//! track the on-chain integer arithmetic they approximate.
//!
//! ## Integration Points
//!
//! - **Input Sources**: `PairPool` projections built by the routing layer
//!   from pool-list and balance data
//! - **Output Destinations**: Order router allocation loops, preview layer
//! - **Rounding Policy**: Outputs round down, required inputs round up, both
//!   at 18 decimal places; a reported output is never over-stated and a
//!   required input never under-stated
//!
//! ## Architecture Role
//!
//! The math layer is stateless and pure. It does not fetch, cache, or skip
//! pools; degenerate pool state is rejected by the pair projection upstream
//! and surfaces here only as a defensive domain error.

pub mod error;
pub mod pool_traits;
pub mod wad;
pub mod weighted_math;

pub use error::MathError;
pub use pool_traits::AmmPool;
pub use weighted_math::WeightedMath;

/// Common types for AMM calculations
pub use rust_decimal::Decimal;
pub use rust_decimal_macros::dec;
