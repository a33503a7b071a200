//! Weighted constant-product pool math with exact calculations
//!
//! Closed forms for the invariant `balance_in^weight_in *
//! balance_out^weight_out = constant`. Preserves full precision using the
//! Decimal type; outputs round down and required inputs round up at 18
//! decimal places so quoted figures are always executable.

use crate::error::MathError;
use crate::wad;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;
use sor_types::PairPool;

/// Smallest attenuation factor the pow kernel can resolve
///
/// Keeps `out_given_in` strictly below the output reserve even when the
/// fractional power underflows to zero for astronomically large inputs.
const MIN_ATTENUATION: Decimal = dec!(0.0000000000000000000000000001);

/// Weighted-pool math functions with zero precision loss
pub struct WeightedMath;

impl WeightedMath {
    /// Instantaneous marginal price of token out in terms of token in
    ///
    /// `(balance_in / weight_in) / (balance_out / weight_out) / (1 - fee)`.
    /// Strictly positive whenever both balances and weights are; zero or
    /// negative values on either side are a domain error the caller must
    /// not have let through.
    pub fn spot_price(
        balance_in: Decimal,
        weight_in: Decimal,
        balance_out: Decimal,
        weight_out: Decimal,
        swap_fee: Decimal,
    ) -> Result<Decimal, MathError> {
        if balance_in <= Decimal::ZERO
            || weight_in <= Decimal::ZERO
            || balance_out <= Decimal::ZERO
            || weight_out <= Decimal::ZERO
        {
            return Err(MathError::DegenerateState);
        }
        if swap_fee < Decimal::ZERO || swap_fee >= Decimal::ONE {
            return Err(MathError::InvalidFee { fee: swap_fee });
        }

        let numerator = balance_in / weight_in;
        let denominator = balance_out / weight_out;
        Ok(numerator / denominator / (Decimal::ONE - swap_fee))
    }

    /// Spot price of a pair projection at its current balances
    pub fn spot_price_of(pool: &PairPool) -> Result<Decimal, MathError> {
        Self::spot_price(
            pool.balance_in,
            pool.weight_in,
            pool.balance_out,
            pool.weight_out,
            pool.swap_fee,
        )
    }

    /// Exact output for a given input, net of the swap fee
    ///
    /// `balance_out * (1 - (balance_in / (balance_in + amount_in * (1 -
    /// fee)))^(weight_in / weight_out))`, floored at 18 decimals.
    /// Monotonically increasing in the input and strictly below
    /// `balance_out` for any finite input.
    pub fn out_given_in(pool: &PairPool, amount_in: Decimal) -> Result<Decimal, MathError> {
        if amount_in <= Decimal::ZERO {
            return Err(MathError::NonPositiveAmount { amount: amount_in });
        }
        Self::validate_pool(pool)?;

        let effective_in = amount_in * (Decimal::ONE - pool.swap_fee);
        let denominator = pool
            .balance_in
            .checked_add(effective_in)
            .ok_or(MathError::Overflow { context: "out_given_in" })?;
        let ratio = pool.balance_in / denominator;
        let exponent = pool.weight_in / pool.weight_out;
        let attenuation = wad::pow(ratio, exponent)?.max(MIN_ATTENUATION);

        Ok(wad::floor_wad(
            pool.balance_out * (Decimal::ONE - attenuation),
        ))
    }

    /// Exact input required for a given output, gross of the swap fee
    ///
    /// Inverse of `out_given_in`, ceiled at 18 decimals. Requesting the
    /// whole reserve (or more) is an insufficient-liquidity error.
    pub fn in_given_out(pool: &PairPool, amount_out: Decimal) -> Result<Decimal, MathError> {
        if amount_out <= Decimal::ZERO {
            return Err(MathError::NonPositiveAmount { amount: amount_out });
        }
        Self::validate_pool(pool)?;
        if amount_out >= pool.balance_out {
            return Err(MathError::InsufficientLiquidity {
                requested: amount_out,
                available: pool.balance_out,
            });
        }

        let ratio = pool.balance_out / (pool.balance_out - amount_out);
        let exponent = pool.weight_out / pool.weight_in;
        let grossed = wad::pow(ratio, exponent)? - Decimal::ONE;
        let before_fee = pool
            .balance_in
            .checked_mul(grossed)
            .ok_or(MathError::Overflow { context: "in_given_out" })?;

        Ok(wad::ceil_wad(before_fee / (Decimal::ONE - pool.swap_fee)))
    }

    /// Marginal spot price after an exact-in trade of `amount_in`
    ///
    /// Prices the pool at the post-trade balances. Used by the router to
    /// equalize marginal prices across the paths it allocates to.
    pub fn spot_price_after_in(pool: &PairPool, amount_in: Decimal) -> Result<Decimal, MathError> {
        if amount_in.is_zero() {
            return Self::spot_price_of(pool);
        }
        let amount_out = Self::out_given_in(pool, amount_in)?;
        Self::spot_price(
            pool.balance_in + amount_in,
            pool.weight_in,
            pool.balance_out - amount_out,
            pool.weight_out,
            pool.swap_fee,
        )
    }

    /// Marginal spot price after an exact-out trade of `amount_out`
    pub fn spot_price_after_out(
        pool: &PairPool,
        amount_out: Decimal,
    ) -> Result<Decimal, MathError> {
        if amount_out.is_zero() {
            return Self::spot_price_of(pool);
        }
        let amount_in = Self::in_given_out(pool, amount_out)?;
        Self::spot_price(
            pool.balance_in + amount_in,
            pool.weight_in,
            pool.balance_out - amount_out,
            pool.weight_out,
            pool.swap_fee,
        )
    }

    fn validate_pool(pool: &PairPool) -> Result<(), MathError> {
        if pool.balance_in <= Decimal::ZERO
            || pool.balance_out <= Decimal::ZERO
            || pool.weight_in <= Decimal::ZERO
            || pool.weight_out <= Decimal::ZERO
        {
            return Err(MathError::DegenerateState);
        }
        if pool.swap_fee < Decimal::ZERO || pool.swap_fee >= Decimal::ONE {
            return Err(MathError::InvalidFee { fee: pool.swap_fee });
        }
        Ok(())
    }
}
