//! Fixed-point kernels over `Decimal` with 18-decimal ("wad") conventions
//!
//! Conversions between wei-style integer amounts and decimal token units,
//! directional rounding at 18 decimal places, and the transcendental kernels
//! (`ln`, `exp`, `pow`) the weighted-pool formulas need for fractional
//! weight ratios.
//!
//! ## Approximation and error bound
//!
//! `ln` reduces its argument into [0.75, 1.5) by powers of two and sums the
//! artanh series `2 * (z + z^3/3 + z^5/5 + ...)` with `z = (a-1)/(a+1)`,
//! `|z| <= 0.2`. `exp` splits off the integer part (exact binary powers of
//! `e`) and sums the Taylor series for the fractional remainder. Both series
//! stop when the next term falls below 1e-28 or after 64 terms, whichever
//! comes first. Composed through `pow = exp(frac * ln(base))` the relative
//! error stays below 1e-24, comfortably inside the 18-decimal resolution the
//! pricing layer rounds to. Callers round results in the conservative
//! direction (`floor_wad` for outputs, `ceil_wad` for required inputs) so
//! the approximation error can never overstate an output or understate an
//! input.

use crate::error::MathError;
use rust_decimal::prelude::ToPrimitive;
use rust_decimal::{Decimal, RoundingStrategy};
use rust_decimal_macros::dec;
use std::str::FromStr;

/// Token amounts cross the boundary scaled to 18 decimal places
pub const WAD_DECIMALS: u32 = 18;

/// ln(2) to 28 significant digits
const LN2: Decimal = dec!(0.6931471805599453094172321215);
/// Euler's number to 28 significant digits
const EULER: Decimal = dec!(2.7182818284590452353602874714);

const TWO: Decimal = dec!(2);
/// Mantissa range after power-of-two reduction, keeps |z| <= 0.2
const REDUCTION_UPPER: Decimal = dec!(1.5);
const REDUCTION_LOWER: Decimal = dec!(0.75);

/// Series terms below this no longer move a 28-digit decimal
const SERIES_EPSILON: Decimal = dec!(0.0000000000000000000000000001);
const MAX_SERIES_TERMS: u32 = 64;

/// exp() overflows the decimal range just past e^66
const EXP_MAX_ARG: Decimal = dec!(66);
/// e^-65 is below decimal resolution, treated as zero
const EXP_MIN_ARG: Decimal = dec!(-65);

/// Weight ratios are small; anything beyond this is malformed input
const MAX_EXPONENT: Decimal = dec!(1000);

/// One wad (10^18) as a decimal
pub fn wad() -> Decimal {
    Decimal::from(1_000_000_000_000_000_000_u64)
}

/// Convert a wei-style integer amount to decimal token units
pub fn from_wei(raw: u128) -> Result<Decimal, MathError> {
    let raw = i128::try_from(raw).map_err(|_| MathError::Overflow { context: "from_wei" })?;
    Decimal::try_from_i128_with_scale(raw, WAD_DECIMALS)
        .map_err(|_| MathError::Overflow { context: "from_wei" })
}

/// Convert decimal token units to a wei-style integer, rounding down
pub fn to_wei_floor(value: Decimal) -> Result<u128, MathError> {
    if value.is_sign_negative() && !value.is_zero() {
        return Err(MathError::NonPositiveAmount { amount: value });
    }
    let scaled = value
        .checked_mul(wad())
        .ok_or(MathError::Overflow { context: "to_wei_floor" })?;
    scaled
        .trunc()
        .to_u128()
        .ok_or(MathError::Overflow { context: "to_wei_floor" })
}

/// Parse a human decimal string ("1.5", "0.000000000000000001")
pub fn parse_decimal(input: &str) -> Result<Decimal, MathError> {
    Decimal::from_str(input.trim()).map_err(|_| MathError::InvalidDecimal {
        input: input.to_string(),
    })
}

/// Round down at 18 decimal places (trader-favoring for outputs)
pub fn floor_wad(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(WAD_DECIMALS, RoundingStrategy::ToZero)
}

/// Round up at 18 decimal places (pool-favoring for required inputs)
pub fn ceil_wad(value: Decimal) -> Decimal {
    value.round_dp_with_strategy(WAD_DECIMALS, RoundingStrategy::AwayFromZero)
}

/// Integer power by binary exponentiation with overflow checks
pub fn powi(base: Decimal, mut exponent: u32) -> Result<Decimal, MathError> {
    let mut result = Decimal::ONE;
    let mut factor = base;
    while exponent > 0 {
        if exponent & 1 == 1 {
            result = result
                .checked_mul(factor)
                .ok_or(MathError::Overflow { context: "powi" })?;
        }
        exponent >>= 1;
        if exponent > 0 {
            factor = factor
                .checked_mul(factor)
                .ok_or(MathError::Overflow { context: "powi" })?;
        }
    }
    Ok(result)
}

/// Natural logarithm via power-of-two reduction and the artanh series
pub fn ln(value: Decimal) -> Result<Decimal, MathError> {
    if value <= Decimal::ZERO {
        return Err(MathError::LogDomain { argument: value });
    }

    let mut mantissa = value;
    let mut doublings: i64 = 0;
    while mantissa >= REDUCTION_UPPER {
        mantissa /= TWO;
        doublings += 1;
    }
    while mantissa < REDUCTION_LOWER {
        mantissa *= TWO;
        doublings -= 1;
    }

    let z = (mantissa - Decimal::ONE) / (mantissa + Decimal::ONE);
    let z_squared = z * z;
    let mut power = z;
    let mut sum = Decimal::ZERO;
    for k in 0..MAX_SERIES_TERMS {
        let term = power / Decimal::from(2 * k + 1);
        sum += term;
        if term.abs() < SERIES_EPSILON {
            break;
        }
        power *= z_squared;
    }

    Ok(TWO * sum + Decimal::from(doublings) * LN2)
}

/// Exponential via integer split and the Taylor series
pub fn exp(value: Decimal) -> Result<Decimal, MathError> {
    if value > EXP_MAX_ARG {
        return Err(MathError::Overflow { context: "exp" });
    }
    if value < EXP_MIN_ARG {
        // Below decimal resolution; the true value is positive but < 1e-28
        return Ok(Decimal::ZERO);
    }

    let whole = value.trunc();
    let fraction = value - whole;
    let magnitude = whole
        .abs()
        .to_u32()
        .ok_or(MathError::ExponentRange { exponent: value })?;
    let binary_power = powi(EULER, magnitude)?;
    let integer_part = if whole < Decimal::ZERO {
        Decimal::ONE / binary_power
    } else {
        binary_power
    };

    let mut term = Decimal::ONE;
    let mut sum = Decimal::ONE;
    for k in 1..=MAX_SERIES_TERMS {
        term = term * fraction / Decimal::from(k);
        sum += term;
        if term.abs() < SERIES_EPSILON {
            break;
        }
    }

    integer_part
        .checked_mul(sum)
        .ok_or(MathError::Overflow { context: "exp" })
}

/// General power for positive base: integer fast path plus `exp(f * ln(base))`
pub fn pow(base: Decimal, exponent: Decimal) -> Result<Decimal, MathError> {
    if base <= Decimal::ZERO {
        return Err(MathError::LogDomain { argument: base });
    }
    if exponent.is_zero() {
        return Ok(Decimal::ONE);
    }
    if exponent < Decimal::ZERO {
        let positive = pow(base, -exponent)?;
        if positive.is_zero() {
            return Err(MathError::Overflow { context: "pow" });
        }
        return Ok(Decimal::ONE / positive);
    }
    if exponent > MAX_EXPONENT {
        return Err(MathError::ExponentRange { exponent });
    }

    let whole = exponent.trunc();
    let fraction = exponent - whole;
    let whole_u32 = whole
        .to_u32()
        .ok_or(MathError::ExponentRange { exponent })?;

    let mut result = powi(base, whole_u32)?;
    if !fraction.is_zero() {
        let fractional = exp(fraction * ln(base)?)?;
        result = result
            .checked_mul(fractional)
            .ok_or(MathError::Overflow { context: "pow" })?;
    }
    Ok(result)
}
