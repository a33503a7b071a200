//! Pool snapshots and pair projections
//!
//! A `PoolRecord` is one liquidity pool's state as loaded from pool-list and
//! balance data: the full token set with balances normalized to 18 decimal
//! places, denormalized weights, and the swap fee. Records are constructed
//! fresh for every pricing pass and never mutated.
//!
//! Pricing math operates on a `PairPool`, the projection of one record onto a
//! single (token in, token out) direction. Projection is where degenerate
//! state (zero balance or weight on either side) is rejected, so the math
//! layer never has to special-case it.

use crate::error::TypesError;
use crate::token::TokenAddress;
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Balances are carried at 18 decimal places regardless of native precision
pub const BALANCE_DECIMALS: u32 = 18;

/// Unique pool identifier (address-like, normalized to lowercase hex)
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct PoolId(String);

impl PoolId {
    pub fn parse(input: &str) -> Result<Self, TypesError> {
        let normalized = TokenAddress::parse(input)?;
        Ok(Self(normalized.as_str().to_string()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PoolId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl FromStr for PoolId {
    type Err = TypesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl TryFrom<String> for PoolId {
    type Error = TypesError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<PoolId> for String {
    fn from(value: PoolId) -> Self {
        value.0
    }
}

/// One token held by a pool
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolToken {
    pub address: TokenAddress,
    /// Reserve balance in token units, scaled to 18 decimal places
    pub balance: Decimal,
    /// Denormalized weight as given by the pool
    pub weight: Decimal,
    /// Native decimal count of the token (kept for boundary conversions)
    pub decimals: u32,
}

impl PoolToken {
    /// Build from a balance already expressed in token units
    pub fn new(address: TokenAddress, balance: Decimal, weight: Decimal, decimals: u32) -> Self {
        let balance = balance.round_dp_with_strategy(BALANCE_DECIMALS, RoundingStrategy::ToZero);
        Self {
            address,
            balance,
            weight,
            decimals,
        }
    }

    /// Build from a raw balance in the token's smallest units
    ///
    /// A 6-decimal token with raw balance 5_000_000 becomes 5.0 token units.
    pub fn from_raw_units(
        address: TokenAddress,
        raw: u128,
        decimals: u32,
        weight: Decimal,
    ) -> Result<Self, TypesError> {
        if decimals > 28 {
            return Err(TypesError::UnsupportedDecimals {
                token: address.to_string(),
                decimals,
            });
        }
        let raw = i128::try_from(raw).map_err(|_| TypesError::BalanceOverflow {
            token: address.to_string(),
        })?;
        let balance = Decimal::try_from_i128_with_scale(raw, decimals).map_err(|_| {
            TypesError::BalanceOverflow {
                token: address.to_string(),
            }
        })?;
        Ok(Self::new(address, balance, weight, decimals))
    }

    /// Usable for pricing: positive balance and positive weight
    pub fn is_tradable(&self) -> bool {
        self.balance > Decimal::ZERO && self.weight > Decimal::ZERO
    }
}

/// Immutable snapshot of one pool for a single pricing pass
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolRecord {
    pub id: PoolId,
    pub tokens: Vec<PoolToken>,
    /// Fraction of trade value retained by the pool, in [0, 1)
    pub swap_fee: Decimal,
}

impl PoolRecord {
    pub fn new(id: PoolId, tokens: Vec<PoolToken>, swap_fee: Decimal) -> Self {
        Self {
            id,
            tokens,
            swap_fee,
        }
    }

    /// Structural validation of a freshly loaded record
    ///
    /// Negative balances or weights indicate malformed upstream data and fail
    /// here; zero balances pass (the pool is simply not tradable on that
    /// token and is excluded during discovery).
    pub fn validate(&self) -> Result<(), TypesError> {
        if self.swap_fee < Decimal::ZERO || self.swap_fee >= Decimal::ONE {
            return Err(TypesError::InvalidFee {
                pool: self.id.to_string(),
                fee: self.swap_fee.to_string(),
            });
        }
        if self.tokens.len() < 2 {
            return Err(TypesError::TooFewTokens {
                pool: self.id.to_string(),
                count: self.tokens.len(),
            });
        }
        for (index, token) in self.tokens.iter().enumerate() {
            if self.tokens[..index]
                .iter()
                .any(|other| other.address == token.address)
            {
                return Err(TypesError::DuplicateToken {
                    pool: self.id.to_string(),
                    token: token.address.to_string(),
                });
            }
            if token.balance < Decimal::ZERO {
                return Err(TypesError::DegeneratePool {
                    pool: self.id.to_string(),
                    token: token.address.to_string(),
                    field: "balance",
                });
            }
            if token.weight < Decimal::ZERO {
                return Err(TypesError::DegeneratePool {
                    pool: self.id.to_string(),
                    token: token.address.to_string(),
                    field: "weight",
                });
            }
        }
        Ok(())
    }

    pub fn token(&self, address: &TokenAddress) -> Option<&PoolToken> {
        self.tokens.iter().find(|token| token.address == *address)
    }

    /// Whether this pool can price a swap between the two tokens
    pub fn holds_tradable_pair(&self, token_in: &TokenAddress, token_out: &TokenAddress) -> bool {
        token_in != token_out
            && self.token(token_in).is_some_and(PoolToken::is_tradable)
            && self.token(token_out).is_some_and(PoolToken::is_tradable)
    }

    /// Liquidity depth of this pool for the pair, used to rank hop candidates
    ///
    /// Defined as `balance_out * weight_in / (weight_in + weight_out)`, the
    /// output-side depth discounted by how much of the pool's value backs the
    /// input side. `None` when the pair is not tradable here.
    pub fn normalized_liquidity(
        &self,
        token_in: &TokenAddress,
        token_out: &TokenAddress,
    ) -> Option<Decimal> {
        if !self.holds_tradable_pair(token_in, token_out) {
            return None;
        }
        let tin = self.token(token_in)?;
        let tout = self.token(token_out)?;
        let weight_sum = tin.weight + tout.weight;
        if weight_sum <= Decimal::ZERO {
            return None;
        }
        Some(tout.balance * tin.weight / weight_sum)
    }

    /// Project this record onto a single swap direction
    pub fn pair_view(
        &self,
        token_in: &TokenAddress,
        token_out: &TokenAddress,
    ) -> Result<PairPool, TypesError> {
        if token_in == token_out {
            return Err(TypesError::IdenticalTokens {
                token: token_in.to_string(),
            });
        }
        let tin = self
            .token(token_in)
            .ok_or_else(|| TypesError::UnknownToken {
                pool: self.id.to_string(),
                token: token_in.to_string(),
            })?;
        let tout = self
            .token(token_out)
            .ok_or_else(|| TypesError::UnknownToken {
                pool: self.id.to_string(),
                token: token_out.to_string(),
            })?;

        for (token, side) in [(tin, "in"), (tout, "out")] {
            if token.balance <= Decimal::ZERO {
                return Err(TypesError::DegeneratePool {
                    pool: self.id.to_string(),
                    token: token.address.to_string(),
                    field: if side == "in" {
                        "balance_in"
                    } else {
                        "balance_out"
                    },
                });
            }
            if token.weight <= Decimal::ZERO {
                return Err(TypesError::DegeneratePool {
                    pool: self.id.to_string(),
                    token: token.address.to_string(),
                    field: if side == "in" { "weight_in" } else { "weight_out" },
                });
            }
        }

        Ok(PairPool {
            pool_id: self.id.clone(),
            token_in: token_in.clone(),
            token_out: token_out.clone(),
            balance_in: tin.balance,
            balance_out: tout.balance,
            weight_in: tin.weight,
            weight_out: tout.weight,
            swap_fee: self.swap_fee,
        })
    }
}

/// One pool projected onto a single (token in, token out) direction
///
/// This is the unit the pricing math operates on. Constructed fresh from a
/// `PoolRecord` for every pricing pass and discarded afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PairPool {
    pub pool_id: PoolId,
    pub token_in: TokenAddress,
    pub token_out: TokenAddress,
    pub balance_in: Decimal,
    pub balance_out: Decimal,
    pub weight_in: Decimal,
    pub weight_out: Decimal,
    pub swap_fee: Decimal,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn addr(last_byte: u8) -> TokenAddress {
        TokenAddress::parse(&format!("0x{:040x}", last_byte)).unwrap()
    }

    fn pool_id(last_byte: u8) -> PoolId {
        PoolId::parse(&format!("0x{:040x}", 0xa0_u32 + last_byte as u32)).unwrap()
    }

    fn two_token_record() -> PoolRecord {
        PoolRecord::new(
            pool_id(1),
            vec![
                PoolToken::new(addr(1), dec!(1000), dec!(0.5), 18),
                PoolToken::new(addr(2), dec!(2000), dec!(0.5), 6),
            ],
            dec!(0.003),
        )
    }

    #[test]
    fn test_validate_accepts_well_formed_record() {
        assert!(two_token_record().validate().is_ok());
    }

    #[test]
    fn test_validate_rejects_bad_fee_and_duplicates() {
        let mut record = two_token_record();
        record.swap_fee = dec!(1);
        assert!(matches!(
            record.validate(),
            Err(TypesError::InvalidFee { .. })
        ));

        let mut record = two_token_record();
        record.tokens[1].address = record.tokens[0].address.clone();
        assert!(matches!(
            record.validate(),
            Err(TypesError::DuplicateToken { .. })
        ));
    }

    #[test]
    fn test_raw_unit_scaling() {
        let token = PoolToken::from_raw_units(addr(3), 5_000_000, 6, dec!(0.5)).unwrap();
        assert_eq!(token.balance, dec!(5));

        let token =
            PoolToken::from_raw_units(addr(4), 1_500_000_000_000_000_000, 18, dec!(0.5)).unwrap();
        assert_eq!(token.balance, dec!(1.5));
    }

    #[test]
    fn test_pair_view_projects_direction() {
        let record = two_token_record();
        let view = record.pair_view(&addr(1), &addr(2)).unwrap();

        assert_eq!(view.balance_in, dec!(1000));
        assert_eq!(view.balance_out, dec!(2000));
        assert_eq!(view.swap_fee, dec!(0.003));

        let reverse = record.pair_view(&addr(2), &addr(1)).unwrap();
        assert_eq!(reverse.balance_in, dec!(2000));
        assert_eq!(reverse.balance_out, dec!(1000));
    }

    #[test]
    fn test_pair_view_rejects_degenerate_state() {
        let mut record = two_token_record();
        record.tokens[0].balance = Decimal::ZERO;
        assert!(matches!(
            record.pair_view(&addr(1), &addr(2)),
            Err(TypesError::DegeneratePool { .. })
        ));

        let mut record = two_token_record();
        record.tokens[1].weight = Decimal::ZERO;
        assert!(matches!(
            record.pair_view(&addr(1), &addr(2)),
            Err(TypesError::DegeneratePool { .. })
        ));

        assert!(matches!(
            two_token_record().pair_view(&addr(1), &addr(9)),
            Err(TypesError::UnknownToken { .. })
        ));
    }

    #[test]
    fn test_normalized_liquidity_ranks_depth() {
        let deep = two_token_record();
        let mut shallow = two_token_record();
        shallow.tokens[1].balance = dec!(200);

        let deep_liquidity = deep.normalized_liquidity(&addr(1), &addr(2)).unwrap();
        let shallow_liquidity = shallow.normalized_liquidity(&addr(1), &addr(2)).unwrap();

        assert!(deep_liquidity > shallow_liquidity);
        // 2000 * 0.5 / 1.0
        assert_eq!(deep_liquidity, dec!(1000));
    }

    #[test]
    fn test_zero_balance_pair_not_tradable() {
        let mut record = two_token_record();
        record.tokens[0].balance = Decimal::ZERO;
        assert!(!record.holds_tradable_pair(&addr(1), &addr(2)));
        assert!(record.normalized_liquidity(&addr(1), &addr(2)).is_none());
    }
}
