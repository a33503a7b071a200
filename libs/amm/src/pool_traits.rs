//! Pool trait definitions for a unified pricing interface

use crate::error::MathError;
use crate::weighted_math::WeightedMath;
use rust_decimal::Decimal;
use sor_types::PairPool;

/// Unified pool interface for routing calculations
pub trait AmmPool {
    /// Calculate output amount for a given input
    fn amount_out(&self, amount_in: Decimal) -> Result<Decimal, MathError>;

    /// Calculate required input for a desired output
    fn amount_in(&self, amount_out: Decimal) -> Result<Decimal, MathError>;

    /// Instantaneous marginal price at current balances
    fn spot_price(&self) -> Result<Decimal, MathError>;

    /// Current pair reserves (in, out)
    fn liquidity(&self) -> (Decimal, Decimal);

    /// Swap fee as a fraction of trade value
    fn swap_fee(&self) -> Decimal;
}

impl AmmPool for PairPool {
    fn amount_out(&self, amount_in: Decimal) -> Result<Decimal, MathError> {
        WeightedMath::out_given_in(self, amount_in)
    }

    fn amount_in(&self, amount_out: Decimal) -> Result<Decimal, MathError> {
        WeightedMath::in_given_out(self, amount_out)
    }

    fn spot_price(&self) -> Result<Decimal, MathError> {
        WeightedMath::spot_price_of(self)
    }

    fn liquidity(&self) -> (Decimal, Decimal) {
        (self.balance_in, self.balance_out)
    }

    fn swap_fee(&self) -> Decimal {
        self.swap_fee
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sor_types::{PoolId, TokenAddress};

    #[test]
    fn test_trait_delegates_to_weighted_math() {
        let pool = PairPool {
            pool_id: PoolId::parse(&format!("0x{:040x}", 0xf2)).unwrap(),
            token_in: TokenAddress::parse(&format!("0x{:040x}", 1)).unwrap(),
            token_out: TokenAddress::parse(&format!("0x{:040x}", 2)).unwrap(),
            balance_in: dec!(1000),
            balance_out: dec!(2000),
            weight_in: dec!(0.5),
            weight_out: dec!(0.5),
            swap_fee: dec!(0.003),
        };

        let out = pool.amount_out(dec!(100)).unwrap();
        assert_eq!(out, WeightedMath::out_given_in(&pool, dec!(100)).unwrap());
        assert_eq!(pool.liquidity(), (dec!(1000), dec!(2000)));
        assert_eq!(pool.swap_fee(), dec!(0.003));
        assert!(pool.spot_price().unwrap() > dec!(0.5));
    }
}
