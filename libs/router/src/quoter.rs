//! Quoting session with latest-request-wins semantics
//!
//! The UI fires a preview request on every input change. Requests are
//! stamped with a monotonically increasing sequence when they begin;
//! completed previews are accepted only if no newer request has begun in
//! the meantime. Stale results are discarded by comparison, never by
//! cancellation, so a slow computation can never overwrite a fresher one.
//! All inputs are passed explicitly; the session holds no ambient mutable
//! trade state.

use crate::config::RouterConfig;
use crate::discovery::find_path_data;
use crate::error::RouterError;
use crate::preview::{build_preview, InvalidReason, SwapPreview};
use crate::registry::PoolRegistry;
use crate::router::find_best_swaps_multi;
use parking_lot::RwLock;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sor_types::{NativeAliasTable, SwapDirection, TokenSpec};
use std::sync::Arc;
use tracing::debug;

/// One trade request as entered at the boundary
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TradeRequest {
    pub token_in: TokenSpec,
    pub token_out: TokenSpec,
    pub direction: SwapDirection,
    /// Fixed-side amount: input for exact-in, output for exact-out
    pub amount: Decimal,
    /// Overrides the configured default slippage tolerance when set
    pub slippage_tolerance_pct: Option<Decimal>,
}

/// Stamp tying a preview computation to the request that triggered it
#[derive(Debug, Clone)]
pub struct RequestTicket {
    sequence: u64,
    request: TradeRequest,
}

impl RequestTicket {
    pub fn request(&self) -> &TradeRequest {
        &self.request
    }
}

/// Orchestrates the preview pipeline for a trading session
pub struct SwapQuoter {
    registry: Arc<PoolRegistry>,
    aliases: NativeAliasTable,
    config: RouterConfig,
    current_sequence: RwLock<u64>,
}

impl SwapQuoter {
    pub fn new(registry: Arc<PoolRegistry>, aliases: NativeAliasTable, config: RouterConfig) -> Self {
        Self {
            registry,
            aliases,
            config,
            current_sequence: RwLock::new(0),
        }
    }

    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Register a new request, superseding any in flight
    pub fn begin(&self, request: TradeRequest) -> RequestTicket {
        let mut current = self.current_sequence.write();
        *current += 1;
        debug!(sequence = *current, "new preview request");
        RequestTicket {
            sequence: *current,
            request,
        }
    }

    /// Whether this ticket still reflects the latest request
    pub fn is_current(&self, ticket: &RequestTicket) -> bool {
        *self.current_sequence.read() == ticket.sequence
    }

    /// Run the full preview pipeline for a ticket
    ///
    /// Discovery, routing, and figures. The result may already be stale by
    /// the time it returns; callers gate on `accept`.
    pub fn preview(&self, ticket: &RequestTicket) -> Result<SwapPreview, RouterError> {
        let request = &ticket.request;
        if request.amount <= Decimal::ZERO {
            return Err(RouterError::InvalidAmount {
                amount: request.amount,
            });
        }
        if !self.registry.is_ready() {
            return Ok(SwapPreview::invalid(InvalidReason::AwaitingPoolData));
        }

        let (pool_map, path_data) = find_path_data(
            &self.registry,
            &self.aliases,
            &request.token_in,
            &request.token_out,
            &self.config,
        )?;
        if path_data.is_empty() {
            return Ok(SwapPreview::invalid(InvalidReason::NoPools));
        }

        let result = find_best_swaps_multi(
            &pool_map,
            &path_data,
            request.direction,
            request.amount,
            self.config.max_pools,
            self.config.return_token_cost_per_pool,
            &self.config,
        )?;

        let tolerance = request
            .slippage_tolerance_pct
            .unwrap_or(self.config.default_slippage_tolerance_pct);
        build_preview(
            &pool_map,
            request.direction,
            request.amount,
            result,
            tolerance,
        )
    }

    /// Accept a completed preview, or reject it as stale
    pub fn accept(
        &self,
        ticket: &RequestTicket,
        preview: SwapPreview,
    ) -> Result<SwapPreview, RouterError> {
        if !self.is_current(ticket) {
            return Err(RouterError::StaleInput);
        }
        Ok(preview)
    }

    /// Convenience: begin, compute, and accept in one call
    pub fn quote(&self, request: TradeRequest) -> Result<SwapPreview, RouterError> {
        let ticket = self.begin(request);
        let preview = self.preview(&ticket)?;
        self.accept(&ticket, preview)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;
    use sor_types::{PoolId, PoolRecord, PoolToken, TokenAddress};

    fn addr(last_byte: u8) -> TokenAddress {
        TokenAddress::parse(&format!("0x{:040x}", last_byte)).unwrap()
    }

    fn quoter_with_pool() -> SwapQuoter {
        let registry = Arc::new(PoolRegistry::new());
        registry.load(vec![PoolRecord::new(
            PoolId::parse(&format!("0x{:040x}", 0x80)).unwrap(),
            vec![
                PoolToken::new(addr(1), dec!(1000), dec!(0.5), 18),
                PoolToken::new(addr(2), dec!(1000), dec!(0.5), 18),
            ],
            dec!(0.003),
        )]);
        SwapQuoter::new(
            registry,
            NativeAliasTable::new(addr(9)),
            RouterConfig::default(),
        )
    }

    fn request(amount: Decimal) -> TradeRequest {
        TradeRequest {
            token_in: TokenSpec::token(addr(1)),
            token_out: TokenSpec::token(addr(2)),
            direction: SwapDirection::ExactIn,
            amount,
            slippage_tolerance_pct: None,
        }
    }

    #[test]
    fn test_quote_end_to_end() {
        let quoter = quoter_with_pool();
        let preview = quoter.quote(request(dec!(100))).unwrap();
        assert!(preview.is_valid());
    }

    #[test]
    fn test_stale_ticket_rejected() {
        let quoter = quoter_with_pool();

        let first = quoter.begin(request(dec!(100)));
        let first_preview = quoter.preview(&first).unwrap();

        // User types again before the first preview is accepted
        let second = quoter.begin(request(dec!(200)));

        assert!(!quoter.is_current(&first));
        assert!(matches!(
            quoter.accept(&first, first_preview),
            Err(RouterError::StaleInput)
        ));

        let second_preview = quoter.preview(&second).unwrap();
        assert!(quoter.accept(&second, second_preview).is_ok());
    }

    #[test]
    fn test_empty_registry_awaits_pool_data() {
        let quoter = SwapQuoter::new(
            Arc::new(PoolRegistry::new()),
            NativeAliasTable::new(addr(9)),
            RouterConfig::default(),
        );
        let preview = quoter.quote(request(dec!(100))).unwrap();
        assert_eq!(
            preview,
            SwapPreview::invalid(InvalidReason::AwaitingPoolData)
        );
    }

    #[test]
    fn test_unknown_pair_is_insufficient_liquidity() {
        let quoter = quoter_with_pool();
        let mut unknown = request(dec!(100));
        unknown.token_out = TokenSpec::token(addr(7));

        let preview = quoter.quote(unknown).unwrap();
        assert_eq!(preview, SwapPreview::invalid(InvalidReason::NoPools));
    }

    #[test]
    fn test_non_positive_amount_rejected() {
        let quoter = quoter_with_pool();
        let result = quoter.quote(request(Decimal::ZERO));
        assert!(matches!(result, Err(RouterError::InvalidAmount { .. })));
    }
}
