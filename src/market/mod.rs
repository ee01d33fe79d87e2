pub mod tradier;
pub mod types;

use crate::errors::EngineResult;
use chrono::NaiveDate;
use self::types::OptionChain;
use std::future::Future;

/// Market-data collaborator consumed by the valuation policy.
///
/// The engine performs no IO of its own; it awaits these sequentially, one
/// position at a time. Transport, timeouts, and retries belong to the
/// implementor. An `Err` from either call means "unavailable" and degrades
/// the affected position to a zero P&L, never past its boundary.
pub trait MarketData: Send + Sync {
    /// Latest trade price for a symbol.
    fn get_quote(&self, symbol: &str) -> impl Future<Output = EngineResult<f64>> + Send;

    /// Options chain for a symbol at the given expiration, or the nearest
    /// available expiration when `None` / not listed.
    fn get_chain(
        &self,
        symbol: &str,
        expiration: Option<NaiveDate>,
    ) -> impl Future<Output = EngineResult<OptionChain>> + Send;
}
