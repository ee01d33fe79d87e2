//! Options analytics and open-position valuation core for a personal
//! trading journal.
//!
//! The journal's web app, trade store, and realized-P&L bookkeeping live
//! elsewhere; this crate owns the numerical and policy layer:
//!
//! - [`pricing`]: Black-Scholes price and Greeks, plus the Newton-Raphson
//!   implied-volatility solver. Pure functions, no state.
//! - [`scenario`]: on-demand price x time P&L grid for a single contract.
//! - [`valuation`]: the live refresh policy deciding when and how open
//!   positions get a nonzero unrealized P&L (recency guard, movement
//!   floors, zero-on-uncertainty degradation).
//! - [`market`]: the market-data collaborator boundary and a Tradier
//!   client implementing it.
//!
//! The engine performs no persistence: `refresh_open_positions` mutates
//! positions in memory and the caller commits the batch atomically.

pub mod config;
pub mod errors;
pub mod market;
pub mod position;
pub mod pricing;
pub mod scenario;
pub mod valuation;

pub use config::EngineConfig;
pub use errors::{EngineError, EngineResult};
pub use market::tradier::TradierClient;
pub use market::MarketData;
pub use position::{PnlUpdate, Position, TradeKind};
pub use pricing::black_scholes::price;
pub use pricing::greeks::{greeks, Greeks};
pub use pricing::iv::implied_vol;
pub use pricing::OptionKind;
pub use scenario::{build_scenarios, build_scenarios_at, ScenarioGrid};
pub use valuation::{refresh_open_positions, value_position};
