/// Domain-specific error types for the analytics engine.
/// Market-data failures are per-position recoverable: the valuation policy
/// degrades to a zero P&L instead of letting an error cross the position
/// boundary. Numerical failures in pricing never surface here at all.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    #[error("network error: {0}")]
    Network(String),

    #[error("parse error: {0}")]
    Parse(String),

    #[error("tradier API error: {status} {body}")]
    TradierApi { status: u16, body: String },

    #[error("market data error: {0}")]
    MarketData(String),

    #[error("config error: {0}")]
    Config(String),
}

impl From<reqwest::Error> for EngineError {
    fn from(e: reqwest::Error) -> Self {
        EngineError::Network(e.to_string())
    }
}

impl From<serde_json::Error> for EngineError {
    fn from(e: serde_json::Error) -> Self {
        EngineError::Parse(e.to_string())
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
