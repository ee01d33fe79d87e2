use crate::errors::{EngineError, EngineResult};

/// Runtime configuration for the market-data collaborator.
/// Valuation policy thresholds (recency guard, movement floors, solver
/// bounds) are fixed product decisions and live as constants in their
/// modules, not here.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    pub tradier_token: String,
    pub tradier_base_url: String,
    pub http_timeout_secs: u64,
}

impl EngineConfig {
    pub fn from_env() -> EngineResult<Self> {
        dotenvy::dotenv().ok();

        let http_timeout_secs = env_var_or("HTTP_TIMEOUT_SECS", "10")
            .parse::<u64>()
            .map_err(|e| EngineError::Config(format!("HTTP_TIMEOUT_SECS: {e}")))?;

        Ok(Self {
            tradier_token: env_var("TRADIER_API_TOKEN")?,
            tradier_base_url: env_var_or("TRADIER_BASE_URL", "https://api.tradier.com/v1"),
            http_timeout_secs,
        })
    }
}

fn env_var(key: &str) -> EngineResult<String> {
    std::env::var(key).map_err(|_| EngineError::Config(format!("missing env var: {key}")))
}

fn env_var_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
