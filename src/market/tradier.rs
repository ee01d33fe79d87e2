use super::types::{OptionChain, OptionQuote};
use super::MarketData;
use crate::config::EngineConfig;
use crate::errors::{EngineError, EngineResult};
use chrono::NaiveDate;
use reqwest::Client;
use smallvec::SmallVec;

/// Tradier REST API client. All methods return Result, never panic.
#[derive(Clone)]
pub struct TradierClient {
    client: Client,
    base_url: String,
    token: String,
}

impl TradierClient {
    pub fn new(cfg: &EngineConfig) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(cfg.http_timeout_secs))
                .pool_max_idle_per_host(4)
                .build()
                .unwrap_or_default(),
            base_url: cfg.tradier_base_url.trim_end_matches('/').to_string(),
            token: cfg.tradier_token.clone(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, path: &str) -> EngineResult<T> {
        let url = format!("{}{}", self.base_url, path);
        let resp = self
            .client
            .get(&url)
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", "application/json")
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            return Err(EngineError::TradierApi {
                status: status.as_u16(),
                body,
            });
        }

        resp.json::<T>()
            .await
            .map_err(|e| EngineError::Parse(format!("GET {path}: {e}")))
    }

    async fn get_expirations(&self, symbol: &str) -> EngineResult<Vec<NaiveDate>> {
        let resp: ExpirationsResponse = self
            .get_json(&format!("/markets/options/expirations?symbol={symbol}"))
            .await?;

        let dates = resp
            .expirations
            .and_then(|e| e.date)
            .map(OneOrMany::into_vec)
            .unwrap_or_default();

        Ok(dates
            .iter()
            .filter_map(|d| NaiveDate::parse_from_str(d, "%Y-%m-%d").ok())
            .collect())
    }
}

impl MarketData for TradierClient {
    async fn get_quote(&self, symbol: &str) -> EngineResult<f64> {
        let resp: QuotesResponse = self
            .get_json(&format!("/markets/quotes?symbols={symbol}"))
            .await?;

        let price = resp
            .quotes
            .and_then(|q| q.quote)
            .map(OneOrMany::into_vec)
            .and_then(|quotes| quotes.into_iter().next())
            .and_then(|q| q.last)
            .ok_or_else(|| EngineError::MarketData(format!("no quote for {symbol}")))?;

        if price <= 0.0 || !price.is_finite() {
            return Err(EngineError::MarketData(format!(
                "invalid price for {symbol}: {price}"
            )));
        }

        Ok(price)
    }

    async fn get_chain(
        &self,
        symbol: &str,
        expiration: Option<NaiveDate>,
    ) -> EngineResult<OptionChain> {
        let expirations = self.get_expirations(symbol).await?;
        let Some(&first) = expirations.first() else {
            return Err(EngineError::MarketData(format!(
                "no option expirations for {symbol}"
            )));
        };

        // Fall back to the nearest listed expiration when the requested one
        // is absent (e.g. the contract rolled off).
        let target = expiration
            .filter(|d| expirations.contains(d))
            .unwrap_or(first);

        let mut parts: SmallVec<[String; 2]> = SmallVec::new();
        parts.push(format!("symbol={symbol}"));
        parts.push(format!("expiration={}", target.format("%Y-%m-%d")));
        let resp: ChainsResponse = self
            .get_json(&format!("/markets/options/chains?{}", parts.join("&")))
            .await?;

        let options = resp
            .options
            .and_then(|o| o.option)
            .map(OneOrMany::into_vec)
            .unwrap_or_default();
        if options.is_empty() {
            return Err(EngineError::MarketData(format!(
                "empty chain for {symbol} {target}"
            )));
        }

        let mut calls = Vec::new();
        let mut puts = Vec::new();
        for opt in options {
            let Some(strike) = opt.strike else { continue };
            let row = OptionQuote {
                strike,
                last: opt.last.unwrap_or(0.0),
                bid: opt.bid.unwrap_or(0.0),
                ask: opt.ask.unwrap_or(0.0),
                volume: opt.volume.unwrap_or(0),
                open_interest: opt.open_interest.unwrap_or(0),
                implied_volatility: opt.greeks.as_ref().and_then(|g| g.mid_iv).unwrap_or(0.0),
            };
            match opt.option_type.as_deref() {
                Some("call") => calls.push(row),
                Some("put") => puts.push(row),
                _ => {}
            }
        }

        let current_price = match self.get_quote(symbol).await {
            Ok(p) => Some(p),
            Err(e) => {
                tracing::warn!(symbol, error = %e, "chain fetched but quote unavailable");
                None
            }
        };

        Ok(OptionChain {
            calls,
            puts,
            current_price,
            expirations,
        })
    }
}

// ── Tradier wire types ──
//
// Tradier collapses single-element arrays to bare objects (and single
// expiration dates to bare strings), hence OneOrMany everywhere.

#[derive(Debug, serde::Deserialize)]
#[serde(untagged)]
enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    fn into_vec(self) -> Vec<T> {
        match self {
            Self::One(v) => vec![v],
            Self::Many(v) => v,
        }
    }
}

#[derive(Debug, serde::Deserialize)]
struct QuotesResponse {
    quotes: Option<QuotesBody>,
}

#[derive(Debug, serde::Deserialize)]
struct QuotesBody {
    quote: Option<OneOrMany<WireQuote>>,
}

#[derive(Debug, serde::Deserialize)]
struct WireQuote {
    last: Option<f64>,
}

#[derive(Debug, serde::Deserialize)]
struct ExpirationsResponse {
    expirations: Option<ExpirationsBody>,
}

#[derive(Debug, serde::Deserialize)]
struct ExpirationsBody {
    date: Option<OneOrMany<String>>,
}

#[derive(Debug, serde::Deserialize)]
struct ChainsResponse {
    options: Option<ChainsBody>,
}

#[derive(Debug, serde::Deserialize)]
struct ChainsBody {
    option: Option<OneOrMany<WireOption>>,
}

#[derive(Debug, serde::Deserialize)]
struct WireOption {
    strike: Option<f64>,
    option_type: Option<String>,
    last: Option<f64>,
    bid: Option<f64>,
    ask: Option<f64>,
    volume: Option<i64>,
    open_interest: Option<i64>,
    greeks: Option<WireGreeks>,
}

#[derive(Debug, serde::Deserialize)]
struct WireGreeks {
    mid_iv: Option<f64>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_body_accepts_object_or_array() {
        let single: QuotesResponse =
            serde_json::from_str(r#"{"quotes":{"quote":{"symbol":"AAPL","last":187.3}}}"#)
                .unwrap();
        let quotes = single.quotes.unwrap().quote.unwrap().into_vec();
        assert_eq!(quotes.len(), 1);
        assert_eq!(quotes[0].last, Some(187.3));

        let many: QuotesResponse = serde_json::from_str(
            r#"{"quotes":{"quote":[{"symbol":"AAPL","last":187.3},{"symbol":"MSFT","last":402.1}]}}"#,
        )
        .unwrap();
        assert_eq!(many.quotes.unwrap().quote.unwrap().into_vec().len(), 2);
    }

    #[test]
    fn test_expirations_accept_bare_string() {
        let resp: ExpirationsResponse =
            serde_json::from_str(r#"{"expirations":{"date":"2025-06-20"}}"#).unwrap();
        let dates = resp.expirations.unwrap().date.unwrap().into_vec();
        assert_eq!(dates, vec!["2025-06-20".to_string()]);
    }

    #[test]
    fn test_chain_row_parses_with_missing_fields() {
        let resp: ChainsResponse = serde_json::from_str(
            r#"{"options":{"option":[
                {"strike":195.0,"option_type":"call","last":null,"bid":3.4,"ask":3.6,
                 "volume":12,"open_interest":340,"greeks":{"mid_iv":0.31}},
                {"strike":195.0,"option_type":"put","bid":2.1,"ask":2.3}
            ]}}"#,
        )
        .unwrap();
        let rows = resp.options.unwrap().option.unwrap().into_vec();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].last, None);
        assert_eq!(rows[0].greeks.as_ref().unwrap().mid_iv, Some(0.31));
        assert_eq!(rows[1].option_type.as_deref(), Some("put"));
    }
}
