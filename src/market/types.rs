use crate::pricing::OptionKind;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One row of an options chain, normalized from the provider's wire format.
/// Absent numeric fields are already collapsed to 0 here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptionQuote {
    pub strike: f64,
    pub last: f64,
    pub bid: f64,
    pub ask: f64,
    pub volume: i64,
    pub open_interest: i64,
    pub implied_volatility: f64,
}

impl OptionQuote {
    /// Usable live price: `last` if positive, else the bid/ask midpoint when
    /// both sides are quoted. None means no live price exists for this row
    /// and the position it backs must display flat.
    pub fn mark_price(&self) -> Option<f64> {
        if self.last > 0.0 {
            return Some(self.last);
        }
        if self.bid > 0.0 && self.ask > 0.0 {
            return Some((self.bid + self.ask) / 2.0);
        }
        None
    }
}

/// Full chain for one symbol/expiration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OptionChain {
    pub calls: Vec<OptionQuote>,
    pub puts: Vec<OptionQuote>,
    pub current_price: Option<f64>,
    pub expirations: Vec<NaiveDate>,
}

impl OptionChain {
    #[inline]
    pub fn side(&self, kind: OptionKind) -> &[OptionQuote] {
        match kind {
            OptionKind::Call => &self.calls,
            OptionKind::Put => &self.puts,
        }
    }

    /// Row at an exact strike on one side of the chain.
    pub fn find_strike(&self, kind: OptionKind, strike: f64) -> Option<&OptionQuote> {
        self.side(kind)
            .iter()
            .find(|q| (q.strike - strike).abs() < 1e-6)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(last: f64, bid: f64, ask: f64) -> OptionQuote {
        OptionQuote {
            strike: 100.0,
            last,
            bid,
            ask,
            volume: 0,
            open_interest: 0,
            implied_volatility: 0.0,
        }
    }

    #[test]
    fn test_mark_price_prefers_last() {
        assert_eq!(row(5.25, 5.0, 5.5).mark_price(), Some(5.25));
    }

    #[test]
    fn test_mark_price_falls_back_to_midpoint() {
        assert_eq!(row(0.0, 4.8, 5.2).mark_price(), Some(5.0));
    }

    #[test]
    fn test_mark_price_requires_both_sides() {
        assert_eq!(row(0.0, 4.8, 0.0).mark_price(), None);
        assert_eq!(row(0.0, 0.0, 5.2).mark_price(), None);
        assert_eq!(row(0.0, 0.0, 0.0).mark_price(), None);
    }

    #[test]
    fn test_find_strike_matches_side() {
        let chain = OptionChain {
            calls: vec![row(1.0, 0.0, 0.0)],
            puts: vec![],
            current_price: None,
            expirations: vec![],
        };
        assert!(chain.find_strike(OptionKind::Call, 100.0).is_some());
        assert!(chain.find_strike(OptionKind::Put, 100.0).is_none());
        assert!(chain.find_strike(OptionKind::Call, 105.0).is_none());
    }
}
