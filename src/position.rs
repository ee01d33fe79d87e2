use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// Trade direction / instrument kind as recorded by the journal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TradeKind {
    Long,
    Short,
    OptionCall,
    OptionPut,
    CreditCallSpread,
    CreditPutSpread,
}

impl TradeKind {
    /// Option kinds are gated by the wider 2% underlying-movement floor and
    /// valued off the options chain instead of the equity quote.
    #[inline]
    pub fn is_option(self) -> bool {
        matches!(
            self,
            Self::OptionCall | Self::OptionPut | Self::CreditCallSpread | Self::CreditPutSpread
        )
    }
}

/// An open or closed trade as consumed from the journal's trade store.
///
/// This engine owns exactly two fields on an open position: `profit_loss`
/// and `profit_loss_percent`. Everything else is written by the trade-entry
/// collaborator; once `exit_price` is set the position is closed and this
/// engine never touches it again (realized P&L is computed externally).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    pub symbol: String,
    pub kind: TradeKind,
    pub quantity: f64,
    pub entry_price: f64,
    pub entry_time: DateTime<Utc>,
    pub strike: Option<f64>,
    pub expiration_date: Option<NaiveDate>,
    pub underlying_price_at_entry: Option<f64>,
    pub exit_price: Option<f64>,
    #[serde(default)]
    pub profit_loss: f64,
    #[serde(default)]
    pub profit_loss_percent: f64,
}

impl Position {
    #[inline]
    pub fn is_open(&self) -> bool {
        self.exit_price.is_none()
    }
}

/// Unrealized P&L computed for a single open position. Returned by the
/// valuation policy rather than written through a shared reference, so the
/// per-position computation stays pure and the caller can commit the whole
/// batch in one transaction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PnlUpdate {
    pub profit_loss: f64,
    pub profit_loss_percent: f64,
}

impl PnlUpdate {
    pub const ZERO: Self = Self {
        profit_loss: 0.0,
        profit_loss_percent: 0.0,
    };

    pub fn apply(self, position: &mut Position) {
        position.profit_loss = self.profit_loss;
        position.profit_loss_percent = self.profit_loss_percent;
    }
}
