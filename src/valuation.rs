//! Live unrealized-P&L policy for open positions.
//!
//! Zero-on-uncertainty is the product rule here: a position that is too
//! fresh, hasn't moved past its noise floor, or can't be priced from live
//! data always displays flat (0 / 0%) rather than stale or wrong. Each
//! position is valued independently; one failure never aborts the batch.

use crate::market::MarketData;
use crate::position::{PnlUpdate, Position, TradeKind};
use crate::pricing::OptionKind;
use chrono::{DateTime, Duration, Utc};

/// Positions younger than this are forced to 0/0 without any market fetch.
const RECENCY_GUARD_SECS: i64 = 7200;

/// Minimum relative move of an equity's own price before P&L is shown.
const EQUITY_MOVE_FLOOR: f64 = 0.01;

/// Minimum relative move of the underlying before an option is revalued.
/// Wider than the equity floor since the chain fetch is the expensive step
/// and option price is a geared derivative of the underlying.
const UNDERLYING_MOVE_FLOOR: f64 = 0.02;

const CONTRACT_MULTIPLIER: f64 = 100.0;

/// Recompute unrealized P&L for every open position in the slice, applying
/// the result in place. Closed positions (exit recorded) are skipped.
/// The caller persists the whole batch atomically afterwards; on a failed
/// commit it discards these in-memory mutations.
pub async fn refresh_open_positions<M: MarketData>(
    market: &M,
    positions: &mut [Position],
    now: DateTime<Utc>,
) {
    let mut refreshed = 0usize;
    for position in positions.iter_mut().filter(|p| p.is_open()) {
        let update = value_position(market, position, now).await;
        update.apply(position);
        refreshed += 1;
    }
    tracing::info!(refreshed, "open position P&L refresh pass complete");
}

/// Value a single open position. Pure with respect to the position: the
/// update is returned, not written through. Never fails -- every degraded
/// path collapses to `PnlUpdate::ZERO`.
pub async fn value_position<M: MarketData>(
    market: &M,
    position: &Position,
    now: DateTime<Utc>,
) -> PnlUpdate {
    // Recency guard: too fresh to have moved meaningfully. Applies before
    // any fetch, for every kind.
    if now - position.entry_time < Duration::seconds(RECENCY_GUARD_SECS) {
        tracing::info!(symbol = %position.symbol, "position too fresh, holding P&L at zero");
        return PnlUpdate::ZERO;
    }

    if position.kind.is_option() {
        value_option(market, position).await
    } else {
        value_equity(market, position).await
    }
}

async fn value_equity<M: MarketData>(market: &M, position: &Position) -> PnlUpdate {
    let current = match market.get_quote(&position.symbol).await {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(symbol = %position.symbol, error = %e, "quote unavailable, holding P&L at zero");
            return PnlUpdate::ZERO;
        }
    };

    if position.entry_price <= 0.0 || current == position.entry_price {
        return PnlUpdate::ZERO;
    }

    let move_percent = (current - position.entry_price).abs() / position.entry_price;
    if move_percent < EQUITY_MOVE_FLOOR {
        tracing::info!(
            symbol = %position.symbol,
            move_percent = move_percent * 100.0,
            "price move below noise floor, holding P&L at zero"
        );
        return PnlUpdate::ZERO;
    }

    let pnl = match position.kind {
        TradeKind::Long => (current - position.entry_price) * position.quantity,
        TradeKind::Short => (position.entry_price - current) * position.quantity,
        _ => return PnlUpdate::ZERO,
    };

    let cost_basis = position.entry_price * position.quantity;
    let percent = if cost_basis > 0.0 {
        pnl / cost_basis * 100.0
    } else {
        0.0
    };

    tracing::info!(
        symbol = %position.symbol,
        entry = position.entry_price,
        current,
        pnl,
        "updated equity P&L"
    );

    PnlUpdate {
        profit_loss: pnl,
        profit_loss_percent: percent,
    }
}

async fn value_option<M: MarketData>(market: &M, position: &Position) -> PnlUpdate {
    // Without a recorded entry underlying price the movement gate can't be
    // evaluated: unknown means zero, not a chain fetch.
    let Some(entry_underlying) = position.underlying_price_at_entry.filter(|p| *p > 0.0) else {
        tracing::warn!(symbol = %position.symbol, "no underlying price at entry, holding P&L at zero");
        return PnlUpdate::ZERO;
    };

    let current_underlying = match market.get_quote(&position.symbol).await {
        Ok(p) => p,
        Err(e) => {
            tracing::warn!(symbol = %position.symbol, error = %e, "underlying quote unavailable, holding P&L at zero");
            return PnlUpdate::ZERO;
        }
    };

    // Chain fetch is skipped entirely until the underlying has moved enough
    // for the option mark to plausibly matter.
    let move_percent = (current_underlying - entry_underlying).abs() / entry_underlying;
    if move_percent < UNDERLYING_MOVE_FLOOR {
        tracing::info!(
            symbol = %position.symbol,
            move_percent = move_percent * 100.0,
            "underlying move below floor, skipping chain fetch"
        );
        return PnlUpdate::ZERO;
    }

    let (Some(expiration), Some(strike)) = (position.expiration_date, position.strike) else {
        tracing::warn!(symbol = %position.symbol, "option position missing strike or expiration");
        return PnlUpdate::ZERO;
    };

    let chain = match market.get_chain(&position.symbol, Some(expiration)).await {
        Ok(c) => c,
        Err(e) => {
            tracing::warn!(symbol = %position.symbol, error = %e, "chain unavailable, holding P&L at zero");
            return PnlUpdate::ZERO;
        }
    };

    // Vertical spreads pass the gates but have no single-leg row to mark
    // against, so they stay flat until closed.
    let side = match position.kind {
        TradeKind::OptionCall => OptionKind::Call,
        TradeKind::OptionPut => OptionKind::Put,
        _ => return PnlUpdate::ZERO,
    };

    let Some(current_option_price) = chain
        .find_strike(side, strike)
        .and_then(|row| row.mark_price())
    else {
        tracing::warn!(
            symbol = %position.symbol,
            strike,
            "no live option price at strike, holding P&L at zero"
        );
        return PnlUpdate::ZERO;
    };

    let pnl = (current_option_price - position.entry_price)
        * position.quantity
        * CONTRACT_MULTIPLIER;
    let cost_basis = position.entry_price * position.quantity * CONTRACT_MULTIPLIER;
    let percent = if cost_basis > 0.0 {
        pnl / cost_basis * 100.0
    } else {
        0.0
    };

    tracing::info!(
        symbol = %position.symbol,
        strike,
        entry = position.entry_price,
        current = current_option_price,
        pnl,
        "updated option P&L"
    );

    PnlUpdate {
        profit_loss: pnl,
        profit_loss_percent: percent,
    }
}
