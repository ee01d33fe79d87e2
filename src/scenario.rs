//! Price x time P&L scenario grid for a single option contract.
//!
//! Reporting-only: the grid is built on demand for the options calculator
//! view and never feeds back into position valuation.

use crate::pricing::black_scholes::price;
use crate::pricing::iv::{implied_vol, DEFAULT_VOL};
use crate::pricing::OptionKind;
use chrono::{NaiveDate, Utc};
use serde::Serialize;
use std::collections::BTreeSet;

/// Fixed rate assumption for scenario pricing.
const SCENARIO_RATE: f64 = 0.05;

/// Price axis: 11 evenly spaced points over spot +/- 15%. Fixed policy.
const PRICE_POINTS: usize = 11;
const PRICE_BAND: f64 = 0.15;

/// Shares per contract.
const CONTRACT_MULTIPLIER: f64 = 100.0;

/// Time-axis tier, keyed on total days to expiration. The checkpoints get
/// denser near expiration, where option value decays fastest, instead of
/// spacing uniformly.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimeAxisTier {
    /// D <= 0: single checkpoint at 0.
    Expired,
    /// D <= 7: daily countdown, at most 5 entries before the forced 0.
    FinalWeek,
    /// D <= 30: weekly steps.
    UnderMonth,
    /// D <= 90: two-week then monthly steps.
    UnderQuarter,
    /// D > 90: monthly steps capped at three.
    LongDated,
}

impl TimeAxisTier {
    pub fn for_days(days: i64) -> Self {
        match days {
            d if d <= 0 => Self::Expired,
            d if d <= 7 => Self::FinalWeek,
            d if d <= 30 => Self::UnderMonth,
            d if d <= 90 => Self::UnderQuarter,
            _ => Self::LongDated,
        }
    }

    /// Raw checkpoint candidates for this tier, before deduplication and the
    /// forced terminal 0.
    fn checkpoints(self, days: i64) -> Vec<i64> {
        match self {
            Self::Expired => vec![0],
            Self::FinalWeek => (0..=days).rev().take(5).collect(),
            Self::UnderMonth => vec![days, days - 7, days - 14, days - 21, 0],
            Self::UnderQuarter => vec![days, days - 14, days - 30, days - 60, 0],
            Self::LongDated => vec![days, days - 30, days - 60, days - 90, 0],
        }
    }
}

/// Distinct nonnegative checkpoints for a contract with `days` to expiry,
/// sorted descending and always ending at 0.
pub fn time_points(days: i64) -> Vec<i64> {
    let mut set: BTreeSet<i64> = TimeAxisTier::for_days(days)
        .checkpoints(days)
        .into_iter()
        .map(|d| d.max(0))
        .collect();
    set.insert(0);
    set.into_iter().rev().collect()
}

/// One cell of the grid.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScenarioPoint {
    pub days_remaining: i64,
    pub pnl: f64,
    pub return_percent: f64,
}

/// One price row: the full set of time checkpoints at a hypothetical spot.
#[derive(Debug, Clone, Serialize)]
pub struct PriceScenario {
    pub stock_price: f64,
    pub time_data: Vec<ScenarioPoint>,
}

/// Inputs echoed back alongside the grid, as the calculator view renders
/// them. `implied_volatility` is a percentage rounded to 1 decimal.
#[derive(Debug, Clone, Serialize)]
pub struct ScenarioSummary {
    pub kind: OptionKind,
    pub strike: f64,
    pub premium: f64,
    pub quantity: i64,
    pub days_to_expiration: i64,
    pub time_points: Vec<i64>,
    pub implied_volatility: f64,
    pub current_stock_price: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct ScenarioGrid {
    pub rows: Vec<PriceScenario>,
    pub summary: ScenarioSummary,
}

/// Build the scenario grid for a contract, dating day counts from today.
pub fn build_scenarios(
    kind: OptionKind,
    strike: f64,
    current_price: f64,
    expiration_date: NaiveDate,
    premium: f64,
    quantity: i64,
) -> ScenarioGrid {
    build_scenarios_at(
        kind,
        strike,
        current_price,
        expiration_date,
        premium,
        quantity,
        Utc::now().date_naive(),
    )
}

/// Deterministic variant taking an explicit "today". P&L per cell is priced
/// per single contract: the 100x multiplier applies, `quantity` is carried
/// through to the summary but deliberately not multiplied in (matching the
/// calculator this reproduces).
pub fn build_scenarios_at(
    kind: OptionKind,
    strike: f64,
    current_price: f64,
    expiration_date: NaiveDate,
    premium: f64,
    quantity: i64,
    today: NaiveDate,
) -> ScenarioGrid {
    let days_to_exp = (expiration_date - today).num_days();
    let points = time_points(days_to_exp);

    let years_to_exp = days_to_exp as f64 / 365.0;
    let solved_vol = if years_to_exp > 0.0 && premium > 0.0 {
        implied_vol(premium, current_price, strike, years_to_exp, SCENARIO_RATE, kind)
    } else {
        DEFAULT_VOL
    };

    let lo = current_price * (1.0 - PRICE_BAND);
    let hi = current_price * (1.0 + PRICE_BAND);
    let step = (hi - lo) / (PRICE_POINTS - 1) as f64;

    let rows = (0..PRICE_POINTS)
        .map(|i| {
            let spot = lo + step * i as f64;
            let time_data = points
                .iter()
                .map(|&days_left| {
                    let theoretical = if days_left > 0 {
                        let years_left = days_left as f64 / 365.0;
                        price(spot, strike, years_left, SCENARIO_RATE, solved_vol, kind)
                    } else {
                        kind.intrinsic(spot, strike)
                    };
                    let pnl = (theoretical - premium) * CONTRACT_MULTIPLIER;
                    let return_percent = if premium > 0.0 {
                        pnl / (premium * CONTRACT_MULTIPLIER) * 100.0
                    } else {
                        0.0
                    };
                    ScenarioPoint {
                        days_remaining: days_left,
                        pnl: round2(pnl),
                        return_percent: round2(return_percent),
                    }
                })
                .collect();
            PriceScenario {
                stock_price: round2(spot),
                time_data,
            }
        })
        .collect();

    ScenarioGrid {
        rows,
        summary: ScenarioSummary {
            kind,
            strike,
            premium,
            quantity,
            days_to_expiration: days_to_exp,
            time_points: points,
            implied_volatility: round1(solved_vol * 100.0),
            current_stock_price: current_price,
        },
    }
}

#[inline]
fn round2(x: f64) -> f64 {
    (x * 100.0).round() / 100.0
}

#[inline]
fn round1(x: f64) -> f64 {
    (x * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    #[test]
    fn test_time_points_expired() {
        assert_eq!(time_points(0), vec![0]);
        assert_eq!(time_points(-5), vec![0]);
    }

    #[test]
    fn test_time_points_final_week() {
        // Countdown truncates at 5 entries, then 0 is forced
        assert_eq!(time_points(7), vec![7, 6, 5, 4, 3, 0]);
        assert_eq!(time_points(3), vec![3, 2, 1, 0]);
    }

    #[test]
    fn test_time_points_under_month() {
        assert_eq!(time_points(30), vec![30, 23, 16, 9, 0]);
        // Negative candidates clamp to 0 and collapse
        assert_eq!(time_points(10), vec![10, 3, 0]);
    }

    #[test]
    fn test_time_points_under_quarter() {
        assert_eq!(time_points(90), vec![90, 76, 60, 30, 0]);
        assert_eq!(time_points(45), vec![45, 31, 15, 0]);
    }

    #[test]
    fn test_time_points_long_dated() {
        assert_eq!(time_points(120), vec![120, 90, 60, 30, 0]);
        assert_eq!(time_points(365), vec![365, 335, 305, 275, 0]);
    }

    #[test]
    fn test_grid_shape() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let grid = build_scenarios_at(
            OptionKind::Call,
            195.0,
            195.0,
            today + Duration::days(30),
            3.5,
            1,
            today,
        );
        assert_eq!(grid.rows.len(), 11);
        assert_eq!(grid.summary.time_points, vec![30, 23, 16, 9, 0]);
        for row in &grid.rows {
            assert_eq!(row.time_data.len(), 5);
        }
        // Symmetric +/-15% band
        assert!((grid.rows[0].stock_price - 165.75).abs() < 1e-9);
        assert!((grid.rows[5].stock_price - 195.0).abs() < 1e-9);
        assert!((grid.rows[10].stock_price - 224.25).abs() < 1e-9);
    }

    #[test]
    fn test_expiry_row_is_intrinsic() {
        // Expired call, K=100, spot grid centered on 110: the center row at
        // day 0 pays exactly intrinsic minus premium, no model involvement.
        let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let grid = build_scenarios_at(
            OptionKind::Call,
            100.0,
            110.0,
            today,
            3.5,
            1,
            today,
        );
        assert_eq!(grid.summary.time_points, vec![0]);
        let center = &grid.rows[5];
        assert!((center.stock_price - 110.0).abs() < 1e-9);
        let point = center.time_data[0];
        assert_eq!(point.days_remaining, 0);
        assert!((point.pnl - (10.0 - 3.5) * 100.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_premium_guards_return_percent() {
        let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let grid = build_scenarios_at(
            OptionKind::Put,
            100.0,
            100.0,
            today + Duration::days(10),
            0.0,
            1,
            today,
        );
        // IV falls back to the default and percents are all 0
        assert_eq!(grid.summary.implied_volatility, 30.0);
        for row in &grid.rows {
            for p in &row.time_data {
                assert_eq!(p.return_percent, 0.0);
            }
        }
    }

    #[test]
    fn test_final_day_value_decays_toward_intrinsic() {
        // ATM call: theoretical value at the last positive checkpoint should
        // exceed the day-0 intrinsic (time value is nonnegative).
        let today = NaiveDate::from_ymd_opt(2025, 6, 2).unwrap();
        let grid = build_scenarios_at(
            OptionKind::Call,
            195.0,
            195.0,
            today + Duration::days(30),
            3.5,
            1,
            today,
        );
        let center = &grid.rows[5];
        let last_live = center.time_data[center.time_data.len() - 2];
        let at_expiry = center.time_data[center.time_data.len() - 1];
        assert!(last_live.days_remaining > 0);
        assert_eq!(at_expiry.days_remaining, 0);
        assert!(last_live.pnl >= at_expiry.pnl);
    }
}
