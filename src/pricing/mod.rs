pub mod black_scholes;
pub mod greeks;
pub mod iv;

use serde::{Deserialize, Serialize};
use statrs::distribution::Normal;

/// Call or put. Vertical credit spreads decompose into one of these for the
/// scenario tooling; they never reach the pricing layer as a spread.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OptionKind {
    Call,
    Put,
}

impl OptionKind {
    /// Payoff if exercised immediately. Used at the day-0 edge of scenario
    /// grids, where the model has no time value to contribute.
    #[inline]
    pub fn intrinsic(self, spot: f64, strike: f64) -> f64 {
        match self {
            Self::Call => (spot - strike).max(0.0),
            Self::Put => (strike - spot).max(0.0),
        }
    }
}

/// The d1/d2 terms shared by price, Greeks, and the IV solver.
#[derive(Debug, Clone, Copy)]
pub(crate) struct DTerms {
    pub d1: f64,
    pub d2: f64,
}

/// None on any degenerate input (T <= 0, sigma <= 0, nonpositive prices) or
/// non-finite intermediate. Callers surface that as "unpriceable" zeros
/// rather than an error.
#[inline]
pub(crate) fn d_terms(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> Option<DTerms> {
    if s <= 0.0 || k <= 0.0 || t <= 0.0 || sigma <= 0.0 {
        return None;
    }
    let sqrt_t = t.sqrt();
    let d1 = ((s / k).ln() + (r + 0.5 * sigma * sigma) * t) / (sigma * sqrt_t);
    let d2 = d1 - sigma * sqrt_t;
    if d1.is_finite() && d2.is_finite() {
        Some(DTerms { d1, d2 })
    } else {
        None
    }
}

#[inline]
pub(crate) fn std_normal() -> Normal {
    Normal::standard()
}
