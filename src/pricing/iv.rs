use super::black_scholes::price;
use super::greeks::vega_raw;
use super::OptionKind;

/// Fallback volatility when the premium cannot be inverted (expired contract
/// or nonpositive market price).
pub const DEFAULT_VOL: f64 = 0.30;

/// Solved volatility is always clamped into this band.
pub const VOL_MIN: f64 = 0.05;
pub const VOL_MAX: f64 = 2.0;

const MAX_ITERATIONS: u32 = 10;
const PRICE_TOLERANCE: f64 = 0.01;
const VEGA_FLOOR: f64 = 1e-6;

/// Invert the pricing model against an observed premium via Newton-Raphson.
///
/// Best-effort: returns the last sigma reached even when the tolerance was
/// not met within the iteration budget, so callers must not assume the
/// returned vol reprices the premium exactly. Always in [VOL_MIN, VOL_MAX],
/// or exactly DEFAULT_VOL when T <= 0 or market_price <= 0.
pub fn implied_vol(market_price: f64, s: f64, k: f64, t: f64, r: f64, kind: OptionKind) -> f64 {
    if t <= 0.0 || market_price <= 0.0 {
        return DEFAULT_VOL;
    }

    let mut sigma = DEFAULT_VOL;
    for _ in 0..MAX_ITERATIONS {
        let theoretical = price(s, k, t, r, sigma, kind);
        let vega = vega_raw(s, k, t, r, sigma);
        if !theoretical.is_finite() || !vega.is_finite() {
            break;
        }
        // Vega floor guards the Newton step against division blow-up on
        // deep ITM/OTM contracts where the price barely responds to vol.
        if vega.abs() < VEGA_FLOOR {
            break;
        }
        let diff = theoretical - market_price;
        if diff.abs() < PRICE_TOLERANCE {
            break;
        }
        let next = sigma - diff / vega;
        if !next.is_finite() {
            break;
        }
        sigma = next.clamp(VOL_MIN, VOL_MAX);
    }
    sigma
}
