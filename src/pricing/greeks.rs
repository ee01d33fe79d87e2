use super::{d_terms, std_normal, OptionKind};
use statrs::distribution::{Continuous, ContinuousCDF};

/// First-order sensitivities of the Black-Scholes price, in the units the
/// journal UI displays:
/// - theta is per calendar day (raw annual theta / 365)
/// - vega is per 1 percentage-point vol move (raw vega / 100)
/// All four rounded to 4 decimal places.
#[derive(Debug, Clone, Copy, PartialEq, serde::Serialize)]
pub struct Greeks {
    pub delta: f64,
    pub gamma: f64,
    pub theta: f64,
    pub vega: f64,
}

impl Greeks {
    pub const ZERO: Self = Self {
        delta: 0.0,
        gamma: 0.0,
        theta: 0.0,
        vega: 0.0,
    };
}

/// Compute delta, gamma, theta, vega. On any degenerate input or non-finite
/// intermediate the zero vector comes back instead of an error.
pub fn greeks(s: f64, k: f64, t: f64, r: f64, sigma: f64, kind: OptionKind) -> Greeks {
    let Some(d) = d_terms(s, k, t, r, sigma) else {
        return Greeks::ZERO;
    };

    let n = std_normal();
    let sqrt_t = t.sqrt();
    let pdf_d1 = n.pdf(d.d1);
    let discount = (-r * t).exp();

    let delta = match kind {
        OptionKind::Call => n.cdf(d.d1),
        OptionKind::Put => n.cdf(d.d1) - 1.0,
    };

    let gamma = pdf_d1 / (s * sigma * sqrt_t);

    let decay = -(s * pdf_d1 * sigma) / (2.0 * sqrt_t);
    let theta = match kind {
        OptionKind::Call => (decay - r * k * discount * n.cdf(d.d2)) / 365.0,
        OptionKind::Put => (decay + r * k * discount * n.cdf(-d.d2)) / 365.0,
    };

    let vega = s * pdf_d1 * sqrt_t / 100.0;

    if !(delta.is_finite() && gamma.is_finite() && theta.is_finite() && vega.is_finite()) {
        return Greeks::ZERO;
    }

    Greeks {
        delta: round4(delta),
        gamma: round4(gamma),
        theta: round4(theta),
        vega: round4(vega),
    }
}

/// Unscaled analytic vega, S * phi(d1) * sqrt(T). The Newton-Raphson IV
/// solver divides by this, so it must not carry the /100 display scaling.
/// 0.0 on degenerate input.
pub(crate) fn vega_raw(s: f64, k: f64, t: f64, r: f64, sigma: f64) -> f64 {
    let Some(d) = d_terms(s, k, t, r, sigma) else {
        return 0.0;
    };
    let v = s * std_normal().pdf(d.d1) * t.sqrt();
    if v.is_finite() {
        v
    } else {
        0.0
    }
}

#[inline]
fn round4(x: f64) -> f64 {
    (x * 10_000.0).round() / 10_000.0
}
