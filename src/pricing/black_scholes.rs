use super::{d_terms, std_normal, OptionKind};
use statrs::distribution::ContinuousCDF;

/// Black-Scholes European option price.
///
/// d1 = (ln(S/K) + (r + sigma^2/2) * T) / (sigma * sqrt(T))
/// d2 = d1 - sigma * sqrt(T)
/// call = S * Phi(d1) - K * e^(-rT) * Phi(d2)
/// put  = K * e^(-rT) * Phi(-d2) - S * Phi(-d1)
///
/// Never panics and never returns a negative or non-finite value. Degenerate
/// inputs (T <= 0, sigma <= 0, nonpositive S or K) come back as 0.0, which
/// callers must read as "unpriceable" rather than a zero premium.
pub fn price(s: f64, k: f64, t: f64, r: f64, sigma: f64, kind: OptionKind) -> f64 {
    let Some(d) = d_terms(s, k, t, r, sigma) else {
        return 0.0;
    };

    let n = std_normal();
    let discount = (-r * t).exp();
    let price = match kind {
        OptionKind::Call => s * n.cdf(d.d1) - k * discount * n.cdf(d.d2),
        OptionKind::Put => k * discount * n.cdf(-d.d2) - s * n.cdf(-d.d1),
    };

    if price.is_finite() {
        price.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_atm_values() {
        // S=100, K=100, T=1y, r=5%, sigma=20%: textbook values
        let call = price(100.0, 100.0, 1.0, 0.05, 0.2, OptionKind::Call);
        let put = price(100.0, 100.0, 1.0, 0.05, 0.2, OptionKind::Put);
        assert!((call - 10.4506).abs() < 0.01, "call={call}");
        assert!((put - 5.5735).abs() < 0.01, "put={put}");
    }

    #[test]
    fn test_put_call_parity() {
        let cases = [
            (100.0, 100.0, 1.0, 0.05, 0.2),
            (50.0, 60.0, 0.5, 0.03, 0.45),
            (250.0, 200.0, 2.0, 0.01, 0.8),
            (10.0, 9.5, 0.1, 0.05, 0.15),
        ];
        for (s, k, t, r, sigma) in cases {
            let call = price(s, k, t, r, sigma, OptionKind::Call);
            let put = price(s, k, t, r, sigma, OptionKind::Put);
            let forward = s - k * (-r * t).exp();
            assert!(
                (call - put - forward).abs() < 1e-6,
                "parity violated for S={s} K={k}: call={call} put={put} fwd={forward}"
            );
        }
    }

    #[test]
    fn test_degenerate_inputs_price_zero() {
        assert_eq!(price(100.0, 100.0, 0.0, 0.05, 0.2, OptionKind::Call), 0.0);
        assert_eq!(price(100.0, 100.0, -0.5, 0.05, 0.2, OptionKind::Put), 0.0);
        assert_eq!(price(100.0, 100.0, 1.0, 0.05, 0.0, OptionKind::Call), 0.0);
        assert_eq!(price(0.0, 100.0, 1.0, 0.05, 0.2, OptionKind::Call), 0.0);
        assert_eq!(price(100.0, 0.0, 1.0, 0.05, 0.2, OptionKind::Put), 0.0);
    }

    #[test]
    fn test_never_negative() {
        // Deep OTM short-dated: value is tiny but must not go below zero
        let p = price(100.0, 200.0, 0.01, 0.05, 0.1, OptionKind::Call);
        assert!(p >= 0.0);
        assert!(p < 1e-6);
    }
}
