//! Beta distribution helpers for source-credibility posteriors.
//!
//! The CDF uses the regularized incomplete beta function with the
//! continued-fraction expansion (Numerical Recipes); the quantile
//! function inverts it by bisection. Quantiles of uniform draws give
//! deterministic Beta samples for the Monte Carlo engine.

use super::stable::log_beta;

const BETACF_MAX_ITERS: usize = 200;
const BETACF_EPS: f64 = 3.0e-7;
const BETACF_FPMIN: f64 = 1.0e-30;
const INV_CDF_TOL: f64 = 1e-10;
const INV_CDF_MAX_ITERS: usize = 200;

/// Mean of Beta(alpha, beta) = alpha / (alpha + beta).
pub fn beta_mean(alpha: f64, beta: f64) -> f64 {
    if !(alpha > 0.0) || !(beta > 0.0) {
        return f64::NAN;
    }
    alpha / (alpha + beta)
}

/// Variance of Beta(alpha, beta).
pub fn beta_var(alpha: f64, beta: f64) -> f64 {
    if !(alpha > 0.0) || !(beta > 0.0) {
        return f64::NAN;
    }
    let sum = alpha + beta;
    (alpha * beta) / (sum * sum * (sum + 1.0))
}

/// Regularized incomplete beta function I_x(a, b).
pub fn beta_cdf(x: f64, alpha: f64, beta: f64) -> f64 {
    if x.is_nan() || !(alpha > 0.0) || !(beta > 0.0) {
        return f64::NAN;
    }
    if x <= 0.0 {
        return 0.0;
    }
    if x >= 1.0 {
        return 1.0;
    }
    let ln_beta = log_beta(alpha, beta);
    let bt = (alpha * x.ln() + beta * (1.0 - x).ln() - ln_beta).exp();
    if x < (alpha + 1.0) / (alpha + beta + 2.0) {
        bt * betacf(alpha, beta, x) / alpha
    } else {
        1.0 - bt * betacf(beta, alpha, 1.0 - x) / beta
    }
}

/// Quantile of Beta(alpha, beta) by bisection on the CDF.
pub fn beta_inv_cdf(p: f64, alpha: f64, beta: f64) -> f64 {
    if p.is_nan() || !(alpha > 0.0) || !(beta > 0.0) {
        return f64::NAN;
    }
    if p <= 0.0 {
        return 0.0;
    }
    if p >= 1.0 {
        return 1.0;
    }
    let mut low = 0.0;
    let mut high = 1.0;
    let mut mid = 0.5;
    for _ in 0..INV_CDF_MAX_ITERS {
        mid = 0.5 * (low + high);
        let delta = beta_cdf(mid, alpha, beta) - p;
        if delta.is_nan() {
            return f64::NAN;
        }
        if delta.abs() < INV_CDF_TOL {
            return mid;
        }
        if delta < 0.0 {
            low = mid;
        } else {
            high = mid;
        }
    }
    mid
}

/// Map a uniform draw in [0, 1) to a Beta(alpha, beta) sample.
pub fn beta_sample_from_uniform(u: f64, alpha: f64, beta: f64) -> f64 {
    beta_inv_cdf(u.clamp(0.0, 1.0), alpha, beta)
}

fn betacf(alpha: f64, beta: f64, x: f64) -> f64 {
    let qab = alpha + beta;
    let qap = alpha + 1.0;
    let qam = alpha - 1.0;
    let mut c = 1.0;
    let mut d = 1.0 - qab * x / qap;
    if d.abs() < BETACF_FPMIN {
        d = BETACF_FPMIN;
    }
    d = 1.0 / d;
    let mut h = d;

    for m in 1..=BETACF_MAX_ITERS {
        let m_f = m as f64;
        let m2 = 2.0 * m_f;

        let even = m_f * (beta - m_f) * x / ((qam + m2) * (alpha + m2));
        d = 1.0 + even * d;
        if d.abs() < BETACF_FPMIN {
            d = BETACF_FPMIN;
        }
        c = 1.0 + even / c;
        if c.abs() < BETACF_FPMIN {
            c = BETACF_FPMIN;
        }
        d = 1.0 / d;
        h *= d * c;

        let odd = -(alpha + m_f) * (qab + m_f) * x / ((alpha + m2) * (qap + m2));
        d = 1.0 + odd * d;
        if d.abs() < BETACF_FPMIN {
            d = BETACF_FPMIN;
        }
        c = 1.0 + odd / c;
        if c.abs() < BETACF_FPMIN {
            c = BETACF_FPMIN;
        }
        d = 1.0 / d;
        let del = d * c;
        h *= del;
        if (del - 1.0).abs() < BETACF_EPS {
            break;
        }
    }

    h
}
