//! The Pandel function convolved with a Gaussian of width sigma, which
//! models the timing jitter of the sensors.
//!
//! The convolution has no closed form over its whole domain. Writing
//! xi = d / scattering length and eta = rho sigma - t / sigma, it is
//! evaluated by one of several approximations, each accurate and stable
//! in its own region of (t, xi).

use std::f64::consts;

use statrs::function::gamma::{gamma, ln_gamma};

use crate::ice::IceModel;
use crate::special_functions::*;
use super::{clamp_density, pandel_pdf};

/// ln(2 pi) / 2
const LN_SQRT_2PI: f64 = 0.9189385332046728;

/// Coefficients, in ascending powers of beta, of the 1/A, 1/A^2 and 1/A^3
/// corrections to the saddle-point approximation.
const SADDLE_POINT_C1: [f64; 3] = [1.0, 1.0, 10.0];
const SADDLE_POINT_C2: [f64; 5] = [1.0, 2.0, 21.0, -700.0, 1540.0];
const SADDLE_POINT_C3: [f64; 7] = [-139.0, -417.0, -699.0, -11935.0, 690690.0, -3303300.0, 3403400.0];

/// Which approximation is used to evaluate the convolved density.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Regime {
    /// Zero distance: the Gaussian alone
    Gaussian,
    /// Close to t = 0, eta > 1.35: Tricomi function U
    Tricomi,
    /// Close to t = 0, moderate eta: tabulated Kummer series
    Series,
    /// Close to t = 0, otherwise: direct Kummer function
    Kummer,
    /// Short distance, t > 30 sigma
    LargeTime,
    /// Short distance, t < -5 sigma
    NegativeTime,
    /// Long distance, away from t = 0
    SaddlePoint,
}

impl Regime {
    /// Selects the approximation for delay `t`, reduced distance `xi`,
    /// Pandel rate `rho` and jitter `sigma > 0`.
    pub fn select(t: f64, xi: f64, rho: f64, sigma: f64) -> Self {
        let eta = rho * sigma - t / sigma;
        if xi <= 0.0 {
            Regime::Gaussian
        } else if t >= -5.0 * sigma && t <= 30.0 * sigma && xi <= 5.0 {
            let x = 0.5 * eta * eta;
            if eta > 1.35 {
                Regime::Tricomi
            } else if x < 100.0 && xi > 0.05 {
                Regime::Series
            } else {
                Regime::Kummer
            }
        } else if xi <= 1.0 && t > 30.0 * sigma {
            Regime::LargeTime
        } else if xi <= 1.0 && t < -5.0 * sigma {
            Regime::NegativeTime
        } else {
            Regime::SaddlePoint
        }
    }
}

/// Probability density of the jittered delay `t` (ns), for a photon that
/// travelled an effective distance `d` (m), with Gaussian jitter `sigma >= 0` (ns).
///
/// Reduces exactly to [`pandel_pdf`] if `sigma` is zero. The result is always
/// finite and non-negative.
pub fn convolved_pdf(t: f64, d: f64, ice: &IceModel, sigma: f64) -> f64 {
    if sigma == 0.0 {
        return pandel_pdf(t, d, ice);
    }

    let xi = d / ice.scattering_length();
    let rho = ice.rho();
    let eta = rho * sigma - t / sigma;

    let value = match Regime::select(t, xi, rho, sigma) {
        Regime::Gaussian => (-0.5 * (t / sigma).powi(2) - LN_SQRT_2PI).exp() / sigma,
        Regime::Tricomi => tricomi_form(t, xi, rho, sigma, eta),
        Regime::Series => series_form(t, xi, rho, sigma, eta),
        Regime::Kummer => kummer_form(t, xi, rho, sigma, eta),
        Regime::LargeTime => large_time_form(t, xi, rho, sigma, eta),
        Regime::NegativeTime => negative_time_form(t, xi, rho, sigma, eta),
        Regime::SaddlePoint => saddle_point_form(t, xi, rho, sigma, eta),
    };

    clamp_density(value)
}

/// rho^xi sigma^(xi-1) e^(-t^2/2sigma^2) 2^(-xi/2) U(xi/2, 1/2, eta^2/2) / sqrt(2pi)
fn tricomi_form(t: f64, xi: f64, rho: f64, sigma: f64, eta: f64) -> f64 {
    let ln_pre = xi * rho.ln() + (xi - 1.0) * sigma.ln()
        - 0.5 * (t / sigma).powi(2)
        - 0.5 * xi * consts::LN_2
        - LN_SQRT_2PI;
    ln_pre.exp() * tricomi_u(0.5 * xi, 0.5, 0.5 * eta * eta)
}

/// Difference of two Kummer functions, M(xi/2, 1/2, x) and M((xi+1)/2, 3/2, x),
/// summed with the precomputed tables.
fn series_form(t: f64, xi: f64, rho: f64, sigma: f64, eta: f64) -> f64 {
    let x = 0.5 * eta * eta;
    let tables = KummerTables::get();
    let m1 = tables.m_b05(0.5 * xi, x);
    let m2 = tables.m_b15(0.5 * (xi + 1.0), x);
    let ln_pre = xi * rho.ln() + (xi - 1.0) * sigma.ln()
        - 0.5 * (xi + 1.0) * consts::LN_2
        - 0.5 * (t / sigma).powi(2);
    ln_pre.exp() * (m1 / gamma(0.5 * (xi + 1.0)) - consts::SQRT_2 * eta * m2 / gamma(0.5 * xi))
}

/// As [`series_form`], but with e^(-x) M(a, b, x) evaluated directly, which absorbs
/// the Gaussian factor.
fn kummer_form(t: f64, xi: f64, rho: f64, sigma: f64, eta: f64) -> f64 {
    let x = 0.5 * eta * eta;
    let m1 = kummer_m_scaled(0.5 * xi, 0.5, x);
    let m2 = kummer_m_scaled(0.5 * (xi + 1.0), 1.5, x);
    let rho_sigma = rho * sigma;
    let ln_pre = xi * rho.ln() + (xi - 1.0) * sigma.ln()
        - 0.5 * (xi + 1.0) * consts::LN_2
        + 0.5 * rho_sigma * rho_sigma - rho * t;
    ln_pre.exp() * (m1 / gamma(0.5 * (xi + 1.0)) - consts::SQRT_2 * eta * m2 / gamma(0.5 * xi))
}

/// The Pandel function evaluated at the shifted delay t - rho sigma^2,
/// with the leading corrections in 1/eta^2.
fn large_time_form(t: f64, xi: f64, rho: f64, sigma: f64, eta: f64) -> f64 {
    let rho_sigma = rho * sigma;
    let e2 = eta * eta;
    let correction = 1.0
        + (xi - 1.0) * (xi - 2.0) / (2.0 * e2)
        + (xi - 1.0) * (xi - 2.0) * (xi - 3.0) * (xi - 4.0) / (8.0 * e2 * e2);
    let ln_f = xi * rho.ln() + (xi - 1.0) * (t - rho_sigma * sigma).ln()
        + 0.5 * rho_sigma * rho_sigma - rho * t
        - ln_gamma(xi);
    ln_f.exp() * correction
}

/// Power law in eta times the Gaussian, multiplied by the asymptotic series
/// Σ (-1)^k (xi)_2k / (2^k k! eta^2k), truncated at its smallest term.
fn negative_time_form(t: f64, xi: f64, rho: f64, sigma: f64, eta: f64) -> f64 {
    let e2 = eta * eta;
    let mut sum = 1.0;
    let mut term = 1.0;
    for k in 0..100 {
        let k = k as f64;
        let ratio = -(xi + 2.0 * k) * (xi + 2.0 * k + 1.0) / (2.0 * (k + 1.0) * e2);
        if ratio.abs() >= 1.0 {
            break;
        }
        term *= ratio;
        sum += term;
        if term.abs() < 1.0e-16 * sum.abs() {
            break;
        }
    }
    let ln_f = xi * rho.ln() + (xi - 1.0) * sigma.ln() - xi * eta.ln()
        - 0.5 * (t / sigma).powi(2)
        - LN_SQRT_2PI;
    ln_f.exp() * sum
}

fn polynomial(c: &[f64], beta: f64) -> f64 {
    c.iter().rev().fold(0.0, |acc, ci| acc * beta + ci)
}

/// Higher-order corrections to the saddle-point integral, in terms of the
/// curvature `a` and the auxiliary variable `beta`.
fn saddle_point_correction(a: f64, beta: f64) -> f64 {
    1.0 + polynomial(&SADDLE_POINT_C1, beta) / (12.0 * a)
        + polynomial(&SADDLE_POINT_C2, beta) / (288.0 * a * a)
        + polynomial(&SADDLE_POINT_C3, beta) / (51840.0 * a * a * a)
}

/// Uniform saddle-point expansion of the convolution integral in ln(u). The saddle
/// `z` solves z (z + eta) = xi, and each sign of eta uses the root free of
/// cancellation.
fn saddle_point_form(t: f64, xi: f64, rho: f64, sigma: f64, eta: f64) -> f64 {
    let q = (eta * eta + 4.0 * xi).sqrt();

    let ln_ratio = if eta >= 0.0 {
        let z = 2.0 * xi / (eta + q);
        let w = eta + z;
        let a = z * z + xi;
        let beta = z * z / a;
        // divide by Γ(xi) written as the same expansion at beta = 0
        let ln_r = xi * (z / xi).ln() + xi + 0.5 * (xi / a).ln()
            + (saddle_point_correction(a, beta) / saddle_point_correction(xi, 0.0)).ln();
        ln_r - 0.5 * w * w
    } else {
        let w = 2.0 * xi / (q - eta);
        let z = w - eta;
        let a = z * z + xi;
        let beta = z * z / a;
        let ln_r = xi * z.ln() + 0.5 * (2.0 * consts::PI / a).ln()
            + saddle_point_correction(a, beta).ln()
            - ln_gamma(xi);
        ln_r - 0.5 * w * w
    };

    let rho_sigma = rho * sigma;
    let ln_f = xi * rho.ln() + (xi - 1.0) * sigma.ln() - LN_SQRT_2PI
        + 0.5 * rho_sigma * rho_sigma - rho * t
        + ln_ratio;
    ln_f.exp()
}
