//! The Pandel function: a Gamma distribution of photon delays

use statrs::function::gamma::{gamma_ur, ln_gamma};

use crate::ice::IceModel;

/// Probability density of the delay `t` (ns) of a photon that travelled an
/// effective distance `d` (m) through the ice,
/// rho (rho t)^(xi-1) e^(-rho t) / Γ(xi), with xi = d / scattering length.
///
/// Vanishes for `t <= 0` (no photon arrives before direct light) and
/// for `d <= 0`.
pub fn pandel_pdf(t: f64, d: f64, ice: &IceModel) -> f64 {
    if t <= 0.0 || d <= 0.0 {
        return 0.0;
    }

    let xi = d / ice.scattering_length();
    let rho = ice.rho();
    let value = (rho.ln() + (xi - 1.0) * (rho * t).ln() - rho * t - ln_gamma(xi)).exp();
    super::clamp_density(value)
}

/// Probability that a photon arrives later than `t`, i.e. the upper
/// regularized incomplete gamma function Q(xi, rho t).
///
/// Equal to one for `t <= 0` and zero for `d <= 0`.
pub fn pandel_sf(t: f64, d: f64, ice: &IceModel) -> f64 {
    if t <= 0.0 {
        return 1.0;
    }
    if d <= 0.0 {
        return 0.0;
    }

    let xi = d / ice.scattering_length();
    let x = ice.rho() * t;

    // infinitely late, or nonsense, input
    if !(x.is_finite() && xi.is_finite()) {
        return 0.0;
    }

    // a delay or distance too small to be represented once scaled
    if x <= 0.0 {
        return 1.0;
    }
    if xi <= 0.0 {
        return 0.0;
    }

    let q = gamma_ur(xi, x);
    if q.is_nan() {
        0.0
    } else {
        q.clamp(0.0, 1.0)
    }
}
