//! Survival function of the jittered Pandel distribution

use std::f64::consts;

use statrs::function::erf::erfc;
use statrs::function::gamma::{gamma_ur, ln_gamma};

use crate::ice::IceModel;
use crate::quadrature::integrate;
use super::{pandel_pdf, pandel_sf};

/// Above this value of rho sigma the box approximation is corrected
/// numerically at every delay. Its relative error in the tail is about
/// (rho sigma)^4 / 20.
const BOX_TAIL_RHO_SIGMA: f64 = 0.1;

/// Standard normal survival function
fn gauss_sf(x: f64) -> f64 {
    0.5 * erfc(x / consts::SQRT_2)
}

/// Average over a delay window of width 2a of the Pandel survival function,
/// expressed through the antiderivative
/// G(u) = ∫_u^∞ Q(xi, rho s) ds = (xi/rho) Q(xi+1, rho u) - u Q(xi, rho u).
fn box_average(t: f64, a: f64, xi: f64, rho: f64) -> f64 {
    let g = |u: f64| -> f64 {
        let x = rho * u;
        if x <= 0.0 {
            xi / rho - u
        } else {
            (xi / rho) * gamma_ur(xi + 1.0, x) - u * gamma_ur(xi, x)
        }
    };
    (g(t - a) - g(t + a)) / (2.0 * a)
}

/// Probability that a photon, which travelled an effective distance `d` (m),
/// is detected later than `t` (ns), given Gaussian timing jitter `sigma >= 0` (ns).
///
/// Reduces exactly to [`pandel_sf`] if `sigma` is zero, and to the Gaussian
/// survival function if `d <= 0`. Otherwise the Gaussian is replaced by a
/// box of equal variance, half-width sqrt(3) sigma, which can be integrated
/// against the Pandel function in closed form. For xi < 5 the Pandel function
/// is sharply peaked near zero delay, so for -8 sigma < t < 30 sigma the
/// difference between box and Gaussian is integrated numerically over the
/// window t ± 8 sigma. If rho sigma exceeds 0.1 the same correction is
/// applied for all t > -8 sigma. The result is clamped to [0, 1].
pub fn convolved_sf(t: f64, d: f64, ice: &IceModel, sigma: f64) -> f64 {
    if sigma == 0.0 {
        return pandel_sf(t, d, ice);
    }

    // the Gaussian is symmetric in the sign of sigma
    let sigma = sigma.abs();
    let xi = d / ice.scattering_length();
    if t.is_nan() || xi.is_nan() || sigma.is_nan() {
        return 0.0;
    }
    if sigma.is_infinite() {
        return 0.5;
    }
    if xi <= 0.0 {
        return gauss_sf(t / sigma);
    }
    if t == f64::NEG_INFINITY || xi == f64::INFINITY {
        return 1.0;
    }
    if t == f64::INFINITY {
        return 0.0;
    }

    let rho = ice.rho();
    let a = 3.0f64.sqrt() * sigma;
    let mut value = box_average(t, a, xi, rho);

    let corrected = if rho * sigma > BOX_TAIL_RHO_SIGMA {
        t > -8.0 * sigma
    } else {
        xi < 5.0 && t > -8.0 * sigma && t < 30.0 * sigma
    };

    if corrected {
        value += singularity_correction(t, d, ice, sigma, value.abs());
    }

    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}

/// ∫ p(u) [Φ((u-t)/sigma) - B(u-t)] du, where B is the box survival function,
/// over the window where the two differ. Integration stops once the error is
/// small compared to `scale`, the uncorrected survival probability.
fn singularity_correction(t: f64, d: f64, ice: &IceModel, sigma: f64, scale: f64) -> f64 {
    let xi = d / ice.scattering_length();
    let rho = ice.rho();
    let a = 3.0f64.sqrt() * sigma;

    let kernel = |x: f64| -> f64 {
        let b = ((x + a) / (2.0 * a)).clamp(0.0, 1.0);
        gauss_sf(-x / sigma) - b
    };

    let abs_tol = 1.0e-12 * scale;
    let lo = (t - 8.0 * sigma).max(0.0);
    let hi = t + 8.0 * sigma;

    // split at the kinks of the box
    let mut cuts = [lo, t - a, t + a, hi];
    for c in cuts[1..3].iter_mut() {
        *c = c.clamp(lo, hi);
    }

    let mut total = 0.0;
    for pair in cuts.windows(2) {
        let (l, h) = (pair[0], pair[1]);
        if h <= l {
            continue;
        }
        let (part, _) = if l == 0.0 && xi < 1.0 {
            // with w = u^xi, p(u) du = rho^xi e^(-rho u) / Γ(xi + 1) dw
            let c0 = (xi * rho.ln() - ln_gamma(xi + 1.0)).exp();
            integrate(
                |w| {
                    let u = if w > 0.0 { w.powf(1.0 / xi) } else { 0.0 };
                    c0 * (-rho * u).exp() * kernel(u - t)
                },
                0.0, h.powf(xi), 1.0e-10, abs_tol, 64,
            )
        } else {
            integrate(|u| pandel_pdf(u, d, ice) * kernel(u - t), l, h, 1.0e-10, abs_tol, 64)
        };
        total += part;
    }

    total
}

#[cfg(test)]
mod tests {
    use super::*;

    /// ∫ p(u) Φ((u-t)/sigma) du, evaluated numerically.
    fn brute_force_sf(t: f64, d: f64, ice: &IceModel, sigma: f64) -> f64 {
        let xi = d / ice.scattering_length();
        let rho = ice.rho();
        let u_max = (t + 12.0 * sigma).max(0.0) + (xi + 12.0 * xi.sqrt() + 40.0) / rho;
        let mut cuts: Vec<f64> = vec![
            0.0, 2.0 * sigma, 10.0 * sigma,
            t - 10.0 * sigma, t - 2.0 * sigma, t, t + 2.0 * sigma, t + 10.0 * sigma,
            (xi - 1.0).max(0.0) / rho, (xi + 3.0 * xi.sqrt()) / rho, (xi + 8.0 * xi.sqrt() + 8.0) / rho,
        ];
        cuts.retain(|c| *c >= 0.0 && *c < u_max);
        cuts.sort_by(|a, b| a.total_cmp(b));
        cuts.dedup();
        cuts.push(u_max);

        let mut total = 0.0;
        for pair in cuts.windows(2) {
            let (l, h) = (pair[0], pair[1]);
            let (part, _) = if l == 0.0 && xi < 1.0 {
                let c0 = (xi * rho.ln() - ln_gamma(xi + 1.0)).exp();
                integrate(
                    |w| {
                        let u = if w > 0.0 { w.powf(1.0 / xi) } else { 0.0 };
                        c0 * (-rho * u).exp() * gauss_sf((t - u) / sigma)
                    },
                    0.0, h.powf(xi), 1.0e-11, 0.0, 400,
                )
            } else {
                integrate(|u| pandel_pdf(u, d, ice) * gauss_sf((t - u) / sigma), l, h, 1.0e-11, 0.0, 400)
            };
            total += part;
        }
        total
    }

    #[test]
    fn zero_jitter() {
        let ice = IceModel::preset("H2").unwrap();
        for t in [-5.0, 0.0, 1.0e-3, 20.0, 700.0].iter() {
            for d in [-1.0, 0.0, 3.0, 40.0, 250.0].iter() {
                assert_eq!(convolved_sf(*t, *d, &ice, 0.0), pandel_sf(*t, *d, &ice));
            }
        }
    }

    /// Short absorption and scattering lengths, rho = 0.0124 / ns
    fn dusty_ice() -> IceModel {
        IceModel::new(30.0, 200.0, 8.0, 0.9, 3.1, -3.9, 4.6)
    }

    #[test]
    fn cross_validation() {
        let ice = IceModel::preset("H2").unwrap();
        let mut worst: f64 = 0.0;
        for sigma in [2.0, 15.0].iter() {
            for xi in [0.001, 0.01, 0.3, 1.0, 2.5, 4.99, 5.0, 8.0, 20.0].iter() {
                let d = xi * ice.scattering_length();
                for ts in [-20.0, -10.0, -6.0, -3.0, -1.8, -1.7, -1.0, -0.5, 0.0, 0.5, 1.0, 1.7, 1.8, 3.0, 7.99, 8.01, 15.0, 30.0, 100.0, 300.0].iter() {
                    let t = ts * sigma;
                    let sf = convolved_sf(t, d, &ice, *sigma);
                    let target = brute_force_sf(t, d, &ice, *sigma);
                    let error = (sf - target).abs() / target;
                    worst = worst.max(error);
                    if error > 1.0e-4 {
                        println!("sigma = {}, xi = {}, t = {} sigma: sf = {:.6e}, target = {:.6e}, err = {:.3e}", sigma, xi, ts, sf, target, error);
                    }
                    assert!(error < 1.0e-3);
                }
            }
        }
        println!("worst relative error = {:.3e}", worst);
    }

    #[test]
    fn wide_jitter() {
        // rho sigma = 0.49: the box alone is 0.3% off in the tail
        let ice = dusty_ice();
        let sigma = 40.0;
        println!("rho sigma = {:.3}", ice.rho() * sigma);
        let mut worst: f64 = 0.0;
        for xi in [0.01, 0.05, 0.7, 2.0, 4.99, 5.0, 8.0, 20.0].iter() {
            let d = xi * ice.scattering_length();
            for ts in [-10.0, -3.0, 0.0, 1.8, 8.01, 29.99, 30.001, 45.0, 100.0].iter() {
                let t = ts * sigma;
                let sf = convolved_sf(t, d, &ice, sigma);
                let target = brute_force_sf(t, d, &ice, sigma);
                let error = (sf - target).abs() / target;
                worst = worst.max(error);
                if error > 1.0e-6 {
                    println!("xi = {}, t = {} sigma: sf = {:.6e}, target = {:.6e}, err = {:.3e}", xi, ts, sf, target, error);
                }
                assert!(error < 1.0e-3);
            }
        }
        println!("worst relative error = {:.3e}", worst);
    }

    #[test]
    fn monotonic_with_limits() {
        for (ice, sigma) in [(IceModel::preset("H2").unwrap(), 10.0), (dusty_ice(), 40.0)].iter() {
            check_monotonic(ice, *sigma);
        }
    }

    fn check_monotonic(ice: &IceModel, sigma: f64) {
        for xi in [0.005, 0.4, 1.0, 3.0, 4.99, 5.0, 30.0].iter() {
            let d = xi * ice.scattering_length();
            let mut last = 1.0;
            for i in 0..=400 {
                let t = -20.0 * sigma + (i as f64) * 0.25 * sigma;
                let sf = convolved_sf(t, d, ice, sigma);
                assert!(sf >= 0.0 && sf <= 1.0);
                assert!(sf <= last + 1.0e-12, "xi = {}, t = {}: sf = {:e} > {:e}", xi, t, sf, last);
                last = sf;
            }

            let early = convolved_sf(-10.0 * sigma, d, ice, sigma);
            let late_t = 10.0 * sigma + (xi + 40.0 * xi.sqrt() + 60.0) / ice.rho();
            let late = convolved_sf(late_t, d, ice, sigma);
            println!("xi = {}: sf(-10 sigma) = {:.6e}, sf({:.0} ns) = {:.6e}", xi, early, late_t, late);
            assert!((1.0 - early).abs() < 1.0e-4);
            assert!(late < 1.0e-4);
        }
    }

    #[test]
    fn degenerate_distance() {
        let ice = IceModel::preset("H2").unwrap();
        let sigma = 3.0;
        assert!((convolved_sf(0.0, 0.0, &ice, sigma) - 0.5).abs() < 1.0e-15);
        assert!((convolved_sf(-30.0, -1.0, &ice, sigma) - 1.0).abs() < 1.0e-15);
        assert_eq!(convolved_sf(f64::NAN, 10.0, &ice, sigma), 0.0);
        assert_eq!(convolved_sf(f64::INFINITY, 10.0, &ice, sigma), 0.0);
        assert_eq!(convolved_sf(f64::NEG_INFINITY, 10.0, &ice, sigma), 1.0);
        assert_eq!(convolved_sf(5.0, 10.0, &ice, -sigma), convolved_sf(5.0, 10.0, &ice, sigma));
        assert_eq!(convolved_sf(5.0, 10.0, &ice, f64::NAN), 0.0);
        assert_eq!(convolved_sf(5.0e-324, 10.0, &ice, 0.0), 1.0);
    }
}
