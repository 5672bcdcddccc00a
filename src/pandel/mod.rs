//! Arrival-time distributions of scattered photons

use std::fmt;
use std::str::FromStr;

use enum_dispatch::enum_dispatch;

use crate::ice::IceModel;
use crate::likelihood::LikelihoodError;

mod unconvolved;
mod convolved;
mod survival;

pub use unconvolved::*;
pub use convolved::*;
pub use survival::*;

/// Densities are non-negative and finite; anything else, NaN included, maps to zero.
pub(crate) fn clamp_density(value: f64) -> f64 {
    if value > 0.0 {
        value.min(f64::MAX)
    } else {
        0.0
    }
}

/// Distribution of the delay `t` (ns) of the first photon seen by a sensor,
/// relative to direct light, given the effective distance `d` (m) it travelled.
#[enum_dispatch]
pub trait ArrivalTime {
    /// Probability density of the delay.
    fn pdf(&self, t: f64, d: f64) -> f64;
    /// Probability that the delay is larger than `t`.
    fn sf(&self, t: f64, d: f64) -> f64;
    /// The ice model the distribution is defined for.
    fn ice(&self) -> &IceModel;
}

/// The Pandel function without timing jitter.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Unconvolved {
    ice: IceModel,
}

impl Unconvolved {
    pub fn new(ice: IceModel) -> Self {
        Unconvolved {ice}
    }
}

impl ArrivalTime for Unconvolved {
    fn pdf(&self, t: f64, d: f64) -> f64 {
        pandel_pdf(t, d, &self.ice)
    }

    fn sf(&self, t: f64, d: f64) -> f64 {
        pandel_sf(t, d, &self.ice)
    }

    fn ice(&self) -> &IceModel {
        &self.ice
    }
}

/// The Pandel function convolved with Gaussian jitter of width `sigma` (ns).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GaussConvoluted {
    ice: IceModel,
    sigma: f64,
}

impl GaussConvoluted {
    /// Creates the distribution for jitter `sigma`, which must be non-negative.
    pub fn new(ice: IceModel, sigma: f64) -> Self {
        GaussConvoluted {ice, sigma}
    }

    pub fn sigma(&self) -> f64 {
        self.sigma
    }
}

impl ArrivalTime for GaussConvoluted {
    fn pdf(&self, t: f64, d: f64) -> f64 {
        convolved_pdf(t, d, &self.ice, self.sigma)
    }

    fn sf(&self, t: f64, d: f64) -> f64 {
        convolved_sf(t, d, &self.ice, self.sigma)
    }

    fn ice(&self) -> &IceModel {
        &self.ice
    }
}

/// The arrival-time distribution chosen at configuration time.
#[enum_dispatch(ArrivalTime)]
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum PdfStrategy {
    Unconvolved(Unconvolved),
    GaussConvoluted(GaussConvoluted),
}

impl PdfStrategy {
    pub fn kind(&self) -> PdfKind {
        match self {
            PdfStrategy::Unconvolved(_) => PdfKind::Unconvolved,
            PdfStrategy::GaussConvoluted(_) => PdfKind::GaussConvoluted,
        }
    }
}

/// Name of an arrival-time distribution, as given in a configuration.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum PdfKind {
    Unconvolved,
    GaussConvoluted,
}

impl PdfKind {
    /// Builds the distribution. The jitter is ignored by the unconvolved Pandel function.
    pub fn build(self, ice: IceModel, jitter: f64) -> PdfStrategy {
        match self {
            PdfKind::Unconvolved => Unconvolved::new(ice).into(),
            PdfKind::GaussConvoluted => GaussConvoluted::new(ice, jitter).into(),
        }
    }
}

impl FromStr for PdfKind {
    type Err = LikelihoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "unconvolved" | "pandel" => Ok(PdfKind::Unconvolved),
            "gaussconvoluted" | "gaussconvolved" | "convolved" => Ok(PdfKind::GaussConvoluted),
            _ => Err(LikelihoodError::conversion(s, "arrival-time distribution")),
        }
    }
}

impl fmt::Display for PdfKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            PdfKind::Unconvolved => write!(f, "Unconvolved"),
            PdfKind::GaussConvoluted => write!(f, "GaussConvoluted"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_kind() {
        assert_eq!("GaussConvoluted".parse::<PdfKind>().unwrap(), PdfKind::GaussConvoluted);
        assert_eq!(" unconvolved".parse::<PdfKind>().unwrap(), PdfKind::Unconvolved);
        assert!("Spline".parse::<PdfKind>().is_err());
        assert_eq!(PdfKind::GaussConvoluted.to_string().parse::<PdfKind>().unwrap(), PdfKind::GaussConvoluted);
    }

    #[test]
    fn dispatch() {
        let ice = IceModel::preset("H2").unwrap();
        let plain = PdfKind::Unconvolved.build(ice, 15.0);
        let jittered = PdfKind::GaussConvoluted.build(ice, 15.0);
        assert_eq!(plain.kind(), PdfKind::Unconvolved);
        assert_eq!(jittered.kind(), PdfKind::GaussConvoluted);

        for (t, d) in [(-10.0, 20.0), (30.0, 45.0), (400.0, 200.0)].iter() {
            assert_eq!(plain.pdf(*t, *d), pandel_pdf(*t, *d, &ice));
            assert_eq!(plain.sf(*t, *d), pandel_sf(*t, *d, &ice));
            assert_eq!(jittered.pdf(*t, *d), convolved_pdf(*t, *d, &ice, 15.0));
            assert_eq!(jittered.sf(*t, *d), convolved_sf(*t, *d, &ice, 15.0));
        }

        // no jitter, no difference
        let zero = PdfKind::GaussConvoluted.build(ice, 0.0);
        assert_eq!(zero.pdf(12.0, 40.0), plain.pdf(12.0, 40.0));
        assert_eq!(zero.sf(12.0, 40.0), plain.sf(12.0, 40.0));
        assert_eq!(zero.ice(), &ice);
    }

    #[test]
    fn clamping() {
        assert_eq!(clamp_density(f64::NAN), 0.0);
        assert_eq!(clamp_density(-1.0e-300), 0.0);
        assert_eq!(clamp_density(f64::INFINITY), f64::MAX);
        assert_eq!(clamp_density(0.25), 0.25);
    }
}
