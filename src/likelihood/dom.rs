//! Likelihood of the first pulse seen by a single sensor

use std::fmt;
use std::str::FromStr;

use super::LikelihoodError;

/// How the arrival-time distribution of one photon turns into the
/// likelihood of the earliest pulse of a sensor.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DomLikelihood {
    /// Single photoelectron: only the first photon is considered
    Spe,
    /// Multiple photoelectrons: the first of n photons, n being the
    /// rounded total charge
    Mpe,
}

impl DomLikelihood {
    /// Combines the density and survival function at the observed delay
    /// with the total charge `npe` of the sensor.
    pub fn evaluate(&self, pdf: f64, sf: f64, npe: f64) -> f64 {
        match self {
            DomLikelihood::Spe => pdf,
            DomLikelihood::Mpe => {
                if npe < 1.5 {
                    pdf
                } else {
                    // density of the minimum of n samples
                    let n = npe.round();
                    pdf * n * sf.powf(n - 1.0)
                }
            },
        }
    }
}

impl FromStr for DomLikelihood {
    type Err = LikelihoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "SPE" | "SPE1ST" => Ok(DomLikelihood::Spe),
            "MPE" => Ok(DomLikelihood::Mpe),
            _ => Err(LikelihoodError::conversion(s, "sensor likelihood (SPE or MPE)")),
        }
    }
}

impl fmt::Display for DomLikelihood {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DomLikelihood::Spe => write!(f, "SPE"),
            DomLikelihood::Mpe => write!(f, "MPE"),
        }
    }
}
