//! Optical properties of the ice

use std::fmt;
use std::str::FromStr;

use crate::constants::*;
use crate::likelihood::LikelihoodError;

/// Bundle of the Pandel parameters of a homogeneous ice model, with
/// lengths in m and times in ns.
///
/// The first three are the absorption length, the Pandel time scale
/// `tau` and the effective scattering length. The remaining four define
/// the effective distance between a track and a sensor,
/// `P1 * d + P0_CS0 + P0_CS1 * cos(eta) + P0_CS2 * cos(eta)^2`,
/// where `d` is the perpendicular distance and `eta` is the angle
/// between the photon direction and the vertical.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IceModel {
    absorption_length: f64,
    tau: f64,
    scattering_length: f64,
    p1: f64,
    p0_cs0: f64,
    p0_cs1: f64,
    p0_cs2: f64,
    rho: f64,
}

impl IceModel {
    /// Creates a new ice model from its seven parameters.
    ///
    /// The three lengths must be finite and positive. This is not checked
    /// here, see [`IceModel::validate`].
    pub fn new(absorption_length: f64, tau: f64, scattering_length: f64, p1: f64, p0_cs0: f64, p0_cs1: f64, p0_cs2: f64) -> Self {
        let rho = 1.0 / tau + C_ICE_GROUP / absorption_length;
        IceModel {
            absorption_length,
            tau,
            scattering_length,
            p1,
            p0_cs0,
            p0_cs1,
            p0_cs2,
            rho,
        }
    }

    /// Returns the named preset. Names are case-insensitive.
    pub fn preset(name: &str) -> Result<Self, LikelihoodError> {
        match name.to_ascii_uppercase().as_str() {
            "H2" => Ok(IceModel::new(98.0, 557.0, 33.3, 0.9, 3.1, -3.9, 4.6)),
            _ => Err(LikelihoodError::conversion(name, "ice model preset")),
        }
    }

    /// Checks that the propagation lengths are finite and positive, and that the
    /// effective-distance coefficients are finite.
    pub fn validate(&self) -> Result<(), LikelihoodError> {
        let lengths = [
            ("absorption length", self.absorption_length),
            ("tau", self.tau),
            ("scattering length", self.scattering_length),
        ];

        for (name, value) in lengths.iter() {
            if !(value.is_finite() && *value > 0.0) {
                return Err(LikelihoodError::configuration(name, &format!("{} is not a positive length", value)));
            }
        }

        if ![self.p1, self.p0_cs0, self.p0_cs1, self.p0_cs2].iter().all(|p| p.is_finite()) {
            return Err(LikelihoodError::configuration("effective distance coefficients", "must be finite"));
        }

        Ok(())
    }

    /// Returns a copy with the absorption length replaced (and `rho` updated).
    pub fn with_absorption_length(self, absorption_length: f64) -> Self {
        IceModel::new(absorption_length, self.tau, self.scattering_length, self.p1, self.p0_cs0, self.p0_cs1, self.p0_cs2)
    }

    /// Returns a copy with the Pandel time scale replaced (and `rho` updated).
    pub fn with_tau(self, tau: f64) -> Self {
        IceModel::new(self.absorption_length, tau, self.scattering_length, self.p1, self.p0_cs0, self.p0_cs1, self.p0_cs2)
    }

    /// Returns a copy with the scattering length replaced.
    pub fn with_scattering_length(self, scattering_length: f64) -> Self {
        IceModel {scattering_length, ..self}
    }

    /// Returns a copy with the effective distance coefficients replaced.
    pub fn with_distance_coefficients(self, p1: f64, p0_cs0: f64, p0_cs1: f64, p0_cs2: f64) -> Self {
        IceModel {p1, p0_cs0, p0_cs1, p0_cs2, ..self}
    }

    pub fn absorption_length(&self) -> f64 {
        self.absorption_length
    }

    pub fn tau(&self) -> f64 {
        self.tau
    }

    pub fn scattering_length(&self) -> f64 {
        self.scattering_length
    }

    /// The effective distance coefficients `[P1, P0_CS0, P0_CS1, P0_CS2]`.
    pub fn distance_coefficients(&self) -> [f64; 4] {
        [self.p1, self.p0_cs0, self.p0_cs1, self.p0_cs2]
    }

    /// Inverse time scale of the Pandel function, units of 1/ns
    pub fn rho(&self) -> f64 {
        self.rho
    }

    /// Effective propagation distance for a sensor at perpendicular distance
    /// `d_approach` from the track, seeing light arriving at `coseta`.
    pub fn effective_distance(&self, d_approach: f64, coseta: f64) -> f64 {
        self.p1 * d_approach + self.p0_cs0 + self.p0_cs1 * coseta + self.p0_cs2 * coseta * coseta
    }
}

impl FromStr for IceModel {
    type Err = LikelihoodError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        IceModel::preset(s.trim())
    }
}

impl fmt::Display for IceModel {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
            "abs = {} m, tau = {} ns, scat = {} m, P = [{}, {}, {}, {}], rho = {:.6e} / ns",
            self.absorption_length, self.tau, self.scattering_length,
            self.p1, self.p0_cs0, self.p0_cs1, self.p0_cs2, self.rho,
        )
    }
}
