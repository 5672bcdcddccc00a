//! Likelihood configuration and event-setup errors

use std::fmt;
use std::error::Error;

use super::SensorKey;

pub enum LikelihoodError {
    /// A name that does not identify a known option, e.g. an unknown ice preset
    Conversion(String, String),
    /// A parameter that is out of range: the field and the reason
    Configuration(String, String),
    /// A pulse map was supplied before the detector geometry
    NoGeometry,
    /// A sensor recorded pulses but has no position in the geometry
    MissingSensor(SensorKey),
}

impl fmt::Display for LikelihoodError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            LikelihoodError::Conversion(s, t) => write!(f, "'{}' does not specify a valid {}", s, t),
            LikelihoodError::Configuration(field, reason) => write!(f, "invalid {}: {}", field, reason),
            LikelihoodError::NoGeometry => write!(f, "pulse map supplied before the detector geometry"),
            LikelihoodError::MissingSensor(key) => write!(f, "sensor {} recorded pulses but is missing from the geometry", key),
        }
    }
}

impl fmt::Debug for LikelihoodError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}", self)
    }
}

impl Error for LikelihoodError {}

impl LikelihoodError {
    pub fn conversion(name: &str, target: &str) -> Self {
        Self::Conversion(name.to_owned(), target.to_owned())
    }

    pub fn configuration(field: &str, reason: &str) -> Self {
        Self::Configuration(field.to_owned(), reason.to_owned())
    }
}
