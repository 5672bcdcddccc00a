//! Sensors, pulses and the per-event hit cache

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::geometry::ThreeVector;
use super::LikelihoodError;

/// Identifies a sensor by its string and its position on the string.
#[derive(Copy, Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SensorKey {
    pub string: i32,
    pub om: u32,
}

impl SensorKey {
    pub fn new(string: i32, om: u32) -> Self {
        SensorKey {string, om}
    }
}

impl fmt::Display for SensorKey {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}-{}", self.string, self.om)
    }
}

impl FromStr for SensorKey {
    type Err = LikelihoodError;

    /// Parses keys of the form "string-om", e.g. "21-30" or "-3-2".
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        // skip a leading sign on the string number
        let split = s.char_indices()
            .skip(1)
            .find(|(_, c)| *c == '-')
            .map(|(i, _)| i)
            .ok_or_else(|| LikelihoodError::conversion(s, "sensor key"))?;
        let string = s[..split].parse::<i32>()
            .map_err(|_| LikelihoodError::conversion(s, "sensor key"))?;
        let om = s[split+1..].parse::<u32>()
            .map_err(|_| LikelihoodError::conversion(s, "sensor key"))?;
        Ok(SensorKey {string, om})
    }
}

/// A single pulse: arrival time (ns) and charge (photoelectrons).
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Pulse {
    pub time: f64,
    pub charge: f64,
}

impl Pulse {
    pub fn new(time: f64, charge: f64) -> Self {
        Pulse {time, charge}
    }
}

/// Sensor positions, in m
pub type Geometry = BTreeMap<SensorKey, ThreeVector>;

/// Pulses recorded by each sensor in one event
pub type PulseSeriesMap = BTreeMap<SensorKey, Vec<Pulse>>;

/// Summary of the pulses recorded by one sensor.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HitRecord {
    pub key: SensorKey,
    pub position: ThreeVector,
    pub total_charge: f64,
    pub first_pulse_time: f64,
}

impl HitRecord {
    /// Summarizes the pulses of one sensor, or returns None if there
    /// are no pulses with a usable arrival time.
    pub fn from_pulses(key: SensorKey, position: ThreeVector, pulses: &[Pulse]) -> Option<Self> {
        let (total_charge, first_pulse_time) = pulses.iter()
            .fold(
                (0.0, f64::INFINITY),
                |(q, t), p| (q + p.charge, if p.time < t { p.time } else { t })
            );

        if first_pulse_time.is_finite() {
            Some(HitRecord {key, position, total_charge, first_pulse_time})
        } else {
            None
        }
    }
}
