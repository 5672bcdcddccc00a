//! Infinite track hypotheses

use std::fmt;

use super::ThreeVector;

/// A relativistic particle moving along a straight line, passing through
/// `position` at `time` (ns) with unit `direction`.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Track {
    position: ThreeVector,
    direction: ThreeVector,
    time: f64,
}

impl Track {
    /// Creates a new track, normalizing the direction. A direction
    /// of zero length is kept as it is: the resolved geometry then
    /// degenerates to the vertex distance, but stays finite.
    pub fn new(position: ThreeVector, direction: ThreeVector, time: f64) -> Self {
        Track {
            position,
            direction: direction.normalize().unwrap_or(direction),
            time,
        }
    }

    /// Creates a track from the zenith and azimuth angles of its origin, i.e.
    /// the direction the particle comes *from*, so that a track with zenith
    /// zero is down-going.
    pub fn from_angles(position: ThreeVector, zenith: f64, azimuth: f64, time: f64) -> Self {
        let (sin_theta, cos_theta) = zenith.sin_cos();
        let (sin_phi, cos_phi) = azimuth.sin_cos();
        let direction = ThreeVector::new(
            -sin_theta * cos_phi,
            -sin_theta * sin_phi,
            -cos_theta,
        );
        Track {position, direction, time}
    }

    pub fn position(&self) -> ThreeVector {
        self.position
    }

    pub fn direction(&self) -> ThreeVector {
        self.direction
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    /// Zenith angle of the track origin, between 0 and pi.
    pub fn zenith(&self) -> f64 {
        (-self.direction.z()).clamp(-1.0, 1.0).acos()
    }

    /// Azimuth of the track origin, between 0 and 2 pi.
    pub fn azimuth(&self) -> f64 {
        let phi = (-self.direction.y()).atan2(-self.direction.x());
        if phi < 0.0 {
            phi + 2.0 * std::f64::consts::PI
        } else {
            phi
        }
    }

    /// Returns a copy shifted in time.
    pub fn with_time(self, time: f64) -> Self {
        Track {time, ..self}
    }

    /// Returns a copy with a different anchor position.
    pub fn with_position(self, position: ThreeVector) -> Self {
        Track {position, ..self}
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f,
            "pos = {} m, zenith = {:.2} deg, azimuth = {:.2} deg, t = {:.1} ns",
            self.position, self.zenith().to_degrees(), self.azimuth().to_degrees(), self.time,
        )
    }
}
