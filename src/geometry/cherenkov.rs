//! Direct Cherenkov light from an infinite track to a sensor

use crate::constants::*;
use crate::ice::IceModel;
use super::{ThreeVector, Track};

/// Position of a sensor relative to a track
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct CherenkovPath {
    /// Signed distance along the track from its anchor to the point of closest approach
    pub d_track: f64,
    /// Perpendicular distance between sensor and track, non-negative
    pub d_approach: f64,
    /// Cosine of the angle between the direct photon path and the vertical
    pub coseta: f64,
}

impl CherenkovPath {
    pub fn between(sensor: ThreeVector, track: &Track) -> Self {
        let dir = track.direction();
        let delta = sensor - track.position();
        let d_track = delta * dir;
        let d_approach = delta.cross(dir).norm();

        let coseta = if d_approach > 0.0 {
            let d_travel = d_approach / SIN_CHERENKOV;
            let d_to_vertex = d_track - d_approach / TAN_CHERENKOV;
            let d_travel_z = delta.z() - d_to_vertex * dir.z();
            d_travel_z / d_travel
        } else {
            // sensor on the track itself
            0.0
        };

        CherenkovPath {d_track, d_approach, coseta}
    }

    /// Arrival time of unscattered light, relative to the track time
    pub fn delay(&self) -> f64 {
        (self.d_track + self.d_approach * EFF_TAN_CHERENKOV) / C_VACUUM
    }
}

/// Expected arrival time of direct light and effective propagation distance
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct GeometryResult {
    pub t_geo: f64,
    pub eff_distance: f64,
}

/// Reduces a (sensor, track) pair to the time of direct light and the
/// effective distance travelled through the ice.
pub fn resolve(sensor: ThreeVector, track: &Track, ice: &IceModel) -> GeometryResult {
    let path = CherenkovPath::between(sensor, track);
    GeometryResult {
        t_geo: track.time() + path.delay(),
        eff_distance: ice.effective_distance(path.d_approach, path.coseta),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn perpendicular_sensor() {
        let ice = IceModel::preset("H2").unwrap();
        let track = Track::new(ThreeVector::default(), ThreeVector::new(0.0, 0.0, 1.0), 0.0);
        let sensor = ThreeVector::new(10.0, 0.0, 0.0);

        let path = CherenkovPath::between(sensor, &track);
        println!("{:?}", path);
        assert_eq!(path.d_track, 0.0);
        assert_eq!(path.d_approach, 10.0);

        // d_travel_z = 0 - (0 - 10 / tan) * 1 is not zero for a vertical track
        let expected = (10.0 / TAN_CHERENKOV) / (10.0 / SIN_CHERENKOV);
        assert!((path.coseta - expected).abs() < 1.0e-12);

        let geometry = resolve(sensor, &track, &ice);
        assert!((geometry.t_geo - 10.0 * EFF_TAN_CHERENKOV / C_VACUUM).abs() < 1.0e-12);
    }

    #[test]
    fn horizontal_track() {
        // photons travel in the horizontal plane, so coseta vanishes
        let ice = IceModel::preset("H2").unwrap();
        let track = Track::new(ThreeVector::default(), ThreeVector::new(0.0, 1.0, 0.0), 0.0);
        let sensor = ThreeVector::new(10.0, 0.0, 0.0);
        let path = CherenkovPath::between(sensor, &track);
        assert_eq!(path.d_track, 0.0);
        assert_eq!(path.d_approach, 10.0);
        assert_eq!(path.coseta, 0.0);

        let geometry = resolve(sensor, &track, &ice);
        println!("{:?}", geometry);
        assert_eq!(geometry.eff_distance, 0.9 * 10.0 + 3.1);
    }

    #[test]
    fn sensor_on_track() {
        let ice = IceModel::preset("H2").unwrap();
        let track = Track::new(ThreeVector::new(1.0, 2.0, 3.0), ThreeVector::new(0.0, 0.0, 1.0), 100.0);
        let sensor = ThreeVector::new(1.0, 2.0, 13.0);
        let path = CherenkovPath::between(sensor, &track);
        assert_eq!(path.d_approach, 0.0);
        assert_eq!(path.coseta, 0.0);

        let geometry = resolve(sensor, &track, &ice);
        assert!((geometry.t_geo - (100.0 + 10.0 / C_VACUUM)).abs() < 1.0e-12);
        assert_eq!(geometry.eff_distance, 3.1);
    }
}
