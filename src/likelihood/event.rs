//! Log-likelihood of a whole event, for many track hypotheses

use tracing::{debug, warn};

use crate::geometry::{resolve, Track};
use crate::pandel::{clamp_density, ArrivalTime, PdfStrategy};
use super::*;

/// Where the likelihood is in its life cycle.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum State {
    Uninitialized,
    GeometryReady,
    EventReady,
}

/// What to do with a sensor that recorded pulses but is absent from the geometry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MissingGeometry {
    /// Leave the sensor out of the event, with a warning
    Skip,
    /// Reject the pulse map
    Fail,
}

/// Contribution of a single sensor to the log-likelihood.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct HitContribution {
    pub key: SensorKey,
    /// Delay of the first pulse relative to direct light, ns
    pub t_res: f64,
    /// ln(likelihood + noise probability)
    pub log_term: f64,
}

/// The log-likelihood of the first-pulse times and charges of one event,
/// as a function of the track hypothesis.
///
/// The detector geometry is borrowed for the lifetime of the likelihood.
/// Each pulse map replaces the hit cache of the previous event, after
/// which [`EventLikelihood::log_likelihood`] only reads the cache: it may
/// be called from several threads at once for different tracks.
pub struct EventLikelihood<'g> {
    pdf: PdfStrategy,
    dom: DomLikelihood,
    noise_probability: f64,
    missing_geometry: MissingGeometry,
    geometry: Option<&'g Geometry>,
    hits: Vec<HitRecord>,
    state: State,
}

impl<'g> EventLikelihood<'g> {
    /// Assembles a likelihood from already-validated parts,
    /// see [`LikelihoodSetup::build`].
    pub(super) fn new(pdf: PdfStrategy, dom: DomLikelihood, noise_probability: f64, missing_geometry: MissingGeometry) -> Self {
        EventLikelihood {
            pdf,
            dom,
            noise_probability,
            missing_geometry,
            geometry: None,
            hits: Vec::new(),
            state: State::Uninitialized,
        }
    }

    /// Sets the sensor positions. Any cached event is discarded.
    pub fn set_geometry(&mut self, geometry: &'g Geometry) {
        self.geometry = Some(geometry);
        self.hits.clear();
        self.state = State::GeometryReady;
    }

    /// Rebuilds the hit cache from the pulses of a new event: one hit per sensor
    /// that has at least one pulse, with the total charge and the earliest time.
    ///
    /// Fails if no geometry has been set, or if a pulsed sensor has no position
    /// and [`MissingGeometry::Fail`] was requested. The cache is left empty on failure.
    pub fn set_pulse_map(&mut self, pulses: &PulseSeriesMap) -> Result<(), LikelihoodError> {
        let geometry = self.geometry.ok_or(LikelihoodError::NoGeometry)?;

        self.hits.clear();
        self.state = State::GeometryReady;
        let mut skipped = 0;

        for (key, series) in pulses.iter() {
            if series.is_empty() {
                continue;
            }

            let position = match geometry.get(key) {
                Some(r) => *r,
                None => match self.missing_geometry {
                    MissingGeometry::Skip => {
                        warn!(sensor = %key, "sensor recorded pulses but is missing from the geometry, skipping it");
                        skipped += 1;
                        continue;
                    },
                    MissingGeometry::Fail => {
                        self.hits.clear();
                        return Err(LikelihoodError::MissingSensor(*key));
                    },
                },
            };

            if let Some(hit) = HitRecord::from_pulses(*key, position, series) {
                self.hits.push(hit);
            }
        }

        let total_charge: f64 = self.hits.iter().map(|h| h.total_charge).sum();
        debug!(hits = self.hits.len(), skipped, total_charge, "rebuilt hit cache");

        self.state = State::EventReady;
        Ok(())
    }

    /// Returns the delay of the first pulse of `hit` and its log-likelihood term.
    fn evaluate(&self, hit: &HitRecord, track: &Track) -> (f64, f64) {
        let geometry = resolve(hit.position, track, self.pdf.ice());
        let t_res = hit.first_pulse_time - geometry.t_geo;
        let pdf = self.pdf.pdf(t_res, geometry.eff_distance);
        let sf = self.pdf.sf(t_res, geometry.eff_distance);
        let value = clamp_density(self.dom.evaluate(pdf, sf, hit.total_charge));
        (t_res, (value + self.noise_probability).ln())
    }

    /// Sum over all cached hits of ln(likelihood + noise probability).
    /// Zero if no event has been set.
    pub fn log_likelihood(&self, track: &Track) -> f64 {
        self.hits.iter()
            .map(|hit| self.evaluate(hit, track).1)
            .sum()
    }

    /// The per-sensor terms summed by [`EventLikelihood::log_likelihood`].
    pub fn contributions<'a>(&'a self, track: &'a Track) -> impl Iterator<Item = HitContribution> + 'a {
        self.hits.iter().map(move |hit| {
            let (t_res, log_term) = self.evaluate(hit, track);
            HitContribution {key: hit.key, t_res, log_term}
        })
    }

    /// Number of sensors in the hit cache.
    pub fn multiplicity(&self) -> usize {
        self.hits.len()
    }

    pub fn hits(&self) -> &[HitRecord] {
        &self.hits
    }

    pub fn state(&self) -> State {
        self.state
    }

    pub fn pdf(&self) -> &PdfStrategy {
        &self.pdf
    }

    pub fn dom(&self) -> DomLikelihood {
        self.dom
    }

    pub fn noise_probability(&self) -> f64 {
        self.noise_probability
    }
}
