//! Construction of an event likelihood from validated settings

use std::error::Error;

use tracing::debug;

use crate::ice::IceModel;
use crate::input::Config;
use crate::pandel::PdfKind;
use super::*;

/// Collects the settings of an [`EventLikelihood`]: the ice model,
/// the arrival-time strategy, the per-sensor combinator, the Gaussian
/// timing jitter and the noise probability.
///
/// Invalid values are only reported by [`LikelihoodSetup::build`].
#[derive(Copy, Clone, Debug)]
pub struct LikelihoodSetup {
    ice: IceModel,
    pdf: PdfKind,
    dom: DomLikelihood,
    jitter: f64,
    noise_probability: f64,
    missing_geometry: MissingGeometry,
}

impl LikelihoodSetup {
    /// Defaults to the Gauss-convoluted arrival-time distribution,
    /// a 15 ns jitter, the SPE combinator and a noise probability of 1e-8.
    /// Pulsed sensors without a position are skipped.
    pub fn new(ice: IceModel) -> Self {
        LikelihoodSetup {
            ice,
            pdf: PdfKind::GaussConvoluted,
            dom: DomLikelihood::Spe,
            jitter: 15.0,
            noise_probability: 1.0e-8,
            missing_geometry: MissingGeometry::Skip,
        }
    }

    pub fn with_pdf(self, pdf: PdfKind) -> Self {
        LikelihoodSetup {pdf, ..self}
    }

    pub fn with_dom(self, dom: DomLikelihood) -> Self {
        LikelihoodSetup {dom, ..self}
    }

    /// Sets the standard deviation of the timing jitter, in ns.
    /// Ignored by the unconvolved distribution.
    pub fn with_jitter(self, jitter: f64) -> Self {
        LikelihoodSetup {jitter, ..self}
    }

    pub fn with_noise_probability(self, noise_probability: f64) -> Self {
        LikelihoodSetup {noise_probability, ..self}
    }

    pub fn with_missing_geometry(self, missing_geometry: MissingGeometry) -> Self {
        LikelihoodSetup {missing_geometry, ..self}
    }

    pub fn ice(&self) -> &IceModel {
        &self.ice
    }

    pub fn jitter(&self) -> f64 {
        self.jitter
    }

    pub fn noise_probability(&self) -> f64 {
        self.noise_probability
    }

    /// Checks the ice model, the jitter and the noise probability.
    pub fn validate(&self) -> Result<(), LikelihoodError> {
        self.ice.validate()?;

        if !(self.jitter.is_finite() && self.jitter >= 0.0) {
            return Err(LikelihoodError::configuration("jitter", &format!("{} is not a non-negative time", self.jitter)));
        }

        if !(self.noise_probability.is_finite() && self.noise_probability >= 0.0) {
            return Err(LikelihoodError::configuration("noise probability", &format!("{} is not a non-negative probability", self.noise_probability)));
        }

        Ok(())
    }

    /// Validates the settings and creates a likelihood with no geometry or event.
    pub fn build<'g>(&self) -> Result<EventLikelihood<'g>, LikelihoodError> {
        self.validate()?;

        debug!(
            pdf = %self.pdf, dom = %self.dom, jitter = self.jitter,
            noise_probability = self.noise_probability, ice = %self.ice,
            "constructed event likelihood"
        );

        let pdf = self.pdf.build(self.ice, self.jitter);
        Ok(EventLikelihood::new(pdf, self.dom, self.noise_probability, self.missing_geometry))
    }

    /// Reads the `ice` and `likelihood` sections of a configuration file.
    ///
    /// The ice model is either a named `preset`, with any of its seven
    /// parameters overridden individually, or given in full. Every key of
    /// the `likelihood` section is optional.
    pub fn from_config(input: &Config) -> Result<Self, Box<dyn Error>> {
        let ice = match input.read_optional::<String, _>("ice:preset")? {
            Some(name) => {
                let mut ice = IceModel::preset(&name)?;
                let [p1, p0_cs0, p0_cs1, p0_cs2] = ice.distance_coefficients();

                if let Some(l) = input.read_optional("ice:absorption_length")? {
                    ice = ice.with_absorption_length(l);
                }
                if let Some(tau) = input.read_optional("ice:tau")? {
                    ice = ice.with_tau(tau);
                }
                if let Some(l) = input.read_optional("ice:scattering_length")? {
                    ice = ice.with_scattering_length(l);
                }

                ice.with_distance_coefficients(
                    input.read_optional("ice:p1")?.unwrap_or(p1),
                    input.read_optional("ice:p0_cs0")?.unwrap_or(p0_cs0),
                    input.read_optional("ice:p0_cs1")?.unwrap_or(p0_cs1),
                    input.read_optional("ice:p0_cs2")?.unwrap_or(p0_cs2),
                )
            },
            None => IceModel::new(
                input.read("ice:absorption_length")?,
                input.read("ice:tau")?,
                input.read("ice:scattering_length")?,
                input.read("ice:p1")?,
                input.read("ice:p0_cs0")?,
                input.read("ice:p0_cs1")?,
                input.read("ice:p0_cs2")?,
            ),
        };

        let mut setup = LikelihoodSetup::new(ice);

        if let Some(pdf) = input.read_optional::<String, _>("likelihood:pdf")? {
            setup = setup.with_pdf(pdf.parse()?);
        }

        if let Some(dom) = input.read_optional::<String, _>("likelihood:dom")? {
            setup = setup.with_dom(dom.parse()?);
        }

        if let Some(jitter) = input.read_optional("likelihood:jitter")? {
            setup = setup.with_jitter(jitter);
        }

        if let Some(noise) = input.read_optional("likelihood:noise_probability")? {
            setup = setup.with_noise_probability(noise);
        }

        if let Some(strict) = input.read_optional::<bool, _>("likelihood:strict_geometry")? {
            let policy = if strict { MissingGeometry::Fail } else { MissingGeometry::Skip };
            setup = setup.with_missing_geometry(policy);
        }

        Ok(setup)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn invalid_settings() {
        let ice = IceModel::preset("H2").unwrap();

        let bad = [
            LikelihoodSetup::new(ice).with_jitter(-1.0),
            LikelihoodSetup::new(ice).with_jitter(f64::NAN),
            LikelihoodSetup::new(ice).with_noise_probability(-1.0e-8),
            LikelihoodSetup::new(ice).with_noise_probability(f64::INFINITY),
            LikelihoodSetup::new(ice.with_scattering_length(0.0)),
            LikelihoodSetup::new(ice.with_tau(-557.0)),
        ];

        for setup in bad.iter() {
            let result = setup.build();
            println!("{:?} => {:?}", setup, result.as_ref().err());
            match result {
                Err(LikelihoodError::Configuration(_, _)) => {},
                _ => panic!("expected a configuration error"),
            }
        }

        // zero jitter and zero noise are allowed
        let llh = LikelihoodSetup::new(ice).with_jitter(0.0).with_noise_probability(0.0).build();
        assert!(llh.is_ok());
    }

    #[test]
    fn defaults() {
        let ice = IceModel::preset("H2").unwrap();
        let llh = LikelihoodSetup::new(ice).build().unwrap();
        assert_eq!(llh.pdf().kind(), PdfKind::GaussConvoluted);
        assert_eq!(llh.dom(), DomLikelihood::Spe);
        assert_eq!(llh.noise_probability(), 1.0e-8);
        assert_eq!(llh.state(), State::Uninitialized);
    }

    #[test]
    fn from_config() {
        let text = "---
        constants:
          jit: 4.0 * ns
        ice:
          preset: h2
          tau: 600
        likelihood:
          pdf: Unconvolved
          dom: mpe
          jitter: jit
          strict_geometry: true
        ";

        let mut config = Config::from_string(text).unwrap();
        config.with_context("constants").unwrap();
        let setup = LikelihoodSetup::from_config(&config).unwrap();
        println!("{:?}", setup);

        let h2 = IceModel::preset("H2").unwrap();
        assert_eq!(setup.ice().tau(), 600.0);
        assert_eq!(setup.ice().absorption_length(), h2.absorption_length());
        assert_eq!(setup.ice().distance_coefficients(), h2.distance_coefficients());
        assert!(setup.ice().rho() != h2.rho());
        assert_eq!(setup.jitter(), 4.0);
        assert_eq!(setup.noise_probability(), 1.0e-8);

        let llh = setup.build().unwrap();
        assert_eq!(llh.pdf().kind(), PdfKind::Unconvolved);
        assert_eq!(llh.dom(), DomLikelihood::Mpe);

        // explicit parameters, no preset
        let text = "---
        ice:
          absorption_length: 98.0
          tau: 557.0
          scattering_length: 33.3
          p1: 0.9
          p0_cs0: 3.1
          p0_cs1: -3.9
          p0_cs2: 4.6
        ";
        let mut config = Config::from_string(text).unwrap();
        config.with_context("constants").unwrap();
        let setup = LikelihoodSetup::from_config(&config).unwrap();
        assert_eq!(*setup.ice(), h2);

        // incomplete ice model
        let text = "---
        ice:
          absorption_length: 98.0
        ";
        let mut config = Config::from_string(text).unwrap();
        config.with_context("constants").unwrap();
        assert!(LikelihoodSetup::from_config(&config).is_err());

        // unknown names
        let text = "---
        ice:
          preset: H3
        ";
        let mut config = Config::from_string(text).unwrap();
        config.with_context("constants").unwrap();
        assert!(LikelihoodSetup::from_config(&config).is_err());
    }
}
