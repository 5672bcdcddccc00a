//! Photon arrival-time likelihoods for track reconstruction in ice.
//!
//! The Pandel function, optionally convolved with Gaussian timing
//! jitter, gives the probability density of the delay of a photon
//! emitted by a track and detected by an optical sensor. These
//! densities are combined per sensor (SPE or MPE) and summed over all
//! hit sensors into the log-likelihood of a track hypothesis, for use
//! by an external optimizer.

pub mod constants;
pub mod geometry;
pub mod ice;
pub mod special_functions;
pub mod quadrature;
pub mod pandel;
pub mod likelihood;
pub mod input;
