//! Combination of Pandel probabilities into event log-likelihoods

mod error;
mod pulses;
mod dom;
mod event;
mod setup;

pub use error::*;
pub use pulses::*;
pub use dom::*;
pub use event::*;
pub use setup::*;
