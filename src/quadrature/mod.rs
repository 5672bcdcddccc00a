//! Numerical integration

mod adaptive;

pub use adaptive::*;
