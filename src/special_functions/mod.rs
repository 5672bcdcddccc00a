//! Custom implementations of special functions not
//! provided by the standard lib or statrs.

mod hypergeometric;

pub use hypergeometric::*;
