//! Vectors, tracks and the Cherenkov geometry between tracks and sensors

mod three_vector;
mod track;
mod cherenkov;

pub use three_vector::*;
pub use track::*;
pub use cherenkov::*;
