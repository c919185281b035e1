//! Ember math: f64 vectors, intervals and the deterministic RNG stream.

// Vec3 is glam's f64 vector
pub use glam::DVec3;

mod interval;
pub mod rng;
pub mod vec;

pub use interval::Interval;
pub use rng::{RngSeed, RngStream, MAX_RNG_MODULUS};
pub use vec::{Color, Point3, Vec3, VecExt};
