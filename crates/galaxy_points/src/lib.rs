//! Procedural spiral galaxy point clouds.
//!
//! [`generate`] turns a [`GalaxyParameters`] value and a [`RandomSource`] into a
//! [`ParticleBuffer`] of flat attribute arrays ready for upload to a renderer.

mod buffer;
mod error;
mod generator;
pub mod naming;
mod params;
pub mod random;

pub use buffer::{Particle, ParticleBuffer};
pub use error::{GalaxyError, GalaxyResult};
pub use generator::{DRAWS_PER_PARTICLE, branch_angle, generate};
pub use params::{GalaxyParameters, Rgb};
pub use random::{RandomSource, ReplaySource, pick_random};
