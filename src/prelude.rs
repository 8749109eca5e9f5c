pub use crate::galaxy::{
    GalaxyConfig, GalaxyConfigSet, GalaxyConfigUi, GalaxyRng, ParticleCloud, RandomizeGalaxy,
};
pub use galaxy_points::{GalaxyParameters, ParticleBuffer, Rgb};
