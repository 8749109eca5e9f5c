use bevy::prelude::*;

mod galaxy_config;
mod spawn_particles;

pub use galaxy_config::{
    GalaxyConfig, GalaxyConfigPlugin, GalaxyConfigSet, GalaxyConfigUi, GalaxyRng, RandomizeGalaxy,
};
pub use spawn_particles::{ParticleCloud, SpawnParticlesPlugin};

pub struct GalaxyPlugin;

impl Plugin for GalaxyPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((GalaxyConfigPlugin, SpawnParticlesPlugin));
    }
}
