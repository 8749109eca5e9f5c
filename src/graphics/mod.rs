use bevy::prelude::*;

mod particle_material;
mod skybox;

pub use particle_material::{ParticleMaterial, particle_mesh};

pub struct GraphicsPlugin;

impl Plugin for GraphicsPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            particle_material::ParticleMaterialPlugin,
            skybox::SkyboxPlugin,
        ));
    }
}
