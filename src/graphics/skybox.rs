use crate::prelude::*;
use bevy::{
    core_pipeline::Skybox,
    prelude::*,
    render::{
        render_asset::RenderAssetUsages,
        render_resource::{
            Extent3d, TextureDimension, TextureFormat, TextureViewDescriptor, TextureViewDimension,
        },
    },
};
use rand::{Rng, SeedableRng, rngs::SmallRng};
use rayon::prelude::*;

const FACE_SIZE: u32 = 1024;
const STARFIELD_SEED: u64 = 0x5EED_0F_57A2;
// fraction of texels holding a star
const STAR_DENSITY: f32 = 0.0015;
const SKYBOX_BRIGHTNESS: f32 = 1000.0;

pub struct SkyboxPlugin;

impl Plugin for SkyboxPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, bake_starfield)
            .add_systems(Update, toggle_skybox);
    }
}

#[derive(Resource)]
struct StarfieldCubemap(Handle<Image>);

/// Six stacked square faces of faint, slightly blue stars.
pub fn starfield_cubemap(face_size: u32, seed: u64) -> Image {
    let row_bytes = face_size as usize * 4;
    let mut texture_data = vec![0u8; row_bytes * face_size as usize * 6];

    texture_data
        .par_chunks_exact_mut(row_bytes)
        .enumerate()
        .for_each(|(row, chunk)| {
            let mut rng = SmallRng::seed_from_u64(seed ^ (row as u64).wrapping_mul(0x9E37_79B9_7F4A_7C15));
            for texel in chunk.chunks_exact_mut(4) {
                let brightness = if rng.random::<f32>() < STAR_DENSITY {
                    rng.random::<f32>().powi(3)
                } else {
                    0.0
                };
                let channel = |tint: f32| (brightness * tint * 255.0) as u8;
                texel.copy_from_slice(&[channel(0.8), channel(0.85), channel(1.0), 255]);
            }
        });

    let mut image = Image::new(
        Extent3d {
            width: face_size,
            height: face_size,
            depth_or_array_layers: 6,
        },
        TextureDimension::D2,
        texture_data,
        TextureFormat::Rgba8UnormSrgb,
        RenderAssetUsages::RENDER_WORLD,
    );
    image.texture_view_descriptor = Some(TextureViewDescriptor {
        dimension: Some(TextureViewDimension::Cube),
        ..default()
    });
    image
}

fn bake_starfield(mut commands: Commands, mut images: ResMut<Assets<Image>>) {
    info!("Baking {0}x{0} starfield skybox", FACE_SIZE);
    let handle = images.add(starfield_cubemap(FACE_SIZE, STARFIELD_SEED));
    commands.insert_resource(StarfieldCubemap(handle));
}

fn toggle_skybox(
    mut commands: Commands,
    galaxy_config: Res<GalaxyConfig>,
    starfield: Option<Res<StarfieldCubemap>>,
    cameras: Query<(Entity, Has<Skybox>), With<Camera3d>>,
) {
    let Some(starfield) = starfield else {
        return;
    };
    for (entity, has_skybox) in &cameras {
        if galaxy_config.show_skybox && !has_skybox {
            commands.entity(entity).insert(Skybox {
                image: starfield.0.clone(),
                brightness: SKYBOX_BRIGHTNESS,
                rotation: Quat::IDENTITY,
            });
        } else if !galaxy_config.show_skybox && has_skybox {
            commands.entity(entity).remove::<Skybox>();
        }
    }
}
