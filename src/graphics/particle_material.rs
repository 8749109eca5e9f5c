use crate::prelude::*;
use bevy::{
    color::ColorToComponents,
    pbr::{MaterialPipeline, MaterialPipelineKey},
    prelude::*,
    reflect::TypePath,
    render::{
        mesh::{Indices, MeshVertexAttribute, MeshVertexBufferLayoutRef, PrimitiveTopology},
        render_asset::RenderAssetUsages,
        render_resource::{
            AsBindGroup, RenderPipelineDescriptor, ShaderRef, ShaderType,
            SpecializedMeshPipelineError, VertexFormat,
        },
    },
};
use bytemuck::{Pod, Zeroable};
use rayon::prelude::*;

const SHADER_ASSET_PATH: &str = "shaders/galaxy_particles.wgsl";

/// Per-vertex size multiplier in `[0, 1)`.
pub const ATTRIBUTE_PARTICLE_SCALE: MeshVertexAttribute =
    MeshVertexAttribute::new("Particle_Scale", 988_540_917, VertexFormat::Float32);

// billboard corners, counter-clockwise
const CORNERS: [[f32; 2]; 4] = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];

pub struct ParticleMaterialPlugin;

impl Plugin for ParticleMaterialPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins(MaterialPlugin::<ParticleMaterial>::default())
            .add_systems(Update, update_particle_size);
    }
}

/// Expands every particle into a camera-facing quad: four vertices sharing the particle
/// position, color and scale, told apart by their corner in `UV_0`.
pub fn particle_mesh(buffer: &ParticleBuffer) -> Mesh {
    let positions: Vec<[f32; 3]> = buffer
        .positions_xyz()
        .par_iter()
        .flat_map_iter(|p| [*p; 4])
        .collect();
    let colors: Vec<[f32; 4]> = buffer
        .colors_rgb()
        .par_iter()
        .flat_map_iter(|&[r, g, b]| [Color::srgb(r, g, b).to_linear().to_f32_array(); 4])
        .collect();
    let scales: Vec<f32> = buffer
        .scales()
        .par_iter()
        .flat_map_iter(|s| [*s; 4])
        .collect();
    let corners: Vec<[f32; 2]> = (0..buffer.len())
        .into_par_iter()
        .flat_map_iter(|_| CORNERS)
        .collect();
    let indices: Vec<u32> = (0..buffer.len() as u32)
        .into_par_iter()
        .flat_map_iter(|i| {
            let v = i * 4;
            [v, v + 1, v + 2, v, v + 2, v + 3]
        })
        .collect();

    Mesh::new(
        PrimitiveTopology::TriangleList,
        RenderAssetUsages::RENDER_WORLD,
    )
    .with_inserted_attribute(Mesh::ATTRIBUTE_POSITION, positions)
    .with_inserted_attribute(Mesh::ATTRIBUTE_UV_0, corners)
    .with_inserted_attribute(Mesh::ATTRIBUTE_COLOR, colors)
    .with_inserted_attribute(ATTRIBUTE_PARTICLE_SCALE, scales)
    .with_inserted_indices(Indices::U32(indices))
}

fn update_particle_size(
    galaxy_config: Res<GalaxyConfig>,
    cloud: Query<&MeshMaterial3d<ParticleMaterial>, With<ParticleCloud>>,
    mut materials: ResMut<Assets<ParticleMaterial>>,
) {
    if !galaxy_config.is_changed() {
        return;
    }
    let Ok(handle) = cloud.single() else {
        return;
    };
    let size = galaxy_config.params.size;
    // get_mut re-uploads the bind group, so only touch it on a real change
    if materials.get(&handle.0).is_some_and(|mat| mat.params.size != size) {
        if let Some(mat) = materials.get_mut(&handle.0) {
            mat.params.size = size;
        }
    }
}

// Mirrored by ParticleParams in galaxy_particles.wgsl
#[derive(ShaderType, Pod, Zeroable, Clone, Copy, Debug, Default)]
#[repr(C)]
pub struct ParticleParams {
    pub size: f32,
    pad: Vec3,
}

#[derive(Asset, TypePath, AsBindGroup, Debug, Clone)]
pub struct ParticleMaterial {
    #[uniform(0)]
    pub params: ParticleParams,
    alpha_mode: AlphaMode,
}

impl ParticleMaterial {
    pub fn new(size: f32) -> Self {
        Self {
            params: ParticleParams {
                size,
                pad: Vec3::ZERO,
            },
            alpha_mode: AlphaMode::Add,
        }
    }
}

impl Material for ParticleMaterial {
    fn vertex_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn fragment_shader() -> ShaderRef {
        SHADER_ASSET_PATH.into()
    }

    fn alpha_mode(&self) -> AlphaMode {
        self.alpha_mode
    }

    fn specialize(
        _pipeline: &MaterialPipeline<Self>,
        descriptor: &mut RenderPipelineDescriptor,
        layout: &MeshVertexBufferLayoutRef,
        _key: MaterialPipelineKey<Self>,
    ) -> Result<(), SpecializedMeshPipelineError> {
        let vertex_layout = layout.0.get_layout(&[
            Mesh::ATTRIBUTE_POSITION.at_shader_location(0),
            Mesh::ATTRIBUTE_UV_0.at_shader_location(1),
            Mesh::ATTRIBUTE_COLOR.at_shader_location(2),
            ATTRIBUTE_PARTICLE_SCALE.at_shader_location(3),
        ])?;
        descriptor.vertex.buffers = vec![vertex_layout];
        descriptor.primitive.cull_mode = None;
        Ok(())
    }
}
