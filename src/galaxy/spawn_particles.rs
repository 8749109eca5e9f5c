use crate::graphics::{ParticleMaterial, particle_mesh};
use crate::prelude::*;
use bevy::pbr::{NotShadowCaster, NotShadowReceiver};
use bevy::prelude::*;
use bevy::tasks::{AsyncComputeTaskPool, Task, block_on, futures_lite::future};
use galaxy_points::GalaxyResult;
use rand::{Rng, SeedableRng, rngs::StdRng};

pub struct SpawnParticlesPlugin;

impl Plugin for SpawnParticlesPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(ParticleGenerationControl {
            generation: -1,
            task: None,
        })
        .add_systems(Startup, spawn_particle_cloud)
        .add_systems(
            Update,
            (start_generation, finish_generation, rotate_particle_cloud)
                .chain()
                .after(GalaxyConfigSet),
        );
    }
}

#[derive(Component)]
pub struct ParticleCloud;

#[derive(Resource)]
struct ParticleGenerationControl {
    generation: i32,
    task: Option<Task<GalaxyResult<ParticleBuffer>>>,
}

fn spawn_particle_cloud(
    mut commands: Commands,
    mut materials: ResMut<Assets<ParticleMaterial>>,
    galaxy_config: Res<GalaxyConfig>,
) {
    let material = materials.add(ParticleMaterial::new(galaxy_config.params.size));
    commands.spawn((
        ParticleCloud,
        Transform::IDENTITY,
        Visibility::Inherited,
        MeshMaterial3d(material),
        bevy::render::view::NoFrustumCulling,
        NotShadowCaster,
        NotShadowReceiver,
    ));
}

/// Kicks off a background generation whenever the config generation moves.
/// Replacing the task drops (and cancels) any older one still running.
fn start_generation(
    mut control: ResMut<ParticleGenerationControl>,
    galaxy_config: Res<GalaxyConfig>,
    mut rng: ResMut<GalaxyRng>,
) {
    if control.generation == galaxy_config.generation {
        return;
    }
    control.generation = galaxy_config.generation;

    let params = galaxy_config.params.clone();
    let seed: u64 = rng.0.random();
    debug!(
        "Generating galaxy {} ({} particles, seed {})",
        control.generation, params.count, seed
    );

    control.task = Some(AsyncComputeTaskPool::get().spawn(async move {
        galaxy_points::generate(&params, &mut StdRng::seed_from_u64(seed))
    }));
}

/// Swaps the finished buffer into the scene in one step. Until then the previous
/// mesh keeps rendering, and on error it stays.
fn finish_generation(
    mut commands: Commands,
    mut control: ResMut<ParticleGenerationControl>,
    mut galaxy_config: ResMut<GalaxyConfig>,
    mut meshes: ResMut<Assets<Mesh>>,
    cloud: Query<Entity, With<ParticleCloud>>,
) {
    let Some(task) = control.task.as_mut() else {
        return;
    };
    let Some(result) = block_on(future::poll_once(task)) else {
        return;
    };
    control.task = None;

    let Ok(entity) = cloud.single() else {
        return;
    };

    match result {
        Ok(buffer) => {
            if buffer.is_empty() {
                commands.entity(entity).remove::<Mesh3d>();
            } else {
                // the old mesh is freed once its last handle goes away
                let mesh = meshes.add(particle_mesh(&buffer));
                commands.entity(entity).insert(Mesh3d(mesh));
            }
            info!("Galaxy regenerated with {} particles", buffer.len());
            if galaxy_config.last_error.is_some() {
                galaxy_config.last_error = None;
            }
        }
        Err(err) => {
            warn!("Keeping previous galaxy: {}", err);
            galaxy_config.last_error = Some(err.to_string());
        }
    }
}

fn rotate_particle_cloud(
    time: Res<Time>,
    galaxy_config: Res<GalaxyConfig>,
    mut query: Query<&mut Transform, With<ParticleCloud>>,
) {
    let angle = time.elapsed_secs() * galaxy_config.params.speed;
    for mut transform in &mut query {
        transform.rotation = Quat::from_rotation_y(angle);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::galaxy::GalaxyConfigPlugin;
    use bevy::ecs::system::RunSystemOnce;
    use bevy::tasks::TaskPool;
    use std::time::Duration;

    fn small_config(count: u32) -> GalaxyConfig {
        GalaxyConfig {
            params: GalaxyParameters {
                count,
                ..Default::default()
            },
            ..Default::default()
        }
    }

    fn app() -> App {
        AsyncComputeTaskPool::get_or_init(TaskPool::new);
        let mut app = App::new();
        app.init_resource::<Assets<Mesh>>()
            .insert_resource(small_config(50))
            .insert_resource(GalaxyRng(StdRng::seed_from_u64(3)))
            .insert_resource(ParticleGenerationControl {
                generation: -1,
                task: None,
            })
            .add_systems(Update, (start_generation, finish_generation).chain());
        app.world_mut().spawn(ParticleCloud);
        app
    }

    /// Runs frames until the in-flight generation has been swapped in.
    fn settle(app: &mut App) {
        for _ in 0..2000 {
            app.update();
            if app.world().resource::<ParticleGenerationControl>().task.is_none() {
                return;
            }
            std::thread::sleep(Duration::from_millis(1));
        }
        panic!("generation task never finished");
    }

    fn bump(app: &mut App, edit: impl FnOnce(&mut GalaxyParameters)) {
        let mut config = app.world_mut().resource_mut::<GalaxyConfig>();
        edit(&mut config.params);
        config.generation += 1;
    }

    fn cloud_mesh(app: &mut App) -> Option<Handle<Mesh>> {
        let world = app.world_mut();
        let mut query = world.query_filtered::<&Mesh3d, With<ParticleCloud>>();
        query.single(world).ok().map(|mesh| mesh.0.clone())
    }

    fn vertex_count(app: &App, handle: &Handle<Mesh>) -> usize {
        app.world()
            .resource::<Assets<Mesh>>()
            .get(handle)
            .map(Mesh::count_vertices)
            .unwrap_or_default()
    }

    #[test]
    fn finished_buffer_becomes_the_cloud_mesh() {
        let mut app = app();
        app.world_mut().resource_mut::<GalaxyConfig>().last_error = Some("stale".into());
        settle(&mut app);

        let handle = cloud_mesh(&mut app).expect("cloud mesh");
        assert_eq!(vertex_count(&app, &handle), 50 * 4);
        assert_eq!(app.world().resource::<GalaxyConfig>().last_error, None);
    }

    #[test]
    fn invalid_parameters_keep_the_previous_mesh() {
        let mut app = app();
        settle(&mut app);
        let before = cloud_mesh(&mut app).expect("cloud mesh");

        bump(&mut app, |params| params.branches = 0);
        settle(&mut app);

        assert_eq!(cloud_mesh(&mut app), Some(before));
        let error = app.world().resource::<GalaxyConfig>().last_error.clone();
        assert!(error.is_some_and(|e| e.contains("branches")));
    }

    #[test]
    fn empty_buffer_removes_the_mesh() {
        let mut app = app();
        settle(&mut app);
        assert!(cloud_mesh(&mut app).is_some());

        bump(&mut app, |params| params.count = 0);
        settle(&mut app);

        assert_eq!(cloud_mesh(&mut app), None);
        assert_eq!(app.world().resource::<GalaxyConfig>().last_error, None);
    }

    #[test]
    fn old_mesh_renders_while_generating() {
        let mut app = app();
        settle(&mut app);
        let before = cloud_mesh(&mut app).expect("cloud mesh");

        bump(&mut app, |params| params.count = 7);
        app.world_mut().run_system_once(start_generation).unwrap();

        assert!(app.world().resource::<ParticleGenerationControl>().task.is_some());
        assert_eq!(cloud_mesh(&mut app), Some(before));
    }

    #[test]
    fn only_the_newest_generation_is_swapped_in() {
        let mut app = app();
        bump(&mut app, |params| params.count = 5);
        app.world_mut().run_system_once(start_generation).unwrap();
        bump(&mut app, |params| params.count = 7);
        settle(&mut app);

        let handle = cloud_mesh(&mut app).expect("cloud mesh");
        assert_eq!(vertex_count(&app, &handle), 7 * 4);
        assert_eq!(app.world().resource::<Assets<Mesh>>().len(), 1);
        let control = app.world().resource::<ParticleGenerationControl>();
        assert_eq!(control.generation, app.world().resource::<GalaxyConfig>().generation);
    }

    #[test]
    fn generation_starts_after_the_startup_randomize() {
        AsyncComputeTaskPool::get_or_init(TaskPool::new);
        let mut app = App::new();
        app.init_resource::<Assets<Mesh>>()
            .init_resource::<Assets<ParticleMaterial>>()
            .init_resource::<Time>()
            .add_plugins((GalaxyConfigPlugin, SpawnParticlesPlugin))
            .insert_resource(GalaxyRng(StdRng::seed_from_u64(5)))
            .insert_resource(small_config(100));
        app.update();

        let config = app.world().resource::<GalaxyConfig>();
        assert_eq!(config.generation, 2);
        assert!(!config.name.is_empty());
        let control = app.world().resource::<ParticleGenerationControl>();
        assert_eq!(control.generation, config.generation);
    }
}
