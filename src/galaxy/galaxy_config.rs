use crate::prelude::*;
use bevy::prelude::*;
use galaxy_points::naming::galaxy_name;
use rand::{SeedableRng, rngs::StdRng};

/// The committed galaxy. Particles are regenerated whenever `generation` moves.
#[derive(Resource, Clone, PartialEq)]
pub struct GalaxyConfig {
    pub generation: i32,
    pub params: GalaxyParameters,
    pub show_skybox: bool,
    pub name: String,
    pub last_error: Option<String>,
}

impl Default for GalaxyConfig {
    fn default() -> Self {
        Self {
            generation: 1,
            params: GalaxyParameters::default(),
            show_skybox: true,
            name: String::new(),
            last_error: None,
        }
    }
}

/// Working copy edited by the debug panel, committed to [`GalaxyConfig`] on finish.
#[derive(Resource, Clone, PartialEq)]
pub struct GalaxyConfigUi {
    pub params: GalaxyParameters,
    pub show_skybox: bool,
}

impl Default for GalaxyConfigUi {
    fn default() -> Self {
        let config = GalaxyConfig::default();
        Self {
            params: config.params,
            show_skybox: config.show_skybox,
        }
    }
}

#[derive(Resource)]
struct GalaxyConfigOld(GalaxyParameters);

/// Application-wide rng. Set `GALAXY_SEED` for a reproducible session.
#[derive(Resource)]
pub struct GalaxyRng(pub StdRng);

impl GalaxyRng {
    pub const SEED_VAR: &'static str = "GALAXY_SEED";

    fn from_env() -> Self {
        match std::env::var(Self::SEED_VAR).map(|s| s.trim().parse::<u64>()) {
            Ok(Ok(seed)) => {
                info!("Seeding galaxy rng with {}", seed);
                Self(StdRng::seed_from_u64(seed))
            }
            Ok(Err(err)) => {
                warn!("Ignoring {}: {}", Self::SEED_VAR, err);
                Self(StdRng::from_os_rng())
            }
            Err(_) => Self(StdRng::from_os_rng()),
        }
    }
}

#[derive(Event, Clone, Copy, Debug, Default)]
pub struct RandomizeGalaxy;

/// Randomizing and committing the config. Readers of the generation run after it,
/// writers of the config run before it.
#[derive(SystemSet, Debug, Clone, PartialEq, Eq, Hash)]
pub struct GalaxyConfigSet;

pub struct GalaxyConfigPlugin;

impl Plugin for GalaxyConfigPlugin {
    fn build(&self, app: &mut App) {
        app.insert_resource(GalaxyConfig::default())
            .insert_resource(GalaxyConfigUi::default())
            .insert_resource(GalaxyConfigOld(GalaxyParameters::default()))
            .insert_resource(GalaxyRng::from_env())
            .add_event::<RandomizeGalaxy>()
            .add_systems(Startup, randomize_on_startup)
            .add_systems(
                Update,
                (randomize_galaxy, apply_config_updates)
                    .chain()
                    .in_set(GalaxyConfigSet),
            );
    }
}

fn randomize_on_startup(mut events: EventWriter<RandomizeGalaxy>) {
    events.write(RandomizeGalaxy);
}

fn randomize_galaxy(
    mut events: EventReader<RandomizeGalaxy>,
    mut config: ResMut<GalaxyConfig>,
    mut galaxy_config_ui: ResMut<GalaxyConfigUi>,
    mut rng: ResMut<GalaxyRng>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    let params = config.params.randomized(&mut rng.0);
    let name = galaxy_name(&mut rng.0);
    info!("Randomized galaxy \"{}\"", name);

    galaxy_config_ui.params = params.clone();
    config.params = params;
    config.name = name;
}

fn apply_config_updates(
    mut galaxy_config_old: ResMut<GalaxyConfigOld>,
    mut galaxy_config: ResMut<GalaxyConfig>,
) {
    if galaxy_config.is_changed() && galaxy_config.params.particles_differ(&galaxy_config_old.0) {
        galaxy_config.generation += 1;
        galaxy_config_old.0 = galaxy_config.params.clone();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn app() -> App {
        let mut app = App::new();
        app.insert_resource(GalaxyConfig::default())
            .insert_resource(GalaxyConfigUi::default())
            .insert_resource(GalaxyConfigOld(GalaxyParameters::default()))
            .insert_resource(GalaxyRng(StdRng::seed_from_u64(8)))
            .add_event::<RandomizeGalaxy>()
            .add_systems(Update, (randomize_galaxy, apply_config_updates).chain());
        app
    }

    #[test]
    fn render_only_edits_keep_the_generation() {
        let mut app = app();
        app.update();
        let generation = app.world().resource::<GalaxyConfig>().generation;

        let mut config = app.world_mut().resource_mut::<GalaxyConfig>();
        config.params.speed = 1.5;
        config.params.size = 0.2;
        app.update();

        assert_eq!(app.world().resource::<GalaxyConfig>().generation, generation);
    }

    #[test]
    fn shape_edits_bump_the_generation_once() {
        let mut app = app();
        app.update();
        let generation = app.world().resource::<GalaxyConfig>().generation;

        app.world_mut().resource_mut::<GalaxyConfig>().params.branches = 7;
        app.update();
        app.update();

        assert_eq!(app.world().resource::<GalaxyConfig>().generation, generation + 1);
    }

    #[test]
    fn randomize_names_the_galaxy_and_syncs_the_panel() {
        let mut app = app();
        app.world_mut().send_event(RandomizeGalaxy);
        app.update();

        let config = app.world().resource::<GalaxyConfig>();
        assert!(!config.name.is_empty());
        assert_eq!(config.generation, 2);
        assert_eq!(config.params.count, GalaxyParameters::default().count);
        assert_eq!(app.world().resource::<GalaxyConfigUi>().params, config.params);
    }
}
