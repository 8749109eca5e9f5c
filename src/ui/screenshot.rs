use crate::prelude::*;
use bevy::prelude::*;
use bevy::render::view::screenshot::{Screenshot, save_to_disk};
use bevy_egui::EguiContexts;

pub struct ScreenshotPlugin;

impl Plugin for ScreenshotPlugin {
    fn build(&self, app: &mut App) {
        app.add_event::<TakeScreenshot>()
            .add_systems(
                Update,
                (keyboard_shortcuts, take_screenshot)
                    .chain()
                    .before(GalaxyConfigSet),
            );
    }
}

#[derive(Event, Clone, Copy, Debug, Default)]
pub struct TakeScreenshot;

/// `galaxy-name-generation.png`, lower-cased with words joined by dashes.
pub fn screenshot_path(name: &str, generation: i32) -> String {
    let slug = name
        .split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-");
    let slug = if slug.is_empty() { "galaxy".to_string() } else { slug };
    format!("{slug}-{generation}.png")
}

fn keyboard_shortcuts(
    keys: Res<ButtonInput<KeyCode>>,
    mut contexts: EguiContexts,
    mut screenshot: EventWriter<TakeScreenshot>,
    mut randomize: EventWriter<RandomizeGalaxy>,
) {
    if contexts
        .try_ctx_mut()
        .is_some_and(|ctx| ctx.wants_keyboard_input())
    {
        return;
    }
    if keys.just_pressed(KeyCode::KeyP) {
        screenshot.write(TakeScreenshot);
    }
    if keys.just_pressed(KeyCode::KeyR) {
        randomize.write(RandomizeGalaxy);
    }
}

fn take_screenshot(
    mut commands: Commands,
    mut events: EventReader<TakeScreenshot>,
    galaxy_config: Res<GalaxyConfig>,
) {
    if events.is_empty() {
        return;
    }
    events.clear();

    let path = screenshot_path(&galaxy_config.name, galaxy_config.generation);
    info!("Saving screenshot to {}", path);
    commands
        .spawn(Screenshot::primary_window())
        .observe(save_to_disk(path));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn path_is_a_slug_of_the_name() {
        assert_eq!(screenshot_path("VOLUPTAS MAGNAM VII PRIME", 4), "voluptas-magnam-vii-prime-4.png");
        assert_eq!(screenshot_path("  ", 1), "galaxy-1.png");
    }
}
