use bevy::prelude::*;

mod camera;
mod config_egui;
mod galaxy_name;
mod screenshot;

pub struct UiPlugin;

impl Plugin for UiPlugin {
    fn build(&self, app: &mut App) {
        app.add_plugins((
            camera::CameraPlugin,
            config_egui::ConfigEguiPlugin,
            galaxy_name::GalaxyNamePlugin,
            screenshot::ScreenshotPlugin,
        ));
    }
}
