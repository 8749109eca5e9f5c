use crate::prelude::*;
use crate::ui::screenshot::TakeScreenshot;
use bevy::prelude::*;
use bevy_egui::{EguiContexts, egui};

pub struct ConfigEguiPlugin;

impl Plugin for ConfigEguiPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, configure_visuals_system)
            .add_systems(Update, ui_system.before(GalaxyConfigSet));
    }
}

fn configure_visuals_system(mut contexts: EguiContexts) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };
    ctx.set_visuals(egui::Visuals {
        window_corner_radius: 0.0.into(),
        ..egui::Visuals::dark()
    });
}

/// Sliders commit when released; keyboard and click edits commit right away.
fn commits(response: &egui::Response) -> bool {
    response.drag_stopped() || (response.changed() && !response.dragged())
}

/// Colour edits stay in the working copy while the picker popup is open and are
/// committed on the frame it closes.
#[derive(Default)]
struct ColorCommit {
    pending: bool,
}

impl ColorCommit {
    fn update(&mut self, edited: bool, picker_open: bool) -> bool {
        self.pending |= edited;
        if picker_open || !self.pending {
            return false;
        }
        self.pending = false;
        true
    }
}

fn color_row(label: &str, color: &mut Rgb, ui: &mut egui::Ui) -> bool {
    let mut rgb = color.to_array();
    let changed = ui
        .horizontal(|ui| {
            let response = ui.color_edit_button_rgb(&mut rgb);
            ui.label(label);
            response.changed()
        })
        .inner;
    if changed {
        *color = rgb.into();
    }
    changed
}

fn ui_system(
    mut contexts: EguiContexts,
    mut galaxy_config_ui: ResMut<GalaxyConfigUi>,
    mut galaxy_config: ResMut<GalaxyConfig>,
    mut randomize: EventWriter<RandomizeGalaxy>,
    mut screenshot: EventWriter<TakeScreenshot>,
    mut color_commit: Local<ColorCommit>,
) {
    let Some(ctx) = contexts.try_ctx_mut() else {
        return;
    };

    let minval = GalaxyParameters::MIN;
    let maxval = GalaxyParameters::MAX;
    let mut commit = false;
    let mut color_edited = false;
    let mut randomize_clicked = false;
    let mut screenshot_clicked = false;

    egui::SidePanel::left("side_panel")
        .default_width(220.0)
        .show(ctx, |ui| {
            ui.heading("Galaxy Generator");
            let galaxy_config_ui = &mut *galaxy_config_ui;
            let params = &mut galaxy_config_ui.params;

            egui::CollapsingHeader::new("Particles")
                .default_open(true)
                .show(ui, |ui| {
                    commit |= commits(
                        &ui.add(
                            egui::Slider::new(&mut params.count, minval.count..=maxval.count)
                                .step_by(GalaxyParameters::COUNT_STEP as f64)
                                .text("Count"),
                        ),
                    );
                    // applied live, no regeneration needed
                    ui.add(
                        egui::Slider::new(&mut params.size, minval.size..=maxval.size)
                            .logarithmic(true)
                            .text("Size"),
                    );
                });
            egui::CollapsingHeader::new("Galaxy")
                .default_open(true)
                .show(ui, |ui| {
                    commit |= commits(&ui.add(
                        egui::Slider::new(&mut params.radius, minval.radius..=maxval.radius)
                            .text("Radius"),
                    ));
                    commit |= commits(&ui.add(
                        egui::Slider::new(&mut params.branches, minval.branches..=maxval.branches)
                            .text("Branches"),
                    ));
                    commit |= commits(&ui.add(
                        egui::Slider::new(&mut params.spin, minval.spin..=maxval.spin)
                            .step_by(0.001)
                            .text("Spin"),
                    ));
                });
            egui::CollapsingHeader::new("Randomness")
                .default_open(true)
                .show(ui, |ui| {
                    commit |= commits(&ui.add(
                        egui::Slider::new(
                            &mut params.randomness,
                            minval.randomness..=maxval.randomness,
                        )
                        .step_by(0.001)
                        .text("Randomness"),
                    ));
                    commit |= commits(&ui.add(
                        egui::Slider::new(
                            &mut params.randomness_power,
                            minval.randomness_power..=maxval.randomness_power,
                        )
                        .step_by(0.01)
                        .text("Randomness Power"),
                    ));
                });
            egui::CollapsingHeader::new("Galaxy colors")
                .default_open(true)
                .show(ui, |ui| {
                    color_edited |= color_row("Inside", &mut params.inside_color, ui);
                    color_edited |= color_row("Outside", &mut params.outside_color, ui);
                });
            egui::CollapsingHeader::new("Animation and others").show(ui, |ui| {
                ui.add(
                    egui::Slider::new(&mut params.speed, minval.speed..=maxval.speed)
                        .step_by(0.1)
                        .text("Speed"),
                );
                ui.checkbox(&mut galaxy_config_ui.show_skybox, "Show Skybox");
            });

            ui.separator();
            randomize_clicked = ui.button("Generate Random Galaxy").clicked();
            screenshot_clicked = ui.button("Screenshot").clicked();

            if let Some(error) = &galaxy_config.last_error {
                ui.separator();
                ui.colored_label(egui::Color32::LIGHT_RED, error);
            }
        });

    let picker_open = ctx.memory(|mem| mem.any_popup_open());
    commit |= color_commit.update(color_edited, picker_open);

    if randomize_clicked {
        randomize.write(RandomizeGalaxy);
    }
    if screenshot_clicked {
        screenshot.write(TakeScreenshot);
    }

    // only write through on a real difference so change detection stays quiet
    if commit && galaxy_config.params != galaxy_config_ui.params {
        galaxy_config.params = galaxy_config_ui.params.clone();
    }
    if galaxy_config.params.size != galaxy_config_ui.params.size {
        galaxy_config.params.size = galaxy_config_ui.params.size;
    }
    if galaxy_config.params.speed != galaxy_config_ui.params.speed {
        galaxy_config.params.speed = galaxy_config_ui.params.speed;
    }
    if galaxy_config.show_skybox != galaxy_config_ui.show_skybox {
        galaxy_config.show_skybox = galaxy_config_ui.show_skybox;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn editing_bounds_hold_the_defaults() {
        let params = GalaxyParameters::default();
        let (min, max) = (GalaxyParameters::MIN, GalaxyParameters::MAX);
        assert!((min.count..=max.count).contains(&params.count));
        assert!((min.size..=max.size).contains(&params.size));
        assert!((min.radius..=max.radius).contains(&params.radius));
        assert!((min.branches..=max.branches).contains(&params.branches));
        assert!((min.randomness_power..=max.randomness_power).contains(&params.randomness_power));
        assert!(min.validate().is_ok());
        assert!(max.validate().is_ok());
    }

    #[test]
    fn color_drags_wait_for_the_picker_to_close() {
        let mut color_commit = ColorCommit::default();
        for _ in 0..30 {
            assert!(!color_commit.update(true, true));
        }
        assert!(!color_commit.update(false, true));
        assert!(color_commit.update(false, false));
        assert!(!color_commit.update(false, false));
    }

    #[test]
    fn untouched_picker_commits_nothing() {
        let mut color_commit = ColorCommit::default();
        assert!(!color_commit.update(false, true));
        assert!(!color_commit.update(false, false));
    }

    #[test]
    fn color_edits_outside_a_popup_commit_at_once() {
        let mut color_commit = ColorCommit::default();
        assert!(color_commit.update(true, false));
        assert!(!color_commit.update(false, false));
    }
}
