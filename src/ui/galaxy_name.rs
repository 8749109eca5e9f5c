use crate::prelude::*;
use bevy::math::curve::{Curve, easing::EaseFunction};
use bevy::prelude::*;

const FONT_SIZE: f32 = 42.0;
// seconds per glyph, and delay between consecutive glyphs
const DURATION: f32 = 0.6;
const STAGGER: f32 = 0.05;
// glyphs start this many glyph heights below their resting place
const RISE: f32 = 6.0;

pub struct GalaxyNamePlugin;

impl Plugin for GalaxyNamePlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<TitleAnimation>()
            .add_systems(Startup, setup_title)
            .add_systems(Update, (rebuild_title, animate_title).chain());
    }
}

#[derive(Component)]
struct TitleRoot;

#[derive(Component)]
struct TitleGlyph {
    index: usize,
}

#[derive(Resource, Default)]
struct TitleAnimation {
    shown: String,
    started: f32,
    glyphs: usize,
}

fn setup_title(mut commands: Commands) {
    commands.spawn((
        Node {
            position_type: PositionType::Absolute,
            flex_direction: FlexDirection::Row,
            justify_content: JustifyContent::Center,
            width: Val::Percent(100.),
            top: Val::Percent(6.),
            ..default()
        },
        TitleRoot,
    ));
}

fn glyph_progress(elapsed: f32, index: usize) -> f32 {
    ((elapsed - index as f32 * STAGGER) / DURATION).clamp(0.0, 1.0)
}

/// Vertical offset in pixels; eases out with a small overshoot above the rest position.
fn glyph_offset(progress: f32) -> f32 {
    (1.0 - EaseFunction::BackOut.sample_clamped(progress)) * RISE * FONT_SIZE
}

fn rebuild_title(
    mut commands: Commands,
    time: Res<Time>,
    galaxy_config: Res<GalaxyConfig>,
    mut animation: ResMut<TitleAnimation>,
    root: Query<Entity, With<TitleRoot>>,
) {
    if animation.shown == galaxy_config.name {
        return;
    }
    let Ok(root) = root.single() else {
        return;
    };

    animation.shown = galaxy_config.name.clone();
    animation.started = time.elapsed_secs();
    animation.glyphs = galaxy_config.name.chars().count();

    commands.entity(root).despawn_related::<Children>();
    commands.entity(root).with_children(|parent| {
        for (index, glyph) in galaxy_config.name.chars().enumerate() {
            parent.spawn((
                Node {
                    top: Val::Px(glyph_offset(0.0)),
                    min_width: Val::Px(FONT_SIZE * 0.3),
                    ..default()
                },
                Text::new(glyph.to_string()),
                TextFont {
                    font_size: FONT_SIZE,
                    ..default()
                },
                TextColor(Color::WHITE),
                TitleGlyph { index },
            ));
        }
    });
}

fn animate_title(
    time: Res<Time>,
    animation: Res<TitleAnimation>,
    mut glyphs: Query<(&TitleGlyph, &mut Node)>,
) {
    let elapsed = time.elapsed_secs() - animation.started;
    // one extra frame past the end so every glyph settles at exactly zero
    if elapsed > DURATION + STAGGER * animation.glyphs as f32 + 0.1 {
        return;
    }
    for (glyph, mut node) in &mut glyphs {
        node.top = Val::Px(glyph_offset(glyph_progress(elapsed, glyph.index)));
    }
}
