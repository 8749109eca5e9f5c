use bevy::{
    input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel},
    prelude::*,
};
use bevy_egui::EguiContexts;

const ROTATE_SPEED: f32 = 0.005;
// fraction of orbit velocity lost per 60 Hz frame
const DAMPING: f32 = 0.05;
const MIN_DISTANCE: f32 = 0.5;
const MAX_DISTANCE: f32 = 60.0;
const PITCH_LIMIT: f32 = 1.54;

pub struct CameraPlugin;

impl Plugin for CameraPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Startup, spawn_camera)
            .add_systems(Update, camera_control_system);
    }
}

fn spawn_camera(mut commands: Commands, mut clearcolor: ResMut<ClearColor>) {
    *clearcolor = ClearColor(Color::BLACK);
    let orbit = CameraMain::default();
    commands.spawn((
        Camera3d::default(),
        Projection::Perspective(PerspectiveProjection {
            fov: 75f32.to_radians(),
            near: 0.1,
            far: 100.0,
            ..default()
        }),
        Transform::from_translation(orbit.translation()).looking_at(orbit.target, Vec3::Y),
        orbit,
    ));
}

/// Orbit state around `target`; angles are in radians.
#[derive(Component, Clone, Debug)]
pub struct CameraMain {
    target: Vec3,
    yaw: f32,
    pitch: f32,
    distance: f32,
    yaw_velocity: f32,
    pitch_velocity: f32,
    smooth_zoom_buffer: f32,
}

impl Default for CameraMain {
    fn default() -> Self {
        Self::looking_from(Vec3::new(3.0, 3.0, 3.0), Vec3::ZERO)
    }
}

impl CameraMain {
    fn looking_from(eye: Vec3, target: Vec3) -> Self {
        let offset = eye - target;
        let distance = offset.length();
        Self {
            target,
            yaw: f32::atan2(offset.x, offset.z),
            pitch: (offset.y / distance).asin(),
            distance,
            yaw_velocity: 0.0,
            pitch_velocity: 0.0,
            smooth_zoom_buffer: 0.0,
        }
    }

    fn translation(&self) -> Vec3 {
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        self.target + Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.distance
    }

    /// Advances the damped orbit by `dt` seconds.
    fn step(&mut self, dt: f32) {
        self.yaw += self.yaw_velocity;
        self.pitch = (self.pitch + self.pitch_velocity).clamp(-PITCH_LIMIT, PITCH_LIMIT);

        let decay = (1.0 - DAMPING).powf(dt * 60.0);
        self.yaw_velocity *= decay;
        self.pitch_velocity *= decay;

        let zoom = drain_zoom(self.smooth_zoom_buffer);
        self.smooth_zoom_buffer -= zoom;
        self.distance = (self.distance * (1.0 - zoom)).clamp(MIN_DISTANCE, MAX_DISTANCE);
    }
}

/// Portion of the buffered scroll to apply this frame: a fifth of it, but never less
/// than a small minimum so the buffer actually empties.
fn drain_zoom(buffer: f32) -> f32 {
    let smooth_zoom_min = 0.001f32;
    let smooth_zoom_factor = 0.2f32;

    if buffer < 0.0 {
        f32::min(buffer * smooth_zoom_factor, (-smooth_zoom_min).max(buffer))
    } else {
        f32::max(buffer * smooth_zoom_factor, smooth_zoom_min.min(buffer))
    }
}

pub fn camera_control_system(
    mut query: Query<(&mut Transform, &mut CameraMain)>,
    mouse_buttons: Res<ButtonInput<MouseButton>>,
    time: Res<Time>,
    mut motion_evr: EventReader<MouseMotion>,
    mut scroll_evr: EventReader<MouseWheel>,
    mut contexts: EguiContexts,
) {
    let Ok((mut transform, mut camera_main)) = query.single_mut() else {
        return;
    };

    // the debug panel owns the pointer while hovered
    let pointer_free = contexts
        .try_ctx_mut()
        .is_none_or(|ctx| !(ctx.is_pointer_over_area() || ctx.wants_pointer_input()));

    let dragging = pointer_free && mouse_buttons.pressed(MouseButton::Left);
    for ev in motion_evr.read() {
        if dragging {
            camera_main.yaw_velocity -= ev.delta.x * ROTATE_SPEED;
            camera_main.pitch_velocity += ev.delta.y * ROTATE_SPEED;
        }
    }

    for ev in scroll_evr.read() {
        if !pointer_free {
            continue;
        }
        let lines = match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y / 40.0,
        };
        camera_main.smooth_zoom_buffer += lines * 0.05;
    }

    camera_main.step(time.delta_secs());

    transform.translation = camera_main.translation();
    transform.look_at(camera_main.target, Vec3::Y);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_orbit_starts_at_three_three_three() {
        let orbit = CameraMain::default();
        let eye = orbit.translation();
        assert!(eye.abs_diff_eq(Vec3::splat(3.0), 1e-4), "{eye}");
    }

    #[test]
    fn orbit_velocity_decays() {
        let mut orbit = CameraMain::default();
        orbit.yaw_velocity = 0.1;
        for _ in 0..600 {
            orbit.step(1.0 / 60.0);
        }
        assert!(orbit.yaw_velocity.abs() < 1e-6);
        // distance is untouched by rotation
        assert!((orbit.distance - 27f32.sqrt()).abs() < 1e-4);
    }

    #[test]
    fn pitch_stays_above_the_poles() {
        let mut orbit = CameraMain::default();
        orbit.pitch_velocity = 10.0;
        orbit.step(1.0 / 60.0);
        assert_eq!(orbit.pitch, PITCH_LIMIT);
    }

    #[test]
    fn zoom_buffer_drains_and_distance_is_clamped() {
        let mut orbit = CameraMain::default();
        orbit.smooth_zoom_buffer = 5.0;
        for _ in 0..2000 {
            orbit.step(1.0 / 60.0);
        }
        assert!(orbit.smooth_zoom_buffer.abs() < 1e-3);
        assert_eq!(orbit.distance, MIN_DISTANCE);
    }

    #[test]
    fn drain_zoom_never_overshoots() {
        assert_eq!(drain_zoom(0.0), 0.0);
        assert_eq!(drain_zoom(0.0005), 0.0005);
        assert_eq!(drain_zoom(-0.0005), -0.0005);
        assert!((drain_zoom(1.0) - 0.2).abs() < 1e-6);
    }
}
