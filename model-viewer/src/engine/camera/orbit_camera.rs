use bevy::input::mouse::{MouseMotion, MouseScrollUnit, MouseWheel};
use bevy::prelude::*;
use std::f32::consts::{FRAC_PI_2, TAU};

use constants::render_settings::{
    CAMERA_FOCUS, CAMERA_START_POSITION, ORBIT_DAMPING_FACTOR, ORBIT_MAX_DISTANCE,
    ORBIT_MIN_DISTANCE, ORBIT_PAN_SPEED, ORBIT_ROTATE_SPEED, ORBIT_ZOOM_SPEED,
};

use crate::engine::camera::viewport::ViewportContext;

/// Keeps the camera off the poles so `looking_at` always has a valid up vector.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.01;

/// Marker for the single camera the viewer renders through.
#[derive(Component)]
pub struct ViewerCamera;

/// Orbit controller around `focus_point`.
///
/// Input accumulates into pending deltas; `update` applies `damping_factor` of
/// the pending motion per frame and decays the remainder, giving inertial motion.
#[derive(Resource, Debug, Clone)]
pub struct OrbitCamera {
    pub focus_point: Vec3,
    pub radius: f32,
    /// Azimuth around +Y, zero looking down -Z.
    pub yaw: f32,
    /// Elevation above the focus plane.
    pub pitch: f32,
    pub enable_damping: bool,
    pub damping_factor: f32,
    pub enable_zoom: bool,
    pub rotate_speed: f32,
    pub zoom_speed: f32,
    pub pan_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
    pending_yaw: f32,
    pending_pitch: f32,
    pending_pan: Vec3,
    pending_scale: f32,
}

impl Default for OrbitCamera {
    fn default() -> Self {
        Self::new(CAMERA_START_POSITION, CAMERA_FOCUS)
    }
}

impl OrbitCamera {
    pub fn new(position: Vec3, focus_point: Vec3) -> Self {
        let offset = position - focus_point;
        let radius = offset.length().max(ORBIT_MIN_DISTANCE);

        Self {
            focus_point,
            radius,
            yaw: offset.x.atan2(offset.z),
            pitch: (offset.y / radius).clamp(-1.0, 1.0).asin(),
            enable_damping: true,
            damping_factor: ORBIT_DAMPING_FACTOR,
            enable_zoom: true,
            rotate_speed: ORBIT_ROTATE_SPEED,
            zoom_speed: ORBIT_ZOOM_SPEED,
            pan_speed: ORBIT_PAN_SPEED,
            min_distance: ORBIT_MIN_DISTANCE,
            max_distance: ORBIT_MAX_DISTANCE,
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_pan: Vec3::ZERO,
            pending_scale: 1.0,
        }
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.focus_point
            + Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw) * self.radius
    }

    pub fn transform(&self) -> Transform {
        Transform::from_translation(self.eye()).looking_at(self.focus_point, Vec3::Y)
    }

    /// Queues a drag rotation. A drag across the full viewport height is one turn.
    pub fn rotate(&mut self, drag: Vec2, viewport_height: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        self.pending_yaw -= TAU * drag.x / viewport_height * self.rotate_speed;
        self.pending_pitch += TAU * drag.y / viewport_height * self.rotate_speed;
    }

    /// Queues a dolly step. Positive steps move towards the focus point.
    pub fn zoom(&mut self, steps: f32) {
        if !self.enable_zoom {
            return;
        }
        self.pending_scale *= 0.95_f32.powf(steps * self.zoom_speed);
    }

    /// Queues a screen-space pan so the focus point tracks the cursor.
    pub fn pan(&mut self, drag: Vec2, viewport_height: f32, fov: f32) {
        if viewport_height <= 0.0 {
            return;
        }
        let transform = self.transform();
        let target_distance = self.radius * (fov * 0.5).tan();
        let scale = 2.0 * target_distance / viewport_height * self.pan_speed;
        self.pending_pan +=
            (transform.left() * drag.x + transform.up() * drag.y) * scale;
    }

    pub fn is_settled(&self) -> bool {
        self.pending_yaw.abs() < 1e-5
            && self.pending_pitch.abs() < 1e-5
            && self.pending_pan.length_squared() < 1e-10
            && (self.pending_scale - 1.0).abs() < 1e-6
    }

    /// Integrates one frame of pending motion and returns the resulting camera pose.
    pub fn update(&mut self) -> Transform {
        let step = if self.enable_damping {
            self.damping_factor
        } else {
            1.0
        };

        self.yaw += self.pending_yaw * step;
        self.pitch = (self.pitch + self.pending_pitch * step).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.radius = (self.radius * self.pending_scale).clamp(self.min_distance, self.max_distance);
        self.focus_point += self.pending_pan * step;

        if self.enable_damping {
            self.pending_yaw *= 1.0 - self.damping_factor;
            self.pending_pitch *= 1.0 - self.damping_factor;
            self.pending_pan *= 1.0 - self.damping_factor;
        } else {
            self.pending_yaw = 0.0;
            self.pending_pitch = 0.0;
            self.pending_pan = Vec3::ZERO;
        }
        self.pending_scale = 1.0;

        self.transform()
    }
}

/// Reads drag and wheel input, integrates damping and writes the camera transform.
///
/// Left drag orbits, right drag pans, the wheel dollies.
pub fn orbit_camera_controller(
    mut camera_query: Query<(&mut Transform, &Projection), With<ViewerCamera>>,
    mut orbit: ResMut<OrbitCamera>,
    mouse_button: Res<ButtonInput<MouseButton>>,
    mut mouse_motion: EventReader<MouseMotion>,
    mut scroll_events: EventReader<MouseWheel>,
    viewport: Option<Res<ViewportContext>>,
) {
    let Ok((mut camera_transform, projection)) = camera_query.single_mut() else {
        return;
    };
    let viewport_height = viewport.map_or(0.0, |v| v.surface_size.y);

    let mouse_delta: Vec2 = mouse_motion.read().map(|m| m.delta).sum();
    if mouse_delta != Vec2::ZERO {
        if mouse_button.pressed(MouseButton::Left) {
            orbit.rotate(mouse_delta, viewport_height);
        } else if mouse_button.pressed(MouseButton::Right) {
            if let Projection::Perspective(perspective) = projection {
                orbit.pan(mouse_delta, viewport_height, perspective.fov);
            }
        }
    }

    let scroll_steps: f32 = scroll_events
        .read()
        .map(|ev| match ev.unit {
            MouseScrollUnit::Line => ev.y,
            MouseScrollUnit::Pixel => ev.y * 0.05,
        })
        .sum();
    if scroll_steps.abs() > f32::EPSILON {
        orbit.zoom(scroll_steps);
    }

    *camera_transform = orbit.update();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_reproduces_the_start_position() {
        let orbit = OrbitCamera::new(Vec3::new(0.0, 2.0, 5.0), Vec3::ZERO);
        assert!(orbit.eye().distance(Vec3::new(0.0, 2.0, 5.0)) < 1e-4);
        assert_eq!(orbit.damping_factor, 0.25);
        assert!(orbit.enable_zoom);
    }

    #[test]
    fn damped_rotation_decays_towards_rest() {
        let mut orbit = OrbitCamera::default();
        let start_yaw = orbit.yaw;
        orbit.rotate(Vec2::new(100.0, 0.0), 720.0);

        orbit.update();
        let first_step = (orbit.yaw - start_yaw).abs();
        let yaw_after_one = orbit.yaw;
        orbit.update();
        let second_step = (orbit.yaw - yaw_after_one).abs();

        assert!(first_step > 0.0);
        assert!(second_step < first_step);
        assert!((second_step / first_step - 0.75).abs() < 1e-4);

        for _ in 0..200 {
            orbit.update();
        }
        assert!(orbit.is_settled());
    }

    #[test]
    fn zoom_is_ignored_when_disabled() {
        let mut orbit = OrbitCamera::default();
        let radius = orbit.radius;
        orbit.enable_zoom = false;
        orbit.zoom(3.0);
        orbit.update();
        assert_eq!(orbit.radius, radius);

        orbit.enable_zoom = true;
        orbit.zoom(3.0);
        orbit.update();
        assert!(orbit.radius < radius);
    }

    #[test]
    fn pitch_stays_clear_of_the_poles() {
        let mut orbit = OrbitCamera::default();
        orbit.enable_damping = false;
        orbit.rotate(Vec2::new(0.0, 10_000.0), 100.0);
        let transform = orbit.update();
        assert!(orbit.pitch <= PITCH_LIMIT);
        assert!(transform.translation.is_finite());
    }
}
