//! Damped orbit controls around the origin.
//!
//! Drag and wheel input accumulate pending rotation and zoom; each
//! [`OrbitControls::update`] applies a `damping_factor` share of what is
//! pending and keeps the rest for later frames, so motion eases out.

use std::f32::consts::FRAC_PI_2;

use glam::{Vec2, Vec3};
use jovian_config::CameraConfig;
use jovian_render::Camera;

/// Keeps the camera off the poles where `look_at` degenerates.
const PITCH_LIMIT: f32 = FRAC_PI_2 - 0.017;

/// Pending motion below this is dropped.
const REST_EPSILON: f32 = 1e-5;

/// Bounds on queued zoom so large wheel bursts stay finite.
const MAX_PENDING_ZOOM: f32 = 1e6;

#[derive(Debug, Clone, PartialEq)]
pub struct OrbitControls {
    /// Rotation about +Y; 0 puts the camera on +Z.
    pub yaw: f32,
    pub pitch: f32,
    pub distance: f32,
    pending_yaw: f32,
    pending_pitch: f32,
    /// Multiplicative zoom still to apply, 1.0 when at rest.
    pending_zoom: f32,
    damping_factor: f32,
    rotate_speed: f32,
    zoom_speed: f32,
    min_distance: f32,
    max_distance: f32,
    dragging: bool,
    last_cursor: Option<Vec2>,
}

impl OrbitControls {
    pub fn new(config: &CameraConfig) -> Self {
        let min_distance = config.min_distance.max(0.0);
        let max_distance = config.max_distance.max(min_distance);
        Self {
            yaw: 0.0,
            pitch: 0.0,
            distance: config.start_distance.clamp(min_distance, max_distance),
            pending_yaw: 0.0,
            pending_pitch: 0.0,
            pending_zoom: 1.0,
            damping_factor: config.damping_factor.clamp(f32::EPSILON, 1.0),
            rotate_speed: config.rotate_speed,
            zoom_speed: config.zoom_speed,
            min_distance,
            max_distance,
            dragging: false,
            last_cursor: None,
        }
    }

    pub fn set_dragging(&mut self, dragging: bool) {
        self.dragging = dragging;
        if !dragging {
            self.last_cursor = None;
        }
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Feed a cursor position in physical pixels. Rotates while dragging.
    pub fn cursor_moved(&mut self, position: Vec2) {
        if self.dragging {
            if let Some(last) = self.last_cursor {
                let delta = position - last;
                self.rotate(delta.x, delta.y);
            }
            self.last_cursor = Some(position);
        }
    }

    /// Queue a rotation for a drag of `dx`, `dy` pixels.
    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.pending_yaw -= dx * self.rotate_speed;
        self.pending_pitch += dy * self.rotate_speed;
    }

    /// Queue a zoom for `lines` wheel notches; positive zooms in.
    pub fn zoom(&mut self, lines: f32) {
        self.pending_zoom = (self.pending_zoom * self.zoom_speed.powf(lines))
            .clamp(1.0 / MAX_PENDING_ZOOM, MAX_PENDING_ZOOM);
    }

    /// Advance one frame. Returns `true` while the camera is still moving.
    pub fn update(&mut self) -> bool {
        let d = self.damping_factor;

        self.yaw += self.pending_yaw * d;
        self.pitch = (self.pitch + self.pending_pitch * d).clamp(-PITCH_LIMIT, PITCH_LIMIT);
        self.pending_yaw *= 1.0 - d;
        self.pending_pitch *= 1.0 - d;

        let step = self.pending_zoom.powf(d);
        self.distance = (self.distance * step).clamp(self.min_distance, self.max_distance);
        self.pending_zoom /= step;

        if self.pending_yaw.abs() < REST_EPSILON {
            self.pending_yaw = 0.0;
        }
        if self.pending_pitch.abs() < REST_EPSILON {
            self.pending_pitch = 0.0;
        }
        if (self.pending_zoom - 1.0).abs() < REST_EPSILON {
            self.pending_zoom = 1.0;
        }

        self.pending_yaw != 0.0 || self.pending_pitch != 0.0 || self.pending_zoom != 1.0
    }

    pub fn eye(&self) -> Vec3 {
        let (sin_yaw, cos_yaw) = self.yaw.sin_cos();
        let (sin_pitch, cos_pitch) = self.pitch.sin_cos();
        self.distance * Vec3::new(cos_pitch * sin_yaw, sin_pitch, cos_pitch * cos_yaw)
    }

    /// Place `camera` on the orbit, looking at the origin.
    pub fn apply(&self, camera: &mut Camera) {
        camera.position = self.eye();
        camera.look_at(Vec3::ZERO, Vec3::Y);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn controls() -> OrbitControls {
        OrbitControls::new(&CameraConfig::default())
    }

    fn settle(orbit: &mut OrbitControls) -> usize {
        let mut frames = 0;
        while orbit.update() {
            frames += 1;
            assert!(frames < 10_000, "orbit never settled");
        }
        frames
    }

    #[test]
    fn test_starts_on_positive_z() {
        let orbit = controls();
        assert!((orbit.eye() - Vec3::new(0.0, 0.0, 6.0)).length() < 1e-5);
    }

    #[test]
    fn test_damped_rotation_converges_to_full_drag() {
        let mut orbit = controls();
        orbit.rotate(-100.0, 0.0);

        orbit.update();
        let first = orbit.yaw;
        assert!((first - 0.5 * 0.05).abs() < 1e-6, "first step {first}");

        settle(&mut orbit);
        assert!((orbit.yaw - 0.5).abs() < 1e-3, "yaw {}", orbit.yaw);
    }

    #[test]
    fn test_pitch_is_clamped() {
        let mut orbit = controls();
        orbit.rotate(0.0, 10_000.0);
        settle(&mut orbit);
        assert!(orbit.pitch <= PITCH_LIMIT);
        assert!(orbit.eye().y < 6.0);
    }

    #[test]
    fn test_zoom_respects_limits() {
        let mut orbit = controls();
        orbit.zoom(500.0);
        settle(&mut orbit);
        assert!((orbit.distance - 2.5).abs() < 1e-4);

        orbit.zoom(-5000.0);
        settle(&mut orbit);
        assert!((orbit.distance - 100.0).abs() < 1e-3);
    }

    #[test]
    fn test_zoom_in_reduces_distance() {
        let mut orbit = controls();
        orbit.zoom(2.0);
        settle(&mut orbit);
        assert!((orbit.distance - 6.0 * 0.95f32.powi(2)).abs() < 1e-3);
    }

    #[test]
    fn test_cursor_only_rotates_while_dragging() {
        let mut orbit = controls();
        orbit.cursor_moved(Vec2::new(10.0, 10.0));
        orbit.cursor_moved(Vec2::new(90.0, 10.0));
        assert!(!orbit.update());

        orbit.set_dragging(true);
        orbit.cursor_moved(Vec2::new(10.0, 10.0));
        orbit.cursor_moved(Vec2::new(30.0, 10.0));
        assert!(orbit.update());
        assert!(orbit.yaw < 0.0);
    }

    #[test]
    fn test_apply_points_camera_at_origin() {
        let mut orbit = controls();
        orbit.rotate(120.0, -40.0);
        settle(&mut orbit);

        let mut camera = Camera::default();
        orbit.apply(&mut camera);
        let to_origin = (-camera.position).normalize();
        assert!((camera.forward() - to_origin).length() < 1e-4);
    }
}
