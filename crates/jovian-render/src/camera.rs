//! Perspective camera with reverse-Z projection.

use glam::{Mat4, Quat, Vec2, Vec3};

/// A perspective camera positioned in world space.
#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    pub position: Vec3,
    /// Orientation; the camera looks down its local -Z.
    pub rotation: Quat,
    /// Vertical field of view in radians.
    pub fov_y: f32,
    /// Width / height.
    pub aspect_ratio: f32,
    pub near: f32,
    pub far: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            position: Vec3::ZERO,
            rotation: Quat::IDENTITY,
            fov_y: 45f32.to_radians(),
            aspect_ratio: 16.0 / 9.0,
            near: 1.0,
            far: 1000.0,
        }
    }
}

impl Camera {
    /// Orient the camera toward `target`, keeping `up` as the vertical reference.
    pub fn look_at(&mut self, target: Vec3, up: Vec3) {
        let view = Mat4::look_at_rh(self.position, target, up);
        self.rotation = Quat::from_mat4(&view.inverse()).normalize();
    }

    pub fn view_matrix(&self) -> Mat4 {
        (Mat4::from_translation(self.position) * Mat4::from_quat(self.rotation)).inverse()
    }

    /// Reverse-Z: near and far are swapped so the near plane lands on z = 1.
    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov_y, self.aspect_ratio, self.far, self.near)
    }

    pub fn view_projection_matrix(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    pub fn forward(&self) -> Vec3 {
        self.rotation * Vec3::NEG_Z
    }

    pub fn set_aspect_ratio(&mut self, width: f32, height: f32) {
        if height > 0.0 {
            self.aspect_ratio = width / height;
        }
    }

    /// Screen position of a world point in `[0, 1]` UV space (y down).
    /// `None` when the point is behind the camera.
    pub fn project_to_screen(&self, world: Vec3) -> Option<Vec2> {
        let clip = self.view_projection_matrix() * world.extend(1.0);
        if clip.w <= 0.0 {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        Some(Vec2::new(ndc.x * 0.5 + 0.5, -ndc.y * 0.5 + 0.5))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn planet_camera() -> Camera {
        let mut camera = Camera {
            position: Vec3::new(0.0, 0.0, 6.0),
            ..Camera::default()
        };
        camera.look_at(Vec3::ZERO, Vec3::Y);
        camera
    }

    #[test]
    fn test_defaults_match_scene_camera() {
        let camera = Camera::default();
        assert!((camera.fov_y - std::f32::consts::FRAC_PI_4).abs() < 1e-6);
        assert_eq!(camera.near, 1.0);
        assert_eq!(camera.far, 1000.0);
    }

    #[test]
    fn test_look_at_points_forward_at_target() {
        let camera = planet_camera();
        assert!((camera.forward() - Vec3::NEG_Z).length() < 1e-5);

        let mut oblique = Camera {
            position: Vec3::new(3.0, 2.0, 4.0),
            ..Camera::default()
        };
        oblique.look_at(Vec3::ZERO, Vec3::Y);
        let expected = (-oblique.position).normalize();
        assert!((oblique.forward() - expected).length() < 1e-5);
    }

    #[test]
    fn test_view_matrix_inverse_is_camera_transform() {
        let camera = Camera {
            position: Vec3::new(10.0, 20.0, 30.0),
            rotation: Quat::from_rotation_y(std::f32::consts::FRAC_PI_2),
            ..Camera::default()
        };
        let reconstructed = camera.view_matrix().inverse().col(3).truncate();
        assert!((reconstructed - camera.position).length() < 1e-4);
    }

    #[test]
    fn test_reverse_z_depth_range() {
        let camera = planet_camera();
        let vp = camera.view_projection_matrix();
        let near_point = vp * Vec3::new(0.0, 0.0, 6.0 - camera.near).extend(1.0);
        let far_point = vp * Vec3::new(0.0, 0.0, 6.0 - camera.far).extend(1.0);
        assert!((near_point.z / near_point.w - 1.0).abs() < 1e-4);
        assert!((far_point.z / far_point.w).abs() < 1e-4);
    }

    #[test]
    fn test_project_target_to_screen_center() {
        let camera = planet_camera();
        let center = camera.project_to_screen(Vec3::ZERO).unwrap();
        assert!((center - Vec2::splat(0.5)).length() < 1e-5);
    }

    #[test]
    fn test_point_above_projects_up_screen() {
        let camera = planet_camera();
        let above = camera.project_to_screen(Vec3::new(0.0, 1.0, 0.0)).unwrap();
        assert!(above.y < 0.5);
    }

    #[test]
    fn test_point_behind_camera_not_projected() {
        let camera = planet_camera();
        assert!(camera.project_to_screen(Vec3::new(0.0, 0.0, 20.0)).is_none());
    }

    #[test]
    fn test_aspect_ratio_ignores_zero_height() {
        let mut camera = Camera::default();
        camera.set_aspect_ratio(1920.0, 1080.0);
        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
        camera.set_aspect_ratio(100.0, 0.0);
        assert!((camera.aspect_ratio - 16.0 / 9.0).abs() < 1e-6);
    }
}
