//! The sun: a single directional light that also anchors the lens flare.

use glam::Vec3;

/// Directional light shining from `position` toward the origin.
///
/// The position only fixes the direction for shading; the lens flare uses
/// it as the on-screen anchor of the light.
#[derive(Clone, Debug, PartialEq)]
pub struct SunLight {
    pub position: Vec3,
    /// Linear RGB, not premultiplied by intensity.
    pub color: Vec3,
    pub intensity: f32,
}

impl Default for SunLight {
    fn default() -> Self {
        Self {
            position: Vec3::new(25.0, 0.0, -40.0),
            color: Vec3::ONE,
            intensity: 0.7,
        }
    }
}

impl SunLight {
    /// Unit vector from the origin toward the sun.
    pub fn direction_to_sun(&self) -> Vec3 {
        self.position.normalize_or(Vec3::Y)
    }

    /// xyz = direction toward the sun, w = intensity.
    pub fn direction_intensity(&self) -> [f32; 4] {
        self.direction_to_sun().extend(self.intensity).to_array()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sun() {
        let sun = SunLight::default();
        assert_eq!(sun.position, Vec3::new(25.0, 0.0, -40.0));
        assert_eq!(sun.color, Vec3::ONE);
        assert!((sun.intensity - 0.7).abs() < f32::EPSILON);
    }

    #[test]
    fn test_direction_is_normalized() {
        let dir = SunLight::default().direction_to_sun();
        assert!((dir.length() - 1.0).abs() < 1e-6);
        assert!(dir.x > 0.0 && dir.z < 0.0);
    }

    #[test]
    fn test_zero_position_falls_back_to_up() {
        let sun = SunLight {
            position: Vec3::ZERO,
            ..Default::default()
        };
        assert_eq!(sun.direction_to_sun(), Vec3::Y);
    }

    #[test]
    fn test_direction_intensity_packs_w() {
        let packed = SunLight::default().direction_intensity();
        assert!((packed[3] - 0.7).abs() < f32::EPSILON);
    }
}
