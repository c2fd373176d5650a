//! Latitude/longitude sphere mesh.

use std::f32::consts::{PI, TAU};

use glam::Vec3;
use jovian_render::VertexPositionNormalUv;

/// Segment count used for both the surface and the atmosphere shell.
pub const SPHERE_SEGMENTS: u32 = 64;

/// CPU-side sphere geometry.
pub struct SphereMesh {
    pub vertices: Vec<VertexPositionNormalUv>,
    /// Counter-clockwise when seen from outside.
    pub indices: Vec<u32>,
}

impl SphereMesh {
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Generate a UV sphere centered on the origin.
///
/// Rows run from the north pole (`v = 0`) to the south pole and each row
/// repeats its first vertex at the seam, so there are
/// `(width_segments + 1) * (height_segments + 1)` vertices. The degenerate
/// triangles touching the poles are skipped.
pub fn generate_uv_sphere(radius: f32, width_segments: u32, height_segments: u32) -> SphereMesh {
    let width_segments = width_segments.max(3);
    let height_segments = height_segments.max(2);
    let row_len = width_segments + 1;

    let mut vertices = Vec::with_capacity((row_len * (height_segments + 1)) as usize);
    for iy in 0..=height_segments {
        let v = iy as f32 / height_segments as f32;
        let (sin_theta, cos_theta) = (v * PI).sin_cos();
        for ix in 0..=width_segments {
            let u = ix as f32 / width_segments as f32;
            let (sin_phi, cos_phi) = (u * TAU).sin_cos();
            let normal = Vec3::new(-cos_phi * sin_theta, cos_theta, sin_phi * sin_theta);
            vertices.push(VertexPositionNormalUv {
                position: (normal * radius).to_array(),
                normal: normal.to_array(),
                uv: [u, 1.0 - v],
            });
        }
    }

    let mut indices = Vec::with_capacity((width_segments * height_segments * 6) as usize);
    for iy in 0..height_segments {
        for ix in 0..width_segments {
            let a = iy * row_len + ix + 1;
            let b = iy * row_len + ix;
            let c = (iy + 1) * row_len + ix;
            let d = (iy + 1) * row_len + ix + 1;
            if iy != 0 {
                indices.extend_from_slice(&[a, b, d]);
            }
            if iy != height_segments - 1 {
                indices.extend_from_slice(&[b, c, d]);
            }
        }
    }

    tracing::debug!(
        radius,
        vertices = vertices.len(),
        triangles = indices.len() / 3,
        "Generated UV sphere"
    );

    SphereMesh { vertices, indices }
}
