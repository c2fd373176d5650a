//! The planet itself: sphere meshes, the sun, the bind groups shared by both
//! planet pipelines, and the surface and atmosphere shell renderers.

pub mod atmosphere;
pub mod bindings;
pub mod light;
pub mod mesh;
pub mod shader;
pub mod surface;

#[cfg(test)]
pub(crate) mod test_util;

pub use atmosphere::{ATMOSPHERE_RADIUS, AtmosphereRenderer};
pub use bindings::{PlanetBindings, SceneUniform};
pub use light::SunLight;
pub use mesh::{SPHERE_SEGMENTS, SphereMesh, generate_uv_sphere};
pub use shader::{ShaderError, create_checked_module};
pub use surface::{PLANET_RADIUS, SurfaceRenderer};
