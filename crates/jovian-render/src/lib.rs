//! wgpu plumbing for the Jovian viewer: device and surface setup, frame
//! encoding, depth, camera math, mesh buffers, textures and the lens flare.

pub mod buffer;
pub mod camera;
pub mod depth;
pub mod gpu;
pub mod lens_flare;
pub mod pass;
pub mod texture;

#[cfg(test)]
pub(crate) mod test_util;

pub use buffer::{BufferAllocator, IndexData, MeshBuffer, VertexPositionNormalUv};
pub use camera::Camera;
pub use depth::DepthBuffer;
pub use gpu::{RenderContext, RenderContextError, SurfaceError, init_render_context_blocking};
pub use lens_flare::{FlareElement, FlareShape, LensFlareRenderer, LensFlareSettings, Occluder};
pub use pass::{FrameEncoder, RenderPassBuilder};
pub use texture::{RgbaImage, TextureError, create_rgba_texture, load_rgba_image};
