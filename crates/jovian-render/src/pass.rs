//! Render pass helpers.
//!
//! [`RenderPassBuilder`] describes one pass declaratively and [`FrameEncoder`]
//! owns the command encoder and swapchain texture for a single frame.

use std::sync::Arc;

use crate::depth::DepthBuffer;

/// Deep space clear color.
pub const SPACE_BLACK: wgpu::Color = wgpu::Color {
    r: 0.0,
    g: 0.0,
    b: 0.0,
    a: 1.0,
};

#[derive(Debug)]
struct DepthAttachment<'a> {
    view: &'a wgpu::TextureView,
    clear_value: f32,
}

/// Fluent description of a render pass.
///
/// Without a clear color the pass loads the existing contents, which is how
/// overlays such as the lens flare draw on top of the scene.
#[derive(Debug)]
pub struct RenderPassBuilder<'a> {
    clear_color: Option<wgpu::Color>,
    depth: Option<DepthAttachment<'a>>,
    label: Option<&'static str>,
}

impl Default for RenderPassBuilder<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl<'a> RenderPassBuilder<'a> {
    /// A pass that clears to [`SPACE_BLACK`] with no depth attachment.
    pub fn new() -> Self {
        Self {
            clear_color: Some(SPACE_BLACK),
            depth: None,
            label: None,
        }
    }

    pub fn clear_color(mut self, color: wgpu::Color) -> Self {
        self.clear_color = Some(color);
        self
    }

    /// Keep the current color contents instead of clearing.
    pub fn load(mut self) -> Self {
        self.clear_color = None;
        self
    }

    /// Attach and clear a reverse-Z depth buffer.
    pub fn depth(mut self, depth: &'a DepthBuffer) -> Self {
        self.depth = Some(DepthAttachment {
            view: &depth.view,
            clear_value: DepthBuffer::CLEAR_VALUE,
        });
        self
    }

    pub fn label(mut self, label: &'static str) -> Self {
        self.label = Some(label);
        self
    }

    fn color_load_op(&self) -> wgpu::LoadOp<wgpu::Color> {
        match self.clear_color {
            Some(color) => wgpu::LoadOp::Clear(color),
            None => wgpu::LoadOp::Load,
        }
    }

    fn begin<'encoder>(
        &self,
        encoder: &'encoder mut wgpu::CommandEncoder,
        color_view: &'encoder wgpu::TextureView,
    ) -> wgpu::RenderPass<'encoder> {
        let color_attachment = wgpu::RenderPassColorAttachment {
            view: color_view,
            resolve_target: None,
            ops: wgpu::Operations {
                load: self.color_load_op(),
                store: wgpu::StoreOp::Store,
            },
            depth_slice: None,
        };

        let depth_stencil_attachment =
            self.depth
                .as_ref()
                .map(|depth| wgpu::RenderPassDepthStencilAttachment {
                    view: depth.view,
                    depth_ops: Some(wgpu::Operations {
                        load: wgpu::LoadOp::Clear(depth.clear_value),
                        store: wgpu::StoreOp::Store,
                    }),
                    stencil_ops: None,
                });

        encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: self.label,
            color_attachments: &[Some(color_attachment)],
            depth_stencil_attachment,
            timestamp_writes: None,
            occlusion_query_set: None,
            multiview_mask: None,
        })
    }
}

/// Command encoder and swapchain texture for one frame.
///
/// [`submit`](Self::submit) consumes the encoder, so a frame can only be
/// presented once.
pub struct FrameEncoder {
    encoder: wgpu::CommandEncoder,
    queue: Arc<wgpu::Queue>,
    surface_texture: wgpu::SurfaceTexture,
    surface_view: wgpu::TextureView,
}

impl FrameEncoder {
    pub fn new(
        device: &wgpu::Device,
        queue: Arc<wgpu::Queue>,
        surface_texture: wgpu::SurfaceTexture,
    ) -> Self {
        let encoder = device.create_command_encoder(&wgpu::CommandEncoderDescriptor {
            label: Some("frame-encoder"),
        });
        let surface_view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());

        Self {
            encoder,
            queue,
            surface_texture,
            surface_view,
        }
    }

    /// Begin a pass targeting the swapchain texture.
    pub fn begin_render_pass<'a>(
        &'a mut self,
        builder: &RenderPassBuilder<'a>,
    ) -> wgpu::RenderPass<'a> {
        builder.begin(&mut self.encoder, &self.surface_view)
    }

    /// Submit the recorded commands and present the frame.
    pub fn submit(self) {
        self.queue.submit([self.encoder.finish()]);
        self.surface_texture.present();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_clears_to_black() {
        let builder = RenderPassBuilder::new();
        assert_eq!(builder.clear_color, Some(SPACE_BLACK));
        assert!(matches!(builder.color_load_op(), wgpu::LoadOp::Clear(c) if c == SPACE_BLACK));
    }

    #[test]
    fn test_load_keeps_contents() {
        let builder = RenderPassBuilder::new().load();
        assert!(matches!(builder.color_load_op(), wgpu::LoadOp::Load));
    }

    #[test]
    fn test_clear_color_overrides_load() {
        let builder = RenderPassBuilder::new().load().clear_color(wgpu::Color::RED);
        assert!(matches!(builder.color_load_op(), wgpu::LoadOp::Clear(c) if c == wgpu::Color::RED));
    }

    #[test]
    fn test_depth_attachment_is_optional() {
        assert!(RenderPassBuilder::new().depth.is_none());
    }

    #[test]
    fn test_label_is_stored() {
        let builder = RenderPassBuilder::new().label("planet-pass");
        assert_eq!(builder.label, Some("planet-pass"));
    }
}
