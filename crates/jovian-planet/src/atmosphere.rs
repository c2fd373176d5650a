//! Additive glow shell around the planet.
//!
//! Only the back faces of a slightly larger sphere are drawn, so the glow
//! shows as a rim around the body and behind it. Depth is tested against the
//! surface but never written.

use jovian_render::{BufferAllocator, DepthBuffer, IndexData, MeshBuffer, VertexPositionNormalUv};
use jovian_shading::fragments::ATMOSPHERE_SHADER;

use crate::bindings::PlanetBindings;
use crate::mesh::{SPHERE_SEGMENTS, generate_uv_sphere};
use crate::shader::{ShaderError, create_checked_module};

pub const ATMOSPHERE_RADIUS: f32 = 2.38;

/// `src + dst` on color; alpha keeps the destination.
const ADDITIVE: wgpu::BlendState = wgpu::BlendState {
    color: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::One,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
    alpha: wgpu::BlendComponent {
        src_factor: wgpu::BlendFactor::Zero,
        dst_factor: wgpu::BlendFactor::One,
        operation: wgpu::BlendOperation::Add,
    },
};

pub struct AtmosphereRenderer {
    pipeline: wgpu::RenderPipeline,
    mesh: MeshBuffer,
}

impl AtmosphereRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        bindings: &PlanetBindings,
    ) -> Result<Self, ShaderError> {
        let shader = create_checked_module(
            device,
            "atmosphere-shader",
            ATMOSPHERE_SHADER,
            &["vs_main", "fs_main"],
        )?;

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("atmosphere-pipeline-layout"),
            bind_group_layouts: &bindings.layouts(),
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("atmosphere-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_main"),
                buffers: &[VertexPositionNormalUv::layout()],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleList,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: Some(wgpu::Face::Front),
                ..Default::default()
            },
            depth_stencil: Some(DepthBuffer::read_only_state()),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: Some(ADDITIVE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let sphere = generate_uv_sphere(ATMOSPHERE_RADIUS, SPHERE_SEGMENTS, SPHERE_SEGMENTS);
        let mesh = BufferAllocator::new(device).create_mesh(
            "planet-atmosphere",
            &sphere.vertices,
            IndexData::U32(&sphere.indices),
        );

        tracing::info!(radius = ATMOSPHERE_RADIUS, "Atmosphere renderer ready");

        Ok(Self { pipeline, mesh })
    }

    /// Draw the shell. Must come after the surface in the same depth pass.
    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>, bindings: &PlanetBindings) {
        pass.set_pipeline(&self.pipeline);
        bindings.bind(pass);
        self.mesh.draw(pass);
    }
}
