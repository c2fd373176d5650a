//! Opaque gas-giant body.

use jovian_render::{BufferAllocator, DepthBuffer, IndexData, MeshBuffer, VertexPositionNormalUv};
use jovian_shading::fragments::SURFACE_SHADER;

use crate::bindings::PlanetBindings;
use crate::mesh::{SPHERE_SEGMENTS, generate_uv_sphere};
use crate::shader::{ShaderError, create_checked_module};

pub const PLANET_RADIUS: f32 = 2.0;

/// Draws the planet sphere with the procedural surface shader.
pub struct SurfaceRenderer {
    pipeline: wgpu::RenderPipeline,
    mesh: MeshBuffer,
}

impl SurfaceRenderer {
    pub fn new(
        device: &wgpu::Device,
        surface_format: wgpu::TextureFormat,
        bindings: &PlanetBindings,
    ) -> Result<Self, ShaderError> {
        let shader =
            create_checked_module(device, "surface-shader", SURFACE_SHADER, &["vs_main", "fs_main"])?;

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("surface-pipeline-layout"),
            bind_group_layouts: &bindings.layouts(),
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("surface-pipeline"),
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
                cull_mode: Some(wgpu::Face::Back),
                ..Default::default()
            },
            depth_stencil: Some(DepthBuffer::write_state()),
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_main"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: surface_format,
                    blend: None,
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let sphere = generate_uv_sphere(PLANET_RADIUS, SPHERE_SEGMENTS, SPHERE_SEGMENTS);
        let mesh = BufferAllocator::new(device).create_mesh(
            "planet-surface",
            &sphere.vertices,
            IndexData::U32(&sphere.indices),
        );

        tracing::info!(
            radius = PLANET_RADIUS,
            triangles = sphere.triangle_count(),
            "Surface renderer ready"
        );

        Ok(Self { pipeline, mesh })
    }

    /// Draw the planet. The pass must have a depth attachment.
    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>, bindings: &PlanetBindings) {
        pass.set_pipeline(&self.pipeline);
        bindings.bind(pass);
        self.mesh.draw(pass);
    }

    pub fn index_count(&self) -> u32 {
        self.mesh.index_count
    }
}
