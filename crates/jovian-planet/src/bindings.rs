//! Uniform buffers and bind groups shared by the planet pipelines.
//!
//! Group 0 holds the camera and sun ([`SceneUniform`]), group 1 the shading
//! parameters ([`ShaderUniforms`]). Both the surface and the atmosphere
//! shell bind the same two groups, so one upload per frame reaches both.

use bytemuck::{Pod, Zeroable};
use jovian_render::{BufferAllocator, Camera};
use jovian_shading::{FrameInputs, ShaderParams, ShaderUniforms};
use static_assertions::const_assert_eq;

use crate::light::SunLight;

/// Must match `SceneUniform` in `shaders/scene.wgsl`.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Pod, Zeroable)]
pub struct SceneUniform {
    pub view_proj: [[f32; 4]; 4],
    pub view: [[f32; 4]; 4],
    /// xyz = camera position, w unused.
    pub camera_pos: [f32; 4],
    /// xyz = unit vector toward the sun, w = intensity.
    pub sun_direction: [f32; 4],
    /// rgb = sun color, w unused.
    pub sun_color: [f32; 4],
}

const_assert_eq!(std::mem::size_of::<SceneUniform>(), 176);
const_assert_eq!(std::mem::size_of::<SceneUniform>() % 16, 0);

impl SceneUniform {
    pub fn new(camera: &Camera, sun: &SunLight) -> Self {
        Self {
            view_proj: camera.view_projection_matrix().to_cols_array_2d(),
            view: camera.view_matrix().to_cols_array_2d(),
            camera_pos: camera.position.extend(1.0).to_array(),
            sun_direction: sun.direction_intensity(),
            sun_color: sun.color.extend(0.0).to_array(),
        }
    }
}

/// Owns the scene and parameter buffers and their bind groups.
pub struct PlanetBindings {
    pub scene_layout: wgpu::BindGroupLayout,
    pub params_layout: wgpu::BindGroupLayout,
    scene_buffer: wgpu::Buffer,
    params_buffer: wgpu::Buffer,
    scene_bind_group: wgpu::BindGroup,
    params_bind_group: wgpu::BindGroup,
}

impl PlanetBindings {
    pub fn new(device: &wgpu::Device) -> Self {
        let scene_layout = uniform_layout::<SceneUniform>(device, "planet-scene-bgl");
        let params_layout = uniform_layout::<ShaderUniforms>(device, "planet-params-bgl");

        let allocator = BufferAllocator::new(device);
        let scene_buffer = allocator.create_uniform("planet-scene-uniform", &SceneUniform::zeroed());
        let params_buffer = allocator.create_uniform(
            "planet-params-uniform",
            &ShaderUniforms::new(&ShaderParams::default(), FrameInputs::default()),
        );

        let scene_bind_group =
            uniform_bind_group(device, "planet-scene-bind-group", &scene_layout, &scene_buffer);
        let params_bind_group = uniform_bind_group(
            device,
            "planet-params-bind-group",
            &params_layout,
            &params_buffer,
        );

        Self {
            scene_layout,
            params_layout,
            scene_buffer,
            params_buffer,
            scene_bind_group,
            params_bind_group,
        }
    }

    /// Upload this frame's camera, sun and parameter values.
    pub fn update(
        &self,
        queue: &wgpu::Queue,
        camera: &Camera,
        sun: &SunLight,
        params: &ShaderParams,
        frame: FrameInputs,
    ) {
        let scene = SceneUniform::new(camera, sun);
        queue.write_buffer(&self.scene_buffer, 0, bytemuck::bytes_of(&scene));
        let uniforms = ShaderUniforms::new(params, frame);
        queue.write_buffer(&self.params_buffer, 0, bytemuck::bytes_of(&uniforms));
    }

    /// Set groups 0 and 1 on `pass`.
    pub fn bind(&self, pass: &mut wgpu::RenderPass<'_>) {
        pass.set_bind_group(0, &self.scene_bind_group, &[]);
        pass.set_bind_group(1, &self.params_bind_group, &[]);
    }

    /// Both layouts in group order, for pipeline layouts.
    pub fn layouts(&self) -> [&wgpu::BindGroupLayout; 2] {
        [&self.scene_layout, &self.params_layout]
    }
}

fn uniform_layout<T>(device: &wgpu::Device, label: &str) -> wgpu::BindGroupLayout {
    device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
        label: Some(label),
        entries: &[wgpu::BindGroupLayoutEntry {
            binding: 0,
            visibility: wgpu::ShaderStages::VERTEX_FRAGMENT,
            ty: wgpu::BindingType::Buffer {
                ty: wgpu::BufferBindingType::Uniform,
                has_dynamic_offset: false,
                min_binding_size: wgpu::BufferSize::new(std::mem::size_of::<T>() as u64),
            },
            count: None,
        }],
    })
}

fn uniform_bind_group(
    device: &wgpu::Device,
    label: &str,
    layout: &wgpu::BindGroupLayout,
    buffer: &wgpu::Buffer,
) -> wgpu::BindGroup {
    device.create_bind_group(&wgpu::BindGroupDescriptor {
        label: Some(label),
        layout,
        entries: &[wgpu::BindGroupEntry {
            binding: 0,
            resource: buffer.as_entire_binding(),
        }],
    })
}
