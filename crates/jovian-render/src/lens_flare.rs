//! Screen-space lens flare anchored at a world-space light.
//!
//! The flare is a set of instanced quads laid out along the line from the
//! light's screen position through the screen center: a central glare with
//! star rays, a halo, secondary ghosts and thin streaks. Intensity fades near
//! the screen border and eases toward zero while an opaque body blocks the
//! line of sight to the light.

use bytemuck::{Pod, Zeroable};
use glam::{Vec2, Vec3};
use wgpu::util::DeviceExt;

use crate::camera::Camera;
use crate::texture::{RgbaImage, create_rgba_texture};

/// Maximum number of flare elements drawn per frame.
pub const MAX_FLARE_ELEMENTS: usize = 32;

/// Core sprite size relative to `flare_size`.
const CORE_SPRITE_SCALE: f32 = 12.5;

/// Shape drawn by one flare element.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FlareShape {
    /// Ghost blended between a hexagon and a circle by `param` (0 = hexagon, 2 = circle).
    Ghost,
    /// Thin ring around the light.
    Halo,
    /// Dense radial fringes.
    Starburst,
    /// Long horizontal streak.
    Anamorphic,
    /// Central glare with `param` star points.
    Glare,
    /// Thin streak rotated by `param` radians.
    Streak,
    /// Soft bright disc.
    Core,
}

impl FlareShape {
    fn as_u32(self) -> u32 {
        match self {
            FlareShape::Ghost => 0,
            FlareShape::Halo => 1,
            FlareShape::Starburst => 2,
            FlareShape::Anamorphic => 3,
            FlareShape::Glare => 4,
            FlareShape::Streak => 5,
            FlareShape::Core => 6,
        }
    }
}

/// One flare element.
#[derive(Clone, Debug, PartialEq)]
pub struct FlareElement {
    /// 0.0 = at the light, 1.0 = at screen center, >1.0 = past the center.
    pub line_position: f32,
    /// Half-size relative to the screen height.
    pub scale: f32,
    /// Linear RGB tint.
    pub color: [f32; 3],
    pub opacity: f32,
    pub shape: FlareShape,
    /// Shape-specific parameter.
    pub param: f32,
}

/// Tunables of the whole flare.
#[derive(Clone, Debug, PartialEq)]
pub struct LensFlareSettings {
    pub enabled: bool,
    pub opacity: f32,
    /// Per-channel gain; only the ratio between channels matters.
    pub color_gain: [f32; 3],
    pub star_points: f32,
    pub glare_size: f32,
    pub flare_size: f32,
    /// Ghost roundness, 0 = hexagon, 2 = circle.
    pub flare_shape: f32,
    pub halo_scale: f32,
    pub ghost_scale: f32,
    pub secondary_ghosts: bool,
    pub additional_streaks: bool,
    pub anamorphic: bool,
    pub star_burst: bool,
    /// Screen-edge fade margin in `[0, 0.5]`.
    pub edge_fade_margin: f32,
    /// Rate per second at which visibility approaches its target.
    pub fade_speed: f32,
}

impl Default for LensFlareSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            opacity: 0.8,
            color_gain: [95.0, 12.0, 10.0],
            star_points: 2.0,
            glare_size: 0.1,
            flare_size: 0.004,
            flare_shape: 1.5,
            halo_scale: 1.0,
            ghost_scale: 0.3,
            secondary_ghosts: true,
            additional_streaks: true,
            anamorphic: false,
            star_burst: false,
            edge_fade_margin: 0.3,
            fade_speed: 8.0,
        }
    }
}

impl LensFlareSettings {
    /// `color_gain` normalized so its largest channel is 1.
    pub fn tint(&self) -> [f32; 3] {
        let max = self.color_gain.iter().copied().fold(0.0_f32, f32::max);
        if max <= 0.0 {
            return [1.0; 3];
        }
        self.color_gain.map(|c| (c / max).max(0.0))
    }

    /// The flare elements these settings produce.
    pub fn elements(&self) -> Vec<FlareElement> {
        let tint = self.tint();
        let warm = [1.0, 0.95, 0.85];
        let tinted = |k: f32| [0.5 + 0.5 * tint[0] * k, 0.5 * tint[1] + 0.3, 0.5 * tint[2] + 0.3];

        let mut elements = vec![
            FlareElement {
                line_position: 0.0,
                scale: self.glare_size,
                color: warm,
                opacity: 1.0,
                shape: FlareShape::Glare,
                param: self.star_points,
            },
            FlareElement {
                line_position: 0.0,
                scale: self.flare_size * CORE_SPRITE_SCALE,
                color: [1.0, 1.0, 1.0],
                opacity: 1.0,
                shape: FlareShape::Core,
                param: 0.0,
            },
            FlareElement {
                line_position: 0.0,
                scale: 0.35 * self.halo_scale,
                color: tinted(0.6),
                opacity: 0.2,
                shape: FlareShape::Halo,
                param: 0.0,
            },
        ];

        if self.secondary_ghosts {
            const GHOSTS: [(f32, f32, f32); 5] = [
                (0.45, 0.5, 0.35),
                (0.75, 0.9, 0.25),
                (1.15, 0.35, 0.4),
                (1.45, 0.7, 0.3),
                (1.8, 1.0, 0.2),
            ];
            for (i, (line_position, size, opacity)) in GHOSTS.into_iter().enumerate() {
                elements.push(FlareElement {
                    line_position,
                    scale: self.ghost_scale * size * 0.4,
                    color: tinted(1.0 - 0.15 * i as f32),
                    opacity,
                    shape: FlareShape::Ghost,
                    param: self.flare_shape,
                });
            }
        }

        if self.additional_streaks {
            for angle in [0.0_f32, 60.0, 120.0] {
                elements.push(FlareElement {
                    line_position: 0.0,
                    scale: self.glare_size * 3.0,
                    color: warm,
                    opacity: 0.35,
                    shape: FlareShape::Streak,
                    param: angle.to_radians(),
                });
            }
        }

        if self.anamorphic {
            elements.push(FlareElement {
                line_position: 0.0,
                scale: 0.6,
                color: tinted(1.0),
                opacity: 0.3,
                shape: FlareShape::Anamorphic,
                param: 0.0,
            });
        }

        if self.star_burst {
            elements.push(FlareElement {
                line_position: 0.0,
                scale: self.glare_size * 2.0,
                color: warm,
                opacity: 0.5,
                shape: FlareShape::Starburst,
                param: 0.0,
            });
        }

        elements.truncate(MAX_FLARE_ELEMENTS);
        elements
    }
}

/// A sphere that blocks the line of sight to the light.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Occluder {
    pub center: Vec3,
    pub radius: f32,
}

impl Occluder {
    /// Whether the segment from `origin` to `target` passes through the sphere.
    pub fn blocks(&self, origin: Vec3, target: Vec3) -> bool {
        let to_target = target - origin;
        let distance = to_target.length();
        if distance <= f32::EPSILON {
            return false;
        }
        let dir = to_target / distance;
        let oc = origin - self.center;
        let c = oc.length_squared() - self.radius * self.radius;
        if c <= 0.0 {
            return true;
        }
        let b = oc.dot(dir);
        let disc = b * b - c;
        if disc < 0.0 {
            return false;
        }
        let t = -b - disc.sqrt();
        t > 0.0 && t < distance
    }
}

/// GPU instance data for a single flare element.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
struct FlareInstance {
    /// Screen-space center in UV coordinates.
    center: [f32; 2],
    /// Half-size in NDC.
    scale: [f32; 2],
    /// Linear RGB premultiplied by intensity, alpha = opacity.
    color: [f32; 4],
    shape: u32,
    param: f32,
    _pad: [u32; 2],
}

/// WGSL source for the flare pipeline.
pub const LENS_FLARE_SHADER_SOURCE: &str = r#"
struct FlareInstance {
    center: vec2<f32>,
    scale: vec2<f32>,
    color: vec4<f32>,
    shape: u32,
    param: f32,
};

@group(0) @binding(0) var<storage, read> instances: array<FlareInstance>;
@group(0) @binding(1) var dirt_texture: texture_2d<f32>;
@group(0) @binding(2) var dirt_sampler: sampler;

struct VertexOutput {
    @builtin(position) position: vec4<f32>,
    @location(0) uv: vec2<f32>,
    @location(1) color: vec4<f32>,
    @location(2) @interpolate(flat) shape: u32,
    @location(3) @interpolate(flat) param: f32,
    @location(4) screen_uv: vec2<f32>,
};

@vertex
fn vs_flare(@builtin(vertex_index) vid: u32, @builtin(instance_index) iid: u32) -> VertexOutput {
    let inst = instances[iid];
    // Triangle-strip quad: 0,1,2,3 -> BL,BR,TL,TR
    let corner = vec2<f32>(f32(vid & 1u), f32((vid >> 1u) & 1u));
    let local = (corner - 0.5) * 2.0;

    let screen = inst.center * 2.0 - 1.0;
    let pos = vec2<f32>(
        screen.x + local.x * inst.scale.x,
        -(screen.y + local.y * inst.scale.y),
    );

    var out: VertexOutput;
    out.position = vec4<f32>(pos, 0.0, 1.0);
    out.uv = local;
    out.color = inst.color;
    out.shape = inst.shape;
    out.param = inst.param;
    out.screen_uv = vec2<f32>(pos.x * 0.5 + 0.5, 0.5 - pos.y * 0.5);
    return out;
}

fn ghost(uv: vec2<f32>, roundness: f32) -> f32 {
    let a = abs(uv);
    let hex = max(a.x * 0.866 + a.y * 0.5, a.y);
    let d = mix(hex, length(uv), clamp(roundness * 0.5, 0.0, 1.0));
    let body = smoothstep(1.0, 0.8, d);
    let rim = smoothstep(0.5, 0.95, d);
    return body * (0.35 + 0.65 * rim);
}

fn halo(uv: vec2<f32>) -> f32 {
    let r = length(uv);
    return smoothstep(1.0, 0.85, r) * smoothstep(0.7, 0.85, r);
}

fn starburst(uv: vec2<f32>) -> f32 {
    let r = length(uv);
    let angle = atan2(uv.y, uv.x);
    let spikes = pow(abs(cos(angle * 8.0)), 16.0);
    let spikes2 = pow(abs(cos(angle * 6.0 + 0.5)), 24.0);
    let falloff = exp(-r * r * 3.0);
    let core = exp(-r * r * 20.0);
    return (spikes * 0.6 + spikes2 * 0.4) * falloff + core;
}

fn anamorphic_streak(uv: vec2<f32>) -> f32 {
    let hor = exp(-uv.y * uv.y * 80.0) * exp(-uv.x * uv.x * 0.5);
    let core = exp(-dot(uv, uv) * 10.0);
    return hor * 0.7 + core * 0.3;
}

fn glare(uv: vec2<f32>, points: f32) -> f32 {
    let r = length(uv);
    let angle = atan2(uv.y, uv.x);
    let rays = pow(abs(cos(angle * max(points, 0.0))), 12.0) * step(0.5, points);
    let falloff = exp(-r * r * 4.0);
    let core = exp(-r * r * 30.0);
    return rays * falloff * 0.6 + core;
}

fn streak(uv: vec2<f32>, angle: f32) -> f32 {
    let c = cos(angle);
    let s = sin(angle);
    let p = vec2<f32>(c * uv.x + s * uv.y, -s * uv.x + c * uv.y);
    return exp(-p.y * p.y * 400.0) * exp(-p.x * p.x * 1.5);
}

fn core_disc(uv: vec2<f32>) -> f32 {
    return exp(-dot(uv, uv) * 8.0);
}

@fragment
fn fs_flare(in: VertexOutput) -> @location(0) vec4<f32> {
    let dirt = textureSample(dirt_texture, dirt_sampler, in.screen_uv).rgb;

    var alpha: f32;
    switch in.shape {
        case 0u: { alpha = ghost(in.uv, in.param); }
        case 1u: { alpha = halo(in.uv); }
        case 2u: { alpha = starburst(in.uv); }
        case 3u: { alpha = anamorphic_streak(in.uv); }
        case 4u: { alpha = glare(in.uv, in.param); }
        case 5u: { alpha = streak(in.uv, in.param); }
        case 6u: { alpha = core_disc(in.uv); }
        default: { alpha = 0.0; }
    }
    let final_alpha = alpha * in.color.a;
    if final_alpha < 0.001 {
        discard;
    }
    return vec4<f32>(in.color.rgb * dirt * final_alpha, final_alpha);
}
"#;

/// Draws the flare as instanced quads over the finished scene.
pub struct LensFlareRenderer {
    settings: LensFlareSettings,
    elements: Vec<FlareElement>,
    pipeline: wgpu::RenderPipeline,
    instance_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    _dirt_texture: wgpu::Texture,
    visibility: f32,
    active_count: u32,
}

impl LensFlareRenderer {
    /// Build the pipeline. `dirt` modulates the flare; `None` uses plain white.
    pub fn new(
        device: &wgpu::Device,
        queue: &wgpu::Queue,
        target_format: wgpu::TextureFormat,
        settings: LensFlareSettings,
        dirt: Option<&RgbaImage>,
    ) -> Self {
        let shader = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some("lens-flare-shader"),
            source: wgpu::ShaderSource::Wgsl(LENS_FLARE_SHADER_SOURCE.into()),
        });

        let instance_data = vec![FlareInstance::zeroed(); MAX_FLARE_ELEMENTS];
        let instance_buffer = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some("flare-instances"),
            contents: bytemuck::cast_slice(&instance_data),
            usage: wgpu::BufferUsages::STORAGE | wgpu::BufferUsages::COPY_DST,
        });

        let white = RgbaImage::white();
        let (dirt_texture, dirt_view) =
            create_rgba_texture(device, queue, "flare-dirt", dirt.unwrap_or(&white));
        let dirt_sampler = device.create_sampler(&wgpu::SamplerDescriptor {
            label: Some("flare-dirt-sampler"),
            mag_filter: wgpu::FilterMode::Linear,
            min_filter: wgpu::FilterMode::Linear,
            ..Default::default()
        });

        let bgl = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some("flare-bgl"),
            entries: &[
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Storage { read_only: true },
                        has_dynamic_offset: false,
                        min_binding_size: None,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 1,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Texture {
                        sample_type: wgpu::TextureSampleType::Float { filterable: true },
                        view_dimension: wgpu::TextureViewDimension::D2,
                        multisampled: false,
                    },
                    count: None,
                },
                wgpu::BindGroupLayoutEntry {
                    binding: 2,
                    visibility: wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Sampler(wgpu::SamplerBindingType::Filtering),
                    count: None,
                },
            ],
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some("flare-bg"),
            layout: &bgl,
            entries: &[
                wgpu::BindGroupEntry {
                    binding: 0,
                    resource: instance_buffer.as_entire_binding(),
                },
                wgpu::BindGroupEntry {
                    binding: 1,
                    resource: wgpu::BindingResource::TextureView(&dirt_view),
                },
                wgpu::BindGroupEntry {
                    binding: 2,
                    resource: wgpu::BindingResource::Sampler(&dirt_sampler),
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some("flare-pipeline-layout"),
            bind_group_layouts: &[&bgl],
            immediate_size: 0,
        });

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some("lens-flare-pipeline"),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: &shader,
                entry_point: Some("vs_flare"),
                buffers: &[],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            primitive: wgpu::PrimitiveState {
                topology: wgpu::PrimitiveTopology::TriangleStrip,
                ..Default::default()
            },
            depth_stencil: None,
            multisample: wgpu::MultisampleState::default(),
            fragment: Some(wgpu::FragmentState {
                module: &shader,
                entry_point: Some("fs_flare"),
                targets: &[Some(wgpu::ColorTargetState {
                    format: target_format,
                    blend: Some(wgpu::BlendState {
                        color: wgpu::BlendComponent {
                            src_factor: wgpu::BlendFactor::One,
                            dst_factor: wgpu::BlendFactor::One,
                            operation: wgpu::BlendOperation::Add,
                        },
                        alpha: wgpu::BlendComponent::OVER,
                    }),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            multiview_mask: None,
            cache: None,
        });

        let elements = settings.elements();
        log::info!(
            "Lens flare renderer initialized ({} elements, dirt texture: {})",
            elements.len(),
            dirt.is_some()
        );

        Self {
            settings,
            elements,
            pipeline,
            instance_buffer,
            bind_group,
            _dirt_texture: dirt_texture,
            visibility: 1.0,
            active_count: 0,
        }
    }

    pub fn settings(&self) -> &LensFlareSettings {
        &self.settings
    }

    /// Smoothed visibility in `[0, 1]`.
    pub fn visibility(&self) -> f32 {
        self.visibility
    }

    /// Recompute instance data for this frame.
    ///
    /// Returns `true` when anything will be drawn.
    pub fn update(
        &mut self,
        queue: &wgpu::Queue,
        camera: &Camera,
        light_position: Vec3,
        occluders: &[Occluder],
        dt: f32,
    ) -> bool {
        self.active_count = 0;
        if !self.settings.enabled {
            return false;
        }

        let blocked = occluders
            .iter()
            .any(|o| o.blocks(camera.position, light_position));
        let target = if blocked { 0.0 } else { 1.0 };
        self.visibility = step_visibility(self.visibility, target, self.settings.fade_speed, dt);

        let Some(screen_pos) = camera.project_to_screen(light_position) else {
            return false;
        };
        let intensity = self.settings.opacity
            * edge_fade_factor(screen_pos, self.settings.edge_fade_margin)
            * self.visibility;
        if intensity <= 0.0 {
            return false;
        }

        let instances = build_instances(&self.elements, screen_pos, camera.aspect_ratio, intensity);
        self.active_count = instances.len() as u32;
        queue.write_buffer(&self.instance_buffer, 0, bytemuck::cast_slice(&instances));
        true
    }

    /// Draw the elements prepared by the last [`update`](Self::update).
    pub fn render(&self, pass: &mut wgpu::RenderPass<'_>) {
        if self.active_count == 0 {
            return;
        }
        pass.set_pipeline(&self.pipeline);
        pass.set_bind_group(0, &self.bind_group, &[]);
        pass.draw(0..4, 0..self.active_count);
    }

    pub fn element_count(&self) -> u32 {
        self.elements.len() as u32
    }
}

fn build_instances(
    elements: &[FlareElement],
    light_screen_pos: Vec2,
    aspect_ratio: f32,
    intensity: f32,
) -> Vec<FlareInstance> {
    elements
        .iter()
        .take(MAX_FLARE_ELEMENTS)
        .map(|elem| {
            let pos = element_screen_position(light_screen_pos, elem.line_position);
            let sy = if elem.shape == FlareShape::Anamorphic {
                elem.scale * 0.05
            } else {
                elem.scale
            };
            FlareInstance {
                center: pos.to_array(),
                scale: [elem.scale / aspect_ratio.max(f32::EPSILON), sy],
                color: [
                    elem.color[0] * intensity,
                    elem.color[1] * intensity,
                    elem.color[2] * intensity,
                    elem.opacity,
                ],
                shape: elem.shape.as_u32(),
                param: elem.param,
                _pad: [0; 2],
            }
        })
        .collect()
}

/// Screen position of an element along the light-to-center line.
pub fn element_screen_position(light_screen_pos: Vec2, line_position: f32) -> Vec2 {
    let screen_center = Vec2::splat(0.5);
    light_screen_pos + (screen_center - light_screen_pos) * line_position
}

/// 1.0 inside the safe area, falling to 0.0 at the screen border.
pub fn edge_fade_factor(screen_pos: Vec2, margin: f32) -> f32 {
    let max_dist = (screen_pos - Vec2::splat(0.5)).abs().max_element();
    let fade_start = 0.5 - margin;
    if max_dist < fade_start {
        1.0
    } else if margin <= 0.0 {
        0.0
    } else {
        ((0.5 - max_dist) / margin).clamp(0.0, 1.0)
    }
}

/// Move `current` toward `target` by an exponential step of `rate * dt`.
pub fn step_visibility(current: f32, target: f32, rate: f32, dt: f32) -> f32 {
    let t = (rate * dt).clamp(0.0, 1.0);
    (current + (target - current) * t).clamp(0.0, 1.0)
}
