//! GPU layout of the shared parameter uniform.

use bytemuck::{Pod, Zeroable};
use static_assertions::const_assert_eq;

use crate::params::{ParamId, ShaderParams};

/// Per-frame values that are not panel parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FrameInputs {
    /// Seconds since startup.
    pub time: f32,
    /// Framebuffer size in physical pixels.
    pub resolution: [f32; 2],
    /// Cursor position in physical pixels.
    pub mouse: [f32; 2],
}

/// Uniform bound at group 1 by both the surface and atmosphere pipelines.
///
/// Must match `ShaderParams` in `shaders/params.wgsl` (80 bytes).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Pod, Zeroable)]
pub struct ShaderUniforms {
    pub resolution: [f32; 2],
    pub mouse: [f32; 2],
    pub time: f32,
    pub scale: f32,
    pub shift: f32,
    pub waver_scale: f32,
    pub waver_factor: f32,
    pub waver_shift: f32,
    pub warper_scale: f32,
    pub warper_factor: f32,
    pub pulser_amp: f32,
    pub pulser_offset: f32,
    pub hue: f32,
    pub time_speed: f32,
    pub color_scheme: i32,
    pub _padding: [u32; 3],
}

const_assert_eq!(std::mem::size_of::<ShaderUniforms>(), 80);
const_assert_eq!(std::mem::size_of::<ShaderUniforms>() % 16, 0);

impl ShaderUniforms {
    pub fn new(params: &ShaderParams, frame: FrameInputs) -> Self {
        Self {
            resolution: frame.resolution,
            mouse: frame.mouse,
            time: frame.time,
            scale: params.get(ParamId::Scale),
            shift: params.get(ParamId::Shift),
            waver_scale: params.get(ParamId::WaverScale),
            waver_factor: params.get(ParamId::WaverFactor),
            waver_shift: params.get(ParamId::WaverShift),
            warper_scale: params.get(ParamId::WarperScale),
            warper_factor: params.get(ParamId::WarperFactor),
            pulser_amp: params.get(ParamId::PulserAmp),
            pulser_offset: params.get(ParamId::PulserOffset),
            hue: params.get(ParamId::Hue),
            time_speed: params.get(ParamId::TimeSpeed),
            color_scheme: params.color_scheme().value(),
            _padding: [0; 3],
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::params::ColorScheme;

    #[test]
    fn test_floats_follow_param_order() {
        let mut params = ShaderParams::default();
        for (i, id) in ParamId::ALL.into_iter().enumerate() {
            params.set(id, 100.0 + i as f32);
        }
        let uniforms = ShaderUniforms::new(&params, FrameInputs::default());
        let words: &[f32] = bytemuck::cast_slice(bytemuck::bytes_of(&uniforms));
        // resolution(2) + mouse(2) + time(1) precede the parameters.
        for i in 0..ParamId::ALL.len() {
            assert_eq!(words[5 + i], 100.0 + i as f32);
        }
    }

    #[test]
    fn test_frame_inputs_and_scheme() {
        let mut params = ShaderParams::default();
        params.set_color_scheme(ColorScheme::ReverseMonochromatic);
        let frame = FrameInputs {
            time: 12.5,
            resolution: [1280.0, 720.0],
            mouse: [3.0, 4.0],
        };
        let uniforms = ShaderUniforms::new(&params, frame);
        assert_eq!(uniforms.resolution, [1280.0, 720.0]);
        assert_eq!(uniforms.mouse, [3.0, 4.0]);
        assert_eq!(uniforms.time, 12.5);
        assert_eq!(uniforms.color_scheme, 3);
    }

    #[test]
    fn test_scheme_offset() {
        assert_eq!(std::mem::offset_of!(ShaderUniforms, color_scheme), 64);
    }
}
