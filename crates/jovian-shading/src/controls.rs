//! Slider descriptions for the tweak panel.

use crate::params::{ParamError, ParamId, ShaderParams};

/// Label of the color-scheme dropdown.
pub const COLOR_SCHEME_LABEL: &str = "Color Scheme";

/// Where the randomize action draws a control's new value from.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RandomizeRange {
    /// The full slider range.
    Slider,
    /// A narrower range inside the slider range.
    Sub { min: f32, max: f32 },
    /// The randomize action leaves this control alone.
    Excluded,
}

/// One panel slider bound to a shader parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ControlDescriptor {
    pub param: ParamId,
    /// Name shown next to the slider.
    pub label: &'static str,
    pub min: f32,
    pub max: f32,
    pub step: f32,
    pub randomize: RandomizeRange,
}

const fn slider(
    param: ParamId,
    label: &'static str,
    min: f32,
    max: f32,
    step: f32,
    randomize: RandomizeRange,
) -> ControlDescriptor {
    ControlDescriptor {
        param,
        label,
        min,
        max,
        step,
        randomize,
    }
}

const fn sub(min: f32, max: f32) -> RandomizeRange {
    RandomizeRange::Sub { min, max }
}

/// Sliders in panel order, one per [`ParamId`] in [`ParamId::ALL`] order.
pub const CONTROLS: [ControlDescriptor; ParamId::ALL.len()] = [
    slider(ParamId::Scale, "Base scale", 1.0, 10.0, 0.1, sub(3.0, 7.0)),
    slider(ParamId::Shift, "Base shift", 0.0, 20.0, 0.1, RandomizeRange::Slider),
    slider(ParamId::WaverScale, "Waver scale", 0.1, 3.0, 0.1, sub(0.3, 1.2)),
    slider(ParamId::WaverFactor, "Waver factor", 0.0, 5.0, 0.01, sub(0.5, 1.5)),
    slider(ParamId::WaverShift, "Waver shift", 0.0, 5.0, 0.01, RandomizeRange::Slider),
    slider(ParamId::WarperScale, "Warper scale", 0.1, 5.0, 0.1, sub(0.6, 2.6)),
    slider(ParamId::WarperFactor, "Warper factor", 0.0, 5.0, 0.01, sub(0.2, 0.6)),
    slider(ParamId::PulserAmp, "Pulser Amplitude", 0.0, 5.0, 0.1, sub(0.0, 0.5)),
    slider(ParamId::PulserOffset, "Pulser Offset", 0.0, 10.0, 0.01, sub(0.0, 2.0)),
    slider(ParamId::Hue, "Hue", 0.0, 1.0, 0.01, RandomizeRange::Slider),
    slider(ParamId::TimeSpeed, "Time Speed", 0.01, 0.5, 0.01, RandomizeRange::Excluded),
];

impl ControlDescriptor {
    /// Descriptor of the slider bound to `param`.
    pub fn for_param(param: ParamId) -> &'static ControlDescriptor {
        &CONTROLS[param.index()]
    }

    /// Clamp `value` into the slider range.
    pub fn clamp(&self, value: f32) -> f32 {
        value.clamp(self.min, self.max)
    }

    /// Randomize bounds, or `None` when the control is excluded.
    pub fn randomize_bounds(&self) -> Option<(f32, f32)> {
        match self.randomize {
            RandomizeRange::Slider => Some((self.min, self.max)),
            RandomizeRange::Sub { min, max } => Some((min, max)),
            RandomizeRange::Excluded => None,
        }
    }

    /// Set the bound parameter the way a slider does: clamped to the range.
    /// No step snapping is applied, so in-range values read back unchanged.
    pub fn apply(&self, params: &mut ShaderParams, value: f32) -> Result<f32, ParamError> {
        if !value.is_finite() {
            return Err(ParamError::NotFinite {
                param: self.param.key(),
            });
        }
        let clamped = self.clamp(value);
        params.set(self.param, clamped);
        Ok(clamped)
    }
}
