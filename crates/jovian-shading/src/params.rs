//! The shared shader parameter set.

use std::fmt;

/// Key under which the color scheme is exposed by name.
pub const COLOR_SCHEME_KEY: &str = "colorScheme";

/// Errors from name-based parameter access.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParamError {
    #[error("unknown shader parameter '{0}'")]
    UnknownParam(String),

    #[error("{0} is not a color scheme value (expected 1-4)")]
    InvalidSchemeValue(f32),

    #[error("unknown color scheme '{0}'")]
    UnknownScheme(String),

    #[error("value for '{param}' is not finite")]
    NotFinite { param: &'static str },
}

/// Identifies one of the float parameters of the surface pattern.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ParamId {
    Scale,
    Shift,
    WaverScale,
    WaverFactor,
    WaverShift,
    WarperScale,
    WarperFactor,
    PulserAmp,
    PulserOffset,
    Hue,
    TimeSpeed,
}

impl ParamId {
    /// Every parameter, in uniform-buffer order.
    pub const ALL: [ParamId; 11] = [
        ParamId::Scale,
        ParamId::Shift,
        ParamId::WaverScale,
        ParamId::WaverFactor,
        ParamId::WaverShift,
        ParamId::WarperScale,
        ParamId::WarperFactor,
        ParamId::PulserAmp,
        ParamId::PulserOffset,
        ParamId::Hue,
        ParamId::TimeSpeed,
    ];

    /// Name used by the panel API and name-based access.
    pub const fn key(self) -> &'static str {
        match self {
            ParamId::Scale => "scale",
            ParamId::Shift => "shift",
            ParamId::WaverScale => "waverScale",
            ParamId::WaverFactor => "waverFactor",
            ParamId::WaverShift => "waverShift",
            ParamId::WarperScale => "warperScale",
            ParamId::WarperFactor => "warperFactor",
            ParamId::PulserAmp => "pulserAmp",
            ParamId::PulserOffset => "pulserOffset",
            ParamId::Hue => "hue",
            ParamId::TimeSpeed => "timeSpeed",
        }
    }

    pub fn from_key(key: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|id| id.key() == key)
    }

    /// Value the parameter holds at startup.
    pub const fn default_value(self) -> f32 {
        match self {
            ParamId::Scale => 5.0,
            ParamId::Shift => 0.0,
            ParamId::WaverScale => 0.6,
            ParamId::WaverFactor => 0.9,
            ParamId::WaverShift => 1.6,
            ParamId::WarperScale => 2.0,
            ParamId::WarperFactor => 0.4,
            ParamId::PulserAmp => 0.3,
            ParamId::PulserOffset => 0.0,
            ParamId::Hue => 0.0,
            ParamId::TimeSpeed => 0.03,
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for ParamId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// How the pattern value is mapped to color.
///
/// The discriminants are the values the shaders receive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(i32)]
pub enum ColorScheme {
    #[default]
    Monochromatic = 1,
    Analogous = 2,
    ReverseMonochromatic = 3,
    ReverseAnalogous = 4,
}

impl ColorScheme {
    pub const ALL: [ColorScheme; 4] = [
        ColorScheme::Monochromatic,
        ColorScheme::Analogous,
        ColorScheme::ReverseMonochromatic,
        ColorScheme::ReverseAnalogous,
    ];

    /// Label shown in the panel dropdown.
    pub const fn label(self) -> &'static str {
        match self {
            ColorScheme::Monochromatic => "monochromatic",
            ColorScheme::Analogous => "analogous",
            ColorScheme::ReverseMonochromatic => "reverse mono.",
            ColorScheme::ReverseAnalogous => "reverse ana.",
        }
    }

    pub fn from_label(label: &str) -> Result<Self, ParamError> {
        Self::ALL
            .into_iter()
            .find(|scheme| scheme.label() == label)
            .ok_or_else(|| ParamError::UnknownScheme(label.to_string()))
    }

    pub const fn value(self) -> i32 {
        self as i32
    }

    pub fn from_value(value: i32) -> Option<Self> {
        Self::ALL.into_iter().find(|scheme| scheme.value() == value)
    }

    /// Reverse schemes invert the pattern value before coloring.
    pub const fn is_reversed(self) -> bool {
        matches!(
            self,
            ColorScheme::ReverseMonochromatic | ColorScheme::ReverseAnalogous
        )
    }

    /// Analogous schemes drift the hue with the pattern value.
    pub const fn is_analogous(self) -> bool {
        matches!(
            self,
            ColorScheme::Analogous | ColorScheme::ReverseAnalogous
        )
    }

    /// The following scheme in dropdown order, wrapping around.
    pub fn next(self) -> Self {
        let idx = Self::ALL.iter().position(|s| *s == self).unwrap_or(0);
        Self::ALL[(idx + 1) % Self::ALL.len()]
    }
}

impl fmt::Display for ColorScheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Authoritative values for every shader parameter.
///
/// Programmatic sets store the value unchanged, including values outside the
/// panel's slider range. Range enforcement lives in
/// [`ControlDescriptor::apply`](crate::ControlDescriptor::apply).
#[derive(Debug, Clone, PartialEq)]
pub struct ShaderParams {
    values: [f32; ParamId::ALL.len()],
    color_scheme: ColorScheme,
}

impl Default for ShaderParams {
    fn default() -> Self {
        Self {
            values: ParamId::ALL.map(ParamId::default_value),
            color_scheme: ColorScheme::default(),
        }
    }
}

impl ShaderParams {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, id: ParamId) -> f32 {
        self.values[id.index()]
    }

    pub fn set(&mut self, id: ParamId, value: f32) {
        self.values[id.index()] = value;
    }

    pub fn color_scheme(&self) -> ColorScheme {
        self.color_scheme
    }

    pub fn set_color_scheme(&mut self, scheme: ColorScheme) {
        self.color_scheme = scheme;
    }

    /// Read a parameter by key. `colorScheme` reads as its numeric value.
    pub fn get_by_name(&self, key: &str) -> Result<f32, ParamError> {
        if key == COLOR_SCHEME_KEY {
            return Ok(self.color_scheme.value() as f32);
        }
        ParamId::from_key(key)
            .map(|id| self.get(id))
            .ok_or_else(|| ParamError::UnknownParam(key.to_string()))
    }

    /// Write a parameter by key. `colorScheme` accepts the values 1-4.
    pub fn set_by_name(&mut self, key: &str, value: f32) -> Result<(), ParamError> {
        if key == COLOR_SCHEME_KEY {
            let scheme = (value.fract() == 0.0)
                .then(|| ColorScheme::from_value(value as i32))
                .flatten()
                .ok_or(ParamError::InvalidSchemeValue(value))?;
            self.color_scheme = scheme;
            return Ok(());
        }
        let id = ParamId::from_key(key).ok_or_else(|| ParamError::UnknownParam(key.to_string()))?;
        self.set(id, value);
        Ok(())
    }

    /// `(id, value)` pairs in uniform-buffer order.
    pub fn iter(&self) -> impl Iterator<Item = (ParamId, f32)> + '_ {
        ParamId::ALL.into_iter().map(|id| (id, self.get(id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let params = ShaderParams::default();
        assert_eq!(params.get(ParamId::Scale), 5.0);
        assert_eq!(params.get(ParamId::WaverShift), 1.6);
        assert_eq!(params.get(ParamId::TimeSpeed), 0.03);
        assert_eq!(params.color_scheme(), ColorScheme::Monochromatic);
    }

    #[test]
    fn test_key_round_trip_for_every_param() {
        for id in ParamId::ALL {
            assert_eq!(ParamId::from_key(id.key()), Some(id));
        }
        assert_eq!(ParamId::from_key("Scale"), None);
    }

    #[test]
    fn test_index_matches_all_order() {
        for (i, id) in ParamId::ALL.into_iter().enumerate() {
            assert_eq!(id.index(), i);
        }
    }

    #[test]
    fn test_programmatic_set_is_not_clamped() {
        let mut params = ShaderParams::default();
        params.set(ParamId::Hue, 3.5);
        assert_eq!(params.get(ParamId::Hue), 3.5);
        params.set_by_name("scale", -100.0).unwrap();
        assert_eq!(params.get(ParamId::Scale), -100.0);
    }

    #[test]
    fn test_unknown_name_is_an_error() {
        let mut params = ShaderParams::default();
        assert_eq!(
            params.get_by_name("brightness"),
            Err(ParamError::UnknownParam("brightness".into()))
        );
        assert!(params.set_by_name("brightness", 1.0).is_err());
        assert_eq!(params, ShaderParams::default());
    }

    #[test]
    fn test_scheme_values_and_labels() {
        assert_eq!(ColorScheme::Monochromatic.value(), 1);
        assert_eq!(ColorScheme::from_label("analogous"), Ok(ColorScheme::Analogous));
        assert_eq!(ColorScheme::Analogous.value(), 2);
        assert_eq!(ColorScheme::from_label("reverse mono.").map(ColorScheme::value), Ok(3));
        assert_eq!(ColorScheme::from_label("reverse ana.").map(ColorScheme::value), Ok(4));
        assert!(ColorScheme::from_label("triadic").is_err());
    }

    #[test]
    fn test_selecting_analogous_sets_two() {
        let mut params = ShaderParams::default();
        params.set_color_scheme(ColorScheme::from_label("analogous").unwrap());
        assert_eq!(params.get_by_name(COLOR_SCHEME_KEY), Ok(2.0));
    }

    #[test]
    fn test_scheme_by_name_rejects_out_of_set_values() {
        let mut params = ShaderParams::default();
        params.set_by_name(COLOR_SCHEME_KEY, 4.0).unwrap();
        assert_eq!(params.color_scheme(), ColorScheme::ReverseAnalogous);
        assert_eq!(
            params.set_by_name(COLOR_SCHEME_KEY, 5.0),
            Err(ParamError::InvalidSchemeValue(5.0))
        );
        assert!(params.set_by_name(COLOR_SCHEME_KEY, 1.5).is_err());
        assert_eq!(params.color_scheme(), ColorScheme::ReverseAnalogous);
    }

    #[test]
    fn test_scheme_flags_and_cycle() {
        assert!(!ColorScheme::Analogous.is_reversed());
        assert!(ColorScheme::ReverseAnalogous.is_reversed());
        assert!(ColorScheme::ReverseAnalogous.is_analogous());
        assert!(!ColorScheme::ReverseMonochromatic.is_analogous());

        let mut scheme = ColorScheme::Monochromatic;
        for _ in 0..4 {
            scheme = scheme.next();
        }
        assert_eq!(scheme, ColorScheme::Monochromatic);
    }
}
