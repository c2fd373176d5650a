//! Named, versioned WGSL fragments and the shader sources built from them.
//!
//! Every fragment file starts with a `// fragment: <name> v<version>` header.
//! The full shader sources are concatenated at compile time, so the text
//! handed to wgpu is a `&'static str` with no runtime substitution.

/// One WGSL source fragment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ShaderFragment {
    pub name: &'static str,
    pub version: u32,
    pub source: &'static str,
}

impl ShaderFragment {
    /// The header line the fragment file is expected to start with.
    pub fn header(&self) -> String {
        format!("// fragment: {} v{}", self.name, self.version)
    }
}

macro_rules! fragment {
    ($name:literal, $version:literal, $path:literal) => {
        ShaderFragment {
            name: $name,
            version: $version,
            source: include_str!($path),
        }
    };
}

macro_rules! compose {
    ($($path:literal),+ $(,)?) => {
        concat!($(include_str!($path), "\n"),+)
    };
}

pub const SCENE: ShaderFragment = fragment!("scene", 1, "../shaders/scene.wgsl");
pub const PARAMS: ShaderFragment = fragment!("params", 1, "../shaders/params.wgsl");
pub const NOISE: ShaderFragment = fragment!("noise", 1, "../shaders/noise.wgsl");
pub const PALETTE: ShaderFragment = fragment!("palette", 1, "../shaders/palette.wgsl");
pub const GAS_PATTERN: ShaderFragment = fragment!("gas_pattern", 1, "../shaders/gas_pattern.wgsl");
pub const SURFACE_MAIN: ShaderFragment = fragment!("surface", 1, "../shaders/surface.wgsl");
pub const ATMOSPHERE_MAIN: ShaderFragment =
    fragment!("atmosphere", 1, "../shaders/atmosphere.wgsl");

/// Fragments of [`SURFACE_SHADER`], in concatenation order.
pub const SURFACE_FRAGMENTS: [ShaderFragment; 6] =
    [SCENE, PARAMS, NOISE, PALETTE, GAS_PATTERN, SURFACE_MAIN];

/// Fragments of [`ATMOSPHERE_SHADER`], in concatenation order.
pub const ATMOSPHERE_FRAGMENTS: [ShaderFragment; 4] = [SCENE, PARAMS, PALETTE, ATMOSPHERE_MAIN];

/// Planet surface shader (`vs_main` / `fs_main`).
pub const SURFACE_SHADER: &str = compose!(
    "../shaders/scene.wgsl",
    "../shaders/params.wgsl",
    "../shaders/noise.wgsl",
    "../shaders/palette.wgsl",
    "../shaders/gas_pattern.wgsl",
    "../shaders/surface.wgsl",
);

/// Atmosphere shell shader (`vs_main` / `fs_main`).
pub const ATMOSPHERE_SHADER: &str = compose!(
    "../shaders/scene.wgsl",
    "../shaders/params.wgsl",
    "../shaders/palette.wgsl",
    "../shaders/atmosphere.wgsl",
);
