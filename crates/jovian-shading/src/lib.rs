//! Shading parameters and shader sources for the gas giant.
//!
//! [`ShaderParams`] is the single set of values read by both the surface and
//! the atmosphere pipelines. The tweak panel describes its sliders with
//! [`ControlDescriptor`]s and mutates the set through them; [`randomize`]
//! rerolls it from an injected RNG. WGSL is assembled at compile time from
//! the fragments in [`fragments`], and [`pattern`] mirrors the surface
//! pattern on the CPU.

pub mod controls;
pub mod fragments;
pub mod params;
pub mod pattern;
pub mod randomize;
pub mod uniforms;

pub use controls::{CONTROLS, COLOR_SCHEME_LABEL, ControlDescriptor, RandomizeRange};
pub use params::{ColorScheme, ParamError, ParamId, ShaderParams};
pub use randomize::{RandomizeReport, randomize, seeded_rng};
pub use uniforms::{FrameInputs, ShaderUniforms};
