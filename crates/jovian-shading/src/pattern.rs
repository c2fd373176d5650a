//! CPU evaluation of the surface pattern.
//!
//! Follows `noise.wgsl`, `gas_pattern.wgsl` and `palette.wgsl` step for step.
//! Used for headless snapshots and for testing the pattern without a GPU;
//! results agree with the GPU up to float precision of `sin`.

use std::f32::consts::{PI, TAU};

use glam::Vec3;

use crate::params::{ColorScheme, ParamId, ShaderParams};

const FBM_OCTAVES: usize = 5;
const FBM_NORM: f32 = 0.96875;
const BAND_STRETCH: f32 = 0.35;
const ANALOGOUS_SPREAD: f32 = 0.24;

// ---------------------------------------------------------------------------
// Noise
// ---------------------------------------------------------------------------

/// GLSL/WGSL `fract`: `x - floor(x)`, always in `[0, 1)`.
#[inline]
fn fract(x: f32) -> f32 {
    x - x.floor()
}

#[inline]
fn mix(a: f32, b: f32, t: f32) -> f32 {
    a + (b - a) * t
}

pub fn hash3(p: Vec3) -> f32 {
    let h = p.dot(Vec3::new(127.1, 311.7, 74.7));
    fract(h.sin() * 43758.5453)
}

/// Trilinear value noise with smoothstep easing, in `[0, 1]`.
pub fn value_noise(p: Vec3) -> f32 {
    let i = p.floor();
    let f = p - i;
    let u = f * f * (Vec3::splat(3.0) - 2.0 * f);

    let n = |x: f32, y: f32, z: f32| hash3(i + Vec3::new(x, y, z));
    let x00 = mix(n(0.0, 0.0, 0.0), n(1.0, 0.0, 0.0), u.x);
    let x10 = mix(n(0.0, 1.0, 0.0), n(1.0, 1.0, 0.0), u.x);
    let x01 = mix(n(0.0, 0.0, 1.0), n(1.0, 0.0, 1.0), u.x);
    let x11 = mix(n(0.0, 1.0, 1.0), n(1.0, 1.0, 1.0), u.x);
    mix(mix(x00, x10, u.y), mix(x01, x11, u.y), u.z)
}

/// Five-octave fractal sum of [`value_noise`], normalized to `[0, 1]`.
pub fn fbm(p: Vec3) -> f32 {
    let mut sum = 0.0;
    let mut amp = 0.5;
    let mut q = p;
    for _ in 0..FBM_OCTAVES {
        sum += amp * value_noise(q);
        q = q * 2.0 + Vec3::new(1.7, 9.2, 5.3);
        amp *= 0.5;
    }
    sum / FBM_NORM
}

// ---------------------------------------------------------------------------
// Pattern
// ---------------------------------------------------------------------------

/// Pattern value in `[0, 1]` for unit-sphere direction `n` at `time` seconds.
pub fn gas_pattern(n: Vec3, params: &ShaderParams, time: f32) -> f32 {
    let p = |id| params.get(id);
    let t = time * p(ParamId::TimeSpeed);

    let waver = (fbm(n * p(ParamId::WaverScale) + Vec3::new(p(ParamId::WaverShift), t, 0.0))
        - 0.5)
        * p(ParamId::WaverFactor);
    let band = n.y + waver;

    let wp = n * p(ParamId::WarperScale) + Vec3::new(0.0, 0.0, t);
    let warp = Vec3::new(
        fbm(wp),
        fbm(wp + Vec3::new(5.2, 1.3, 2.8)),
        fbm(wp + Vec3::new(1.7, 9.2, 4.1)),
    ) - Vec3::splat(0.5);

    let scale = p(ParamId::Scale);
    let q = Vec3::new(n.x * BAND_STRETCH, band, n.z * BAND_STRETCH) * scale
        + warp * p(ParamId::WarperFactor)
        + Vec3::new(p(ParamId::Shift), 0.0, 0.0);
    let mut v = fbm(q);

    v += 0.5
        * p(ParamId::PulserAmp)
        * (band * scale * 3.0 + p(ParamId::PulserOffset) + t * TAU).sin();
    v.clamp(0.0, 1.0)
}

// ---------------------------------------------------------------------------
// Palette
// ---------------------------------------------------------------------------

pub fn hsv_to_rgb(h: f32, s: f32, v: f32) -> Vec3 {
    let k = Vec3::new(1.0, 2.0 / 3.0, 1.0 / 3.0);
    let hue = Vec3::splat(h) + k;
    let hue = hue - hue.floor();
    let p = (hue * 6.0 - Vec3::splat(3.0)).abs();
    let rgb = (p - Vec3::ONE).clamp(Vec3::ZERO, Vec3::ONE);
    v * Vec3::ONE.lerp(rgb, s)
}

/// The pattern value as seen by the palette: inverted for reverse schemes.
pub fn scheme_value(value: f32, scheme: ColorScheme) -> f32 {
    if scheme.is_reversed() {
        1.0 - value
    } else {
        value
    }
}

/// Surface color for a pattern value, in `[0, 1]` per channel.
pub fn scheme_color(value: f32, params: &ShaderParams) -> Vec3 {
    let scheme = params.color_scheme();
    let v = scheme_value(value, scheme);
    let mut h = params.get(ParamId::Hue);
    if scheme.is_analogous() {
        h += (v - 0.5) * ANALOGOUS_SPREAD;
    }
    let s = mix(0.75, 0.35, v);
    let b = mix(0.12, 1.0, v);
    hsv_to_rgb(fract(h), s, b)
}

/// Glow color of the atmosphere shell.
pub fn atmosphere_tint(params: &ShaderParams) -> Vec3 {
    hsv_to_rgb(fract(params.get(ParamId::Hue)), 0.45, 1.0)
}

// ---------------------------------------------------------------------------
// Sampling
// ---------------------------------------------------------------------------

/// Unit-sphere direction for equirectangular texture coordinates.
///
/// `u` runs west to east and `v` north to south, both in `[0, 1]`.
pub fn sphere_direction(u: f32, v: f32) -> Vec3 {
    let lon = (u - 0.5) * TAU;
    let lat = (0.5 - v) * PI;
    Vec3::new(lat.cos() * lon.sin(), lat.sin(), lat.cos() * lon.cos())
}

/// Unlit equirectangular RGBA8 image of the surface.
pub fn render_equirect(params: &ShaderParams, time: f32, width: u32, height: u32) -> Vec<u8> {
    let mut pixels = Vec::with_capacity(width as usize * height as usize * 4);
    for y in 0..height {
        let v = (y as f32 + 0.5) / height as f32;
        for x in 0..width {
            let u = (x as f32 + 0.5) / width as f32;
            let value = gas_pattern(sphere_direction(u, v), params, time);
            let rgb = scheme_color(value, params);
            pixels.extend(rgb.to_array().map(|c| (c * 255.0).round() as u8));
            pixels.push(255);
        }
    }
    pixels
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::randomize::{randomize, seeded_rng};

    fn sample_directions() -> impl Iterator<Item = Vec3> {
        (0..16).flat_map(|i| {
            (0..8).map(move |j| sphere_direction(i as f32 / 16.0, (j as f32 + 0.5) / 8.0))
        })
    }

    #[test]
    fn test_noise_ranges() {
        for n in sample_directions() {
            for p in [n, n * 7.3, n * 40.0 + Vec3::splat(3.1)] {
                let v = value_noise(p);
                assert!((0.0..=1.0).contains(&v), "value_noise = {v}");
                let f = fbm(p);
                assert!((0.0..=1.0 + 1e-5).contains(&f), "fbm = {f}");
            }
        }
    }

    #[test]
    fn test_value_noise_matches_hash_at_lattice_points() {
        let p = Vec3::new(3.0, -2.0, 5.0);
        assert!((value_noise(p) - hash3(p)).abs() < 1e-6);
    }

    #[test]
    fn test_sphere_direction_is_unit_and_oriented() {
        for n in sample_directions() {
            assert!((n.length() - 1.0).abs() < 1e-5);
        }
        assert!((sphere_direction(0.5, 0.0).y - 1.0).abs() < 1e-6);
        assert!((sphere_direction(0.5, 0.5) - Vec3::Z).length() < 1e-6);
    }

    #[test]
    fn test_colors_stay_in_unit_range_for_random_params() {
        let mut params = ShaderParams::default();
        let mut rng = seeded_rng(Some(11));
        for round in 0..8 {
            randomize(&mut params, &mut rng);
            for n in sample_directions() {
                let value = gas_pattern(n, &params, round as f32 * 13.0);
                assert!((0.0..=1.0).contains(&value));
                let c = scheme_color(value, &params);
                assert!(c.min_element() >= 0.0 && c.max_element() <= 1.0, "{c:?}");
            }
        }
    }

    #[test]
    fn test_reverse_schemes_invert_value() {
        let mut mono = ShaderParams::default();
        mono.set(ParamId::Hue, 0.3);
        let mut reverse = mono.clone();
        reverse.set_color_scheme(ColorScheme::ReverseMonochromatic);

        for value in [0.0, 0.2, 0.5, 0.9] {
            let a = scheme_color(value, &mono);
            let b = scheme_color(1.0 - value, &reverse);
            assert!((a - b).length() < 1e-6);
        }
        assert_eq!(scheme_value(0.25, ColorScheme::ReverseAnalogous), 0.75);
        assert_eq!(scheme_value(0.25, ColorScheme::Analogous), 0.25);
    }

    #[test]
    fn test_monochromatic_keeps_hue_analogous_drifts() {
        let mut params = ShaderParams::default();
        params.set(ParamId::Hue, 0.6);
        let dark = scheme_color(0.2, &params);
        let light = scheme_color(0.9, &params);
        assert!(light.length() > dark.length());

        params.set_color_scheme(ColorScheme::Analogous);
        let drifted = scheme_color(0.9, &params);
        assert!((drifted - light).length() > 1e-3);
    }

    #[test]
    fn test_hsv_primaries() {
        assert!((hsv_to_rgb(0.0, 1.0, 1.0) - Vec3::X).length() < 1e-5);
        assert!((hsv_to_rgb(1.0 / 3.0, 1.0, 1.0) - Vec3::Y).length() < 1e-5);
        assert!((hsv_to_rgb(0.5, 0.0, 0.5) - Vec3::splat(0.5)).length() < 1e-5);
    }

    #[test]
    fn test_params_change_the_pattern() {
        let base = ShaderParams::default();
        let mut shifted = base.clone();
        shifted.set(ParamId::Shift, 7.5);
        let differs = sample_directions()
            .any(|n| (gas_pattern(n, &base, 0.0) - gas_pattern(n, &shifted, 0.0)).abs() > 1e-3);
        assert!(differs);
    }

    #[test]
    fn test_time_speed_scales_animation() {
        let mut frozen = ShaderParams::default();
        frozen.set(ParamId::TimeSpeed, 0.0);
        let n = sphere_direction(0.3, 0.4);
        assert_eq!(gas_pattern(n, &frozen, 0.0), gas_pattern(n, &frozen, 100.0));
    }

    #[test]
    fn test_render_equirect_size_and_alpha() {
        let pixels = render_equirect(&ShaderParams::default(), 0.0, 16, 8);
        assert_eq!(pixels.len(), 16 * 8 * 4);
        assert!(pixels.chunks_exact(4).all(|px| px[3] == 255));
    }
}
