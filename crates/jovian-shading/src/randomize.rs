//! The "randomize" panel action.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

use crate::controls::CONTROLS;
use crate::params::{ColorScheme, ShaderParams};

/// What a randomize call changed.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RandomizeReport {
    /// Number of float parameters reassigned.
    pub changed: usize,
    pub color_scheme: ColorScheme,
}

/// Reroll every randomizable control and the color scheme.
///
/// Each control with randomize bounds `(lo, hi)` becomes `lo + (hi - lo) * u`
/// for `u` drawn uniformly from `[0, 1)`. Excluded controls keep their value.
pub fn randomize<R: Rng + ?Sized>(params: &mut ShaderParams, rng: &mut R) -> RandomizeReport {
    let mut changed = 0;
    for control in &CONTROLS {
        if let Some((lo, hi)) = control.randomize_bounds() {
            let u: f32 = rng.random();
            params.set(control.param, lo + (hi - lo) * u);
            changed += 1;
        }
    }

    let scheme = ColorScheme::ALL[rng.random_range(0..ColorScheme::ALL.len())];
    params.set_color_scheme(scheme);

    log::debug!("Randomized {changed} parameters, scheme '{scheme}'");
    RandomizeReport {
        changed,
        color_scheme: scheme,
    }
}

/// RNG for the randomize action: reproducible with a seed, OS entropy otherwise.
pub fn seeded_rng(seed: Option<u64>) -> ChaCha8Rng {
    match seed {
        Some(seed) => ChaCha8Rng::seed_from_u64(seed),
        None => ChaCha8Rng::from_os_rng(),
    }
}
