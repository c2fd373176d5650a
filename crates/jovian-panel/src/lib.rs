//! Live-tweak panel for the shading parameters.
//!
//! An HTTP server on a background thread serves a slider page and a small
//! JSON API. Requests never touch the parameter set: they queue
//! [`PanelCommand`]s that the render thread drains once per frame with
//! [`apply_command`], and they read the [`PanelSnapshot`] the render thread
//! republishes afterwards.

pub mod page;
pub mod server;

pub use server::{PanelError, PanelServer};


use std::collections::BTreeMap;
use std::sync::{Arc, Mutex};

use crossbeam_channel::{Receiver, Sender};
use jovian_shading::{
    ColorScheme, ControlDescriptor, ParamError, ParamId, RandomizeReport, ShaderParams, randomize,
};
use rand::Rng;

/// A change requested from the panel or the keyboard.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PanelCommand {
    /// Slider move; clamped to the control's range when applied.
    SetParam { param: ParamId, value: f32 },
    SetScheme(ColorScheme),
    NextScheme,
    Randomize,
    Quit,
}

/// What applying a command did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CommandEffect {
    ParamSet { param: ParamId, value: f32 },
    SchemeSet(ColorScheme),
    Randomized(RandomizeReport),
    Quit,
}

/// Apply one command to the live parameter set.
pub fn apply_command<R: Rng + ?Sized>(
    params: &mut ShaderParams,
    rng: &mut R,
    command: PanelCommand,
) -> Result<CommandEffect, ParamError> {
    let effect = match command {
        PanelCommand::SetParam { param, value } => {
            let value = ControlDescriptor::for_param(param).apply(params, value)?;
            CommandEffect::ParamSet { param, value }
        }
        PanelCommand::SetScheme(scheme) => {
            params.set_color_scheme(scheme);
            CommandEffect::SchemeSet(scheme)
        }
        PanelCommand::NextScheme => {
            let scheme = params.color_scheme().next();
            params.set_color_scheme(scheme);
            CommandEffect::SchemeSet(scheme)
        }
        PanelCommand::Randomize => CommandEffect::Randomized(randomize(params, rng)),
        PanelCommand::Quit => CommandEffect::Quit,
    };
    Ok(effect)
}

pub type CommandSender = Sender<PanelCommand>;
pub type CommandReceiver = Receiver<PanelCommand>;

/// Unbounded command queue between the panel thread and the render thread.
pub fn command_channel() -> (CommandSender, CommandReceiver) {
    crossbeam_channel::unbounded()
}

/// Frame timing shown alongside the parameters.
#[derive(Debug, Clone, Copy, PartialEq, Default, serde::Serialize)]
pub struct FrameTiming {
    pub fps: f64,
    pub frame_time_ms: f64,
    pub frame_count: u64,
    pub uptime_seconds: f64,
}

/// What the panel reports on `GET /params`.
#[derive(Debug, Clone, PartialEq, Default, serde::Serialize)]
pub struct PanelSnapshot {
    pub params: BTreeMap<String, f32>,
    pub color_scheme: String,
    pub color_scheme_value: i32,
    #[serde(flatten)]
    pub timing: FrameTiming,
}

impl PanelSnapshot {
    pub fn capture(params: &ShaderParams, timing: FrameTiming) -> Self {
        let scheme = params.color_scheme();
        Self {
            params: params
                .iter()
                .map(|(id, value)| (id.key().to_string(), value))
                .collect(),
            color_scheme: scheme.label().to_string(),
            color_scheme_value: scheme.value(),
            timing,
        }
    }
}

/// Snapshot written by the render thread and read by the server.
pub type SharedSnapshot = Arc<Mutex<PanelSnapshot>>;

pub fn shared_snapshot(params: &ShaderParams) -> SharedSnapshot {
    Arc::new(Mutex::new(PanelSnapshot::capture(
        params,
        FrameTiming::default(),
    )))
}

/// Replace the published snapshot. A poisoned lock is recovered.
pub fn publish(shared: &SharedSnapshot, snapshot: PanelSnapshot) {
    let mut guard = shared.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    *guard = snapshot;
}
