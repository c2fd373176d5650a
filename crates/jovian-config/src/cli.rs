//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;

use crate::Config;

/// Jovian command-line arguments.
///
/// CLI values override settings loaded from `config.ron`.
#[derive(Parser, Debug, Default)]
#[command(name = "jovian", about = "Procedural gas giant viewer")]
pub struct CliArgs {
    /// Window width.
    #[arg(long)]
    pub width: Option<u32>,

    /// Window height.
    #[arg(long)]
    pub height: Option<u32>,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    pub log_level: Option<String>,

    /// Path to config directory (overrides default location).
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Seed for the randomize action.
    #[arg(long)]
    pub seed: Option<u64>,

    /// Randomize all shader parameters before the first frame.
    #[arg(long)]
    pub randomize: bool,

    /// Port for the tweak panel (0 = OS-assigned).
    #[arg(long)]
    pub panel_port: Option<u16>,

    /// Do not start the tweak panel.
    #[arg(long)]
    pub no_panel: bool,

    /// Write a PNG of the surface pattern to this path and exit.
    #[arg(long)]
    pub snapshot: Option<PathBuf>,

    /// Snapshot width in pixels (height is half the width).
    #[arg(long, default_value_t = 512)]
    pub snapshot_width: u32,
}

impl Config {
    /// Apply CLI overrides to a loaded config.
    pub fn apply_cli_overrides(&mut self, args: &CliArgs) {
        if let Some(w) = args.width {
            self.window.width = w;
        }
        if let Some(h) = args.height {
            self.window.height = h;
        }
        if let Some(ref level) = args.log_level {
            self.debug.log_level = level.clone();
        }
        if let Some(seed) = args.seed {
            self.randomize.seed = Some(seed);
        }
        if args.randomize {
            self.randomize.on_start = true;
        }
        if let Some(port) = args.panel_port {
            self.panel.port = port;
        }
        if args.no_panel {
            self.panel.enabled = false;
        }
    }
}
