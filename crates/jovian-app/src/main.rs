//! The binary entry point for the Jovian viewer.

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use jovian_app::snapshot::write_snapshot;
use jovian_config::{CliArgs, Config, default_config_dir};
use jovian_shading::{ShaderParams, randomize, seeded_rng};

const APP_NAME: &str = "jovian";

/// Log files go under the platform data directory, next to the config when
/// there is none.
fn log_dir(config_dir: &std::path::Path) -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join(APP_NAME))
        .unwrap_or_else(|| config_dir.to_path_buf())
        .join("logs")
}

fn load_config(args: &CliArgs) -> (Config, Option<PathBuf>) {
    let resolved = match &args.config {
        Some(dir) => Ok(dir.clone()),
        None => default_config_dir(),
    };
    let config_dir = match resolved {
        Ok(dir) => dir,
        Err(e) => {
            eprintln!("Using default config: {e}");
            let mut config = Config::default();
            config.apply_cli_overrides(args);
            return (config, None);
        }
    };

    let mut config = Config::load_or_create(&config_dir).unwrap_or_else(|e| {
        eprintln!("Failed to load config from {}: {e}", config_dir.display());
        Config::default()
    });
    config.apply_cli_overrides(args);
    (config, Some(config_dir))
}

fn main() -> ExitCode {
    let args = CliArgs::parse();
    let (config, config_dir) = load_config(&args);

    let log_dir = config_dir.as_deref().map(log_dir);
    jovian_log::init_logging(log_dir.as_deref(), cfg!(debug_assertions), Some(&config));
    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        "Jovian viewer starting"
    );

    if let Some(path) = &args.snapshot {
        let mut params = ShaderParams::default();
        if config.randomize.on_start {
            randomize(&mut params, &mut seeded_rng(config.randomize.seed));
        }
        return match write_snapshot(path, &params, 0.0, args.snapshot_width) {
            Ok(_) => ExitCode::SUCCESS,
            Err(e) => {
                tracing::error!("{e}");
                ExitCode::FAILURE
            }
        };
    }

    match jovian_app::run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!("Viewer failed: {e}");
            ExitCode::FAILURE
        }
    }
}
