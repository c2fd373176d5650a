//! Runtime settings for the Jovian viewer.
//!
//! Settings persist as `config.ron` in the platform config directory and can be
//! overridden per launch from the command line. Shader parameters are not part
//! of the config: they start from their defaults every run.

mod cli;
mod config;
mod error;

pub use cli::CliArgs;
pub use config::{
    CameraConfig, Config, DebugConfig, LensFlareConfig, PanelConfig, RandomizeConfig,
    WindowConfig, default_config_dir,
};
pub use error::ConfigError;
