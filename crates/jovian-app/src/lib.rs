//! Jovian viewer application.
//!
//! Window and event loop, orbit controls, frame timing, the scene that ties
//! the planet renderers to the lens flare, and the headless PNG snapshot.

pub mod error;
pub mod frame_stats;
pub mod input;
pub mod orbit;
pub mod scene;
pub mod snapshot;
pub mod window;

pub use error::AppError;
pub use window::{App, ViewerState, run};
