use jovian_render::{RenderContextError, SurfaceError};

use crate::scene::SceneError;
use crate::snapshot::SnapshotError;

/// Errors that end the viewer with a non-zero exit code.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("GPU initialization failed: {0}")]
    RenderContext(#[from] RenderContextError),

    #[error("surface error: {0}")]
    Surface(#[from] SurfaceError),

    #[error("failed to build scene: {0}")]
    Scene(#[from] SceneError),

    #[error(transparent)]
    Snapshot(#[from] SnapshotError),
}
