//! Crate-wide error type.

use std::path::PathBuf;

use thiserror::Error;

use crate::timeline::TimelineError;

/// Convenience result type used across the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Failures while starting up or loading assets.
#[derive(Debug, Error)]
pub enum Error {
    /// A scene timeline was malformed.
    #[error("invalid animation: {0}")]
    Timeline(#[from] TimelineError),

    #[error("event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("failed to create window: {0}")]
    Window(#[from] winit::error::OsError),

    #[error("failed to create surface: {0}")]
    Surface(#[from] wgpu::CreateSurfaceError),

    #[error("no suitable GPU adapter: {0}")]
    Adapter(#[from] wgpu::RequestAdapterError),

    #[error("failed to create GPU device: {0}")]
    Device(#[from] wgpu::RequestDeviceError),

    /// The surface reports no usable texture formats.
    #[error("surface is not supported by the adapter")]
    UnsupportedSurface,

    /// A texture image could not be read or decoded.
    #[error("failed to load texture {}: {source}", .path.display())]
    Image {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

impl Error {
    pub fn image(path: impl Into<PathBuf>, source: image::ImageError) -> Self {
        Self::Image {
            path: path.into(),
            source,
        }
    }
}
